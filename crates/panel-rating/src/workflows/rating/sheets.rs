use google_sheets4::{api::ValueRange, Sheets};
use serde_json::Value;
use tokio::runtime::Runtime;

use super::gateway::{SheetsApi, SheetsApiError};

/// Thin wrapper around the generated google-sheets4 client allowing the
/// synchronous workflow to read and write ranges without exposing async
/// details. Authentication is handled by the hub's authenticator; the
/// per-call token parameter is ignored here.
pub struct GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    hub: Sheets<C>,
    runtime: Runtime,
}

impl<C> GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    pub fn new(hub: Sheets<C>, runtime: Runtime) -> Self {
        Self { hub, runtime }
    }

    pub fn with_runtime(hub: Sheets<C>) -> Result<Self, SheetsApiError> {
        let runtime = Runtime::new().map_err(|err| SheetsApiError::Backend(err.to_string()))?;
        Ok(Self::new(hub, runtime))
    }

    fn map_error(err: google_sheets4::Error) -> SheetsApiError {
        match &err {
            google_sheets4::Error::Failure(response) if response.status().as_u16() == 401 => {
                SheetsApiError::Unauthorized
            }
            _ => SheetsApiError::Backend(err.to_string()),
        }
    }
}

impl<C> std::fmt::Debug for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleSheetsClient").finish_non_exhaustive()
    }
}

fn cell_to_string(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl<C> SheetsApi for GoogleSheetsClient<C>
where
    C: google_sheets4::common::Connector + Send + Sync + 'static,
{
    fn values_get(
        &self,
        _access_token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsApiError> {
        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_get(spreadsheet_id, range)
                .doit()
                .await
        });

        let (_, value_range) = result.map_err(Self::map_error)?;
        Ok(value_range
            .values
            .unwrap_or_default()
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect())
    }

    fn values_update(
        &self,
        _access_token: &str,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsApiError> {
        let payload = ValueRange {
            major_dimension: None,
            range: Some(range.to_string()),
            values: Some(
                values
                    .into_iter()
                    .map(|row| row.into_iter().map(Value::String).collect())
                    .collect(),
            ),
        };

        let result = self.runtime.block_on(async {
            self.hub
                .spreadsheets()
                .values_update(payload, spreadsheet_id, range)
                .value_input_option("RAW")
                .doit()
                .await
        });

        result.map(|_| ()).map_err(Self::map_error)
    }
}
