use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use tracing::warn;

use super::auth::TokenRefresher;
use super::domain::SheetRecord;

/// Errors surfaced by a spreadsheet backend.
#[derive(Debug, thiserror::Error)]
pub enum SheetsApiError {
    #[error("access token rejected")]
    Unauthorized,
    #[error("sheets backend error: {0}")]
    Backend(String),
}

/// Row-oriented spreadsheet operations; values are 2D arrays of strings.
///
/// The access token travels with every call, matching the original client
/// where each request carries the page's current token.
pub trait SheetsApi: Send + Sync {
    fn values_get(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsApiError>;

    fn values_update(
        &self,
        access_token: &str,
        spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsApiError>;
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("no configured range named '{0}'")]
    UnknownRange(String),
    #[error("signed out: access token expired and could not be refreshed")]
    SignedOut,
    #[error(transparent)]
    Api(SheetsApiError),
}

/// Reads and writes typed records against named ranges, with a single
/// refresh-and-retry on an expired token.
pub struct SheetGateway<S, T> {
    api: Arc<S>,
    refresher: Arc<T>,
    spreadsheet_id: String,
    ranges: BTreeMap<String, String>,
    access_token: Mutex<String>,
}

impl<S, T> SheetGateway<S, T>
where
    S: SheetsApi,
    T: TokenRefresher,
{
    pub fn new(
        api: Arc<S>,
        refresher: Arc<T>,
        spreadsheet_id: impl Into<String>,
        ranges: BTreeMap<String, String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            api,
            refresher,
            spreadsheet_id: spreadsheet_id.into(),
            ranges,
            access_token: Mutex::new(access_token.into()),
        }
    }

    fn range(&self, range_name: &str) -> Result<&str, GatewayError> {
        self.ranges
            .get(range_name)
            .map(String::as_str)
            .ok_or_else(|| GatewayError::UnknownRange(range_name.to_string()))
    }

    /// Run a call, refreshing the token at most once on an unauthorized
    /// response. A second rejection or a failed refresh means sign-out.
    fn with_retry<R>(
        &self,
        call: impl Fn(&str) -> Result<R, SheetsApiError>,
    ) -> Result<R, GatewayError> {
        let token = self
            .access_token
            .lock()
            .expect("token mutex poisoned")
            .clone();

        match call(&token) {
            Ok(value) => Ok(value),
            Err(SheetsApiError::Unauthorized) => {
                let fresh = match self.refresher.refresh() {
                    Ok(fresh) => fresh,
                    Err(err) => {
                        warn!(error = %err, "token refresh failed, signing out");
                        return Err(GatewayError::SignedOut);
                    }
                };
                *self.access_token.lock().expect("token mutex poisoned") = fresh.clone();

                match call(&fresh) {
                    Ok(value) => Ok(value),
                    Err(SheetsApiError::Unauthorized) => {
                        warn!("refreshed token still rejected, signing out");
                        Err(GatewayError::SignedOut)
                    }
                    Err(other) => Err(GatewayError::Api(other)),
                }
            }
            Err(other) => Err(GatewayError::Api(other)),
        }
    }

    /// Fetch all rows for a named range, skip the header row, and map the
    /// rest positionally. Rows with unparsable typed cells are dropped.
    pub fn read<R: SheetRecord>(&self, range_name: &str) -> Result<Vec<R>, GatewayError> {
        let range = self.range(range_name)?.to_string();
        let rows = self.with_retry(|token| {
            self.api.values_get(token, &self.spreadsheet_id, &range)
        })?;

        Ok(rows
            .iter()
            .skip(1)
            .filter_map(|row| R::from_row(row))
            .collect())
    }

    /// Send the full value matrix (synthesized header plus one row per
    /// record) as an update. This overwrites the range rather than truly
    /// appending, so concurrent writers are last-writer-wins.
    pub fn write<R: SheetRecord>(
        &self,
        range_name: &str,
        records: &[R],
    ) -> Result<(), GatewayError> {
        let range = self.range(range_name)?.to_string();

        let mut matrix: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
        matrix.push(R::HEADER.iter().map(|cell| cell.to_string()).collect());
        matrix.extend(records.iter().map(SheetRecord::to_row));

        self.with_retry(|token| {
            self.api
                .values_update(token, &self.spreadsheet_id, &range, matrix.clone())
        })
    }
}
