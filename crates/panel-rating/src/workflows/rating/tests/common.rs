use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use crate::config::RuntimeConfig;
use crate::workflows::rating::auth::{AuthError, TokenRefresher, UserInfoProvider};
use crate::workflows::rating::domain::{
    AssignmentRow, CandidateRow, CompetencyKind, CompetencyRow, RatingRow, RatingValue,
    SheetRecord,
};
use crate::workflows::rating::gateway::{SheetGateway, SheetsApi, SheetsApiError};
use crate::workflows::rating::service::RatingService;

pub(super) const SHEET_ID: &str = "sheet-xyz";

pub(super) fn sheet_ranges() -> BTreeMap<String, String> {
    BTreeMap::from([
        ("assignments".to_string(), "Assignments!A:C".to_string()),
        ("candidates".to_string(), "Candidates!A:E".to_string()),
        ("competencies".to_string(), "Competencies!A:E".to_string()),
        ("ratings".to_string(), "Ratings!A:G".to_string()),
        ("secretariat".to_string(), "Secretariat!A:G".to_string()),
    ])
}

pub(super) fn runtime_config() -> RuntimeConfig {
    RuntimeConfig {
        client_id: "client-123".to_string(),
        api_key: "key-abc".to_string(),
        sheet_id: SHEET_ID.to_string(),
        scopes: "https://www.googleapis.com/auth/spreadsheets".to_string(),
        evaluator_passwords: BTreeMap::from([("a@x.com".to_string(), "hunter2".to_string())]),
        secretariat_password: "open-sesame".to_string(),
        sheet_ranges: sheet_ranges(),
    }
}

pub(super) fn assignment_rows() -> Vec<AssignmentRow> {
    [
        ("Round 12", "Engineer", "Backend"),
        ("Round 12", "Engineer", "Frontend"),
        ("Round 12", "Analyst", "Budget"),
        ("Round 12", "Engineer", "Backend"),
        ("Round 13", "Translator", "French"),
    ]
    .iter()
    .map(|(assignment, position, item)| AssignmentRow {
        assignment: assignment.to_string(),
        position: position.to_string(),
        item: item.to_string(),
    })
    .collect()
}

pub(super) fn candidate_rows() -> Vec<CandidateRow> {
    [
        ("Round 12", "Engineer", "Backend", "Jane", "https://files/jane"),
        ("Round 12", "Engineer", "Backend", "Omar", "https://files/omar"),
        ("Round 12", "Engineer", "Frontend", "Ines", "https://files/ines"),
    ]
    .iter()
    .map(
        |(assignment, position, item, name, file_link)| CandidateRow {
            assignment: assignment.to_string(),
            position: position.to_string(),
            item: item.to_string(),
            name: name.to_string(),
            file_link: file_link.to_string(),
        },
    )
    .collect()
}

pub(super) fn competency_rows() -> Vec<CompetencyRow> {
    vec![
        CompetencyRow {
            position: "Engineer".to_string(),
            item: "Backend".to_string(),
            competency: "Communication".to_string(),
            kind: CompetencyKind::Basic,
            description: "Communicates clearly".to_string(),
        },
        CompetencyRow {
            position: "Engineer".to_string(),
            item: "Backend".to_string(),
            competency: "Systems design".to_string(),
            kind: CompetencyKind::Minimum,
            description: "Designs resilient services".to_string(),
        },
        CompetencyRow {
            position: "Analyst".to_string(),
            item: "Budget".to_string(),
            competency: "Forecasting".to_string(),
            kind: CompetencyKind::Organizational,
            description: "Projects spend accurately".to_string(),
        },
    ]
}

pub(super) fn rating_row(
    evaluator: &str,
    name: &str,
    competency: &str,
    rating: u8,
) -> RatingRow {
    RatingRow {
        evaluator: evaluator.to_string(),
        name: name.to_string(),
        position: "Engineer".to_string(),
        item: "Backend".to_string(),
        competency: competency.to_string(),
        rating: RatingValue::new(rating).expect("rating in range"),
        timestamp: "2026-08-01T09:00:00Z".to_string(),
    }
}

/// In-memory stand-in for the external spreadsheet API. Tracks call counts
/// and rejects tokens outside the accepted set with `Unauthorized`.
#[derive(Default)]
pub(super) struct MemorySheets {
    ranges: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
    accepted_tokens: Mutex<Vec<String>>,
    pub(super) get_calls: AtomicU32,
    pub(super) update_calls: AtomicU32,
}

impl MemorySheets {
    pub(super) fn accepting(tokens: &[&str]) -> Self {
        Self {
            accepted_tokens: Mutex::new(tokens.iter().map(|token| token.to_string()).collect()),
            ..Self::default()
        }
    }

    pub(super) fn seed<R: SheetRecord>(&self, range: &str, records: &[R]) {
        let mut matrix: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
        matrix.push(R::HEADER.iter().map(|cell| cell.to_string()).collect());
        matrix.extend(records.iter().map(SheetRecord::to_row));
        self.seed_raw(range, matrix);
    }

    pub(super) fn seed_raw(&self, range: &str, matrix: Vec<Vec<String>>) {
        self.ranges
            .lock()
            .expect("ranges mutex poisoned")
            .insert(range.to_string(), matrix);
    }

    pub(super) fn stored(&self, range: &str) -> Vec<Vec<String>> {
        self.ranges
            .lock()
            .expect("ranges mutex poisoned")
            .get(range)
            .cloned()
            .unwrap_or_default()
    }

    fn check_token(&self, token: &str) -> Result<(), SheetsApiError> {
        let accepted = self.accepted_tokens.lock().expect("token mutex poisoned");
        if accepted.iter().any(|candidate| candidate == token) {
            Ok(())
        } else {
            Err(SheetsApiError::Unauthorized)
        }
    }
}

impl SheetsApi for MemorySheets {
    fn values_get(
        &self,
        access_token: &str,
        _spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsApiError> {
        self.get_calls.fetch_add(1, Ordering::Relaxed);
        self.check_token(access_token)?;
        Ok(self.stored(range))
    }

    fn values_update(
        &self,
        access_token: &str,
        _spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsApiError> {
        self.update_calls.fetch_add(1, Ordering::Relaxed);
        self.check_token(access_token)?;
        self.seed_raw(range, values);
        Ok(())
    }
}

/// Refresher returning a fixed fresh token, or failing when none is set.
#[derive(Default)]
pub(super) struct StaticRefresher {
    pub(super) fresh_token: Option<String>,
}

impl StaticRefresher {
    pub(super) fn yielding(token: &str) -> Self {
        Self {
            fresh_token: Some(token.to_string()),
        }
    }
}

impl TokenRefresher for StaticRefresher {
    fn refresh(&self) -> Result<String, AuthError> {
        self.fresh_token
            .clone()
            .ok_or_else(|| AuthError::RefreshFailed("refresh endpoint rejected".to_string()))
    }
}

pub(super) struct StaticUserInfo {
    pub(super) email: String,
}

impl UserInfoProvider for StaticUserInfo {
    fn email_for_token(&self, access_token: &str) -> Result<String, AuthError> {
        if access_token.is_empty() {
            return Err(AuthError::InvalidToken);
        }
        Ok(self.email.clone())
    }
}

pub(super) fn gateway(
    sheets: Arc<MemorySheets>,
    refresher: Arc<StaticRefresher>,
    token: &str,
) -> SheetGateway<MemorySheets, StaticRefresher> {
    SheetGateway::new(sheets, refresher, SHEET_ID, sheet_ranges(), token)
}

/// Service over a seeded in-memory sheet, with handles kept for inspection.
pub(super) fn build_service() -> (
    RatingService<MemorySheets, StaticRefresher>,
    Arc<MemorySheets>,
) {
    let sheets = Arc::new(MemorySheets::accepting(&["valid"]));
    sheets.seed("Assignments!A:C", &assignment_rows());
    sheets.seed("Candidates!A:E", &candidate_rows());
    sheets.seed("Competencies!A:E", &competency_rows());
    sheets.seed("Ratings!A:G", &[] as &[RatingRow]);
    sheets.seed_raw(
        "Secretariat!A:G",
        vec![crate::workflows::rating::domain::SecretariatActionRow::HEADER
            .iter()
            .map(|cell| cell.to_string())
            .collect()],
    );

    let refresher = Arc::new(StaticRefresher::yielding("valid"));
    let service = RatingService::new(gateway(sheets.clone(), refresher, "valid"));
    (service, sheets)
}
