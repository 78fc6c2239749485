use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use metrics_exporter_prometheus::PrometheusHandle;
use panel_rating::workflows::rating::{
    AuthError, SessionIdentity, SheetRecord, SheetsApi, SheetsApiError, TokenRefresher,
};
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) sessions: Arc<SessionStore>,
    /// Raw stored runtime-configuration document; parsed per request so a
    /// malformed document answers `/config` with a 500.
    pub(crate) runtime_config_raw: Arc<String>,
}

/// Read the stored runtime-configuration document. A missing or unreadable
/// file degrades to an empty document, which every `/config` request then
/// reports as malformed.
pub(crate) fn load_runtime_document(path: &Path) -> String {
    match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "runtime configuration unreadable");
            String::new()
        }
    }
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> String {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    format!("sess-{id:06}")
}

/// In-memory session registry backing the simple session endpoints.
#[derive(Default)]
pub(crate) struct SessionStore {
    sessions: Mutex<HashMap<String, SessionIdentity>>,
}

impl SessionStore {
    pub(crate) fn login(&self, email: &str) -> String {
        let session_id = next_session_id();
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.insert(session_id.clone(), SessionIdentity::signed_in(email));
        session_id
    }

    pub(crate) fn check(&self, session_id: &str) -> Option<SessionIdentity> {
        let guard = self.sessions.lock().expect("session mutex poisoned");
        guard.get(session_id).cloned()
    }

    pub(crate) fn logout(&self, session_id: &str) -> bool {
        let mut guard = self.sessions.lock().expect("session mutex poisoned");
        guard.remove(session_id).is_some()
    }
}

/// Spreadsheet backend for the CLI demo: ranges held in memory, every token
/// accepted after the demo's simulated refresh.
#[derive(Default)]
pub(crate) struct InMemorySheets {
    ranges: Mutex<BTreeMap<String, Vec<Vec<String>>>>,
}

impl InMemorySheets {
    pub(crate) fn seed<R: SheetRecord>(&self, range: &str, records: &[R]) {
        let mut matrix: Vec<Vec<String>> = Vec::with_capacity(records.len() + 1);
        matrix.push(R::HEADER.iter().map(|cell| cell.to_string()).collect());
        matrix.extend(records.iter().map(SheetRecord::to_row));
        self.ranges
            .lock()
            .expect("ranges mutex poisoned")
            .insert(range.to_string(), matrix);
    }

    pub(crate) fn stored(&self, range: &str) -> Vec<Vec<String>> {
        self.ranges
            .lock()
            .expect("ranges mutex poisoned")
            .get(range)
            .cloned()
            .unwrap_or_default()
    }
}

impl SheetsApi for InMemorySheets {
    fn values_get(
        &self,
        _access_token: &str,
        _spreadsheet_id: &str,
        range: &str,
    ) -> Result<Vec<Vec<String>>, SheetsApiError> {
        Ok(self.stored(range))
    }

    fn values_update(
        &self,
        _access_token: &str,
        _spreadsheet_id: &str,
        range: &str,
        values: Vec<Vec<String>>,
    ) -> Result<(), SheetsApiError> {
        self.ranges
            .lock()
            .expect("ranges mutex poisoned")
            .insert(range.to_string(), values);
        Ok(())
    }
}

pub(crate) struct DemoRefresher;

impl TokenRefresher for DemoRefresher {
    fn refresh(&self) -> Result<String, AuthError> {
        Ok("demo-token-refreshed".to_string())
    }
}
