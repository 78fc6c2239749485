use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use super::auth::TokenRefresher;
use super::domain::{
    AssignmentRow, CandidateRow, CompetencyRow, RatingRow, RatingValue, SecretariatActionRow,
};
use super::gateway::{GatewayError, SheetGateway, SheetsApi};
use super::submission::{
    collect_ratings, collect_secretariat_actions, CandidateActionChoice, CompetencyChoice,
    SubmissionError,
};

/// Named-range keys expected in the runtime configuration's `SHEET_RANGES`.
pub const ASSIGNMENTS_RANGE: &str = "assignments";
pub const CANDIDATES_RANGE: &str = "candidates";
pub const COMPETENCIES_RANGE: &str = "competencies";
pub const RATINGS_RANGE: &str = "ratings";
pub const SECRETARIAT_RANGE: &str = "secretariat";

/// Prior scores offered for prefill when a candidate was already rated by
/// this evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefillOffer {
    pub ratings: BTreeMap<String, RatingValue>,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Submission(#[from] SubmissionError),
}

/// Composes the sheet gateway into the operations the two forms need.
pub struct RatingService<S, T> {
    gateway: SheetGateway<S, T>,
}

impl<S, T> RatingService<S, T>
where
    S: SheetsApi,
    T: TokenRefresher,
{
    pub fn new(gateway: SheetGateway<S, T>) -> Self {
        Self { gateway }
    }

    pub fn assignments(&self) -> Result<Vec<AssignmentRow>, ServiceError> {
        Ok(self.gateway.read(ASSIGNMENTS_RANGE)?)
    }

    pub fn candidates(
        &self,
        position: &str,
        item: &str,
    ) -> Result<Vec<CandidateRow>, ServiceError> {
        let rows: Vec<CandidateRow> = self.gateway.read(CANDIDATES_RANGE)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.position == position && row.item == item)
            .collect())
    }

    pub fn competencies(
        &self,
        position: &str,
        item: &str,
    ) -> Result<Vec<CompetencyRow>, ServiceError> {
        let rows: Vec<CompetencyRow> = self.gateway.read(COMPETENCIES_RANGE)?;
        Ok(rows
            .into_iter()
            .filter(|row| row.position == position && row.item == item)
            .collect())
    }

    pub fn existing_ratings(
        &self,
        evaluator: &str,
        name: &str,
        position: &str,
        item: &str,
    ) -> Result<Vec<RatingRow>, ServiceError> {
        let rows: Vec<RatingRow> = self.gateway.read(RATINGS_RANGE)?;
        Ok(rows
            .into_iter()
            .filter(|row| {
                row.evaluator == evaluator
                    && row.name == name
                    && row.position == position
                    && row.item == item
            })
            .collect())
    }

    /// Offer prior scores for prefill, or `None` when this evaluator has not
    /// rated the candidate yet.
    pub fn prefill_offer(
        &self,
        evaluator: &str,
        name: &str,
        position: &str,
        item: &str,
    ) -> Result<Option<PrefillOffer>, ServiceError> {
        let existing = self.existing_ratings(evaluator, name, position, item)?;
        if existing.is_empty() {
            return Ok(None);
        }
        let ratings = existing
            .into_iter()
            .map(|row| (row.competency, row.rating))
            .collect();
        Ok(Some(PrefillOffer { ratings }))
    }

    /// Validate the form locally, then rewrite the ratings range with prior
    /// rows for the same identity replaced (overwrite-on-resubmit).
    pub fn submit_ratings(
        &self,
        evaluator: &str,
        name: &str,
        position: &str,
        item: &str,
        choices: &[CompetencyChoice],
        submitted_at: DateTime<Utc>,
    ) -> Result<usize, ServiceError> {
        let new_rows = collect_ratings(evaluator, name, position, item, choices, submitted_at)?;

        let mut all: Vec<RatingRow> = self.gateway.read(RATINGS_RANGE)?;
        all.retain(|existing| !new_rows.iter().any(|row| row.same_identity(existing)));
        all.extend(new_rows.iter().cloned());

        if let Err(err) = self.gateway.write(RATINGS_RANGE, &all) {
            warn!(error = %err, "rating submission failed");
            return Err(err.into());
        }

        info!(evaluator, name, count = new_rows.len(), "ratings submitted");
        Ok(new_rows.len())
    }

    /// Validate the table locally, then append the actions to the
    /// secretariat range (full-matrix update, last writer wins).
    pub fn submit_secretariat(
        &self,
        choices: &[CandidateActionChoice],
        submitted_at: DateTime<Utc>,
    ) -> Result<usize, ServiceError> {
        let new_rows = collect_secretariat_actions(choices, submitted_at)?;

        let mut all: Vec<SecretariatActionRow> = self.gateway.read(SECRETARIAT_RANGE)?;
        all.extend(new_rows.iter().cloned());

        if let Err(err) = self.gateway.write(SECRETARIAT_RANGE, &all) {
            warn!(error = %err, "secretariat submission failed");
            return Err(err.into());
        }

        info!(count = new_rows.len(), "secretariat actions submitted");
        Ok(new_rows.len())
    }
}
