use chrono::{DateTime, SecondsFormat, Utc};

use super::domain::{CandidateStatus, RatingRow, RatingValue, SecretariatActionRow};

/// One rendered competency and the radio value the evaluator picked, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompetencyChoice {
    pub competency: String,
    pub selected: Option<RatingValue>,
}

/// One secretariat table row and the action picked for it, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateActionChoice {
    pub assignment: String,
    pub position: String,
    pub item: String,
    pub name: String,
    pub status: Option<CandidateStatus>,
    pub comment: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("select at least one rating before submitting")]
    NoRatingsSelected,
    #[error("select at least one candidate action before submitting")]
    NoActionsSelected,
}

fn stamp(submitted_at: DateTime<Utc>) -> String {
    submitted_at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Turn form state into rating rows. Competencies with no selection are
/// omitted; zero selections rejects locally, before any gateway call.
pub fn collect_ratings(
    evaluator: &str,
    name: &str,
    position: &str,
    item: &str,
    choices: &[CompetencyChoice],
    submitted_at: DateTime<Utc>,
) -> Result<Vec<RatingRow>, SubmissionError> {
    let timestamp = stamp(submitted_at);
    let rows: Vec<RatingRow> = choices
        .iter()
        .filter_map(|choice| {
            choice.selected.map(|rating| RatingRow {
                evaluator: evaluator.to_string(),
                name: name.to_string(),
                position: position.to_string(),
                item: item.to_string(),
                competency: choice.competency.clone(),
                rating,
                timestamp: timestamp.clone(),
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(SubmissionError::NoRatingsSelected);
    }
    Ok(rows)
}

/// Turn the secretariat table into action rows. Rows without an action are
/// excluded; an empty result rejects locally.
pub fn collect_secretariat_actions(
    choices: &[CandidateActionChoice],
    submitted_at: DateTime<Utc>,
) -> Result<Vec<SecretariatActionRow>, SubmissionError> {
    let timestamp = stamp(submitted_at);
    let rows: Vec<SecretariatActionRow> = choices
        .iter()
        .filter_map(|choice| {
            choice.status.map(|status| SecretariatActionRow {
                assignment: choice.assignment.clone(),
                position: choice.position.clone(),
                item: choice.item.clone(),
                name: choice.name.clone(),
                status,
                comment: choice.comment.clone(),
                timestamp: timestamp.clone(),
            })
        })
        .collect();

    if rows.is_empty() {
        return Err(SubmissionError::NoActionsSelected);
    }
    Ok(rows)
}
