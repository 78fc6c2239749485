//! The evaluation-rating workflow: cascading selection over assignment
//! rows, password-gated roles, the spreadsheet gateway, and the two
//! submission paths (evaluator ratings and secretariat actions).

pub mod auth;
pub mod domain;
pub mod gateway;
pub mod selection;
pub mod service;
pub mod sheets;
pub mod submission;

#[cfg(test)]
mod tests;

pub use auth::{
    AttemptStatus, AttemptTracker, AuthError, AuthGate, EvaluatorGate, Role, SecretariatGate,
    TokenRefresher, UserInfoProvider, MAX_PASSWORD_ATTEMPTS,
};
pub use domain::{
    AssignmentRow, CandidateRow, CandidateStatus, CompetencyKind, CompetencyRow, RatingRow,
    RatingValue, SecretariatActionRow, SessionIdentity, SheetRecord,
};
pub use gateway::{GatewayError, SheetGateway, SheetsApi, SheetsApiError};
pub use selection::{
    apply, assignment_options, candidate_names, item_options, options_at, position_options,
    SelectionEffect, SelectionEvent, SelectionLevel, SelectionState, SelectorView,
};
pub use service::{
    PrefillOffer, RatingService, ServiceError, ASSIGNMENTS_RANGE, CANDIDATES_RANGE,
    COMPETENCIES_RANGE, RATINGS_RANGE, SECRETARIAT_RANGE,
};
pub use sheets::GoogleSheetsClient;
pub use submission::{
    collect_ratings, collect_secretariat_actions, CandidateActionChoice, CompetencyChoice,
    SubmissionError,
};
