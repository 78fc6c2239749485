use std::fmt;

use serde::{Deserialize, Serialize};

/// Positional mapping between a record and one spreadsheet row.
///
/// Reads tolerate ragged rows: missing cells default to the empty string,
/// and rows whose typed cells fail to parse are skipped.
pub trait SheetRecord: Sized {
    /// Header row synthesized on writes and skipped on reads.
    const HEADER: &'static [&'static str];

    fn from_row(row: &[String]) -> Option<Self>;
    fn to_row(&self) -> Vec<String>;
}

fn cell(row: &[String], index: usize) -> String {
    row.get(index).cloned().unwrap_or_default()
}

/// One assignment/position/item combination; defines the selection hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRow {
    pub assignment: String,
    pub position: String,
    pub item: String,
}

impl SheetRecord for AssignmentRow {
    const HEADER: &'static [&'static str] = &["Assignment", "Position", "Item"];

    fn from_row(row: &[String]) -> Option<Self> {
        Some(Self {
            assignment: cell(row, 0),
            position: cell(row, 1),
            item: cell(row, 2),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.assignment.clone(),
            self.position.clone(),
            self.item.clone(),
        ]
    }
}

/// A person being evaluated for a given item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRow {
    pub assignment: String,
    pub position: String,
    pub item: String,
    pub name: String,
    pub file_link: String,
}

impl SheetRecord for CandidateRow {
    const HEADER: &'static [&'static str] = &["Assignment", "Position", "Item", "Name", "FileLink"];

    fn from_row(row: &[String]) -> Option<Self> {
        Some(Self {
            assignment: cell(row, 0),
            position: cell(row, 1),
            item: cell(row, 2),
            name: cell(row, 3),
            file_link: cell(row, 4),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.assignment.clone(),
            self.position.clone(),
            self.item.clone(),
            self.name.clone(),
            self.file_link.clone(),
        ]
    }
}

/// Grouping of a scored criterion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompetencyKind {
    Basic,
    Organizational,
    Minimum,
}

impl CompetencyKind {
    pub const fn label(self) -> &'static str {
        match self {
            CompetencyKind::Basic => "basic",
            CompetencyKind::Organizational => "organizational",
            CompetencyKind::Minimum => "minimum",
        }
    }

    /// Sheet cells are hand-entered; anything unrecognized counts as basic.
    pub fn from_label(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "organizational" => Self::Organizational,
            "minimum" => Self::Minimum,
            _ => Self::Basic,
        }
    }
}

/// A rating criterion scoped to a position/item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompetencyRow {
    pub position: String,
    pub item: String,
    pub competency: String,
    pub kind: CompetencyKind,
    pub description: String,
}

impl SheetRecord for CompetencyRow {
    const HEADER: &'static [&'static str] =
        &["Position", "Item", "Competency", "Type", "Description"];

    fn from_row(row: &[String]) -> Option<Self> {
        Some(Self {
            position: cell(row, 0),
            item: cell(row, 1),
            competency: cell(row, 2),
            kind: CompetencyKind::from_label(&cell(row, 3)),
            description: cell(row, 4),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.position.clone(),
            self.item.clone(),
            self.competency.clone(),
            self.kind.label().to_string(),
            self.description.clone(),
        ]
    }
}

/// Validated 1–5 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct RatingValue(u8);

impl RatingValue {
    pub fn new(value: u8) -> Option<Self> {
        (1..=5).contains(&value).then_some(Self(value))
    }

    pub fn parse(raw: &str) -> Option<Self> {
        raw.trim().parse::<u8>().ok().and_then(Self::new)
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl fmt::Display for RatingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u8> for RatingValue {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("rating must be between 1 and 5, got {value}"))
    }
}

impl From<RatingValue> for u8 {
    fn from(value: RatingValue) -> Self {
        value.0
    }
}

/// One evaluator's score for one candidate/competency. Identity is
/// (evaluator, name, position, item, competency) by overwrite-on-resubmit
/// convention only; nothing in the sheet enforces it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingRow {
    pub evaluator: String,
    pub name: String,
    pub position: String,
    pub item: String,
    pub competency: String,
    pub rating: RatingValue,
    pub timestamp: String,
}

impl RatingRow {
    pub fn same_identity(&self, other: &RatingRow) -> bool {
        self.evaluator == other.evaluator
            && self.name == other.name
            && self.position == other.position
            && self.item == other.item
            && self.competency == other.competency
    }
}

impl SheetRecord for RatingRow {
    const HEADER: &'static [&'static str] = &[
        "Evaluator",
        "Name",
        "Position",
        "Item",
        "Competency",
        "Rating",
        "Timestamp",
    ];

    fn from_row(row: &[String]) -> Option<Self> {
        let rating = RatingValue::parse(&cell(row, 5))?;
        Some(Self {
            evaluator: cell(row, 0),
            name: cell(row, 1),
            position: cell(row, 2),
            item: cell(row, 3),
            competency: cell(row, 4),
            rating,
            timestamp: cell(row, 6),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.evaluator.clone(),
            self.name.clone(),
            self.position.clone(),
            self.item.clone(),
            self.competency.clone(),
            self.rating.to_string(),
            self.timestamp.clone(),
        ]
    }
}

/// Secretariat decision applied to a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandidateStatus {
    Disqualified,
    LongList,
}

impl CandidateStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CandidateStatus::Disqualified => "Disqualified",
            CandidateStatus::LongList => "Long List",
        }
    }

    pub fn from_label(value: &str) -> Option<Self> {
        match value.trim() {
            "Disqualified" => Some(Self::Disqualified),
            "Long List" => Some(Self::LongList),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretariatActionRow {
    pub assignment: String,
    pub position: String,
    pub item: String,
    pub name: String,
    pub status: CandidateStatus,
    pub comment: String,
    pub timestamp: String,
}

impl SheetRecord for SecretariatActionRow {
    const HEADER: &'static [&'static str] = &[
        "Assignment",
        "Position",
        "Item",
        "Name",
        "Status",
        "Comment",
        "Timestamp",
    ];

    fn from_row(row: &[String]) -> Option<Self> {
        let status = CandidateStatus::from_label(&cell(row, 4))?;
        Some(Self {
            assignment: cell(row, 0),
            position: cell(row, 1),
            item: cell(row, 2),
            name: cell(row, 3),
            status,
            comment: cell(row, 5),
            timestamp: cell(row, 6),
        })
    }

    fn to_row(&self) -> Vec<String> {
        vec![
            self.assignment.clone(),
            self.position.clone(),
            self.item.clone(),
            self.name.clone(),
            self.status.label().to_string(),
            self.comment.clone(),
            self.timestamp.clone(),
        ]
    }
}

/// Ephemeral per-page identity; nothing here is persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub email: String,
    pub signed_in: bool,
    pub evaluator_verified: bool,
    pub secretariat_verified: bool,
}

impl SessionIdentity {
    pub fn signed_in(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            signed_in: true,
            evaluator_verified: false,
            secretariat_verified: false,
        }
    }

    pub fn sign_out(&mut self) {
        self.signed_in = false;
        self.evaluator_verified = false;
        self.secretariat_verified = false;
    }
}
