use serde::{Deserialize, Serialize};

use super::domain::{AssignmentRow, CandidateRow};

/// Dropdown levels, ordered top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SelectionLevel {
    Assignment,
    Position,
    Item,
    Name,
}

/// Which form the selector is driving; decides what choosing an item loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorView {
    Evaluator,
    Secretariat,
}

/// Current choices, one per level. Levels below the deepest choice are
/// empty and disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionState {
    pub assignment: Option<String>,
    pub position: Option<String>,
    pub item: Option<String>,
    pub name: Option<String>,
}

impl SelectionState {
    pub fn chosen(&self, level: SelectionLevel) -> Option<&str> {
        match level {
            SelectionLevel::Assignment => self.assignment.as_deref(),
            SelectionLevel::Position => self.position.as_deref(),
            SelectionLevel::Item => self.item.as_deref(),
            SelectionLevel::Name => self.name.as_deref(),
        }
    }

    /// A dropdown is enabled once everything above it is chosen.
    pub fn enabled(&self, level: SelectionLevel) -> bool {
        match level {
            SelectionLevel::Assignment => true,
            SelectionLevel::Position => self.assignment.is_some(),
            SelectionLevel::Item => self.position.is_some(),
            SelectionLevel::Name => self.item.is_some(),
        }
    }

    fn clear_below(&mut self, level: SelectionLevel) {
        if level < SelectionLevel::Position {
            self.position = None;
        }
        if level < SelectionLevel::Item {
            self.item = None;
        }
        if level < SelectionLevel::Name {
            self.name = None;
        }
    }
}

/// A user interaction with one dropdown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEvent {
    Choose { level: SelectionLevel, value: String },
    Reset,
}

/// Follow-up load the caller should perform after a transition. Rendering
/// and fetching stay outside the reducer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionEffect {
    ClearRendered,
    LoadCompetencies { position: String, item: String },
    LoadCandidates { position: String, item: String },
    LookupExistingRatings { name: String, position: String, item: String },
}

/// Apply one event, returning the next state and any follow-up load.
///
/// Choosing at level N resets every level below N; a superseded in-flight
/// fetch for the old choice is not cancelled (last writer wins).
pub fn apply(
    state: &SelectionState,
    event: SelectionEvent,
    view: SelectorView,
) -> (SelectionState, Option<SelectionEffect>) {
    let mut next = state.clone();
    match event {
        SelectionEvent::Reset => (SelectionState::default(), Some(SelectionEffect::ClearRendered)),
        SelectionEvent::Choose { level, value } => {
            match level {
                SelectionLevel::Assignment => next.assignment = Some(value),
                SelectionLevel::Position => next.position = Some(value),
                SelectionLevel::Item => next.item = Some(value),
                SelectionLevel::Name => next.name = Some(value),
            }
            next.clear_below(level);

            let effect = match level {
                SelectionLevel::Assignment | SelectionLevel::Position => {
                    Some(SelectionEffect::ClearRendered)
                }
                SelectionLevel::Item => {
                    let position = next.position.clone().unwrap_or_default();
                    let item = next.item.clone().unwrap_or_default();
                    Some(match view {
                        SelectorView::Evaluator => {
                            SelectionEffect::LoadCompetencies { position, item }
                        }
                        SelectorView::Secretariat => {
                            SelectionEffect::LoadCandidates { position, item }
                        }
                    })
                }
                SelectionLevel::Name => match view {
                    SelectorView::Evaluator => Some(SelectionEffect::LookupExistingRatings {
                        name: next.name.clone().unwrap_or_default(),
                        position: next.position.clone().unwrap_or_default(),
                        item: next.item.clone().unwrap_or_default(),
                    }),
                    SelectorView::Secretariat => None,
                },
            };
            (next, effect)
        }
    }
}

/// Distinct values in order of first appearance.
fn distinct_in_order<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|existing| existing == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

pub fn assignment_options(rows: &[AssignmentRow]) -> Vec<String> {
    distinct_in_order(rows.iter().map(|row| row.assignment.as_str()))
}

pub fn position_options(rows: &[AssignmentRow], assignment: &str) -> Vec<String> {
    distinct_in_order(
        rows.iter()
            .filter(|row| row.assignment == assignment)
            .map(|row| row.position.as_str()),
    )
}

pub fn item_options(rows: &[AssignmentRow], assignment: &str, position: &str) -> Vec<String> {
    distinct_in_order(
        rows.iter()
            .filter(|row| row.assignment == assignment && row.position == position)
            .map(|row| row.item.as_str()),
    )
}

pub fn candidate_names(candidates: &[CandidateRow], position: &str, item: &str) -> Vec<String> {
    distinct_in_order(
        candidates
            .iter()
            .filter(|row| row.position == position && row.item == item)
            .map(|row| row.name.as_str()),
    )
}

/// Options for the dropdown one level below the given state, derived from
/// the full in-memory assignment list.
pub fn options_at(state: &SelectionState, level: SelectionLevel, rows: &[AssignmentRow]) -> Vec<String> {
    match level {
        SelectionLevel::Assignment => assignment_options(rows),
        SelectionLevel::Position => match &state.assignment {
            Some(assignment) => position_options(rows, assignment),
            None => Vec::new(),
        },
        SelectionLevel::Item => match (&state.assignment, &state.position) {
            (Some(assignment), Some(position)) => item_options(rows, assignment, position),
            _ => Vec::new(),
        },
        // Names come from the candidates range, not the assignment list.
        SelectionLevel::Name => Vec::new(),
    }
}
