use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::Utc;
use clap::Args;
use panel_rating::config::RuntimeConfig;
use panel_rating::error::AppError;
use panel_rating::workflows::rating::{
    apply, assignment_options, candidate_names, item_options, position_options, AssignmentRow,
    AuthError, AuthGate, CandidateActionChoice, CandidateRow, CandidateStatus, CompetencyChoice,
    CompetencyKind, CompetencyRow, EvaluatorGate, RatingRow, RatingValue, SecretariatActionRow,
    SecretariatGate, SelectionEvent, SelectionLevel, SelectionState, SelectorView, SheetGateway,
    RatingService, UserInfoProvider,
};

use crate::infra::{DemoRefresher, InMemorySheets};

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Evaluator email to sign in as
    #[arg(long, default_value = "a@x.com")]
    pub(crate) evaluator: String,
    /// Skip the secretariat portion of the demo
    #[arg(long)]
    pub(crate) skip_secretariat: bool,
}

struct DemoIdentity {
    email: String,
}

impl UserInfoProvider for DemoIdentity {
    fn email_for_token(&self, _access_token: &str) -> Result<String, AuthError> {
        Ok(self.email.clone())
    }
}

fn demo_config() -> RuntimeConfig {
    RuntimeConfig {
        client_id: "demo-client".to_string(),
        api_key: "demo-key".to_string(),
        sheet_id: "demo-sheet".to_string(),
        scopes: "https://www.googleapis.com/auth/spreadsheets".to_string(),
        evaluator_passwords: BTreeMap::from([("a@x.com".to_string(), "hunter2".to_string())]),
        secretariat_password: "open-sesame".to_string(),
        sheet_ranges: BTreeMap::from([
            ("assignments".to_string(), "Assignments!A:C".to_string()),
            ("candidates".to_string(), "Candidates!A:E".to_string()),
            ("competencies".to_string(), "Competencies!A:E".to_string()),
            ("ratings".to_string(), "Ratings!A:G".to_string()),
            ("secretariat".to_string(), "Secretariat!A:G".to_string()),
        ]),
    }
}

fn seed_demo_sheets() -> Arc<InMemorySheets> {
    let sheets = Arc::new(InMemorySheets::default());
    sheets.seed(
        "Assignments!A:C",
        &[
            assignment("Round 12", "Engineer", "Backend"),
            assignment("Round 12", "Engineer", "Frontend"),
            assignment("Round 12", "Analyst", "Budget"),
            assignment("Round 13", "Translator", "French"),
        ],
    );
    sheets.seed(
        "Candidates!A:E",
        &[
            candidate("Round 12", "Engineer", "Backend", "Jane"),
            candidate("Round 12", "Engineer", "Backend", "Omar"),
            candidate("Round 12", "Engineer", "Frontend", "Ines"),
        ],
    );
    sheets.seed(
        "Competencies!A:E",
        &[
            competency("Engineer", "Backend", "Communication", CompetencyKind::Basic),
            competency("Engineer", "Backend", "Systems design", CompetencyKind::Minimum),
            competency("Engineer", "Backend", "Teamwork", CompetencyKind::Organizational),
        ],
    );
    sheets.seed("Ratings!A:G", &[] as &[RatingRow]);
    sheets.seed("Secretariat!A:G", &[] as &[SecretariatActionRow]);
    sheets
}

fn assignment(assignment: &str, position: &str, item: &str) -> AssignmentRow {
    AssignmentRow {
        assignment: assignment.to_string(),
        position: position.to_string(),
        item: item.to_string(),
    }
}

fn candidate(assignment: &str, position: &str, item: &str, name: &str) -> CandidateRow {
    CandidateRow {
        assignment: assignment.to_string(),
        position: position.to_string(),
        item: item.to_string(),
        name: name.to_string(),
        file_link: format!("https://files/{}", name.to_ascii_lowercase()),
    }
}

fn competency(position: &str, item: &str, name: &str, kind: CompetencyKind) -> CompetencyRow {
    CompetencyRow {
        position: position.to_string(),
        item: item.to_string(),
        competency: name.to_string(),
        kind,
        description: format!("{name} for {position}/{item}"),
    }
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs {
        evaluator,
        skip_secretariat,
    } = args;

    let config = demo_config();
    let sheets = seed_demo_sheets();
    let service = RatingService::new(SheetGateway::new(
        sheets.clone(),
        Arc::new(DemoRefresher),
        config.sheet_id.clone(),
        config.sheet_ranges.clone(),
        "demo-token",
    ));

    println!("Panel rating demo");

    let mut gate = AuthGate::new();
    let provider = DemoIdentity {
        email: evaluator.clone(),
    };
    let mut session = gate.resolve(&provider, "demo-token", &config)?;
    println!("Signed in as {}", session.email);

    if !session.evaluator_verified {
        match gate.verify_evaluator(&mut session, &config, "hunter2") {
            EvaluatorGate::Granted => println!("Evaluator password accepted"),
            EvaluatorGate::Retry { remaining } => {
                println!("Wrong evaluator password, {remaining} attempts left");
            }
            EvaluatorGate::SignedOut => {
                println!("Too many wrong passwords, signed out");
                return Ok(());
            }
        }
    }

    // Cascade: assignment -> position -> item -> name.
    let assignments = service.assignments()?;
    let mut state = SelectionState::default();
    println!("Assignments: {}", assignment_options(&assignments).join(", "));
    for (level, value) in [
        (SelectionLevel::Assignment, "Round 12"),
        (SelectionLevel::Position, "Engineer"),
        (SelectionLevel::Item, "Backend"),
        (SelectionLevel::Name, "Jane"),
    ] {
        let (next, effect) = apply(
            &state,
            SelectionEvent::Choose {
                level,
                value: value.to_string(),
            },
            SelectorView::Evaluator,
        );
        state = next;
        match level {
            SelectionLevel::Assignment => println!(
                "  positions for {value}: {}",
                position_options(&assignments, value).join(", ")
            ),
            SelectionLevel::Position => println!(
                "  items for {value}: {}",
                item_options(&assignments, "Round 12", value).join(", ")
            ),
            _ => {}
        }
        if let Some(effect) = effect {
            tracing::debug!(?effect, "selection effect");
        }
    }

    let competencies = service.competencies("Engineer", "Backend")?;
    println!("Competencies to rate: {}", competencies.len());

    let candidates = service.candidates("Engineer", "Backend")?;
    println!(
        "Candidates: {}",
        candidate_names(&candidates, "Engineer", "Backend").join(", ")
    );

    if let Some(offer) = service.prefill_offer(&evaluator, "Jane", "Engineer", "Backend")? {
        println!("Prior ratings found for Jane: {} entries", offer.ratings.len());
    }

    let choices: Vec<CompetencyChoice> = competencies
        .iter()
        .enumerate()
        .map(|(index, row)| CompetencyChoice {
            competency: row.competency.clone(),
            selected: RatingValue::new(3 + (index as u8 % 2)),
        })
        .collect();
    let appended = service.submit_ratings(
        &evaluator,
        "Jane",
        "Engineer",
        "Backend",
        &choices,
        Utc::now(),
    )?;
    println!("Submitted {appended} ratings for Jane");

    if !skip_secretariat {
        match gate.verify_secretariat(&mut session, &config, "open-sesame") {
            SecretariatGate::Granted => println!("Secretariat password accepted"),
            SecretariatGate::Retry { remaining } => {
                println!("Wrong secretariat password, {remaining} attempts left");
            }
            SecretariatGate::Fallback => println!("Secretariat view unavailable"),
        }

        if session.secretariat_verified {
            let actions = vec![
                CandidateActionChoice {
                    assignment: "Round 12".to_string(),
                    position: "Engineer".to_string(),
                    item: "Backend".to_string(),
                    name: "Jane".to_string(),
                    status: Some(CandidateStatus::LongList),
                    comment: "advance to interviews".to_string(),
                },
                CandidateActionChoice {
                    assignment: "Round 12".to_string(),
                    position: "Engineer".to_string(),
                    item: "Backend".to_string(),
                    name: "Omar".to_string(),
                    status: Some(CandidateStatus::Disqualified),
                    comment: "incomplete file".to_string(),
                },
            ];
            let appended = service.submit_secretariat(&actions, Utc::now())?;
            println!("Recorded {appended} secretariat actions");
        }
    }

    let ratings_matrix = sheets.stored("Ratings!A:G");
    println!(
        "Ratings range now holds {} rows (including header)",
        ratings_matrix.len()
    );

    Ok(())
}
