//! Wizard walkthroughs over a scripted model

mod common;

use common::{Reply, ScriptedLlm, api};
use okrcoach::config::WizardConfig;
use okrcoach::domain::VisionCategory;
use okrcoach::session::{Identity, Session};
use okrcoach::wizard::{Stage, WizardController, WizardError, WizardState};
use tempfile::TempDir;

const OKR: &str = r#"{"objective":"Grow the team","keyResults":["Hire two","Ship faster","Retros"],"summary":"Team growth"}"#;
const PERSONA: &str = r#"{"personaCode":"D","confidence":0.85,"reasoning":"people first"}"#;
const VISION: &str = r#"{"sixMonths":{"work":"Mentoring"},"oneYear":{"career":"Lead"},"narrative":"Steady growth."}"#;
const TASKS: &str = r#"{"tasks":["Book 1:1s","Draft hiring plan","Plan a retro"]}"#;
const PLAN: &str = r#"{"weeklyTheme":"People week","monday":{"focus":"1:1s","tasks":[{"time":"09:00","task":"1:1 with Sam","category":"meeting"}],"tip":"Listen"}}"#;

fn wizard(replies: Vec<Reply>) -> (WizardController, std::sync::Arc<common::MemorySink>) {
    let (api, sink) = api(ScriptedLlm::new(replies));
    let session = Session {
        access_token: None,
        identity: Identity {
            id: Some("u-1".to_string()),
            name: Some("Sam".to_string()),
            email: None,
        },
    };
    let config = WizardConfig {
        analyzing_delay_ms: 0,
        ..Default::default()
    };
    (WizardController::new(api, session, &config), sink)
}

#[tokio::test]
async fn test_full_walkthrough() {
    let (mut wizard, sink) = wizard(vec![
        Reply::Text("Tell me more about the team."),
        Reply::Text(OKR),
        Reply::Text(PERSONA),
        Reply::Text(VISION),
        Reply::Text(TASKS),
        Reply::Text(PLAN),
    ]);

    wizard.send_message("I want to grow the team").await.unwrap();
    wizard.extract_okr().await.unwrap();
    wizard.start_vision().unwrap();
    wizard
        .set_vision_answer(VisionCategory::Relationships, "team", "More trust")
        .unwrap();
    wizard.submit_vision().await.unwrap();

    assert_eq!(wizard.stage(), Stage::Outcome);
    let vision = wizard.state().future_vision.clone().unwrap();
    assert_eq!(vision.horizons.six_months.work, "Mentoring");
    assert_eq!(vision.action_tasks[0], "Book 1:1s");
    assert_eq!(vision.persona.name, "Relationship Builder");

    wizard.open_weekly_plan().await.unwrap();
    let plan = wizard.weekly_plan().unwrap();
    assert_eq!(plan.weekly_theme, "People week");
    assert_eq!(plan.monday.tasks[0].task, "1:1 with Sam");
    assert!(!plan.friday.tasks.is_empty());

    wizard.open_feedback().unwrap();
    wizard.submit_feedback(4, Some("helpful")).await.unwrap();

    let records = sink.records.lock().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].okr_objective, "Grow the team");
    assert_eq!(records[0].persona_code, "D");
    assert_eq!(records[0].user_name, "Sam");
    assert_eq!(records[0].user_email, "anonymous");
    drop(records);

    assert_eq!(wizard.state(), &WizardState::default());
}

#[tokio::test]
async fn test_rate_limited_vision_returns_to_form() {
    let (mut wizard, _) = wizard(vec![Reply::Text("ok"), Reply::Text(OKR), Reply::RateLimited]);

    wizard.send_message("hi").await.unwrap();
    wizard.extract_okr().await.unwrap();
    wizard.start_vision().unwrap();

    let err = wizard.submit_vision().await.unwrap_err();
    assert!(matches!(err, WizardError::Pipeline(ref e) if e.is_rate_limit()));
    assert_eq!(wizard.stage(), Stage::VisionIntake);
    assert_eq!(wizard.state().furthest, Stage::VisionIntake);
    assert!(wizard.active_toast().unwrap().is_rate_limit);
    assert!(wizard.state().persona.is_none());
}

#[tokio::test]
async fn test_back_navigation_keeps_cached_results() {
    let (mut wizard, _) = wizard(vec![
        Reply::Text("ok"),
        Reply::Text(OKR),
        Reply::Text(PERSONA),
        Reply::Text(VISION),
        Reply::Text(TASKS),
    ]);
    wizard.send_message("hi").await.unwrap();
    wizard.extract_okr().await.unwrap();
    wizard.start_vision().unwrap();
    wizard.submit_vision().await.unwrap();

    wizard.navigate(Stage::VisionIntake).unwrap();
    assert!(wizard.state().future_vision.is_some());
    wizard.navigate(Stage::Outcome).unwrap();
    assert!(matches!(
        wizard.navigate(Stage::WeeklyPlan),
        Err(WizardError::StageNotReached(Stage::WeeklyPlan))
    ));

    wizard.navigate(Stage::Coaching).unwrap();
    assert_eq!(wizard.state(), &WizardState::default());
}

#[tokio::test]
async fn test_save_and_restore() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wizard.json");

    let (mut first, _) = wizard(vec![Reply::Text("ok"), Reply::Text(OKR)]);
    first.send_message("hi").await.unwrap();
    first.extract_okr().await.unwrap();
    first.start_vision().unwrap();
    first.save(&path).unwrap();

    let (mut second, _) = wizard(vec![]);
    second.restore(&path).unwrap();
    assert_eq!(second.stage(), Stage::VisionIntake);
    assert_eq!(second.state().okr.as_ref().unwrap().objective, "Grow the team");
    assert_eq!(second.state().messages.len(), 3);
}
