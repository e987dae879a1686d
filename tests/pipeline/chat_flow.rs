use serde_json::json;

use vidlytics::analysis::AnalysisResult;
use vidlytics::chat::{
    CHAT_FAILURE_TEXT, CHAT_SYSTEM_INSTRUCTION, ChatDriver, ChatEvent, ChatRole, ChatState,
    Transition, TurnOutcome, WELCOME_MESSAGE,
};
use vidlytics::ingest::UploadedFile;
use vidlytics::llm::NullStreamSink;

use crate::fake_model::FakeModel;

fn files() -> Vec<UploadedFile> {
    vec![
        UploadedFile::from_bytes("views.csv", b"date,views\n2024-03-01,100\n").unwrap(),
        UploadedFile::from_bytes("revenue.csv", b"month,usd\nMarch,42\n").unwrap(),
    ]
}

fn result() -> AnalysisResult {
    serde_json::from_value(json!({
        "filesDetected": [
            {"name": "views.csv", "purpose": "Daily views"},
            {"name": "revenue.csv", "purpose": "Monthly revenue"}
        ],
        "revenueAnalysis": "Revenue tracks views.",
        "combinedStrategicInsights": "Views drive revenue.",
        "recommendations": [
            {"action": "Add mid-rolls", "impact": "Medium", "description": "Longer videos earn more."}
        ]
    }))
    .unwrap()
}

#[tokio::test]
async fn seed_is_sent_once_before_welcome_is_shown() {
    let model = FakeModel::new();
    let driver = ChatDriver::open(&model, &files(), &result()).await.unwrap();

    let log = model.log();
    assert_eq!(log.system_instructions, [CHAT_SYSTEM_INSTRUCTION]);
    assert_eq!(log.seeds.len(), 1);
    assert!(log.sent.is_empty());

    let seed = &log.seeds[0];
    let views = seed.find("--- FILE 1: views.csv ---\ndate,views\n").unwrap();
    let revenue = seed.find("--- FILE 2: revenue.csv ---\nmonth,usd\n").unwrap();
    let summary = seed.find("Views drive revenue.").unwrap();
    assert!(views < revenue && revenue < summary);
    assert!(!seed.contains("Revenue tracks views."));

    let first = &driver.state().messages()[0];
    assert_eq!(first.role, ChatRole::Model);
    assert_eq!(first.text, WELCOME_MESSAGE);
}

#[tokio::test]
async fn turns_stream_into_transcript_in_order() {
    let model = FakeModel::new()
        .with_reply(&["Revenue ", "follows ", "views."])
        .with_reply(&["Try ", "mid-rolls."]);
    let mut driver = ChatDriver::open(&model, &files(), &result()).await.unwrap();

    assert!(matches!(
        driver.send("Why is revenue up?", &NullStreamSink).await,
        TurnOutcome::Completed
    ));
    assert!(matches!(
        driver.send("What next?", &NullStreamSink).await,
        TurnOutcome::Completed
    ));

    let transcript: Vec<(ChatRole, &str)> = driver
        .state()
        .messages()
        .iter()
        .map(|m| (m.role, m.text.as_str()))
        .collect();
    assert_eq!(
        transcript,
        [
            (ChatRole::Model, WELCOME_MESSAGE),
            (ChatRole::User, "Why is revenue up?"),
            (ChatRole::Model, "Revenue follows views."),
            (ChatRole::User, "What next?"),
            (ChatRole::Model, "Try mid-rolls."),
        ]
    );
    assert_eq!(model.log().sent, ["Why is revenue up?", "What next?"]);
}

#[tokio::test]
async fn interrupted_turn_leaves_session_usable() {
    let model = FakeModel::new()
        .with_unfinished_reply(&["Partial"])
        .with_reply(&["Recovered."]);
    let mut driver = ChatDriver::open(&model, &files(), &result()).await.unwrap();

    assert!(matches!(
        driver.send("first", &NullStreamSink).await,
        TurnOutcome::Failed(_)
    ));
    let texts: Vec<&str> = driver
        .state()
        .messages()
        .iter()
        .map(|m| m.text.as_str())
        .collect();
    assert_eq!(texts[2..], ["Partial", CHAT_FAILURE_TEXT]);
    assert!(!driver.state().is_busy());

    assert!(matches!(
        driver.send("second", &NullStreamSink).await,
        TurnOutcome::Completed
    ));
    assert_eq!(
        driver.state().messages().last().unwrap().text,
        "Recovered."
    );
}

#[test]
fn second_send_while_streaming_is_rejected() {
    let (state, _) = ChatState::with_welcome(WELCOME_MESSAGE)
        .apply(ChatEvent::UserSent("first".into()));
    let (state, _) = state.apply(ChatEvent::Fragment("Working".into()));
    assert!(state.is_busy());

    let (after, transition) = state.clone().apply(ChatEvent::UserSent("second".into()));
    assert_eq!(transition, Transition::Ignored);
    assert_eq!(after, state);
}
