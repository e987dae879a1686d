use serde_json::json;
use tempfile::TempDir;

use vidlytics::analysis::ChartSpec;
use vidlytics::ingest::{MAX_FILE_CHARS, TRUNCATION_MARKER};
use vidlytics::workflow::{Phase, Workflow, WorkflowEvent, run_analysis};

use crate::fake_model::{AnalysisReply, FakeModel};

fn views_csv() -> String {
    let mut text = String::from("date,views,watch_hours\n");
    for day in 1..=10 {
        text.push_str(&format!("2024-03-{day:02},{},{}\n", day * 100, day * 7));
    }
    text
}

fn model_answer() -> String {
    json!({
        "filesDetected": [{"name": "views.csv", "purpose": "Daily views and watch time"}],
        "contentPerformance": "Views grew every day.",
        "combinedStrategicInsights": "Momentum is building; publish more often.",
        "recommendations": [
            {"action": "Publish twice a week", "impact": "High", "description": "Ride the growth."}
        ],
        "charts": [{
            "title": "Views vs Watch Hours",
            "type": "line",
            "xAxisKey": "date",
            "dataKeys": ["views", "watch_hours"],
            "data": [
                {"name": "2024-03-01", "series": [{"key": "views", "value": 100}, {"key": "watch_hours", "value": 7}]},
                {"name": "2024-03-02", "series": [{"key": "views", "value": "200"}]}
            ]
        }]
    })
    .to_string()
}

fn started(dir: &TempDir, files: &[(&str, Option<&str>)]) -> Workflow {
    let paths = files
        .iter()
        .map(|(name, body)| {
            let path = dir.path().join(name);
            if let Some(body) = body {
                std::fs::write(&path, body).unwrap();
            }
            path
        })
        .collect();
    Workflow::new()
        .apply(WorkflowEvent::FilesSelected(paths))
        .apply(WorkflowEvent::AnalysisStarted)
}

#[tokio::test]
async fn views_csv_flows_from_disk_to_flat_chart() {
    let dir = TempDir::new().unwrap();
    let csv = views_csv();
    let workflow = started(&dir, &[("views.csv", Some(&csv))]);
    let model = FakeModel::new().with_analysis(AnalysisReply::Text(model_answer()));

    let event = run_analysis(&model, &workflow).await;
    let workflow = workflow.apply(event);
    assert_eq!(workflow.phase(), &Phase::Report);

    let contents = model.log().analysis_contents.clone();
    assert_eq!(contents.len(), 1);
    let expected_prefix = format!("--- FILE 1: views.csv ---\n{csv}");
    assert!(contents[0].starts_with(&expected_prefix));

    let result = workflow.result().unwrap();
    let chart = &result.charts()[0];
    assert_eq!(chart.data.len(), 2);
    for row in &chart.data {
        assert!(row.contains_key("date"));
        assert!(!row.contains_key("series"));
    }
    assert_eq!(ChartSpec::value(&chart.data[0], "watch_hours"), Some(7.0));
    assert_eq!(ChartSpec::value(&chart.data[1], "views"), Some(200.0));
    assert!(!chart.data[1].contains_key("watch_hours"));
    assert_eq!(chart.missing_series(), [(1, "watch_hours")]);
}

#[tokio::test]
async fn oversized_file_reaches_model_truncated() {
    let dir = TempDir::new().unwrap();
    let body = "é".repeat(MAX_FILE_CHARS + 5);
    let workflow = started(&dir, &[("big.csv", Some(&body))]);
    let model = FakeModel::new().with_analysis(AnalysisReply::Text(model_answer()));

    let event = run_analysis(&model, &workflow).await;
    let workflow = workflow.apply(event);
    assert_eq!(workflow.phase(), &Phase::Report);

    let file = &workflow.files()[0];
    assert!(file.is_truncated());
    assert_eq!(file.content().chars().count(), MAX_FILE_CHARS + TRUNCATION_MARKER.chars().count());
    assert!(model.log().analysis_contents[0].contains(TRUNCATION_MARKER));
}

#[tokio::test]
async fn unreadable_file_fails_whole_batch_before_model_call() {
    let dir = TempDir::new().unwrap();
    let workflow = started(
        &dir,
        &[
            ("one.csv", Some("a,b\n1,2\n")),
            ("two.csv", None),
            ("three.csv", Some("c,d\n3,4\n")),
        ],
    );
    let model = FakeModel::new().with_analysis(AnalysisReply::Text(model_answer()));

    let event = run_analysis(&model, &workflow).await;
    let workflow = workflow.apply(event);
    match workflow.phase() {
        Phase::Failed(message) => assert!(message.contains("two.csv"), "{message}"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(workflow.result().is_none());
    assert!(workflow.files().is_empty());
    assert!(model.log().analysis_contents.is_empty());
}

#[tokio::test]
async fn model_error_becomes_failed_phase() {
    let dir = TempDir::new().unwrap();
    let workflow = started(&dir, &[("views.csv", Some("a\n1\n"))]);
    let model = FakeModel::new().with_analysis(AnalysisReply::Fail("quota exceeded".into()));

    let event = run_analysis(&model, &workflow).await;
    let workflow = workflow.apply(event);
    match workflow.phase() {
        Phase::Failed(message) => assert!(message.contains("quota exceeded")),
        other => panic!("expected failure, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_answer_becomes_failed_phase() {
    let dir = TempDir::new().unwrap();
    let workflow = started(&dir, &[("views.csv", Some("a\n1\n"))]);
    let model = FakeModel::new().with_analysis(AnalysisReply::Text("not json".into()));

    let event = run_analysis(&model, &workflow).await;
    let workflow = workflow.apply(event);
    assert!(matches!(workflow.phase(), Phase::Failed(_)));
}

#[tokio::test]
async fn result_arriving_after_reset_is_dropped() {
    let dir = TempDir::new().unwrap();
    let workflow = started(&dir, &[("views.csv", Some("a\n1\n"))]);
    let model = FakeModel::new().with_analysis(AnalysisReply::Text(model_answer()));

    let event = run_analysis(&model, &workflow).await;
    let workflow = workflow.apply(WorkflowEvent::Reset).apply(event);
    assert_eq!(workflow.phase(), &Phase::Selecting);
    assert!(workflow.result().is_none());
}
