use anyhow::Result;
use httpmock::prelude::*;
use sprint_report::{
    LocalStorage, ReportConfig, ReportEngine, ReportError, StatsPipeline, WorkbookPipeline,
};
use std::io::Read;
use tempfile::TempDir;

const AUTH: &str = "Basic cmVwb3J0ZXI6c2VjcmV0";

fn config_toml(server_url: &str, output: &str) -> String {
    format!(
        r#"
sprint_id = 42
output_folder = "{output}"
story_points_field = "customfield_10016"
page_size = 2

[server]
url = "{server_url}"
username = "reporter"
password = "secret"

[[teams]]
name = "Core"
members = ["ann@example.com"]
components = ["Backend"]

[[teams]]
name = "Web"
members = ["bob@example.com"]
components = ["Frontend"]
"#
    )
}

fn issue(key: &str, fields: serde_json::Value) -> serde_json::Value {
    serde_json::json!({"id": key.trim_start_matches("CORE-"), "key": key, "fields": fields})
}

fn done() -> serde_json::Value {
    serde_json::json!({"name": "Done", "statusCategory": {"key": "done", "name": "Done"}})
}

fn in_progress() -> serde_json::Value {
    serde_json::json!({"name": "In Progress", "statusCategory": {"key": "indeterminate", "name": "In Progress"}})
}

/// Sprint 42 with three issues split over two pages.
fn mock_jira(server: &MockServer) {
    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/agile/1.0/sprint/42")
            .header("Authorization", AUTH);
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({
                "id": 42,
                "self": "https://jira.example.com/rest/agile/1.0/sprint/42",
                "state": "closed",
                "name": "Sprint 42",
                "startDate": "2024-03-04T08:00:00.000Z",
                "endDate": "2024-03-15T17:00:00.000Z",
                "completeDate": "2024-03-15T16:30:00.000Z",
                "originBoardId": 7,
                "goal": "Ship payments"
            }));
    });

    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/agile/1.0/sprint/42/issue")
            .query_param("startAt", "0")
            .header("Authorization", AUTH);
        then.status(200).json_body(serde_json::json!({
            "startAt": 0, "maxResults": 2, "total": 3,
            "issues": [
                issue("CORE-1", serde_json::json!({
                    "customfield_10016": 5,
                    "epic": {"id": 900, "key": "EP-1", "summary": "Payments"},
                    "assignee": {"emailAddress": "ann@example.com", "displayName": "Ann"},
                    "components": [],
                    "labels": ["backend"],
                    "status": done(),
                    "sprint": {"id": 42, "state": "closed"}
                })),
                issue("CORE-2", serde_json::json!({
                    "customfield_10016": 3,
                    "epic": {"id": 900, "key": "EP-1", "summary": "Payments"},
                    "assignee": null,
                    "components": [{"id": "20", "name": "Frontend"}],
                    "status": in_progress(),
                    "sprint": {"id": 42, "state": "closed"}
                }))
            ]
        }));
    });

    server.mock(|when, then| {
        when.method(GET)
            .path("/rest/agile/1.0/sprint/42/issue")
            .query_param("startAt", "2")
            .header("Authorization", AUTH);
        then.status(200).json_body(serde_json::json!({
            "startAt": 2, "maxResults": 2, "total": 3,
            "issues": [
                issue("CORE-3", serde_json::json!({
                    "customfield_10016": 2,
                    "epic": null,
                    "assignee": {"emailAddress": "bob@example.com"},
                    "status": done(),
                    "sprint": null,
                    "closedSprints": [{"id": 41}, {"id": 42}]
                }))
            ]
        }));
    });
}

fn load_config(server: &MockServer, temp_dir: &TempDir) -> Result<ReportConfig> {
    let output = temp_dir.path().join("reports");
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        config_toml(&server.base_url(), &output.to_string_lossy().replace('\\', "/")),
    )?;
    Ok(ReportConfig::from_file(&path)?)
}

#[tokio::test]
async fn test_stats_report_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    mock_jira(&server);

    let config = load_config(&server, &temp_dir)?;
    let storage = LocalStorage::new(config.output_folder.clone());
    let engine = ReportEngine::new(StatsPipeline::new(storage, config)?);

    let written = engine.run().await?;
    assert_eq!(written.len(), 3);

    let reports = temp_dir.path().join("reports");
    let epics = std::fs::read_to_string(reports.join("Sprint 42Epics.csv"))?;
    assert_eq!(
        epics,
        "Epic name,Story Points,Percentage\nEP-1 - Payments,8,0.8000\nOthers,2,0.2000\n"
    );

    let teams = std::fs::read_to_string(reports.join("Sprint 42VelocityOfTeams.csv"))?;
    assert_eq!(
        teams,
        "Sprint,From,To,Total,Core,Web\nSprint 42,2024-03-04,2024-03-15,7,5,2\n"
    );

    let members = std::fs::read_to_string(reports.join("Sprint 42VelocityOfMembers.csv"))?;
    assert_eq!(
        members,
        "Sprint,From,To,Total,Unassigned,ann@example.com,bob@example.com\n\
         Sprint 42,2024-03-04,2024-03-15,7,0,5,2\n"
    );

    Ok(())
}

#[tokio::test]
async fn test_workbook_report_end_to_end() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    mock_jira(&server);

    let config = load_config(&server, &temp_dir)?;
    let storage = LocalStorage::new(config.output_folder.clone());
    let engine = ReportEngine::new(WorkbookPipeline::new(storage, config)?);

    let written = engine.run().await?;
    assert_eq!(written.len(), 1);
    assert!(written[0].ends_with("Sprint 42.zip"));

    let zip_data = std::fs::read(temp_dir.path().join("reports").join("Sprint 42.zip"))?;
    let mut archive = zip::ZipArchive::new(std::io::Cursor::new(zip_data))?;
    assert_eq!(archive.len(), 5);

    let mut read = |name: &str| -> Result<String> {
        let mut content = String::new();
        archive.by_name(name)?.read_to_string(&mut content)?;
        Ok(content)
    };

    assert_eq!(
        read("Epics planned.csv")?,
        "Epic name,Story Points,Percentage\nEP-1 - Payments,8,0.8000\nOthers,2,0.2000\n"
    );
    assert_eq!(
        read("Epics delivered.csv")?,
        "Epic name,Story Points,Percentage\nEP-1 - Payments,5,0.7143\nOthers,2,0.2857\n"
    );
    assert_eq!(
        read("VelocityOfTeams.csv")?,
        "Sprint,From,To,Total,Core,Web\n\
         Sprint 42,2024-03-04,2024-03-15,10,5,5\n\
         Sprint 42,2024-03-04,2024-03-15,7,5,2\n"
    );

    let epic_issues = read("Epic issues.csv")?;
    let base = server.base_url();
    assert!(epic_issues.contains(&format!(
        "EP-1 - Payments,{base}/browse/EP-1,{base}/browse/CORE-2"
    )));
    assert!(epic_issues.contains(&format!("Others,Others,{base}/browse/CORE-3")));

    let sprint: serde_json::Value = serde_json::from_str(&read("sprint.json")?)?;
    assert_eq!(sprint["goal"], "Ship payments");

    Ok(())
}

#[tokio::test]
async fn test_unauthorized_jira_fails_without_writing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let server = MockServer::start();
    let sprint_mock = server.mock(|when, then| {
        when.method(GET).path("/rest/agile/1.0/sprint/42");
        then.status(401).body("");
    });

    let config = load_config(&server, &temp_dir)?;
    let storage = LocalStorage::new(config.output_folder.clone());
    let engine = ReportEngine::new(StatsPipeline::new(storage, config)?);

    let err = engine.run().await.unwrap_err();
    sprint_mock.assert();

    assert!(matches!(
        err,
        ReportError::JiraStatusError { status: 401, ref reason, .. } if reason == "Unauthorized"
    ));
    assert_eq!(err.exit_code(), 1);
    assert!(!temp_dir.path().join("reports").exists());

    Ok(())
}
