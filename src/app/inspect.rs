//! Read-only commands that print Jira data instead of writing reports.

use crate::core::jira_client::JiraClient;
use crate::domain::model::Board;
use crate::utils::error::Result;

pub async fn sprint_json(client: &JiraClient, sprint_id: u64) -> Result<String> {
    let sprint = client.sprint(sprint_id).await?;
    Ok(serde_json::to_string_pretty(&sprint)?)
}

pub async fn issue_json(client: &JiraClient, issue_key: &str) -> Result<String> {
    let issue = client.issue(issue_key).await?;
    Ok(serde_json::to_string_pretty(&issue)?)
}

pub async fn board_listing(client: &JiraClient, page_size: usize) -> Result<String> {
    let boards = client.boards(page_size).await?;
    tracing::debug!("Found {} boards", boards.len());
    Ok(format_boards(&boards))
}

/// One `id<TAB>type<TAB>name` line per board.
pub fn format_boards(boards: &[Board]) -> String {
    boards
        .iter()
        .map(|b| format!("{}\t{}\t{}\n", b.id, b.board_type, b.name))
        .collect()
}
