use crate::app::pipelines::sheets::{self, Measure};
use crate::config::file_config::ReportConfig;
use crate::core::analysis::{SprintAnalyzer, SprintReport};
use crate::core::jira_client::JiraClient;
use crate::core::{Pipeline, SprintSnapshot, Storage};
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub const EPICS_PLANNED: &str = "Epics planned.csv";
pub const EPICS_DELIVERED: &str = "Epics delivered.csv";
pub const VELOCITY_OF_TEAMS: &str = "VelocityOfTeams.csv";
pub const EPIC_ISSUES: &str = "Epic issues.csv";
pub const SPRINT_DETAIL: &str = "sprint.json";

/// Bundles every sheet of the sprint report into a single `<sprint>.zip`.
pub struct WorkbookPipeline<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: ReportConfig,
    pub(crate) client: JiraClient,
    sprint_id: u64,
}

impl<S: Storage> WorkbookPipeline<S> {
    pub fn new(storage: S, config: ReportConfig) -> Result<Self> {
        let sprint_id = config.require_sprint_id()?;
        let client = JiraClient::new(&config.server)?;
        Ok(Self {
            storage,
            config,
            client,
            sprint_id,
        })
    }
}

fn build_workbook(report: &SprintReport) -> Result<Vec<u8>> {
    let sheets = [
        (EPICS_PLANNED, sheets::epics_sheet(&report.epics, Measure::Planned)?),
        (EPICS_DELIVERED, sheets::epics_sheet(&report.epics, Measure::Delivered)?),
        (
            VELOCITY_OF_TEAMS,
            sheets::velocity_sheet(
                &report.sprint,
                &report.velocity.totals,
                &report.velocity.teams,
                &[Measure::Planned, Measure::Delivered],
            )?,
        ),
        (EPIC_ISSUES, sheets::epic_issues_sheet(&report.epics)?),
        (SPRINT_DETAIL, serde_json::to_vec_pretty(&report.sprint)?),
    ];

    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, data) in sheets {
        zip.start_file::<_, ()>(name, FileOptions::default())?;
        zip.write_all(&data)?;
    }
    let cursor = zip.finish()?;
    Ok(cursor.into_inner())
}

#[async_trait::async_trait]
impl<S: Storage> Pipeline for WorkbookPipeline<S> {
    type Report = SprintReport;

    async fn extract(&self) -> Result<SprintSnapshot> {
        self.client
            .snapshot(self.sprint_id, self.config.page_size)
            .await
    }

    fn transform(&self, snapshot: SprintSnapshot) -> Result<SprintReport> {
        let analyzer = SprintAnalyzer::new(
            &self.config.teams,
            &self.config.story_points_field,
            &self.config.server.url,
        );
        Ok(analyzer.report(snapshot))
    }

    async fn load(&self, report: SprintReport) -> Result<Vec<String>> {
        let name = format!("{}.zip", sheets::file_stem(&report.sprint.name));
        let workbook = build_workbook(&report)?;
        tracing::debug!("Writing workbook ({} bytes) to storage", workbook.len());
        let path = self.storage.write_file(&name, &workbook).await?;
        Ok(vec![path])
    }
}
