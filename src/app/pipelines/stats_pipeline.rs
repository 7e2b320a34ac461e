use crate::app::pipelines::sheets::{self, Measure};
use crate::config::file_config::ReportConfig;
use crate::core::analysis::{SprintAnalyzer, SprintReport};
use crate::core::jira_client::JiraClient;
use crate::core::{Pipeline, SprintSnapshot, Storage};
use crate::utils::error::Result;

/// Writes `<sprint>Epics.csv`, `<sprint>VelocityOfTeams.csv` and
/// `<sprint>VelocityOfMembers.csv`.
pub struct StatsPipeline<S: Storage> {
    pub(crate) storage: S,
    pub(crate) config: ReportConfig,
    pub(crate) client: JiraClient,
    sprint_id: u64,
}

impl<S: Storage> StatsPipeline<S> {
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

#[async_trait::async_trait]
impl<S: Storage> Pipeline for StatsPipeline<S> {
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
        let stem = sheets::file_stem(&report.sprint.name);
        let delivered = [Measure::Delivered];

        let files = [
            (
                format!("{}Epics.csv", stem),
                sheets::epics_sheet(&report.epics, Measure::Planned)?,
            ),
            (
                format!("{}VelocityOfTeams.csv", stem),
                sheets::velocity_sheet(
                    &report.sprint,
                    &report.velocity.totals,
                    &report.velocity.teams,
                    &delivered,
                )?,
            ),
            (
                format!("{}VelocityOfMembers.csv", stem),
                sheets::velocity_sheet(
                    &report.sprint,
                    &report.velocity.totals,
                    &report.velocity.members,
                    &delivered,
                )?,
            ),
        ];

        let mut written = Vec::with_capacity(files.len());
        for (name, data) in files {
            written.push(self.storage.write_file(&name, &data).await?);
        }
        Ok(written)
    }
}
