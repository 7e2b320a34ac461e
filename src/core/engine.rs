use crate::core::Pipeline;
use crate::utils::error::Result;
use std::time::Instant;

pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    /// Runs extract, transform and load; returns the paths that were written.
    pub async fn run(&self) -> Result<Vec<String>> {
        let started = Instant::now();

        tracing::info!("Extracting sprint from Jira...");
        let phase = Instant::now();
        let snapshot = self.pipeline.extract().await?;
        tracing::info!(
            "Extracted sprint '{}' with {} issues in {:?}",
            snapshot.sprint.name,
            snapshot.issues.len(),
            phase.elapsed()
        );

        let phase = Instant::now();
        let report = self.pipeline.transform(snapshot)?;
        tracing::debug!("Transform finished in {:?}", phase.elapsed());

        let phase = Instant::now();
        let written = self.pipeline.load(report).await?;
        tracing::info!("Wrote {} file(s) in {:?}", written.len(), phase.elapsed());

        tracing::info!("Report finished in {:?}", started.elapsed());
        Ok(written)
    }
}
