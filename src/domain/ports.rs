use crate::domain::model::SprintSnapshot;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<String>> + Send;
}

/// Extract a sprint from Jira, turn it into report data, then persist it.
#[async_trait]
pub trait Pipeline: Send + Sync {
    type Report: Send;

    async fn extract(&self) -> Result<SprintSnapshot>;
    fn transform(&self, snapshot: SprintSnapshot) -> Result<Self::Report>;
    async fn load(&self, report: Self::Report) -> Result<Vec<String>>;
}
