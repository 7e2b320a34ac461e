pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{Cli, Command, ReportArgs};

pub use app::pipelines::{StatsPipeline, WorkbookPipeline};
pub use config::cli::LocalStorage;
pub use config::file_config::{ReportConfig, ServerConfig, TeamConfig};
pub use crate::core::{engine::ReportEngine, jira_client::JiraClient};
pub use utils::error::{ReportError, Result};
