pub mod analysis;
pub mod engine;
pub mod fields;
pub mod jira_client;

pub use crate::domain::model::{Issue, Sprint, SprintSnapshot};
pub use crate::domain::ports::{Pipeline, Storage};
pub use crate::utils::error::Result;
