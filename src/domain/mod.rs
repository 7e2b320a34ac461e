// Domain layer: Jira models and the ports the report pipelines are built on.

pub mod model;
pub mod ports;
