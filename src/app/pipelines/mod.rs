pub mod sheets;
pub mod stats_pipeline;
pub mod workbook_pipeline;

pub use stats_pipeline::StatsPipeline;
pub use workbook_pipeline::WorkbookPipeline;
