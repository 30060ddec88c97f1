pub mod chart;
pub mod config;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod schema;

pub use config::PipelineConfig;
pub use pipeline::{run, RunReport};
