// Library exports for the binary and tests
pub mod calendar;
pub mod classify;
pub mod config;
pub mod error;
pub mod export;
pub mod group;
pub mod histogram;
pub mod logging;
pub mod rank;
pub mod renderer;
pub mod stats;
pub mod stats_builder;

pub use config::{GroupingScheme, StatsOptions};
pub use error::StatsError;
pub use export::ChatExport;
pub use stats::StatisticsResult;
pub use stats_builder::{build_stats, build_stats_as_of};
