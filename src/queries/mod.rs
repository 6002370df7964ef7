pub mod round_summary;
pub mod schedule_queries;
pub mod stats_queries;
