pub mod aggregator;
pub mod database;
pub mod inbox;

pub use aggregator::SourceAggregator;
