// Report pipeline: dispatch, aggregation, progress
pub mod pipeline;
