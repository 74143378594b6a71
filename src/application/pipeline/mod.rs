//! The report pipeline: quote every record with a bounded worker pool,
//! restore input order, write the workbooks.

pub mod aggregator;
pub mod dispatcher;
pub mod progress;
pub mod quote_client;
pub mod runner;

pub use dispatcher::{DEFAULT_WORKERS, Dispatcher};
pub use progress::{ChannelProgressSink, LoggingProgressSink};
pub use quote_client::QuoteClient;
pub use runner::{ReportPipeline, RunLayout, RunReport};
