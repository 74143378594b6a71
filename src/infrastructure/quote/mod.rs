//! Fee calculator adapters.

pub mod http;
pub mod schedule;
pub mod session;

pub use http::HttpQuoteService;
pub use schedule::ScheduleQuoteService;
pub use session::{SessionGuard, SessionTracker};
