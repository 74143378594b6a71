pub mod factory;
pub mod mock;
pub mod observability;
pub mod quote;
pub mod spreadsheet;

pub use factory::ServiceFactory;
