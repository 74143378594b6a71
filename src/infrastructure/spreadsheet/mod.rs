//! Spreadsheet I/O: the input table, the xlsx artifacts and the input archive.

pub mod archive;
pub mod reader;
pub mod writer;

pub use archive::archive_input;
pub use reader::read_table;
pub use writer::{write_parameter_extract, write_summary_report};
