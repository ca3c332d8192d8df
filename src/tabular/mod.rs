pub mod reader;
pub mod writer;

pub use reader::read_table;
pub use writer::{render, report_file_name, OutputFormat};
