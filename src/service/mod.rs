pub mod cell_parser;
pub mod code_index;
pub mod expander;
pub mod matcher;
pub mod report;

pub use cell_parser::{clean_code, parse_and_clean, parse_items};
pub use code_index::{CodeIndex, StockIndex};
pub use expander::{expand_code_columns, locate_barcode_column, ExpandedTable};
pub use matcher::{Matcher, StockSource};
pub use report::{ReportInputs, ReportService};
