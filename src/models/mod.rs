pub mod cell;
pub mod report;
pub mod table;

pub use cell::{CellValue, NOT_AVAILABLE};
pub use report::{MatchReport, OutputRow, ReportStats, TransactionRow, OUTPUT_HEADERS};
pub use table::{Row, Table, TableRole};
