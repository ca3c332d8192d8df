use crate::models::TableRole;

/// 报表生成过程中的全部错误
///
/// 缺失匹配不是错误: 未匹配的销售行以 "Not Available" 哨兵行输出。
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// 商品目录既没有条码列, 也没有按位置回退的列
    #[error("{column} column not found in {table} table.")]
    ColumnNotFound { table: TableRole, column: String },

    #[error("{table} file has no header row")]
    MissingHeader { table: TableRole },

    #[error("{table} file line {line} has {found} fields, expected {expected}")]
    RaggedRow {
        table: TableRole,
        line: u64,
        found: usize,
        expected: usize,
    },

    #[error("failed to read {table} CSV: {source}")]
    Csv {
        table: TableRole,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read {table} spreadsheet: {source}")]
    Spreadsheet {
        table: TableRole,
        #[source]
        source: calamine::Error,
    },

    #[error("{table} workbook contains no worksheets")]
    EmptyWorkbook { table: TableRole },

    #[error("failed to write xlsx report: {0}")]
    XlsxWrite(#[from] rust_xlsxwriter::XlsxError),

    #[error("failed to write CSV report: {0}")]
    CsvWrite(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Please select both files.")]
    MissingUpload,

    #[error("File too large. Maximum size is {limit_mb}MB.")]
    PayloadTooLarge { limit_mb: usize },

    #[error("invalid upload: {0}")]
    Multipart(String),
}
