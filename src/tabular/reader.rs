use crate::error::ReportError;
use crate::models::{Table, TableRole};
use calamine::{open_workbook_auto_from_rs, Data, Reader};
use std::io::Cursor;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// 按电子表格读取的扩展名
const SPREADSHEET_EXTENSIONS: [&str; 5] = ["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// 读取时视为缺失值的标记
const MISSING_MARKERS: [&str; 14] = [
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "NULL", "null", "None", "<NA>", "#N/A",
    "#NA", "#N/A N/A",
];

/// 根据文件名选择解码方式
pub fn read_table(role: TableRole, file_name: &str, bytes: &[u8]) -> Result<Table, ReportError> {
    if is_spreadsheet(file_name) {
        read_spreadsheet(role, bytes)
    } else {
        read_csv(role, bytes)
    }
}

pub fn is_spreadsheet(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| {
            SPREADSHEET_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// 读取 CSV: 第一行为表头, 短行补空, 超宽行报错
pub fn read_csv(role: TableRole, bytes: &[u8]) -> Result<Table, ReportError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()
        .map_err(|source| ReportError::Csv { table: role, source })?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() {
        return Err(ReportError::MissingHeader { table: role });
    }

    let width = headers.len();
    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| ReportError::Csv { table: role, source })?;
        if record.len() > width {
            return Err(ReportError::RaggedRow {
                table: role,
                line: record.position().map(|p| p.line()).unwrap_or_default(),
                found: record.len(),
                expected: width,
            });
        }
        rows.push(record.iter().map(normalize_missing).collect());
    }

    tracing::debug!("read {} CSV: {} columns, {} rows", role, width, rows.len());
    Ok(Table::new(headers, rows))
}

/// 读取工作簿的第一个工作表, 第一行为表头
pub fn read_spreadsheet(role: TableRole, bytes: &[u8]) -> Result<Table, ReportError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|source| ReportError::Spreadsheet { table: role, source })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or(ReportError::EmptyWorkbook { table: role })?
        .map_err(|source| ReportError::Spreadsheet { table: role, source })?;

    let mut cells = range.rows();
    let headers: Vec<String> = cells
        .next()
        .ok_or(ReportError::MissingHeader { table: role })?
        .iter()
        .map(cell_text)
        .collect();
    let rows: Vec<Vec<String>> = cells
        .map(|row| row.iter().map(|cell| normalize_missing(&cell_text(cell))).collect())
        .collect();

    tracing::debug!("read {} workbook: {} columns, {} rows", role, headers.len(), rows.len());
    Ok(Table::new(headers, rows))
}

/// 工作表单元格转文本; 整数值的浮点数不带小数部分
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(true) => "True".to_string(),
        Data::Bool(false) => "False".to_string(),
        other => other.to_string(),
    }
}

fn normalize_missing(value: &str) -> String {
    if MISSING_MARKERS.contains(&value) {
        String::new()
    } else {
        value.to_string()
    }
}
