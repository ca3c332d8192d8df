use crate::error::ReportError;
use crate::models::{CellValue, OutputRow, OUTPUT_HEADERS};
use bigdecimal::ToPrimitive;
use chrono::NaiveDateTime;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

/// 输出工作表名称
pub const SHEET_NAME: &str = "Matched Output";

/// 报表输出格式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Xlsx,
    Csv,
}

impl OutputFormat {
    /// 表单字段取值, 未知值按 xlsx 处理
    pub fn from_form(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("csv") {
            Self::Csv
        } else {
            Self::Xlsx
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Self::Csv => "text/csv; charset=utf-8",
        }
    }
}

/// 下载文件名: Matched_Report_YYYYmmdd_HHMMSS.<ext>
pub fn report_file_name(format: OutputFormat, generated_at: NaiveDateTime) -> String {
    format!(
        "Matched_Report_{}.{}",
        generated_at.format("%Y%m%d_%H%M%S"),
        format.extension()
    )
}

/// 在内存中渲染报表
pub fn render(format: OutputFormat, rows: &[OutputRow]) -> Result<Vec<u8>, ReportError> {
    match format {
        OutputFormat::Xlsx => write_xlsx(rows),
        OutputFormat::Csv => write_csv(rows),
    }
}

/// 渲染 xlsx: 单个工作表, 粗体表头, 数字写为数值单元格
pub fn write_xlsx(rows: &[OutputRow]) -> Result<Vec<u8>, ReportError> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(SHEET_NAME)?;
    for (col, header) in OUTPUT_HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (idx, row) in rows.iter().enumerate() {
        let xlsx_row = (idx + 1) as u32;
        for (col, cell) in row.cells().iter().enumerate() {
            write_cell(worksheet, xlsx_row, col as u16, cell)?;
        }
    }

    Ok(workbook.save_to_buffer()?)
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
) -> Result<(), ReportError> {
    match cell {
        CellValue::Empty => {}
        CellValue::Number(n) => match n.to_f64() {
            Some(value) => {
                worksheet.write_number(row, col, value)?;
            }
            None => {
                worksheet.write_string(row, col, n.to_string().as_str())?;
            }
        },
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s.as_str())?;
        }
    }
    Ok(())
}

/// 渲染 CSV, 表头与列顺序同 xlsx
pub fn write_csv(rows: &[OutputRow]) -> Result<Vec<u8>, ReportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer.write_record(OUTPUT_HEADERS)?;
    for row in rows {
        writer.write_record(row.cells().iter().map(|cell| cell.to_string()))?;
    }

    writer.flush()?;
    writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    fn rows() -> Vec<OutputRow> {
        vec![
            OutputRow {
                category_group_id: CellValue::from(7),
                category_group_name: CellValue::from("Snacks"),
                brand: CellValue::from("Acme, Inc"),
                category: CellValue::Empty,
                qty: CellValue::from(5),
                in_stock_qty: CellValue::from(12),
                matched_barcode: "111".into(),
                matched: true,
            },
            OutputRow {
                category_group_id: CellValue::not_available(),
                category_group_name: CellValue::not_available(),
                brand: CellValue::not_available(),
                category: CellValue::not_available(),
                qty: CellValue::from(2),
                in_stock_qty: CellValue::zero(),
                matched_barcode: "999".into(),
                matched: false,
            },
        ]
    }

    #[test]
    fn csv_has_fixed_header_and_order() {
        let bytes = write_csv(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "Category Group ID,Category Group Name,Brand,Category,Qty,In Stock Qty,Matched Barcode\n\
             7,Snacks,\"Acme, Inc\",,5,12,111\n\
             Not Available,Not Available,Not Available,Not Available,2,0,999\n"
        );
    }

    #[test]
    fn xlsx_has_named_sheet_and_numeric_cells() {
        let bytes = write_xlsx(&rows()).unwrap();
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes)).unwrap();
        assert_eq!(workbook.sheet_names(), vec![SHEET_NAME.to_string()]);

        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let grid: Vec<Vec<Data>> = range.rows().map(|r| r.to_vec()).collect();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid[0][6], Data::String("Matched Barcode".into()));
        assert_eq!(grid[1][0], Data::Float(7.0));
        assert_eq!(grid[1][3], Data::Empty);
        assert_eq!(grid[1][6], Data::String("111".into()));
        assert_eq!(grid[2][2], Data::String("Not Available".into()));
        assert_eq!(grid[2][4], Data::Float(2.0));
    }

    #[test]
    fn empty_report_still_has_header_row() {
        let text = String::from_utf8(write_csv(&[]).unwrap()).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn file_name_carries_timestamp_and_extension() {
        let at = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap();
        assert_eq!(
            report_file_name(OutputFormat::Xlsx, at),
            "Matched_Report_20240309_140507.xlsx"
        );
        assert_eq!(OutputFormat::from_form(" CSV "), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_form("pdf"), OutputFormat::Xlsx);
    }
}
