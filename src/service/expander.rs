use super::cell_parser::parse_and_clean;
use crate::config::ColumnNames;
use crate::error::ReportError;
use crate::models::{Table, TableRole};

/// 展开列的列名前缀: Code_1, Code_2, ...
pub const CODE_COLUMN_PREFIX: &str = "Code_";

/// 追加了定宽条码列的商品目录
#[derive(Debug, Clone)]
pub struct ExpandedTable {
    pub table: Table,
    /// 原始多值条码列的位置
    pub barcode_column: usize,
    /// 展开列的位置, 依次对应 Code_1..Code_n
    pub slot_columns: Vec<usize>,
}

impl ExpandedTable {
    /// 所有行中条码数的最大值
    pub fn max_len(&self) -> usize {
        self.slot_columns.len()
    }

    /// 某行的全部槽位, 缺位为空字符串
    pub fn slot_values(&self, row: usize) -> Vec<&str> {
        self.slot_columns
            .iter()
            .map(|&col| self.table.cell(row, col).unwrap_or(""))
            .collect()
    }

    /// 某行的非空条码, 按槽位顺序
    pub fn codes(&self, row: usize) -> impl Iterator<Item = &str> + '_ {
        self.slot_columns
            .iter()
            .filter_map(move |&col| self.table.cell(row, col))
    }
}

/// 定位条码列: 优先按列名, 其次按位置回退
pub fn locate_barcode_column(table: &Table, columns: &ColumnNames) -> Result<usize, ReportError> {
    if let Some(position) = table.position(&columns.barcodes) {
        return Ok(position);
    }
    if table.column_count() > columns.barcode_fallback_position {
        tracing::debug!(
            "no {:?} column, using column {} ({:?})",
            columns.barcodes,
            columns.barcode_fallback_position,
            table.headers()[columns.barcode_fallback_position]
        );
        return Ok(columns.barcode_fallback_position);
    }
    Err(ReportError::ColumnNotFound {
        table: TableRole::Reference,
        column: columns.barcodes.clone(),
    })
}

/// 把多值条码列展开为 max_len 个定宽列, 短行补空字符串
pub fn expand_code_columns<F>(mut table: Table, locate: F) -> Result<ExpandedTable, ReportError>
where
    F: FnOnce(&Table) -> Result<usize, ReportError>,
{
    let barcode_column = locate(&table)?;

    let parsed: Vec<Vec<String>> = table.column(barcode_column).map(parse_and_clean).collect();
    let max_len = parsed.iter().map(Vec::len).max().unwrap_or(0);

    let mut slot_columns = Vec::with_capacity(max_len);
    for slot in 0..max_len {
        let values = parsed
            .iter()
            .map(|codes| codes.get(slot).cloned().unwrap_or_default())
            .collect();
        let name = format!("{}{}", CODE_COLUMN_PREFIX, slot + 1);
        slot_columns.push(table.push_column(name, values));
    }

    Ok(ExpandedTable {
        table,
        barcode_column,
        slot_columns,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn catalog(barcodes: &[&str]) -> Table {
        Table::new(
            vec!["Brand".into(), "Barcodes".into()],
            barcodes
                .iter()
                .enumerate()
                .map(|(i, b)| vec![format!("brand-{}", i), b.to_string()])
                .collect(),
        )
    }

    fn expand(table: Table) -> Result<ExpandedTable, ReportError> {
        let columns = ColumnNames::default();
        expand_code_columns(table, |t| locate_barcode_column(t, &columns))
    }

    #[test]
    fn slots_are_padded_to_longest_row() {
        let expanded = expand(catalog(&[r#"["a", "b"]"#, "", "code"])).unwrap();

        assert_eq!(expanded.max_len(), 2);
        assert_eq!(expanded.barcode_column, 1);
        assert_eq!(expanded.slot_values(0), vec!["a", "b"]);
        assert_eq!(expanded.slot_values(1), vec!["", ""]);
        assert_eq!(expanded.slot_values(2), vec!["code", ""]);
        assert_eq!(
            expanded.table.headers(),
            &["Brand", "Barcodes", "Code_1", "Code_2"]
        );
    }

    #[test]
    fn codes_skip_empty_slots() {
        let expanded = expand(catalog(&["x, y", "z"])).unwrap();
        assert_eq!(expanded.codes(1).collect::<Vec<_>>(), vec!["z"]);
    }

    #[test]
    fn empty_catalog_has_no_slots() {
        let expanded = expand(catalog(&[])).unwrap();
        assert_eq!(expanded.max_len(), 0);
        assert!(expanded.table.is_empty());
    }

    #[test]
    fn missing_barcode_column_is_an_error() {
        let table = Table::new(
            (0..10).map(|i| format!("col{}", i)).collect(),
            vec![vec!["111".into()]],
        );
        let err = expand(table).unwrap_err();
        assert!(matches!(
            err,
            ReportError::ColumnNotFound { table: TableRole::Reference, ref column } if column == "Barcodes"
        ));
    }

    #[test]
    fn falls_back_to_eleventh_column() {
        let mut row: Vec<String> = (0..11).map(|i| format!("v{}", i)).collect();
        row[10] = "'111', '222'".into();
        let table = Table::new((0..11).map(|i| format!("col{}", i)).collect(), vec![row]);

        let expanded = expand(table).unwrap();
        assert_eq!(expanded.barcode_column, 10);
        assert_eq!(expanded.slot_values(0), vec!["111", "222"]);
    }
}
