use super::expander::ExpandedTable;
use crate::config::ColumnNames;
use crate::error::ReportError;
use crate::models::{CellValue, Table, TableRole};
use indexmap::IndexMap;
use std::collections::HashMap;

/// 条码 -> 所属目录行 的索引
///
/// 同一条码出现在多行时后写覆盖; 冲突同时记录下来以便报告。
#[derive(Debug, Default)]
pub struct CodeIndex {
    entries: HashMap<String, usize>,
    /// 冲突条码 -> 全部所属行 (按处理顺序)
    collisions: IndexMap<String, Vec<usize>>,
}

impl CodeIndex {
    /// 按行序遍历每行的非空槽位建立索引
    pub fn build(expanded: &ExpandedTable) -> Self {
        let mut index = Self::default();
        for row in 0..expanded.table.row_count() {
            for code in expanded.codes(row) {
                index.insert(code, row);
            }
        }
        index
    }

    fn insert(&mut self, code: &str, row: usize) {
        let Some(previous) = self.entries.insert(code.to_string(), row) else {
            return;
        };
        if previous != row {
            self.collisions
                .entry(code.to_string())
                .or_insert_with(|| vec![previous])
                .push(row);
        }
    }

    /// 查找条码所属的行号
    pub fn lookup(&self, code: &str) -> Option<usize> {
        self.entries.get(code).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 被多行共享的条码数
    pub fn collision_count(&self) -> usize {
        self.collisions.len()
    }

    pub fn collisions(&self) -> impl Iterator<Item = (&str, &[usize])> {
        self.collisions
            .iter()
            .map(|(code, rows)| (code.as_str(), rows.as_slice()))
    }
}

/// 独立库存表: 匹配键 -> 库存数量
#[derive(Debug, Default)]
pub struct StockIndex {
    entries: HashMap<String, CellValue>,
}

impl StockIndex {
    /// 库存表必须同时包含匹配键列与库存列; 重复键后写覆盖
    pub fn build(table: &Table, columns: &ColumnNames) -> Result<Self, ReportError> {
        let key = stock_column(table, &columns.stock_key)?;
        let quantity = stock_column(table, &columns.stock_quantity)?;

        let mut entries = HashMap::with_capacity(table.row_count());
        for row in 0..table.row_count() {
            if let Some(identifier) = table.cell(row, key) {
                entries.insert(
                    identifier.trim().to_string(),
                    CellValue::parse(table.cell(row, quantity)),
                );
            }
        }
        Ok(Self { entries })
    }

    pub fn lookup(&self, identifier: &str) -> Option<&CellValue> {
        self.entries.get(identifier)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn stock_column(table: &Table, name: &str) -> Result<usize, ReportError> {
    table.position(name).ok_or_else(|| ReportError::ColumnNotFound {
        table: TableRole::Stock,
        column: name.to_string(),
    })
}
