use super::code_index::{CodeIndex, StockIndex};
use crate::config::ColumnNames;
use crate::models::{CellValue, OutputRow, Row, Table, TransactionRow};

/// 库存数量来源
#[derive(Debug, Clone, Copy)]
pub enum StockSource<'a> {
    /// 取商品目录行上的库存列
    Catalog,
    /// 按匹配键查独立库存表
    Table(&'a StockIndex),
}

/// 销售行 -> 报表行 的匹配器
///
/// 未命中不是错误, 输出 "Not Available" 哨兵行; 输出顺序与输入一致。
pub struct Matcher<'a> {
    catalog: &'a Table,
    index: &'a CodeIndex,
    stock: StockSource<'a>,
    columns: &'a ColumnNames,
}

impl<'a> Matcher<'a> {
    pub fn new(
        catalog: &'a Table,
        index: &'a CodeIndex,
        stock: Option<&'a StockIndex>,
        columns: &'a ColumnNames,
    ) -> Self {
        let stock = stock.map_or(StockSource::Catalog, StockSource::Table);
        Self {
            catalog,
            index,
            stock,
            columns,
        }
    }

    pub fn match_all(&self, transactions: &[TransactionRow]) -> Vec<OutputRow> {
        transactions.iter().map(|tx| self.match_row(tx)).collect()
    }

    pub fn match_row(&self, tx: &TransactionRow) -> OutputRow {
        let owner = self
            .index
            .lookup(&tx.identifier)
            .and_then(|row| self.catalog.row(row));

        match owner {
            Some(row) => OutputRow {
                category_group_id: row.value(&self.columns.group_id),
                category_group_name: row.value(&self.columns.group_name),
                brand: row.value(&self.columns.brand),
                category: row.value(&self.columns.category),
                qty: tx.quantity.clone(),
                in_stock_qty: self.matched_stock(&row, &tx.identifier),
                matched_barcode: tx.identifier.clone(),
                matched: true,
            },
            None => OutputRow {
                category_group_id: CellValue::not_available(),
                category_group_name: CellValue::not_available(),
                brand: CellValue::not_available(),
                category: CellValue::not_available(),
                qty: tx.quantity.clone(),
                in_stock_qty: self.unmatched_stock(),
                matched_barcode: tx.identifier.clone(),
                matched: false,
            },
        }
    }

    fn matched_stock(&self, row: &Row<'_>, identifier: &str) -> CellValue {
        match self.stock {
            StockSource::Catalog if row.has_column(&self.columns.in_stock) => {
                row.value(&self.columns.in_stock)
            }
            StockSource::Catalog => CellValue::zero(),
            StockSource::Table(stock) => stock_for(stock, identifier),
        }
    }

    /// 未命中行不解析库存: 目录自带库存字段时为 0, 走独立库存表时为哨兵
    fn unmatched_stock(&self) -> CellValue {
        match self.stock {
            StockSource::Catalog => CellValue::zero(),
            StockSource::Table(_) => CellValue::not_available(),
        }
    }
}

fn stock_for(stock: &StockIndex, identifier: &str) -> CellValue {
    stock
        .lookup(identifier)
        .cloned()
        .unwrap_or_else(CellValue::not_available)
}
