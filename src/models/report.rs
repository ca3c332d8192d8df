use super::{CellValue, Table};
use crate::config::ColumnNames;
use serde::{Deserialize, Serialize};

/// 输出表头 (顺序固定)
pub const OUTPUT_HEADERS: [&str; 7] = [
    "Category Group ID",
    "Category Group Name",
    "Brand",
    "Category",
    "Qty",
    "In Stock Qty",
    "Matched Barcode",
];

/// 销售/库存流水中的一行
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionRow {
    /// 匹配键 (SKU 或条码), 已去除首尾空白
    pub identifier: String,
    pub quantity: CellValue,
}

impl TransactionRow {
    /// 从销售表逐行提取; 缺少 SKU 列时匹配键为空, 缺少 Qty 列时数量为 0
    pub fn collect(table: &Table, columns: &ColumnNames) -> Vec<Self> {
        table
            .rows()
            .map(|row| {
                let identifier = row
                    .get(&columns.transaction_key)
                    .map(|s| s.trim().to_string())
                    .unwrap_or_default();
                let quantity = if row.has_column(&columns.quantity) {
                    row.value(&columns.quantity)
                } else {
                    CellValue::zero()
                };
                Self {
                    identifier,
                    quantity,
                }
            })
            .collect()
    }
}

/// 报表中的一行, 与销售行一一对应
#[derive(Debug, Clone, PartialEq)]
pub struct OutputRow {
    pub category_group_id: CellValue,
    pub category_group_name: CellValue,
    pub brand: CellValue,
    pub category: CellValue,
    pub qty: CellValue,
    pub in_stock_qty: CellValue,
    pub matched_barcode: String,
    /// 是否命中商品目录 (不输出)
    pub matched: bool,
}

impl OutputRow {
    /// 按 OUTPUT_HEADERS 顺序展开
    pub fn cells(&self) -> [CellValue; 7] {
        [
            self.category_group_id.clone(),
            self.category_group_name.clone(),
            self.brand.clone(),
            self.category.clone(),
            self.qty.clone(),
            self.in_stock_qty.clone(),
            CellValue::Text(self.matched_barcode.clone()),
        ]
    }
}

/// 报表统计信息
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    pub catalog_rows: usize,
    pub code_slots: usize,
    pub indexed_codes: usize,
    /// 被多个目录行共享的条码数 (按后写覆盖处理)
    pub ambiguous_codes: usize,
    pub transactions: usize,
    pub matched: usize,
    pub unmatched: usize,
}

/// 一次报表生成的结果
#[derive(Debug, Clone)]
pub struct MatchReport {
    pub rows: Vec<OutputRow>,
    pub stats: ReportStats,
}
