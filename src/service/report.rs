use super::code_index::{CodeIndex, StockIndex};
use super::expander::{expand_code_columns, locate_barcode_column};
use super::matcher::Matcher;
use crate::config::ColumnNames;
use crate::error::ReportError;
use crate::models::{MatchReport, ReportStats, Table, TransactionRow};

/// 冲突告警中最多列出的条码数
const COLLISION_SAMPLE: usize = 5;

/// 一次报表请求的输入 (仅在本次请求内存活)
#[derive(Debug, Clone)]
pub struct ReportInputs {
    /// 商品目录
    pub reference: Table,
    /// 销售/库存流水
    pub transactions: Table,
    /// 可选的独立库存表
    pub stock: Option<Table>,
}

/// 报表服务: 解析 -> 展开 -> 建索引 -> 匹配
pub struct ReportService {
    columns: ColumnNames,
}

impl ReportService {
    pub fn new(columns: ColumnNames) -> Self {
        Self { columns }
    }

    pub fn columns(&self) -> &ColumnNames {
        &self.columns
    }

    /// 生成报表, 全有或全无
    pub fn generate(&self, inputs: ReportInputs) -> Result<MatchReport, ReportError> {
        let ReportInputs {
            reference,
            transactions,
            stock,
        } = inputs;
        let catalog_rows = reference.row_count();

        // Phase 1: 展开多值条码列
        let expanded = expand_code_columns(reference, |t| locate_barcode_column(t, &self.columns))?;

        // Phase 2: 建立条码索引
        let index = CodeIndex::build(&expanded);
        tracing::info!(
            "catalog: {} rows, {} code slots, {} indexed codes",
            catalog_rows,
            expanded.max_len(),
            index.len()
        );
        if index.collision_count() > 0 {
            let sample: Vec<&str> = index
                .collisions()
                .take(COLLISION_SAMPLE)
                .map(|(code, _)| code)
                .collect();
            tracing::warn!(
                "{} codes belong to more than one catalog row, later rows win: {:?}",
                index.collision_count(),
                sample
            );
        }

        let stock_index = stock
            .as_ref()
            .map(|table| StockIndex::build(table, &self.columns))
            .transpose()?;
        if let Some(stock_index) = &stock_index {
            tracing::info!("stock table: {} identifiers", stock_index.len());
        }

        // Phase 3: 逐行匹配
        let transaction_rows = TransactionRow::collect(&transactions, &self.columns);
        let matcher = Matcher::new(&expanded.table, &index, stock_index.as_ref(), &self.columns);
        let rows = matcher.match_all(&transaction_rows);

        let matched = rows.iter().filter(|row| row.matched).count();
        let stats = ReportStats {
            catalog_rows,
            code_slots: expanded.max_len(),
            indexed_codes: index.len(),
            ambiguous_codes: index.collision_count(),
            transactions: rows.len(),
            matched,
            unmatched: rows.len() - matched,
        };

        tracing::info!(
            "匹配完成: 总行数: {}, 已匹配: {}, 未匹配: {}",
            stats.transactions,
            stats.matched,
            stats.unmatched
        );

        Ok(MatchReport { rows, stats })
    }
}
