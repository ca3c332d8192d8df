use super::CellValue;
use indexmap::IndexMap;
use std::fmt;

/// 输入表的角色, 用于错误信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRole {
    /// 商品目录 (top_file)
    Reference,
    /// 销售/库存流水 (sold_file)
    Transaction,
    /// 可选的独立库存表
    Stock,
}

impl fmt::Display for TableRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reference => "reference",
            Self::Transaction => "transaction",
            Self::Stock => "stock",
        };
        f.write_str(name)
    }
}

/// 内存中的二维表: 有序列名 + 有序行
///
/// 所有行与表头等宽; 空字符串表示缺失值。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    /// 列名 -> 位置 (重名时保留第一次出现)
    positions: IndexMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// 构建表, 较短的行以空单元格补齐
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        let width = headers.len();
        let mut positions = IndexMap::with_capacity(width);
        for (idx, name) in headers.iter().enumerate() {
            positions.entry(name.clone()).or_insert(idx);
        }
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, String::new());
                row
            })
            .collect();

        Self {
            headers,
            positions,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// 单元格文本; 越界或空白返回 None
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .map(String::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// 整列的单元格, 按行序
    pub fn column(&self, col: usize) -> impl Iterator<Item = Option<&str>> + '_ {
        (0..self.rows.len()).map(move |row| self.cell(row, col))
    }

    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.rows.len()).then_some(Row { table: self, index })
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> + '_ {
        (0..self.rows.len()).map(move |index| Row { table: self, index })
    }

    /// 追加一列, 返回其位置; 值不足的行补空
    pub fn push_column(&mut self, name: impl Into<String>, values: Vec<String>) -> usize {
        let name = name.into();
        let position = self.headers.len();
        self.positions.insert(name.clone(), position);
        self.headers.push(name);

        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.push(values.next().unwrap_or_default());
        }
        position
    }
}

/// 表中一行的只读视图
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn at(&self, col: usize) -> Option<&'a str> {
        self.table.cell(self.index, col)
    }

    /// 按列名取值; 列不存在或单元格为空返回 None
    pub fn get(&self, name: &str) -> Option<&'a str> {
        self.table.position(name).and_then(|col| self.at(col))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.table.position(name).is_some()
    }

    pub fn value(&self, name: &str) -> CellValue {
        CellValue::parse(self.get(name))
    }
}
