use bigdecimal::BigDecimal;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// 未匹配时描述字段的哨兵文本
pub const NOT_AVAILABLE: &str = "Not Available";

// 只接受定点小数, 科学计数法一律按文本处理
static PLAIN_DECIMAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[+-]?\d+(\.\d+)?$").expect("decimal pattern is valid"));

/// 单元格取值: 空 / 十进制数字 / 文本
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CellValue {
    Empty,
    Number(BigDecimal),
    Text(String),
}

impl CellValue {
    /// 从原始单元格文本推断类型
    ///
    /// 带有效前导零的值 (例如 `007`) 保持为文本, 避免丢失编码信息。
    /// `1e3` 这类指数写法也保持为文本, 原样写回报表。
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::Empty;
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        if !PLAIN_DECIMAL.is_match(trimmed) || has_significant_leading_zero(trimmed) {
            return Self::Text(raw.to_string());
        }
        match BigDecimal::from_str(trimmed) {
            Ok(number) => Self::Number(number),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    pub fn zero() -> Self {
        Self::Number(BigDecimal::from(0))
    }

    pub fn not_available() -> Self {
        Self::Text(NOT_AVAILABLE.to_string())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(BigDecimal::from(value))
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

fn has_significant_leading_zero(s: &str) -> bool {
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    let mut chars = digits.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('0'), Some(c)) if c.is_ascii_digit()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_infers_numbers_and_text() {
        assert_eq!(CellValue::parse(None), CellValue::Empty);
        assert_eq!(CellValue::parse(Some("   ")), CellValue::Empty);
        assert_eq!(CellValue::parse(Some("5")), CellValue::from(5));
        assert_eq!(
            CellValue::parse(Some("2.50")),
            CellValue::Number(BigDecimal::from_str("2.5").unwrap())
        );
        assert_eq!(CellValue::parse(Some("Acme")), CellValue::from("Acme"));
    }

    #[test]
    fn leading_zero_codes_stay_text() {
        assert_eq!(CellValue::parse(Some("007")), CellValue::from("007"));
        assert_eq!(CellValue::parse(Some("0.5")).to_string(), "0.5");
        assert_eq!(CellValue::parse(Some("0")), CellValue::zero());
    }

    #[test]
    fn exponent_notation_stays_text() {
        assert_eq!(
            CellValue::parse(Some("1e-9223372036854775808")),
            CellValue::from("1e-9223372036854775808")
        );
        let huge = CellValue::parse(Some("1e50000000"));
        assert_eq!(huge, CellValue::from("1e50000000"));
        assert_eq!(huge.to_string(), "1e50000000");
        assert_eq!(CellValue::parse(Some("1e3")).to_string(), "1e3");
        assert_eq!(CellValue::parse(Some("-2.5")).to_string(), "-2.5");
        assert_eq!(CellValue::parse(Some("1.")), CellValue::from("1."));
    }

    #[test]
    fn display_renders_empty_as_blank() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::not_available().to_string(), NOT_AVAILABLE);
    }
}
