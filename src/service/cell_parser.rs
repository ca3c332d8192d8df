//! 多值条码单元格解析
//!
//! 先尝试按列表字面量解码 (`["123", "456"]`), 失败时退回按 `,\s*` 分割。
//! 解析是全函数: 任何输入都返回一个序列, 不会报错。

use once_cell::sync::Lazy;
use regex::Regex;

static DELIMITER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",\s*").expect("delimiter pattern is valid"));

/// 把单元格拆成原始条目 (未清洗)
pub fn parse_items(cell: Option<&str>) -> Vec<String> {
    let Some(cell) = cell else {
        return Vec::new();
    };

    match decode_list_literal(cell.trim()) {
        Ok(items) => items,
        Err(e) => {
            tracing::trace!("cell {:?} is not a list literal ({}), splitting on commas", cell, e);
            DELIMITER.split(cell).map(str::to_string).collect()
        }
    }
}

/// 清洗单个条目: 去空白、去引号、取最后一个冒号之后的部分
pub fn clean_code(item: &str) -> String {
    let unquoted = item.trim().trim_matches('"').trim_matches('\'');
    let code = unquoted.rsplit(':').next().unwrap_or(unquoted);
    code.trim().to_string()
}

/// 解析并清洗, 丢弃空条目, 保持原顺序
pub fn parse_and_clean(cell: Option<&str>) -> Vec<String> {
    parse_items(cell)
        .iter()
        .map(|item| clean_code(item))
        .filter(|code| !code.is_empty())
        .collect()
}

#[derive(Debug, PartialEq, thiserror::Error)]
pub(crate) enum LiteralError {
    #[error("not a list literal")]
    NotAList,
    #[error("unexpected {0:?} at offset {1}")]
    Unexpected(char, usize),
    #[error("unexpected end of input")]
    UnexpectedEnd,
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid numeric literal {0:?}")]
    InvalidNumber(String),
    #[error("unsupported name {0:?}")]
    UnknownName(String),
}

/// 严格解码方括号列表字面量, 元素统一转成字符串
///
/// 支持: 单/双引号字符串、整数、浮点数、True/False/None、结尾逗号。
/// 嵌套容器一律视为解码失败。
pub(crate) fn decode_list_literal(src: &str) -> Result<Vec<String>, LiteralError> {
    ListLiteral { src, pos: 0 }.decode()
}

struct ListLiteral<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> ListLiteral<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_whitespace(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn decode(mut self) -> Result<Vec<String>, LiteralError> {
        self.skip_whitespace();
        if self.bump() != Some('[') {
            return Err(LiteralError::NotAList);
        }

        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.peek() {
                None => return Err(LiteralError::UnexpectedEnd),
                Some(']') => {
                    self.bump();
                    break;
                }
                Some(_) => {}
            }

            items.push(self.item()?);

            self.skip_whitespace();
            match self.bump() {
                Some(',') => continue,
                Some(']') => break,
                Some(c) => return Err(LiteralError::Unexpected(c, self.pos - c.len_utf8())),
                None => return Err(LiteralError::UnexpectedEnd),
            }
        }

        self.skip_whitespace();
        match self.peek() {
            Some(c) => Err(LiteralError::Unexpected(c, self.pos)),
            None => Ok(items),
        }
    }

    fn item(&mut self) -> Result<String, LiteralError> {
        match self.peek() {
            Some(quote @ ('"' | '\'')) => {
                self.bump();
                self.string(quote)
            }
            Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.') => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.name(),
            Some(c) => Err(LiteralError::Unexpected(c, self.pos)),
            None => Err(LiteralError::UnexpectedEnd),
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(LiteralError::UnterminatedString),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(LiteralError::UnterminatedString),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some('\n') => {}
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    // 未知转义原样保留
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn number(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'))
        {
            self.bump();
        }
        let token = &self.src[start..self.pos];
        normalize_number(token).ok_or_else(|| LiteralError::InvalidNumber(token.to_string()))
    }

    fn name(&mut self) -> Result<String, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            word @ ("True" | "False" | "None") => Ok(word.to_string()),
            word => Err(LiteralError::UnknownName(word.to_string())),
        }
    }
}

/// 数字字面量转成其规范字符串形式
fn normalize_number(token: &str) -> Option<String> {
    let (negative, body) = match token.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, token.strip_prefix('+').unwrap_or(token)),
    };
    if body.is_empty()
        || body.starts_with(['+', '-', '_'])
        || body.ends_with('_')
        || body.contains("__")
    {
        return None;
    }
    let plain: String = body.chars().filter(|c| *c != '_').collect();

    if plain.chars().all(|c| c.is_ascii_digit()) {
        let significant = plain.trim_start_matches('0');
        if significant.is_empty() {
            return Some("0".to_string());
        }
        // 非零整数不允许前导零
        if significant.len() != plain.len() {
            return None;
        }
        return Some(if negative { format!("-{}", plain) } else { plain });
    }

    let value: f64 = plain.parse().ok().filter(|v: &f64| v.is_finite())?;
    Some(float_repr(if negative { -value } else { value }))
}

/// 十进制指数在 [-4, 16) 内用定点 (`3.0`, `0.0001`), 否则用 `1e-07` / `1.5e+16`
fn float_repr(value: f64) -> String {
    let scientific = format!("{:e}", value);
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return scientific;
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if (-4..16).contains(&exponent) {
        let fixed = value.to_string();
        if fixed.contains('.') {
            fixed
        } else {
            format!("{}.0", fixed)
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn list_literal_items_take_suffix_after_colon() {
        assert_eq!(parse_and_clean(Some(r#"["12:ABC", "34"]"#)), vec!["ABC", "34"]);
    }

    #[test]
    fn quoted_delimited_cell_uses_fallback_split() {
        assert_eq!(parse_and_clean(Some("'111', '222'")), vec!["111", "222"]);
    }

    #[test]
    fn missing_cell_yields_nothing() {
        assert!(parse_and_clean(None).is_empty());
        assert!(parse_and_clean(Some("   ")).is_empty());
        assert!(parse_and_clean(Some("[]")).is_empty());
    }

    #[test]
    fn numeric_and_mixed_literals_are_stringified() {
        assert_eq!(parse_and_clean(Some("[111, 222]")), vec!["111", "222"]);
        assert_eq!(
            parse_and_clean(Some(r#"['EAN:4006381333931', "UPC:036000291452",]"#)),
            vec!["4006381333931", "036000291452"]
        );
        assert_eq!(parse_and_clean(Some("[1_000, -0, 2.5, 3.0]")), vec!["1000", "0", "2.5", "3.0"]);
        assert_eq!(parse_and_clean(Some("[True, None]")), vec!["True", "None"]);
    }

    #[test]
    fn float_literals_switch_to_exponent_form_outside_fixed_range() {
        assert_eq!(
            parse_and_clean(Some("[1e-7, 0.0001, 1e15, 1e16, 1.5e16, -2.5e-10]")),
            vec!["1e-07", "0.0001", "1000000000000000.0", "1e+16", "1.5e+16", "-2.5e-10"]
        );
        assert_eq!(parse_and_clean(Some("[1e100, -0.0]")), vec!["1e+100", "-0.0"]);
    }

    #[test]
    fn plain_delimited_labels_are_cleaned() {
        assert_eq!(
            parse_and_clean(Some("EAN: 123,UPC:456 ,  789")),
            vec!["123", "456", "789"]
        );
        assert_eq!(parse_and_clean(Some("4006381333931")), vec!["4006381333931"]);
    }

    #[test]
    fn empty_items_are_dropped_in_order() {
        assert_eq!(parse_and_clean(Some(r#"["", "b", "  ", "a:"]"#)), vec!["b"]);
        assert_eq!(parse_and_clean(Some("x,,y")), vec!["x", "y"]);
    }

    #[test]
    fn malformed_literal_falls_back_without_error() {
        assert!(decode_list_literal(r#"["111", "222""#).is_err());
        let codes = parse_and_clean(Some(r#"["111", "222""#));
        assert_eq!(codes.len(), 2);
        assert_eq!(codes[1], "222");
    }

    #[test]
    fn decoder_rejects_unsupported_shapes() {
        assert_eq!(decode_list_literal("123"), Err(LiteralError::NotAList));
        assert!(decode_list_literal("[[1], 2]").is_err());
        assert!(decode_list_literal("[007]").is_err());
        assert!(decode_list_literal("[1 2]").is_err());
        assert!(decode_list_literal("[abc]").is_err());
        assert!(decode_list_literal("[1] trailing").is_err());
        assert_eq!(
            decode_list_literal(r#"['a\'b', "c\\d"]"#),
            Ok(vec!["a'b".to_string(), "c\\d".to_string()])
        );
    }

    fn assert_clean(cell: &str) -> Result<(), TestCaseError> {
        for code in parse_and_clean(Some(cell)) {
            prop_assert!(!code.is_empty(), "empty code from {:?}", cell);
            prop_assert_eq!(code.trim(), code.as_str(), "untrimmed code from {:?}", cell);
        }
        Ok(())
    }

    fn arb_item() -> impl Strategy<Value = String> {
        prop_oneof![
            "[ \t]{0,2}[A-Za-z0-9:]{0,8}[ \t]{0,2}",
            "[0-9]{1,14}",
            "(EAN|UPC): ?[0-9]{6,13}",
            "[\"']{0,2}[ :a-z0-9]{0,6}[\"']{0,2}",
            any::<String>(),
        ]
    }

    proptest! {
        #[test]
        fn arbitrary_cells_yield_clean_codes(cell in any::<String>()) {
            assert_clean(&cell)?;
        }

        #[test]
        fn bracketed_items_yield_clean_codes(
            items in prop::collection::vec(arb_item(), 0..6),
            trailing_comma in any::<bool>(),
        ) {
            let quoted: Vec<String> = items.iter().map(|item| format!("{:?}", item)).collect();
            let comma = if trailing_comma { "," } else { "" };
            assert_clean(&format!("[{}{}]", quoted.join(", "), comma))?;
            assert_clean(&format!("[{}]", items.join(",")))?;
        }

        #[test]
        fn comma_joined_items_yield_clean_codes(
            items in prop::collection::vec(arb_item(), 0..6),
            separator in prop_oneof![Just(","), Just(", "), Just(",\t"), Just(" , ")],
        ) {
            assert_clean(&items.join(separator))?;
        }
    }

    #[test]
    fn every_output_code_is_non_empty_and_trimmed() {
        let cells = [
            "",
            ",",
            "[",
            "]",
            "[,]",
            "'",
            "\"\"",
            ":",
            " a : b : c ",
            "[\"x\", ]",
            "['', ' ']",
            "a,\t b,\n c",
            "[1e400]",
            "\u{00a0}\u{00a0}",
            "[\"caf\u{e9}:\u{00e9}\"]",
        ];
        for cell in cells {
            for code in parse_and_clean(Some(cell)) {
                assert!(!code.is_empty(), "empty code from {:?}", cell);
                assert_eq!(code, code.trim(), "untrimmed code from {:?}", cell);
            }
        }
    }
}
