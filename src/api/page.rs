//! 上传表单页面

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Barcode Match Report</title>
  <style>
    body { font-family: sans-serif; max-width: 40rem; margin: 3rem auto; }
    label { display: block; margin-top: 1rem; }
    .error { color: #b00020; border: 1px solid #b00020; padding: .5rem; }
  </style>
</head>
<body>
  <h1>Barcode Match Report</h1>
  {{error}}
  <form method="post" enctype="multipart/form-data">
    <label>Catalog file (with Barcodes column)
      <input type="file" name="top_file" accept=".csv,.xlsx,.xls,.ods">
    </label>
    <label>Sold file (with SKU and Qty columns)
      <input type="file" name="sold_file" accept=".csv,.xlsx,.xls,.ods">
    </label>
    <label>Stock file (optional, SKU and In Stock Qty columns)
      <input type="file" name="stock_file" accept=".csv,.xlsx,.xls,.ods">
    </label>
    <label>Output format
      <select name="format">
        <option value="xlsx" selected>Excel (.xlsx)</option>
        <option value="csv">CSV</option>
      </select>
    </label>
    <p><button type="submit">Generate report</button></p>
  </form>
</body>
</html>
"#;

/// 渲染表单页, 可附带错误信息
pub fn render(error: Option<&str>) -> String {
    let banner = error
        .map(|message| format!(r#"<p class="error">{}</p>"#, escape_html(message)))
        .unwrap_or_default();
    INDEX_HTML.replace("{{error}}", &banner)
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
