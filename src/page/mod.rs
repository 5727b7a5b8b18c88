//! Self-contained HTML page generation.
//!
//! Everything the page needs (markup, stylesheet, script) is inlined; the
//! output opens offline. Rendering is deterministic: the same table and
//! title always produce the same bytes.

pub mod assets;

use std::borrow::Cow;
use std::fmt::Write;

use crate::types::Table;
use crate::view::{self, FilterState};

/// DOM id of the data table; the script looks it up by this id.
pub const TABLE_ID: &str = "data-table";

#[derive(Debug, Clone, Copy, Default)]
pub struct RenderOptions {
    /// Escape HTML-special characters in cells, column names and title.
    /// Off by default: values are inserted verbatim, so the page is only
    /// safe to open for trusted input.
    pub escape_html: bool,
}

/// Render with default options (verbatim cell values).
#[must_use]
pub fn render(table: &Table, title: &str) -> String {
    render_with(table, title, &RenderOptions::default())
}

#[must_use]
pub fn render_with(table: &Table, title: &str, options: &RenderOptions) -> String {
    let visible = view::visible_rows(table, &FilterState::default()).len();

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{style}</style>
</head>
<body>
    <div class="main-container">
        <header class="page-header">
            <button class="theme-toggle" id="theme-toggle" type="button" title="Toggle theme">☾</button>
            <h1 class="page-title">{title}</h1>
        </header>
        <section class="stats">
            <div class="stats-card"><div class="stats-number" id="total-rows">{total}</div><div class="stats-label">Total Rows</div></div>
            <div class="stats-card"><div class="stats-number" id="column-count">{columns}</div><div class="stats-label">Columns</div></div>
            <div class="stats-card"><div class="stats-number" id="filtered-rows">{visible}</div><div class="stats-label">Filtered Rows</div></div>
        </section>
        <section class="controls">
            <div class="search-row">
                <div class="search-field">
                    <label for="search-input">Global Search</label>
                    <input type="text" id="search-input" placeholder="Search across all columns...">
                </div>
                <button id="reset-button" type="button">Reset</button>
                <button id="export-button" type="button">Export</button>
            </div>
            <div class="filters">
{filters}            </div>
        </section>
        <div class="table-container">
{table}        </div>
    </div>
    <button class="fab" id="scroll-top" type="button" title="Scroll to top">↑</button>
    <div class="loading-overlay" id="loading-overlay"><div class="loading-spinner"></div></div>
    <script>{script}</script>
</body>
</html>
"#,
        title = text(title, options),
        style = assets::STYLE,
        total = table.row_count(),
        columns = table.column_count(),
        filters = filter_controls(table, options),
        table = table_markup(table, options),
        script = assets::SCRIPT,
    )
}

/// Minimal page describing a load failure, written in place of the data
/// page so the problem is visible in a browser.
#[must_use]
pub fn render_error(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>Error</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        .error {{ color: #d32f2f; background: #ffebee; padding: 20px; border-radius: 8px; }}
    </style>
</head>
<body>
    <div class="error">
        <h2>Error processing CSV file</h2>
        <p><strong>Error:</strong> {}</p>
    </div>
</body>
</html>
"#,
        escape(message)
    )
}

/// One `<select>` per column, addressable by `data-column` index.
fn filter_controls(table: &Table, options: &RenderOptions) -> String {
    let mut out = String::new();
    for (i, name) in table.columns().iter().enumerate() {
        let _ = writeln!(out, "                <div class=\"filter\">");
        let _ = writeln!(
            out,
            "                    <label for=\"filter-{i}\">{}</label>",
            text(name, options)
        );
        let _ = writeln!(
            out,
            "                    <select class=\"filter-select\" data-column=\"{i}\" id=\"filter-{i}\">"
        );
        let _ = writeln!(out, "                        <option value=\"\">All</option>");
        for value in table.filter_options(i) {
            let _ = writeln!(
                out,
                "                        <option value=\"{}\">{}</option>",
                attribute(value, options),
                text(value, options)
            );
        }
        let _ = writeln!(out, "                    </select>");
        let _ = writeln!(out, "                </div>");
    }
    out
}

fn table_markup(table: &Table, options: &RenderOptions) -> String {
    let mut out = String::with_capacity(64 * (table.row_count() + 1) * table.column_count().max(1));
    let _ = writeln!(
        out,
        "            <table id=\"{TABLE_ID}\" class=\"data-table\">"
    );
    out.push_str("                <thead>\n                    <tr>");
    for name in table.columns() {
        let _ = write!(out, "<th>{}</th>", text(name, options));
    }
    out.push_str("</tr>\n                </thead>\n                <tbody>\n");
    for row in table.rows() {
        out.push_str("                    <tr>");
        for cell in row {
            let _ = write!(out, "<td>{}</td>", text(cell, options));
        }
        out.push_str("</tr>\n");
    }
    out.push_str("                </tbody>\n            </table>\n");
    out
}

fn text<'a>(s: &'a str, options: &RenderOptions) -> Cow<'a, str> {
    if options.escape_html {
        escape(s)
    } else {
        Cow::Borrowed(s)
    }
}

/// Quoted-attribute form of a value. In verbatim mode only `"` is replaced,
/// so the browser decodes the attribute to the same string as the `<td>`
/// text the filter compares it with.
fn attribute<'a>(s: &'a str, options: &RenderOptions) -> Cow<'a, str> {
    if options.escape_html {
        escape(s)
    } else if s.contains('"') {
        Cow::Owned(s.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(s)
    }
}

/// Escape the five HTML-special characters. Borrows when nothing changes.
pub fn escape(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut out = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}
