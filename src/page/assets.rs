/// Embedded stylesheet. Two palettes keyed by `body[data-theme]`.
pub const STYLE: &str = r#"
:root {
    --bg: #f8fafc; --panel: #ffffff; --text: #1e293b; --muted: #64748b;
    --border: #e2e8f0; --accent: #2563eb; --stripe: #f1f5f9; --hover: rgba(37, 99, 235, 0.06);
}
[data-theme="dark"] {
    --bg: #0f172a; --panel: #1e293b; --text: #f8fafc; --muted: #94a3b8;
    --border: #334155; --accent: #3b82f6; --stripe: #243247; --hover: rgba(59, 130, 246, 0.12);
}
* { box-sizing: border-box; }
body {
    margin: 0; background: var(--bg); color: var(--text);
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
    line-height: 1.5; transition: background 0.2s ease, color 0.2s ease;
}
.main-container { margin: 2rem; padding: 2rem; background: var(--panel); border: 1px solid var(--border); border-radius: 12px; }
.page-header { position: relative; text-align: center; margin-bottom: 2rem; }
.page-title { font-size: 2rem; margin: 0; }
.theme-toggle { position: absolute; top: 0; right: 0; }
button { cursor: pointer; padding: 0.5rem 1rem; border: 1px solid var(--border); border-radius: 8px; background: var(--panel); color: var(--text); font: inherit; }
button:hover { border-color: var(--accent); color: var(--accent); }
.stats { display: flex; gap: 1rem; justify-content: center; flex-wrap: wrap; margin-bottom: 2rem; }
.stats-card { min-width: 9rem; padding: 1rem; text-align: center; border: 1px solid var(--border); border-radius: 10px; }
.stats-number { font-size: 1.75rem; font-weight: 700; color: var(--accent); }
.stats-label { font-size: 0.8rem; text-transform: uppercase; letter-spacing: 0.05em; color: var(--muted); }
.controls { margin-bottom: 1.5rem; }
.search-row { display: flex; gap: 0.5rem; align-items: end; flex-wrap: wrap; margin-bottom: 1rem; }
.search-row .search-field { flex: 1 1 20rem; }
label { display: block; font-weight: 600; font-size: 0.85rem; margin-bottom: 0.25rem; }
input, select { width: 100%; padding: 0.5rem; border: 1px solid var(--border); border-radius: 8px; background: var(--bg); color: var(--text); font: inherit; }
.filters { display: grid; grid-template-columns: repeat(auto-fill, minmax(12rem, 1fr)); gap: 0.75rem; }
.table-container { overflow-x: auto; border: 1px solid var(--border); border-radius: 10px; }
.data-table { width: 100%; border-collapse: collapse; }
.data-table th { position: sticky; top: 0; background: var(--accent); color: #ffffff; text-align: left; padding: 0.75rem; }
.data-table td { padding: 0.6rem 0.75rem; border-top: 1px solid var(--border); }
.data-table tbody tr:nth-child(even) { background: var(--stripe); }
.data-table tbody tr:hover { background: var(--hover); }
.fab { position: fixed; right: 1.5rem; bottom: 1.5rem; border-radius: 50%; width: 3rem; height: 3rem; padding: 0; }
.loading-overlay { display: none; position: fixed; inset: 0; background: rgba(0, 0, 0, 0.3); align-items: center; justify-content: center; }
.loading-overlay.show { display: flex; }
.loading-spinner { width: 3rem; height: 3rem; border: 4px solid rgba(255, 255, 255, 0.3); border-top-color: #ffffff; border-radius: 50%; animation: spin 0.8s linear infinite; }
@keyframes spin { to { transform: rotate(360deg); } }
@media (max-width: 576px) { .main-container { margin: 0.5rem; padding: 1rem; } .page-title { font-size: 1.5rem; } }
"#;

/// Embedded behavior: search, column filters, reset, export, theme.
///
/// State is read from the controls into one frozen object per interaction
/// and visibility is recomputed over every original row.
pub const SCRIPT: &str = r#"
(function () {
    'use strict';

    const body = document.body;
    const themeToggle = document.getElementById('theme-toggle');
    const table = document.getElementById('data-table');
    const searchInput = document.getElementById('search-input');
    const filterSelects = Array.from(document.querySelectorAll('.filter-select'));
    const filteredCount = document.getElementById('filtered-rows');
    const overlay = document.getElementById('loading-overlay');
    const originalRows = Array.from(table.tBodies[0].rows);
    let visibleRows = originalRows.slice();

    function setTheme(theme) {
        body.setAttribute('data-theme', theme);
        themeToggle.textContent = theme === 'dark' ? '☀' : '☾';
    }

    setTheme(localStorage.getItem('theme') === 'dark' ? 'dark' : 'light');
    themeToggle.addEventListener('click', function () {
        const next = body.getAttribute('data-theme') === 'dark' ? 'light' : 'dark';
        setTheme(next);
        localStorage.setItem('theme', next);
    });

    function readState() {
        const filters = filterSelects
            .filter(function (select) { return select.value !== ''; })
            .map(function (select) {
                return Object.freeze({
                    column: parseInt(select.getAttribute('data-column'), 10),
                    value: select.value
                });
            });
        return Object.freeze({
            search: searchInput.value.toLowerCase(),
            filters: Object.freeze(filters)
        });
    }

    function isVisible(row, state) {
        for (const filter of state.filters) {
            const cell = row.cells[filter.column];
            if (!cell || cell.textContent.trim() !== filter.value) {
                return false;
            }
        }
        if (state.search === '') {
            return true;
        }
        return Array.from(row.cells).some(function (cell) {
            return cell.textContent.toLowerCase().includes(state.search);
        });
    }

    function applyState(state) {
        visibleRows = originalRows.filter(function (row) { return isVisible(row, state); });
        originalRows.forEach(function (row) { row.style.display = 'none'; });
        visibleRows.forEach(function (row) { row.style.display = ''; });
        filteredCount.textContent = String(visibleRows.length);
    }

    function busy(work) {
        overlay.classList.add('show');
        setTimeout(function () {
            try {
                work();
            } finally {
                overlay.classList.remove('show');
            }
        }, 16);
    }

    function refresh() {
        busy(function () { applyState(readState()); });
    }

    function reset() {
        searchInput.value = '';
        filterSelects.forEach(function (select) { select.value = ''; });
        refresh();
    }

    function csvField(text) {
        return '"' + text.replace(/"/g, '""') + '"';
    }

    function csvLine(cells) {
        return Array.from(cells).map(function (cell) { return csvField(cell.textContent); }).join(',');
    }

    function exportCsv() {
        busy(function () {
            const lines = [csvLine(table.tHead.rows[0].cells)].concat(
                visibleRows.map(function (row) { return csvLine(row.cells); })
            );
            const blob = new Blob([lines.join('\n')], { type: 'text/csv;charset=utf-8;' });
            const link = document.createElement('a');
            link.href = URL.createObjectURL(blob);
            link.download = 'exported_data.csv';
            document.body.appendChild(link);
            link.click();
            document.body.removeChild(link);
            URL.revokeObjectURL(link.href);
        });
    }

    searchInput.addEventListener('input', refresh);
    filterSelects.forEach(function (select) { select.addEventListener('change', refresh); });
    document.getElementById('reset-button').addEventListener('click', reset);
    document.getElementById('export-button').addEventListener('click', exportCsv);
    document.getElementById('scroll-top').addEventListener('click', function () {
        window.scrollTo({ top: 0, behavior: 'smooth' });
    });

    filteredCount.textContent = String(visibleRows.length);
})();
"#;

#[cfg(test)]
mod tests {
    use super::*;

    /// Body of a top-level function in the script, up to its closing brace.
    fn function_body(name: &str) -> &'static str {
        let start = SCRIPT
            .find(&format!("function {name}("))
            .unwrap_or_else(|| panic!("no function {name}"));
        let len = SCRIPT[start..].find("\n    }\n").unwrap();
        &SCRIPT[start..start + len]
    }

    #[test]
    fn reset_clears_search_and_every_filter_then_refreshes() {
        let body = function_body("reset");
        assert!(body.contains("searchInput.value = '';"), "{body}");
        assert!(
            body.contains("filterSelects.forEach(function (select) { select.value = ''; });"),
            "{body}"
        );
        assert!(body.trim_end().ends_with("refresh();"), "{body}");
    }

    #[test]
    fn applying_state_updates_visible_count() {
        let body = function_body("applyState");
        assert!(body.contains("isVisible(row, state)"), "{body}");
        assert!(
            body.contains("filteredCount.textContent = String(visibleRows.length);"),
            "{body}"
        );
    }

    #[test]
    fn filters_compare_trimmed_cell_text_exactly() {
        let body = function_body("isVisible");
        assert!(body.contains("cell.textContent.trim() !== filter.value"), "{body}");
        assert!(body.contains(".toLowerCase().includes(state.search)"), "{body}");
    }

    #[test]
    fn export_joins_visible_rows_without_trailing_newline() {
        let body = function_body("exportCsv");
        assert!(body.contains("visibleRows.map"), "{body}");
        assert!(body.contains("lines.join('\\n')"), "{body}");
        assert!(body.contains("'exported_data.csv'"), "{body}");
    }
}
