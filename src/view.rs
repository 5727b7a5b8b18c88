//! Row visibility and export rules of the generated page.
//!
//! The embedded script applies exactly these rules in the browser; this
//! module is the Rust statement of them, used for the initial stats and
//! as the executable reference in tests.

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::types::Table;

/// One exact-match constraint on a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnFilter {
    pub column: usize,
    pub value: String,
}

/// Everything that decides visibility. Never mutated: each interaction
/// builds a new state, so reset/filter/search interleavings can't leave
/// stale pieces behind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    /// Lower-cased search term; empty means no search.
    search: String,
    /// Active filters, one per column at most, ordered by column.
    filters: Vec<ColumnFilter>,
}

impl FilterState {
    /// Empty filter values mean "no constraint" and are dropped. A later
    /// filter on the same column replaces an earlier one.
    #[must_use]
    pub fn new<I, S>(search: &str, filters: I) -> Self
    where
        I: IntoIterator<Item = (usize, S)>,
        S: Into<String>,
    {
        let mut state = Self {
            search: search.to_lowercase(),
            filters: Vec::new(),
        };
        for (column, value) in filters {
            state = state.with_filter(column, value);
        }
        state
    }

    #[must_use]
    pub fn with_search(&self, term: &str) -> Self {
        Self {
            search: term.to_lowercase(),
            filters: self.filters.clone(),
        }
    }

    /// Set or clear (empty value) the filter on one column.
    #[must_use]
    pub fn with_filter(&self, column: usize, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut filters: Vec<ColumnFilter> = self
            .filters
            .iter()
            .filter(|f| f.column != column)
            .cloned()
            .collect();
        if !value.is_empty() {
            filters.push(ColumnFilter { column, value });
            filters.sort_by_key(|f| f.column);
        }
        Self {
            search: self.search.clone(),
            filters,
        }
    }

    #[must_use]
    pub fn search(&self) -> &str {
        &self.search
    }

    #[must_use]
    pub fn filters(&self) -> &[ColumnFilter] {
        &self.filters
    }

    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.search.is_empty() && self.filters.is_empty()
    }

    /// All active filters match exactly AND, if a search is set, some
    /// cell contains it case-insensitively.
    #[must_use]
    pub fn matches(&self, row: &[String]) -> bool {
        let filters_pass = self
            .filters
            .iter()
            .all(|f| row.get(f.column).is_some_and(|cell| *cell == f.value));
        if !filters_pass {
            return false;
        }
        self.search.is_empty()
            || row
                .iter()
                .any(|cell| cell.to_lowercase().contains(&self.search))
    }
}

/// Indices of visible rows, in original order.
#[must_use]
pub fn visible_rows(table: &Table, state: &FilterState) -> Vec<usize> {
    table
        .rows()
        .iter()
        .enumerate()
        .filter(|(_, row)| state.matches(row))
        .map(|(i, _)| i)
        .collect()
}

/// Header plus the given rows as comma-separated text. Every field is
/// quoted with embedded quotes doubled; lines joined by `\n`, no trailing
/// newline. This is the Export button's layout, but the button writes each
/// cell's rendered `textContent`, while this writes the stored value. The
/// two differ only for cells holding markup or entities, which are inserted
/// verbatim unless escaping is on.
///
/// # Errors
///
/// Returns the CSV writer's error if a record cannot be written.
pub fn export_csv(table: &Table, rows: &[usize]) -> Result<String, csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(table.columns())?;
    for &i in rows {
        if let Some(row) = table.rows().get(i) {
            writer.write_record(row)?;
        }
    }

    let mut bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }
    // Every field came in as `str`
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
