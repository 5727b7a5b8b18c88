use serde::Serialize;

/// A normalized table: unique column names plus rows of trimmed strings.
/// Every row has exactly `columns.len()` cells. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    /// Build a table, rejecting rows whose width differs from the header.
    #[must_use]
    pub fn new(columns: Vec<String>, rows: Vec<Vec<String>>) -> Option<Self> {
        let width = columns.len();
        if rows.iter().any(|r| r.len() != width) {
            return None;
        }
        Some(Self { columns, rows })
    }

    /// Loader-side constructor; callers have already aligned every row.
    pub(crate) fn from_aligned(columns: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        debug_assert!(rows.iter().all(|r| r.len() == columns.len()));
        Self { columns, rows }
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Sorted distinct values of one column. Byte-wise, case-sensitive order.
    #[must_use]
    pub fn filter_options(&self, column: usize) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .rows
            .iter()
            .filter_map(|r| r.get(column).map(String::as_str))
            .collect();
        values.sort_unstable();
        values.dedup();
        values
    }
}

/// Text encodings tried by the loader, in preference order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    Utf8,
    Latin1,
    Cp1252,
    Iso8859_1,
}

impl Encoding {
    pub const PREFERENCE: [Encoding; 4] = [
        Encoding::Utf8,
        Encoding::Latin1,
        Encoding::Cp1252,
        Encoding::Iso8859_1,
    ];
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Utf8 => write!(f, "utf-8"),
            Self::Latin1 => write!(f, "latin-1"),
            Self::Cp1252 => write!(f, "cp1252"),
            Self::Iso8859_1 => write!(f, "iso-8859-1"),
        }
    }
}

/// Field separators the loader knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Order for the structured encoding × delimiter search.
    pub const PREFERENCE: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
    ];

    /// Order for the manual fallback, which only falls back to comma.
    pub const MANUAL_PREFERENCE: [Delimiter; 4] = [
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
        Delimiter::Comma,
    ];

    #[must_use]
    pub fn byte(self) -> u8 {
        match self {
            Self::Comma => b',',
            Self::Semicolon => b';',
            Self::Tab => b'\t',
            Self::Pipe => b'|',
        }
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Comma => write!(f, "','"),
            Self::Semicolon => write!(f, "';'"),
            Self::Tab => write!(f, "'\\t'"),
            Self::Pipe => write!(f, "'|'"),
        }
    }
}

/// How the loader recovered a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "method", rename_all = "kebab-case")]
pub enum Detection {
    Structured {
        encoding: Encoding,
        delimiter: Delimiter,
    },
    Manual {
        delimiter: Delimiter,
    },
}

impl std::fmt::Display for Detection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Structured {
                encoding,
                delimiter,
            } => write!(f, "encoding {encoding}, delimiter {delimiter}"),
            Self::Manual { delimiter } => write!(f, "manual parse, delimiter {delimiter}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &[&str]) -> Vec<String> {
        v.iter().map(|x| (*x).to_string()).collect()
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(Table::new(s(&["a", "b"]), vec![s(&["1"])]).is_none());
        assert!(Table::new(s(&["a", "b"]), vec![s(&["1", "2"])]).is_some());
    }

    #[test]
    fn filter_options_sorted_distinct_case_sensitive() {
        let t = Table::new(
            s(&["k"]),
            vec![s(&["b"]), s(&["B"]), s(&["a"]), s(&["b"]), s(&[""])],
        )
        .unwrap();
        assert_eq!(t.filter_options(0), vec!["", "B", "a", "b"]);
    }

    #[test]
    fn detection_serializes_tagged() {
        let d = Detection::Structured {
            encoding: Encoding::Cp1252,
            delimiter: Delimiter::Tab,
        };
        let json = serde_json::to_value(d).unwrap();
        assert_eq!(json["method"], "structured");
        assert_eq!(json["encoding"], "cp1252");
        assert_eq!(json["delimiter"], "tab");
    }
}
