use tracing::info;

use super::normalize;
use crate::types::{Delimiter, Table};

/// Why the manual fallback could not produce a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManualFailure {
    /// No non-empty line at all.
    NoHeader,
    /// A header line and nothing after it.
    HeaderOnly,
    /// Data lines exist but none has the header's width.
    NoConsistentRows,
}

/// Last-resort parser: lossy UTF-8, plain line splitting, no quote
/// awareness. Rows whose width differs from the header are dropped,
/// never padded or truncated.
pub fn parse(buf: &[u8]) -> Result<(Table, Delimiter), ManualFailure> {
    let content = decode_lossy(buf);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let lines: Vec<&str> = content
        .split('\n')
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    let (header_line, data_lines) = match lines.split_first() {
        None => return Err(ManualFailure::NoHeader),
        Some((_, [])) => return Err(ManualFailure::HeaderOnly),
        Some((first, rest)) => (*first, rest),
    };

    let delimiter = detect_delimiter(header_line);
    let headers = split_fields(header_line, delimiter);
    let width = headers.len();

    let rows: Vec<Vec<String>> = data_lines
        .iter()
        .map(|line| split_fields(line, delimiter))
        .filter(|row| row.len() == width)
        .collect();

    let dropped = data_lines.len() - rows.len();
    if rows.is_empty() {
        return Err(ManualFailure::NoConsistentRows);
    }

    info!(
        %delimiter,
        rows = rows.len(),
        dropped,
        "parsed csv manually"
    );
    Ok((normalize::table(headers, rows, false), delimiter))
}

/// UTF-8 decode that silently drops undecodable bytes.
fn decode_lossy(buf: &[u8]) -> String {
    let mut out = String::with_capacity(buf.len());
    for chunk in buf.utf8_chunks() {
        out.push_str(chunk.valid());
    }
    out
}

/// First candidate present in the header line wins; comma by default.
fn detect_delimiter(first_line: &str) -> Delimiter {
    let bytes = first_line.as_bytes();
    Delimiter::MANUAL_PREFERENCE
        .into_iter()
        .find(|d| memchr::memchr(d.byte(), bytes).is_some())
        .unwrap_or(Delimiter::Comma)
}

/// Split on the delimiter, trim each field, then drop one pair of
/// surrounding double quotes.
fn split_fields(line: &str, delimiter: Delimiter) -> Vec<String> {
    line.split(char::from(delimiter.byte()))
        .map(|field| {
            let field = field.trim();
            field
                .strip_prefix('"')
                .and_then(|f| f.strip_suffix('"'))
                .unwrap_or(field)
                .to_string()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drops_rows_with_wrong_width() {
        let (table, delimiter) = parse(b"a;b\n1;2\n3;4;5\n6;7\n").unwrap();
        assert_eq!(delimiter, Delimiter::Semicolon);
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows(), [vec!["1", "2"], vec!["6", "7"]]);
    }

    #[test]
    fn short_rows_are_dropped_not_padded() {
        let (table, _) = parse(b"a|b|c\n1|2\n4|5|6\n").unwrap();
        assert_eq!(table.rows(), [vec!["4", "5", "6"]]);
    }

    #[test]
    fn semicolon_preferred_over_comma() {
        assert_eq!(detect_delimiter("a,b;c"), Delimiter::Semicolon);
        assert_eq!(detect_delimiter("a,b|c"), Delimiter::Pipe);
        assert_eq!(detect_delimiter("a\tb,c"), Delimiter::Tab);
        assert_eq!(detect_delimiter("abc"), Delimiter::Comma);
    }

    #[test]
    fn strips_one_pair_of_quotes() {
        let fields = split_fields(" \"x\" ,\"\"y\"\",z\"", Delimiter::Comma);
        assert_eq!(fields, ["x", "\"y\"", "z\""]);
    }

    #[test]
    fn undecodable_bytes_are_dropped() {
        let (table, _) = parse(b"k;v\nab\xffc;1\n").unwrap();
        assert_eq!(table.rows()[0][0], "abc");
    }

    #[test]
    fn blank_and_crlf_lines_are_ignored() {
        let (table, _) = parse(b"a;b\r\n\r\n   \n1;2\r\n").unwrap();
        assert_eq!(table.rows(), [vec!["1", "2"]]);
    }

    #[test]
    fn failure_kinds() {
        assert_eq!(parse(b"").unwrap_err(), ManualFailure::NoHeader);
        assert_eq!(parse(b"\n  \n").unwrap_err(), ManualFailure::NoHeader);
        assert_eq!(parse(b"a;b\n").unwrap_err(), ManualFailure::HeaderOnly);
        assert_eq!(
            parse(b"a;b\n1;2;3\n4\n").unwrap_err(),
            ManualFailure::NoConsistentRows
        );
    }
}
