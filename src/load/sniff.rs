use std::borrow::Cow;

use csv::ReaderBuilder;
use tracing::{debug, info};

use super::normalize;
use crate::types::{Delimiter, Detection, Encoding, Table};

/// Why one encoding × delimiter combination was not accepted.
#[derive(Debug)]
pub enum Rejection {
    Decode,
    Csv(csv::Error),
    TooManyFields {
        line: u64,
        expected: usize,
        found: usize,
    },
    SingleColumn,
    NoRows,
    SparseFirstRow {
        filled: usize,
        width: usize,
    },
}

impl std::fmt::Display for Rejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode => write!(f, "invalid byte sequence for encoding"),
            Self::Csv(e) => write!(f, "csv error: {e}"),
            Self::TooManyFields {
                line,
                expected,
                found,
            } => write!(f, "line {line}: expected {expected} fields, saw {found}"),
            Self::SingleColumn => write!(f, "only one column"),
            Self::NoRows => write!(f, "no data rows"),
            Self::SparseFirstRow { filled, width } => {
                write!(f, "first row only {filled}/{width} cells filled")
            }
        }
    }
}

/// Nested ordered search: encodings outer, delimiters inner. Returns the
/// first acceptable combination, not the best-scoring one.
pub fn structured(buf: &[u8]) -> Option<(Table, Detection)> {
    for encoding in Encoding::PREFERENCE {
        let Some(text) = decode(buf, encoding) else {
            debug!(%encoding, "{}", Rejection::Decode);
            continue;
        };
        let text = text.strip_prefix('\u{feff}').unwrap_or(&text);

        for delimiter in Delimiter::PREFERENCE {
            match attempt(text, delimiter) {
                Ok(table) => {
                    info!(
                        %encoding,
                        %delimiter,
                        rows = table.row_count(),
                        columns = table.column_count(),
                        "read csv"
                    );
                    return Some((
                        table,
                        Detection::Structured {
                            encoding,
                            delimiter,
                        },
                    ));
                }
                Err(reason) => debug!(%encoding, %delimiter, %reason, "attempt rejected"),
            }
        }
    }
    None
}

/// Strict decode. `None` means the bytes are not valid in this encoding.
pub fn decode(buf: &[u8], encoding: Encoding) -> Option<Cow<'_, str>> {
    match encoding {
        Encoding::Utf8 => std::str::from_utf8(buf).ok().map(Cow::Borrowed),
        Encoding::Latin1 | Encoding::Iso8859_1 => Some(encoding_rs::mem::decode_latin1(buf)),
        Encoding::Cp1252 => {
            encoding_rs::WINDOWS_1252.decode_without_bom_handling_and_without_replacement(buf)
        }
    }
}

/// Parse decoded text with one delimiter and apply the acceptance checks.
pub fn attempt(text: &str, delimiter: Delimiter) -> Result<Table, Rejection> {
    let text = skip_initial_space(text, delimiter);
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter.byte())
        .quote(b'"')
        .double_quote(true)
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(Rejection::Csv)?
        .iter()
        .map(str::to_string)
        .collect();
    let width = headers.len();

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(Rejection::Csv)?;

        // Whitespace-only line
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        if record.len() > width {
            return Err(Rejection::TooManyFields {
                line: record.position().map_or(0, csv::Position::line),
                expected: width,
                found: record.len(),
            });
        }

        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        rows.push(row);
    }

    if width <= 1 {
        return Err(Rejection::SingleColumn);
    }
    let Some(first) = rows.first() else {
        return Err(Rejection::NoRows);
    };

    // More than half of the first row must be non-empty
    let filled = first.iter().filter(|c| !c.trim().is_empty()).count();
    if filled * 2 <= width {
        return Err(Rejection::SparseFirstRow { filled, width });
    }

    Ok(normalize::table(headers, rows, true))
}

/// Drop spaces at the start of each field, outside quotes, so that
/// `1, "Smith, J"` reads the second field as quoted. The reader only
/// recognizes a quote as the very first byte of a field.
fn skip_initial_space(text: &str, delimiter: Delimiter) -> Cow<'_, str> {
    if !text.contains(' ') {
        return Cow::Borrowed(text);
    }
    let sep = char::from(delimiter.byte());
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut field_start = true;
    let mut quoted = false;

    while let Some(c) = chars.next() {
        if quoted {
            out.push(c);
            if c == '"' {
                // `""` inside quotes is a literal quote
                if chars.peek() == Some(&'"') {
                    out.push('"');
                    chars.next();
                } else {
                    quoted = false;
                }
            }
            continue;
        }
        if field_start && c == ' ' {
            continue;
        }
        quoted = field_start && c == '"';
        field_start = c == sep || c == '\n' || c == '\r';
        out.push(c);
    }
    Cow::Owned(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn comma_file_parses_first_try() {
        let (table, detection) = structured(b"a,b\n1,2\n3,4\n").unwrap();
        assert_eq!(
            detection,
            Detection::Structured {
                encoding: Encoding::Utf8,
                delimiter: Delimiter::Comma,
            }
        );
        assert_eq!(table.columns(), ["a", "b"]);
        assert_eq!(table.rows(), [vec!["1", "2"], vec!["3", "4"]]);
    }

    #[test]
    fn quoted_fields_keep_delimiters_and_quotes() {
        let table = attempt("name,quote\n\"Smith, J\",\"said \"\"hi\"\"\"\n", Delimiter::Comma)
            .unwrap();
        assert_eq!(table.rows()[0], ["Smith, J", "said \"hi\""]);
    }

    #[test]
    fn quoted_field_after_space_stays_quoted() {
        let table = attempt(
            "id, name, city\n1, \"Smith, J\", Paris\n2, \"Doe, A\", Rome\n",
            Delimiter::Comma,
        )
        .unwrap();
        assert_eq!(table.columns(), ["id", "name", "city"]);
        assert_eq!(table.rows()[0], ["1", "Smith, J", "Paris"]);
        assert_eq!(table.rows()[1], ["2", "Doe, A", "Rome"]);
    }

    #[test]
    fn leading_spaces_dropped_only_outside_quotes() {
        let text = "a, \"b,  c\",  d\n  x;y, \"say \"\" hi\"\"\", z\n";
        assert_eq!(
            skip_initial_space(text, Delimiter::Comma),
            "a,\"b,  c\",d\nx;y,\"say \"\" hi\"\"\",z\n"
        );
        // Spaces after a non-delimiter stay put
        assert_eq!(skip_initial_space("a b; c\n", Delimiter::Semicolon), "a b;c\n");
        assert!(matches!(
            skip_initial_space("a,b\n", Delimiter::Comma),
            Cow::Borrowed(_)
        ));
    }

    #[test]
    fn missing_value_markers_are_kept_as_text() {
        let table = attempt("id,v\n1,NA\n2,null\n3,N/A\n4,NaN\n", Delimiter::Comma).unwrap();
        let values: Vec<&str> = table.rows().iter().map(|r| r[1].as_str()).collect();
        assert_eq!(values, ["NA", "null", "N/A", "NaN"]);
    }

    #[test]
    fn short_rows_are_padded() {
        let table = attempt("a;b;c\n1;2;3\n4\n", Delimiter::Semicolon).unwrap();
        assert_eq!(table.rows()[1], ["4", "", ""]);
    }

    #[test]
    fn long_rows_reject_the_combination() {
        let err = attempt("a;b\n1;2\n3;4;5\n", Delimiter::Semicolon).unwrap_err();
        assert!(matches!(
            err,
            Rejection::TooManyFields {
                expected: 2,
                found: 3,
                ..
            }
        ));
    }

    #[test]
    fn wrong_delimiter_gives_single_column() {
        let err = attempt("a;b\n1;2\n", Delimiter::Comma).unwrap_err();
        assert!(matches!(err, Rejection::SingleColumn));
    }

    #[test]
    fn half_empty_first_row_is_rejected() {
        let err = attempt("a,b,c,d\n1,2,,\n", Delimiter::Comma).unwrap_err();
        assert!(matches!(
            err,
            Rejection::SparseFirstRow {
                filled: 2,
                width: 4
            }
        ));
        assert!(attempt("a,b,c,d\n1,2,3,\n", Delimiter::Comma).is_ok());
    }

    #[test]
    fn header_only_has_no_rows() {
        let err = attempt("a,b\n", Delimiter::Comma).unwrap_err();
        assert!(matches!(err, Rejection::NoRows));
    }

    #[test]
    fn invalid_utf8_falls_through_to_latin1() {
        // 0xE9 is 'é' in Latin-1 and invalid on its own in UTF-8
        let buf = b"name,city\nRen\xe9,Paris\n";
        let (table, detection) = structured(buf).unwrap();
        assert_eq!(
            detection,
            Detection::Structured {
                encoding: Encoding::Latin1,
                delimiter: Delimiter::Comma,
            }
        );
        assert_eq!(table.rows()[0][0], "René");
    }

    #[test]
    fn cp1252_decodes_windows_punctuation() {
        let text = decode(b"\x93q\x94", Encoding::Cp1252).unwrap();
        assert_eq!(text, "\u{201c}q\u{201d}");
        let latin = decode(b"\x93q\x94", Encoding::Latin1).unwrap();
        assert_eq!(latin, "\u{93}q\u{94}");
    }

    #[test]
    fn utf8_bom_is_not_part_of_first_column() {
        let (table, _) = structured("\u{feff}id,name\n1,x\n".as_bytes()).unwrap();
        assert_eq!(table.columns()[0], "id");
    }

    #[test]
    fn first_acceptable_delimiter_wins_over_better_one() {
        // Comma yields a sane 2-column table, so the 3-column semicolon
        // reading is never considered.
        let (table, detection) = structured(b"a;b,c;d\n1;2,3;4\n").unwrap();
        assert!(matches!(
            detection,
            Detection::Structured {
                delimiter: Delimiter::Comma,
                ..
            }
        ));
        assert_eq!(table.columns(), ["a;b", "c;d"]);
    }
}
