use std::collections::HashSet;

use crate::types::Table;

/// Final cleanup shared by both parse paths: trimmed, unique column names
/// and trimmed cells. `name_blanks` replaces empty header cells with
/// `Unnamed: <index>` (structured path only).
pub fn table(headers: Vec<String>, rows: Vec<Vec<String>>, name_blanks: bool) -> Table {
    let columns = columns(headers, name_blanks);
    let rows = rows
        .into_iter()
        .map(|row| row.into_iter().map(trim_owned).collect())
        .collect();
    Table::from_aligned(columns, rows)
}

fn columns(headers: Vec<String>, name_blanks: bool) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(headers.len());
    let mut out = Vec::with_capacity(headers.len());

    for (i, raw) in headers.into_iter().enumerate() {
        let mut name = trim_owned(raw);
        if name_blanks && name.is_empty() {
            name = format!("Unnamed: {i}");
        }
        if seen.contains(&name) {
            // a, a, a -> a, a.1, a.2 (skipping suffixes already taken)
            let mut n = 1usize;
            while seen.contains(&format!("{name}.{n}")) {
                n += 1;
            }
            name = format!("{name}.{n}");
        }
        seen.insert(name.clone());
        out.push(name);
    }
    out
}

fn trim_owned(s: String) -> String {
    let trimmed = s.trim();
    if trimmed.len() == s.len() {
        s
    } else {
        trimmed.to_string()
    }
}
