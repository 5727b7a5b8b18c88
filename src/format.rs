use crate::Conversion;

/// One-line result summary:
/// `# out/report.html (120 rows × 5 columns, 48KB) [encoding utf-8, delimiter ',']`
#[must_use]
pub fn summary(conversion: &Conversion) -> String {
    format!(
        "# {} ({} × {}, {}) [{}]",
        conversion.output.display(),
        plural(conversion.rows, "row"),
        plural(conversion.columns, "column"),
        format_size(conversion.bytes),
        conversion.detection,
    )
}

fn plural(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {noun}")
    } else {
        format!("{n} {noun}s")
    }
}

/// Human-readable file size. Integer math only.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    match bytes {
        b if b < 1024 => format!("{b}B"),
        b if b < 1024 * 1024 => format!("{}KB", b / 1024),
        b => format!(
            "{}.{}MB",
            b / (1024 * 1024),
            (b % (1024 * 1024)) * 10 / (1024 * 1024)
        ),
    }
}
