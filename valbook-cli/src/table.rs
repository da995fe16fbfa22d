//! Plain-text table rendering for listings.

/// Render rows as a left-aligned table with a header and separator line.
pub fn render(headers: &[&str], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let mut out = String::new();
    let line = |cells: &[String], out: &mut String| {
        let formatted: Vec<String> = cells
            .iter()
            .enumerate()
            .map(|(i, c)| format!("{c:<width$}", width = widths[i]))
            .collect();
        out.push_str(formatted.join("  ").trim_end());
        out.push('\n');
    };

    line(
        &headers.iter().map(|h| h.to_string()).collect::<Vec<_>>(),
        &mut out,
    );
    let separator: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    line(&separator, &mut out);
    for row in rows {
        line(row, &mut out);
    }
    out
}
