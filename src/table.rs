use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Renders `rows` under `headers` as a plain-text table. Columns missing
/// from `aligns` are left-aligned.
pub fn render_table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths = headers
        .iter()
        .map(|h| h.chars().count())
        .collect::<Vec<_>>();
    for row in rows {
        for (idx, cell) in row.iter().enumerate().take(widths.len()) {
            widths[idx] = widths[idx].max(cell.chars().count());
        }
    }

    let mut output = String::new();
    let header_cells = headers.iter().map(|h| h.to_string()).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&header_cells, &widths, aligns));
    let separator = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&separator, &widths, &[]));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, aligns));
    }
    output
}

pub fn print_table(headers: &[&str], aligns: &[Align], rows: &[Vec<String>]) {
    print!("{}", render_table(headers, aligns, rows));
}

fn format_row(values: &[String], widths: &[usize], aligns: &[Align]) -> String {
    let line = values
        .iter()
        .zip(widths.iter().copied())
        .enumerate()
        .map(|(idx, (value, width))| {
            let value = value.replace(['\n', '\r', '\t'], " ");
            match aligns.get(idx).copied().unwrap_or(Align::Left) {
                Align::Left => format!("{value:<width$}"),
                Align::Right => format!("{value:>width$}"),
            }
        })
        .collect::<Vec<_>>()
        .join("  ");
    line.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_table_aligns_numeric_columns_right() {
        let rows = vec![
            vec!["1".to_string(), "Alpha".to_string(), "1,200".to_string()],
            vec!["2".to_string(), "Be".to_string(), "35".to_string()],
        ];
        let rendered = render_table(
            &["rank", "country", "tons"],
            &[Align::Right, Align::Left, Align::Right],
            &rows,
        );
        let lines = rendered.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "rank  country   tons",
                "----  -------  -----",
                "   1  Alpha    1,200",
                "   2  Be          35",
            ]
        );
    }

    #[test]
    fn render_table_flattens_control_characters() {
        let rows = vec![vec!["line1\nline2".to_string()]];
        let rendered = render_table(&["note"], &[], &rows);
        assert_eq!(rendered.lines().nth(2), Some("line1 line2"));
    }
}
