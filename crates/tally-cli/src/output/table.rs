//! Plain aligned tables for `--format table`.

const MIN_COLUMN_WIDTH: usize = 6;
const SEPARATOR: &str = "  ";

#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

/// Render string rows under `headers`, right-aligning numeric cells.
#[must_use]
pub fn render_table(headers: &[&str], rows: &[Vec<String>], options: TableOptions) -> String {
    let mut widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(index, header)| {
            rows.iter()
                .filter_map(|row| row.get(index))
                .map(|cell| cell.chars().count())
                .chain([header.chars().count(), MIN_COLUMN_WIDTH])
                .max()
                .unwrap_or(MIN_COLUMN_WIDTH)
        })
        .collect();

    if let Some(max_width) = options.max_width {
        shrink_to_fit(&mut widths, headers, max_width);
    }

    let header_line = headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&truncate(header, *width), *width, false))
        .collect::<Vec<_>>()
        .join(SEPARATOR);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header_line.trim_end().to_string());
    lines.push("-".repeat(header_line.trim_end().chars().count()));

    for row in rows {
        let line = widths
            .iter()
            .enumerate()
            .map(|(index, width)| {
                let cell = truncate(row.get(index).map_or("-", String::as_str), *width);
                let padded = pad(&cell, *width, is_numeric(&cell));
                match status_color(&cell) {
                    Some(code) if options.color => padded.replacen(
                        cell.as_str(),
                        &format!("\u{1b}[{code}m{cell}\u{1b}[0m"),
                        1,
                    ),
                    _ => padded,
                }
            })
            .collect::<Vec<_>>()
            .join(SEPARATOR);
        lines.push(line.trim_end().to_string());
    }

    lines.join("\n")
}

/// Narrow the widest columns one step at a time until the row fits.
fn shrink_to_fit(widths: &mut [usize], headers: &[&str], max_width: usize) {
    let separators = widths.len().saturating_sub(1) * SEPARATOR.len();
    while widths.iter().sum::<usize>() + separators > max_width {
        let widest = widths
            .iter()
            .enumerate()
            .filter(|(index, width)| {
                **width > headers[*index].chars().count().max(MIN_COLUMN_WIDTH)
            })
            .max_by_key(|(_, width)| **width)
            .map(|(index, _)| index);
        let Some(index) = widest else {
            break;
        };
        widths[index] -= 1;
    }
}

fn truncate(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    let mut out: String = value.chars().take(width.saturating_sub(1)).collect();
    out.push('…');
    out
}

fn pad(value: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{value:>width$}")
    } else {
        format!("{value:<width$}")
    }
}

fn is_numeric(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty()
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, '-' | '+' | '.'))
        && trimmed.chars().any(|ch| ch.is_ascii_digit())
}

/// ANSI color for control and session statuses.
fn status_color(value: &str) -> Option<&'static str> {
    match value {
        "controlled" | "validated" | "finalized" | "true" => Some("32"),
        "pending" | "active" => Some("33"),
        "error" | "false" => Some("31"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{TableOptions, render_table};

    const PLAIN: TableOptions = TableOptions {
        max_width: None,
        color: false,
    };

    fn rows() -> Vec<Vec<String>> {
        vec![
            vec!["asg-1".into(), "pending".into(), "100".into()],
            vec!["asg-200".into(), "controlled".into(), "7.5".into()],
        ]
    }

    #[test]
    fn header_divider_and_rows_align() {
        let table = render_table(&["id", "status", "expected"], &rows(), PLAIN);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("id"));
        assert!(lines[1].chars().all(|c| c == '-'));
        // Numbers are right-aligned, so both rows end at the same column.
        assert_eq!(lines[2].len(), lines[3].len());
        assert!(lines[2].ends_with("     100"));
    }

    #[test]
    fn color_wraps_only_status_cells() {
        let table = render_table(
            &["id", "status", "expected"],
            &rows(),
            TableOptions {
                max_width: None,
                color: true,
            },
        );
        assert!(table.contains("\u{1b}[33mpending\u{1b}[0m"));
        assert!(table.contains("\u{1b}[32mcontrolled\u{1b}[0m"));
        assert!(!table.contains("\u{1b}[32masg"));
    }

    #[test]
    fn long_cells_are_truncated_to_fit() {
        let rows = vec![vec!["x".repeat(80), "pending".into()]];
        let table = render_table(
            &["description", "status"],
            &rows,
            TableOptions {
                max_width: Some(40),
                color: false,
            },
        );
        assert!(table.lines().all(|line| line.chars().count() <= 40));
        assert!(table.contains('…'));
    }

    #[test]
    fn missing_cells_render_as_dash() {
        let rows = vec![vec!["asg-1".to_string()]];
        let table = render_table(&["id", "status"], &rows, PLAIN);
        assert!(table.lines().nth(2).is_some_and(|line| line.ends_with('-')));
    }
}
