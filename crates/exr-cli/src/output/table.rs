#[derive(Clone, Copy, Debug)]
pub struct TableOptions {
    pub max_width: Option<usize>,
    pub color: bool,
}

const MIN_WIDTH: usize = 6;

/// Render `[key, value]` rows as an aligned two-column table.
///
/// When `max_width` is set the value column is truncated to fit.
#[must_use]
pub fn render_key_value_table(rows: &[Vec<String>], options: TableOptions) -> String {
    let cell = |row: &Vec<String>, index: usize| row.get(index).cloned().unwrap_or_default();

    let key_width = rows
        .iter()
        .map(|row| cell(row, 0).chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_WIDTH);
    let mut value_width = rows
        .iter()
        .map(|row| cell(row, 1).chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_WIDTH);
    if let Some(max_width) = options.max_width {
        value_width = value_width.min(max_width.saturating_sub(key_width + 2).max(MIN_WIDTH));
    }

    let header = format!("{:<key_width$}  {}", "key", "value");
    let divider = "-".repeat(key_width + 2 + value_width);

    let mut lines = Vec::with_capacity(rows.len() + 2);
    lines.push(header);
    lines.push(divider);
    for row in rows {
        let value = truncate_text(&cell(row, 1), value_width);
        let value = if options.color {
            colorize(&value)
        } else {
            value
        };
        lines.push(format!("{:<key_width$}  {value}", cell(row, 0)));
    }
    lines.join("\n")
}

fn truncate_text(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    if width <= 1 {
        return "…".to_string();
    }

    let mut out = value.chars().take(width - 1).collect::<String>();
    out.push('…');
    out
}

fn colorize(value: &str) -> String {
    let code = match value {
        "true" | "Yes" => Some("32"),
        "false" | "No" => Some("31"),
        _ => None,
    };
    match code {
        Some(code) => format!("\u{1b}[{code}m{value}\u{1b}[0m"),
        None => value.to_string(),
    }
}
