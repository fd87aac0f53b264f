use crate::core::series::{Series, SeriesPoint};
use chrono::{DateTime, Utc};
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a cell for a signed amount, green when positive and red when negative.
pub fn signed_cell(point: SeriesPoint) -> Cell {
    match point {
        SeriesPoint::Present(v) if v > 0.0 => Cell::new(format!("{v:.0}"))
            .fg(Color::Green)
            .set_alignment(CellAlignment::Right),
        SeriesPoint::Present(v) if v < 0.0 => Cell::new(format!("{v:.0}"))
            .fg(Color::Red)
            .set_alignment(CellAlignment::Right),
        other => format_optional_cell(other.value(), |v| format!("{v:.0}")),
    }
}

pub fn date_label(t: DateTime<Utc>) -> String {
    t.format("%y/%m/%d").to_string()
}

/// Lays out grid-aligned series as one row per grid point.
pub fn series_table(
    grid: &[DateTime<Utc>],
    series: &[Series],
    format_fn: impl Fn(f64) -> String,
) -> Table {
    let mut table = new_styled_table();

    let mut header = vec![header_cell("Date")];
    header.extend(series.iter().map(|s| header_cell(&s.label)));
    table.set_header(header);

    for (i, t) in grid.iter().enumerate() {
        let mut row = vec![Cell::new(date_label(*t))];
        for s in series {
            let value = s.points.get(i).and_then(SeriesPoint::value);
            row.push(format_optional_cell(value, &format_fn));
        }
        table.add_row(row);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_series_table_layout() {
        let grid = vec![
            Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 6, 0, 0, 0).unwrap(),
        ];
        let series = vec![Series::new(
            "bank",
            vec![SeriesPoint::Present(1200.4), SeriesPoint::Absent],
        )];
        let rendered = series_table(&grid, &series, |v| format!("{v:.0}")).to_string();
        assert!(rendered.contains("bank"));
        assert!(rendered.contains("24/01/05"));
        assert!(rendered.contains("1200"));
        assert!(rendered.contains("N/A"));
    }
}
