//! Plain-text table rendering.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use super::Align;
use super::Column;
use super::FacetFilter;
use super::SortDirection;
use super::TableState;

/// Options for [`render_text`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Cells wider than this are cut and end in `…`.
    pub max_cell_width: usize,
    /// Whether to print the search/sort toolbar line.
    pub toolbar: bool,
    /// Separator between columns.
    pub gap: &'static str,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            max_cell_width: 40,
            toolbar: true,
            gap: "  ",
        }
    }
}

/// Renders the table's current view as lines of text.
///
/// Layout, top to bottom: toolbar, error banner, header with sort markers,
/// rows (or a loading / empty-state line), footer.
///
/// ```text
/// Search: ai    Sorted by Name (asc)
/// Name ▲  Price ↕
/// ------  -------
/// Alpha     $5.00
/// Showing 1 of 3 loaded [more available]
/// ```
pub fn render_text(state: &TableState, options: &RenderOptions) -> String {
    let columns = state.columns();
    let view = state.view();
    let mut lines = Vec::new();

    if options.toolbar {
        lines.push(toolbar(state));
    }

    if let Some(err) = state.last_error() {
        lines.push(format!("! {}", err));
    }

    let headers: Vec<String> = columns.iter().map(|c| header_label(state, c)).collect();
    let rows: Vec<Vec<String>> = view
        .iter()
        .map(|record| {
            columns
                .iter()
                .map(|c| truncate(&single_line(&c.cell_text(record)), options.max_cell_width))
                .collect()
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(h.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    lines.push(join_cells(
        headers.iter().zip(&widths).map(|(h, &w)| pad(h, w, Align::Left)),
        options.gap,
    ));
    lines.push(join_cells(widths.iter().map(|&w| "-".repeat(w)), options.gap));

    for row in &rows {
        lines.push(join_cells(
            row.iter()
                .zip(columns)
                .zip(&widths)
                .map(|((cell, column), &w)| pad(cell, w, column.alignment())),
            options.gap,
        ));
    }

    if rows.is_empty() {
        if state.is_loading() {
            lines.push("Loading…".to_string());
        } else if state.is_empty_result() {
            lines.push(empty_message(state.search_text()));
        }
    } else {
        lines.push(footer(state, rows.len()));
    }

    lines.join("\n")
}

fn toolbar(state: &TableState) -> String {
    let mut line = format!("Search: {}", state.search_text());
    if !state.facets().is_empty() {
        let facets: Vec<String> = state
            .facets()
            .iter()
            .map(|(key, filter)| {
                let header = state.column(key).map(Column::header).unwrap_or(key);
                match filter {
                    FacetFilter::Equals(value) => format!("{} = {}", header, value),
                    FacetFilter::Available => format!("{} available", header),
                }
            })
            .collect();
        line.push_str(&format!("    Filters: {}", facets.join(", ")));
    }
    if let Some(sort) = state.sort() {
        let header = state.column(&sort.key).map(Column::header).unwrap_or(&sort.key);
        line.push_str(&format!("    Sorted by {} ({})", header, sort.direction));
    }
    line
}

fn header_label(state: &TableState, column: &Column) -> String {
    if !column.is_sortable() {
        return column.header().to_string();
    }
    let marker = match state.sort() {
        Some(sort) if sort.key == column.key() => match sort.direction {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        },
        _ => "↕",
    };
    format!("{} {}", column.header(), marker)
}

fn empty_message(search: &str) -> String {
    let search = search.trim();
    if search.is_empty() {
        "No results.".to_string()
    } else {
        format!("No results for “{}”.", search)
    }
}

fn footer(state: &TableState, shown: usize) -> String {
    let mut line = format!("Showing {} of {} loaded", shown, state.records().len());
    if let Some(total) = state.total() {
        line.push_str(&format!(" ({} total)", total));
    }
    if state.is_loading() {
        line.push_str("  Loading…");
    } else if state.has_more() {
        line.push_str(" [more available]");
    }
    line
}

fn join_cells(cells: impl Iterator<Item = String>, gap: &str) -> String {
    let line = cells.collect::<Vec<_>>().join(gap);
    line.trim_end().to_string()
}

fn single_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Pads `text` to display width `width`.
fn pad(text: &str, width: usize, align: Align) -> String {
    let fill = width.saturating_sub(text.width());
    match align {
        Align::Left => format!("{}{}", text, " ".repeat(fill)),
        Align::Right => format!("{}{}", " ".repeat(fill), text),
        Align::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), text, " ".repeat(fill - left))
        }
    }
}

/// Cuts `text` to at most `max` display columns, ending in `…` when cut.
fn truncate(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FetchError;
    use crate::model::Record;
    use crate::page::Page;

    fn columns() -> Vec<Column> {
        vec![
            Column::new("name", "Name").sortable(),
            Column::new("price", "Price")
                .sortable()
                .align(Align::Right)
                .render(|r| match r.get_f64("price") {
                    Ok(Some(p)) => format!("${:.2}", p),
                    _ => "—".to_string(),
                }),
            Column::new("notes", "Notes"),
        ]
    }

    fn options() -> RenderOptions {
        RenderOptions {
            toolbar: false,
            ..RenderOptions::default()
        }
    }

    #[test]
    fn test_renders_rows_and_markers() {
        let mut state = TableState::new(columns());
        let request = state.begin_search().unwrap();
        state.apply(
            &request,
            Ok(Page::new(vec![
                Record::new("a").set("name", "Zeta").set("price", 5i64),
                Record::new("b").set("name", "Alpha").set("price", 12.5),
            ])
            .with_continuation("next")),
        );
        state.toggle_sort("name");

        let text = render_text(&state, &options());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Name ▲  Price ↕  Notes");
        assert_eq!(lines[1], "------  -------  -----");
        assert_eq!(lines[2], "Alpha    $12.50  —");
        assert_eq!(lines[3], "Zeta      $5.00  —");
        assert_eq!(lines[4], "Showing 2 of 2 loaded [more available]");
    }

    #[test]
    fn test_toolbar_shows_sort() {
        let mut state = TableState::new(columns());
        state.set_search_text("al");
        state.toggle_sort("price");
        state.toggle_sort("price");

        let text = render_text(&state, &RenderOptions::default());
        assert!(text.starts_with("Search: al    Sorted by Price (desc)"));
    }

    #[test]
    fn test_loading_line() {
        let mut state = TableState::new(columns());
        state.begin_search();
        assert!(render_text(&state, &options()).ends_with("Loading…"));
    }

    #[test]
    fn test_empty_state_mentions_search() {
        let mut state = TableState::new(columns());
        state.set_search_text("zzz");
        let request = state.begin_search().unwrap();
        state.apply(&request, Ok(Page::new(Vec::new())));

        assert!(render_text(&state, &options()).ends_with("No results for “zzz”."));
    }

    #[test]
    fn test_empty_state_names_typed_text() {
        let mut state = TableState::new(columns());
        let request = state.begin_search().unwrap();
        state.apply(&request, Ok(Page::new(vec![Record::new("a").set("name", "Alpha")])));
        state.set_search_text("xyz");

        assert!(render_text(&state, &options()).ends_with("No results for “xyz”."));
    }

    #[test]
    fn test_toolbar_lists_facets() {
        let mut state = TableState::new(columns());
        state.set_facet("notes", Some(FacetFilter::Available));
        state.set_facet("name", Some(FacetFilter::Equals("Alpha".to_string())));

        let text = render_text(&state, &RenderOptions::default());
        assert!(text.starts_with("Search:     Filters: Name = Alpha, Notes available"));
    }

    #[test]
    fn test_error_banner_above_table() {
        let mut state = TableState::new(columns());
        let request = state.begin_search().unwrap();
        state.apply(&request, Err(FetchError::server(401, "AUTHENTICATION_REQUIRED")));

        let text = render_text(&state, &options());
        assert!(text.starts_with("! HTTP 401: AUTHENTICATION_REQUIRED"));
        assert!(!text.contains("No results"));
    }

    #[test]
    fn test_truncate_and_pad() {
        assert_eq!(truncate("abcdef", 4), "abc…");
        assert_eq!(truncate("abc", 4), "abc");
        assert_eq!(pad("ab", 4, Align::Center), " ab ");
        assert_eq!(pad("ab", 4, Align::Right), "  ab");
    }
}
