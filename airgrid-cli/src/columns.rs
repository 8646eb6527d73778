//! Column layouts for each source.

use airgrid_lib::model::Record;
use airgrid_lib::table::Column;

use crate::args::{ColumnArg, SourceArg};

/// Builds the displayed columns: the user's `--columns` if given, otherwise
/// the source's default layout.
pub(crate) fn build(source: SourceArg, requested: Option<&[ColumnArg]>) -> Vec<Column> {
    match requested {
        Some(columns) if !columns.is_empty() => columns.iter().map(from_arg).collect(),
        _ => defaults(source),
    }
}

fn defaults(source: SourceArg) -> Vec<Column> {
    let keys: [&str; 4] = match source {
        SourceArg::Airtable => ["Name", "Category", "Description", "Website"],
        SourceArg::List | SourceArg::Demo => ["name", "category", "description", "website"],
    };
    keys.iter()
        .map(|key| column(key, &title_case(key)))
        .collect()
}

fn from_arg(arg: &ColumnArg) -> Column {
    let header = arg.header.clone().unwrap_or_else(|| title_case(&arg.key));
    column(&arg.key, &header)
}

fn column(key: &str, header: &str) -> Column {
    let column = Column::new(key, header).sortable();
    if is_link(key) {
        let key = key.to_string();
        column.render(move |record: &Record| short_url(&record.text(&key)))
    } else {
        column
    }
}

fn is_link(key: &str) -> bool {
    matches!(key.to_ascii_lowercase().as_str(), "website" | "url" | "link")
}

/// `https://www.example.com/` -> `example.com`. Empty input renders as `—`.
fn short_url(url: &str) -> String {
    let url = url.trim();
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .unwrap_or(url);
    let rest = rest.strip_prefix("www.").unwrap_or(rest);
    let rest = rest.trim_end_matches('/');
    if rest.is_empty() {
        airgrid_lib::table::EMPTY_CELL.to_string()
    } else {
        rest.to_string()
    }
}

fn title_case(key: &str) -> String {
    key.split(['_', '-', ' '])
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout_per_source() {
        let demo = build(SourceArg::Demo, None);
        assert_eq!(demo[0].key(), "name");
        assert_eq!(demo[0].header(), "Name");

        let airtable = build(SourceArg::Airtable, None);
        assert_eq!(airtable[2].key(), "Description");
        assert!(airtable[3].has_renderer());
        assert!(!airtable[0].has_renderer());
    }

    #[test]
    fn test_requested_columns_win() {
        let requested: Vec<ColumnArg> = vec!["free_tier".parse().unwrap(), "name:API".parse().unwrap()];
        let columns = build(SourceArg::List, Some(&requested));
        assert_eq!(columns.len(), 2);
        assert_eq!(columns[0].header(), "Free Tier");
        assert_eq!(columns[1].header(), "API");
    }

    #[test]
    fn test_short_url() {
        assert_eq!(short_url("https://www.anthropic.com"), "anthropic.com");
        assert_eq!(short_url("http://ai.google.dev/"), "ai.google.dev");
        assert_eq!(short_url("https://aws.amazon.com/ai"), "aws.amazon.com/ai");
        assert_eq!(short_url(""), "—");
    }

    #[test]
    fn test_link_column_renders_host() {
        let columns = build(SourceArg::Demo, None);
        let record = Record::new("x").set("website", "https://www.pinecone.io");
        assert_eq!(columns[3].cell_text(&record), "pinecone.io");
    }
}
