//! `filterByFormula` generation.

/// Builds the formula matching rows where any of `fields` contains `search`,
/// ignoring case.
///
/// Returns `None` for a blank search so the request carries no filter.
///
/// # Example
///
/// ```
/// use airgrid_lib::provider::airtable::search_formula;
///
/// assert_eq!(
///     search_formula("gpt", &["Name", "Notes"]).as_deref(),
///     Some(r#"OR(FIND(LOWER("gpt"), LOWER({Name})),FIND(LOWER("gpt"), LOWER({Notes})))"#)
/// );
/// assert_eq!(search_formula("  ", &["Name"]), None);
/// ```
pub fn search_formula<S: AsRef<str>>(search: &str, fields: &[S]) -> Option<String> {
    let needle = search.trim();
    if needle.is_empty() || fields.is_empty() {
        return None;
    }

    let literal = escape_string(needle);
    let terms: Vec<String> = fields
        .iter()
        .map(|f| format!("FIND(LOWER({}), LOWER({}))", literal, field_ref(f.as_ref())))
        .collect();
    Some(format!("OR({})", terms.join(",")))
}

/// Quotes a string literal for a formula.
///
/// Formula strings are double-quoted with backslash escapes.
pub fn escape_string(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Wraps a field name in braces, escaping a closing brace inside the name.
pub fn field_ref(name: &str) -> String {
    format!("{{{}}}", name.replace('}', "\\}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_field() {
        assert_eq!(
            search_formula("claude", &["Name"]).unwrap(),
            r#"OR(FIND(LOWER("claude"), LOWER({Name})))"#
        );
    }

    #[test]
    fn test_search_is_trimmed() {
        assert_eq!(
            search_formula("  ai ", &["Category"]).unwrap(),
            r#"OR(FIND(LOWER("ai"), LOWER({Category})))"#
        );
    }

    #[test]
    fn test_escape_string() {
        assert_eq!(escape_string(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(escape_string(r"a\b"), r#""a\\b""#);
    }

    #[test]
    fn test_field_with_spaces_and_brace() {
        assert_eq!(field_ref("API Name"), "{API Name}");
        assert_eq!(field_ref("odd}name"), r"{odd\}name}");
    }

    #[test]
    fn test_no_fields() {
        let fields: [&str; 0] = [];
        assert_eq!(search_formula("x", &fields), None);
    }
}
