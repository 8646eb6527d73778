//! Column descriptors

use std::fmt;
use std::sync::Arc;

use crate::model::Record;

/// Custom cell renderer: maps a whole record to the text shown in a cell.
pub type CellRenderer = Arc<dyn Fn(&Record) -> String + Send + Sync>;

/// Placeholder shown for missing or null cells.
pub const EMPTY_CELL: &str = "—";

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Right,
    Center,
}

/// Static description of one displayed field.
///
/// # Example
///
/// ```
/// use airgrid_lib::table::{Align, Column};
///
/// let columns = vec![
///     Column::new("name", "Name").sortable(),
///     Column::new("price", "Price")
///         .sortable()
///         .align(Align::Right)
///         .render(|r| match r.get_f64("price") {
///             Ok(Some(p)) => format!("${p:.2}"),
///             _ => "—".to_string(),
///         }),
/// ];
/// ```
#[derive(Clone)]
pub struct Column {
    key: String,
    header: String,
    sortable: bool,
    align: Align,
    render: Option<CellRenderer>,
}

impl Column {
    /// Creates a non-sortable, left-aligned column for field `key`.
    pub fn new(key: impl Into<String>, header: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            header: header.into(),
            sortable: false,
            align: Align::Left,
            render: None,
        }
    }

    /// Marks the column as sortable.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Sets the cell alignment.
    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    /// Sets a custom renderer.
    ///
    /// A rendered column is display-only for search: its text never
    /// contributes to matching.
    pub fn render<F>(mut self, render: F) -> Self
    where
        F: Fn(&Record) -> String + Send + Sync + 'static,
    {
        self.render = Some(Arc::new(render));
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn alignment(&self) -> Align {
        self.align
    }

    /// Returns `true` if the column has a custom renderer.
    pub fn has_renderer(&self) -> bool {
        self.render.is_some()
    }

    /// Returns the text shown for `record` in this column.
    pub fn cell_text(&self, record: &Record) -> String {
        if let Some(render) = &self.render {
            return render(record);
        }
        match record.get(&self.key) {
            Some(value) if !value.is_null() => value.to_text().into_owned(),
            _ => EMPTY_CELL.to_string(),
        }
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("sortable", &self.sortable)
            .field("align", &self.align)
            .field("render", &self.render.as_ref().map(|_| "<fn>"))
            .finish()
    }
}
