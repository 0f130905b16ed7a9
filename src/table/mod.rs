//! Presentational table over a list snapshot.
//!
//! The renderer never fetches. It turns rows supplied by a
//! [`ResourceList`](crate::resource::ResourceList) into text and reports
//! which page controls are usable.

use serde::Serialize;

use crate::resource::{ListSnapshot, Pagination};

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const DEFAULT_EMPTY_MESSAGE: &str = "No results.";

pub struct Column<T> {
    pub header: String,
    cell: Box<dyn Fn(&T) -> String + Send + Sync>,
}

impl<T> Column<T> {
    pub fn new(header: impl Into<String>, cell: impl Fn(&T) -> String + Send + Sync + 'static) -> Self {
        Self {
            header: header.into(),
            cell: Box::new(cell),
        }
    }

    pub fn cell(&self, row: &T) -> String {
        (self.cell)(row)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageControls {
    pub previous_enabled: bool,
    pub next_enabled: bool,
}

impl PageControls {
    pub fn for_page(pagination: &Pagination, row_count: u64) -> Self {
        Self {
            previous_enabled: pagination.can_previous(),
            next_enabled: pagination.can_next(row_count),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum TableBody {
    Rows(Vec<Vec<String>>),
    Placeholder,
    Empty(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedTable {
    pub headers: Vec<String>,
    pub body: TableBody,
    pub controls: PageControls,
    pub page: u32,
    pub page_count: u64,
    pub row_count: u64,
}

impl RenderedTable {
    /// Fixed-width text with a page footer
    pub fn to_text(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        if let TableBody::Rows(rows) = &self.body {
            for row in rows {
                for (width, cell) in widths.iter_mut().zip(row) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut lines = vec![format_row(&self.headers, &widths)];
        lines.push(
            widths
                .iter()
                .map(|w| "-".repeat(*w))
                .collect::<Vec<_>>()
                .join("-+-"),
        );

        match &self.body {
            TableBody::Rows(rows) => lines.extend(rows.iter().map(|row| format_row(row, &widths))),
            TableBody::Placeholder => lines.push(LOADING_PLACEHOLDER.to_string()),
            TableBody::Empty(message) => lines.push(message.clone()),
        }

        lines.push(String::new());
        lines.push(format!(
            "Page {} of {} ({} rows){}{}",
            self.page,
            self.page_count,
            self.row_count,
            if self.controls.previous_enabled { "  [prev]" } else { "" },
            if self.controls.next_enabled { "  [next]" } else { "" },
        ));
        lines.join("\n")
    }
}

fn format_row(cells: &[String], widths: &[usize]) -> String {
    cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
        .collect::<Vec<_>>()
        .join(" | ")
        .trim_end()
        .to_string()
}

pub struct Table<T> {
    columns: Vec<Column<T>>,
    empty_message: String,
}

impl<T> Table<T> {
    pub fn new(columns: Vec<Column<T>>) -> Self {
        Self {
            columns,
            empty_message: DEFAULT_EMPTY_MESSAGE.to_string(),
        }
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    pub fn controls(&self, snapshot: &ListSnapshot<T>) -> PageControls {
        PageControls::for_page(&snapshot.pagination, snapshot.row_count)
    }

    /// Rows win over the placeholder: a refetch keeps the previous page on
    /// screen until the new one lands.
    pub fn render(&self, snapshot: &ListSnapshot<T>) -> RenderedTable {
        self.render_rows(&snapshot.rows, snapshot.row_count, &snapshot.pagination, snapshot.loading)
    }

    pub fn render_rows(&self, rows: &[T], row_count: u64, pagination: &Pagination, loading: bool) -> RenderedTable {
        let body = if !rows.is_empty() {
            TableBody::Rows(
                rows.iter()
                    .map(|row| self.columns.iter().map(|c| c.cell(row)).collect())
                    .collect(),
            )
        } else if loading {
            TableBody::Placeholder
        } else {
            TableBody::Empty(self.empty_message.clone())
        };

        RenderedTable {
            headers: self.headers(),
            body,
            controls: PageControls::for_page(pagination, row_count),
            page: pagination.page_index + 1,
            page_count: pagination.page_count(row_count),
            row_count,
        }
    }
}
