//! Per-resource screens assembled from the generic resource pieces.

pub mod access;
pub mod home;
pub mod levels;
pub mod profile;
pub mod recipients;

pub use access::AccessManager;
pub use home::HomeView;
pub use levels::{CustomLevels, LevelCatalog, LevelsView, MainLevels};
pub use profile::RecipientProfileView;
pub use recipients::RecipientsView;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::api::client::FetchClient;
use crate::api::contract::Route;
use crate::config::PaginationConfig;
use crate::resource::{
    DetailView, ListRoute, Mutation, MutationMessages, Pagination, ResourceList, SharedNotifier,
};

/// Dependencies every view is built from
#[derive(Clone)]
pub struct ViewContext {
    pub client: FetchClient,
    pub notifier: SharedNotifier,
    pub pagination: PaginationConfig,
}

impl ViewContext {
    pub fn new(client: FetchClient, notifier: SharedNotifier, pagination: PaginationConfig) -> Self {
        Self {
            client,
            notifier,
            pagination,
        }
    }

    pub fn default_pagination(&self) -> Pagination {
        Pagination::new(self.pagination.default_page_size)
    }

    /// Page 1 with the picker limit, for dialogs that want the whole set
    pub fn picker_pagination(&self) -> Pagination {
        Pagination::new(self.pagination.picker_limit)
    }

    pub fn list<R: ListRoute>(&self, scope: R::Scope, pagination: Pagination, failure: &str) -> ResourceList<R> {
        ResourceList::new(self.client.clone(), scope, pagination, self.notifier.clone(), failure)
    }

    pub fn detail<R: Route>(&self, failure: &str) -> DetailView<R> {
        DetailView::new(self.client.clone(), self.notifier.clone(), failure)
    }

    pub fn mutation<R: Route>(&self, success: &str, failure: &str) -> Mutation<R> {
        Mutation::new(
            self.client.clone(),
            self.notifier.clone(),
            MutationMessages::new(success, failure),
        )
    }
}

impl std::fmt::Debug for ViewContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewContext")
            .field("base_url", &self.client.base_url().as_str())
            .field("pagination", &self.pagination)
            .finish()
    }
}

/// Calendar date of a backend timestamp. Unparseable input is shown as is.
pub fn format_date(value: &str) -> String {
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return datetime.date_naive().to_string();
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f") {
        return datetime.date().to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return date.to_string();
    }
    value.to_string()
}

pub fn format_optional_date(value: Option<&str>, missing: &str) -> String {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(value) => format_date(value),
        None => missing.to_string(),
    }
}

/// Case-insensitive match of a search box against any of the given fields.
/// An empty search matches everything.
pub fn matches_search(search: &str, fields: &[&str]) -> bool {
    let needle = search.trim().to_lowercase();
    needle.is_empty() || fields.iter().any(|field| field.to_lowercase().contains(&needle))
}
