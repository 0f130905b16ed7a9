use std::marker::PhantomData;
use std::sync::{Mutex, MutexGuard, PoisonError};

use serde::Serialize;

use super::notify::SharedNotifier;
use super::pagination::Pagination;
use super::{FetchOutcome, Identified};
use crate::api::client::{FetchClient, RequestOptions};
use crate::api::contract::Route;
use crate::api::models::PageQuery;

/// One server-side slice of a collection
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub row_count: u64,
}

/// A paginated list route.
///
/// `Scope` carries whatever fixes the collection besides the page, such as
/// the recipient whose history is listed. Unscoped lists use `()`.
pub trait ListRoute: Route {
    type Row: Identified + Clone + Send + Sync + 'static;
    type Scope: Clone + Send + Sync + 'static;

    fn query(scope: &Self::Scope, page: PageQuery) -> Self::Query;

    fn into_page(output: Self::Output) -> Page<Self::Row>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListPhase {
    Idle,
    Loading,
    Loaded,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSnapshot<T> {
    pub rows: Vec<T>,
    pub row_count: u64,
    pub pagination: Pagination,
    pub loading: bool,
    pub phase: ListPhase,
}

impl<T: Identified> ListSnapshot<T> {
    pub fn ids(&self) -> Vec<&str> {
        self.rows.iter().map(Identified::id).collect()
    }
}

struct ListState<T> {
    rows: Vec<T>,
    row_count: u64,
    pagination: Pagination,
    phase: ListPhase,
    generation: u64,
}

/// Rows, total count and cursor of one paginated table.
///
/// Every trigger (mount, page change, refetch after a mutation) issues one
/// request for the current cursor. Each request takes a fresh generation;
/// a response whose generation is no longer the latest is dropped, so rapid
/// page changes never leave an older page on screen. A failed fetch keeps
/// the previous rows and reports through the notifier.
pub struct ResourceList<R: ListRoute> {
    client: FetchClient,
    scope: R::Scope,
    notifier: SharedNotifier,
    failure_message: String,
    state: Mutex<ListState<R::Row>>,
    _route: PhantomData<fn() -> R>,
}

impl<R: ListRoute> ResourceList<R> {
    pub fn new(
        client: FetchClient,
        scope: R::Scope,
        pagination: Pagination,
        notifier: SharedNotifier,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            client,
            scope,
            notifier,
            failure_message: failure_message.into(),
            state: Mutex::new(ListState {
                rows: Vec::new(),
                row_count: 0,
                pagination,
                phase: ListPhase::Idle,
                generation: 0,
            }),
            _route: PhantomData,
        }
    }

    /// First fetch when the view appears
    pub async fn mount(&self) -> FetchOutcome {
        self.fetch().await
    }

    /// Request the current page and apply it if it is still the latest
    pub async fn fetch(&self) -> FetchOutcome {
        let (generation, pagination) = {
            let mut state = self.lock();
            state.generation += 1;
            state.phase = ListPhase::Loading;
            (state.generation, state.pagination)
        };

        let query = R::query(&self.scope, pagination.query());
        let result = self.client.request::<R>(RequestOptions::with_query(query)).await;

        let mut state = self.lock();
        if state.generation != generation {
            tracing::debug!(
                route = %R::key(),
                generation,
                latest = state.generation,
                "discarding superseded list response"
            );
            return FetchOutcome::Superseded;
        }

        match result {
            Ok(output) => {
                let page = R::into_page(output);
                state.rows = page.rows;
                state.row_count = page.row_count;
                state.phase = ListPhase::Loaded;
                FetchOutcome::Applied
            }
            Err(err) => {
                state.phase = ListPhase::Failed;
                drop(state);
                self.notifier.error(&self.failure_message);
                FetchOutcome::Failed(err)
            }
        }
    }

    /// Move the cursor and fetch. Rows stay as they were until the new page
    /// arrives.
    pub async fn set_pagination(&self, pagination: Pagination) -> FetchOutcome {
        self.lock().pagination = pagination;
        self.fetch().await
    }

    pub async fn go_to_page(&self, page_index: u32) -> FetchOutcome {
        let pagination = self.pagination().with_index(page_index);
        self.set_pagination(pagination).await
    }

    /// `None` when already on the last page
    pub async fn next_page(&self) -> Option<FetchOutcome> {
        let next = {
            let state = self.lock();
            state.pagination.next(state.row_count)
        }?;
        Some(self.set_pagination(next).await)
    }

    /// `None` when already on the first page
    pub async fn previous_page(&self) -> Option<FetchOutcome> {
        let previous = self.pagination().previous()?;
        Some(self.set_pagination(previous).await)
    }

    pub fn snapshot(&self) -> ListSnapshot<R::Row> {
        let state = self.lock();
        ListSnapshot {
            rows: state.rows.clone(),
            row_count: state.row_count,
            pagination: state.pagination,
            loading: state.phase == ListPhase::Loading,
            phase: state.phase,
        }
    }

    pub fn rows(&self) -> Vec<R::Row> {
        self.lock().rows.clone()
    }

    pub fn row_count(&self) -> u64 {
        self.lock().row_count
    }

    pub fn pagination(&self) -> Pagination {
        self.lock().pagination
    }

    pub fn is_loading(&self) -> bool {
        self.lock().phase == ListPhase::Loading
    }

    pub fn phase(&self) -> ListPhase {
        self.lock().phase
    }

    fn lock(&self) -> MutexGuard<'_, ListState<R::Row>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<R: ListRoute> std::fmt::Debug for ResourceList<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("ResourceList")
            .field("route", &R::key())
            .field("rows", &state.rows.len())
            .field("row_count", &state.row_count)
            .field("pagination", &state.pagination)
            .field("phase", &state.phase)
            .finish()
    }
}
