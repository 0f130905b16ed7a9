use std::sync::{Mutex, MutexGuard, PoisonError};

use super::notify::SharedNotifier;
use super::FetchOutcome;
use crate::api::client::{FetchClient, RequestOptions};
use crate::api::contract::Route;

struct DetailState<T> {
    open: bool,
    loading: bool,
    data: Option<T>,
    generation: u64,
}

/// Dialog-scoped record fetched by id.
///
/// Opening always fetches; closing drops whatever was loaded. A response
/// that lands after the dialog was closed, or after it was reopened for
/// another record, is discarded.
pub struct DetailView<R: Route> {
    client: FetchClient,
    notifier: SharedNotifier,
    failure_message: String,
    state: Mutex<DetailState<R::Output>>,
}

impl<R: Route> DetailView<R> {
    pub fn new(client: FetchClient, notifier: SharedNotifier, failure_message: impl Into<String>) -> Self {
        Self {
            client,
            notifier,
            failure_message: failure_message.into(),
            state: Mutex::new(DetailState {
                open: false,
                loading: false,
                data: None,
                generation: 0,
            }),
        }
    }

    pub async fn open(&self, query: R::Query) -> FetchOutcome {
        let generation = {
            let mut state = self.lock();
            state.generation += 1;
            state.open = true;
            state.loading = true;
            state.data = None;
            state.generation
        };

        let result = self.client.request::<R>(RequestOptions::with_query(query)).await;

        let mut state = self.lock();
        if !state.open || state.generation != generation {
            tracing::debug!(route = %R::key(), "discarding detail response for a closed dialog");
            return FetchOutcome::Superseded;
        }
        state.loading = false;

        match result {
            Ok(output) => {
                state.data = Some(output);
                FetchOutcome::Applied
            }
            Err(err) => {
                drop(state);
                self.notifier.error(&self.failure_message);
                FetchOutcome::Failed(err)
            }
        }
    }

    pub fn close(&self) {
        let mut state = self.lock();
        state.generation += 1;
        state.open = false;
        state.loading = false;
        state.data = None;
    }

    pub fn is_open(&self) -> bool {
        self.lock().open
    }

    pub fn is_loading(&self) -> bool {
        self.lock().loading
    }

    pub fn data(&self) -> Option<R::Output>
    where
        R::Output: Clone,
    {
        self.lock().data.clone()
    }

    fn lock(&self) -> MutexGuard<'_, DetailState<R::Output>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
