use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;

use super::list::{ListRoute, ResourceList};
use super::notify::SharedNotifier;
use crate::api::client::{FetchClient, RequestOptions};
use crate::api::contract::Route;
use crate::error::SubmitError;

/// Anything a mutation can ask to reload after it succeeds
#[async_trait]
pub trait Refetch: Send + Sync {
    async fn refetch(&self);
}

#[async_trait]
impl<R: ListRoute> Refetch for ResourceList<R> {
    async fn refetch(&self) {
        self.fetch().await;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationMessages {
    pub success: String,
    pub failure: String,
}

impl MutationMessages {
    pub fn new(success: impl Into<String>, failure: impl Into<String>) -> Self {
        Self {
            success: success.into(),
            failure: failure.into(),
        }
    }
}

/// One create/delete/grant/revoke action.
///
/// There is no local patching: on success the owning list is reloaded in
/// full, on failure nothing changes and the failure message is shown. Only
/// one request per mutation may be pending at a time.
pub struct Mutation<R: Route> {
    client: FetchClient,
    notifier: SharedNotifier,
    messages: MutationMessages,
    pending: AtomicBool,
    _route: PhantomData<fn() -> R>,
}

impl<R: Route> Mutation<R> {
    pub fn new(client: FetchClient, notifier: SharedNotifier, messages: MutationMessages) -> Self {
        Self {
            client,
            notifier,
            messages,
            pending: AtomicBool::new(false),
            _route: PhantomData,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub async fn run(&self, body: R::Body, owner: Option<&dyn Refetch>) -> Result<R::Output, SubmitError> {
        let _guard = PendingGuard::acquire(&self.pending).ok_or(SubmitError::InFlight)?;

        match self.client.request::<R>(RequestOptions::with_body(body)).await {
            Ok(output) => {
                self.notifier.success(&self.messages.success);
                if let Some(owner) = owner {
                    owner.refetch().await;
                }
                Ok(output)
            }
            Err(err) => {
                self.notifier.error(&self.messages.failure);
                Err(SubmitError::Failed(err))
            }
        }
    }
}

/// Clears the pending flag when the request finishes or is dropped
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingGuard(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}
