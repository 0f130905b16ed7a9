//! Generic paginated resource machinery shared by every view.
//!
//! A view is assembled from a [`ResourceList`] for its table, a
//! [`DetailView`] per dialog and a [`Mutation`] per action. None of them know
//! which resource they serve; the route types decide that.

pub mod detail;
pub mod list;
pub mod mutation;
pub mod notify;
pub mod pagination;

pub use detail::DetailView;
pub use list::{ListPhase, ListRoute, ListSnapshot, Page, ResourceList};
pub use mutation::{Mutation, MutationMessages, Refetch};
pub use notify::{LogNotifier, MemoryNotifier, Notification, NotificationLevel, Notifier, SharedNotifier};
pub use pagination::Pagination;

use crate::api::models::{AccessListUser, HistoryEntry, LevelSummary, Recipient};
use crate::error::FetchError;

/// Rows carry a stable identifier so lists can be compared across fetches
pub trait Identified {
    fn id(&self) -> &str;
}

impl Identified for Recipient {
    fn id(&self) -> &str {
        &self.game_user_id
    }
}

impl Identified for LevelSummary {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for HistoryEntry {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Identified for AccessListUser {
    fn id(&self) -> &str {
        &self.game_user_id
    }
}

/// What became of one fetch
#[derive(Debug)]
pub enum FetchOutcome {
    /// The response was applied to local state
    Applied,
    /// The request failed; prior state is kept and the user was notified
    Failed(FetchError),
    /// A newer request (or a close) overtook this one; the response was dropped
    Superseded,
}

impl FetchOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, FetchOutcome::Applied)
    }

    pub fn error(&self) -> Option<&FetchError> {
        match self {
            FetchOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    /// Turn the outcome into a `Result`, treating a superseded fetch as success
    pub fn into_result(self) -> Result<(), FetchError> {
        match self {
            FetchOutcome::Failed(err) => Err(err),
            _ => Ok(()),
        }
    }
}
