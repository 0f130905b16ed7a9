use super::ViewContext;
use crate::api::contract::RecipientCountRoute;
use crate::api::models::Empty;
use crate::resource::{DetailView, FetchOutcome};

/// Dashboard landing page: the total recipient count, fetched on mount
pub struct HomeView {
    count: DetailView<RecipientCountRoute>,
}

impl HomeView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            count: ctx.detail("Failed to fetch recipient count"),
        }
    }

    pub async fn mount(&self) -> FetchOutcome {
        self.count.open(Empty {}).await
    }

    pub fn recipient_count(&self) -> Option<u64> {
        self.count.data().map(|c| c.count)
    }

    pub fn is_loading(&self) -> bool {
        self.count.is_loading()
    }

    pub fn render(&self) -> String {
        match self.recipient_count() {
            Some(count) => format!("Total recipients: {}", count),
            None if self.is_loading() => "Total recipients: ...".to_string(),
            None => "Total recipients: -".to_string(),
        }
    }
}
