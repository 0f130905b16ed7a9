use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{matches_search, ViewContext};
use crate::api::contract::{
    CustomLevelAccessListRoute, CustomLevelAddAccessRoute, CustomLevelRemoveAccessRoute, RecipientListRoute,
};
use crate::api::models::{AccessGrantBody, AccessListQuery, AccessListUser, MutationResponse, PageQuery, Recipient};
use crate::error::SubmitError;
use crate::resource::{FetchOutcome, Identified, ListRoute, Mutation, Page, ResourceList};

impl ListRoute for CustomLevelAccessListRoute {
    type Row = AccessListUser;
    /// Custom level id
    type Scope = String;

    fn query(custom_level_id: &String, page: PageQuery) -> AccessListQuery {
        AccessListQuery {
            custom_level_id: custom_level_id.clone(),
            page,
        }
    }

    fn into_page(output: Self::Output) -> Page<AccessListUser> {
        let row_count = output.row_count.unwrap_or(output.access_list.len() as u64);
        Page {
            rows: output.access_list,
            row_count,
        }
    }
}

/// Access dialog of one custom level.
///
/// Holds the recipients that already have access and the full recipient
/// set; "available" is whoever is in the second but not the first.
pub struct AccessManager {
    custom_level_id: String,
    access: ResourceList<CustomLevelAccessListRoute>,
    recipients: ResourceList<RecipientListRoute>,
    grant: Mutation<CustomLevelAddAccessRoute>,
    revoke: Mutation<CustomLevelRemoveAccessRoute>,
    search: Mutex<String>,
    open: AtomicBool,
}

impl AccessManager {
    pub fn new(ctx: &ViewContext, custom_level_id: impl Into<String>) -> Self {
        let custom_level_id = custom_level_id.into();
        Self {
            access: ctx.list(
                custom_level_id.clone(),
                ctx.picker_pagination(),
                "Failed to fetch access list",
            ),
            recipients: ctx.list((), ctx.picker_pagination(), "Failed to fetch recipients"),
            grant: ctx.mutation("Access granted successfully", "Failed to add access"),
            revoke: ctx.mutation("Access removed successfully", "Failed to remove access"),
            search: Mutex::new(String::new()),
            open: AtomicBool::new(false),
            custom_level_id,
        }
    }

    pub fn custom_level_id(&self) -> &str {
        &self.custom_level_id
    }

    /// Open the dialog and load both columns concurrently
    pub async fn open(&self) -> (FetchOutcome, FetchOutcome) {
        self.open.store(true, Ordering::Release);
        futures::join!(self.access.mount(), self.recipients.mount())
    }

    pub fn close(&self) {
        self.open.store(false, Ordering::Release);
        self.search().clear();
    }

    pub fn is_open(&self) -> bool {
        self.open.load(Ordering::Acquire)
    }

    pub fn set_search(&self, search: impl Into<String>) {
        *self.search() = search.into();
    }

    pub fn search_text(&self) -> String {
        self.search().clone()
    }

    pub fn access_list(&self) -> Vec<AccessListUser> {
        self.access.rows()
    }

    /// Recipients without a grant, in list order
    pub fn available(&self) -> Vec<Recipient> {
        let granted: HashSet<String> = self.access.rows().iter().map(|u| u.id().to_string()).collect();
        self.recipients
            .rows()
            .into_iter()
            .filter(|r| !granted.contains(r.id()))
            .collect()
    }

    pub fn filtered_access(&self) -> Vec<AccessListUser> {
        let search = self.search_text();
        self.access_list()
            .into_iter()
            .filter(|u| matches_search(&search, &[u.name.as_str(), u.first_name.as_str(), u.last_name.as_str()]))
            .collect()
    }

    pub fn filtered_available(&self) -> Vec<Recipient> {
        let search = self.search_text();
        self.available()
            .into_iter()
            .filter(|r| matches_search(&search, &[r.name.as_str(), r.first_name.as_str(), r.last_name.as_str()]))
            .collect()
    }

    pub fn access_empty_message(&self) -> &'static str {
        if self.search_text().trim().is_empty() {
            "No users have access yet"
        } else {
            "No matching users found"
        }
    }

    pub fn available_empty_message(&self) -> &'static str {
        if self.search_text().trim().is_empty() {
            "All recipients already have access"
        } else {
            "No matching recipients found"
        }
    }

    pub async fn grant(&self, recipient_user_id: &str) -> Result<MutationResponse, SubmitError> {
        self.grant.run(self.grant_body(recipient_user_id), Some(&self.access)).await
    }

    pub async fn revoke(&self, recipient_user_id: &str) -> Result<MutationResponse, SubmitError> {
        self.revoke.run(self.grant_body(recipient_user_id), Some(&self.access)).await
    }

    fn grant_body(&self, recipient_user_id: &str) -> AccessGrantBody {
        AccessGrantBody {
            custom_level_id: self.custom_level_id.clone(),
            recipient_user_id: recipient_user_id.to_string(),
        }
    }

    fn search(&self) -> MutexGuard<'_, String> {
        self.search.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
