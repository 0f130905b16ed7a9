use std::sync::{Mutex, MutexGuard, PoisonError};

use super::ViewContext;
use crate::api::contract::{RecipientAddRoute, RecipientListRoute, RecipientRemoveRoute};
use crate::api::models::{GameUserBody, MutationResponse, PageQuery, Recipient};
use crate::error::SubmitError;
use crate::forms::AddRecipientForm;
use crate::resource::{FetchOutcome, ListRoute, Mutation, Page, ResourceList};
use crate::table::{Column, RenderedTable, Table};

impl ListRoute for RecipientListRoute {
    type Row = Recipient;
    type Scope = ();

    fn query(_: &(), page: PageQuery) -> PageQuery {
        page
    }

    fn into_page(output: Self::Output) -> Page<Recipient> {
        Page {
            rows: output.recipients,
            row_count: output.row_count,
        }
    }
}

pub fn recipient_columns() -> Vec<Column<Recipient>> {
    vec![
        Column::new("Name", |r: &Recipient| r.name.clone()),
        Column::new("Full Name", Recipient::full_name),
        Column::new("Game User ID", |r: &Recipient| r.game_user_id.clone()),
    ]
}

#[derive(Debug, Default)]
struct AddDialog {
    open: bool,
    form: AddRecipientForm,
}

/// Recipients page: paginated table, add dialog and per-row removal
pub struct RecipientsView {
    list: ResourceList<RecipientListRoute>,
    add: Mutation<RecipientAddRoute>,
    remove: Mutation<RecipientRemoveRoute>,
    dialog: Mutex<AddDialog>,
    table: Table<Recipient>,
}

impl RecipientsView {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            list: ctx.list((), ctx.default_pagination(), "Failed to fetch recipients"),
            add: ctx.mutation("Recipient added successfully", "Failed to add recipient"),
            remove: ctx.mutation("Recipient removed successfully", "Failed to remove recipient"),
            dialog: Mutex::new(AddDialog::default()),
            table: Table::new(recipient_columns()).with_empty_message("No recipients found."),
        }
    }

    pub fn list(&self) -> &ResourceList<RecipientListRoute> {
        &self.list
    }

    pub async fn mount(&self) -> FetchOutcome {
        self.list.mount().await
    }

    pub fn open_add_dialog(&self) {
        self.dialog().open = true;
    }

    pub fn close_add_dialog(&self) {
        let mut dialog = self.dialog();
        dialog.open = false;
        dialog.form.reset();
    }

    pub fn is_add_dialog_open(&self) -> bool {
        self.dialog().open
    }

    pub fn set_game_user_id(&self, game_user_id: impl Into<String>) {
        self.dialog().form.game_user_id = game_user_id.into();
    }

    pub fn add_form(&self) -> AddRecipientForm {
        self.dialog().form.clone()
    }

    /// Validate the dialog's form and add the recipient. On success the form
    /// is reset, the dialog closes and the list is reloaded. Validation
    /// failures never reach the network and leave the dialog as it was.
    pub async fn submit_add(&self) -> Result<MutationResponse, SubmitError> {
        let body = self.dialog().form.validate()?;
        let response = self.add.run(body, Some(&self.list)).await?;
        self.close_add_dialog();
        Ok(response)
    }

    pub async fn remove(&self, game_user_id: &str) -> Result<MutationResponse, SubmitError> {
        let body = GameUserBody {
            game_user_id: game_user_id.to_string(),
        };
        self.remove.run(body, Some(&self.list)).await
    }

    pub fn render(&self) -> RenderedTable {
        self.table.render(&self.list.snapshot())
    }

    fn dialog(&self) -> MutexGuard<'_, AddDialog> {
        self.dialog.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
