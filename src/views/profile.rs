use super::{format_optional_date, ViewContext};
use crate::api::contract::{RecipientByIdRoute, RecipientHistoryListRoute, RecipientHistoryRoute};
use crate::api::models::{
    GameIdQuery, HistoryDetails, HistoryEntry, HistoryListQuery, HistoryQuery, PageQuery, RecipientDetails,
    StageOutcome,
};
use crate::resource::{DetailView, FetchOutcome, ListRoute, Page, Pagination, ResourceList};
use crate::table::{Column, RenderedTable, Table};

pub const HISTORY_PAGE_SIZE: u32 = 20;

impl ListRoute for RecipientHistoryListRoute {
    type Row = HistoryEntry;
    /// Game id of the recipient
    type Scope = String;

    fn query(game_id: &String, page: PageQuery) -> HistoryListQuery {
        HistoryListQuery {
            game_id: game_id.clone(),
            page,
        }
    }

    fn into_page(output: Self::Output) -> Page<HistoryEntry> {
        Page {
            rows: output.history,
            row_count: output.row_count,
        }
    }
}

/// "Custom · facial_detection - smile"
pub fn history_type_cell(entry: &HistoryEntry) -> String {
    format!(
        "{} · {} - {}",
        if entry.is_custom { "Custom" } else { "Main" },
        entry.level_type,
        entry.subtype.as_deref().unwrap_or("")
    )
}

pub fn history_columns() -> Vec<Column<HistoryEntry>> {
    vec![
        Column::new("Game Name", |h: &HistoryEntry| h.name.clone()),
        Column::new("Type", history_type_cell),
        Column::new("Score", |h: &HistoryEntry| h.score.to_string()),
        Column::new("Date Played", |h: &HistoryEntry| {
            format_optional_date(h.start_time.as_deref(), "-")
        }),
        Column::new("History ID", |h: &HistoryEntry| h.id.clone()),
    ]
}

/// One recipient: details with streak, play history and a per-session
/// details dialog
pub struct RecipientProfileView {
    game_id: String,
    details: DetailView<RecipientByIdRoute>,
    history: ResourceList<RecipientHistoryListRoute>,
    history_details: DetailView<RecipientHistoryRoute>,
    table: Table<HistoryEntry>,
}

impl RecipientProfileView {
    pub fn new(ctx: &ViewContext, game_id: impl Into<String>) -> Self {
        let game_id = game_id.into();
        Self {
            details: ctx.detail("Failed to fetch recipient details"),
            history: ctx.list(
                game_id.clone(),
                Pagination::new(HISTORY_PAGE_SIZE),
                "Failed to fetch recipient history",
            ),
            history_details: ctx.detail("Failed to fetch history details"),
            table: Table::new(history_columns()).with_empty_message("No history found."),
            game_id,
        }
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    pub fn history(&self) -> &ResourceList<RecipientHistoryListRoute> {
        &self.history
    }

    /// Details and the first history page load side by side
    pub async fn mount(&self) -> (FetchOutcome, FetchOutcome) {
        let query = GameIdQuery {
            game_id: self.game_id.clone(),
        };
        futures::join!(self.details.open(query), self.history.mount())
    }

    pub fn details(&self) -> Option<RecipientDetails> {
        self.details.data()
    }

    pub async fn open_history(&self, history_id: &str) -> FetchOutcome {
        let query = HistoryQuery {
            game_id: self.game_id.clone(),
            history_id: history_id.to_string(),
        };
        self.history_details.open(query).await
    }

    pub fn close_history(&self) {
        self.history_details.close();
    }

    pub fn history_details(&self) -> Option<HistoryDetails> {
        self.history_details.data().map(|envelope| envelope.history)
    }

    pub fn is_history_open(&self) -> bool {
        self.history_details.is_open()
    }

    pub fn render_history(&self) -> RenderedTable {
        self.table.render(&self.history.snapshot())
    }
}

pub fn render_details(details: &RecipientDetails) -> String {
    let streak = &details.streak;
    [
        format!("{} ({})", details.full_name(), details.name),
        format!("Game ID:     {}", details.game_id),
        format!("Gender:      {}", details.gender),
        format!("Birth date:  {}", format_optional_date(details.birth_date.as_deref(), "-")),
        String::new(),
        format!("Current streak:    {} days", streak.current_streak),
        format!("Longest streak:    {} days", streak.longest_streak),
        format!("Total days played: {}", streak.total_days_played),
        format!(
            "Streak started:    {}",
            format_optional_date(streak.streak_start_date.as_deref(), "-")
        ),
        format!(
            "Last activity:     {}",
            format_optional_date(streak.last_activity_date.as_deref(), "-")
        ),
    ]
    .join("\n")
}

fn stage_lines(stage: &StageOutcome) -> Vec<String> {
    let verdict = match stage.passed {
        Some(true) => "Passed",
        Some(false) => "Failed",
        None => "-",
    };
    let mut lines = vec![format!(
        "  #{} {} [{}] attempts: {}",
        stage.number.saturating_add(1),
        stage.target,
        verdict,
        stage.attempts.map_or_else(|| "-".to_string(), |a| a.to_string())
    )];
    if let Some(values) = stage.attempt_values.as_ref().filter(|v| !v.is_empty()) {
        lines.push(format!("     values: {}", values.join(", ")));
    }
    lines
}

pub fn render_history_details(details: &HistoryDetails) -> String {
    let entry = &details.entry;
    let mut lines = vec![entry.name.clone()];
    if !entry.description.is_empty() {
        lines.push(entry.description.clone());
    }
    lines.push(format!("{} Game", if entry.is_custom { "Custom" } else { "Main" }));
    lines.push(format!(
        "Type:     {} - {}",
        entry.level_type,
        entry.subtype.as_deref().unwrap_or("")
    ));
    lines.push(format!("Score:    {}", entry.score));
    lines.push(format!(
        "Started:  {}",
        format_optional_date(entry.start_time.as_deref(), "No start date")
    ));
    lines.push(format!(
        "Finished: {}",
        format_optional_date(entry.end_time.as_deref(), "Not completed")
    ));
    lines.push(String::new());

    match details.stage_info.as_deref() {
        Some(stages) if !stages.is_empty() => {
            lines.push("Stages:".to_string());
            lines.extend(stages.iter().flat_map(stage_lines));
        }
        _ => lines.push("No stage information recorded".to_string()),
    }

    lines.join("\n")
}
