//! Custom and main level screens.
//!
//! Both catalogs share one view; [`LevelCatalog`] names the routes and the
//! wording that differ between them.

use super::ViewContext;
use crate::api::contract::{
    CustomLevelByIdRoute, CustomLevelCreateRoute, CustomLevelDeleteRoute, CustomLevelListRoute, MainLevelByIdRoute,
    MainLevelCreateRoute, MainLevelDeleteRoute, MainLevelListRoute, Route,
};
use crate::api::models::{
    CustomLevelIdBody, CustomLevelIdQuery, LevelDetails, LevelSummary, MainLevelIdBody, MainLevelIdQuery,
    MutationResponse, NewLevel, PageQuery, Stage,
};
use crate::error::SubmitError;
use crate::forms::LevelDraft;
use crate::resource::{DetailView, FetchOutcome, ListRoute, Mutation, Page, ResourceList};
use crate::table::{Column, RenderedTable, Table};

impl ListRoute for CustomLevelListRoute {
    type Row = LevelSummary;
    type Scope = ();

    fn query(_: &(), page: PageQuery) -> PageQuery {
        page
    }

    fn into_page(output: Self::Output) -> Page<LevelSummary> {
        Page {
            rows: output.custom_levels,
            row_count: output.row_count,
        }
    }
}

impl ListRoute for MainLevelListRoute {
    type Row = LevelSummary;
    type Scope = ();

    fn query(_: &(), page: PageQuery) -> PageQuery {
        page
    }

    fn into_page(output: Self::Output) -> Page<LevelSummary> {
        Page {
            rows: output.main_levels,
            row_count: output.row_count,
        }
    }
}

pub trait LevelCatalog: Send + Sync + 'static {
    type List: ListRoute<Row = LevelSummary, Scope = ()>;
    type ById: Route<Output = LevelDetails>;
    type Create: Route<Body = NewLevel, Output = MutationResponse>;
    type Delete: Route<Output = MutationResponse>;

    /// Sidebar title, e.g. "Custom Games"
    const TITLE: &'static str;
    const PAGE_PATH: &'static str;
    /// Only offered in the menu of admins
    const ADMIN_ONLY: bool;
    const LIST_FAILURE: &'static str;
    const CREATE_SUCCESS: &'static str;
    const CREATE_FAILURE: &'static str;

    fn by_id_query(id: &str) -> <Self::ById as Route>::Query;

    fn delete_body(id: &str) -> <Self::Delete as Route>::Body;
}

/// Levels a recipient can only play once granted access
#[derive(Debug, Clone, Copy)]
pub struct CustomLevels;

impl LevelCatalog for CustomLevels {
    type List = CustomLevelListRoute;
    type ById = CustomLevelByIdRoute;
    type Create = CustomLevelCreateRoute;
    type Delete = CustomLevelDeleteRoute;

    const TITLE: &'static str = "Custom Games";
    const PAGE_PATH: &'static str = "/dashboard/custom-games";
    const ADMIN_ONLY: bool = false;
    const LIST_FAILURE: &'static str = "Failed to fetch custom game list";
    const CREATE_SUCCESS: &'static str = "Custom game created successfully";
    const CREATE_FAILURE: &'static str = "Failed to create custom game";

    fn by_id_query(id: &str) -> CustomLevelIdQuery {
        CustomLevelIdQuery {
            custom_level_id: id.to_string(),
        }
    }

    fn delete_body(id: &str) -> CustomLevelIdBody {
        CustomLevelIdBody {
            custom_level_id: id.to_string(),
        }
    }
}

/// Levels available to every recipient; authored by admins
#[derive(Debug, Clone, Copy)]
pub struct MainLevels;

impl LevelCatalog for MainLevels {
    type List = MainLevelListRoute;
    type ById = MainLevelByIdRoute;
    type Create = MainLevelCreateRoute;
    type Delete = MainLevelDeleteRoute;

    const TITLE: &'static str = "Main Games";
    const PAGE_PATH: &'static str = "/dashboard/main-games";
    const ADMIN_ONLY: bool = true;
    const LIST_FAILURE: &'static str = "Failed to fetch main game list";
    const CREATE_SUCCESS: &'static str = "Main game created successfully";
    const CREATE_FAILURE: &'static str = "Failed to create main game";

    fn by_id_query(id: &str) -> MainLevelIdQuery {
        MainLevelIdQuery {
            main_level_id: id.to_string(),
        }
    }

    fn delete_body(id: &str) -> MainLevelIdBody {
        MainLevelIdBody {
            main_level_id: id.to_string(),
        }
    }
}

pub fn level_columns() -> Vec<Column<LevelSummary>> {
    vec![
        Column::new("Name", |l: &LevelSummary| l.name.clone()),
        Column::new("Type", |l: &LevelSummary| l.level_type.to_string()),
        Column::new("Subtype", |l: &LevelSummary| l.subtype.clone().unwrap_or_default()),
        Column::new("Description", |l: &LevelSummary| l.description.clone()),
        Column::new("ID", |l: &LevelSummary| l.id.clone()),
    ]
}

pub struct LevelsView<C: LevelCatalog> {
    list: ResourceList<C::List>,
    details: DetailView<C::ById>,
    create: Mutation<C::Create>,
    delete: Mutation<C::Delete>,
    table: Table<LevelSummary>,
}

impl<C: LevelCatalog> LevelsView<C> {
    pub fn new(ctx: &ViewContext) -> Self {
        Self {
            list: ctx.list((), ctx.default_pagination(), C::LIST_FAILURE),
            details: ctx.detail("Failed to fetch game details"),
            create: ctx.mutation(C::CREATE_SUCCESS, C::CREATE_FAILURE),
            delete: ctx.mutation("Game removed successfully", "Failed to remove game"),
            table: Table::new(level_columns()).with_empty_message("No games found."),
        }
    }

    pub fn list(&self) -> &ResourceList<C::List> {
        &self.list
    }

    pub async fn mount(&self) -> FetchOutcome {
        self.list.mount().await
    }

    /// Open the details dialog; the level is fetched fresh every time
    pub async fn view_details(&self, id: &str) -> FetchOutcome {
        self.details.open(C::by_id_query(id)).await
    }

    pub fn close_details(&self) {
        self.details.close();
    }

    pub fn details(&self) -> Option<LevelDetails> {
        self.details.data()
    }

    pub fn is_details_open(&self) -> bool {
        self.details.is_open()
    }

    pub async fn delete(&self, id: &str) -> Result<MutationResponse, SubmitError> {
        self.delete.run(C::delete_body(id), Some(&self.list)).await
    }

    /// Validate and submit a new level. A submit while another is pending is
    /// refused before validation.
    pub async fn create(&self, draft: &LevelDraft) -> Result<MutationResponse, SubmitError> {
        if self.create.is_pending() {
            return Err(SubmitError::InFlight);
        }
        let level = draft.validate()?;
        self.create.run(level, Some(&self.list)).await
    }

    pub fn is_creating(&self) -> bool {
        self.create.is_pending()
    }

    pub fn render(&self) -> RenderedTable {
        self.table.render(&self.list.snapshot())
    }
}

pub fn render_level_details(level: &LevelDetails) -> String {
    let mut lines = vec![
        level.name.clone(),
        format!(
            "Type: {} ({}){}",
            level.level_type.label(),
            level.level_type,
            level
                .subtype
                .as_deref()
                .filter(|s| !s.is_empty())
                .map(|s| format!(" - {}", s))
                .unwrap_or_default()
        ),
    ];
    if !level.description.is_empty() {
        lines.push(level.description.clone());
    }
    lines.push(String::new());
    lines.push(format!("Stages ({}):", level.stage.len()));

    let mut stages: Vec<&Stage> = level.stage.iter().collect();
    stages.sort_by_key(|s| s.number);
    for stage in stages {
        let mut line = format!("  {}. {}", stage.number.saturating_add(1), stage.target);
        if !stage.description.is_empty() {
            line.push_str(&format!(" - {}", stage.description));
        }
        if !stage.image.is_empty() {
            line.push_str(&format!(" [{}]", stage.image));
        }
        lines.push(line);
    }
    lines.join("\n")
}
