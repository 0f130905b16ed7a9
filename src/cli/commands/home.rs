use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::{output_details, require_loaded};
use crate::cli::OutputFormat;
use crate::session::gate::DASHBOARD_PATH;
use crate::views::HomeView;

pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::bootstrap(output_format.clone())?;
    ctx.require_page(DASHBOARD_PATH)?;

    let view = HomeView::new(&ctx.views());
    require_loaded(view.mount().await)?;

    output_details(
        &output_format,
        &view.render(),
        json!({ "recipientCount": view.recipient_count() }),
    )
}
