use clap::Subcommand;
use serde_json::json;

use crate::api::contract::{parse_key, route_keys};
use crate::cli::config::CliContext;
use crate::cli::utils::output_details;
use crate::cli::OutputFormat;
use crate::session::gate::{classify, is_guarded, GateDecision};
use crate::session::navigation::{display_name, initials, menu_items};

#[derive(Subcommand)]
pub enum NavCommands {
    #[command(about = "Show where the gate sends a path for the current session")]
    Check {
        #[arg(help = "Path, e.g. /dashboard/recipients")]
        path: String,
        #[arg(long, conflicts_with = "anonymous", help = "Classify as a signed-in user")]
        authenticated: bool,
        #[arg(long, help = "Classify as a signed-out user")]
        anonymous: bool,
    },

    #[command(about = "Show the sidebar menu for the current user")]
    Menu,

    #[command(about = "List every route in the API contract")]
    Routes,
}

pub async fn handle(cmd: NavCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        NavCommands::Check {
            path,
            authenticated,
            anonymous,
        } => {
            let signed_in = if authenticated || anonymous {
                authenticated
            } else {
                CliContext::bootstrap(output_format.clone())?.session.is_authenticated()
            };

            let decision = classify(signed_in, &path);
            let text = match decision {
                GateDecision::Allow if !is_guarded(&path) => format!("{} -> allow (unguarded)", path),
                GateDecision::Allow => format!("{} -> allow", path),
                GateDecision::Redirect(target) => format!("{} -> redirect {}", path, target),
            };
            output_details(
                &output_format,
                &text,
                json!({
                    "path": path,
                    "authenticated": signed_in,
                    "guarded": is_guarded(&path),
                    "decision": decision,
                }),
            )
        }
        NavCommands::Menu => {
            let ctx = CliContext::bootstrap(output_format.clone())?;
            let user = ctx.session.user();
            let name = display_name(user.as_ref());
            let items = menu_items(user.as_ref());

            let mut text = vec![format!("[{}] {}", initials(&name), name)];
            text.extend(items.iter().map(|item| format!("  {:<14} {}", item.name, item.href)));
            output_details(&output_format, &text.join("\n"), json!({ "user": name, "menu": items }))
        }
        NavCommands::Routes => {
            let keys = route_keys();
            let routes: Vec<_> = keys
                .iter()
                .filter_map(|key| parse_key(key).map(|(method, path)| json!({ "key": key, "method": method.as_str(), "path": path })))
                .collect();
            output_details(&output_format, &keys.join("\n"), json!({ "routes": routes }))
        }
    }
}
