use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;

use crate::api::client::FetchClient;
use crate::cli::utils::ConsoleNotifier;
use crate::cli::OutputFormat;
use crate::config::{self, AppConfig};
use crate::resource::SharedNotifier;
use crate::session::gate::GateDecision;
use crate::session::{FileSessionStore, IdentityClient, SessionContext};
use crate::views::ViewContext;

pub const SESSION_FILE: &str = "session.json";

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("REVOICE_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME").map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("revoice").join("cli")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)
            .with_context(|| format!("failed to create config directory {}", config_dir.display()))?;
    }

    Ok(config_dir)
}

pub fn session_file() -> anyhow::Result<PathBuf> {
    Ok(get_config_dir()?.join(SESSION_FILE))
}

/// Everything a command needs: the loaded session, both HTTP clients and
/// the notifier that prints toasts to the terminal.
pub struct CliContext {
    pub config: &'static AppConfig,
    pub session: SessionContext,
    pub client: FetchClient,
    pub identity: IdentityClient,
    pub notifier: SharedNotifier,
    pub output_format: OutputFormat,
}

impl CliContext {
    /// Load the stored session from disk and wire the clients to it
    pub fn bootstrap(output_format: OutputFormat) -> anyhow::Result<Self> {
        let config = config::config();
        let store = FileSessionStore::new(session_file()?);
        let session = SessionContext::new(Arc::new(store), &config.session);

        let loaded = session.load().context("failed to read stored session")?;
        tracing::debug!(authenticated = loaded, base_url = %config.api.base_url, "cli session loaded");

        let client = FetchClient::new(&config.api, session.clone())?;
        let identity = IdentityClient::new(&config.api, session.clone())?;

        Ok(Self {
            config,
            session,
            client,
            identity,
            notifier: Arc::new(ConsoleNotifier::new(output_format.clone())),
            output_format,
        })
    }

    pub fn views(&self) -> ViewContext {
        ViewContext::new(self.client.clone(), self.notifier.clone(), self.config.pagination.clone())
    }

    /// View context whose lists use `limit` rows per page
    pub fn views_with_page_size(&self, limit: Option<u32>) -> ViewContext {
        let mut views = self.views();
        if let Some(limit) = limit.filter(|l| *l > 0) {
            views.pagination.default_page_size = limit;
        }
        views
    }

    /// Run the session gate for a dashboard page before showing it
    pub fn require_page(&self, path: &str) -> anyhow::Result<()> {
        match self.session.gate(path) {
            GateDecision::Allow => Ok(()),
            GateDecision::Redirect(target) => Err(anyhow::anyhow!(
                "{} requires a signed-in session (redirected to {}); run `revoice auth login` first",
                path,
                target
            )),
        }
    }
}
