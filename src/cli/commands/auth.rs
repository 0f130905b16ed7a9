use std::io::{self, BufRead, Write};

use clap::Subcommand;
use serde_json::json;

use crate::cli::config::CliContext;
use crate::cli::utils::{output_details, output_success, output_validation};
use crate::cli::OutputFormat;
use crate::forms::{SignInForm, SignUpForm};
use crate::session::gate::{GateDecision, SIGN_IN_PATH, SIGN_UP_PATH};
use crate::session::navigation::display_name;
use crate::session::SessionUser;

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with email and password")]
    Login {
        #[arg(help = "Email address")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
    },

    #[command(about = "Create an account")]
    Register {
        #[arg(help = "Username")]
        username: String,
        #[arg(help = "Email")]
        email: String,
        #[arg(long, help = "Password (will prompt if not provided)")]
        password: Option<String>,
        #[arg(long, help = "Password confirmation (will prompt if not provided)")]
        confirm: Option<String>,
    },

    #[command(about = "Sign out and forget the stored session")]
    Logout,

    #[command(about = "Show whether a session is stored")]
    Status,

    #[command(about = "Ask the identity service who is signed in")]
    Whoami,
}

pub async fn handle(cmd: AuthCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let ctx = CliContext::bootstrap(output_format.clone())?;

    match cmd {
        AuthCommands::Login { email, password } => {
            if let GateDecision::Redirect(_) = ctx.session.gate(SIGN_IN_PATH) {
                let user = ctx.session.user();
                return output_success(
                    &output_format,
                    &format!("Already signed in as {}", display_name(user.as_ref())),
                    Some(json!({ "user": user })),
                );
            }

            let form = SignInForm {
                email,
                password: match password {
                    Some(password) => password,
                    None => prompt("Password")?,
                },
            };
            if let Err(errors) = form.validate() {
                output_validation(&output_format, &errors)?;
                anyhow::bail!("sign-in form is invalid");
            }

            let user = ctx.identity.sign_in(form.email.trim(), &form.password).await?;
            output_success(
                &output_format,
                &format!("Signed in as {}", display_name(Some(&user))),
                Some(json!({ "user": user })),
            )
        }
        AuthCommands::Register {
            username,
            email,
            password,
            confirm,
        } => {
            if let GateDecision::Redirect(_) = ctx.session.gate(SIGN_UP_PATH) {
                anyhow::bail!("already signed in; run `revoice auth logout` first");
            }

            let password = match password {
                Some(password) => password,
                None => prompt("Password")?,
            };
            let confirm_password = match confirm {
                Some(confirm) => confirm,
                None => prompt("Confirm Password")?,
            };
            let form = SignUpForm {
                username,
                email,
                password,
                confirm_password,
            };
            if let Err(errors) = form.validate() {
                output_validation(&output_format, &errors)?;
                anyhow::bail!("sign-up form is invalid");
            }

            let user = ctx
                .identity
                .sign_up(form.username.trim(), form.email.trim(), &form.password)
                .await?;
            let message = if ctx.session.is_authenticated() {
                format!("Account created; signed in as {}", display_name(Some(&user)))
            } else {
                "Account created; sign in to continue".to_string()
            };
            output_success(&output_format, &message, Some(json!({ "user": user })))
        }
        AuthCommands::Logout => {
            if !ctx.session.is_authenticated() {
                return output_success(&output_format, "Not signed in", None);
            }
            if let Err(e) = ctx.identity.sign_out().await {
                tracing::warn!(error = %e, "remote sign-out failed; local session cleared anyway");
            }
            output_success(&output_format, "Signed out", None)
        }
        AuthCommands::Status => {
            let user = ctx.session.user();
            output_details(
                &output_format,
                &format!(
                    "Session: {:?}\nUser:    {}\nAPI:     {}",
                    ctx.session.phase(),
                    display_name(user.as_ref()),
                    ctx.client.base_url()
                ),
                json!({
                    "phase": format!("{:?}", ctx.session.phase()).to_lowercase(),
                    "authenticated": ctx.session.is_authenticated(),
                    "user": user,
                    "api": ctx.client.base_url().as_str(),
                }),
            )
        }
        AuthCommands::Whoami => {
            let Some(active) = ctx.identity.get_session().await? else {
                anyhow::bail!("not signed in");
            };
            let mut data = json!({ "user": active.user });
            if crate::is_development!() {
                data["session"] = serde_json::to_value(&active.session)?;
            }
            output_details(&output_format, &render_user(&active.user), data)
        }
    }
}

fn render_user(user: &SessionUser) -> String {
    let mut lines = vec![
        format!("Name:     {}", display_name(Some(user))),
        format!("Email:    {}", user.email),
        format!("Role:     {}", user.role.as_deref().unwrap_or("-")),
        format!("Verified: {}", if user.email_verified { "yes" } else { "no" }),
    ];
    if let Some(created_at) = &user.created_at {
        lines.push(format!("Joined:   {}", crate::views::format_date(created_at)));
    }
    lines.join("\n")
}

fn prompt(label: &str) -> anyhow::Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(|c: char| c == '\r' || c == '\n').to_string())
}
