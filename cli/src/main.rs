//! `gurubook` command-line client.
//!
//! Drives the authentication operations against a Gurubook API server and
//! prints the design tokens. Configuration comes from flags, then the
//! environment, then a `.env` file in the working directory.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use gurubook_auth::config::{ENV_API_URL, ENV_LOCALE, ENV_WAIT_TIMEOUT};
use gurubook_auth::providers::{HttpTransport, TracingNotifier};
use gurubook_auth::{AuthClient, AuthConfig, RegisterRequest};
use gurubook_theme::{Size, THEME, Viewport};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Time given to in-flight effects when the client shuts down.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

#[derive(Parser, Debug)]
#[command(name = "gurubook", version, about = "Gurubook API client")]
struct Cli {
    /// API base URL (overrides GURUBOOK_API_URL).
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Notification locale, `hy` or `en` (overrides GURUBOOK_LOCALE).
    #[arg(long, global = true)]
    locale: Option<String>,

    /// Seconds to wait for the server (overrides GURUBOOK_WAIT_TIMEOUT_SECS).
    #[arg(long, global = true)]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and print the profile.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GURUBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account and print the profile.
    Register {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "GURUBOOK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Request a password reset email.
    ResetPassword {
        #[arg(long)]
        email: String,
    },
    /// Set a new password with the token from the reset email.
    SetNewPassword {
        #[arg(long, env = "GURUBOOK_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
        #[arg(long)]
        token: String,
    },
    /// Print the design tokens as JSON.
    Theme {
        /// Print only the title scale for this viewport.
        #[arg(long, value_enum)]
        titles: Option<ViewportArg>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ViewportArg {
    Regular,
    Narrow,
}

impl From<ViewportArg> for Viewport {
    fn from(arg: ViewportArg) -> Self {
        match arg {
            ViewportArg::Regular => Self::Regular,
            ViewportArg::Narrow => Self::Narrow,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Missing .env is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gurubook=info,gurubook_auth=info,gurubook_runtime=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Command::Theme { titles } = &cli.command {
        return print_theme(*titles);
    }

    let config = load_config(&cli)?;
    let client = AuthClient::new(
        &config,
        Arc::new(HttpTransport::from_config(&config)),
        Arc::new(TracingNotifier),
    );

    let result = run(&client, cli.command).await;

    if let Err(error) = client.shutdown(SHUTDOWN_GRACE).await {
        tracing::warn!(%error, "Shutdown did not complete cleanly");
    }

    result
}

async fn run(client: &AuthClient<HttpTransport, TracingNotifier>, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { email, password } => {
            client.login(&email, &password).await.context("login failed")?;
            print_profile(client).await
        },
        Command::Register {
            first_name,
            last_name,
            email,
            password,
        } => {
            let request = RegisterRequest::new(first_name, last_name, email, password);
            client.register(request).await.context("registration failed")?;
            print_profile(client).await
        },
        Command::ResetPassword { email } => {
            let body = client
                .reset_password(&email)
                .await
                .context("password reset request failed")?;
            print_json(&body)
        },
        Command::SetNewPassword {
            new_password,
            token,
        } => {
            let body = client
                .set_new_password(&new_password, &token)
                .await
                .context("setting the new password failed")?;
            print_json(&body)
        },
        Command::Theme { titles } => print_theme(titles),
    }
}

/// Merge flag overrides over the environment.
fn load_config(cli: &Cli) -> anyhow::Result<AuthConfig> {
    let overrides = [
        (ENV_API_URL, cli.api_url.clone()),
        (ENV_LOCALE, cli.locale.clone()),
        (ENV_WAIT_TIMEOUT, cli.timeout.map(|secs| secs.to_string())),
    ];

    AuthConfig::from_lookup(|key| {
        overrides
            .iter()
            .find(|(name, _)| *name == key)
            .and_then(|(_, value)| value.clone())
            .or_else(|| std::env::var(key).ok())
    })
    .context("invalid configuration")
}

async fn print_profile(client: &AuthClient<HttpTransport, TracingNotifier>) -> anyhow::Result<()> {
    let session = client.session().await;
    print_json(&serde_json::json!({
        "isLoggedIn": session.is_logged_in,
        "profile": session.profile,
    }))
}

fn print_theme(titles: Option<ViewportArg>) -> anyhow::Result<()> {
    let Some(viewport) = titles else {
        return print_json(&THEME);
    };

    let viewport = Viewport::from(viewport);
    print_json(&serde_json::json!({
        "default": THEME.title(Size::Default, viewport),
        "big": THEME.title(Size::Big, viewport),
        "small": THEME.title(Size::Small, viewport),
    }))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
