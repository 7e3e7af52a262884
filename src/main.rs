use std::io::Write;

use clap::{Parser, Subcommand, ValueEnum};
use guard_console::client::http::HttpBackend;
use guard_console::config::ConsoleConfig;
use guard_console::models::auth::LoginForm;
use guard_console::render::{to_html, to_text, LocalClock, Node};
use guard_console::router::shell::{Screen, ShellExit};
use guard_console::router::PageKind;
use guard_console::services::auth::{FormOutcome, MessageArea};
use guard_console::Console;
use mimalloc::MiMalloc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "guard-console", version, about = "Terminal console for the detection backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "GUARD_API_URL")]
    api_url: Option<String>,

    /// Output format for rendered content
    #[arg(long, global = true, value_enum, default_value_t = Format::Text)]
    format: Format,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Html,
    Text,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Open a page and follow navigations until interrupted
    Watch {
        #[arg(default_value = "/index.html")]
        location: String,
        /// Log in with these credentials when the session expires
        #[arg(long)]
        email: Option<String>,
        #[arg(long, requires = "email")]
        password: Option<String>,
    },
    /// Submit the login form once
    Login {
        #[arg(long, env = "GUARD_EMAIL")]
        email: String,
        #[arg(long, env = "GUARD_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Request a password reset link
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
}

struct StdoutScreen {
    format: Format,
}

impl StdoutScreen {
    fn write(&self, nodes: &[Node]) {
        let rendered = match self.format {
            Format::Html => to_html(nodes),
            Format::Text => to_text(nodes),
        };
        let mut out = std::io::stdout().lock();
        if let Err(e) = writeln!(out, "{rendered}\n") {
            tracing::warn!(error = %e, "Failed to write to stdout");
        }
    }
}

impl Screen for StdoutScreen {
    fn show(&mut self, page: PageKind, content: &[Node]) {
        tracing::debug!(page = ?page, nodes = content.len(), "Rendering");
        self.write(content);
    }

    fn message(&mut self, area: &MessageArea) {
        self.write(&[area.render()]);
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "guard_console=info".into()))
        .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ConsoleConfig::from_env();
    if let Some(api_url) = cli.api_url {
        config.api_url = api_url;
    }

    let backend = HttpBackend::new(&config)?;
    tracing::info!(api = %backend.base_url(), "Starting guard console");

    if let Command::Watch { email, password, .. } = &cli.command {
        config.email = email.clone().or(config.email.take());
        config.password = password.clone().or(config.password.take());
    }

    let console = Console::new(config, backend);
    let mut screen = StdoutScreen { format: cli.format };

    match cli.command {
        Command::Watch { location, .. } => {
            let shell = console.into_shell(LocalClock::system());
            let shutdown = async {
                if let Err(e) = tokio::signal::ctrl_c().await {
                    tracing::error!(error = %e, "Failed to listen for ctrl-c");
                }
            };
            match shell.run(&location, &mut screen, shutdown).await {
                ShellExit::Shutdown => tracing::info!("Shutting down"),
                ShellExit::Unroutable(location) => {
                    tracing::info!(location = %location, "Nothing to show on this page")
                }
                ShellExit::LoginRequired => {
                    anyhow::bail!("Session expired; set GUARD_EMAIL and GUARD_PASSWORD to log in")
                }
                ShellExit::LoginRejected(reason) => anyhow::bail!("Login failed: {reason}"),
                ShellExit::NavigationLimit => anyhow::bail!("Too many navigations"),
            }
        }
        Command::Login { email, password } => {
            let mut forms = console.auth_forms();
            let outcome = forms.submit_login(&LoginForm::new(email, password)).await;
            if let FormOutcome::Redirected(to) = outcome {
                tracing::info!(location = %to, "Logged in");
            } else {
                screen.message(forms.message());
                anyhow::bail!("{}", forms.message().text);
            }
        }
        Command::ForgotPassword { email } => {
            let mut forms = console.auth_forms();
            forms.submit_forgot_password(&email).await;
            screen.message(forms.message());
            if forms.message().is_error() {
                anyhow::bail!("{}", forms.message().text);
            }
        }
    }

    Ok(())
}
