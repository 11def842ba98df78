use std::io::Write;
use std::net::SocketAddr;
use std::process;

use clap::{Parser, Subcommand};
use comfy_table::{modifiers, presets, ContentArrangement, Table};
use terminal_size::{terminal_size, Width};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use psm::config::{self, DEFAULT_MODULE};
use psm::modules;
use psm::routes::build_router;
use psm::state::AppState;
use psm::update::{self, Version};

fn build_state_from_env(env_file: Option<&str>) -> AppState {
    config::load_env_file(env_file);
    match AppState::from_env() {
        Ok(state) => state,
        Err(e) => {
            tracing::error!(%e, "Failed to load application state");
            eprintln!("{}: {}", yansi::Paint::new("Failed to start").red(), e);
            process::exit(1);
        }
    }
}

async fn start_server(state: AppState, host: &str, port: u16) {
    let addr: SocketAddr = match format!("{}:{}", host, port).parse() {
        Ok(a) => a,
        Err(e) => {
            tracing::error!(%e, "Invalid host/port format");
            eprintln!("{}: {}", yansi::Paint::new("Invalid host/port format").red(), e);
            process::exit(1);
        }
    };

    update::spawn_background_checks(state.updates.clone(), state.db.clone());

    let app = build_router(state);
    tracing::info!(%addr, "Starting server monitor web front");
    println!(
        "{} {}",
        yansi::Paint::new("Web server running on").green(),
        yansi::Paint::new(format!("http://{}", addr)).cyan()
    );
    match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(%e, "Server encountered an error while running");
                eprintln!("{}: {}", yansi::Paint::new("Server error").red(), e);
                process::exit(1);
            }
        }
        Err(e) => {
            tracing::error!(%e, "Failed to bind to address; is the port already in use?");
            eprintln!(
                "{}: {}\n{}",
                yansi::Paint::new(format!("Failed to bind to {}", addr)).red(),
                e,
                yansi::Paint::new("Stop the process using this port, or pass a different --port.").yellow()
            );
            process::exit(1);
        }
    }
}

fn render_page(state: &AppState, kind: &str, message: Option<String>, no_footer: bool) {
    let mut module = match modules::build(kind, &state.module_context(kind)) {
        Ok(Some(m)) => m,
        Ok(None) => {
            eprintln!(
                "{} '{}'; {} {}",
                yansi::Paint::new("Unknown module").red(),
                kind,
                yansi::Paint::new("available:").yellow(),
                modules::MODULE_TYPES.join(", ")
            );
            process::exit(1);
        }
        Err(e) => {
            eprintln!("{}: {}", yansi::Paint::new("Failed to set up module").red(), e);
            process::exit(1);
        }
    };

    if let Some(message) = message {
        module.core_mut().message = handlebars::html_escape(&message);
    }
    if no_footer {
        module.core_mut().add_footer(false);
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = module.render_to(&mut out) {
        eprintln!("{}: {}", yansi::Paint::new("Failed to render page").red(), e);
        process::exit(1);
    }
    if let Err(e) = out.flush() {
        tracing::error!(%e, "Failed to flush stdout");
        process::exit(1);
    }
}

fn print_config(state: &AppState) {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL);
    table.apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if let Some((Width(w), _)) = terminal_size() {
        table.set_width(w.saturating_sub(4));
    }

    table.set_header(vec!["Setting", "Value"]);
    for (key, value) in state.db.entries() {
        table.add_row(vec![key, value]);
    }

    println!("{}", yansi::Paint::new(state.db.path().display().to_string()).dim());
    println!("\n{table}\n");
}

async fn check_update(state: &AppState) {
    println!(
        "Checking {} for new releases...",
        yansi::Paint::new(state.updates.repository()).cyan()
    );
    match state.updates.refresh(&state.db).await {
        Ok(Some(latest)) if latest.is_newer_than(&Version::current()) => {
            println!(
                "{} {} -> {}",
                yansi::Paint::new("Update available:").green().bold(),
                Version::current(),
                latest
            );
        }
        Ok(Some(latest)) => {
            println!("You are running the latest version ({}).", latest);
        }
        Ok(None) => {
            println!("{}", yansi::Paint::new("The latest release tag is not a version number.").yellow());
        }
        Err(e) => {
            eprintln!("{}: {}", yansi::Paint::new("Update check failed").red(), e);
            process::exit(1);
        }
    }
}

#[derive(Parser)]
#[command(
    name = "psm",
    author,
    version,
    about = "Server monitor web front",
    long_about = r#"Web front of a small server and website uptime monitor.

Pages are rendered from the templates in PSM_TEMPLATE_DIR with labels from
PSM_LANG_DIR; runtime settings live in the data file PSM_DATA_FILE.

Examples:
  1) Run the web front:
      psm serve --host 127.0.0.1 --port 8080
  2) Print a page without a server:
      psm render help --no-footer
"#,
    after_help = "Use `psm <subcommand> --help` to get subcommand specific options."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
    /// Disable colorized output
    #[arg(long, global = true)]
    no_color: bool,
    /// Path to .env file
    #[arg(long, global = true)]
    env_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to (defaults to PSM_HOST)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to (defaults to PSM_PORT)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Render one module page to stdout
    Render {
        /// Module type
        #[arg(default_value = DEFAULT_MODULE)]
        kind: String,
        /// Text shown in the message area
        #[arg(long)]
        message: Option<String>,
        /// Leave the footer out
        #[arg(long)]
        no_footer: bool,
    },
    /// Ask the release server for the latest version now
    CheckUpdate,
    /// Print the stored settings
    Config,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.no_color {
        yansi::whenever(yansi::Condition::NEVER);
    }

    let state = build_state_from_env(cli.env_file.as_deref());

    match cli.command.unwrap_or(Commands::Serve { host: None, port: None }) {
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(config::get_host);
            let port = port.unwrap_or_else(config::get_port);
            start_server(state, &host, port).await;
        }
        Commands::Render {
            kind,
            message,
            no_footer,
        } => render_page(&state, &kind, message, no_footer),
        Commands::CheckUpdate => check_update(&state).await,
        Commands::Config => print_config(&state),
    }
}
