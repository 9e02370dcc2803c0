use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gitblit_mcp::client::GitblitClient;
use gitblit_mcp::config::Config;
use gitblit_mcp::mcp;

#[derive(Parser)]
#[command(name = "gitblit-mcp")]
#[command(about = "MCP server exposing Gitblit repository browsing and search tools")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the MCP server via stdio (for AI assistant integration)
    Mcp,
    /// Validate configuration and check that the backend is reachable
    Check,
}

/// Initialize tracing with output to stderr (for MCP mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "gitblit_mcp=info".into()),
    );

    if use_stderr {
        // MCP mode: log to stderr so stdout is clean for the protocol
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Only `check` talks to a human on stdout; everything else serves the protocol there
    let use_stderr = !matches!(cli.command, Some(Commands::Check));
    init_tracing(use_stderr);

    // Configuration errors are fatal before any request is served
    let config = Config::from_env()?;

    match cli.command {
        Some(Commands::Check) => {
            let client = GitblitClient::from_config(&config)?;
            let response = client.list_repos(None, 1, 0).await?;
            println!(
                "Backend OK: {} ({} repositories)",
                config.api_base_url(),
                response.total_count
            );
        }
        Some(Commands::Mcp) | None => {
            mcp::run_stdio_server(&config).await?;
        }
    }

    Ok(())
}
