use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use stockq::config::Config;
use stockq::theme::{self, ThemeStore};
use stockq::transport::cli::{GenerateArgs, OutputFormat, ThemeAction};
use stockq::transport::{cli as commands, interactive};

#[derive(Parser)]
#[command(name = "stockq")]
#[command(author, about = "stockq - stock image search queries from a creative brief", long_about = None)]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), env!("STOCKQ_VERSION_SUFFIX")))]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Base URL of the generation service (overrides config and STOCKQ_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate search queries for a creative brief
    Generate {
        /// Free-text creative brief
        brief: String,

        /// Model to use (e.g., gpt-4o, claude-3-5-sonnet-20241022)
        #[arg(short, long)]
        model: Option<String>,

        /// Target platform; repeat for several (getty, shutterstock, adobe, unsplash, pexels)
        #[arg(short, long = "platform")]
        platforms: Vec<String>,

        /// Conversation id forwarded to the service
        #[arg(long)]
        session_id: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Copy query N to the clipboard
        #[arg(long, value_name = "N")]
        copy: Option<usize>,

        /// Open query N in the browser
        #[arg(long, value_name = "N")]
        open: Option<usize>,
    },

    /// Check the generation service's health
    Health {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// List the supported stock platforms
    Platforms,

    /// List the available models
    Models,

    /// Show or change the color theme
    Theme {
        #[arg(value_enum, default_value_t = ThemeAction::Show)]
        action: ThemeAction,
    },

    /// Interactive session: type briefs, copy and open results
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "stockq=debug"
    } else {
        "stockq=warn"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load_or_default();
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }
    tracing::debug!("Generation service at {}", config.api.base_url);

    let store = ThemeStore::default_location();
    if let Ok(store) = &store {
        theme::init(store);
    }

    match cli.command {
        Commands::Generate {
            brief,
            model,
            platforms,
            session_id,
            format,
            copy,
            open,
        } => {
            commands::run_generate(
                &config,
                GenerateArgs {
                    brief,
                    model,
                    platforms,
                    session_id,
                    format,
                    copy,
                    open,
                },
            )
            .await?;
        }
        Commands::Health { format } => {
            commands::run_health(&config, format).await?;
        }
        Commands::Platforms => {
            commands::run_platforms();
        }
        Commands::Models => {
            commands::run_models();
        }
        Commands::Theme { action } => {
            commands::run_theme(&store?, action)?;
        }
        Commands::Interactive => {
            interactive::run_interactive(&config, &store?).await?;
        }
    }

    Ok(())
}
