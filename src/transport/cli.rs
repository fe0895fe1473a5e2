//! CLI transport for one-shot commands

use anyhow::{Context, Result};
use colored::Colorize;
use std::time::Duration;
use tokio::time::Instant;

use crate::api::{ApiClient, GenerationService};
use crate::config::Config;
use crate::interaction::{ClipboardSink, InteractionBoard, SystemClipboard, SystemOpener};
use crate::render;
use crate::results::{group_queries, GroupedItem, GroupedResults};
use crate::session::{Session, SubmitError};
use crate::theme::{self, ThemeMode, ThemeStore};

/// Output format for commands that print service data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// Arguments of the `generate` command
#[derive(Debug, Clone, Default)]
pub struct GenerateArgs {
    pub brief: String,
    pub model: Option<String>,
    pub platforms: Vec<String>,
    pub session_id: Option<String>,
    pub format: OutputFormat,
    pub copy: Option<usize>,
    pub open: Option<usize>,
}

/// Theme subcommand actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum ThemeAction {
    #[default]
    Show,
    Toggle,
    Dark,
    Light,
}

/// Submit the session's brief, abandoning the attempt on Ctrl+C
pub async fn submit_cancellable(
    session: &mut Session,
    service: &dyn GenerationService,
) -> Result<(), SubmitError> {
    let attempt = session.begin_submit()?;
    tokio::select! {
        result = service.generate(attempt.request) => {
            session.complete(attempt.id, result).map(|_| ())
        }
        _ = tokio::signal::ctrl_c() => {
            session.cancel();
            Err(SubmitError::Cancelled)
        }
    }
}

/// Print grouped cards, revealing each one after its stagger delay
pub async fn reveal_results(
    grouped: &GroupedResults<'_>,
    board: &InteractionBoard,
    stagger: Duration,
) {
    let start = Instant::now();
    for group in grouped.groups() {
        println!("{}", render::render_group_heading(group));
        for item in &group.items {
            if let Some(at) = start.checked_add(item.reveal_delay(stagger)) {
                tokio::time::sleep_until(at).await;
            }
            print!("{}", render::render_card(item, group, board));
        }
        println!();
    }
}

/// Run the `generate` command
pub async fn run_generate(config: &Config, args: GenerateArgs) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create HTTP client")?;

    let mut session = Session::with_defaults(&config.defaults);
    session.set_brief(args.brief);
    if let Some(model) = args.model {
        session.set_model(model);
    }
    if !args.platforms.is_empty() {
        if let Some(unknown) = args
            .platforms
            .iter()
            .find(|p| !crate::platform::is_known(p))
        {
            anyhow::bail!(
                "Unknown platform: {} (run `stockq platforms` for the list)",
                unknown
            );
        }
        session.set_platforms(args.platforms);
    }
    session.set_session_id(args.session_id);

    if args.format == OutputFormat::Table && session.can_submit() {
        eprintln!("{}", "Generating queries...".cyan());
    }
    submit_cancellable(&mut session, &client).await?;

    let Some(response) = session.response() else {
        anyhow::bail!("No response recorded");
    };

    let grouped = group_queries(&response.queries);
    let copy_item = args.copy.map(|index| card(&grouped, index)).transpose()?;
    let open_item = args.open.map(|index| card(&grouped, index)).transpose()?;
    let board = InteractionBoard::new(config.ui.copy_feedback());

    match args.format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(response)?),
        OutputFormat::Table => {
            if let Some(notice) = session.notice() {
                eprintln!("{} {}", "✓".green(), notice);
            }
            println!("{}\n", render::render_analysis(&response.brief_analysis));
            println!("{}\n", render::render_model_used(response));
            reveal_results(&grouped, &board, config.ui.stagger()).await;
        }
    }

    if let Some(item) = open_item {
        board.open(item, &SystemOpener)?;
        eprintln!("Opened {}", item.query.url);
    }
    if let Some(item) = copy_item {
        copy_and_hold(item).await?;
    }

    Ok(())
}

/// Look up query `index` of a grouped result
fn card<'g, 'a>(grouped: &'g GroupedResults<'a>, index: usize) -> Result<&'g GroupedItem<'a>> {
    grouped.item(index).with_context(|| {
        format!(
            "No query #{} (this result has {} queries, numbered from 0)",
            index,
            grouped.len()
        )
    })
}

/// Copy a query and keep serving it until the clipboard is replaced
///
/// The clipboard handle lives on its own thread so Ctrl+C can end the wait.
async fn copy_and_hold(item: &GroupedItem<'_>) -> Result<()> {
    let text = item.query.query.clone();
    let (tx, rx) = tokio::sync::oneshot::channel();
    std::thread::spawn(move || {
        let result = SystemClipboard::new()
            .map(SystemClipboard::hold_until_replaced)
            .and_then(|mut clipboard| clipboard.set_text(&text));
        let _ = tx.send(result);
    });

    eprintln!(
        "Holding query #{} on the clipboard until something else is copied (Ctrl+C to stop)",
        item.index
    );
    tokio::select! {
        result = rx => {
            result.context("Clipboard thread stopped")??;
        }
        _ = tokio::signal::ctrl_c() => {}
    }
    Ok(())
}

/// Run the `health` command
pub async fn run_health(config: &Config, format: OutputFormat) -> Result<()> {
    let client = ApiClient::from_config(&config.api).context("Failed to create HTTP client")?;
    let health = client
        .check_health()
        .await
        .with_context(|| format!("Health check against {} failed", client.base_url()))?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&health)?),
        OutputFormat::Table => println!("{}", render::render_health(&health)),
    }
    Ok(())
}

/// Run the `platforms` command
pub fn run_platforms() {
    println!("{}", render::render_platforms(None));
}

/// Run the `models` command
pub fn run_models() {
    println!("{}", render::render_models(Some(crate::models::DEFAULT_MODEL)));
}

/// Run the `theme` command
pub fn run_theme(store: &ThemeStore, action: ThemeAction) -> Result<()> {
    let mode = match action {
        ThemeAction::Show => theme::current(),
        ThemeAction::Toggle => theme::toggle(store)?,
        ThemeAction::Dark => theme::set(store, ThemeMode::Dark)?,
        ThemeAction::Light => theme::set(store, ThemeMode::Light)?,
    };
    println!("Theme: {}", mode.as_str());
    Ok(())
}
