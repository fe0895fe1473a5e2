//! Interactive session over stdin
//!
//! Every line is either a `:command` or a creative brief. The session keeps
//! its selections between briefs and the card state of the latest result.

use anyhow::Result;
use colored::Colorize;
use std::io::{self, BufRead, Write};
use tokio::sync::mpsc;

use super::cli::submit_cancellable;
use crate::api::{ApiClient, GenerationService};
use crate::config::Config;
use crate::interaction::{
    ClipboardSink, InteractionBoard, InteractionError, MemoryClipboard, SystemClipboard,
    SystemOpener, UrlOpener,
};
use crate::models;
use crate::render;
use crate::results::{group_queries, GroupedItem, PlatformGroup};
use crate::session::{Session, SubmitError};
use crate::theme::{self, ThemeStore};

/// A parsed input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Anything that is not a `:command`
    Brief(String),
    /// Show models, or switch to the given one
    Model(Option<String>),
    /// Show platforms, or toggle the given one
    Platform(Option<String>),
    /// Copy, open or favorite query N
    Card(CardAction, usize),
    Favs,
    /// Show the current result again with its card state
    Results,
    Health,
    Theme,
    Help,
    Quit,
    Empty,
    Invalid(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line.is_empty() {
        return Command::Empty;
    }
    let Some(rest) = line.strip_prefix(':') else {
        return Command::Brief(line.to_string());
    };

    let mut parts = rest.split_whitespace();
    let name = parts.next().unwrap_or_default().to_lowercase();
    let arg = parts.next().map(str::to_string);

    match name.as_str() {
        "model" | "m" => Command::Model(arg),
        "platform" | "p" => Command::Platform(arg),
        "copy" | "c" => card_command("copy", arg.as_deref(), CardAction::Copy),
        "open" | "o" => card_command("open", arg.as_deref(), CardAction::Open),
        "fav" | "f" => card_command("fav", arg.as_deref(), CardAction::Favorite),
        "favs" => Command::Favs,
        "results" | "r" => Command::Results,
        "health" => Command::Health,
        "theme" => Command::Theme,
        "help" | "h" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        other => Command::Invalid(format!("Unknown command :{}", other)),
    }
}

fn card_command(name: &str, arg: Option<&str>, action: CardAction) -> Command {
    match arg.map(str::parse::<usize>) {
        Some(Ok(n)) => Command::Card(action, n),
        _ => Command::Invalid(format!(":{} needs a query number", name)),
    }
}

const HELP: &str = "\
Type a creative brief and press Enter to generate queries.

  :model [id]       list models or switch model
  :platform [id]    list platforms or toggle one
  :copy N           copy query N to the clipboard
  :open N           open query N in the browser
  :fav N            toggle favorite on query N
  :favs             list favorites
  :results          show the current result again
  :health           check the generation service
  :theme            toggle light/dark theme
  :help             show this help
  :quit             exit (Ctrl+D also works)

Ctrl+C cancels a running generation, or exits at the prompt.";

/// Card-level actions of the interactive session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    Copy,
    Open,
    Favorite,
}

/// Run the interactive loop until `:quit` or end of input
pub async fn run_interactive(config: &Config, store: &ThemeStore) -> Result<()> {
    let client = ApiClient::from_config(&config.api)?;
    let mut session = Session::with_defaults(&config.defaults);
    let mut board = InteractionBoard::new(config.ui.copy_feedback());
    let stagger = config.ui.stagger();

    let mut clipboard: Box<dyn ClipboardSink> = match SystemClipboard::new() {
        Ok(clipboard) => Box::new(clipboard),
        Err(e) => {
            tracing::warn!("{}; copies stay in memory", e);
            Box::new(MemoryClipboard::default())
        }
    };

    println!("{}", "stockq interactive".bold());
    println!("{}\n", "Type :help for commands".dimmed());
    println!("{}\n", render::render_session_line(&session));

    let mut lines = spawn_line_reader(io::BufReader::new(io::stdin()));
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let line = tokio::select! {
            line = lines.recv() => line,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(input) = line else {
            println!();
            break;
        };

        match parse_command(&input) {
            Command::Empty => continue,
            Command::Quit => break,
            Command::Help => println!("{}\n", HELP),
            Command::Invalid(message) => eprintln!("{}\n", message.yellow()),
            Command::Brief(brief) => {
                session.set_brief(brief);
                match submit_cancellable(&mut session, &client).await {
                    Ok(()) => board.reset(),
                    Err(SubmitError::Cancelled) => {
                        eprintln!("{}\n", "Generation cancelled".yellow());
                        continue;
                    }
                    Err(SubmitError::EmptyBrief | SubmitError::AlreadySubmitting) => continue,
                    Err(SubmitError::Failed(message)) => {
                        eprintln!("{}\n", render::render_error(&message));
                        continue;
                    }
                }
                if let Some(response) = session.response() {
                    if let Some(notice) = session.notice() {
                        println!("{} {}\n", "✓".green(), notice);
                    }
                    println!("{}\n", render::render_analysis(&response.brief_analysis));
                    println!("{}\n", render::render_model_used(response));
                    let grouped = group_queries(&response.queries);
                    super::cli::reveal_results(&grouped, &board, stagger).await;
                }
            }
            Command::Model(None) => {
                println!("{}\n", render::render_models(Some(session.model())));
            }
            Command::Model(Some(id)) => match models::find(&id) {
                Some(model) => {
                    session.set_model(model.id);
                    println!("Model: {}\n", model.name);
                }
                None => {
                    println!("Model: {} {}\n", id, "(not in catalog)".yellow());
                    session.set_model(id);
                }
            },
            Command::Platform(None) => {
                println!("{}\n", render::render_platforms(Some(session.platforms())));
            }
            Command::Platform(Some(id)) => match session.toggle_platform(&id) {
                Ok(_) => println!("{}\n", render::render_session_line(&session)),
                Err(e) => eprintln!("{}\n", e.to_string().yellow()),
            },
            Command::Card(action, index) => {
                match run_card_action(
                    action,
                    index,
                    &session,
                    &mut board,
                    clipboard.as_mut(),
                    &SystemOpener,
                ) {
                    Ok(out) => print!("{}", out),
                    Err(message) => eprintln!("{}\n", message.yellow()),
                }
            }
            Command::Results => match session.response() {
                Some(response) => {
                    let grouped = group_queries(&response.queries);
                    print!("{}", render::render_results(&grouped, &board));
                }
                None => eprintln!("{}\n", "No results yet".yellow()),
            },
            Command::Favs => {
                let favorites = board.favorites();
                if favorites.is_empty() {
                    println!("No favorites yet\n");
                } else if let Some(response) = session.response() {
                    let grouped = group_queries(&response.queries);
                    for key in favorites {
                        if let Some(item) = grouped.item(key.index) {
                            println!("  [{}] {}", item.index, item.query.query);
                        }
                    }
                    println!();
                }
            }
            Command::Health => match client.check_health().await {
                Ok(health) => println!("{}\n", render::render_health(&health)),
                Err(e) => eprintln!("{}\n", render::render_error(&e.to_string())),
            },
            Command::Theme => match theme::toggle(store) {
                Ok(mode) => println!("Theme: {}\n", mode.as_str()),
                Err(e) => eprintln!("{}\n", e.to_string().red()),
            },
        }
    }

    println!("Goodbye!");
    Ok(())
}

/// Forward stdin lines to the async loop
///
/// Reading happens on a plain thread, so a pending read never blocks
/// runtime shutdown. The channel closes at end of input.
fn spawn_line_reader<R>(reader: R) -> mpsc::UnboundedReceiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in reader.lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// Look up card `index` of the current result and hand it to `f`
///
/// Fails with the message to show when there is no result or no such card.
fn with_card<F, R>(session: &Session, index: usize, f: F) -> Result<R, String>
where
    F: FnOnce(&GroupedItem<'_>, &PlatformGroup<'_>) -> R,
{
    let response = session.response().ok_or("No results yet")?;
    let grouped = group_queries(&response.queries);
    let found = grouped.groups().iter().find_map(|group| {
        group
            .items
            .iter()
            .find(|item| item.index == index)
            .map(|item| (item, group))
    });
    match found {
        Some((item, group)) => Ok(f(item, group)),
        None => Err(format!("No query #{}", index)),
    }
}

/// Apply a card action and return the text to print
fn run_card_action(
    action: CardAction,
    index: usize,
    session: &Session,
    board: &mut InteractionBoard,
    clipboard: &mut dyn ClipboardSink,
    opener: &dyn UrlOpener,
) -> Result<String, String> {
    with_card(session, index, |item, group| -> Result<String, InteractionError> {
        match action {
            CardAction::Copy => {
                board.copy(item, clipboard)?;
                Ok(render::render_card(item, group, board))
            }
            CardAction::Open => {
                board.open(item, opener)?;
                Ok(format!("Opened {}\n", item.query.url))
            }
            CardAction::Favorite => {
                board.toggle_favorite(&item.key());
                Ok(render::render_card(item, group, board))
            }
        }
    })?
    .map_err(|e| e.to_string())
}
