//! Terminal rendering for sessions and results
//!
//! Everything here returns strings so callers decide when to print; the CLI
//! uses that to stagger card reveals.

use colored::{ColoredString, Colorize};
use tabled::{settings::Style, Table, Tabled};

use crate::api::{BriefAnalysis, GenerateResponse, HealthStatus};
use crate::interaction::InteractionBoard;
use crate::models::{self, MODELS};
use crate::platform::{BadgeStyle, PlatformSelection, PLATFORMS};
use crate::results::{GroupedItem, GroupedResults, PlatformGroup};
use crate::session::{Session, SessionStatus};
use crate::theme::{self, ThemeMode};

/// Colored badge for a platform label
pub fn badge(label: &str, style: BadgeStyle) -> ColoredString {
    let text = format!(" {} ", label);
    match style {
        BadgeStyle::Getty => text.white().on_black(),
        BadgeStyle::Shutterstock => text.white().on_red(),
        BadgeStyle::Adobe => text.white().on_magenta(),
        BadgeStyle::Unsplash => text.black().on_white(),
        BadgeStyle::Pexels => text.white().on_green(),
        BadgeStyle::Neutral => text.white().on_bright_black(),
    }
}

/// De-emphasised text, tuned to the current theme
fn muted(text: &str) -> ColoredString {
    match theme::current() {
        ThemeMode::Dark => text.bright_black(),
        ThemeMode::Light => text.dimmed(),
    }
}

fn accent(text: &str) -> ColoredString {
    match theme::current() {
        ThemeMode::Dark => text.bright_magenta().bold(),
        ThemeMode::Light => text.magenta().bold(),
    }
}

#[derive(Tabled)]
struct FieldRow {
    #[tabled(rename = "Field")]
    field: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn render_analysis(analysis: &BriefAnalysis) -> String {
    let rows: Vec<FieldRow> = analysis
        .fields()
        .iter()
        .map(|(label, value)| FieldRow {
            field: label.to_string(),
            value: value.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    format!("{}\n{}", "Brief Analysis".bold(), table)
}

pub fn render_group_heading(group: &PlatformGroup<'_>) -> String {
    format!(
        "{} {}",
        group.label.bold(),
        muted(&format!("({})", group.items.len()))
    )
}

/// One result card with its current interaction state
pub fn render_card(
    item: &GroupedItem<'_>,
    group: &PlatformGroup<'_>,
    board: &InteractionBoard,
) -> String {
    let key = item.key();
    let copy = if board.is_copied(&key) {
        "✓ Copied!".green().bold()
    } else {
        muted("copy")
    };
    let favorite = if board.is_favorited(&key) {
        "♥".bright_red()
    } else {
        muted("♡")
    };
    let url = if item.query.url.is_empty() {
        muted("(no search url)")
    } else {
        item.query.url.as_str().normal()
    };

    let mut out = format!(
        "  {} {}\n",
        accent(&format!("[{}]", item.index)),
        item.query.query.bold()
    );
    if !item.query.reasoning.is_empty() {
        out.push_str(&format!("      {}\n", muted(&item.query.reasoning)));
    }
    out.push_str(&format!(
        "      {}  {}  {}\n      {}\n",
        copy,
        badge(&format!("Open in {}", group.label), group.badge),
        favorite,
        url
    ));
    out
}

pub fn render_results(grouped: &GroupedResults<'_>, board: &InteractionBoard) -> String {
    let mut out = String::new();
    for group in grouped.groups() {
        out.push_str(&render_group_heading(group));
        out.push('\n');
        for item in &group.items {
            out.push_str(&render_card(item, group, board));
        }
        out.push('\n');
    }
    out
}

pub fn render_model_used(response: &GenerateResponse) -> String {
    format!(
        "{} {}",
        muted("Generated using"),
        response.model_used.as_str().bold()
    )
}

/// Error banner shown above results
pub fn render_error(message: &str) -> String {
    format!("{} {}", " Error ".white().on_red().bold(), message.red())
}

/// One-line summary of the session's selections and status
pub fn render_session_line(session: &Session) -> String {
    let status = match session.status() {
        SessionStatus::Idle => muted("idle"),
        SessionStatus::Submitting => "generating…".cyan(),
        SessionStatus::Success => "ready".green(),
        SessionStatus::Error => "error".red(),
    };
    let platforms: Vec<String> = session
        .platforms()
        .as_slice()
        .iter()
        .map(|p| crate::platform::label_for(p).to_string())
        .collect();
    format!(
        "{} {} {} {} {} {}",
        muted("model:"),
        models::display_for(session.model()).name,
        muted("platforms:"),
        platforms.join(", "),
        muted("status:"),
        status
    )
}

#[derive(Tabled)]
struct PlatformRow {
    #[tabled(rename = "")]
    selected: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Platform")]
    name: String,
}

pub fn render_platforms(selection: Option<&PlatformSelection>) -> String {
    let rows: Vec<PlatformRow> = PLATFORMS
        .iter()
        .map(|p| PlatformRow {
            selected: if selection.is_some_and(|s| s.contains(p.id)) {
                "✓".to_string()
            } else {
                String::new()
            },
            id: p.id.to_string(),
            name: p.name.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct ModelRow {
    #[tabled(rename = "")]
    current: String,
    #[tabled(rename = "Id")]
    id: String,
    #[tabled(rename = "Model")]
    name: String,
    #[tabled(rename = "Notes")]
    description: String,
}

pub fn render_models(current: Option<&str>) -> String {
    let rows: Vec<ModelRow> = MODELS
        .iter()
        .map(|m| ModelRow {
            current: if current == Some(m.id) {
                "●".to_string()
            } else {
                String::new()
            },
            id: m.id.to_string(),
            name: m.name.to_string(),
            description: m.description.to_string(),
        })
        .collect();
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct HealthRow {
    #[tabled(rename = "Check")]
    check: String,
    #[tabled(rename = "Value")]
    value: String,
}

pub fn render_health(health: &HealthStatus) -> String {
    let yes_no = |b: bool| (if b { "yes" } else { "no" }).to_string();
    let rows = vec![
        HealthRow {
            check: "Status".to_string(),
            value: health.status.clone(),
        },
        HealthRow {
            check: "OpenAI configured".to_string(),
            value: yes_no(health.openai_configured),
        },
        HealthRow {
            check: "Anthropic configured".to_string(),
            value: yes_no(health.anthropic_configured),
        },
        HealthRow {
            check: "Google configured".to_string(),
            value: yes_no(health.google_configured),
        },
    ];
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::SearchQuery;
    use crate::results::{group_queries, CardKey};

    fn analysis() -> BriefAnalysis {
        BriefAnalysis {
            subject: "pickup truck".into(),
            setting: "mountain landscape".into(),
            lighting: "golden hour".into(),
            mood: "adventurous".into(),
            composition: "wide shot".into(),
            style: "cinematic".into(),
        }
    }

    fn queries() -> Vec<SearchQuery> {
        vec![
            SearchQuery {
                query: "pickup truck mountain sunrise".into(),
                platform: "getty".into(),
                url: "https://www.gettyimages.com/search/2/image?phrase=pickup+truck".into(),
                reasoning: "Combines subject with setting".into(),
            },
            SearchQuery {
                query: "truck dawn".into(),
                platform: "foo".into(),
                url: String::new(),
                reasoning: String::new(),
            },
        ]
    }

    #[test]
    fn test_analysis_table_lists_fields() {
        let out = render_analysis(&analysis());
        for label in ["Subject", "Setting", "Lighting", "Mood", "Composition", "Style"] {
            assert!(out.contains(label), "missing {}", label);
        }
        assert!(out.contains("golden hour"));
    }

    #[test]
    fn test_results_show_groups_and_cards() {
        let queries = queries();
        let grouped = group_queries(&queries);
        let board = InteractionBoard::default();
        let out = render_results(&grouped, &board);

        assert!(out.contains("Getty Images"));
        assert!(out.contains("pickup truck mountain sunrise"));
        assert!(out.contains("Combines subject with setting"));
        assert!(out.contains("Open in Getty Images"));
        // Unknown platform falls back to its raw id
        assert!(out.contains("Open in foo"));
        assert!(out.contains("(no search url)"));
        assert!(out.contains("[1]"));
    }

    #[test]
    fn test_card_reflects_favorite() {
        let queries = queries();
        let grouped = group_queries(&queries);
        let mut board = InteractionBoard::default();
        board.toggle_favorite(&CardKey::new("getty", 0));

        let group = &grouped.groups()[0];
        let out = render_card(&group.items[0], group, &board);
        assert!(out.contains('♥'));
    }

    #[test]
    fn test_health_table() {
        let out = render_health(&HealthStatus {
            status: "healthy".into(),
            openai_configured: true,
            anthropic_configured: false,
            google_configured: true,
        });
        assert!(out.contains("healthy"));
        assert!(out.contains("Anthropic configured"));
    }

    #[test]
    fn test_platform_table_marks_selection() {
        let selection = PlatformSelection::from_ids(["adobe"]);
        let out = render_platforms(Some(&selection));
        assert!(out.contains("Adobe Stock"));
        assert_eq!(out.matches('✓').count(), 1);
    }

    #[test]
    fn test_model_table_marks_current() {
        let out = render_models(Some("gpt-4o-mini"));
        assert!(out.contains("GPT-4o Mini"));
        assert_eq!(out.matches('●').count(), 1);
    }

    #[test]
    fn test_session_line() {
        let session = Session::new();
        let out = render_session_line(&session);
        assert!(out.contains("GPT-4o"));
        assert!(out.contains("Getty Images, Shutterstock"));
        assert!(out.contains("idle"));
    }
}
