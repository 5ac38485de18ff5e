//! Terminal rendering of conversation snapshots.
//!
//! Everything here is a pure function of its input, so the same snapshot
//! always renders to the same text.

use std::fmt::Write as _;

use owo_colors::OwoColorize;
use toolchat_core::Message;
use toolchat_http::{HealthStatus, ToolCatalog};
use toolchat_proto::ToolCallRecord;

/// Gutter drawn in front of every rendered line.
pub const BAR_CHAR: &str = "▎";

/// Shown before the first turn.
pub const EMPTY_STATE_HINT: &str = r#"Start a conversation. Try asking: "What's the time?", "Calculate 25*4", or "Weather in Chennai""#;

/// Renders one transcript entry.
///
/// User messages render to `None`, since the terminal already shows what
/// the user typed.
pub fn render_message(msg: &Message) -> Option<String> {
    match msg {
        Message::User { .. } => None,
        Message::Assistant { text } => Some(format!(
            "{}🤖 {}",
            BAR_CHAR.bright_cyan(),
            text.bright_white()
        )),
        Message::ToolCalls { calls } => {
            let mut out = String::new();
            for call in calls {
                if !out.is_empty() {
                    out.push('\n');
                }
                out.push_str(&render_tool_call(call));
            }
            Some(out)
        }
        Message::Error { text } => {
            Some(format!("{}{}", BAR_CHAR.bright_red(), text.red()))
        }
    }
}

fn render_tool_call(call: &ToolCallRecord) -> String {
    let bar = BAR_CHAR.bright_yellow();
    let status = if call.succeeded { "✅" } else { "❌" };
    format!(
        "{bar}🔧 {}\n{bar}   📥 Input: {}\n{bar}   {status} Output: {}",
        call.tool_name.bold(),
        call.input,
        call.output.dimmed(),
    )
}

/// Renders the service's health report.
pub fn render_health(health: &HealthStatus) -> String {
    let bar = if health.is_ok() {
        BAR_CHAR.bright_green().to_string()
    } else {
        BAR_CHAR.bright_red().to_string()
    };
    let mut out = format!("{bar}status: {}", health.status.bold());
    if let Some(model) = &health.model {
        write!(out, "\n{bar}model: {model}").ok();
    }
    write!(out, "\n{bar}tools: {}", health.total_tools).ok();
    out
}

/// Renders the tool catalog, one category per line.
pub fn render_catalog(catalog: &ToolCatalog) -> String {
    let bar = BAR_CHAR.bright_blue();
    let mut lines = Vec::with_capacity(catalog.len());
    for (category, tools) in catalog {
        lines.push(format!(
            "{bar}{} ({}): {}",
            category.bold(),
            tools.len(),
            tools.join(", ")
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_messages_are_not_echoed() {
        let msg = Message::User {
            text: "hello".to_owned(),
        };
        assert_eq!(render_message(&msg), None);
    }

    #[test]
    fn test_assistant_and_error() {
        let msg = Message::Assistant {
            text: "It is 3 PM".to_owned(),
        };
        assert!(render_message(&msg).unwrap().contains("It is 3 PM"));

        let msg = Message::Error {
            text: "Network error: refused".to_owned(),
        };
        assert!(
            render_message(&msg)
                .unwrap()
                .contains("Network error: refused")
        );
    }

    #[test]
    fn test_tool_calls_in_order() {
        let msg = Message::ToolCalls {
            calls: vec![
                ToolCallRecord {
                    tool_name: "calculator".to_owned(),
                    input: "25*4".to_owned(),
                    output: "100".to_owned(),
                    succeeded: true,
                },
                ToolCallRecord {
                    tool_name: "get_weather".to_owned(),
                    input: "Atlantis".to_owned(),
                    output: "City not found".to_owned(),
                    succeeded: false,
                },
            ],
        };
        let out = render_message(&msg).unwrap();
        assert_eq!(out.lines().count(), 6);

        let calculator = out.find("calculator").unwrap();
        let weather = out.find("get_weather").unwrap();
        assert!(calculator < weather);
        assert!(out.contains("✅"));
        assert!(out.contains("❌"));
        assert!(out.contains("City not found"));
    }

    #[test]
    fn test_catalog() {
        let mut catalog = ToolCatalog::new();
        catalog.insert("Math".to_owned(), vec!["calculator".to_owned()]);
        catalog.insert(
            "Random/Fun".to_owned(),
            vec!["roll_dice".to_owned(), "flip_coin".to_owned()],
        );
        let out = render_catalog(&catalog);
        assert_eq!(out.lines().count(), 2);
        assert!(out.contains("roll_dice, flip_coin"));
    }
}
