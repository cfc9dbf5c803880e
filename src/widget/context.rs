use crate::models::chat::{ MessageEntry, Role };
use once_cell::sync::Lazy;
use regex::Regex;

static THINKING_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^\W*thinking\W*$").expect("placeholder pattern is valid")
});

/// The latest completed user/assistant pair, sent along with a new query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExchangeContext {
    pub previous_user_query: String,
    pub previous_assistant_answer: String,
}

pub fn is_thinking_placeholder(text: &str) -> bool {
    THINKING_PLACEHOLDER.is_match(text.trim())
}

/// Scans the log backwards and keeps the most recent user text and the most
/// recent assistant text that is an actual answer. Pending placeholders, blank
/// entries and assistant entries preceding the first user query (the greeting)
/// never fill a slot.
pub fn extract_exchange_context(entries: &[MessageEntry]) -> ExchangeContext {
    let first_user = entries.iter().position(MessageEntry::is_user);
    let answers_a_query = |ordinal: usize| first_user.is_some_and(|u| ordinal > u);

    let mut last_user: Option<&str> = None;
    let mut last_bot: Option<&str> = None;

    for (ordinal, entry) in entries.iter().enumerate().rev() {
        if last_user.is_some() && last_bot.is_some() {
            break;
        }
        let text = entry.text.trim();
        if text.is_empty() {
            continue;
        }
        match entry.role {
            Role::User if last_user.is_none() => last_user = Some(text),
            Role::Assistant if
                last_bot.is_none() &&
                answers_a_query(ordinal) &&
                !is_thinking_placeholder(text)
            => {
                last_bot = Some(text);
            }
            _ => {}
        }
    }

    ExchangeContext {
        previous_user_query: last_user.unwrap_or_default().to_string(),
        previous_assistant_answer: last_bot.unwrap_or_default().to_string(),
    }
}
