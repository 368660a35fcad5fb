//! Story generation and post-generation repair.

use std::time::Duration;

use snapstory_core::{LlmProvider, LlmRequest};
use tracing::{debug, warn};

use crate::fallback::{WithFallback, fallback_story};

/// Longest story we hand to the client, in characters.
pub const STORY_MAX_CHARS: usize = 400;

const STORY_SYSTEM_PROMPT: &str =
    "You are a warm, playful storyteller for children aged 3 to 6. Use simple words.";

const TERMINATORS: &[char] = &['.', '!', '?', '。', '！', '？', '…'];
const CLOSERS: &[char] = &['"', '\'', '”', '’', ')', '」', '』'];

/// Model parameters shared by the story and translation calls.
#[derive(Debug, Clone)]
pub struct TextSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

pub fn story_prompt(label: &str) -> String {
    format!(
        "Write a short, cheerful story (2 or 3 sentences, under 60 words) about a {label} \
         for a young child. Only output the story."
    )
}

/// Generate a story about `label`, falling back to a template on any failure.
pub async fn generate_story(
    provider: &dyn LlmProvider,
    settings: &TextSettings,
    label: &str,
) -> WithFallback<String> {
    let request = LlmRequest {
        model: settings.model.clone(),
        system_prompt: STORY_SYSTEM_PROMPT.to_string(),
        user_prompt: story_prompt(label),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    };

    let reason = match tokio::time::timeout(settings.timeout, provider.complete(&request)).await {
        Err(_) => "story generation timed out".to_string(),
        Ok(Err(e)) => format!("story generation failed: {e}"),
        Ok(Ok(response)) => {
            let story = repair_story(&strip_preamble(&response.content));
            if !story.is_empty() {
                debug!(label, chars = story.chars().count(), "Story generated");
                return WithFallback::generated(story);
            }
            "story generation returned no text".to_string()
        }
    };

    warn!(label, reason = %reason, "Using fallback story");
    WithFallback::fallback(fallback_story(label), reason)
}

/// Drop a leading "Story:" label and quotes wrapping the whole reply.
fn strip_preamble(text: &str) -> String {
    let mut text = text.trim();
    for prefix in ["Story:", "story:", "STORY:"] {
        if let Some(rest) = text.strip_prefix(prefix) {
            text = rest.trim_start();
        }
    }
    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') && text.matches('"').count() == 2 {
        text = &text[1..text.len() - 1];
    }
    text.to_string()
}

fn is_cjk(text: &str) -> bool {
    text.chars()
        .any(|c| matches!(c, '\u{4E00}'..='\u{9FFF}' | '\u{3400}'..='\u{4DBF}'))
}

fn ends_with_terminal(text: &str) -> bool {
    text.trim_end_matches(CLOSERS)
        .chars()
        .last()
        .is_some_and(|c| TERMINATORS.contains(&c))
}

/// Balance quotes and make sure the text ends like a sentence.
fn finish_sentence(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }
    let terminator = if is_cjk(text) { '。' } else { '.' };
    let mut out = text.to_string();
    let unbalanced = out.matches('"').count() % 2 == 1;
    if !ends_with_terminal(&out) {
        out.push(terminator);
    }
    if unbalanced {
        out.push('"');
    }
    out
}

/// Cut `text` to at most `budget` characters, preferring a sentence end,
/// then a word boundary.
fn cut_at_boundary(text: &str, budget: usize) -> &str {
    let prefix_end = text
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let prefix = &text[..prefix_end];

    if let Some((i, c)) = prefix.char_indices().filter(|(_, c)| TERMINATORS.contains(c)).last() {
        let mut end = i + c.len_utf8();
        for closer in prefix[end..].chars().take_while(|c| CLOSERS.contains(c)) {
            end += closer.len_utf8();
        }
        return &prefix[..end];
    }
    match prefix.rfind(char::is_whitespace) {
        Some(i) if i > 0 => &prefix[..i],
        _ => prefix,
    }
}

/// Repair a possibly truncated story.
///
/// Collapses whitespace, balances an odd `"`, adds terminal punctuation and,
/// past [`STORY_MAX_CHARS`], truncates at the last complete sentence.
/// Idempotent, and the result never exceeds the ceiling.
pub fn repair_story(text: &str) -> String {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let finished = finish_sentence(&collapsed);
    if finished.chars().count() <= STORY_MAX_CHARS {
        return finished;
    }
    // Leave room for the two characters finish_sentence may append.
    let cut = cut_at_boundary(&collapsed, STORY_MAX_CHARS - 2).trim_end();
    finish_sentence(cut)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapstory_providers::MockProvider;

    fn settings() -> TextSettings {
        TextSettings {
            model: "mock".into(),
            max_tokens: 100,
            temperature: 0.7,
            timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn appends_missing_period() {
        assert_eq!(repair_story("The apple is red"), "The apple is red.");
    }

    #[test]
    fn balances_open_quote() {
        assert_eq!(repair_story("The cat said \"meow"), "The cat said \"meow.\"");
        assert_eq!(repair_story("He said \"hi!"), "He said \"hi!\"");
    }

    #[test]
    fn leaves_complete_text_alone() {
        let text = "The dog ran. \"Woof!\" it said.";
        assert_eq!(repair_story(text), text);
        assert_eq!(repair_story("He shouted \"Go!\""), "He shouted \"Go!\"");
    }

    #[test]
    fn chinese_gets_chinese_full_stop() {
        assert_eq!(repair_story("小猫在玩"), "小猫在玩。");
    }

    #[test]
    fn long_text_cut_at_sentence_boundary() {
        let sentence = "The little apple rolled down the green hill. ";
        let text = sentence.repeat(20);
        let repaired = repair_story(&text);
        assert!(repaired.chars().count() <= STORY_MAX_CHARS);
        assert!(repaired.ends_with("hill."));
    }

    #[test]
    fn long_text_without_punctuation_cut_at_word() {
        let text = "apple ".repeat(100);
        let repaired = repair_story(&text);
        assert!(repaired.chars().count() <= STORY_MAX_CHARS);
        assert!(repaired.ends_with("apple."));
    }

    #[test]
    fn repair_is_idempotent() {
        let samples = [
            String::new(),
            "\"".to_string(),
            "A bear \"growled".to_string(),
            "Once upon a time (a cat".to_string(),
            "Fin!\"".to_string(),
            "word ".repeat(200),
            format!("{} \"and then", "A long sentence goes here. ".repeat(30)),
            "x".repeat(STORY_MAX_CHARS - 1),
            "熊猫吃竹子".repeat(100),
        ];
        for sample in samples {
            let once = repair_story(&sample);
            let twice = repair_story(&once);
            assert_eq!(once, twice, "not idempotent for {sample:?}");
            assert!(once.chars().count() <= STORY_MAX_CHARS);
        }
    }

    #[test]
    fn strips_story_label_and_wrapping_quotes() {
        assert_eq!(strip_preamble("Story: \"A duck swam.\""), "A duck swam.");
        assert_eq!(strip_preamble("\"Hi,\" said the duck. \"Bye\""), "\"Hi,\" said the duck. \"Bye\"");
    }

    #[tokio::test]
    async fn generated_story_is_repaired() {
        let provider = MockProvider::new("m").with_response("An apple sat on a table");
        let story = generate_story(&provider, &settings(), "apple").await;
        assert_eq!(story.value, "An apple sat on a table.");
        assert!(!story.used_fallback());
        assert!(provider.prompts()[0].contains("apple"));
    }

    #[tokio::test]
    async fn provider_error_uses_template() {
        let provider = MockProvider::new("m").then_fail("503 overloaded");
        let story = generate_story(&provider, &settings(), "apple").await;
        assert_eq!(story.value, fallback_story("apple"));
        assert!(story.fallback_reason.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn blank_reply_uses_template() {
        let provider = MockProvider::new("m").with_response("   ");
        let story = generate_story(&provider, &settings(), "kite").await;
        assert!(story.used_fallback());
        assert!(story.value.contains("kite"));
    }

    #[tokio::test]
    async fn slow_provider_times_out_to_template() {
        let provider = MockProvider::new("m").with_delay(Duration::from_secs(5));
        let story = generate_story(&provider, &settings(), "drum").await;
        assert_eq!(story.fallback_reason.as_deref(), Some("story generation timed out"));
    }
}
