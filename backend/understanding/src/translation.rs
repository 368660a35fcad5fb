//! Simplified-Chinese name and story for a recognised object.

use once_cell::sync::Lazy;
use regex::Regex;
use snapstory_core::{LlmProvider, LlmRequest};
use tracing::{debug, warn};

use crate::fallback::{WithFallback, fallback_translation};
use crate::story::{TextSettings, repair_story};

/// `NAME: ...` / `STORY: ...`, tolerating markdown bullets, bold markers,
/// either colon style and a few label spellings models like to use.
static LINE_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[\s*\-#]*(chinese name|chinese story|name|story|中文名称|中文名|中文故事|名称|故事)[\s*]*[:：]\s*(.+?)\s*$",
    )
    .unwrap()
});

const TRANSLATION_SYSTEM_PROMPT: &str =
    "You translate children's stories into Simplified Chinese. Follow the output format exactly.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub localized_label: String,
    pub localized_story: String,
}

pub fn translation_prompt(label: &str, story: &str) -> String {
    format!(
        "Object: {label}\nStory: {story}\n\n\
         Reply with exactly two lines and nothing else:\n\
         NAME: <the object's name in Simplified Chinese>\n\
         STORY: <the story in Simplified Chinese>"
    )
}

/// Pull the two labelled lines out of a model reply.
pub fn parse_translation(reply: &str) -> Option<Translation> {
    let mut name = None;
    let mut story = None;

    for line in reply.lines() {
        let Some(caps) = LINE_PATTERN.captures(line) else {
            continue;
        };
        let key = caps[1].to_lowercase();
        let value = caps[2].trim_matches(|c: char| c == '*' || c.is_whitespace()).to_string();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "name" | "chinese name" | "中文名" | "中文名称" | "名称" => {
                name.get_or_insert(value);
            }
            _ => {
                story.get_or_insert(value);
            }
        }
    }

    Some(Translation {
        localized_label: name?,
        localized_story: repair_story(&story?),
    })
}

/// Translate `label` and `story`, falling back to templated text on any failure.
pub async fn generate_translation(
    provider: &dyn LlmProvider,
    settings: &TextSettings,
    label: &str,
    story: &str,
) -> WithFallback<Translation> {
    let request = LlmRequest {
        model: settings.model.clone(),
        system_prompt: TRANSLATION_SYSTEM_PROMPT.to_string(),
        user_prompt: translation_prompt(label, story),
        max_tokens: settings.max_tokens,
        temperature: settings.temperature,
    };

    let reason = match tokio::time::timeout(settings.timeout, provider.complete(&request)).await {
        Err(_) => "translation timed out".to_string(),
        Ok(Err(e)) => format!("translation failed: {e}"),
        Ok(Ok(response)) => match parse_translation(&response.content) {
            Some(translation) => {
                debug!(label, name = %translation.localized_label, "Translation generated");
                return WithFallback::generated(translation);
            }
            None => "translation reply did not match the NAME/STORY format".to_string(),
        },
    };

    warn!(label, reason = %reason, "Using fallback translation");
    let (localized_label, localized_story) = fallback_translation(label);
    WithFallback::fallback(Translation { localized_label, localized_story }, reason)
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapstory_providers::MockProvider;
    use std::time::Duration;

    fn settings() -> TextSettings {
        TextSettings {
            model: "mock".into(),
            max_tokens: 200,
            temperature: 0.3,
            timeout: Duration::from_millis(200),
        }
    }

    #[test]
    fn parses_ascii_format() {
        let parsed = parse_translation("NAME: 苹果\nSTORY: 一个红苹果在桌子上。").unwrap();
        assert_eq!(parsed.localized_label, "苹果");
        assert_eq!(parsed.localized_story, "一个红苹果在桌子上。");
    }

    #[test]
    fn colon_style_does_not_matter() {
        let ascii = parse_translation("Name: 小狗\nStory: 小狗在跑").unwrap();
        let full_width = parse_translation("Name： 小狗\nStory： 小狗在跑").unwrap();
        assert_eq!(ascii, full_width);
        assert_eq!(ascii.localized_story, "小狗在跑。");
    }

    #[test]
    fn tolerates_markdown_and_chatter() {
        let reply = "Sure! Here you go:\n\n**NAME:** 气球\n- **STORY:** 红色的气球飞上了天。\n";
        let parsed = parse_translation(reply).unwrap();
        assert_eq!(parsed.localized_label, "气球");
        assert_eq!(parsed.localized_story, "红色的气球飞上了天。");
    }

    #[test]
    fn missing_line_is_none() {
        assert!(parse_translation("NAME: 苹果").is_none());
        assert!(parse_translation("苹果\n一个苹果").is_none());
    }

    #[tokio::test]
    async fn unparsable_reply_falls_back() {
        let provider = MockProvider::new("m").with_response("I cannot translate that.");
        let result = generate_translation(&provider, &settings(), "apple", "An apple.").await;
        assert!(result.used_fallback());
        assert_eq!(result.value.localized_label, "apple");
        assert!(result.value.localized_story.contains("apple"));
    }

    #[tokio::test]
    async fn provider_error_falls_back() {
        let provider = MockProvider::new("m").then_fail("connection reset");
        let result = generate_translation(&provider, &settings(), "cup", "A cup.").await;
        assert!(result.fallback_reason.unwrap().contains("connection reset"));
    }

    #[tokio::test]
    async fn prompt_carries_label_and_story() {
        let provider = MockProvider::new("m").with_response("NAME: 杯子\nSTORY: 一个杯子。");
        let result = generate_translation(&provider, &settings(), "cup", "A blue cup.").await;
        assert!(!result.used_fallback());
        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("Object: cup"));
        assert!(prompt.contains("A blue cup."));
    }
}
