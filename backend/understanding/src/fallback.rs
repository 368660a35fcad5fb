//! Deterministic content used when an AI step gives nothing usable.

use snapstory_core::RecognitionResult;

pub const UNKNOWN_WORD: &str = "Unknown";
pub const UNKNOWN_STORY: &str =
    "I'm sorry, I couldn't recognize this object. Let's try taking another photo!";
pub const UNKNOWN_CHINESE_NAME: &str = "未知";
pub const UNKNOWN_CHINESE_STORY: &str = "抱歉，我没能认出这个东西。让我们再拍一张照片试试吧！";

const STORY_TEMPLATE: &str =
    "Look, it's {article_label}! The {label} is here to play and learn with you today.";
const CHINESE_STORY_TEMPLATE: &str = "看，这是{label}！{label}今天来和你一起玩、一起学习。";

/// A generated value, or a fallback plus the reason one was needed.
#[derive(Debug, Clone, PartialEq)]
pub struct WithFallback<T> {
    pub value: T,
    pub fallback_reason: Option<String>,
}

impl<T> WithFallback<T> {
    pub fn generated(value: T) -> Self {
        Self { value, fallback_reason: None }
    }

    pub fn fallback(value: T, reason: impl Into<String>) -> Self {
        Self { value, fallback_reason: Some(reason.into()) }
    }

    pub fn used_fallback(&self) -> bool {
        self.fallback_reason.is_some()
    }
}

/// "apple" → "an apple", "ball" → "a ball".
pub fn with_article(label: &str) -> String {
    let starts_with_vowel = label
        .chars()
        .next()
        .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u'));
    if starts_with_vowel {
        format!("an {label}")
    } else {
        format!("a {label}")
    }
}

pub fn fallback_story(label: &str) -> String {
    STORY_TEMPLATE
        .replace("{article_label}", &with_article(label))
        .replace("{label}", label)
}

/// `(localized label, localized story)` for when translation fails.
pub fn fallback_translation(label: &str) -> (String, String) {
    (label.to_string(), CHINESE_STORY_TEMPLATE.replace("{label}", label))
}

/// The fixed payload for a photo nothing could be recognised in.
pub fn unidentified(degraded: bool) -> RecognitionResult {
    RecognitionResult {
        word: UNKNOWN_WORD.to_string(),
        story: UNKNOWN_STORY.to_string(),
        chinese_name: Some(UNKNOWN_CHINESE_NAME.to_string()),
        chinese_story: Some(UNKNOWN_CHINESE_STORY.to_string()),
        degraded,
    }
}
