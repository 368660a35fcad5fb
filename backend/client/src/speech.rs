//! Reading the story aloud.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use snapstory_core::RecognitionResult;
use tokio::sync::watch;
use tracing::{debug, warn};

pub const ENGLISH: &str = "en-US";
pub const CHINESE: &str = "zh-CN";

/// A speech engine. `speak` resolves once the utterance has finished.
#[async_trait]
pub trait Speaker: Send + Sync {
    async fn speak(&self, text: &str, language: &str) -> Result<()>;
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SpeechState {
    #[default]
    Idle,
    Speaking,
    Failed(String),
}

pub struct Narrator {
    speaker: Arc<dyn Speaker>,
    state: watch::Sender<SpeechState>,
}

impl Narrator {
    pub fn new(speaker: Arc<dyn Speaker>) -> Self {
        let (state, _) = watch::channel(SpeechState::Idle);
        Self { speaker, state }
    }

    pub fn subscribe(&self) -> watch::Receiver<SpeechState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SpeechState {
        self.state.borrow().clone()
    }

    /// Speak `text`, returning once it has been read out.
    pub async fn narrate(&self, text: &str, language: &str) -> Result<()> {
        if text.trim().is_empty() {
            return Ok(());
        }
        self.state.send_replace(SpeechState::Speaking);
        debug!(language, chars = text.chars().count(), "Speaking");

        match self.speaker.speak(text, language).await {
            Ok(()) => {
                self.state.send_replace(SpeechState::Idle);
                Ok(())
            }
            Err(e) => {
                warn!(language, error = %e, "Speech failed");
                self.state.send_replace(SpeechState::Failed(e.to_string()));
                Err(e)
            }
        }
    }

    /// Read the English story, then the Chinese one when present.
    pub async fn narrate_result(&self, result: &RecognitionResult) -> Result<()> {
        self.narrate(&result.story, ENGLISH).await?;
        if let Some(story) = &result.chinese_story {
            self.narrate(story, CHINESE).await?;
        }
        Ok(())
    }
}
