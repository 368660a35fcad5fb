//! Per-request recognition pipeline.
//!
//! `Validated → Classified → StoryGenerated → TranslationGenerated → Responded`,
//! with a deterministic fallback at every AI-dependent step. The pipeline
//! always produces a complete [`RecognitionResult`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use logging::{PipelineEvent, PipelineStage, log_pipeline_event};
use snapstory_core::{DEFAULT_REQUEST_BUDGET_MS, EncodedImage, LlmProvider, RecognitionResult};
use tokio::time::timeout_at;
use tracing::{info, warn};

use crate::cascade::{CascadeOutcome, ClassifierCascade};
use crate::fallback::{WithFallback, fallback_story, fallback_translation, unidentified};
use crate::story::{TextSettings, generate_story};
use crate::translation::{Translation, generate_translation};

const BUDGET_EXHAUSTED: &str = "request budget exhausted";

pub struct RecognitionService {
    cascade: ClassifierCascade,
    text: Arc<dyn LlmProvider>,
    settings: TextSettings,
    budget: Duration,
}

impl RecognitionService {
    pub fn new(cascade: ClassifierCascade, text: Arc<dyn LlmProvider>, settings: TextSettings) -> Self {
        Self {
            cascade,
            text,
            settings,
            budget: Duration::from_millis(DEFAULT_REQUEST_BUDGET_MS),
        }
    }

    /// Deadline shared by every AI call of one request. Stages still running
    /// when it passes are replaced by their fallback.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    /// Run the pipeline for one already-validated image.
    pub async fn recognize(&self, image: &EncodedImage, request_id: &str) -> RecognitionResult {
        let started = Instant::now();
        let deadline = tokio::time::Instant::now() + self.budget;

        let outcome = match timeout_at(deadline, self.cascade.classify(&image.data, &image.mime_type)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                warn!(request_id, budget_ms = self.budget.as_millis() as u64, "Budget ran out during classification");
                CascadeOutcome { classification: None, errors: vec![BUDGET_EXHAUSTED.to_string()] }
            }
        };
        let Some(classification) = outcome.classification else {
            if outcome.had_errors() {
                log_pipeline_event(
                    request_id,
                    PipelineEvent::FallbackUsed {
                        stage: PipelineStage::Classify,
                        reason: outcome.errors.join("; "),
                    },
                );
            } else {
                log_pipeline_event(request_id, PipelineEvent::Unrecognized);
            }
            let result = unidentified(outcome.had_errors());
            self.responded(request_id, &result, started);
            return result;
        };

        log_pipeline_event(
            request_id,
            PipelineEvent::Classified {
                label: classification.label.clone(),
                confidence: classification.confidence,
                source: classification.source.clone(),
            },
        );
        let label = classification.label;

        let story = match timeout_at(deadline, generate_story(self.text.as_ref(), &self.settings, &label)).await {
            Ok(story) => story,
            Err(_) => WithFallback::fallback(fallback_story(&label), BUDGET_EXHAUSTED),
        };
        if let Some(reason) = &story.fallback_reason {
            log_pipeline_event(
                request_id,
                PipelineEvent::FallbackUsed { stage: PipelineStage::Story, reason: reason.clone() },
            );
        }

        let translation = match timeout_at(
            deadline,
            generate_translation(self.text.as_ref(), &self.settings, &label, &story.value),
        )
        .await
        {
            Ok(translation) => translation,
            Err(_) => {
                let (localized_label, localized_story) = fallback_translation(&label);
                WithFallback::fallback(Translation { localized_label, localized_story }, BUDGET_EXHAUSTED)
            }
        };
        if let Some(reason) = &translation.fallback_reason {
            log_pipeline_event(
                request_id,
                PipelineEvent::FallbackUsed {
                    stage: PipelineStage::Translation,
                    reason: reason.clone(),
                },
            );
        }

        let result = RecognitionResult {
            word: label,
            degraded: story.used_fallback() || translation.used_fallback(),
            story: story.value,
            chinese_name: Some(translation.value.localized_label),
            chinese_story: Some(translation.value.localized_story),
        };
        self.responded(request_id, &result, started);
        result
    }

    fn responded(&self, request_id: &str, result: &RecognitionResult, started: Instant) {
        let elapsed_ms = started.elapsed().as_millis() as u64;
        info!(request_id, word = %result.word, degraded = result.degraded, elapsed_ms, "Recognition complete");
        log_pipeline_event(
            request_id,
            PipelineEvent::Responded {
                word: result.word.clone(),
                degraded: result.degraded,
                elapsed_ms,
            },
        );
    }
}
