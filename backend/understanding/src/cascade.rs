//! Primary → secondary classifier cascade.

use std::sync::Arc;
use std::time::Duration;

use snapstory_core::{CONFIDENCE_FLOOR, Classification, Classifier};
use tracing::{debug, warn};

/// What the cascade found, plus any failures on the way.
#[derive(Debug, Default)]
pub struct CascadeOutcome {
    pub classification: Option<Classification>,
    /// Errors and timeouts (not low-confidence misses) from the classifiers tried.
    pub errors: Vec<String>,
}

impl CascadeOutcome {
    pub fn had_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub struct ClassifierCascade {
    primary: Arc<dyn Classifier>,
    secondary: Option<Arc<dyn Classifier>>,
    timeout: Duration,
    confidence_floor: f32,
}

impl ClassifierCascade {
    pub fn new(primary: Arc<dyn Classifier>, timeout: Duration) -> Self {
        Self {
            primary,
            secondary: None,
            timeout,
            confidence_floor: CONFIDENCE_FLOOR,
        }
    }

    pub fn with_secondary(mut self, secondary: Arc<dyn Classifier>) -> Self {
        self.secondary = Some(secondary);
        self
    }

    pub fn with_confidence_floor(mut self, floor: f32) -> Self {
        self.confidence_floor = floor;
        self
    }

    /// Try the primary classifier, then the secondary if the primary failed or
    /// came back empty or below the confidence floor.
    pub async fn classify(&self, image: &[u8], mime_type: &str) -> CascadeOutcome {
        let mut outcome = CascadeOutcome::default();
        let chain = std::iter::once(&self.primary).chain(self.secondary.as_ref());

        for classifier in chain {
            match self.attempt(classifier.as_ref(), image, mime_type).await {
                Ok(Some(found)) => {
                    outcome.classification = Some(found);
                    break;
                }
                Ok(None) => {}
                Err(e) => outcome.errors.push(e),
            }
        }
        outcome
    }

    async fn attempt(
        &self,
        classifier: &dyn Classifier,
        image: &[u8],
        mime_type: &str,
    ) -> Result<Option<Classification>, String> {
        let name = classifier.name().to_string();
        match tokio::time::timeout(self.timeout, classifier.classify(image, mime_type)).await {
            Err(_) => {
                warn!(classifier = %name, timeout_ms = self.timeout.as_millis() as u64, "Classifier timed out");
                Err(format!("{name}: timed out"))
            }
            Ok(Err(e)) => {
                warn!(classifier = %name, error = %e, "Classifier failed");
                Err(format!("{name}: {e}"))
            }
            Ok(Ok(Some(found))) if found.label.trim().is_empty() => {
                debug!(classifier = %name, "Classifier returned a blank label");
                Ok(None)
            }
            Ok(Ok(Some(found))) if found.confidence.is_nan() || found.confidence < self.confidence_floor => {
                debug!(
                    classifier = %name,
                    label = %found.label,
                    confidence = found.confidence,
                    "Classification below confidence floor"
                );
                Ok(None)
            }
            Ok(Ok(found)) => {
                debug!(classifier = %name, found = found.is_some(), "Classifier answered");
                Ok(found)
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use anyhow::{Result, anyhow};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// A classifier with a fixed answer, for tests across the crate.
    pub(crate) struct ScriptedClassifier {
        pub name: String,
        pub answer: Result<Option<(String, f32)>, String>,
        pub delay: Option<Duration>,
        pub calls: AtomicUsize,
    }

    impl ScriptedClassifier {
        pub fn found(name: &str, label: &str, confidence: f32) -> Arc<Self> {
            Self::build(name, Ok(Some((label.into(), confidence))), None)
        }

        pub fn nothing(name: &str) -> Arc<Self> {
            Self::build(name, Ok(None), None)
        }

        pub fn failing(name: &str) -> Arc<Self> {
            Self::build(name, Err("upstream 503".into()), None)
        }

        pub fn slow(name: &str, delay: Duration) -> Arc<Self> {
            Self::build(name, Ok(Some(("owl".into(), 0.9))), Some(delay))
        }

        fn build(
            name: &str,
            answer: Result<Option<(String, f32)>, String>,
            delay: Option<Duration>,
        ) -> Arc<Self> {
            Arc::new(Self { name: name.into(), answer, delay, calls: AtomicUsize::new(0) })
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Classifier for ScriptedClassifier {
        fn name(&self) -> &str {
            &self.name
        }

        async fn classify(&self, _image: &[u8], _mime: &str) -> Result<Option<Classification>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            match &self.answer {
                Ok(found) => Ok(found.as_ref().map(|(label, confidence)| Classification {
                    label: label.clone(),
                    confidence: *confidence,
                    source: self.name.clone(),
                })),
                Err(e) => Err(anyhow!(e.clone())),
            }
        }
    }

    const TIMEOUT: Duration = Duration::from_millis(200);

    #[tokio::test]
    async fn primary_hit_skips_secondary() {
        let primary = ScriptedClassifier::found("primary", "apple", 0.8);
        let secondary = ScriptedClassifier::found("secondary", "pear", 0.9);
        let cascade = ClassifierCascade::new(primary.clone(), TIMEOUT).with_secondary(secondary.clone());

        let outcome = cascade.classify(b"img", "image/jpeg").await;
        assert_eq!(outcome.classification.as_ref().unwrap().label, "apple");
        assert_eq!(secondary.calls(), 0);
        assert!(!outcome.had_errors());
    }

    #[tokio::test]
    async fn low_confidence_falls_through_to_secondary() {
        let primary = ScriptedClassifier::found("primary", "apple", 0.05);
        let secondary = ScriptedClassifier::found("secondary", "pear", 0.9);
        let cascade = ClassifierCascade::new(primary, TIMEOUT).with_secondary(secondary);

        let found = cascade.classify(b"img", "image/jpeg").await.classification.unwrap();
        assert_eq!(found.label, "pear");
        assert_eq!(found.source, "secondary");
    }

    #[tokio::test]
    async fn primary_error_is_recorded_and_secondary_used() {
        let cascade = ClassifierCascade::new(ScriptedClassifier::failing("primary"), TIMEOUT)
            .with_secondary(ScriptedClassifier::found("secondary", "cat", 0.6));

        let outcome = cascade.classify(b"img", "image/jpeg").await;
        assert_eq!(outcome.classification.unwrap().label, "cat");
        assert_eq!(outcome.errors.len(), 1);
    }

    #[tokio::test]
    async fn both_empty_is_none_without_errors() {
        let cascade = ClassifierCascade::new(ScriptedClassifier::nothing("a"), TIMEOUT)
            .with_secondary(ScriptedClassifier::nothing("b"));

        let outcome = cascade.classify(b"img", "image/jpeg").await;
        assert!(outcome.classification.is_none());
        assert!(!outcome.had_errors());
    }

    #[tokio::test]
    async fn timeout_counts_as_error() {
        let cascade = ClassifierCascade::new(
            ScriptedClassifier::slow("primary", Duration::from_secs(5)),
            Duration::from_millis(20),
        );

        let outcome = cascade.classify(b"img", "image/jpeg").await;
        assert!(outcome.classification.is_none());
        assert!(outcome.errors[0].contains("timed out"));
    }

    #[tokio::test]
    async fn blank_label_is_a_miss() {
        let primary = ScriptedClassifier::found("primary", "   ", 0.9);
        let secondary = ScriptedClassifier::found("secondary", "kite", 0.7);
        let cascade = ClassifierCascade::new(primary, TIMEOUT).with_secondary(secondary.clone());

        let outcome = cascade.classify(b"img", "image/jpeg").await;
        assert_eq!(outcome.classification.as_ref().unwrap().label, "kite");
        assert_eq!(secondary.calls(), 1);
        assert!(!outcome.had_errors());
    }

    #[tokio::test]
    async fn nan_confidence_is_below_floor() {
        let cascade = ClassifierCascade::new(ScriptedClassifier::found("primary", "cup", f32::NAN), TIMEOUT);
        assert!(cascade.classify(b"img", "image/jpeg").await.classification.is_none());
    }
}
