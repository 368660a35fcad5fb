//! Validate, submit and retry, publishing progress for a UI to observe.

use std::sync::Arc;

use snapstory_core::{EncodedImage, RecognitionResult};
use tokio::sync::watch;
use tracing::{info, warn};

use crate::error::ClientError;
use crate::friendly::friendly_message;
use crate::retry::{RetryPolicy, Sleeper, TokioSleeper, run_with_retry};
use crate::transport::{HttpTransport, Transport, accept_response};

/// Progress of the current submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecognitionState {
    pub is_recognizing: bool,
    /// Friendly message for the last failure, cleared when a new submission starts.
    pub error: Option<String>,
}

pub struct RecognitionClient {
    transport: Arc<dyn Transport>,
    policy: RetryPolicy,
    sleeper: Arc<dyn Sleeper>,
    state: watch::Sender<RecognitionState>,
}

impl RecognitionClient {
    pub fn new(transport: Arc<dyn Transport>, policy: RetryPolicy) -> Self {
        let (state, _) = watch::channel(RecognitionState::default());
        Self {
            transport,
            policy,
            sleeper: Arc::new(TokioSleeper),
            state,
        }
    }

    /// A client posting to `endpoint` over HTTP with the policy's timeout.
    pub fn http(endpoint: impl Into<String>, policy: RetryPolicy) -> Self {
        let transport = HttpTransport::new(endpoint, policy.timeout());
        Self::new(Arc::new(transport), policy)
    }

    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn subscribe(&self) -> watch::Receiver<RecognitionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> RecognitionState {
        self.state.borrow().clone()
    }

    /// Submit `image` for recognition.
    ///
    /// Invalid images fail immediately without touching the network. Transport
    /// and response failures are retried per the [`RetryPolicy`].
    pub async fn submit_for_recognition(
        &self,
        image: &EncodedImage,
    ) -> Result<RecognitionResult, ClientError> {
        if let Err(rejection) = media::validate_image(image) {
            let err = ClientError::from(rejection);
            warn!(error = %err, "Image failed validation");
            self.publish(false, Some(&err));
            return Err(err);
        }

        self.publish(true, None);
        let transport = &self.transport;
        let outcome = run_with_retry(&self.policy, self.sleeper.as_ref(), |_attempt| async move {
            let response = transport.send(image).await?;
            accept_response(&response)
        })
        .await;

        match &outcome {
            Ok(result) => {
                info!(word = %result.word, "Recognition succeeded");
                self.publish(false, None);
            }
            Err(e) => {
                warn!(error = %e, "Recognition failed");
                self.publish(false, Some(e));
            }
        }
        outcome
    }

    fn publish(&self, is_recognizing: bool, error: Option<&ClientError>) {
        self.state.send_replace(RecognitionState {
            is_recognizing,
            error: error.map(|e| friendly_message(&e.to_string())),
        });
    }
}
