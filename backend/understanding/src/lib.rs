//! Object recognition, story writing and translation for uploaded photos.

pub mod builder;
pub mod cascade;
pub mod fallback;
pub mod hf;
pub mod labels;
pub mod service;
pub mod story;
pub mod translation;
pub mod vision;

pub use builder::{build_classifier, build_service, build_text_provider};
pub use cascade::{CascadeOutcome, ClassifierCascade};
pub use fallback::{WithFallback, fallback_story, fallback_translation, unidentified};
pub use hf::HfImageClassifier;
pub use labels::normalize_label;
pub use service::RecognitionService;
pub use story::{STORY_MAX_CHARS, TextSettings, generate_story, repair_story};
pub use translation::{Translation, generate_translation, parse_translation};
pub use vision::{VisionBackend, VisionClassifier, parse_vision_answer};
