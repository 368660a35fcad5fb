//! Raw error text → something a child's parent can act on.

/// Ordered: the first rule with a matching pattern wins, so the specific
/// `API error: 413` sits above the generic `API error: 4`.
const FRIENDLY_MESSAGES: &[(&[&str], &str)] = &[
    (
        &["failed to fetch", "networkerror", "network error"],
        "Unable to connect to the server. Please check your internet connection and try again.",
    ),
    (
        &["notallowederror"],
        "Camera access was denied. Please allow camera access and try again.",
    ),
    (
        &["notfounderror"],
        "No camera was found on this device.",
    ),
    (
        &["notreadableerror"],
        "The camera is being used by another app. Please close it and try again.",
    ),
    (
        &["timed out", "timeout"],
        "The request took too long. Please try again.",
    ),
    (
        &["api error: 5"],
        "The server is having trouble right now. Please try again in a moment.",
    ),
    (
        &["api error: 413"],
        "That photo is too large. Please try again with a smaller one.",
    ),
    (
        &["api error: 4"],
        "Something was wrong with that photo. Please take another one.",
    ),
    (
        &["image too small", "not an image", "image too large"],
        "That photo didn't come out right. Please try taking it again.",
    ),
];

/// Map a raw error message to a friendly one. Unmapped messages pass through.
pub fn friendly_message(raw: &str) -> String {
    let lowered = raw.to_lowercase();
    FRIENDLY_MESSAGES
        .iter()
        .find(|(patterns, _)| patterns.iter().any(|p| lowered.contains(p)))
        .map(|(_, message)| message.to_string())
        .unwrap_or_else(|| raw.to_string())
}
