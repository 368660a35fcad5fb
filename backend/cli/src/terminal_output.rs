//! Terminal notes and the story card printed by `recognize`.

use snapstory_core::RecognitionResult;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

/// Check if the terminal supports color output.
fn supports_color() -> bool {
    std::env::var("NO_COLOR").is_err()
        && (std::env::var("COLORTERM").is_ok()
            || std::env::var("TERM")
                .map(|t| t != "dumb")
                .unwrap_or(false))
}

pub fn note_info(msg: &str) {
    if supports_color() {
        println!("{CYAN}{BOLD}ℹ{RESET} {msg}");
    } else {
        println!("INFO: {msg}");
    }
}

pub fn note_warn(msg: &str) {
    if supports_color() {
        println!("{YELLOW}{BOLD}⚠{RESET} {msg}");
    } else {
        println!("WARN: {msg}");
    }
}

pub fn note_error(msg: &str) {
    if supports_color() {
        eprintln!("{RED}{BOLD}✗{RESET} {msg}");
    } else {
        eprintln!("ERROR: {msg}");
    }
}

pub fn note_success(msg: &str) {
    if supports_color() {
        println!("{GREEN}{BOLD}✓{RESET} {msg}");
    } else {
        println!("OK: {msg}");
    }
}

/// English and Chinese halves of a result, one block each.
pub fn render_story(result: &RecognitionResult) -> String {
    render_story_styled(result, supports_color())
}

fn render_story_styled(result: &RecognitionResult, color: bool) -> String {
    let (bold, dim, reset) = if color { (BOLD, DIM, RESET) } else { ("", "", "") };

    let mut out = format!("\n{bold}{}{reset}\n{}\n", result.word, result.story);
    if let (Some(name), Some(story)) = (&result.chinese_name, &result.chinese_story) {
        out.push_str(&format!("\n{bold}{name}{reset}\n{story}\n"));
    }
    if result.degraded {
        out.push_str(&format!("\n{dim}(some of this text is a stand-in; the AI service was unavailable){reset}\n"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(degraded: bool) -> RecognitionResult {
        RecognitionResult {
            word: "apple".into(),
            story: "An apple!".into(),
            chinese_name: Some("苹果".into()),
            chinese_story: Some("一个苹果！".into()),
            degraded,
        }
    }

    #[test]
    fn plain_card_has_both_languages() {
        let card = render_story_styled(&result(false), false);
        assert_eq!(card, "\napple\nAn apple!\n\n苹果\n一个苹果！\n");
    }

    #[test]
    fn degraded_card_says_so() {
        let card = render_story_styled(&result(true), false);
        assert!(card.contains("stand-in"));
        assert!(!card.contains('\x1b'));
    }
}
