//! Command Interpreter
//!
//! Maps a free-text command to one of a closed set of intents using ordered
//! keyword groups. Matching is a case-insensitive substring test and the first
//! group with a hit wins, so "blink med LED" is a `DemoBlinkLed`, never an
//! `ExplainLed`.

use serde::{Deserialize, Serialize};

/// What the user asked the mascot to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    /// Open the course whose title contains `hint`.
    OpenCourse { hint: String },
    /// Show how to blink an LED.
    DemoBlinkLed,
    /// Explain what an LED is.
    ExplainLed,
    /// Nothing matched.
    Unrecognized,
}

/// The course hint used whenever the course keyword group matches.
pub const COURSE_HINT: &str = "arduino";

const OPEN_COURSE_KEYWORDS: &[&str] = &["arduino", "kurs"];
const BLINK_KEYWORDS: &[&str] = &["blink", "lys"];
const EXPLAIN_LED_KEYWORDS: &[&str] = &["led", "elektronikk"];

/// Interprets a command string. Pure and deterministic.
pub fn interpret(command: &str) -> Intent {
    let lowered = command.to_lowercase();
    let matches = |keywords: &[&str]| keywords.iter().any(|k| lowered.contains(k));

    if matches(OPEN_COURSE_KEYWORDS) {
        Intent::OpenCourse {
            hint: COURSE_HINT.to_string(),
        }
    } else if matches(BLINK_KEYWORDS) {
        Intent::DemoBlinkLed
    } else if matches(EXPLAIN_LED_KEYWORDS) {
        Intent::ExplainLed
    } else {
        Intent::Unrecognized
    }
}
