//! Embedded prompts
//!
//! These are compiled into the binary from .pmt files at build time.

use tracing::debug;

/// OKR coaching conversation
pub const COACH: &str = include_str!("../../prompts/coach.pmt");

/// Transcript to structured OKR
pub const EXTRACT_OKR: &str = include_str!("../../prompts/extract-okr.pmt");

/// OKR + vision answers to a catalog persona
pub const CLASSIFY_PERSONA: &str = include_str!("../../prompts/classify-persona.pmt");

/// Four-horizon future vision
pub const GENERATE_VISION: &str = include_str!("../../prompts/generate-vision.pmt");

/// Action tasks derived from a generated vision
pub const VISION_TASKS: &str = include_str!("../../prompts/vision-tasks.pmt");

/// Monday-to-Friday plan
pub const WEEKLY_PLAN: &str = include_str!("../../prompts/weekly-plan.pmt");

/// Names of every embedded template
pub const NAMES: [&str; 6] = [
    "coach",
    "extract-okr",
    "classify-persona",
    "generate-vision",
    "vision-tasks",
    "weekly-plan",
];

/// Get the embedded prompt by name
pub fn get_embedded(name: &str) -> Option<&'static str> {
    debug!(%name, "get_embedded: called");
    match name {
        "coach" => Some(COACH),
        "extract-okr" => Some(EXTRACT_OKR),
        "classify-persona" => Some(CLASSIFY_PERSONA),
        "generate-vision" => Some(GENERATE_VISION),
        "vision-tasks" => Some(VISION_TASKS),
        "weekly-plan" => Some(WEEKLY_PLAN),
        _ => {
            debug!("get_embedded: no match found");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_names_embedded() {
        for name in NAMES {
            assert!(get_embedded(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_json_stages_forbid_prose() {
        for name in ["extract-okr", "classify-persona", "generate-vision", "vision-tasks", "weekly-plan"] {
            let text = get_embedded(name).unwrap();
            assert!(text.contains("Return the JSON only"), "{} lacks output rule", name);
        }
    }

    #[test]
    fn test_coach_prompt() {
        assert!(COACH.contains("OKR"));
        assert!(COACH.contains("{{opening}}"));
    }

    #[test]
    fn test_get_embedded_unknown() {
        assert!(get_embedded("unknown-template").is_none());
    }
}
