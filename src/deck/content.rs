//! Deck outline model and the tolerant JSON reader for it.
//!
//! Outlines usually arrive as model output: a JSON object wrapped in
//! markdown code fences, sometimes preceded or followed by prose. The
//! reader strips the fences, falls back to the outermost brace pair and
//! accepts the result only when it is an object with a `slides` key, so
//! callers can distinguish "an outline" from "some other JSON".

use serde::{Deserialize, Serialize};

/// A full deck outline: one title slide followed by one slide per entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DeckContent {
    pub title: String,
    pub subtitle: String,
    pub slides: Vec<SlideContent>,
}

impl Default for DeckContent {
    fn default() -> Self {
        Self {
            title: default_title(),
            subtitle: String::new(),
            slides: Vec::new(),
        }
    }
}

fn default_title() -> String {
    "AI Generated Presentation".to_string()
}

/// One content slide: a heading, bullet lines and optional speaker notes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SlideContent {
    pub title: String,
    pub bullets: Vec<String>,
    pub notes: String,
}

/// Recover a deck outline from raw model output.
///
/// Tries the fence-stripped text as JSON first, then the slice between
/// the first `{` and the last `}`. Returns `None` when neither parses
/// into an object carrying a `slides` key; absent `title`, `subtitle`,
/// `bullets` or `notes` fields take their defaults.
pub fn parse_deck_json(raw: &str) -> Option<DeckContent> {
    let cleaned = strip_fences(raw);
    if let Some(content) = try_parse(&cleaned) {
        return Some(content);
    }
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end <= start {
        return None;
    }
    try_parse(&cleaned[start..=end])
}

fn strip_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```", "")
        .trim()
        .trim_end_matches('`')
        .trim()
        .to_string()
}

fn try_parse(candidate: &str) -> Option<DeckContent> {
    let value: serde_json::Value = serde_json::from_str(candidate).ok()?;
    if !value.as_object()?.contains_key("slides") {
        return None;
    }
    serde_json::from_value(value).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_json_parses() {
        let content = parse_deck_json(r#"{"title":"Q3","slides":[{"title":"Now","bullets":["a"]}]}"#)
            .expect("outline");
        assert_eq!(content.title, "Q3");
        assert_eq!(content.slides.len(), 1);
        assert_eq!(content.slides[0].bullets, vec!["a"]);
    }

    #[test]
    fn fenced_json_parses() {
        let raw = "```json\n{\"title\": \"Fenced\", \"slides\": []}\n```";
        let content = parse_deck_json(raw).expect("outline");
        assert_eq!(content.title, "Fenced");
    }

    #[test]
    fn prose_around_the_object_is_ignored() {
        let raw = "Here is your deck:\n{\"slides\": [{\"title\": \"One\"}]}\nLet me know!";
        let content = parse_deck_json(raw).expect("outline");
        assert_eq!(content.slides[0].title, "One");
    }

    #[test]
    fn missing_title_takes_the_default() {
        let content = parse_deck_json(r#"{"slides": []}"#).expect("outline");
        assert_eq!(content.title, "AI Generated Presentation");
        assert!(content.subtitle.is_empty());
    }

    #[test]
    fn present_but_empty_title_is_kept() {
        let content = parse_deck_json(r#"{"title": "", "slides": []}"#).expect("outline");
        assert_eq!(content.title, "");
    }

    #[test]
    fn json_without_slides_is_rejected() {
        assert!(parse_deck_json(r#"{"title": "No slides here"}"#).is_none());
    }

    #[test]
    fn non_object_json_is_rejected() {
        assert!(parse_deck_json(r#"["a", "b"]"#).is_none());
        assert!(parse_deck_json("not json at all").is_none());
    }

    #[test]
    fn wrong_slide_shape_is_rejected() {
        assert!(parse_deck_json(r#"{"slides": "three of them"}"#).is_none());
    }
}
