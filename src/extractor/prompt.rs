use crate::model::Locale;

/// The instruction block sent to the model ahead of every transcript.
///
/// It fixes the extraction contract: one recipe, structured ingredients and
/// contiguous numbered instructions, JSON-only output, and an `error` object
/// when no recipe can be identified.
///
/// The prompt is loaded from `prompt.txt` at compile time using the
/// `include_str!` macro, making it easy to edit without dealing with
/// Rust string syntax.
pub const RECIPE_EXTRACTION_PROMPT: &str = include_str!("prompt.txt");

/// Transcript characters kept when building the user block; longer
/// transcripts are silently truncated to this prefix.
pub const MAX_TRANSCRIPT_CHARS: usize = 15_000;

/// Build the instruction block, fixing the response language.
pub fn build_system_prompt(locale: Locale) -> String {
    format!(
        "{}\n\n9. Importantly, respond in {}.",
        RECIPE_EXTRACTION_PROMPT.trim_end(),
        locale.language_name()
    )
}

/// Build the user block: the optional video-title hint plus the fenced,
/// truncated transcript.
pub fn build_user_prompt(transcript: &str, video_title: Option<&str>) -> String {
    format!(
        "Video Title (optional context): {}\n\nVideo Transcript:\n---\n{}\n---\n\nExtract the recipe based on the rules and provide the JSON output.",
        video_title.unwrap_or("N/A"),
        truncate_chars(transcript, MAX_TRANSCRIPT_CHARS)
    )
}

/// Prefix of at most `max` characters, cut on a char boundary.
fn truncate_chars(text: &str, max: usize) -> &str {
    match text.char_indices().nth(max) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_is_embedded() {
        // Verify the prompt is not empty
        assert!(!RECIPE_EXTRACTION_PROMPT.is_empty());

        // Verify it pins the key parts of the extraction contract
        assert!(RECIPE_EXTRACTION_PROMPT.contains("ingredients"));
        assert!(RECIPE_EXTRACTION_PROMPT.contains("instructions"));
        assert!(RECIPE_EXTRACTION_PROMPT.contains("Just the JSON."));
        assert!(RECIPE_EXTRACTION_PROMPT.contains("error field"));
    }

    #[test]
    fn system_prompt_fixes_response_language() {
        let english = build_system_prompt(Locale::En);
        assert!(english.ends_with("9. Importantly, respond in English."));

        let korean = build_system_prompt(Locale::Ko);
        assert!(korean.ends_with("9. Importantly, respond in Korean."));
        assert!(korean.starts_with(RECIPE_EXTRACTION_PROMPT.trim_end()));
    }

    #[test]
    fn user_prompt_carries_hint_and_transcript() {
        let prompt = build_user_prompt("chop garlic heat oil", Some("Garlic Stir Fry"));
        assert!(prompt.contains("Video Title (optional context): Garlic Stir Fry"));
        assert!(prompt.contains("---\nchop garlic heat oil\n---"));
        assert!(prompt.ends_with("provide the JSON output."));

        let without_hint = build_user_prompt("chop garlic", None);
        assert!(without_hint.contains("Video Title (optional context): N/A"));
    }

    #[test]
    fn user_prompt_truncates_long_transcripts() {
        let transcript = "a".repeat(MAX_TRANSCRIPT_CHARS + 500);
        let prompt = build_user_prompt(&transcript, None);
        assert!(prompt.contains(&"a".repeat(MAX_TRANSCRIPT_CHARS)));
        assert!(!prompt.contains(&"a".repeat(MAX_TRANSCRIPT_CHARS + 1)));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_chars("abcdef", 4), "abcd");
        assert_eq!(truncate_chars("ab", 4), "ab");
        // Multi-byte characters must not be split
        assert_eq!(truncate_chars("마늘볶음밥", 3), "마늘볶");
    }
}
