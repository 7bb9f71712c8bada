use crate::error::ExtractError;
use crate::model::ExtractedRecipe;
use log::{debug, warn};
use serde_json::Value;

/// How many characters of the raw model response are quoted in errors.
const RAW_PREVIEW_CHARS: usize = 100;

/// Parse and validate the model's raw text response into a recipe payload.
///
/// Two tiers: a strict whole-document JSON parse first, then a greedy
/// first-`{`-to-last-`}` scan recovering one object from surrounding prose.
/// Diagnostics quote at most the first 100 characters of the raw response,
/// never the whole payload.
pub fn parse_ai_response(raw: &str) -> Result<ExtractedRecipe, ExtractError> {
    if raw.is_empty() {
        return Err(ExtractError::AiProcessing(
            "AI returned an empty response.".to_string(),
        ));
    }

    let preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();

    let value = match serde_json::from_str::<Value>(raw) {
        Ok(value) => value,
        Err(error) => {
            warn!("Failed to parse model response directly: {error}");

            let Some(candidate) = outer_brace_span(raw) else {
                return Err(ExtractError::AiProcessing(format!(
                    "No valid JSON found in response. Raw response begins with: {preview}..."
                )));
            };
            debug!("Retrying on embedded object span ({} bytes)", candidate.len());

            serde_json::from_str::<Value>(candidate).map_err(|_| {
                ExtractError::AiProcessing(format!(
                    "Failed to parse extracted JSON. Raw response begins with: {preview}..."
                ))
            })?
        }
    };

    // The model's own "no recipe found" signal
    if let Some(error) = value["error"].as_str() {
        if !error.is_empty() {
            return Err(ExtractError::AiProcessing(error.to_string()));
        }
    }

    validate_required_fields(&value)?;

    serde_json::from_value(value).map_err(|_| {
        ExtractError::AiProcessing(format!(
            "AI response does not match the recipe shape. Raw response begins with: {preview}..."
        ))
    })
}

/// The span from the first `{` to the last `}`, when both exist in order.
fn outer_brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

fn validate_required_fields(value: &Value) -> Result<(), ExtractError> {
    let title_ok = value["title"].as_str().is_some_and(|title| !title.is_empty());
    let ingredients_ok = value["ingredients"].is_array();
    let instructions_ok = value["instructions"].is_array();

    if title_ok && ingredients_ok && instructions_ok {
        return Ok(());
    }

    let mut missing = Vec::new();
    if !title_ok {
        missing.push("title");
    }
    if !ingredients_ok {
        missing.push("ingredients");
    }
    if !instructions_ok {
        missing.push("instructions");
    }

    Err(ExtractError::AiProcessing(format!(
        "AI response is missing required recipe fields ({}).",
        missing.join(", ")
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STIR_FRY_JSON: &str = r#"{"title":"Garlic Stir Fry","ingredients":[{"quantity":2,"unit":"cloves","name":"garlic"}],"instructions":[{"step":1,"description":"Chop garlic"},{"step":2,"description":"Stir fry"}]}"#;

    fn ai_processing_message(result: Result<ExtractedRecipe, ExtractError>) -> String {
        match result {
            Err(ExtractError::AiProcessing(message)) => message,
            other => panic!("expected AiProcessing, got {other:?}"),
        }
    }

    #[test]
    fn pure_json_parses_to_the_exact_object() {
        let recipe = parse_ai_response(STIR_FRY_JSON).unwrap();

        assert_eq!(
            serde_json::to_value(&recipe).unwrap(),
            json!({
                "title": "Garlic Stir Fry",
                "ingredients": [
                    { "quantity": 2, "unit": "cloves", "name": "garlic" }
                ],
                "instructions": [
                    { "step": 1, "description": "Chop garlic" },
                    { "step": 2, "description": "Stir fry" }
                ]
            })
        );
    }

    #[test]
    fn prose_wrapped_json_parses_to_the_same_object() {
        let direct = parse_ai_response(STIR_FRY_JSON).unwrap();

        let wrapped = format!("Here you go:\n{STIR_FRY_JSON}\nEnjoy!");
        let recovered = parse_ai_response(&wrapped).unwrap();

        assert_eq!(recovered, direct);
    }

    #[test]
    fn response_without_braces_fails_with_preview() {
        let raw = "I could not find a recipe in that transcript, sorry!";
        let message = ai_processing_message(parse_ai_response(raw));

        assert!(message.starts_with("No valid JSON found in response."));
        assert!(message.contains(raw));
        assert!(message.ends_with("..."));
    }

    #[test]
    fn preview_is_bounded_to_100_chars() {
        let raw = "x".repeat(500);
        let message = ai_processing_message(parse_ai_response(&raw));

        assert!(message.contains(&"x".repeat(100)));
        assert!(!message.contains(&"x".repeat(101)));
    }

    #[test]
    fn unparseable_brace_span_fails_with_preview() {
        let raw = "sure: {not valid json at all} done";
        let message = ai_processing_message(parse_ai_response(raw));

        assert!(message.starts_with("Failed to parse extracted JSON."));
    }

    #[test]
    fn brace_scan_is_greedy_across_multiple_objects() {
        // First `{` to last `}` spans both objects, which is not valid JSON;
        // the strict tier has already failed, so the whole parse fails.
        let raw = r#"one {"a":1} two {"b":2} three"#;
        let message = ai_processing_message(parse_ai_response(raw));

        assert!(message.starts_with("Failed to parse extracted JSON."));
    }

    #[test]
    fn model_error_field_surfaces_verbatim() {
        let message =
            ai_processing_message(parse_ai_response(r#"{"error": "no recipe found"}"#));
        assert_eq!(message, "no recipe found");
    }

    #[test]
    fn empty_error_field_is_ignored() {
        let raw = r#"{"error": "", "title": "Soup", "ingredients": [], "instructions": []}"#;
        let recipe = parse_ai_response(raw).unwrap();
        assert_eq!(recipe.title, "Soup");
    }

    #[test]
    fn missing_instructions_is_named() {
        let raw = r#"{"title": "Soup", "ingredients": []}"#;
        let message = ai_processing_message(parse_ai_response(raw));

        assert_eq!(
            message,
            "AI response is missing required recipe fields (instructions)."
        );
    }

    #[test]
    fn every_missing_field_is_named() {
        let message = ai_processing_message(parse_ai_response("{}"));
        assert_eq!(
            message,
            "AI response is missing required recipe fields (title, ingredients, instructions)."
        );
    }

    #[test]
    fn non_array_ingredients_counts_as_missing() {
        let raw = r#"{"title": "Soup", "ingredients": "none", "instructions": []}"#;
        let message = ai_processing_message(parse_ai_response(raw));

        assert_eq!(
            message,
            "AI response is missing required recipe fields (ingredients)."
        );
    }

    #[test]
    fn empty_response_fails_up_front() {
        let message = ai_processing_message(parse_ai_response(""));
        assert_eq!(message, "AI returned an empty response.");
    }

    #[test]
    fn malformed_ingredient_entries_fail_with_bounded_excerpt() {
        let raw = r#"{"title": "Soup", "ingredients": [42], "instructions": []}"#;
        let message = ai_processing_message(parse_ai_response(raw));

        assert!(message.starts_with("AI response does not match the recipe shape."));
    }

    #[test]
    fn empty_arrays_are_schema_valid() {
        let raw = r#"{"title": "Water", "ingredients": [], "instructions": []}"#;
        let recipe = parse_ai_response(raw).unwrap();

        assert!(recipe.ingredients.is_empty());
        assert!(recipe.instructions.is_empty());
    }
}
