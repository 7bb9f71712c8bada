use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

/// Language the extracted recipe should be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ko,
}

impl Locale {
    /// English name of the language, as spelled out in the model prompt
    pub fn language_name(self) -> &'static str {
        match self {
            Locale::En => "English",
            Locale::Ko => "Korean",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ko => "ko",
        }
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Locale::En),
            "ko" => Ok(Locale::Ko),
            other => Err(format!("unsupported locale '{other}' (expected en or ko)")),
        }
    }
}

/// An ingredient amount as the model reported it: a bare number, or free
/// text such as "1/2" or "a pinch".
///
/// Numbers are kept as [`serde_json::Number`] so the model's representation
/// survives serialization unchanged (2 stays 2, not 2.0).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Number(serde_json::Number),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeIngredient {
    /// `None` serializes as an explicit `null`: quantity and unit are
    /// nullable in the recipe schema, not optional.
    #[serde(default)]
    pub quantity: Option<Quantity>,
    #[serde(default)]
    pub unit: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeInstruction {
    /// 1-based position in the contiguous step list
    pub step: u32,
    pub description: String,
}

/// Recipe fields produced by the model, before the source URL is attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRecipe {
    pub title: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub prep_time: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub cook_time: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub total_time: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub servings: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeInstruction>,
}

impl ExtractedRecipe {
    /// Attach the source URL (and the video title, when the fetcher found
    /// one) to produce the final recipe handed to callers.
    pub fn into_recipe(self, source_url: impl Into<String>, video_title: Option<String>) -> Recipe {
        Recipe {
            title: self.title,
            description: self.description,
            prep_time: self.prep_time,
            cook_time: self.cook_time,
            total_time: self.total_time,
            servings: self.servings,
            ingredients: self.ingredients,
            instructions: self.instructions,
            source_url: source_url.into(),
            video_title,
        }
    }
}

/// A structured recipe extracted from a cooking video.
///
/// Serializes to the wire schema consumed by callers: camelCase keys,
/// omitted optionals, explicit nulls for unresolved quantity/unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prep_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cook_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servings: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeInstruction>,
    pub source_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video_title: Option<String>,
}

/// Accept a JSON string or number for optional text fields like `servings`,
/// which model responses sometimes emit as a bare number.
fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrNumber {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(
        Option::<StringOrNumber>::deserialize(deserializer)?.map(|v| match v {
            StringOrNumber::Text(s) => s,
            StringOrNumber::Number(n) => n.to_string(),
        }),
    )
}
