//! Generation model catalog
//!
//! The model id is a pass-through to the generation service; this table only
//! drives the selector and labels.

/// Model used when the caller does not pick one
pub const DEFAULT_MODEL: &str = "gpt-4o";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
}

pub static MODELS: [ModelInfo; 4] = [
    ModelInfo {
        id: "gpt-4o",
        name: "GPT-4o",
        description: "Best quality, recommended",
    },
    ModelInfo {
        id: "gpt-4o-mini",
        name: "GPT-4o Mini",
        description: "Faster, good quality",
    },
    ModelInfo {
        id: "claude-3-5-sonnet-20241022",
        name: "Claude 3.5 Sonnet",
        description: "Creative, detailed",
    },
    ModelInfo {
        id: "gemini-2.0-flash",
        name: "Gemini 2.0 Flash",
        description: "Fast, Google's model",
    },
];

pub fn find(id: &str) -> Option<&'static ModelInfo> {
    MODELS.iter().find(|m| m.id == id)
}

/// Catalog entry shown for a model id
///
/// Unknown ids display as the first catalog entry, matching the selector's
/// fallback. The id itself is still sent to the service unchanged.
pub fn display_for(id: &str) -> &'static ModelInfo {
    find(id).unwrap_or(&MODELS[0])
}
