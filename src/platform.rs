//! Stock platform catalog
//!
//! Static table of the stock image marketplaces the generation service knows
//! about, their display labels, badge styles and search URL builders. Lookups
//! tolerate unknown platform ids: callers get the raw id back as a label and
//! the neutral badge.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Platforms selected when the user has not chosen any
pub const DEFAULT_PLATFORMS: [&str; 2] = ["getty", "shutterstock"];

/// Visual treatment for a platform badge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Getty,
    Shutterstock,
    Adobe,
    Unsplash,
    Pexels,
    /// Fallback for platform ids outside the catalog
    Neutral,
}

/// A known stock image platform
#[derive(Debug, Clone, Copy)]
pub struct Platform {
    pub id: &'static str,
    pub name: &'static str,
    pub badge: BadgeStyle,
    build_url: fn(&str) -> String,
}

impl Platform {
    /// Build the platform's search URL for a query
    pub fn search_url(&self, query: &str) -> String {
        (self.build_url)(query)
    }
}

/// All known platforms, in selector order
pub static PLATFORMS: [Platform; 5] = [
    Platform {
        id: "getty",
        name: "Getty Images",
        badge: BadgeStyle::Getty,
        build_url: getty_url,
    },
    Platform {
        id: "shutterstock",
        name: "Shutterstock",
        badge: BadgeStyle::Shutterstock,
        build_url: shutterstock_url,
    },
    Platform {
        id: "adobe",
        name: "Adobe Stock",
        badge: BadgeStyle::Adobe,
        build_url: adobe_url,
    },
    Platform {
        id: "unsplash",
        name: "Unsplash",
        badge: BadgeStyle::Unsplash,
        build_url: unsplash_url,
    },
    Platform {
        id: "pexels",
        name: "Pexels",
        badge: BadgeStyle::Pexels,
        build_url: pexels_url,
    },
];

/// Find a platform by its exact id
pub fn find(id: &str) -> Option<&'static Platform> {
    PLATFORMS.iter().find(|p| p.id == id)
}

/// Check whether an id belongs to the catalog
pub fn is_known(id: &str) -> bool {
    find(id).is_some()
}

/// Display label for a platform id; unknown ids pass through unchanged
pub fn label_for(id: &str) -> &str {
    find(id).map(|p| p.name).unwrap_or(id)
}

/// Badge style for a platform id; unknown ids get the neutral style
pub fn badge_for(id: &str) -> BadgeStyle {
    find(id).map(|p| p.badge).unwrap_or(BadgeStyle::Neutral)
}

/// Build a search URL for a query on a platform
///
/// The platform id is matched case-insensitively. Returns `None` for
/// platforms outside the catalog.
pub fn build_search_url(query: &str, platform: &str) -> Option<String> {
    let platform = platform.to_lowercase();
    find(&platform).map(|p| p.search_url(query))
}

fn form_encode(query: &str) -> String {
    url::form_urlencoded::byte_serialize(query.as_bytes()).collect()
}

// Path-style search pages take a hyphenated slug
fn slug(query: &str) -> String {
    query.to_lowercase().replace(' ', "-")
}

fn getty_url(query: &str) -> String {
    format!(
        "https://www.gettyimages.com/search/2/image?phrase={}",
        form_encode(query)
    )
}

fn shutterstock_url(query: &str) -> String {
    format!("https://www.shutterstock.com/search/{}", slug(query))
}

fn adobe_url(query: &str) -> String {
    format!("https://stock.adobe.com/search?k={}", form_encode(query))
}

fn unsplash_url(query: &str) -> String {
    format!("https://unsplash.com/s/photos/{}", slug(query))
}

fn pexels_url(query: &str) -> String {
    format!("https://www.pexels.com/search/{}/", slug(query))
}

/// Errors raised when changing the platform selection
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SelectionError {
    /// Deselecting would leave no platform selected
    #[error("At least one platform must stay selected")]
    LastPlatform,

    /// The id is not a known platform
    #[error("Unknown platform: {0}")]
    Unknown(String),
}

/// Ordered, duplicate-free, never-empty set of selected platform ids
///
/// The non-empty invariant is enforced here at the selection boundary:
/// toggling off the last remaining platform is refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformSelection {
    ids: Vec<String>,
}

impl Default for PlatformSelection {
    fn default() -> Self {
        Self {
            ids: DEFAULT_PLATFORMS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl PlatformSelection {
    /// Build a selection from ids, dropping duplicates
    ///
    /// Falls back to the default selection when `ids` is empty.
    pub fn from_ids<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut selection = Vec::new();
        for id in ids {
            let id = id.into();
            if !selection.contains(&id) {
                selection.push(id);
            }
        }
        if selection.is_empty() {
            Self::default()
        } else {
            Self { ids: selection }
        }
    }

    /// Toggle a platform in or out of the selection
    ///
    /// Returns whether the platform is selected afterwards. Deselecting the
    /// last platform is a no-op reported as `SelectionError::LastPlatform`.
    pub fn toggle(&mut self, id: &str) -> Result<bool, SelectionError> {
        if let Some(pos) = self.ids.iter().position(|p| p == id) {
            if self.ids.len() == 1 {
                return Err(SelectionError::LastPlatform);
            }
            self.ids.remove(pos);
            Ok(false)
        } else {
            self.ids.push(id.to_string());
            Ok(true)
        }
    }

    /// Toggle a platform, rejecting ids outside the catalog
    pub fn toggle_known(&mut self, id: &str) -> Result<bool, SelectionError> {
        if !is_known(id) {
            return Err(SelectionError::Unknown(id.to_string()));
        }
        self.toggle(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|p| p == id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.ids
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.ids.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_for_known_platforms() {
        assert_eq!(label_for("getty"), "Getty Images");
        assert_eq!(label_for("adobe"), "Adobe Stock");
        assert_eq!(badge_for("pexels"), BadgeStyle::Pexels);
    }

    #[test]
    fn test_unknown_platform_passes_through() {
        assert_eq!(label_for("foo"), "foo");
        assert_eq!(badge_for("foo"), BadgeStyle::Neutral);
        assert!(build_search_url("truck", "foo").is_none());
    }

    #[test]
    fn test_getty_url_is_form_encoded() {
        assert_eq!(
            build_search_url("pickup truck & sunrise", "getty").unwrap(),
            "https://www.gettyimages.com/search/2/image?phrase=pickup+truck+%26+sunrise"
        );
    }

    #[test]
    fn test_slug_urls() {
        assert_eq!(
            build_search_url("Pickup Truck Sunrise", "shutterstock").unwrap(),
            "https://www.shutterstock.com/search/pickup-truck-sunrise"
        );
        assert_eq!(
            build_search_url("misty forest", "unsplash").unwrap(),
            "https://unsplash.com/s/photos/misty-forest"
        );
        assert_eq!(
            build_search_url("misty forest", "pexels").unwrap(),
            "https://www.pexels.com/search/misty-forest/"
        );
    }

    #[test]
    fn test_url_lookup_is_case_insensitive() {
        assert_eq!(
            build_search_url("office", "ADOBE").unwrap(),
            "https://stock.adobe.com/search?k=office"
        );
    }

    #[test]
    fn test_default_selection() {
        let selection = PlatformSelection::default();
        assert_eq!(selection.as_slice(), &["getty", "shutterstock"]);
    }

    #[test]
    fn test_toggle_adds_and_removes() {
        let mut selection = PlatformSelection::default();
        assert_eq!(selection.toggle("adobe"), Ok(true));
        assert_eq!(selection.as_slice(), &["getty", "shutterstock", "adobe"]);
        assert_eq!(selection.toggle("getty"), Ok(false));
        assert_eq!(selection.as_slice(), &["shutterstock", "adobe"]);
    }

    #[test]
    fn test_toggle_last_platform_is_noop() {
        let mut selection = PlatformSelection::from_ids(["pexels"]);
        assert_eq!(selection.toggle("pexels"), Err(SelectionError::LastPlatform));
        assert_eq!(selection.as_slice(), &["pexels"]);
    }

    #[test]
    fn test_toggle_known_rejects_unknown() {
        let mut selection = PlatformSelection::default();
        assert_eq!(
            selection.toggle_known("flickr"),
            Err(SelectionError::Unknown("flickr".to_string()))
        );
        assert_eq!(selection.len(), 2);
    }

    #[test]
    fn test_from_ids_dedups_and_defaults() {
        let selection = PlatformSelection::from_ids(["adobe", "adobe", "getty"]);
        assert_eq!(selection.as_slice(), &["adobe", "getty"]);

        let empty: Vec<String> = Vec::new();
        assert_eq!(
            PlatformSelection::from_ids(empty),
            PlatformSelection::default()
        );
    }
}
