//! Session and profile types.
//!
//! A [`Session`] is the server-confirmed identity behind a token, with the
//! [`Profile`]s created under it. A profile's slug is derived from its
//! name once, at creation, and never changes afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Server-confirmed identity plus its profiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Account identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name of the account holder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Account e-mail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Profiles created under this account
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl Session {
    /// Finds a profile by slug.
    #[must_use]
    pub fn profile(&self, slug: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.slug == slug)
    }

    /// Ids of the avatar images already taken by this session's profiles.
    pub fn used_image_ids(&self) -> impl Iterator<Item = &str> {
        self.profiles
            .iter()
            .filter_map(|p| p.image.as_ref())
            .map(|img| img.id.as_str())
    }
}

/// A named sub-identity with an avatar and genre preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    /// Backend identifier, absent until the profile is stored
    #[serde(default, alias = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Immutable identity derived from the original name
    pub slug: String,
    /// Display name
    pub name: String,
    /// Avatar image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ProfileImage>,
    /// Preferred genre ids
    #[serde(default)]
    pub preferences: Vec<String>,
}

impl Profile {
    /// Creates a profile; the slug is derived from `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: None,
            slug: slugify(&name),
            name,
            image: None,
            preferences: Vec::new(),
        }
    }
}

/// Avatar image offered by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileImage {
    /// Image identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Encoded image payload as sent by the backend
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub data: Value,
    /// MIME type of the payload
    #[serde(
        default,
        rename = "contentType",
        alias = "content_type",
        skip_serializing_if = "Option::is_none"
    )]
    pub content_type: Option<String>,
}

/// Derives a URL-safe slug from a display name.
#[must_use]
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect::<String>()
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Kids"), "kids");
        assert_eq!(slugify("  Maria   Clara  "), "maria-clara");
        assert_eq!(slugify("João!"), "joão");
    }

    #[test]
    fn test_session_from_backend_payload() {
        let session: Session = serde_json::from_value(json!({
            "_id": "u1",
            "email": "ana@example.com",
            "profiles": [
                {
                    "_id": "p1",
                    "slug": "ana",
                    "name": "Ana",
                    "image": { "_id": "img-3", "contentType": "image/png" },
                    "preferences": ["28", "35"]
                }
            ]
        }))
        .unwrap();

        assert_eq!(session.id, "u1");
        assert_eq!(session.profiles.len(), 1);
        assert!(session.profile(&slugify("ANA")).is_some());
        assert_eq!(session.used_image_ids().collect::<Vec<_>>(), vec!["img-3"]);
        assert_eq!(session.profile("ana").unwrap().preferences, vec!["28", "35"]);
    }

    #[test]
    fn test_session_without_profiles() {
        let session: Session = serde_json::from_value(json!({ "id": "u2" })).unwrap();
        assert!(session.profiles.is_empty());
        assert!(session.profile("any").is_none());
    }
}
