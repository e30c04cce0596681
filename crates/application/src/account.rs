//! Account registration and profile management.
//!
//! These calls return the backend's [`ApiResponse`] as-is; callers read
//! `message`/`error` from the body to tell the user what happened.

use std::sync::Arc;

use marquee_domain::{
    ApiResponse, DomainError, Profile, ProfileImage, Session, genre_ids, slugify,
};
use serde_json::{Value, json};

use crate::auth::{AuthenticatedClient, RequestOptions};

/// Status the backend answers with when an account is created.
pub const REGISTERED_STATUS: u16 = 201;

/// Errors raised before a request is sent.
#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    /// The draft could not be turned into a request.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The image list request did not succeed.
    #[error("could not load profile images: {message}")]
    Images {
        /// Backend message
        message: String,
    },
}

/// Profile fields as entered by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    /// Display name
    pub name: String,
    /// Genre titles, as listed in [`marquee_domain::GENRES`]
    pub genres: Vec<String>,
    /// Chosen avatar image id
    pub image_id: String,
}

/// Account and profile calls against the backend.
#[derive(Debug, Clone)]
pub struct AccountService {
    client: Arc<AuthenticatedClient>,
}

impl AccountService {
    /// Creates the service.
    #[must_use]
    pub const fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    /// Creates an account. Success is signalled by status 201.
    pub async fn register(&self, email: &str, name: &str, password: &str) -> ApiResponse {
        let response = self
            .client
            .request(
                RequestOptions::post(self.client.endpoints().register())
                    .json(json!({ "email": email, "name": name, "password": password })),
            )
            .await;
        if response.status() == Some(REGISTERED_STATUS) {
            tracing::info!("account registered");
        }
        response
    }

    /// Adds a profile to the session's account.
    ///
    /// # Errors
    ///
    /// Returns an error if a genre title is unknown.
    pub async fn create_profile(
        &self,
        session: &Session,
        draft: &ProfileDraft,
    ) -> Result<ApiResponse, AccountError> {
        let body = profile_body(&slugify(&draft.name), draft, &session.id)?;
        Ok(self
            .client
            .request(
                RequestOptions::post(self.client.endpoints().profiles())
                    .with_bearer()
                    .refresh(true)
                    .json(body),
            )
            .await)
    }

    /// Edits an existing profile. Its slug is kept whatever the new name.
    ///
    /// # Errors
    ///
    /// Returns an error if a genre title is unknown.
    pub async fn update_profile(
        &self,
        session: &Session,
        profile: &Profile,
        draft: &ProfileDraft,
    ) -> Result<ApiResponse, AccountError> {
        let body = profile_body(&profile.slug, draft, &session.id)?;
        let id = profile.id.as_deref().unwrap_or(&profile.slug);
        Ok(self
            .client
            .request(
                RequestOptions::put(self.client.endpoints().profile(id))
                    .with_bearer()
                    .refresh(true)
                    .json(body),
            )
            .await)
    }

    /// Avatar images not yet used by any profile of the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the list is malformed.
    pub async fn profile_images(&self, session: &Session) -> Result<Vec<ProfileImage>, AccountError> {
        let response = self
            .client
            .request(
                RequestOptions::get(self.client.endpoints().profile_images())
                    .with_bearer()
                    .refresh(true),
            )
            .await;
        if !response.is_ok() {
            return Err(AccountError::Images {
                message: response.message().unwrap_or_default(),
            });
        }

        let body = response.into_body();
        let list = match body {
            Value::Object(mut map) => map.remove("data").unwrap_or(Value::Null),
            other => other,
        };
        let images: Vec<ProfileImage> = serde_json::from_value(list)
            .map_err(|e| AccountError::Domain(DomainError::InvalidPayload(e.to_string())))?;

        let used: Vec<&str> = session.used_image_ids().collect();
        Ok(images
            .into_iter()
            .filter(|img| !used.contains(&img.id.as_str()))
            .collect())
    }
}

fn profile_body(slug: &str, draft: &ProfileDraft, user_id: &str) -> Result<Value, DomainError> {
    Ok(json!({
        "slug": slug,
        "name": draft.name,
        "preferences": genre_ids(&draft.genres)?,
        "image": draft.image_id,
        "userId": user_id,
    }))
}
