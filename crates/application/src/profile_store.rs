//! The profile picked on the profile selection screen.

use std::sync::Arc;

use marquee_domain::{PROFILE_KEY, Profile};

use crate::ports::{ClientStorage, StorageError};

/// Persists the active profile under the `usuario` key.
#[derive(Clone)]
pub struct ActiveProfileStore {
    storage: Arc<dyn ClientStorage>,
}

impl std::fmt::Debug for ActiveProfileStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveProfileStore").finish_non_exhaustive()
    }
}

impl ActiveProfileStore {
    /// Creates a store over the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// Returns the active profile, if one was selected.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails or holds a malformed profile.
    pub async fn load(&self) -> Result<Option<Profile>, StorageError> {
        let Some(raw) = self.storage.get(PROFILE_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Makes `profile` the active one.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails.
    pub async fn set(&self, profile: &Profile) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(profile).map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(PROFILE_KEY, &raw).await?;
        tracing::debug!(slug = %profile.slug, "active profile set");
        Ok(())
    }

    /// Forgets the active profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage fails.
    pub async fn reset(&self) -> Result<(), StorageError> {
        self.storage.remove(PROFILE_KEY).await
    }
}
