//! Token storage with swappable persistence.
//!
//! The store answers "which token should this call carry": the cookie of
//! the request being served wins over the token persisted on the client.
//! Saving only ever writes to client storage.

use std::sync::Arc;

use marquee_domain::{ACCESS_TOKEN_KEY, RequestContext, Token};

use crate::ports::{ClientStorage, StorageError};

/// Persists the current [`Token`] through a [`ClientStorage`] strategy.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn ClientStorage>,
}

impl std::fmt::Debug for TokenStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenStore").finish_non_exhaustive()
    }
}

impl TokenStore {
    /// Creates a store on top of the given storage.
    #[must_use]
    pub fn new(storage: Arc<dyn ClientStorage>) -> Self {
        Self { storage }
    }

    /// Returns the access token to send, preferring the request context.
    ///
    /// # Errors
    ///
    /// Returns an error if client storage cannot be read or holds a
    /// corrupt token.
    pub async fn get(&self, context: Option<&RequestContext>) -> Result<Option<String>, StorageError> {
        if let Some(token) = context.and_then(RequestContext::access_token) {
            return Ok(Some(token.to_string()));
        }
        Ok(self.load().await?.map(|t| t.access_token().to_string()))
    }

    /// Returns the refresh credential, preferring the request context.
    ///
    /// # Errors
    ///
    /// Returns an error if client storage cannot be read or holds a
    /// corrupt token.
    pub async fn refresh_credential(
        &self,
        context: Option<&RequestContext>,
    ) -> Result<Option<String>, StorageError> {
        if let Some(refresh) = context.and_then(RequestContext::refresh_token) {
            return Ok(Some(refresh.to_string()));
        }
        Ok(self
            .load()
            .await?
            .and_then(|t| t.refresh_token().map(str::to_string)))
    }

    /// Loads the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if client storage cannot be read or holds a
    /// corrupt token.
    pub async fn load(&self) -> Result<Option<Token>, StorageError> {
        let Some(raw) = self.storage.get(ACCESS_TOKEN_KEY).await? else {
            return Ok(None);
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| StorageError::Serialization(format!("stored token: {e}")))
    }

    /// Persists a token to client storage, replacing the previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be written.
    pub async fn save(&self, token: &Token) -> Result<(), StorageError> {
        let raw = serde_json::to_string(token)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        self.storage.set(ACCESS_TOKEN_KEY, &raw).await?;
        tracing::debug!(token = %token.preview(), "token saved");
        Ok(())
    }

    /// Removes the persisted token.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage cannot be written.
    pub async fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(ACCESS_TOKEN_KEY).await?;
        tracing::debug!("token cleared");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use marquee_domain::REFRESH_TOKEN_KEY;
    use pretty_assertions::assert_eq;

    fn store() -> (TokenStore, MemoryStorage) {
        let storage = MemoryStorage::new();
        (TokenStore::new(Arc::new(storage.clone())), storage)
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let (tokens, _) = store();
        let token = Token::new("access123").unwrap();
        tokens.save(&token).await.unwrap();

        assert_eq!(tokens.get(None).await.unwrap().as_deref(), Some("access123"));
        assert_eq!(tokens.load().await.unwrap(), Some(token));
    }

    #[tokio::test]
    async fn test_context_wins_over_storage() {
        let (tokens, _) = store();
        tokens.save(&Token::new("persisted").unwrap()).await.unwrap();

        let ctx = RequestContext::new().with_cookie(ACCESS_TOKEN_KEY, "from-cookie");
        assert_eq!(
            tokens.get(Some(&ctx)).await.unwrap().as_deref(),
            Some("from-cookie")
        );

        let empty_ctx = RequestContext::new();
        assert_eq!(
            tokens.get(Some(&empty_ctx)).await.unwrap().as_deref(),
            Some("persisted")
        );
    }

    #[tokio::test]
    async fn test_save_never_touches_context() {
        let (tokens, storage) = store();
        let ctx = RequestContext::new().with_cookie(ACCESS_TOKEN_KEY, "from-cookie");
        tokens.save(&Token::new("new").unwrap()).await.unwrap();

        assert_eq!(ctx.access_token(), Some("from-cookie"));
        assert_eq!(storage.len().await, 1);
    }

    #[tokio::test]
    async fn test_refresh_credential_sources() {
        let (tokens, _) = store();
        assert_eq!(tokens.refresh_credential(None).await.unwrap(), None);

        let token = Token::new("a").unwrap().with_refresh(Some("r-stored".to_string()));
        tokens.save(&token).await.unwrap();
        assert_eq!(
            tokens.refresh_credential(None).await.unwrap().as_deref(),
            Some("r-stored")
        );

        let ctx = RequestContext::new().with_cookie(REFRESH_TOKEN_KEY, "r-cookie");
        assert_eq!(
            tokens.refresh_credential(Some(&ctx)).await.unwrap().as_deref(),
            Some("r-cookie")
        );
    }

    #[tokio::test]
    async fn test_clear() {
        let (tokens, _) = store();
        tokens.save(&Token::new("a").unwrap()).await.unwrap();
        tokens.clear().await.unwrap();
        assert_eq!(tokens.get(None).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_corrupt_token_is_an_error() {
        let (tokens, storage) = store();
        storage.set(ACCESS_TOKEN_KEY, "{not json").await.unwrap();
        let result = tokens.load().await;
        assert!(matches!(result, Err(StorageError::Serialization(_))));
    }
}
