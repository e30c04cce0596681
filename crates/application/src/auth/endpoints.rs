//! Backend endpoint layout.

use marquee_domain::{DomainError, DomainResult};
use url::Url;

/// Base URLs of the auth backend and of the app host serving `/api/refresh`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    backend: Url,
    app: Url,
}

impl Endpoints {
    /// Parses both base URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if either URL is malformed or cannot be a base.
    pub fn new(backend_url: &str, app_url: &str) -> DomainResult<Self> {
        Ok(Self {
            backend: parse_base(backend_url)?,
            app: parse_base(app_url)?,
        })
    }

    /// `POST /user/login`
    #[must_use]
    pub fn login(&self) -> Url {
        join(&self.backend, "user/login")
    }

    /// `POST /user/logout`
    #[must_use]
    pub fn logout(&self) -> Url {
        join(&self.backend, "user/logout")
    }

    /// `POST /user/register`
    #[must_use]
    pub fn register(&self) -> Url {
        join(&self.backend, "user/register")
    }

    /// `GET /session`
    #[must_use]
    pub fn session(&self) -> Url {
        join(&self.backend, "session")
    }

    /// `POST /user/profile`
    #[must_use]
    pub fn profiles(&self) -> Url {
        join(&self.backend, "user/profile")
    }

    /// `PUT /user/profile/{id}`
    #[must_use]
    pub fn profile(&self, id: &str) -> Url {
        let mut url = self.profiles();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(id);
        }
        url
    }

    /// `GET /images`
    #[must_use]
    pub fn profile_images(&self) -> Url {
        join(&self.backend, "images")
    }

    /// `POST /api/refresh` on the app host.
    #[must_use]
    pub fn refresh(&self) -> Url {
        join(&self.app, "api/refresh")
    }
}

fn parse_base(raw: &str) -> DomainResult<Url> {
    let mut url = Url::parse(raw.trim()).map_err(|e| DomainError::InvalidUrl(format!("{e}: {raw}")))?;
    if url.cannot_be_a_base() {
        return Err(DomainError::InvalidUrl(raw.to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

fn join(base: &Url, path: &str) -> Url {
    // Cannot fail: the base is validated and `path` is relative.
    base.join(path).unwrap_or_else(|_| base.clone())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_endpoint_layout() {
        let endpoints = Endpoints::new("https://api.example.com", "https://app.example.com").unwrap();
        assert_eq!(endpoints.login().as_str(), "https://api.example.com/user/login");
        assert_eq!(endpoints.session().as_str(), "https://api.example.com/session");
        assert_eq!(endpoints.refresh().as_str(), "https://app.example.com/api/refresh");
    }

    #[test]
    fn test_base_path_is_kept() {
        let endpoints = Endpoints::new("https://example.com/v1", "https://example.com").unwrap();
        assert_eq!(endpoints.logout().as_str(), "https://example.com/v1/user/logout");
        assert_eq!(
            endpoints.profile("p 1").as_str(),
            "https://example.com/v1/user/profile/p%201"
        );
    }

    #[test]
    fn test_invalid_base() {
        assert!(Endpoints::new("not a url", "https://example.com").is_err());
        assert!(Endpoints::new("mailto:a@b.c", "https://example.com").is_err());
    }
}
