//! Downstream service registry
//!
//! Resolves the base URL for each downstream dependency once at startup,
//! from configuration overrides or the documented cluster-internal
//! fallbacks. A malformed base URL is fatal here, before the listener
//! binds, never a runtime error.

use url::Url;

use crate::config::ServicesConfig;
use crate::error::{Error, Result};

/// Downstream services the gateway forwards to.
///
/// Being an enum, an unknown service name is unrepresentable; there is no
/// stringly-typed lookup to get wrong at runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceKind {
    Auth,
    Image,
}

impl ServiceKind {
    /// Stable identifier used in logs and gateway error payloads.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Auth => "auth-service",
            Self::Image => "image-service",
        }
    }
}

/// A resolved downstream endpoint. Immutable after startup.
#[derive(Debug, Clone)]
pub struct ServiceEndpoint {
    pub name: &'static str,
    pub base_url: Url,
}

impl ServiceEndpoint {
    fn resolve(kind: ServiceKind, raw: &str) -> Result<Self> {
        let base_url = Url::parse(raw).map_err(|source| Error::InvalidBaseUrl {
            service: kind.name(),
            url: raw.to_string(),
            source,
        })?;

        Ok(Self {
            name: kind.name(),
            base_url,
        })
    }

    /// Join a downstream request path onto the base URL.
    pub fn join(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|source| Error::InvalidBaseUrl {
            service: self.name,
            url: format!("{}{path}", self.base_url),
            source,
        })
    }
}

/// Resolves downstream endpoints for the lifetime of the process.
#[derive(Debug, Clone)]
pub struct ServiceRegistry {
    auth: ServiceEndpoint,
    image: ServiceEndpoint,
}

impl ServiceRegistry {
    /// Validate and resolve every configured endpoint.
    pub fn from_config(services: &ServicesConfig) -> Result<Self> {
        Ok(Self {
            auth: ServiceEndpoint::resolve(ServiceKind::Auth, &services.auth_url)?,
            image: ServiceEndpoint::resolve(ServiceKind::Image, &services.image_url)?,
        })
    }

    /// Look up the endpoint for a downstream service.
    #[must_use]
    pub fn resolve(&self, kind: ServiceKind) -> &ServiceEndpoint {
        match kind {
            ServiceKind::Auth => &self.auth,
            ServiceKind::Image => &self.image,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolves_configured_urls() {
        let services = ServicesConfig {
            auth_url: "http://auth.internal:8081".to_string(),
            image_url: "http://image.internal:8082".to_string(),
        };

        let registry = ServiceRegistry::from_config(&services).expect("valid config");

        let auth = registry.resolve(ServiceKind::Auth);
        assert_eq!(auth.name, "auth-service");
        assert_eq!(auth.base_url.as_str(), "http://auth.internal:8081/");

        let image = registry.resolve(ServiceKind::Image);
        assert_eq!(image.name, "image-service");
        assert_eq!(image.base_url.as_str(), "http://image.internal:8082/");
    }

    #[test]
    fn test_default_fallbacks_are_valid() {
        let registry =
            ServiceRegistry::from_config(&ServicesConfig::default()).expect("fallbacks parse");

        assert_eq!(
            registry.resolve(ServiceKind::Auth).base_url.host_str(),
            Some("auth-service.prod-auth.svc.cluster.local")
        );
        assert_eq!(
            registry.resolve(ServiceKind::Image).base_url.host_str(),
            Some("image-service.prod-image.svc.cluster.local")
        );
    }

    #[test]
    fn test_malformed_url_is_fatal() {
        let services = ServicesConfig {
            auth_url: "not a url".to_string(),
            image_url: "http://image.internal:8082".to_string(),
        };

        let err = ServiceRegistry::from_config(&services).unwrap_err();
        assert!(matches!(err, Error::InvalidBaseUrl { service: "auth-service", .. }));
    }

    #[test]
    fn test_join_downstream_path() {
        let services = ServicesConfig {
            auth_url: "http://auth.internal:8081".to_string(),
            image_url: "http://image.internal:8082".to_string(),
        };
        let registry = ServiceRegistry::from_config(&services).expect("valid config");

        let url = registry
            .resolve(ServiceKind::Auth)
            .join("/validate")
            .expect("join");
        assert_eq!(url.as_str(), "http://auth.internal:8081/validate");
    }
}
