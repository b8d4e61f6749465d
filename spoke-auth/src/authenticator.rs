//! Environment-aware, cached token acquisition

use crate::cache::TokenCache;
use crate::error::AuthResult;
use crate::flow::AuthFlow;
use crate::types::{AuthTokens, VuId};
use crate::version::{resolve_environment, AuthVersion, BaseEnvironment};
use spoke_config::SpokeConfig;
use spoke_http::HttpClient;
use std::sync::Arc;
use tracing::info;

/// Resolves the auth contract once and hands out per-VU tokens
pub struct Authenticator {
    environment: String,
    version: AuthVersion,
    flow: AuthFlow,
    cache: TokenCache,
}

impl Authenticator {
    pub fn new(environment: impl Into<String>, flow: AuthFlow) -> Self {
        let environment = environment.into();
        let version = AuthVersion::resolve(Some(&environment));
        info!(
            "Using authentication version {} for environment {} ({})",
            version,
            environment,
            BaseEnvironment::of(Some(&environment))
        );

        Self {
            environment,
            version,
            flow,
            cache: TokenCache::new(),
        }
    }

    /// Build from configuration. `environment` overrides the configured name.
    pub fn from_config(
        client: Arc<dyn HttpClient>,
        config: &SpokeConfig,
        environment: Option<&str>,
    ) -> AuthResult<Self> {
        let environment = resolve_environment(environment, config.environment.name());
        let flow = AuthFlow::from_config(client, config)?;
        Ok(Self::new(environment, flow))
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn version(&self) -> AuthVersion {
        self.version
    }

    pub fn base_environment(&self) -> BaseEnvironment {
        BaseEnvironment::of(Some(&self.environment))
    }

    pub fn flow(&self) -> &AuthFlow {
        &self.flow
    }

    pub fn cache(&self) -> &TokenCache {
        &self.cache
    }

    /// Tokens for a VU, authenticating on its first request only
    pub async fn token_for(&self, vu: VuId) -> Option<AuthTokens> {
        let version = self.version;
        self.cache
            .get_or_acquire(vu, || self.flow.acquire(version))
            .await
    }

    /// Fresh, uncached handshake
    pub async fn login(&self) -> AuthResult<AuthTokens> {
        self.flow.authenticate(self.version).await
    }
}
