// crates/aws-api-gate-providers/src/credentials.rs
// ============================================================================
// Module: AWS Credential Provider
// Description: Local credential lookup through the aws-config default chain.
// Purpose: Supply per-call credentials to the direct-call path.
// Dependencies: aws-api-gate-core, aws-config, aws-credential-types, tokio
// ============================================================================

//! ## Overview
//! Credentials come from the standard AWS provider chain (environment,
//! shared config and credentials files, SSO, container and instance
//! metadata), optionally pinned to a named profile. The chain is resolved on
//! every call so refreshed or rotated credentials are picked up.

// ============================================================================
// SECTION: Imports
// ============================================================================

use aws_api_gate_core::CredentialError;
use aws_api_gate_core::CredentialProvider;
use aws_api_gate_core::Credentials;
use aws_config::BehaviorVersion;
use aws_config::Region;
use aws_credential_types::provider::ProvideCredentials;
use aws_credential_types::provider::error::CredentialsError;
use tokio::runtime::Runtime;

use crate::runtime::block_on_with_runtime;
use crate::runtime::provider_runtime;

// ============================================================================
// SECTION: Provider
// ============================================================================

/// Credential provider backed by the aws-config default chain.
pub struct AwsConfigCredentialProvider {
    /// Named profile, when pinned.
    profile: Option<String>,
    /// Region used by region-scoped providers (SSO, STS).
    region: Option<String>,
    /// Runtime driving the async chain.
    runtime: Runtime,
}

impl AwsConfigCredentialProvider {
    /// Creates a provider for the optional profile and region.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialError::Provider`] when the runtime cannot start.
    pub fn new(profile: Option<String>, region: Option<String>) -> Result<Self, CredentialError> {
        let runtime =
            provider_runtime().map_err(|err| CredentialError::Provider(err.to_string()))?;
        Ok(Self {
            profile: profile.filter(|name| !name.trim().is_empty()),
            region: region.filter(|name| !name.trim().is_empty()),
            runtime,
        })
    }

    /// Returns the pinned profile.
    #[must_use]
    pub fn profile(&self) -> Option<&str> {
        self.profile.as_deref()
    }
}

impl CredentialProvider for AwsConfigCredentialProvider {
    fn get_local_credentials(&self) -> Result<Credentials, CredentialError> {
        let profile = self.profile.clone();
        let region = self.region.clone();
        block_on_with_runtime(&self.runtime, async move {
            let mut loader = aws_config::defaults(BehaviorVersion::latest());
            if let Some(profile) = profile {
                loader = loader.profile_name(profile);
            }
            if let Some(region) = region {
                loader = loader.region(Region::new(region));
            }
            let shared_config = loader.load().await;
            let Some(provider) = shared_config.credentials_provider() else {
                return Err(CredentialError::NoCredentials);
            };
            let credentials = provider.provide_credentials().await.map_err(map_error)?;
            Ok(Credentials {
                access_key_id: credentials.access_key_id().to_string(),
                secret_access_key: credentials.secret_access_key().to_string(),
                session_token: credentials.session_token().map(str::to_string),
            })
        })
        .map_err(|err| CredentialError::Provider(err.to_string()))?
    }
}

/// Maps chain failures; an exhausted chain means no credentials.
fn map_error(err: CredentialsError) -> CredentialError {
    match err {
        CredentialsError::CredentialsNotLoaded(_) => CredentialError::NoCredentials,
        other => CredentialError::Provider(other.to_string()),
    }
}
