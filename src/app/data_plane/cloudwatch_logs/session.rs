//! CloudWatch Logs client session
//!
//! A [`ClientSession`] is created once per successful authentication and never mutated.
//! Two sessions are equal only if they are the same authentication result, so replacing the
//! session with a freshly authenticated one (even with identical settings) is a session change.

#![warn(clippy::all, rust_2018_idioms)]

use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use std::sync::Arc;
use uuid::Uuid;

use super::api::{LogsApi, SdkLogsApi};
use super::error::AuthError;
use crate::app::aws_regions::is_valid_region;

/// Long-term or temporary access keys
#[derive(Clone, Default, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl StaticCredentials {
    pub fn new(access_key_id: impl Into<String>, secret_access_key: impl Into<String>) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: None,
        }
    }

    fn validate(&self) -> Result<(), AuthError> {
        if self.access_key_id.trim().is_empty() {
            return Err(AuthError::MissingAccessKey);
        }
        if self.secret_access_key.trim().is_empty() {
            return Err(AuthError::MissingSecretKey);
        }
        Ok(())
    }
}

impl std::fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Resolved connection to CloudWatch Logs
#[derive(Clone)]
pub struct ClientSession {
    id: Uuid,
    region: String,
    endpoint_url: Option<String>,
    access_key_id: String,
    api: Arc<dyn LogsApi>,
}

impl ClientSession {
    /// Wrap an existing [`LogsApi`] implementation in a new session
    pub fn with_api(
        region: impl Into<String>,
        endpoint_url: Option<String>,
        api: Arc<dyn LogsApi>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            region: region.into(),
            endpoint_url,
            access_key_id: String::new(),
            api,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn region(&self) -> &str {
        &self.region
    }

    pub fn endpoint_url(&self) -> Option<&str> {
        self.endpoint_url.as_deref()
    }

    pub fn access_key_id(&self) -> &str {
        &self.access_key_id
    }

    pub fn api(&self) -> &Arc<dyn LogsApi> {
        &self.api
    }
}

impl PartialEq for ClientSession {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ClientSession {}

impl std::fmt::Debug for ClientSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientSession")
            .field("id", &self.id)
            .field("region", &self.region)
            .field("endpoint_url", &self.endpoint_url)
            .finish_non_exhaustive()
    }
}

fn validate_endpoint(endpoint: &str) -> Result<String, AuthError> {
    let invalid = |reason: &str| AuthError::InvalidEndpoint {
        url: endpoint.to_string(),
        reason: reason.to_string(),
    };

    let url = url::Url::parse(endpoint).map_err(|e| invalid(&e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid("scheme must be http or https"));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(endpoint.trim_end_matches('/').to_string())
}

/// Build a session for `region`, optionally against a custom endpoint.
///
/// SDK retries are disabled: every failure is reported to the caller as is. When
/// `verbose_logging` is set, SDK request/response logging is switched on in the global
/// tracing filter.
pub fn authenticate(
    credentials: &StaticCredentials,
    region: &str,
    endpoint_url: Option<&str>,
    verbose_logging: bool,
) -> Result<ClientSession, AuthError> {
    credentials.validate()?;

    let region = region.trim();
    if !is_valid_region(region) {
        return Err(AuthError::InvalidRegion(region.to_string()));
    }

    let endpoint_url = endpoint_url
        .map(str::trim)
        .filter(|url| !url.is_empty())
        .map(validate_endpoint)
        .transpose()?;

    let sdk_credentials = aws_credential_types::Credentials::new(
        &credentials.access_key_id,
        &credentials.secret_access_key,
        credentials.session_token.clone(),
        None,
        "cloudviz",
    );

    let mut builder = cloudwatchlogs::Config::builder()
        .behavior_version(aws_config::BehaviorVersion::latest())
        .region(aws_types::region::Region::new(region.to_string()))
        .credentials_provider(sdk_credentials)
        .retry_config(aws_smithy_types::retry::RetryConfig::disabled());

    if let Some(endpoint) = &endpoint_url {
        builder = builder.endpoint_url(endpoint.clone());
    }

    let client = cloudwatchlogs::Client::from_conf(builder.build());

    if verbose_logging {
        crate::set_sdk_wire_logging(true);
    }

    log_info!(
        "CloudWatch Logs session created for region {} (endpoint: {})",
        region,
        endpoint_url.as_deref().unwrap_or("default")
    );

    Ok(ClientSession {
        id: Uuid::new_v4(),
        region: region.to_string(),
        endpoint_url,
        access_key_id: credentials.access_key_id.clone(),
        api: Arc::new(SdkLogsApi::new(client)),
    })
}
