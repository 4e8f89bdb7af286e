//! Infrastructure implementation of the `ProviderClient` port.
//!
//! A thin REST client for the managed hosting provider. Every call returns a
//! tagged [`ProviderError`]; HTTP status errors and transport failures are
//! distinguished so callers can log them separately.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::Deserialize;
use serde_json::json;

use crate::application::ports::{App, ProviderClient, SystemUser};
use crate::domain::error::ProviderError;
use crate::domain::{FeatureSet, ProviderConfig, WordpressOptions};

/// REST client over the provider API, authenticated with HTTP basic auth.
pub struct HttpProviderClient {
    agent: ureq::Agent,
    endpoint: String,
    authorization: String,
}

#[derive(Deserialize)]
struct UserEnvelope {
    data: SystemUser,
}

#[derive(Deserialize)]
struct UserListEnvelope {
    data: Vec<SystemUser>,
}

#[derive(Deserialize)]
struct AppEnvelope {
    data: App,
}

impl HttpProviderClient {
    #[must_use]
    pub fn new(config: &ProviderConfig) -> Self {
        let credentials = format!("{}:{}", config.client_id, config.api_key);
        Self {
            agent: ureq::AgentBuilder::new().build(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            authorization: format!("Basic {}", BASE64.encode(credentials)),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn post(&self, path: &str, body: serde_json::Value) -> Result<ureq::Response, ProviderError> {
        self.agent
            .post(&self.url(path))
            .set("Authorization", &self.authorization)
            .send_json(body)
            .map_err(map_ureq_error)
    }
}

impl ProviderClient for HttpProviderClient {
    fn create_system_user(
        &self,
        username: &str,
        password: &str,
    ) -> Result<SystemUser, ProviderError> {
        let response = self.post(
            "/sysusers",
            json!({ "name": username, "password": password }),
        )?;
        let envelope: UserEnvelope = response
            .into_json()
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        Ok(envelope.data)
    }

    fn create_app(
        &self,
        user: &SystemUser,
        php_version: &str,
        domain: &str,
        options: &WordpressOptions,
        _features: &FeatureSet,
    ) -> Result<App, ProviderError> {
        let response = self.post(
            "/apps",
            json!({
                "sysuserid": user.id,
                "name": user.name,
                "runtime": format!("php{php_version}"),
                "domains": [domain, format!("*.{domain}")],
                "wordpress": {
                    "site_title": options.site_title,
                    "admin_user": options.admin_user,
                    "admin_password": options.admin_password,
                    "admin_email": options.admin_email,
                },
            }),
        )?;
        let envelope: AppEnvelope = response
            .into_json()
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        Ok(envelope.data)
    }

    fn delete_system_user(&self, user: &SystemUser) -> Result<(), ProviderError> {
        self.agent
            .delete(&self.url(&format!("/sysusers/{}", user.id)))
            .set("Authorization", &self.authorization)
            .call()
            .map_err(map_ureq_error)?;
        Ok(())
    }

    fn list_system_users(&self) -> Result<Vec<SystemUser>, ProviderError> {
        let response = self
            .agent
            .get(&self.url("/sysusers"))
            .set("Authorization", &self.authorization)
            .call()
            .map_err(map_ureq_error)?;
        let envelope: UserListEnvelope = response
            .into_json()
            .map_err(|err| ProviderError::Decode(err.to_string()))?;
        Ok(envelope.data)
    }
}

fn map_ureq_error(err: ureq::Error) -> ProviderError {
    match err {
        ureq::Error::Status(status, response) => ProviderError::Api {
            status,
            message: response
                .into_string()
                .unwrap_or_else(|_| "<unreadable response body>".to_string()),
        },
        ureq::Error::Transport(transport) => ProviderError::Transport(transport.to_string()),
    }
}

// ── Unit tests ───────────────────────────────────────────────────────────────
