//! HTTP backend for the check-in endpoints.

use serde::Deserialize;
use serde_json::Value;

use super::error::SubmitError;

/// CSRF token header sent with every call.
pub const CSRF_HEADER: &str = "X-CSRF-TOKEN";

/// Envelope every check-in endpoint responds with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Value,
}

/// Result of the pre-wizard `/check-user` lookup, used to route between
/// new-user, resume, and already-checked-in flows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserLookup {
    pub user_exists: bool,
    #[serde(default)]
    pub has_check_in: bool,
    #[serde(default)]
    pub user_id: Option<i64>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub user_email: Option<String>,
    #[serde(default)]
    pub user_address: Option<String>,
}

/// Seam over the backend REST endpoints, so the orchestrator can be
/// exercised without a network.
#[allow(async_fn_in_trait)]
pub trait CheckInBackend {
    async fn submit_user_info(&self, body: &Value) -> Result<i64, SubmitError>;
    async fn submit_pet_info(&self, body: &Value) -> Result<i64, SubmitError>;
    async fn submit_pet_health(&self, body: &Value) -> Result<(), SubmitError>;
    async fn submit_checkin_data(&self, body: &Value) -> Result<i64, SubmitError>;
    async fn submit_extra_info(&self, body: &Value) -> Result<(), SubmitError>;
    /// Legacy single-shot submission of the whole document.
    async fn submit_full(&self, body: &Value) -> Result<(), SubmitError>;
    async fn check_user(&self, phone: &str) -> Result<UserLookup, SubmitError>;
}

/// `CheckInBackend` over HTTP with JSON bodies and a CSRF header.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
    csrf_token: String,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>, csrf_token: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            csrf_token: csrf_token.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn post(
        &self,
        endpoint: &'static str,
        path: &str,
        body: &Value,
    ) -> Result<ApiResponse, SubmitError> {
        let url = format!("{}{}", self.base_url.trim_end_matches('/'), path);
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(CSRF_HEADER, &self.csrf_token)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmitError::Http(format!(
                "Server returned status {}",
                response.status()
            )));
        }

        let api: ApiResponse = response.json().await?;
        if !api.success {
            return Err(SubmitError::Rejected {
                endpoint,
                message: api.message,
            });
        }
        Ok(api)
    }
}

fn require_id(response: &ApiResponse, field: &'static str) -> Result<i64, SubmitError> {
    response
        .data
        .get(field)
        .and_then(Value::as_i64)
        .ok_or(SubmitError::MissingField(field))
}

impl CheckInBackend for HttpBackend {
    async fn submit_user_info(&self, body: &Value) -> Result<i64, SubmitError> {
        let response = self
            .post("step1/user-info", "/checkin/step1/user-info", body)
            .await?;
        require_id(&response, "user_id")
    }

    async fn submit_pet_info(&self, body: &Value) -> Result<i64, SubmitError> {
        let response = self
            .post("step2/pet-info", "/checkin/step2/pet-info", body)
            .await?;
        require_id(&response, "pet_id")
    }

    async fn submit_pet_health(&self, body: &Value) -> Result<(), SubmitError> {
        self.post("step3/pet-health", "/checkin/step3/pet-health", body)
            .await?;
        Ok(())
    }

    async fn submit_checkin_data(&self, body: &Value) -> Result<i64, SubmitError> {
        let response = self
            .post("step4/checkin-data", "/checkin/step4/checkin-data", body)
            .await?;
        require_id(&response, "checkin_id")
    }

    async fn submit_extra_info(&self, body: &Value) -> Result<(), SubmitError> {
        self.post("step5/extra-info", "/checkin/step5/extra-info", body)
            .await?;
        Ok(())
    }

    async fn submit_full(&self, body: &Value) -> Result<(), SubmitError> {
        self.post("submit", "/checkin/submit", body).await?;
        Ok(())
    }

    async fn check_user(&self, phone: &str) -> Result<UserLookup, SubmitError> {
        let url = format!("{}/check-user", self.base_url.trim_end_matches('/'));
        tracing::debug!("POST {}", url);

        let response = self
            .client
            .post(&url)
            .header(CSRF_HEADER, &self.csrf_token)
            .json(&serde_json::json!({ "phone": phone }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmitError::Http(format!(
                "Server returned status {}",
                response.status()
            )));
        }
        Ok(response.json().await?)
    }
}
