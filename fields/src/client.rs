//! Client for the backend validation endpoints.
//!
//! All endpoints take a small JSON body over `POST` and answer JSON. A non-2xx
//! status or an unparsable body is reported the same way as a transport error.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use shared::models::{CepLookup, DocumentValidation, EmailValidation};

use crate::config::ApiSettings;
use crate::error::ValidationError;

/// Remote checks the field controllers depend on.
#[async_trait]
pub trait ValidationService: Send + Sync {
    /// CPF or CNPJ digits; the backend decides which by length.
    async fn validate_document(&self, document: &str) -> Result<DocumentValidation, ValidationError>;

    async fn lookup_cep(&self, cep: &str) -> Result<CepLookup, ValidationError>;

    async fn validate_email(&self, email: &str) -> Result<EmailValidation, ValidationError>;
}

/// HTTP implementation of [`ValidationService`].
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct HttpValidationClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: Client,
    api: ApiSettings,
}

impl HttpValidationClient {
    /// Builds a client with the configured request timeout.
    pub fn from_config(api: &ApiSettings) -> Result<Self, ValidationError> {
        let http_client = Client::builder().timeout(api.timeout()).build()?;
        Ok(Self::with_http_client(api.clone(), http_client))
    }

    /// Uses an existing `reqwest::Client`, e.g. one carrying session cookies.
    pub fn with_http_client(api: ApiSettings, http_client: Client) -> Self {
        Self {
            inner: Arc::new(ClientInner { http_client, api }),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.inner.api.base_url
    }

    pub async fn validate_cpf(&self, cpf: &str) -> Result<DocumentValidation, ValidationError> {
        self.post(&self.inner.api.cpf_path, &json!({ "cpf": cpf })).await
    }

    pub async fn validate_cnpj(&self, cnpj: &str) -> Result<DocumentValidation, ValidationError> {
        self.post(&self.inner.api.cnpj_path, &json!({ "cnpj": cnpj })).await
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.inner.api.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn post<B, R>(&self, path: &str, body: &B) -> Result<R, ValidationError>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let url = self.url(path);
        tracing::debug!(endpoint = %path, "Posting validation request");

        let response = self.inner.http_client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ValidationError::Status {
                endpoint: path.to_string(),
                status: status.as_u16(),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text).map_err(|e| ValidationError::Decode {
            endpoint: path.to_string(),
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ValidationService for HttpValidationClient {
    async fn validate_document(&self, document: &str) -> Result<DocumentValidation, ValidationError> {
        self.post(&self.inner.api.document_path, &json!({ "document": document })).await
    }

    async fn lookup_cep(&self, cep: &str) -> Result<CepLookup, ValidationError> {
        self.post(&self.inner.api.cep_path, &json!({ "cep": cep })).await
    }

    async fn validate_email(&self, email: &str) -> Result<EmailValidation, ValidationError> {
        self.post(&self.inner.api.email_path, &json!({ "email": email })).await
    }
}
