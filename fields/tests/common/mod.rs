// Scripted `ValidationService` and tracing setup shared by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use fields::{ValidationError, ValidationService};
use shared::models::{AddressData, CepLookup, DocumentValidation, EmailValidation};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub method: &'static str,
    pub argument: String,
}

/// Answers every call with a fixed response after `latency`; `None` answers with an HTTP 500 error.
#[derive(Default)]
pub struct MockService {
    latency: Duration,
    document: Option<DocumentValidation>,
    cep: Option<CepLookup>,
    email: Option<EmailValidation>,
    calls: Mutex<Vec<Call>>,
}

impl MockService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn document(mut self, valid: bool, message: &str) -> Self {
        self.document = Some(DocumentValidation {
            valid,
            message: message.to_string(),
            formatted: None,
            kind: None,
        });
        self
    }

    pub fn cep(mut self, lookup: CepLookup) -> Self {
        self.cep = Some(lookup);
        self
    }

    pub fn email(mut self, valid: bool, message: &str) -> Self {
        self.email = Some(EmailValidation {
            valid,
            message: message.to_string(),
        });
        self
    }

    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    async fn answer<T: Clone>(
        &self,
        method: &'static str,
        argument: &str,
        response: &Option<T>,
    ) -> Result<T, ValidationError> {
        self.calls.lock().unwrap().push(Call {
            method,
            argument: argument.to_string(),
        });
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        response.clone().ok_or_else(|| ValidationError::Status {
            endpoint: format!("/api/validation/{}", method),
            status: 500,
        })
    }
}

#[async_trait]
impl ValidationService for MockService {
    async fn validate_document(&self, document: &str) -> Result<DocumentValidation, ValidationError> {
        self.answer("document", document, &self.document).await
    }

    async fn lookup_cep(&self, cep: &str) -> Result<CepLookup, ValidationError> {
        self.answer("cep", cep, &self.cep).await
    }

    async fn validate_email(&self, email: &str) -> Result<EmailValidation, ValidationError> {
        self.answer("email", email, &self.email).await
    }
}

/// Lookup answered for CEP 01310-100, without a neighborhood.
pub fn paulista_lookup() -> CepLookup {
    CepLookup {
        success: true,
        message: "CEP encontrado".to_string(),
        data: Some(AddressData {
            street: Some("Avenida Paulista".to_string()),
            city: Some("São Paulo".to_string()),
            state_code: Some("SP".to_string()),
            ..Default::default()
        }),
    }
}
