// Settings for the validation endpoints, debounce delays and fallback messages.
// The defaults ship embedded from assets/config/default.json.
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct FieldsConfig {
    pub version: String,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub delays: DelaySettings,
    #[serde(default)]
    pub messages: MessageSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ApiSettings {
    pub base_url: String,
    pub document_path: String,
    pub cep_path: String,
    pub email_path: String,
    pub cpf_path: String,
    pub cnpj_path: String,
    pub timeout_ms: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: "http://localhost:5000".to_string(),
            document_path: "/api/validation/document".to_string(),
            cep_path: "/api/validation/cep".to_string(),
            email_path: "/api/validation/email".to_string(),
            cpf_path: "/api/validation/cpf".to_string(),
            cnpj_path: "/api/validation/cnpj".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl ApiSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        ApiSettings {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Quiet period before each kind of remote validation fires.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DelaySettings {
    pub document_ms: u64,
    pub cep_ms: u64,
    pub email_ms: u64,
}

impl Default for DelaySettings {
    fn default() -> Self {
        DelaySettings {
            document_ms: 1000,
            cep_ms: 500,
            email_ms: 1000,
        }
    }
}

impl DelaySettings {
    pub fn document(&self) -> Duration {
        Duration::from_millis(self.document_ms)
    }

    pub fn cep(&self) -> Duration {
        Duration::from_millis(self.cep_ms)
    }

    pub fn email(&self) -> Duration {
        Duration::from_millis(self.email_ms)
    }
}

/// Feedback shown when a validation endpoint cannot be reached or answers garbage.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct MessageSettings {
    pub document_error: String,
    pub cep_error: String,
    pub email_error: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        MessageSettings {
            document_error: "Erro na validação".to_string(),
            cep_error: "Erro na consulta do CEP".to_string(),
            email_error: "Erro ao validar email".to_string(),
        }
    }
}

impl FieldsConfig {
    pub fn load_default() -> Result<Self, anyhow::Error> {
        let config_str = include_str!("../assets/config/default.json");
        Self::from_json_str(config_str).context("embedded default configuration is invalid")
    }

    pub fn from_json_str(config_str: &str) -> Result<Self, anyhow::Error> {
        let config: FieldsConfig = serde_json::from_str(config_str)?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, anyhow::Error> {
        let path = path.as_ref();
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read configuration file '{}'", path.display()))?;
        Self::from_json_str(&config_str)
            .with_context(|| format!("failed to parse configuration file '{}'", path.display()))
    }
}
