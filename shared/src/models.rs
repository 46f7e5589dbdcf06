use serde::{Deserialize, Deserializer, Serialize};

/// Document type reported by the validation backend.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    Cpf,
    Cnpj,
    Unknown,
}

impl DocumentKind {
    // Only complete documents are classified, same as the backend does.
    pub fn detect(digits: &str) -> Self {
        match digits.chars().filter(char::is_ascii_digit).count() {
            11 => DocumentKind::Cpf,
            14 => DocumentKind::Cnpj,
            _ => DocumentKind::Unknown,
        }
    }
}

/// Answer of the document, CPF and CNPJ endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DocumentValidation {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub formatted: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<DocumentKind>,
}

impl DocumentValidation {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
            formatted: None,
            kind: None,
        }
    }
}

/// Answer of the email endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmailValidation {
    pub valid: bool,
    #[serde(default)]
    pub message: String,
}

impl EmailValidation {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// Answer of the CEP lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CepLookup {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<AddressData>,
}

impl CepLookup {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            data: None,
        }
    }
}

/// Address returned by a CEP lookup. Blank attributes deserialize to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddressData {
    #[serde(rename = "logradouro", default, deserialize_with = "blank_as_none")]
    pub street: Option<String>,
    #[serde(rename = "bairro", default, deserialize_with = "blank_as_none")]
    pub neighborhood: Option<String>,
    #[serde(rename = "localidade", default, deserialize_with = "blank_as_none")]
    pub city: Option<String>,
    #[serde(rename = "uf", default, deserialize_with = "blank_as_none")]
    pub state_code: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub cep: Option<String>,
    #[serde(
        rename = "complemento",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub complement: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ibge: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub ddd: Option<String>,
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}
