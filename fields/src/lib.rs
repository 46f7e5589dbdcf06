// Input-field controllers for Brazilian business forms: live masking of
// CPF/CNPJ, CEP, phone and email fields plus debounced remote validation.

pub mod client;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod element;
pub mod error;
pub mod form;

pub use client::{HttpValidationClient, ValidationService};
pub use config::FieldsConfig;
pub use controller::{CepTargets, FieldController, FieldKind};
pub use element::{ElementHandle, FieldElement, MemoryElement, MemoryPage, Page};
pub use error::ValidationError;
pub use form::{initialize_form, Form, FormConfig};
