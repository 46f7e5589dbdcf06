//! Binding a whole form's fields from one declarative configuration.

use std::sync::Arc;

use serde::Deserialize;

use crate::client::ValidationService;
use crate::config::FieldsConfig;
use crate::controller::{CepTargets, FieldController, FieldKind};
use crate::element::{ElementHandle, Page};

/// Ids of the fields to bind, grouped by kind.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct FormConfig {
    pub document_fields: Vec<String>,
    pub cep_fields: Vec<CepFieldConfig>,
    pub phone_fields: Vec<String>,
    pub email_fields: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CepFieldConfig {
    pub field_id: String,
    #[serde(default)]
    pub options: CepOptions,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct CepOptions {
    pub address_field: Option<String>,
    pub neighborhood_field: Option<String>,
    pub city_field: Option<String>,
    pub state_field: Option<String>,
    pub next_field: Option<String>,
}

impl FormConfig {
    pub fn from_json_str(config_str: &str) -> Result<Self, anyhow::Error> {
        let config: FormConfig = serde_json::from_str(config_str)?;
        Ok(config)
    }
}

/// Controllers bound by [`initialize_form`]. Dropping the form tears them all down.
#[derive(Default)]
pub struct Form {
    controllers: Vec<FieldController>,
}

impl Form {
    pub fn controllers(&self) -> &[FieldController] {
        &self.controllers
    }

    pub fn controller(&self, id: &str) -> Option<&FieldController> {
        self.controllers.iter().find(|c| c.id() == id)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    pub fn teardown(&self) {
        for controller in &self.controllers {
            controller.teardown();
        }
    }
}

/// Binds every configured field that `page` can resolve.
///
/// Unknown ids are skipped, never an error. The same goes for CEP sibling
/// ids, which simply leave that target unset.
pub fn initialize_form(
    page: &dyn Page,
    config: &FormConfig,
    service: Arc<dyn ValidationService>,
    settings: &FieldsConfig,
) -> Form {
    let mut form = Form::default();
    let mut bind = |id: &str, kind: FieldKind| {
        let Some(element) = page.element(id) else {
            tracing::warn!(field = %id, kind = kind.name(), "Field not found, skipping");
            return;
        };
        let delay = kind.default_delay(&settings.delays);
        let controller = FieldController::builder(element, kind)
            .service(Arc::clone(&service))
            .delay(delay)
            .messages(settings.messages.clone())
            .build();
        form.controllers.push(controller);
    };

    for id in &config.document_fields {
        bind(id.as_str(), FieldKind::Document);
    }
    for cep in &config.cep_fields {
        let targets = resolve_targets(page, &cep.options);
        bind(cep.field_id.as_str(), FieldKind::Cep(targets));
    }
    for id in &config.phone_fields {
        bind(id.as_str(), FieldKind::Phone);
    }
    for id in &config.email_fields {
        bind(id.as_str(), FieldKind::Email);
    }

    tracing::info!(
        fields = form.len(),
        documents = config.document_fields.len(),
        ceps = config.cep_fields.len(),
        phones = config.phone_fields.len(),
        emails = config.email_fields.len(),
        "Form initialized"
    );
    form
}

fn resolve_targets(page: &dyn Page, options: &CepOptions) -> CepTargets {
    let lookup = |id: &Option<String>| -> Option<ElementHandle> {
        let id = id.as_deref()?;
        let element = page.element(id);
        if element.is_none() {
            tracing::warn!(field = %id, "CEP target field not found");
        }
        element
    };

    CepTargets {
        address: lookup(&options.address_field),
        neighborhood: lookup(&options.neighborhood_field),
        city: lookup(&options.city_field),
        state: lookup(&options.state_field),
        next: lookup(&options.next_field),
    }
}
