use std::sync::Arc;

use shared::mask::{format_cep, strip_non_digits, MaskRule};
use shared::models::{AddressData, CepLookup};

use super::{FieldInner, FieldKind};
use crate::element::{render_validation, ElementHandle};

/// Sibling fields a successful CEP lookup writes into.
///
/// Every target is optional; absent ones are skipped.
#[derive(Clone, Default)]
pub struct CepTargets {
    pub address: Option<ElementHandle>,
    pub neighborhood: Option<ElementHandle>,
    pub city: Option<ElementHandle>,
    pub state: Option<ElementHandle>,
    /// Focused after the address was filled in.
    pub next: Option<ElementHandle>,
}

impl CepTargets {
    /// Copies the attributes present in `data` into the matching targets.
    pub fn populate(&self, data: &AddressData) {
        let pairs = [
            (&self.address, &data.street),
            (&self.neighborhood, &data.neighborhood),
            (&self.city, &data.city),
            (&self.state, &data.state_code),
        ];
        for (target, value) in pairs {
            if let (Some(element), Some(value)) = (target, value) {
                element.set_value(value);
            }
        }
    }

    pub fn focus_next(&self) {
        if let Some(next) = &self.next {
            next.focus();
        }
    }
}

pub(super) fn on_input(field: &Arc<FieldInner>, raw: &str, ticket: u64) {
    let formatted = format_cep(raw);
    field.element.set_value(&formatted);
    field.debouncer.cancel();

    let digits = strip_non_digits(&formatted);
    if digits.len() != MaskRule::CEP.max_digits {
        return;
    }

    let Some(service) = field.service.clone() else {
        return;
    };
    let task_field = Arc::clone(field);
    field.schedule(async move {
        let lookup = match service.lookup_cep(&digits).await {
            Ok(lookup) => lookup,
            Err(e) => {
                tracing::error!(field = %task_field.id(), error = %e, "CEP lookup failed");
                CepLookup::failure(task_field.messages.cep_error.clone())
            }
        };
        if task_field.is_stale(ticket) {
            return;
        }

        if lookup.success {
            if let FieldKind::Cep(targets) = &task_field.kind {
                if let Some(data) = &lookup.data {
                    targets.populate(data);
                }
                targets.focus_next();
            }
        }
        render_validation(task_field.element.as_ref(), lookup.success, &lookup.message);
    });
}
