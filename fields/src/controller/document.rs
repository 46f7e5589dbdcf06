use std::sync::Arc;

use shared::mask::{format_document, strip_non_digits};
use shared::models::DocumentValidation;

use super::FieldInner;
use crate::element::{clear_validation, render_validation};

/// A CPF is complete at 11 digits; shorter input is never sent.
pub const MIN_VALIDATION_DIGITS: usize = 11;

pub(super) fn on_input(field: &Arc<FieldInner>, raw: &str, ticket: u64) {
    let formatted = format_document(raw);
    field.element.set_value(&formatted);
    field.debouncer.cancel();

    let digits = strip_non_digits(&formatted);
    if digits.len() < MIN_VALIDATION_DIGITS {
        clear_validation(field.element.as_ref());
        return;
    }

    let Some(service) = field.service.clone() else {
        return;
    };
    let task_field = Arc::clone(field);
    field.schedule(async move {
        let result = match service.validate_document(&digits).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(field = %task_field.id(), error = %e, "Document validation failed");
                DocumentValidation::failure(task_field.messages.document_error.clone())
            }
        };
        if task_field.is_stale(ticket) {
            return;
        }
        render_validation(task_field.element.as_ref(), result.valid, &result.message);
    });
}
