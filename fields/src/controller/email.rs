use std::sync::Arc;

use shared::models::EmailValidation;

use super::FieldInner;
use crate::element::{clear_validation, render_validation};

pub(super) fn on_input(field: &Arc<FieldInner>, raw: &str, ticket: u64) {
    field.debouncer.cancel();

    if raw.is_empty() {
        clear_validation(field.element.as_ref());
        return;
    }

    let Some(service) = field.service.clone() else {
        return;
    };
    let email = raw.to_string();
    let task_field = Arc::clone(field);
    field.schedule(async move {
        let result = match service.validate_email(&email).await {
            Ok(result) => result,
            Err(e) => {
                tracing::error!(field = %task_field.id(), error = %e, "Email validation failed");
                EmailValidation::failure(task_field.messages.email_error.clone())
            }
        };
        if task_field.is_stale(ticket) {
            return;
        }
        render_validation(task_field.element.as_ref(), result.valid, &result.message);
    });
}
