use shared::mask::format_phone;

use super::FieldInner;

/// Phone numbers are only masked; there is no remote check.
pub(super) fn on_input(field: &FieldInner, raw: &str) {
    field.element.set_value(&format_phone(raw));
}
