// Formatting and data model shared by the form field controllers.
// Everything in this crate is pure: no I/O, no timers.

pub mod brazilian_format;
pub mod mask;
pub mod models;
pub mod table;

pub use brazilian_format::{
    format_currency_brl, format_date, format_number, parse_currency_input, DatePattern,
};
pub use mask::{
    format_cep, format_cnpj, format_cpf, format_document, format_phone, strip_non_digits, MaskRule,
};
