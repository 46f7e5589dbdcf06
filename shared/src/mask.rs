// Progressive input masks for Brazilian documents, postal codes and phone numbers.
// A separator is only written once a digit follows its boundary, so the masks
// can be reapplied on every keystroke.

/// Digit groups and separators of one masked field kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskRule {
    pub name: &'static str,
    /// `(boundary, separator)`: the separator goes between digit `boundary - 1` and `boundary`.
    pub groups: &'static [(usize, &'static str)],
    /// Written in front of the value once the first group is complete and more digits follow.
    pub lead: Option<&'static str>,
    pub max_digits: usize,
}

impl MaskRule {
    pub const CPF: MaskRule = MaskRule {
        name: "cpf",
        groups: &[(3, "."), (6, "."), (9, "-")],
        lead: None,
        max_digits: 11,
    };

    pub const CNPJ: MaskRule = MaskRule {
        name: "cnpj",
        groups: &[(2, "."), (5, "."), (8, "/"), (12, "-")],
        lead: None,
        max_digits: 14,
    };

    pub const CEP: MaskRule = MaskRule {
        name: "cep",
        groups: &[(5, "-")],
        lead: None,
        max_digits: 8,
    };

    pub const PHONE_LANDLINE: MaskRule = MaskRule {
        name: "phone_landline",
        groups: &[(2, ") "), (6, "-")],
        lead: Some("("),
        max_digits: 10,
    };

    pub const PHONE_MOBILE: MaskRule = MaskRule {
        name: "phone_mobile",
        groups: &[(2, ") "), (7, "-")],
        lead: Some("("),
        max_digits: 11,
    };

    /// Document fields share one control: up to 11 digits is a CPF, anything longer a CNPJ.
    pub fn for_document(digit_count: usize) -> &'static MaskRule {
        if digit_count <= Self::CPF.max_digits {
            &Self::CPF
        } else {
            &Self::CNPJ
        }
    }

    /// Up to 8 digits after the area code is a landline, more is a mobile number.
    pub fn for_phone(digit_count: usize) -> &'static MaskRule {
        if digit_count <= Self::PHONE_LANDLINE.max_digits {
            &Self::PHONE_LANDLINE
        } else {
            &Self::PHONE_MOBILE
        }
    }

    /// Masks `input`, ignoring non-digits and anything past `max_digits`.
    pub fn apply(&self, input: &str) -> String {
        let digits: Vec<char> = input
            .chars()
            .filter(char::is_ascii_digit)
            .take(self.max_digits)
            .collect();

        let mut masked = String::with_capacity(digits.len() + 2 * self.groups.len());
        if let (Some(lead), Some(&(first_boundary, _))) = (self.lead, self.groups.first()) {
            if digits.len() > first_boundary {
                masked.push_str(lead);
            }
        }

        for (position, digit) in digits.iter().enumerate() {
            if let Some((_, separator)) = self.groups.iter().find(|(boundary, _)| *boundary == position) {
                masked.push_str(separator);
            }
            masked.push(*digit);
        }
        masked
    }
}

pub fn strip_non_digits(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

pub fn format_cpf(digits: &str) -> String {
    MaskRule::CPF.apply(digits)
}

pub fn format_cnpj(digits: &str) -> String {
    MaskRule::CNPJ.apply(digits)
}

pub fn format_cep(digits: &str) -> String {
    MaskRule::CEP.apply(digits)
}

pub fn format_phone(digits: &str) -> String {
    let digits = strip_non_digits(digits);
    MaskRule::for_phone(digits.len()).apply(&digits)
}

/// CPF or CNPJ mask depending on how many digits were typed so far.
pub fn format_document(digits: &str) -> String {
    let digits = strip_non_digits(digits);
    MaskRule::for_document(digits.len()).apply(&digits)
}
