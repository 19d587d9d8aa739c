use thiserror::Error;

/// Returned when a string does not name any variant of one of the closed
/// reminder enums.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Invalid {field}: `{value}`. Valid values are: {}", valid.join(", "))]
pub struct InvalidVariantError {
    pub field: &'static str,
    pub value: String,
    pub valid: &'static [&'static str],
}

impl InvalidVariantError {
    pub(crate) fn new(field: &'static str, value: &str, valid: &'static [&'static str]) -> Self {
        Self {
            field,
            value: value.to_string(),
            valid,
        }
    }
}
