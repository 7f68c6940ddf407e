//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every failure is an `invalid_request` whose details name the offending
//! field, the rejected value and a machine-readable code.

use std::str::FromStr;

use serde_json::json;

use crate::domain::ports::Side;
use crate::domain::{DeploymentId, Environment, Error, LogLevel};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ValidationCode {
    MissingField,
    InvalidUuid,
    InvalidLabel,
    InvalidToken,
}

impl ValidationCode {
    fn as_str(self) -> &'static str {
        match self {
            Self::MissingField => "missing_field",
            Self::InvalidUuid => "invalid_uuid",
            Self::InvalidLabel => "invalid_label",
            Self::InvalidToken => "invalid_token",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(self) -> &'static str {
        self.0
    }
}

pub(crate) fn field_error(
    field: FieldName,
    code: ValidationCode,
    message: impl Into<String>,
    value: Option<&str>,
) -> Error {
    let mut details = json!({
        "field": field.as_str(),
        "code": code.as_str(),
    });
    if let Some(value) = value {
        details["value"] = json!(value);
    }
    Error::invalid_request(message).with_details(details)
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    field_error(
        field,
        ValidationCode::MissingField,
        format!("missing required field: {name}"),
        None,
    )
}

/// Require a present, non-blank string and return it trimmed.
pub(crate) fn required_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    value
        .map(|raw| raw.trim().to_owned())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| missing_field_error(field))
}

pub(crate) fn parse_deployment_id(value: &str, field: FieldName) -> Result<DeploymentId, Error> {
    DeploymentId::from_str(value).map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            ValidationCode::InvalidUuid,
            format!("{name} must be a valid UUID"),
            Some(value),
        )
    })
}

fn parse_label<T: FromStr>(value: &str, field: FieldName, expected: &str) -> Result<T, Error> {
    value.parse().map_err(|_| {
        let name = field.as_str();
        field_error(
            field,
            ValidationCode::InvalidLabel,
            format!("{name} must be one of {expected}"),
            Some(value),
        )
    })
}

pub(crate) fn parse_environment(value: &str, field: FieldName) -> Result<Environment, Error> {
    parse_label(value, field, "dev|staging|prod")
}

pub(crate) fn parse_log_level(value: &str, field: FieldName) -> Result<LogLevel, Error> {
    parse_label(value, field, "error|warning|info|debug")
}

pub(crate) fn parse_side(value: &str, field: FieldName) -> Result<Side, Error> {
    parse_label(value, field, "left|right")
}

pub(crate) fn invalid_token_error(field: FieldName, message: impl Into<String>) -> Error {
    field_error(field, ValidationCode::InvalidToken, message, None)
}
