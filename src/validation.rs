//! Request validation.
//!
//! Payloads are checked in two passes. The first walks the raw JSON against
//! the declared [`FieldSpec`]s of a [`RequestSchema`] and collects every
//! shape violation (missing field, wrong type, empty string or array). Only a
//! payload with a valid shape is deserialized into its typed form, after
//! which the `validator` rules (lengths, ranges, emails) run. Either pass
//! fails with [`ServiceError::ValidationError`] listing all offending fields.

use crate::errors::{FieldViolation, ServiceError};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    Json,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Expected JSON type of a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Integer,
    String,
    NonEmptyString,
    Bool,
    /// `YYYY-MM-DD`
    Date,
    Object,
    NonEmptyArray,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// Declarative shape of a request body.
///
/// Update payloads set `PARTIAL` and usually reuse the create schema's
/// fields: every field becomes optional but keeps its kind.
pub trait RequestSchema: DeserializeOwned + Validate {
    const FIELDS: &'static [FieldSpec];
    const PARTIAL: bool = false;
}

fn kind_violation(kind: FieldKind, value: &Value) -> Option<&'static str> {
    match kind {
        FieldKind::Number => (!value.is_number()).then_some("must be a number"),
        FieldKind::Integer => (!(value.is_i64() || value.is_u64())).then_some("must be an integer"),
        FieldKind::String => (!value.is_string()).then_some("must be a string"),
        FieldKind::NonEmptyString => match value.as_str() {
            Some(s) if !s.trim().is_empty() => None,
            Some(_) => Some("must not be empty"),
            None => Some("must be a string"),
        },
        FieldKind::Bool => (!value.is_boolean()).then_some("must be a boolean"),
        FieldKind::Date => match value.as_str() {
            Some(s) if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok() => None,
            _ => Some("must be a date (YYYY-MM-DD)"),
        },
        FieldKind::Object => (!value.is_object()).then_some("must be an object"),
        FieldKind::NonEmptyArray => match value.as_array() {
            Some(items) if !items.is_empty() => None,
            Some(_) => Some("must contain at least one item"),
            None => Some("must be an array"),
        },
    }
}

/// Checks `payload` against `fields` and returns every violation found.
pub fn validate_payload(payload: &Value, fields: &[FieldSpec], partial: bool) -> Vec<FieldViolation> {
    let Some(object) = payload.as_object() else {
        return vec![FieldViolation::new("body", "must be a JSON object")];
    };

    let mut violations = Vec::new();
    for spec in fields {
        match object.get(spec.name) {
            None | Some(Value::Null) => {
                if spec.required && !partial {
                    violations.push(FieldViolation::new(spec.name, "is required"));
                }
            }
            Some(value) => {
                if let Some(message) = kind_violation(spec.kind, value) {
                    violations.push(FieldViolation::new(spec.name, message));
                }
            }
        }
    }
    violations
}

/// `validator` custom rule for money and quantity amounts.
pub fn non_negative_decimal(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        let mut err = ValidationError::new("non_negative");
        err.message = Some("must not be negative".into());
        return Err(err);
    }
    Ok(())
}

/// Flattens `validator` errors into field violations, nested fields joined
/// with `.` and list entries indexed as `field[i]`. Sorted by field name.
pub fn flatten_validation_errors(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut out = Vec::new();
    collect_violations("", errors, &mut out);
    out.sort_by(|a, b| a.field.cmp(&b.field));
    out
}

fn collect_violations(prefix: &str, errors: &ValidationErrors, out: &mut Vec<FieldViolation>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    let message = err
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("failed '{}' check", err.code));
                    out.push(FieldViolation::new(path.clone(), message));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_violations(&path, nested, out),
            ValidationErrorsKind::List(entries) => {
                for (index, nested) in entries {
                    collect_violations(&format!("{}[{}]", path, index), nested, out);
                }
            }
        }
    }
}

/// Runs both validation passes and produces the typed request.
pub fn parse_payload<T: RequestSchema>(payload: Value) -> Result<T, ServiceError> {
    let violations = validate_payload(&payload, T::FIELDS, T::PARTIAL);
    if !violations.is_empty() {
        return Err(ServiceError::ValidationError(violations));
    }

    let typed: T = serde_json::from_value(payload)
        .map_err(|e| ServiceError::invalid_field("body", e.to_string()))?;
    typed.validate()?;
    Ok(typed)
}

/// JSON body extractor that rejects invalid payloads with a 400 listing
/// every offending field.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: RequestSchema,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ServiceError::invalid_field("body", rejection.body_text()))?;
        parse_payload(value).map(ValidatedJson)
    }
}
