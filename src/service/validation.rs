//! Field-by-field request validation with per-field message groups.

use crate::error::AppError;
use regex::Regex;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::sync::OnceLock;

/// Failed fields in the order they were checked, each with its messages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        let message = message.into();
        match self.fields.iter_mut().find(|(f, _)| f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn has(&self, field: &str) -> bool {
        self.fields.iter().any(|(f, _)| f == field)
    }

    pub fn messages(&self, field: &str) -> &[String] {
        self.fields
            .iter()
            .find(|(f, _)| f == field)
            .map(|(_, m)| m.as_slice())
            .unwrap_or(&[])
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

/// "student_id" -> "student id"
fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn email_pattern() -> Option<&'static Regex> {
    static EMAIL: OnceLock<Option<Regex>> = OnceLock::new();
    EMAIL
        .get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$").ok()
        })
        .as_ref()
}

fn is_blank(v: Option<&Value>) -> bool {
    match v {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(Value::Array(a)) => a.is_empty(),
        Some(_) => false,
    }
}

/// Collects errors for one request body.
pub struct Validator<'a> {
    payload: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> Validator<'a> {
    pub fn new(payload: &'a Map<String, Value>) -> Self {
        Validator {
            payload,
            errors: ValidationErrors::default(),
        }
    }

    /// Start the rule chain for one field.
    pub fn field(&mut self, name: &'static str) -> FieldRules<'_, 'a> {
        let payload: &'a Map<String, Value> = self.payload;
        FieldRules {
            value: payload.get(name),
            validator: self,
            name,
            halted: false,
        }
    }

    /// Record a failure found outside the rule chain (e.g. a store lookup).
    pub fn reject(&mut self, field: &str, message: impl Into<String>) {
        self.errors.add(field, message);
    }

    pub fn passes(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn into_error(self) -> AppError {
        AppError::Validation(self.errors)
    }

}

/// Rules for a single field. `required` and `string` halt the chain on failure; the rest accumulate.
pub struct FieldRules<'v, 'a> {
    validator: &'v mut Validator<'a>,
    name: &'static str,
    value: Option<&'a Value>,
    halted: bool,
}

impl<'v, 'a> FieldRules<'v, 'a> {
    fn fail(&mut self, message: String) {
        self.validator.errors.add(self.name, message);
    }

    pub fn required(mut self) -> Self {
        if !self.halted && is_blank(self.value) {
            let message = format!("The {} field is required.", attribute(self.name));
            self.fail(message);
            self.halted = true;
        }
        self
    }

    pub fn string(mut self) -> Self {
        if self.halted {
            return self;
        }
        if let Some(v) = self.value {
            if !v.is_string() && !v.is_null() {
                let message = format!("The {} must be a string.", attribute(self.name));
                self.fail(message);
                self.halted = true;
            }
        }
        self
    }

    /// Maximum length in characters for strings.
    pub fn max(mut self, max: usize) -> Self {
        if self.halted {
            return self;
        }
        if let Some(s) = self.value.and_then(Value::as_str) {
            if s.chars().count() > max {
                let message = format!(
                    "The {} must not be greater than {} characters.",
                    attribute(self.name),
                    max
                );
                self.fail(message);
            }
        }
        self
    }

    /// Non-string values fail this rule too.
    pub fn email(mut self) -> Self {
        if self.halted {
            return self;
        }
        let valid = match self.value {
            None | Some(Value::Null) => true,
            Some(Value::String(s)) => email_pattern().is_some_and(|re| re.is_match(s)),
            Some(_) => false,
        };
        if !valid {
            let message = format!("The {} must be a valid email address.", attribute(self.name));
            self.fail(message);
        }
        self
    }

    /// The raw value, unless a halting rule failed.
    pub fn value(self) -> Option<&'a Value> {
        if self.halted {
            None
        } else {
            self.value
        }
    }

    /// The string value, unless a halting rule failed.
    pub fn text(self) -> Option<&'a str> {
        self.value().and_then(Value::as_str)
    }
}
