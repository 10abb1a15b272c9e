//! Request validation and the student/course operations built on the store.

mod course;
mod student;
mod validation;
pub use course::CourseService;
pub use student::StudentService;
pub use validation::{FieldRules, ValidationErrors, Validator};

use serde_json::Value;

/// Parse a numeric id the way path segments and `student_id` values arrive: JSON integers
/// or digit-only strings. Anything else identifies no row.
pub(crate) fn parse_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_u64().and_then(|u| i64::try_from(u).ok()),
        Value::String(s) => parse_id_str(s),
        _ => None,
    }
}

pub(crate) fn parse_id_str(s: &str) -> Option<i64> {
    let s = s.trim();
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
