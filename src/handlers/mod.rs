//! HTTP handlers for the student and course resources.

pub mod course;
pub mod student;
pub use course::*;
pub use student::*;
