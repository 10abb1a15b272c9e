//! Persistence for students, courses and `course_student` rows.
//!
//! `PgStore` is the production backend; `MemoryStore` keeps the same tables in process
//! for tests and database-less runs.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::error::AppError;
use crate::model::{Course, EnrolledCourse, EnrolledStudent, Enrollment, NewCourse, NewStudent, Student};
use async_trait::async_trait;

#[async_trait]
pub trait Store: Send + Sync {
    /// Cheap round trip used by the readiness probe.
    async fn ping(&self) -> Result<(), AppError>;

    async fn insert_student(&self, new: &NewStudent) -> Result<Student, AppError>;
    async fn find_student(&self, id: i64) -> Result<Option<Student>, AppError>;
    async fn student_email_exists(&self, email: &str) -> Result<bool, AppError>;

    async fn insert_course(&self, new: &NewCourse) -> Result<Course, AppError>;
    async fn find_course(&self, id: i64) -> Result<Option<Course>, AppError>;
    async fn course_title_exists(&self, title: &str) -> Result<bool, AppError>;

    /// Whether a `course_student` row exists for the pair.
    async fn enrollment_exists(&self, course_id: i64, student_id: i64) -> Result<bool, AppError>;
    /// Insert a `course_student` row with both timestamps set to now. Does not check for duplicates.
    async fn insert_enrollment(&self, course_id: i64, student_id: i64) -> Result<Enrollment, AppError>;

    /// Students enrolled in a course, ordered by enrollment id.
    async fn students_of_course(&self, course_id: i64) -> Result<Vec<EnrolledStudent>, AppError>;
    /// Courses a student is enrolled in, ordered by enrollment id.
    async fn courses_of_student(&self, student_id: i64) -> Result<Vec<EnrolledCourse>, AppError>;
}
