//! Student operations: create with validation, show with enrolled courses.

use super::{parse_id_str, ValidationErrors, Validator};
use crate::error::AppError;
use crate::model::{NewStudent, Student, StudentWithCourses};
use crate::store::Store;
use serde_json::{Map, Value};

pub const NAME_MAX: usize = 100;
/// Width of the `students.email` column.
pub const EMAIL_MAX: usize = 255;
pub const EMAIL_TAKEN: &str = "The email has already been taken.";
pub const STUDENT_NOT_FOUND: &str = "Student not found";

pub struct StudentService;

impl StudentService {
    /// Validate `name` and `email`, then insert. Email must be unique among students.
    pub async fn create(store: &dyn Store, payload: &Map<String, Value>) -> Result<Student, AppError> {
        let mut v = Validator::new(payload);
        let name = v.field("name").required().string().max(NAME_MAX).text();
        let email = v.field("email").required().email().max(EMAIL_MAX).text();
        if let Some(email) = email {
            if store.student_email_exists(email).await? {
                v.reject("email", EMAIL_TAKEN);
            }
        }
        let new = match (name, email) {
            (Some(name), Some(email)) if v.passes() => NewStudent {
                name: name.to_string(),
                email: email.to_string(),
            },
            _ => return Err(v.into_error()),
        };

        match store.insert_student(&new).await {
            Ok(student) => {
                tracing::info!(student_id = student.id, "student created");
                Ok(student)
            }
            // Lost a race with a concurrent insert of the same email.
            Err(e) if e.is_unique_violation() => {
                let mut errors = ValidationErrors::default();
                errors.add("email", EMAIL_TAKEN);
                Err(AppError::Validation(errors))
            }
            Err(e) => Err(e),
        }
    }

    /// Student by path id with its courses. Unknown or non-numeric ids are not found.
    pub async fn show(store: &dyn Store, id: &str) -> Result<StudentWithCourses, AppError> {
        let not_found = || AppError::NotFound(STUDENT_NOT_FOUND.to_string());
        let id = parse_id_str(id).ok_or_else(not_found)?;
        let student = store.find_student(id).await?.ok_or_else(not_found)?;
        let courses = store.courses_of_student(student.id).await?;
        Ok(StudentWithCourses { student, courses })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serde_json::json;

    fn body(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    fn validation(result: Result<Student, AppError>) -> ValidationErrors {
        match result {
            Err(AppError::Validation(e)) => e,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn creates_and_shows_student() {
        let store = MemoryStore::new();
        let created = StudentService::create(
            &store,
            &body(json!({"name": "Ivan Ivanov", "email": "ivan@example.com"})),
        )
        .await
        .unwrap();
        let shown = StudentService::show(&store, &created.id.to_string()).await.unwrap();
        assert_eq!(shown.student, created);
        assert!(shown.courses.is_empty());
    }

    #[tokio::test]
    async fn duplicate_email_is_a_field_error() {
        let store = MemoryStore::new();
        let first = body(json!({"name": "Ivan Ivanov", "email": "ivan@example.com"}));
        StudentService::create(&store, &first).await.unwrap();
        let second = body(json!({"name": "Petar Ivanov", "email": "ivan@example.com"}));
        let errors = validation(StudentService::create(&store, &second).await);
        assert_eq!(errors.messages("email"), [EMAIL_TAKEN]);
        assert!(!errors.has("name"));
    }

    #[tokio::test]
    async fn reports_every_failing_field() {
        let store = MemoryStore::new();
        let errors = validation(
            StudentService::create(&store, &body(json!({"name": "x".repeat(101), "email": "nope"}))).await,
        );
        assert!(errors.has("name"));
        assert_eq!(errors.messages("email"), ["The email must be a valid email address."]);
        assert!(store.find_student(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_longer_than_column_is_a_field_error() {
        let store = MemoryStore::new();
        let email = format!("{}@example.com", "a".repeat(250));
        let errors = validation(
            StudentService::create(&store, &body(json!({"name": "Ivan Ivanov", "email": email}))).await,
        );
        assert_eq!(
            errors.messages("email"),
            ["The email must not be greater than 255 characters."]
        );
        assert!(store.find_student(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn non_string_email_is_not_a_valid_address() {
        let store = MemoryStore::new();
        let errors = validation(
            StudentService::create(&store, &body(json!({"name": "Ivan Ivanov", "email": 42}))).await,
        );
        assert_eq!(errors.messages("email"), ["The email must be a valid email address."]);
        assert!(!errors.has("name"));
    }

    #[tokio::test]
    async fn unknown_and_malformed_ids_are_not_found() {
        let store = MemoryStore::new();
        for id in ["999", "abc", "-1"] {
            match StudentService::show(&store, id).await {
                Err(AppError::NotFound(m)) => assert_eq!(m, STUDENT_NOT_FOUND),
                other => panic!("{id}: expected not found, got {other:?}"),
            }
        }
    }
}
