//! Course operations: create, show with enrolled students, and assigning a student.

use super::{parse_id, parse_id_str, ValidationErrors, Validator};
use crate::error::AppError;
use crate::model::{Assignment, Course, CourseWithStudents, NewCourse};
use crate::store::Store;
use serde_json::{Map, Value};

pub const TITLE_MAX: usize = 100;
pub const TITLE_TAKEN: &str = "The desired course title has already been taken.";
pub const COURSE_NOT_FOUND: &str = "Course not found";
pub const STUDENT_NOT_EXISTING: &str = "The selected student is not existing.";
pub const ALREADY_ASSIGNED: &str = "Student is already assigned to this course.";

pub struct CourseService;

impl CourseService {
    /// Validate `title` (unique among courses), then insert.
    pub async fn create(store: &dyn Store, payload: &Map<String, Value>) -> Result<Course, AppError> {
        let mut v = Validator::new(payload);
        let title = v.field("title").required().string().max(TITLE_MAX).text();
        if let Some(title) = title {
            if store.course_title_exists(title).await? {
                v.reject("title", TITLE_TAKEN);
            }
        }
        let new = match title {
            Some(title) if v.passes() => NewCourse {
                title: title.to_string(),
            },
            _ => return Err(v.into_error()),
        };

        match store.insert_course(&new).await {
            Ok(course) => {
                tracing::info!(course_id = course.id, "course created");
                Ok(course)
            }
            Err(e) if e.is_unique_violation() => {
                let mut errors = ValidationErrors::default();
                errors.add("title", TITLE_TAKEN);
                Err(AppError::Validation(errors))
            }
            Err(e) => Err(e),
        }
    }

    /// Course by path id with its students. Unknown or non-numeric ids are not found.
    pub async fn show(store: &dyn Store, id: &str) -> Result<CourseWithStudents, AppError> {
        let course = find_course(store, id).await?;
        let students = store.students_of_course(course.id).await?;
        Ok(CourseWithStudents { course, students })
    }

    /// Enroll `student_id` from the payload into the course.
    ///
    /// Checks run in a fixed order: course exists (404), `student_id` present and
    /// referencing a student (422), pair not yet enrolled (409). The duplicate check and
    /// the insert are separate statements, so concurrent identical requests can both
    /// pass the check.
    pub async fn assign(
        store: &dyn Store,
        course_id: &str,
        payload: &Map<String, Value>,
    ) -> Result<Assignment, AppError> {
        let course = find_course(store, course_id).await?;

        let mut v = Validator::new(payload);
        let student_ref = v.field("student_id").required().value();
        let student = match student_ref.and_then(parse_id) {
            Some(id) => store.find_student(id).await?,
            None => None,
        };
        let student = match student {
            Some(student) if v.passes() => student,
            _ => {
                if student_ref.is_some() {
                    v.reject("student_id", STUDENT_NOT_EXISTING);
                }
                return Err(v.into_error());
            }
        };

        if store.enrollment_exists(course.id, student.id).await? {
            tracing::warn!(course_id = course.id, student_id = student.id, "duplicate enrollment rejected");
            return Err(AppError::Conflict(ALREADY_ASSIGNED.to_string()));
        }
        let enrollment = store.insert_enrollment(course.id, student.id).await?;
        tracing::info!(
            course_id = course.id,
            student_id = student.id,
            enrollment_id = enrollment.id,
            "student enrolled"
        );

        Ok(Assignment {
            course: course.title,
            student: student.name,
        })
    }
}

async fn find_course(store: &dyn Store, id: &str) -> Result<Course, AppError> {
    let not_found = || AppError::NotFound(COURSE_NOT_FOUND.to_string());
    let id = parse_id_str(id).ok_or_else(not_found)?;
    store.find_course(id).await?.ok_or_else(not_found)
}
