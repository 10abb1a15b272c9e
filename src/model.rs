//! Row types for students, courses and the enrollment pivot, plus the shapes returned by the API.

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};

/// Timestamps go out as `2024-05-01T09:30:00.000000Z`.
fn timestamp<S: Serializer>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&dt.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string())
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

/// One row of `course_student`. Serialized as the `pivot` object of related items.
#[derive(Clone, Debug, PartialEq, Serialize, sqlx::FromRow)]
pub struct Enrollment {
    pub course_id: i64,
    pub student_id: i64,
    pub id: i64,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewStudent {
    pub name: String,
    pub email: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewCourse {
    pub title: String,
}

/// A student as seen from a course, with the joining row.
#[derive(Clone, Debug, Serialize)]
pub struct EnrolledStudent {
    #[serde(flatten)]
    pub student: Student,
    pub pivot: Enrollment,
}

/// A course as seen from a student, with the joining row.
#[derive(Clone, Debug, Serialize)]
pub struct EnrolledCourse {
    #[serde(flatten)]
    pub course: Course,
    pub pivot: Enrollment,
}

#[derive(Debug, Serialize)]
pub struct StudentWithCourses {
    #[serde(flatten)]
    pub student: Student,
    pub courses: Vec<EnrolledCourse>,
}

#[derive(Debug, Serialize)]
pub struct CourseWithStudents {
    #[serde(flatten)]
    pub course: Course,
    pub students: Vec<EnrolledStudent>,
}

#[derive(Debug, Serialize)]
pub struct StudentCreated {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<Student> for StudentCreated {
    fn from(s: Student) -> Self {
        StudentCreated {
            id: s.id,
            name: s.name,
            email: s.email,
            created_at: s.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseCreated {
    pub id: i64,
    pub title: String,
    #[serde(serialize_with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<Course> for CourseCreated {
    fn from(c: Course) -> Self {
        CourseCreated {
            id: c.id,
            title: c.title,
            created_at: c.created_at,
        }
    }
}

/// Data of a successful assign: the course title and the student name.
#[derive(Debug, Serialize)]
pub struct Assignment {
    pub course: String,
    pub student: String,
}
