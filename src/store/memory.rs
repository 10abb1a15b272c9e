//! In-process store with the same table semantics as PostgreSQL (generated ids, timestamps).

use super::Store;
use crate::error::AppError;
use crate::model::{Course, EnrolledCourse, EnrolledStudent, Enrollment, NewCourse, NewStudent, Student};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{PoisonError, RwLock};

#[derive(Debug, Default)]
struct Tables {
    students: Vec<Student>,
    courses: Vec<Course>,
    course_student: Vec<Enrollment>,
}

/// Rows are kept in insertion order, so ids are ascending and lookups are linear.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        let tables = self.tables.read().unwrap_or_else(PoisonError::into_inner);
        f(&tables)
    }

    fn write<T>(&self, f: impl FnOnce(&mut Tables) -> T) -> T {
        let mut tables = self.tables.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut tables)
    }
}

fn next_id(last: Option<i64>) -> i64 {
    last.unwrap_or(0) + 1
}

#[async_trait]
impl Store for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn insert_student(&self, new: &NewStudent) -> Result<Student, AppError> {
        Ok(self.write(|t| {
            let now = Utc::now();
            let student = Student {
                id: next_id(t.students.last().map(|s| s.id)),
                name: new.name.clone(),
                email: new.email.clone(),
                created_at: now,
                updated_at: now,
            };
            t.students.push(student.clone());
            student
        }))
    }

    async fn find_student(&self, id: i64) -> Result<Option<Student>, AppError> {
        Ok(self.read(|t| t.students.iter().find(|s| s.id == id).cloned()))
    }

    async fn student_email_exists(&self, email: &str) -> Result<bool, AppError> {
        Ok(self.read(|t| t.students.iter().any(|s| s.email == email)))
    }

    async fn insert_course(&self, new: &NewCourse) -> Result<Course, AppError> {
        Ok(self.write(|t| {
            let now = Utc::now();
            let course = Course {
                id: next_id(t.courses.last().map(|c| c.id)),
                title: new.title.clone(),
                created_at: now,
                updated_at: now,
            };
            t.courses.push(course.clone());
            course
        }))
    }

    async fn find_course(&self, id: i64) -> Result<Option<Course>, AppError> {
        Ok(self.read(|t| t.courses.iter().find(|c| c.id == id).cloned()))
    }

    async fn course_title_exists(&self, title: &str) -> Result<bool, AppError> {
        Ok(self.read(|t| t.courses.iter().any(|c| c.title == title)))
    }

    async fn enrollment_exists(&self, course_id: i64, student_id: i64) -> Result<bool, AppError> {
        Ok(self.read(|t| {
            t.course_student
                .iter()
                .any(|e| e.course_id == course_id && e.student_id == student_id)
        }))
    }

    async fn insert_enrollment(&self, course_id: i64, student_id: i64) -> Result<Enrollment, AppError> {
        Ok(self.write(|t| {
            let now = Utc::now();
            let enrollment = Enrollment {
                course_id,
                student_id,
                id: next_id(t.course_student.last().map(|e| e.id)),
                created_at: now,
                updated_at: now,
            };
            t.course_student.push(enrollment.clone());
            enrollment
        }))
    }

    async fn students_of_course(&self, course_id: i64) -> Result<Vec<EnrolledStudent>, AppError> {
        Ok(self.read(|t| {
            t.course_student
                .iter()
                .filter(|e| e.course_id == course_id)
                .filter_map(|e| {
                    let student = t.students.iter().find(|s| s.id == e.student_id)?;
                    Some(EnrolledStudent {
                        student: student.clone(),
                        pivot: e.clone(),
                    })
                })
                .collect()
        }))
    }

    async fn courses_of_student(&self, student_id: i64) -> Result<Vec<EnrolledCourse>, AppError> {
        Ok(self.read(|t| {
            t.course_student
                .iter()
                .filter(|e| e.student_id == student_id)
                .filter_map(|e| {
                    let course = t.courses.iter().find(|c| c.id == e.course_id)?;
                    Some(EnrolledCourse {
                        course: course.clone(),
                        pivot: e.clone(),
                    })
                })
                .collect()
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn student(name: &str, email: &str) -> NewStudent {
        NewStudent {
            name: name.into(),
            email: email.into(),
        }
    }

    #[tokio::test]
    async fn ids_are_generated_in_sequence() {
        let store = MemoryStore::new();
        let a = store.insert_student(&student("Ivan", "ivan@example.com")).await.unwrap();
        let b = store.insert_student(&student("Maria", "maria@example.com")).await.unwrap();
        assert_eq!((a.id, b.id), (1, 2));
        assert_eq!(a.created_at, a.updated_at);
        assert_eq!(store.find_student(2).await.unwrap(), Some(b));
        assert_eq!(store.find_student(3).await.unwrap(), None);
    }

    #[tokio::test]
    async fn uniqueness_lookups_are_exact() {
        let store = MemoryStore::new();
        store.insert_student(&student("Ivan", "ivan@example.com")).await.unwrap();
        store
            .insert_course(&NewCourse { title: "Chemistry".into() })
            .await
            .unwrap();
        assert!(store.student_email_exists("ivan@example.com").await.unwrap());
        assert!(!store.student_email_exists("other@example.com").await.unwrap());
        assert!(store.course_title_exists("Chemistry").await.unwrap());
        assert!(!store.course_title_exists("Physics").await.unwrap());
    }

    #[tokio::test]
    async fn enrollments_load_from_both_sides_in_pivot_order() {
        let store = MemoryStore::new();
        let ivan = store.insert_student(&student("Ivan", "ivan@example.com")).await.unwrap();
        let stoyan = store.insert_student(&student("Stoyan", "stoyan@example.com")).await.unwrap();
        let course = store
            .insert_course(&NewCourse { title: "Hardware Basics".into() })
            .await
            .unwrap();

        assert!(!store.enrollment_exists(course.id, stoyan.id).await.unwrap());
        let first = store.insert_enrollment(course.id, stoyan.id).await.unwrap();
        let second = store.insert_enrollment(course.id, ivan.id).await.unwrap();
        assert!(store.enrollment_exists(course.id, stoyan.id).await.unwrap());
        assert!(second.id > first.id);

        let students = store.students_of_course(course.id).await.unwrap();
        let names: Vec<_> = students.iter().map(|s| s.student.name.as_str()).collect();
        assert_eq!(names, ["Stoyan", "Ivan"]);
        assert_eq!(students[0].pivot, first);

        let courses = store.courses_of_student(ivan.id).await.unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0].course.title, "Hardware Basics");
        assert_eq!(courses[0].pivot.id, second.id);
    }

    #[tokio::test]
    async fn insert_enrollment_does_not_deduplicate() {
        let store = MemoryStore::new();
        store.insert_enrollment(1, 1).await.unwrap();
        store.insert_enrollment(1, 1).await.unwrap();
        assert!(store.enrollment_exists(1, 1).await.unwrap());
        assert_eq!(store.read(|t| t.course_student.len()), 2);
    }
}
