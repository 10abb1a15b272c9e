//! PostgreSQL store: explicit SQL against `students`, `courses` and `course_student`.

use super::Store;
use crate::error::AppError;
use crate::model::{Course, EnrolledCourse, EnrolledStudent, Enrollment, NewCourse, NewStudent, Student};
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{ConnectOptions, FromRow, PgPool, Row};
use std::str::FromStr;

const STUDENT_COLUMNS: &str = "id, name, email, created_at, updated_at";
const COURSE_COLUMNS: &str = "id, title, created_at, updated_at";
const ENROLLMENT_COLUMNS: &str = "course_id, student_id, id, created_at, updated_at";

/// Pivot columns aliased so they do not collide with the related row.
const PIVOT_SELECT: &str = "cs.id AS pivot_id, cs.course_id AS pivot_course_id, cs.student_id AS pivot_student_id, \
     cs.created_at AS pivot_created_at, cs.updated_at AS pivot_updated_at";

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        PgStore { pool }
    }
}

fn pivot_from_row(row: &PgRow) -> Result<Enrollment, sqlx::Error> {
    Ok(Enrollment {
        id: row.try_get("pivot_id")?,
        course_id: row.try_get("pivot_course_id")?,
        student_id: row.try_get("pivot_student_id")?,
        created_at: row.try_get("pivot_created_at")?,
        updated_at: row.try_get("pivot_updated_at")?,
    })
}

#[async_trait]
impl Store for PgStore {
    async fn ping(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn insert_student(&self, new: &NewStudent) -> Result<Student, AppError> {
        let sql = format!(
            "INSERT INTO students (name, email, created_at, updated_at) VALUES ($1, $2, NOW(), NOW()) RETURNING {}",
            STUDENT_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(&new.name)
            .bind(&new.email)
            .fetch_one(&self.pool)
            .await?;
        Ok(student)
    }

    async fn find_student(&self, id: i64) -> Result<Option<Student>, AppError> {
        let sql = format!("SELECT {} FROM students WHERE id = $1", STUDENT_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let student = sqlx::query_as::<_, Student>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn student_email_exists(&self, email: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM students WHERE email = $1)")
            .bind(email)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn insert_course(&self, new: &NewCourse) -> Result<Course, AppError> {
        let sql = format!(
            "INSERT INTO courses (title, created_at, updated_at) VALUES ($1, NOW(), NOW()) RETURNING {}",
            COURSE_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(&new.title)
            .fetch_one(&self.pool)
            .await?;
        Ok(course)
    }

    async fn find_course(&self, id: i64) -> Result<Option<Course>, AppError> {
        let sql = format!("SELECT {} FROM courses WHERE id = $1", COURSE_COLUMNS);
        tracing::debug!(sql = %sql, id, "query");
        let course = sqlx::query_as::<_, Course>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(course)
    }

    async fn course_title_exists(&self, title: &str) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM courses WHERE title = $1)")
            .bind(title)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn enrollment_exists(&self, course_id: i64, student_id: i64) -> Result<bool, AppError> {
        let (exists,): (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM course_student WHERE course_id = $1 AND student_id = $2)",
        )
        .bind(course_id)
        .bind(student_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert_enrollment(&self, course_id: i64, student_id: i64) -> Result<Enrollment, AppError> {
        let sql = format!(
            "INSERT INTO course_student (course_id, student_id, created_at, updated_at) VALUES ($1, $2, NOW(), NOW()) RETURNING {}",
            ENROLLMENT_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id, student_id, "query");
        let enrollment = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(course_id)
            .bind(student_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(enrollment)
    }

    async fn students_of_course(&self, course_id: i64) -> Result<Vec<EnrolledStudent>, AppError> {
        let sql = format!(
            "SELECT s.id, s.name, s.email, s.created_at, s.updated_at, {} \
             FROM students s JOIN course_student cs ON cs.student_id = s.id \
             WHERE cs.course_id = $1 ORDER BY cs.id",
            PIVOT_SELECT
        );
        tracing::debug!(sql = %sql, course_id, "query");
        let rows = sqlx::query(&sql).bind(course_id).fetch_all(&self.pool).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(EnrolledStudent {
                student: Student::from_row(row)?,
                pivot: pivot_from_row(row)?,
            });
        }
        Ok(out)
    }

    async fn courses_of_student(&self, student_id: i64) -> Result<Vec<EnrolledCourse>, AppError> {
        let sql = format!(
            "SELECT c.id, c.title, c.created_at, c.updated_at, {} \
             FROM courses c JOIN course_student cs ON cs.course_id = c.id \
             WHERE cs.student_id = $1 ORDER BY cs.id",
            PIVOT_SELECT
        );
        tracing::debug!(sql = %sql, student_id, "query");
        let rows = sqlx::query(&sql).bind(student_id).fetch_all(&self.pool).await?;
        let mut out = Vec::with_capacity(rows.len());
        for row in &rows {
            out.push(EnrolledCourse {
                course: Course::from_row(row)?,
                pivot: pivot_from_row(row)?,
            });
        }
        Ok(out)
    }
}

/// Ensure the database in `database_url` exists; create it if not. Connects to the
/// default `postgres` database to run CREATE DATABASE. Call before creating the main pool.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), AppError> {
    let (admin_url, db_name) = split_database_url(database_url)?;
    if db_name.is_empty() || db_name == "postgres" {
        return Ok(());
    }
    let opts = sqlx::postgres::PgConnectOptions::from_str(&admin_url)?;
    let mut conn: sqlx::PgConnection = opts.connect().await?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

/// Splits `postgres://host/db?opts` into the admin url (`postgres://host/postgres`) and `db`.
fn split_database_url(url: &str) -> Result<(String, String), AppError> {
    let scheme_end = url.find("://").map(|i| i + 3).unwrap_or(0);
    let path_start = url
        .get(scheme_end..)
        .and_then(|rest| rest.find('/'))
        .map(|i| scheme_end + i + 1)
        .ok_or_else(|| {
            AppError::Config(crate::error::ConfigError::Invalid {
                key: "DATABASE_URL",
                reason: "no database path".into(),
            })
        })?;
    let path_and_query = url.get(path_start..).unwrap_or("");
    let db_name = path_and_query.split('?').next().unwrap_or("").trim();
    let base = url.get(..path_start).unwrap_or(url);
    Ok((format!("{}postgres", base), db_name.to_string()))
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
