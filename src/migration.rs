//! Create the application tables. Idempotent (IF NOT EXISTS), safe to run on every start.
//! Order follows foreign key dependencies: entity tables first, then the pivot.

use crate::error::AppError;
use sqlx::PgPool;

/// Email and title carry UNIQUE constraints; the pivot does not, duplicates are
/// detected by the enrollment check instead.
const DDL: &[(&str, &str)] = &[
    (
        "students",
        r#"
        CREATE TABLE IF NOT EXISTS students (
            id BIGSERIAL PRIMARY KEY,
            name VARCHAR(100) NOT NULL,
            email VARCHAR(255) NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "courses",
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id BIGSERIAL PRIMARY KEY,
            title VARCHAR(100) NOT NULL UNIQUE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "course_student",
        r#"
        CREATE TABLE IF NOT EXISTS course_student (
            id BIGSERIAL PRIMARY KEY,
            course_id BIGINT NOT NULL REFERENCES courses (id) ON DELETE CASCADE,
            student_id BIGINT NOT NULL REFERENCES students (id) ON DELETE CASCADE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    ),
    (
        "course_student_pair_idx",
        "CREATE INDEX IF NOT EXISTS course_student_pair_idx ON course_student (course_id, student_id)",
    ),
    (
        "course_student_student_idx",
        "CREATE INDEX IF NOT EXISTS course_student_student_idx ON course_student (student_id)",
    ),
];

pub async fn apply_migrations(pool: &PgPool) -> Result<(), AppError> {
    for (name, sql) in DDL {
        tracing::debug!(object = *name, "applying migration");
        sqlx::query(*sql).execute(pool).await?;
    }
    tracing::info!(count = DDL.len(), "schema ready");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::DDL;

    #[test]
    fn pivot_is_created_after_the_tables_it_references() {
        let pos = |name: &str| DDL.iter().position(|(n, _)| *n == name).unwrap();
        assert!(pos("students") < pos("course_student"));
        assert!(pos("courses") < pos("course_student"));
    }

    #[test]
    fn pivot_pair_is_not_unique_at_storage_level() {
        let (_, pivot) = DDL.iter().find(|(n, _)| *n == "course_student").unwrap();
        assert!(!pivot.contains("UNIQUE"));
    }
}
