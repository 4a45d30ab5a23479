use async_trait::async_trait;
use chrono::Utc;
use sqlx::{Executor, Sqlite, SqlitePool};
use uuid::Uuid;

use crate::models::{Course, NewCourseRequest, Review, ReviewDraft};

use super::{RecordStore, StoreError};

/// Record store backed by a SQLite database through sqlx. This is the
/// default backend; it is also the only one that can make the
/// course-plus-review pair atomic.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

async fn insert_course_row<'e, E>(executor: E, new: &NewCourseRequest) -> Result<Course, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let course = Course {
        id: Uuid::new_v4().to_string(),
        university_name: new.university_name.clone(),
        course_code: new.course_code.clone(),
        course_name: new.course_name.clone(),
        faculty: new.faculty.clone(),
        credits: new.credits,
        is_approved: true,
    };

    sqlx::query(
        r#"
        INSERT INTO courses
            (id, university_name, course_code, course_name, faculty, credits, is_approved)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, 1)
        "#,
    )
    .bind(&course.id)
    .bind(&course.university_name)
    .bind(&course.course_code)
    .bind(&course.course_name)
    .bind(&course.faculty)
    .bind(course.credits)
    .execute(executor)
    .await?;

    Ok(course)
}

async fn insert_review_row<'e, E>(
    executor: E,
    course_id: &str,
    draft: &ReviewDraft,
) -> Result<Review, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let review = Review {
        id: Uuid::new_v4().to_string(),
        course_id: course_id.to_string(),
        content: draft.content.clone(),
        rating_overall: draft.rating_overall,
        rating_difficulty: draft.rating_difficulty,
        rating_teaching: draft.rating_teaching,
        rating_homework: draft.rating_homework,
        is_anonymous: draft.is_anonymous,
        created_at: Utc::now().to_rfc3339(),
    };

    sqlx::query(
        r#"
        INSERT INTO reviews
            (id, course_id, content, rating_overall, rating_difficulty,
            rating_teaching, rating_homework, is_anonymous, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&review.id)
    .bind(&review.course_id)
    .bind(&review.content)
    .bind(review.rating_overall)
    .bind(review.rating_difficulty)
    .bind(review.rating_teaching)
    .bind(review.rating_homework)
    .bind(review.is_anonymous)
    .bind(&review.created_at)
    .execute(executor)
    .await?;

    Ok(review)
}

#[async_trait]
impl RecordStore for SqliteStore {
    async fn health(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, university_name, course_code, course_name, faculty, credits, is_approved
            FROM courses
            WHERE is_approved = 1
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        let pattern = format!("%{}%", query);
        let courses = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, university_name, course_code, course_name, faculty, credits, is_approved
            FROM courses
            WHERE course_name LIKE ?1 OR course_code LIKE ?1
            LIMIT ?2
            "#,
        )
        .bind(&pattern)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(courses)
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, university_name, course_code, course_name, faculty, credits, is_approved
            FROM courses
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(course)
    }

    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError> {
        let reviews = sqlx::query_as::<_, Review>(
            r#"
            SELECT id, course_id, content, rating_overall, rating_difficulty,
                rating_teaching, rating_homework, is_anonymous, created_at
            FROM reviews
            WHERE course_id = ?1
            ORDER BY created_at DESC, rowid DESC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(reviews)
    }

    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError> {
        Ok(insert_course_row(&self.pool, new).await?)
    }

    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        Ok(insert_review_row(&self.pool, course_id, draft).await?)
    }

    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        // Dropping the transaction without committing rolls the course back,
        // so a failed review insert leaves no orphaned course row here.
        let mut tx = self.pool.begin().await?;
        let course = insert_course_row(&mut *tx, new).await?;
        let review = insert_review_row(&mut *tx, &course.id, draft).await?;
        tx.commit().await?;

        Ok((course, review))
    }
}
