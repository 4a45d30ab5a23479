use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::warn;

use crate::models::{Course, NewCourseRequest, Review, ReviewDraft};

use super::{RecordStore, StoreError};

#[derive(Clone, Debug)]
pub struct PostgrestConfig {
    pub base_url: String,
    pub api_key: String,
}

/// Record store backed by a managed Postgres exposed over the PostgREST
/// dialect (Supabase-style). Ids and `created_at` are generated server-side
/// and read back from the insert representation.
pub struct PostgrestStore {
    client: Client,
    config: PostgrestConfig,
}

impl PostgrestStore {
    pub fn new(config: PostgrestConfig) -> Result<Self, StoreError> {
        let client = Client::builder().build()?;
        Ok(Self { client, config })
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), table)
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.config.api_key)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
    }

    fn select_request(&self, table: &str, filters: &[(&str, String)]) -> RequestBuilder {
        self.authed(self.client.get(self.table_url(table))).query(filters)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        filters: &[(&str, String)],
    ) -> Result<Vec<T>, StoreError> {
        let response = self.select_request(table, filters).send().await?;

        read_rows(response).await
    }

    async fn insert<T: DeserializeOwned>(
        &self,
        table: &str,
        body: &serde_json::Value,
    ) -> Result<T, StoreError> {
        let response = self
            .authed(self.client.post(self.table_url(table)))
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;

        let rows: Vec<T> = read_rows(response).await?;
        rows.into_iter().next().ok_or(StoreError::MissingReturning)
    }
}

async fn read_rows<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, StoreError> {
    if !response.status().is_success() {
        let status = response.status().as_u16();
        let message = response.text().await.unwrap_or_default();
        return Err(StoreError::Api { status, message });
    }

    Ok(response.json().await?)
}

/// Wraps the query in `*` wildcards and double-quotes it so commas, parens,
/// and dots in user input cannot break the surrounding `or=(...)` filter.
fn ilike_pattern(query: &str) -> String {
    let escaped = query.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"*{}*\"", escaped)
}

fn search_filter(query: &str) -> String {
    let pattern = ilike_pattern(query);
    format!("(course_name.ilike.{pattern},course_code.ilike.{pattern})")
}

#[async_trait]
impl RecordStore for PostgrestStore {
    async fn health(&self) -> Result<(), StoreError> {
        let _: Vec<serde_json::Value> = self
            .select(
                "courses",
                &[("select", "id".to_string()), ("limit", "1".to_string())],
            )
            .await?;
        Ok(())
    }

    async fn list_approved_courses(&self) -> Result<Vec<Course>, StoreError> {
        self.select(
            "courses",
            &[
                ("select", "*".to_string()),
                ("is_approved", "eq.true".to_string()),
            ],
        )
        .await
    }

    async fn search_courses(&self, query: &str, limit: u32) -> Result<Vec<Course>, StoreError> {
        self.select(
            "courses",
            &[
                ("select", "*".to_string()),
                ("or", search_filter(query)),
                ("limit", limit.to_string()),
            ],
        )
        .await
    }

    async fn fetch_course(&self, id: &str) -> Result<Option<Course>, StoreError> {
        let rows: Vec<Course> = self
            .select(
                "courses",
                &[
                    ("select", "*".to_string()),
                    ("id", format!("eq.{}", id)),
                    ("limit", "1".to_string()),
                ],
            )
            .await?;

        Ok(rows.into_iter().next())
    }

    async fn reviews_for_course(&self, course_id: &str) -> Result<Vec<Review>, StoreError> {
        self.select(
            "reviews",
            &[
                ("select", "*".to_string()),
                ("course_id", format!("eq.{}", course_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn insert_course(&self, new: &NewCourseRequest) -> Result<Course, StoreError> {
        let body = json!({
            "university_name": new.university_name,
            "course_code": new.course_code,
            "course_name": new.course_name,
            "faculty": new.faculty,
            "credits": new.credits,
            "is_approved": true,
        });

        self.insert("courses", &body).await
    }

    async fn insert_review(
        &self,
        course_id: &str,
        draft: &ReviewDraft,
    ) -> Result<Review, StoreError> {
        let body = json!({
            "course_id": course_id,
            "content": draft.content,
            "rating_overall": draft.rating_overall,
            "rating_difficulty": draft.rating_difficulty,
            "rating_teaching": draft.rating_teaching,
            "rating_homework": draft.rating_homework,
            "is_anonymous": draft.is_anonymous,
        });

        self.insert("reviews", &body).await
    }

    async fn insert_course_with_review(
        &self,
        new: &NewCourseRequest,
        draft: &ReviewDraft,
    ) -> Result<(Course, Review), StoreError> {
        // No client-side transaction in this dialect: the two inserts run in
        // sequence, and a failed second insert leaves the course row behind.
        let course = self.insert_course(new).await?;
        match self.insert_review(&course.id, draft).await {
            Ok(review) => Ok((course, review)),
            Err(err) => {
                warn!(
                    "review insert failed after course creation; course {} remains without a review: {}",
                    course.id, err
                );
                Err(err)
            }
        }
    }
}
