//! Course Sources
//!
//! The voice core takes its course collection as an already-resolved input.
//! A `CourseSource` produces that collection once at startup.

use crate::course::Course;
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum CourseSourceError {
    #[error("failed to load courses: {0}")]
    Load(String),
}

#[async_trait]
pub trait CourseSource: Send + Sync {
    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError>;
}

/// Fetches `GET {base_url}/courses` from the course backend.
pub struct HttpCourseSource {
    http: reqwest::Client,
    base_url: String,
}

impl HttpCourseSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self, CourseSourceError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| CourseSourceError::Load(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl CourseSource for HttpCourseSource {
    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError> {
        let url = format!("{}/courses", self.base_url);
        let courses: Vec<Course> = self
            .http
            .get(&url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| CourseSourceError::Load(e.to_string()))?
            .json()
            .await
            .map_err(|e| CourseSourceError::Load(e.to_string()))?;
        info!(count = courses.len(), %url, "Fetched courses");
        Ok(courses)
    }
}

/// A fixed, in-memory course list.
#[derive(Debug, Clone, Default)]
pub struct StaticCourseSource {
    courses: Vec<Course>,
}

impl StaticCourseSource {
    pub fn new(courses: Vec<Course>) -> Self {
        Self { courses }
    }
}

#[async_trait]
impl CourseSource for StaticCourseSource {
    async fn fetch_courses(&self) -> Result<Vec<Course>, CourseSourceError> {
        Ok(self.courses.clone())
    }
}
