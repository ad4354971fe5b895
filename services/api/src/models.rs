//! API Models
//!
//! Course documents as stored in the data directory and served over HTTP.
//! Field names follow the JSON documents (camelCase).

use morbror_core::course::Course;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentBlock {
    #[serde(rename = "type")]
    #[schema(example = "text")]
    pub block_type: String,
    #[schema(value_type = Object)]
    pub content: serde_json::Value,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub lesson_id: String,
    pub title: String,
    pub position: i32,
    pub content_blocks: Vec<ContentBlock>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Module {
    pub module_id: String,
    pub title: String,
    pub position: i32,
    pub lessons: Vec<Lesson>,
}

/// A complete course document.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CourseDocument {
    #[schema(example = "arduino-for-barn")]
    pub course_id: String,
    #[schema(example = "Arduino for barn")]
    pub title: String,
    pub short_title: String,
    pub description: String,
    pub target_age_range: String,
    pub difficulty_level: String,
    pub prerequisites: Vec<String>,
    pub estimated_completion_time: String,
    pub cover_image: String,
    pub mascot: String,
    pub badge: String,
    pub voice_command_keywords: Vec<String>,
    pub parent_notes: String,
    pub creation_date: String,
    pub last_updated: String,
    pub version: String,
    pub active: bool,
    #[schema(value_type = Object)]
    pub tts_script_overrides: HashMap<String, serde_json::Value>,
    pub hardware_requirements: Vec<String>,
    pub modules: Vec<Module>,
}

impl CourseDocument {
    /// The summary the voice core works with.
    pub fn summary(&self) -> Course {
        Course::new(self.course_id.clone(), self.title.clone(), 0)
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct RootMessage {
    #[schema(example = "MorbrorAppen Backend is running!")]
    pub message: String,
}

/// Error body, `{"detail": ...}`, as the course frontend expects.
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Course not found")]
    pub detail: String,
}
