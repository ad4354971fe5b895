//! Course Catalog
//!
//! Course documents are read once at startup from `*.json` files in a data
//! directory and kept in memory, ordered by file name. A file that fails to
//! parse is logged and skipped; it never prevents startup.

use crate::models::CourseDocument;
use anyhow::{Context, Result};
use morbror_core::course::Course;
use std::path::Path;
use tracing::{info, warn};

/// The read-only set of courses served by the API.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    documents: Vec<CourseDocument>,
}

impl Catalog {
    pub fn new(documents: Vec<CourseDocument>) -> Self {
        Self { documents }
    }

    /// Loads every `*.json` course document in `dir`.
    pub fn load_dir(dir: &Path) -> Result<Self> {
        let mut paths = std::fs::read_dir(dir)
            .with_context(|| format!("Failed to read course directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json"))
            .collect::<Vec<_>>();
        paths.sort();

        let mut documents: Vec<CourseDocument> = Vec::with_capacity(paths.len());
        for path in paths {
            let parsed = std::fs::read_to_string(&path)
                .map_err(anyhow::Error::from)
                .and_then(|raw| serde_json::from_str::<CourseDocument>(&raw).map_err(Into::into));
            match parsed {
                Ok(doc) => {
                    if documents.iter().any(|d| d.course_id == doc.course_id) {
                        warn!(file = %path.display(), course_id = %doc.course_id, "Duplicate course id, keeping the first");
                        continue;
                    }
                    documents.push(doc);
                }
                Err(e) => warn!(file = %path.display(), error = %e, "Skipping invalid course file"),
            }
        }

        info!(count = documents.len(), dir = %dir.display(), "Course catalog loaded");
        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[CourseDocument] {
        &self.documents
    }

    pub fn get(&self, course_id: &str) -> Option<&CourseDocument> {
        self.documents.iter().find(|d| d.course_id == course_id)
    }

    /// Course summaries in catalog order, as handed to the voice core.
    pub fn summaries(&self) -> Vec<Course> {
        self.documents.iter().map(CourseDocument::summary).collect()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
