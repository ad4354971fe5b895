use serde::{Deserialize, Deserializer, Serialize};

/// A learning course as seen by the voice core.
///
/// The backend serves much richer course documents; only the identifier,
/// title and progress are read here, every other field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    #[serde(alias = "courseId", deserialize_with = "string_or_number")]
    pub id: String,
    pub title: String,
    /// Completion percentage, always within `0..=100`.
    #[serde(default, deserialize_with = "clamped_progress")]
    pub progress: u8,
}

impl Course {
    /// Creates a new course, clamping `progress` to 100.
    pub fn new(id: impl Into<String>, title: impl Into<String>, progress: u8) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            progress: progress.min(100),
        }
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(n) => n.to_string(),
    })
}

fn clamped_progress<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = u32::deserialize(deserializer)?;
    Ok(raw.min(100) as u8)
}
