//! The note entity and the draft handed to the store when creating one.
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{normalize_tags, CreativityAssessment, KnError, Result};

/// Longest title accepted by [`NoteDraft::validate`], in characters.
pub const MAX_TITLE_CHARS: usize = 100;

/// Key into the fixed colour palette a note is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    Red,
    Orange,
    Yellow,
    Green,
    Teal,
    Blue,
    Purple,
    /// Stored keys outside the palette load as the default colour.
    #[default]
    #[serde(other)]
    Default,
}

impl NoteColor {
    pub const ALL: [NoteColor; 8] = [
        NoteColor::Default,
        NoteColor::Red,
        NoteColor::Orange,
        NoteColor::Yellow,
        NoteColor::Green,
        NoteColor::Teal,
        NoteColor::Blue,
        NoteColor::Purple,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteColor::Default => "default",
            NoteColor::Red => "red",
            NoteColor::Orange => "orange",
            NoteColor::Yellow => "yellow",
            NoteColor::Green => "green",
            NoteColor::Teal => "teal",
            NoteColor::Blue => "blue",
            NoteColor::Purple => "purple",
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteColor {
    type Err = KnError;

    fn from_str(s: &str) -> Result<Self> {
        let key = s.trim().to_lowercase();
        NoteColor::ALL
            .into_iter()
            .find(|color| color.as_str() == key)
            .ok_or_else(|| KnError::Validation {
                message: format!("unknown colour `{}`", s),
            })
    }
}

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note, never reused
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub color: NoteColor,
    #[serde(default)]
    pub is_favorite: bool,
    /// Creation time in milliseconds since the epoch; immutable
    pub created_at: i64,
    /// Last modification time in milliseconds since the epoch
    pub updated_at: i64,
    /// Data URI or external URL of an attached image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_creative: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creativity_explanation: Option<String>,
    /// Tags in insertion order; absent in stored data means none
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Note {
    /// Builds a stored note from a draft. Both timestamps are set to `now`.
    pub fn from_draft(id: String, draft: NoteDraft, now: i64) -> Self {
        Note {
            id,
            title: draft.title,
            content: draft.content,
            color: draft.color,
            is_favorite: draft.is_favorite,
            created_at: now,
            updated_at: now,
            image_url: draft.image_url,
            is_creative: draft.is_creative,
            creativity_explanation: draft.creativity_explanation,
            tags: normalize_tags(draft.tags.unwrap_or_default()),
        }
    }

    /// Attaches a classifier verdict before the note is handed to `update`.
    pub fn with_assessment(mut self, assessment: CreativityAssessment) -> Self {
        self.is_creative = Some(assessment.is_creative);
        self.creativity_explanation = Some(assessment.creativity_explanation);
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// User-editable note fields prior to id and timestamp assignment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub color: NoteColor,
    pub is_favorite: bool,
    pub image_url: Option<String>,
    pub is_creative: Option<bool>,
    pub creativity_explanation: Option<String>,
    /// Absent tags are stored as an empty list
    pub tags: Option<Vec<String>>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        NoteDraft {
            title: title.into(),
            content: content.into(),
            ..Default::default()
        }
    }

    pub fn with_tags<I, T>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        self.tags = Some(tags.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_assessment(mut self, assessment: CreativityAssessment) -> Self {
        self.is_creative = Some(assessment.is_creative);
        self.creativity_explanation = Some(assessment.creativity_explanation);
        self
    }

    /// Checks the editor rules: a non-empty title of at most
    /// [`MAX_TITLE_CHARS`] characters and non-empty content.
    pub fn validate(&self) -> Result<()> {
        validate_fields(&self.title, &self.content)
    }
}

/// Same rules as [`NoteDraft::validate`], for edits of an existing note.
pub fn validate_fields(title: &str, content: &str) -> Result<()> {
    if title.is_empty() {
        return Err(KnError::Validation {
            message: "title is required".to_string(),
        });
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(KnError::Validation {
            message: format!("title must be at most {} characters", MAX_TITLE_CHARS),
        });
    }
    if content.is_empty() {
        return Err(KnError::Validation {
            message: "content is required".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_colour_key_loads_as_default() {
        let json = r#"{"id":"1","title":"t","content":"c","color":"magenta",
            "isFavorite":false,"createdAt":1,"updatedAt":1}"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.color, NoteColor::Default);
        assert!(note.tags.is_empty());
        assert_eq!(note.image_url, None);
    }

    #[test]
    fn serialises_with_camel_case_keys_and_omits_absent_options() {
        let note = Note::from_draft("n1".into(), NoteDraft::new("Title", "Body"), 42);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["isFavorite"], false);
        assert_eq!(value["createdAt"], 42);
        assert_eq!(value["color"], "default");
        assert!(value.get("imageUrl").is_none());
        assert!(value.get("isCreative").is_none());
        assert_eq!(value["tags"], serde_json::json!([]));
    }

    #[test]
    fn from_draft_normalises_tags() {
        let draft = NoteDraft::new("t", "c").with_tags([" work ", "", "work", "home"]);
        let note = Note::from_draft("n1".into(), draft, 7);
        assert_eq!(note.tags, vec!["work", "home"]);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn validation_rejects_empty_title_long_title_and_empty_content() {
        assert!(NoteDraft::new("", "c").validate().is_err());
        assert!(NoteDraft::new("  ", "c").validate().is_ok());
        assert!(NoteDraft::new("x".repeat(101), "c").validate().is_err());
        assert!(NoteDraft::new("x".repeat(100), "c").validate().is_ok());
        assert!(NoteDraft::new("t", "").validate().is_err());
    }

    #[test]
    fn colour_parses_case_insensitively() {
        assert_eq!("Teal".parse::<NoteColor>().unwrap(), NoteColor::Teal);
        assert!("magenta".parse::<NoteColor>().is_err());
    }
}
