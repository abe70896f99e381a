//! Note entity.
//!
//! A note is free text with an optional title, a color, tags and a pin flag.
//! `id` and `created_at` are fixed at creation; every content change refreshes
//! `updated_at`.
use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{new_entity_id, LnError};

/// Background color of a note card.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteColor {
    #[default]
    Default,
    Blue,
    Green,
    Yellow,
    Red,
    Purple,
    Pink,
}

impl NoteColor {
    pub const ALL: [NoteColor; 7] = [
        NoteColor::Default,
        NoteColor::Blue,
        NoteColor::Green,
        NoteColor::Yellow,
        NoteColor::Red,
        NoteColor::Purple,
        NoteColor::Pink,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NoteColor::Default => "default",
            NoteColor::Blue => "blue",
            NoteColor::Green => "green",
            NoteColor::Yellow => "yellow",
            NoteColor::Red => "red",
            NoteColor::Purple => "purple",
            NoteColor::Pink => "pink",
        }
    }
}

impl fmt::Display for NoteColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NoteColor {
    type Err = LnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        NoteColor::ALL
            .into_iter()
            .find(|color| color.as_str() == wanted)
            .ok_or_else(|| LnError::InvalidInput {
                message: format!("unknown note color '{}'", s),
            })
    }
}

/// Represents a single note in our system
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// Unique identifier for the note
    pub id: String,
    /// Optional display label, empty when unset
    #[serde(default)]
    pub title: String,
    /// Note body
    pub content: String,
    #[serde(default)]
    pub color: NoteColor,
    /// Tags for organization
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    /// When the note was created
    pub created_at: DateTime<Utc>,
    /// Last content modification time
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub is_pinned: bool,
    /// Reserved, nothing reads it yet
    #[serde(default)]
    pub is_encrypted: bool,
}

impl Note {
    /// Creates a new unpinned note with a fresh id and the current time
    pub fn new(title: String, content: String, color: NoteColor, tags: Vec<String>) -> Self {
        let now = Utc::now();

        Note {
            id: new_entity_id(),
            title,
            content,
            color,
            tags,
            created_at: now,
            updated_at: now,
            is_pinned: false,
            is_encrypted: false,
        }
    }

    /// Merges `patch` into the note. Returns whether any field was written.
    pub fn apply(&mut self, patch: NotePatch, now: DateTime<Utc>) -> bool {
        if patch.is_empty() {
            return false;
        }

        let touches_content = patch.title.is_some()
            || patch.content.is_some()
            || patch.color.is_some()
            || patch.tags.is_some();

        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(color) = patch.color {
            self.color = color;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(pinned) = patch.is_pinned {
            self.is_pinned = pinned;
        }
        if let Some(encrypted) = patch.is_encrypted {
            self.is_encrypted = encrypted;
        }

        if touches_content {
            self.updated_at = now;
        }
        true
    }
}

/// Field-level partial update for a [`Note`].
///
/// There is no way to express `id` or `created_at` here, so an update can
/// never rewrite them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub color: Option<NoteColor>,
    pub tags: Option<Vec<String>>,
    pub is_pinned: Option<bool>,
    pub is_encrypted: Option<bool>,
}

impl NotePatch {
    pub fn content(content: impl Into<String>) -> Self {
        NotePatch {
            content: Some(content.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == NotePatch::default()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn new_note_is_unpinned_with_matching_timestamps() {
        let note = Note::new(String::new(), "hello".into(), NoteColor::Blue, vec![]);
        assert!(!note.id.is_empty());
        assert!(!note.is_pinned);
        assert!(!note.is_encrypted);
        assert_eq!(note.created_at, note.updated_at);
    }

    #[test]
    fn content_patch_refreshes_updated_at_only() {
        let mut note = Note::new(String::new(), "before".into(), NoteColor::Default, vec![]);
        let created = note.created_at;
        let later = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

        assert!(note.apply(NotePatch::content("after"), later));
        assert_eq!(note.content, "after");
        assert_eq!(note.created_at, created);
        assert_eq!(note.updated_at, later);
    }

    #[test]
    fn pin_patch_leaves_updated_at_alone() {
        let mut note = Note::new(String::new(), "x".into(), NoteColor::Default, vec![]);
        let updated = note.updated_at;
        let later = Utc.with_ymd_and_hms(2099, 1, 1, 0, 0, 0).unwrap();

        let patch = NotePatch {
            is_pinned: Some(true),
            ..Default::default()
        };
        assert!(note.apply(patch, later));
        assert!(note.is_pinned);
        assert_eq!(note.updated_at, updated);
    }

    #[test]
    fn empty_patch_is_a_no_op() {
        let mut note = Note::new(String::new(), "x".into(), NoteColor::Default, vec![]);
        let before = note.clone();
        assert!(!note.apply(NotePatch::default(), Utc::now()));
        assert_eq!(note, before);
    }

    #[test]
    fn color_parses_case_insensitively() {
        assert_eq!("Purple".parse::<NoteColor>().unwrap(), NoteColor::Purple);
        assert!("teal".parse::<NoteColor>().is_err());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let note = Note::new("t".into(), "c".into(), NoteColor::Pink, vec!["a".into()]);
        let value = serde_json::to_value(&note).unwrap();
        assert_eq!(value["color"], "pink");
        assert_eq!(value["isPinned"], false);
        assert!(value.get("createdAt").is_some());
    }
}
