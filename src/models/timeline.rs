use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::{AuthorRole, EntryType, NoteVisibility};

/// A clinical entry on a patient's timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEntry {
    pub id: String,
    pub patient_id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub title: String,
    pub content: EntryContent,
    pub document: Option<DocumentRef>,
    #[serde(default)]
    pub notes: Vec<EntryNote>,
}

/// Type-specific payload carried by each entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryContent {
    Note {
        #[serde(default)]
        fields: BTreeMap<String, String>,
    },
    Prescription {
        #[serde(default)]
        medicines: Vec<Medicine>,
        #[serde(default)]
        special_instructions: String,
    },
    LabResult {
        #[serde(default)]
        values: Vec<LabValue>,
    },
}

impl EntryContent {
    /// Empty payload for a freshly created entry of the given type.
    pub fn empty_for(entry_type: EntryType) -> Self {
        match entry_type {
            EntryType::Note => Self::Note {
                fields: BTreeMap::new(),
            },
            EntryType::Prescription => Self::Prescription {
                medicines: Vec::new(),
                special_instructions: String::new(),
            },
            EntryType::LabResult => Self::LabResult { values: Vec::new() },
        }
    }

    /// The entry type this payload belongs to.
    pub fn entry_type(&self) -> EntryType {
        match self {
            Self::Note { .. } => EntryType::Note,
            Self::Prescription { .. } => EntryType::Prescription,
            Self::LabResult { .. } => EntryType::LabResult,
        }
    }

    pub fn special_instructions(&self) -> Option<&str> {
        match self {
            Self::Prescription {
                special_instructions,
                ..
            } => Some(special_instructions.as_str()),
            _ => None,
        }
    }

    pub fn medicines(&self) -> &[Medicine] {
        match self {
            Self::Prescription { medicines, .. } => medicines,
            _ => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Medicine {
    #[serde(default)]
    pub id: String,
    pub name: String,
    pub dosage: String,
    pub frequency: String,
    pub duration: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabValue {
    pub name: String,
    pub reading: String,
    pub unit: Option<String>,
}

/// Reference to an attached document. Only the link is kept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoteAuthor {
    pub id: String,
    pub name: String,
    pub role: AuthorRole,
}

/// Annotation appended to an entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryNote {
    pub id: String,
    pub author: NoteAuthor,
    pub visibility: NoteVisibility,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Entry as submitted by a clinician, before an id is assigned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryDraft {
    #[serde(rename = "type")]
    pub entry_type: Option<EntryType>,
    pub title: Option<String>,
    pub date: Option<DateTime<Utc>>,
    pub content: Option<EntryContent>,
    pub document: Option<DocumentRef>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteDraft {
    pub author: NoteAuthor,
    pub visibility: NoteVisibility,
    pub text: String,
}
