use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::models::enums::EntryType;
use crate::models::{EntryContent, EntryDraft, EntryNote, NoteDraft, TimelineEntry};

use super::types::TimelineError;

fn default_title(entry_type: EntryType) -> &'static str {
    match entry_type {
        EntryType::Prescription => "New Prescription",
        _ => "New Entry",
    }
}

/// Turns a draft into a stored entry with a fresh id and no notes.
pub fn build_entry(
    patient_id: &str,
    draft: EntryDraft,
    now: DateTime<Utc>,
) -> Result<TimelineEntry, TimelineError> {
    let entry_type = draft.entry_type.ok_or(TimelineError::MissingEntryType)?;

    let title = match draft.title {
        Some(t) if !t.trim().is_empty() => t,
        _ => default_title(entry_type).to_string(),
    };

    let mut content = draft
        .content
        .unwrap_or_else(|| EntryContent::empty_for(entry_type));
    check_content(entry_type, &content)?;
    assign_medicine_ids(&mut content);

    Ok(TimelineEntry {
        id: Uuid::new_v4().to_string(),
        patient_id: patient_id.to_string(),
        date: draft.date.unwrap_or(now),
        entry_type,
        title,
        content,
        document: draft.document,
        notes: Vec::new(),
    })
}

/// Prepends a new entry built from `draft`.
pub fn add_entry<'a>(
    entries: &'a mut Vec<TimelineEntry>,
    patient_id: &str,
    draft: EntryDraft,
    now: DateTime<Utc>,
) -> Result<&'a TimelineEntry, TimelineError> {
    let entry = build_entry(patient_id, draft, now)?;
    entries.insert(0, entry);
    Ok(&entries[0])
}

/// Appends a note stamped with `now`. Visibility is taken as given.
pub fn add_note(entry: &mut TimelineEntry, draft: NoteDraft, now: DateTime<Utc>) -> &EntryNote {
    entry.notes.push(EntryNote {
        id: Uuid::new_v4().to_string(),
        author: draft.author,
        visibility: draft.visibility,
        text: draft.text,
        timestamp: now,
    });
    let last = entry.notes.len() - 1;
    &entry.notes[last]
}

/// Replaces the payload wholesale, as the prescription editor saves the
/// full medicine list on every change. The entry keeps its type.
pub fn update_content(entry: &mut TimelineEntry, mut content: EntryContent) -> Result<(), TimelineError> {
    check_content(entry.entry_type, &content)?;
    assign_medicine_ids(&mut content);
    entry.content = content;
    Ok(())
}

fn check_content(entry_type: EntryType, content: &EntryContent) -> Result<(), TimelineError> {
    if content.entry_type() == entry_type {
        Ok(())
    } else {
        Err(TimelineError::ContentTypeMismatch {
            entry_type,
            content: content.entry_type(),
        })
    }
}

fn assign_medicine_ids(content: &mut EntryContent) {
    if let EntryContent::Prescription { medicines, .. } = content {
        for medicine in medicines.iter_mut().filter(|m| m.id.is_empty()) {
            medicine.id = Uuid::new_v4().to_string();
        }
    }
}
