//! Patient timeline: chronological view of a patient's clinical entries.
//!
//! Entries (notes, prescriptions, lab results) are filtered by free text
//! and exact calendar day, partitioned by calendar month in the observer's
//! time zone, and returned newest month first with newest entries first
//! inside each month. Also owns the entry/note append rules.

mod entries;
mod grouping;
mod types;

pub use entries::*;
pub use grouping::*;
pub use types::*;

// ── Tests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{BTreeMap, HashSet};

    use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};

    use crate::models::enums::{AuthorRole, EntryType, NoteVisibility};
    use crate::models::{EntryContent, EntryDraft, Medicine, NoteAuthor, NoteDraft, TimelineEntry};

    fn at(rfc3339: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc)
    }

    fn entry(id: &str, title: &str, date: &str) -> TimelineEntry {
        TimelineEntry {
            id: id.into(),
            patient_id: "p1".into(),
            date: at(date),
            entry_type: EntryType::Note,
            title: title.into(),
            content: EntryContent::Note {
                fields: BTreeMap::new(),
            },
            document: None,
            notes: Vec::new(),
        }
    }

    fn prescription(id: &str, date: &str, medicine: &str, instructions: &str) -> TimelineEntry {
        TimelineEntry {
            entry_type: EntryType::Prescription,
            title: "Prescription".into(),
            content: EntryContent::Prescription {
                medicines: vec![Medicine {
                    id: format!("{id}-m"),
                    name: medicine.into(),
                    dosage: "500mg".into(),
                    frequency: "twice daily".into(),
                    duration: "7 days".into(),
                }],
                special_instructions: instructions.into(),
            },
            ..entry(id, "", date)
        }
    }

    fn sample() -> Vec<TimelineEntry> {
        vec![
            entry("a", "Consultation", "2024-01-20T09:00:00Z"),
            entry("b", "Follow-up", "2024-02-15T10:30:00Z"),
            prescription("c", "2024-02-03T08:00:00Z", "Amoxicillin", "Take with food"),
            entry("d", "Lab review", "2023-12-31T23:00:00Z"),
            entry("e", "Discharge", "2024-02-15T18:45:00Z"),
        ]
    }

    // ── Grouping ───────────────────────────────────────────────────────

    #[test]
    fn empty_input_yields_no_groups() {
        let groups = group_entries(&[], &TimelineQuery::default(), &Utc);
        assert!(groups.is_empty());
    }

    #[test]
    fn groups_partition_the_input() {
        let entries = sample();
        let groups = group_entries(&entries, &TimelineQuery::default(), &Utc);

        let ids: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.entries.iter().map(|e| e.id.as_str()))
            .collect();
        let unique: HashSet<&str> = ids.iter().copied().collect();
        let expected: HashSet<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids.len(), entries.len());
        assert_eq!(unique, expected);

        for group in &groups {
            for e in &group.entries {
                assert_eq!(MonthKey::of(&e.date, &Utc), group.key);
            }
        }
    }

    #[test]
    fn groups_are_newest_month_first() {
        let groups = group_entries(&sample(), &TimelineQuery::default(), &Utc);
        let keys: Vec<(i32, u32)> = groups.iter().map(|g| (g.key.year, g.key.month)).collect();
        assert_eq!(keys, vec![(2024, 2), (2024, 1), (2023, 12)]);
        for pair in groups.windows(2) {
            assert!(pair[0].key >= pair[1].key);
        }
    }

    #[test]
    fn entries_within_month_are_newest_first() {
        let groups = group_entries(&sample(), &TimelineQuery::default(), &Utc);
        let feb: Vec<&str> = groups[0].entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(feb, vec!["e", "b", "c"]);
        for group in &groups {
            for pair in group.entries.windows(2) {
                assert!(pair[0].date >= pair[1].date);
            }
        }
    }

    #[test]
    fn group_labels_read_as_month_and_year() {
        let groups = group_entries(&sample(), &TimelineQuery::default(), &Utc);
        assert_eq!(groups[0].label, "February 2024");
        assert_eq!(groups[2].label, "December 2023");
    }

    #[test]
    fn month_boundary_follows_observer_zone() {
        // 23:00 UTC on Dec 31 is already January in UTC+2.
        let entries = vec![entry("d", "Lab review", "2023-12-31T23:00:00Z")];
        let plus_two = FixedOffset::east_opt(2 * 3600).unwrap();

        let utc_groups = group_entries(&entries, &TimelineQuery::default(), &Utc);
        let local_groups = group_entries(&entries, &TimelineQuery::default(), &plus_two);

        assert_eq!(utc_groups[0].key, MonthKey { year: 2023, month: 12 });
        assert_eq!(local_groups[0].key, MonthKey { year: 2024, month: 1 });
    }

    // ── Filtering ──────────────────────────────────────────────────────

    #[test]
    fn text_filter_is_case_insensitive_on_title() {
        let entries = vec![
            entry("1", "Flu note", "2024-02-01T10:00:00Z"),
            entry("2", "X-ray", "2024-02-02T10:00:00Z"),
        ];
        let groups = group_entries(&entries, &TimelineQuery::text("flu"), &Utc);
        let ids: Vec<&str> = groups.iter().flat_map(|g| g.entries.iter().map(|e| e.id.as_str())).collect();
        assert_eq!(ids, vec!["1"]);
    }

    #[test]
    fn empty_or_absent_text_keeps_everything() {
        let entries = vec![
            entry("1", "Flu note", "2024-02-01T10:00:00Z"),
            entry("2", "X-ray", "2024-02-02T10:00:00Z"),
        ];
        let empty = group_entries(&entries, &TimelineQuery::text(""), &Utc);
        let absent = group_entries(&entries, &TimelineQuery::default(), &Utc);
        assert_eq!(empty[0].entries.len(), 2);
        assert_eq!(absent[0].entries.len(), 2);
    }

    #[test]
    fn text_filter_matches_medicine_names_and_instructions() {
        let entries = sample();
        let by_medicine = group_entries(&entries, &TimelineQuery::text("AMOXI"), &Utc);
        assert_eq!(by_medicine.len(), 1);
        assert_eq!(by_medicine[0].entries[0].id, "c");

        let by_instructions = group_entries(&entries, &TimelineQuery::text("with food"), &Utc);
        assert_eq!(by_instructions[0].entries[0].id, "c");
    }

    #[test]
    fn exact_date_matches_local_calendar_day() {
        let entries = sample();
        let day = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        let groups = group_entries(&entries, &TimelineQuery::on(day), &Utc);
        let ids: Vec<&str> = groups[0].entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["e", "b"]);

        // 18:45 UTC on the 15th is the 16th in UTC+8.
        let plus_eight = FixedOffset::east_opt(8 * 3600).unwrap();
        let groups = group_entries(&entries, &TimelineQuery::on(day), &plus_eight);
        let ids: Vec<&str> = groups[0].entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["b"]);
    }

    #[test]
    fn text_and_date_filters_combine_with_and() {
        let query = TimelineQuery {
            text: Some("discharge".into()),
            exact_date: NaiveDate::from_ymd_opt(2024, 2, 3),
        };
        assert!(group_entries(&sample(), &query, &Utc).is_empty());
    }

    #[test]
    fn filtered_to_nothing_is_empty_not_error() {
        let groups = group_entries(&sample(), &TimelineQuery::text("no such thing"), &Utc);
        assert!(groups.is_empty());
    }

    // ── Mutations ──────────────────────────────────────────────────────

    #[test]
    fn add_entry_prepends_with_fresh_id_and_no_notes() {
        let mut entries = sample();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let draft = EntryDraft {
            entry_type: Some(EntryType::Prescription),
            ..EntryDraft::default()
        };

        let added = add_entry(&mut entries, "p1", draft, now).unwrap().clone();

        assert_eq!(entries.len(), 6);
        assert_eq!(entries[0].id, added.id);
        assert!(!sample().iter().any(|e| e.id == added.id));
        assert!(added.notes.is_empty());
        assert_eq!(added.title, "New Prescription");
        assert_eq!(added.date, now);
        assert_eq!(
            added.content,
            EntryContent::Prescription {
                medicines: Vec::new(),
                special_instructions: String::new()
            }
        );
    }

    #[test]
    fn add_entry_requires_a_type() {
        let mut entries = Vec::new();
        let err = add_entry(&mut entries, "p1", EntryDraft::default(), Utc::now()).unwrap_err();
        assert_eq!(err, TimelineError::MissingEntryType);
        assert!(entries.is_empty());
    }

    #[test]
    fn add_entry_rejects_content_of_another_type() {
        let mut entries = Vec::new();
        let draft = EntryDraft {
            entry_type: Some(EntryType::Note),
            content: Some(EntryContent::LabResult { values: Vec::new() }),
            ..EntryDraft::default()
        };
        let err = add_entry(&mut entries, "p1", draft, Utc::now()).unwrap_err();
        assert_eq!(
            err,
            TimelineError::ContentTypeMismatch {
                entry_type: EntryType::Note,
                content: EntryType::LabResult,
            }
        );
        assert!(entries.is_empty());
    }

    #[test]
    fn update_content_cannot_change_the_payload_kind() {
        let mut e = prescription("c", "2024-02-03T08:00:00Z", "Amoxicillin", "Twice daily");
        let before = e.content.clone();
        let err = update_content(
            &mut e,
            EntryContent::Note {
                fields: Default::default(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, TimelineError::ContentTypeMismatch { .. }));
        assert_eq!(e.content, before);
        assert_eq!(e.content.medicines()[0].name, "Amoxicillin");
    }

    #[test]
    fn add_entry_keeps_given_title_and_date() {
        let date = at("2024-01-05T07:30:00Z");
        let draft = EntryDraft {
            entry_type: Some(EntryType::LabResult),
            title: Some("CBC panel".into()),
            date: Some(date),
            ..EntryDraft::default()
        };
        let built = build_entry("p9", draft, Utc::now()).unwrap();
        assert_eq!(built.title, "CBC panel");
        assert_eq!(built.date, date);
        assert_eq!(built.patient_id, "p9");
        assert_eq!(built.content, EntryContent::LabResult { values: Vec::new() });
    }

    #[test]
    fn add_note_appends_in_order_with_timestamp() {
        let mut e = entry("a", "Consultation", "2024-01-20T09:00:00Z");
        let author = NoteAuthor {
            id: "dr-james".into(),
            name: "Dr. James Martin".into(),
            role: AuthorRole::Doctor,
        };
        let first_at = at("2024-01-21T09:00:00Z");
        let second_at = at("2024-01-22T09:00:00Z");

        add_note(
            &mut e,
            NoteDraft {
                author: author.clone(),
                visibility: NoteVisibility::General,
                text: "Patient improving".into(),
            },
            first_at,
        );
        let second = add_note(
            &mut e,
            NoteDraft {
                author,
                visibility: NoteVisibility::Restricted,
                text: "Discuss prognosis privately".into(),
            },
            second_at,
        )
        .clone();

        assert_eq!(e.notes.len(), 2);
        assert_eq!(e.notes[0].text, "Patient improving");
        assert_eq!(e.notes[0].timestamp, first_at);
        assert_eq!(second.visibility, NoteVisibility::Restricted);
        assert_ne!(e.notes[0].id, e.notes[1].id);
    }

    #[test]
    fn update_content_assigns_missing_medicine_ids() {
        let mut e = prescription("c", "2024-02-03T08:00:00Z", "Amoxicillin", "");
        update_content(
            &mut e,
            EntryContent::Prescription {
                medicines: vec![Medicine {
                    id: String::new(),
                    name: "Ibuprofen".into(),
                    dosage: "200mg".into(),
                    frequency: "as needed".into(),
                    duration: "3 days".into(),
                }],
                special_instructions: "After meals".into(),
            },
        )
        .unwrap();
        let meds = e.content.medicines();
        assert_eq!(meds.len(), 1);
        assert!(!meds[0].id.is_empty());
        assert_eq!(e.content.special_instructions(), Some("After meals"));
    }
}
