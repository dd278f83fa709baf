//! Demo dataset for a fresh portal.
//!
//! Everything here is fictional. The acting doctor is `dr-james`; two
//! patients are on their roster, two colleagues are in the network, and
//! two invitations plus two transfers wait in the inbox.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::avatar::AvatarResolver;
use crate::models::enums::{
    ConversationCategory, EntryType, Gender, MessageCategory, MessageStatus, ParticipantRole,
    RequestStatus, Urgency,
};
use crate::models::{
    Availability, ContactInfo, Conversation, DocumentRef, DoctorSummary, EntryContent,
    FriendRequest, LabValue, MedicalHistoryItem, Medicine, Message, NetworkDoctor, Participant,
    Patient, TimelineEntry, TransferRequest,
};

/// Records to load into an empty store.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pub patients: Vec<Patient>,
    pub doctors: Vec<NetworkDoctor>,
    pub friend_requests: Vec<FriendRequest>,
    pub transfer_requests: Vec<TransferRequest>,
    pub timeline_entries: Vec<TimelineEntry>,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<Message>,
}

fn utc(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, 0)
        .single()
        .unwrap_or_default()
}

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or_default()
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn sample(avatars: &dyn AvatarResolver) -> Fixtures {
    let patients = patients();
    let doctors = doctors();
    let conversations = conversations(avatars);
    let messages = messages(&conversations);
    Fixtures {
        friend_requests: friend_requests(avatars),
        transfer_requests: transfer_requests(avatars),
        timeline_entries: timeline_entries(),
        patients,
        doctors,
        conversations,
        messages,
    }
}

// ── Roster ──────────────────────────────────────────────────

fn patients() -> Vec<Patient> {
    vec![
        Patient {
            id: "876364".into(),
            name: "Nithya Kumar".into(),
            patient_number: Some("4782640981".into()),
            gender: Some(Gender::Female),
            last_visit: utc(2023, 4, 10, 14, 0),
            reason: "Monthly checkup".into(),
            priority: Urgency::High,
            assigned_doctor: "dr-james".into(),
            chat_enabled: true,
            unread_messages: 1,
            medical_history: vec![
                MedicalHistoryItem {
                    condition: "Hypertension".into(),
                    date: day(2021, 6, 3),
                    treatment: "Lisinopril 10mg daily".into(),
                },
                MedicalHistoryItem {
                    condition: "Iron deficiency anaemia".into(),
                    date: day(2022, 11, 18),
                    treatment: "Ferrous sulfate, recheck CBC in 3 months".into(),
                },
            ],
        },
        Patient {
            id: "348745".into(),
            name: "Varun P".into(),
            patient_number: Some("4782640982".into()),
            gender: Some(Gender::Male),
            last_visit: utc(2023, 4, 10, 13, 0),
            reason: "Consultation".into(),
            priority: Urgency::Medium,
            assigned_doctor: "dr-james".into(),
            chat_enabled: false,
            unread_messages: 0,
            medical_history: Vec::new(),
        },
    ]
}

// ── Network ─────────────────────────────────────────────────

fn doctors() -> Vec<NetworkDoctor> {
    vec![
        NetworkDoctor {
            id: "dr-james".into(),
            name: "Dr. James Martin".into(),
            specialization: "General Surgeon".into(),
            experience: "15+ years".into(),
            education: strings(&[
                "MBBS - Harvard Medical School",
                "MS General Surgery - Johns Hopkins University",
            ]),
            certifications: strings(&["American Board of Surgery", "Advanced Trauma Life Support"]),
            contact: ContactInfo {
                email: "james.martin@clinic.example".into(),
                phone: "+1 (555) 123-4567".into(),
                address: "123 Medical Center Drive, Boston, MA 02115".into(),
            },
            availability: Availability {
                days: strings(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
                hours: "9:00 AM - 5:00 PM".into(),
            },
            rating: 4.8,
            total_patients: 1500,
        },
        NetworkDoctor {
            id: "dr-sarah".into(),
            name: "Dr. Sarah Johnson".into(),
            specialization: "Cardiologist".into(),
            experience: "12 years".into(),
            education: strings(&[
                "MD - Stanford University School of Medicine",
                "Cardiology Fellowship - Mayo Clinic",
            ]),
            certifications: strings(&[
                "Board Certified in Cardiovascular Disease",
                "Advanced Cardiac Life Support (ACLS)",
            ]),
            contact: ContactInfo {
                email: "sarah.johnson@clinic.example".into(),
                phone: "+1 (555) 234-5678".into(),
                address: "456 Cardiology Center, San Francisco, CA 94143".into(),
            },
            availability: Availability {
                days: strings(&["Monday", "Tuesday", "Wednesday", "Friday"]),
                hours: "9:00 AM - 5:00 PM".into(),
            },
            rating: 4.8,
            total_patients: 1200,
        },
        NetworkDoctor {
            id: "dr-michael".into(),
            name: "Dr. Michael Chen".into(),
            specialization: "Neurologist".into(),
            experience: "15 years".into(),
            education: strings(&[
                "MD - Harvard Medical School",
                "Neurology Residency - Massachusetts General Hospital",
            ]),
            certifications: strings(&["American Board of Psychiatry and Neurology"]),
            contact: ContactInfo {
                email: "michael.chen@clinic.example".into(),
                phone: "+1 (555) 345-6789".into(),
                address: "789 Neurology Institute, Boston, MA 02114".into(),
            },
            availability: Availability {
                days: strings(&["Monday", "Wednesday", "Thursday", "Friday"]),
                hours: "8:00 AM - 4:00 PM".into(),
            },
            rating: 4.5,
            total_patients: 1000,
        },
    ]
}

fn summary(
    avatars: &dyn AvatarResolver,
    id: &str,
    name: &str,
    specialization: &str,
    hospital: &str,
) -> DoctorSummary {
    DoctorSummary {
        id: id.into(),
        name: name.into(),
        specialization: specialization.into(),
        hospital: hospital.into(),
        avatar_url: Some(avatars.avatar_url(name)),
    }
}

// ── Inbox ───────────────────────────────────────────────────

fn friend_requests(avatars: &dyn AvatarResolver) -> Vec<FriendRequest> {
    vec![
        FriendRequest {
            id: "fr-1".into(),
            from: summary(
                avatars,
                "dr-robert",
                "Dr. Robert Smith",
                "Orthopedic Surgeon",
                "Central Medical Center",
            ),
            to_doctor_id: "dr-james".into(),
            status: RequestStatus::Pending,
            timestamp: utc(2024, 2, 15, 10, 30),
        },
        FriendRequest {
            id: "fr-2".into(),
            from: summary(
                avatars,
                "dr-lisa",
                "Dr. Lisa Anderson",
                "Dermatologist",
                "Skin Care Clinic",
            ),
            to_doctor_id: "dr-james".into(),
            status: RequestStatus::Pending,
            timestamp: utc(2024, 2, 14, 15, 45),
        },
    ]
}

fn transfer_requests(avatars: &dyn AvatarResolver) -> Vec<TransferRequest> {
    vec![
        TransferRequest {
            id: "tr-1".into(),
            patient_id: "p123".into(),
            patient_name: "John Doe".into(),
            from_doctor: summary(
                avatars,
                "dr6",
                "Dr. Michael Brown",
                "General Practitioner",
                "City Hospital",
            ),
            to_doctor_id: "dr-james".into(),
            reason: "Requires specialized cardiac care".into(),
            urgency: Urgency::High,
            medical_summary:
                "Patient has a history of cardiac issues and requires immediate specialized care."
                    .into(),
            status: RequestStatus::Pending,
            timestamp: utc(2024, 2, 15, 9, 0),
        },
        TransferRequest {
            id: "tr-2".into(),
            patient_id: "p124".into(),
            patient_name: "Sarah Wilson".into(),
            from_doctor: summary(
                avatars,
                "dr7",
                "Dr. Emma Davis",
                "Internal Medicine",
                "Medical Center",
            ),
            to_doctor_id: "dr-james".into(),
            reason: "Follow-up care for chronic condition".into(),
            urgency: Urgency::Medium,
            medical_summary:
                "Patient with diabetes requiring ongoing specialized care and monitoring.".into(),
            status: RequestStatus::Pending,
            timestamp: utc(2024, 2, 14, 14, 30),
        },
    ]
}

// ── Timeline ────────────────────────────────────────────────

fn note(fields: &[(&str, &str)]) -> EntryContent {
    EntryContent::Note {
        fields: fields
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<BTreeMap<_, _>>(),
    }
}

fn lab(name: &str, reading: &str, unit: Option<&str>) -> LabValue {
    LabValue {
        name: name.into(),
        reading: reading.into(),
        unit: unit.map(str::to_string),
    }
}

fn medicine(id: &str, name: &str, dosage: &str, frequency: &str, duration: &str) -> Medicine {
    Medicine {
        id: id.into(),
        name: name.into(),
        dosage: dosage.into(),
        frequency: frequency.into(),
        duration: duration.into(),
    }
}

fn timeline_entries() -> Vec<TimelineEntry> {
    vec![
        TimelineEntry {
            id: "te-1".into(),
            patient_id: "876364".into(),
            date: utc(2024, 2, 15, 10, 30),
            entry_type: EntryType::LabResult,
            title: "Complete Blood Count".into(),
            content: EntryContent::LabResult {
                values: vec![
                    lab("WBC", "10.32", Some("ppm")),
                    lab("LLRC", "56.33", Some("mm/gl")),
                    lab("Unit reading", "22/56", None),
                ],
            },
            document: Some(DocumentRef {
                name: "cbc_report.pdf".into(),
                url: "#".into(),
            }),
            notes: Vec::new(),
        },
        TimelineEntry {
            id: "te-2".into(),
            patient_id: "876364".into(),
            date: utc(2024, 2, 15, 9, 0),
            entry_type: EntryType::Note,
            title: "Follow-up Consultation".into(),
            content: note(&[(
                "summary",
                "Patient reports improvement in symptoms. Continue current medication regimen.",
            )]),
            document: None,
            notes: Vec::new(),
        },
        TimelineEntry {
            id: "te-3".into(),
            patient_id: "876364".into(),
            date: utc(2024, 1, 22, 11, 15),
            entry_type: EntryType::Prescription,
            title: "Sinus infection".into(),
            content: EntryContent::Prescription {
                medicines: vec![
                    medicine("med-1", "Amoxicillin", "500mg", "3 times daily", "7 days"),
                    medicine("med-2", "Ibuprofen", "400mg", "As needed", "5 days"),
                ],
                special_instructions: "Take after meals. Complete the full course.".into(),
            },
            document: None,
            notes: Vec::new(),
        },
        TimelineEntry {
            id: "te-4".into(),
            patient_id: "876364".into(),
            date: utc(2023, 12, 5, 8, 45),
            entry_type: EntryType::LabResult,
            title: "Lipid Panel".into(),
            content: EntryContent::LabResult {
                values: vec![
                    lab("Total cholesterol", "212", Some("mg/dL")),
                    lab("HDL", "48", Some("mg/dL")),
                ],
            },
            document: None,
            notes: Vec::new(),
        },
        TimelineEntry {
            id: "te-5".into(),
            patient_id: "348745".into(),
            date: utc(2024, 2, 15, 13, 0),
            entry_type: EntryType::Note,
            title: "Initial Consultation".into(),
            content: note(&[
                ("summary", "Recurring headaches for two weeks."),
                ("plan", "Keep a headache diary and review in one month."),
            ]),
            document: None,
            notes: Vec::new(),
        },
    ]
}

// ── Messaging ───────────────────────────────────────────────

fn participant(avatars: &dyn AvatarResolver, id: &str, name: &str, role: ParticipantRole) -> Participant {
    Participant {
        id: id.into(),
        name: name.into(),
        role,
        avatar_url: avatars.avatar_url(name),
    }
}

fn conversations(avatars: &dyn AvatarResolver) -> Vec<Conversation> {
    let james = participant(avatars, "dr-james", "Dr. James Martin", ParticipantRole::Doctor);
    vec![
        Conversation {
            id: "conv-1".into(),
            participants: vec![
                james.clone(),
                participant(avatars, "876364", "Nithya Kumar", ParticipantRole::Patient),
            ],
            category: ConversationCategory::Patient,
            pinned: false,
            archived: false,
            unread_count: 1,
            created_at: utc(2024, 2, 15, 12, 0),
            updated_at: utc(2024, 2, 15, 12, 6),
            last_message_preview: Some("Thank you, I will review it.".into()),
        },
        Conversation {
            id: "conv-2".into(),
            participants: vec![
                james.clone(),
                participant(avatars, "348745", "Varun P", ParticipantRole::Patient),
            ],
            category: ConversationCategory::Patient,
            pinned: false,
            archived: false,
            unread_count: 0,
            created_at: utc(2024, 2, 10, 9, 0),
            updated_at: utc(2024, 2, 10, 9, 5),
            last_message_preview: Some("See you at the consultation.".into()),
        },
        Conversation {
            id: "conv-3".into(),
            participants: vec![
                james,
                participant(avatars, "dr-sarah", "Dr. Sarah Johnson", ParticipantRole::Doctor),
            ],
            category: ConversationCategory::Doctor,
            pinned: true,
            archived: false,
            unread_count: 0,
            created_at: utc(2024, 2, 1, 16, 0),
            updated_at: utc(2024, 2, 1, 16, 20),
            last_message_preview: Some("Happy to take a look at the ECG.".into()),
        },
    ]
}

fn messages(conversations: &[Conversation]) -> Vec<Message> {
    let sender = |conv: usize, idx: usize| conversations[conv].participants[idx].clone();
    let message = |id: &str, conv: usize, from: usize, content: &str, at, status, category| Message {
        id: id.into(),
        conversation_id: conversations[conv].id.clone(),
        sender: sender(conv, from),
        content: content.into(),
        timestamp: at,
        status,
        category,
    };

    if conversations.len() < 3 {
        return Vec::new();
    }

    vec![
        message(
            "msg-1",
            0,
            1,
            "Blood pressure report.",
            utc(2024, 2, 15, 12, 4),
            MessageStatus::Delivered,
            None,
        ),
        message(
            "msg-2",
            0,
            0,
            "Thank you, I will review it.",
            utc(2024, 2, 15, 12, 6),
            MessageStatus::Sent,
            Some(MessageCategory::FollowUp),
        ),
        message(
            "msg-3",
            1,
            0,
            "See you at the consultation.",
            utc(2024, 2, 10, 9, 5),
            MessageStatus::Read,
            Some(MessageCategory::Routine),
        ),
        message(
            "msg-4",
            2,
            0,
            "Could you review an ECG for one of my patients?",
            utc(2024, 2, 1, 16, 10),
            MessageStatus::Read,
            None,
        ),
        message(
            "msg-5",
            2,
            1,
            "Happy to take a look at the ECG.",
            utc(2024, 2, 1, 16, 20),
            MessageStatus::Read,
            None,
        ),
    ]
}
