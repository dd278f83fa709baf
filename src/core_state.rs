//! Portal state: the single source of truth shared by every surface.
//!
//! `PortalState` owns one repository per entity and applies every mutation
//! through the pure domain functions (`timeline`, `requests`,
//! `permissions`, `chat`). Mutations are serialized by one write lock so a
//! read-modify-write (e.g. accepting a request) cannot interleave with
//! another. Each produced `Notification` is broadcast to subscribers.

use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, TimeZone, Utc};
use tokio::sync::broadcast;

use crate::avatar::{AvatarResolver, UiAvatars};
use crate::chat::{self, ChatError, MessageDraft};
use crate::config::StorageConfig;
use crate::db::{self, DatabaseError, MemoryRepository, Repository, SqliteRepository};
use crate::fixtures::Fixtures;
use crate::models::enums::{
    AuthorRole, ConversationCategory, NoteVisibility, ParticipantRole, RequestStatus,
};
use crate::models::{
    Actor, ChatPermissionLog, Conversation, DoctorSummary, EntryContent, EntryDraft, FriendRequest,
    Message, NetworkDoctor, NoteAuthor, NoteDraft, Notification, Participant, Patient,
    PendingCounts, TimelineEntry, TransferDraft, TransferRequest,
};
use crate::permissions::{self, ChatToggleIntent, ChatToggled};
use crate::requests::{self, FriendAccepted, LifecycleError, TransferAccepted};
use crate::timeline::{self, TimelineError, TimelineGroup, TimelineQuery};

/// Notifications kept for slow subscribers before they start lagging.
const EVENT_CHANNEL_CAPACITY: usize = 64;

type Clock = Box<dyn Fn() -> DateTime<Utc> + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Internal lock error")]
    LockPoisoned,
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },
    #[error(transparent)]
    Timeline(#[from] TimelineError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error(transparent)]
    Chat(#[from] ChatError),
}

fn not_found(entity: &'static str, id: &str) -> CoreError {
    CoreError::NotFound {
        entity,
        id: id.to_string(),
    }
}

// ═══════════════════════════════════════════════════════════
// PortalState
// ═══════════════════════════════════════════════════════════

pub struct PortalState {
    entries: Box<dyn Repository<TimelineEntry>>,
    patients: Box<dyn Repository<Patient>>,
    doctors: Box<dyn Repository<NetworkDoctor>>,
    friend_requests: Box<dyn Repository<FriendRequest>>,
    transfer_requests: Box<dyn Repository<TransferRequest>>,
    chat_logs: Box<dyn Repository<ChatPermissionLog>>,
    conversations: Box<dyn Repository<Conversation>>,
    messages: Box<dyn Repository<Message>>,
    avatars: Box<dyn AvatarResolver>,
    events: broadcast::Sender<Notification>,
    /// Held for the whole of every mutation.
    write_lock: Mutex<()>,
    clock: Clock,
}

impl PortalState {
    /// Process-local store, the behaviour of the original prototype.
    pub fn in_memory() -> Self {
        Self::assemble(
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
            Box::new(MemoryRepository::new()),
        )
    }

    /// SQLite-backed store at `path`, created and migrated if needed.
    pub fn open_sqlite(path: &Path) -> Result<Self, CoreError> {
        let conn = db::open_database(path)?;
        tracing::info!(path = %path.display(), "Opened portal database");
        Ok(Self::from_connection(conn))
    }

    /// SQLite-backed store over an already migrated connection.
    pub fn from_connection(conn: rusqlite::Connection) -> Self {
        let conn = Arc::new(Mutex::new(conn));
        Self::assemble(
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn.clone())),
            Box::new(SqliteRepository::new(conn)),
        )
    }

    pub fn from_config(storage: &StorageConfig) -> Result<Self, CoreError> {
        match storage {
            StorageConfig::Memory => Ok(Self::in_memory()),
            StorageConfig::Sqlite(path) => Self::open_sqlite(path),
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn assemble(
        entries: Box<dyn Repository<TimelineEntry>>,
        patients: Box<dyn Repository<Patient>>,
        doctors: Box<dyn Repository<NetworkDoctor>>,
        friend_requests: Box<dyn Repository<FriendRequest>>,
        transfer_requests: Box<dyn Repository<TransferRequest>>,
        chat_logs: Box<dyn Repository<ChatPermissionLog>>,
        conversations: Box<dyn Repository<Conversation>>,
        messages: Box<dyn Repository<Message>>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            entries,
            patients,
            doctors,
            friend_requests,
            transfer_requests,
            chat_logs,
            conversations,
            messages,
            avatars: Box::new(UiAvatars::default()),
            events,
            write_lock: Mutex::new(()),
            clock: Box::new(Utc::now),
        }
    }

    pub fn with_avatar_resolver(mut self, resolver: Box<dyn AvatarResolver>) -> Self {
        self.avatars = resolver;
        self
    }

    /// Replaces the wall clock, so tests can pin "now".
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    fn now(&self) -> DateTime<Utc> {
        (self.clock)()
    }

    fn write_guard(&self) -> Result<MutexGuard<'_, ()>, CoreError> {
        self.write_lock.lock().map_err(|_| CoreError::LockPoisoned)
    }

    // ── Events ──────────────────────────────────────────────

    /// Receive every notification produced from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.events.subscribe()
    }

    fn publish(&self, notification: &Notification) {
        if self.events.send(notification.clone()).is_err() {
            tracing::debug!(message = %notification.message, "No notification subscribers");
        }
    }

    /// Record an access for the audit trail.
    pub fn log_access(&self, actor_id: &str, action: &str, detail: &str) {
        tracing::info!(target: "audit", actor_id, action, detail, "Portal access");
    }

    pub fn avatar_url(&self, display_name: &str) -> String {
        self.avatars.avatar_url(display_name)
    }

    // ── Fixtures ────────────────────────────────────────────

    /// Load a dataset into whichever backend this state uses.
    pub fn seed(&self, fixtures: Fixtures) -> Result<(), CoreError> {
        let _guard = self.write_guard()?;
        for p in &fixtures.patients {
            self.patients.save(p)?;
        }
        for d in &fixtures.doctors {
            self.doctors.save(d)?;
        }
        for r in &fixtures.friend_requests {
            self.friend_requests.save(r)?;
        }
        for r in &fixtures.transfer_requests {
            self.transfer_requests.save(r)?;
        }
        for e in &fixtures.timeline_entries {
            self.entries.save(e)?;
        }
        for c in &fixtures.conversations {
            self.conversations.save(c)?;
        }
        for m in &fixtures.messages {
            self.messages.save(m)?;
        }
        tracing::info!(
            patients = fixtures.patients.len(),
            doctors = fixtures.doctors.len(),
            entries = fixtures.timeline_entries.len(),
            "Seeded portal fixtures"
        );
        Ok(())
    }

    // ── Patients & doctors ──────────────────────────────────

    /// Patients assigned to the actor.
    pub fn patients(&self, actor: &Actor) -> Result<Vec<Patient>, CoreError> {
        Ok(self
            .patients
            .list()?
            .into_iter()
            .filter(|p| p.assigned_doctor == actor.id)
            .collect())
    }

    pub fn patient(&self, patient_id: &str) -> Result<Patient, CoreError> {
        self.patients
            .get(patient_id)?
            .ok_or_else(|| not_found("patient", patient_id))
    }

    /// Colleagues in the actor's network. The actor's own profile is
    /// stored alongside but not listed.
    pub fn network_doctors(&self, actor: &Actor) -> Result<Vec<NetworkDoctor>, CoreError> {
        Ok(self
            .doctors
            .list()?
            .into_iter()
            .filter(|d| d.id != actor.id)
            .collect())
    }

    pub fn doctor(&self, doctor_id: &str) -> Result<NetworkDoctor, CoreError> {
        self.doctors
            .get(doctor_id)?
            .ok_or_else(|| not_found("doctor", doctor_id))
    }

    /// How the actor appears on requests they send.
    fn actor_summary(&self, actor: &Actor) -> Result<DoctorSummary, CoreError> {
        let profile = self.doctors.get(&actor.id)?;
        Ok(DoctorSummary {
            id: actor.id.clone(),
            name: actor.name.clone(),
            specialization: profile
                .as_ref()
                .map(|d| d.specialization.clone())
                .unwrap_or_default(),
            hospital: profile
                .as_ref()
                .map(|d| d.contact.address.clone())
                .unwrap_or_default(),
            avatar_url: Some(self.avatar_url(&actor.name)),
        })
    }

    // ── Timeline ────────────────────────────────────────────

    /// The patient's timeline grouped by month in the observer's zone.
    pub fn timeline<Tz: TimeZone>(
        &self,
        patient_id: &str,
        query: &TimelineQuery,
        tz: &Tz,
    ) -> Result<Vec<TimelineGroup>, CoreError> {
        self.patient(patient_id)?;
        let entries: Vec<TimelineEntry> = self
            .entries
            .list()?
            .into_iter()
            .filter(|e| e.patient_id == patient_id)
            .collect();
        tracing::debug!(patient_id, entries = entries.len(), "Timeline requested");
        Ok(timeline::group_entries(&entries, query, tz))
    }

    pub fn add_timeline_entry(
        &self,
        patient_id: &str,
        draft: EntryDraft,
        actor: &Actor,
    ) -> Result<TimelineEntry, CoreError> {
        let _guard = self.write_guard()?;
        self.patient(patient_id)?;
        let entry = timeline::build_entry(patient_id, draft, self.now())?;
        self.entries.save(&entry)?;
        tracing::info!(
            entry_id = %entry.id,
            patient_id,
            entry_type = %entry.entry_type,
            actor_id = %actor.id,
            "Timeline entry added"
        );
        Ok(entry)
    }

    fn entry(&self, entry_id: &str) -> Result<TimelineEntry, CoreError> {
        self.entries
            .get(entry_id)?
            .ok_or_else(|| not_found("timeline entry", entry_id))
    }

    /// Appends a note authored by the actor.
    pub fn add_entry_note(
        &self,
        entry_id: &str,
        visibility: NoteVisibility,
        text: String,
        actor: &Actor,
    ) -> Result<TimelineEntry, CoreError> {
        let _guard = self.write_guard()?;
        let mut entry = self.entry(entry_id)?;
        let draft = NoteDraft {
            author: NoteAuthor {
                id: actor.id.clone(),
                name: actor.name.clone(),
                role: AuthorRole::Doctor,
            },
            visibility,
            text,
        };
        timeline::add_note(&mut entry, draft, self.now());
        self.entries.save(&entry)?;
        tracing::info!(entry_id, visibility = %visibility, actor_id = %actor.id, "Note added");
        Ok(entry)
    }

    pub fn update_entry_content(
        &self,
        entry_id: &str,
        content: EntryContent,
        actor: &Actor,
    ) -> Result<TimelineEntry, CoreError> {
        let _guard = self.write_guard()?;
        let mut entry = self.entry(entry_id)?;
        timeline::update_content(&mut entry, content)?;
        self.entries.save(&entry)?;
        tracing::info!(entry_id, actor_id = %actor.id, "Entry content updated");
        Ok(entry)
    }

    // ── Friend requests ─────────────────────────────────────

    /// Invitations addressed to the actor, newest first.
    pub fn friend_requests(&self, actor: &Actor) -> Result<Vec<FriendRequest>, CoreError> {
        let mut requests: Vec<FriendRequest> = self
            .friend_requests
            .list()?
            .into_iter()
            .filter(|r| r.to_doctor_id == actor.id)
            .collect();
        requests.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(requests)
    }

    fn addressed_friend_request(&self, request_id: &str, actor: &Actor) -> Result<FriendRequest, CoreError> {
        self.friend_requests
            .get(request_id)?
            .filter(|r| r.to_doctor_id == actor.id)
            .ok_or_else(|| not_found("friend request", request_id))
    }

    pub fn accept_friend_request(&self, request_id: &str, actor: &Actor) -> Result<FriendAccepted, CoreError> {
        let _guard = self.write_guard()?;
        let mut request = self.addressed_friend_request(request_id, actor)?;
        let accepted = requests::accept_friend_request(&mut request, self.now())?;
        self.friend_requests.save(&request)?;
        self.doctors.save(&accepted.doctor)?;
        self.publish(&accepted.notification);
        Ok(accepted)
    }

    pub fn decline_friend_request(&self, request_id: &str, actor: &Actor) -> Result<Notification, CoreError> {
        let _guard = self.write_guard()?;
        let mut request = self.addressed_friend_request(request_id, actor)?;
        let notification = requests::decline_friend_request(&mut request, self.now())?;
        self.friend_requests.save(&request)?;
        self.publish(&notification);
        Ok(notification)
    }

    // ── Transfer requests ───────────────────────────────────

    /// Transfers addressed to the actor, newest first.
    pub fn transfer_requests(&self, actor: &Actor) -> Result<Vec<TransferRequest>, CoreError> {
        let mut requests: Vec<TransferRequest> = self
            .transfer_requests
            .list()?
            .into_iter()
            .filter(|r| r.to_doctor_id == actor.id)
            .collect();
        requests.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(requests)
    }

    fn addressed_transfer_request(&self, request_id: &str, actor: &Actor) -> Result<TransferRequest, CoreError> {
        self.transfer_requests
            .get(request_id)?
            .filter(|r| r.to_doctor_id == actor.id)
            .ok_or_else(|| not_found("transfer request", request_id))
    }

    pub fn accept_transfer_request(&self, request_id: &str, actor: &Actor) -> Result<TransferAccepted, CoreError> {
        let _guard = self.write_guard()?;
        let mut request = self.addressed_transfer_request(request_id, actor)?;
        let existing = self.patients.get(&request.patient_id)?;
        let accepted = requests::accept_transfer_request(&mut request, existing, actor, self.now())?;
        self.transfer_requests.save(&request)?;
        self.patients.save(&accepted.patient)?;
        self.publish(&accepted.notification);
        Ok(accepted)
    }

    pub fn decline_transfer_request(&self, request_id: &str, actor: &Actor) -> Result<Notification, CoreError> {
        let _guard = self.write_guard()?;
        let mut request = self.addressed_transfer_request(request_id, actor)?;
        let notification = requests::decline_transfer_request(&mut request, self.now())?;
        self.transfer_requests.save(&request)?;
        self.publish(&notification);
        Ok(notification)
    }

    /// Proposes handing one of the actor's patients to a network colleague.
    pub fn create_transfer_request(&self, draft: TransferDraft, actor: &Actor) -> Result<TransferRequest, CoreError> {
        let _guard = self.write_guard()?;
        let patient = self.patient(&draft.patient_id)?;
        self.doctor(&draft.to_doctor_id)?;
        let sender = self.actor_summary(actor)?;
        let (request, notification) =
            requests::create_transfer_request(&patient, &sender, draft, self.now())?;
        self.transfer_requests.save(&request)?;
        self.publish(&notification);
        Ok(request)
    }

    pub fn pending_counts(&self, actor: &Actor) -> Result<PendingCounts, CoreError> {
        let friend_requests = self
            .friend_requests(actor)?
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count() as u32;
        let transfer_requests = self
            .transfer_requests(actor)?
            .iter()
            .filter(|r| r.status == RequestStatus::Pending)
            .count() as u32;
        Ok(PendingCounts {
            friend_requests,
            transfer_requests,
        })
    }

    // ── Chat permission ─────────────────────────────────────

    /// Flips the patient's chat permission if `confirm` approves the
    /// intent. Returns `None` when the caller declined.
    pub fn toggle_chat_permission<F>(
        &self,
        patient_id: &str,
        actor: &Actor,
        confirm: F,
    ) -> Result<Option<ChatToggled>, CoreError>
    where
        F: FnOnce(&ChatToggleIntent) -> bool,
    {
        let _guard = self.write_guard()?;
        let mut patient = self.patient(patient_id)?;

        let intent = ChatToggleIntent::for_patient(&patient);
        if !confirm(&intent) {
            tracing::debug!(patient_id, "Chat permission change not confirmed");
            return Ok(None);
        }

        let toggled = permissions::toggle_chat_permission(&mut patient, actor, self.now());
        self.patients.save(&patient)?;
        self.chat_logs.save(&toggled.log)?;
        self.publish(&toggled.notification);
        Ok(Some(toggled))
    }

    /// Audit trail for one patient, in the order the changes happened.
    pub fn chat_permission_logs(&self, patient_id: &str) -> Result<Vec<ChatPermissionLog>, CoreError> {
        Ok(self
            .chat_logs
            .list()?
            .into_iter()
            .filter(|l| l.patient_id == patient_id)
            .collect())
    }

    // ── Messaging ───────────────────────────────────────────

    /// Conversations the actor takes part in.
    pub fn conversations(&self, actor: &Actor, include_archived: bool) -> Result<Vec<Conversation>, CoreError> {
        let mine: Vec<Conversation> = self
            .conversations
            .list()?
            .into_iter()
            .filter(|c| c.has_participant(&actor.id))
            .collect();
        Ok(chat::sort_conversations(mine, include_archived))
    }

    fn actor_conversation(&self, conversation_id: &str, actor: &Actor) -> Result<Conversation, CoreError> {
        self.conversations
            .get(conversation_id)?
            .filter(|c| c.has_participant(&actor.id))
            .ok_or_else(|| not_found("conversation", conversation_id))
    }

    pub fn conversation_messages(&self, conversation_id: &str, actor: &Actor) -> Result<Vec<Message>, CoreError> {
        self.actor_conversation(conversation_id, actor)?;
        Ok(chat::conversation_thread(self.messages.list()?, conversation_id))
    }

    fn ensure_chat_allowed(&self, conversation: &Conversation) -> Result<(), CoreError> {
        if conversation.category != ConversationCategory::Patient {
            return Ok(());
        }
        if let Some(participant) = conversation.patient() {
            let patient = self.patient(&participant.id)?;
            if !patient.chat_enabled {
                return Err(ChatError::ChatDisabled(patient.id).into());
            }
        }
        Ok(())
    }

    pub fn send_message(
        &self,
        conversation_id: &str,
        draft: MessageDraft,
        actor: &Actor,
    ) -> Result<Message, CoreError> {
        let _guard = self.write_guard()?;
        let mut conversation = self.actor_conversation(conversation_id, actor)?;
        self.ensure_chat_allowed(&conversation)?;

        let sender = conversation
            .participants
            .iter()
            .find(|p| p.id == actor.id)
            .cloned()
            .ok_or_else(|| not_found("participant", &actor.id))?;

        let message = chat::send_message(&mut conversation, &sender, draft, self.now())?;
        self.messages.save(&message)?;
        self.conversations.save(&conversation)?;
        Ok(message)
    }

    /// Marks the conversation read for the actor. For patient chats the
    /// patient's unread badge on the roster is cleared too.
    pub fn mark_conversation_read(&self, conversation_id: &str, actor: &Actor) -> Result<Vec<String>, CoreError> {
        let _guard = self.write_guard()?;
        let mut conversation = self.actor_conversation(conversation_id, actor)?;
        let mut thread = chat::conversation_thread(self.messages.list()?, conversation_id);

        let changed = chat::mark_read(&mut conversation, &mut thread, &actor.id);
        for message in thread.iter().filter(|m| changed.contains(&m.id)) {
            self.messages.save(message)?;
        }
        self.conversations.save(&conversation)?;

        if let Some(participant) = conversation.patient() {
            if let Some(mut patient) = self.patients.get(&participant.id)? {
                patient.unread_messages = 0;
                self.patients.save(&patient)?;
            }
        }
        Ok(changed)
    }

    /// Finds or starts the actor's conversation with a patient. Refused
    /// while the patient's chat is disabled.
    pub fn open_patient_chat(&self, patient_id: &str, actor: &Actor) -> Result<Conversation, CoreError> {
        let _guard = self.write_guard()?;
        let mut patient = self.patient(patient_id)?;
        if !patient.chat_enabled {
            return Err(ChatError::ChatDisabled(patient.id).into());
        }

        patient.unread_messages = 0;
        self.patients.save(&patient)?;

        let existing = self.conversations.list()?.into_iter().find(|c| {
            c.category == ConversationCategory::Patient
                && c.has_participant(&actor.id)
                && c.has_participant(patient_id)
        });
        if let Some(conversation) = existing {
            return Ok(conversation);
        }

        let now = self.now();
        let conversation = Conversation {
            id: uuid::Uuid::new_v4().to_string(),
            participants: vec![
                Participant {
                    id: actor.id.clone(),
                    name: actor.name.clone(),
                    role: ParticipantRole::Doctor,
                    avatar_url: self.avatar_url(&actor.name),
                },
                Participant {
                    id: patient.id.clone(),
                    name: patient.name.clone(),
                    role: ParticipantRole::Patient,
                    avatar_url: self.avatar_url(&patient.name),
                },
            ],
            category: ConversationCategory::Patient,
            pinned: false,
            archived: false,
            unread_count: 0,
            created_at: now,
            updated_at: now,
            last_message_preview: None,
        };
        self.conversations.save(&conversation)?;
        tracing::info!(conversation_id = %conversation.id, patient_id, "Patient chat opened");
        Ok(conversation)
    }

    /// Searches every conversation the actor takes part in.
    pub fn search_messages(&self, term: &str, actor: &Actor) -> Result<Vec<Message>, CoreError> {
        let mine: Vec<String> = self
            .conversations(actor, true)?
            .into_iter()
            .map(|c| c.id)
            .collect();
        let messages: Vec<Message> = self
            .messages
            .list()?
            .into_iter()
            .filter(|m| mine.contains(&m.conversation_id))
            .collect();
        Ok(chat::search_messages(&messages, term)
            .into_iter()
            .cloned()
            .collect())
    }
}
