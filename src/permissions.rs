//! Chat permission: per-patient switch for direct messaging.
//!
//! Every confirmed toggle appends one `ChatPermissionLog`; the log is
//! never edited. The yes/no confirmation lives with the caller, see
//! [`ChatToggleIntent`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{Actor, ChatPermissionLog, Notification, Patient};

/// What a toggle is about to do, shown to the doctor before confirming.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatToggleIntent {
    pub patient_id: String,
    pub patient_name: String,
    pub enable: bool,
}

impl ChatToggleIntent {
    pub fn for_patient(patient: &Patient) -> Self {
        Self {
            patient_id: patient.id.clone(),
            patient_name: patient.name.clone(),
            enable: !patient.chat_enabled,
        }
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to {} chat for {}?",
            if self.enable { "enable" } else { "disable" },
            self.patient_name
        )
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatToggled {
    pub log: ChatPermissionLog,
    pub notification: Notification,
}

/// Flips the patient's chat flag and produces the audit record.
pub fn toggle_chat_permission(patient: &mut Patient, actor: &Actor, now: DateTime<Utc>) -> ChatToggled {
    patient.chat_enabled = !patient.chat_enabled;
    let enabled = patient.chat_enabled;

    tracing::info!(
        patient_id = %patient.id,
        enabled,
        changed_by = %actor.id,
        "Chat permission changed"
    );

    let log = ChatPermissionLog {
        id: Uuid::new_v4().to_string(),
        patient_id: patient.id.clone(),
        patient_name: patient.name.clone(),
        enabled,
        timestamp: now,
        changed_by: actor.clone(),
    };

    let notification = Notification::success(
        format!(
            "Chat {} for {}",
            if enabled { "enabled" } else { "disabled" },
            patient.name
        ),
        now,
    );

    ChatToggled { log, notification }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::enums::Urgency;
    use chrono::TimeZone;

    fn patient(chat_enabled: bool) -> Patient {
        Patient {
            id: "p1".into(),
            name: "Sarah Wilson".into(),
            patient_number: Some("PT-1001".into()),
            gender: None,
            last_visit: Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
            reason: "Diabetes follow-up".into(),
            priority: Urgency::Medium,
            assigned_doctor: "dr-james".into(),
            chat_enabled,
            unread_messages: 0,
            medical_history: Vec::new(),
        }
    }

    #[test]
    fn intent_describes_the_flip() {
        let intent = ChatToggleIntent::for_patient(&patient(false));
        assert!(intent.enable);
        assert_eq!(intent.prompt(), "Are you sure you want to enable chat for Sarah Wilson?");

        let intent = ChatToggleIntent::for_patient(&patient(true));
        assert_eq!(intent.prompt(), "Are you sure you want to disable chat for Sarah Wilson?");
    }

    #[test]
    fn enable_then_disable_logs_in_call_order() {
        let actor = Actor::new("dr-james", "Dr. James Martin");
        let mut p = patient(false);
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        let t2 = Utc.with_ymd_and_hms(2024, 3, 1, 11, 0, 0).unwrap();

        let logs = vec![
            toggle_chat_permission(&mut p, &actor, t1).log,
            toggle_chat_permission(&mut p, &actor, t2).log,
        ];

        assert!(!p.chat_enabled);
        assert!(logs[0].enabled);
        assert_eq!(logs[0].timestamp, t1);
        assert!(!logs[1].enabled);
        assert_eq!(logs[1].timestamp, t2);
        assert_eq!(logs[1].changed_by, actor);
        assert_ne!(logs[0].id, logs[1].id);
    }

    #[test]
    fn notification_names_new_state() {
        let actor = Actor::new("dr-james", "Dr. James Martin");
        let mut p = patient(true);
        let toggled = toggle_chat_permission(&mut p, &actor, Utc::now());
        assert_eq!(toggled.notification.message, "Chat disabled for Sarah Wilson");
    }
}
