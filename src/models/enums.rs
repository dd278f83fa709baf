use crate::db::DatabaseError;
use serde::{Deserialize, Serialize};

/// Macro to generate enum with as_str + std::str::FromStr pattern
macro_rules! str_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(#[serde(rename = $s)] $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = DatabaseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($s => Ok(Self::$variant)),+,
                    _ => Err(DatabaseError::InvalidEnum {
                        field: stringify!($name).into(),
                        value: s.into(),
                    }),
                }
            }
        }
    };
}

str_enum!(EntryType {
    Note => "note",
    Prescription => "prescription",
    LabResult => "lab-result",
});

str_enum!(NoteVisibility {
    General => "general",
    Restricted => "restricted",
});

str_enum!(AuthorRole {
    Doctor => "doctor",
    Staff => "staff",
});

str_enum!(RequestStatus {
    Pending => "pending",
    Accepted => "accepted",
    Rejected => "rejected",
});

str_enum!(Urgency {
    High => "high",
    Medium => "medium",
    Low => "low",
});

str_enum!(Gender {
    Male => "male",
    Female => "female",
});

str_enum!(ParticipantRole {
    Doctor => "doctor",
    Patient => "patient",
});

str_enum!(ConversationCategory {
    Patient => "patient",
    Doctor => "doctor",
});

str_enum!(MessageStatus {
    Sent => "sent",
    Delivered => "delivered",
    Read => "read",
});

str_enum!(MessageCategory {
    Urgent => "urgent",
    Routine => "routine",
    FollowUp => "follow-up",
});

str_enum!(NotificationKind {
    Success => "success",
    Info => "info",
});

impl RequestStatus {
    /// Terminal states never transition again.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn entry_type_uses_hyphenated_lab_result() {
        assert_eq!(EntryType::LabResult.as_str(), "lab-result");
        assert_eq!(EntryType::from_str("lab-result").unwrap(), EntryType::LabResult);
        let json = serde_json::to_string(&EntryType::LabResult).unwrap();
        assert_eq!(json, "\"lab-result\"");
    }

    #[test]
    fn unknown_value_is_invalid_enum() {
        let err = RequestStatus::from_str("cancelled").unwrap_err();
        match err {
            DatabaseError::InvalidEnum { field, value } => {
                assert_eq!(field, "RequestStatus");
                assert_eq!(value, "cancelled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn only_pending_is_non_terminal() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(RequestStatus::Accepted.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
    }

    #[test]
    fn follow_up_category_round_trips_through_serde() {
        let parsed: MessageCategory = serde_json::from_str("\"follow-up\"").unwrap();
        assert_eq!(parsed, MessageCategory::FollowUp);
        assert_eq!(parsed.to_string(), "follow-up");
    }
}
