pub mod audit;
pub mod conversation;
pub mod doctor;
pub mod enums;
pub mod notification;
pub mod patient;
pub mod request;
pub mod timeline;

pub use audit::*;
pub use conversation::*;
pub use doctor::*;
pub use notification::*;
pub use patient::*;
pub use request::*;
pub use timeline::*;

use crate::db::Entity;

macro_rules! entity {
    ($ty:ty => $kind:literal) => {
        impl Entity for $ty {
            const KIND: &'static str = $kind;

            fn id(&self) -> &str {
                &self.id
            }
        }
    };
}

entity!(TimelineEntry => "timeline_entry");
entity!(Patient => "patient");
entity!(NetworkDoctor => "network_doctor");
entity!(FriendRequest => "friend_request");
entity!(TransferRequest => "transfer_request");
entity!(ChatPermissionLog => "chat_permission_log");
entity!(Conversation => "conversation");
entity!(Message => "message");
