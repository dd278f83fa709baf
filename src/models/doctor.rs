use serde::{Deserialize, Serialize};

/// The doctor performing an action. Threaded explicitly into every
/// operation that needs to know who is acting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: String,
    pub name: String,
}

impl Actor {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorSummary {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub hospital: String,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactInfo {
    pub email: String,
    pub phone: String,
    pub address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub days: Vec<String>,
    pub hours: String,
}

/// A colleague in the acting doctor's network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkDoctor {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub experience: String,
    pub education: Vec<String>,
    pub certifications: Vec<String>,
    pub contact: ContactInfo,
    pub availability: Availability,
    pub rating: f32,
    pub total_patients: u32,
}
