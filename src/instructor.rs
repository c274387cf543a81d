use crate::aircraft::Registration;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub type InstructorId = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: InstructorId,
    pub name: String,
    #[serde(default)]
    pub certifications: Vec<String>,
    #[serde(default)]
    pub authorized_aircraft: Vec<Registration>,
}

impl Instructor {
    pub fn is_authorized_for(&self, registration: &str) -> bool {
        self.authorized_aircraft.iter().any(|r| &**r == registration)
    }
}
