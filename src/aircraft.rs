use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tabled::Tabled;

/// Tail number; the key reservations use for aircraft.
pub type Registration = Arc<str>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, Tabled)]
pub struct Aircraft {
    #[tabled(skip)]
    pub id: Arc<str>,
    pub registration: Registration,
    #[serde(rename = "type")]
    #[tabled(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub name: String,
}
