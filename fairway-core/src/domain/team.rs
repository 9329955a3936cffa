//! Team domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team competing in one tour edition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: Uuid,
    pub tour_id: Uuid,
    pub name: String,
    pub captain_id: Uuid,
    #[serde(default)]
    pub members: Vec<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    pub fn new(id: Uuid, tour_id: Uuid, name: impl Into<String>, captain_id: Uuid) -> Self {
        let now = Utc::now();
        Self {
            id,
            tour_id,
            name: name.into(),
            captain_id,
            members: vec![captain_id],
            created_at: now,
            updated_at: now,
        }
    }
}
