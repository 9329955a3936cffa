//! Tour domain model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One edition of the recurring tour event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tour {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub start_date: NaiveDate,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Tour {
    pub fn new(id: Uuid, name: impl Into<String>, year: i32, start_date: NaiveDate) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            year,
            start_date,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whole days until the tour starts, relative to `today`
    ///
    /// `Some(0)` on the start date itself, `None` once underway.
    pub fn days_until_start(&self, today: NaiveDate) -> Option<i64> {
        let days = (self.start_date - today).num_days();
        if days < 0 {
            None
        } else {
            Some(days)
        }
    }

    /// Countdown text for display ("Today!", "1 day", "12 days")
    pub fn countdown_label(&self, today: NaiveDate) -> Option<String> {
        self.days_until_start(today).map(|days| match days {
            0 => "Today!".to_string(),
            1 => "1 day".to_string(),
            n => format!("{} days", n),
        })
    }
}
