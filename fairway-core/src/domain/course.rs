//! Course domain model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A golf course on the tour schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub par: u32,
    /// USGA course rating, e.g. 73.5
    pub rating: f64,
    /// USGA slope rating, 55-155 (113 is standard difficulty)
    pub slope: u32,
    pub description: Option<String>,
    pub tips: Option<String>,
    pub url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn new(id: Uuid, name: impl Into<String>, par: u32, rating: f64, slope: u32) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            par,
            rating,
            slope,
            description: None,
            tips: None,
            url: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// The immutable scoring inputs for this course
    pub fn info(&self) -> CourseInfo {
        CourseInfo {
            par: self.par,
            rating: self.rating,
            slope: self.slope,
        }
    }
}

/// Par, rating and slope: the reference data the scoring engine needs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CourseInfo {
    pub par: u32,
    pub rating: f64,
    pub slope: u32,
}

impl CourseInfo {
    pub fn new(par: u32, rating: f64, slope: u32) -> Self {
        Self { par, rating, slope }
    }
}

impl Default for CourseInfo {
    /// A standard-difficulty par 72 course
    fn default() -> Self {
        Self {
            par: 72,
            rating: 72.0,
            slope: 113,
        }
    }
}
