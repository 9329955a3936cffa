//! Tour service - active tour lookup and countdown

use std::sync::{Arc, Mutex};

use chrono::Utc;
use tracing::error;

use crate::domain::Tour;
use crate::ports::TourStore;

/// Caches the active tour and absorbs fetch failures
///
/// A backend hiccup degrades to "no active tour" rather than propagating;
/// callers re-fetch with [`TourService::refresh`].
pub struct TourService {
    store: Arc<dyn TourStore>,
    active: Mutex<Option<Tour>>,
}

impl TourService {
    pub fn new(store: Arc<dyn TourStore>) -> Self {
        Self {
            store,
            active: Mutex::new(None),
        }
    }

    /// Re-fetch the active tour from the store
    pub async fn refresh(&self) -> Option<Tour> {
        let tour = match self.store.fetch_active().await {
            Ok(tour) => tour,
            Err(e) => {
                error!(error = %e, "failed to fetch active tour");
                None
            }
        };
        if let Ok(mut cached) = self.active.lock() {
            *cached = tour.clone();
        }
        tour
    }

    /// Last fetched active tour, if any
    pub fn active(&self) -> Option<Tour> {
        self.active.lock().ok().and_then(|cached| cached.clone())
    }

    /// Countdown label for the cached active tour, relative to today
    pub fn countdown(&self) -> Option<String> {
        self.active()
            .and_then(|tour| tour.countdown_label(Utc::now().date_naive()))
    }
}
