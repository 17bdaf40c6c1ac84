use crate::clock::date_key;
use crate::errors::StorageError;
use crate::models::ActiveDays;
use crate::storage::{load_or_default, write_through, Applied, Store, StorageKey};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

/// Receives "the user did something today" notifications from other views.
pub trait ActivityListener {
    /// Returns the warning of a failed write, if any.
    fn task_added(&mut self, day: NaiveDate) -> Option<StorageError>;
}

impl ActivityListener for () {
    fn task_added(&mut self, _day: NaiveDate) -> Option<StorageError> {
        None
    }
}

/// Private snapshot of the active-days slot.
pub struct ActivityLog {
    store: Arc<dyn Store>,
    days: ActiveDays,
}

impl ActivityLog {
    pub fn mount(store: Arc<dyn Store>) -> Self {
        let days = load_or_default(store.as_ref(), StorageKey::ActiveDays);
        Self { store, days }
    }

    /// Adds `day` if it is new. Returns whether anything changed; an already
    /// recorded day writes nothing.
    pub fn record(&mut self, day: NaiveDate) -> Applied<bool> {
        let key = date_key(day);
        if !self.days.insert(key.clone()) {
            return Applied::clean(false);
        }
        info!(day = %key, "recorded active day");
        let warning = write_through(self.store.as_ref(), StorageKey::ActiveDays, &self.days);
        Applied::with_warning(true, warning)
    }

    pub fn days(&self) -> &ActiveDays {
        &self.days
    }

    pub fn newest_first(&self) -> Vec<String> {
        self.days.newest_first()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }
}

impl ActivityListener for ActivityLog {
    fn task_added(&mut self, day: NaiveDate) -> Option<StorageError> {
        self.record(day).warning
    }
}
