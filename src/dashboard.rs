use crate::activity::{ActivityListener, ActivityLog};
use crate::clock::Clock;
use crate::errors::StorageError;
use crate::models::{Catalog, CompletionKey, CompletionMap, SubjectProgressPoint};
use crate::progress::{compute_progress, ranked_subjects, Progress};
use crate::storage::{load_or_default, write_through, Applied, Store, StorageKey};
use chrono::NaiveDate;
use std::sync::Arc;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub overall: f64,
    pub completed_topics: usize,
    pub total_topics: usize,
}

/// Syllabus completion plus the activity log it feeds.
pub struct Dashboard {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    catalog: Arc<Catalog>,
    completion: CompletionMap,
    activity: ActivityLog,
}

impl Dashboard {
    pub fn mount(store: Arc<dyn Store>, clock: Arc<dyn Clock>, catalog: Arc<Catalog>) -> Self {
        let completion = load_or_default(store.as_ref(), StorageKey::CompletedItems);
        let activity = ActivityLog::mount(store.clone());
        Self {
            store,
            clock,
            catalog,
            completion,
            activity,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn completion(&self) -> &CompletionMap {
        &self.completion
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    /// Flips one topic and records today as active. Returns the new flag.
    pub fn toggle_completion(&mut self, key: CompletionKey) -> Applied<bool> {
        info!(subject = %key.subject, topic = %key.topic, "toggling topic");
        let completed = self.completion.toggle(key);

        let warning = write_through(self.store.as_ref(), StorageKey::CompletedItems, &self.completion);
        let activity_warning = self.activity.record(self.clock.today()).warning;
        Applied::with_warning(completed, warning.or(activity_warning))
    }

    pub fn progress(&self) -> Progress {
        compute_progress(&self.catalog, &self.completion)
    }

    pub fn ranked_subjects(&self) -> Vec<SubjectProgressPoint> {
        ranked_subjects(&self.catalog, &self.progress())
    }

    pub fn summary(&self) -> Summary {
        Summary {
            overall: self.progress().overall(),
            completed_topics: self.completion.completed_count(),
            total_topics: self.catalog.total_topics(),
        }
    }
}

impl ActivityListener for Dashboard {
    fn task_added(&mut self, day: NaiveDate) -> Option<StorageError> {
        self.activity.task_added(day)
    }
}
