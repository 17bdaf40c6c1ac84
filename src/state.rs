use crate::clock::Clock;
use crate::countdown::TimeLeft;
use crate::models::Catalog;
use crate::storage::Store;
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::sync::watch;

/// Shared by every request. Views are mounted per request from `store`;
/// nothing here caches their data.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub clock: Arc<dyn Clock>,
    pub catalog: Arc<Catalog>,
    pub exam_date: NaiveDate,
    pub countdown: watch::Receiver<TimeLeft>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn Store>,
        clock: Arc<dyn Clock>,
        catalog: Catalog,
        exam_date: NaiveDate,
        countdown: watch::Receiver<TimeLeft>,
    ) -> Self {
        Self {
            store,
            clock,
            catalog: Arc::new(catalog),
            exam_date,
            countdown,
        }
    }
}
