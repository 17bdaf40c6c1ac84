use crate::catalog::subject_color;
use crate::models::{Catalog, CompletionKey, CompletionMap, SubjectProgressPoint};
use std::collections::BTreeMap;

/// Key used for the catalog-wide figure in [`Progress::to_map`].
pub const OVERALL: &str = "overall";

/// Percent-complete per subject and across the whole catalog, each in `0..=100`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Progress {
    subjects: BTreeMap<String, f64>,
    overall: f64,
    completed_topics: usize,
    total_topics: usize,
}

impl Progress {
    pub fn subject(&self, subject_id: &str) -> Option<f64> {
        self.subjects.get(subject_id).copied()
    }

    pub fn overall(&self) -> f64 {
        self.overall
    }

    /// Catalog topics currently marked done. Duplicate ids count once per row.
    pub fn completed_topics(&self) -> usize {
        self.completed_topics
    }

    pub fn total_topics(&self) -> usize {
        self.total_topics
    }

    /// Subject ids plus [`OVERALL`], as the dashboard charts consume them.
    pub fn to_map(&self) -> BTreeMap<String, f64> {
        let mut map = self.subjects.clone();
        map.insert(OVERALL.to_owned(), self.overall);
        map
    }
}

pub fn compute_progress(catalog: &Catalog, completion: &CompletionMap) -> Progress {
    let mut subjects = BTreeMap::new();
    let mut completed_topics = 0usize;
    let mut total_topics = 0usize;

    for subject in catalog.iter() {
        let completed = subject
            .items
            .iter()
            .filter(|topic| completion.is_completed(&CompletionKey::new(&subject.id, &topic.id)))
            .count();
        let count = subject.items.len();

        subjects.insert(subject.id.clone(), percent(completed, count));
        completed_topics += completed;
        total_topics += count;
    }

    Progress {
        subjects,
        overall: percent(completed_topics, total_topics),
        completed_topics,
        total_topics,
    }
}

/// Per-subject chart rows, highest rounded progress first. Ties keep catalog order.
pub fn ranked_subjects(catalog: &Catalog, progress: &Progress) -> Vec<SubjectProgressPoint> {
    let mut points: Vec<SubjectProgressPoint> = catalog
        .iter()
        .map(|subject| SubjectProgressPoint {
            subject: subject.id.clone(),
            name: subject.name.clone(),
            progress: rounded(progress.subject(&subject.id).unwrap_or(0.0)),
            color: subject_color(&subject.id).to_owned(),
        })
        .collect();
    points.sort_by(|a, b| b.progress.cmp(&a.progress));
    points
}

pub fn rounded(percent: f64) -> u32 {
    percent.round().clamp(0.0, 100.0) as u32
}

fn percent(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 * 100.0 / total as f64
}
