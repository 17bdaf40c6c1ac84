use crate::catalog::subject_color;
use crate::models::{Catalog, CompletionKey, CompletionMap};
use crate::progress::{compute_progress, rounded};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicRow {
    pub id: String,
    pub name: String,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectRow {
    pub id: String,
    pub name: String,
    pub progress: u32,
    pub color: &'static str,
    pub expanded: bool,
    /// Empty while the subject is collapsed.
    pub topics: Vec<TopicRow>,
}

/// Expand/collapse state of the syllabus list. Lives only as long as the view.
#[derive(Debug, Clone, Default)]
pub struct SyllabusTracker {
    expanded: BTreeSet<String>,
}

impl SyllabusTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_expanded<I, S>(subjects: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            expanded: subjects.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns whether the subject is expanded afterwards.
    pub fn toggle_expanded(&mut self, subject: &str) -> bool {
        if self.expanded.remove(subject) {
            false
        } else {
            self.expanded.insert(subject.to_owned());
            true
        }
    }

    pub fn is_expanded(&self, subject: &str) -> bool {
        self.expanded.contains(subject)
    }

    pub fn rows(&self, catalog: &Catalog, completion: &CompletionMap) -> Vec<SubjectRow> {
        let progress = compute_progress(catalog, completion);
        catalog
            .iter()
            .map(|subject| {
                let expanded = self.is_expanded(&subject.id);
                let topics = if expanded {
                    subject
                        .items
                        .iter()
                        .map(|topic| TopicRow {
                            id: topic.id.clone(),
                            name: topic.name.clone(),
                            completed: completion
                                .is_completed(&CompletionKey::new(&subject.id, &topic.id)),
                        })
                        .collect()
                } else {
                    Vec::new()
                };
                SubjectRow {
                    id: subject.id.clone(),
                    name: subject.name.clone(),
                    progress: rounded(progress.subject(&subject.id).unwrap_or(0.0)),
                    color: subject_color(&subject.id),
                    expanded,
                    topics,
                }
            })
            .collect()
    }
}
