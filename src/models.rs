use crate::history::DateGroup;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: String,
    pub name: String,
}

impl Topic {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub id: String,
    pub name: String,
    pub items: Vec<Topic>,
}

/// Read-only syllabus, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub subjects: Vec<Subject>,
}

impl Catalog {
    pub fn new(subjects: Vec<Subject>) -> Self {
        Self { subjects }
    }

    pub fn get(&self, subject_id: &str) -> Option<&Subject> {
        self.subjects.iter().find(|subject| subject.id == subject_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Subject> {
        self.subjects.iter()
    }

    pub fn total_topics(&self) -> usize {
        self.subjects.iter().map(|subject| subject.items.len()).sum()
    }
}

/// Identifies one topic of one subject in the completion map.
///
/// Stored on disk as `"<subject>-<topic>"`. Subject ids never contain the
/// separator, so decoding splits at the first `-`. Keys built from outside
/// input go through [`CompletionKey::parse_parts`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletionKey {
    pub subject: String,
    pub topic: String,
}

impl CompletionKey {
    pub const SEPARATOR: char = '-';

    pub fn new(subject: impl Into<String>, topic: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            topic: topic.into(),
        }
    }

    /// Rejects parts that would not decode back to the same key.
    pub fn parse_parts(subject: &str, topic: &str) -> Option<Self> {
        if subject.is_empty() || topic.is_empty() || subject.contains(Self::SEPARATOR) {
            return None;
        }
        Some(Self::new(subject, topic))
    }

    pub fn decode(raw: &str) -> Option<Self> {
        let (subject, topic) = raw.split_once(Self::SEPARATOR)?;
        if subject.is_empty() || topic.is_empty() {
            return None;
        }
        Some(Self::new(subject, topic))
    }
}

impl fmt::Display for CompletionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.subject, Self::SEPARATOR, self.topic)
    }
}

/// Completion flags keyed by subject/topic. Entries are flipped, never removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, bool>", into = "BTreeMap<String, bool>")]
pub struct CompletionMap {
    flags: BTreeMap<CompletionKey, bool>,
}

impl CompletionMap {
    pub fn is_completed(&self, key: &CompletionKey) -> bool {
        self.flags.get(key).copied().unwrap_or(false)
    }

    pub fn set(&mut self, key: CompletionKey, completed: bool) {
        self.flags.insert(key, completed);
    }

    /// Flips the flag (absent counts as not completed) and returns the new value.
    pub fn toggle(&mut self, key: CompletionKey) -> bool {
        let flag = self.flags.entry(key).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn completed_count(&self) -> usize {
        self.flags.values().filter(|completed| **completed).count()
    }

    pub fn len(&self) -> usize {
        self.flags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompletionKey, bool)> {
        self.flags.iter().map(|(key, completed)| (key, *completed))
    }
}

impl From<BTreeMap<String, bool>> for CompletionMap {
    fn from(raw: BTreeMap<String, bool>) -> Self {
        let mut flags = BTreeMap::new();
        for (encoded, completed) in raw {
            match CompletionKey::decode(&encoded) {
                Some(key) => {
                    flags.insert(key, completed);
                }
                None => warn!("skipping completion flag with malformed key {encoded:?}"),
            }
        }
        Self { flags }
    }
}

impl From<CompletionMap> for BTreeMap<String, bool> {
    fn from(map: CompletionMap) -> Self {
        map.flags
            .into_iter()
            .map(|(key, completed)| (key.to_string(), completed))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub date: String,
}

/// Todos bucketed by `YYYY-MM-DD`. A bucket exists once something was added to it.
pub type TodoMap = BTreeMap<String, Vec<Todo>>;

/// Dates on which the user did something, in the order they were recorded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct ActiveDays {
    days: Vec<String>,
}

impl ActiveDays {
    pub fn contains(&self, date: &str) -> bool {
        self.days.iter().any(|day| day == date)
    }

    /// Returns `false` when the date was already recorded.
    pub fn insert(&mut self, date: impl Into<String>) -> bool {
        let date = date.into();
        if self.contains(&date) {
            return false;
        }
        self.days.push(date);
        true
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.days.iter().map(String::as_str)
    }

    pub fn newest_first(&self) -> Vec<String> {
        let mut days = self.days.clone();
        days.sort_by(|a, b| b.cmp(a));
        days
    }
}

impl From<Vec<String>> for ActiveDays {
    fn from(raw: Vec<String>) -> Self {
        let mut days = ActiveDays::default();
        for day in raw {
            days.insert(day);
        }
        days
    }
}

impl From<ActiveDays> for Vec<String> {
    fn from(days: ActiveDays) -> Self {
        days.days
    }
}

#[derive(Debug, Deserialize)]
pub struct AddTodoRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectProgressPoint {
    pub subject: String,
    pub name: String,
    pub progress: u32,
    pub color: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DashboardResponse {
    pub overall: f64,
    pub completed_topics: usize,
    pub total_topics: usize,
    pub progress: BTreeMap<String, f64>,
    pub subjects: Vec<SubjectProgressPoint>,
    pub active_days: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TodosResponse {
    pub date: String,
    pub todos: Vec<Todo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    pub filter: String,
    pub groups: Vec<DateGroup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivityResponse {
    pub count: usize,
    pub days: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountdownResponse {
    pub exam_date: String,
    pub days: i64,
    pub hours: i64,
}
