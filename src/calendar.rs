use crate::activity::ActivityListener;
use crate::clock::{date_key, Clock};
use crate::models::{Todo, TodoMap};
use crate::storage::{load_or_default, write_through, Applied, Store, StorageKey};
use chrono::{Datelike, Duration, Months, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::sync::{
    atomic::{AtomicI64, Ordering},
    Arc,
};
use tracing::{debug, info};

static LAST_TODO_ID: AtomicI64 = AtomicI64::new(0);

/// Millisecond timestamp of `now`, bumped past the last id handed out by this process.
fn next_todo_id(now: NaiveDateTime) -> String {
    let millis = now.and_utc().timestamp_millis();
    let previous = LAST_TODO_ID
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |last| {
            Some(millis.max(last + 1))
        })
        .unwrap_or(millis);
    millis.max(previous + 1).to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayCell {
    pub date: String,
    pub day: u32,
    pub is_today: bool,
    pub is_selected: bool,
    pub has_todos: bool,
}

/// One month laid out for a Sunday-first week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthGrid {
    pub month: String,
    pub leading_blanks: u32,
    pub days: Vec<DayCell>,
}

/// Todo list editor for one selected date.
///
/// `mount` performs the only read of the todo slot; from then on every
/// change is written back in full. Other mounted views are not told.
pub struct CalendarEditor {
    store: Arc<dyn Store>,
    clock: Arc<dyn Clock>,
    todos: TodoMap,
    selected: NaiveDate,
    visible_month: NaiveDate,
}

impl CalendarEditor {
    pub fn mount(store: Arc<dyn Store>, clock: Arc<dyn Clock>) -> Self {
        let todos = load_or_default(store.as_ref(), StorageKey::Todos);
        let today = clock.today();
        Self {
            store,
            clock,
            todos,
            selected: today,
            visible_month: first_of_month(today),
        }
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.selected
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        self.selected = date;
    }

    pub fn visible_month(&self) -> NaiveDate {
        self.visible_month
    }

    pub fn show_month(&mut self, month: NaiveDate) {
        self.visible_month = first_of_month(month);
    }

    pub fn next_month(&mut self) {
        if let Some(next) = self.visible_month.checked_add_months(Months::new(1)) {
            self.visible_month = next;
        }
    }

    pub fn prev_month(&mut self) {
        if let Some(prev) = self.visible_month.checked_sub_months(Months::new(1)) {
            self.visible_month = prev;
        }
    }

    pub fn todos(&self) -> &TodoMap {
        &self.todos
    }

    pub fn todos_for_selected(&self) -> &[Todo] {
        self.todos
            .get(&date_key(self.selected))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Appends a todo to the selected date and tells `listener` about it.
    /// Blank text is ignored and yields `None`.
    pub fn add_todo(&mut self, text: &str, listener: &mut dyn ActivityListener) -> Applied<Option<Todo>> {
        if text.trim().is_empty() {
            debug!("ignoring blank todo");
            return Applied::clean(None);
        }

        let date = date_key(self.selected);
        let todo = Todo {
            id: next_todo_id(self.clock.now()),
            text: text.to_owned(),
            completed: false,
            date: date.clone(),
        };
        self.todos.entry(date.clone()).or_default().push(todo.clone());
        info!(date = %date, id = %todo.id, "added todo");

        let warning = write_through(self.store.as_ref(), StorageKey::Todos, &self.todos);
        let listener_warning = listener.task_added(self.clock.today());
        Applied::with_warning(Some(todo), warning.or(listener_warning))
    }

    /// Flips a todo of the selected date. Ids from other dates are not looked at.
    pub fn toggle_todo(&mut self, id: &str) -> Applied<Option<bool>> {
        let date = date_key(self.selected);
        let Some(todo) = self
            .todos
            .get_mut(&date)
            .and_then(|bucket| bucket.iter_mut().find(|todo| todo.id == id))
        else {
            return Applied::clean(None);
        };
        todo.completed = !todo.completed;
        let completed = todo.completed;

        let warning = write_through(self.store.as_ref(), StorageKey::Todos, &self.todos);
        Applied::with_warning(Some(completed), warning)
    }

    /// Removes a todo of the selected date. The bucket stays even when emptied.
    pub fn remove_todo(&mut self, id: &str) -> Applied<bool> {
        let date = date_key(self.selected);
        let Some(bucket) = self.todos.get_mut(&date) else {
            return Applied::clean(false);
        };
        let before = bucket.len();
        bucket.retain(|todo| todo.id != id);
        if bucket.len() == before {
            return Applied::clean(false);
        }
        info!(date = %date, id, "removed todo");

        let warning = write_through(self.store.as_ref(), StorageKey::Todos, &self.todos);
        Applied::with_warning(true, warning)
    }

    pub fn month_grid(&self) -> MonthGrid {
        let first = self.visible_month;
        let today = self.clock.today();
        let days = month_days(first)
            .map(|date| {
                let key = date_key(date);
                DayCell {
                    day: date.day(),
                    is_today: date == today,
                    is_selected: date == self.selected,
                    has_todos: self.todos.get(&key).is_some_and(|bucket| !bucket.is_empty()),
                    date: key,
                }
            })
            .collect();

        MonthGrid {
            month: first.format("%Y-%m").to_string(),
            leading_blanks: first.weekday().num_days_from_sunday(),
            days,
        }
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.day0()))
}

fn month_days(first: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let month = first.month();
    first.iter_days().take_while(move |date| date.month() == month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::ActivityLog;
    use crate::clock::FixedClock;
    use crate::storage::{load, MemoryStore};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn editor_at(store: &Arc<dyn Store>, today: NaiveDate) -> CalendarEditor {
        CalendarEditor::mount(store.clone(), Arc::new(FixedClock::at_date(today)))
    }

    fn memory() -> Arc<dyn Store> {
        Arc::new(MemoryStore::new())
    }

    #[test]
    fn mount_selects_today() {
        let store = memory();
        let editor = editor_at(&store, date(2025, 6, 14));
        assert_eq!(editor.selected_date(), date(2025, 6, 14));
        assert_eq!(editor.visible_month(), date(2025, 6, 1));
        assert!(editor.todos_for_selected().is_empty());
    }

    #[test]
    fn blank_text_leaves_bucket_absent() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 1));

        let applied = editor.add_todo("  ", &mut ());
        assert!(applied.value.is_none());
        assert!(!editor.todos().contains_key("2025-06-01"));
        assert_eq!(store.get_item(StorageKey::Todos).unwrap(), None);
    }

    #[test]
    fn add_creates_bucket_and_persists() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 1));

        let first = editor.add_todo("Read chapter 3", &mut ()).value.unwrap();
        let second = editor.add_todo("Solve PYQs", &mut ()).value.unwrap();
        assert_ne!(first.id, second.id);
        assert!(!first.completed);
        assert_eq!(first.date, "2025-06-01");

        let stored: TodoMap = load(store.as_ref(), StorageKey::Todos).unwrap().unwrap();
        let texts: Vec<&str> = stored["2025-06-01"].iter().map(|todo| todo.text.as_str()).collect();
        assert_eq!(texts, vec!["Read chapter 3", "Solve PYQs"]);
    }

    #[test]
    fn add_notifies_listener_with_today() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 10));
        editor.select_date(date(2025, 6, 20));
        let mut activity = ActivityLog::mount(store.clone());

        editor.add_todo("Plan mock test", &mut activity);
        assert!(activity.days().contains("2025-06-10"));
        assert!(!activity.days().contains("2025-06-20"));

        editor.add_todo("   ", &mut activity);
        assert_eq!(activity.len(), 1);
    }

    #[test]
    fn toggle_twice_restores_state() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 1));
        let todo = editor.add_todo("Revise DBMS", &mut ()).value.unwrap();

        assert_eq!(editor.toggle_todo(&todo.id).value, Some(true));
        assert_eq!(editor.toggle_todo(&todo.id).value, Some(false));
        assert!(!editor.todos_for_selected()[0].completed);
    }

    #[test]
    fn toggle_only_looks_at_selected_date() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 1));
        let todo = editor.add_todo("Graphs", &mut ()).value.unwrap();

        editor.select_date(date(2025, 6, 2));
        assert_eq!(editor.toggle_todo(&todo.id).value, None);
        assert!(!editor.remove_todo(&todo.id).value);

        editor.select_date(date(2025, 6, 1));
        assert!(!editor.todos_for_selected()[0].completed);
        assert_eq!(editor.toggle_todo("missing").value, None);
    }

    #[test]
    fn remove_keeps_other_entries() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 1));
        let first = editor.add_todo("One", &mut ()).value.unwrap();
        editor.add_todo("Two", &mut ());

        assert!(editor.remove_todo(&first.id).value);
        let remaining: Vec<&str> = editor.todos_for_selected().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(remaining, vec!["Two"]);

        let remounted = editor_at(&store, date(2025, 6, 1));
        assert_eq!(remounted.todos_for_selected().len(), 1);
    }

    #[test]
    fn write_failure_keeps_todo_in_memory() {
        let store: Arc<dyn Store> = Arc::new(MemoryStore::with_quota(8));
        let mut editor = editor_at(&store, date(2025, 6, 1));

        let applied = editor.add_todo("Too big to store", &mut ());
        assert!(applied.value.is_some());
        assert!(applied.warning.is_some());
        assert_eq!(editor.todos_for_selected().len(), 1);
    }

    #[test]
    fn views_mounted_side_by_side_do_not_see_each_other() {
        let store = memory();
        let mut left = editor_at(&store, date(2025, 6, 1));
        let mut right = editor_at(&store, date(2025, 6, 1));

        left.add_todo("From left", &mut ());
        right.add_todo("From right", &mut ());

        // last writer wins
        let stored: TodoMap = load(store.as_ref(), StorageKey::Todos).unwrap().unwrap();
        assert_eq!(stored["2025-06-01"].len(), 1);
        assert_eq!(stored["2025-06-01"][0].text, "From right");
    }

    #[test]
    fn month_grid_marks_today_selection_and_todos() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 6, 14));
        editor.select_date(date(2025, 6, 3));
        editor.add_todo("Digital logic", &mut ());

        let grid = editor.month_grid();
        assert_eq!(grid.month, "2025-06");
        // 1 June 2025 is a Sunday
        assert_eq!(grid.leading_blanks, 0);
        assert_eq!(grid.days.len(), 30);
        assert!(grid.days[13].is_today);
        assert!(grid.days[2].is_selected);
        assert!(grid.days[2].has_todos);
        assert_eq!(grid.days.iter().filter(|cell| cell.has_todos).count(), 1);
    }

    #[test]
    fn month_navigation_wraps_years() {
        let store = memory();
        let mut editor = editor_at(&store, date(2025, 12, 31));
        editor.next_month();
        assert_eq!(editor.visible_month(), date(2026, 1, 1));
        let grid = editor.month_grid();
        assert_eq!(grid.days.len(), 31);
        // 1 January 2026 is a Thursday
        assert_eq!(grid.leading_blanks, 4);

        editor.prev_month();
        editor.prev_month();
        assert_eq!(editor.visible_month(), date(2025, 11, 1));
    }

    #[test]
    fn ids_increase_even_within_one_millisecond() {
        let now = date(2025, 6, 1).and_hms_opt(8, 0, 0).unwrap();
        let a: i64 = next_todo_id(now).parse().unwrap();
        let b: i64 = next_todo_id(now).parse().unwrap();
        assert!(b > a);
    }
}
