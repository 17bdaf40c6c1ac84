use crate::activity::ActivityLog;
use crate::calendar::{CalendarEditor, MonthGrid};
use crate::clock::{date_key, parse_date_key};
use crate::dashboard::Dashboard;
use crate::errors::AppError;
use crate::history::{Filter, TaskHistory};
use crate::models::{
    ActivityResponse, AddTodoRequest, CompletionKey, CountdownResponse, DashboardResponse,
    HistoryResponse, TodosResponse,
};
use crate::state::AppState;
use crate::syllabus::{SubjectRow, SyllabusTracker};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SyllabusQuery {
    pub expanded: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    pub filter: Option<String>,
}

pub async fn get_dashboard(State(state): State<AppState>) -> Result<Json<DashboardResponse>, AppError> {
    blocking(move || {
        let dashboard = mount_dashboard(&state);
        Ok(Json(dashboard_response(&dashboard, None)))
    })
    .await
}

pub async fn get_syllabus(
    State(state): State<AppState>,
    Query(query): Query<SyllabusQuery>,
) -> Result<Json<Vec<SubjectRow>>, AppError> {
    blocking(move || {
        let dashboard = mount_dashboard(&state);
        let expanded = query.expanded.unwrap_or_default();
        let tracker = SyllabusTracker::with_expanded(
            expanded.split(',').map(str::trim).filter(|id| !id.is_empty()),
        );
        Ok(Json(tracker.rows(dashboard.catalog(), dashboard.completion())))
    })
    .await
}

pub async fn toggle_topic(
    State(state): State<AppState>,
    Path((subject, topic)): Path<(String, String)>,
) -> Result<Json<DashboardResponse>, AppError> {
    let key = CompletionKey::parse_parts(&subject, &topic).ok_or_else(|| {
        AppError::bad_request(format!(
            "subject id must be non-empty without '{}'",
            CompletionKey::SEPARATOR
        ))
    })?;
    blocking(move || {
        let mut dashboard = mount_dashboard(&state);
        let applied = dashboard.toggle_completion(key);
        Ok(Json(dashboard_response(&dashboard, applied.warning_message())))
    })
    .await
}

pub async fn get_todos(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<TodosResponse>, AppError> {
    let date = parse_date(&date)?;
    blocking(move || {
        let calendar = mount_calendar(&state, date);
        Ok(Json(todos_response(&calendar, None)))
    })
    .await
}

pub async fn add_todo(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(payload): Json<AddTodoRequest>,
) -> Result<Json<TodosResponse>, AppError> {
    let date = parse_date(&date)?;
    blocking(move || {
        let mut dashboard = mount_dashboard(&state);
        let mut calendar = mount_calendar(&state, date);
        let applied = calendar.add_todo(&payload.text, &mut dashboard);
        Ok(Json(todos_response(&calendar, applied.warning_message())))
    })
    .await
}

pub async fn toggle_todo(
    State(state): State<AppState>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<TodosResponse>, AppError> {
    let date = parse_date(&date)?;
    blocking(move || {
        let mut calendar = mount_calendar(&state, date);
        let applied = calendar.toggle_todo(&id);
        Ok(Json(todos_response(&calendar, applied.warning_message())))
    })
    .await
}

pub async fn remove_todo(
    State(state): State<AppState>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<TodosResponse>, AppError> {
    let date = parse_date(&date)?;
    blocking(move || {
        let mut calendar = mount_calendar(&state, date);
        let applied = calendar.remove_todo(&id);
        Ok(Json(todos_response(&calendar, applied.warning_message())))
    })
    .await
}

pub async fn get_calendar(
    State(state): State<AppState>,
    Path(month): Path<String>,
) -> Result<Json<MonthGrid>, AppError> {
    let first = parse_date_key(&format!("{}-01", month.trim()))
        .ok_or_else(|| AppError::bad_request("month must be YYYY-MM"))?;
    blocking(move || {
        let mut calendar = CalendarEditor::mount(state.store.clone(), state.clock.clone());
        calendar.show_month(first);
        Ok(Json(calendar.month_grid()))
    })
    .await
}

pub async fn get_history(
    State(state): State<AppState>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<HistoryResponse>, AppError> {
    let filter = match query.filter.as_deref() {
        Some(raw) => raw.parse::<Filter>().map_err(AppError::bad_request)?,
        None => Filter::All,
    };
    blocking(move || {
        let history = TaskHistory::mount(state.store.clone());
        Ok(Json(history_response(&history, filter, None)))
    })
    .await
}

pub async fn toggle_history_todo(
    State(state): State<AppState>,
    Path((date, id)): Path<(String, String)>,
) -> Result<Json<HistoryResponse>, AppError> {
    let date = date_key(parse_date(&date)?);
    blocking(move || {
        let mut history = TaskHistory::mount(state.store.clone());
        let applied = history.toggle(&id, &date);
        Ok(Json(history_response(&history, Filter::All, applied.warning_message())))
    })
    .await
}

pub async fn get_activity(State(state): State<AppState>) -> Result<Json<ActivityResponse>, AppError> {
    blocking(move || {
        let log = ActivityLog::mount(state.store.clone());
        Ok(Json(ActivityResponse {
            count: log.len(),
            days: log.newest_first(),
        }))
    })
    .await
}

pub async fn get_countdown(State(state): State<AppState>) -> Json<CountdownResponse> {
    let left = *state.countdown.borrow();
    Json(CountdownResponse {
        exam_date: date_key(state.exam_date),
        days: left.days,
        hours: left.hours,
    })
}

/// Views touch the store synchronously, so they run off the async workers.
async fn blocking<T, F>(work: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work).await?
}

fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    parse_date_key(raw).ok_or_else(|| AppError::bad_request("date must be YYYY-MM-DD"))
}

fn mount_dashboard(state: &AppState) -> Dashboard {
    Dashboard::mount(state.store.clone(), state.clock.clone(), state.catalog.clone())
}

fn mount_calendar(state: &AppState, date: NaiveDate) -> CalendarEditor {
    let mut calendar = CalendarEditor::mount(state.store.clone(), state.clock.clone());
    calendar.select_date(date);
    calendar
}

fn dashboard_response(dashboard: &Dashboard, warning: Option<String>) -> DashboardResponse {
    let summary = dashboard.summary();
    DashboardResponse {
        overall: summary.overall,
        completed_topics: summary.completed_topics,
        total_topics: summary.total_topics,
        progress: dashboard.progress().to_map(),
        subjects: dashboard.ranked_subjects(),
        active_days: dashboard.activity().len(),
        warning,
    }
}

fn todos_response(calendar: &CalendarEditor, warning: Option<String>) -> TodosResponse {
    TodosResponse {
        date: date_key(calendar.selected_date()),
        todos: calendar.todos_for_selected().to_vec(),
        warning,
    }
}

fn history_response(history: &TaskHistory, filter: Filter, warning: Option<String>) -> HistoryResponse {
    HistoryResponse {
        filter: filter.as_str().to_owned(),
        groups: history.view(filter),
        warning,
    }
}
