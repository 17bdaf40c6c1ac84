use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Todo {
    id: String,
    text: String,
    completed: bool,
    date: String,
}

#[derive(Debug, Deserialize)]
struct TodosResponse {
    date: String,
    todos: Vec<Todo>,
    warning: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateGroup {
    date: String,
    todos: Vec<Todo>,
}

#[derive(Debug, Deserialize)]
struct HistoryResponse {
    filter: String,
    groups: Vec<DateGroup>,
}

#[derive(Debug, Deserialize)]
struct DashboardResponse {
    overall: f64,
    completed_topics: usize,
    total_topics: usize,
    progress: BTreeMap<String, f64>,
    active_days: usize,
}

#[derive(Debug, Deserialize)]
struct ActivityResponse {
    count: usize,
    days: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct CountdownResponse {
    exam_date: String,
    days: i64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

fn unique_data_dir() -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!("study_tracker_http_{}_{}", std::process::id(), nanos));
    path.to_string_lossy().to_string()
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/dashboard")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_study_tracker"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", unique_data_dir())
        .env("EXAM_DATE", "2099-01-01")
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn add_todo(client: &Client, base_url: &str, date: &str, text: &str) -> TodosResponse {
    client
        .post(format!("{base_url}/api/todos/{date}"))
        .json(&serde_json::json!({ "text": text }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn history(client: &Client, base_url: &str, filter: &str) -> HistoryResponse {
    client
        .get(format!("{base_url}/api/history?filter={filter}"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

#[tokio::test]
async fn http_add_toggle_and_remove_todo() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let added = add_todo(&client, &server.base_url, "2030-01-10", "Revise scheduling").await;
    assert_eq!(added.date, "2030-01-10");
    assert!(added.warning.is_none());
    let todo = added.todos.last().expect("todo was not added");
    assert_eq!(todo.text, "Revise scheduling");
    assert_eq!(todo.date, "2030-01-10");
    assert!(!todo.completed);

    let toggled: TodosResponse = client
        .post(format!("{}/api/todos/2030-01-10/{}/toggle", server.base_url, todo.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(toggled.todos.iter().any(|t| t.id == todo.id && t.completed));

    let completed = history(&client, &server.base_url, "completed").await;
    assert_eq!(completed.filter, "completed");
    assert!(completed
        .groups
        .iter()
        .any(|g| g.date == "2030-01-10" && g.todos.iter().any(|t| t.id == todo.id)));

    let removed: TodosResponse = client
        .delete(format!("{}/api/todos/2030-01-10/{}", server.base_url, todo.id))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(removed.todos.iter().all(|t| t.id != todo.id));
}

#[tokio::test]
async fn http_blank_todo_is_ignored() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = add_todo(&client, &server.base_url, "2031-03-03", "   ").await;
    assert!(response.todos.is_empty());

    let all = history(&client, &server.base_url, "all").await;
    assert!(all.groups.iter().all(|g| g.date != "2031-03-03"));
}

#[tokio::test]
async fn http_history_lists_newest_date_first() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    add_todo(&client, &server.base_url, "2032-06-01", "first").await;
    add_todo(&client, &server.base_url, "2032-06-02", "second").await;

    let all = history(&client, &server.base_url, "all").await;
    let dates: Vec<&str> = all.groups.iter().map(|g| g.date.as_str()).collect();
    let newer = dates.iter().position(|d| *d == "2032-06-02").unwrap();
    let older = dates.iter().position(|d| *d == "2032-06-01").unwrap();
    assert!(newer < older);

    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    sorted.dedup();
    assert_eq!(sorted, dates);

    let activity: ActivityResponse = client
        .get(format!("{}/api/activity", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(activity.count >= 1);
    assert_eq!(activity.count, activity.days.len());
}

#[tokio::test]
async fn http_toggle_topic_updates_progress() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before: DashboardResponse = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(before.total_topics, 75);

    let after: DashboardResponse = client
        .post(format!("{}/api/syllabus/dm/dm-1/toggle", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(after.completed_topics, before.completed_topics + 1);
    assert_eq!(after.progress["dm"], before.progress["dm"] + 25.0);
    assert!(after.overall > before.overall);
    assert!(after.active_days >= 1);
}

#[tokio::test]
async fn http_rejects_malformed_dates_and_filters() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/api/todos/not-a-date", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/api/history?filter=done", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .get(format!("{}/api/calendar/2030-13", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_rejects_subject_ids_with_separator() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/syllabus/a-b/c/toggle", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let dashboard: DashboardResponse = client
        .get(format!("{}/api/dashboard", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!dashboard.progress.contains_key("a"));
}

#[tokio::test]
async fn http_countdown_uses_configured_exam_date() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let countdown: CountdownResponse = client
        .get(format!("{}/api/countdown", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(countdown.exam_date, "2099-01-01");
    assert!(countdown.days > 0);
}
