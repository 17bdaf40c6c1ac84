pub mod activity;
pub mod app;
pub mod calendar;
pub mod catalog;
pub mod clock;
pub mod config;
pub mod countdown;
pub mod dashboard;
pub mod errors;
pub mod handlers;
pub mod history;
pub mod models;
pub mod progress;
pub mod state;
pub mod storage;
pub mod syllabus;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::{FileStore, MemoryStore, Store, StorageKey};
