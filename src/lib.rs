pub mod app;
pub mod checkin;
pub mod config;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod responder;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use checkin::{CheckInOutcome, CheckInService, GeneratedReply};
pub use config::Config;
pub use state::AppState;
pub use storage::{FileRecordStore, InMemoryRecordStore, RecordStore};
