// ============================================================================
// Todo File Service
// ============================================================================

pub mod app;
pub mod config;
pub mod error;
pub mod handlers;
pub mod log_sink;
pub mod models;
pub mod router;
pub mod state;
pub mod storage;

pub use app::build_router;
pub use config::AppConfig;
pub use error::{TodoError, TodoResult};
pub use log_sink::LogSink;
pub use models::Todo;
pub use router::{Operation, RouteTable};
pub use state::AppState;
pub use storage::{JsonFileStore, StorageError, TodoStore, WriteMode};
