pub mod achievements;
pub mod app;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod stats;
pub mod storage;
pub mod streaks;
pub mod ui;
pub mod state;

pub use app::router;
pub use state::AppState;
pub use storage::{load_preferences, load_streaks, resolve_data_dir};
