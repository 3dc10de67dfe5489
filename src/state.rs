use crate::models::{Preferences, Streak};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

/// Everything the session owns. One mutex guards the whole record, so a
/// collection-wide refresh always completes before the persistence write
/// that follows it and no snapshot mixes pre- and post-update streaks.
#[derive(Debug, Default)]
pub struct AppData {
    pub streaks: Vec<Streak>,
    pub preferences: Preferences,
    /// Milestone crossed but not yet acknowledged by the page. Session-local;
    /// never persisted.
    pub milestone: Option<u32>,
}

#[derive(Clone)]
pub struct AppState {
    pub data_dir: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_dir: PathBuf, streaks: Vec<Streak>, preferences: Preferences) -> Self {
        Self {
            data_dir,
            data: Arc::new(Mutex::new(AppData {
                streaks,
                preferences,
                milestone: None,
            })),
        }
    }
}
