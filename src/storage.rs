use crate::models::{Preferences, Streak};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::error;

/// The collection: a single top-level array of streak records. Export and
/// import exchange exactly this file's contents.
pub const STREAKS_FILE: &str = "streaks.json";
pub const PREFERENCES_FILE: &str = "preferences.json";

pub fn resolve_data_dir() -> PathBuf {
    if let Ok(dir) = env::var("STREAKS_DATA_DIR") {
        return PathBuf::from(dir);
    }

    PathBuf::from("data")
}

pub fn streaks_path(data_dir: &Path) -> PathBuf {
    data_dir.join(STREAKS_FILE)
}

pub fn preferences_path(data_dir: &Path) -> PathBuf {
    data_dir.join(PREFERENCES_FILE)
}

pub async fn load_streaks(data_dir: &Path) -> Vec<Streak> {
    read_json(&streaks_path(data_dir)).await
}

pub async fn load_preferences(data_dir: &Path) -> Preferences {
    read_json(&preferences_path(data_dir)).await
}

/// Write failures are logged and swallowed: the in-memory collection stays
/// the source of truth for the session, and losing an unflushed change on
/// reload is accepted.
pub async fn persist_streaks(data_dir: &Path, streaks: &[Streak]) {
    write_json(&streaks_path(data_dir), &streaks).await;
}

pub async fn persist_preferences(data_dir: &Path, preferences: &Preferences) {
    write_json(&preferences_path(data_dir), preferences).await;
}

async fn read_json<T>(path: &Path) -> T
where
    T: DeserializeOwned + Default,
{
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice(&bytes) {
            Ok(value) => value,
            Err(err) => {
                error!("failed to parse {}: {err}", path.display());
                T::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => T::default(),
        Err(err) => {
            error!("failed to read {}: {err}", path.display());
            T::default()
        }
    }
}

async fn write_json<T: Serialize>(path: &Path, value: &T) {
    let payload = match serde_json::to_vec_pretty(value) {
        Ok(payload) => payload,
        Err(err) => {
            error!("failed to serialize {}: {err}", path.display());
            return;
        }
    };

    if let Err(err) = fs::write(path, payload).await {
        error!("failed to write {}: {err}", path.display());
    }
}
