use crate::gui::dial::Snapshot;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StateError {
    #[error("Failed to determine state directory")]
    StateDirNotFound,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Window geometry kept alongside the dial in the snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowState {
    pub width: i32,
    pub height: i32,
}

pub fn get_state_path() -> Result<PathBuf, StateError> {
    let proj_dirs =
        ProjectDirs::from("org", "fandial", "fandial").ok_or(StateError::StateDirNotFound)?;
    let dir = proj_dirs
        .state_dir()
        .unwrap_or_else(|| proj_dirs.data_local_dir());
    Ok(dir.join("state.json"))
}

/// `Ok(None)` when nothing has been saved yet.
pub fn read_snapshot(path: &Path) -> Result<Option<Snapshot>, StateError> {
    let data = match fs_err::read_to_string(path) {
        Ok(d) => d,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    Ok(Some(serde_json::from_str(&data)?))
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<(), StateError> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    let data = serde_json::to_string_pretty(snapshot)?;
    fs_err::write(path, data)?;
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Option<Snapshot> {
    read_snapshot(path).unwrap_or_else(|e| {
        log::warn!("Discarding saved state at {}: {}", path.display(), e);
        None
    })
}

pub fn window_state(snapshot: &Snapshot) -> Option<WindowState> {
    snapshot
        .host_state
        .clone()
        .and_then(|v| serde_json::from_value(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gui::dial::{Dial, FanSpeed};

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("fandial-state-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_snapshot_file_round_trip() {
        let path = temp_path("round_trip.json");
        let mut dial = Dial::new();
        dial.speed = FanSpeed::Medium;
        let host = serde_json::to_value(WindowState {
            width: 640,
            height: 480,
        })
        .unwrap();

        write_snapshot(&path, &dial.save(Some(host))).unwrap();
        let loaded = load_snapshot(&path).unwrap();
        let _ = fs_err::remove_file(&path);

        let mut restored = Dial::new();
        restored.restore(Some(&loaded));
        assert_eq!(restored.speed, FanSpeed::Medium);
        assert_eq!(
            window_state(&loaded),
            Some(WindowState {
                width: 640,
                height: 480
            })
        );
    }

    #[test]
    fn test_missing_file_is_none() {
        let path = temp_path("never_written.json");
        assert!(read_snapshot(&path).unwrap().is_none());
        assert!(load_snapshot(&path).is_none());
    }

    #[test]
    fn test_malformed_file_is_discarded() {
        let path = temp_path("malformed.json");
        fs_err::create_dir_all(path.parent().unwrap()).unwrap();
        fs_err::write(&path, "{ speed: HIGH").unwrap();

        assert!(matches!(read_snapshot(&path), Err(StateError::Json(_))));
        assert!(load_snapshot(&path).is_none());
        let _ = fs_err::remove_file(&path);
    }

    #[test]
    fn test_foreign_host_state_is_ignored() {
        let snapshot: Snapshot =
            serde_json::from_str(r#"{"speed":"LOW","host_state":"opaque"}"#).unwrap();
        assert_eq!(window_state(&snapshot), None);
        assert_eq!(snapshot.speed(), Some(FanSpeed::Low));
    }
}
