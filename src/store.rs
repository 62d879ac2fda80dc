//! High-score persistence: one integer in one file under the platform
//! config directory. Storage failures are never surfaced to the game; a
//! store that cannot resolve its path simply stops persisting.

use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;

pub struct HighScoreStore {
    path: Option<PathBuf>,
}

impl HighScoreStore {
    /// Store backed by the platform config directory.
    pub fn open() -> Self {
        let path = ProjectDirs::from("", "", "tapwing").and_then(|dirs| {
            let dir = dirs.config_dir().to_path_buf();
            fs::create_dir_all(&dir).ok()?;
            Some(dir.join("highscore"))
        });
        HighScoreStore { path }
    }

    /// Store backed by an explicit file, for tests.
    pub fn at_path(path: PathBuf) -> Self {
        HighScoreStore { path: Some(path) }
    }

    /// Store that never reads or writes anything.
    pub fn disabled() -> Self {
        HighScoreStore { path: None }
    }

    /// The persisted high score; 0 when absent, unreadable or unparsable.
    pub fn load(&self) -> u32 {
        let Some(path) = &self.path else { return 0 };
        fs::read_to_string(path)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .unwrap_or(0)
    }

    /// Write-through; errors are dropped.
    pub fn save(&self, score: u32) {
        if let Some(path) = &self.path {
            let _ = fs::write(path, score.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    fn scratch_file(name: &str) -> PathBuf {
        env::temp_dir().join(format!("tapwing-{}-{}", name, std::process::id()))
    }

    #[test]
    fn missing_file_loads_zero() {
        let store = HighScoreStore::at_path(scratch_file("missing"));
        assert_eq!(store.load(), 0);
    }

    #[test]
    fn garbage_content_loads_zero() {
        let path = scratch_file("garbage");
        fs::write(&path, "not a number").unwrap();
        let store = HighScoreStore::at_path(path.clone());
        assert_eq!(store.load(), 0);
        let _ = fs::remove_file(path);
    }

    #[test]
    fn save_then_load_round_trips() {
        let path = scratch_file("roundtrip");
        let store = HighScoreStore::at_path(path.clone());
        store.save(42);
        assert_eq!(store.load(), 42);
        assert_eq!(fs::read_to_string(&path).unwrap(), "42");
        let _ = fs::remove_file(path);
    }

    #[test]
    fn disabled_store_is_inert() {
        let store = HighScoreStore::disabled();
        store.save(99);
        assert_eq!(store.load(), 0);
    }
}
