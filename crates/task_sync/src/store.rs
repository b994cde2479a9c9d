//! Durable session persistence for shells that survive restarts.

use std::fs::{create_dir_all, File};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use task_core::Session;

const SESSION_FILE: &str = "session.json";

/// Where a shell keeps the serialized session between runs.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> anyhow::Result<Option<Session>>;
    fn save(&self, session: &Session) -> anyhow::Result<()>;
    fn clear(&self) -> anyhow::Result<()>;
}

/// File-backed store used by the CLI shell. The session lives as JSON under
/// a fixed name in the app data directory.
pub struct FileSessionStore {
    dir: PathBuf,
}

impl FileSessionStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn path(&self) -> PathBuf {
        self.dir.join(SESSION_FILE)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> anyhow::Result<Option<Session>> {
        let path = self.path();
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(&path)?;
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        create_dir_all(&self.dir)?;
        let serialized = serde_json::to_string(session)?;
        let mut file = File::create(self.path())?;
        file.write_all(serialized.as_bytes())?;
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        let path = self.path();
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory store for the web shell and for tests. The web shell leaves
/// durable session handling to the remote service.
#[derive(Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> anyhow::Result<Option<Session>> {
        Ok(self.session.lock().expect("session slot").clone())
    }

    fn save(&self, session: &Session) -> anyhow::Result<()> {
        *self.session.lock().expect("session slot") = Some(session.clone());
        Ok(())
    }

    fn clear(&self) -> anyhow::Result<()> {
        *self.session.lock().expect("session slot") = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use task_core::Identity;
    use tempfile::tempdir;

    fn sample_session() -> Session {
        Session {
            access_token: "token-U1".to_string(),
            token_type: "bearer".to_string(),
            refresh_token: Some("refresh-U1".to_string()),
            expires_at: 4102444800,
            user: Identity {
                id: "U1".to_string(),
                email: Some("u1@example.com".to_string()),
            },
        }
    }

    #[test]
    fn file_store_round_trip() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());

        assert!(store.load().expect("empty load").is_none());

        store.save(&sample_session()).expect("save");
        let loaded = store.load().expect("load").expect("session");
        assert_eq!(loaded.access_token, "token-U1");
        assert_eq!(loaded.user.id, "U1");

        store.clear().expect("clear");
        assert!(store.load().expect("cleared load").is_none());
    }

    #[test]
    fn clear_is_idempotent() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());

        store.clear().expect("first clear");
        store.clear().expect("second clear");
    }

    #[test]
    fn unreadable_session_file_is_an_error() {
        let dir = tempdir().expect("tempdir");
        let store = FileSessionStore::new(dir.path().to_path_buf());
        std::fs::write(dir.path().join(SESSION_FILE), "not json").expect("write");

        assert!(store.load().is_err());
    }
}
