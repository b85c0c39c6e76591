//! Persisted client session: tokens, cached user profile, pending verification.
use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};

use novel_logging::{novel_info, novel_warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tempfile::NamedTempFile;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SessionKey {
    AccessToken,
    RefreshToken,
    /// Serialized user profile JSON.
    User,
    /// Email address awaiting verification after registration.
    PendingVerification,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("session file is not usable: {0}")]
    Path(String),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("failed to serialize session: {0}")]
    Serialize(String),
}

/// Durable key-value storage shared by every request.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: SessionKey) -> Option<String>;
    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: SessionKey) -> Result<(), StoreError>;
    /// Drops every key.
    fn clear(&self) -> Result<(), StoreError>;
}

/// Token pair plus optional profile, as returned by login, verify and refresh.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGrant {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub user: Option<Value>,
}

impl SessionGrant {
    /// Looks for tokens in `data`, accepting camelCase, snake_case and the
    /// bare `token` spelling some auth endpoints use.
    pub fn from_data(data: &Value) -> Option<Self> {
        let access_token = first_text(data, &["accessToken", "access_token", "token"])?;
        Some(Self {
            access_token,
            refresh_token: first_text(data, &["refreshToken", "refresh_token"]),
            user: data.get("user").filter(|u| !u.is_null()).cloned(),
        })
    }

    /// Writes the grant. A missing refresh token keeps the stored one.
    pub fn persist(&self, store: &dyn SessionStore) -> Result<(), StoreError> {
        store.set(SessionKey::AccessToken, &self.access_token)?;
        if let Some(refresh) = &self.refresh_token {
            store.set(SessionKey::RefreshToken, refresh)?;
        }
        if let Some(user) = &self.user {
            store.set(SessionKey::User, &user.to_string())?;
        }
        Ok(())
    }
}

fn first_text(data: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|k| data.get(*k).and_then(Value::as_str))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Cached user profile, if any and if it parses.
pub fn stored_user(store: &dyn SessionStore) -> Option<Value> {
    store
        .get(SessionKey::User)
        .and_then(|raw| serde_json::from_str(&raw).ok())
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<SessionKey, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, BTreeMap<SessionKey, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.entries().get(&key).cloned()
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        self.entries().insert(key, value.to_string());
        Ok(())
    }

    fn remove(&self, key: SessionKey) -> Result<(), StoreError> {
        self.entries().remove(&key);
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.entries().clear();
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct PersistedSession {
    entries: BTreeMap<SessionKey, String>,
}

/// RON-file backed store. Every mutation rewrites the file atomically.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<SessionKey, String>>,
}

impl FileSessionStore {
    /// Opens `path`, starting empty when it is missing or unreadable.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let dir = parent_dir(&path);
        ensure_dir(dir)?;

        let entries = match fs::read_to_string(&path) {
            Ok(text) => match ron::from_str::<PersistedSession>(&text) {
                Ok(state) => {
                    novel_info!("Loaded session from {:?}", path);
                    state.entries
                }
                Err(err) => {
                    novel_warn!("Ignoring unreadable session file {:?}: {}", path, err);
                    BTreeMap::new()
                }
            },
            Err(err) if err.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => return Err(StoreError::Io(err)),
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn mutate(
        &self,
        change: impl FnOnce(&mut BTreeMap<SessionKey, String>),
    ) -> Result<(), StoreError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        change(&mut *entries);
        let state = PersistedSession {
            entries: entries.clone(),
        };
        let content = ron::ser::to_string_pretty(&state, ron::ser::PrettyConfig::new())
            .map_err(|e| StoreError::Serialize(e.to_string()))?;
        write_atomically(&self.path, &content)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: SessionKey) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned()
    }

    fn set(&self, key: SessionKey, value: &str) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.insert(key, value.to_string());
        })
    }

    fn remove(&self, key: SessionKey) -> Result<(), StoreError> {
        self.mutate(|entries| {
            entries.remove(&key);
        })
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.mutate(BTreeMap::clear)
    }
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn ensure_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        if !dir.is_dir() {
            return Err(StoreError::Path(format!("{dir:?} is not a directory")));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| StoreError::Path(e.to_string()))?;
    }
    Ok(())
}

/// Write to a temp file next to `target`, then rename over it.
fn write_atomically(target: &Path, content: &str) -> Result<(), StoreError> {
    let dir = parent_dir(target);
    ensure_dir(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(target).map_err(|e| StoreError::Io(e.error))?;
    Ok(())
}
