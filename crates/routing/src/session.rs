//! Persistence of the route identity (start plus waypoints) between runs.
//!
//! Only ids are stored. Paths are recomputed on restore, so a record stays
//! valid across map or setting changes as long as its systems still exist.

use crate::route::Route;
use serde::{Deserialize, Serialize};
use starroute_graph::{SystemId, SystemLookup};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub start: Option<SystemId>,
    #[serde(default)]
    pub waypoints: Vec<SystemId>,
}

impl SessionRecord {
    pub fn is_empty(&self) -> bool {
        self.start.is_none() && self.waypoints.is_empty()
    }

    /// A start and at least one waypoint; anything less is not worth storing.
    pub fn is_complete(&self) -> bool {
        self.start.is_some() && !self.waypoints.is_empty()
    }

    /// Drop ids the lookup does not know. A missing start invalidates the
    /// waypoints as well.
    pub fn resolve(self, lookup: &dyn SystemLookup) -> SessionRecord {
        let start = match self.start {
            Some(id) if lookup.resolve(id).is_some() => Some(id),
            Some(id) => {
                warn!(system = %id, "stored start system no longer exists");
                None
            }
            None => None,
        };
        if start.is_none() {
            return SessionRecord::default();
        }

        let waypoints = self
            .waypoints
            .into_iter()
            .filter(|id| {
                let known = lookup.resolve(*id).is_some();
                if !known {
                    warn!(system = %id, "dropping stored waypoint that no longer exists");
                }
                known
            })
            .collect();

        SessionRecord { start, waypoints }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session store I/O failed for {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode session data")]
    Encode(#[from] serde_json::Error),
}

/// Key-value store holding serialized session records.
pub trait SessionStore: Send {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove(&mut self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default, Clone)]
pub struct MemorySessionStore {
    values: HashMap<String, String>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        self.values.remove(key);
        Ok(())
    }
}

/// Session values kept in a single JSON object on disk.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(source) => {
                return Err(SessionError::Io {
                    path: self.path.clone(),
                    source,
                })
            }
        };
        match serde_json::from_str(&content) {
            Ok(values) => Ok(values),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "session file is corrupt, starting empty");
                Ok(BTreeMap::new())
            }
        }
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<(), SessionError> {
        let io_err = |source| SessionError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        let content = serde_json::to_string_pretty(values)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, content).map_err(io_err)?;
        fs::rename(&tmp, &self.path).map_err(io_err)?;
        debug!(path = %self.path.display(), keys = values.len(), "session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), SessionError> {
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value);
        self.write_all(&values)
    }

    fn remove(&mut self, key: &str) -> Result<(), SessionError> {
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// Write `record` under `key`, or remove the key when the record is
/// incomplete.
pub fn save_record(
    store: &mut dyn SessionStore,
    key: &str,
    record: &SessionRecord,
) -> Result<(), SessionError> {
    if !record.is_complete() {
        return store.remove(key);
    }
    store.set(key, serde_json::to_string(record)?)
}

/// Read the record under `key`. Unparseable data is treated as absent.
pub fn load_record(store: &dyn SessionStore, key: &str) -> Result<Option<SessionRecord>, SessionError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };
    match serde_json::from_str(&raw) {
        Ok(record) => Ok(Some(record)),
        Err(e) => {
            warn!(key, error = %e, "ignoring unreadable session record");
            Ok(None)
        }
    }
}

/// Persist the identity of `route` under `key`.
pub fn store_to_session(
    route: &Route,
    store: &mut dyn SessionStore,
    key: &str,
) -> Result<(), SessionError> {
    save_record(store, key, &route.session_record())
}

/// Apply the record stored under `key` to `route`.
///
/// Returns true when a record was found and the route accepted it. A
/// record whose ids resolve but cannot be routed leaves the failure in
/// [`Route::last_error`].
pub fn restore_from_session(
    route: &mut Route,
    store: &dyn SessionStore,
    key: &str,
    lookup: &dyn SystemLookup,
) -> Result<bool, SessionError> {
    let Some(record) = load_record(store, key)? else {
        return Ok(false);
    };
    let record = record.resolve(lookup);
    if !record.is_complete() {
        debug!(key, "stored route has nothing left to restore");
        return Ok(false);
    }
    Ok(route.set_route(record.start, record.waypoints).is_ok())
}
