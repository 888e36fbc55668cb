//! Snapshot and credential persistence over an opaque key-value store.
//!
//! The store holds exactly two keys: the serialized present snapshot and the
//! AI credential. Either may be missing. A missing or unreadable snapshot
//! restores as the empty snapshot; it is never fatal.

use crate::lint::{LintSeverity, lint_snapshot, repair_snapshot};
use crate::measure::TextMetrics;
use crate::model::MindMapState;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Key of the serialized present snapshot.
pub const SNAPSHOT_KEY: &str = "mindMapState";
/// Key of the user-supplied AI credential.
pub const CREDENTIAL_KEY: &str = "gemini_api_key";

#[derive(Debug, Error)]
pub enum PersistError {
    /// The store refuses access (quota exceeded, private mode, ...).
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed snapshot: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// String-keyed blob storage.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
}

// ─── In-memory store ─────────────────────────────────────────────────────

/// Volatile store, used by tests and hosts without storage.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStore {
    entries: HashMap<String, String>,
    read_only: bool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, like storage in private mode.
    pub fn read_only() -> Self {
        Self {
            entries: HashMap::new(),
            read_only: true,
        }
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.to_string());
        self
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        if self.read_only {
            return Err(PersistError::Unavailable("store is read-only".into()));
        }
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// ─── Directory store ─────────────────────────────────────────────────────

/// One file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(file)
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(s) => Ok(Some(s)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }
}

// ─── Snapshot ────────────────────────────────────────────────────────────

pub fn encode_snapshot(state: &MindMapState) -> Result<String, PersistError> {
    Ok(serde_json::to_string(state)?)
}

pub fn decode_snapshot(raw: &str) -> Result<MindMapState, PersistError> {
    Ok(serde_json::from_str(raw)?)
}

pub fn save_snapshot(store: &mut dyn KeyValueStore, state: &MindMapState) -> Result<(), PersistError> {
    let raw = encode_snapshot(state)?;
    store.set(SNAPSHOT_KEY, &raw)
}

/// Restore the stored snapshot.
///
/// Missing, unreadable or malformed data yields the empty snapshot. Lint
/// warnings are logged and the snapshot is repaired (see [`repair_snapshot`]).
pub fn load_snapshot(store: &dyn KeyValueStore) -> MindMapState {
    let raw = match store.get(SNAPSHOT_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return MindMapState::default(),
        Err(e) => {
            log::error!("Failed to read stored snapshot: {e}");
            return MindMapState::default();
        }
    };

    let state = match decode_snapshot(&raw) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load state from storage, starting empty: {e}");
            return MindMapState::default();
        }
    };

    for diag in lint_snapshot(&state) {
        if diag.severity == LintSeverity::Warning {
            log::warn!("[{}] {}", diag.rule, diag.message);
        }
    }
    repair_snapshot(&state, &TextMetrics::default())
}

// ─── Credential ──────────────────────────────────────────────────────────

/// The stored credential, if any. Read failures count as absent.
pub fn load_credential(store: &dyn KeyValueStore) -> Option<String> {
    match store.get(CREDENTIAL_KEY) {
        Ok(value) => value.filter(|v| !v.trim().is_empty()),
        Err(e) => {
            log::warn!("Could not read credential from storage: {e}");
            None
        }
    }
}

pub fn save_credential(store: &mut dyn KeyValueStore, credential: &str) -> Result<(), PersistError> {
    store.set(CREDENTIAL_KEY, credential)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::NodeId;
    use crate::model::{Node, Shape};
    use pretty_assertions::assert_eq;

    fn sample() -> MindMapState {
        MindMapState {
            nodes: vec![Node {
                id: NodeId::intern("p1"),
                text: "Persist me".into(),
                x: 1.5,
                y: -2.0,
                width: 100.0,
                height: 48.0,
                shape: Shape::Ellipse,
                color: "#D1FAE5".into(),
            }],
            connectors: vec![],
        }
    }

    #[test]
    fn snapshot_roundtrip() {
        let mut store = InMemoryStore::new();
        save_snapshot(&mut store, &sample()).unwrap();
        assert_eq!(load_snapshot(&store), sample());
    }

    #[test]
    fn missing_snapshot_is_empty() {
        assert!(load_snapshot(&InMemoryStore::new()).is_empty());
    }

    #[test]
    fn malformed_snapshot_is_empty() {
        let store = InMemoryStore::new().with_entry(SNAPSHOT_KEY, "{not json");
        assert!(load_snapshot(&store).is_empty());
        let store = InMemoryStore::new().with_entry(SNAPSHOT_KEY, r#"{"nodes": 3}"#);
        assert!(load_snapshot(&store).is_empty());
    }

    #[test]
    fn reads_stored_record_layout() {
        let raw = r##"{"nodes":[{"id":"a","text":"A","x":0,"y":0,"width":10,"height":10,"shape":"diamond","color":"#FFFFFF"},
                               {"id":"b","text":"B","x":5,"y":5,"width":10,"height":10,"shape":"rectangle","color":"#FFFFFF"}],
                      "connectors":[{"id":"a-b-1","fromNodeId":"a","toNodeId":"b"},
                                    {"id":"a-x-1","fromNodeId":"a","toNodeId":"x_gone"}]}"##;
        let store = InMemoryStore::new().with_entry(SNAPSHOT_KEY, raw);
        let state = load_snapshot(&store);
        assert_eq!(state.nodes.len(), 2);
        assert_eq!(state.nodes[0].shape, Shape::Diamond);
        // The dangling connector is pruned on load.
        assert_eq!(state.connectors.len(), 1);
    }

    #[test]
    fn repairs_broken_stored_records() {
        let raw = r##"{"nodes":[{"id":"d1","text":"A","x":0,"y":0,"width":100,"height":50,"shape":"rectangle","color":"#FFFFFF"},
                               {"id":"d1","text":"A2","x":500,"y":0,"width":100,"height":50,"shape":"rectangle","color":"#FFFFFF"},
                               {"id":"d2","text":"Flat","x":0,"y":90,"width":0,"height":-4,"shape":"ellipse","color":"#FFFFFF"}],
                      "connectors":[{"id":"loop","fromNodeId":"d1","toNodeId":"d1"},
                                    {"id":"e1","fromNodeId":"d1","toNodeId":"d2"},
                                    {"id":"e2","fromNodeId":"d1","toNodeId":"d2"}]}"##;
        let store = InMemoryStore::new().with_entry(SNAPSHOT_KEY, raw);
        let state = load_snapshot(&store);

        let texts: Vec<&str> = state.nodes.iter().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, ["A", "Flat"]);
        assert!(state.nodes[1].width > 0.0 && state.nodes[1].height > 0.0);
        let edges: Vec<&str> = state.connectors.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(edges, ["e1"]);
    }

    #[test]
    fn read_only_store_rejects_writes() {
        let mut store = InMemoryStore::read_only();
        let err = save_snapshot(&mut store, &sample()).unwrap_err();
        assert!(matches!(err, PersistError::Unavailable(_)));
    }

    #[test]
    fn blank_credential_is_absent() {
        let store = InMemoryStore::new().with_entry(CREDENTIAL_KEY, "  ");
        assert_eq!(load_credential(&store), None);
        let store = InMemoryStore::new().with_entry(CREDENTIAL_KEY, "k-123");
        assert_eq!(load_credential(&store).as_deref(), Some("k-123"));
    }

    #[test]
    fn file_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("state"));
        assert_eq!(store.get(SNAPSHOT_KEY).unwrap(), None);
        save_snapshot(&mut store, &sample()).unwrap();
        save_credential(&mut store, "secret").unwrap();
        assert_eq!(load_snapshot(&store), sample());
        assert_eq!(load_credential(&store).as_deref(), Some("secret"));
    }
}
