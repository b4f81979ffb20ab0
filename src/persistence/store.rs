//! Save slot storage
//!
//! A store keeps, per slot, one serialized payload and its `SaveInfo`. The
//! codec never touches the filesystem directly; it goes through `SaveStore`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::error::PersistenceError;
use crate::persistence::snapshot::SaveInfo;

pub trait SaveStore {
    /// Store a payload and its metadata, replacing any previous save in the slot
    fn write(&mut self, slot: &str, payload: &str, info: &SaveInfo) -> Result<(), PersistenceError>;

    fn read(&self, slot: &str) -> Result<String, PersistenceError>;

    /// Metadata for every slot, newest first
    fn list(&self) -> Result<Vec<SaveInfo>, PersistenceError>;

    fn delete(&mut self, slot: &str) -> Result<(), PersistenceError>;

    fn exists(&self, slot: &str) -> bool;
}

/// One `<slot>.json` payload and one `<slot>.meta.json` sidecar per save
#[derive(Debug, Clone)]
pub struct DirectorySaveStore {
    root: PathBuf,
}

const PAYLOAD_SUFFIX: &str = ".json";
const META_SUFFIX: &str = ".meta.json";

impl DirectorySaveStore {
    /// Open a save directory, creating it if needed
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, PersistenceError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn payload_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{slot}{PAYLOAD_SUFFIX}"))
    }

    fn meta_path(&self, slot: &str) -> PathBuf {
        self.root.join(format!("{slot}{META_SUFFIX}"))
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

impl SaveStore for DirectorySaveStore {
    /// Both temp files are staged before either target is replaced, so a
    /// failed write leaves the previous payload and metadata as a pair.
    fn write(&mut self, slot: &str, payload: &str, info: &SaveInfo) -> Result<(), PersistenceError> {
        let payload_path = self.payload_path(slot);
        let meta_path = self.meta_path(slot);
        let payload_tmp = tmp_path(&payload_path);
        let meta_tmp = tmp_path(&meta_path);

        let meta = serde_json::to_string_pretty(info)?;
        fs::write(&payload_tmp, payload)?;
        if let Err(err) = fs::write(&meta_tmp, &meta) {
            let _ = fs::remove_file(&payload_tmp);
            let _ = fs::remove_file(&meta_tmp);
            return Err(err.into());
        }

        if let Err(err) = fs::rename(&payload_tmp, &payload_path) {
            let _ = fs::remove_file(&payload_tmp);
            let _ = fs::remove_file(&meta_tmp);
            return Err(err.into());
        }
        // Payload is already replaced; stale metadata must not outlive it
        if let Err(err) = fs::rename(&meta_tmp, &meta_path) {
            tracing::warn!(slot, error = %err, "dropping stale save metadata");
            let _ = fs::remove_file(&meta_path);
            let _ = fs::remove_file(&meta_tmp);
            return Err(err.into());
        }
        Ok(())
    }

    fn read(&self, slot: &str) -> Result<String, PersistenceError> {
        let path = self.payload_path(slot);
        if !path.exists() {
            return Err(PersistenceError::SaveNotFound(slot.to_string()));
        }
        Ok(fs::read_to_string(path)?)
    }

    fn list(&self) -> Result<Vec<SaveInfo>, PersistenceError> {
        let mut saves = Vec::new();

        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if !file_name.ends_with(META_SUFFIX) {
                continue;
            }

            match fs::read_to_string(&path)
                .map_err(PersistenceError::from)
                .and_then(|raw| serde_json::from_str::<SaveInfo>(&raw).map_err(PersistenceError::from))
            {
                Ok(info) => saves.push(info),
                Err(err) => tracing::warn!(path = %path.display(), error = %err, "skipping unreadable save metadata"),
            }
        }

        saves.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.slot.cmp(&b.slot)));
        Ok(saves)
    }

    fn delete(&mut self, slot: &str) -> Result<(), PersistenceError> {
        let payload = self.payload_path(slot);
        if !payload.exists() {
            return Err(PersistenceError::SaveNotFound(slot.to_string()));
        }
        fs::remove_file(payload)?;

        let meta = self.meta_path(slot);
        if meta.exists() {
            fs::remove_file(meta)?;
        }
        Ok(())
    }

    fn exists(&self, slot: &str) -> bool {
        self.payload_path(slot).exists()
    }
}

/// In-memory slots, for tests and embedding
#[derive(Debug, Clone, Default)]
pub struct MemorySaveStore {
    slots: BTreeMap<String, (String, SaveInfo)>,
}

impl MemorySaveStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Overwrite a slot's payload in place, leaving its metadata alone
    pub fn tamper(&mut self, slot: &str, payload: impl Into<String>) {
        if let Some(entry) = self.slots.get_mut(slot) {
            entry.0 = payload.into();
        }
    }
}

impl SaveStore for MemorySaveStore {
    fn write(&mut self, slot: &str, payload: &str, info: &SaveInfo) -> Result<(), PersistenceError> {
        self.slots
            .insert(slot.to_string(), (payload.to_string(), info.clone()));
        Ok(())
    }

    fn read(&self, slot: &str) -> Result<String, PersistenceError> {
        self.slots
            .get(slot)
            .map(|(payload, _)| payload.clone())
            .ok_or_else(|| PersistenceError::SaveNotFound(slot.to_string()))
    }

    fn list(&self) -> Result<Vec<SaveInfo>, PersistenceError> {
        let mut saves: Vec<SaveInfo> = self.slots.values().map(|(_, info)| info.clone()).collect();
        saves.sort_by(|a, b| b.saved_at.cmp(&a.saved_at).then_with(|| a.slot.cmp(&b.slot)));
        Ok(saves)
    }

    fn delete(&mut self, slot: &str) -> Result<(), PersistenceError> {
        self.slots
            .remove(slot)
            .map(|_| ())
            .ok_or_else(|| PersistenceError::SaveNotFound(slot.to_string()))
    }

    fn exists(&self, slot: &str) -> bool {
        self.slots.contains_key(slot)
    }
}
