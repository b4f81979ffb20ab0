//! Save/load codec
//!
//! Saving captures the whole campaign graph as one `SaveData` payload.
//! Loading parses, version-checks and verifies a payload into a fresh
//! `Campaign`; the caller's campaign is replaced only once that succeeds.

use serde::Deserialize;

use crate::campaign::controller::Campaign;
use crate::campaign::feedback::Feedback;
use crate::core::config::BalanceConfig;
use crate::core::error::{PersistenceError, Result};
use crate::persistence::snapshot::{SaveData, SaveInfo, SAVE_VERSION};
use crate::persistence::store::SaveStore;

/// Reserved slot for quick save / quick load
pub const QUICKSAVE_SLOT: &str = "quicksave";

/// Normalise a user-chosen save name into a slot name.
///
/// Surrounding whitespace is trimmed and inner spaces become `_`. Names that
/// could escape the save directory or clash with file suffixes are rejected.
pub fn sanitize_save_name(name: &str) -> std::result::Result<String, PersistenceError> {
    let slot = name.trim().replace(' ', "_");
    let valid = !slot.is_empty()
        && slot
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-');
    if !valid {
        return Err(PersistenceError::InvalidSaveName(name.to_string()));
    }
    Ok(slot)
}

fn write_slot(store: &mut dyn SaveStore, slot: &str, campaign: &Campaign, quick: bool) -> Result<SaveInfo> {
    let data = SaveData::capture(campaign);
    let info = SaveInfo::describe(slot, &data, quick);
    let payload = serde_json::to_string_pretty(&data).map_err(PersistenceError::from)?;
    store.write(slot, &payload, &info)?;

    tracing::info!(slot, bytes = payload.len(), "campaign saved");
    Ok(info)
}

#[derive(Deserialize)]
struct VersionProbe {
    version: u32,
}

fn read_slot(store: &dyn SaveStore, slot: &str, config: BalanceConfig) -> Result<Campaign> {
    let payload = store.read(slot)?;
    let corrupt = |e: serde_json::Error| PersistenceError::Corrupt {
        name: slot.to_string(),
        reason: e.to_string(),
    };

    // Check the version before the layout so an old save reports as such
    let probe: VersionProbe = serde_json::from_str(&payload).map_err(corrupt)?;
    if probe.version != SAVE_VERSION {
        return Err(PersistenceError::IncompatibleVersion {
            expected: SAVE_VERSION,
            found: probe.version,
        }
        .into());
    }

    let data: SaveData = serde_json::from_str(&payload).map_err(corrupt)?;
    Ok(data.restore(slot, config)?)
}

/// Save under a user-chosen name, replacing any save of that name
pub fn save(store: &mut dyn SaveStore, name: &str, campaign: &Campaign) -> Result<SaveInfo> {
    let slot = sanitize_save_name(name)?;
    write_slot(store, &slot, campaign, slot == QUICKSAVE_SLOT)
}

/// Load a named save into a new campaign that uses `config` for balance
pub fn load(store: &dyn SaveStore, name: &str, config: BalanceConfig) -> Result<Campaign> {
    let slot = sanitize_save_name(name)?;
    read_slot(store, &slot, config)
}

pub fn quick_save(store: &mut dyn SaveStore, campaign: &Campaign) -> Result<SaveInfo> {
    write_slot(store, QUICKSAVE_SLOT, campaign, true)
}

pub fn quick_load(store: &dyn SaveStore, config: BalanceConfig) -> Result<Campaign> {
    read_slot(store, QUICKSAVE_SLOT, config)
}

/// Metadata only; no payload is parsed
pub fn list_saved_games(store: &dyn SaveStore) -> Result<Vec<SaveInfo>> {
    Ok(store.list()?)
}

pub fn delete_save(store: &mut dyn SaveStore, name: &str) -> Result<()> {
    let slot = sanitize_save_name(name)?;
    store.delete(&slot)?;
    tracing::info!(slot = %slot, "save deleted");
    Ok(())
}

impl Campaign {
    pub fn save_to(&self, store: &mut dyn SaveStore, name: &str) -> Result<SaveInfo> {
        let result = save(store, name, self);
        self.after_save(result)
    }

    pub fn quick_save_to(&self, store: &mut dyn SaveStore) -> Result<SaveInfo> {
        let result = quick_save(store, self);
        self.after_save(result)
    }

    /// Replace this campaign with a saved one. On any failure the current
    /// campaign is left exactly as it was.
    pub fn load_from(&mut self, store: &dyn SaveStore, name: &str) -> Result<()> {
        let result = load(store, name, self.config().clone());
        self.after_load(name, result)
    }

    pub fn quick_load_from(&mut self, store: &dyn SaveStore) -> Result<()> {
        let result = quick_load(store, self.config().clone());
        self.after_load(QUICKSAVE_SLOT, result)
    }

    fn after_save(&self, result: Result<SaveInfo>) -> Result<SaveInfo> {
        match &result {
            Ok(info) => self.notify(Feedback::SaveCompleted(info.slot.clone())),
            Err(err) => self.notify(Feedback::Error(err.to_string())),
        }
        result
    }

    fn after_load(&mut self, name: &str, result: Result<Campaign>) -> Result<()> {
        match result {
            Ok(loaded) => {
                self.replace_with(loaded);
                tracing::info!(slot = name, campaign = %self.state().campaign_id, "campaign loaded");
                self.notify(Feedback::LoadCompleted(name.to_string()));
                Ok(())
            }
            Err(err) => {
                tracing::warn!(slot = name, error = %err, "load failed");
                self.notify(Feedback::Error(err.to_string()));
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::GuildError;
    use crate::core::types::Difficulty;
    use crate::persistence::store::MemorySaveStore;

    fn campaign(seed: u64) -> Campaign {
        Campaign::new("Codec", seed, Difficulty::Normal, BalanceConfig::default()).unwrap()
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize_save_name("  my first save ").unwrap(), "my_first_save");
        assert_eq!(sanitize_save_name("week-12").unwrap(), "week-12");
        for bad in ["", "   ", "../etc", "a/b", ".hidden", "x.meta"] {
            assert!(
                matches!(sanitize_save_name(bad), Err(PersistenceError::InvalidSaveName(_))),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_save_load_roundtrip() {
        let mut store = MemorySaveStore::new();
        let mut original = campaign(5);
        original.advance_weeks(3);

        let info = save(&mut store, "slot one", &original).unwrap();
        assert_eq!(info.slot, "slot_one");

        let loaded = load(&store, "slot one", BalanceConfig::default()).unwrap();
        assert_eq!(loaded.state(), original.state());
        assert_eq!(loaded.guild(), original.guild());
        assert_eq!(loaded.parties(), original.parties());
    }

    #[test]
    fn test_loaded_campaign_continues_the_same_stream() {
        let mut store = MemorySaveStore::new();
        let mut original = campaign(9);
        quick_save(&mut store, &original).unwrap();
        let mut loaded = quick_load(&store, BalanceConfig::default()).unwrap();

        original.advance_weeks(4);
        loaded.advance_weeks(4);
        assert_eq!(loaded.state().store, original.state().store);
        assert_eq!(loaded.guild(), original.guild());
    }

    #[test]
    fn test_failed_load_keeps_current_campaign() {
        let mut store = MemorySaveStore::new();
        let mut current = campaign(1);
        current.save_to(&mut store, "good").unwrap();
        store.tamper("good", "{ not json");
        current.advance_week();
        let before = current.state().clone();

        let err = current.load_from(&store, "good").unwrap_err();
        assert!(matches!(err, GuildError::Persistence(PersistenceError::Corrupt { .. })));
        assert_eq!(current.state(), &before);

        let err = current.load_from(&store, "missing").unwrap_err();
        assert!(matches!(err, GuildError::Persistence(PersistenceError::SaveNotFound(_))));
        assert_eq!(current.state(), &before);
    }

    #[test]
    fn test_future_version_is_incompatible() {
        let mut store = MemorySaveStore::new();
        save(&mut store, "future", &campaign(4)).unwrap();
        store.tamper("future", r#"{ "version": 99, "layout": "unknown" }"#);

        assert!(matches!(
            load(&store, "future", BalanceConfig::default()),
            Err(GuildError::Persistence(PersistenceError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: 99
            }))
        ));
    }

    #[test]
    fn test_overwrite_and_delete() {
        let mut store = MemorySaveStore::new();
        let mut c = campaign(2);
        save(&mut store, "main", &c).unwrap();
        c.advance_week();
        save(&mut store, "main", &c).unwrap();

        let saves = list_saved_games(&store).unwrap();
        assert_eq!(saves.len(), 1);
        assert_eq!(saves[0].week, 2);

        delete_save(&mut store, "main").unwrap();
        assert!(store.is_empty());
        assert!(matches!(
            delete_save(&mut store, "main"),
            Err(GuildError::Persistence(PersistenceError::SaveNotFound(_)))
        ));
    }
}
