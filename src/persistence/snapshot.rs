//! Save format
//!
//! The snapshot is a self-contained set of serde structs, decoupled from the
//! live containers: hash maps become id-sorted vectors and the party registry
//! becomes a list of parties. Restoring rebuilds the live containers and
//! checks the graph before anything is handed back.

use chrono::{DateTime, Utc};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::campaign::controller::Campaign;
use crate::campaign::events::EventLog;
use crate::campaign::party::{PartyRegistry, QuestParty};
use crate::campaign::state::{GameState, QuestBoard};
use crate::core::calendar::{Calendar, SeasonPhase};
use crate::core::config::BalanceConfig;
use crate::core::error::PersistenceError;
use crate::core::types::{CampaignId, Difficulty, Gold};
use crate::entity::adventurer::Adventurer;
use crate::entity::guild::Guild;
use crate::entity::quest::Quest;
use crate::entity::store::EntityStore;

// Save format changelog:
// v1: initial format
pub const SAVE_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CampaignHeader {
    pub id: CampaignId,
    pub name: String,
    pub difficulty: Difficulty,
    pub seed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveData {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub campaign: CampaignHeader,
    pub calendar: Calendar,
    pub guild: Guild,

    // Entity store, id-sorted, with its counters
    pub adventurers: Vec<Adventurer>,
    pub quests: Vec<Quest>,
    pub next_adventurer_id: u32,
    pub next_quest_id: u32,

    pub board: QuestBoard,
    pub parties: Vec<QuestParty>,
    pub log: EventLog,
    pub rng: ChaCha8Rng,
}

impl SaveData {
    pub fn capture(campaign: &Campaign) -> Self {
        let state = campaign.state();

        let adventurers = state.store.roster().into_iter().cloned().collect();
        let mut quests: Vec<Quest> = state.store.quests().cloned().collect();
        quests.sort_by_key(|q| q.id);
        let (next_adventurer_id, next_quest_id) = state.store.id_counters();

        Self {
            version: SAVE_VERSION,
            saved_at: Utc::now(),
            campaign: CampaignHeader {
                id: state.campaign_id,
                name: state.campaign_name.clone(),
                difficulty: state.difficulty,
                seed: campaign.seed(),
            },
            calendar: state.calendar.clone(),
            guild: campaign.guild().clone(),
            adventurers,
            quests,
            next_adventurer_id,
            next_quest_id,
            board: state.board.clone(),
            parties: campaign.parties().parties().into_iter().cloned().collect(),
            log: state.log.clone(),
            rng: campaign.rng().clone(),
        }
    }

    /// Rebuild a campaign. `slot` only labels errors.
    pub fn restore(self, slot: &str, config: BalanceConfig) -> Result<Campaign, PersistenceError> {
        if self.version != SAVE_VERSION {
            return Err(PersistenceError::IncompatibleVersion {
                expected: SAVE_VERSION,
                found: self.version,
            });
        }
        let corrupt = |reason: String| PersistenceError::Corrupt {
            name: slot.to_string(),
            reason,
        };

        if let Some(max) = self.adventurers.iter().map(|a| a.id.0).max() {
            if max >= self.next_adventurer_id {
                return Err(corrupt(format!(
                    "adventurer id {max} is not below the id counter {}",
                    self.next_adventurer_id
                )));
            }
        }
        if let Some(max) = self.quests.iter().map(|q| q.id.0).max() {
            if max >= self.next_quest_id {
                return Err(corrupt(format!(
                    "quest id {max} is not below the id counter {}",
                    self.next_quest_id
                )));
            }
        }

        let adventurer_count = self.adventurers.len();
        let quest_count = self.quests.len();
        let store = EntityStore::from_parts(
            self.adventurers,
            self.quests,
            self.next_adventurer_id,
            self.next_quest_id,
        );
        if store.adventurer_count() != adventurer_count || store.quest_count() != quest_count {
            return Err(corrupt("duplicate entity ids".into()));
        }

        let parties = PartyRegistry::from_parties(self.parties)
            .map_err(|adventurer| corrupt(format!("adventurer {adventurer} is in two parties")))?;

        let state = GameState {
            campaign_id: self.campaign.id,
            campaign_name: self.campaign.name,
            difficulty: self.campaign.difficulty,
            calendar: self.calendar,
            store,
            board: self.board,
            log: self.log,
        };
        state.verify_integrity(&parties).map_err(corrupt)?;

        Ok(Campaign::from_parts(
            state,
            self.guild,
            parties,
            config,
            self.rng,
            self.campaign.seed,
        ))
    }
}

/// Lightweight listing entry, stored beside each payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveInfo {
    pub slot: String,
    pub campaign_name: String,
    pub campaign_id: CampaignId,
    pub guild_name: String,
    pub season: u32,
    pub phase: SeasonPhase,
    pub month: u32,
    pub week: u32,
    pub treasury: Gold,
    pub roster_size: usize,
    pub active_quests: usize,
    pub saved_at: DateTime<Utc>,
    pub quick_save: bool,
}

impl SaveInfo {
    pub fn describe(slot: &str, data: &SaveData, quick_save: bool) -> Self {
        Self {
            slot: slot.to_string(),
            campaign_name: data.campaign.name.clone(),
            campaign_id: data.campaign.id,
            guild_name: data.guild.name.clone(),
            season: data.calendar.current_season(),
            phase: data.calendar.season_phase(),
            month: data.calendar.month(),
            week: data.calendar.week(),
            treasury: data.guild.treasury,
            roster_size: data.adventurers.len(),
            active_quests: data.board.active().len(),
            saved_at: data.saved_at,
            quick_save,
        }
    }
}

impl std::fmt::Display for SaveInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{:<16} {} - season {}, {} month {} week {} - {} gold, {} adventurers ({})",
            self.slot,
            self.guild_name,
            self.season,
            self.phase,
            self.month,
            self.week,
            self.treasury,
            self.roster_size,
            self.saved_at.format("%Y-%m-%d %H:%M")
        )
    }
}
