//! Balance configuration with documented constants
//!
//! The tunable curves (quest scaling by guild tier, economy figures, XP
//! curve) live here rather than in the simulation code, so a campaign can be
//! rebalanced from a TOML file without touching the algorithms.

use serde::{Deserialize, Serialize};

use crate::core::error::{GuildError, Result};
use crate::core::types::{Difficulty, Gold, GuildTier};

/// Balance row for one guild tier
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierBalance {
    pub tier: GuildTier,
    /// Reputation at which the guild is promoted into this tier
    pub min_reputation: i32,
    /// Multiplier on generated quest rewards
    pub reward_multiplier: f32,
    /// Multiplier on generated quest difficulty
    pub difficulty_multiplier: f32,
    /// Adventurers the guild can house before facilities
    pub roster_capacity: usize,
    /// Relative weights for Low, Medium, High, Deadly stakes on the board
    pub stakes_weights: [u32; 4],
}

impl TierBalance {
    pub fn default_for(tier: GuildTier) -> Self {
        match tier {
            GuildTier::Fledgling => Self {
                tier,
                min_reputation: 0,
                reward_multiplier: 1.0,
                difficulty_multiplier: 1.0,
                roster_capacity: 6,
                stakes_weights: [50, 35, 12, 3],
            },
            GuildTier::Established => Self {
                tier,
                min_reputation: 40,
                reward_multiplier: 1.3,
                difficulty_multiplier: 1.25,
                roster_capacity: 8,
                stakes_weights: [30, 40, 22, 8],
            },
            GuildTier::Renowned => Self {
                tier,
                min_reputation: 120,
                reward_multiplier: 1.7,
                difficulty_multiplier: 1.6,
                roster_capacity: 10,
                stakes_weights: [15, 35, 35, 15],
            },
            GuildTier::Legendary => Self {
                tier,
                min_reputation: 300,
                reward_multiplier: 2.2,
                difficulty_multiplier: 2.0,
                roster_capacity: 12,
                stakes_weights: [5, 25, 40, 30],
            },
        }
    }
}

/// Required-power multipliers per campaign difficulty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyBalance {
    pub easy: f32,
    pub normal: f32,
    pub hard: f32,
    pub brutal: f32,
}

impl Default for DifficultyBalance {
    fn default() -> Self {
        Self {
            easy: 0.8,
            normal: 1.0,
            hard: 1.25,
            brutal: 1.5,
        }
    }
}

/// Balance table for a campaign
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BalanceConfig {
    // === GUILD TIERS ===
    /// One row per tier, ordered by reputation threshold
    pub tiers: Vec<TierBalance>,

    /// Difficulty multipliers applied to quest requirements
    pub difficulty: DifficultyBalance,

    // === QUEST BOARD ===
    /// The board is replenished when it holds fewer quests than this
    pub board_floor: usize,

    /// Replenishment tops the board back up to this many quests
    pub board_target: usize,

    /// Width of the roll band above the success chance that yields a
    /// partial success instead of a failure
    pub partial_band: f32,

    // === ECONOMY ===
    /// Flat weekly income (contracts, patrons)
    pub base_weekly_income: Gold,

    /// Extra weekly income per full 10 points of reputation
    pub income_per_ten_reputation: Gold,

    /// Flat weekly operating cost of the guildhall
    pub base_weekly_upkeep: Gold,

    /// Weekly wage per adventurer level
    pub wage_per_level: Gold,

    /// Price of one facility level (multiplied by the level being built)
    pub facility_cost: Gold,

    /// Weekly upkeep per facility level
    pub facility_upkeep: Gold,

    /// Weekly income per tavern level
    pub tavern_income: Gold,

    // === ADVENTURERS ===
    /// XP needed for the next level is `xp_per_level * level`
    pub xp_per_level: u32,

    /// Weeks an injury takes to heal without help
    pub injury_weeks: u32,

    /// Price of recruiting one adventurer
    pub recruit_cost: Gold,

    // === CAMPAIGN START ===
    pub starting_treasury: Gold,
    pub starting_reputation: i32,
    pub starting_roster: usize,
    pub starting_quests: usize,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            tiers: GuildTier::ALL.iter().map(|t| TierBalance::default_for(*t)).collect(),
            difficulty: DifficultyBalance::default(),

            board_floor: 5,
            board_target: 8,
            partial_band: 0.15,

            base_weekly_income: 120,
            income_per_ten_reputation: 5,
            base_weekly_upkeep: 60,
            wage_per_level: 8,
            facility_cost: 250,
            facility_upkeep: 10,
            tavern_income: 35,

            xp_per_level: 100,
            injury_weeks: 3,
            recruit_cost: 50,

            starting_treasury: 500,
            starting_reputation: 0,
            starting_roster: 4,
            starting_quests: 8,
        }
    }
}

impl BalanceConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance row for a tier
    pub fn tier(&self, tier: GuildTier) -> TierBalance {
        self.tiers
            .iter()
            .copied()
            .find(|row| row.tier == tier)
            .unwrap_or_else(|| TierBalance::default_for(tier))
    }

    /// Highest tier whose reputation threshold is met
    pub fn tier_for_reputation(&self, reputation: i32) -> GuildTier {
        GuildTier::ALL
            .iter()
            .copied()
            .filter(|tier| reputation >= self.tier(*tier).min_reputation)
            .max()
            .unwrap_or(GuildTier::Fledgling)
    }

    pub fn difficulty_multiplier(&self, difficulty: Difficulty) -> f32 {
        match difficulty {
            Difficulty::Easy => self.difficulty.easy,
            Difficulty::Normal => self.difficulty.normal,
            Difficulty::Hard => self.difficulty.hard,
            Difficulty::Brutal => self.difficulty.brutal,
        }
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.board_target == 0 {
            return Err(GuildError::Config("board_target must be positive".into()));
        }

        if self.board_floor > self.board_target {
            return Err(GuildError::Config(format!(
                "board_floor ({}) should be <= board_target ({})",
                self.board_floor, self.board_target
            )));
        }

        if !(0.0..1.0).contains(&self.partial_band) {
            return Err(GuildError::Config("partial_band must be in [0, 1)".into()));
        }

        let multipliers = [
            self.difficulty.easy,
            self.difficulty.normal,
            self.difficulty.hard,
            self.difficulty.brutal,
        ];
        if multipliers.iter().any(|m| *m <= 0.0) {
            return Err(GuildError::Config("Difficulty multipliers must be positive".into()));
        }

        for tier in GuildTier::ALL {
            if !self.tiers.iter().any(|row| row.tier == tier) {
                return Err(GuildError::Config(format!("Missing balance row for tier {tier}")));
            }
        }

        for pair in self.tiers.windows(2) {
            if pair[1].min_reputation <= pair[0].min_reputation {
                return Err(GuildError::Config(format!(
                    "Tier {} threshold ({}) must exceed tier {} threshold ({})",
                    pair[1].tier, pair[1].min_reputation, pair[0].tier, pair[0].min_reputation
                )));
            }
        }

        for row in &self.tiers {
            if row.reward_multiplier <= 0.0 || row.difficulty_multiplier <= 0.0 {
                return Err(GuildError::Config(format!(
                    "Tier {} multipliers must be positive",
                    row.tier
                )));
            }
            if row.stakes_weights.iter().all(|w| *w == 0) {
                return Err(GuildError::Config(format!(
                    "Tier {} needs at least one non-zero stakes weight",
                    row.tier
                )));
            }
        }

        if self.xp_per_level == 0 {
            return Err(GuildError::Config("xp_per_level must be positive".into()));
        }

        Ok(())
    }

    /// Load a balance table from a TOML file
    pub fn load_from_toml(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse_toml(&content)
    }

    /// Parse a balance table from a TOML string; missing keys keep defaults
    pub fn parse_toml(content: &str) -> Result<Self> {
        let config: BalanceConfig =
            toml::from_str(content).map_err(|e| GuildError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
