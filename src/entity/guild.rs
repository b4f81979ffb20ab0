//! The player guild - finances, staff, facilities, standing

use serde::{Deserialize, Serialize};

use crate::core::config::BalanceConfig;
use crate::core::types::{Gold, GuildTier};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StaffRole {
    /// Cuts base upkeep by 10%
    Quartermaster,
    /// Injuries heal one extra week per tick
    Healer,
    /// +10% quest experience
    Trainer,
    /// One extra quest per board replenishment
    Scout,
    Clerk,
}

impl std::str::FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "quartermaster" => Ok(StaffRole::Quartermaster),
            "healer" => Ok(StaffRole::Healer),
            "trainer" => Ok(StaffRole::Trainer),
            "scout" => Ok(StaffRole::Scout),
            "clerk" => Ok(StaffRole::Clerk),
            other => Err(format!("unknown staff role: {other}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Staff {
    pub name: String,
    pub role: StaffRole,
    pub weekly_salary: Gold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacilityKind {
    /// +2 roster capacity per level
    Barracks,
    /// New injuries last one week less per level
    Infirmary,
    /// +5% quest experience per level
    TrainingGround,
    /// Weekly income per level
    Tavern,
}

impl std::str::FromStr for FacilityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "barracks" => Ok(FacilityKind::Barracks),
            "infirmary" => Ok(FacilityKind::Infirmary),
            "training" | "trainingground" | "training_ground" => Ok(FacilityKind::TrainingGround),
            "tavern" => Ok(FacilityKind::Tavern),
            other => Err(format!("unknown facility: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Facility {
    pub kind: FacilityKind,
    pub level: u32,
}

/// Result of one weekly settlement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub income: Gold,
    pub costs: Gold,
    pub treasury_after: Gold,
    /// Income plus reserves did not cover costs
    pub shortfall: bool,
}

impl Settlement {
    pub fn net(&self) -> Gold {
        self.income - self.costs
    }
}

/// The player's guild (one per campaign)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Guild {
    pub name: String,
    pub treasury: Gold,
    pub reputation: i32,
    pub tier: GuildTier,
    pub staff: Vec<Staff>,
    pub facilities: Vec<Facility>,
    pub in_financial_trouble: bool,
    pub weeks_in_trouble: u32,
    pub last_settlement: Option<Settlement>,
}

impl Guild {
    pub fn new(name: String, config: &BalanceConfig) -> Self {
        let reputation = config.starting_reputation;
        Self {
            name,
            treasury: config.starting_treasury,
            reputation,
            tier: config.tier_for_reputation(reputation),
            staff: Vec::new(),
            facilities: Vec::new(),
            in_financial_trouble: false,
            weeks_in_trouble: 0,
            last_settlement: None,
        }
    }

    pub fn facility_level(&self, kind: FacilityKind) -> u32 {
        self.facilities
            .iter()
            .find(|f| f.kind == kind)
            .map(|f| f.level)
            .unwrap_or(0)
    }

    /// Raise a facility by one level, returning the new level
    pub fn upgrade_facility(&mut self, kind: FacilityKind) -> u32 {
        if let Some(facility) = self.facilities.iter_mut().find(|f| f.kind == kind) {
            facility.level += 1;
            return facility.level;
        }
        self.facilities.push(Facility { kind, level: 1 });
        1
    }

    pub fn has_staff(&self, role: StaffRole) -> bool {
        self.staff.iter().any(|s| s.role == role)
    }

    pub fn staff_count(&self, role: StaffRole) -> usize {
        self.staff.iter().filter(|s| s.role == role).count()
    }

    pub fn roster_capacity(&self, config: &BalanceConfig) -> usize {
        config.tier(self.tier).roster_capacity + 2 * self.facility_level(FacilityKind::Barracks) as usize
    }

    pub fn weekly_income(&self, config: &BalanceConfig) -> Gold {
        let reputation_bonus = (self.reputation.max(0) / 10) as Gold * config.income_per_ten_reputation;
        let tavern = self.facility_level(FacilityKind::Tavern) as Gold * config.tavern_income;
        config.base_weekly_income + reputation_bonus + tavern
    }

    /// Operating costs excluding adventurer wages
    pub fn weekly_overhead(&self, config: &BalanceConfig) -> Gold {
        let base = if self.has_staff(StaffRole::Quartermaster) {
            config.base_weekly_upkeep * 9 / 10
        } else {
            config.base_weekly_upkeep
        };
        let salaries: Gold = self.staff.iter().map(|s| s.weekly_salary).sum();
        let facility_levels: u32 = self.facilities.iter().map(|f| f.level).sum();
        base + salaries + facility_levels as Gold * config.facility_upkeep
    }

    /// Apply one week of income and costs. Never fails: a shortfall drives
    /// the treasury negative and flags the guild.
    pub fn settle_week(&mut self, income: Gold, costs: Gold) -> Settlement {
        let shortfall = self.treasury + income < costs;
        self.treasury = self.treasury + income - costs;

        if shortfall {
            self.in_financial_trouble = true;
            self.weeks_in_trouble += 1;
            self.reputation -= 1;
        } else if self.treasury >= 0 {
            self.in_financial_trouble = false;
            self.weeks_in_trouble = 0;
        }

        let settlement = Settlement {
            income,
            costs,
            treasury_after: self.treasury,
            shortfall,
        };
        self.last_settlement = Some(settlement);
        settlement
    }

    /// Promote when reputation has reached a higher tier; tiers never drop
    pub fn check_promotion(&mut self, config: &BalanceConfig) -> Option<GuildTier> {
        let earned = config.tier_for_reputation(self.reputation);
        if earned.outranks(&self.tier) {
            self.tier = earned;
            return Some(earned);
        }
        None
    }

    pub fn adjust_reputation(&mut self, delta: i32) {
        self.reputation = self.reputation.saturating_add(delta);
    }

    /// Experience multiplier from trainers and training grounds
    pub fn experience_multiplier(&self) -> f32 {
        let trainers = if self.has_staff(StaffRole::Trainer) { 0.10 } else { 0.0 };
        let grounds = self.facility_level(FacilityKind::TrainingGround) as f32 * 0.05;
        1.0 + trainers + grounds
    }

    /// How long a fresh injury lasts, after infirmary care
    pub fn injury_duration(&self, config: &BalanceConfig) -> u32 {
        config
            .injury_weeks
            .saturating_sub(self.facility_level(FacilityKind::Infirmary))
            .max(1)
    }

    /// Weeks of healing applied per tick
    pub fn recovery_rate(&self) -> u32 {
        if self.has_staff(StaffRole::Healer) {
            2
        } else {
            1
        }
    }
}
