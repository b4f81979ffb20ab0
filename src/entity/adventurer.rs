//! Adventurers - the guild's roster members

use serde::{Deserialize, Serialize};

use crate::core::types::AdventurerId;

/// Attribute block
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    pub strength: u32,
    pub agility: u32,
    pub intellect: u32,
    pub vitality: u32,
    pub spirit: u32,
}

/// Attribute selector, used by classes and quest types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Stat {
    Strength,
    Agility,
    Intellect,
    Vitality,
    Spirit,
}

impl StatBlock {
    pub fn new(strength: u32, agility: u32, intellect: u32, vitality: u32, spirit: u32) -> Self {
        Self {
            strength,
            agility,
            intellect,
            vitality,
            spirit,
        }
    }

    pub fn get(&self, stat: Stat) -> u32 {
        match stat {
            Stat::Strength => self.strength,
            Stat::Agility => self.agility,
            Stat::Intellect => self.intellect,
            Stat::Vitality => self.vitality,
            Stat::Spirit => self.spirit,
        }
    }

    pub fn raise(&mut self, stat: Stat, amount: u32) {
        let slot = match stat {
            Stat::Strength => &mut self.strength,
            Stat::Agility => &mut self.agility,
            Stat::Intellect => &mut self.intellect,
            Stat::Vitality => &mut self.vitality,
            Stat::Spirit => &mut self.spirit,
        };
        *slot = slot.saturating_add(amount);
    }

    pub fn total(&self) -> u32 {
        self.strength + self.agility + self.intellect + self.vitality + self.spirit
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdventurerClass {
    Warrior,
    Rogue,
    Mage,
    Cleric,
    Ranger,
}

impl AdventurerClass {
    pub const ALL: [AdventurerClass; 5] = [
        AdventurerClass::Warrior,
        AdventurerClass::Rogue,
        AdventurerClass::Mage,
        AdventurerClass::Cleric,
        AdventurerClass::Ranger,
    ];

    /// The two stats that grow on level-up
    pub fn primary_stats(&self) -> [Stat; 2] {
        match self {
            AdventurerClass::Warrior => [Stat::Strength, Stat::Vitality],
            AdventurerClass::Rogue => [Stat::Agility, Stat::Intellect],
            AdventurerClass::Mage => [Stat::Intellect, Stat::Spirit],
            AdventurerClass::Cleric => [Stat::Spirit, Stat::Vitality],
            AdventurerClass::Ranger => [Stat::Agility, Stat::Strength],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Race {
    Human,
    Dwarf,
    Elf,
    Halfling,
    Orc,
}

impl Race {
    pub const ALL: [Race; 5] = [Race::Human, Race::Dwarf, Race::Elf, Race::Halfling, Race::Orc];

    /// Small bonus applied once at generation
    pub fn stat_bonus(&self) -> StatBlock {
        match self {
            Race::Human => StatBlock::new(1, 1, 1, 1, 1),
            Race::Dwarf => StatBlock::new(1, 0, 0, 3, 1),
            Race::Elf => StatBlock::new(0, 2, 2, 0, 1),
            Race::Halfling => StatBlock::new(0, 3, 1, 0, 1),
            Race::Orc => StatBlock::new(3, 0, 0, 2, 0),
        }
    }
}

/// Availability state of an adventurer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Condition {
    #[default]
    Healthy,
    /// Out on a quest
    Fatigued,
    /// Recovering; cannot join a party
    Injured,
}

/// Outcome of granting experience
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct XpGrant {
    pub levels_gained: u32,
    pub new_level: u32,
}

/// A guild adventurer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Adventurer {
    pub id: AdventurerId,
    pub name: String,
    pub class: AdventurerClass,
    pub race: Race,
    pub stats: StatBlock,
    pub level: u32,
    pub experience: u32,
    pub condition: Condition,
    /// Weeks left before an injury heals
    pub injury_weeks: u32,
    pub quests_completed: u32,
}

impl Adventurer {
    pub fn new(id: AdventurerId, name: String, class: AdventurerClass, race: Race, stats: StatBlock) -> Self {
        Self {
            id,
            name,
            class,
            race,
            stats,
            level: 1,
            experience: 0,
            condition: Condition::Healthy,
            injury_weeks: 0,
            quests_completed: 0,
        }
    }

    pub fn is_injured(&self) -> bool {
        self.condition == Condition::Injured
    }

    /// XP required to go from the current level to the next
    pub fn xp_to_next_level(&self, xp_per_level: u32) -> u32 {
        xp_per_level.saturating_mul(self.level)
    }

    /// Add experience, levelling up as many times as thresholds allow
    pub fn grant_experience(&mut self, amount: u32, xp_per_level: u32) -> XpGrant {
        self.experience = self.experience.saturating_add(amount);
        let mut levels_gained = 0;

        loop {
            let needed = self.xp_to_next_level(xp_per_level);
            if needed == 0 || self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level += 1;
            levels_gained += 1;
            for stat in self.class.primary_stats() {
                self.stats.raise(stat, 1);
            }
        }

        XpGrant {
            levels_gained,
            new_level: self.level,
        }
    }

    pub fn injure(&mut self, weeks: u32) {
        self.condition = Condition::Injured;
        self.injury_weeks = weeks.max(1);
    }

    /// Tick injury recovery; returns true when the adventurer is healthy again
    pub fn recover(&mut self, weeks: u32) -> bool {
        if self.condition != Condition::Injured {
            return false;
        }
        self.injury_weeks = self.injury_weeks.saturating_sub(weeks);
        if self.injury_weeks == 0 {
            self.condition = Condition::Healthy;
            return true;
        }
        false
    }

    /// Weekly wage owed for this adventurer
    pub fn weekly_wage(&self, wage_per_level: i64) -> i64 {
        wage_per_level * self.level as i64
    }
}
