//! Quest board and recruit generation

use rand::distributions::WeightedIndex;
use rand::prelude::*;

use crate::core::config::BalanceConfig;
use crate::entity::adventurer::{Adventurer, AdventurerClass, Race, StatBlock};
use crate::entity::guild::Guild;
use crate::entity::quest::{Quest, QuestStatus, QuestType, Stakes};
use crate::entity::store::EntityStore;

const FIRST_NAMES: &[&str] = &[
    "Aldric", "Brenna", "Cass", "Dorn", "Elowen", "Fenn", "Garrick", "Hale", "Isolde", "Jory",
    "Kestra", "Lorcan", "Maeve", "Nim", "Orla", "Pell", "Quill", "Rook", "Sable", "Tamsin",
    "Ulric", "Vesna", "Wren", "Yara",
];

const EPITHETS: &[&str] = &[
    "Ashford", "Blackthorn", "Coldwater", "Dunmore", "Emberlane", "Fairweather", "Greaves",
    "Hollow", "Ironside", "Marsh", "Redfern", "Stone", "Thatch", "Vale",
];

const FOES: &[&str] = &[
    "Ashen Wyvern", "Bog Trolls", "Crimson Bandits", "Gloom Wolves", "Hill Giant",
    "Restless Dead", "Goblin Warband", "Marsh Hag", "Rogue Golem", "Cultists of the Pale Eye",
];

const PLACES: &[&str] = &[
    "Barrow Downs", "Sunken Abbey", "Old Quarry", "Whispering Pines", "Saltmarsh Road",
    "Frostpeak Pass", "Drowned Mine", "King's Crossing", "Hollowmere", "Thornwall Keep",
];

fn pick<'a, R: Rng + ?Sized>(rng: &mut R, table: &[&'a str]) -> &'a str {
    table.choose(rng).copied().unwrap_or("Nowhere")
}

fn quest_title<R: Rng + ?Sized>(quest_type: QuestType, rng: &mut R) -> String {
    match quest_type {
        QuestType::Hunt => format!("Hunt the {}", pick(rng, FOES)),
        QuestType::Escort => format!("Escort a caravan through {}", pick(rng, PLACES)),
        QuestType::Retrieval => format!("Recover the relic of {}", pick(rng, PLACES)),
        QuestType::Exploration => format!("Chart the depths of {}", pick(rng, PLACES)),
        QuestType::Defense => format!("Hold {} against the {}", pick(rng, PLACES), pick(rng, FOES)),
    }
}

fn roll_stakes<R: Rng + ?Sized>(weights: &[u32; 4], rng: &mut R) -> Stakes {
    match WeightedIndex::new(weights) {
        Ok(dist) => Stakes::ALL[dist.sample(rng)],
        Err(_) => Stakes::Low,
    }
}

/// Produce `count` new quests scaled to the guild's tier and reputation.
///
/// Ids are drawn from the store so they stay unique, but the records are not
/// inserted; the caller posts them.
pub fn generate_available_quests<R: Rng + ?Sized>(
    guild: &Guild,
    count: usize,
    store: &mut EntityStore,
    config: &BalanceConfig,
    posted_week: u64,
    rng: &mut R,
) -> Vec<Quest> {
    let balance = config.tier(guild.tier);
    // Up to +50% reward for a well-known guild
    let renown = 1.0 + guild.reputation.clamp(0, 500) as f32 / 1000.0;

    (0..count)
        .map(|_| {
            let stakes = roll_stakes(&balance.stakes_weights, rng);
            let quest_type = *QuestType::ALL.choose(rng).unwrap_or(&QuestType::Hunt);
            let variance: f32 = rng.gen_range(0.85..1.15);

            let difficulty = (stakes.base_difficulty() as f32 * balance.difficulty_multiplier * variance)
                .round()
                .max(1.0) as u32;
            let reward = (stakes.base_reward() as f32 * balance.reward_multiplier * renown * variance).round() as i64;

            let (min_party_size, mut max_party_size) = stakes.party_bounds();
            if rng.gen_bool(0.3) {
                max_party_size += 1;
            }

            Quest {
                id: store.next_quest_id(),
                title: quest_title(quest_type, rng),
                quest_type,
                stakes,
                difficulty,
                reward,
                experience: stakes.base_experience(),
                min_party_size,
                max_party_size,
                required_reputation: stakes.required_reputation(),
                required_tier: stakes.required_tier(),
                status: QuestStatus::Available,
                posted_week,
                accepted_week: None,
                outcome: None,
            }
        })
        .collect()
}

/// Roll a level-1 recruit with class and racial bonuses
pub fn generate_recruit<R: Rng + ?Sized>(store: &mut EntityStore, rng: &mut R) -> Adventurer {
    let class = *AdventurerClass::ALL.choose(rng).unwrap_or(&AdventurerClass::Warrior);
    let race = *Race::ALL.choose(rng).unwrap_or(&Race::Human);

    let mut stats = StatBlock::new(
        rng.gen_range(3..=8),
        rng.gen_range(3..=8),
        rng.gen_range(3..=8),
        rng.gen_range(3..=8),
        rng.gen_range(3..=8),
    );
    for stat in class.primary_stats() {
        stats.raise(stat, 3);
    }
    let bonus = race.stat_bonus();
    stats.strength += bonus.strength;
    stats.agility += bonus.agility;
    stats.intellect += bonus.intellect;
    stats.vitality += bonus.vitality;
    stats.spirit += bonus.spirit;

    let name = format!("{} {}", pick(rng, FIRST_NAMES), pick(rng, EPITHETS));
    Adventurer::new(store.next_adventurer_id(), name, class, race, stats)
}
