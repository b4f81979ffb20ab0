//! Quest resolution
//!
//! When a party's quest comes due, this system computes the chance of success
//! from the party's relevant stats against the quest difficulty, rolls once,
//! and derives gold, experience, reputation and casualties from that roll.
//!
//! The chance is a pure function of its inputs. The only randomness is the
//! single `OutcomeSampler::sample_unit` call, so a fixed sampler gives a fully
//! reproducible result.

use rand::{Rng, RngCore};

use crate::campaign::events::{GameEventKind, RelatedEntity};
use crate::campaign::party::{PartyRegistry, QuestParty};
use crate::campaign::state::GameState;
use crate::core::config::BalanceConfig;
use crate::core::error::{GuildError, Result};
use crate::core::types::{AdventurerId, Difficulty, Gold, QuestId};
use crate::entity::adventurer::{Adventurer, AdventurerClass, Condition};
use crate::entity::guild::Guild;
use crate::entity::quest::{Quest, QuestOutcome, QuestStatus, Stakes};
use crate::entity::store::EntityStore;

/// Floor and ceiling on any success chance
pub const MIN_SUCCESS_CHANCE: f32 = 0.05;
pub const MAX_SUCCESS_CHANCE: f32 = 0.95;

/// Chance per unit of power-to-difficulty ratio
pub const CHANCE_PER_RATIO: f32 = 0.55;

/// Bonus per distinct class beyond the first
pub const CLASS_SYNERGY_BONUS: f32 = 0.03;

/// Power bonus per level above 1
pub const LEVEL_POWER_BONUS: f32 = 0.1;

/// Failure severity at which a deadly quest claims a life
pub const DEADLY_SEVERITY: f32 = 0.8;

/// Source of the single pass/fail roll
pub trait OutcomeSampler {
    /// Uniform sample in `[0, 1)`
    fn sample_unit(&mut self) -> f32;
}

impl<R: RngCore + ?Sized> OutcomeSampler for R {
    fn sample_unit(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Always returns the same roll
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedRoll(pub f32);

impl OutcomeSampler for FixedRoll {
    fn sample_unit(&mut self) -> f32 {
        self.0.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasualtySeverity {
    Injured,
    Killed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Casualty {
    pub adventurer: AdventurerId,
    pub severity: CasualtySeverity,
}

/// Computed outcome of a quest, not yet applied
#[derive(Debug, Clone, PartialEq)]
pub struct QuestResult {
    pub quest: QuestId,
    pub outcome: QuestOutcome,
    pub success_chance: f32,
    pub roll: f32,
    /// Treasury change; negative on failure
    pub gold: Gold,
    /// Experience per surviving member before guild bonuses
    pub experience: u32,
    pub reputation: i32,
    pub casualties: Vec<Casualty>,
}

impl QuestResult {
    pub fn casualty(&self, adventurer: AdventurerId) -> Option<CasualtySeverity> {
        self.casualties
            .iter()
            .find(|c| c.adventurer == adventurer)
            .map(|c| c.severity)
    }
}

/// Summary of a committed result
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedResult {
    pub quest: QuestId,
    pub outcome: QuestOutcome,
    pub gold: Gold,
    pub returned: Vec<AdventurerId>,
    pub injured: Vec<AdventurerId>,
    pub killed: Vec<AdventurerId>,
    pub level_ups: Vec<(AdventurerId, u32)>,
}

/// Effective power of one adventurer on this quest
pub fn adventurer_power(quest: &Quest, adventurer: &Adventurer) -> f32 {
    let base: u32 = quest
        .quest_type
        .relevant_stats()
        .iter()
        .map(|stat| adventurer.stats.get(*stat))
        .sum();
    base as f32 * (1.0 + LEVEL_POWER_BONUS * adventurer.level.saturating_sub(1) as f32)
}

pub fn party_power(quest: &Quest, members: &[&Adventurer]) -> f32 {
    members.iter().map(|a| adventurer_power(quest, a)).sum()
}

/// Party power needed for `CHANCE_PER_RATIO` odds
pub fn required_power(quest: &Quest, difficulty_multiplier: f32) -> f32 {
    (quest.difficulty as f32 * difficulty_multiplier).max(1.0)
}

/// Pure success chance for a party on a quest
pub fn success_probability(quest: &Quest, members: &[&Adventurer], difficulty_multiplier: f32) -> f32 {
    if members.is_empty() {
        return MIN_SUCCESS_CHANCE;
    }

    let ratio = party_power(quest, members) / required_power(quest, difficulty_multiplier);

    let mut classes: Vec<AdventurerClass> = members.iter().map(|a| a.class).collect();
    classes.sort_by_key(|c| *c as u8);
    classes.dedup();
    let synergy = CLASS_SYNERGY_BONUS * classes.len().saturating_sub(1) as f32;

    (ratio * CHANCE_PER_RATIO + synergy).clamp(MIN_SUCCESS_CHANCE, MAX_SUCCESS_CHANCE)
}

fn party_members<'a>(party: &QuestParty, store: &'a EntityStore) -> Result<Vec<&'a Adventurer>> {
    party
        .members
        .iter()
        .map(|id| {
            store.adventurer(*id).map_err(|_| GuildError::PartyInconsistent {
                quest: party.quest,
                adventurer: *id,
            })
        })
        .collect()
}

/// Success chance for a registered party, looking members up in the store
pub fn quest_success_chance(
    quest: &Quest,
    party: &QuestParty,
    store: &EntityStore,
    difficulty: Difficulty,
    config: &BalanceConfig,
) -> Result<f32> {
    let members = party_members(party, store)?;
    Ok(success_probability(quest, &members, config.difficulty_multiplier(difficulty)))
}

/// Simulate a quest: compute the chance, take one roll, derive the result
pub fn simulate_quest<S: OutcomeSampler + ?Sized>(
    quest: &Quest,
    party: &QuestParty,
    store: &EntityStore,
    difficulty: Difficulty,
    config: &BalanceConfig,
    sampler: &mut S,
) -> Result<QuestResult> {
    let members = party_members(party, store)?;
    let chance = success_probability(quest, &members, config.difficulty_multiplier(difficulty));
    let roll = sampler.sample_unit();

    let partial_ceiling = (chance + config.partial_band).min(1.0);
    let outcome = if roll < chance {
        QuestOutcome::Success
    } else if roll < partial_ceiling {
        QuestOutcome::Partial
    } else {
        QuestOutcome::Failure
    };

    let severity = if outcome == QuestOutcome::Failure {
        let span = (1.0 - partial_ceiling).max(f32::EPSILON);
        ((roll - partial_ceiling) / span).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (gold, experience, reputation) = match outcome {
        QuestOutcome::Success => (quest.reward, quest.experience, quest.stakes.reputation_swing()),
        QuestOutcome::Partial => (
            quest.reward / 2,
            (quest.experience as f32 * 0.6).round() as u32,
            quest.stakes.reputation_swing() / 3,
        ),
        QuestOutcome::Failure => (
            -quest.failure_cost(),
            (quest.experience as f32 * 0.25).round() as u32,
            -(quest.stakes.reputation_swing() / 2),
        ),
    };

    Ok(QuestResult {
        quest: quest.id,
        outcome,
        success_chance: chance,
        roll,
        gold,
        experience,
        reputation,
        casualties: casualties_for(quest.stakes, outcome, severity, &members),
    })
}

/// Casualties fall on the members with the lowest vitality first
fn casualties_for(stakes: Stakes, outcome: QuestOutcome, severity: f32, members: &[&Adventurer]) -> Vec<Casualty> {
    let mut ranked: Vec<&Adventurer> = members.to_vec();
    ranked.sort_by_key(|a| (a.stats.vitality, a.id));

    let count = match outcome {
        QuestOutcome::Success => 0,
        QuestOutcome::Partial => usize::from(stakes >= Stakes::High),
        QuestOutcome::Failure => {
            let share = ranked.len() as f32 * stakes.casualty_fraction() * severity.max(0.5);
            let mut count = share.ceil() as usize;
            if stakes >= Stakes::Medium {
                count = count.max(1);
            }
            count
        }
    }
    .min(ranked.len());

    let lethal = outcome == QuestOutcome::Failure && stakes == Stakes::Deadly && severity >= DEADLY_SEVERITY;

    ranked
        .iter()
        .take(count)
        .enumerate()
        .map(|(i, adventurer)| Casualty {
            adventurer: adventurer.id,
            severity: if lethal && i == 0 {
                CasualtySeverity::Killed
            } else {
                CasualtySeverity::Injured
            },
        })
        .collect()
}

/// Commit a result to the campaign.
///
/// Rejects a quest that is not in progress (an already completed quest gets
/// `QuestAlreadyResolved`), so a result can never be credited twice. All
/// checks run before the first mutation.
pub fn apply_quest_results(
    result: &QuestResult,
    state: &mut GameState,
    guild: &mut Guild,
    parties: &mut PartyRegistry,
    config: &BalanceConfig,
) -> Result<AppliedResult> {
    let quest_id = result.quest;
    let quest = state.store.quest(quest_id)?;
    match quest.status {
        QuestStatus::Completed => return Err(GuildError::QuestAlreadyResolved(quest_id)),
        QuestStatus::Available => return Err(GuildError::QuestNotActive(quest_id)),
        QuestStatus::InProgress => {}
    }
    if state.board.location(quest_id) != Some(QuestStatus::InProgress) {
        return Err(GuildError::QuestNotActive(quest_id));
    }
    let title = quest.title.clone();

    let members: Vec<AdventurerId> = parties
        .party(quest_id)
        .map(|p| p.members.clone())
        .ok_or(GuildError::PartyMissing(quest_id))?;
    if let Some(missing) = members.iter().find(|id| !state.store.contains_adventurer(**id)) {
        return Err(GuildError::PartyInconsistent {
            quest: quest_id,
            adventurer: *missing,
        });
    }

    let date = state.calendar.date();
    let xp_multiplier = guild.experience_multiplier();
    let injury_weeks = guild.injury_duration(config);
    let experience = (result.experience as f32 * xp_multiplier).round() as u32;

    guild.treasury += result.gold;
    guild.adjust_reputation(result.reputation);

    let mut applied = AppliedResult {
        quest: quest_id,
        outcome: result.outcome,
        gold: result.gold,
        returned: Vec::new(),
        injured: Vec::new(),
        killed: Vec::new(),
        level_ups: Vec::new(),
    };

    for member in &members {
        if result.casualty(*member) == Some(CasualtySeverity::Killed) {
            let fallen = state.store.remove_adventurer(*member)?;
            state.log.record(
                GameEventKind::AdventurerKilled,
                format!("{} fell during '{}'", fallen.name, title),
                date,
                Some(RelatedEntity::Adventurer(*member)),
            );
            applied.killed.push(*member);
            continue;
        }

        let adventurer = state.store.adventurer_mut(*member)?;
        adventurer.quests_completed += 1;
        let grant = adventurer.grant_experience(experience, config.xp_per_level);

        if result.casualty(*member) == Some(CasualtySeverity::Injured) {
            adventurer.injure(injury_weeks);
            let name = adventurer.name.clone();
            state.log.record(
                GameEventKind::AdventurerInjured,
                format!("{name} was injured on '{title}' ({injury_weeks} weeks to heal)"),
                date,
                Some(RelatedEntity::Adventurer(*member)),
            );
            applied.injured.push(*member);
        } else {
            adventurer.condition = Condition::Healthy;
            applied.returned.push(*member);
        }

        if grant.levels_gained > 0 {
            let name = state.store.adventurer(*member)?.name.clone();
            state.log.record(
                GameEventKind::LevelUp,
                format!("{name} reached level {}", grant.new_level),
                date,
                Some(RelatedEntity::Adventurer(*member)),
            );
            applied.level_ups.push((*member, grant.new_level));
        }
    }

    let quest = state.store.quest_mut(quest_id)?;
    quest.status = QuestStatus::Completed;
    quest.outcome = Some(result.outcome);
    state.board.complete(quest_id);
    parties.release(quest_id);

    let (kind, message) = match result.outcome {
        QuestOutcome::Success => (
            GameEventKind::QuestSucceeded,
            format!("'{title}' succeeded (+{} gold)", result.gold),
        ),
        QuestOutcome::Partial => (
            GameEventKind::QuestPartiallySucceeded,
            format!("'{title}' partly succeeded (+{} gold)", result.gold),
        ),
        QuestOutcome::Failure => (
            GameEventKind::QuestFailed,
            format!("'{title}' failed ({} gold)", result.gold),
        ),
    };
    state.log.record(kind, message, date, Some(RelatedEntity::Quest(quest_id)));

    tracing::info!(
        quest = %quest_id,
        outcome = ?result.outcome,
        chance = result.success_chance,
        gold = result.gold,
        "quest resolved"
    );

    Ok(applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::adventurer::{Race, StatBlock};
    use crate::entity::guild::FacilityKind;
    use crate::entity::quest::sample_quest;

    fn adventurer(id: u32, class: AdventurerClass, vitality: u32) -> Adventurer {
        Adventurer::new(
            AdventurerId(id),
            format!("Adv {id}"),
            class,
            Race::Human,
            StatBlock::new(10, 10, 10, vitality, 10),
        )
    }

    fn store_with(adventurers: Vec<Adventurer>) -> EntityStore {
        let mut store = EntityStore::new();
        for adventurer in adventurers {
            store.insert_adventurer(adventurer);
        }
        store
    }

    fn party(quest: u32, members: &[u32]) -> QuestParty {
        QuestParty {
            quest: QuestId(quest),
            members: members.iter().map(|m| AdventurerId(*m)).collect(),
            departed_week: 0,
        }
    }

    #[test]
    fn test_probability_is_deterministic() {
        let quest = sample_quest(1, Stakes::Medium);
        let store = store_with(vec![
            adventurer(1, AdventurerClass::Warrior, 8),
            adventurer(2, AdventurerClass::Mage, 6),
        ]);
        let config = BalanceConfig::default();
        let p = party(1, &[1, 2]);

        let first = quest_success_chance(&quest, &p, &store, Difficulty::Normal, &config).unwrap();
        let second = quest_success_chance(&quest, &p, &store, Difficulty::Normal, &config).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_harder_difficulty_lowers_chance() {
        let quest = sample_quest(1, Stakes::Medium);
        let a = adventurer(1, AdventurerClass::Warrior, 8);
        let members = [&a];
        let easy = success_probability(&quest, &members, 0.8);
        let brutal = success_probability(&quest, &members, 1.5);
        assert!(easy > brutal);
    }

    #[test]
    fn test_chance_is_clamped() {
        let quest = sample_quest(1, Stakes::Low);
        let strong = Adventurer::new(
            AdventurerId(1),
            "Titan".into(),
            AdventurerClass::Warrior,
            Race::Orc,
            StatBlock::new(500, 500, 1, 1, 1),
        );
        assert_eq!(success_probability(&quest, &[&strong], 1.0), MAX_SUCCESS_CHANCE);
        assert_eq!(success_probability(&quest, &[], 1.0), MIN_SUCCESS_CHANCE);
    }

    #[test]
    fn test_class_synergy() {
        let quest = sample_quest(1, Stakes::High);
        let w1 = adventurer(1, AdventurerClass::Warrior, 8);
        let w2 = adventurer(2, AdventurerClass::Warrior, 8);
        let mage = adventurer(3, AdventurerClass::Mage, 8);
        let same = success_probability(&quest, &[&w1, &w2], 1.0);
        let mixed = success_probability(&quest, &[&w1, &mage], 1.0);
        assert!((mixed - same - CLASS_SYNERGY_BONUS).abs() < 1e-6);
    }

    #[test]
    fn test_fixed_roll_outcomes() {
        let quest = sample_quest(1, Stakes::Medium);
        let store = store_with(vec![
            adventurer(1, AdventurerClass::Warrior, 8),
            adventurer(2, AdventurerClass::Cleric, 6),
        ]);
        let config = BalanceConfig::default();
        let p = party(1, &[1, 2]);

        let success = simulate_quest(&quest, &p, &store, Difficulty::Normal, &config, &mut FixedRoll(0.0)).unwrap();
        assert_eq!(success.outcome, QuestOutcome::Success);
        assert_eq!(success.gold, quest.reward);
        assert!(success.casualties.is_empty());

        let partial_roll = success.success_chance + config.partial_band / 2.0;
        let partial =
            simulate_quest(&quest, &p, &store, Difficulty::Normal, &config, &mut FixedRoll(partial_roll)).unwrap();
        assert_eq!(partial.outcome, QuestOutcome::Partial);
        assert_eq!(partial.gold, quest.reward / 2);

        let failure = simulate_quest(&quest, &p, &store, Difficulty::Normal, &config, &mut FixedRoll(0.99)).unwrap();
        assert_eq!(failure.outcome, QuestOutcome::Failure);
        assert_eq!(failure.gold, -quest.failure_cost());
        assert!(failure.reputation < 0);
        // Medium stakes always costs someone
        assert!(!failure.casualties.is_empty());
    }

    #[test]
    fn test_casualties_hit_lowest_vitality_first() {
        let quest = sample_quest(1, Stakes::High);
        let store = store_with(vec![
            adventurer(1, AdventurerClass::Warrior, 12),
            adventurer(2, AdventurerClass::Rogue, 4),
            adventurer(3, AdventurerClass::Mage, 7),
        ]);
        let config = BalanceConfig::default();
        let result =
            simulate_quest(&quest, &party(1, &[1, 2, 3]), &store, Difficulty::Normal, &config, &mut FixedRoll(0.999))
                .unwrap();

        assert_eq!(result.casualties[0].adventurer, AdventurerId(2));
        assert!(result.casualties.iter().all(|c| c.severity == CasualtySeverity::Injured));
    }

    #[test]
    fn test_deadly_failure_can_kill() {
        let mut quest = sample_quest(1, Stakes::Deadly);
        quest.difficulty = 10_000;
        let store = store_with(vec![
            adventurer(1, AdventurerClass::Warrior, 12),
            adventurer(2, AdventurerClass::Rogue, 4),
            adventurer(3, AdventurerClass::Mage, 7),
            adventurer(4, AdventurerClass::Cleric, 9),
        ]);
        let config = BalanceConfig::default();
        let result = simulate_quest(
            &quest,
            &party(1, &[1, 2, 3, 4]),
            &store,
            Difficulty::Normal,
            &config,
            &mut FixedRoll(0.999),
        )
        .unwrap();

        assert_eq!(result.outcome, QuestOutcome::Failure);
        assert_eq!(result.casualty(AdventurerId(2)), Some(CasualtySeverity::Killed));
        assert_eq!(result.casualties.len(), 3);
    }

    #[test]
    fn test_missing_member_is_consistency_error() {
        let quest = sample_quest(1, Stakes::Low);
        let store = store_with(vec![adventurer(1, AdventurerClass::Warrior, 8)]);
        let err = simulate_quest(
            &quest,
            &party(1, &[1, 9]),
            &store,
            Difficulty::Normal,
            &BalanceConfig::default(),
            &mut FixedRoll(0.1),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            GuildError::PartyInconsistent {
                adventurer: AdventurerId(9),
                ..
            }
        ));
    }

    /// Campaign pieces with `quest` in progress and, when `with_party`, the
    /// given adventurers registered as its party
    fn active_quest(
        quest: Quest,
        adventurers: Vec<Adventurer>,
        with_party: bool,
    ) -> (GameState, Guild, PartyRegistry, QuestParty) {
        let config = BalanceConfig::default();
        let mut state = GameState::new("Test".into(), Difficulty::Normal);
        let guild = Guild::new("Test".into(), &config);
        let mut parties = PartyRegistry::new();

        let party = QuestParty {
            quest: quest.id,
            members: adventurers.iter().map(|a| a.id).collect(),
            departed_week: 0,
        };
        for mut adventurer in adventurers {
            adventurer.condition = Condition::Fatigued;
            state.store.insert_adventurer(adventurer);
        }
        let id = quest.id;
        state.store.insert_quest(Quest {
            status: QuestStatus::InProgress,
            accepted_week: Some(0),
            ..quest
        });
        state.board.post(id);
        state.board.activate(id);
        if with_party {
            parties.assign(party.clone()).unwrap();
        }
        (state, guild, parties, party)
    }

    #[test]
    fn test_apply_without_party_is_rejected() {
        let config = BalanceConfig::default();
        let (mut state, mut guild, mut parties, party) = active_quest(
            sample_quest(1, Stakes::Low),
            vec![adventurer(1, AdventurerClass::Warrior, 8)],
            false,
        );
        let quest = state.store.quest(QuestId(1)).unwrap().clone();
        let result =
            simulate_quest(&quest, &party, &state.store, Difficulty::Normal, &config, &mut FixedRoll(0.0)).unwrap();

        let state_before = state.clone();
        let guild_before = guild.clone();
        let err = apply_quest_results(&result, &mut state, &mut guild, &mut parties, &config).unwrap_err();

        assert!(matches!(err, GuildError::PartyMissing(QuestId(1))));
        assert_eq!(err.category(), crate::core::error::ErrorCategory::Consistency);
        assert_eq!(state, state_before);
        assert_eq!(guild, guild_before);
    }

    #[test]
    fn test_failure_leaves_casualties_injured() {
        let config = BalanceConfig::default();
        let (mut state, mut guild, mut parties, party) = active_quest(
            sample_quest(1, Stakes::High),
            vec![
                adventurer(1, AdventurerClass::Warrior, 12),
                adventurer(2, AdventurerClass::Rogue, 4),
                adventurer(3, AdventurerClass::Mage, 7),
            ],
            true,
        );
        guild.upgrade_facility(FacilityKind::Infirmary);
        let injury_weeks = guild.injury_duration(&config);
        assert_eq!(injury_weeks, 2);

        let quest = state.store.quest(QuestId(1)).unwrap().clone();
        let result =
            simulate_quest(&quest, &party, &state.store, Difficulty::Normal, &config, &mut FixedRoll(0.999)).unwrap();
        assert_eq!(result.outcome, QuestOutcome::Failure);
        assert_eq!(result.casualty(AdventurerId(2)), Some(CasualtySeverity::Injured));

        let applied = apply_quest_results(&result, &mut state, &mut guild, &mut parties, &config).unwrap();

        assert_eq!(applied.injured.len(), result.casualties.len());
        assert!(applied.killed.is_empty());
        for id in &applied.injured {
            let member = state.store.adventurer(*id).unwrap();
            assert_eq!(member.condition, Condition::Injured);
            assert_eq!(member.injury_weeks, injury_weeks);
        }
        for id in &applied.returned {
            assert_eq!(state.store.adventurer(*id).unwrap().condition, Condition::Healthy);
        }
        assert_eq!(applied.injured.len() + applied.returned.len(), 3);
        assert_eq!(
            state.log.events_of_kind(GameEventKind::AdventurerInjured).count(),
            applied.injured.len()
        );
        assert!(parties.is_empty());
        assert_eq!(state.board.location(QuestId(1)), Some(QuestStatus::Completed));
    }

    #[test]
    fn test_partial_on_high_stakes_injures_weakest() {
        let config = BalanceConfig::default();
        let (mut state, mut guild, mut parties, party) = active_quest(
            sample_quest(1, Stakes::High),
            vec![
                adventurer(1, AdventurerClass::Warrior, 12),
                adventurer(2, AdventurerClass::Rogue, 4),
                adventurer(3, AdventurerClass::Mage, 7),
            ],
            true,
        );
        let treasury = guild.treasury;
        let quest = state.store.quest(QuestId(1)).unwrap().clone();
        let chance = quest_success_chance(&quest, &party, &state.store, Difficulty::Normal, &config).unwrap();
        let mut roll = FixedRoll(chance + config.partial_band / 2.0);
        let result = simulate_quest(&quest, &party, &state.store, Difficulty::Normal, &config, &mut roll).unwrap();
        assert_eq!(result.outcome, QuestOutcome::Partial);

        let applied = apply_quest_results(&result, &mut state, &mut guild, &mut parties, &config).unwrap();

        assert_eq!(applied.injured, vec![AdventurerId(2)]);
        assert!(state.store.adventurer(AdventurerId(2)).unwrap().is_injured());
        assert_eq!(state.store.adventurer(AdventurerId(1)).unwrap().condition, Condition::Healthy);
        assert_eq!(state.store.adventurer(AdventurerId(3)).unwrap().condition, Condition::Healthy);
        assert_eq!(guild.treasury, treasury + quest.reward / 2);
    }

    #[test]
    fn test_fallen_adventurer_is_removed_for_good() {
        let config = BalanceConfig::default();
        let mut quest = sample_quest(1, Stakes::Deadly);
        quest.difficulty = 10_000;
        let (mut state, mut guild, mut parties, party) = active_quest(
            quest,
            vec![
                adventurer(1, AdventurerClass::Warrior, 12),
                adventurer(2, AdventurerClass::Rogue, 4),
                adventurer(3, AdventurerClass::Mage, 7),
                adventurer(4, AdventurerClass::Cleric, 9),
            ],
            true,
        );
        let quest = state.store.quest(QuestId(1)).unwrap().clone();
        let result =
            simulate_quest(&quest, &party, &state.store, Difficulty::Normal, &config, &mut FixedRoll(0.999)).unwrap();

        let applied = apply_quest_results(&result, &mut state, &mut guild, &mut parties, &config).unwrap();

        assert_eq!(applied.killed, vec![AdventurerId(2)]);
        assert!(!state.store.contains_adventurer(AdventurerId(2)));
        assert_eq!(state.store.adventurer_count(), 3);
        assert!(!parties.is_engaged(AdventurerId(2)));
        assert_eq!(
            state
                .log
                .events_for_adventurer(AdventurerId(2))
                .filter(|e| e.kind == GameEventKind::AdventurerKilled)
                .count(),
            1
        );
        assert!(state.store.adventurer(AdventurerId(3)).unwrap().is_injured());
        assert!(state.store.adventurer(AdventurerId(4)).unwrap().is_injured());
        assert_eq!(state.store.adventurer(AdventurerId(1)).unwrap().condition, Condition::Healthy);

        // The fallen id is never handed out again
        assert_eq!(state.store.next_adventurer_id(), AdventurerId(5));
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        use rand::SeedableRng;
        use rand_chacha::ChaCha8Rng;

        let quest = sample_quest(1, Stakes::Medium);
        let store = store_with(vec![
            adventurer(1, AdventurerClass::Warrior, 8),
            adventurer(2, AdventurerClass::Mage, 6),
        ]);
        let config = BalanceConfig::default();
        let p = party(1, &[1, 2]);

        let a = simulate_quest(&quest, &p, &store, Difficulty::Hard, &config, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        let b = simulate_quest(&quest, &p, &store, Difficulty::Hard, &config, &mut ChaCha8Rng::seed_from_u64(99)).unwrap();
        assert_eq!(a, b);
    }
}
