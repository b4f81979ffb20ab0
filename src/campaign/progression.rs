//! Time progression - the weekly tick
//!
//! One call to `advance_week` runs the whole week in a fixed order:
//!
//! 1. Injury recovery
//! 2. Financial settlement
//! 3. Resolution of every active quest, in board order
//! 4. Tier promotion check
//! 5. Quest board replenishment
//! 6. Calendar advance
//!
//! Each step finishes before the next begins and the tick itself never
//! fails. A quest whose party can't be resolved is left active, logged, and
//! retried on the next tick.

use rand::Rng;

use crate::campaign::events::{GameEventKind, RelatedEntity};
use crate::campaign::generation::generate_available_quests;
use crate::campaign::party::PartyRegistry;
use crate::campaign::resolution::{apply_quest_results, simulate_quest, AppliedResult, OutcomeSampler};
use crate::campaign::state::GameState;
use crate::core::calendar::{GameDate, SeasonPhase};
use crate::core::config::BalanceConfig;
use crate::core::error::GuildError;
use crate::core::types::{AdventurerId, Gold, GuildTier, QuestId};
use crate::entity::guild::{Guild, Settlement, StaffRole};

/// Everything that happened during one tick
#[derive(Debug, Clone, PartialEq)]
pub struct WeekReport {
    /// Date the campaign moved to
    pub date: GameDate,
    pub settlement: Settlement,
    pub resolved: Vec<AppliedResult>,
    /// Active quests skipped because their party is inconsistent
    pub deferred: Vec<QuestId>,
    pub recovered: Vec<AdventurerId>,
    pub quests_posted: Vec<QuestId>,
    pub promoted: Option<GuildTier>,
    pub season_phase_changed: Option<SeasonPhase>,
}

/// Total weekly costs: overhead plus wages for the whole roster
pub fn weekly_costs(guild: &Guild, state: &GameState, config: &BalanceConfig) -> Gold {
    let wages: Gold = state
        .store
        .adventurers()
        .map(|a| a.weekly_wage(config.wage_per_level))
        .sum();
    guild.weekly_overhead(config) + wages
}

/// How many quests a replenishment would post right now
pub fn replenishment_count(guild: &Guild, state: &GameState, config: &BalanceConfig) -> usize {
    let available = state.board.available().len();
    if available >= config.board_floor {
        return 0;
    }
    config.board_target.saturating_sub(available) + guild.staff_count(StaffRole::Scout)
}

/// Generate and post quests until the board is back at its target
pub fn replenish_board<R: Rng + ?Sized>(
    state: &mut GameState,
    guild: &Guild,
    config: &BalanceConfig,
    rng: &mut R,
) -> Vec<QuestId> {
    let count = replenishment_count(guild, state, config);
    if count == 0 {
        return Vec::new();
    }
    post_quests(state, guild, config, count, rng)
}

/// Generate `count` quests and post them to the available collection
pub fn post_quests<R: Rng + ?Sized>(
    state: &mut GameState,
    guild: &Guild,
    config: &BalanceConfig,
    count: usize,
    rng: &mut R,
) -> Vec<QuestId> {
    let week = state.calendar.weeks_elapsed();
    let quests = generate_available_quests(guild, count, &mut state.store, config, week, rng);

    let posted: Vec<QuestId> = quests.iter().map(|q| q.id).collect();
    for quest in quests {
        let id = quest.id;
        state.store.insert_quest(quest);
        state.board.post(id);
    }

    if !posted.is_empty() {
        state.log.record(
            GameEventKind::QuestsPosted,
            format!("{} new quests posted to the board", posted.len()),
            state.calendar.date(),
            Some(RelatedEntity::Guild),
        );
    }
    posted
}

fn recover_injuries(state: &mut GameState, guild: &Guild) -> Vec<AdventurerId> {
    let rate = guild.recovery_rate();
    let date = state.calendar.date();
    let mut recovered = Vec::new();

    for id in state.store.roster_ids() {
        let Ok(adventurer) = state.store.adventurer_mut(id) else {
            continue;
        };
        if adventurer.recover(rate) {
            let message = format!("{} has recovered from their injuries", adventurer.name);
            state.log.record(
                GameEventKind::AdventurerRecovered,
                message,
                date,
                Some(RelatedEntity::Adventurer(id)),
            );
            recovered.push(id);
        }
    }
    recovered
}

fn settle_finances(state: &mut GameState, guild: &mut Guild, config: &BalanceConfig) -> Settlement {
    let income = guild.weekly_income(config);
    let costs = weekly_costs(guild, state, config);
    let settlement = guild.settle_week(income, costs);
    let date = state.calendar.date();

    state.log.record(
        GameEventKind::WeekSettled,
        format!(
            "Week settled: +{} income, -{} costs, treasury {}",
            settlement.income, settlement.costs, settlement.treasury_after
        ),
        date,
        Some(RelatedEntity::Guild),
    );

    if settlement.shortfall {
        state.log.record(
            GameEventKind::FinancialTrouble,
            format!(
                "{} could not cover its costs (treasury {})",
                guild.name, settlement.treasury_after
            ),
            date,
            Some(RelatedEntity::Guild),
        );
        tracing::warn!(
            treasury = settlement.treasury_after,
            weeks = guild.weeks_in_trouble,
            "guild in financial trouble"
        );
    }
    settlement
}

/// Resolve every active quest once. Returns committed results and the ids
/// of quests deferred to the next tick.
fn resolve_active_quests<R: Rng + ?Sized>(
    state: &mut GameState,
    guild: &mut Guild,
    parties: &mut PartyRegistry,
    config: &BalanceConfig,
    rng: &mut R,
    mut roll_override: Option<&mut dyn OutcomeSampler>,
) -> (Vec<AppliedResult>, Vec<QuestId>) {
    let mut resolved = Vec::new();
    let mut deferred = Vec::new();

    let active: Vec<QuestId> = state.board.active().to_vec();
    for quest_id in active {
        let simulated = match (state.store.quest(quest_id), parties.party(quest_id)) {
            (Ok(quest), Some(party)) => match roll_override.as_deref_mut() {
                Some(sampler) => simulate_quest(quest, party, &state.store, state.difficulty, config, sampler),
                None => simulate_quest(quest, party, &state.store, state.difficulty, config, rng),
            },
            (Ok(_), None) => Err(GuildError::PartyMissing(quest_id)),
            (Err(err), _) => Err(err),
        };

        let outcome = simulated.and_then(|result| apply_quest_results(&result, state, guild, parties, config));
        match outcome {
            Ok(applied) => resolved.push(applied),
            Err(err) => {
                state.log.record(
                    GameEventKind::ResolutionDeferred,
                    format!("Resolution of {quest_id} deferred: {err}"),
                    state.calendar.date(),
                    Some(RelatedEntity::Quest(quest_id)),
                );
                tracing::warn!(
                    quest = %quest_id,
                    error = %err,
                    category = ?err.category(),
                    "quest resolution deferred"
                );
                deferred.push(quest_id);
            }
        }
    }

    (resolved, deferred)
}

/// Advance the campaign by one week.
///
/// `roll_override` replaces the RNG for the pass/fail rolls only; quest
/// generation always draws from `rng`.
pub fn advance_week<R: Rng + ?Sized>(
    state: &mut GameState,
    guild: &mut Guild,
    parties: &mut PartyRegistry,
    config: &BalanceConfig,
    rng: &mut R,
    roll_override: Option<&mut dyn OutcomeSampler>,
) -> WeekReport {
    let recovered = recover_injuries(state, guild);
    let settlement = settle_finances(state, guild, config);
    let (resolved, deferred) = resolve_active_quests(state, guild, parties, config, rng, roll_override);

    let promoted = guild.check_promotion(config);
    if let Some(tier) = promoted {
        state.log.record(
            GameEventKind::TierPromoted,
            format!("{} is now a {} guild", guild.name, tier),
            state.calendar.date(),
            Some(RelatedEntity::Guild),
        );
        tracing::info!(%tier, reputation = guild.reputation, "guild promoted");
    }

    let quests_posted = replenish_board(state, guild, config, rng);

    let advance = state.calendar.advance();
    let season_phase_changed = if advance.phase_changed {
        let phase = state.calendar.season_phase();
        let message = if advance.season_rolled {
            format!("Season {} begins with the {}", state.calendar.current_season(), phase)
        } else {
            format!("The {} begins", phase)
        };
        state.log.record(
            GameEventKind::SeasonPhaseChanged,
            message,
            state.calendar.date(),
            None,
        );
        Some(phase)
    } else {
        None
    };

    tracing::debug!(
        date = %state.calendar.date(),
        resolved = resolved.len(),
        deferred = deferred.len(),
        posted = quests_posted.len(),
        treasury = guild.treasury,
        "week advanced"
    );

    WeekReport {
        date: state.calendar.date(),
        settlement,
        resolved,
        deferred,
        recovered,
        quests_posted,
        promoted,
        season_phase_changed,
    }
}
