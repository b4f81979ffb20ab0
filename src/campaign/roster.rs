//! Roster and guild management between ticks

use crate::campaign::events::{GameEventKind, RelatedEntity};
use crate::campaign::party::PartyRegistry;
use crate::campaign::state::GameState;
use crate::core::config::BalanceConfig;
use crate::core::error::{GuildError, Result, Unavailability};
use crate::core::types::{AdventurerId, Gold, QuestId};
use crate::entity::adventurer::Adventurer;
use crate::entity::guild::{FacilityKind, Guild, Staff};
use crate::entity::quest::QuestStatus;

fn charge(guild: &mut Guild, cost: Gold) -> Result<()> {
    if guild.treasury < cost {
        return Err(GuildError::InsufficientFunds {
            needed: cost,
            available: guild.treasury,
        });
    }
    guild.treasury -= cost;
    Ok(())
}

/// Sign a candidate to the roster for the recruitment fee.
///
/// Candidate ids are provisional; the store assigns the permanent one.
pub fn recruit(
    mut candidate: Adventurer,
    state: &mut GameState,
    guild: &mut Guild,
    config: &BalanceConfig,
) -> Result<AdventurerId> {
    let capacity = guild.roster_capacity(config);
    if state.store.adventurer_count() >= capacity {
        return Err(GuildError::RosterFull { capacity });
    }
    charge(guild, config.recruit_cost)?;

    let id = state.store.next_adventurer_id();
    candidate.id = id;
    state.log.record(
        GameEventKind::AdventurerRecruited,
        format!("{} the {:?} joined the guild", candidate.name, candidate.class),
        state.calendar.date(),
        Some(RelatedEntity::Adventurer(id)),
    );
    state.store.insert_adventurer(candidate);
    tracing::info!(adventurer = %id, "adventurer recruited");
    Ok(id)
}

/// Release an adventurer who is not out on a quest
pub fn dismiss(adventurer: AdventurerId, state: &mut GameState, parties: &PartyRegistry) -> Result<Adventurer> {
    state.store.adventurer(adventurer)?;
    if let Some(quest) = parties.engagement(adventurer) {
        return Err(GuildError::MemberUnavailable {
            adventurer,
            reason: Unavailability::Engaged(quest),
        });
    }

    let dismissed = state.store.remove_adventurer(adventurer)?;
    state.log.record(
        GameEventKind::AdventurerDismissed,
        format!("{} left the guild", dismissed.name),
        state.calendar.date(),
        Some(RelatedEntity::Adventurer(adventurer)),
    );
    Ok(dismissed)
}

pub fn hire_staff(staff: Staff, state: &mut GameState, guild: &mut Guild) {
    state.log.record(
        GameEventKind::StaffHired,
        format!("Hired {} as {:?} ({} gold a week)", staff.name, staff.role, staff.weekly_salary),
        state.calendar.date(),
        Some(RelatedEntity::Guild),
    );
    guild.staff.push(staff);
}

pub fn dismiss_staff(index: usize, state: &mut GameState, guild: &mut Guild) -> Result<Staff> {
    if index >= guild.staff.len() {
        return Err(GuildError::StaffNotFound(index));
    }
    let staff = guild.staff.remove(index);
    state.log.record(
        GameEventKind::StaffDismissed,
        format!("{} the {:?} was let go", staff.name, staff.role),
        state.calendar.date(),
        Some(RelatedEntity::Guild),
    );
    Ok(staff)
}

/// Cost of taking a facility to its next level
pub fn facility_cost(guild: &Guild, kind: FacilityKind, config: &BalanceConfig) -> Gold {
    config.facility_cost * (guild.facility_level(kind) as Gold + 1)
}

/// Build or upgrade a facility. Never takes the treasury below zero.
pub fn build_facility(
    kind: FacilityKind,
    state: &mut GameState,
    guild: &mut Guild,
    config: &BalanceConfig,
) -> Result<u32> {
    let cost = facility_cost(guild, kind, config);
    charge(guild, cost)?;
    let level = guild.upgrade_facility(kind);

    state.log.record(
        GameEventKind::FacilityBuilt,
        format!("{kind:?} raised to level {level} for {cost} gold"),
        state.calendar.date(),
        Some(RelatedEntity::Guild),
    );
    tracing::info!(facility = ?kind, level, cost, "facility built");
    Ok(level)
}

/// In-progress quests can't be called back
pub fn cancel_quest(quest: QuestId, state: &GameState) -> Result<()> {
    match state.store.quest(quest)?.status {
        QuestStatus::InProgress => Err(GuildError::CancellationUnsupported(quest)),
        QuestStatus::Available | QuestStatus::Completed => Err(GuildError::QuestNotActive(quest)),
    }
}
