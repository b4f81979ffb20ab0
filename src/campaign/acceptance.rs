//! Quest acceptance - party validation and reservation
//!
//! Acceptance is all-or-nothing: every check runs against unmodified state,
//! and only a fully valid request touches the quest, the adventurers and the
//! party registry.

use crate::campaign::events::{GameEventKind, RelatedEntity};
use crate::campaign::party::{PartyRegistry, QuestParty};
use crate::campaign::state::GameState;
use crate::core::error::{GuildError, Result, Unavailability};
use crate::core::types::{AdventurerId, QuestId};
use crate::entity::adventurer::Condition;
use crate::entity::guild::Guild;
use crate::entity::quest::QuestStatus;

/// Check a proposed party without changing anything
pub fn validate_party(
    quest_id: QuestId,
    members: &[AdventurerId],
    state: &GameState,
    guild: &Guild,
    parties: &PartyRegistry,
) -> Result<()> {
    let quest = state.store.quest(quest_id)?;
    if quest.status != QuestStatus::Available || state.board.location(quest_id) != Some(QuestStatus::Available) {
        return Err(GuildError::QuestNotAvailable(quest_id));
    }

    if members.len() < quest.min_party_size {
        return Err(GuildError::PartyTooSmall {
            quest: quest_id,
            size: members.len(),
            minimum: quest.min_party_size,
        });
    }
    if members.len() > quest.max_party_size {
        return Err(GuildError::PartyTooLarge {
            quest: quest_id,
            size: members.len(),
            maximum: quest.max_party_size,
        });
    }

    for (i, member) in members.iter().enumerate() {
        let adventurer = state.store.adventurer(*member)?;

        if members[..i].contains(member) {
            return Err(GuildError::MemberUnavailable {
                adventurer: *member,
                reason: Unavailability::Duplicate,
            });
        }
        if let Some(engaged) = parties.engagement(*member) {
            return Err(GuildError::MemberUnavailable {
                adventurer: *member,
                reason: Unavailability::Engaged(engaged),
            });
        }
        if adventurer.is_injured() {
            return Err(GuildError::MemberUnavailable {
                adventurer: *member,
                reason: Unavailability::Injured,
            });
        }
    }

    if guild.reputation < quest.required_reputation {
        return Err(GuildError::ReputationTooLow {
            quest: quest_id,
            required: quest.required_reputation,
            actual: guild.reputation,
        });
    }
    if quest.required_tier.outranks(&guild.tier) {
        return Err(GuildError::TierTooLow {
            quest: quest_id,
            required: quest.required_tier,
            actual: guild.tier,
        });
    }

    Ok(())
}

/// Accept a quest for a party: reserve the members, mark them fatigued and
/// move the quest to the active collection.
pub fn accept_quest(
    quest_id: QuestId,
    members: &[AdventurerId],
    state: &mut GameState,
    guild: &Guild,
    parties: &mut PartyRegistry,
) -> Result<QuestParty> {
    validate_party(quest_id, members, state, guild, parties)?;

    let weeks_elapsed = state.calendar.weeks_elapsed();
    let party = QuestParty {
        quest: quest_id,
        members: members.to_vec(),
        departed_week: weeks_elapsed,
    };

    parties
        .assign(party.clone())
        .map_err(|taken| GuildError::MemberUnavailable {
            adventurer: taken,
            reason: Unavailability::Engaged(parties.engagement(taken).unwrap_or(quest_id)),
        })?;

    for member in members {
        state.store.adventurer_mut(*member)?.condition = Condition::Fatigued;
    }

    let quest = state.store.quest_mut(quest_id)?;
    quest.status = QuestStatus::InProgress;
    quest.accepted_week = Some(weeks_elapsed);
    let title = quest.title.clone();
    state.board.activate(quest_id);

    state.log.record(
        GameEventKind::QuestAccepted,
        format!("A party of {} set out on '{}'", members.len(), title),
        state.calendar.date(),
        Some(RelatedEntity::Quest(quest_id)),
    );
    tracing::info!(quest = %quest_id, party = members.len(), "quest accepted");

    Ok(party)
}
