//! End-to-end campaign scenarios

use guildhall::campaign::acceptance::accept_quest;
use guildhall::campaign::progression::weekly_costs;
use guildhall::campaign::resolution::{apply_quest_results, simulate_quest, FixedRoll};
use guildhall::campaign::{Campaign, GameEventKind, GameState, PartyRegistry};
use guildhall::core::config::BalanceConfig;
use guildhall::core::error::{ErrorCategory, GuildError};
use guildhall::core::types::{AdventurerId, Difficulty, GuildTier, QuestId};
use guildhall::entity::{
    Adventurer, AdventurerClass, Condition, Guild, Quest, QuestOutcome, QuestStatus, QuestType, Race, Stakes,
    StatBlock,
};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn post_custom_quest(campaign: &mut Campaign, stakes: Stakes, min: usize, max: usize, reward: i64) -> QuestId {
    let state = campaign.state_mut();
    let id = state.store.next_quest_id();
    state.store.insert_quest(Quest {
        id,
        title: "Clear the cellar".into(),
        quest_type: QuestType::Hunt,
        stakes,
        difficulty: stakes.base_difficulty(),
        reward,
        experience: stakes.base_experience(),
        min_party_size: min,
        max_party_size: max,
        required_reputation: 0,
        required_tier: GuildTier::Fledgling,
        status: QuestStatus::Available,
        posted_week: 0,
        accepted_week: None,
        outcome: None,
    });
    state.board.post(id);
    id
}

fn assert_invariants(campaign: &Campaign) {
    campaign.verify_integrity().unwrap();
    for party in campaign.parties().parties() {
        for member in &party.members {
            assert_eq!(campaign.parties().engagement(*member), Some(party.quest));
        }
    }
}

#[test]
fn scenario_a_board_is_topped_up_to_target() {
    let config = BalanceConfig {
        starting_quests: 3,
        ..BalanceConfig::default()
    };
    let mut campaign = Campaign::new("Scenario A", 11, Difficulty::Normal, config).unwrap();
    assert_eq!(campaign.state().board.available().len(), 3);
    assert!(campaign.state().board.active().is_empty());

    let report = campaign.advance_week();

    assert!(report.resolved.is_empty());
    assert_eq!(report.quests_posted.len(), 5);
    assert_eq!(campaign.state().board.available().len(), 8);
    assert_invariants(&campaign);
}

#[test]
fn scenario_b_undersized_party_is_rejected_without_mutation() {
    let mut campaign = Campaign::new("Scenario B", 12, Difficulty::Normal, BalanceConfig::default()).unwrap();
    let quest = post_custom_quest(&mut campaign, Stakes::Medium, 2, 4, 150);
    let member = campaign.state().store.roster_ids()[0];

    let state_before = campaign.state().clone();
    let guild_before = campaign.guild().clone();
    let parties_before = campaign.parties().clone();

    let err = campaign.accept_quest(quest, &[member]).unwrap_err();
    assert!(matches!(err, GuildError::PartyTooSmall { size: 1, minimum: 2, .. }));
    assert_eq!(err.category(), ErrorCategory::Validation);

    assert_eq!(campaign.state(), &state_before);
    assert_eq!(campaign.guild(), &guild_before);
    assert_eq!(campaign.parties(), &parties_before);
}

#[test]
fn scenario_c_quest_resolves_after_one_week() {
    let mut campaign = Campaign::new("Scenario C", 13, Difficulty::Normal, BalanceConfig::default()).unwrap();
    let quest = post_custom_quest(&mut campaign, Stakes::Low, 1, 3, 100);
    let party: Vec<AdventurerId> = campaign.state().store.roster_ids().into_iter().take(2).collect();

    campaign.accept_quest(quest, &party).unwrap();
    assert_eq!(campaign.state().board.active(), &[quest]);
    for member in &party {
        assert_eq!(
            campaign.state().store.adventurer(*member).unwrap().condition,
            Condition::Fatigued
        );
    }

    let expected = campaign.guild().treasury + campaign.guild().weekly_income(campaign.config())
        - weekly_costs(campaign.guild(), campaign.state(), campaign.config())
        + 100;

    let report = campaign.advance_week_with(&mut FixedRoll(0.0));

    assert_eq!(report.resolved.len(), 1);
    assert_eq!(report.resolved[0].outcome, QuestOutcome::Success);
    assert!(campaign.state().board.active().is_empty());
    assert!(campaign.state().board.completed().contains(&quest));
    assert_eq!(
        campaign.state().store.quest(quest).unwrap().status,
        QuestStatus::Completed
    );
    for member in &party {
        assert_eq!(
            campaign.state().store.adventurer(*member).unwrap().condition,
            Condition::Healthy
        );
        assert!(!campaign.parties().is_engaged(*member));
    }
    assert_eq!(campaign.guild().treasury, expected);
    assert_eq!(campaign.state().log.events_for_quest(quest).count(), 2);
    assert_invariants(&campaign);
}

#[test]
fn scenario_d_shortfall_flags_financial_trouble() {
    let config = BalanceConfig {
        base_weekly_income: 10,
        ..BalanceConfig::default()
    };
    let mut campaign = Campaign::new("Scenario D", 14, Difficulty::Normal, config).unwrap();
    campaign.guild_mut().treasury = 0;

    let income = campaign.guild().weekly_income(campaign.config());
    let costs = weekly_costs(campaign.guild(), campaign.state(), campaign.config());
    assert!(income < costs);

    let report = campaign.advance_week();

    assert!(report.settlement.shortfall);
    assert!(campaign.guild().in_financial_trouble);
    assert_eq!(campaign.guild().treasury, income - costs);
    assert_eq!(campaign.state().calendar.weeks_elapsed(), 1);
    assert_eq!(
        campaign
            .state()
            .log
            .events_of_kind(GameEventKind::FinancialTrouble)
            .count(),
        1
    );
}

#[test]
fn applying_a_result_twice_never_double_credits() {
    let config = BalanceConfig::default();
    let mut state = GameState::new("Idempotence".into(), Difficulty::Normal);
    let mut guild = Guild::new("Idempotence".into(), &config);
    let mut parties = PartyRegistry::new();

    for id in 1..=2 {
        state.store.insert_adventurer(Adventurer::new(
            AdventurerId(id),
            format!("Adv {id}"),
            AdventurerClass::Ranger,
            Race::Elf,
            StatBlock::new(9, 9, 6, 7, 5),
        ));
    }
    let quest_id = state.store.next_quest_id();
    state.store.insert_quest(Quest {
        id: quest_id,
        title: "Escort the tithe wagons".into(),
        quest_type: QuestType::Escort,
        stakes: Stakes::Low,
        difficulty: 30,
        reward: 90,
        experience: 40,
        min_party_size: 1,
        max_party_size: 3,
        required_reputation: 0,
        required_tier: GuildTier::Fledgling,
        status: QuestStatus::Available,
        posted_week: 0,
        accepted_week: None,
        outcome: None,
    });
    state.board.post(quest_id);

    let party = accept_quest(quest_id, &[AdventurerId(1), AdventurerId(2)], &mut state, &guild, &mut parties).unwrap();
    let quest = state.store.quest(quest_id).unwrap().clone();
    let result = simulate_quest(&quest, &party, &state.store, Difficulty::Normal, &config, &mut FixedRoll(0.1)).unwrap();

    apply_quest_results(&result, &mut state, &mut guild, &mut parties, &config).unwrap();
    let treasury = guild.treasury;
    let reputation = guild.reputation;
    let log_len = state.log.len();

    let err = apply_quest_results(&result, &mut state, &mut guild, &mut parties, &config).unwrap_err();
    assert!(matches!(err, GuildError::QuestAlreadyResolved(id) if id == quest_id));
    assert_eq!(guild.treasury, treasury);
    assert_eq!(guild.reputation, reputation);
    assert_eq!(state.log.len(), log_len);
}

#[test]
fn simulation_is_deterministic_for_a_fixed_seed() {
    let campaign = Campaign::new("Determinism", 21, Difficulty::Hard, BalanceConfig::default()).unwrap();
    let state = campaign.state();
    let quest_id = state.board.available()[0];
    let quest = state.store.quest(quest_id).unwrap();
    let party = guildhall::campaign::QuestParty {
        quest: quest_id,
        members: state.store.roster_ids(),
        departed_week: 0,
    };

    let first = simulate_quest(
        quest,
        &party,
        &state.store,
        state.difficulty,
        campaign.config(),
        &mut ChaCha8Rng::seed_from_u64(77),
    )
    .unwrap();
    let second = simulate_quest(
        quest,
        &party,
        &state.store,
        state.difficulty,
        campaign.config(),
        &mut ChaCha8Rng::seed_from_u64(77),
    )
    .unwrap();

    assert_eq!(first, second);
    assert_eq!(first.success_chance.to_bits(), second.success_chance.to_bits());
}

#[test]
fn long_campaign_keeps_invariants() {
    let mut campaign = Campaign::new("Marathon", 99, Difficulty::Easy, BalanceConfig::default()).unwrap();

    for _ in 0..30 {
        // Send the first free adventurers on the first quest they can take
        let available: Vec<QuestId> = campaign.state().board.available().to_vec();
        let free: Vec<AdventurerId> = campaign
            .state()
            .store
            .roster()
            .into_iter()
            .filter(|a| !campaign.parties().is_engaged(a.id) && !a.is_injured())
            .map(|a| a.id)
            .collect();
        for quest in available {
            let min = campaign.state().store.quest(quest).unwrap().min_party_size;
            if free.len() >= min && campaign.accept_quest(quest, &free[..min]).is_ok() {
                break;
            }
        }

        campaign.advance_week();
        assert_invariants(&campaign);
        assert!(campaign.state().board.available().len() >= campaign.config().board_floor);
    }

    assert_eq!(campaign.state().calendar.weeks_elapsed(), 30);
    assert!(!campaign.state().board.completed().is_empty());
}
