use guildhall::campaign::Campaign;
use guildhall::core::config::BalanceConfig;
use guildhall::core::types::{AdventurerId, Difficulty, QuestId};
use guildhall::entity::QuestStatus;
use guildhall::persistence::{self, MemorySaveStore};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Accept { quest: usize, members: Vec<usize> },
    Advance,
    Recruit,
    Dismiss(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0_usize..10, prop::collection::vec(0_usize..12, 0..7))
            .prop_map(|(quest, members)| Op::Accept { quest, members }),
        4 => Just(Op::Advance),
        1 => Just(Op::Recruit),
        1 => (0_usize..12).prop_map(Op::Dismiss),
    ]
}

fn difficulty() -> impl Strategy<Value = Difficulty> {
    prop_oneof![
        Just(Difficulty::Easy),
        Just(Difficulty::Normal),
        Just(Difficulty::Hard),
        Just(Difficulty::Brutal),
    ]
}

fn pick<T: Copy>(items: &[T], index: usize) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[index % items.len()])
    }
}

fn apply(campaign: &mut Campaign, op: &Op) {
    match op {
        Op::Accept { quest, members } => {
            let Some(quest) = pick::<QuestId>(campaign.state().board.available(), *quest) else {
                return;
            };
            let roster = campaign.state().store.roster_ids();
            let members: Vec<AdventurerId> = members.iter().filter_map(|i| pick(&roster, *i)).collect();
            let _ = campaign.accept_quest(quest, &members);
        }
        Op::Advance => {
            campaign.advance_week();
        }
        Op::Recruit => {
            if let Some(candidate) = campaign.generate_recruits(1).pop() {
                let _ = campaign.recruit(candidate);
            }
        }
        Op::Dismiss(index) => {
            let roster = campaign.state().store.roster_ids();
            if let Some(id) = pick(&roster, *index) {
                let _ = campaign.dismiss(id);
            }
        }
    }
}

fn check_invariants(campaign: &Campaign) -> Result<(), TestCaseError> {
    prop_assert!(campaign.verify_integrity().is_ok(), "{:?}", campaign.verify_integrity());

    for party in campaign.parties().parties() {
        let quest = campaign.state().store.quest(party.quest);
        prop_assert!(quest.is_ok());
        prop_assert_eq!(quest.map(|q| q.status).ok(), Some(QuestStatus::InProgress));
        for member in &party.members {
            prop_assert_eq!(campaign.parties().engagement(*member), Some(party.quest));
            prop_assert!(campaign.state().store.contains_adventurer(*member));
        }
    }

    for quest in campaign.state().board.active() {
        prop_assert!(campaign.parties().party(*quest).is_some());
    }

    prop_assert!(campaign.state().calendar.is_valid());
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn random_play_keeps_the_campaign_consistent(
        seed in 0_u64..10_000,
        difficulty in difficulty(),
        ops in prop::collection::vec(op(), 1..40),
    ) {
        let mut campaign = Campaign::new("Property", seed, difficulty, BalanceConfig::default()).unwrap();
        check_invariants(&campaign)?;

        for op in &ops {
            apply(&mut campaign, op);
            check_invariants(&campaign)?;
        }
    }

    #[test]
    fn rejected_acceptance_changes_nothing(
        seed in 0_u64..10_000,
        quest in 0_usize..10,
        members in prop::collection::vec(0_usize..12, 0..7),
    ) {
        let mut campaign = Campaign::new("Atomic", seed, Difficulty::Normal, BalanceConfig::default()).unwrap();
        campaign.advance_week();
        let state = campaign.state().clone();
        let guild = campaign.guild().clone();
        let parties = campaign.parties().clone();

        let Some(quest) = pick::<QuestId>(campaign.state().board.available(), quest) else {
            return Ok(());
        };
        let roster = campaign.state().store.roster_ids();
        let members: Vec<AdventurerId> = members.iter().filter_map(|i| pick(&roster, *i)).collect();

        if campaign.accept_quest(quest, &members).is_err() {
            prop_assert_eq!(campaign.state(), &state);
            prop_assert_eq!(campaign.guild(), &guild);
            prop_assert_eq!(campaign.parties(), &parties);
        } else {
            prop_assert_eq!(campaign.state().board.location(quest), Some(QuestStatus::InProgress));
        }
    }

    #[test]
    fn same_seed_same_history(seed in 0_u64..10_000, weeks in 1_u32..16) {
        let mut a = Campaign::new("Twin", seed, Difficulty::Normal, BalanceConfig::default()).unwrap();
        let mut b = Campaign::new("Twin", seed, Difficulty::Normal, BalanceConfig::default()).unwrap();
        a.advance_weeks(weeks);
        b.advance_weeks(weeks);

        prop_assert_eq!(&a.state().store, &b.state().store);
        prop_assert_eq!(a.state().board.clone(), b.state().board.clone());
        prop_assert_eq!(a.guild(), b.guild());
    }

    #[test]
    fn save_load_preserves_any_reachable_state(
        seed in 0_u64..10_000,
        ops in prop::collection::vec(op(), 0..20),
    ) {
        let mut campaign = Campaign::new("Snapshot", seed, Difficulty::Normal, BalanceConfig::default()).unwrap();
        for op in &ops {
            apply(&mut campaign, op);
        }

        let mut store = MemorySaveStore::new();
        persistence::save(&mut store, "prop", &campaign).unwrap();
        let loaded = persistence::load(&store, "prop", BalanceConfig::default()).unwrap();

        prop_assert_eq!(loaded.state(), campaign.state());
        prop_assert_eq!(loaded.guild(), campaign.guild());
        prop_assert_eq!(loaded.parties(), campaign.parties());
    }
}
