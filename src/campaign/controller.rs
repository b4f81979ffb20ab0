//! Campaign controller
//!
//! `Campaign` owns the game state, the guild, the party registry and the
//! random stream. Every player intent goes through it, one call at a time,
//! and each call either completes or leaves the campaign untouched.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::campaign::acceptance;
use crate::campaign::events::{GameEventKind, RelatedEntity};
use crate::campaign::feedback::{Feedback, FeedbackSink, TracingFeedback};
use crate::campaign::generation::generate_recruit;
use crate::campaign::party::{PartyRegistry, QuestParty};
use crate::campaign::progression::{self, WeekReport};
use crate::campaign::resolution::{success_probability, OutcomeSampler};
use crate::campaign::roster;
use crate::campaign::state::GameState;
use crate::core::config::BalanceConfig;
use crate::core::error::Result;
use crate::core::types::{AdventurerId, Difficulty, QuestId};
use crate::entity::adventurer::Adventurer;
use crate::entity::guild::{FacilityKind, Guild, Staff};
use crate::entity::store::EntityStore;

pub struct Campaign {
    state: GameState,
    guild: Guild,
    parties: PartyRegistry,
    config: BalanceConfig,
    rng: ChaCha8Rng,
    seed: u64,
    feedback: Box<dyn FeedbackSink>,
}

impl Campaign {
    /// Start a new campaign with a starting roster and a full quest board
    pub fn new(name: impl Into<String>, seed: u64, difficulty: Difficulty, config: BalanceConfig) -> Result<Self> {
        config.validate()?;
        let name = name.into();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut state = GameState::new(name.clone(), difficulty);
        let guild = Guild::new(name.clone(), &config);

        for _ in 0..config.starting_roster {
            let recruit = generate_recruit(&mut state.store, &mut rng);
            state.store.insert_adventurer(recruit);
        }
        progression::post_quests(&mut state, &guild, &config, config.starting_quests, &mut rng);

        state.log.record(
            GameEventKind::CampaignStarted,
            format!("{name} opens its doors with {} adventurers", state.store.adventurer_count()),
            state.calendar.date(),
            Some(RelatedEntity::Guild),
        );
        tracing::info!(campaign = %state.campaign_id, %name, seed, ?difficulty, "campaign started");

        Ok(Self {
            state,
            guild,
            parties: PartyRegistry::new(),
            config,
            rng,
            seed,
            feedback: Box::new(TracingFeedback),
        })
    }

    /// Reassemble a campaign from restored parts
    pub(crate) fn from_parts(
        state: GameState,
        guild: Guild,
        parties: PartyRegistry,
        config: BalanceConfig,
        rng: ChaCha8Rng,
        seed: u64,
    ) -> Self {
        Self {
            state,
            guild,
            parties,
            config,
            rng,
            seed,
            feedback: Box::new(TracingFeedback),
        }
    }

    pub fn with_feedback(mut self, sink: impl FeedbackSink + 'static) -> Self {
        self.feedback = Box::new(sink);
        self
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for tooling and tests; bypasses validation
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn guild(&self) -> &Guild {
        &self.guild
    }

    pub fn guild_mut(&mut self) -> &mut Guild {
        &mut self.guild
    }

    pub fn parties(&self) -> &PartyRegistry {
        &self.parties
    }

    pub fn config(&self) -> &BalanceConfig {
        &self.config
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub(crate) fn rng(&self) -> &ChaCha8Rng {
        &self.rng
    }

    pub(crate) fn notify(&self, signal: Feedback) {
        self.feedback.notify(signal);
    }

    /// Swap in another campaign's contents, keeping this one's feedback sink
    pub(crate) fn replace_with(&mut self, other: Campaign) {
        let Campaign {
            state,
            guild,
            parties,
            config,
            rng,
            seed,
            feedback: _,
        } = other;
        self.state = state;
        self.guild = guild;
        self.parties = parties;
        self.config = config;
        self.rng = rng;
        self.seed = seed;
    }

    fn report<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(err) = &result {
            self.feedback.notify(Feedback::Error(err.to_string()));
        }
        result
    }

    pub fn accept_quest(&mut self, quest: QuestId, members: &[AdventurerId]) -> Result<QuestParty> {
        let result = acceptance::accept_quest(quest, members, &mut self.state, &self.guild, &mut self.parties);
        if result.is_ok() {
            self.feedback.notify(Feedback::QuestAccepted(quest));
        }
        self.report(result)
    }

    /// Success chance the party would have, without accepting anything
    pub fn preview_success_chance(&self, quest: QuestId, members: &[AdventurerId]) -> Result<f32> {
        let quest = self.state.store.quest(quest)?;
        let members = members
            .iter()
            .map(|id| self.state.store.adventurer(*id))
            .collect::<Result<Vec<&Adventurer>>>()?;
        Ok(success_probability(
            quest,
            &members,
            self.config.difficulty_multiplier(self.state.difficulty),
        ))
    }

    pub fn advance_week(&mut self) -> WeekReport {
        let report = progression::advance_week(
            &mut self.state,
            &mut self.guild,
            &mut self.parties,
            &self.config,
            &mut self.rng,
            None,
        );
        self.week_advanced(report)
    }

    /// Advance one week with every pass/fail roll drawn from `sampler`
    pub fn advance_week_with(&mut self, sampler: &mut dyn OutcomeSampler) -> WeekReport {
        let report = progression::advance_week(
            &mut self.state,
            &mut self.guild,
            &mut self.parties,
            &self.config,
            &mut self.rng,
            Some(sampler),
        );
        self.week_advanced(report)
    }

    pub fn advance_weeks(&mut self, weeks: u32) -> Vec<WeekReport> {
        (0..weeks).map(|_| self.advance_week()).collect()
    }

    fn week_advanced(&self, report: WeekReport) -> WeekReport {
        self.feedback.notify(Feedback::WeekAdvanced {
            weeks_elapsed: self.state.calendar.weeks_elapsed(),
        });
        report
    }

    /// Candidates for hire. Only the random stream advances; ids are
    /// provisional until `recruit`.
    pub fn generate_recruits(&mut self, count: usize) -> Vec<Adventurer> {
        let mut scratch = EntityStore::new();
        (0..count)
            .map(|_| generate_recruit(&mut scratch, &mut self.rng))
            .collect()
    }

    pub fn recruit(&mut self, candidate: Adventurer) -> Result<AdventurerId> {
        let result = roster::recruit(candidate, &mut self.state, &mut self.guild, &self.config);
        self.report(result)
    }

    pub fn dismiss(&mut self, adventurer: AdventurerId) -> Result<Adventurer> {
        let result = roster::dismiss(adventurer, &mut self.state, &self.parties);
        self.report(result)
    }

    pub fn hire_staff(&mut self, staff: Staff) {
        roster::hire_staff(staff, &mut self.state, &mut self.guild);
    }

    pub fn dismiss_staff(&mut self, index: usize) -> Result<Staff> {
        let result = roster::dismiss_staff(index, &mut self.state, &mut self.guild);
        self.report(result)
    }

    pub fn build_facility(&mut self, kind: FacilityKind) -> Result<u32> {
        let result = roster::build_facility(kind, &mut self.state, &mut self.guild, &self.config);
        self.report(result)
    }

    pub fn cancel_quest(&mut self, quest: QuestId) -> Result<()> {
        let result = roster::cancel_quest(quest, &self.state);
        self.report(result)
    }

    /// Structural invariants over the state and the party registry
    pub fn verify_integrity(&self) -> std::result::Result<(), String> {
        self.state.verify_integrity(&self.parties)
    }
}
