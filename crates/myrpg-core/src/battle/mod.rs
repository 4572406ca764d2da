//! Turn sequencer: the battle state machine.
//!
//! A [`Battle`] owns the roster and walks it round-robin:
//!
//! ```text
//! AwaitingRosterSetup --start--> [turn loop] --> Finished(Victory | Defeat)
//!                                    |   ^
//!                      player active |   | submit_player_action / pass_player_turn
//!                                    v   |
//!                              AwaitingPlayer
//! ```
//!
//! # Turn loop
//!
//! Each step of the loop behind `start`, `submit_player_action` and
//! `pass_player_turn`:
//!
//! 1. Terminal check: no living ally is Defeat, otherwise no living enemy
//!    is Victory. Defeat wins when both sides are empty.
//! 2. Activation cap: past `turn_limit` activations the battle is a Defeat.
//! 3. Scan circularly from the last active slot for the next living fighter.
//! 4. Tick cooldowns per [`CooldownTickPolicy`].
//! 5. Player fighters suspend the loop. AI fighters decide, resolve and the
//!    loop continues without returning to the caller.
//!
//! After the player's own action, Victory is checked immediately, before
//! the loop resumes.
//!
//! The loop only ever runs inside `start`, `submit_player_action` and
//! `pass_player_turn`. [`Battle::advance_turn`] is a read-only query: it
//! reports where control sits and never moves the turn on, so calling it
//! while the player is suspended cannot skip the player.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use myrpg_core::battle::{Battle, BattleReport, TurnState};
//! use myrpg_core::config::BattleConfig;
//! use myrpg_core::data::GameData;
//! use myrpg_core::fighter::FighterProfile;
//! use myrpg_core::skill::{EffectType, Skill, SkillId, TargetShape};
//!
//! let data = Arc::new(
//!     GameData::new()
//!         .with_skill(Skill::new("slash", 20, TargetShape::SingleEnemy, EffectType::Damage)),
//! );
//! let hero = Arc::new(FighterProfile::player("hero", "Hero", 100, 50).with_skills(&["slash"]));
//! let slime = Arc::new(FighterProfile::enemy("slime", "Slime", 15, 0).with_xp_reward(40));
//!
//! let mut battle = Battle::new(BattleConfig::default(), data.clone(), data);
//! let state = battle.start(hero, Vec::new(), vec![slime]).unwrap();
//! let target = battle.roster().ids().nth(1);
//! assert_eq!(state, TurnState::AwaitingPlayer { actor: battle.roster().ids().next().unwrap() });
//!
//! let state = battle.submit_player_action(&SkillId::new("slash"), target).unwrap();
//! assert!(matches!(state, TurnState::Finished(BattleReport::Victory { xp: 40, .. })));
//! ```

mod report;

pub use report::{BattleOutcome, BattleReport, DefeatReason, TurnState};

use std::sync::Arc;

use crate::ai::StrategyRegistry;
use crate::combat::{CombatResolver, ResolutionReport};
use crate::config::{BattleConfig, CooldownTickPolicy};
use crate::data::{FighterProfileProvider, LootTableProvider, PartyRosterProvider, SkillCatalog};
use crate::error::{CombatError, DataKind, InvalidActionReason, Result};
use crate::fighter::{Controller, Faction, Fighter, FighterId, FighterProfile, ProfileId};
use crate::loot::roll_loot;
use crate::observer::{BattleEvent, BattleObserver, TracingObserver};
use crate::rng::{RandomSource, SeededRandom};
use crate::roster::Roster;
use crate::skill::{Skill, SkillId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    AwaitingRosterSetup,
    AwaitingPlayer(FighterId),
    Finished(BattleReport),
}

// =============================================================================
// Battle
// =============================================================================

/// One battle from roster setup to Victory or Defeat.
pub struct Battle {
    config: BattleConfig,
    skills: Arc<dyn SkillCatalog>,
    loot_tables: Arc<dyn LootTableProvider>,
    strategies: StrategyRegistry,
    resolver: CombatResolver,
    observers: Vec<Box<dyn BattleObserver>>,
    rng: Box<dyn RandomSource>,
    roster: Roster,
    phase: Phase,
    /// Slot of the most recently activated fighter.
    cursor: Option<usize>,
    round: u32,
    activations: u32,
    defeated_enemies: Vec<FighterId>,
}

impl Battle {
    /// Creates a battle that has not started yet.
    ///
    /// The random source is seeded from `config.seed`, strategies come from
    /// [`StrategyRegistry::from_config`] and a [`TracingObserver`] is attached.
    #[must_use]
    pub fn new(
        config: BattleConfig,
        skills: Arc<dyn SkillCatalog>,
        loot_tables: Arc<dyn LootTableProvider>,
    ) -> Self {
        Self {
            rng: Box::new(SeededRandom::new(config.seed)),
            strategies: StrategyRegistry::from_config(&config),
            config,
            skills,
            loot_tables,
            resolver: CombatResolver::new(),
            observers: vec![Box::new(TracingObserver)],
            roster: Roster::new(),
            phase: Phase::AwaitingRosterSetup,
            cursor: None,
            round: 0,
            activations: 0,
            defeated_enemies: Vec::new(),
        }
    }

    /// Attaches another observer.
    #[must_use]
    pub fn with_observer(mut self, observer: impl BattleObserver + 'static) -> Self {
        self.observers.push(Box::new(observer));
        self
    }

    /// Replaces the random source.
    #[must_use]
    pub fn with_random_source(mut self, rng: impl RandomSource + 'static) -> Self {
        self.rng = Box::new(rng);
        self
    }

    /// Replaces the strategy registry.
    #[must_use]
    pub fn with_strategies(mut self, strategies: StrategyRegistry) -> Self {
        self.strategies = strategies;
        self
    }

    // -------------------------------------------------------------------------
    // Accessors
    // -------------------------------------------------------------------------

    /// The battle configuration.
    #[must_use]
    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    /// The fighters, in turn order.
    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    /// Current round, starting at 1 with the first activation.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// Fighter activations so far.
    #[must_use]
    pub fn activations(&self) -> u32 {
        self.activations
    }

    /// The most recently activated fighter.
    #[must_use]
    pub fn active_fighter(&self) -> Option<FighterId> {
        self.cursor.and_then(|slot| self.roster.ids().nth(slot))
    }

    /// Enemies defeated so far, in the order they fell.
    #[must_use]
    pub fn defeated_enemies(&self) -> &[FighterId] {
        &self.defeated_enemies
    }

    /// Coarse battle state.
    #[must_use]
    pub fn outcome(&self) -> BattleOutcome {
        match &self.phase {
            Phase::Finished(report) => report.outcome(),
            Phase::AwaitingRosterSetup | Phase::AwaitingPlayer(_) => BattleOutcome::InProgress,
        }
    }

    /// The final report, once finished.
    #[must_use]
    pub fn report(&self) -> Option<&BattleReport> {
        match &self.phase {
            Phase::Finished(report) => Some(report),
            Phase::AwaitingRosterSetup | Phase::AwaitingPlayer(_) => None,
        }
    }

    /// Where control sits, or `None` before the battle starts.
    #[must_use]
    pub fn turn_state(&self) -> Option<TurnState> {
        match &self.phase {
            Phase::AwaitingRosterSetup => None,
            Phase::AwaitingPlayer(actor) => Some(TurnState::AwaitingPlayer { actor: *actor }),
            Phase::Finished(report) => Some(TurnState::Finished(report.clone())),
        }
    }

    // -------------------------------------------------------------------------
    // Starting
    // -------------------------------------------------------------------------

    /// Builds the roster as `[player, allies..., enemies...]` and runs until
    /// the player must act or the battle ends.
    ///
    /// Skill ids missing from the catalog are reported as
    /// [`BattleEvent::DataMissing`] and left out of that fighter's loadout.
    ///
    /// # Errors
    ///
    /// `BattleAlreadyStarted` if called twice, or an `InvariantViolation`
    /// from the turn loop.
    pub fn start(
        &mut self,
        player: Arc<FighterProfile>,
        allies: Vec<Arc<FighterProfile>>,
        enemies: Vec<Arc<FighterProfile>>,
    ) -> Result<TurnState> {
        self.ensure_not_started()?;
        let mut roster = Roster::new();
        for profile in std::iter::once(player).chain(allies).chain(enemies) {
            let loadout = self.resolve_loadout(&profile);
            roster.spawn(profile, loadout);
        }
        self.begin(roster)
    }

    /// Starts with a prebuilt roster, for fighters that enter the battle
    /// already hurt or with custom loadouts.
    ///
    /// # Errors
    ///
    /// Same as [`Battle::start`].
    pub fn start_with_roster(&mut self, roster: Roster) -> Result<TurnState> {
        self.ensure_not_started()?;
        self.begin(roster)
    }

    /// Resolves the player, the active comrades and `enemy_ids` through the
    /// providers, then starts.
    ///
    /// Unknown comrade or enemy ids are reported as
    /// [`BattleEvent::DataMissing`] and skipped.
    ///
    /// # Errors
    ///
    /// `MissingProfileData` if there is no player profile, plus everything
    /// [`Battle::start`] returns.
    pub fn start_from_providers(
        &mut self,
        profiles: &dyn FighterProfileProvider,
        party: &dyn PartyRosterProvider,
        enemy_ids: &[ProfileId],
    ) -> Result<TurnState> {
        self.ensure_not_started()?;
        let player = profiles
            .player()
            .ok_or_else(|| CombatError::missing_profile("player"))?;

        let allies = self.lookup_profiles(&party.active_ally_ids(), |id| profiles.ally(id));
        let enemies = self.lookup_profiles(enemy_ids, |id| profiles.enemy(id));
        self.start(player, allies, enemies)
    }

    fn ensure_not_started(&self) -> Result<()> {
        if self.phase == Phase::AwaitingRosterSetup {
            Ok(())
        } else {
            Err(InvalidActionReason::BattleAlreadyStarted.into())
        }
    }

    fn lookup_profiles<F>(&mut self, ids: &[ProfileId], lookup: F) -> Vec<Arc<FighterProfile>>
    where
        F: Fn(&ProfileId) -> Option<Arc<FighterProfile>>,
    {
        let mut found = Vec::with_capacity(ids.len());
        for id in ids {
            match lookup(id) {
                Some(profile) => found.push(profile),
                None => self.report_missing(DataKind::Profile, id.as_str()),
            }
        }
        found
    }

    fn resolve_loadout(&mut self, profile: &FighterProfile) -> Vec<Arc<Skill>> {
        let mut loadout = Vec::with_capacity(profile.skills.len());
        for id in &profile.skills {
            match self.skills.skill(id) {
                Some(skill) => loadout.push(skill),
                None => self.report_missing(DataKind::Skill, id.as_str()),
            }
        }
        loadout
    }

    fn report_missing(&mut self, kind: DataKind, id: &str) {
        tracing::warn!(kind = %kind, id, "missing data, skipped");
        self.emit(BattleEvent::DataMissing {
            kind,
            id: id.to_string(),
        });
    }

    fn begin(&mut self, roster: Roster) -> Result<TurnState> {
        self.roster = roster;
        tracing::info!(fighters = self.roster.len(), seed = self.config.seed, "battle starting");
        self.emit(BattleEvent::BattleStarted {
            roster: self.roster.snapshot(),
        });
        self.run_turns()
    }

    // -------------------------------------------------------------------------
    // Turn loop
    // -------------------------------------------------------------------------

    /// Reports the pending turn state without running anything.
    ///
    /// AI turns already ran when the battle started or the player last
    /// acted, so once started the battle always rests on the player's turn
    /// or a finished report. Only the player's own action moves it on.
    ///
    /// # Errors
    ///
    /// `NotStarted` before the roster is set up and `BattleFinished` once the
    /// battle is over.
    pub fn advance_turn(&self) -> Result<TurnState> {
        match self.phase {
            Phase::AwaitingRosterSetup => Err(InvalidActionReason::NotStarted.into()),
            Phase::AwaitingPlayer(actor) => Ok(TurnState::AwaitingPlayer { actor }),
            Phase::Finished(_) => Err(InvalidActionReason::BattleFinished.into()),
        }
    }

    fn run_turns(&mut self) -> Result<TurnState> {
        loop {
            if let Some(report) = self.terminal_report() {
                return Ok(self.finish(report));
            }
            if self.activations >= self.config.turn_limit {
                tracing::warn!(limit = self.config.turn_limit, "turn limit reached");
                return Ok(self.finish(BattleReport::Defeat {
                    reason: DefeatReason::TurnLimitReached,
                }));
            }

            let slot = self.next_alive_slot()?;
            if self.cursor.map_or(true, |prev| slot <= prev) {
                self.round += 1;
            }
            self.cursor = Some(slot);
            self.activations += 1;

            let fighter = self.fighter_at(slot)?;
            let (id, controller) = (fighter.id(), fighter.controller());
            let name = fighter.display_name().to_string();
            tracing::debug!(fighter = %id, round = self.round, "turn started");
            self.emit(BattleEvent::TurnStarted {
                fighter: id,
                name,
                round: self.round,
            });
            self.tick_cooldowns(id, controller);

            match controller {
                Controller::Player => {
                    self.phase = Phase::AwaitingPlayer(id);
                    return Ok(TurnState::AwaitingPlayer { actor: id });
                }
                Controller::Ai => self.run_ai_turn(id),
            }
        }
    }

    /// Applies the suspended player's skill, then resumes the turn loop.
    ///
    /// # Errors
    ///
    /// `InvalidAction` when nothing is awaiting the player, the skill is not
    /// in the player's loadout, or the resolver rejects it.
    /// `MissingProfileData` when the player's profile lists the skill but the
    /// catalog has no definition for it. The battle is unchanged and still
    /// awaits the player in either case.
    pub fn submit_player_action(&mut self, skill: &SkillId, target: Option<FighterId>) -> Result<TurnState> {
        let actor = self.awaiting_player()?;
        let skill = self.player_skill(actor, skill)?;

        let report = self.resolver.resolve(actor, &skill, target, &mut self.roster)?;
        self.record(report);

        if self.roster.any_alive(Faction::Allied) && !self.roster.any_alive(Faction::Enemy) {
            let report = self.victory_report();
            return Ok(self.finish(report));
        }
        self.run_turns()
    }

    /// Ends the player's turn without acting.
    ///
    /// # Errors
    ///
    /// `InvalidAction` when nothing is awaiting the player.
    pub fn pass_player_turn(&mut self) -> Result<TurnState> {
        let actor = self.awaiting_player()?;
        tracing::debug!(fighter = %actor, "player passed");
        self.emit(BattleEvent::TurnPassed { fighter: actor });
        self.run_turns()
    }

    fn player_skill(&self, actor: FighterId, id: &SkillId) -> Result<Arc<Skill>> {
        let player = self
            .roster
            .get(actor)
            .ok_or(InvalidActionReason::UnknownFighter(actor))?;
        if let Some(skill) = player.skill(id) {
            return Ok(Arc::clone(skill));
        }
        if player.profile().skills.contains(id) {
            return Err(CombatError::missing_skill(id));
        }
        Err(InvalidActionReason::UnknownSkill(id.clone()).into())
    }

    fn awaiting_player(&self) -> Result<FighterId> {
        match self.phase {
            Phase::AwaitingPlayer(actor) => Ok(actor),
            Phase::Finished(_) => Err(InvalidActionReason::BattleFinished.into()),
            Phase::AwaitingRosterSetup => Err(InvalidActionReason::NotAwaitingPlayer.into()),
        }
    }

    fn run_ai_turn(&mut self, id: FighterId) {
        let Some(npc) = self.roster.get(id) else {
            return;
        };
        let strategy = self.strategies.for_profile(npc.profile()).clone();
        let decision = strategy.decide(npc, &self.roster, self.resolver.targeting(), self.rng.as_mut());

        let Some(decision) = decision else {
            tracing::debug!(fighter = %id, strategy = strategy.name(), "nothing to do");
            self.emit(BattleEvent::TurnSkipped { fighter: id });
            return;
        };

        match self
            .resolver
            .resolve(id, &decision.skill, decision.target, &mut self.roster)
        {
            Ok(report) => {
                self.record(report);
                let cue = self
                    .roster
                    .get(id)
                    .and_then(|npc| strategy.cue(npc, &decision.skill));
                if let Some(cue) = cue {
                    self.emit(BattleEvent::Cue { fighter: id, cue });
                }
            }
            Err(err) => {
                tracing::warn!(fighter = %id, skill = %decision.skill.id, error = %err, "AI action rejected");
                self.emit(BattleEvent::ActionFailed {
                    fighter: id,
                    reason: err.to_string(),
                });
            }
        }
    }

    fn tick_cooldowns(&mut self, id: FighterId, controller: Controller) {
        let ticks = match self.config.cooldown_tick {
            CooldownTickPolicy::PlayerOnly => controller == Controller::Player,
            CooldownTickPolicy::AllFighters => true,
        };
        if ticks {
            if let Some(fighter) = self.roster.get_mut(id) {
                fighter.reduce_cooldowns();
            }
        }
    }

    /// Emits the resolution and any defeats it caused.
    fn record(&mut self, report: ResolutionReport) {
        let defeated: Vec<FighterId> = report.defeated().collect();
        self.emit(BattleEvent::ActionResolved { report });
        for id in defeated {
            let Some(fighter) = self.roster.get(id) else {
                continue;
            };
            let (faction, name) = (fighter.faction(), fighter.display_name().to_string());
            if faction == Faction::Enemy {
                self.defeated_enemies.push(id);
            }
            tracing::debug!(fighter = %id, "fighter defeated");
            self.emit(BattleEvent::FighterDefeated { fighter: id, name });
        }
    }

    fn terminal_report(&mut self) -> Option<BattleReport> {
        if !self.roster.any_alive(Faction::Allied) {
            return Some(BattleReport::Defeat {
                reason: DefeatReason::PartyDefeated,
            });
        }
        if !self.roster.any_alive(Faction::Enemy) {
            return Some(self.victory_report());
        }
        None
    }

    /// Sums XP and rolls loot for every defeated enemy, in defeat order.
    fn victory_report(&mut self) -> BattleReport {
        let mut xp = 0u32;
        let mut loot = Vec::new();
        for id in &self.defeated_enemies {
            let Some(enemy) = self.roster.get(*id) else {
                continue;
            };
            let profile = enemy.profile();
            xp = xp.saturating_add(profile.xp_reward);
            if let Some(table) = self.loot_tables.loot_table(&profile.id) {
                loot.extend(roll_loot(&table, self.config.loot_amount_bounds, self.rng.as_mut()));
            }
        }
        BattleReport::Victory { xp, loot }
    }

    fn finish(&mut self, report: BattleReport) -> TurnState {
        let event = match &report {
            BattleReport::Victory { xp, loot } => {
                tracing::info!(xp, drops = loot.len(), rounds = self.round, "battle won");
                BattleEvent::Victory {
                    xp: *xp,
                    loot: loot.clone(),
                }
            }
            BattleReport::Defeat { reason } => {
                tracing::info!(reason = ?reason, rounds = self.round, "battle lost");
                BattleEvent::Defeat { reason: *reason }
            }
        };
        self.emit(event);
        self.phase = Phase::Finished(report.clone());
        TurnState::Finished(report)
    }

    /// Next living slot after the cursor, wrapping around.
    fn next_alive_slot(&self) -> Result<usize> {
        let len = self.roster.len();
        let start = self.cursor.map_or(0, |c| c + 1);
        (0..len)
            .map(|offset| (start + offset) % len)
            .find(|&slot| self.roster.fighters().nth(slot).is_some_and(Fighter::is_alive))
            .ok_or_else(|| self.invariant("no living fighter found after terminal check"))
    }

    fn fighter_at(&self, slot: usize) -> Result<&Fighter> {
        self.roster
            .fighters()
            .nth(slot)
            .ok_or_else(|| self.invariant("turn cursor outside the roster"))
    }

    fn invariant(&self, message: &str) -> CombatError {
        tracing::error!(round = self.round, activations = self.activations, "{message}");
        CombatError::InvariantViolation(message.to_string())
    }

    fn emit(&mut self, event: BattleEvent) {
        for observer in &mut self.observers {
            observer.on_event(&event);
        }
    }
}

impl std::fmt::Debug for Battle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battle")
            .field("config", &self.config)
            .field("phase", &self.phase)
            .field("round", &self.round)
            .field("activations", &self.activations)
            .field("fighters", &self.roster.len())
            .finish_non_exhaustive()
    }
}
