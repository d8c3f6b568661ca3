//! Authoritative combat reducer.
//!
//! [`CombatEngine`] owns the canonical [`ArenaState`] and is the only code
//! path that mutates it. Requests arriving from non-authoritative sides are
//! re-validated here no matter what the sender claimed; every operation is
//! safe to invoke redundantly from that forward path. Each operation returns
//! the [`CombatEvent`]s it produced, which double as the replication stream.

mod validation;

pub use validation::{CastRefusal, StanceRefusal};

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::archetype::Archetype;
use crate::authority::Authority;
use crate::combat::damage::{AppliedDamage, final_damage, modified_outgoing};
use crate::combat::Element;
use crate::config::{
    CAST_TIME_EPSILON, HIDDEN_REMOVAL_DELAY, MOVE_INTERRUPT_THRESHOLD_SQ, RAGDOLL_DELAY_CAP,
    RAGDOLL_REMOVAL_DELAY,
};
use crate::event::CombatEvent;
use crate::lifecycle::Lifecycle;
use crate::spell::{ActiveSlow, PendingCast, SpellSpec};
use crate::state::{CharacterId, CharacterState, GameTime, SpellHandle, TeamId, WorldPoint};
use crate::timer::TimerSlot;

/// Coarse match phase. Death is gated on a playable phase so a kill landing
/// during a level transition is a silent no-op.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MatchPhase {
    Warmup,
    #[default]
    InProgress,
    RoundEnding,
    LeavingMap,
}

impl MatchPhase {
    pub fn is_playable(self) -> bool {
        matches!(self, MatchPhase::Warmup | MatchPhase::InProgress)
    }
}

/// Match-rules collaborator, implemented by the hosting runtime.
///
/// The engine consults it for damage authorization and kill credit; it never
/// mutates combat state itself.
pub trait MatchRules {
    /// Whether `instigator` may damage `target` under current rules
    /// (friendly fire, team membership, match phase).
    fn can_deal_damage(
        &self,
        state: &ArenaState,
        instigator: Option<CharacterId>,
        target: CharacterId,
    ) -> bool;

    /// Kill notification for scoreboards and game-mode bookkeeping.
    fn on_killed(&mut self, killer: Option<CharacterId>, victim: CharacterId, element: Element);

    /// Whether the victim respawns on a timer. When false the engine emits
    /// [`CombatEvent::SpectateRequested`] instead of scheduling a respawn.
    fn can_respawn_instantly(&self, _victim: CharacterId) -> bool {
        true
    }
}

/// Targeting/physics collaborator resolving which characters an effect
/// spawned at `origin` touches. The engine stays free of spatial queries.
pub trait TargetResolver {
    fn targets_in(&self, state: &ArenaState, origin: WorldPoint, radius: f32) -> Vec<CharacterId>;
}

/// Canonical, replicated-from combat state of the whole arena.
#[derive(Clone, Debug, Default)]
pub struct ArenaState {
    pub(crate) characters: BTreeMap<CharacterId, CharacterState>,
    pub(crate) phase: MatchPhase,
}

impl ArenaState {
    pub fn character(&self, id: CharacterId) -> Option<&CharacterState> {
        self.characters.get(&id)
    }

    pub fn characters(&self) -> impl Iterator<Item = &CharacterState> {
        self.characters.values()
    }

    /// Characters currently alive and spectatable.
    pub fn living(&self) -> impl Iterator<Item = &CharacterState> {
        self.characters.values().filter(|c| c.lifecycle().is_alive())
    }

    pub fn len(&self) -> usize {
        self.characters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.characters.is_empty()
    }

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }
}

/// The single authoritative decision-maker.
///
/// All waits are deadlines in per-character timer sets, fired by
/// [`tick`](Self::tick); nothing blocks. Within one tick, every gate check
/// reads the same state snapshot because commands and the tick are
/// serialized by the owning worker.
pub struct CombatEngine {
    state: ArenaState,
    authority: Authority,
}

impl Default for CombatEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CombatEngine {
    pub fn new() -> Self {
        Self {
            state: ArenaState::default(),
            authority: Authority::new(),
        }
    }

    /// Read access to canonical state (snapshots for replication).
    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    pub fn set_phase(&mut self, phase: MatchPhase) {
        self.state.phase = phase;
    }

    // ===== lifecycle of characters in the arena =====

    /// Spawn a character with archetype defaults. A duplicate id is a
    /// silent no-op.
    pub fn spawn_character(
        &mut self,
        id: CharacterId,
        team: TeamId,
        archetype: Arc<dyn Archetype>,
        position: WorldPoint,
    ) -> Vec<CombatEvent> {
        if self.state.characters.contains_key(&id) {
            return Vec::new();
        }
        let character = CharacterState::spawn(&self.authority, id, team, archetype, position);
        let name = character.archetype().name().to_owned();
        self.state.characters.insert(id, character);
        vec![CombatEvent::Spawned { id, archetype: name }]
    }

    /// Session teardown for one character. The only path that destroys
    /// combat state rather than resetting it.
    pub fn remove_character(&mut self, id: CharacterId) -> Vec<CombatEvent> {
        match self.state.characters.remove(&id) {
            Some(_) => vec![CombatEvent::Left { id }],
            None => Vec::new(),
        }
    }

    // ===== casting =====

    /// Cast request from slot `slot` towards `target`.
    ///
    /// All gates must hold or the request is refused with no side effects;
    /// on success the cost is deducted immediately (a later interrupt does
    /// not refund it) and resolution is scheduled after the cast time.
    pub fn request_cast(
        &mut self,
        caster: CharacterId,
        slot: usize,
        target: WorldPoint,
        now: GameTime,
    ) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&caster) else {
            return Vec::new();
        };

        let cost = match validation::cast_gate(character, slot, now) {
            Ok(cost) => cost,
            Err(reason) => {
                return vec![CombatEvent::CastRefused { caster, slot, reason }];
            }
        };
        let Some(spell) = character.spell_slot(slot) else {
            return Vec::new(); // gate already verified; unreachable in practice
        };
        let spec = spell.spec();
        // A zero cast time would otherwise bind an already-due deadline.
        let cast_time = spec.cast_time.max(CAST_TIME_EPSILON);
        let movable = spec.castable_while_moving;
        let resolve_at = now.after(cast_time);
        let global_cooldown = character.base().global_cooldown;

        character.apply_oil(auth, -cost);
        character.begin_cast(auth, PendingCast { slot, target, movable });
        character.bind_timer(auth, TimerSlot::Cast, resolve_at);
        character.bind_timer(auth, TimerSlot::GlobalCooldown, now.after(global_cooldown));

        vec![CombatEvent::CastStarted {
            caster,
            slot,
            target,
            resolve_at,
            oil_remaining: character.oil().current(),
        }]
    }

    // ===== stances =====

    /// Cycle the stance ring by `direction` (+1/-1). Silently refused while
    /// the switch cooldown runs.
    pub fn request_stance_switch(
        &mut self,
        id: CharacterId,
        direction: i32,
        now: GameTime,
    ) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&id) else {
            return Vec::new();
        };
        if validation::stance_gate(character, now).is_err() {
            return Vec::new();
        }
        let stance = character.advance_stance(auth, direction);
        let cooldown = character.base().stance_switch_cooldown;
        character.bind_timer(auth, TimerSlot::StanceSwitch, now.after(cooldown));
        vec![CombatEvent::StanceChanged {
            id,
            stance,
            movement_speed: character.movement_speed(),
        }]
    }

    // ===== facing and movement =====

    /// Re-apply a client-predicted facing and broadcast it. The client has
    /// already rotated locally; authority makes it canonical.
    pub fn set_facing(&mut self, id: CharacterId, yaw: f32) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&id) else {
            return Vec::new();
        };
        if character.lifecycle().is_dying() {
            return Vec::new();
        }
        character.set_facing(auth, yaw);
        vec![CombatEvent::FacingChanged { id, yaw }]
    }

    /// Movement sync from the movement component. Interrupts a pending
    /// non-movable cast when speed exceeds the near-zero threshold.
    pub fn report_movement(
        &mut self,
        id: CharacterId,
        position: WorldPoint,
        speed_sq: f32,
        _now: GameTime,
    ) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&id) else {
            return Vec::new();
        };
        character.set_movement(auth, position, speed_sq);
        let mut events = Vec::new();
        self.interrupt_cast_if_moving(id, &mut events);
        events
    }

    // ===== damage =====

    /// Resolve raw elemental damage against a target.
    ///
    /// Returns what actually happened plus the events produced; suppression
    /// and hitting a corpse are expected outcomes, not errors. A lethal hit
    /// enters the death lifecycle exactly once.
    pub fn inflict_damage(
        &mut self,
        target: CharacterId,
        raw: f32,
        element: Element,
        instigator: Option<CharacterId>,
        rules: &mut dyn MatchRules,
        now: GameTime,
    ) -> (AppliedDamage, Vec<CombatEvent>) {
        let mut events = Vec::new();

        match self.state.characters.get(&target) {
            Some(character) if character.is_alive() && !character.lifecycle().is_dying() => {}
            _ => return (AppliedDamage::AlreadyDead, events),
        }

        if !rules.can_deal_damage(&self.state, instigator, target) {
            events.push(CombatEvent::DamageSuppressed { target, instigator });
            return (AppliedDamage::Suppressed { instigator }, events);
        }

        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&target) else {
            return (AppliedDamage::AlreadyDead, events);
        };
        let resist = character.resists().live(element);
        let amount = final_damage(raw, resist);
        let mut lethal = false;
        if amount > 0.0 {
            character.apply_health(auth, -amount);
            let remaining = character.health().current();
            lethal = remaining <= 0.0;
            events.push(CombatEvent::DamageApplied {
                target,
                instigator,
                element,
                amount,
                remaining_health: remaining,
            });
        }

        if lethal {
            events.extend(self.try_die(target, instigator, element, rules, now));
        }

        (AppliedDamage::Applied { amount, lethal }, events)
    }

    /// Enter the death lifecycle if every gate passes; otherwise a silent
    /// no-op (idempotence guard against double-kill races).
    fn try_die(
        &mut self,
        victim: CharacterId,
        killer: Option<CharacterId>,
        element: Element,
        rules: &mut dyn MatchRules,
        now: GameTime,
    ) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        if !self.state.phase.is_playable() {
            return events;
        }

        let deaths;
        let respawn_base;
        let respawn_scale;
        {
            let auth = &self.authority;
            let Some(character) = self.state.characters.get_mut(&victim) else {
                return events;
            };
            if character.lifecycle().is_dying() {
                return events;
            }

            character.set_lifecycle(auth, Lifecycle::Dying);
            character.set_casting_enabled(auth, false);
            character.take_pending_cast(auth);
            character.cancel_timer(auth, TimerSlot::Cast);
            deaths = character.register_death(auth);

            let config = *character.base();
            respawn_base = config.respawn_time;
            respawn_scale = config.respawn_death_scale;

            if character.has_physics_body() {
                // Ragdoll once the death feedback has had a moment to play.
                let delay = RAGDOLL_DELAY_CAP.min(config.death_feedback_duration);
                character.bind_timer(auth, TimerSlot::Ragdoll, now.after(delay));
            } else {
                // No physical body to simulate: hide and schedule removal.
                character.set_lifecycle(auth, Lifecycle::Hidden);
                character.bind_timer(auth, TimerSlot::Removal, now.after(HIDDEN_REMOVAL_DELAY));
            }
        }

        events.push(CombatEvent::Died { victim, killer, element });
        rules.on_killed(killer, victim, element);

        if rules.can_respawn_instantly(victim) {
            // First death pays the base delay; each consecutive death adds
            // the scale on top. Cleared only by round reset.
            let delay = respawn_base + deaths.saturating_sub(1) as f32 * respawn_scale;
            if let Some(character) = self.state.characters.get_mut(&victim) {
                character.bind_timer(&self.authority, TimerSlot::Respawn, now.after(delay));
            }
        } else {
            events.push(CombatEvent::SpectateRequested { id: victim });
        }

        events
    }

    // ===== spell effects =====

    /// Impose a movement slow. Only the strongest active slow wins: a
    /// stronger (more negative, `<=`) modifier cancels the incumbent
    /// source's timer and takes over; a weaker one is discarded immediately.
    pub fn apply_slow(
        &mut self,
        target: CharacterId,
        modifier: f32,
        duration: f32,
        source: SpellHandle,
        now: GameTime,
    ) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&target) else {
            return Vec::new();
        };
        if character.lifecycle().is_dying() {
            return Vec::new();
        }

        let current = character.slow_modifier();
        if modifier <= current {
            // Cancel the superseded source's timer before rebinding so it
            // can never fire for the old effect.
            character.cancel_timer(auth, TimerSlot::Slow);
            character.set_slow(auth, ActiveSlow { modifier, source });
            character.bind_timer(auth, TimerSlot::Slow, now.after(duration));
            vec![CombatEvent::SlowApplied { target, modifier, source }]
        } else {
            // A stronger slow is already in place; the weaker arrival is
            // cancelled so it cannot clear the stronger effect later.
            vec![CombatEvent::SlowOverridden { target, rejected: source }]
        }
    }

    /// Stun for `duration` seconds. Blocks new casts; an already-pending
    /// cast keeps resolving.
    pub fn apply_stun(
        &mut self,
        target: CharacterId,
        duration: f32,
        now: GameTime,
    ) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&target) else {
            return Vec::new();
        };
        if character.lifecycle().is_dying() {
            return Vec::new();
        }
        // A shorter stun must not release an already-stunned target early;
        // the later of the two deadlines stands.
        let mut until = now.after(duration);
        if let Some(existing) = character.timers().deadline(TimerSlot::Stun)
            && existing > until
        {
            until = existing;
        }
        character.set_stunned(auth, true);
        character.bind_timer(auth, TimerSlot::Stun, until);
        vec![CombatEvent::StunApplied { target, until }]
    }

    /// Shift the buff/debuff resist layer: one element, or all six at once
    /// when `element` is `None`.
    pub fn shift_resists(
        &mut self,
        target: CharacterId,
        element: Option<Element>,
        delta: f32,
    ) -> Vec<CombatEvent> {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&target) else {
            return Vec::new();
        };
        match element {
            Some(element) => character.shift_resist(auth, element, delta),
            None => character.shift_all_resists(auth, delta),
        }
        vec![CombatEvent::ResistShifted { target, element, delta }]
    }

    // ===== round lifecycle =====

    /// Reinitialize every character to archetype defaults and clear death
    /// counters. State is reset, never destroyed.
    pub fn round_reset(&mut self) -> Vec<CombatEvent> {
        self.state.phase = MatchPhase::InProgress;
        let auth = &self.authority;
        for character in self.state.characters.values_mut() {
            character.reset_round(auth);
        }
        vec![CombatEvent::RoundReset]
    }

    // ===== tick =====

    /// Advance the simulation to `now`: check movement interrupts and fire
    /// every due deadline. Fired slots are cleared before their handlers
    /// run, so rebinding inside a handler cannot double-fire.
    pub fn tick(
        &mut self,
        now: GameTime,
        rules: &mut dyn MatchRules,
        resolver: &dyn TargetResolver,
    ) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        let ids: Vec<CharacterId> = self.state.characters.keys().copied().collect();

        for id in ids {
            self.interrupt_cast_if_moving(id, &mut events);

            let fired = {
                let auth = &self.authority;
                match self.state.characters.get_mut(&id) {
                    Some(character) => character.fire_due_timers(auth, now),
                    None => continue,
                }
            };

            for slot in fired {
                match slot {
                    TimerSlot::Cast => self.resolve_cast(id, now, rules, resolver, &mut events),
                    TimerSlot::Slow => {
                        if let Some(character) = self.state.characters.get_mut(&id) {
                            character.clear_slow(&self.authority);
                            events.push(CombatEvent::SlowExpired { target: id });
                        }
                    }
                    TimerSlot::Stun => {
                        if let Some(character) = self.state.characters.get_mut(&id) {
                            character.set_stunned(&self.authority, false);
                            events.push(CombatEvent::StunExpired { target: id });
                        }
                    }
                    TimerSlot::Ragdoll => {
                        if let Some(character) = self.state.characters.get_mut(&id) {
                            character.set_lifecycle(&self.authority, Lifecycle::Ragdoll);
                            character.bind_timer(
                                &self.authority,
                                TimerSlot::Removal,
                                now.after(RAGDOLL_REMOVAL_DELAY),
                            );
                            events.push(CombatEvent::RagdollEntered { id });
                        }
                    }
                    TimerSlot::Removal => {
                        if let Some(character) = self.state.characters.get_mut(&id) {
                            character.set_lifecycle(&self.authority, Lifecycle::Respawning);
                            events.push(CombatEvent::BodyRemoved { id });
                        }
                    }
                    TimerSlot::Respawn => {
                        if let Some(character) = self.state.characters.get_mut(&id) {
                            character.revive(&self.authority);
                            events.push(CombatEvent::Respawned { id });
                        }
                    }
                    // Pure expiry windows; gates query them lazily.
                    TimerSlot::GlobalCooldown | TimerSlot::StanceSwitch => {}
                }
            }
        }

        events
    }

    /// Cancel a pending, non-movable cast once the character is moving.
    /// The deducted cost stays spent.
    fn interrupt_cast_if_moving(&mut self, id: CharacterId, events: &mut Vec<CombatEvent>) {
        let auth = &self.authority;
        let Some(character) = self.state.characters.get_mut(&id) else {
            return;
        };
        let Some(pending) = character.pending_cast() else {
            return;
        };
        if pending.movable || character.speed_squared() <= MOVE_INTERRUPT_THRESHOLD_SQ {
            return;
        }
        let slot = pending.slot;
        character.take_pending_cast(auth);
        character.cancel_timer(auth, TimerSlot::Cast);
        events.push(CombatEvent::CastInterrupted { caster: id, slot });
    }

    /// A cast deadline fired: re-validate liveness, start the slot cooldown,
    /// and spawn the effect at the point recorded at cast start.
    fn resolve_cast(
        &mut self,
        caster: CharacterId,
        now: GameTime,
        rules: &mut dyn MatchRules,
        resolver: &dyn TargetResolver,
        events: &mut Vec<CombatEvent>,
    ) {
        let (origin, slot, spec, raw_outgoing) = {
            let auth = &self.authority;
            let Some(character) = self.state.characters.get_mut(&caster) else {
                return;
            };
            let Some(pending) = character.take_pending_cast(auth) else {
                return;
            };
            // Death or a disabling effect may have landed during the cast
            // window; the effect must not spawn then.
            if character.lifecycle().is_dying() || !character.casting_enabled() {
                return;
            }
            let modifier;
            let spec;
            {
                let Some(spell) = character.spell_slot(pending.slot) else {
                    return;
                };
                spec = spell.spec().clone();
                modifier = character.outgoing_damage_modifier(spec.element);
            }
            if let Some(spell) = character.spell_slot_mut(auth, pending.slot) {
                spell.trigger_cooldown(now);
            }
            let raw = modified_outgoing(spec.payload.damage, modifier);
            (pending.target, pending.slot, spec, raw)
        };

        events.push(CombatEvent::CastResolved { caster, slot, origin });

        let targets = resolver.targets_in(&self.state, origin, spec.payload.radius);
        for target in targets {
            self.apply_hit(caster, target, slot, &spec, raw_outgoing, origin, rules, now, events);
        }
    }

    /// Apply one spawned effect to one target: resisted damage first, then
    /// payload extras (slow, resist debuff, stun, knockback) only if the hit
    /// was neither suppressed nor wasted on a corpse.
    #[allow(clippy::too_many_arguments)]
    fn apply_hit(
        &mut self,
        caster: CharacterId,
        target: CharacterId,
        slot: usize,
        spec: &SpellSpec,
        raw_outgoing: f32,
        origin: WorldPoint,
        rules: &mut dyn MatchRules,
        now: GameTime,
        events: &mut Vec<CombatEvent>,
    ) {
        let (applied, mut damage_events) =
            self.inflict_damage(target, raw_outgoing, spec.element, Some(caster), rules, now);
        events.append(&mut damage_events);

        let AppliedDamage::Applied { lethal, .. } = applied else {
            return;
        };
        if lethal {
            return;
        }

        if let Some(slow) = spec.payload.slow {
            let source = SpellHandle { caster, slot };
            events.extend(self.apply_slow(target, slow.modifier, slow.duration, source, now));
        }
        if let Some(debuff) = spec.payload.resist_debuff {
            let element = (!debuff.all_elements).then_some(spec.element);
            events.extend(self.shift_resists(target, element, debuff.delta));
        }
        if let Some(duration) = spec.payload.stun {
            events.extend(self.apply_stun(target, duration, now));
        }
        if let Some(magnitude) = spec.payload.knockback {
            if let Some(character) = self.state.characters.get(&target) {
                // Coincident points give no direction; skip rather than
                // launching the victim somewhere arbitrary.
                if let Some(direction) = character.position().direction_from(&origin) {
                    events.push(CombatEvent::Knockback {
                        target,
                        impulse: direction.scaled(magnitude),
                    });
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use arrayvec::ArrayVec;

    use super::*;
    use crate::combat::stance::MAX_STANCES;
    use crate::combat::{StanceKind, StanceProfile};
    use crate::config::ArchetypeConfig;
    use crate::spell::SpellPayload;

    struct TestArchetype {
        spells: Vec<SpellSpec>,
    }

    impl Archetype for TestArchetype {
        fn name(&self) -> &str {
            "test"
        }

        fn config(&self) -> ArchetypeConfig {
            ArchetypeConfig::default()
        }

        fn stances(&self) -> ArrayVec<StanceKind, MAX_STANCES> {
            [StanceKind::Mobility, StanceKind::Damage, StanceKind::Defense]
                .into_iter()
                .collect()
        }

        fn profile(&self, kind: StanceKind) -> StanceProfile {
            match kind {
                StanceKind::Mobility => StanceProfile {
                    mobility_mod: 0.25,
                    ..StanceProfile::default()
                },
                StanceKind::Damage => StanceProfile {
                    damage_mod: 0.25,
                    ..StanceProfile::default()
                },
                StanceKind::Defense => StanceProfile {
                    defense_mod: 0.25,
                    ..StanceProfile::default()
                },
            }
        }

        fn loadout(&self) -> Vec<SpellSpec> {
            self.spells.clone()
        }
    }

    #[derive(Default)]
    struct FreeForAll {
        deny_damage: bool,
        deny_respawn: bool,
        kills: Vec<(Option<CharacterId>, CharacterId)>,
    }

    impl MatchRules for FreeForAll {
        fn can_deal_damage(
            &self,
            _state: &ArenaState,
            _instigator: Option<CharacterId>,
            _target: CharacterId,
        ) -> bool {
            !self.deny_damage
        }

        fn on_killed(
            &mut self,
            killer: Option<CharacterId>,
            victim: CharacterId,
            _element: Element,
        ) {
            self.kills.push((killer, victim));
        }

        fn can_respawn_instantly(&self, _victim: CharacterId) -> bool {
            !self.deny_respawn
        }
    }

    struct SphereOverlap;

    impl TargetResolver for SphereOverlap {
        fn targets_in(
            &self,
            state: &ArenaState,
            origin: WorldPoint,
            radius: f32,
        ) -> Vec<CharacterId> {
            state
                .living()
                .filter(|c| c.position().distance_squared(&origin) <= radius * radius)
                .map(|c| c.id())
                .collect()
        }
    }

    fn firebolt(damage: f32) -> SpellSpec {
        SpellSpec {
            name: "firebolt".into(),
            element: Element::Fire,
            cast_time: 1.0,
            cost: 20.0,
            cooldown: 3.0,
            castable_while_moving: false,
            payload: SpellPayload::damage(damage, 100.0),
        }
    }

    fn t(secs: f64) -> GameTime {
        GameTime::from_secs(secs)
    }

    fn arena(positions: &[WorldPoint], spells: Vec<SpellSpec>) -> (CombatEngine, Vec<CharacterId>) {
        let mut engine = CombatEngine::new();
        let archetype: Arc<dyn Archetype> = Arc::new(TestArchetype { spells });
        let mut ids = Vec::new();
        for (i, position) in positions.iter().enumerate() {
            let id = CharacterId(i as u32 + 1);
            let events =
                engine.spawn_character(id, TeamId(i as u8), Arc::clone(&archetype), *position);
            assert!(matches!(events[0], CombatEvent::Spawned { .. }));
            ids.push(id);
        }
        (engine, ids)
    }

    fn lone() -> (CombatEngine, CharacterId) {
        let (engine, ids) = arena(&[WorldPoint::default()], vec![firebolt(30.0)]);
        (engine, ids[0])
    }

    fn health_of(engine: &CombatEngine, id: CharacterId) -> f32 {
        engine.state().character(id).unwrap().health().current()
    }

    #[test]
    fn damage_uses_live_resist() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.shift_resists(id, Some(Element::Fire), 0.5);
        let (applied, _) =
            engine.inflict_damage(id, 40.0, Element::Fire, None, &mut rules, t(0.0));
        assert_eq!(applied.amount(), 20.0);
        assert_eq!(health_of(&engine, id), 80.0);
    }

    #[test]
    fn negative_resist_amplifies_and_clamps() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        // Pushing far past the floor still clamps the live value to -1.
        engine.shift_resists(id, Some(Element::Fire), -7.5);
        let (applied, _) =
            engine.inflict_damage(id, 40.0, Element::Fire, None, &mut rules, t(0.0));
        assert_eq!(applied.amount(), 80.0);
    }

    #[test]
    fn lethal_sequence_kills_exactly_once() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        let (first, _) = engine.inflict_damage(id, 40.0, Element::Fire, None, &mut rules, t(0.0));
        assert!(!first.is_lethal());

        let (second, events) =
            engine.inflict_damage(id, 70.0, Element::Fire, None, &mut rules, t(0.1));
        assert!(second.is_lethal());
        assert!(events.iter().any(|e| matches!(e, CombatEvent::Died { .. })));

        let (third, events) =
            engine.inflict_damage(id, 70.0, Element::Fire, None, &mut rules, t(0.2));
        assert_eq!(third, AppliedDamage::AlreadyDead);
        assert!(events.is_empty());
        assert_eq!(rules.kills.len(), 1);
    }

    #[test]
    fn suppressed_damage_leaves_health_untouched() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll { deny_damage: true, ..FreeForAll::default() };

        let (applied, events) =
            engine.inflict_damage(id, 40.0, Element::Fire, None, &mut rules, t(0.0));
        assert!(matches!(applied, AppliedDamage::Suppressed { .. }));
        assert!(matches!(events[0], CombatEvent::DamageSuppressed { .. }));
        assert_eq!(health_of(&engine, id), 100.0);
    }

    #[test]
    fn cast_deducts_cost_with_no_refund_on_interrupt() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        let events = engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        assert!(matches!(events[0], CombatEvent::CastStarted { .. }));
        assert_eq!(engine.state().character(id).unwrap().oil().current(), 80.0);

        // Sprinting past the threshold cancels the cast but keeps the cost.
        let events = engine.report_movement(id, WorldPoint::default(), 9.0, t(0.5));
        assert!(matches!(events[0], CombatEvent::CastInterrupted { .. }));
        assert_eq!(engine.state().character(id).unwrap().oil().current(), 80.0);

        let events = engine.tick(t(1.5), &mut rules, &SphereOverlap);
        assert!(!events.iter().any(|e| matches!(e, CombatEvent::CastResolved { .. })));
    }

    #[test]
    fn drift_below_threshold_does_not_interrupt() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        engine.report_movement(id, WorldPoint::default(), 4.9, t(0.5));

        let events = engine.tick(t(1.01), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::CastResolved { .. })));
    }

    #[test]
    fn pending_cast_blocks_second_request() {
        let (mut engine, id) = lone();

        engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        let events = engine.request_cast(id, 0, WorldPoint::default(), t(0.2));
        // The slot cooldown has not started yet (it starts at resolution),
        // so the refusal comes from the in-flight cast gate chain.
        assert!(matches!(
            events[0],
            CombatEvent::CastRefused { reason: CastRefusal::GlobalCooldownActive, .. }
        ));
    }

    #[test]
    fn in_flight_cast_blocks_after_global_cooldown_expires() {
        let slow_cast = SpellSpec { cast_time: 3.0, ..firebolt(30.0) };
        let (mut engine, ids) = arena(&[WorldPoint::default()], vec![slow_cast]);
        let id = ids[0];

        engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        // Global cooldown lapsed at t=1, but the cast is still in flight.
        let events = engine.request_cast(id, 0, WorldPoint::default(), t(1.5));
        assert!(matches!(
            events[0],
            CombatEvent::CastRefused { reason: CastRefusal::CastPending, .. }
        ));
    }

    #[test]
    fn insufficient_oil_refused_without_side_effects() {
        let expensive = SpellSpec { cost: 120.0, ..firebolt(30.0) };
        let (mut engine, ids) = arena(&[WorldPoint::default()], vec![expensive]);
        let id = ids[0];

        let events = engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        assert!(matches!(
            events[0],
            CombatEvent::CastRefused { reason: CastRefusal::InsufficientOil, .. }
        ));
        let character = engine.state().character(id).unwrap();
        assert_eq!(character.oil().current(), 100.0);
        assert!(character.pending_cast().is_none());
    }

    #[test]
    fn empty_slot_refused() {
        let (mut engine, id) = lone();
        let events = engine.request_cast(id, 5, WorldPoint::default(), t(0.0));
        assert!(matches!(
            events[0],
            CombatEvent::CastRefused { reason: CastRefusal::EmptySlot, .. }
        ));
    }

    #[test]
    fn zero_cast_time_still_resolves_on_a_future_tick() {
        let instant = SpellSpec { cast_time: 0.0, ..firebolt(30.0) };
        let (mut engine, ids) = arena(&[WorldPoint::default()], vec![instant]);
        let id = ids[0];
        let mut rules = FreeForAll::default();

        let events = engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        let CombatEvent::CastStarted { resolve_at, .. } = &events[0] else {
            panic!("expected CastStarted, got {events:?}");
        };
        assert!(t(0.0) < *resolve_at);

        let events = engine.tick(t(0.02), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::CastResolved { .. })));
    }

    #[test]
    fn slot_cooldown_starts_at_resolution() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        engine.tick(t(1.01), &mut rules, &SphereOverlap);

        let events = engine.request_cast(id, 0, WorldPoint::default(), t(1.5));
        assert!(matches!(
            events[0],
            CombatEvent::CastRefused { reason: CastRefusal::OnCooldown, .. }
        ));

        // Cooldown is 3s from resolution, not from cast start.
        let events = engine.request_cast(id, 0, WorldPoint::default(), t(4.5));
        assert!(matches!(events[0], CombatEvent::CastStarted { .. }));
    }

    #[test]
    fn resolved_cast_damages_targets_in_radius() {
        let caster_pos = WorldPoint::default();
        let target_pos = WorldPoint { x: 200.0, y: 0.0, z: 0.0 };
        let (mut engine, ids) = arena(&[caster_pos, target_pos], vec![firebolt(30.0)]);
        let (caster, target) = (ids[0], ids[1]);
        let mut rules = FreeForAll::default();

        engine.request_cast(caster, 0, target_pos, t(0.0));
        let events = engine.tick(t(1.01), &mut rules, &SphereOverlap);

        assert!(events.iter().any(|e| matches!(
            e,
            CombatEvent::DamageApplied { target: hit, amount, .. }
                if *hit == target && *amount == 30.0
        )));
        // The caster stands outside the 100-unit radius and is untouched.
        assert_eq!(health_of(&engine, caster), 100.0);
        assert_eq!(health_of(&engine, target), 70.0);
    }

    #[test]
    fn damage_stance_boosts_outgoing_damage() {
        let caster_pos = WorldPoint::default();
        let target_pos = WorldPoint { x: 200.0, y: 0.0, z: 0.0 };
        let (mut engine, ids) = arena(&[caster_pos, target_pos], vec![firebolt(30.0)]);
        let (caster, target) = (ids[0], ids[1]);
        let mut rules = FreeForAll::default();

        // Mobility (spawn stance) -> Damage, +0.25 outgoing.
        engine.request_stance_switch(caster, 1, t(0.0));
        engine.request_cast(caster, 0, target_pos, t(0.1));
        engine.tick(t(1.2), &mut rules, &SphereOverlap);

        assert_eq!(health_of(&engine, target), 100.0 - 37.5);
    }

    #[test]
    fn stronger_slow_wins_and_outlives_the_weaker() {
        let (mut engine, id) = lone();
        let strong = SpellHandle { caster: CharacterId(9), slot: 0 };
        let weak = SpellHandle { caster: CharacterId(9), slot: 1 };
        let mut rules = FreeForAll::default();

        let events = engine.apply_slow(id, -0.5, 10.0, strong, t(0.0));
        assert!(matches!(events[0], CombatEvent::SlowApplied { .. }));
        // Spawn stance is Mobility (+0.25); combined modifier is -0.25.
        assert_eq!(engine.state().character(id).unwrap().movement_speed(), 450.0);

        // Weaker arrival is discarded outright.
        let events = engine.apply_slow(id, -0.2, 3.0, weak, t(1.0));
        assert!(matches!(events[0], CombatEvent::SlowOverridden { .. }));
        assert_eq!(engine.state().character(id).unwrap().slow_modifier(), -0.5);

        // Past the weak slow's would-be expiry the strong one still holds.
        let events = engine.tick(t(5.0), &mut rules, &SphereOverlap);
        assert!(!events.iter().any(|e| matches!(e, CombatEvent::SlowExpired { .. })));
        assert_eq!(engine.state().character(id).unwrap().slow_modifier(), -0.5);

        let events = engine.tick(t(10.5), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::SlowExpired { .. })));
        assert_eq!(engine.state().character(id).unwrap().slow_modifier(), 0.0);
    }

    #[test]
    fn stronger_slow_replaces_and_cancels_the_old_timer() {
        let (mut engine, id) = lone();
        let first = SpellHandle { caster: CharacterId(9), slot: 0 };
        let second = SpellHandle { caster: CharacterId(9), slot: 1 };
        let mut rules = FreeForAll::default();

        engine.apply_slow(id, -0.5, 10.0, first, t(0.0));
        engine.apply_slow(id, -0.8, 10.0, second, t(6.0));

        // The first slow's deadline (t=10) must not clear the replacement.
        engine.tick(t(11.0), &mut rules, &SphereOverlap);
        assert_eq!(engine.state().character(id).unwrap().slow_modifier(), -0.8);

        let events = engine.tick(t(16.5), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::SlowExpired { .. })));
    }

    #[test]
    fn stance_switch_respects_cooldown() {
        let (mut engine, id) = lone();

        let events = engine.request_stance_switch(id, 1, t(0.0));
        assert!(matches!(
            events[0],
            CombatEvent::StanceChanged { stance: StanceKind::Damage, .. }
        ));

        // Second flick inside the 2s window is swallowed.
        let events = engine.request_stance_switch(id, 1, t(0.5));
        assert!(events.is_empty());
        assert_eq!(engine.state().character(id).unwrap().current_stance(), StanceKind::Damage);

        let events = engine.request_stance_switch(id, 1, t(2.5));
        assert!(matches!(
            events[0],
            CombatEvent::StanceChanged { stance: StanceKind::Defense, .. }
        ));
    }

    #[test]
    fn stance_switch_updates_movement_speed() {
        let (mut engine, id) = lone();

        // Spawn stance is Mobility (+0.25): 600 * 1.25.
        assert_eq!(engine.state().character(id).unwrap().movement_speed(), 750.0);

        let events = engine.request_stance_switch(id, 1, t(0.0));
        let CombatEvent::StanceChanged { movement_speed, .. } = &events[0] else {
            panic!("expected StanceChanged, got {events:?}");
        };
        assert_eq!(*movement_speed, 600.0);
    }

    #[test]
    fn backwards_stance_cycle_mirrors_forwards() {
        let (mut engine, id) = lone();

        // Ring is [Mobility, Damage, Defense]; index -1 selects
        // abs(-1) % 3 == 1, the same stance as stepping forwards.
        let events = engine.request_stance_switch(id, -1, t(0.0));
        assert!(matches!(
            events[0],
            CombatEvent::StanceChanged { stance: StanceKind::Damage, .. }
        ));
    }

    #[test]
    fn stun_blocks_casts_until_expiry() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.apply_stun(id, 2.0, t(0.0));
        let events = engine.request_cast(id, 0, WorldPoint::default(), t(1.0));
        assert!(matches!(
            events[0],
            CombatEvent::CastRefused { reason: CastRefusal::Stunned, .. }
        ));

        let events = engine.tick(t(2.1), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::StunExpired { .. })));
        let events = engine.request_cast(id, 0, WorldPoint::default(), t(2.2));
        assert!(matches!(events[0], CombatEvent::CastStarted { .. }));
    }

    #[test]
    fn shorter_stun_does_not_release_a_longer_one_early() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.apply_stun(id, 5.0, t(0.0));
        let events = engine.apply_stun(id, 1.0, t(2.0));
        let CombatEvent::StunApplied { until, .. } = &events[0] else {
            panic!("expected StunApplied, got {events:?}");
        };
        assert_eq!(*until, t(5.0));

        engine.tick(t(3.5), &mut rules, &SphereOverlap);
        assert!(engine.state().character(id).unwrap().is_stunned());

        let events = engine.tick(t(5.1), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::StunExpired { .. })));
    }

    #[test]
    fn death_cancels_pending_cast_and_disables_casting() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.request_cast(id, 0, WorldPoint::default(), t(0.0));
        engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(0.5));

        let character = engine.state().character(id).unwrap();
        assert!(!character.casting_enabled());
        assert!(character.pending_cast().is_none());

        let events = engine.tick(t(1.5), &mut rules, &SphereOverlap);
        assert!(!events.iter().any(|e| matches!(e, CombatEvent::CastResolved { .. })));
    }

    #[test]
    fn death_flow_ragdolls_then_respawns() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(0.0));
        assert_eq!(engine.state().character(id).unwrap().lifecycle(), Lifecycle::Dying);

        // Ragdoll delay is min(cap, feedback) = 0.1.
        let events = engine.tick(t(0.11), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::RagdollEntered { .. })));
        assert_eq!(engine.state().character(id).unwrap().lifecycle(), Lifecycle::Ragdoll);

        // First-death respawn at base delay 5s; revival clears the pending
        // body-removal deadline along with everything else.
        let events = engine.tick(t(5.0), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::Respawned { .. })));
        let character = engine.state().character(id).unwrap();
        assert_eq!(character.lifecycle(), Lifecycle::Alive);
        assert_eq!(character.health().current(), 100.0);

        let events = engine.tick(t(20.0), &mut rules, &SphereOverlap);
        assert!(!events.iter().any(|e| matches!(e, CombatEvent::BodyRemoved { .. })));
    }

    #[test]
    fn hidden_corpse_without_physics_body() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        {
            let auth = &engine.authority;
            let character = engine.state.characters.get_mut(&id).unwrap();
            character.set_has_physics_body(auth, false);
        }
        engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(0.0));
        assert_eq!(engine.state().character(id).unwrap().lifecycle(), Lifecycle::Hidden);

        let events = engine.tick(t(1.1), &mut rules, &SphereOverlap);
        assert!(events.iter().any(|e| matches!(e, CombatEvent::BodyRemoved { .. })));
        assert_eq!(engine.state().character(id).unwrap().lifecycle(), Lifecycle::Respawning);
    }

    #[test]
    fn respawn_delay_escalates_per_consecutive_death() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(0.0));
        let first = engine
            .state()
            .character(id)
            .unwrap()
            .timers()
            .deadline(TimerSlot::Respawn)
            .unwrap();
        assert!((t(0.0).until(first) - 5.0).abs() < 1e-3);

        engine.tick(t(5.0), &mut rules, &SphereOverlap);
        assert!(engine.state().character(id).unwrap().is_alive());

        // Second consecutive death adds the 2s scale on top.
        engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(6.0));
        let second = engine
            .state()
            .character(id)
            .unwrap()
            .timers()
            .deadline(TimerSlot::Respawn)
            .unwrap();
        assert!((t(6.0).until(second) - 7.0).abs() < 1e-3);
    }

    #[test]
    fn rules_may_deny_respawn_and_request_spectate() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll { deny_respawn: true, ..FreeForAll::default() };

        let (_, events) =
            engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(0.0));
        assert!(events.iter().any(|e| matches!(e, CombatEvent::SpectateRequested { .. })));
        assert!(
            engine
                .state()
                .character(id)
                .unwrap()
                .timers()
                .deadline(TimerSlot::Respawn)
                .is_none()
        );
    }

    #[test]
    fn no_deaths_outside_playable_phases() {
        let (mut engine, id) = lone();
        let mut rules = FreeForAll::default();

        engine.set_phase(MatchPhase::LeavingMap);
        let (applied, events) =
            engine.inflict_damage(id, 150.0, Element::Physical, None, &mut rules, t(0.0));
        assert!(applied.is_lethal());
        assert!(!events.iter().any(|e| matches!(e, CombatEvent::Died { .. })));
        assert!(rules.kills.is_empty());
    }

    #[test]
    fn round_reset_restores_defaults_and_clears_deaths() {
        let (mut engine, ids) = arena(
            &[WorldPoint::default(), WorldPoint { x: 300.0, y: 0.0, z: 0.0 }],
            vec![firebolt(30.0)],
        );
        let (a, b) = (ids[0], ids[1]);
        let mut rules = FreeForAll::default();

        engine.inflict_damage(a, 150.0, Element::Fire, None, &mut rules, t(0.0));
        engine.inflict_damage(b, 30.0, Element::Fire, None, &mut rules, t(0.0));
        engine.apply_slow(b, -0.5, 30.0, SpellHandle { caster: a, slot: 0 }, t(0.0));
        engine.set_phase(MatchPhase::RoundEnding);

        let events = engine.round_reset();
        assert_eq!(events, vec![CombatEvent::RoundReset]);
        assert_eq!(engine.state().phase(), MatchPhase::InProgress);
        for id in [a, b] {
            let character = engine.state().character(id).unwrap();
            assert!(character.is_alive());
            assert_eq!(character.health().current(), 100.0);
            assert_eq!(character.deaths(), 0);
            assert_eq!(character.slow_modifier(), 0.0);
            assert!(character.timers().deadline(TimerSlot::Slow).is_none());
        }
    }

    #[test]
    fn removal_destroys_state() {
        let (mut engine, id) = lone();
        let events = engine.remove_character(id);
        assert_eq!(events, vec![CombatEvent::Left { id }]);
        assert!(engine.state().character(id).is_none());
        assert!(engine.remove_character(id).is_empty());
    }
}
