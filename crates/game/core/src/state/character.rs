//! Per-character combat state.
//!
//! Owned exclusively by the authoritative side; observers hold read-only
//! replicas assembled from [`CombatEvent`](crate::event::CombatEvent)s.
//! Every mutator takes [`&Authority`](crate::authority::Authority), so
//! non-authoritative code cannot reach them by construction.

use std::fmt;
use std::sync::Arc;

use crate::archetype::Archetype;
use crate::authority::Authority;
use crate::combat::resist::{RESIST_MAX, RESIST_MIN};
use crate::combat::{Element, ResistLayers, StanceKind, StanceProfile, StanceRing};
use crate::config::ArchetypeConfig;
use crate::lifecycle::Lifecycle;
use crate::spell::{ActiveSlow, PendingCast, SpellBar, SpellSlot};
use crate::state::{CharacterId, GameTime, TeamId, WorldPoint};
use crate::state::meter::ResourceMeter;
use crate::timer::{TimerSet, TimerSlot};

/// Authoritative combat state of one character.
#[derive(Clone)]
pub struct CharacterState {
    id: CharacterId,
    team: TeamId,
    archetype: Arc<dyn Archetype>,

    /// Archetype defaults, immutable after spawn.
    base: ArchetypeConfig,

    health: ResourceMeter,
    oil: ResourceMeter,
    resists: ResistLayers,

    stance_ring: StanceRing,
    active_profile: StanceProfile,

    /// Additive movement layers, each owned by exactly one subsystem.
    movement_mod_stance: f32,
    movement_mod_slow: f32,
    /// Derived; recomputed eagerly whenever a movement layer changes.
    live_movement_speed: f32,

    stunned: bool,
    casting_enabled: bool,
    lifecycle: Lifecycle,
    /// Whether a physical representation with physics support exists, i.e.
    /// whether death can enter ragdoll instead of hiding the body.
    has_physics_body: bool,

    position: WorldPoint,
    yaw: f32,
    /// Last reported movement speed, squared.
    speed_sq: f32,

    spell_bar: SpellBar,
    pending_cast: Option<PendingCast>,
    active_slow: Option<ActiveSlow>,
    timers: TimerSet,

    /// Consecutive deaths since the last round reset; scales the respawn
    /// penalty.
    deaths: u32,
}

impl CharacterState {
    /// Spawn a character with archetype defaults applied. The default stance
    /// profile is entered immediately, matching spawn-time stance
    /// replication in the original flow.
    pub fn spawn(
        auth: &Authority,
        id: CharacterId,
        team: TeamId,
        archetype: Arc<dyn Archetype>,
        position: WorldPoint,
    ) -> Self {
        let base = archetype.config();
        let mut spell_bar = SpellBar::new();
        for spec in archetype.loadout() {
            if !spell_bar.add(spec) {
                break; // loadout longer than the bar; extra spells dropped
            }
        }

        let mut character = Self {
            id,
            team,
            base,
            health: ResourceMeter::full(base.max_health),
            oil: ResourceMeter::full(base.max_oil),
            resists: ResistLayers::new(base.base_resists),
            stance_ring: StanceRing::new(archetype.stances()),
            active_profile: StanceProfile::default(),
            movement_mod_stance: 0.0,
            movement_mod_slow: 0.0,
            live_movement_speed: base.movement_speed,
            stunned: false,
            casting_enabled: true,
            lifecycle: Lifecycle::Alive,
            has_physics_body: true,
            position,
            yaw: 0.0,
            speed_sq: 0.0,
            spell_bar,
            pending_cast: None,
            active_slow: None,
            timers: TimerSet::new(),
            deaths: 0,
            archetype,
        };
        let default_stance = character.stance_ring.current();
        character.enter_stance(auth, default_stance);
        character
    }

    // ===== read access (replicated fields) =====

    pub fn id(&self) -> CharacterId {
        self.id
    }

    pub fn team(&self) -> TeamId {
        self.team
    }

    pub fn archetype(&self) -> &Arc<dyn Archetype> {
        &self.archetype
    }

    pub fn base(&self) -> &ArchetypeConfig {
        &self.base
    }

    pub fn health(&self) -> &ResourceMeter {
        &self.health
    }

    pub fn oil(&self) -> &ResourceMeter {
        &self.oil
    }

    pub fn is_alive(&self) -> bool {
        self.health.has_remaining()
    }

    pub fn resists(&self) -> &ResistLayers {
        &self.resists
    }

    pub fn current_stance(&self) -> StanceKind {
        self.stance_ring.current()
    }

    pub fn active_profile(&self) -> &StanceProfile {
        &self.active_profile
    }

    /// Derived movement speed after stance and slow layers, clamped to the
    /// archetype's range.
    pub fn movement_speed(&self) -> f32 {
        self.live_movement_speed
    }

    pub fn slow_modifier(&self) -> f32 {
        self.movement_mod_slow
    }

    pub fn is_stunned(&self) -> bool {
        self.stunned
    }

    pub fn casting_enabled(&self) -> bool {
        self.casting_enabled
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn has_physics_body(&self) -> bool {
        self.has_physics_body
    }

    pub fn position(&self) -> WorldPoint {
        self.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn speed_squared(&self) -> f32 {
        self.speed_sq
    }

    pub fn spell_bar(&self) -> &SpellBar {
        &self.spell_bar
    }

    pub fn spell_slot(&self, index: usize) -> Option<&SpellSlot> {
        self.spell_bar.get(index)
    }

    pub fn pending_cast(&self) -> Option<&PendingCast> {
        self.pending_cast.as_ref()
    }

    pub fn active_slow(&self) -> Option<&ActiveSlow> {
        self.active_slow.as_ref()
    }

    pub fn timers(&self) -> &TimerSet {
        &self.timers
    }

    pub fn deaths(&self) -> u32 {
        self.deaths
    }

    /// Outgoing damage modifier for a spell of `element` under the active
    /// stance, as interpreted by the archetype hook.
    pub fn outgoing_damage_modifier(&self, element: Element) -> f32 {
        self.archetype.damage_modifier(element, &self.active_profile)
    }

    // ===== authoritative mutation =====

    /// Add to health (negative for damage). Returns the change applied.
    pub fn apply_health(&mut self, _auth: &Authority, delta: f32) -> f32 {
        self.health.apply(delta)
    }

    /// Add to oil (negative to spend). Returns the change applied.
    pub fn apply_oil(&mut self, _auth: &Authority, delta: f32) -> f32 {
        self.oil.apply(delta)
    }

    pub fn set_stunned(&mut self, _auth: &Authority, stunned: bool) {
        self.stunned = stunned;
    }

    pub fn set_casting_enabled(&mut self, _auth: &Authority, enabled: bool) {
        self.casting_enabled = enabled;
    }

    pub fn set_lifecycle(&mut self, _auth: &Authority, lifecycle: Lifecycle) {
        self.lifecycle = lifecycle;
    }

    pub fn set_has_physics_body(&mut self, _auth: &Authority, has_body: bool) {
        self.has_physics_body = has_body;
    }

    pub fn set_facing(&mut self, _auth: &Authority, yaw: f32) {
        self.yaw = yaw;
    }

    pub fn set_movement(&mut self, _auth: &Authority, position: WorldPoint, speed_sq: f32) {
        self.position = position;
        self.speed_sq = speed_sq;
    }

    /// Enter a stance: the whole modifier profile is applied atomically,
    /// overwriting the previous stance's contribution.
    pub fn enter_stance(&mut self, _auth: &Authority, kind: StanceKind) {
        let profile = self.archetype.profile(kind);
        self.active_profile = profile;
        self.movement_mod_stance = profile.mobility_mod;
        self.resists.set_stance_shift(profile.defense_mod);
        self.recompute_movement();
    }

    /// Step the stance ring and enter the newly selected stance.
    pub fn advance_stance(&mut self, auth: &Authority, direction: i32) -> StanceKind {
        let kind = self.stance_ring.advance(direction);
        self.enter_stance(auth, kind);
        kind
    }

    pub fn begin_cast(&mut self, _auth: &Authority, pending: PendingCast) {
        self.pending_cast = Some(pending);
    }

    pub fn take_pending_cast(&mut self, _auth: &Authority) -> Option<PendingCast> {
        self.pending_cast.take()
    }

    pub fn set_slow(&mut self, _auth: &Authority, slow: ActiveSlow) {
        self.movement_mod_slow = slow.modifier;
        self.active_slow = Some(slow);
        self.recompute_movement();
    }

    pub fn clear_slow(&mut self, _auth: &Authority) {
        self.movement_mod_slow = 0.0;
        self.active_slow = None;
        self.recompute_movement();
    }

    pub fn shift_resist(&mut self, _auth: &Authority, element: Element, delta: f32) {
        self.resists.shift_element(element, delta);
    }

    pub fn shift_all_resists(&mut self, _auth: &Authority, delta: f32) {
        self.resists.shift_all(delta);
    }

    pub fn spell_slot_mut(&mut self, _auth: &Authority, index: usize) -> Option<&mut SpellSlot> {
        self.spell_bar.get_mut(index)
    }

    pub fn bind_timer(&mut self, _auth: &Authority, slot: TimerSlot, deadline: GameTime) {
        self.timers.bind(slot, deadline);
    }

    pub fn cancel_timer(&mut self, _auth: &Authority, slot: TimerSlot) -> Option<GameTime> {
        self.timers.cancel(slot)
    }

    pub fn fire_due_timers(&mut self, _auth: &Authority, now: GameTime) -> Vec<TimerSlot> {
        self.timers.fire_due(now).collect()
    }

    pub fn register_death(&mut self, _auth: &Authority) -> u32 {
        self.deaths += 1;
        self.deaths
    }

    /// Restore archetype defaults for a new life. The death counter is
    /// untouched; only [`reset_round`](Self::reset_round) clears it.
    pub fn revive(&mut self, auth: &Authority) {
        self.health.refill();
        self.oil.refill();
        self.resists.clear_buffs();
        self.stance_ring.reset();
        self.movement_mod_slow = 0.0;
        self.active_slow = None;
        self.pending_cast = None;
        self.stunned = false;
        self.casting_enabled = true;
        self.lifecycle = Lifecycle::Alive;
        self.speed_sq = 0.0;
        self.spell_bar.reset();
        self.timers.clear();
        let default_stance = self.stance_ring.current();
        self.enter_stance(auth, default_stance);
    }

    /// Full reinitialization on round reset: defaults restored and the
    /// death counter cleared.
    pub fn reset_round(&mut self, auth: &Authority) {
        self.revive(auth);
        self.deaths = 0;
    }

    fn recompute_movement(&mut self) {
        let combined = self.movement_mod_stance + self.movement_mod_slow;
        let speed_mod = 1.0 + combined.clamp(RESIST_MIN, RESIST_MAX);
        self.live_movement_speed = (self.base.movement_speed * speed_mod)
            .clamp(self.base.min_movement_speed, self.base.max_movement_speed);
    }
}

impl fmt::Debug for CharacterState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CharacterState")
            .field("id", &self.id)
            .field("archetype", &self.archetype.name())
            .field("health", &self.health)
            .field("oil", &self.oil)
            .field("stance", &self.current_stance())
            .field("lifecycle", &self.lifecycle)
            .field("stunned", &self.stunned)
            .finish_non_exhaustive()
    }
}
