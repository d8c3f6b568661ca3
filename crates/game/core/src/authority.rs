//! Authority capability token.

/// Proof of being the authoritative side.
///
/// Constructed only by [`CombatEngine`](crate::engine::CombatEngine), which
/// is owned by the single authoritative worker. Every mutating method on
/// [`CharacterState`](crate::state::CharacterState) takes `&Authority`, so
/// the authority requirement is part of the function signature: replicas
/// hold no token and non-authoritative mutation is unreachable by
/// construction instead of being a runtime flag check repeated everywhere.
#[derive(Debug)]
pub struct Authority {
    _priv: (),
}

impl Authority {
    /// Crate-private: only the engine mints the token.
    pub(crate) fn new() -> Self {
        Self { _priv: () }
    }
}
