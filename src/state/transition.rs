//! Transition player.
//!
//! Plays the expand and collapse transitions against a [`RenderSurface`] and
//! tracks which request is in flight. Each request carries its own
//! continuation (the [`Direction`]), so completion never has to re-read the
//! controller's flag to know what finished.

use crate::state::surface::{
    Animation, Effect, Motion, Region, RenderSurface, TransitionToken,
};
use tracing::{debug, warn};

/// Which way the bar is moving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Collapsed to expanded.
    Expand,
    /// Expanded to collapsed.
    Collapse,
}

impl Direction {
    /// The coordinated effect pair for this direction: one conceal, one reveal.
    pub fn effects(self) -> [Effect; 2] {
        match self {
            Direction::Expand => [
                Effect {
                    region: Region::LeadingIcon,
                    animation: Animation::FadeOutLeft,
                    motion: Motion::Conceal,
                },
                Effect {
                    region: Region::InputContainer,
                    animation: Animation::FadeInLeft,
                    motion: Motion::Reveal,
                },
            ],
            Direction::Collapse => [
                Effect {
                    region: Region::InputContainer,
                    animation: Animation::FadeOut,
                    motion: Motion::Conceal,
                },
                Effect {
                    region: Region::LeadingIcon,
                    animation: Animation::FadeInRight,
                    motion: Motion::Reveal,
                },
            ],
        }
    }
}

/// Result of asking the player to run a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// Scheduled; completion arrives later with this token.
    Scheduled(TransitionToken),
    /// Could not animate; the caller must complete `Direction` right away.
    Instant(Direction),
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: TransitionToken,
    direction: Direction,
}

/// Sequences transitions and their completion signals.
#[derive(Debug)]
pub struct TransitionPlayer {
    next_token: u64,
    in_flight: Option<InFlight>,
    animations_enabled: bool,
}

impl Default for TransitionPlayer {
    fn default() -> Self {
        Self::new(true)
    }
}

impl TransitionPlayer {
    /// Create a player. With `animations_enabled == false` every transition
    /// completes instantly.
    pub fn new(animations_enabled: bool) -> Self {
        Self {
            next_token: 1,
            in_flight: None,
            animations_enabled,
        }
    }

    /// Whether transitions are animated.
    pub fn animations_enabled(&self) -> bool {
        self.animations_enabled
    }

    /// Turn animation on or off for future transitions.
    pub fn set_animations_enabled(&mut self, enabled: bool) {
        self.animations_enabled = enabled;
    }

    /// Direction of the transition currently in flight, if any.
    pub fn in_flight(&self) -> Option<Direction> {
        self.in_flight.map(|f| f.direction)
    }

    /// Start a transition, superseding any in-flight one.
    ///
    /// Revealed regions are made visible before the effects start so they
    /// can animate into view. Final visibility is left to the caller's
    /// completion handling.
    pub fn play<R: RenderSurface>(&mut self, surface: &mut R, direction: Direction) -> PlayOutcome {
        self.supersede(surface);

        if !self.animations_enabled {
            debug!(?direction, "Animations disabled, completing instantly");
            return PlayOutcome::Instant(direction);
        }

        let token = TransitionToken(self.next_token);
        self.next_token += 1;

        let effects = direction.effects();
        for effect in &effects {
            if effect.motion == Motion::Reveal {
                surface.set_visible(effect.region, true);
            }
        }

        match surface.run_transition(token, &effects) {
            Ok(()) => {
                debug!(?direction, token = token.get(), "Transition scheduled");
                self.in_flight = Some(InFlight { token, direction });
                PlayOutcome::Scheduled(token)
            }
            Err(err) => {
                warn!(?direction, error = %err, "Transition degraded to instant state change");
                PlayOutcome::Instant(direction)
            }
        }
    }

    /// Accept a completion signal from the host.
    ///
    /// Returns the direction to finalize if `token` belongs to the in-flight
    /// transition. Stale tokens (superseded, or already completed) yield
    /// `None`, so each request completes at most once.
    pub fn finish(&mut self, token: TransitionToken) -> Option<Direction> {
        match self.in_flight {
            Some(in_flight) if in_flight.token == token => {
                self.in_flight = None;
                Some(in_flight.direction)
            }
            _ => {
                debug!(token = token.get(), "Ignoring stale transition completion");
                None
            }
        }
    }

    /// Forget the in-flight transition without completing it.
    pub fn cancel<R: RenderSurface>(&mut self, surface: &mut R) {
        self.supersede(surface);
    }

    fn supersede<R: RenderSurface>(&mut self, surface: &mut R) {
        if let Some(previous) = self.in_flight.take() {
            debug!(
                direction = ?previous.direction,
                token = previous.token.get(),
                "Superseding in-flight transition"
            );
            surface.cancel_transition(previous.token);
        }
    }
}

#[cfg(test)]
#[path = "transition_tests.rs"]
mod tests;
