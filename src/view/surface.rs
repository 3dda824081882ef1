//! Terminal rendering surface.
//!
//! Holds everything the bar widget draws: region visibility, icons, the
//! placeholder, the leading inset, the open menu and the transition that
//! is currently animating. Transitions advance on [`TerminalSurface::tick`],
//! which the event loop calls with the elapsed wall-clock time.

use crate::model::{IconId, IconSlot};
use crate::state::{
    Animation, Effect, Motion, Region, RenderSurface, TransitionError, TransitionToken,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tracing::{debug, warn};

/// A transition being drawn.
#[derive(Debug, Clone, PartialEq)]
struct ActiveTransition {
    token: TransitionToken,
    effects: Vec<Effect>,
    elapsed: Duration,
    duration: Duration,
}

impl ActiveTransition {
    fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }
}

/// Saved portion of the surface.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
struct BaseViewState {
    visible: Vec<Region>,
    leading_inset: u16,
}

/// Open overflow menu popup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuPopup {
    items: Vec<String>,
    selected: usize,
}

impl MenuPopup {
    /// Menu items.
    pub fn items(&self) -> &[String] {
        &self.items
    }

    /// Highlighted item index.
    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Highlighted item.
    pub fn selected_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    /// Move the highlight down, wrapping.
    pub fn select_next(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + 1) % self.items.len();
        }
    }

    /// Move the highlight up, wrapping.
    pub fn select_prev(&mut self) {
        if !self.items.is_empty() {
            self.selected = (self.selected + self.items.len() - 1) % self.items.len();
        }
    }
}

/// [`RenderSurface`] drawn by [`crate::view::SearchBarView`].
#[derive(Debug, Clone)]
pub struct TerminalSurface {
    visible: BTreeSet<Region>,
    icons: HashMap<IconSlot, IconId>,
    placeholder: Option<String>,
    leading_inset: u16,
    catalog: HashMap<Animation, Duration>,
    active: Option<ActiveTransition>,
    menu: Option<MenuPopup>,
}

impl TerminalSurface {
    /// Surface whose animations are looked up in `catalog`.
    ///
    /// A transition that names an animation missing from the catalog fails
    /// with [`TransitionError::ResourceUnavailable`].
    pub fn new(catalog: HashMap<Animation, Duration>) -> Self {
        Self {
            visible: BTreeSet::new(),
            icons: HashMap::new(),
            placeholder: None,
            leading_inset: 0,
            catalog,
            active: None,
            menu: None,
        }
    }

    /// Advance the running transition by `elapsed`.
    ///
    /// Returns the token once the transition has run its full duration; the
    /// caller hands it to `SearchBar::on_transition_finished`.
    pub fn tick(&mut self, elapsed: Duration) -> Option<TransitionToken> {
        let active = self.active.as_mut()?;
        active.elapsed += elapsed;
        if active.elapsed < active.duration {
            return None;
        }
        let token = active.token;
        self.active = None;
        debug!(token = token.get(), "Transition finished");
        Some(token)
    }

    /// Whether a transition is animating.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Running effect on `region` and its progress in `0.0..=1.0`.
    pub fn effect_on(&self, region: Region) -> Option<(Effect, f32)> {
        let active = self.active.as_ref()?;
        let effect = active.effects.iter().find(|e| e.region == region)?;
        Some((*effect, active.progress()))
    }

    /// Whether `region` should be drawn this frame.
    ///
    /// A revealed region appears in the second half of its effect and a
    /// concealed one disappears there.
    pub fn is_drawn(&self, region: Region) -> bool {
        match self.effect_on(region) {
            Some((effect, progress)) => match effect.motion {
                Motion::Reveal => self.is_visible(region) && progress >= 0.5,
                Motion::Conceal => progress < 0.5,
            },
            None => self.is_visible(region),
        }
    }

    /// Icon assigned to `slot`.
    pub fn icon(&self, slot: IconSlot) -> IconId {
        self.icons.get(&slot).copied().unwrap_or_default()
    }

    /// Collapsed prompt.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Input container offset from the leading edge.
    pub fn leading_inset(&self) -> u16 {
        self.leading_inset
    }

    /// Open menu popup, if any.
    pub fn menu(&self) -> Option<&MenuPopup> {
        self.menu.as_ref()
    }

    /// Open menu popup, mutably.
    pub fn menu_mut(&mut self) -> Option<&mut MenuPopup> {
        self.menu.as_mut()
    }

    /// Close the menu popup.
    pub fn dismiss_menu(&mut self) {
        self.menu = None;
    }
}

impl RenderSurface for TerminalSurface {
    fn set_visible(&mut self, region: Region, visible: bool) {
        if visible {
            self.visible.insert(region);
        } else {
            self.visible.remove(&region);
        }
    }

    fn is_visible(&self, region: Region) -> bool {
        self.visible.contains(&region)
    }

    fn run_transition(
        &mut self,
        token: TransitionToken,
        effects: &[Effect],
    ) -> Result<(), TransitionError> {
        let mut duration = Duration::ZERO;
        for effect in effects {
            let length = self
                .catalog
                .get(&effect.animation)
                .ok_or(TransitionError::ResourceUnavailable(effect.animation))?;
            duration = duration.max(*length);
        }

        debug!(token = token.get(), ?duration, "Transition started");
        self.active = Some(ActiveTransition {
            token,
            effects: effects.to_vec(),
            elapsed: Duration::ZERO,
            duration,
        });
        Ok(())
    }

    fn cancel_transition(&mut self, token: TransitionToken) {
        if self.active.as_ref().is_some_and(|a| a.token == token) {
            debug!(token = token.get(), "Transition cancelled");
            self.active = None;
        }
    }

    fn set_leading_inset(&mut self, cells: u16) {
        self.leading_inset = cells;
    }

    fn set_icon(&mut self, slot: IconSlot, icon: IconId) {
        self.icons.insert(slot, icon);
    }

    fn set_placeholder(&mut self, text: Option<&str>) {
        self.placeholder = text.map(str::to_string);
    }

    fn show_menu(&mut self, items: &[String]) {
        self.menu = Some(MenuPopup {
            items: items.to_vec(),
            selected: 0,
        });
    }

    fn save_base_state(&self) -> Vec<u8> {
        let base = BaseViewState {
            visible: self.visible.iter().copied().collect(),
            leading_inset: self.leading_inset,
        };
        serde_json::to_vec(&base).unwrap_or_default()
    }

    fn restore_base_state(&mut self, state: &[u8]) {
        if state.is_empty() {
            return;
        }
        match serde_json::from_slice::<BaseViewState>(state) {
            Ok(base) => {
                self.visible = base.visible.into_iter().collect();
                self.leading_inset = base.leading_inset;
            }
            Err(e) => warn!(error = %e, "Ignoring malformed surface state"),
        }
    }
}
