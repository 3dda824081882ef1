//! Collapsible search bar
//!
//! A search bar that toggles between a collapsed placeholder and an
//! expanded input field with animated transitions, plus a terminal host
//! that draws it.
//!
//! The widget core lives in [`state`] and only talks to its host through
//! the collaborator traits in [`state::surface`], following the Pure Core /
//! Impure Shell split: [`model`] and [`state`] are pure, [`view`] owns the
//! terminal.

pub mod config;
pub mod logging;
pub mod model;
pub mod state;
pub mod view;

#[cfg(test)]
mod test_harness;
