//! Quick-settings style tile that mirrors countdown progress

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::{Mode, TimerListener};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileState {
    Inactive,
    Active,
    Unavailable,
}

/// Cup icon, filled according to the time left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileIcon {
    Empty,
    OneThird,
    TwoThirds,
    Full,
}

impl TileIcon {
    pub fn for_percentage(percentage: f32) -> Self {
        if percentage > 0.66 {
            TileIcon::Full
        } else if percentage > 0.33 {
            TileIcon::TwoThirds
        } else {
            TileIcon::OneThird
        }
    }
}

/// What the tile currently shows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TileView {
    pub state: TileState,
    pub label: String,
    pub icon: TileIcon,
}

impl Default for TileView {
    fn default() -> Self {
        Self {
            state: TileState::Inactive,
            label: Mode::Inactive.label().to_string(),
            icon: TileIcon::Empty,
        }
    }
}

#[derive(Debug, Default)]
pub struct TilePresenter {
    view: Mutex<TileView>,
}

impl TilePresenter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> TileView {
        self.view.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Grey the tile out, e.g. while the screen is off
    pub fn set_unavailable(&self) {
        self.update(TileView {
            state: TileState::Unavailable,
            ..TileView::default()
        });
    }

    /// Show the idle tile
    pub fn show_idle(&self) {
        self.update(TileView::default());
    }

    fn update(&self, view: TileView) {
        debug!("Updating tile: {:?} {:?} {}", view.state, view.icon, view.label);
        *self.view.lock().unwrap_or_else(PoisonError::into_inner) = view;
    }
}

impl TimerListener for TilePresenter {
    fn on_tick(&self, label: &str, percentage: f32) {
        self.update(TileView {
            state: TileState::Active,
            label: label.to_string(),
            icon: TileIcon::for_percentage(percentage),
        });
    }

    fn on_finish(&self) {
        self.show_idle();
    }
}
