//! Pull-to-refresh state machine
//!
//! Converts two independently measured rectangles into a scroll offset and
//! drives the refresh lifecycle:
//! - Edge-triggered arming when the drag crosses the travel distance
//! - Freezing the indicator slot open when the drag is released mid-refresh
//! - Derived indicator offset, content alignment and indicator opacity
//!
//! The machine never runs the refresh action itself. Arming hands back a
//! [`RefreshTicket`]; whoever hosts the machine launches the action and
//! returns the ticket through [`RefreshState::finish_refresh`] once it
//! completes.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace, warn};

use crate::config::RefreshConfig;
use crate::geometry::Rect;

/// Drag progress below which the indicator stays fully transparent
pub const ACTIVITY_THRESHOLD: f32 = 0.6;

/// Which measured rectangle a report refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectSource {
    /// The non-scrolling container
    Fixed,
    /// The zero-height marker pinned to the top of the content
    Moving,
}

/// Identifies one armed refresh
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefreshTicket(u64);

impl RefreshTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A transition taken while applying an update
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTransition {
    /// A refresh was armed; the host must run the action for this ticket
    Armed(RefreshTicket),
    /// The indicator slot was frozen open
    Frozen,
    /// The indicator slot was released
    Unfrozen,
}

/// Result of a single [`RefreshState::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOutcome {
    /// Whether the reported rectangle differed from the stored one
    pub changed: bool,
    /// Transitions taken, in order
    pub transitions: SmallVec<[RefreshTransition; 2]>,
}

impl UpdateOutcome {
    /// The ticket of a refresh armed by this update, if any
    pub fn armed(&self) -> Option<RefreshTicket> {
        self.transitions.iter().find_map(|t| match t {
            RefreshTransition::Armed(ticket) => Some(*ticket),
            _ => None,
        })
    }

    pub fn froze(&self) -> bool {
        self.transitions.contains(&RefreshTransition::Frozen)
    }

    pub fn unfroze(&self) -> bool {
        self.transitions.contains(&RefreshTransition::Unfrozen)
    }
}

/// Published fields, copied out for observers
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RefreshSnapshot {
    pub percentage: f32,
    pub refreshing: bool,
    pub frozen: bool,
    pub indicator_offset: f32,
    pub alignment_offset: f32,
    pub indicator_opacity: f32,
    pub scroll_offset: f32,
    pub refresh_count: u64,
}

/// Offset-tracking refresh state machine
#[derive(Debug, Clone)]
pub struct RefreshState {
    config: RefreshConfig,

    moving_rect: Rect,
    fixed_rect: Rect,
    moving_reported: bool,
    fixed_reported: bool,
    previous_scroll_offset: f32,

    scroll_offset: f32,
    percentage: f32,
    refreshing: bool,
    frozen: bool,
    indicator_offset: f32,
    alignment_offset: f32,
    indicator_opacity: f32,

    refresh_count: u64,
    outstanding: Option<RefreshTicket>,
    next_ticket: u64,
}

impl Default for RefreshState {
    fn default() -> Self {
        Self::new(RefreshConfig::default())
    }
}

impl RefreshState {
    pub fn new(config: RefreshConfig) -> Self {
        let mut state = Self {
            config,
            moving_rect: Rect::ZERO,
            fixed_rect: Rect::ZERO,
            moving_reported: false,
            fixed_reported: false,
            previous_scroll_offset: 0.0,
            scroll_offset: 0.0,
            percentage: 0.0,
            refreshing: false,
            frozen: false,
            indicator_offset: 0.0,
            alignment_offset: 0.0,
            indicator_opacity: 0.0,
            refresh_count: 0,
            outstanding: None,
            next_ticket: 1,
        };
        state.recompute_derived();
        state
    }

    pub fn config(&self) -> &RefreshConfig {
        &self.config
    }

    /// Apply a rectangle reported by the layout pass
    ///
    /// A report identical to the stored rectangle does not re-evaluate the
    /// thresholds and leaves the previous scroll offset alone; only the
    /// level-triggered unfreeze rule applies to it.
    ///
    /// Until both rectangles have been reported at least once the content
    /// reads as at rest and no threshold is evaluated.
    pub fn update(&mut self, source: RectSource, rect: Rect) -> UpdateOutcome {
        let mut outcome = UpdateOutcome::default();

        let (slot, reported) = match source {
            RectSource::Fixed => (&mut self.fixed_rect, &mut self.fixed_reported),
            RectSource::Moving => (&mut self.moving_rect, &mut self.moving_reported),
        };
        let first_report = !std::mem::replace(reported, true);

        if *slot == rect && !first_report {
            if self.release_frozen_slot() {
                outcome.transitions.push(RefreshTransition::Unfrozen);
                self.recompute_derived();
            }
            return outcome;
        }

        *slot = rect;
        outcome.changed = true;

        if !self.is_measured() {
            trace!(?source, "waiting for the other rectangle");
            return outcome;
        }

        let travel = self.config.travel_distance();
        let previous = self.previous_scroll_offset;
        let scroll_offset = self.measure_scroll_offset();

        self.scroll_offset = scroll_offset;
        self.percentage = progress(scroll_offset, travel);

        // Crossing the threshold on the way down starts a refresh
        if !self.refreshing && previous <= travel && scroll_offset > travel {
            let ticket = self.arm();
            outcome.transitions.push(RefreshTransition::Armed(ticket));
        }

        if self.refreshing {
            // Crossing back up while still refreshing holds the slot open
            if previous > travel && scroll_offset <= travel && !self.frozen {
                self.frozen = true;
                debug!(scroll_offset, "refresh slot frozen");
                outcome.transitions.push(RefreshTransition::Frozen);
            }
        } else if self.release_frozen_slot() {
            outcome.transitions.push(RefreshTransition::Unfrozen);
        }

        self.recompute_derived();
        self.previous_scroll_offset = scroll_offset;

        trace!(
            ?source,
            scroll_offset,
            percentage = self.percentage,
            refreshing = self.refreshing,
            frozen = self.frozen,
            "refresh geometry updated"
        );

        outcome
    }

    /// Arm a refresh without a drag, e.g. from a platform refresh control
    ///
    /// A slot still frozen from a finished refresh is released first.
    /// Returns `None` if a refresh is already outstanding.
    pub fn begin_refresh(&mut self) -> Option<RefreshTicket> {
        if self.refreshing {
            return None;
        }
        self.release_frozen_slot();
        let ticket = self.arm();
        self.recompute_derived();
        Some(ticket)
    }

    /// Mark the refresh identified by `ticket` as complete
    ///
    /// The frozen slot is left in place; the next update releases it.
    /// Returns false if the ticket is not the outstanding one.
    pub fn finish_refresh(&mut self, ticket: RefreshTicket) -> bool {
        if self.outstanding != Some(ticket) {
            warn!(
                ticket = ticket.id(),
                outstanding = ?self.outstanding.map(|t| t.id()),
                "ignoring completion for a refresh that is not outstanding"
            );
            return false;
        }

        self.outstanding = None;
        self.refreshing = false;
        self.recompute_derived();
        debug!(ticket = ticket.id(), "refresh finished");
        true
    }

    /// Copy the published fields
    pub fn snapshot(&self) -> RefreshSnapshot {
        RefreshSnapshot {
            percentage: self.percentage,
            refreshing: self.refreshing,
            frozen: self.frozen,
            indicator_offset: self.indicator_offset,
            alignment_offset: self.alignment_offset,
            indicator_opacity: self.indicator_opacity,
            scroll_offset: self.scroll_offset,
            refresh_count: self.refresh_count,
        }
    }

    pub fn percentage(&self) -> f32 {
        self.percentage
    }

    pub fn is_refreshing(&self) -> bool {
        self.refreshing
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    pub fn indicator_offset(&self) -> f32 {
        self.indicator_offset
    }

    pub fn alignment_offset(&self) -> f32 {
        self.alignment_offset
    }

    pub fn indicator_opacity(&self) -> f32 {
        self.indicator_opacity
    }

    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    pub fn previous_scroll_offset(&self) -> f32 {
        self.previous_scroll_offset
    }

    pub fn refresh_count(&self) -> u64 {
        self.refresh_count
    }

    pub fn outstanding(&self) -> Option<RefreshTicket> {
        self.outstanding
    }

    pub fn moving_rect(&self) -> Rect {
        self.moving_rect
    }

    pub fn fixed_rect(&self) -> Rect {
        self.fixed_rect
    }

    /// Whether both rectangles have been reported at least once
    pub fn is_measured(&self) -> bool {
        self.moving_reported && self.fixed_reported
    }

    fn arm(&mut self) -> RefreshTicket {
        let ticket = RefreshTicket(self.next_ticket);
        self.next_ticket += 1;
        self.refreshing = true;
        self.outstanding = Some(ticket);
        self.refresh_count += 1;
        debug!(
            ticket = ticket.id(),
            scroll_offset = self.scroll_offset,
            "refresh armed"
        );
        ticket
    }

    /// Drop the frozen slot once no refresh is outstanding
    fn release_frozen_slot(&mut self) -> bool {
        if !self.refreshing && self.frozen {
            self.frozen = false;
            debug!("refresh slot released");
            true
        } else {
            false
        }
    }

    fn measure_scroll_offset(&self) -> f32 {
        if self.moving_rect.is_finite() && self.fixed_rect.is_finite() {
            self.moving_rect.top() - self.fixed_rect.top()
        } else {
            0.0
        }
    }

    fn recompute_derived(&mut self) {
        let holding_slot = self.refreshing && self.frozen;
        let activity_offset = self.config.activity_offset();

        if self.config.insert_activity() {
            if holding_slot {
                self.indicator_offset = -activity_offset;
                self.alignment_offset = -activity_offset;
            } else {
                self.indicator_offset = -self.scroll_offset;
                self.alignment_offset = 0.0;
            }
        } else {
            self.indicator_offset = -activity_offset;
            self.alignment_offset = 0.0;
        }

        self.indicator_opacity = if holding_slot {
            1.0
        } else {
            fade_in(self.percentage)
        };
    }
}

/// Drag progress, clamped to `[0, 1]`
fn progress(scroll_offset: f32, travel_distance: f32) -> f32 {
    (scroll_offset / travel_distance).clamp(0.0, 1.0)
}

/// Indicator opacity ramp above [`ACTIVITY_THRESHOLD`]
fn fade_in(percentage: f32) -> f32 {
    if percentage < ACTIVITY_THRESHOLD {
        0.0
    } else {
        ((percentage - ACTIVITY_THRESHOLD) / (1.0 - ACTIVITY_THRESHOLD)).min(1.0)
    }
}
