//! A two-handle range selector over a fixed one-dimensional domain.
//!
//! The selector owns its handle pair and is the only thing allowed to mutate
//! it. At every observable point, including in the middle of a drag:
//!
//! ```text
//! 0 <= lower < upper <= domain_max    and    upper - lower >= 1
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Minimum distance between the two handles, in domain units.
pub const MIN_RANGE_WIDTH: f32 = 1.0;

/// Identifies one of the two handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Handle {
    Lower,
    Upper,
}

/// Errors raised when a selector is constructed with an invalid state.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RangeError {
    #[error("Domain maximum must be finite and at least 1, got {0}")]
    InvalidDomain(f32),

    #[error("Range [{lower}, {upper}] does not fit domain [0, {domain_max}] with a minimum width of 1")]
    InvalidRange {
        lower: f32,
        upper: f32,
        domain_max: f32,
    },
}

/// A `(start, end)` pair in effect after a drag ends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CommittedRange {
    pub start: f32,
    pub end: f32,
}

impl CommittedRange {
    pub fn width(&self) -> f32 {
        self.end - self.start
    }

    /// Number of whole units covered, used to size sample requests.
    pub fn unit_count(&self) -> usize {
        self.width().round().max(0.0) as usize
    }
}

/// Horizontal placement of the selector track on screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RangeTrack {
    /// Left edge in screen space
    pub x: f32,
    /// Track width in pixels
    pub width: f32,
}

impl RangeTrack {
    pub fn new(x: f32, width: f32) -> Self {
        Self { x, width }
    }

    /// Convert a screen x position to a fraction of the track, clamped to `[0, 1]`.
    pub fn fraction_at(&self, screen_x: f32) -> f32 {
        if self.width <= 0.0 || !self.width.is_finite() {
            return 0.0;
        }
        ((screen_x - self.x) / self.width).clamp(0.0, 1.0)
    }
}

/// Presentational labels for the current handle values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeLabels {
    pub start: String,
    pub end: String,
    pub duration: String,
}

/// Two-thumb range selector state.
#[derive(Debug, Clone, PartialEq)]
pub struct RangeSelector {
    domain_max: f32,
    lower: f32,
    upper: f32,
    /// Handle currently being dragged
    active: Option<Handle>,
    /// Range committed before the active drag began
    drag_origin: Option<CommittedRange>,
}

impl RangeSelector {
    /// Create a selector over `[0, domain_max]` with the given initial handles.
    pub fn new(domain_max: f32, lower: f32, upper: f32) -> Result<Self, RangeError> {
        if !domain_max.is_finite() || domain_max < MIN_RANGE_WIDTH {
            return Err(RangeError::InvalidDomain(domain_max));
        }

        let valid = lower.is_finite()
            && upper.is_finite()
            && lower >= 0.0
            && lower < upper
            && upper <= domain_max
            && upper - lower >= MIN_RANGE_WIDTH;
        if !valid {
            return Err(RangeError::InvalidRange {
                lower,
                upper,
                domain_max,
            });
        }

        Ok(Self {
            domain_max,
            lower,
            upper,
            active: None,
            drag_origin: None,
        })
    }

    pub fn domain_max(&self) -> f32 {
        self.domain_max
    }

    /// Live lower handle value (moves during a drag).
    pub fn lower(&self) -> f32 {
        self.lower
    }

    /// Live upper handle value (moves during a drag).
    pub fn upper(&self) -> f32 {
        self.upper
    }

    /// The handle being dragged, if any.
    pub fn active_handle(&self) -> Option<Handle> {
        self.active
    }

    pub fn is_dragging(&self) -> bool {
        self.active.is_some()
    }

    /// The last committed range. During a drag this is the range in effect
    /// before the drag began.
    pub fn committed(&self) -> CommittedRange {
        self.drag_origin.unwrap_or(CommittedRange {
            start: self.lower,
            end: self.upper,
        })
    }

    /// Start dragging `handle`. No-op (returns `false`) if a drag is active.
    pub fn begin_drag(&mut self, handle: Handle) -> bool {
        if let Some(active) = self.active {
            log::debug!(
                "Ignoring drag start on {:?} handle, {:?} handle already active",
                handle,
                active
            );
            return false;
        }
        self.drag_origin = Some(self.committed());
        self.active = Some(handle);
        log::debug!("Range handle drag started: {:?}", handle);
        true
    }

    /// Move the active handle to `fraction` of the domain.
    ///
    /// Out-of-range fractions are clamped to `[0, 1]`; non-finite fractions
    /// are dropped. The ordering and minimum-gap constraint is applied on
    /// every update. Returns whether a handle value changed.
    pub fn update_drag(&mut self, fraction: f32) -> bool {
        let Some(handle) = self.active else {
            return false;
        };

        if !fraction.is_finite() {
            log::warn!("Degenerate drag: non-finite pointer fraction {}, ignored", fraction);
            return false;
        }
        let clamped = fraction.clamp(0.0, 1.0);
        if clamped != fraction {
            log::warn!(
                "Degenerate drag: pointer fraction {} outside [0, 1], clamped to {}",
                fraction,
                clamped
            );
        }

        let raw = clamped * self.domain_max;
        let (old_lower, old_upper) = (self.lower, self.upper);
        match handle {
            Handle::Lower => {
                self.lower = raw.min(max_lower_for(self.upper));
            }
            Handle::Upper => {
                self.upper = raw.max(min_upper_for(self.lower));
            }
        }

        self.lower != old_lower || self.upper != old_upper
    }

    /// Finish the active drag and commit the resulting range.
    ///
    /// Returns `None` if no drag was active.
    pub fn end_drag(&mut self) -> Option<CommittedRange> {
        let handle = self.active.take()?;
        self.drag_origin = None;
        let committed = self.committed();
        log::debug!(
            "Range handle drag ended: {:?}, committed [{:.2}, {:.2}]",
            handle,
            committed.start,
            committed.end
        );
        Some(committed)
    }

    /// Abandon the active drag, restoring the range committed before it began.
    ///
    /// Returns `false` if no drag was active.
    pub fn cancel_drag(&mut self) -> bool {
        if self.active.take().is_none() {
            return false;
        }
        if let Some(origin) = self.drag_origin.take() {
            self.lower = origin.start;
            self.upper = origin.end;
        }
        log::debug!("Range handle drag cancelled");
        true
    }

    /// Clock labels for both handles plus the rounded duration.
    pub fn labels(&self) -> RangeLabels {
        RangeLabels {
            start: format_clock(self.lower),
            end: format_clock(self.upper),
            duration: format!("Duration: {} hours", (self.upper - self.lower).round()),
        }
    }
}

/// Smallest value `u` with `u - lower >= MIN_RANGE_WIDTH` under f32 arithmetic.
fn min_upper_for(lower: f32) -> f32 {
    let mut upper = lower + MIN_RANGE_WIDTH;
    while upper - lower < MIN_RANGE_WIDTH {
        upper = f32::from_bits(upper.to_bits() + 1);
    }
    upper
}

/// Largest value `l` with `upper - l >= MIN_RANGE_WIDTH` under f32 arithmetic.
///
/// Expects `upper >= MIN_RANGE_WIDTH`, so the result is never negative.
fn max_lower_for(upper: f32) -> f32 {
    let mut lower = upper - MIN_RANGE_WIDTH;
    while upper - lower < MIN_RANGE_WIDTH && lower > 0.0 {
        lower = f32::from_bits(lower.to_bits() - 1);
    }
    lower
}

/// Format a domain value in hours as a 12-hour clock label, e.g. `01:30 PM`.
///
/// The whole part is the hour of day (wrapping every 24), the fractional part
/// becomes minutes.
pub fn format_clock(hours: f32) -> String {
    let hours = hours.max(0.0);
    let hour_of_day = (hours.floor() as u64 % 24) as u32;
    let minutes = ((hours.fract() * 60.0).trunc() as u32).min(59);

    let suffix = if hour_of_day < 12 { "AM" } else { "PM" };
    let hour12 = match hour_of_day % 12 {
        0 => 12,
        h => h,
    };
    format!("{:02}:{:02} {}", hour12, minutes, suffix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn assert_invariant(sel: &RangeSelector) {
        let (lo, hi) = (sel.lower(), sel.upper());
        assert!(lo >= 0.0, "lower {} below zero", lo);
        assert!(lo < hi, "lower {} not below upper {}", lo, hi);
        assert!(hi <= sel.domain_max(), "upper {} above domain", hi);
        assert!(hi - lo >= MIN_RANGE_WIDTH, "width {} below minimum", hi - lo);
    }

    #[test]
    fn test_new_rejects_invalid_state() {
        assert!(RangeSelector::new(720.0, 0.0, 24.0).is_ok());
        assert!(matches!(
            RangeSelector::new(0.5, 0.0, 0.5),
            Err(RangeError::InvalidDomain(_))
        ));
        assert!(RangeSelector::new(720.0, 10.0, 10.5).is_err());
        assert!(RangeSelector::new(720.0, 30.0, 20.0).is_err());
        assert!(RangeSelector::new(720.0, -1.0, 20.0).is_err());
        assert!(RangeSelector::new(720.0, 0.0, 721.0).is_err());
        assert!(RangeSelector::new(f32::NAN, 0.0, 1.0).is_err());
    }

    #[test]
    fn test_lower_clamps_at_upper_minus_one() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        sel.begin_drag(Handle::Lower);
        sel.update_drag(0.5);
        assert_eq!(sel.lower(), 23.0);
        assert_eq!(sel.upper(), 24.0);
        assert_invariant(&sel);
    }

    #[test]
    fn test_upper_clamps_at_lower_plus_one() {
        let mut sel = RangeSelector::new(720.0, 100.0, 200.0).unwrap();
        sel.begin_drag(Handle::Upper);
        sel.update_drag(0.0);
        assert_eq!(sel.upper(), 101.0);
        assert_eq!(sel.lower(), 100.0);
        assert_invariant(&sel);
    }

    #[test]
    fn test_update_maps_fraction_to_domain() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        sel.begin_drag(Handle::Upper);
        assert!(sel.update_drag(0.25));
        assert_eq!(sel.upper(), 180.0);
    }

    #[test]
    fn test_update_without_drag_is_noop() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        assert!(!sel.update_drag(0.9));
        assert_eq!(sel.upper(), 24.0);
    }

    #[test]
    fn test_begin_drag_while_active_is_noop() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        assert!(sel.begin_drag(Handle::Lower));
        assert!(!sel.begin_drag(Handle::Upper));
        assert_eq!(sel.active_handle(), Some(Handle::Lower));
    }

    #[test]
    fn test_degenerate_fraction_is_clamped() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        sel.begin_drag(Handle::Upper);
        sel.update_drag(1.7);
        assert_eq!(sel.upper(), 720.0);
        sel.update_drag(f32::NAN);
        assert_eq!(sel.upper(), 720.0);
        assert_invariant(&sel);
    }

    #[test]
    fn test_committed_only_changes_on_end() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        sel.begin_drag(Handle::Upper);
        sel.update_drag(0.1);
        assert_eq!(sel.committed(), CommittedRange { start: 0.0, end: 24.0 });

        let committed = sel.end_drag().unwrap();
        assert_eq!(committed, CommittedRange { start: 0.0, end: 72.0 });
        assert_eq!(committed.unit_count(), 72);
        assert_eq!(sel.committed(), committed);
        assert!(sel.end_drag().is_none());
    }

    #[test]
    fn test_cancel_restores_previous_range() {
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        sel.begin_drag(Handle::Lower);
        sel.update_drag(0.02);
        assert!(sel.cancel_drag());
        assert_eq!(sel.lower(), 0.0);
        assert_eq!(sel.upper(), 24.0);
        assert!(!sel.is_dragging());
        assert!(!sel.cancel_drag());
    }

    #[test]
    fn test_invariant_holds_under_random_drags() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();

        for _ in 0..5_000 {
            match rng.random_range(0..4) {
                0 => {
                    let handle = if rng.random::<bool>() {
                        Handle::Lower
                    } else {
                        Handle::Upper
                    };
                    sel.begin_drag(handle);
                }
                1 | 2 => {
                    let fraction = rng.random_range(-0.2f32..1.2f32);
                    sel.update_drag(fraction);
                }
                _ => {
                    sel.end_drag();
                }
            }
            assert_invariant(&sel);
        }
    }

    #[test]
    fn test_invariant_with_fractional_lower() {
        let mut sel = RangeSelector::new(720.0, 0.1, 5.0).unwrap();
        sel.begin_drag(Handle::Upper);
        sel.update_drag(0.0);
        assert_invariant(&sel);
    }

    #[test]
    fn test_gap_holds_beyond_f32_integer_precision() {
        // Above 2^24 adjacent f32 values are more than one unit apart
        let mut sel = RangeSelector::new(1e8, 0.0, 1e8).unwrap();
        sel.begin_drag(Handle::Lower);
        sel.update_drag(1.0);
        assert!(sel.lower() < sel.upper());
        assert_invariant(&sel);
        sel.end_drag();

        let mut sel = RangeSelector::new(1e8, 0.0, 1e8).unwrap();
        sel.begin_drag(Handle::Upper);
        sel.update_drag(0.0);
        assert_eq!(sel.upper(), 1.0);

        sel.cancel_drag();
        sel.begin_drag(Handle::Lower);
        sel.update_drag(0.9);
        sel.end_drag();
        sel.begin_drag(Handle::Upper);
        sel.update_drag(0.0);
        assert_invariant(&sel);
    }

    #[test]
    fn test_invariant_holds_under_random_drags_on_large_domain() {
        let mut rng = StdRng::seed_from_u64(24);
        let mut sel = RangeSelector::new(3e7, 0.0, 100.0).unwrap();
        let handles = [Handle::Lower, Handle::Upper];

        for _ in 0..2_000 {
            sel.begin_drag(handles[rng.random_range(0..2)]);
            sel.update_drag(rng.random_range(0.0f32..=1.0f32));
            assert_invariant(&sel);
            sel.end_drag();
        }
    }

    #[test]
    fn test_track_fraction() {
        let track = RangeTrack::new(100.0, 400.0);
        assert_eq!(track.fraction_at(100.0), 0.0);
        assert_eq!(track.fraction_at(300.0), 0.5);
        assert_eq!(track.fraction_at(900.0), 1.0);
        assert_eq!(track.fraction_at(0.0), 0.0);
        assert_eq!(RangeTrack::new(0.0, 0.0).fraction_at(5.0), 0.0);
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0.0), "12:00 AM");
        assert_eq!(format_clock(9.5), "09:30 AM");
        assert_eq!(format_clock(13.25), "01:15 PM");
        assert_eq!(format_clock(24.0), "12:00 AM");
        assert_eq!(format_clock(36.0), "12:00 PM");
    }

    #[test]
    fn test_labels() {
        let sel = RangeSelector::new(720.0, 0.0, 24.0).unwrap();
        let labels = sel.labels();
        assert_eq!(labels.start, "12:00 AM");
        assert_eq!(labels.end, "12:00 AM");
        assert_eq!(labels.duration, "Duration: 24 hours");
    }
}
