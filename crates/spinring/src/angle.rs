//! Conversions between the ring's angle convention and the others it meets.
//!
//! Ring angles are in degrees with 0 = left, 90 = up, 180 = right, 270 = down.
//! The standard trigonometric angle (0 = right) is what `cos`/`sin` expect, and
//! a pointer rotation is measured clockwise from the pointer graphic's rest
//! orientation.

use serde::Serialize;
use serde_with::DeserializeFromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

pub const FULL_TURN: f64 = 360.0;
pub const HALF_TURN: f64 = 180.0;

/// Wraps any angle in degrees into `[0, 360)`.
pub fn normalize(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(FULL_TURN);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= FULL_TURN { 0.0 } else { wrapped }
}

/// Ring angle to the standard trigonometric angle used for projection.
pub fn ring_to_standard(ring: f64) -> f64 {
    normalize(ring + HALF_TURN)
}

/// Shortest arc between two angles, in `[0, 180]`.
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let d = normalize(a - b);
    d.min(FULL_TURN - d)
}

/// Rest orientation of the pointer graphic before any rotation is applied.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum PointerRest {
    #[strum(serialize = "Left", serialize = "l", serialize = "west", serialize = "w")]
    Left,
    #[default]
    #[strum(serialize = "Up", serialize = "u", serialize = "north", serialize = "n")]
    Up,
    #[strum(serialize = "Right", serialize = "r", serialize = "east", serialize = "e")]
    Right,
    #[strum(serialize = "Down", serialize = "d", serialize = "south", serialize = "s")]
    Down,
}

impl PointerRest {
    /// The rest orientation expressed as a ring angle.
    pub fn ring_angle(self) -> f64 {
        match self {
            Self::Left => 0.0,
            Self::Up => 90.0,
            Self::Right => 180.0,
            Self::Down => 270.0,
        }
    }
}

/// Clockwise rotation, within one turn, that takes a pointer at `rest` to face `ring`.
pub fn ring_to_pointer(ring: f64, rest: PointerRest) -> f64 {
    normalize(ring - rest.ring_angle())
}

/// Inverse of [`ring_to_pointer`]; whole turns in `rotation` are discarded.
pub fn pointer_to_ring(rotation: f64, rest: PointerRest) -> f64 {
    normalize(rotation + rest.ring_angle())
}

/// Final rotation for a spin animation: the pointing rotation plus `extra_turns` full turns.
pub fn pointer_rotation(ring: f64, rest: PointerRest, extra_turns: u32) -> f64 {
    ring_to_pointer(ring, rest) + FULL_TURN * f64::from(extra_turns)
}
