use crate::angle;
use derive_more::{Display, From, Into};
use std::num::NonZeroU8;
use thiserror::Error;

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 12;
pub const RING_RADIUS: f64 = 120.0; // center to player marker

/// One-based player number. Stable for the lifetime of a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Into)]
#[display("P{_0}")]
pub struct PlayerId(NonZeroU8);

impl PlayerId {
    /// `None` for 0, player numbers start at 1.
    pub const fn new(id: u8) -> Option<Self> {
        match NonZeroU8::new(id) {
            Some(id) => Some(Self(id)),
            None => None,
        }
    }

    fn from_index(index: usize) -> Self {
        // index < MAX_PLAYERS, so the sum neither wraps nor hits zero
        Self(NonZeroU8::MIN.saturating_add(index as u8))
    }

    pub fn get(self) -> u8 {
        self.0.get()
    }

    pub fn index(self) -> usize {
        usize::from(self.get() - 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSlot {
    pub id: PlayerId,
    /// Ring angle in degrees, see [`crate::angle`].
    pub angle: f64,
    /// Displacement from the ring center, y pointing down.
    pub offset: Point,
}

impl PlayerSlot {
    fn new(index: usize, player_count: usize) -> Self {
        let angle = Self::slot_angle(index, player_count);
        Self {
            id: PlayerId::from_index(index),
            angle,
            offset: Self::project(angle),
        }
    }

    /// Two players always sit opposite each other, left and right. Everyone else is spread
    /// evenly clockwise starting from the left.
    pub fn slot_angle(index: usize, player_count: usize) -> f64 {
        if player_count == 2 {
            return if index == 0 { 0.0 } else { angle::HALF_TURN };
        }
        let spacing = angle::FULL_TURN / player_count as f64;
        angle::normalize(index as f64 * spacing)
    }

    pub fn project(angle: f64) -> Point {
        let radians = angle::ring_to_standard(angle).to_radians();
        Point::new(RING_RADIUS * radians.cos(), RING_RADIUS * radians.sin())
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Player count {count} is outside the supported range {min}..={max}", min = MIN_PLAYERS, max = MAX_PLAYERS)]
    InvalidCount { count: usize },
}

/// The full ring of player slots for one player count, ordered by id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RingLayout {
    slots: Vec<PlayerSlot>,
}

pub fn compute_layout(player_count: usize) -> Result<RingLayout, LayoutError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&player_count) {
        return Err(LayoutError::InvalidCount {
            count: player_count,
        });
    }

    let slots = (0..player_count)
        .map(|i| PlayerSlot::new(i, player_count))
        .collect();

    log::trace!("Computed ring layout for {} players", player_count);
    Ok(RingLayout { slots })
}

impl RingLayout {
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slots(&self) -> &[PlayerSlot] {
        &self.slots
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PlayerSlot> {
        self.slots.iter()
    }

    pub fn ids(&self) -> impl Iterator<Item = PlayerId> + '_ {
        self.slots.iter().map(|s| s.id)
    }

    pub fn get(&self, id: PlayerId) -> Option<&PlayerSlot> {
        self.slots.get(id.index()).filter(|s| s.id == id)
    }

    pub fn angle_of(&self, id: PlayerId) -> Option<f64> {
        self.get(id).map(|s| s.angle)
    }

    /// Slot closest to a ring angle, going whichever way round is shorter.
    pub fn nearest_slot(&self, ring_angle: f64) -> Option<&PlayerSlot> {
        self.slots.iter().min_by(|a, b| {
            angle::angular_distance(ring_angle, a.angle)
                .total_cmp(&angle::angular_distance(ring_angle, b.angle))
        })
    }
}

impl<'a> IntoIterator for &'a RingLayout {
    type Item = &'a PlayerSlot;
    type IntoIter = std::slice::Iter<'a, PlayerSlot>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}
