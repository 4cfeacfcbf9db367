//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity serial (32-bit unsigned)
///
/// Mobiles occupy `0x00000001..0x40000000`, items `0x40000000..0x80000000`.
/// Several packets overload the top bit as a presence flag, which decoders
/// mask off before constructing the serial.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Serial(pub u32);

impl Serial {
    pub const ZERO: Serial = Serial(0);

    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u32 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn is_mobile(&self) -> bool {
        self.0 > 0 && self.0 < 0x4000_0000
    }

    pub fn is_item(&self) -> bool {
        self.0 >= 0x4000_0000 && self.0 < 0x8000_0000
    }
}

impl From<u32> for Serial {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for Serial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0)
    }
}

/// Cardinal facing (low three bits of a direction byte)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    North = 0,
    Right = 1,
    East = 2,
    Down = 3,
    South = 4,
    Left = 5,
    West = 6,
    Up = 7,
}

impl Direction {
    /// Decode a direction byte, discarding the running bit and anything above it.
    pub fn from_u8(value: u8) -> Self {
        match value & 0x07 {
            0 => Self::North,
            1 => Self::Right,
            2 => Self::East,
            3 => Self::Down,
            4 => Self::South,
            5 => Self::Left,
            6 => Self::West,
            _ => Self::Up,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::North => "north",
            Self::Right => "right",
            Self::East => "east",
            Self::Down => "down",
            Self::South => "south",
            Self::Left => "left",
            Self::West => "west",
            Self::Up => "up",
        }
    }
}
