//! Move directions and the input contract that produces them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::EngineError;

/// A direction to slide every tile on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All four directions, in discriminant order.
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Row/column step taken by a tile moving in this direction.
    #[inline]
    pub fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    /// Numeric code used on compact wire formats (0=Up, 1=Down, 2=Left, 3=Right).
    pub fn index(self) -> u8 {
        match self {
            Direction::Up => 0,
            Direction::Down => 1,
            Direction::Left => 2,
            Direction::Right => 3,
        }
    }

    /// Inverse of [`Direction::index`].
    pub fn from_index(code: u8) -> Result<Self, EngineError> {
        match code {
            0 => Ok(Direction::Up),
            1 => Ok(Direction::Down),
            2 => Ok(Direction::Left),
            3 => Ok(Direction::Right),
            other => Err(EngineError::InvalidDirection(format!(
                "code {} is not in 0..=3",
                other
            ))),
        }
    }

    /// Classify a touch gesture into a direction.
    ///
    /// `dx`/`dy` are the displacement in screen coordinates (y grows
    /// downward). Gestures shorter than `min_distance` are ignored. The axis
    /// with the larger magnitude wins; a tie goes to the vertical axis.
    pub fn from_swipe(dx: f64, dy: f64, min_distance: f64) -> Option<Self> {
        if dx * dx + dy * dy < min_distance * min_distance {
            return None;
        }

        if dx.abs() > dy.abs() {
            Some(if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            })
        } else if dy > 0.0 {
            Some(Direction::Down)
        } else {
            Some(Direction::Up)
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::Up => "up",
            Direction::Down => "down",
            Direction::Left => "left",
            Direction::Right => "right",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Accepts lowercase names and keyboard key names ("ArrowUp", ...).
impl FromStr for Direction {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "up" | "arrowup" => Ok(Direction::Up),
            "down" | "arrowdown" => Ok(Direction::Down),
            "left" | "arrowleft" => Ok(Direction::Left),
            "right" | "arrowright" => Ok(Direction::Right),
            _ => Err(EngineError::InvalidDirection(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_keys() {
        assert_eq!("up".parse::<Direction>().unwrap(), Direction::Up);
        assert_eq!("ArrowLeft".parse::<Direction>().unwrap(), Direction::Left);
        assert_eq!(" RIGHT ".parse::<Direction>().unwrap(), Direction::Right);
        assert!(matches!(
            "sideways".parse::<Direction>(),
            Err(EngineError::InvalidDirection(_))
        ));
    }

    #[test]
    fn test_index_roundtrip_and_rejects_unknown_code() {
        for dir in Direction::ALL {
            assert_eq!(Direction::from_index(dir.index()).unwrap(), dir);
        }
        assert!(Direction::from_index(4).is_err());
    }

    #[test]
    fn test_swipe_classification() {
        // Too short
        assert_eq!(Direction::from_swipe(3.0, 4.0, 10.0), None);
        // Horizontal dominates
        assert_eq!(
            Direction::from_swipe(50.0, 10.0, 10.0),
            Some(Direction::Right)
        );
        assert_eq!(
            Direction::from_swipe(-50.0, 10.0, 10.0),
            Some(Direction::Left)
        );
        // Vertical dominates; screen y grows downward
        assert_eq!(Direction::from_swipe(5.0, 40.0, 10.0), Some(Direction::Down));
        assert_eq!(Direction::from_swipe(5.0, -40.0, 10.0), Some(Direction::Up));
    }

    #[test]
    fn test_serde_uses_lowercase_names() {
        let json = serde_json::to_string(&Direction::Down).unwrap();
        assert_eq!(json, "\"down\"");
        let parsed: Direction = serde_json::from_str("\"left\"").unwrap();
        assert_eq!(parsed, Direction::Left);
    }
}
