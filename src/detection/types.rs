/// Where a detected hand sits and how many fingers it shows.
///
/// `fingers` is 1 through 5 for a classified hand and -1 when nothing
/// classified; `location` is the bounding-box origin, or (-1, -1) for the
/// sentinel. The motion tracker keeps exactly one previous value as its
/// single-frame lookback; there is no identity across frames beyond that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hand {
    pub location: (i32, i32),
    pub fingers: i32,
}

impl Hand {
    pub const NOT_FOUND: Hand = Hand {
        location: (-1, -1),
        fingers: -1,
    };

    pub fn new(location: (i32, i32), fingers: i32) -> Self {
        Self { location, fingers }
    }

    pub fn is_detected(&self) -> bool {
        self.fingers != -1
    }
}

impl Default for Hand {
    fn default() -> Self {
        Self::NOT_FOUND
    }
}

/// Discrete frame-to-frame movement signal, in screen coordinates
/// (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    /// No hand in the current frame
    #[default]
    NoHand,
    /// Hand present but displacement under the movement threshold
    Still,
    Down,
    Up,
    Left,
    Right,
}
