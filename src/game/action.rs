/// Direction the snake can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Up,
    Right,
    Down,
}

/// Axis a direction moves along
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    /// Returns the delta (dx, dy) for moving in this direction.
    ///
    /// The lattice uses screen orientation, so `Up` decreases `y`.
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Left => (-1, 0),
            Direction::Up => (0, -1),
            Direction::Right => (1, 0),
            Direction::Down => (0, 1),
        }
    }

    pub fn axis(&self) -> Axis {
        match self {
            Direction::Left | Direction::Right => Axis::Horizontal,
            Direction::Up | Direction::Down => Axis::Vertical,
        }
    }

    /// Returns true if turning from self to other is a quarter turn.
    ///
    /// Both the reverse direction and the same direction share an axis with
    /// `self`, so neither counts as a turn.
    pub fn is_perpendicular(&self, other: Direction) -> bool {
        self.axis() != other.axis()
    }
}

/// One reading of the joystick, as seen by the game loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Input {
    /// A direction is held
    Move(Direction),
    /// The select button is held
    Confirm,
    /// Nothing is held
    #[default]
    None,
}

impl From<Direction> for Input {
    fn from(direction: Direction) -> Self {
        Input::Move(direction)
    }
}
