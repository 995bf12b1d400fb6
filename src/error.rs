use std::fmt::Debug;

/// Errors are caller contract violations. None of them are produced by the
/// structure itself going into a bad state, so the input that caused them is
/// never clamped or wrapped around.
#[derive(Clone, PartialEq, Eq)]
pub enum Error {
    /// Index out of bounds. Contains the offending index and the number of
    /// valid indices.
    IndexOutOfBounds(usize, usize),
    /// Attempted to grow a forest by zero nodes.
    ZeroGrowth,
    /// The side of a percolation grid must be at least 5.
    SideTooSmall(usize),
    /// Site 0 shares its slot with the virtual top and can never be opened.
    ReservedSite,

    // Monte Carlo experiments.
    /// At least two trials are needed to estimate the spread of the threshold.
    TooFewTrials(usize),
    /// A target open fraction outside of [0, 1].
    InvalidFraction,
}

impl Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use Error::*;
        match self {
            IndexOutOfBounds(a, b) => f.debug_tuple("IndexOutOfBounds").field(a).field(b).finish(),
            ZeroGrowth => write!(f, "ZeroGrowth"),
            SideTooSmall(side) => f.debug_tuple("SideTooSmall").field(side).finish(),
            ReservedSite => write!(f, "ReservedSite"),
            TooFewTrials(trials) => f.debug_tuple("TooFewTrials").field(trials).finish(),
            InvalidFraction => write!(f, "InvalidFraction"),
        }
    }
}
