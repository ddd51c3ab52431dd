use thiserror::Error;

/// Top-level error type for the fairline kernel.
#[derive(Debug, Error)]
pub enum FairlineError {
    #[error(transparent)]
    Fairing(#[from] FairingError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Grind(#[from] GrindError),

    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors from fair-curve fitting and lookup.
#[derive(Debug, Error)]
pub enum FairingError {
    #[error("cannot fit a fair curve through an empty point set")]
    EmptyPointSet,

    #[error("invalid parameter range {start}..{end}")]
    InvalidRange { start: usize, end: usize },

    #[error("no {axis} value found on curve at {target_axis} = {target:.2}")]
    LookupNotFound {
        axis: &'static str,
        target_axis: &'static str,
        target: f64,
    },

    #[error("spline needs at least two knots, got {0}")]
    TooFewKnots(usize),

    #[error("spline knots must be strictly increasing at index {0}")]
    NonIncreasingKnots(usize),

    #[error("spline knot and value counts differ ({knots} vs {values})")]
    KnotValueMismatch { knots: usize, values: usize },
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("zero-length vector")]
    ZeroVector,
}

/// Errors from the grinding solver.
#[derive(Debug, Error)]
pub enum GrindError {
    /// The wheel sweep from an outside start never entered the bar. Used as a
    /// loop-termination signal when extending the flute-top boundary.
    #[error("wheel sweep never intersects the bar cylinder")]
    NoBarIntersection,

    /// A profile was requested before any channel curve was set.
    #[error("gouge has no channel curve")]
    EmptyChannel,
}

/// Structural errors in hull model data.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("stations in {table} table don't match stations in heights table")]
    StationMismatch { table: &'static str },

    #[error("hull model has no stations")]
    NoStations,

    #[error("hull model {end} profile is empty")]
    EmptyEndProfile { end: &'static str },

    #[error("bad dimension '{0}'")]
    BadDimension(String),

    #[error("outline queries need bow at greater x than stern; normalize first")]
    Unoriented,

    #[error("height {height:.3} is below the hull bottom")]
    HeightBelowHull { height: f64 },
}

/// Convenience type alias for results using [`FairlineError`].
pub type Result<T> = std::result::Result<T, FairlineError>;
