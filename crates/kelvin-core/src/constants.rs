//! Simulation constants and tuning parameters.

/// Distance information travels per tick (the "speed of light").
pub const PROPAGATION_SPEED: f64 = 50.0;

/// Default fleet speed as a fraction of the propagation speed.
pub const DEFAULT_FLEET_VELOCITY: f64 = 0.5;

/// Lower bound applied to configured speeds so legs always finish.
pub const MIN_SPEED: f64 = 1e-6;

/// Number of lines a human observer's message log retains.
pub const MESSAGE_LOG_CAPACITY: usize = 32;

/// Number of trail points recorded for a travelling fleet.
pub const TRAIL_LENGTH: usize = 16;

/// Default RNG seed.
pub const DEFAULT_SEED: u64 = 42;

// --- Generated clusters ---

/// Side length of the square field generated clusters are placed in.
pub const CLUSTER_FIELD_SIZE: f64 = 1000.0;

/// Minimum distance between two generated stars.
pub const CLUSTER_MIN_SPACING: f64 = 60.0;

/// Placement attempts per star before the spacing rule is relaxed.
pub const CLUSTER_PLACEMENT_ATTEMPTS: u32 = 64;

/// Names handed out to generated stars, in order.
pub const STAR_CATALOGUE: [&str; 16] = [
    "Sol",
    "Procyon",
    "Epsilon Eridani",
    "Tau Ceti",
    "Lalande",
    "Sirius",
    "Altair",
    "Vega",
    "Wolf 359",
    "Ross 128",
    "Barnard",
    "Kapteyn",
    "Gliese 581",
    "Luyten",
    "Struve 2398",
    "Groombridge",
];
