// Deck shape
pub const NUM_TOKEN_TYPES: usize = 6;
pub const NOMINAL_BATCH_SIZE: usize = 5;

// Reference fuzz policy: cumulative thresholds on a uniform roll in [0, 100)
pub const FUZZ_ROLL_SCALE: f64 = 100.0;
pub const FUZZ_THRESHOLD_ZERO: f64 = 20.0;
pub const FUZZ_THRESHOLD_ONE: f64 = 50.0;
pub const FUZZ_THRESHOLD_TWO: f64 = 80.0;
pub const MAX_FUZZ: usize = 3;

// Trial aggregation
pub const DEFAULT_NUM_TRIALS: u32 = 10_000;
pub const DEFAULT_TOTAL_ROUNDS: u32 = 6;
pub const DEFAULT_COPIES_SWEEP: [usize; 6] = [2, 3, 4, 5, 6, 7];
