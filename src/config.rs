//! Built-in slider defaults.

// Range and stepping
pub const DEFAULT_MIN: f64 = 10.0;
pub const DEFAULT_MAX: f64 = 100.0;
pub const DEFAULT_STEP: f64 = 1.0;

// Grid
pub const DEFAULT_GRID_NUM: u32 = 4;

// Separators
pub const PRETTIFY_SEPARATOR: &str = " ";
pub const INPUT_VALUES_SEPARATOR: &str = ";";
pub const VALUES_SEPARATOR: &str = "-";
