//! Uploaded dataset handling
//!
//! Parses CSV uploads into a polars `DataFrame`, enforces the binary-target
//! invariant and converts columns into `ndarray` matrices for training.

mod dataset;

pub use dataset::Dataset;

/// Name of the binary label column every dataset must carry
pub const TARGET_COLUMN: &str = "Fail_tomorrow";

/// Feature names accepted by the prediction endpoint, in request order
pub const FEATURE_COLUMNS: [&str; 4] = ["Min_Temp", "Max_Temp", "Leakage", "Electricity"];
