//! Policy loading, presets, and the offline-mode switch.
//!
//! ```rust,ignore
//! use phantomscan::config::{load_policy, PolicyPreset};
//! use phantomscan::model::Policy;
//!
//! let policy = load_policy(None).unwrap_or_else(|_| Policy::from_preset(PolicyPreset::Balanced));
//! ```

mod defaults;
mod file;

pub use defaults::PolicyPreset;
pub use file::{
    discover_policy_file, is_offline_mode, load_policy, save_policy, OFFLINE_ENV_VAR,
};

use crate::model::Policy;

/// Generate a JSON Schema for the `Policy` configuration format.
#[must_use]
pub fn generate_json_schema() -> String {
    let schema = Policy::json_schema();
    serde_json::to_string_pretty(&schema).expect("schema serialization should not fail")
}
