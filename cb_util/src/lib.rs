// Re-export dependencies
pub use dashmap;
pub use fnv;
pub use itertools;
pub use lazy_static;
pub use log;
pub use num_cpus;
pub use parking_lot;
pub use rayon;
pub use regex;
pub use serde;
pub use serde_json;
pub use toml;
pub use uuid;

// Own modules
pub mod identity;
pub mod load_stats;

pub use identity::{parse_identity_token, PlayerId, TokenError, WorldId};
