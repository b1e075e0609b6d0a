//! # Pantry Matcher
//!
//! Matches recipe ingredient lines against pantry and commissary inventories
//! with fuzzy string comparison, and ranks recipes by how much of their
//! ingredient list is already available.
//!
//! ## Pipeline
//!
//! raw ingredient → [`normalizer`] → [`matcher`] (pantry, then commissary)
//! → [`scorer`] → [`ranking`]
//!
//! Every call receives its inventories and threshold explicitly; nothing in
//! the library reads global state. See [`config::MatcherConfig::from_env`]
//! for the environment-driven defaults used by the binary.

pub mod accuracy;
pub mod config;
pub mod errors;
pub mod inventory;
pub mod loader;
pub mod matcher;
pub mod normalizer;
pub mod ranking;
pub mod recipe;
pub mod scorer;
pub mod similarity;
