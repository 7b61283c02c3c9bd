//! Similar-user matching engine for Recetario.
//!
//! Users are automatically linked to other users who cook with overlapping
//! ingredients. This crate holds the three pieces of that machinery: the
//! ingredient normalizer, the pluggable matching strategies, and the
//! reconciliation routines that rewrite the persisted edge set — per user on
//! every recipe write, or wholesale from the maintenance binary.

mod maintenance;
mod normalize;
mod reconcile;
mod strategy;

pub use maintenance::*;
pub use normalize::*;
pub use reconcile::*;
pub use strategy::*;
