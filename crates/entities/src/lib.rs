//! Core entity definitions for Recetario.
//!
//! This crate defines the data types shared across the Recetario
//! application: users, the recipes they publish, and the similarity edges
//! linking users with overlapping ingredients.

mod recipe;
mod similarity;
mod user;

pub use recipe::*;
pub use similarity::*;
pub use user::*;
