//! Wire models for the CookSetu marketplace API.
//!
//! Field names follow the backend's camelCase JSON; ids arrive as `_id`.

pub mod auth;
pub mod common;
pub mod cook;
pub mod user;

pub use auth::*;
pub use common::*;
pub use cook::*;
pub use user::*;
