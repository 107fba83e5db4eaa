//! Anima Prime backend library
//!
//! REST API for the Anima Prime tabletop RPG companion: token authentication,
//! ownership checks and CRUD over user-owned game resources.

pub mod api;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod resources;
pub mod store;
