//! # Rank Lookup
//!
//! A small web front end that resolves a player handle through an external
//! game-statistics API, fetches the player's rank and renders it as HTML.
//!
//! ## Architecture
//!
//! - **models**: Identity, region and rank types
//! - **upstream**: Identity and rank API adapter (`RankApi` trait, `reqwest` client)
//! - **normalize**: Maps the varying rank payload shapes to one `NormalizedRank`
//! - **lookup**: Validation and the identity → rank → normalize flow
//! - **render**: Server-side HTML
//! - **api**: Axum routes
//! - **config**: Configuration loading and validation

pub mod api;
pub mod config;
pub mod lookup;
pub mod models;
pub mod normalize;
pub mod render;
pub mod upstream;

pub use models::*;
