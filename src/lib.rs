//! Brutto-Netto library crate.
//!
//! This crate turns lists of German gross wages into net wages and
//! their tax and social insurance breakdown.  External applications
//! may call [`api::calculate`] or [`engine::run_batch`] directly, embed
//! the HTTP routes via [`api::build_router`], or plug in their own
//! calculator through the [`tax::GrossToNet`] trait.

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod insurance;
pub mod models;
pub mod normalize;
pub mod rates;
pub mod tax;
