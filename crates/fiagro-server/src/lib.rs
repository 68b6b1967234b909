//! REST surface and runtime wiring for Quero FIAGROs.
//!
//! The binary (`fiagro`) resolves a [`config::ServerConfig`], builds an
//! [`rest::AppState`] from it, and either serves [`rest::router`] or runs a
//! single fetch and prints the JSON.

pub mod config;
pub mod openapi;
pub mod rest;

pub use config::ServerConfig;
pub use rest::{router, start, AppState};
