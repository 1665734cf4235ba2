//! Token list graph resolver
//!
//! Resolves a BTKN token identifier (address, identifier or symbol) to its
//! metadata or logo by searching a registry of token lists that may
//! reference each other.

pub mod cache;
pub mod config;
pub mod errors;
pub mod models;
pub mod registry;
pub mod services;
pub mod utils;
pub mod web;
