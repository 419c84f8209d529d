//! Dish recommendations from a curated catalog.
//!
//! The catalog is loaded from CSV once ([`services::catalog::Catalog`]) and
//! queried with a [`models::Preferences`] record through
//! [`services::recommendations::recommend`], which applies hard dietary and
//! ingredient filters before ranking the survivors by a soft match score.

pub mod config;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
