//! Pocket Yacsa - pocket pharmacist backend
//!
//! Medicine lookup and name search, pill photo detection against an AI
//! endpoint, and per-member favorites, detection history, and recent
//! searches behind OAuth2 login.

// Module declarations
pub mod config;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
