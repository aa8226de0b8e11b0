//! View-model layer for the portfolio analytics client.
//!
//! Turns backend analytics payloads into display-ready tables, year
//! windows and allocation summaries, and keeps open screens consistent
//! while their fetches resolve.

pub mod config;
pub mod errors;
pub mod external;
pub mod logging;
pub mod models;
pub mod services;
pub mod state;
