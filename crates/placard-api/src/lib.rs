//! # placard-api
//!
//! HTTP API server for Placard.
//!
//! This crate exposes `NameSyncService` over JSON:
//! - `GET  /api/status`: controller link state
//! - `GET  /api/groups`: configured slot groups
//! - `GET  /api/groups/{group}/names?lang=xx`: localized slot names
//! - `POST /api/groups/{group}/names`: write one slot
//! - `POST /api/groups/{group}/localized`: store a secondary-language override
//! - `GET  /api/translations/duplicates`: translation rows sharing a key

#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod error;
pub mod routes;
pub mod state;

pub use error::{Error, Result};
pub use routes::router;
pub use state::AppState;
