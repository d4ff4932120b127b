//! # Stratify Web API
//!
//! HTTP front end for the prediction pipeline.
//!
//! ## Quick Start
//!
//! ```bash
//! # Start the server on a file-backed store
//! cargo run -p stratify-web -- --port 3000 --db stratify.db --k 2
//!
//! curl -X POST localhost:3000/api/predict \
//!      -H 'content-type: application/json' \
//!      -d '{"msi": 0.15, "sv": 0.15}'
//! ```
//!
//! ## API Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | POST | `/api/predict` | Classify `{msi, sv}` against a fresh fit |
//! | GET | `/api/records` | All known records |
//! | POST | `/api/records` | Add a known record |
//! | DELETE | `/api/records/:id` | Remove a known record |
//! | GET | `/api/categories` | All category metadata |
//! | POST | `/api/categories` | Insert or replace category metadata |
//! | GET | `/api/alignment` | Cluster alignment for the current data |
//! | GET | `/api/stats` | Store statistics |

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use state::AppState;
