//! formdesk-web: HTTP surface for Formdesk.
//!   - `GET /` and static assets for the form viewer
//!   - `GET /healthz`
//!   - `POST /analyze-pdf`
//!   - `POST /analyze-field`

pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
