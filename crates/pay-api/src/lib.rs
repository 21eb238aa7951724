//! # pay-api
//!
//! HTTP API layer for the payment intent facade.
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/` | Landing page |
//! | POST | `/create-payment-intent` | Create payment intent |
//! | GET | `/payment-intent/{id}` | Payment intent status |
//! | POST | `/webhook` | Stripe webhook |
//! | GET | `/health` | Health check |

pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppConfig, AppState};
