//! HTTP API module for the Revenue Statement Engine.
//!
//! This module provides the REST endpoint that builds a monthly revenue
//! statement from bookings and exchange rates posted in the request body.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{RateRequest, RateValue, StatementRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
