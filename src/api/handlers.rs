//! HTTP request handlers for the Revenue Statement Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{StatementInputs, build_statement};
use crate::error::EngineResult;
use crate::ingest::clean_bookings;
use crate::models::{RawExchangeRate, Statement};

use super::request::StatementRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/statement", post(statement_handler))
        .with_state(state)
}

/// Handler for POST /statement endpoint.
///
/// Cleans the submitted bookings, runs the pipeline against the server's
/// configuration and returns the statement.
async fn statement_handler(
    State(state): State<AppState>,
    payload: Result<Json<StatementRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing statement request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return rejection_response(correlation_id, rejection).into_response();
        }
    };

    let start_time = Instant::now();
    match run_statement(&state, request) {
        Ok(statement) => {
            info!(
                correlation_id = %correlation_id,
                run_id = %statement.run_id,
                lines = statement.lines.len(),
                unconverted = statement.report.unconverted_lines,
                duration_us = start_time.elapsed().as_micros(),
                "Statement built successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(statement),
            )
                .into_response()
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Statement request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> ApiErrorResponse {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::bad_request(error)
}

fn run_statement(state: &AppState, request: StatementRequest) -> EngineResult<Statement> {
    let config = state.config().config();

    let cleaned = clean_bookings(request.bookings);
    let country_currencies = match &request.country_currencies {
        Some(overrides) => config.country_currencies.merged_with(overrides),
        None => config.country_currencies.clone(),
    };
    let inputs = StatementInputs {
        bookings: cleaned.bookings,
        exchange_rates: request
            .exchange_rates
            .into_iter()
            .map(RawExchangeRate::from)
            .collect(),
        country_currencies,
    };

    let mut statement = build_statement(&inputs, config)?;
    statement.report.cleaning = Some(cleaned.report);
    Ok(statement)
}
