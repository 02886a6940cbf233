use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taxitera_core::booking::{Booking, BookingStatus, CreateBooking, RescheduleBooking};
use uuid::Uuid;

use crate::middleware::auth::{customer_auth_middleware, CustomerClaims};
use crate::{error::AppError, state::AppState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct BookingResponse {
    id: Uuid,
    user: String,
    route: String,
    #[serde(rename = "type")]
    vehicle_class: String,
    date: String,
    time: String,
    seats_booked: u32,
    passenger_names: Vec<String>,
    price: f64,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    cancellation_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            user: b.owner_id,
            route: b.route,
            vehicle_class: b.vehicle_class.id().to_string(),
            date: b.travel_date.format("%Y-%m-%d").to_string(),
            time: b.travel_time.format("%H:%M").to_string(),
            seats_booked: b.seats_booked,
            passenger_names: b.passenger_names,
            price: b.price,
            status: b.status.as_str().to_string(),
            cancellation_reason: b.cancellation_reason,
            created_at: b.created_at,
            updated_at: b.updated_at,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CancelRequest {
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ListQuery {
    status: Option<String>,
}

pub fn routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/v1/bookings", post(create_booking).get(list_all_bookings))
        .route("/v1/bookings/me", get(list_my_bookings))
        .route("/v1/bookings/{id}", get(get_booking))
        .route("/v1/bookings/{id}/cancel", post(cancel_booking))
        .route("/v1/bookings/{id}/update", post(update_booking))
        .route("/v1/bookings/{id}/complete", post(complete_booking))
        .layer(axum::middleware::from_fn_with_state(state, customer_auth_middleware))
}

async fn create_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Json(req): Json<CreateBooking>,
) -> Result<(StatusCode, Json<BookingResponse>), AppError> {
    let booking = state.bookings.create(&claims.sub, req).await?;
    Ok((StatusCode::CREATED, Json(booking.into())))
}

async fn list_my_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let bookings = state.bookings.list_mine(&claims.actor()).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

async fn list_all_bookings(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<BookingResponse>>, AppError> {
    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(
            BookingStatus::from_str(s)
                .ok_or_else(|| AppError::ValidationError(format!("unknown status filter: {}", s)))?,
        ),
    };

    let bookings = state.bookings.list_all(&claims.actor(), status).await?;
    Ok(Json(bookings.into_iter().map(BookingResponse::from).collect()))
}

async fn get_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.get(&claims.actor(), id).await?;
    Ok(Json(booking.into()))
}

async fn cancel_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.cancel(&claims.actor(), id, req.reason).await?;
    Ok(Json(booking.into()))
}

async fn update_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
    Json(req): Json<RescheduleBooking>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.reschedule(&claims.actor(), id, req).await?;
    Ok(Json(booking.into()))
}

async fn complete_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<CustomerClaims>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingResponse>, AppError> {
    let booking = state.bookings.complete(&claims.actor(), id).await?;
    Ok(Json(booking.into()))
}
