use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use taxitera_pricing::{PopularRoute, RouteQuote, VehicleClassInfo};

use crate::{error::AppError, state::AppState};

#[derive(Debug, Deserialize)]
struct PriceQuery {
    from: String,
    to: String,
    #[serde(rename = "vehicleType")]
    vehicle_type: String,
    passengers: Option<u32>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/pricing/calculate", get(calculate_price))
        .route("/v1/pricing/routes", get(popular_routes))
        .route("/v1/pricing/vehicles", get(vehicle_classes))
}

async fn calculate_price(
    State(state): State<AppState>,
    Query(query): Query<PriceQuery>,
) -> Result<Json<RouteQuote>, AppError> {
    let quote = state.pricing.quote(
        &query.from,
        &query.to,
        &query.vehicle_type,
        query.passengers.unwrap_or(1),
    )?;
    Ok(Json(quote))
}

async fn popular_routes(State(state): State<AppState>) -> Json<Vec<PopularRoute>> {
    Json(state.pricing.popular_routes())
}

async fn vehicle_classes(State(state): State<AppState>) -> Json<Vec<VehicleClassInfo>> {
    Json(state.pricing.vehicle_classes())
}
