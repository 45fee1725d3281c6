use actix_web::{http::header, web, HttpResponse};
use tracing::instrument;

use crate::{
    entities::demo::{GmapsSearchQuery, TradeReportQuery},
    errors::{AppError, MOCK_HEADER},
    AppState,
};

#[instrument(name = "gmaps_search", skip(state, query))]
pub async fn gmaps_search(
    state: web::Data<AppState>,
    query: web::Query<GmapsSearchQuery>,
) -> Result<HttpResponse, AppError> {
    let response = state.demo_handler.gmaps_search(query.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .insert_header((MOCK_HEADER, "true"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(response))
}

#[instrument(name = "trade_report", skip(state, query))]
pub async fn trade_report(
    state: web::Data<AppState>,
    query: web::Query<TradeReportQuery>,
) -> Result<HttpResponse, AppError> {
    let response = state.demo_handler.trade_report(query.into_inner()).await?;

    Ok(HttpResponse::Ok()
        .insert_header((MOCK_HEADER, "true"))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .json(response))
}
