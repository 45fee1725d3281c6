use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use tracing::instrument;

use crate::{
    entities::scrape::ScrapeForm, errors::AppError, handlers::responses::mock_json,
    utils::get_client_ip::get_client_ip, AppState,
};

#[instrument(name = "admin_scrape", skip(state, req, form))]
pub async fn admin_scrape(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<ScrapeForm>,
) -> Result<HttpResponse, AppError> {
    let client_ip = get_client_ip(&req, state.config.trust_forwarded_headers);

    let response = state.scrape_handler.submit(form.into_inner(), &client_ip).await?;
    Ok(mock_json(StatusCode::ACCEPTED, &response))
}
