use actix_web::{http::StatusCode, web, HttpResponse};
use tracing::instrument;

use crate::{entities::sms::SmsForm, errors::AppError, handlers::responses::mock_json, AppState};

#[instrument(name = "send_sms", skip(state, form))]
pub async fn send_sms(state: web::Data<AppState>, form: web::Json<SmsForm>) -> Result<HttpResponse, AppError> {
    let response = state.sms_handler.send(form.into_inner()).await?;
    Ok(mock_json(StatusCode::OK, &response))
}
