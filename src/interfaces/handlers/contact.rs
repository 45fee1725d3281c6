use actix_web::{http::StatusCode, web, HttpRequest, HttpResponse};
use chrono::Utc;
use tracing::instrument;

use crate::{
    entities::contact::{
        ContactDeliveredResponse, ContactForm, ContactMockResponse, ContactReceipt, IntegrationStatus,
        PersistOutcome, ReceivedData, RelayOutcome, StoreLocation,
    },
    errors::AppError,
    handlers::responses::mock_json,
    utils::get_client_ip::get_client_ip,
    AppState,
};

#[instrument(name = "submit_contact", skip(state, req, form))]
pub async fn submit_contact(
    state: web::Data<AppState>,
    req: HttpRequest,
    form: web::Json<ContactForm>,
) -> Result<HttpResponse, AppError> {
    let client_ip = get_client_ip(&req, state.config.trust_forwarded_headers);

    let receipt = state.contact_handler.submit(form.into_inner(), &client_ip).await?;
    tracing::info!(
        saved_to = receipt.persisted.saved_to_label(),
        relay = ?receipt.relay,
        "Contact submission handled"
    );

    if receipt.relay == RelayOutcome::Delivered {
        return Ok(HttpResponse::Ok().json(delivered_response(&receipt)));
    }

    state.mock_latency.simulate().await;
    Ok(mock_json(StatusCode::OK, &mock_response(&state, &receipt)))
}

fn delivered_response(receipt: &ContactReceipt) -> ContactDeliveredResponse {
    let message = match receipt.persisted.location() {
        Some(StoreLocation::Remote) => {
            "Tin nhắn đã được gửi thành công và lưu vào database! Hiếu sẽ phản hồi trong vòng 24h."
        }
        Some(StoreLocation::Local) => {
            "Tin nhắn đã được gửi thành công và lưu cục bộ! Hiếu sẽ phản hồi trong vòng 24h."
        }
        None => "Tin nhắn đã được gửi thành công! Hiếu sẽ phản hồi trong vòng 24h.",
    };

    ContactDeliveredResponse {
        success: true,
        mock: false,
        message,
        timestamp: Utc::now().to_rfc3339(),
        saved_to_database: receipt.persisted.saved_to_database(),
        saved_to: receipt.persisted.saved_to_label(),
    }
}

fn mock_response(state: &AppState, receipt: &ContactReceipt) -> ContactMockResponse {
    let relay_configured = state.contact_handler.relay_configured();

    let message = match &receipt.persisted {
        PersistOutcome::Stored { location: StoreLocation::Remote, .. } => {
            "Tin nhắn đã được lưu vào database thành công! (Demo mode - email không thực sự được gửi)"
        }
        PersistOutcome::Stored { location: StoreLocation::Local, .. } => {
            "Tin nhắn đã được lưu cục bộ thành công! (Demo mode - email không thực sự được gửi)"
        }
        PersistOutcome::Failed { .. } => "Tin nhắn đã được ghi nhận! (Demo mode - email không thực sự được gửi)",
    };

    let database = match (state.contact_handler.remote().is_some(), receipt.persisted.saved_to_database()) {
        (true, true) => "configured",
        (true, false) => "configured_but_failed",
        (false, _) => "not_configured",
    };

    ContactMockResponse {
        success: true,
        mock: true,
        message,
        timestamp: Utc::now().to_rfc3339(),
        saved_to_database: receipt.persisted.saved_to_database(),
        saved_to: receipt.persisted.saved_to_label(),
        note: if relay_configured {
            "Relay configured but failed - using mock response"
        } else {
            "Configure FORMSPREE_URL environment variable to enable real email sending"
        },
        integration_status: IntegrationStatus {
            database,
            relay: if relay_configured { "configured_but_failed" } else { "not_configured" },
            sendgrid: if state.config.integrations.sendgrid_configured() {
                "configured"
            } else {
                "not_configured"
            },
        },
        received_data: ReceivedData::from(&receipt.submission),
    }
}
