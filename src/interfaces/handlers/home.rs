use actix_web::{get, HttpResponse, Responder};

#[get("/")]
pub async fn home() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "Portfolio API",
        "status": "Ok",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": [
            "POST /api/contact",
            "GET /api/projects",
            "POST /api/sms",
            "POST /api/admin/scrape",
            "GET /api/demo/gmaps-search?q=",
            "GET /api/demo/trade-report?symbol=",
            "GET /api/health"
        ]
    }))
}
