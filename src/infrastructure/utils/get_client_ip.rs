use actix_web::HttpRequest;

/// Extract the client's IP address from the request.
/// With `trust_forwarded_headers`, the first `X-Forwarded-For` hop wins, then
/// `X-Real-IP`; otherwise (or when both are absent) the peer address is used.
pub fn get_client_ip(req: &HttpRequest, trust_forwarded_headers: bool) -> String {
    if trust_forwarded_headers {
        if let Some(ip) = forwarded_ip(req) {
            return ip;
        }
    }
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn forwarded_ip(req: &HttpRequest) -> Option<String> {
    let headers = req.headers();

    let from_forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    let from_real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    from_forwarded.or_else(from_real_ip).map(str::to_string)
}
