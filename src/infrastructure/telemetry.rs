use tracing_subscriber::{fmt, EnvFilter};

/// `RUST_LOG` filters (default `info`); `APP_LOG_FORMAT=json` switches to
/// one JSON object per line.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("APP_LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));

    let result = if json {
        fmt().with_env_filter(filter).json().with_current_span(true).try_init()
    } else {
        fmt().with_env_filter(filter).with_target(false).try_init()
    };

    if let Err(e) = result {
        eprintln!("tracing subscriber already set: {}", e);
    }
}
