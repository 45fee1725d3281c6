use chrono::{DateTime, Utc};
use once_cell::sync::{Lazy, OnceCell};

pub static START_TIME: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

static EXPOSE_ERROR_DETAILS: OnceCell<bool> = OnceCell::new();

/// Set once at startup; later calls are ignored.
pub fn set_expose_error_details(expose: bool) {
    let _ = EXPOSE_ERROR_DETAILS.set(expose);
}

pub fn expose_error_details() -> bool {
    EXPOSE_ERROR_DETAILS.get().copied().unwrap_or(false)
}
