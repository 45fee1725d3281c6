use std::sync::atomic::AtomicBool;

use sqlx::PgPool;

#[derive(Clone)]
pub struct SqlxContactRepo {
    pub pool: PgPool,
}

/// Set once `CREATE TABLE IF NOT EXISTS contacts` has succeeded in this process.
pub(crate) static CONTACTS_SCHEMA_READY: AtomicBool = AtomicBool::new(false);
