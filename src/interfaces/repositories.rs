pub mod contact;
pub mod local_file;
pub mod projects;
pub mod sqlx_repo;
