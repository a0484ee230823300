pub mod app_config;
pub mod database;
pub mod document_file;
pub mod error;
pub mod layout_repo;

pub use database::DbClient;
pub use document_file::{read_document, write_document};
pub use error::StoreError;
pub use layout_repo::StoreLayoutRepository;
