//! HTTP API handlers for attrcheck-api

pub mod attributes;
pub mod buildinfo;
pub mod error;
pub mod health;
pub mod upload;

pub use attributes::process_attributes;
pub use buildinfo::get_build_info;
pub use error::ApiError;
pub use health::health_routes;
pub use upload::{upload_csv_json, upload_xlsx_json};
