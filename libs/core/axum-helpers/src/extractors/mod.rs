//! Extractors that reject with [`AppError`](crate::errors::AppError), so every
//! bad request renders the same `ErrorResponse` body.

pub mod parsed_path;
pub mod validated_json;

pub use parsed_path::ParsedPath;
pub use validated_json::ValidatedJson;
