use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// Typed path parameters; a segment that does not parse is a 400 `INVALID_PATH`.
///
/// ```ignore
/// async fn get_product(ParsedPath(id): ParsedPath<i32>) -> String {
///     format!("Product {id}")
/// }
///
/// async fn get_range(ParsedPath((start, count)): ParsedPath<(u64, u64)>) -> String {
///     format!("{count} products from {start}")
/// }
/// ```
pub struct ParsedPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ParsedPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(ParsedPath(value))
    }
}
