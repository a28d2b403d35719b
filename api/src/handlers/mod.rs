//! Request handling helpers shared by every route

pub mod error;

pub use error::{ApiError, ApiResult};

use actix_web::web;
use validator::Validate;

/// Unwrap a JSON body after running its `validator` rules
pub fn validated<T: Validate>(body: web::Json<T>) -> ApiResult<T> {
    let body = body.into_inner();
    body.validate()?;
    Ok(body)
}
