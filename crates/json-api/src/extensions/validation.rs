//! Request body validation.

use salvo::{oapi::extract::JsonBody, prelude::StatusError};
use validator::Validate;

/// Unwrap a JSON body, rejecting it with 400 when its rules fail.
pub(crate) trait ValidatedJson<T> {
    fn validated(self) -> Result<T, StatusError>;
}

impl<T> ValidatedJson<T> for JsonBody<T>
where
    T: Validate,
{
    fn validated(self) -> Result<T, StatusError> {
        let body = self.into_inner();

        body.validate().map_err(|errors| {
            StatusError::bad_request()
                .brief("Request body failed validation")
                .detail(errors.to_string())
        })?;

        Ok(body)
    }
}
