use rouille::Response;

use crate::favorites::error::StoreError;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    Internal(String),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Io(_) | StoreError::Serialize(_) => {
                ApiError::Internal("could not persist favorites".into())
            }
        }
    }
}

impl ApiError {
    pub fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(msg) =>
                Response::text(msg).with_status_code(400),

            ApiError::Internal(msg) =>
                Response::text(msg).with_status_code(500),
        }
    }
}
