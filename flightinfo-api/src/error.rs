use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use flightinfo_core::{CoreError, ValidationErrors};
use serde_json::json;

#[derive(Debug)]
pub enum AppError {
    ValidationError(ValidationErrors),
    NotFoundError(String),
    ConflictError(String),
    InternalServerError(String),
}

impl AppError {
    pub fn flight_not_found(id: i64) -> Self {
        AppError::NotFoundError(format!("Flight with ID {} not found.", id))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::ValidationError(errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Validation failed",
                    "errors": errors,
                }),
            ),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal Server Error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::ValidationError(errors)
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::DuplicateFlightNumber(_) => AppError::ConflictError(err.to_string()),
            CoreError::StorageError(_) | CoreError::InternalError(_) => {
                AppError::InternalServerError(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_statuses() {
        let conflict: AppError = CoreError::DuplicateFlightNumber("NZ1".to_string()).into();
        assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

        let storage: AppError = CoreError::StorageError("connection reset".to_string()).into();
        assert_eq!(storage.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let mut errors = ValidationErrors::new();
        errors.add("airline", "Airline is required");
        let invalid: AppError = errors.into();
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let internal: AppError = CoreError::InternalError("bad status".to_string()).into();
        assert_eq!(internal.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        assert_eq!(
            AppError::flight_not_found(7).into_response().status(),
            StatusCode::NOT_FOUND
        );
    }
}
