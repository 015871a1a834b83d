use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;

use crate::{
    content::AuthoringError,
    error::log_error,
    model::{DatabaseError, ResourceType},
};

pub type WebResult<T> = std::result::Result<T, WebError>;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("ResourceNotFound: {resource_type:?}")]
    ResourceNotFound { resource_type: ResourceType },

    #[error("ResourceFetchError: {resource_type:?}. Error: {error}")]
    ResourceFetchError {
        resource_type: ResourceType,
        error: DatabaseError,
    },

    #[error("ResourceBadRequest: {resource_type:?}. Details: {details}")]
    ResourceBadRequest {
        resource_type: ResourceType,
        details: String,
    },
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("ContentRejected: {}", errors.join("; "))]
    ContentRejected { errors: Vec<String> },

    #[error("ContentAuthoring: {0}")]
    ContentAuthoring(#[from] AuthoringError),
}

impl ResourceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceNotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceFetchError { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ResourceBadRequest { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceNotFound { .. } => String::from("Resource error, resource not found."),
            Self::ResourceFetchError { .. } => {
                String::from("Resource error, unable to fetch resource.")
            }
            Self::ResourceBadRequest { details, .. } => {
                format!("Resource error, bad request: {details}")
            }
        }
    }
}

impl ContentError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ContentRejected { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::ContentAuthoring(_) => StatusCode::BAD_REQUEST,
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ContentRejected { .. } => String::from("Test content is invalid."),
            Self::ContentAuthoring(e) => format!("Authoring error, {e}."),
        }
    }

    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::ContentRejected { errors } => errors.clone(),
            Self::ContentAuthoring(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Error)]
pub enum WebError {
    #[error("ResourceError - {0}")]
    ResourceError(#[from] ResourceError),
    #[error("ContentError - {0}")]
    ContentError(#[from] ContentError),
}

impl WebError {
    pub fn resource_not_found(r#type: ResourceType) -> Self {
        Self::ResourceError(ResourceError::ResourceNotFound {
            resource_type: r#type,
        })
    }

    /// Rejected documents surface as content errors, everything else as a fetch failure.
    pub fn resource_fetch_error(r#type: ResourceType, error: DatabaseError) -> Self {
        match error {
            DatabaseError::DocumentRejected { errors } => Self::content_rejected(errors),
            error => Self::ResourceError(ResourceError::ResourceFetchError {
                resource_type: r#type,
                error,
            }),
        }
    }

    pub fn resource_bad_request<S: Into<String>>(r#type: ResourceType, details: S) -> Self {
        Self::ResourceError(ResourceError::ResourceBadRequest {
            resource_type: r#type,
            details: details.into(),
        })
    }

    pub fn content_rejected(errors: Vec<String>) -> Self {
        Self::ContentError(ContentError::ContentRejected { errors })
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ResourceError(e) => e.status_code(),
            Self::ContentError(e) => e.status_code(),
        }
    }

    pub fn client_display(&self) -> String {
        match self {
            Self::ResourceError(e) => e.client_display(),
            Self::ContentError(e) => e.client_display(),
        }
    }

    pub fn errors(&self) -> Vec<String> {
        match self {
            Self::ResourceError(_) => Vec::new(),
            Self::ContentError(e) => e.errors(),
        }
    }
}

impl From<AuthoringError> for WebError {
    fn from(value: AuthoringError) -> Self {
        Self::ContentError(ContentError::ContentAuthoring(value))
    }
}

#[derive(serde::Serialize, serde::Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Human-readable message for the client
    pub message: String,
    /// HTTP status code (stringified)
    pub status_code: String,
    /// Validation messages, ready to show next to the form
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    /// Optional debug details (only in debug mode)
    pub details: Option<String>,
}

impl IntoResponse for WebError {
    fn into_response(self) -> axum::response::Response {
        log_error(&self);

        let status_code = self.status_code();
        let body = ErrorResponse {
            message: self.client_display(),
            status_code: status_code.as_str().to_string(),
            errors: self.errors(),
            details: if cfg!(debug_assertions) {
                Some(self.to_string())
            } else {
                None
            },
        };

        (status_code, Json(body)).into_response()
    }
}
