use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use bazaar_engine::{helpers::FieldErrors, CatalogApiError, ContactApiError, OrderFlowError};
use log::error;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("Not all required arguments were provided. {0}")]
    MissingArguments(String),
    #[error("Validation failed. {0}")]
    ValidationError(FieldErrors),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("Invalid server configuration. {0}")]
    ConfigurationError(String),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
    #[error("Authentication Error. {0}")]
    AuthenticationError(#[from] AuthError),
    #[error("{0}")]
    InsufficientPermissions(String),
    #[error("{0}")]
    NoRecordFound(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::MissingArguments(_) => StatusCode::FORBIDDEN,
            Self::AuthenticationError(e) => match e {
                AuthError::LoginRequired => StatusCode::FORBIDDEN,
                AuthError::InactiveAccount => StatusCode::FORBIDDEN,
                AuthError::ValidationError(_) => StatusCode::UNAUTHORIZED,
                AuthError::PoorlyFormattedToken(_) => StatusCode::UNAUTHORIZED,
                AuthError::CouldNotIssueToken(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::InsufficientPermissions(_) => StatusCode::FORBIDDEN,
            Self::NoRecordFound(_) => StatusCode::FORBIDDEN,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BackendError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ConfigurationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unspecified(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            Self::ValidationError(fields) => json!({ "error": "Validation failed", "fields": fields }),
            Self::BackendError(e) => {
                error!("💻️ Backend error: {e}");
                json!({ "error": "An error occurred on the backend of the server." })
            },
            _ => json!({ "error": self.to_string() }),
        };
        HttpResponse::build(self.status_code()).insert_header(ContentType::json()).body(body.to_string())
    }
}

#[derive(Debug, Clone, Error)]
pub enum AuthError {
    #[error("Log in required")]
    LoginRequired,
    #[error("This account has been deactivated")]
    InactiveAccount,
    #[error("Access token is invalid or has expired. {0}")]
    ValidationError(String),
    #[error("Access token is not in the correct format. {0}")]
    PoorlyFormattedToken(String),
    #[error("Could not issue an access token. {0}")]
    CouldNotIssueToken(String),
}

impl From<CatalogApiError> for ServerError {
    fn from(e: CatalogApiError) -> Self {
        match e {
            CatalogApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            CatalogApiError::InvalidDocument(_) | CatalogApiError::UnknownCategory(_) => {
                Self::InvalidRequestBody(e.to_string())
            },
            CatalogApiError::FileError(e) => Self::BackendError(e),
        }
    }
}

impl From<OrderFlowError> for ServerError {
    fn from(e: OrderFlowError) -> Self {
        match e {
            OrderFlowError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            OrderFlowError::MissingArguments(s) => Self::MissingArguments(s),
            OrderFlowError::ValidationError(fields) => Self::ValidationError(fields),
            OrderFlowError::SellersOnly |
            OrderFlowError::NotOrderOwner(_) |
            OrderFlowError::NoContacts |
            OrderFlowError::BasketAlreadyOpen(_) => Self::InsufficientPermissions(e.to_string()),
            OrderFlowError::NoValidItems | OrderFlowError::EmptyOrder(_) | OrderFlowError::OrderNotFound(_) => {
                Self::NoRecordFound(e.to_string())
            },
        }
    }
}

impl From<ContactApiError> for ServerError {
    fn from(e: ContactApiError) -> Self {
        match e {
            ContactApiError::DatabaseError(e) => Self::BackendError(format!("Database error: {e}")),
            ContactApiError::MissingArguments(s) => Self::MissingArguments(s),
            ContactApiError::ValidationError(fields) => Self::ValidationError(fields),
        }
    }
}
