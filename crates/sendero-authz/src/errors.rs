use sendero_storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthzError {
    #[error("role {0} is protected and cannot be edited")]
    ProtectedRole(String),
    #[error("role {0} lacks admin rights over the permission subsystem")]
    Unauthorized(String),
    #[error("unknown role: {0}")]
    UnknownRole(String),
    #[error("unknown module: {0}")]
    UnknownModule(String),
    #[error("invalid permission kind: {0}")]
    InvalidKind(String),
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    #[error("malformed permission data: {0}")]
    MalformedData(String),
    #[error("persistence error: {0}")]
    Persistence(#[from] StorageError),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type AuthzResult<T> = Result<T, AuthzError>;
