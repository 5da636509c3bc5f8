//! Router error taxonomy

use crate::method::HttpMethod;
use thiserror::Error;

/// Errors raised by registration, matching, binding and path generation
#[derive(Debug, Error)]
pub enum RouterError {
    /// Two routes on the same HTTP method compiled to the same path
    #[error("route conflict: {method} {path} is already registered")]
    RouteConflict { method: HttpMethod, path: String },

    /// A route name was reused on the same HTTP method
    #[error("route name '{name}' is already registered for {method}")]
    DuplicateRouteName { method: HttpMethod, name: String },

    /// The template could not be compiled
    #[error("invalid route template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    /// `get_path` was asked for a route name that was never registered
    #[error("route '{0}' does not exist")]
    NotFoundRoute(String),

    /// CLI dispatch targeted a missing controller
    #[error("Controller {0} does not exist")]
    NotFoundController(String),

    /// CLI dispatch targeted a missing action
    #[error("Action {0} does not exist")]
    NotFoundAction(String),

    /// Web dispatch resolved to a controller or action that does not exist
    #[error("404: no handler for {controller}/{action}")]
    NotFound404 { controller: String, action: String },

    /// A handler kept forwarding past the configured limit
    #[error("routing loop: request forwarded more than {limit} times")]
    RoutingLoop { limit: usize },

    #[error("route snapshot could not be encoded or decoded: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("route snapshot version {found} is not supported (expected {expected})")]
    UnsupportedSnapshotVersion { found: u32, expected: u32 },
}

impl RouterError {
    /// HTTP status the outer loop should answer with
    pub fn status_code(&self) -> u16 {
        match self {
            RouterError::NotFoundRoute(_)
            | RouterError::NotFoundController(_)
            | RouterError::NotFoundAction(_)
            | RouterError::NotFound404 { .. } => 404,
            _ => 500,
        }
    }

    /// Whether this error means "nothing answers this request"
    pub fn is_not_found(&self) -> bool {
        self.status_code() == 404
    }
}

/// Result alias used across the router
pub type Result<T> = std::result::Result<T, RouterError>;
