//! Error types
//!
//! Typed failures that reach the command-line boundary. Transport and parsing
//! problems stay `anyhow::Error` and are wrapped where they cross a typed seam.

use crate::resolve::Category;
use thiserror::Error;

/// Failures while turning a user token into a numeric ID
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("{category} \"{token}\" not found")]
    NotFound { category: Category, token: String },

    #[error("{category} name \"{token}\" is ambiguous ({matches} matches), use the numeric ID instead")]
    Ambiguous {
        category: Category,
        token: String,
        matches: usize,
    },

    /// Listing call failed; passed through untouched
    #[error(transparent)]
    Upstream(#[from] anyhow::Error),
}

/// Programmer or integration errors raised while building a table
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("malformed sort prefix in key \"{0}\": expected \"<number> <label>\"")]
    SortPrefix(String),

    #[error("row has {actual} cells but the table has {expected} columns")]
    ColumnCount { expected: usize, actual: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Domain failures reported by, or detected around, the remote API
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Couldn't login to Oktawave.")]
    Login,

    #[error("{method} failed with HTTP {status}")]
    Status { method: String, status: u16 },

    #[error("response to {method} is missing field \"{field}\"")]
    MissingField { method: String, field: String },

    #[error("OCI class \"{0}\" not found")]
    OciClassNotFound(String),

    #[error("Disk {0} not found")]
    OvsNotFound(i64),

    #[error("Disk is already mapped to this instance")]
    OvsMapped,

    #[error("Disk is not mapped to this instance")]
    OvsUnmapped,

    #[error("Disk cannot be mapped.")]
    OvsMap,

    #[error("Disk cannot be unmapped.")]
    OvsUnmap,

    #[error("Disk cannot be deleted (is it mapped to any OCI instances?).")]
    OvsDelete,

    #[error("Disk is mapped to an instance")]
    OvsInUse,

    #[error("Requested size smaller than current size")]
    OvsTooSmall,

    #[error("Disk tier cannot be changed.")]
    OvsChangeTier,

    #[error("Disk cannot be extended.")]
    OvsExtend,

    #[error("Selected template is not a database template")]
    OrdbInvalidTemplate,
}
