//! Unified error types for phantomscan.
//!
//! This module provides the error hierarchy for the orchestrator, the
//! persistence layer, and policy/corpus loading at start-up. Signal and
//! enrichment functions do not use this type: per the scorer's design
//! (see [`crate::scoring`]), they return `(value, reasons)` and never throw.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for phantomscan operations.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PhantomScanError {
    /// Errors fetching or parsing a registry source.
    #[error("source fetch failed: {context}")]
    Source {
        context: String,
        #[source]
        source: SourceErrorKind,
    },

    /// Errors from the existence prober or enrichment HTTP calls.
    #[error("registry lookup failed: {context}")]
    Registry {
        context: String,
        #[source]
        source: RegistryErrorKind,
    },

    /// Errors from enrichment providers that escaped best-effort handling.
    #[error("enrichment failed: {context}")]
    Enrichment {
        context: String,
        #[source]
        source: EnrichmentErrorKind,
    },

    /// Errors from the persistence layer (tabular store or file store).
    #[error("persistence operation failed: {context}")]
    Persistence {
        context: String,
        #[source]
        source: PersistenceErrorKind,
    },

    /// Errors loading or validating policy/corpus at start-up.
    #[error("policy error: {context}")]
    Policy {
        context: String,
        #[source]
        source: PolicyErrorKind,
    },

    /// The public `ScorePackage` overall deadline was exceeded.
    #[error("scoring timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// IO errors with context.
    #[error("IO error at {path:?}: {message}")]
    Io {
        path: Option<PathBuf>,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Validation errors (bad CLI input, malformed date, etc).
    #[error("validation failed: {0}")]
    Validation(String),

    /// Uncategorised internal error; the affected item was skipped.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Specific source (C1) error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum SourceErrorKind {
    #[error("discovery request failed: {0}")]
    DiscoveryFailed(String),

    #[error("failed to parse candidate JSON: {0}")]
    InvalidJson(String),

    #[error("offline seed file not found: {0}")]
    SeedNotFound(PathBuf),

    #[error("unsupported ecosystem: {0}")]
    UnsupportedEcosystem(String),
}

/// Specific registry (C2) error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum RegistryErrorKind {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("request timed out")]
    Timeout,

    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
}

/// Specific enrichment (C4) error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum EnrichmentErrorKind {
    #[error("provider request failed: {0}")]
    RequestFailed(String),

    #[error("provider response could not be parsed: {0}")]
    InvalidResponse(String),

    #[error("provider disabled by policy: {0}")]
    Disabled(String),
}

/// Specific persistence (C6) error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PersistenceErrorKind {
    #[error("sqlite error: {0}")]
    Sqlite(String),

    #[error("failed to serialize record: {0}")]
    Serialize(String),

    #[error("failed to write file store artifact: {0}")]
    FileStore(String),
}

/// Specific policy (C8) error kinds.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PolicyErrorKind {
    #[error("invalid policy YAML: {0}")]
    InvalidYaml(String),

    #[error("weight out of range for '{subscore}': {value} (must be >= 0)")]
    WeightOutOfRange { subscore: String, value: f64 },

    #[error("invalid corpus entry: {0}")]
    InvalidCorpus(String),
}

/// Convenient Result type for phantomscan operations.
pub type Result<T> = std::result::Result<T, PhantomScanError>;

impl PhantomScanError {
    /// Create a source error with context.
    pub fn source(context: impl Into<String>, source: SourceErrorKind) -> Self {
        Self::Source {
            context: context.into(),
            source,
        }
    }

    /// Create a registry error with context.
    pub fn registry(context: impl Into<String>, source: RegistryErrorKind) -> Self {
        Self::Registry {
            context: context.into(),
            source,
        }
    }

    /// Create an enrichment error with context.
    pub fn enrichment(context: impl Into<String>, source: EnrichmentErrorKind) -> Self {
        Self::Enrichment {
            context: context.into(),
            source,
        }
    }

    /// Create a persistence error with context.
    pub fn persistence(context: impl Into<String>, source: PersistenceErrorKind) -> Self {
        Self::Persistence {
            context: context.into(),
            source,
        }
    }

    /// Create a policy error with context.
    pub fn policy(context: impl Into<String>, source: PolicyErrorKind) -> Self {
        Self::Policy {
            context: context.into(),
            source,
        }
    }

    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        let message = format!("{source}");
        Self::Io {
            path: Some(path),
            message,
            source,
        }
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Map any internal failure to the single opaque "scoring failed" kind
    /// the public `ScorePackage` operation exposes, per §7's propagation
    /// rule, unless the cause is a timeout (which is surfaced distinctly).
    #[must_use]
    pub fn into_scoring_failure(self) -> Self {
        match self {
            Self::Timeout(d) => Self::Timeout(d),
            other => Self::Internal(format!("scoring failed: {other}")),
        }
    }
}

impl From<std::io::Error> for PhantomScanError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: None,
            message: format!("{err}"),
            source: err,
        }
    }
}

impl From<serde_json::Error> for PhantomScanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Source {
            context: "JSON deserialization".to_string(),
            source: SourceErrorKind::InvalidJson(err.to_string()),
        }
    }
}

impl From<serde_yaml::Error> for PhantomScanError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Policy {
            context: "policy deserialization".to_string(),
            source: PolicyErrorKind::InvalidYaml(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for PhantomScanError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Persistence {
            context: "sqlite operation".to_string(),
            source: PersistenceErrorKind::Sqlite(err.to_string()),
        }
    }
}

/// Extension trait for adding context to errors.
///
/// Mirrors `anyhow::Context`, but chains into `PhantomScanError`'s own
/// variants so the context shows up in the `Display` impl without
/// flattening the structured source.
pub trait ErrorContext<T> {
    /// Add context to an error.
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context from a closure (lazy evaluation).
    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T, E: Into<PhantomScanError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        let ctx: String = context.into();
        self.map_err(|e| add_context_to_error(e.into(), &ctx))
    }

    fn with_context<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.map_err(|e| {
            let ctx: String = f().into();
            add_context_to_error(e.into(), &ctx)
        })
    }
}

/// Add context to an error, chaining with any existing context.
fn add_context_to_error(err: PhantomScanError, new_ctx: &str) -> PhantomScanError {
    match err {
        PhantomScanError::Source { context, source } => PhantomScanError::Source {
            context: chain_context(new_ctx, &context),
            source,
        },
        PhantomScanError::Registry { context, source } => PhantomScanError::Registry {
            context: chain_context(new_ctx, &context),
            source,
        },
        PhantomScanError::Enrichment { context, source } => PhantomScanError::Enrichment {
            context: chain_context(new_ctx, &context),
            source,
        },
        PhantomScanError::Persistence { context, source } => PhantomScanError::Persistence {
            context: chain_context(new_ctx, &context),
            source,
        },
        PhantomScanError::Policy { context, source } => PhantomScanError::Policy {
            context: chain_context(new_ctx, &context),
            source,
        },
        PhantomScanError::Io {
            path,
            message,
            source,
        } => PhantomScanError::Io {
            path,
            message: chain_context(new_ctx, &message),
            source,
        },
        PhantomScanError::Validation(msg) => {
            PhantomScanError::Validation(chain_context(new_ctx, &msg))
        }
        PhantomScanError::Internal(msg) => {
            PhantomScanError::Internal(chain_context(new_ctx, &msg))
        }
        other @ PhantomScanError::Timeout(_) => other,
    }
}

/// Chain two context strings together.
fn chain_context(new: &str, existing: &str) -> String {
    if existing.is_empty() {
        new.to_string()
    } else {
        format!("{new}: {existing}")
    }
}

/// Extension trait for Option types to convert to errors with context.
pub trait OptionContext<T> {
    /// Convert None to an error with the given context.
    fn context_none(self, context: impl Into<String>) -> Result<T>;

    /// Convert None to an error with context from a closure.
    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>;
}

impl<T> OptionContext<T> for Option<T> {
    fn context_none(self, context: impl Into<String>) -> Result<T> {
        self.ok_or_else(|| PhantomScanError::Validation(context.into()))
    }

    fn with_context_none<F, C>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> C,
        C: Into<String>,
    {
        self.ok_or_else(|| PhantomScanError::Validation(f().into()))
    }
}
