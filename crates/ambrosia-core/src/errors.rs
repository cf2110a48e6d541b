use crate::model::EntityKind;
use ambrosia_core_types::{RequestContext, RequestId, TraceId};
use thiserror::Error;

/// Result type alias using AmError
pub type Result<T> = std::result::Result<T, AmError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every failure surfaced by the catalog is classified by one of these kinds.
/// Each kind maps to a stable error code suitable for API responses and for
/// asserting on in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmErrorKind {
    // Caller input
    InvalidInput,
    DuplicateFilter,

    // Cardinality / integrity
    NotFound,
    CardinalityViolation,
    IntegrityViolation,

    // Store interaction
    Decode,
    Persistence,
    Migration,
    ChecksumMismatch,

    // Cancellation
    Cancelled,
    DeadlineExceeded,

    // Seed import
    SeedValidation,

    // Integration/IO
    Io,
    Serialization,

    // Boundary
    Forbidden,

    // Internal
    Internal,
}

impl AmErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            AmErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            AmErrorKind::DuplicateFilter => "ERR_DUPLICATE_FILTER",
            AmErrorKind::NotFound => "ERR_NOT_FOUND",
            AmErrorKind::CardinalityViolation => "ERR_CARDINALITY_VIOLATION",
            AmErrorKind::IntegrityViolation => "ERR_INTEGRITY_VIOLATION",
            AmErrorKind::Decode => "ERR_DECODE",
            AmErrorKind::Persistence => "ERR_PERSISTENCE",
            AmErrorKind::Migration => "ERR_MIGRATION",
            AmErrorKind::ChecksumMismatch => "ERR_CHECKSUM_MISMATCH",
            AmErrorKind::Cancelled => "ERR_CANCELLED",
            AmErrorKind::DeadlineExceeded => "ERR_DEADLINE_EXCEEDED",
            AmErrorKind::SeedValidation => "ERR_SEED_VALIDATION",
            AmErrorKind::Io => "ERR_IO",
            AmErrorKind::Serialization => "ERR_SERIALIZATION",
            AmErrorKind::Forbidden => "ERR_FORBIDDEN",
            AmErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for kinds meaning "the caller gave up" rather than "something broke"
    pub fn is_cancellation(&self) -> bool {
        matches!(self, AmErrorKind::Cancelled | AmErrorKind::DeadlineExceeded)
    }
}

/// Canonical structured error type
///
/// Carries the classification plus enough context (operation, entity kind,
/// rendered filter, request id) for the caller to log the failure meaningfully.
#[derive(Debug, Clone)]
pub struct AmError {
    kind: AmErrorKind,
    op: Option<String>,
    entity: Option<EntityKind>,
    entity_id: Option<String>,
    filter: Option<String>,
    request_id: Option<RequestId>,
    trace_id: Option<TraceId>,
    message: String,
    source: Option<Box<AmError>>,
}

impl AmError {
    /// Create a new error with the specified kind
    pub fn new(kind: AmErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity: None,
            entity_id: None,
            filter: None,
            request_id: None,
            trace_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the kind of entity being fetched
    pub fn with_entity(mut self, entity: EntityKind) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add the rendered filter that produced this error
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Copy the correlation ids carried by `request`
    pub fn with_request(mut self, request: &RequestContext) -> Self {
        self.request_id = Some(request.request_id.clone());
        if let Some(trace_id) = &request.trace_id {
            self.trace_id = Some(trace_id.clone());
        }
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: AmError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Fill in operation/entity/filter context only where it is still missing.
    ///
    /// Lower layers set the most specific context they know; callers higher up
    /// use this so they never overwrite it.
    pub fn or_context(mut self, op: &str, entity: EntityKind, filter: &str) -> Self {
        if self.op.is_none() {
            self.op = Some(op.to_string());
        }
        if self.entity.is_none() {
            self.entity = Some(entity);
        }
        if self.filter.is_none() {
            self.filter = Some(filter.to_string());
        }
        self
    }

    pub fn kind(&self) -> AmErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn is_cancellation(&self) -> bool {
        self.kind.is_cancellation()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn entity(&self) -> Option<EntityKind> {
        self.entity
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn trace_id(&self) -> Option<&TraceId> {
        self.trace_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source_error(&self) -> Option<&AmError> {
        self.source.as_deref()
    }
}

impl std::fmt::Display for AmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity) = self.entity {
            write!(f, " (entity: {})", entity)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(filter) = &self.filter {
            write!(f, " (filter: {})", filter)?;
        }
        if let Some(request_id) = &self.request_id {
            write!(f, " (request_id: {})", request_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for AmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain failures raised by the query layer before they are classified
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AmbrosiaError {
    /// A unique-key lookup matched no rows
    #[error("No {entity} found matching {filter}")]
    NotFound { entity: EntityKind, filter: String },

    /// A unique-key lookup matched more than one row
    #[error("Found {count} {entity} rows matching unique key {filter}")]
    MultipleResults {
        entity: EntityKind,
        filter: String,
        count: usize,
    },

    /// The same column was constrained twice in one filter set
    #[error("Column {column} is already constrained in this filter")]
    DuplicateFilter { column: String },

    /// A row referenced an owning user that does not exist
    #[error("{entity} {entity_id} has no owning user")]
    MissingOwner { entity: EntityKind, entity_id: String },

    /// The caller cancelled the request
    #[error("Request was cancelled")]
    Cancelled,

    /// The caller's deadline passed before the request finished
    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

impl From<AmbrosiaError> for AmError {
    fn from(err: AmbrosiaError) -> Self {
        let message = err.to_string();
        match err {
            AmbrosiaError::NotFound { entity, filter } => AmError::new(AmErrorKind::NotFound)
                .with_entity(entity)
                .with_filter(filter)
                .with_message(message),

            AmbrosiaError::MultipleResults { entity, filter, .. } => {
                AmError::new(AmErrorKind::CardinalityViolation)
                    .with_entity(entity)
                    .with_filter(filter)
                    .with_message(message)
            }

            AmbrosiaError::DuplicateFilter { column } => {
                AmError::new(AmErrorKind::DuplicateFilter)
                    .with_op("build_filter")
                    .with_filter(column)
                    .with_message(message)
            }

            AmbrosiaError::MissingOwner { entity, entity_id } => {
                AmError::new(AmErrorKind::IntegrityViolation)
                    .with_entity(entity)
                    .with_entity_id(entity_id)
                    .with_message(message)
            }

            AmbrosiaError::Cancelled => AmError::new(AmErrorKind::Cancelled).with_message(message),

            AmbrosiaError::DeadlineExceeded => {
                AmError::new(AmErrorKind::DeadlineExceeded).with_message(message)
            }
        }
    }
}

impl From<serde_json::Error> for AmError {
    fn from(err: serde_json::Error) -> Self {
        AmError::new(AmErrorKind::Serialization).with_message(err.to_string())
    }
}
