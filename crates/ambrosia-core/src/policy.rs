//! Access policy collaborator
//!
//! The catalog consults an `AccessPolicy` before every read. The query layer
//! itself never makes authorization decisions; policies are injected at the
//! boundary so deployments can swap them without touching query code.

use crate::errors::{AmError, AmErrorKind, Result};
use crate::model::EntityKind;
use ambrosia_core_types::RequestContext;

/// A read the catalog is about to perform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogAction {
    /// Filtered multi-row read
    List(EntityKind),
    /// Unique-key read
    Get(EntityKind),
}

impl CatalogAction {
    pub fn entity(&self) -> EntityKind {
        match self {
            CatalogAction::List(entity) | CatalogAction::Get(entity) => *entity,
        }
    }
}

impl std::fmt::Display for CatalogAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogAction::List(entity) => write!(f, "list {}", entity),
            CatalogAction::Get(entity) => write!(f, "get {}", entity),
        }
    }
}

/// Policy hook deciding whether a request may perform a catalog action
pub trait AccessPolicy {
    /// # Errors
    ///
    /// `Forbidden` when the request may not perform `action`.
    fn check(&self, request: &RequestContext, action: CatalogAction) -> Result<()>;
}

/// Permits every action
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAllPolicy;

impl AccessPolicy for AllowAllPolicy {
    fn check(&self, _request: &RequestContext, _action: CatalogAction) -> Result<()> {
        Ok(())
    }
}

/// Rejects every action
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAllPolicy;

impl AccessPolicy for DenyAllPolicy {
    fn check(&self, request: &RequestContext, action: CatalogAction) -> Result<()> {
        Err(AmError::new(AmErrorKind::Forbidden)
            .with_op("access_policy")
            .with_entity(action.entity())
            .with_request(request)
            .with_message(format!("Access denied: {}", action)))
    }
}
