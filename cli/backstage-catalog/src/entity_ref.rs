//! Entity references of the form `kind:namespace/name`.
//!
//! See <https://backstage.io/docs/features/software-catalog/references>

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

use crate::entity::{DEFAULT_NAMESPACE, EntityKind, UnknownKindError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EntityRefError {
    #[error("entity reference '{0}' has no kind")]
    MissingKind(String),
    #[error("entity reference '{0}' has no name")]
    MissingName(String),
    #[error(transparent)]
    UnknownKind(#[from] UnknownKindError),
}

/// A fully qualified reference to an entity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub namespace: String,
    pub name: String,
}

impl EntityRef {
    /// Reference an entity in the default namespace.
    pub fn new(kind: EntityKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            namespace: DEFAULT_NAMESPACE.to_string(),
            name: name.into(),
        }
    }

    /// Parse a reference that may omit its kind, e.g. the `owner` of a
    /// component which defaults to a group.
    pub fn parse_with_default_kind(s: &str, default_kind: EntityKind) -> Result<Self, EntityRefError> {
        let (kind, rest) = match s.split_once(':') {
            Some((kind, rest)) => (kind.parse()?, rest),
            None => (default_kind, s),
        };
        Self::with_kind(s, kind, rest)
    }

    fn with_kind(s: &str, kind: EntityKind, rest: &str) -> Result<Self, EntityRefError> {
        let (namespace, name) = match rest.split_once('/') {
            Some((namespace, name)) => (namespace, name),
            None => (DEFAULT_NAMESPACE, rest),
        };
        if name.is_empty() {
            return Err(EntityRefError::MissingName(s.to_string()));
        }
        let namespace = if namespace.is_empty() {
            DEFAULT_NAMESPACE
        } else {
            namespace
        };
        Ok(Self {
            kind,
            namespace: namespace.to_string(),
            name: name.to_string(),
        })
    }
}

impl FromStr for EntityRef {
    type Err = EntityRefError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let Some((kind, rest)) = s.split_once(':') else {
            return Err(EntityRefError::MissingKind(s.to_string()));
        };
        Self::with_kind(s, kind.parse()?, rest)
    }
}

/// Formats kind and namespace in lowercase, the catalog's canonical form.
impl Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}/{}",
            self.kind.to_string().to_lowercase(),
            self.namespace.to_lowercase(),
            self.name
        )
    }
}

impl From<EntityRef> for String {
    fn from(entity_ref: EntityRef) -> Self {
        entity_ref.to_string()
    }
}
