//! The catalog entity envelope.
//!
//! An [Entity] keeps the document exactly as it was received next to a typed
//! view of the fields every kind shares (`apiVersion`, `kind`, `metadata`,
//! `relations`). Kind specific `spec` payloads are decoded on demand from the
//! retained document, see [Entity::spec] and [Entity::project_spec].
//!
//! The typed view may be partial. A `fields` selection can leave out `kind`
//! or `metadata`, and catalogs may hold kinds beyond [EntityKind]. Such
//! entities still decode, only spec projection fails for them.

use std::collections::BTreeMap;
use std::str::FromStr;

use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::value::RawValue;
use serde_with::skip_serializing_none;

use crate::annotations::WellKnownAnnotations;
use crate::entity_ref::{EntityRef, EntityRefError};
use crate::error::DecodeError;
use crate::spec::{
    ApiSpec,
    ComponentSpec,
    DomainSpec,
    GroupSpec,
    KindSpec,
    LocationSpec,
    ResourceSpec,
    Spec,
    SystemSpec,
    TemplateSpec,
    UserSpec,
};

/// Namespace assumed for entities that don't declare one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// The kinds of entity known to the catalog.
///
/// The kind decides which [Spec] shape an entity carries.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    #[serde(rename = "API")]
    #[display("API")]
    Api,
    Component,
    Domain,
    Group,
    Location,
    Resource,
    System,
    Template,
    User,
}

impl EntityKind {
    pub const ALL: [EntityKind; 9] = [
        EntityKind::Api,
        EntityKind::Component,
        EntityKind::Domain,
        EntityKind::Group,
        EntityKind::Location,
        EntityKind::Resource,
        EntityKind::System,
        EntityKind::Template,
        EntityKind::User,
    ];
}

/// Error returned when a string doesn't name a known [EntityKind].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity kind '{0}'")]
pub struct UnknownKindError(pub String);

/// Parses kinds case-insensitively, as they appear in entity references
/// (`component:default/foo`).
impl FromStr for EntityKind {
    type Err = UnknownKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EntityKind::ALL
            .into_iter()
            .find(|kind| kind.to_string().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownKindError(s.to_string()))
    }
}

/// Fields common to all kinds of entity.
///
/// Fields missing from the document take their default value.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EntityMetadata {
    /// Unique within the catalog for a given namespace and kind.
    /// Empty if not selected.
    pub name: String,
    /// Globally unique ID, assigned by the server.
    pub uid: Option<String>,
    /// Opaque value that changes with every update to the entity.
    pub etag: Option<String>,
    pub namespace: Option<String>,
    /// Display name, for user interfaces only.
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub annotations: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub links: Vec<EntityLink>,
}

impl EntityMetadata {
    /// The namespace of the entity, falling back to [DEFAULT_NAMESPACE].
    pub fn namespace_or_default(&self) -> &str {
        self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE)
    }

    pub fn well_known_annotations(&self) -> WellKnownAnnotations {
        WellKnownAnnotations::from_annotations(&self.annotations)
    }
}

/// A link to external information related to the entity.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityLink {
    pub url: String,
    pub title: Option<String>,
    /// Semantic key for a visual icon.
    pub icon: Option<String>,
    /// Categorizes links into groups.
    #[serde(rename = "type")]
    pub link_type: Option<String>,
}

/// An edge of a given type from an entity to another entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityRelation {
    #[serde(rename = "type")]
    pub relation_type: String,
    pub target_ref: String,
}

impl EntityRelation {
    /// Parse the target reference of the relation.
    pub fn target(&self) -> Result<EntityRef, EntityRefError> {
        self.target_ref.parse()
    }
}

/// The fields of the envelope we decode eagerly.
/// Everything else is only reachable through the raw document.
#[derive(Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct Envelope {
    api_version: String,
    kind: Option<String>,
    metadata: EntityMetadata,
    relations: Vec<EntityRelation>,
}

#[derive(Deserialize)]
struct SpecDocument<'a> {
    #[serde(borrow, default)]
    spec: Option<&'a RawValue>,
}

/// An entity in the software catalog.
///
/// Immutable once decoded: the typed fields are views over [Entity::raw],
/// which holds the document byte for byte, unknown fields included.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    api_version: String,
    kind: Option<String>,
    metadata: EntityMetadata,
    relations: Vec<EntityRelation>,
    raw: Box<str>,
}

impl Entity {
    /// Decode an entity from a JSON document, retaining the document as is.
    pub fn from_json(raw: impl Into<String>) -> Result<Self, DecodeError> {
        Self::decode(raw.into().into_boxed_str())
    }

    /// Decode an entity from the bytes of a JSON document.
    ///
    /// The whole document must be UTF-8, including values the envelope
    /// doesn't look at.
    pub fn from_slice(raw: &[u8]) -> Result<Self, DecodeError> {
        let raw = std::str::from_utf8(raw)?;
        Self::decode(raw.into())
    }

    fn decode(raw: Box<str>) -> Result<Self, DecodeError> {
        let envelope: Envelope = serde_json::from_str(&raw)?;
        Ok(Self::from_envelope(envelope, raw))
    }

    fn from_envelope(envelope: Envelope, raw: Box<str>) -> Self {
        Self {
            api_version: envelope.api_version,
            kind: envelope.kind,
            metadata: envelope.metadata,
            relations: envelope.relations,
            raw,
        }
    }

    /// Version of the schema the entity follows, e.g. `backstage.io/v1alpha1`.
    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// The kind of the entity, if it is one of the known kinds.
    pub fn kind(&self) -> Option<EntityKind> {
        self.kind.as_deref()?.parse().ok()
    }

    /// The kind as sent, known or not. `None` if the document has no kind.
    pub fn kind_name(&self) -> Option<&str> {
        self.kind.as_deref()
    }

    pub fn metadata(&self) -> &EntityMetadata {
        &self.metadata
    }

    pub fn relations(&self) -> &[EntityRelation] {
        &self.relations
    }

    /// The document as received.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn into_raw(self) -> String {
        self.raw.into_string()
    }

    /// Reference to this entity in `kind:namespace/name` form.
    ///
    /// `None` if the kind is missing or unknown, or the name is missing.
    pub fn entity_ref(&self) -> Option<EntityRef> {
        if self.metadata.name.is_empty() {
            return None;
        }
        Some(EntityRef {
            kind: self.kind()?,
            namespace: self.metadata.namespace_or_default().to_string(),
            name: self.metadata.name.clone(),
        })
    }

    /// Decode the `spec` of the entity into the shape of kind `S::KIND`.
    ///
    /// Fails without looking at the spec if the entity is of another kind.
    /// Absent fields take their default value, unknown fields are ignored.
    pub fn spec<S: KindSpec>(&self) -> Result<S, DecodeError> {
        match (self.kind_name(), self.kind()) {
            (_, Some(kind)) if kind == S::KIND => {},
            (None, _) => return Err(DecodeError::MissingKind),
            (Some(actual), _) => {
                return Err(DecodeError::KindMismatch {
                    expected: S::KIND,
                    actual: actual.to_string(),
                });
            },
        }

        let document: SpecDocument = serde_json::from_str(&self.raw)?;
        let spec = document.spec.map_or("{}", RawValue::get);
        Ok(serde_json::from_str(spec)?)
    }

    /// Decode the `spec` into the [Spec] variant of `expected`.
    pub fn project_spec(&self, expected: EntityKind) -> Result<Spec, DecodeError> {
        let spec = match expected {
            EntityKind::Api => Spec::Api(self.spec::<ApiSpec>()?),
            EntityKind::Component => Spec::Component(self.spec::<ComponentSpec>()?),
            EntityKind::Domain => Spec::Domain(self.spec::<DomainSpec>()?),
            EntityKind::Group => Spec::Group(self.spec::<GroupSpec>()?),
            EntityKind::Location => Spec::Location(self.spec::<LocationSpec>()?),
            EntityKind::Resource => Spec::Resource(self.spec::<ResourceSpec>()?),
            EntityKind::System => Spec::System(self.spec::<SystemSpec>()?),
            EntityKind::Template => Spec::Template(self.spec::<TemplateSpec>()?),
            EntityKind::User => Spec::User(self.spec::<UserSpec>()?),
        };
        Ok(spec)
    }

    /// Decode the `spec` into the [Spec] variant of the entity's own kind.
    ///
    /// Fails for entities without a kind or of a kind outside [EntityKind].
    pub fn typed_spec(&self) -> Result<Spec, DecodeError> {
        let kind = self.kind_name().ok_or(DecodeError::MissingKind)?;
        self.project_spec(kind.parse()?)
    }

    /// Pretty print the raw document, keeping its key order.
    pub fn to_pretty_json(&self) -> Result<String, DecodeError> {
        let value: serde_json::Value = serde_json::from_str(&self.raw)?;
        Ok(serde_json::to_string_pretty(&value)?)
    }
}

/// Captures the document verbatim, so entities can be decoded as part of
/// larger responses without losing their exact representation.
impl<'de> Deserialize<'de> for Entity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Box::<RawValue>::deserialize(deserializer)?;
        Entity::decode(raw.into()).map_err(serde::de::Error::custom)
    }
}

/// Writes the raw document back out unchanged.
impl Serialize for Entity {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let raw: &RawValue = serde_json::from_str(&self.raw).map_err(serde::ser::Error::custom)?;
        raw.serialize(serializer)
    }
}
