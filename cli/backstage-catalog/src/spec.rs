//! Kind specific `spec` shapes.
//!
//! Each shape is only valid for entities of the matching [EntityKind].
//! All shapes default absent fields and ignore unknown ones, so newer
//! servers can add fields without breaking older clients.
//!
//! See <https://backstage.io/docs/features/software-catalog/descriptor-format>

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

use crate::entity::EntityKind;

/// A spec shape bound to the one kind of entity that may carry it.
pub trait KindSpec: DeserializeOwned + Into<Spec> {
    const KIND: EntityKind;
}

macro_rules! impl_kind_spec {
    ($($shape:ident => $kind:ident),* $(,)?) => {
        $(
            impl KindSpec for $shape {
                const KIND: EntityKind = EntityKind::$kind;
            }

            impl From<$shape> for Spec {
                fn from(spec: $shape) -> Self {
                    Spec::$kind(spec)
                }
            }
        )*
    };
}

/// The decoded spec of an entity, one variant per [EntityKind].
#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Api(ApiSpec),
    Component(ComponentSpec),
    Domain(DomainSpec),
    Group(GroupSpec),
    Location(LocationSpec),
    Resource(ResourceSpec),
    System(SystemSpec),
    Template(TemplateSpec),
    User(UserSpec),
}

impl Spec {
    pub fn kind(&self) -> EntityKind {
        match self {
            Spec::Api(_) => EntityKind::Api,
            Spec::Component(_) => EntityKind::Component,
            Spec::Domain(_) => EntityKind::Domain,
            Spec::Group(_) => EntityKind::Group,
            Spec::Location(_) => EntityKind::Location,
            Spec::Resource(_) => EntityKind::Resource,
            Spec::System(_) => EntityKind::System,
            Spec::Template(_) => EntityKind::Template,
            Spec::User(_) => EntityKind::User,
        }
    }
}

impl_kind_spec! {
    ApiSpec => Api,
    ComponentSpec => Component,
    DomainSpec => Domain,
    GroupSpec => Group,
    LocationSpec => Location,
    ResourceSpec => Resource,
    SystemSpec => System,
    TemplateSpec => Template,
    UserSpec => User,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSpec {
    /// The type of API, e.g. `openapi`. Required.
    #[serde(rename = "type")]
    pub api_type: String,
    /// Required.
    pub lifecycle: String,
    /// Entity reference to the owner. Required.
    pub owner: String,
    /// Entity reference to the system the API belongs to.
    pub system: Option<String>,
    /// The definition of the API in the format given by `type`. Required.
    pub definition: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ComponentSpec {
    /// The type of component, e.g. `service`. Required.
    #[serde(rename = "type")]
    pub component_type: String,
    /// Required.
    pub lifecycle: String,
    /// Entity reference to the owner. Required.
    pub owner: String,
    pub system: Option<String>,
    /// Entity reference to the component this one is a part of.
    pub subcomponent_of: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub provides_apis: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub consumes_apis: Vec<String>,
    /// Components and resources this component depends on.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainSpec {
    /// Required.
    pub owner: String,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSpec {
    /// The type of group. There is no enforced set of values. Required.
    #[serde(rename = "type")]
    pub group_type: String,
    pub profile: Option<Profile>,
    /// The parent group in the hierarchy.
    pub parent: Option<String>,
    /// Groups whose parent is this group, in no particular order. Required.
    pub children: Vec<String>,
    /// Users that are direct members of the group.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationSpec {
    /// Shared by all targets. Inherited from the location that read the
    /// entity if absent.
    #[serde(rename = "type")]
    pub location_type: Option<String>,
    /// Absolute, or relative to the location entity itself.
    pub target: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<String>,
    pub presence: LocationPresence,
}

/// Whether the target of a location must exist.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationPresence {
    #[default]
    Required,
    Optional,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResourceSpec {
    /// The type of resource, e.g. `database`. Required.
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Required.
    pub owner: String,
    pub system: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub depends_on: Vec<String>,
    /// Components and resources that depend on this resource.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub dependency_of: Vec<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSpec {
    /// Required.
    pub owner: String,
    /// Entity reference to the domain the system belongs to.
    pub domain: Option<String>,
    #[serde(rename = "type")]
    pub system_type: Option<String>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateSpec {
    /// The type of component the template creates. Required.
    #[serde(rename = "type")]
    pub template_type: String,
    pub owner: Option<String>,
    /// Parameter forms, kept as opaque documents.
    pub parameters: Vec<serde_json::Value>,
    /// Scaffolder steps, kept as opaque documents.
    pub steps: Vec<serde_json::Value>,
}

#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserSpec {
    pub profile: Option<Profile>,
    /// Groups the user is a direct member of. Required.
    pub member_of: Vec<String>,
}

/// Display information about a user or group.
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Profile {
    pub display_name: Option<String>,
    pub email: Option<String>,
    /// URL of a picture.
    pub picture: Option<String>,
}
