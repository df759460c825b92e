//! Client for the entities API of the Backstage software catalog.
//!
//! This crate provides:
//! - HTTP client construction with optional bearer token authentication
//! - The entity operations (list, query, get, delete, batch get)
//! - Entity documents that keep the server's JSON verbatim, with typed
//!   envelope fields and on-demand typed specs per kind
//! - Both pagination protocols of the catalog: `Link` headers and cursors
//!
//! ## Usage
//!
//! ```ignore
//! use backstage_catalog::{CatalogClient, CatalogClientConfig, EntityCatalog, ListEntitiesRequest};
//!
//! let config = CatalogClientConfig::new("https://backstage.example.com").with_token(token);
//! let client = CatalogClient::new(config)?;
//!
//! let mut request = ListEntitiesRequest {
//!     filters: vec!["kind=Component".to_string()],
//!     ..Default::default()
//! };
//! loop {
//!     let page = client.list_entities(&request).await?;
//!     for entity in &page.entities {
//!         let spec: ComponentSpec = entity.spec()?;
//!     }
//!     match page.next_page_token {
//!         Some(token) => request = request.next_page(token),
//!         None => break,
//!     }
//! }
//! ```

mod annotations;
mod client;
mod config;
mod entity;
mod entity_ref;
mod error;
mod query;
mod spec;
mod transport;

pub use annotations::*;
pub use client::{CatalogClient, EntityCatalog};
pub use config::{CatalogClientConfig, ENV_PREFIX};
pub use entity::{
    DEFAULT_NAMESPACE,
    Entity,
    EntityKind,
    EntityLink,
    EntityMetadata,
    EntityRelation,
    UnknownKindError,
};
pub use entity_ref::{EntityRef, EntityRefError};
pub use error::{CatalogClientError, DecodeError, StatusError};
pub use query::{
    BatchGetEntitiesByRefsRequest,
    BatchGetEntitiesByRefsResponse,
    GetEntityByNameRequest,
    InvalidOrderField,
    ListEntitiesRequest,
    ListEntitiesResponse,
    OrderField,
    PageInfo,
    QueryEntitiesRequest,
    QueryEntitiesResponse,
    SortOrder,
};
pub use spec::{
    ApiSpec,
    ComponentSpec,
    DomainSpec,
    GroupSpec,
    KindSpec,
    LocationPresence,
    LocationSpec,
    Profile,
    ResourceSpec,
    Spec,
    SystemSpec,
    TemplateSpec,
    UserSpec,
};
pub use transport::CATALOG_API_PATH;
