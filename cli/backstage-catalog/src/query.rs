//! Request and response shapes of the two listing endpoints and their
//! pagination protocols.
//!
//! - `GET /entities` pages by offset/limit, the next page is announced in a
//!   `Link: <url>; rel="next"` response header whose `after` parameter is
//!   sent back on the following request.
//! - `GET /entities/by-query` pages by cursor, announced in the `pageInfo`
//!   object of the response body.
//!
//! The two are kept apart on purpose, a request never mixes them.

use std::fmt::{self, Display};
use std::num::NonZeroU64;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use reqwest::header::{HeaderMap, LINK};
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use thiserror::Error;
use url::Url;

use crate::entity::Entity;
use crate::entity_ref::EntityRef;
use crate::error::DecodeError;

/// Query parameters in the order they are sent.
pub(crate) type QueryPairs = Vec<(&'static str, String)>;

static NEXT_LINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<([^>]*)>\s*;\s*rel="next""#).expect("next link pattern is valid")
});

/// Request of [crate::EntityCatalog::list_entities].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListEntitiesRequest {
    /// Filter expressions such as `kind=Component`, each sent as its own
    /// `filter` parameter.
    pub filters: Vec<String>,
    /// Select only parts of each entity, e.g. `metadata.name`.
    pub fields: Vec<String>,
    pub offset: Option<NonZeroU64>,
    pub limit: Option<NonZeroU64>,
    /// Token of the page to continue after, see
    /// [ListEntitiesResponse::next_page_token].
    pub after: Option<String>,
}

impl ListEntitiesRequest {
    pub(crate) fn query_pairs(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        if let Some(offset) = self.offset {
            query.push(("offset", offset.to_string()));
        }
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        push_filters_and_fields(&mut query, &self.filters, &self.fields);
        if let Some(after) = non_empty(&self.after) {
            query.push(("after", after.to_string()));
        }
        query
    }

    /// The request for the page after `next_page_token`.
    pub fn next_page(&self, next_page_token: impl Into<String>) -> Self {
        Self {
            after: Some(next_page_token.into()),
            ..self.clone()
        }
    }
}

/// A page of [crate::EntityCatalog::list_entities].
#[derive(Debug, Clone, PartialEq)]
pub struct ListEntitiesResponse {
    pub entities: Vec<Entity>,
    /// `None` on the last page.
    pub next_page_token: Option<String>,
}

/// Extract the next page token from the first `Link` header with
/// `rel="next"`.
///
/// The link target may be relative, it is resolved against `base`.
/// Links without an `after` parameter, or with an empty one, end paging.
pub(crate) fn next_page_token(headers: &HeaderMap, base: &Url) -> Result<Option<String>, DecodeError> {
    let Some(link) = headers
        .get_all(LINK)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|value| NEXT_LINK.captures(value))
        .and_then(|captures| captures.get(1))
    else {
        return Ok(None);
    };

    let link = link.as_str();
    let url = base.join(link).map_err(|source| DecodeError::LinkUrl {
        url: link.to_string(),
        source,
    })?;

    let token = url
        .query_pairs()
        .find(|(key, _)| key == "after")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty());
    Ok(token)
}

/// Sort direction of an [OrderField].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Sort specification sent as `orderField=<field>,<asc|desc>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderField {
    pub field: String,
    pub order: SortOrder,
}

impl OrderField {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            order: SortOrder::Desc,
        }
    }
}

impl Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let order = match self.order {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        };
        write!(f, "{},{order}", self.field)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid order field '{0}', expected '<field>,<asc|desc>'")]
pub struct InvalidOrderField(String);

impl FromStr for OrderField {
    type Err = InvalidOrderField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (field, order) = s
            .rsplit_once(',')
            .filter(|(field, _)| !field.is_empty())
            .ok_or_else(|| InvalidOrderField(s.to_string()))?;
        let order = match order {
            "asc" => SortOrder::Asc,
            "desc" => SortOrder::Desc,
            _ => return Err(InvalidOrderField(s.to_string())),
        };
        Ok(Self {
            field: field.to_string(),
            order,
        })
    }
}

/// Request of [crate::EntityCatalog::query_entities].
///
/// When a `cursor` is set the server ignores the other positioning
/// parameters, but all set parameters are still sent as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryEntitiesRequest {
    pub filters: Vec<String>,
    pub fields: Vec<String>,
    /// Server default is 20.
    pub limit: Option<NonZeroU64>,
    pub order_field: Option<OrderField>,
    /// A cursor from [PageInfo] of a previous response.
    pub cursor: Option<String>,
}

impl QueryEntitiesRequest {
    pub(crate) fn query_pairs(&self) -> QueryPairs {
        let mut query = QueryPairs::new();
        if let Some(limit) = self.limit {
            query.push(("limit", limit.to_string()));
        }
        push_filters_and_fields(&mut query, &self.filters, &self.fields);
        if let Some(order_field) = &self.order_field {
            query.push(("orderField", order_field.to_string()));
        }
        if let Some(cursor) = non_empty(&self.cursor) {
            query.push(("cursor", cursor.to_string()));
        }
        query
    }

    /// A request that continues at `cursor`.
    pub fn with_cursor(&self, cursor: impl Into<String>) -> Self {
        Self {
            cursor: Some(cursor.into()),
            ..self.clone()
        }
    }
}

/// Cursors around a page of [crate::EntityCatalog::query_entities].
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
}

/// A page of [crate::EntityCatalog::query_entities].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryEntitiesResponse {
    #[serde(rename = "items")]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub total_items: Option<u64>,
    /// `None` when the server reports no further pages.
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

impl QueryEntitiesResponse {
    pub fn next_cursor(&self) -> Option<&str> {
        self.page_info.as_ref()?.next_cursor.as_deref()
    }

    pub fn prev_cursor(&self) -> Option<&str> {
        self.page_info.as_ref()?.prev_cursor.as_deref()
    }
}

/// Request of [crate::EntityCatalog::batch_get_entities_by_refs].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchGetEntitiesByRefsRequest {
    /// References in `kind:namespace/name` form.
    pub entity_refs: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
}

/// Response of [crate::EntityCatalog::batch_get_entities_by_refs].
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BatchGetEntitiesByRefsResponse {
    /// Aligned with the requested refs, `None` where a ref did not resolve.
    #[serde(rename = "items")]
    pub entities: Vec<Option<Entity>>,
}

/// Request of [crate::EntityCatalog::get_entity_by_name].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GetEntityByNameRequest {
    pub kind: String,
    pub namespace: String,
    pub name: String,
}

impl From<EntityRef> for GetEntityByNameRequest {
    fn from(entity_ref: EntityRef) -> Self {
        Self {
            kind: entity_ref.kind.to_string(),
            namespace: entity_ref.namespace,
            name: entity_ref.name,
        }
    }
}

fn push_filters_and_fields(query: &mut QueryPairs, filters: &[String], fields: &[String]) {
    for filter in filters {
        query.push(("filter", filter.clone()));
    }
    if !fields.is_empty() {
        query.push(("fields", fields.join(",")));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.is_empty())
}
