//! Catalog client and the operations of the entities API.

use std::borrow::Cow;
use std::fmt::Debug;

use tracing::{debug, instrument};

use crate::config::CatalogClientConfig;
use crate::entity::Entity;
use crate::error::CatalogClientError;
use crate::query::{
    BatchGetEntitiesByRefsRequest,
    BatchGetEntitiesByRefsResponse,
    GetEntityByNameRequest,
    ListEntitiesRequest,
    ListEntitiesResponse,
    QueryEntitiesRequest,
    QueryEntitiesResponse,
    next_page_token,
};
use crate::transport::{Call, Transport};

/// A client for the Backstage software catalog.
///
/// Cheap to clone and safe to share between tasks: it holds only immutable
/// configuration and the HTTP connection pool.
#[derive(Clone)]
pub struct CatalogClient {
    transport: Transport,
    config: CatalogClientConfig,
}

impl Debug for CatalogClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.config.base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client from configuration.
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogClientError> {
        let transport = Transport::new(&config)?;
        Ok(Self { transport, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }
}

// ---------------------------------------------------------------------------
// Catalog trait
// ---------------------------------------------------------------------------

/// The entity operations of the catalog API.
///
/// Every operation is a single request. Paging is left to the caller:
/// list and query return one page plus the means to request the next.
#[allow(async_fn_in_trait)]
pub trait EntityCatalog {
    /// List entities, paged by offset/limit and `Link` header.
    async fn list_entities(
        &self,
        request: &ListEntitiesRequest,
    ) -> Result<ListEntitiesResponse, CatalogClientError>;

    /// Query entities, paged by cursor.
    async fn query_entities(
        &self,
        request: &QueryEntitiesRequest,
    ) -> Result<QueryEntitiesResponse, CatalogClientError>;

    async fn get_entity_by_uid(&self, uid: &str) -> Result<Entity, CatalogClientError>;

    async fn get_entity_by_name(
        &self,
        request: &GetEntityByNameRequest,
    ) -> Result<Entity, CatalogClientError>;

    /// Delete an entity. Succeeds only on `204 No Content`.
    async fn delete_entity_by_uid(&self, uid: &str) -> Result<(), CatalogClientError>;

    /// Get many entities in one request, positionally aligned with
    /// `request.entity_refs`.
    async fn batch_get_entities_by_refs(
        &self,
        request: &BatchGetEntitiesByRefsRequest,
    ) -> Result<BatchGetEntitiesByRefsResponse, CatalogClientError>;
}

/// Escape `value` as a single path segment.
fn path_segment<'a>(
    parameter: &'static str,
    value: &'a str,
) -> Result<Cow<'a, str>, CatalogClientError> {
    if matches!(value, "" | "." | "..") {
        return Err(CatalogClientError::InvalidPathParameter {
            parameter,
            value: value.to_string(),
        });
    }
    Ok(url_escape::encode_component(value))
}

fn by_uid_path(uid: &str) -> Result<String, CatalogClientError> {
    Ok(format!("/entities/by-uid/{}", path_segment("uid", uid)?))
}

fn by_name_path(request: &GetEntityByNameRequest) -> Result<String, CatalogClientError> {
    Ok(format!(
        "/entities/by-name/{}/{}/{}",
        path_segment("kind", &request.kind)?,
        path_segment("namespace", &request.namespace)?,
        path_segment("name", &request.name)?,
    ))
}

// ---------------------------------------------------------------------------
// EntityCatalog implementation for CatalogClient
// ---------------------------------------------------------------------------

impl EntityCatalog for CatalogClient {
    #[instrument(skip_all)]
    async fn list_entities(
        &self,
        request: &ListEntitiesRequest,
    ) -> Result<ListEntitiesResponse, CatalogClientError> {
        let call = Call::get("/entities".to_string(), request.query_pairs());
        let response = self
            .transport
            .execute(call, |response| {
                let next_page_token = next_page_token(&response.headers, &response.url)?;
                let entities: Vec<Entity> = serde_json::from_slice(&response.body)?;
                Ok(ListEntitiesResponse {
                    entities,
                    next_page_token,
                })
            })
            .await?;

        debug!(
            n_entities = response.entities.len(),
            has_next_page = response.next_page_token.is_some(),
            "listed entities"
        );
        Ok(response)
    }

    #[instrument(skip_all)]
    async fn query_entities(
        &self,
        request: &QueryEntitiesRequest,
    ) -> Result<QueryEntitiesResponse, CatalogClientError> {
        let call = Call::get("/entities/by-query".to_string(), request.query_pairs());
        let response: QueryEntitiesResponse = self
            .transport
            .execute(call, |response| Ok(serde_json::from_slice(&response.body)?))
            .await?;

        debug!(
            n_entities = response.entities.len(),
            total_items = response.total_items,
            "queried entities"
        );
        Ok(response)
    }

    #[instrument(skip(self))]
    async fn get_entity_by_uid(&self, uid: &str) -> Result<Entity, CatalogClientError> {
        self.transport
            .execute(Call::get(by_uid_path(uid)?, Vec::new()), |response| {
                Entity::from_slice(&response.body)
            })
            .await
    }

    #[instrument(skip_all, fields(kind = %request.kind, namespace = %request.namespace, name = %request.name))]
    async fn get_entity_by_name(
        &self,
        request: &GetEntityByNameRequest,
    ) -> Result<Entity, CatalogClientError> {
        self.transport
            .execute(Call::get(by_name_path(request)?, Vec::new()), |response| {
                Entity::from_slice(&response.body)
            })
            .await
    }

    #[instrument(skip(self))]
    async fn delete_entity_by_uid(&self, uid: &str) -> Result<(), CatalogClientError> {
        self.transport
            .execute(Call::delete(by_uid_path(uid)?), |_| Ok(()))
            .await?;

        debug!("deleted entity");
        Ok(())
    }

    #[instrument(skip_all, fields(n_refs = request.entity_refs.len()))]
    async fn batch_get_entities_by_refs(
        &self,
        request: &BatchGetEntitiesByRefsRequest,
    ) -> Result<BatchGetEntitiesByRefsResponse, CatalogClientError> {
        let call = Call::post("/entities/by-refs".to_string(), request);
        let response: BatchGetEntitiesByRefsResponse = self
            .transport
            .execute(call, |response| Ok(serde_json::from_slice(&response.body)?))
            .await?;

        if response.entities.len() != request.entity_refs.len() {
            debug!(
                n_refs = request.entity_refs.len(),
                n_items = response.entities.len(),
                "batch response is not aligned with requested refs"
            );
        }
        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use std::num::NonZeroU64;
    use std::time::Duration;

    use http::StatusCode;
    use httpmock::Method::{DELETE, GET, POST};
    use httpmock::MockServer;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;
    use crate::entity::EntityKind;
    use crate::entity_ref::EntityRef;
    use crate::error::DecodeError;
    use crate::query::OrderField;

    const SYSTEM_1: &str =
        r#"{"apiVersion":"backstage.io/v1alpha1","kind":"System","metadata":{"name":"system1"}}"#;
    const SYSTEM_2: &str =
        r#"{"apiVersion":"backstage.io/v1alpha1","kind":"System","metadata":{"name":"system2"}}"#;

    fn client_config(url: &str) -> CatalogClientConfig {
        CatalogClientConfig::new(url)
    }

    fn client(server: &MockServer) -> CatalogClient {
        CatalogClient::new(client_config(&server.base_url())).unwrap()
    }

    fn names(entities: &[Entity]) -> Vec<&str> {
        entities
            .iter()
            .map(|entity| entity.metadata().name.as_str())
            .collect()
    }

    #[test]
    fn client_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone + 'static>() {}
        assert_send_sync::<CatalogClient>();
    }

    #[test]
    fn debug_hides_token() {
        let client = CatalogClient::new(
            client_config("https://backstage.example.com").with_token("s3cr3t"),
        )
        .unwrap();
        assert!(!format!("{client:?}").contains("s3cr3t"));
    }

    #[tokio::test]
    async fn bearer_token_set_on_all_requests() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("authorization", "Bearer s3cr3t");
            then.status(200).body("[]");
        });

        let client =
            CatalogClient::new(client_config(&server.base_url()).with_token("s3cr3t")).unwrap();
        client
            .list_entities(&ListEntitiesRequest::default())
            .await
            .unwrap();
        client
            .query_entities(&QueryEntitiesRequest::default())
            .await
            .unwrap_err();
        mock.assert_hits(2);
    }

    #[tokio::test]
    async fn no_authorization_without_token() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header_exists("authorization");
            then.status(500);
        });
        let fallback = server.mock(|_, then| {
            then.status(200).body("[]");
        });

        client(&server)
            .list_entities(&ListEntitiesRequest::default())
            .await
            .unwrap();
        mock.assert_hits(0);
        fallback.assert();
    }

    #[tokio::test]
    async fn extra_headers_and_user_agent_set() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.header("x-team", "platform")
                .header("user-agent", "catalog-tests");
            then.status(200).body("[]");
        });

        let mut config = client_config(&server.base_url());
        config
            .extra_headers
            .insert("x-team".to_string(), "platform".to_string());
        config.user_agent = Some("catalog-tests".to_string());

        let client = CatalogClient::new(config).unwrap();
        client
            .list_entities(&ListEntitiesRequest::default())
            .await
            .unwrap();
        mock.assert();
    }

    #[tokio::test]
    async fn list_entities() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/catalog/entities")
                .query_param("filter", "kind=Component")
                .query_param("fields", "baz")
                .query_param("offset", "10")
                .query_param("limit", "100")
                .query_param("after", "bar");
            then.status(200)
                .header("link", r#"<https://example.com?after=foo>; rel="next""#)
                .body(format!("[{SYSTEM_1},{SYSTEM_2}]"));
        });

        let response = client(&server)
            .list_entities(&ListEntitiesRequest {
                filters: vec!["kind=Component".to_string()],
                fields: vec!["baz".to_string()],
                offset: NonZeroU64::new(10),
                limit: NonZeroU64::new(100),
                after: Some("bar".to_string()),
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.entities, vec![
            Entity::from_json(SYSTEM_1).unwrap(),
            Entity::from_json(SYSTEM_2).unwrap(),
        ]);
        assert_eq!(response.entities[0].raw(), SYSTEM_1);
        assert_eq!(response.entities[1].kind(), Some(EntityKind::System));
        assert_eq!(response.next_page_token.as_deref(), Some("foo"));
    }

    #[tokio::test]
    async fn list_entities_error_status() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities");
            then.status(500).body("oops");
        });

        let error = client(&server)
            .list_entities(&ListEntitiesRequest::default())
            .await
            .unwrap_err();
        mock.assert();
        assert_eq!(error.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            error.to_string(),
            "GET /entities: 500 Internal Server Error"
        );
    }

    /// Bodies trimmed to the selected fields still decode.
    #[tokio::test]
    async fn list_entities_with_field_selection() {
        let server = MockServer::start_async().await;
        let body = r#"[{"metadata":{"name":"a"}},{"metadata":{"name":"b"}}]"#;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/catalog/entities")
                .query_param("fields", "metadata.name");
            then.status(200).body(body);
        });

        let response = client(&server)
            .list_entities(&ListEntitiesRequest {
                fields: vec!["metadata.name".to_string()],
                ..Default::default()
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(names(&response.entities), ["a", "b"]);
        assert_eq!(response.entities[0].raw(), r#"{"metadata":{"name":"a"}}"#);
        assert_eq!(response.entities[0].kind(), None);
    }

    /// An entity of a kind outside the known set doesn't spoil the page.
    #[tokio::test]
    async fn list_entities_with_unknown_kind() {
        let server = MockServer::start_async().await;
        let workflow = r#"{"apiVersion":"example.com/v1","kind":"Workflow","metadata":{"name":"nightly"}}"#;
        server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities");
            then.status(200).body(format!("[{SYSTEM_1},{workflow}]"));
        });

        let response = client(&server)
            .list_entities(&ListEntitiesRequest::default())
            .await
            .unwrap();

        assert_eq!(names(&response.entities), ["system1", "nightly"]);
        assert_eq!(response.entities[0].kind(), Some(EntityKind::System));
        assert_eq!(response.entities[1].kind_name(), Some("Workflow"));
        assert_eq!(response.entities[1].raw(), workflow);
    }

    /// Following the next page token stops once no `rel="next"` link is sent.
    #[tokio::test]
    async fn list_entities_follows_link_until_exhausted() {
        let server = MockServer::start_async().await;
        // Registered first, so it takes precedence over the unfiltered mock.
        let second_page = server.mock(|when, then| {
            when.method(GET)
                .path("/api/catalog/entities")
                .query_param("after", "foo");
            then.status(200).body(format!("[{SYSTEM_2}]"));
        });
        let first_page = server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities");
            then.status(200)
                .header("link", r#"<https://x?after=foo>; rel="next""#)
                .body(format!("[{SYSTEM_1}]"));
        });

        let client = client(&server);
        let pages = fetch_all_pages(&client, ListEntitiesRequest::default())
            .await
            .unwrap();

        first_page.assert_hits(1);
        second_page.assert_hits(1);
        assert_eq!(pages.len(), 2);
        assert_eq!(names(&pages[0]), ["system1"]);
        assert_eq!(names(&pages[1]), ["system2"]);
    }

    /// Caller side paging loop.
    async fn fetch_all_pages(
        catalog: &impl EntityCatalog,
        mut request: ListEntitiesRequest,
    ) -> Result<Vec<Vec<Entity>>, CatalogClientError> {
        let mut pages = Vec::new();
        loop {
            let response = catalog.list_entities(&request).await?;
            pages.push(response.entities);
            match response.next_page_token {
                Some(token) => request = request.next_page(token),
                None => break,
            }
        }
        Ok(pages)
    }

    #[tokio::test]
    async fn query_entities() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/catalog/entities/by-query")
                .query_param("filter", "kind=Component")
                .query_param("orderField", "metadata.name,asc")
                .query_param("limit", "100")
                .query_param("fields", "metadata.name,spec.type");
            then.status(200).body(format!(
                r#"{{
                    "items": [{SERVICE_A},{SERVICE_B}],
                    "totalItems": 2,
                    "pageInfo": {{"nextCursor": "nextCursor123", "prevCursor": "prevCursor456"}}
                }}"#
            ));
        });

        const SERVICE_A: &str = r#"{"metadata":{"name":"service-a"},"spec":{"type":"service"}}"#;
        const SERVICE_B: &str = r#"{"metadata":{"name":"service-b"},"spec":{"type":"website"}}"#;

        let response = client(&server)
            .query_entities(&QueryEntitiesRequest {
                filters: vec!["kind=Component".to_string()],
                fields: vec!["metadata.name".to_string(), "spec.type".to_string()],
                limit: NonZeroU64::new(100),
                order_field: Some(OrderField::asc("metadata.name")),
                cursor: None,
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(names(&response.entities), ["service-a", "service-b"]);
        assert_eq!(response.entities[0].raw(), SERVICE_A);
        assert_eq!(response.entities[1].kind(), None);
        assert_eq!(response.total_items, Some(2));
        assert_eq!(response.next_cursor(), Some("nextCursor123"));
        assert_eq!(response.prev_cursor(), Some("prevCursor456"));
    }

    #[tokio::test]
    async fn query_entities_multiple_filters_and_cursor() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/catalog/entities/by-query")
                .query_param("filter", "kind=Component")
                .query_param("filter", "spec.type=service")
                .query_param("cursor", "abc")
                .query_param("limit", "5");
            then.status(200)
                .body(format!(r#"{{"items": [{SYSTEM_1}], "pageInfo": {{"nextCursor": "next"}}}}"#));
        });

        let request = QueryEntitiesRequest {
            filters: vec!["kind=Component".to_string(), "spec.type=service".to_string()],
            limit: NonZeroU64::new(5),
            ..Default::default()
        }
        .with_cursor("abc");
        let response = client(&server).query_entities(&request).await.unwrap();

        mock.assert();
        assert_eq!(response.entities.len(), 1);
        assert_eq!(response.next_cursor(), Some("next"));
        assert_eq!(response.prev_cursor(), None);
    }

    #[tokio::test]
    async fn query_entities_without_page_info() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities/by-query");
            then.status(200)
                .body(format!(r#"{{"items": [{SYSTEM_1}], "totalItems": 1}}"#));
        });

        let response = client(&server)
            .query_entities(&QueryEntitiesRequest::default())
            .await
            .unwrap();
        assert_eq!(response.entities.len(), 1);
        assert_eq!(response.page_info, None);
    }

    #[tokio::test]
    async fn query_entities_invalid_json() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities/by-query");
            then.status(200).body("invalid json");
        });

        let error = client(&server)
            .query_entities(&QueryEntitiesRequest::default())
            .await
            .unwrap_err();
        assert!(
            matches!(error, CatalogClientError::Decode {
                source: DecodeError::Json(_),
                ..
            }),
            "expected decode error, found: {error:?}"
        );
    }

    #[test]
    fn path_parameters_are_escaped() {
        assert_eq!(by_uid_path("a/b c").unwrap(), "/entities/by-uid/a%2Fb%20c");
        assert_eq!(
            by_name_path(&GetEntityByNameRequest {
                kind: "Component".to_string(),
                namespace: "team a".to_string(),
                name: "svc/v1.2?x".to_string(),
            })
            .unwrap(),
            "/entities/by-name/Component/team%20a/svc%2Fv1.2%3Fx"
        );
    }

    #[test]
    fn dot_segments_are_rejected() {
        for uid in ["", ".", ".."] {
            assert!(
                matches!(
                    by_uid_path(uid),
                    Err(CatalogClientError::InvalidPathParameter { parameter: "uid", .. })
                ),
                "{uid:?} was accepted"
            );
        }
        assert!(matches!(
            by_name_path(&GetEntityByNameRequest {
                kind: "Component".to_string(),
                namespace: "..".to_string(),
                name: "svc".to_string(),
            }),
            Err(CatalogClientError::InvalidPathParameter {
                parameter: "namespace",
                ..
            })
        ));
    }

    #[tokio::test]
    async fn delete_dot_segment_sends_no_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|_, then| {
            then.status(204);
        });

        let error = client(&server)
            .delete_entity_by_uid("..")
            .await
            .unwrap_err();
        assert!(
            matches!(error, CatalogClientError::InvalidPathParameter { .. }),
            "expected invalid path parameter, found: {error:?}"
        );
        mock.assert_hits(0);
    }

    #[tokio::test]
    async fn get_entity_by_uid() {
        let server = MockServer::start_async().await;
        let document = r#"{"apiVersion":"backstage.io/v1alpha1","kind":"Component","metadata":{"name":"petstore","uid":"1234"},"x-extra":{"kept":true}}"#;
        let mock = server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities/by-uid/1234");
            then.status(200).body(document);
        });

        let entity = client(&server).get_entity_by_uid("1234").await.unwrap();
        mock.assert();
        assert_eq!(entity.raw(), document);
        assert_eq!(entity.metadata().uid.as_deref(), Some("1234"));
    }

    #[tokio::test]
    async fn get_entity_by_uid_not_found() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities/by-uid/missing");
            then.status(404)
                .json_body(json!({"error": {"name": "NotFoundError"}}));
        });

        let error = client(&server)
            .get_entity_by_uid("missing")
            .await
            .unwrap_err();
        let status = error.status_error().expect("status error");
        assert_eq!(status.code, StatusCode::NOT_FOUND);
        assert_eq!(status.status, "404 Not Found");
    }

    #[tokio::test]
    async fn get_entity_by_name() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/api/catalog/entities/by-name/System/default/system1");
            then.status(200).body(SYSTEM_1);
        });

        let request = GetEntityByNameRequest::from(EntityRef::new(EntityKind::System, "system1"));
        let entity = client(&server).get_entity_by_name(&request).await.unwrap();
        mock.assert();
        assert_eq!(entity.raw(), SYSTEM_1);
    }

    #[tokio::test]
    async fn delete_entity_by_uid() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/catalog/entities/by-uid/1234");
            then.status(204);
        });

        client(&server).delete_entity_by_uid("1234").await.unwrap();
        mock.assert();
    }

    /// `200 OK` is not success for a delete.
    #[tokio::test]
    async fn delete_entity_by_uid_requires_no_content() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(DELETE).path("/api/catalog/entities/by-uid/1234");
            then.status(200);
        });

        let error = client(&server)
            .delete_entity_by_uid("1234")
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), Some(StatusCode::OK));
    }

    #[tokio::test]
    async fn batch_get_entities_by_refs() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/catalog/entities/by-refs")
                .header("content-type", "application/json")
                .body(r#"{"entityRefs":["system:default/system1","system:default/gone","system:default/system2"],"fields":["metadata"]}"#);
            then.status(200)
                .body(format!(r#"{{"items":[{SYSTEM_1},null,{SYSTEM_2}]}}"#));
        });

        let response = client(&server)
            .batch_get_entities_by_refs(&BatchGetEntitiesByRefsRequest {
                entity_refs: vec![
                    "system:default/system1".to_string(),
                    "system:default/gone".to_string(),
                    "system:default/system2".to_string(),
                ],
                fields: vec!["metadata".to_string()],
            })
            .await
            .unwrap();

        mock.assert();
        assert_eq!(response.entities.len(), 3);
        assert_eq!(response.entities[0].as_ref().map(Entity::raw), Some(SYSTEM_1));
        assert_eq!(response.entities[1], None);
        assert_eq!(response.entities[2].as_ref().map(Entity::raw), Some(SYSTEM_2));
    }

    #[tokio::test]
    async fn batch_get_entities_by_refs_error_status() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/catalog/entities/by-refs");
            then.status(500);
        });

        let error = client(&server)
            .batch_get_entities_by_refs(&BatchGetEntitiesByRefsRequest {
                entity_refs: vec!["foo".to_string()],
                fields: vec![],
            })
            .await
            .unwrap_err();
        assert_eq!(error.status_code(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn connection_failure_is_transport_error() {
        let error = CatalogClient::new(client_config("http://127.0.0.1:1"))
            .unwrap()
            .get_entity_by_uid("1234")
            .await
            .unwrap_err();
        assert!(
            matches!(error, CatalogClientError::Transport { .. }),
            "expected transport error, found: {error:?}"
        );
        assert_eq!(error.status_code(), None);
    }

    #[tokio::test]
    async fn caller_deadline_aborts_request() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/catalog/entities/by-uid/slow");
            then.status(200)
                .body(SYSTEM_1)
                .delay(Duration::from_secs(5));
        });

        let client = client(&server);
        let result = tokio::time::timeout(
            Duration::from_millis(100),
            client.get_entity_by_uid("slow"),
        )
        .await;
        assert!(result.is_err(), "expected deadline to elapse");
    }
}
