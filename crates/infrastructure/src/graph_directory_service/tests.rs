use std::sync::Arc;

use reqwest::StatusCode;
use scopefinder_application::{DirectoryClientFactory, DirectoryService};
use scopefinder_core::AppError;
use scopefinder_domain::{AccessPackage, AccessPackageSummary, GroupRef, SearchCriterion, SearchType};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::wire::{GraphAccessPackage, GraphAccessPackageSummary, GraphGroup, GraphPage};
use super::{
    GraphDirectoryClientFactory, describe_graph_error, describe_graph_failure,
    normalize_base_url, odata_string_literal,
};
use crate::StaticTokenProvider;

const GRAPH_TOKEN: &str = "graph-test-token";
const CATALOG_PATH: &str = "/v1.0/identityGovernance/entitlementManagement/accessPackages";

const ACCESS_PACKAGE_FIXTURE: &str = r#"{
    "@odata.context": "https://graph.microsoft.com/v1.0/$metadata#identityGovernance/entitlementManagement/accessPackages(resourceRoleScopes(role(),scope()))/$entity",
    "id": "2b3c1f6e-8a1d-4e4f-9c55-1c0f0b6d7a11",
    "displayName": "Sales Onboarding",
    "description": "Everything a new seller needs",
    "isHidden": false,
    "resourceRoleScopes": [
        {
            "id": "rrs-1",
            "role": {
                "id": "role-1",
                "displayName": "Member",
                "originId": "Member_g1",
                "originSystem": "AadGroup"
            },
            "scope": {
                "id": "scope-1",
                "displayName": "Sales Group",
                "originId": "g1",
                "originSystem": "AadGroup",
                "isRootScope": true
            }
        },
        {
            "id": "rrs-2",
            "role": null,
            "scope": {
                "id": "scope-2",
                "originId": "https://contoso.sharepoint.com/sites/sales",
                "originSystem": "SharePointOnline"
            }
        }
    ]
}"#;

fn decode_package(json: &str) -> AccessPackage {
    match serde_json::from_str::<GraphAccessPackage>(json) {
        Ok(package) => package.into(),
        Err(error) => panic!("fixture should decode: {error}"),
    }
}

#[test]
fn expanded_access_package_decodes_into_domain() {
    let package = decode_package(ACCESS_PACKAGE_FIXTURE);

    assert_eq!(package.id(), "2b3c1f6e-8a1d-4e4f-9c55-1c0f0b6d7a11");
    assert_eq!(package.display_name(), "Sales Onboarding");
    assert_eq!(package.resource_role_scopes().len(), 2);

    let second = &package.resource_role_scopes()[1];
    assert_eq!(second.role_name(), None);
    assert_eq!(
        second.scope().and_then(|scope| scope.display_name()),
        None
    );
}

#[test]
fn decoded_package_feeds_matching_with_placeholders() {
    let package = decode_package(ACCESS_PACKAGE_FIXTURE);
    let criterion = match SearchCriterion::new(
        SearchType::SharePoint,
        "https://contoso.sharepoint.com/sites/sales",
    ) {
        Ok(criterion) => criterion,
        Err(error) => panic!("criterion should be valid: {error}"),
    };

    let records = criterion.match_access_package(&package);

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].resource_name, "N/A");
    assert_eq!(records[0].role_name, "N/A");
    assert_eq!(records[0].resource_type, "SharePointOnline");
}

#[test]
fn package_without_resource_role_scopes_decodes_empty() {
    let package = decode_package(r#"{"id": "ap-b", "displayName": "Empty", "resourceRoleScopes": null}"#);
    assert!(package.resource_role_scopes().is_empty());

    let package = decode_package(r#"{"id": "ap-c", "displayName": "Bare"}"#);
    assert!(package.resource_role_scopes().is_empty());
}

#[test]
fn scope_without_origin_id_is_dropped() {
    let package = decode_package(
        r#"{"id": "ap-d", "displayName": "Odd", "resourceRoleScopes": [
            {"role": {"displayName": "Member"}, "scope": {"originSystem": "AadGroup"}}
        ]}"#,
    );

    assert_eq!(package.resource_role_scopes().len(), 1);
    assert!(package.resource_role_scopes()[0].scope().is_none());
}

#[test]
fn catalog_page_reads_next_link() {
    let page: GraphPage<GraphAccessPackageSummary> = match serde_json::from_str(
        r#"{
            "value": [{"id": "ap-1", "displayName": "One"}, {"id": "ap-2"}],
            "@odata.nextLink": "https://graph.microsoft.com/v1.0/identityGovernance/entitlementManagement/accessPackages?$skiptoken=abc"
        }"#,
    ) {
        Ok(page) => page,
        Err(error) => panic!("page should decode: {error}"),
    };

    assert!(page.next_link.is_some());
    let summaries: Vec<AccessPackageSummary> = page.value.into_iter().map(Into::into).collect();
    assert_eq!(summaries[1].id, "ap-2");
    assert_eq!(summaries[1].display_name, "");
}

#[test]
fn last_page_has_no_next_link() {
    let page: GraphPage<GraphGroup> =
        match serde_json::from_str(r#"{"value": [{"id": "g1", "displayName": "Team Alpha"}]}"#) {
            Ok(page) => page,
            Err(error) => panic!("page should decode: {error}"),
        };

    assert!(page.next_link.is_none());
    let groups: Vec<GroupRef> = page.value.into_iter().map(Into::into).collect();
    assert_eq!(groups[0].group_id, "g1");
}

#[test]
fn odata_literals_double_single_quotes() {
    assert_eq!(odata_string_literal("O'Brien's Team"), "O''Brien''s Team");
    assert_eq!(odata_string_literal("Team Alpha"), "Team Alpha");
}

#[test]
fn base_url_keeps_version_segment_on_join() {
    let base = match normalize_base_url("https://graph.microsoft.com/v1.0") {
        Ok(base) => base,
        Err(error) => panic!("base url should parse: {error}"),
    };

    let joined = base.join("groups").map(|url| url.to_string());
    assert_eq!(
        joined.ok().as_deref(),
        Some("https://graph.microsoft.com/v1.0/groups")
    );
}

#[test]
fn invalid_base_url_is_rejected() {
    assert!(normalize_base_url("graph.microsoft.com").is_err());
    assert!(normalize_base_url("mailto:admin@contoso.com").is_err());
}

#[test]
fn graph_error_body_is_summarized() {
    let detail = describe_graph_error(
        StatusCode::FORBIDDEN,
        r#"{"error": {"code": "Authorization_RequestDenied", "message": "Insufficient privileges to complete the operation."}}"#,
    );

    assert_eq!(
        detail,
        "403 Forbidden: Insufficient privileges to complete the operation. (Authorization_RequestDenied)"
    );
    assert_eq!(
        describe_graph_error(StatusCode::BAD_GATEWAY, ""),
        "502 Bad Gateway"
    );
}

#[test]
fn unreadable_error_body_keeps_the_read_error() {
    let detail = describe_graph_failure(StatusCode::FORBIDDEN, Err::<String, _>("connection reset"));
    assert_eq!(detail, "403 Forbidden: unreadable error body: connection reset");
}

async fn connect(server: &MockServer) -> Arc<dyn DirectoryService> {
    let token_provider = match StaticTokenProvider::new(GRAPH_TOKEN) {
        Ok(token_provider) => token_provider,
        Err(error) => panic!("static token should be accepted: {error}"),
    };
    let factory = GraphDirectoryClientFactory::new(
        reqwest::Client::new(),
        format!("{}/v1.0", server.uri()).as_str(),
        Arc::new(token_provider),
    );
    let Ok(factory) = factory else {
        panic!("mock server uri should be a valid Graph root");
    };

    match factory.connect().await {
        Ok(directory) => directory,
        Err(error) => panic!("static token connect should succeed: {error}"),
    }
}

fn bearer() -> String {
    format!("Bearer {GRAPH_TOKEN}")
}

async fn raw_queries(server: &MockServer) -> Vec<String> {
    let Some(requests) = server.received_requests().await else {
        panic!("request recording is enabled by default");
    };
    requests
        .iter()
        .map(|request| request.url.query().unwrap_or_default().to_owned())
        .collect()
}

#[tokio::test]
async fn catalog_listing_follows_next_link_with_bearer_token() {
    let server = MockServer::start().await;
    let second_page = format!("{}{CATALOG_PATH}?$skiptoken=page-2", server.uri());

    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("$select", "id,displayName"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "ap-1", "displayName": "One"}],
            "@odata.nextLink": second_page
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("$skiptoken", "page-2"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "ap-2", "displayName": "Two"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = connect(&server).await.list_access_packages().await;

    let Ok(catalog) = catalog else {
        panic!("paged catalog should be listed");
    };
    let ids: Vec<&str> = catalog.iter().map(|summary| summary.id.as_str()).collect();
    assert_eq!(ids, vec!["ap-1", "ap-2"]);
}

#[tokio::test]
async fn repeated_next_link_ends_paging() {
    let server = MockServer::start().await;
    let second_page = format!("{}{CATALOG_PATH}?$skiptoken=page-2", server.uri());

    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("$select", "id,displayName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "ap-1", "displayName": "One"}],
            "@odata.nextLink": second_page.clone()
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(CATALOG_PATH))
        .and(query_param("$skiptoken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "ap-2", "displayName": "Two"}],
            "@odata.nextLink": second_page
        })))
        .expect(1)
        .mount(&server)
        .await;

    let catalog = connect(&server).await.list_access_packages().await;

    assert_eq!(catalog.map(|summaries| summaries.len()).ok(), Some(2));
}

#[tokio::test]
async fn package_detail_request_expands_scopes_and_encodes_id() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(format!("{CATALOG_PATH}/ap%2F1").as_str()))
        .and(query_param("$expand", "resourceRoleScopes($expand=role,scope)"))
        .and(header("authorization", bearer().as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(ACCESS_PACKAGE_FIXTURE, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let package = connect(&server).await.get_access_package("ap/1").await;

    let Ok(package) = package else {
        panic!("package detail should decode");
    };
    assert_eq!(package.display_name(), "Sales Onboarding");
    assert_eq!(package.resource_role_scopes().len(), 2);
    assert_eq!(
        raw_queries(&server).await,
        vec!["%24expand=resourceRoleScopes%28%24expand%3Drole%2Cscope%29".to_owned()]
    );
}

#[tokio::test]
async fn group_filter_escapes_quotes_on_the_wire() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .and(query_param("$filter", "displayName eq 'O''Brien'"))
        .and(query_param("$select", "id,displayName"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "g-ob", "displayName": "O'Brien"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let groups = connect(&server).await.find_groups_by_display_name("O'Brien").await;

    let Ok(groups) = groups else {
        panic!("group lookup should succeed");
    };
    assert_eq!(groups[0].group_id, "g-ob");
    assert!(
        raw_queries(&server).await[0].contains("%24filter=displayName+eq+%27O%27%27Brien%27")
    );
}

#[tokio::test]
async fn service_principal_lookup_uses_prefix_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/servicePrincipals"))
        .and(query_param("$filter", "startswith(displayName,'Contoso')"))
        .and(query_param("$select", "id,displayName,appId"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [
                {"id": "sp-1", "displayName": "Contoso App", "appId": "app-1"},
                {"id": "sp-2", "displayName": "Contoso Portal", "appId": "app-2"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let applications = connect(&server)
        .await
        .find_service_principals_by_prefix("Contoso")
        .await;

    let Ok(applications) = applications else {
        panic!("service principal lookup should succeed");
    };
    let app_ids: Vec<&str> = applications
        .iter()
        .map(|application| application.app_id.as_str())
        .collect();
    assert_eq!(app_ids, vec!["app-1", "app-2"]);
}

#[tokio::test]
async fn graph_error_envelope_becomes_upstream_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1.0/groups"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "error": {
                "code": "Authorization_RequestDenied",
                "message": "Insufficient privileges to complete the operation."
            }
        })))
        .mount(&server)
        .await;

    let groups = connect(&server).await.find_groups_by_display_name("Team Alpha").await;

    let Err(AppError::Upstream { message, details }) = groups else {
        panic!("403 should map to an upstream error");
    };
    assert_eq!(message, "Failed to resolve group");
    assert_eq!(
        details,
        "403 Forbidden: Insufficient privileges to complete the operation. (Authorization_RequestDenied)"
    );
}
