use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use artblocks_subgraph::{
    ContractProjectById, GraphqlOperation, PageConfig, ProjectByIdVars, SubgraphClientBuilder,
    SubgraphError,
};

fn project_json(project_id: u64, name: &str, contract: &str) -> serde_json::Value {
    serde_json::json!({
        "projectId": project_id,
        "name": name,
        "invocations": 10,
        "maxInvocations": 100,
        "curationStatus": "factory",
        "contract": { "id": contract }
    })
}

#[tokio::test]
async fn execute_sends_query_operation_name_and_variables() {
    let server = MockServer::start().await;

    let expected_body = serde_json::json!({
        "query": ContractProjectById::QUERY,
        "operationName": "getContractProject",
        "variables": { "id": "0xabc", "projectId": 7 },
    });

    let response_body = serde_json::json!({
        "data": {
            "contract": {
                "projects": [project_json(7, "Fidenza", "0xabc")]
            }
        }
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .and(body_json(&expected_body))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .mount(&server)
        .await;

    let client = SubgraphClientBuilder::new(server.uri())
        .with_service_name("test")
        .build()
        .expect("client");

    let data = client
        .execute_strict::<ContractProjectById>(ProjectByIdVars {
            id: "0xabc".to_string(),
            project_id: 7,
        })
        .await
        .expect("query should succeed");

    let projects = data.into_projects("0xabc").expect("contract present");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].project_id, 7);
    assert_eq!(projects[0].name, "Fidenza");
    assert_eq!(projects[0].contract.id, "0xabc");
}

#[tokio::test]
async fn execute_returns_envelope_with_graphql_errors() {
    let server = MockServer::start().await;

    let response_body = serde_json::json!({
        "errors": [
            { "message": "boom" }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .mount(&server)
        .await;

    let client = SubgraphClientBuilder::new(server.uri())
        .build()
        .expect("client");

    let response = client
        .execute::<ContractProjectById>(ProjectByIdVars {
            id: "0xabc".to_string(),
            project_id: 7,
        })
        .await
        .expect("transport should succeed");

    assert!(!response.is_ok());
    assert_eq!(response.errors.len(), 1);
    assert_eq!(response.errors[0].message, "boom");
}

#[tokio::test]
async fn execute_strict_rejects_graphql_errors() {
    let server = MockServer::start().await;

    let response_body = serde_json::json!({
        "errors": [
            { "message": "boom" }
        ]
    });

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(response_body))
        .mount(&server)
        .await;

    let client = SubgraphClientBuilder::new(server.uri())
        .build()
        .expect("client");

    let err = client
        .execute_strict::<ContractProjectById>(ProjectByIdVars {
            id: "0xabc".to_string(),
            project_id: 7,
        })
        .await
        .expect_err("should surface GraphQL errors");

    match err {
        SubgraphError::GraphqlErrors { errors } => {
            assert_eq!(errors.len(), 1);
            assert_eq!(errors[0].message, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn execute_strict_rejects_missing_data() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "data": null })))
        .mount(&server)
        .await;

    let client = SubgraphClientBuilder::new(server.uri())
        .build()
        .expect("client");

    let err = client
        .execute_strict::<ContractProjectById>(ProjectByIdVars {
            id: "0xabc".to_string(),
            project_id: 7,
        })
        .await
        .expect_err("missing data should be a protocol error");

    assert!(matches!(err, SubgraphError::Protocol { .. }));
}

#[tokio::test]
async fn http_status_errors_carry_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down for maintenance"))
        .mount(&server)
        .await;

    let client = SubgraphClientBuilder::new(server.uri())
        .build()
        .expect("client");

    let err = client
        .execute_strict::<ContractProjectById>(ProjectByIdVars {
            id: "0xabc".to_string(),
            project_id: 7,
        })
        .await
        .expect_err("should surface HTTP status error");

    match err {
        SubgraphError::HttpStatus { status, body } => {
            assert_eq!(status.as_u16(), 503);
            assert_eq!(body, "down for maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn metrics_count_successes_and_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "contract": { "projects": [] } }
        })))
        .expect(1)
        .up_to_n_times(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [ { "message": "boom" } ]
        })))
        .mount(&server)
        .await;

    let client = SubgraphClientBuilder::new(server.uri())
        .build()
        .expect("client");

    let vars = || ProjectByIdVars {
        id: "0xabc".to_string(),
        project_id: 7,
    };
    client
        .execute::<ContractProjectById>(vars())
        .await
        .expect("first request");
    client
        .execute::<ContractProjectById>(vars())
        .await
        .expect("second request");

    let snapshot = client.metrics();
    assert_eq!(snapshot.requests_total, 2);
    assert_eq!(snapshot.requests_success, 1);
    assert_eq!(snapshot.requests_error, 1);
}

#[tokio::test]
async fn collect_paged_keeps_short_page_items() {
    let pages = vec![vec![1, 2], vec![3]];
    let mut calls = 0_usize;
    let result = artblocks_subgraph::collect_paged(
        PageConfig {
            page_size: 2,
            max_pages: 10,
        },
        |skip| {
            let page = pages[calls].clone();
            calls += 1;
            assert_eq!(skip as usize, pages[..calls - 1].iter().map(Vec::len).sum::<usize>());
            async move { Ok(page) }
        },
    )
    .await;

    assert_eq!(result.expect("pagination should succeed"), vec![1, 2, 3]);
    assert_eq!(calls, 2);
}

#[tokio::test]
async fn count_paged_stops_at_the_page_limit() {
    let result = artblocks_subgraph::count_paged(
        PageConfig {
            page_size: 2,
            max_pages: 2,
        },
        |_skip| async move { Ok(2) },
    )
    .await;

    assert!(matches!(
        result,
        Err(SubgraphError::PageLimitExceeded { pages: 2 })
    ));
}
