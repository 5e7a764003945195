//! The HTTP routes, served on a local port over in-memory services.

use std::sync::Arc;

use async_trait::async_trait;
use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{Value, json};
use testresult::TestResult;
use trapi_grammar::service::{EntitySearch, StaticNormalizer, StaticSearch, StaticTaxonomy};
use trapi_grammar::vocabulary::GrammarTables;
use trapi_grammar::{GrammarConfig, GrammarError, ServiceKind, Services, Translator};
use trapi_grammar_service::server::Server;

/// An entity search whose upstream is down.
struct UnavailableSearch;

#[async_trait]
impl EntitySearch for UnavailableSearch {
    async fn search(&self, _text: &str, _limit: usize) -> Result<Vec<String>, GrammarError> {
        Err(GrammarError::external(
            ServiceKind::Search,
            "unexpected status 503 Service Unavailable",
        ))
    }
}

async fn server_with(search: Arc<dyn EntitySearch>) -> TestResult<Server> {
    let services = Services {
        taxonomy: Arc::new(StaticTaxonomy::bundled()?),
        search,
        normalizer: Arc::new(StaticNormalizer::new().with("HP:0005978", "type 2 diabetes mellitus")),
    };
    let translator =
        Translator::new(&GrammarConfig::default(), services, GrammarTables::bundled()?).await?;
    let server = Server::start("127.0.0.1:0", Arc::new(translator)).await?;
    assert_eq!(server.endpoint, format!("http://{}", server.local_addr()));
    Ok(server)
}

async fn server() -> TestResult<Server> {
    server_with(Arc::new(
        StaticSearch::new().with("type 2 diabetes", ["HP:0005978"]),
    ))
    .await
}

fn drug_treats_diabetes() -> Value {
    json!({
        "nodes": {
            "drug": { "category": "biolink:Drug" },
            "type 2 diabetes": { "id": "HP:0005978" }
        },
        "edges": {
            "treats": {
                "subject": "drug",
                "predicate": "biolink:treats",
                "object": "type 2 diabetes"
            }
        }
    })
}

#[tokio::test(flavor = "multi_thread")]
async fn it_translates_questions_to_graphs() -> TestResult {
    let server = server().await?;
    let response = reqwest::Client::new()
        .post(format!("{}/to_trapi", server.endpoint))
        .json("What drug treats type 2 diabetes?")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.json::<Value>().await?, drug_treats_diabetes());
    server.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn it_translates_graphs_to_questions() -> TestResult {
    let server = server().await?;
    let response = reqwest::Client::new()
        .post(format!("{}/to_english", server.endpoint))
        .json(&drug_treats_diabetes())
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.json::<String>().await?,
        "What drug treats type 2 diabetes mellitus?"
    );
    server.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn it_reports_client_errors_as_bad_requests() -> TestResult {
    let server = server().await?;
    let client = reqwest::Client::new();

    let response = client
        .post(format!("{}/to_trapi", server.endpoint))
        .json("What aaagggh?")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>().await?, json!({ "detail": "Failed to parse" }));

    let response = client
        .post(format!("{}/to_trapi", server.endpoint))
        .json("What drugs treat gout?")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await?,
        json!({ "detail": "Unrecognized thing 'gout'" })
    );

    let mut graph = drug_treats_diabetes();
    graph["nodes"]["extra"] = json!({ "id": "HP:0002099" });
    let response = client
        .post(format!("{}/to_english", server.endpoint))
        .json(&graph)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>().await?,
        json!({ "detail": "invalid query graph: expected 2 nodes, found 3" })
    );

    let mut graph = drug_treats_diabetes();
    graph["edges"]["treats"]["predicate"] = json!("treats");
    let response = client
        .post(format!("{}/to_english", server.endpoint))
        .json(&graph)
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .post(format!("{}/to_english", server.endpoint))
        .body("not json")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    server.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn it_reports_upstream_failures_as_bad_gateway() -> TestResult {
    let server = server_with(Arc::new(UnavailableSearch)).await?;
    let response = reqwest::Client::new()
        .post(format!("{}/to_trapi", server.endpoint))
        .json("What drug treats type 2 diabetes?")
        .send()
        .await?;
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        response.json::<Value>().await?,
        json!({
            "detail": "entity search service error: unexpected status 503 Service Unavailable"
        })
    );
    server.stop().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn it_rejects_unknown_routes_and_methods() -> TestResult {
    let server = server().await?;
    let client = reqwest::Client::new();

    let response = client.get(format!("{}/to_trapi", server.endpoint)).send().await?;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

    let response = client.post(format!("{}/query", server.endpoint)).send().await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    server.stop().await?;
    Ok(())
}
