//! End-to-end operation tests against a mock server.
//!
//! Uses wiremock to intercept HTTP requests and inspect the JSON body that
//! was actually sent, then checks what came back out of the response.

use gqlforge_sdk::operation::{synthesize, OperationKind, OperationSpec};
use gqlforge_sdk::{BoundArgument, Client, ClientError, SchemaTypeGraph, TypedValue};
use serde_json::{json, Value};
use wiremock::matchers::method;
use wiremock::{Mock, MockServer, ResponseTemplate};

const SCHEMA: &str = r#"
    enum VehicleState { AVAILABLE RESERVED }

    type Vehicle {
        id: ID!
        name: String
        state: VehicleState
        images: VehicleImageConnection
    }

    type VehicleImage { url: String vehicle: Vehicle }
    type VehicleImageEdge { node: VehicleImage }
    type VehicleImageConnection { edges: [VehicleImageEdge] }

    type Query {
        vehicle(id: ID, includeRetired: Boolean): Vehicle
        vehicleCount(state: VehicleState): Int!
    }

    type Mutation {
        retireVehicle(id: ID!): Boolean
    }
"#;

async fn setup(body: Value) -> (MockServer, Client) {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;
    let client = Client::new(server.uri(), "test-token").unwrap();
    (server, client)
}

async fn sent_query(server: &MockServer) -> String {
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one request");
    let body: Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["variables"], json!({}));
    body["query"].as_str().unwrap().to_string()
}

fn operation(graph: &SchemaTypeGraph, kind: OperationKind, name: &str) -> OperationSpec {
    graph
        .operations(kind)
        .into_iter()
        .find(|op| op.name == name)
        .unwrap()
}

#[tokio::test]
async fn invoke_sends_bound_arguments_and_cyclic_selection() {
    let (server, client) = setup(json!({
        "data": {"vehicle": {"id": "v1", "name": "Van", "state": "AVAILABLE"}}
    }))
    .await;
    let graph = SchemaTypeGraph::parse(SCHEMA);
    let op = operation(&graph, OperationKind::Query, "vehicle");

    let value = client
        .invoke(&graph, &op, &[BoundArgument::new("id", "v1")])
        .await
        .unwrap();

    assert_eq!(
        sent_query(&server).await,
        r#"query { vehicle ( id:"v1" ) { id name state images { edges { node { url vehicle } } } } }"#
    );
    assert_eq!(value.get("name"), Some(&TypedValue::String("Van".to_string())));
    assert_eq!(
        value.get("state"),
        Some(&TypedValue::Enum("AVAILABLE".to_string()))
    );
}

#[tokio::test]
async fn invoke_omits_unbound_arguments() {
    let (server, client) = setup(json!({"data": {"vehicle": null}})).await;
    let graph = SchemaTypeGraph::parse(SCHEMA);
    let op = operation(&graph, OperationKind::Query, "vehicle");

    let value = client
        .invoke(
            &graph,
            &op,
            &[
                BoundArgument::unbound("id"),
                BoundArgument::new("includeRetired", None::<bool>),
            ],
        )
        .await
        .unwrap();

    assert!(sent_query(&server).await.starts_with("query { vehicle (  ) {"));
    assert!(value.is_null());
}

#[tokio::test]
async fn invoke_leaf_return_type() {
    let (server, client) = setup(json!({"data": {"vehicleCount": 7}})).await;
    let graph = SchemaTypeGraph::parse(SCHEMA);
    let op = operation(&graph, OperationKind::Query, "vehicleCount");

    let value = client
        .invoke(
            &graph,
            &op,
            &[BoundArgument::new(
                "state",
                gqlforge_sdk::ArgValue::Enum("RESERVED".to_string()),
            )],
        )
        .await
        .unwrap();

    assert_eq!(
        sent_query(&server).await,
        "query { vehicleCount ( state:RESERVED ) }"
    );
    assert_eq!(value, TypedValue::Int(7));
}

#[tokio::test]
async fn invoke_mutation_surfaces_graphql_errors() {
    let (server, client) = setup(json!({
        "errors": [{"message": "vehicle is booked"}],
        "data": {"retireVehicle": null}
    }))
    .await;
    let graph = SchemaTypeGraph::parse(SCHEMA);
    let op = operation(&graph, OperationKind::Mutation, "retireVehicle");

    let err = client
        .invoke(&graph, &op, &[BoundArgument::new("id", "v1")])
        .await
        .unwrap_err();

    assert_eq!(
        sent_query(&server).await,
        r#"mutation { retireVehicle ( id:"v1" ) }"#
    );
    let errors = err.graphql_errors().expect("expected GraphQL errors");
    assert_eq!(errors[0].message, "vehicle is booked");
}

#[tokio::test]
async fn invoke_unresolvable_return_type_sends_nothing() {
    let server = MockServer::start().await;
    let client = Client::new(server.uri(), "test-token").unwrap();
    let graph = SchemaTypeGraph::parse("type Query { ghost: Ghost }");
    let op = operation(&graph, OperationKind::Query, "ghost");

    let err = client.invoke(&graph, &op, &[]).await.unwrap_err();

    assert!(matches!(err, ClientError::Resolve(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn execute_deserializes_typed_payload() {
    #[derive(Debug, PartialEq, serde::Deserialize)]
    struct Vehicle {
        id: String,
        name: Option<String>,
    }

    let (server, client) = setup(json!({
        "data": {"vehicle": {"id": "v1", "name": "Van"}}
    }))
    .await;
    let document = synthesize(
        OperationKind::Query,
        "vehicle",
        &[BoundArgument::new("id", "v1")],
        "id name",
    );

    let vehicle: Option<Vehicle> = client.execute(&document, "vehicle").await.unwrap();

    assert_eq!(sent_query(&server).await, document.text);
    assert_eq!(
        vehicle,
        Some(Vehicle {
            id: "v1".to_string(),
            name: Some("Van".to_string()),
        })
    );
}

#[tokio::test]
async fn concurrent_invocations_share_one_client() {
    let (server, client) = setup(json!({"data": {"vehicleCount": 3}})).await;
    let document = synthesize(OperationKind::Query, "vehicleCount", &[], "");

    let other = client.clone();
    let (a, b) = tokio::join!(
        client.execute::<i32>(&document, "vehicleCount"),
        other.execute::<i32>(&document, "vehicleCount")
    );

    assert_eq!(a.unwrap(), Some(3));
    assert_eq!(b.unwrap(), Some(3));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}
