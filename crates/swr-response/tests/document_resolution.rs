//! End-to-end resolution of managed responses from API documents on disk.

use std::path::PathBuf;

use serde_json::{json, Map, Value};
use swr_inject::{Injector, InjectorPattern};
use swr_response::{
    resolve_from_document, resolve_response, ManagedResponse, PathTemplateResolver, ResponseError,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

fn request(url: &str) -> Value {
    json!({"url": url})
}

async fn resolve(url: &str, code: u16, document: &str) -> Result<ManagedResponse, ResponseError> {
    let mut req = request(url);
    resolve_from_document(&mut req, code, fixture(document), &PathTemplateResolver).await
}

#[tokio::test]
async fn test_yaml_single_pet_is_object() {
    let response = resolve("/v1/pets/1234", 200, "petstore.yaml").await.unwrap();
    let pet = response.as_object().expect("object response");
    assert_eq!(
        pet.to_value(),
        json!({"self": "/v1/pets/{petId}", "status": "available", "tags": []})
    );
}

#[tokio::test]
async fn test_yaml_pet_list_is_array() {
    let response = resolve("/v1/pets?limit=10", 200, "petstore.yaml")
        .await
        .unwrap();
    let pets = response.as_array().expect("array response");
    assert!(pets.is_empty());
}

#[tokio::test]
async fn test_yaml_default_code() {
    let mut req = request("/v1/pets/1");
    let response = resolve_from_document(
        &mut req,
        "default",
        fixture("petstore.yaml"),
        &PathTemplateResolver,
    )
    .await
    .unwrap();
    assert!(response.as_object().is_some());
}

#[tokio::test]
async fn test_request_defaults_and_metadata_attached() {
    let mut req = json!({"url": "/v1/pets/7"});
    resolve_from_document(&mut req, 200, fixture("petstore.yaml"), &PathTemplateResolver)
        .await
        .unwrap();
    assert_eq!(req["method"], "GET");
    assert_eq!(req["headers"]["content-type"], "application/json");
    assert_eq!(req["swagger"]["apiPath"], "/pets/{petId}");
    assert_eq!(req["swagger"]["params"]["petId"], "7");
}

#[tokio::test]
async fn test_default_url_has_no_operation() {
    let mut req = json!({});
    let err = resolve_from_document(&mut req, 200, fixture("petstore.yaml"), &PathTemplateResolver)
        .await
        .unwrap_err();
    assert!(matches!(err, ResponseError::Resolve(_)));
    assert_eq!(req["url"], "/");
}

#[tokio::test]
async fn test_missing_code_in_document() {
    let err = resolve("/v1/pets/1", 404, "petstore.yaml").await.unwrap_err();
    assert!(matches!(err, ResponseError::StructuralLookup { ref missing, .. } if missing == "404"));
}

#[tokio::test]
async fn test_openapi3_json_document() {
    let response = resolve("/pets/9", 200, "petstore.json").await.unwrap();
    let mut response = response;
    let pet = response.as_object_mut().unwrap();
    pet.set("name", json!("Rex")).unwrap();
    assert!(pet.set("name", json!("x".repeat(21))).is_err());
    assert_eq!(pet.to_value(), json!({"name": "Rex"}));

    let list = resolve("/pets", 200, "petstore.json").await.unwrap();
    assert!(list.as_array().is_some());
}

#[tokio::test]
async fn test_openapi3_primitive_response_unsupported() {
    let err = resolve("/pets/9", 404, "petstore.json").await.unwrap_err();
    assert!(matches!(err, ResponseError::UnsupportedSchemaType { .. }));
}

#[tokio::test]
async fn test_unsupported_extension_fails_before_io() {
    let mut req = request("/");
    let err = resolve_from_document(&mut req, 200, "/does/not/exist.txt", &PathTemplateResolver)
        .await
        .unwrap_err();
    assert!(matches!(err, ResponseError::UnsupportedDocumentFormat { .. }));
}

#[tokio::test]
async fn test_non_object_request_rejected() {
    let mut req = json!("GET /pets");
    let err = resolve_from_document(&mut req, 200, "/does/not/exist.yaml", &PathTemplateResolver)
        .await
        .unwrap_err();
    assert!(matches!(err, ResponseError::InvalidInput { .. }));
}

#[tokio::test]
async fn test_missing_document() {
    let err = resolve("/", 200, "missing.yml").await.unwrap_err();
    assert!(matches!(err, ResponseError::DocumentLoad { .. }));
}

#[tokio::test]
async fn test_document_in_tempdir() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("API.YML");
    std::fs::write(
        &path,
        "paths:\n  /:\n    get:\n      responses:\n        default:\n          schema:\n            properties:\n              ok: {type: boolean, default: true}\n",
    )
    .unwrap();
    let mut req = json!({});
    let response = resolve_from_document(&mut req, "default", &path, &PathTemplateResolver)
        .await
        .unwrap();
    assert_eq!(response.to_value(), json!({"ok": true}));
}

#[tokio::test]
async fn test_injection_into_resolved_response() {
    let mut req = request("/v1/pets/42");
    let mut response =
        resolve_from_document(&mut req, 200, fixture("petstore.yaml"), &PathTemplateResolver)
            .await
            .unwrap();
    let params: Map<String, Value> = req["swagger"]["params"]
        .as_object()
        .cloned()
        .unwrap_or_default();
    let pet = response.as_object_mut().unwrap();
    Injector::with_pattern(InjectorPattern::Handlebar)
        .inject(pet, &params)
        .unwrap();
    assert_eq!(pet.get("self").unwrap().unwrap().to_value(), json!("/v1/pets/42"));
}

#[test]
fn test_response_from_attached_metadata() {
    let req = json!({
        "swagger": {"operation": {"responses": {"200": {"schema": {
            "type": "object",
            "properties": {"numbers": {"type": "array", "items": {"type": "number"}}}
        }}}}}
    });
    let mut response = resolve_response(&req, 200).unwrap();
    let numbers = response
        .as_object_mut()
        .unwrap()
        .array_mut("numbers")
        .unwrap()
        .unwrap();
    numbers.push_all([json!(1), json!(2.5)]).unwrap();
    assert!(numbers.push(json!("3")).is_err());
    assert_eq!(
        serde_json::to_string(&response).unwrap(),
        r#"{"numbers":[1,2.5]}"#
    );
}
