use oar_core::ResourceService;
use oar_core::analysis::{PathClassifier, build_resources};
use oar_core::model::{HttpMethod, ParameterIn, render_outline};
use oar_core::parse;
use serde_json::{Value, json};

const BLOG: &str = include_str!("fixtures/blog.yaml");
const PETSTORE: &str = include_str!("fixtures/petstore-2.0.yaml");
const STATISTICS: &str = include_str!("fixtures/statistics.yaml");

fn service_for(yaml: &str) -> ResourceService {
    let value: Value = serde_yaml_ng::from_str(yaml).expect("fixture should be valid YAML");
    let mut service = ResourceService::default();
    service.parse_document(value).expect("fixture should parse");
    service
}

fn names<'a>(resources: impl IntoIterator<Item = &'a oar_core::model::ResourceInfo>) -> Vec<&'a str> {
    resources.into_iter().map(|r| r.name.as_str()).collect()
}

#[test]
fn hierarchy_example() {
    let service = service_for(BLOG);
    let all = service.all_resources().unwrap();
    assert_eq!(names(all), vec!["users", "posts"]);

    let users = &all[0];
    assert_eq!(users.operations.len(), 5);
    assert_eq!(names(&users.sub_resources), vec!["posts"]);
    assert_eq!(users.sub_resources[0].base_path, "/users/{id}/posts");
    assert!(users.is_restful);

    let top = service.top_level_resources().unwrap();
    assert_eq!(names(top), vec!["users"]);

    // A root resource is found before a nested one of the same name.
    let posts = service.resource("posts").unwrap().unwrap();
    assert_eq!(posts.base_path, "/posts");
}

#[test]
fn outline_snapshot() {
    let service = service_for(BLOG);
    insta::assert_snapshot!(render_outline(service.all_resources().unwrap()), @r"
    users  GET,POST,PUT,DELETE  id=id  /users
      posts  GET  id=id  /users/{id}/posts
    posts  GET  id=id  /posts
    ");

    let service = service_for(PETSTORE);
    insta::assert_snapshot!(render_outline(service.all_resources().unwrap()), @r"
    pets  GET,POST,DELETE  id=id  /pets
    orders  GET  id=storeId  /stores/{storeId}/orders
    ");
}

#[test]
fn operations_keep_document_and_method_order() {
    let service = service_for(BLOG);
    let users = service.resource("users").unwrap().unwrap();
    let ops: Vec<String> = users
        .operations
        .iter()
        .map(|op| format!("{} {}", op.method, op.path))
        .collect();
    assert_eq!(
        ops,
        vec![
            "GET /users",
            "POST /users",
            "GET /users/{id}",
            "PUT /users/{id}",
            "DELETE /users/{id}",
        ]
    );
    assert_eq!(users.tags, vec!["users", "admin"]);
    assert_eq!(users.path_pattern, "/users");
    assert_eq!(users.base_path, "/users");
}

#[test]
fn operation_parameters_are_normalized() {
    let service = service_for(BLOG);
    let users = service.resource("users").unwrap().unwrap();

    let list = users.operation(HttpMethod::Get, "/users").unwrap();
    assert_eq!(list.operation_id.as_deref(), Some("listUsers"));
    assert_eq!(list.parameters.len(), 1);
    assert_eq!(list.parameters[0].name, "page");
    assert_eq!(list.parameters[0].location, ParameterIn::Query);
    assert_eq!(list.parameters[0].schema, Some(json!({ "type": "integer", "minimum": 1 })));

    let get = users.operation(HttpMethod::Get, "/users/{id}").unwrap();
    assert_eq!(get.parameters[0].name, "id");
    assert!(get.parameters[0].required);
    assert!(get.targets_instance());

    let create = users.operation(HttpMethod::Post, "/users").unwrap();
    assert_eq!(create.request_body, Some(json!({ "$ref": "#/components/schemas/User" })));
    assert!(!create.targets_instance());

    // The sub-resource path declares nothing; its placeholder is synthesized.
    let nested = &users.sub_resources[0].operations[0];
    assert_eq!(nested.parameters[0].name, "id");
    assert_eq!(nested.parameters[0].location, ParameterIn::Path);
}

#[test]
fn swagger2_operations() {
    let service = service_for(PETSTORE);
    let pets = service.resource("pets").unwrap().unwrap();
    assert_eq!(pets.operations.len(), 5);
    assert_eq!(pets.tags, vec!["pet"]);

    let add = pets.operation(HttpMethod::Post, "/pets").unwrap();
    assert_eq!(add.request_body, Some(json!({ "$ref": "#/definitions/Pet" })));
    assert!(add.parameters.is_empty());

    let form = pets.operation(HttpMethod::Post, "/pets/{petId}").unwrap();
    let body = form.request_body.as_ref().unwrap();
    assert_eq!(body["properties"]["status"], json!({ "type": "string" }));
    assert_eq!(body["required"], json!(["status"]));

    let delete = pets.operation(HttpMethod::Delete, "/pets/{petId}").unwrap();
    let params: Vec<&str> = delete.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["petId"]);
    assert_eq!(
        delete.parameters[0].schema,
        Some(json!({ "type": "integer" }))
    );

    let list = pets.list_operation().unwrap();
    assert_eq!(list.parameters[0].schema.as_ref().unwrap()["items"]["enum"][2], "sold");
}

#[test]
fn qualification_drops_groups_without_list_endpoint() {
    let service = service_for(STATISTICS);
    assert_eq!(names(service.all_resources().unwrap()), vec!["users", "posts"]);
    assert!(service.resource("auth").unwrap().is_none());

    let mut service = ResourceService::default();
    service
        .parse_document(json!({
            "openapi": "3.0.0",
            "info": { "title": "T", "version": "1" },
            "paths": {
                "/jobs": { "post": {}, "put": {} },
                "/jobs/{id}": { "get": {} },
                "/queues": { "get": {} }
            }
        }))
        .unwrap();
    assert_eq!(names(service.all_resources().unwrap()), vec!["queues"]);
}

#[test]
fn malformed_parameter_does_not_drop_resource() {
    let mut service = ResourceService::default();
    service
        .parse_document(json!({
            "openapi": "3.0.0",
            "info": { "title": "T", "version": "1" },
            "paths": {
                "/users": {
                    "get": {
                        "parameters": [
                            { "in": "query", "schema": { "type": "string" } },
                            { "name": "limit", "in": "query", "schema": { "type": "integer" } }
                        ]
                    }
                },
                "/posts": { "get": {} }
            }
        }))
        .unwrap();
    assert_eq!(names(service.all_resources().unwrap()), vec!["users", "posts"]);

    let users = service.resource("users").unwrap().unwrap();
    let list = users.list_operation().unwrap();
    let params: Vec<&str> = list.parameters.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(params, vec!["limit"]);
}

#[test]
fn identifier_inference_examples() {
    let mut service = ResourceService::default();
    service
        .parse_document(json!({
            "openapi": "3.0.0",
            "info": { "title": "Library", "version": "1" },
            "paths": {
                "/books": { "get": {} },
                "/books/{bookId}": { "get": {} },
                "/authors": { "get": {} },
                "/authors/{authorName}": { "get": {} },
                "/countries": { "get": {} },
                "/countries/{countryCode}": { "delete": {} },
                "/shelves": { "get": {} }
            }
        }))
        .unwrap();
    let id = |name: &str| service.resource(name).unwrap().unwrap().identifier_field.clone();
    assert_eq!(id("books"), "id");
    assert_eq!(id("authors"), "name");
    assert_eq!(id("countries"), "code");
    assert_eq!(id("shelves"), "id");
}

#[test]
fn reparse_is_idempotent() {
    let value: Value = serde_yaml_ng::from_str(BLOG).unwrap();
    let mut service = ResourceService::default();
    service.parse_document(value.clone()).unwrap();
    let first = service.all_resources().unwrap().to_vec();
    let first_stats = service.resource_statistics().unwrap().clone();

    service.parse_document(value).unwrap();
    let second = service.all_resources().unwrap();
    assert_eq!(first, second);
    assert!(!std::ptr::eq(first.as_ptr(), second.as_ptr()));
    assert_eq!(&first_stats, service.resource_statistics().unwrap());
}

#[test]
fn empty_paths_give_empty_forest() {
    let doc = parse::from_yaml("openapi: 3.0.0\ninfo: {title: T, version: '1'}\npaths: {}\n").unwrap();
    assert!(build_resources(&doc, &PathClassifier::new()).is_empty());

    let doc = parse::from_yaml(
        "openapi: 3.0.0\ninfo: {title: T, version: '1'}\npaths:\n  /health: {get: {}}\n  /api/v1: {get: {}}\n",
    )
    .unwrap();
    assert!(build_resources(&doc, &PathClassifier::new()).is_empty());
}

#[test]
fn operation_info_covers_non_resource_paths() {
    let service = service_for(STATISTICS);
    let login = service
        .operation_info(HttpMethod::Post, "/auth/login")
        .unwrap()
        .expect("login should be described");
    assert_eq!(login.path, "/auth/login");
    assert!(login.responses.contains_key("200"));
    assert!(service.operation_info(HttpMethod::Get, "/auth/login").unwrap().is_none());
}
