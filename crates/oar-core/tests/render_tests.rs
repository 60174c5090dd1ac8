use oar_core::config::RenderConfig;
use oar_core::render::{Align, FormMode, FormOptions, SortDirection, TableOptions};
use oar_core::{ResourceService, ServiceError};
use serde_json::{Value, json};

const BLOG: &str = include_str!("fixtures/blog.yaml");

fn blog() -> ResourceService {
    let value: Value = serde_yaml_ng::from_str(BLOG).unwrap();
    let mut service = ResourceService::default();
    service.parse_document(value).unwrap();
    service
}

fn keys(schema: &Value) -> Vec<&str> {
    schema["properties"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect()
}

#[test]
fn create_form_for_users() {
    let service = blog();
    let form = service
        .form_schema("users", &FormOptions::new(FormMode::Create))
        .unwrap();

    assert_eq!(keys(&form.schema), vec!["name", "email", "bio", "role", "active"]);
    assert_eq!(form.schema["required"], json!(["email", "name"]));
    assert_eq!(form.ui_schema["ui:order"], json!(["name", "email", "bio", "role", "active"]));
    assert_eq!(form.ui_schema["email"]["ui:widget"], "email");
    assert_eq!(form.ui_schema["bio"]["ui:widget"], "textarea");
    assert_eq!(form.ui_schema["role"]["ui:widget"], "select");
    assert_eq!(form.ui_schema["active"]["ui:widget"], "checkbox");
    assert_eq!(form.form_data["role"], "reader");
    assert_eq!(form.schema["properties"]["name"]["title"], "Name");
}

#[test]
fn edit_form_for_users() {
    let service = blog();
    let form = service
        .form_schema("users", &FormOptions::new(FormMode::Edit))
        .unwrap();

    assert_eq!(
        keys(&form.schema),
        vec!["id", "name", "email", "bio", "role", "active", "updatedAt"]
    );
    assert_eq!(form.ui_schema["id"]["ui:readonly"], true);
    assert_eq!(form.ui_schema["id"]["ui:widget"], "updown");
    assert_eq!(form.ui_schema["updatedAt"]["ui:widget"], "date-time");
    assert_eq!(form.schema["required"], json!(["id", "email", "name"]));
}

#[test]
fn form_overrides() {
    let service = blog();
    let options = FormOptions {
        default_exclusions: false,
        field_order: vec!["createdAt".to_string(), "email".to_string()],
        exclude_fields: vec!["bio".to_string()],
        ..FormOptions::new(FormMode::Create)
    };
    let form = service.form_schema("users", &options).unwrap();
    assert_eq!(
        keys(&form.schema),
        vec!["createdAt", "email", "id", "name", "role", "active", "updatedAt"]
    );

    let options = FormOptions {
        read_only_fields: vec!["email".to_string()],
        ..RenderConfig {
            long_text_threshold: 5000,
            ..RenderConfig::default()
        }
        .form_options(FormMode::Create)
    };
    let form = service.form_schema("users", &options).unwrap();
    assert!(form.ui_schema.get("bio").is_none());
    assert_eq!(form.ui_schema["email"]["ui:readonly"], true);
}

#[test]
fn table_for_posts() {
    let service = blog();
    let table = service.table_schema("posts", &TableOptions::default()).unwrap();

    let keys: Vec<&str> = table.columns.iter().map(|c| c.key.as_str()).collect();
    assert_eq!(keys, vec!["id", "title", "author", "tags", "published_on"]);

    let id = &table.columns[0];
    assert_eq!(id.align, Align::Right);
    assert!(id.sortable);
    assert!(!id.filterable);

    let author = &table.columns[2];
    assert_eq!(author.align, Align::Center);
    assert_eq!(author.width, Some(100));
    assert!(!author.sortable);

    let published = &table.columns[4];
    assert_eq!(published.title, "Published On");
    assert_eq!(published.format.as_deref(), Some("date"));

    let sort = table.default_sort.unwrap();
    assert_eq!(sort.field, "id");
    assert_eq!(sort.direction, SortDirection::Asc);
    assert_eq!(table.pagination.page_size, 20);
}

#[test]
fn table_from_render_config() {
    let service = blog();
    let config = RenderConfig {
        page_size: 50,
        page_size_options: vec![50, 200],
        narrow_column_width: 64,
        ..RenderConfig::default()
    };
    let table = service.table_schema("users", &config.table_options()).unwrap();
    assert_eq!(table.pagination.page_size, 50);
    assert_eq!(table.pagination.page_size_options, vec![50, 200]);
    let active = table.columns.iter().find(|c| c.key == "active").unwrap();
    assert_eq!(active.width, Some(64));
    assert!(active.filterable);

    let json = serde_json::to_value(&table).unwrap();
    assert_eq!(json["columns"][0]["align"], "right");
    assert_eq!(json["default_sort"]["direction"], "asc");
}

#[test]
fn render_errors() {
    let service = blog();
    assert!(matches!(
        service.table_schema("nope", &TableOptions::default()),
        Err(ServiceError::UnknownResource(name)) if name == "nope"
    ));

    let value: Value = serde_yaml_ng::from_str(include_str!("fixtures/statistics.yaml")).unwrap();
    let mut service = ResourceService::default();
    service.parse_document(value).unwrap();
    assert!(matches!(
        service.form_schema("users", &FormOptions::default()),
        Err(ServiceError::NoSchema(_))
    ));
}
