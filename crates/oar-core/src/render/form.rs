use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::analysis::naming::humanize;
use crate::parse::schema::{SchemaType, enum_values, format, schema_type};

use super::fields::{Field, FieldSelection, rebuild_object};

/// `maxLength` above which a string gets a multi-line control.
pub const DEFAULT_LONG_TEXT_THRESHOLD: u64 = 255;

/// Fields a create form leaves out unless asked for.
pub const TIMESTAMP_FIELDS: &[&str] = &[
    "createdAt",
    "created_at",
    "updatedAt",
    "updated_at",
    "deletedAt",
    "deleted_at",
    "createdOn",
    "updatedOn",
    "timestamp",
];

/// Fields an edit form leaves out unless asked for.
pub const CREATION_TIMESTAMP_FIELDS: &[&str] = &["createdAt", "created_at", "createdOn"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormMode {
    #[default]
    Create,
    Edit,
}

/// Input control hint for one form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UiWidget {
    Date,
    DateTime,
    Email,
    Uri,
    Select,
    Textarea,
    Updown,
    Checkbox,
    Checkboxes,
}

impl UiWidget {
    pub fn as_str(&self) -> &'static str {
        match self {
            UiWidget::Date => "date",
            UiWidget::DateTime => "date-time",
            UiWidget::Email => "email",
            UiWidget::Uri => "uri",
            UiWidget::Select => "select",
            UiWidget::Textarea => "textarea",
            UiWidget::Updown => "updown",
            UiWidget::Checkbox => "checkbox",
            UiWidget::Checkboxes => "checkboxes",
        }
    }

    /// The default control for a property schema, if any.
    pub fn for_schema(schema: &Value, long_text_threshold: u64) -> Option<Self> {
        match schema_type(schema)? {
            SchemaType::String => {
                if let Some(widget) = format(schema).and_then(Self::for_format) {
                    return Some(widget);
                }
                if !enum_values(schema).is_empty() {
                    return Some(UiWidget::Select);
                }
                let max_length = schema.get("maxLength").and_then(Value::as_u64);
                max_length
                    .filter(|len| *len > long_text_threshold)
                    .map(|_| UiWidget::Textarea)
            }
            SchemaType::Number | SchemaType::Integer => Some(UiWidget::Updown),
            SchemaType::Boolean => Some(UiWidget::Checkbox),
            SchemaType::Array => schema
                .get("items")
                .filter(|items| !enum_values(items).is_empty())
                .map(|_| UiWidget::Checkboxes),
            SchemaType::Object | SchemaType::Null => None,
        }
    }

    fn for_format(format: &str) -> Option<Self> {
        match format {
            "date" => Some(UiWidget::Date),
            "date-time" => Some(UiWidget::DateTime),
            "email" => Some(UiWidget::Email),
            "uri" | "url" => Some(UiWidget::Uri),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FormOptions {
    pub mode: FormMode,
    /// The resource's identifier field; excluded on create, read-only on edit.
    pub identifier_field: Option<String>,
    pub include_fields: Vec<String>,
    pub exclude_fields: Vec<String>,
    pub field_order: Vec<String>,
    pub read_only_fields: Vec<String>,
    /// Apply the per-mode identity/timestamp exclusions.
    pub default_exclusions: bool,
    /// Force the identifier field read-only in edit mode.
    pub identifier_read_only: bool,
    pub long_text_threshold: u64,
    /// Values overlaid on the schema defaults in `form_data`.
    pub initial_data: Map<String, Value>,
}

impl Default for FormOptions {
    fn default() -> Self {
        Self {
            mode: FormMode::Create,
            identifier_field: None,
            include_fields: Vec::new(),
            exclude_fields: Vec::new(),
            field_order: Vec::new(),
            read_only_fields: Vec::new(),
            default_exclusions: true,
            identifier_read_only: true,
            long_text_threshold: DEFAULT_LONG_TEXT_THRESHOLD,
            initial_data: Map::new(),
        }
    }
}

impl FormOptions {
    pub fn new(mode: FormMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    fn effective_exclusions(&self) -> Vec<String> {
        let mut excluded = self.exclude_fields.clone();
        if !self.default_exclusions || !self.include_fields.is_empty() {
            return excluded;
        }
        let defaults: Vec<&str> = match self.mode {
            FormMode::Create => {
                let mut v = vec!["id"];
                if let Some(identifier) = &self.identifier_field {
                    v.push(identifier.as_str());
                }
                v.extend_from_slice(TIMESTAMP_FIELDS);
                v
            }
            FormMode::Edit => CREATION_TIMESTAMP_FIELDS.to_vec(),
        };
        for name in defaults {
            if !excluded.iter().any(|e| e == name) {
                excluded.push(name.to_string());
            }
        }
        excluded
    }

    fn is_read_only(&self, field: &str) -> bool {
        self.read_only_fields.iter().any(|f| f == field)
            || (self.mode == FormMode::Edit
                && self.identifier_read_only
                && self.identifier_field.as_deref() == Some(field))
    }
}

/// Schema, UI hints and initial values for a form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormSchema {
    pub schema: Value,
    pub ui_schema: Map<String, Value>,
    pub form_data: Map<String, Value>,
}

/// Derive a form from a resolved instance schema.
pub fn to_form_schema(schema: &Value, options: &FormOptions) -> FormSchema {
    let excluded = options.effective_exclusions();
    let fields = FieldSelection {
        include: &options.include_fields,
        exclude: &excluded,
        order: &options.field_order,
    }
    .select(schema);

    let mut ui_schema = Map::new();
    ui_schema.insert(
        "ui:order".to_string(),
        Value::Array(fields.iter().map(|f| json!(f.name)).collect()),
    );

    let mut form_data = Map::new();
    let mut rendered = Vec::with_capacity(fields.len());
    for field in fields {
        let read_only = options.is_read_only(&field.name);
        let mut hints = Map::new();
        if let Some(widget) = UiWidget::for_schema(&field.schema, options.long_text_threshold) {
            hints.insert("ui:widget".to_string(), json!(widget.as_str()));
        }
        if read_only {
            hints.insert("ui:readonly".to_string(), Value::Bool(true));
        }
        if !hints.is_empty() {
            ui_schema.insert(field.name.clone(), Value::Object(hints));
        }

        if let Some(default) = field.schema.get("default") {
            form_data.insert(field.name.clone(), default.clone());
        }
        if let Some(value) = options.initial_data.get(&field.name) {
            form_data.insert(field.name.clone(), value.clone());
        }

        rendered.push(decorate(field, read_only));
    }

    FormSchema {
        schema: rebuild_object(schema, &rendered),
        ui_schema,
        form_data,
    }
}

/// Fill in a `title` and mark read-only fields in the field schema itself.
fn decorate(field: Field, read_only: bool) -> Field {
    let Value::Object(mut map) = field.schema else {
        return field;
    };
    if !map.contains_key("title") {
        map.insert("title".to_string(), Value::String(humanize(&field.name)));
    }
    if read_only {
        map.insert("readOnly".to_string(), Value::Bool(true));
    }
    Field {
        name: field.name,
        schema: Value::Object(map),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> Value {
        json!({
            "type": "object",
            "required": ["userId", "email", "createdAt"],
            "properties": {
                "userId": { "type": "string" },
                "email": { "type": "string", "format": "email" },
                "role": { "type": "string", "enum": ["admin", "member"], "default": "member" },
                "bio": { "type": "string", "maxLength": 2000 },
                "age": { "type": "integer" },
                "active": { "type": "boolean" },
                "labels": { "type": "array", "items": { "type": "string", "enum": ["a", "b"] } },
                "createdAt": { "type": "string", "format": "date-time" },
                "updatedAt": { "type": "string", "format": "date-time" }
            }
        })
    }

    fn keys(v: &Value) -> Vec<&str> {
        v["properties"]
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect()
    }

    #[test]
    fn test_create_excludes_identity_and_timestamps() {
        let options = FormOptions {
            identifier_field: Some("userId".to_string()),
            ..FormOptions::new(FormMode::Create)
        };
        let form = to_form_schema(&user(), &options);
        assert_eq!(keys(&form.schema), vec!["email", "role", "bio", "age", "active", "labels"]);
        assert_eq!(form.schema["required"], json!(["email"]));
        assert_eq!(form.form_data["role"], "member");
    }

    #[test]
    fn test_edit_keeps_identifier_read_only() {
        let options = FormOptions {
            identifier_field: Some("userId".to_string()),
            ..FormOptions::new(FormMode::Edit)
        };
        let form = to_form_schema(&user(), &options);
        let k = keys(&form.schema);
        assert!(k.contains(&"userId"));
        assert!(k.contains(&"updatedAt"));
        assert!(!k.contains(&"createdAt"));
        assert_eq!(form.ui_schema["userId"]["ui:readonly"], true);
        assert_eq!(form.schema["properties"]["userId"]["readOnly"], true);
    }

    #[test]
    fn test_edit_identifier_editable_when_unlocked() {
        let options = FormOptions {
            identifier_field: Some("userId".to_string()),
            identifier_read_only: false,
            ..FormOptions::new(FormMode::Edit)
        };
        let form = to_form_schema(&user(), &options);
        assert!(keys(&form.schema).contains(&"userId"));
        assert!(form.ui_schema.get("userId").and_then(|h| h.get("ui:readonly")).is_none());
        assert!(form.schema["properties"]["userId"].get("readOnly").is_none());

        let options = FormOptions {
            read_only_fields: vec!["userId".to_string()],
            ..options
        };
        let form = to_form_schema(&user(), &options);
        assert_eq!(form.ui_schema["userId"]["ui:readonly"], true);
    }

    #[test]
    fn test_widgets() {
        let form = to_form_schema(&user(), &FormOptions::new(FormMode::Edit));
        let widget = |name: &str| form.ui_schema[name]["ui:widget"].as_str().unwrap().to_string();
        assert_eq!(widget("email"), "email");
        assert_eq!(widget("role"), "select");
        assert_eq!(widget("bio"), "textarea");
        assert_eq!(widget("age"), "updown");
        assert_eq!(widget("active"), "checkbox");
        assert_eq!(widget("labels"), "checkboxes");
        assert_eq!(widget("updatedAt"), "date-time");
        assert!(form.ui_schema.get("userId").is_none());
    }

    #[test]
    fn test_textarea_threshold() {
        let s = json!({ "type": "string", "maxLength": 255 });
        assert_eq!(UiWidget::for_schema(&s, 255), None);
        assert_eq!(UiWidget::for_schema(&s, 100), Some(UiWidget::Textarea));
    }

    #[test]
    fn test_explicit_include_overrides_defaults() {
        let options = FormOptions {
            include_fields: vec!["userId".to_string(), "createdAt".to_string()],
            identifier_field: Some("userId".to_string()),
            ..FormOptions::new(FormMode::Create)
        };
        let form = to_form_schema(&user(), &options);
        assert_eq!(keys(&form.schema), vec!["userId", "createdAt"]);

        let options = FormOptions {
            default_exclusions: false,
            ..FormOptions::new(FormMode::Create)
        };
        assert_eq!(keys(&to_form_schema(&user(), &options).schema).len(), 9);
    }

    #[test]
    fn test_titles_and_initial_data() {
        let mut initial = Map::new();
        initial.insert("role".to_string(), json!("admin"));
        let options = FormOptions {
            initial_data: initial,
            field_order: vec!["age".to_string()],
            ..FormOptions::new(FormMode::Edit)
        };
        let form = to_form_schema(&user(), &options);
        assert_eq!(form.schema["properties"]["createdAt"], Value::Null);
        assert_eq!(form.schema["properties"]["updatedAt"]["title"], "Updated At");
        assert_eq!(form.form_data["role"], "admin");
        assert_eq!(form.ui_schema["ui:order"][0], "age");
    }
}
