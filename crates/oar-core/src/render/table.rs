use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::analysis::naming::humanize;
use crate::parse::schema::{SchemaType, format, schema_type};

use super::fields::FieldSelection;

pub const DEFAULT_PAGE_SIZE: usize = 20;
pub const DEFAULT_PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 50, 100];
pub const DEFAULT_NARROW_COLUMN_WIDTH: u32 = 100;

const SORTABLE_TYPES: &[SchemaType] = &[
    SchemaType::String,
    SchemaType::Number,
    SchemaType::Integer,
    SchemaType::Boolean,
];
const FILTERABLE_TYPES: &[SchemaType] = &[SchemaType::String, SchemaType::Boolean];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    Left,
    Right,
    Center,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableColumn {
    pub key: String,
    pub title: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub data_type: Option<SchemaType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    pub align: Align,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    pub sortable: bool,
    pub filterable: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableSchema {
    pub columns: Vec<TableColumn>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortSpec>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone)]
pub struct TableOptions {
    /// Preferred default sort column.
    pub identifier_field: Option<String>,
    pub include_fields: Vec<String>,
    pub exclude_fields: Vec<String>,
    pub field_order: Vec<String>,
    /// Made sortable in addition to the type defaults.
    pub sortable_fields: Vec<String>,
    /// Made filterable in addition to the type defaults.
    pub filterable_fields: Vec<String>,
    pub default_sort: Option<SortSpec>,
    pub narrow_column_width: u32,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            identifier_field: None,
            include_fields: Vec::new(),
            exclude_fields: Vec::new(),
            field_order: Vec::new(),
            sortable_fields: Vec::new(),
            filterable_fields: Vec::new(),
            default_sort: None,
            narrow_column_width: DEFAULT_NARROW_COLUMN_WIDTH,
            page_size: DEFAULT_PAGE_SIZE,
            page_size_options: DEFAULT_PAGE_SIZE_OPTIONS.to_vec(),
        }
    }
}

/// Derive table columns from a resolved instance schema.
pub fn to_table_schema(schema: &Value, options: &TableOptions) -> TableSchema {
    let fields = FieldSelection {
        include: &options.include_fields,
        exclude: &options.exclude_fields,
        order: &options.field_order,
    }
    .select(schema);

    let columns: Vec<TableColumn> = fields
        .iter()
        .map(|field| {
            let data_type = schema_type(&field.schema);
            let narrow = matches!(
                data_type,
                Some(SchemaType::Boolean | SchemaType::Array | SchemaType::Object)
            );
            let align = match data_type {
                Some(t) if t.is_numeric() => Align::Right,
                _ if narrow => Align::Center,
                _ => Align::Left,
            };
            let title = field
                .schema
                .get("title")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| humanize(&field.name));
            TableColumn {
                key: field.name.clone(),
                title,
                data_type,
                format: format(&field.schema).map(str::to_string),
                align,
                width: narrow.then_some(options.narrow_column_width),
                sortable: data_type.is_some_and(|t| SORTABLE_TYPES.contains(&t))
                    || options.sortable_fields.contains(&field.name),
                filterable: data_type.is_some_and(|t| FILTERABLE_TYPES.contains(&t))
                    || options.filterable_fields.contains(&field.name),
            }
        })
        .collect();

    let default_sort = options
        .default_sort
        .clone()
        .or_else(|| default_sort_for(&columns, options.identifier_field.as_deref()));

    TableSchema {
        columns,
        default_sort,
        pagination: Pagination {
            page_size: options.page_size,
            page_size_options: options.page_size_options.clone(),
        },
    }
}

/// The identifier column when sortable, else the first sortable column.
fn default_sort_for(columns: &[TableColumn], identifier: Option<&str>) -> Option<SortSpec> {
    let sortable = || columns.iter().filter(|c| c.sortable);
    let column = identifier
        .and_then(|id| sortable().find(|c| c.key == id))
        .or_else(|| sortable().find(|c| c.key == "id"))
        .or_else(|| sortable().next())?;
    Some(SortSpec {
        field: column.key.clone(),
        direction: SortDirection::Asc,
    })
}
