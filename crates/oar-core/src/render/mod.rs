pub mod fields;
pub mod form;
pub mod table;

pub use form::{FormMode, FormOptions, FormSchema, UiWidget, to_form_schema};
pub use table::{
    Align, Pagination, SortDirection, SortSpec, TableColumn, TableOptions, TableSchema, to_table_schema,
};
