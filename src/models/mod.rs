pub mod entity;
pub mod field;

pub use entity::{Club, Entity, FormRole, NewEvent};
pub use field::{column_specs, ColumnSpec, ColumnType, FieldDescriptor, FormField, LogicalType};
