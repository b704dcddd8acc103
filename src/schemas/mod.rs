pub mod schema;
pub mod validator;

pub use schema::{schema_type_name, CompletionSchema, SchemaHandle};
pub use validator::DocumentValidator;
