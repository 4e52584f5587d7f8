//! Schema definitions of the Harbor API

use serde::{Deserialize, Serialize};

pub mod artifact;
pub mod auditlog;
pub mod configure;
pub mod gc;
pub mod label;
pub mod project;
pub mod quota;
pub mod registry;
pub mod replication;
pub mod retention;
pub mod robot;
pub mod system;

pub use artifact::*;
pub use auditlog::*;
pub use configure::*;
pub use gc::*;
pub use label::*;
pub use project::*;
pub use quota::*;
pub use registry::*;
pub use replication::*;
pub use retention::*;
pub use robot::*;
pub use system::*;

/// JSON struct for Harbor API errors
#[derive(Default, Deserialize, Serialize, Debug, Clone)]
pub struct ResponseErrors {
    pub errors: Vec<ResponseError>,
}

/// JSON struct for a Harbor API error
#[derive(Default, Deserialize, Serialize, Debug, Clone)]
pub struct ResponseError {
    pub code: String,
    pub message: String,
}
