pub mod config;
pub mod error;
pub mod general;
pub mod labels;
pub mod utils;

pub use error::ParseError;
pub use general::{FieldOfActivity, Gender, ResourceKind, Status};
pub use labels::{Labelled, Locale};
