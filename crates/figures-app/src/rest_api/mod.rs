pub mod character;
pub mod dashboard;
pub mod labels;
mod paging;

pub use paging::{Page, Paging};
