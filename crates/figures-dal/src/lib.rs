pub mod character;
pub mod error;
pub mod listing;
pub mod seed;
pub mod stats;

use std::fmt::Display;

pub use error::Error;
use serde::Serialize;

use crate::error::Result;
use crate::listing::{Direction, SortColumn, SortSpec};

pub const MAX_LIMIT: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Asc(String),
    Desc(String),
}

impl Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Order::Asc(s) => write!(f, "{}", s),
            Order::Desc(s) => write!(f, "-{}", s),
        }
    }
}

impl AsRef<str> for Order {
    fn as_ref(&self) -> &str {
        match self {
            Order::Asc(s) => s.as_str(),
            Order::Desc(s) => s.as_str(),
        }
    }
}

impl Order {
    pub fn sort_spec(&self) -> Result<SortSpec> {
        let column = SortColumn::from_name(self.as_ref())
            .ok_or_else(|| Error::InvalidOrderByField(self.as_ref().to_string()))?;
        let direction = match self {
            Order::Asc(_) => Direction::Asc,
            Order::Desc(_) => Direction::Desc,
        };
        Ok(SortSpec { column, direction })
    }
}

#[derive(Debug, Clone)]
pub struct ListingParams {
    pub offset: u64,
    pub limit: u64,
    pub order: Option<Vec<Order>>,
    pub filter: Option<String>,
}

impl Default for ListingParams {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: MAX_LIMIT as u64,
            order: None,
            filter: None,
        }
    }
}

impl ListingParams {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self {
            offset,
            limit,
            order: None,
            filter: None,
        }
    }

    pub fn with_order(mut self, order: Vec<Order>) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    /// Sorting is single column, only the first ordering is used.
    pub fn sorting(&self) -> Result<Option<SortSpec>> {
        self.order
            .as_ref()
            .and_then(|o| o.first())
            .map(Order::sort_spec)
            .transpose()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Batch<T> {
    pub offset: u64,
    pub limit: u64,
    pub total: u64,
    pub rows: Vec<T>,
}

impl<T> Batch<T> {
    pub fn map<U, F>(self, f: F) -> Batch<U>
    where
        F: FnMut(T) -> U,
    {
        Batch {
            offset: self.offset,
            limit: self.limit,
            total: self.total,
            rows: self.rows.into_iter().map(f).collect(),
        }
    }
}
