use crate::error::{ApiError, ApiResult};
use figures_dal::{listing::page_count, Batch, ListingParams, Order};
use garde::Validate;
use serde::Serialize;

#[derive(Debug, Clone, Default, Validate, serde::Deserialize)]
pub struct Paging {
    #[garde(range(min = 1))]
    page: Option<u32>,
    #[garde(range(min = 1, max = 1000))]
    page_size: Option<u32>,
    #[garde(length(max = 255))]
    sort: Option<String>,
    #[garde(length(max = 255))]
    filter: Option<String>,
}

fn parse_order(name: &str) -> ApiResult<Order> {
    let (field_name, descending) = match name.trim() {
        "" => return Err(ApiError::InvalidQuery("Empty ordering name".to_string())),
        name if name.len() > 100 => {
            return Err(ApiError::InvalidQuery(
                "Ordering name too long".to_string(),
            ))
        }
        name if name.starts_with('+') => (&name[1..], false),
        name if name.starts_with('-') => (&name[1..], true),
        name => (name, false),
    };
    if field_name.is_empty() {
        return Err(ApiError::InvalidQuery(format!("Invalid ordering {name}")));
    }

    Ok(if descending {
        Order::Desc(field_name.to_string())
    } else {
        Order::Asc(field_name.to_string())
    })
}

impl Paging {
    pub fn new(page: u32, page_size: u32) -> Self {
        Paging {
            page: Some(page),
            page_size: Some(page_size),
            ..Default::default()
        }
    }

    /// Table sorting is single column, several comma separated names are rejected.
    pub fn into_listing_params(self, default_page_size: u32) -> ApiResult<ListingParams> {
        let page = self.page.unwrap_or(1).max(1);
        let page_size = self.page_size.unwrap_or(default_page_size).max(1);
        let offset = u64::from(page - 1) * u64::from(page_size);
        let order = self
            .sort
            .filter(|s| !s.trim().is_empty())
            .map(|orderings| {
                let names: Vec<&str> = orderings.split(',').collect();
                match names.as_slice() {
                    [name] => parse_order(name).map(|o| vec![o]),
                    _ => Err(ApiError::InvalidQuery(format!(
                        "Only one sort column is supported, got {orderings}"
                    ))),
                }
            })
            .transpose()?;

        let mut params = ListingParams::new(offset, page_size.into());
        params.order = order;
        params.filter = self.filter;
        Ok(params)
    }

    pub fn page_size(&self, default_page_size: u32) -> u32 {
        self.page_size.unwrap_or(default_page_size).max(1)
    }
}

#[derive(Debug, Serialize)]
pub struct Page<T> {
    page: u64,
    page_size: u64,
    total_pages: u64,
    total: u64,
    /// One based index of the first row shown, 0 for an empty page.
    first_row: u64,
    last_row: u64,
    rows: Vec<T>,
}

impl<T> Page<T>
where
    T: Serialize,
{
    pub fn from_batch(batch: Batch<T>, page_size: u32) -> Self {
        let page_size = u64::from(page_size.max(1));
        let shown = batch.rows.len() as u64;
        let (first_row, last_row) = if shown == 0 {
            (0, 0)
        } else {
            (batch.offset + 1, batch.offset + shown)
        };
        Self {
            page: batch.offset / page_size + 1,
            page_size,
            total_pages: page_count(batch.total, page_size),
            total: batch.total,
            first_row,
            last_row,
            rows: batch.rows,
        }
    }

    pub fn rows(&self) -> &[T] {
        &self.rows
    }
}
