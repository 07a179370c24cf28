//! Filter, sort and paginate pipeline over a catalogue snapshot.
use std::{cmp::Ordering, sync::Arc};

use figures_types::utils::{leading_year, search_key};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Batch, ListingParams, character::Character, error::Result};

/// Shared read-only collection, cheap to clone.
pub type Snapshot = Arc<Vec<Character>>;

pub const DEFAULT_PAGE_SIZE: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortColumn {
    Name,
    BirthDate,
    DeathDate,
    Works,
    Likes,
}

impl SortColumn {
    pub const SORTABLE: &'static [SortColumn] = &[
        SortColumn::Name,
        SortColumn::BirthDate,
        SortColumn::DeathDate,
        SortColumn::Works,
        SortColumn::Likes,
    ];

    /// Column by its camelCase or snake_case name, `None` for unsortable columns.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "name" => Some(SortColumn::Name),
            "birthDate" | "birth_date" => Some(SortColumn::BirthDate),
            "deathDate" | "death_date" => Some(SortColumn::DeathDate),
            "works" => Some(SortColumn::Works),
            "likes" => Some(SortColumn::Likes),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: Direction,
}

impl SortSpec {
    pub fn asc(column: SortColumn) -> Self {
        SortSpec {
            column,
            direction: Direction::Asc,
        }
    }

    pub fn desc(column: SortColumn) -> Self {
        SortSpec {
            column,
            direction: Direction::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum SortValue {
    Number(i64),
    Text(String),
}

fn date_value(date: &str) -> SortValue {
    match leading_year(date) {
        Some(year) => SortValue::Number(year.into()),
        None => SortValue::Text(search_key(date)),
    }
}

fn sort_value(c: &Character, column: SortColumn) -> Option<SortValue> {
    match column {
        SortColumn::Name => Some(SortValue::Text(search_key(&c.name))),
        SortColumn::BirthDate => Some(date_value(&c.birth_date)),
        SortColumn::DeathDate => c.death_date().map(date_value),
        SortColumn::Works => Some(SortValue::Number(c.works.len() as i64)),
        SortColumn::Likes => Some(SortValue::Number(c.likes.into())),
    }
}

/// Missing values go last in both directions.
pub fn compare(a: &Character, b: &Character, spec: SortSpec) -> Ordering {
    match (sort_value(a, spec.column), sort_value(b, spec.column)) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => match spec.direction {
            Direction::Asc => a.cmp(&b),
            Direction::Desc => b.cmp(&a),
        },
    }
}

/// Compiled global filter, matches name, field, dates and work titles.
#[derive(Debug, Clone)]
pub struct GlobalFilter(Option<String>);

impl GlobalFilter {
    pub fn new(filter: &str) -> Self {
        let key = search_key(filter.trim());
        if key.is_empty() {
            GlobalFilter(None)
        } else {
            GlobalFilter(Some(key))
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    pub fn matches(&self, c: &Character) -> bool {
        let Some(needle) = self.0.as_deref() else {
            return true;
        };
        let hit = |text: &str| search_key(text).contains(needle);
        hit(&c.name)
            || hit(c.field_of_activity.as_str())
            || hit(&c.birth_date)
            || c.death_date().is_some_and(hit)
            || c.works.iter().any(|w| hit(w))
    }
}

pub fn filter_rows<'a>(rows: &'a [Character], filter: &GlobalFilter) -> Vec<&'a Character> {
    rows.iter().filter(|c| filter.matches(c)).collect()
}

/// Stable single column sort.
pub fn sort_rows(rows: &mut [&Character], spec: SortSpec) {
    rows.sort_by(|a, b| compare(a, b, spec));
}

pub fn page_count(total: u64, page_size: u64) -> u64 {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Runs the whole pipeline for one listing request.
pub fn select(rows: &[Character], params: &ListingParams) -> Result<Batch<Character>> {
    let sorting = params.sorting()?;
    let filter = GlobalFilter::new(params.filter.as_deref().unwrap_or_default());
    let mut selected = filter_rows(rows, &filter);
    if let Some(spec) = sorting {
        sort_rows(&mut selected, spec);
    }
    let total = selected.len() as u64;
    let rows: Vec<Character> = selected
        .into_iter()
        .skip(params.offset as usize)
        .take(params.limit as usize)
        .cloned()
        .collect();
    debug!(
        "Selected {} of {total} rows at offset {}",
        rows.len(),
        params.offset
    );
    Ok(Batch {
        offset: params.offset,
        limit: params.limit,
        total,
        rows,
    })
}

/// Sort state of the table header: asc, desc, then unsorted on the same column.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState(Option<SortSpec>);

impl SortState {
    pub fn current(&self) -> Option<SortSpec> {
        self.0
    }

    /// Activates the header of `column`, returns false for unsortable columns.
    pub fn toggle(&mut self, column: &str) -> bool {
        let Some(column) = SortColumn::from_name(column) else {
            return false;
        };
        self.0 = match self.0 {
            Some(spec) if spec.column == column => match spec.direction {
                Direction::Asc => Some(SortSpec::desc(column)),
                Direction::Desc => None,
            },
            _ => Some(SortSpec::asc(column)),
        };
        true
    }
}

/// Interactive state of the character table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableState {
    filter: String,
    sort: SortState,
    page_index: u64,
    page_size: u64,
}

impl Default for TableState {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub rows: Vec<Character>,
    pub total: u64,
    pub page_index: u64,
    pub page_count: u64,
    /// 1-based index of the first visible row, 0 when nothing is shown
    pub first_row: u64,
    pub last_row: u64,
    pub can_previous: bool,
    pub can_next: bool,
}

impl TableState {
    pub fn new(page_size: u64) -> Self {
        TableState {
            filter: String::new(),
            sort: SortState::default(),
            page_index: 0,
            page_size: page_size.max(1),
        }
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort.current()
    }

    pub fn page_index(&self) -> u64 {
        self.page_index
    }

    pub fn page_size(&self) -> u64 {
        self.page_size
    }

    pub fn set_filter(&mut self, filter: impl Into<String>) {
        self.filter = filter.into();
        self.page_index = 0;
    }

    pub fn set_page_size(&mut self, page_size: u64) {
        self.page_size = page_size.max(1);
        self.page_index = 0;
    }

    pub fn toggle_sort(&mut self, column: &str) -> bool {
        self.sort.toggle(column)
    }

    fn filtered_total(&self, rows: &[Character]) -> u64 {
        let filter = GlobalFilter::new(&self.filter);
        rows.iter().filter(|c| filter.matches(c)).count() as u64
    }

    pub fn page_count(&self, rows: &[Character]) -> u64 {
        page_count(self.filtered_total(rows), self.page_size)
    }

    pub fn can_previous(&self) -> bool {
        self.page_index > 0
    }

    pub fn can_next(&self, rows: &[Character]) -> bool {
        self.page_index + 1 < self.page_count(rows)
    }

    pub fn next_page(&mut self, rows: &[Character]) -> bool {
        if self.can_next(rows) {
            self.page_index += 1;
            true
        } else {
            false
        }
    }

    pub fn previous_page(&mut self) -> bool {
        if self.can_previous() {
            self.page_index -= 1;
            true
        } else {
            false
        }
    }

    pub fn view(&self, rows: &[Character]) -> TableView {
        let filter = GlobalFilter::new(&self.filter);
        let mut selected = filter_rows(rows, &filter);
        if let Some(spec) = self.sort.current() {
            sort_rows(&mut selected, spec);
        }
        let total = selected.len() as u64;
        let page_count = page_count(total, self.page_size);
        let page_index = self.page_index.min(page_count.saturating_sub(1));
        let offset = page_index * self.page_size;
        let rows: Vec<Character> = selected
            .into_iter()
            .skip(offset as usize)
            .take(self.page_size as usize)
            .cloned()
            .collect();
        let (first_row, last_row) = if rows.is_empty() {
            (0, 0)
        } else {
            (offset + 1, offset + rows.len() as u64)
        };
        TableView {
            rows,
            total,
            page_index,
            page_count,
            first_row,
            last_row,
            can_previous: page_index > 0,
            can_next: page_index + 1 < page_count,
        }
    }
}
