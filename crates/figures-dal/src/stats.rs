//! Dashboard aggregates, all pure functions of a catalogue snapshot.
use std::str::FromStr;

use figures_types::{
    FieldOfActivity, ParseError,
    config::{CenturyBand, CenturyBands},
    utils::{first_token, leading_year, round1},
};
use serde::{Deserialize, Serialize};

use crate::character::Character;

pub const POPULARITY_TOP: usize = 5;
/// Likes count at which the satisfaction level saturates.
pub const SATISFACTION_SCALE: u32 = 300;
const FULL_MARK_PADDING: u64 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum FieldScope {
    #[default]
    All,
    Only(FieldOfActivity),
}

impl FieldScope {
    pub fn includes(&self, c: &Character) -> bool {
        match self {
            FieldScope::All => true,
            FieldScope::Only(field) => c.field_of_activity == *field,
        }
    }

    fn apply<'a>(&self, rows: &'a [Character]) -> Vec<&'a Character> {
        rows.iter().filter(|c| self.includes(c)).collect()
    }
}

impl FromStr for FieldScope {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") || s.trim().is_empty() {
            Ok(FieldScope::All)
        } else {
            s.parse().map(FieldScope::Only)
        }
    }
}

impl TryFrom<String> for FieldScope {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<FieldScope> for String {
    fn from(scope: FieldScope) -> Self {
        match scope {
            FieldScope::All => "all".to_string(),
            FieldScope::Only(field) => field.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldCount {
    pub field: FieldOfActivity,
    pub count: u64,
    pub full_mark: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldShare {
    pub field: FieldOfActivity,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CenturyBucket {
    Band(CenturyBand),
    Unknown,
}

impl CenturyBucket {
    pub fn key(&self) -> String {
        match self {
            CenturyBucket::Band(band) => band.key(),
            CenturyBucket::Unknown => "unknown".to_string(),
        }
    }

    pub fn century(&self) -> Option<i32> {
        match self {
            CenturyBucket::Band(band) => Some(band.century()),
            CenturyBucket::Unknown => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CenturyCount {
    #[serde(skip)]
    pub bucket: CenturyBucket,
    pub key: String,
    pub century: Option<i32>,
    pub count: u64,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularityEntry {
    pub id: String,
    pub name: String,
    pub likes: u32,
    pub field: FieldOfActivity,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_characters: u64,
    pub most_popular: Option<PopularityEntry>,
    pub field_count: u64,
    pub average_likes: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeSummary {
    pub total_characters: u64,
    pub poets: u64,
    pub philosophers: u64,
}

fn percentage(count: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        round1(count as f64 / total as f64 * 100.0)
    }
}

fn count_fields<'a>(rows: impl IntoIterator<Item = &'a Character>) -> Vec<(FieldOfActivity, u64)> {
    let mut counts: Vec<(FieldOfActivity, u64)> = Vec::new();
    for c in rows {
        match counts.iter_mut().find(|(f, _)| *f == c.field_of_activity) {
            Some((_, n)) => *n += 1,
            None => counts.push((c.field_of_activity, 1)),
        }
    }
    counts
}

/// Count per field in order of first appearance, with radar chart scaling.
pub fn field_distribution(rows: &[Character], scope: FieldScope) -> Vec<FieldCount> {
    let counts = count_fields(scope.apply(rows));
    let full_mark = counts.iter().map(|(_, n)| *n).max().unwrap_or(0) + FULL_MARK_PADDING;
    counts
        .into_iter()
        .map(|(field, count)| FieldCount {
            field,
            count,
            full_mark,
        })
        .collect()
}

/// Share of every field in the whole collection.
pub fn field_shares(rows: &[Character]) -> Vec<FieldShare> {
    let total = rows.len() as u64;
    count_fields(rows)
        .into_iter()
        .map(|(field, count)| FieldShare {
            field,
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

pub fn century_bucket(c: &Character, bands: &CenturyBands) -> CenturyBucket {
    leading_year(&c.birth_date)
        .and_then(|year| bands.position(year))
        .map(|pos| CenturyBucket::Band(bands.bands()[pos]))
        .unwrap_or(CenturyBucket::Unknown)
}

/// Non-empty birth century buckets in band order, unknown last.
pub fn century_distribution(
    rows: &[Character],
    bands: &CenturyBands,
    scope: FieldScope,
) -> Vec<CenturyCount> {
    let scoped = scope.apply(rows);
    let total = scoped.len() as u64;
    let mut band_counts = vec![0u64; bands.bands().len()];
    let mut unknown = 0u64;
    for c in scoped {
        match leading_year(&c.birth_date).and_then(|year| bands.position(year)) {
            Some(pos) => band_counts[pos] += 1,
            None => unknown += 1,
        }
    }
    bands
        .bands()
        .iter()
        .map(|b| CenturyBucket::Band(*b))
        .zip(band_counts)
        .chain(std::iter::once((CenturyBucket::Unknown, unknown)))
        .filter(|(_, count)| *count > 0)
        .map(|(bucket, count)| CenturyCount {
            bucket,
            key: bucket.key(),
            century: bucket.century(),
            count,
            percentage: percentage(count, total),
        })
        .collect()
}

/// Top characters by likes, ties keep collection order.
pub fn popularity_ranking(rows: &[Character], top: usize) -> Vec<PopularityEntry> {
    let mut ranked: Vec<&Character> = rows.iter().collect();
    ranked.sort_by(|a, b| b.likes.cmp(&a.likes));
    ranked
        .into_iter()
        .take(top)
        .map(|c| PopularityEntry {
            id: c.id.clone(),
            name: first_token(&c.name).to_string(),
            likes: c.likes,
            field: c.field_of_activity,
        })
        .collect()
}

/// Distinct fields in order of first appearance.
pub fn unique_fields(rows: &[Character]) -> Vec<FieldOfActivity> {
    count_fields(rows).into_iter().map(|(f, _)| f).collect()
}

pub fn dashboard_metrics(rows: &[Character]) -> DashboardMetrics {
    let total = rows.len() as u64;
    let likes: u64 = rows.iter().map(|c| c.likes as u64).sum();
    let average_likes = if total == 0 {
        0
    } else {
        (likes as f64 / total as f64).round() as u64
    };
    DashboardMetrics {
        total_characters: total,
        most_popular: popularity_ranking(rows, 1).into_iter().next(),
        field_count: unique_fields(rows).len() as u64,
        average_likes,
    }
}

pub fn home_summary(rows: &[Character]) -> HomeSummary {
    let count = |field: FieldOfActivity| {
        rows.iter()
            .filter(|c| c.field_of_activity == field)
            .count() as u64
    };
    HomeSummary {
        total_characters: rows.len() as u64,
        poets: count(FieldOfActivity::Poet),
        philosophers: count(FieldOfActivity::Philosopher),
    }
}

/// Popularity level in percent, one decimal.
pub fn satisfaction(likes: u32) -> f64 {
    round1((likes as f64 / SATISFACTION_SCALE as f64 * 100.0).min(100.0))
}
