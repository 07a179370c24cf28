//! Display strings for enumerated values.
//!
//! Every enumeration maps to its labels through an exhaustive `match`, so adding a
//! variant without labels fails to compile.
use std::{collections::BTreeMap, fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    error::ParseError,
    general::{FieldOfActivity, Gender, ResourceKind, Status},
    utils::to_persian_digits,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fa,
    En,
}

impl Locale {
    pub fn is_rtl(&self) -> bool {
        matches!(self, Locale::Fa)
    }
}

impl Display for Locale {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Locale::Fa => f.write_str("fa"),
            Locale::En => f.write_str("en"),
        }
    }
}

impl FromStr for Locale {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fa" => Ok(Locale::Fa),
            "en" => Ok(Locale::En),
            other => Err(ParseError::unknown("locale", other)),
        }
    }
}

pub trait Labelled {
    fn label(&self, locale: Locale) -> &'static str;
}

impl Labelled for Gender {
    fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Gender::Male, Locale::Fa) => "مرد",
            (Gender::Male, Locale::En) => "Male",
            (Gender::Female, Locale::Fa) => "زن",
            (Gender::Female, Locale::En) => "Female",
        }
    }
}

impl Labelled for FieldOfActivity {
    fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (FieldOfActivity::Poet, Locale::Fa) => "شاعر",
            (FieldOfActivity::Poet, Locale::En) => "Poet",
            (FieldOfActivity::Writer, Locale::Fa) => "نویسنده",
            (FieldOfActivity::Writer, Locale::En) => "Writer",
            (FieldOfActivity::Astronomer, Locale::Fa) => "منجم",
            (FieldOfActivity::Astronomer, Locale::En) => "Astronomer",
            (FieldOfActivity::Philosopher, Locale::Fa) => "فیلسوف",
            (FieldOfActivity::Philosopher, Locale::En) => "Philosopher",
            (FieldOfActivity::Mystic, Locale::Fa) => "عارف",
            (FieldOfActivity::Mystic, Locale::En) => "Mystic",
            (FieldOfActivity::Historian, Locale::Fa) => "مورخ",
            (FieldOfActivity::Historian, Locale::En) => "Historian",
        }
    }
}

impl Labelled for Status {
    fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (Status::Active, Locale::Fa) => "فعال",
            (Status::Active, Locale::En) => "Active",
            (Status::Inactive, Locale::Fa) => "غیرفعال",
            (Status::Inactive, Locale::En) => "Inactive",
        }
    }
}

impl Labelled for ResourceKind {
    fn label(&self, locale: Locale) -> &'static str {
        match (self, locale) {
            (ResourceKind::Text, Locale::Fa) => "فایل‌های متنی",
            (ResourceKind::Text, Locale::En) => "Text Files",
            (ResourceKind::Audio, Locale::Fa) => "فایل‌های صوتی",
            (ResourceKind::Audio, Locale::En) => "Audio Files",
        }
    }
}

pub fn unknown_label(locale: Locale) -> &'static str {
    match locale {
        Locale::Fa => "نامشخص",
        Locale::En => "Unknown",
    }
}

/// Label of an ordinal century, e.g. `10th Century` or `قرن ۱۰`.
pub fn century_label(century: i32, locale: Locale) -> String {
    match locale {
        Locale::Fa => format!("قرن {}", to_persian_digits(&century.to_string())),
        Locale::En => {
            let suffix = match (century.rem_euclid(10), century.rem_euclid(100)) {
                (_, 11..=13) => "th",
                (1, _) => "st",
                (2, _) => "nd",
                (3, _) => "rd",
                _ => "th",
            };
            format!("{century}{suffix} Century")
        }
    }
}

fn labels_of<T>(values: &[T], locale: Locale) -> BTreeMap<String, &'static str>
where
    T: Labelled + Display,
{
    values
        .iter()
        .map(|v| (v.to_string(), v.label(locale)))
        .collect()
}

/// All value labels of one locale, grouped by category.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelTable {
    pub locale: Locale,
    pub rtl: bool,
    pub gender: BTreeMap<String, &'static str>,
    pub field_of_activity: BTreeMap<String, &'static str>,
    pub status: BTreeMap<String, &'static str>,
    pub resource_kind: BTreeMap<String, &'static str>,
    pub unknown: &'static str,
}

impl LabelTable {
    pub fn new(locale: Locale) -> Self {
        LabelTable {
            locale,
            rtl: locale.is_rtl(),
            gender: labels_of(Gender::ALL, locale),
            field_of_activity: labels_of(FieldOfActivity::ALL, locale),
            status: labels_of(Status::ALL, locale),
            resource_kind: labels_of(ResourceKind::ALL, locale),
            unknown: unknown_label(locale),
        }
    }
}
