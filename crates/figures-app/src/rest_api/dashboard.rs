//! Read-only aggregates over the current catalogue snapshot.
use figures_dal::{
    character::{Character, CharacterRepository},
    stats::{self, CenturyCount, FieldCount, FieldScope},
};
use figures_types::{
    config::CenturyBands,
    labels::{century_label, unknown_label},
    FieldOfActivity, Labelled, Locale,
};
use serde::{Deserialize, Serialize};

use crate::state::AppState;
use axum::routing::get;

#[derive(Debug, Clone, Default, Deserialize, garde::Validate)]
pub struct DashboardQuery {
    #[garde(length(max = 32))]
    field: Option<String>,
    #[garde(length(max = 8))]
    locale: Option<String>,
}

impl DashboardQuery {
    fn scope(&self) -> Result<FieldScope, figures_types::ParseError> {
        self.field
            .as_deref()
            .map(str::parse)
            .transpose()
            .map(Option::unwrap_or_default)
    }

    fn locale(&self) -> Result<Locale, figures_types::ParseError> {
        self.locale
            .as_deref()
            .map(str::parse)
            .transpose()
            .map(Option::unwrap_or_default)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelledField {
    #[serde(flatten)]
    pub count: FieldCount,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LabelledCentury {
    #[serde(flatten)]
    pub count: CenturyCount,
    pub label: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldOption {
    pub field: FieldOfActivity,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub scope: FieldScope,
    pub locale: Locale,
    pub metrics: stats::DashboardMetrics,
    pub summary: stats::HomeSummary,
    pub fields: Vec<LabelledField>,
    pub centuries: Vec<LabelledCentury>,
    pub popularity: Vec<stats::PopularityEntry>,
    pub field_shares: Vec<stats::FieldShare>,
    pub field_options: Vec<FieldOption>,
}

fn labelled_fields(rows: &[Character], scope: FieldScope, locale: Locale) -> Vec<LabelledField> {
    stats::field_distribution(rows, scope)
        .into_iter()
        .map(|count| LabelledField {
            label: count.field.label(locale),
            count,
        })
        .collect()
}

fn labelled_centuries(
    rows: &[Character],
    bands: &CenturyBands,
    scope: FieldScope,
    locale: Locale,
) -> Vec<LabelledCentury> {
    stats::century_distribution(rows, bands, scope)
        .into_iter()
        .map(|count| LabelledCentury {
            label: match count.century {
                Some(century) => century_label(century, locale),
                None => unknown_label(locale).to_string(),
            },
            count,
        })
        .collect()
}

pub fn build_dashboard(
    rows: &[Character],
    bands: &CenturyBands,
    scope: FieldScope,
    locale: Locale,
) -> Dashboard {
    Dashboard {
        scope,
        locale,
        metrics: stats::dashboard_metrics(rows),
        summary: stats::home_summary(rows),
        fields: labelled_fields(rows, scope, locale),
        centuries: labelled_centuries(rows, bands, scope, locale),
        popularity: stats::popularity_ranking(rows, stats::POPULARITY_TOP),
        field_shares: stats::field_shares(rows),
        field_options: stats::unique_fields(rows)
            .into_iter()
            .map(|field| FieldOption {
                field,
                label: field.label(locale),
            })
            .collect(),
    }
}

mod api {
    use super::*;
    use crate::error::ApiResult;
    use crate::validate::Garde;
    use axum::{
        extract::{Query, State},
        response::IntoResponse,
        Json,
    };
    use http::StatusCode;

    pub async fn dashboard(
        repository: CharacterRepository,
        Garde(Query(query)): Garde<Query<DashboardQuery>>,
        State(state): State<AppState>,
    ) -> ApiResult<impl IntoResponse> {
        let (scope, locale) = (query.scope()?, query.locale()?);
        let snapshot = repository.snapshot().await;
        let dashboard = build_dashboard(&snapshot, &state.config().century_bands, scope, locale);
        Ok((StatusCode::OK, Json(dashboard)))
    }

    pub async fn fields(
        repository: CharacterRepository,
        Garde(Query(query)): Garde<Query<DashboardQuery>>,
    ) -> ApiResult<impl IntoResponse> {
        let (scope, locale) = (query.scope()?, query.locale()?);
        let snapshot = repository.snapshot().await;
        Ok((
            StatusCode::OK,
            Json(labelled_fields(&snapshot, scope, locale)),
        ))
    }

    pub async fn centuries(
        repository: CharacterRepository,
        Garde(Query(query)): Garde<Query<DashboardQuery>>,
        State(state): State<AppState>,
    ) -> ApiResult<impl IntoResponse> {
        let (scope, locale) = (query.scope()?, query.locale()?);
        let snapshot = repository.snapshot().await;
        let centuries =
            labelled_centuries(&snapshot, &state.config().century_bands, scope, locale);
        Ok((StatusCode::OK, Json(centuries)))
    }

    pub async fn popularity(repository: CharacterRepository) -> ApiResult<impl IntoResponse> {
        let snapshot = repository.snapshot().await;
        Ok((
            StatusCode::OK,
            Json(stats::popularity_ranking(&snapshot, stats::POPULARITY_TOP)),
        ))
    }

    pub async fn summary(repository: CharacterRepository) -> ApiResult<impl IntoResponse> {
        let snapshot = repository.snapshot().await;
        Ok((StatusCode::OK, Json(stats::home_summary(&snapshot))))
    }
}

pub fn router() -> axum::Router<AppState> {
    axum::Router::new()
        .route("/", get(api::dashboard))
        .route("/fields", get(api::fields))
        .route("/centuries", get(api::centuries))
        .route("/popularity", get(api::popularity))
        .route("/summary", get(api::summary))
}

#[cfg(test)]
mod tests {
    use super::*;
    use figures_dal::seed::seed_characters;

    #[test]
    fn test_dashboard_labels() {
        let rows = seed_characters();
        let dashboard = build_dashboard(
            &rows,
            &CenturyBands::default(),
            FieldScope::All,
            Locale::En,
        );
        assert_eq!(dashboard.fields[0].label, "Poet");
        assert_eq!(dashboard.centuries[0].label, "10th Century");
        assert_eq!(dashboard.popularity.len(), 5);
        assert_eq!(dashboard.field_options.len(), 4);

        let json = serde_json::to_value(&dashboard).unwrap();
        assert_eq!(json["scope"], "all");
        assert_eq!(json["fields"][0]["fullMark"], 5);
        assert_eq!(json["centuries"][0]["key"], "century10");
    }

    #[test]
    fn test_query_parsing() {
        let query = DashboardQuery {
            field: Some("philosopher".into()),
            locale: Some("fa".into()),
        };
        assert_eq!(
            query.scope().unwrap(),
            FieldScope::Only(FieldOfActivity::Philosopher)
        );
        let rows = seed_characters();
        let dashboard = build_dashboard(
            &rows,
            &CenturyBands::default(),
            query.scope().unwrap(),
            query.locale().unwrap(),
        );
        assert_eq!(dashboard.centuries.len(), 1);
        assert_eq!(dashboard.centuries[0].label, "قرن ۱۰");
        // popularity is never scoped
        assert_eq!(dashboard.popularity.len(), 5);

        let bad = DashboardQuery {
            field: Some("painter".into()),
            locale: None,
        };
        assert!(bad.scope().is_err());
        assert_eq!(DashboardQuery::default().locale().unwrap(), Locale::Fa);
    }
}
