use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::response::{IntoResponse, Response};
use garde::{Report, Validate};
use http::request::Parts;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::ops::{Deref, DerefMut};

use crate::error::ApiError;

/// Extractor wrapper that validates the extracted value with garde.
#[derive(Debug, Clone, Copy, Default)]
pub struct Garde<E>(pub E);

impl<E> Deref for Garde<E> {
    type Target = E;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Garde<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E: Display> Display for Garde<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl<E> Garde<E> {
    pub fn into_inner(self) -> E {
        self.0
    }
}

#[derive(Debug)]
pub enum ValidationRejection<V, E> {
    /// Extracted value did not pass validation.
    Valid(V),
    /// Inner extractor failed.
    Inner(E),
}

impl<V: Display, E: Display> Display for ValidationRejection<V, E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationRejection::Valid(errors) => write!(f, "{errors}"),
            ValidationRejection::Inner(error) => write!(f, "{error}"),
        }
    }
}

impl<V: Error + 'static, E: Error + 'static> Error for ValidationRejection<V, E> {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ValidationRejection::Valid(ve) => Some(ve),
            ValidationRejection::Inner(e) => Some(e),
        }
    }
}

pub type GardeRejection<E> = ValidationRejection<Report, E>;

impl<E> From<Report> for GardeRejection<E> {
    fn from(value: Report) -> Self {
        Self::Valid(value)
    }
}

impl<E> From<GardeRejection<E>> for ApiError
where
    E: Into<ApiError>,
{
    fn from(rejection: GardeRejection<E>) -> Self {
        match rejection {
            ValidationRejection::Valid(report) => ApiError::ValidationFailed(report),
            ValidationRejection::Inner(e) => e.into(),
        }
    }
}

impl<E: Into<ApiError>> IntoResponse for GardeRejection<E> {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

impl<S, Extractor, T> FromRequest<S> for Garde<Extractor>
where
    S: Send + Sync,
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequest<S>,
    <Extractor as FromRequest<S>>::Rejection: Into<ApiError>,
{
    type Rejection = GardeRejection<<Extractor as FromRequest<S>>::Rejection>;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request(req, state)
            .await
            .map_err(GardeRejection::Inner)?;

        inner.deref().validate()?;
        Ok(Garde(inner))
    }
}

impl<S, Extractor, T> FromRequestParts<S> for Garde<Extractor>
where
    S: Send + Sync,
    T: Validate<Context = ()>,
    Extractor: Deref<Target = T> + FromRequestParts<S>,
    <Extractor as FromRequestParts<S>>::Rejection: Into<ApiError>,
{
    type Rejection = GardeRejection<<Extractor as FromRequestParts<S>>::Rejection>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let inner = Extractor::from_request_parts(parts, state)
            .await
            .map_err(GardeRejection::Inner)?;

        inner.deref().validate()?;
        Ok(Garde(inner))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use garde::Path;
    use http::StatusCode;

    const GARDE: &str = "garde";

    #[test]
    fn garde_deref_deref_mut_into_inner() {
        let mut inner = String::from(GARDE);
        let mut v = Garde(inner.clone());
        assert_eq!(&inner, v.deref());
        inner.push_str(GARDE);
        v.deref_mut().push_str(GARDE);
        assert_eq!(&inner, v.deref());
        assert_eq!(inner, v.into_inner());
    }

    #[test]
    fn rejection_maps_to_api_error() {
        let mut report = Report::new();
        report.append(Path::empty(), garde::Error::new("length is lower than 2"));
        let s = report.to_string();
        let rejection = GardeRejection::<ApiError>::Valid(report);
        assert_eq!(rejection.to_string(), s);
        let response = rejection.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let rejection =
            GardeRejection::<ApiError>::Inner(ApiError::InvalidQuery("bad".to_string()));
        assert!(matches!(
            ApiError::from(rejection),
            ApiError::InvalidQuery(q) if q == "bad"
        ));
    }
}
