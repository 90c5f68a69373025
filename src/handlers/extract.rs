//! Request extractors that reject with `AppError`, so malformed bodies get the
//! same JSON error envelope as pipeline failures

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        FromRequest, Multipart, Request,
    },
    Json,
};
use serde::de::DeserializeOwned;

use crate::logic::error::PipelineError;
use crate::logic::features::FEATURE_LAYOUT;
use crate::AppError;

/// `Json<T>` with a structured rejection
pub struct ApiJson<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await.map_err(json_rejection)?;
        Ok(Self(value))
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    let detail = rejection.body_text();
    if let JsonRejection::JsonDataError(_) = rejection {
        if let Some(field) = missing_feature(&detail) {
            return PipelineError::MissingFeature { field }.into();
        }
    }
    AppError::BadRequest(detail)
}

/// Canonical field named by serde's "missing field `x`" message
fn missing_feature(detail: &str) -> Option<&'static str> {
    FEATURE_LAYOUT
        .iter()
        .copied()
        .find(|field| detail.contains(&format!("missing field `{}`", field)))
}

/// `Multipart` with a structured rejection
pub struct ApiMultipart(pub Multipart);

#[axum::async_trait]
impl<S> FromRequest<S> for ApiMultipart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        Multipart::from_request(req, state)
            .await
            .map(Self)
            .map_err(|rejection: MultipartRejection| AppError::BadRequest(rejection.body_text()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_feature_from_serde_message() {
        let detail = "Failed to deserialize the JSON body into the target type: \
                      missing field `orbital_period` at line 1 column 44";
        assert_eq!(missing_feature(detail), Some("orbital_period"));
        assert_eq!(missing_feature("missing field `model`"), None);
        assert_eq!(missing_feature("invalid type: string \"x\", expected f64"), None);
    }
}
