use std::convert::Infallible;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;
use crate::validation::ValidationErrors;

pub const USER_ID_HEADER: &str = "user-id";

/// `Json` whose rejection is a 400 in the API's error shape.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

/// `Query` whose rejection is a 400 in the API's error shape.
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(ApiQuery(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

/// `Path` whose rejection is a 400 in the API's error shape.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(ApiPath(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection.body_text())),
        }
    }
}

/// Optional `user-id` header. Parsing is deferred so a `user_id` in the body
/// can take precedence over a malformed header.
#[derive(Debug)]
pub struct UserIdHeader(Option<Result<i64, String>>);

impl UserIdHeader {
    /// Absent is `Ok(None)`; present but not a positive integer is an error.
    pub fn get(self) -> Result<Option<i64>, ValidationErrors> {
        match self.0 {
            None => Ok(None),
            Some(Ok(id)) => Ok(Some(id)),
            Some(Err(_)) => Err(ValidationErrors::single(
                USER_ID_HEADER,
                "must be a positive integer",
            )),
        }
    }

    /// `body` wins when present; the header is only consulted otherwise.
    pub fn or_body(self, body: Option<i64>) -> Result<Option<i64>, ValidationErrors> {
        match body {
            Some(id) => Ok(Some(id)),
            None => self.get(),
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for UserIdHeader
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let parsed = parts.headers.get(USER_ID_HEADER).map(|raw| {
            let text = raw.to_str().unwrap_or_default();
            text.trim()
                .parse::<i64>()
                .ok()
                .filter(|id| *id > 0)
                .ok_or_else(|| text.to_string())
        });
        Ok(UserIdHeader(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request as HttpRequest;

    async fn header(value: Option<&str>) -> UserIdHeader {
        let mut builder = HttpRequest::builder().uri("/");
        if let Some(v) = value {
            builder = builder.header(USER_ID_HEADER, v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        match UserIdHeader::from_request_parts(&mut parts, &()).await {
            Ok(h) => h,
            Err(never) => match never {},
        }
    }

    #[tokio::test]
    async fn user_id_header_parsing() {
        assert_eq!(header(None).await.get().unwrap(), None);
        assert_eq!(header(Some("12")).await.get().unwrap(), Some(12));
        assert_eq!(header(Some(" 7 ")).await.get().unwrap(), Some(7));

        let err = header(Some("abc")).await.get().unwrap_err();
        assert_eq!(err.to_string(), "user-id: must be a positive integer");
        assert!(header(Some("-3")).await.get().is_err());
    }

    #[tokio::test]
    async fn body_user_id_overrides_malformed_header() {
        assert_eq!(header(Some("abc")).await.or_body(Some(4)).unwrap(), Some(4));
        assert_eq!(header(Some("9")).await.or_body(Some(4)).unwrap(), Some(4));
        assert_eq!(header(Some("9")).await.or_body(None).unwrap(), Some(9));
        assert!(header(Some("abc")).await.or_body(None).is_err());
    }
}
