use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};

/// Caller identity for booking routes.
///
/// Authentication itself lives in front of this service; by the time a
/// request gets here the user id rides in the `x-user-id` header and this
/// extractor only lifts it out.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or(StatusCode::UNAUTHORIZED)?;

        Ok(AuthUser {
            user_id: user_id.to_string(),
        })
    }
}
