use axum::{
    Json,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use deployment::Deployment;
use utils::response::ApiResponse;

use crate::DeploymentImpl;

/// The authenticated identity behind the current request. Inserted by
/// `require_api_auth`; mutation handlers read it for attribution.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub id: String,
}

fn parse_authorization_bearer(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let (prefix, rest) = trimmed.split_once(' ')?;
    if !prefix.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn extract_request_token(req: &Request) -> Option<String> {
    // 1) Authorization: Bearer <token>
    if let Some(value) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_authorization_bearer)
    {
        return Some(value.to_string());
    }

    // 2) X-API-Token: <token>
    if let Some(value) = req
        .headers()
        .get("x-api-token")
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
    {
        return Some(value.to_string());
    }

    None
}

pub async fn require_api_auth(
    State(deployment): State<DeploymentImpl>,
    mut req: Request,
    next: Next,
) -> Response {
    let presented = extract_request_token(&req);

    let user_id = match presented.as_deref() {
        Some(token) => {
            let config = deployment.config().read().await;
            config.user_for_token(token).map(str::to_string)
        }
        None => None,
    };

    let Some(user_id) = user_id else {
        let reason = if presented.is_none() {
            "missing_token"
        } else {
            "token_mismatch"
        };
        tracing::warn!(
            path = %req.uri().path(),
            method = %req.method(),
            reason,
            "Unauthorized API request"
        );

        let response = ApiResponse::<()>::error("Unauthorized");
        return (axum::http::StatusCode::UNAUTHORIZED, Json(response)).into_response();
    };

    req.extensions_mut().insert(AuthUser { id: user_id });
    next.run(req).await
}
