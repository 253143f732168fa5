//! JWT validation and role gating.
//!
//! Token issuance (login, refresh, password management) lives in an external
//! identity service; this module only validates bearer tokens it issued and
//! enforces role requirements on routers.

use axum::{
    body::Body,
    extract::{FromRequestParts, State},
    http::{header, request::Parts, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Claims carried by tokens from the identity service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    pub exp: usize,
    pub iat: usize,
}

/// Authenticated caller, inserted into request extensions by
/// [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub roles: Vec<String>,
}

impl AuthUser {
    /// Admins implicitly hold every role.
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role || r == "admin")
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Missing authentication")]
    MissingAuth,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token has expired")]
    ExpiredToken,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = match &self {
            Self::MissingAuth => (StatusCode::UNAUTHORIZED, "AUTH_MISSING"),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "AUTH_INVALID_TOKEN"),
            Self::ExpiredToken => (StatusCode::UNAUTHORIZED, "AUTH_TOKEN_EXPIRED"),
            Self::InsufficientPermissions => (StatusCode::FORBIDDEN, "AUTH_INSUFFICIENT_PERMISSIONS"),
        };

        let body = Json(serde_json::json!({
            "error": {
                "code": code,
                "message": self.to_string(),
            }
        }));

        (status, body).into_response()
    }
}

/// Stateless token verifier shared through request extensions.
pub struct AuthVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl AuthVerifier {
    pub fn new(jwt_secret: &str) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(jwt_secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::ExpiredToken,
                _ => AuthError::InvalidToken,
            })
    }
}

/// Requires a valid bearer token and stores the caller in extensions.
pub async fn auth_middleware(mut req: Request<Body>, next: Next) -> Response {
    let verifier = match req.extensions().get::<Arc<AuthVerifier>>() {
        Some(v) => v.clone(),
        None => return AuthError::MissingAuth.into_response(),
    };

    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim);

    let token = match token {
        Some(t) if !t.is_empty() => t,
        _ => return AuthError::MissingAuth.into_response(),
    };

    match verifier.validate_token(token) {
        Ok(claims) => {
            let user = AuthUser {
                user_id: claims.sub,
                name: claims.name,
                email: claims.email,
                roles: claims.roles,
            };
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}

/// Requires the authenticated caller to hold `role` (admins always pass).
/// Must run after [`auth_middleware`].
pub async fn role_middleware(
    State(role): State<String>,
    req: Request<Body>,
    next: Next,
) -> Response {
    match req.extensions().get::<AuthUser>() {
        Some(user) if user.has_role(&role) => next.run(req).await,
        Some(_) => AuthError::InsufficientPermissions.into_response(),
        None => AuthError::MissingAuth.into_response(),
    }
}

/// Extractor for handlers that need the caller's identity.
pub type AuthenticatedUser = AuthUser;

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .ok_or(AuthError::MissingAuth)
    }
}

/// Extension methods for Router to add auth middleware.
pub trait AuthRouterExt {
    fn with_auth(self) -> Self;
    fn with_role(self, role: &str) -> Self;
}

impl<S> AuthRouterExt for axum::Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn with_auth(self) -> Self {
        self.layer(axum::middleware::from_fn(auth_middleware))
    }

    fn with_role(self, role: &str) -> Self {
        self.layer(axum::middleware::from_fn_with_state(
            role.to_string(),
            role_middleware,
        ))
        .with_auth()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token_for(secret: &str, roles: &[&str], exp_offset: i64) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = Claims {
            sub: "user-1".into(),
            name: Some("Test".into()),
            email: None,
            roles: roles.iter().map(|r| r.to_string()).collect(),
            exp: (now + exp_offset) as usize,
            iat: now as usize,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn valid_token_round_trips() {
        let secret = "0123456789abcdef0123456789abcdef";
        let verifier = AuthVerifier::new(secret);
        let claims = verifier
            .validate_token(&token_for(secret, &["admin"], 3600))
            .unwrap();
        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.roles, vec!["admin"]);
    }

    #[test]
    fn expired_token_is_rejected() {
        let secret = "0123456789abcdef0123456789abcdef";
        let verifier = AuthVerifier::new(secret);
        let err = verifier
            .validate_token(&token_for(secret, &[], -3600))
            .unwrap_err();
        assert!(matches!(err, AuthError::ExpiredToken));
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let verifier = AuthVerifier::new("0123456789abcdef0123456789abcdef");
        let err = verifier
            .validate_token(&token_for("another_secret_another_secret_xx", &[], 3600))
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidToken));
    }

    #[test]
    fn admin_implies_every_role() {
        let user = AuthUser {
            user_id: "u".into(),
            name: None,
            email: None,
            roles: vec!["admin".into()],
        };
        assert!(user.has_role("staff"));
        assert!(user.has_role("admin"));

        let member = AuthUser {
            user_id: "m".into(),
            name: None,
            email: None,
            roles: vec!["member".into()],
        };
        assert!(!member.has_role("staff"));
    }
}
