//! Staff authentication middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::Method;

use crate::auth::{CurrentUser, JwtError, JwtService};
use crate::core::ServerState;
use crate::security_log;
use crate::utils::{AppError, ErrorCode};

/// Customer-facing endpoints reachable without a staff token
const PUBLIC_ROUTES: &[(&str, &str)] = &[
    ("GET", "/api/health"),
    ("GET", "/api/menu"),
    ("POST", "/api/orders"),
    ("GET", "/api/settings"),
    ("POST", "/api/send-otp"),
    ("POST", "/api/verify-otp"),
    ("POST", "/api/customer/register"),
    ("POST", "/api/create-razorpay-order"),
    ("POST", "/api/admin/login"),
];

/// Whether `method path` skips authentication
///
/// Besides [`PUBLIC_ROUTES`]: CORS preflight, non-API paths (left to 404)
/// and order tracking (`GET /api/orders/{id}`).
pub fn is_public_route(method: &Method, path: &str) -> bool {
    if *method == Method::OPTIONS || !path.starts_with("/api/") {
        return true;
    }
    let path = path.trim_end_matches('/');
    if PUBLIC_ROUTES
        .iter()
        .any(|(m, p)| *m == method.as_str() && *p == path)
    {
        return true;
    }
    // order tracking by id or display number
    *method == Method::GET
        && path
            .strip_prefix("/api/orders/")
            .is_some_and(|rest| !rest.is_empty() && !rest.contains('/'))
}

/// Require a valid staff token on every non-public API route.
///
/// Reads `Authorization: Bearer <token>` and inserts [`CurrentUser`] into the
/// request extensions.
///
/// | Failure | Response |
/// |---------|----------|
/// | no header | 401 NotAuthenticated |
/// | expired token | 401 TokenExpired |
/// | non-admin role | 403 PermissionDenied |
/// | anything else | 401 TokenInvalid |
pub async fn require_staff(
    State(state): State<ServerState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_route(req.method(), req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let token = match auth_header {
        Some(header) => JwtService::extract_from_header(header)
            .ok_or_else(|| AppError::invalid_token("Invalid authorization header"))?,
        None => {
            security_log!(WARN, "auth_missing", uri = %req.uri());
            return Err(AppError::not_authenticated());
        }
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            let user = CurrentUser::from(claims);
            if !user.is_admin() {
                security_log!(WARN, "role_denied", user = %user.email, role = %user.role);
                return Err(AppError::new(ErrorCode::PermissionDenied));
            }
            req.extensions_mut().insert(user);
            Ok(next.run(req).await)
        }
        Err(e) => {
            security_log!(WARN, "auth_failed", error = %e, uri = %req.uri());
            match e {
                JwtError::ExpiredToken => Err(AppError::token_expired()),
                _ => Err(AppError::invalid_token("Invalid token")),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_routes() {
        assert!(is_public_route(&Method::GET, "/api/menu"));
        assert!(is_public_route(&Method::POST, "/api/orders"));
        assert!(is_public_route(&Method::GET, "/api/orders/17"));
        assert!(is_public_route(&Method::OPTIONS, "/api/menu"));
        assert!(is_public_route(&Method::GET, "/index.html"));
    }

    #[test]
    fn test_staff_routes() {
        assert!(!is_public_route(&Method::GET, "/api/menu/all"));
        assert!(!is_public_route(&Method::POST, "/api/menu"));
        assert!(!is_public_route(&Method::GET, "/api/orders"));
        assert!(!is_public_route(&Method::PUT, "/api/orders/17/status"));
        assert!(!is_public_route(&Method::POST, "/api/orders/walk-in"));
        assert!(!is_public_route(&Method::PUT, "/api/settings"));
        assert!(!is_public_route(&Method::GET, "/api/analytics"));
    }
}
