//! Authentication extractors and routes

use axum::{
    extract::{FromRef, FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    routing::post,
    Form, Json, Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::{debug, info};

use learnhub_auth::{hash_password, meets_policy, role_of, scopes_of, verify_password, AuthError};
use learnhub_db::{NewUser, User};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginForm, MessageResponse, SignupRequest, TokenResponse, UserResponse};

/// Cookie carrying the access token
pub const ACCESS_COOKIE: &str = "access_token";
/// Cookie carrying the refresh token
pub const REFRESH_COOKIE: &str = "refresh_token";

// ==================== Auth Extractors ====================

/// Extractor for an authenticated, active user (required)
pub struct RequireUser(pub User);

impl<S> FromRequestParts<S> for RequireUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token =
            token_from_parts(parts).ok_or(ApiError::Auth(AuthError::Unauthenticated))?;
        let user = app_state.gate.authenticate(&token, &[]).await?;

        debug!("Authenticated user: {}", user.email);
        Ok(RequireUser(user))
    }
}

/// Extractor for an admin user (required)
pub struct RequireAdmin(pub User);

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);

        let token =
            token_from_parts(parts).ok_or(ApiError::Auth(AuthError::Unauthenticated))?;
        let user = app_state.gate.authenticate(&token, &["users:write"]).await?;
        app_state.gate.require_admin(&user)?;

        Ok(RequireAdmin(user))
    }
}

/// Pull a bearer token from the Authorization header or the access cookie
fn token_from_parts(parts: &Parts) -> Option<String> {
    if let Some(header) = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
    {
        return Some(header.to_string());
    }

    CookieJar::from_headers(&parts.headers)
        .get(ACCESS_COOKIE)
        .map(|c| c.value().to_string())
}

// ==================== Cookies ====================

/// Build an http-only auth cookie scoped to the whole site
fn auth_cookie(name: &'static str, value: String, max_age_seconds: i64) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, value);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(time::Duration::seconds(max_age_seconds));
    cookie
}

/// Cookie used to clear one of the auth cookies
fn clear_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::new(name, "");
    cookie.set_path("/");
    cookie
}

/// Set both auth cookies on a jar
fn with_token_cookies(
    jar: CookieJar,
    state: &AppState,
    access_token: &str,
    refresh_token: &str,
) -> CookieJar {
    jar.add(auth_cookie(
        ACCESS_COOKIE,
        access_token.to_string(),
        state.tokens.access_ttl_seconds(),
    ))
    .add(auth_cookie(
        REFRESH_COOKIE,
        refresh_token.to_string(),
        state.tokens.refresh_ttl_seconds(),
    ))
}

// ==================== Input Validation ====================

/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;

/// Validate email shape and length
fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::BadRequest("Email cannot be empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(ApiError::BadRequest("Invalid email address".to_string())),
    }
}

fn validate_password_length(password: &str) -> Result<(), ApiError> {
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== Auth Routes ====================

/// POST /api/auth/signup
async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_email(&request.email)?;
    validate_password_length(&request.password)?;

    if request.password != request.password_confirm {
        return Err(ApiError::BadRequest("Passwords do not match".to_string()));
    }

    if !meets_policy(&request.password) {
        return Err(ApiError::BadRequest(
            "Password must be at least 8 characters and include an uppercase letter, \
             a digit, and a special character"
                .to_string(),
        ));
    }

    if state.db.get_user_by_email(&request.email).await?.is_some() {
        return Err(ApiError::BadRequest("Email already registered".to_string()));
    }

    let hashed_password = hash_password(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            email: request.email,
            hashed_password,
            is_admin: false,
        })
        .await
        .map_err(|e| match e {
            learnhub_db::DbError::Duplicate(_) => {
                ApiError::BadRequest("Email already registered".to_string())
            }
            e => e.into(),
        })?;

    info!("Registered user: {}", user.email);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login
async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    validate_password_length(&form.password)?;

    debug!("Login attempt for user: {}", form.username);

    // Find user - but don't return early to prevent timing attacks
    let user_result = state.db.get_user_by_email(&form.username).await?;

    // Verify password - always perform verification to prevent timing attacks.
    // The dummy hash is a valid argon2 hash that will always fail verification.
    const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

    let (hash_to_verify, user) = match user_result {
        Some(u) => (u.hashed_password.clone(), Some(u)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = verify_password(&form.password, &hash_to_verify)?;

    let user = match (user, password_valid) {
        (Some(u), true) => u,
        _ => return Err(ApiError::Auth(AuthError::InvalidCredentials)),
    };

    if !user.is_active {
        return Err(ApiError::BadRequest("Inactive user".to_string()));
    }

    let scopes = scopes_of(role_of(&user));
    let access_token = state
        .tokens
        .issue_access(user.id, &user.email, scopes)
        .map_err(AuthError::from)?;
    let refresh_token = state
        .tokens
        .issue_refresh(user.id, &user.email)
        .map_err(AuthError::from)?;

    state.db.touch_last_login(user.id).await?;

    info!("User {} logged in successfully", user.email);

    let jar = with_token_cookies(jar, &state, &access_token, &refresh_token);

    Ok((
        jar,
        Json(TokenResponse {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: state.tokens.access_ttl_seconds(),
        }),
    ))
}

/// POST /api/auth/refresh
async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<TokenResponse>), ApiError> {
    let refresh_token = jar
        .get(REFRESH_COOKIE)
        .map(|c| c.value().to_string())
        .ok_or(ApiError::Auth(AuthError::Unauthenticated))?;

    // Any refresh failure short of an internal error reads as 401: the
    // client's only recourse is a fresh login either way.
    let pair = state.gate.refresh(&refresh_token).await.map_err(|e| match e {
        AuthError::Db(e) => ApiError::Database(e),
        _ => ApiError::Auth(AuthError::Unauthenticated),
    })?;

    let jar = with_token_cookies(jar, &state, &pair.access_token, &pair.refresh_token);

    Ok((
        jar,
        Json(TokenResponse {
            access_token: pair.access_token,
            token_type: "bearer".to_string(),
            expires_in: state.tokens.access_ttl_seconds(),
        }),
    ))
}

/// POST /api/auth/logout
async fn logout(jar: CookieJar) -> (CookieJar, Json<MessageResponse>) {
    let jar = jar
        .remove(clear_cookie(ACCESS_COOKIE))
        .remove(clear_cookie(REFRESH_COOKIE));

    (
        jar,
        Json(MessageResponse {
            message: "Successfully logged out".to_string(),
        }),
    )
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/signup", post(signup))
        .route("/api/auth/login", post(login))
        .route("/api/auth/refresh", post(refresh))
        .route("/api/auth/logout", post(logout))
}
