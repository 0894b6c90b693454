/// Authentication endpoints
///
/// - `POST /v1/auth/signup` - create an account and its company
/// - `POST /v1/auth/login` - exchange credentials for tokens
/// - `POST /v1/auth/refresh` - exchange a refresh token for an access token

use crate::{
    app::AppState,
    error::{ApiError, ApiResult},
};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use shift_shared::{
    auth::{jwt, password},
    models::{
        company::{Company, CompanyPlan, CreateCompany},
        user::{CreateUser, User, UserProfile},
    },
    store::Record,
    tenancy::resolve_tenant,
};
use tracing::info;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    /// Strength is checked separately
    pub password: String,

    #[validate(length(min = 1, max = 100, message = "Please enter your name."))]
    pub display_name: String,

    #[validate(length(min = 2, max = 100, message = "Company name must be at least 2 characters."))]
    pub company_name: String,

    #[serde(default)]
    pub org_number: Option<String>,

    #[serde(default)]
    pub industry: Option<String>,

    #[serde(default)]
    pub employee_count: Option<String>,

    #[serde(default)]
    pub phone: Option<String>,

    #[serde(default)]
    pub plan: CompanyPlan,
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Please enter a valid email address."))]
    pub email: String,

    pub password: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: UserProfile,

    /// Set on signup; on login the company is resolved per request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,

    pub access_token: String,
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshResponse {
    pub access_token: String,
}

fn issue_tokens(user: &Record<User>, secret: &str) -> ApiResult<(String, String)> {
    let name = &user.data.display_name;
    let access = jwt::create_token(&jwt::Claims::new(&user.id, name, jwt::TokenType::Access), secret)?;
    let refresh = jwt::create_token(&jwt::Claims::new(&user.id, name, jwt::TokenType::Refresh), secret)?;
    Ok((access, refresh))
}

/// Argon2 is deliberately slow; keep it off the async workers
async fn hash_blocking(plain: String) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || password::hash_password(&plain))
        .await
        .map_err(|e| ApiError::InternalError(format!("Hashing task failed: {}", e)))?
        .map_err(ApiError::from)
}

async fn verify_blocking(plain: String, hash: String) -> ApiResult<bool> {
    tokio::task::spawn_blocking(move || password::verify_password(&plain, &hash))
        .await
        .map_err(|e| ApiError::InternalError(format!("Verification task failed: {}", e)))?
        .map_err(ApiError::from)
}

/// Creates a user and the company they own
///
/// # Errors
///
/// - `422 Unprocessable Entity`: validation failed
/// - `409 Conflict`: email already registered
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    req.validate()?;
    password::validate_password_strength(&req.password)
        .map_err(|message| ApiError::invalid_field("password", message))?;

    let password_hash = hash_blocking(req.password).await?;

    // No multi-document transactions: a failure below leaves a user without a
    // company, which resolves as "no company" until they create one.
    let user = User::create(
        state.store.as_ref(),
        CreateUser {
            email: req.email,
            password_hash,
            display_name: req.display_name,
        },
    )
    .await?;

    let company = Company::create(
        state.store.as_ref(),
        CreateCompany {
            name: req.company_name,
            owner_uid: user.id.clone(),
            plan: req.plan,
            org_number: req.org_number,
            industry: req.industry,
            employee_count: req.employee_count,
            phone: req.phone,
        },
    )
    .await?;

    let (access_token, refresh_token) = issue_tokens(&user, state.jwt_secret())?;
    info!(user_id = %user.id, company_id = %company.id, "Signed up");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: UserProfile::from(&user),
            company_id: Some(company.id),
            access_token,
            refresh_token,
        }),
    ))
}

/// Authenticates with email and password
///
/// # Errors
///
/// - `401 Unauthorized`: unknown email or wrong password, indistinguishably
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    req.validate()?;

    let invalid = || ApiError::Unauthorized("Invalid email or password".to_string());

    let user = User::find_by_email(state.store.as_ref(), &req.email)
        .await?
        .ok_or_else(invalid)?;

    if !verify_blocking(req.password, user.data.password_hash.clone()).await? {
        return Err(invalid());
    }

    User::update_last_login(state.store.as_ref(), &user.id).await?;
    let tenant = resolve_tenant(state.store.as_ref(), &user.id).await?;

    let (access_token, refresh_token) = issue_tokens(&user, state.jwt_secret())?;
    info!(user_id = %user.id, tenant_id = ?tenant.tenant_id(), "Logged in");

    Ok(Json(AuthResponse {
        user: UserProfile::from(&user),
        company_id: tenant.tenant_id().map(str::to_string),
        access_token,
        refresh_token,
    }))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> ApiResult<Json<RefreshResponse>> {
    let access_token = jwt::refresh_access_token(&req.refresh_token, state.jwt_secret())?;
    Ok(Json(RefreshResponse { access_token }))
}
