/// Per-request tenant resolution
///
/// Handlers that read or write company data take [`CurrentTenant`] as an
/// argument. It runs after the JWT layer, resolves the caller's company and
/// leaves the "no company" decision to the handler: reads answer with an
/// empty list, writes call [`CurrentTenant::require`] and get 409.

use crate::{app::AppState, error::{ApiError, ApiResult}};
use axum::{extract::FromRequestParts, http::request::Parts};
use shift_shared::auth::middleware::AuthContext;
use shift_shared::models::company::Company;
use shift_shared::store::Record;
use shift_shared::tenancy::{resolve_tenant, TenantResolution};

#[derive(Debug, Clone)]
pub struct CurrentTenant {
    pub auth: AuthContext,
    pub resolution: TenantResolution,
}

impl CurrentTenant {
    pub fn id(&self) -> Option<&str> {
        self.resolution.tenant_id()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolution.is_resolved()
    }

    /// The company to write into
    pub fn require(&self) -> ApiResult<&Record<Company>> {
        self.resolution.company().ok_or_else(ApiError::no_company)
    }
}

#[axum::async_trait]
impl FromRequestParts<AppState> for CurrentTenant {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = AuthContext::from_request_parts(parts, state).await?;
        let resolution = resolve_tenant(state.store.as_ref(), &auth.user_id).await?;

        Ok(Self { auth, resolution })
    }
}
