//! Handlers for the `/organizations` resource and its memberships.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use omm_core::error::CoreError;
use omm_core::types::DbId;
use omm_db::models::organization::{
    CreateOrganization, Organization, OrganizationMember, OrgRole, UpdateOrganization,
};
use omm_db::repositories::{MembershipChange, OrganizationMemberRepo, OrganizationRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::identity::CurrentUser;
use crate::state::AppState;

/// Request body for a role change.
#[derive(Debug, Deserialize)]
pub struct RoleRequest {
    pub role: OrgRole,
}

/// POST /api/v1/organizations
///
/// The creator is enrolled as OWNER in the same transaction.
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(mut input): Json<CreateOrganization>,
) -> AppResult<(StatusCode, Json<Organization>)> {
    if input.name.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Organization name must not be empty".to_string(),
        ));
    }

    input.created_by_id = user.id;
    let organization = OrganizationRepo::create_with_owner(&state.pool, &input).await?;
    Ok((StatusCode::CREATED, Json(organization)))
}

/// GET /api/v1/organizations
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Organization>>> {
    let organizations = OrganizationRepo::list(&state.pool).await?;
    Ok(Json(organizations))
}

/// GET /api/v1/organizations/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Organization>> {
    let organization = OrganizationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id,
        }))?;
    Ok(Json(organization))
}

/// PUT /api/v1/organizations/{id}
///
/// OWNER/ADMIN members only.
pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateOrganization>,
) -> AppResult<Json<Organization>> {
    require_manager(&state, id, user).await?;

    let organization = OrganizationRepo::update(&state.pool, id, &input)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id,
        }))?;
    Ok(Json(organization))
}

/// DELETE /api/v1/organizations/{id}
///
/// OWNER members only.
pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    let membership = OrganizationMemberRepo::find_active(&state.pool, id, user.id).await?;
    if !matches!(membership.map(|m| m.role), Some(OrgRole::Owner)) {
        return Err(AppError::Core(CoreError::Forbidden(
            "Only an owner may delete an organization".to_string(),
        )));
    }

    let deleted = OrganizationRepo::soft_delete(&state.pool, id).await?;
    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id,
        }))
    }
}

/// GET /api/v1/organizations/{id}/members
pub async fn list_members(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<OrganizationMember>>> {
    ensure_exists(&state, id).await?;
    let members = OrganizationMemberRepo::list_active(&state.pool, id).await?;
    Ok(Json(members))
}

/// POST /api/v1/organizations/{id}/members
///
/// Join as MEMBER. Idempotent for active members; a returning ex-member is
/// reactivated.
pub async fn join(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<(StatusCode, Json<OrganizationMember>)> {
    ensure_exists(&state, id).await?;
    let member = OrganizationMemberRepo::join(&state.pool, id, user.id).await?;
    Ok((StatusCode::CREATED, Json(member)))
}

/// DELETE /api/v1/organizations/{id}/members
///
/// Leave. Refused for the sole remaining OWNER.
pub async fn leave(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    ensure_exists(&state, id).await?;
    match OrganizationMemberRepo::leave(&state.pool, id, user.id).await? {
        MembershipChange::Applied(_) => Ok(StatusCode::NO_CONTENT),
        MembershipChange::NotMember => Err(AppError::Core(CoreError::NotFound {
            entity: "OrganizationMember",
            id: user.id,
        })),
        MembershipChange::SoleOwner => Err(AppError::Core(CoreError::Validation(
            "An organization must keep at least one owner".to_string(),
        ))),
    }
}

/// PUT /api/v1/organizations/{id}/members/{user_id}
///
/// Change a member's role. OWNER/ADMIN members only.
pub async fn set_role(
    State(state): State<AppState>,
    user: CurrentUser,
    Path((id, target_user_id)): Path<(DbId, DbId)>,
    Json(input): Json<RoleRequest>,
) -> AppResult<Json<OrganizationMember>> {
    require_manager(&state, id, user).await?;

    match OrganizationMemberRepo::set_role(&state.pool, id, target_user_id, input.role).await? {
        MembershipChange::Applied(member) => Ok(Json(member)),
        MembershipChange::NotMember => Err(AppError::Core(CoreError::NotFound {
            entity: "OrganizationMember",
            id: target_user_id,
        })),
        MembershipChange::SoleOwner => Err(AppError::Core(CoreError::Validation(
            "An organization must keep at least one owner".to_string(),
        ))),
    }
}

// ---------------------------------------------------------------------------
// Guards
// ---------------------------------------------------------------------------

async fn ensure_exists(state: &AppState, id: DbId) -> AppResult<()> {
    OrganizationRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Organization",
            id,
        }))?;
    Ok(())
}

/// Require an active OWNER/ADMIN membership for the acting user.
async fn require_manager(state: &AppState, id: DbId, user: CurrentUser) -> AppResult<()> {
    ensure_exists(state, id).await?;
    let membership = OrganizationMemberRepo::find_active(&state.pool, id, user.id).await?;
    match membership {
        Some(member) if member.role.can_manage() => Ok(()),
        _ => Err(AppError::Core(CoreError::Forbidden(
            "Requires an owner or admin role in this organization".to_string(),
        ))),
    }
}
