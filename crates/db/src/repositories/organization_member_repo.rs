//! Repository for the `organization_members` table.
//!
//! Membership rows are never deleted: leaving sets `left_at`, rejoining
//! clears it. Role changes and leaves that would strand an organization
//! without an OWNER are refused.

use omm_core::types::DbId;
use sqlx::PgPool;

use crate::models::organization::{OrgRole, OrganizationMember};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, organization_id, user_id, role, joined_at, left_at, created_at, updated_at";

/// Outcome of a membership mutation that carries domain rules.
#[derive(Debug)]
pub enum MembershipChange {
    /// The mutation was applied; the fresh row is attached.
    Applied(OrganizationMember),
    /// The user has no active membership in the organization.
    NotMember,
    /// Refused: the user is the organization's only OWNER.
    SoleOwner,
}

/// Provides membership operations for organizations.
pub struct OrganizationMemberRepo;

impl OrganizationMemberRepo {
    /// Find a user's active membership in an organization.
    pub async fn find_active(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<Option<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organization_members
             WHERE organization_id = $1 AND user_id = $2 AND left_at IS NULL"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List an organization's active members, earliest joiner first.
    pub async fn list_active(
        pool: &PgPool,
        organization_id: DbId,
    ) -> Result<Vec<OrganizationMember>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM organization_members
             WHERE organization_id = $1 AND left_at IS NULL
             ORDER BY joined_at ASC"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .fetch_all(pool)
            .await
    }

    /// Join an organization as MEMBER.
    ///
    /// Idempotent for active members (the existing row is returned
    /// unchanged). A returning ex-member gets their row reactivated with a
    /// fresh `joined_at` and the role reset to MEMBER.
    pub async fn join(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<OrganizationMember, sqlx::Error> {
        let query = format!(
            "INSERT INTO organization_members (organization_id, user_id, role)
             VALUES ($1, $2, 'MEMBER')
             ON CONFLICT ON CONSTRAINT uq_organization_members_org_user DO UPDATE SET
                left_at = NULL,
                role = CASE WHEN organization_members.left_at IS NULL
                            THEN organization_members.role ELSE 'MEMBER'::org_role END,
                joined_at = CASE WHEN organization_members.left_at IS NULL
                                 THEN organization_members.joined_at ELSE NOW() END
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, OrganizationMember>(&query)
            .bind(organization_id)
            .bind(user_id)
            .fetch_one(pool)
            .await
    }

    /// Leave an organization (sets `left_at`).
    ///
    /// Refused for the sole remaining OWNER -- an organization must always
    /// have one. The membership row is locked for the owner-count check so
    /// two concurrent owner leaves cannot both succeed.
    pub async fn leave(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<MembershipChange, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let member_query = format!(
            "SELECT {COLUMNS} FROM organization_members
             WHERE organization_id = $1 AND user_id = $2 AND left_at IS NULL
             FOR UPDATE"
        );
        let member = sqlx::query_as::<_, OrganizationMember>(&member_query)
            .bind(organization_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(member) = member else {
            return Ok(MembershipChange::NotMember);
        };

        if member.role == OrgRole::Owner
            && Self::other_owner_count(&mut tx, organization_id, user_id).await? == 0
        {
            return Ok(MembershipChange::SoleOwner);
        }

        let update_query = format!(
            "UPDATE organization_members SET left_at = NOW()
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, OrganizationMember>(&update_query)
            .bind(member.id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(MembershipChange::Applied(updated))
    }

    /// Change an active member's role.
    ///
    /// Demoting the sole OWNER is refused for the same reason as
    /// [`Self::leave`].
    pub async fn set_role(
        pool: &PgPool,
        organization_id: DbId,
        user_id: DbId,
        role: OrgRole,
    ) -> Result<MembershipChange, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let member_query = format!(
            "SELECT {COLUMNS} FROM organization_members
             WHERE organization_id = $1 AND user_id = $2 AND left_at IS NULL
             FOR UPDATE"
        );
        let member = sqlx::query_as::<_, OrganizationMember>(&member_query)
            .bind(organization_id)
            .bind(user_id)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(member) = member else {
            return Ok(MembershipChange::NotMember);
        };

        if member.role == OrgRole::Owner
            && role != OrgRole::Owner
            && Self::other_owner_count(&mut tx, organization_id, user_id).await? == 0
        {
            return Ok(MembershipChange::SoleOwner);
        }

        let update_query = format!(
            "UPDATE organization_members SET role = $2
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let updated = sqlx::query_as::<_, OrganizationMember>(&update_query)
            .bind(member.id)
            .bind(role)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(MembershipChange::Applied(updated))
    }

    async fn other_owner_count(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        organization_id: DbId,
        user_id: DbId,
    ) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM organization_members
             WHERE organization_id = $1 AND user_id <> $2
               AND role = 'OWNER' AND left_at IS NULL",
        )
        .bind(organization_id)
        .bind(user_id)
        .fetch_one(&mut **tx)
        .await?;
        Ok(count)
    }
}
