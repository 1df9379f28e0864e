//! Repository for the `creator_projects` table.

use cgk_core::creator_project::EDITABLE_STATUSES;
use cgk_core::types::DbId;
use sqlx::PgPool;

use crate::models::creator_project::{
    CreateCreatorProject, CreatorProject, CreatorProjectFilter, UpdateCreatorProject,
};

const COLUMNS: &str = "id, tenant_slug, creator_id, title, description, status, budget_cents, \
                        due_date, revision_note, submitted_at, approved_at, completed_at, \
                        created_at, updated_at";

/// Provides CRUD and status transitions for creator projects.
pub struct CreatorProjectRepo;

impl CreatorProjectRepo {
    /// Insert a new project in `draft`.
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        input: &CreateCreatorProject,
    ) -> Result<CreatorProject, sqlx::Error> {
        let query = format!(
            "INSERT INTO creator_projects (tenant_slug, creator_id, title, description, budget_cents, due_date)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CreatorProject>(&query)
            .bind(tenant_slug)
            .bind(input.creator_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget_cents.unwrap_or(0))
            .bind(input.due_date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<CreatorProject>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM creator_projects WHERE tenant_slug = $1 AND id = $2");
        sqlx::query_as::<_, CreatorProject>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List projects matching the filter, newest first.
    pub async fn list(
        pool: &PgPool,
        tenant_slug: &str,
        filter: &CreatorProjectFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<CreatorProject>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM creator_projects
             WHERE tenant_slug = $1
               AND ($2::BIGINT IS NULL OR creator_id = $2)
               AND ($3::TEXT IS NULL OR status = $3)
             ORDER BY created_at DESC, id DESC
             LIMIT $4 OFFSET $5"
        );
        sqlx::query_as::<_, CreatorProject>(&query)
            .bind(tenant_slug)
            .bind(filter.creator_id)
            .bind(&filter.status)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Edit project content. Returns `None` if the project is missing or
    /// no longer in an editable status.
    pub async fn update(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        input: &UpdateCreatorProject,
    ) -> Result<Option<CreatorProject>, sqlx::Error> {
        let query = format!(
            "UPDATE creator_projects SET
                title = COALESCE($3, title),
                description = COALESCE($4, description),
                budget_cents = COALESCE($5, budget_cents),
                due_date = COALESCE($6, due_date)
             WHERE tenant_slug = $1 AND id = $2 AND status = ANY($7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CreatorProject>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.budget_cents)
            .bind(input.due_date)
            .bind(EDITABLE_STATUSES)
            .fetch_optional(pool)
            .await
    }

    /// Move a project to `to` if its current status is one of `from`.
    ///
    /// Entering `submitted`, `approved` or `completed` stamps the matching
    /// timestamp. `revision_note` is stored when given and cleared on
    /// resubmission.
    pub async fn transition(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        from: &[&str],
        to: &str,
        revision_note: Option<&str>,
    ) -> Result<Option<CreatorProject>, sqlx::Error> {
        let query = format!(
            "UPDATE creator_projects SET
                status = $3,
                revision_note = CASE
                    WHEN $3 = 'revision_requested' THEN $5
                    WHEN $3 = 'submitted' THEN NULL
                    ELSE revision_note END,
                submitted_at = CASE WHEN $3 = 'submitted' THEN NOW() ELSE submitted_at END,
                approved_at = CASE WHEN $3 = 'approved' THEN NOW() ELSE approved_at END,
                completed_at = CASE WHEN $3 = 'completed' THEN NOW() ELSE completed_at END
             WHERE tenant_slug = $1 AND id = $2 AND status = ANY($4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CreatorProject>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(to)
            .bind(from)
            .bind(revision_note)
            .fetch_optional(pool)
            .await
    }
}
