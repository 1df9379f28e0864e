//! Repositories for AI agents and their relationships with people.

use cgk_core::familiarity;
use cgk_core::types::DbId;
use sqlx::PgPool;

use crate::models::ai_agent::{AgentRelationship, AiAgent, CreateAiAgent, RecordInteraction, UpdateAiAgent};

const AGENT_COLUMNS: &str = "id, tenant_slug, name, persona, is_active, created_at, updated_at";

const RELATIONSHIP_COLUMNS: &str = "id, tenant_slug, agent_id, person_type, person_ref, \
                                     interaction_count, total_conversation_minutes, \
                                     last_interaction_at, familiarity_score, notes, \
                                     created_at, updated_at";

pub struct AiAgentRepo;

impl AiAgentRepo {
    pub async fn create(
        pool: &PgPool,
        tenant_slug: &str,
        input: &CreateAiAgent,
    ) -> Result<AiAgent, sqlx::Error> {
        let query = format!(
            "INSERT INTO ai_agents (tenant_slug, name, persona)
             VALUES ($1, $2, $3)
             RETURNING {AGENT_COLUMNS}"
        );
        sqlx::query_as::<_, AiAgent>(&query)
            .bind(tenant_slug)
            .bind(&input.name)
            .bind(&input.persona)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
    ) -> Result<Option<AiAgent>, sqlx::Error> {
        let query =
            format!("SELECT {AGENT_COLUMNS} FROM ai_agents WHERE tenant_slug = $1 AND id = $2");
        sqlx::query_as::<_, AiAgent>(&query)
            .bind(tenant_slug)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn list(pool: &PgPool, tenant_slug: &str) -> Result<Vec<AiAgent>, sqlx::Error> {
        let query = format!(
            "SELECT {AGENT_COLUMNS} FROM ai_agents WHERE tenant_slug = $1 ORDER BY name ASC"
        );
        sqlx::query_as::<_, AiAgent>(&query)
            .bind(tenant_slug)
            .fetch_all(pool)
            .await
    }

    pub async fn update(
        pool: &PgPool,
        tenant_slug: &str,
        id: DbId,
        input: &UpdateAiAgent,
    ) -> Result<Option<AiAgent>, sqlx::Error> {
        let query = format!(
            "UPDATE ai_agents SET
                name = COALESCE($3, name),
                persona = COALESCE($4, persona),
                is_active = COALESCE($5, is_active)
             WHERE tenant_slug = $1 AND id = $2
             RETURNING {AGENT_COLUMNS}"
        );
        sqlx::query_as::<_, AiAgent>(&query)
            .bind(tenant_slug)
            .bind(id)
            .bind(&input.name)
            .bind(&input.persona)
            .bind(input.is_active)
            .fetch_optional(pool)
            .await
    }
}

/// Agent-to-person relationships and their familiarity scores.
pub struct AgentRelationshipRepo;

impl AgentRelationshipRepo {
    /// Record one interaction, creating the relationship on first contact.
    ///
    /// The counters and the familiarity score are updated in the same
    /// statement, so concurrent interactions never lose an increment.
    pub async fn record_interaction(
        pool: &PgPool,
        tenant_slug: &str,
        agent_id: DbId,
        input: &RecordInteraction,
    ) -> Result<AgentRelationship, sqlx::Error> {
        let insert_score = familiarity::score_sql("1", "$5::DOUBLE PRECISION", "NOW()");
        let update_score = familiarity::score_sql(
            "agent_relationships.interaction_count + 1",
            "agent_relationships.total_conversation_minutes + EXCLUDED.total_conversation_minutes",
            "NOW()",
        );
        let query = format!(
            "INSERT INTO agent_relationships
                (tenant_slug, agent_id, person_type, person_ref, interaction_count,
                 total_conversation_minutes, last_interaction_at, familiarity_score, notes)
             VALUES ($1, $2, $3, $4, 1, $5, NOW(), {insert_score}, $6)
             ON CONFLICT (agent_id, person_type, person_ref) DO UPDATE SET
                interaction_count = agent_relationships.interaction_count + 1,
                total_conversation_minutes =
                    agent_relationships.total_conversation_minutes + EXCLUDED.total_conversation_minutes,
                last_interaction_at = NOW(),
                familiarity_score = {update_score},
                notes = COALESCE(EXCLUDED.notes, agent_relationships.notes)
             RETURNING {RELATIONSHIP_COLUMNS}"
        );
        sqlx::query_as::<_, AgentRelationship>(&query)
            .bind(tenant_slug)
            .bind(agent_id)
            .bind(&input.person_type)
            .bind(&input.person_ref)
            .bind(input.duration_minutes)
            .bind(&input.notes)
            .fetch_one(pool)
            .await
    }

    /// Relationships of an agent, most familiar first.
    pub async fn list_for_agent(
        pool: &PgPool,
        tenant_slug: &str,
        agent_id: DbId,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<AgentRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM agent_relationships
             WHERE tenant_slug = $1 AND agent_id = $2
             ORDER BY familiarity_score DESC, id ASC
             LIMIT $3 OFFSET $4"
        );
        sqlx::query_as::<_, AgentRelationship>(&query)
            .bind(tenant_slug)
            .bind(agent_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    pub async fn find_by_id(
        pool: &PgPool,
        tenant_slug: &str,
        agent_id: DbId,
        id: DbId,
    ) -> Result<Option<AgentRelationship>, sqlx::Error> {
        let query = format!(
            "SELECT {RELATIONSHIP_COLUMNS} FROM agent_relationships
             WHERE tenant_slug = $1 AND agent_id = $2 AND id = $3"
        );
        sqlx::query_as::<_, AgentRelationship>(&query)
            .bind(tenant_slug)
            .bind(agent_id)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Recompute every relationship's score across all tenants as of now.
    /// Rows whose score is unchanged are left alone. Returns the number of
    /// rows updated.
    pub async fn decay_all(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let score = familiarity::score_sql(
            "interaction_count",
            "total_conversation_minutes",
            "last_interaction_at",
        );
        let query = format!(
            "UPDATE agent_relationships SET familiarity_score = {score}
             WHERE familiarity_score IS DISTINCT FROM {score}"
        );
        let result = sqlx::query(&query).execute(pool).await?;
        Ok(result.rows_affected())
    }
}
