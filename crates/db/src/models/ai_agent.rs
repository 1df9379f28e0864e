//! AI agents and their relationships with people.

use cgk_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `ai_agents` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AiAgent {
    pub id: DbId,
    pub tenant_slug: String,
    pub name: String,
    pub persona: Option<String>,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAiAgent {
    pub name: String,
    pub persona: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateAiAgent {
    pub name: Option<String>,
    pub persona: Option<String>,
    pub is_active: Option<bool>,
}

/// A row from the `agent_relationships` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct AgentRelationship {
    pub id: DbId,
    pub tenant_slug: String,
    pub agent_id: DbId,
    pub person_type: String,
    pub person_ref: String,
    pub interaction_count: i32,
    pub total_conversation_minutes: f64,
    pub last_interaction_at: Option<Timestamp>,
    pub familiarity_score: f64,
    pub notes: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Request body for `POST /ai-agents/{id}/interactions`.
#[derive(Debug, Clone, Deserialize)]
pub struct RecordInteraction {
    pub person_type: String,
    pub person_ref: String,
    #[serde(default)]
    pub duration_minutes: f64,
    pub notes: Option<String>,
}
