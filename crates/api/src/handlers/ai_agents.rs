//! Handlers for `/ai-agents` and their relationship records.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use cgk_core::familiarity;
use cgk_core::types::DbId;
use cgk_db::models::ai_agent::{
    AgentRelationship, AiAgent, CreateAiAgent, RecordInteraction, UpdateAiAgent,
};
use cgk_db::repositories::{AgentRelationshipRepo, AiAgentRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::TenantAdmin;
use crate::middleware::tenant::TenantContext;
use crate::query::ListParams;
use crate::response::DataResponse;
use crate::state::AppState;

fn validate_name(name: Option<&str>) -> AppResult<()> {
    if name.is_some_and(|n| n.trim().is_empty()) {
        return Err(AppError::validation("Agent name must not be empty"));
    }
    Ok(())
}

async fn load(state: &AppState, ctx: &TenantContext, id: DbId) -> AppResult<AiAgent> {
    AiAgentRepo::find_by_id(&state.pool, ctx.slug(), id)
        .await?
        .ok_or(AppError::not_found("AiAgent", id))
}

/// GET /api/v1/ai-agents
pub async fn list(
    ctx: TenantContext,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<AiAgent>>>> {
    let agents = AiAgentRepo::list(&state.pool, ctx.slug()).await?;
    Ok(Json(DataResponse::new(agents)))
}

/// POST /api/v1/ai-agents
pub async fn create(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Json(input): Json<CreateAiAgent>,
) -> AppResult<(StatusCode, Json<DataResponse<AiAgent>>)> {
    validate_name(Some(&input.name))?;
    let agent = AiAgentRepo::create(&state.pool, ctx.slug(), &input).await?;
    tracing::info!(tenant = %ctx.slug, agent_id = agent.id, "AI agent created");
    Ok((StatusCode::CREATED, Json(DataResponse::new(agent))))
}

/// GET /api/v1/ai-agents/{id}
pub async fn get_by_id(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<AiAgent>>> {
    Ok(Json(DataResponse::new(load(&state, &ctx, id).await?)))
}

/// PUT /api/v1/ai-agents/{id}
pub async fn update(
    TenantAdmin(ctx): TenantAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateAiAgent>,
) -> AppResult<Json<DataResponse<AiAgent>>> {
    validate_name(input.name.as_deref())?;
    let agent = AiAgentRepo::update(&state.pool, ctx.slug(), id, &input)
        .await?
        .ok_or(AppError::not_found("AiAgent", id))?;
    Ok(Json(DataResponse::new(agent)))
}

/// POST /api/v1/ai-agents/{id}/interactions
///
/// Creates the relationship on first contact, otherwise bumps its counters.
/// The familiarity score is recomputed in the same statement.
pub async fn record_interaction(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(agent_id): Path<DbId>,
    Json(input): Json<RecordInteraction>,
) -> AppResult<Json<DataResponse<AgentRelationship>>> {
    familiarity::validate_person_type(&input.person_type).map_err(AppError::validation)?;
    familiarity::validate_duration(input.duration_minutes).map_err(AppError::validation)?;
    if input.person_ref.trim().is_empty() {
        return Err(AppError::validation("person_ref must not be empty"));
    }
    let agent = load(&state, &ctx, agent_id).await?;
    if !agent.is_active {
        return Err(AppError::conflict("Agent is inactive"));
    }

    let relationship =
        AgentRelationshipRepo::record_interaction(&state.pool, ctx.slug(), agent_id, &input)
            .await?;
    tracing::debug!(
        tenant = %ctx.slug,
        agent_id,
        relationship_id = relationship.id,
        score = relationship.familiarity_score,
        "Interaction recorded"
    );
    Ok(Json(DataResponse::new(relationship)))
}

/// GET /api/v1/ai-agents/{id}/relationships
pub async fn list_relationships(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path(agent_id): Path<DbId>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<DataResponse<Vec<AgentRelationship>>>> {
    load(&state, &ctx, agent_id).await?;
    let (limit, offset) = params.page();
    let rows =
        AgentRelationshipRepo::list_for_agent(&state.pool, ctx.slug(), agent_id, limit, offset)
            .await?;
    Ok(Json(DataResponse::new(rows)))
}

/// GET /api/v1/ai-agents/{id}/relationships/{relationship_id}
pub async fn get_relationship(
    ctx: TenantContext,
    State(state): State<AppState>,
    Path((agent_id, id)): Path<(DbId, DbId)>,
) -> AppResult<Json<DataResponse<AgentRelationship>>> {
    let row = AgentRelationshipRepo::find_by_id(&state.pool, ctx.slug(), agent_id, id)
        .await?
        .ok_or(AppError::not_found("AgentRelationship", id))?;
    Ok(Json(DataResponse::new(row)))
}
