//! Campaign routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    CampaignResponse, CreateCampaignRequest, DonationResponse, ListCampaignsQuery, ProfileType,
    SetActiveStatusRequest, UpdateCampaignRequest,
};
use persistence::entities::CampaignEntity;
use persistence::query::QueryDescriptor;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;

fn not_found(id: i64) -> ApiError {
    ApiError::NotFound(format!("Campaign {} not found", id))
}

/// GET /api/v1/campaigns
///
/// Filters by fundraiser and title substring; inactive campaigns are
/// included only when asked for.
pub async fn list_campaigns(
    State(state): State<AppState>,
    Query(query): Query<ListCampaignsQuery>,
) -> Result<Json<Vec<CampaignResponse>>, ApiError> {
    let mut descriptor = QueryDescriptor::new();
    if let Some(fundraiser) = query.fundraiser_profile_id {
        descriptor = descriptor.eq("fundraiser_profile_id", fundraiser);
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        descriptor = descriptor.contains("title", search);
    }

    let campaigns = if descriptor.is_empty() {
        state.campaigns.get_all(query.include_inactive).await?
    } else {
        state.campaigns.find(&descriptor, query.include_inactive).await?
    };

    Ok(Json(campaigns.into_iter().map(Into::into).collect()))
}

/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(request): Json<CreateCampaignRequest>,
) -> Result<(StatusCode, Json<CampaignResponse>), ApiError> {
    request.validate()?;

    let fundraiser = state
        .profiles
        .get_by_id(request.fundraiser_profile_id, false)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Profile {} not found", request.fundraiser_profile_id))
        })?;
    if fundraiser.profile_type != ProfileType::Fundraiser {
        return Err(ApiError::Validation(
            "Campaigns can only be created by fundraiser profiles".into(),
        ));
    }

    if state.campaigns.get_by_slug(&request.slug).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Campaign slug '{}' is already taken",
            request.slug
        )));
    }

    let mut campaign = CampaignEntity::new(
        request.fundraiser_profile_id,
        request.title,
        request.slug,
        request.goal_cents,
    );
    campaign.description = request.description;
    let campaign = state.campaigns.add(campaign, &actor).await?;

    info!(
        campaign_id = campaign.audit.id,
        slug = %campaign.slug,
        actor = %actor,
        "Campaign created"
    );

    Ok((StatusCode::CREATED, Json(campaign.into())))
}

/// GET /api/v1/campaigns/:id
pub async fn get_campaign(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<CampaignResponse>, ApiError> {
    let campaign = state
        .campaigns
        .get_by_id(id, true)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(campaign.into()))
}

/// PUT /api/v1/campaigns/:id
pub async fn update_campaign(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(request): Json<UpdateCampaignRequest>,
) -> Result<Json<CampaignResponse>, ApiError> {
    request.validate()?;

    let mut campaign = state
        .campaigns
        .get_by_id(id, true)
        .await?
        .ok_or_else(|| not_found(id))?;
    campaign.title = request.title;
    campaign.description = request.description;
    campaign.goal_cents = request.goal_cents;

    let updated = state
        .campaigns
        .update(&campaign, &actor)
        .await?
        .ok_or_else(|| not_found(id))?;

    info!(campaign_id = id, actor = %actor, "Campaign updated");
    Ok(Json(updated.into()))
}

/// PUT /api/v1/campaigns/:id/status
pub async fn set_campaign_status(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
    Json(request): Json<SetActiveStatusRequest>,
) -> Result<StatusCode, ApiError> {
    if !state
        .campaigns
        .set_active_status(id, request.is_active, &actor)
        .await?
    {
        return Err(not_found(id));
    }

    info!(campaign_id = id, is_active = request.is_active, actor = %actor, "Campaign status changed");
    Ok(StatusCode::NO_CONTENT)
}

/// Soft-delete a campaign. Its donations are kept.
///
/// DELETE /api/v1/campaigns/:id
pub async fn delete_campaign(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if !state.campaigns.soft_delete(id, &actor).await? {
        return Err(not_found(id));
    }

    info!(campaign_id = id, actor = %actor, "Campaign deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/campaigns/:id/donations
pub async fn list_campaign_donations(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<DonationResponse>>, ApiError> {
    if !state.campaigns.exists(id, true).await? {
        return Err(not_found(id));
    }

    let donations = state.donations.list_by_campaign(id, false).await?;
    Ok(Json(donations.into_iter().map(Into::into).collect()))
}
