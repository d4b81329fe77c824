//! Donation routes.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use domain::models::{CreateDonationRequest, DonationResponse, PaymentStatus};
use persistence::entities::DonationEntity;
use tracing::info;
use validator::Validate;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::Actor;
use crate::middleware::metrics::record_donation;

/// Record a donation completed through the payment provider's client flow.
///
/// POST /api/v1/donations
///
/// The campaign total is credited immediately. Recurring donations are
/// charged again monthly by the recurring donation job.
pub async fn create_donation(
    State(state): State<AppState>,
    Actor(actor): Actor,
    Json(mut request): Json<CreateDonationRequest>,
) -> Result<(StatusCode, Json<DonationResponse>), ApiError> {
    request.currency = request.currency.trim().to_ascii_uppercase();
    request.validate()?;

    if !state.campaigns.exists(request.campaign_id, false).await? {
        return Err(ApiError::NotFound(format!(
            "Campaign {} not found or not accepting donations",
            request.campaign_id
        )));
    }
    if !state.profiles.exists(request.donor_profile_id, false).await? {
        return Err(ApiError::NotFound(format!(
            "Profile {} not found",
            request.donor_profile_id
        )));
    }

    let mut donation = DonationEntity::new(
        request.campaign_id,
        request.donor_profile_id,
        request.amount_cents,
        request.currency,
    );
    donation.payment_status = PaymentStatus::Succeeded;
    donation.provider_reference = request.provider_reference;
    if request.recurring {
        donation.make_recurring(Utc::now());
    }

    let donation = state.donations.add(donation, &actor).await?;
    state
        .campaigns
        .record_donation(donation.campaign_id, donation.amount_cents, &actor)
        .await?;
    record_donation("api", donation.amount_cents);

    info!(
        donation_id = donation.audit.id,
        campaign_id = donation.campaign_id,
        amount_cents = donation.amount_cents,
        recurring = donation.is_recurring,
        "Donation recorded"
    );

    Ok((StatusCode::CREATED, Json(donation.into())))
}
