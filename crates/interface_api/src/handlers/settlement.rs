//! Settlement handlers

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use core_kernel::{InvoiceId, PatientId, PaymentId};

use crate::dto::settlement::{
    ApplyPaymentBody, CancelPaymentBody, DebtSummaryResponse, SettlementResponse,
};
use crate::error::ApiError;
use crate::AppState;

/// Applies a payment to an invoice
pub async fn apply_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ApplyPaymentBody>,
) -> Result<(StatusCode, Json<SettlementResponse>), ApiError> {
    body.validate()?;
    let request = body.into_request()?;

    let settlement = state
        .store
        .apply_payment(InvoiceId::from(id), &request)
        .await?;

    Ok((StatusCode::CREATED, Json(settlement.into())))
}

/// Cancels a previously-applied payment
pub async fn cancel_payment(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<CancelPaymentBody>,
) -> Result<Json<SettlementResponse>, ApiError> {
    body.validate()?;

    let settlement = state
        .store
        .cancel_payment(PaymentId::from(id), body.reason)
        .await?;

    Ok(Json(settlement.into()))
}

/// Returns the outstanding-debt summary for a patient
pub async fn debt_summary(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DebtSummaryResponse>, ApiError> {
    let quote = state
        .rates
        .current_rate()
        .map_err(|err| ApiError::Internal(err.to_string()))?;

    let summary = state
        .store
        .debt_summary(PatientId::from(id), quote.rate)
        .await?;

    Ok(Json(summary.into()))
}
