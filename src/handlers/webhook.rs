use axum::{
    extract::{rejection::FormRejection, State},
    Form,
};

use crate::{
    error::{AppError, AppResult},
    models::InboundSms,
    AppState,
};

// ── POST /sms/verify ──────────────────────────────────────────────────────────

/// Twilio incoming-message webhook. `Body` is the product code, `From` is
/// where the verdict goes.
pub async fn receive_sms(
    State(state): State<AppState>,
    sms: Result<Form<InboundSms>, FormRejection>,
) -> AppResult<&'static str> {
    let Form(sms) = sms.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    state.verifier.handle(&sms.from, &sms.body).await
}
