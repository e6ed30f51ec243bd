//! Report download handler

use axum::{
    extract::State,
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::IntoResponse,
    Form,
};
use serde::Deserialize;

use crate::models::{Diagnosis, Identity, InputError};
use crate::report::{self, REPORT_FILENAME};
use crate::{AppError, AppResult, AppState};

#[derive(Debug, Deserialize)]
pub struct ReportForm {
    pub patient_name: Option<String>,
    pub contact_number: Option<String>,
    pub prediction: Option<String>,
    pub report_token: Option<String>,
}

/// Render the PDF for an already computed prediction
pub async fn download(
    State(state): State<AppState>,
    Form(form): Form<ReportForm>,
) -> AppResult<impl IntoResponse> {
    let identity = Identity {
        patient_name: form.patient_name.ok_or(InputError::MissingField("patient_name"))?,
        contact_number: form.contact_number.ok_or(InputError::MissingField("contact_number"))?,
    };
    let prediction = form.prediction.ok_or(InputError::MissingField("prediction"))?;

    match form.report_token.as_deref().filter(|t| !t.is_empty()) {
        Some(token) => {
            let claims = state.signer.verify(token, &identity, &prediction)?;
            tracing::debug!(prediction_id = %claims.jti, "Report token verified");
        }
        None if state.config.require_signed_reports => return Err(AppError::TokenRequired),
        None => tracing::debug!("Unsigned report requested"),
    }

    let diagnosis = Diagnosis::from_form_value(&prediction);
    let pdf = report::render_pdf(&identity, diagnosis)?;

    tracing::info!("Report generated ({} bytes)", pdf.len());

    Ok((
        [
            (CONTENT_TYPE, "application/pdf".to_string()),
            (CONTENT_DISPOSITION, format!("attachment; filename=\"{}\"", REPORT_FILENAME)),
        ],
        pdf,
    ))
}
