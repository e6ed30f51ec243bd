//! Prediction handler

use axum::{
    extract::{rejection::FormRejection, State},
    response::Html,
    Form,
};

use crate::error::PredictionError;
use crate::models::{ClinicalFeatures, PredictForm, PredictionOutcome};
use crate::views::IndexPage;
use crate::{AppResult, AppState};

/// Run the classifier on the submitted features.
///
/// Input and model failures do not fail the request: the result page is
/// rendered with the error in place of the prediction and the identity echoed.
/// This includes bodies the form extractor cannot read.
pub async fn predict(
    State(state): State<AppState>,
    body: Result<Form<Vec<(String, String)>>, FormRejection>,
) -> AppResult<Html<String>> {
    let (form, result) = match body {
        Ok(Form(pairs)) => {
            let form = PredictForm::from_pairs(pairs);
            let result = run_prediction(&state, &form);
            (form, result)
        }
        Err(rejection) => (
            PredictForm::default(),
            Err(PredictionError::Form(rejection.body_text())),
        ),
    };

    let page = match result {
        Ok((outcome, token)) => {
            tracing::info!(
                prediction_id = %outcome.id,
                label = outcome.label,
                "Prediction: {}",
                outcome.diagnosis.as_answer()
            );
            IndexPage::result(&outcome, token)
        }
        Err(e) => {
            tracing::warn!(kind = e.kind(), field = e.field(), "Prediction failed: {}", e);
            IndexPage::error(form.identity_lossy(), &e)
        }
    };

    Ok(Html(state.views.index(&page)?))
}

fn run_prediction(
    state: &AppState,
    form: &PredictForm,
) -> Result<(PredictionOutcome, String), PredictionError> {
    let identity = form.identity()?;
    let features = ClinicalFeatures::try_from(form)?;

    let label = state.classifier.predict(features.to_vector().view())?;
    let outcome = PredictionOutcome::new(identity, label);
    let token = state.signer.issue(&outcome)?;

    Ok((outcome, token))
}
