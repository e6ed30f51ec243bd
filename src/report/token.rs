//! Signed report tokens
//!
//! `/predict` hands the browser a JWT binding the label to the identity it was
//! computed for. `/download_report` checks the submitted fields against it so
//! a report cannot claim a prediction the service never made.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{Identity, PredictionOutcome};

#[derive(Debug, Serialize, Deserialize)]
pub struct ReportClaims {
    pub jti: String,            // Prediction ID
    pub patient_name: String,
    pub contact_number: String,
    pub prediction: i64,        // Raw model label
    pub exp: usize,             // Expiration timestamp
    pub iat: usize,             // Issued at
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Could not sign report token: {0}")]
    Signing(String),

    #[error("Report token is invalid or expired")]
    Invalid,

    #[error("Report details do not match the signed prediction")]
    Mismatch,
}

#[derive(Clone)]
pub struct ReportSigner {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl ReportSigner {
    pub fn new(secret: &str, ttl_minutes: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Sign the outcome of a prediction
    pub fn issue(&self, outcome: &PredictionOutcome) -> Result<String, TokenError> {
        let now = Utc::now();
        let claims = ReportClaims {
            jti: outcome.id.to_string(),
            patient_name: outcome.identity.patient_name.clone(),
            contact_number: outcome.identity.contact_number.clone(),
            prediction: outcome.label,
            exp: (now + self.ttl).timestamp().max(0) as usize,
            iat: now.timestamp() as usize,
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| TokenError::Signing(e.to_string()))
    }

    /// Check a token against the fields submitted with it
    pub fn verify(
        &self,
        token: &str,
        identity: &Identity,
        prediction: &str,
    ) -> Result<ReportClaims, TokenError> {
        let claims = decode::<ReportClaims>(token, &self.decoding, &Validation::default())
            .map_err(|_| TokenError::Invalid)?
            .claims;

        if claims.patient_name != identity.patient_name
            || claims.contact_number != identity.contact_number
            || claims.prediction.to_string() != prediction
        {
            tracing::warn!("Report token {} does not match submitted report fields", claims.jti);
            return Err(TokenError::Mismatch);
        }

        Ok(claims)
    }
}
