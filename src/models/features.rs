//! Clinical feature record
//!
//! The classifier was trained on 13 measurements in a fixed column order.
//! [`PredictForm`] is the raw form as submitted; [`ClinicalFeatures`] is the
//! validated record the model consumes. Conversion walks the keys in training
//! order and stops at the first field that is absent or not a number.

use ndarray::Array1;
use thiserror::Error;

use super::Identity;

/// Number of model inputs
pub const FEATURE_COUNT: usize = 13;

/// Form keys in training order
pub const FEATURE_KEYS: [&str; FEATURE_COUNT] = [
    "age", "sex", "cp", "trestbps", "chol", "fbs", "restecg",
    "thalach", "exang", "oldpeak", "slope", "ca", "thal",
];

#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("Missing value for {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: '{value}' is not a number")]
    InvalidNumber { field: &'static str, value: String },
}

impl InputError {
    pub fn field(&self) -> &'static str {
        match self {
            InputError::MissingField(field) => field,
            InputError::InvalidNumber { field, .. } => field,
        }
    }
}

/// `/predict` form body as submitted
#[derive(Debug, Clone, Default)]
pub struct PredictForm {
    pub patient_name: Option<String>,
    pub contact_number: Option<String>,
    pub age: Option<String>,
    pub sex: Option<String>,
    pub cp: Option<String>,
    pub trestbps: Option<String>,
    pub chol: Option<String>,
    pub fbs: Option<String>,
    pub restecg: Option<String>,
    pub thalach: Option<String>,
    pub exang: Option<String>,
    pub oldpeak: Option<String>,
    pub slope: Option<String>,
    pub ca: Option<String>,
    pub thal: Option<String>,
}

impl PredictForm {
    /// Collect known keys from raw form pairs; the first value of a repeated key wins
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut form = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "patient_name" => &mut form.patient_name,
                "contact_number" => &mut form.contact_number,
                "age" => &mut form.age,
                "sex" => &mut form.sex,
                "cp" => &mut form.cp,
                "trestbps" => &mut form.trestbps,
                "chol" => &mut form.chol,
                "fbs" => &mut form.fbs,
                "restecg" => &mut form.restecg,
                "thalach" => &mut form.thalach,
                "exang" => &mut form.exang,
                "oldpeak" => &mut form.oldpeak,
                "slope" => &mut form.slope,
                "ca" => &mut form.ca,
                "thal" => &mut form.thal,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        form
    }

    /// Identity fields, both required
    pub fn identity(&self) -> Result<Identity, InputError> {
        Ok(Identity {
            patient_name: self.patient_name.clone().ok_or(InputError::MissingField("patient_name"))?,
            contact_number: self.contact_number.clone().ok_or(InputError::MissingField("contact_number"))?,
        })
    }

    /// Whatever identity was submitted, blanks for absent fields
    pub fn identity_lossy(&self) -> Identity {
        Identity {
            patient_name: self.patient_name.clone().unwrap_or_default(),
            contact_number: self.contact_number.clone().unwrap_or_default(),
        }
    }
}

/// Validated model input
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClinicalFeatures {
    pub age: f64,
    pub sex: f64,
    pub cp: f64,
    pub trestbps: f64,
    pub chol: f64,
    pub fbs: f64,
    pub restecg: f64,
    pub thalach: f64,
    pub exang: f64,
    pub oldpeak: f64,
    pub slope: f64,
    pub ca: f64,
    pub thal: f64,
}

impl ClinicalFeatures {
    pub fn as_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.age, self.sex, self.cp, self.trestbps, self.chol, self.fbs, self.restecg,
            self.thalach, self.exang, self.oldpeak, self.slope, self.ca, self.thal,
        ]
    }

    /// Feature vector in training order
    pub fn to_vector(&self) -> Array1<f64> {
        Array1::from(self.as_array().to_vec())
    }
}

impl TryFrom<&PredictForm> for ClinicalFeatures {
    type Error = InputError;

    // Struct fields are evaluated in source order, which is training order.
    fn try_from(form: &PredictForm) -> Result<Self, Self::Error> {
        Ok(Self {
            age: required("age", &form.age)?,
            sex: required("sex", &form.sex)?,
            cp: required("cp", &form.cp)?,
            trestbps: required("trestbps", &form.trestbps)?,
            chol: required("chol", &form.chol)?,
            fbs: required("fbs", &form.fbs)?,
            restecg: required("restecg", &form.restecg)?,
            thalach: required("thalach", &form.thalach)?,
            exang: required("exang", &form.exang)?,
            oldpeak: required("oldpeak", &form.oldpeak)?,
            slope: required("slope", &form.slope)?,
            ca: required("ca", &form.ca)?,
            thal: required("thal", &form.thal)?,
        })
    }
}

fn required(field: &'static str, raw: &Option<String>) -> Result<f64, InputError> {
    let raw = raw.as_deref().ok_or(InputError::MissingField(field))?;
    parse_number(field, raw)
}

fn parse_number(field: &'static str, raw: &str) -> Result<f64, InputError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::InvalidNumber {
            field,
            value: raw.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_form() -> PredictForm {
        PredictForm {
            patient_name: Some("Jane Doe".into()),
            contact_number: Some("555-0100".into()),
            age: Some("63".into()),
            sex: Some("1".into()),
            cp: Some("3".into()),
            trestbps: Some("145".into()),
            chol: Some("233".into()),
            fbs: Some("1".into()),
            restecg: Some("0".into()),
            thalach: Some("150".into()),
            exang: Some("0".into()),
            oldpeak: Some("2.3".into()),
            slope: Some("0".into()),
            ca: Some("0".into()),
            thal: Some("1".into()),
        }
    }

    #[test]
    fn test_features_in_training_order() {
        let features = ClinicalFeatures::try_from(&complete_form()).unwrap();
        let vector = features.to_vector();

        assert_eq!(vector.len(), FEATURE_COUNT);
        assert_eq!(
            vector.to_vec(),
            vec![63.0, 1.0, 3.0, 145.0, 233.0, 1.0, 0.0, 150.0, 0.0, 2.3, 0.0, 0.0, 1.0]
        );
    }

    #[test]
    fn test_missing_feature_is_named() {
        let mut form = complete_form();
        form.chol = None;

        let err = ClinicalFeatures::try_from(&form).unwrap_err();
        assert_eq!(err, InputError::MissingField("chol"));
        assert_eq!(err.to_string(), "Missing value for chol");
    }

    #[test]
    fn test_first_bad_field_wins() {
        let mut form = complete_form();
        form.thal = None;
        form.sex = Some("abc".into());
        form.trestbps = None;

        let err = ClinicalFeatures::try_from(&form).unwrap_err();
        assert_eq!(err.field(), "sex");
    }

    #[test]
    fn test_non_numeric_value() {
        let mut form = complete_form();
        form.oldpeak = Some("abc".into());

        let err = ClinicalFeatures::try_from(&form).unwrap_err();
        assert_eq!(
            err,
            InputError::InvalidNumber { field: "oldpeak", value: "abc".into() }
        );
        assert!(err.to_string().contains("oldpeak"));
    }

    #[test]
    fn test_whitespace_and_exponent_accepted() {
        assert_eq!(parse_number("age", " 54 ").unwrap(), 54.0);
        assert_eq!(parse_number("chol", "2.5e2").unwrap(), 250.0);
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        assert!(parse_number("age", "").is_err());
        assert!(parse_number("age", "   ").is_err());
        assert!(parse_number("age", "NaN").is_err());
        assert!(parse_number("age", "inf").is_err());
    }

    #[test]
    fn test_from_pairs_first_value_wins() {
        let pairs = vec![
            ("patient_name".to_string(), "Jane Doe".to_string()),
            ("age".to_string(), "63".to_string()),
            ("age".to_string(), "41".to_string()),
            ("unrelated".to_string(), "x".to_string()),
        ];
        let form = PredictForm::from_pairs(pairs);

        assert_eq!(form.age.as_deref(), Some("63"));
        assert_eq!(form.patient_name.as_deref(), Some("Jane Doe"));
        assert!(form.contact_number.is_none());
        assert!(form.thal.is_none());
    }

    #[test]
    fn test_from_pairs_covers_every_feature_key() {
        let pairs = FEATURE_KEYS.iter().map(|k| (k.to_string(), "1".to_string()));
        let form = PredictForm::from_pairs(pairs);

        assert_eq!(ClinicalFeatures::try_from(&form).unwrap().as_array(), [1.0; FEATURE_COUNT]);
    }

    #[test]
    fn test_identity_required() {
        let mut form = complete_form();
        form.contact_number = None;

        assert_eq!(form.identity().unwrap_err(), InputError::MissingField("contact_number"));
        assert_eq!(form.identity_lossy(), Identity::new("Jane Doe", ""));
    }

    #[test]
    fn test_keys_match_record() {
        // The key list drives templates and model metadata checks.
        assert_eq!(FEATURE_KEYS.len(), FEATURE_COUNT);
        assert_eq!(FEATURE_KEYS[0], "age");
        assert_eq!(FEATURE_KEYS[FEATURE_COUNT - 1], "thal");
    }
}
