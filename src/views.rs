//! HTML pages

use minijinja::{context, Environment};
use serde::Serialize;

use crate::models::{Identity, PredictionOutcome, FEATURE_COUNT, FEATURE_KEYS};

/// Labels shown next to each feature input, in training order
const FEATURE_LABELS: [&str; FEATURE_COUNT] = [
    "Age (years)",
    "Sex (1 = male, 0 = female)",
    "Chest pain type (0-3)",
    "Resting blood pressure (mm Hg)",
    "Serum cholesterol (mg/dl)",
    "Fasting blood sugar > 120 mg/dl (1 = true, 0 = false)",
    "Resting ECG results (0-2)",
    "Maximum heart rate achieved",
    "Exercise induced angina (1 = yes, 0 = no)",
    "ST depression induced by exercise",
    "Slope of peak exercise ST segment (0-2)",
    "Major vessels colored by fluoroscopy (0-3)",
    "Thalassemia (0-3)",
];

#[derive(Debug, Serialize)]
struct FeatureField {
    key: &'static str,
    label: &'static str,
}

/// Context for `index.html`
#[derive(Debug, Default, Serialize)]
pub struct IndexPage {
    pub patient_name: String,
    pub contact_number: String,
    pub prediction_text: Option<String>,
    pub prediction: Option<i64>,
    pub report_token: Option<String>,
    pub is_error: bool,
}

impl IndexPage {
    /// Empty feature form for a patient
    pub fn intake(identity: Identity) -> Self {
        Self {
            patient_name: identity.patient_name,
            contact_number: identity.contact_number,
            ..Default::default()
        }
    }

    pub fn result(outcome: &PredictionOutcome, report_token: String) -> Self {
        Self {
            patient_name: outcome.identity.patient_name.clone(),
            contact_number: outcome.identity.contact_number.clone(),
            prediction_text: Some(outcome.prediction_text()),
            prediction: Some(outcome.label),
            report_token: Some(report_token),
            is_error: false,
        }
    }

    pub fn error(identity: Identity, message: impl std::fmt::Display) -> Self {
        Self {
            patient_name: identity.patient_name,
            contact_number: identity.contact_number,
            prediction_text: Some(format!("Error: {}", message)),
            is_error: true,
            ..Default::default()
        }
    }
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../templates/layout.html"))?;
        env.add_template("home.html", include_str!("../templates/home.html"))?;
        env.add_template("index.html", include_str!("../templates/index.html"))?;
        Ok(Self { env })
    }

    pub fn home(&self) -> Result<String, minijinja::Error> {
        self.env.get_template("home.html")?.render(context! {})
    }

    pub fn index(&self, page: &IndexPage) -> Result<String, minijinja::Error> {
        let fields: Vec<FeatureField> = FEATURE_KEYS
            .iter()
            .zip(FEATURE_LABELS.iter())
            .map(|(&key, &label)| FeatureField { key, label })
            .collect();

        self.env
            .get_template("index.html")?
            .render(context! { page => page, fields => fields })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_home_has_identity_form() {
        let html = Views::new().unwrap().home().unwrap();
        assert!(html.contains(r#"action="/input_details""#));
        assert!(html.contains(r#"name="patient_name""#));
        assert!(html.contains(r#"name="contact_number""#));
    }

    #[test]
    fn test_intake_prefills_identity() {
        let views = Views::new().unwrap();
        let html = views
            .index(&IndexPage::intake(Identity::new("Jane Doe", "+1 555 0100")))
            .unwrap();

        assert!(html.contains(r#"value="Jane Doe""#));
        assert!(html.contains(r#"value="+1 555 0100""#));
        for key in FEATURE_KEYS {
            assert!(html.contains(&format!(r#"name="{}""#, key)), "missing input {}", key);
        }
        assert!(!html.contains("Heart Disease Prediction:"));
        assert!(!html.contains("/download_report"));
    }

    #[test]
    fn test_result_offers_report() {
        let views = Views::new().unwrap();
        let outcome = PredictionOutcome::new(Identity::new("Jane Doe", "555-0100"), 1);
        let html = views.index(&IndexPage::result(&outcome, "tok.en.sig".into())).unwrap();

        assert!(html.contains("Heart Disease Prediction: Yes"));
        assert!(html.contains(r#"action="/download_report""#));
        assert!(html.contains(r#"name="prediction" value="1""#));
        assert!(html.contains(r#"value="tok.en.sig""#));
    }

    #[test]
    fn test_error_has_no_report() {
        let views = Views::new().unwrap();
        let page = IndexPage::error(Identity::new("Jane Doe", "555-0100"), "Missing value for age");
        let html = views.index(&page).unwrap();

        assert!(html.contains("Error: Missing value for age"));
        assert!(html.contains(r#"value="Jane Doe""#));
        assert!(!html.contains("/download_report"));
    }

    #[test]
    fn test_markup_is_escaped() {
        let views = Views::new().unwrap();
        let html = views
            .index(&IndexPage::intake(Identity::new("<script>", "1")))
            .unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
