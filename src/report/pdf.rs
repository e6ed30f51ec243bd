//! Single-page PDF summary
//!
//! Layout is fixed: US Letter, four lines of text at absolute positions given
//! in PDF points from the bottom-left corner.

use printpdf::{BuiltinFont, Mm, PdfDocument};
use thiserror::Error;

use crate::models::{Diagnosis, Identity};

pub const REPORT_TITLE: &str = "Heart Disease Prediction Report";
pub const REPORT_FILENAME: &str = "Heart_Disease_Prediction_Report.pdf";

const PAGE_WIDTH_PT: f32 = 612.0;
const PAGE_HEIGHT_PT: f32 = 792.0;
const MARGIN_X_PT: f32 = 100.0;
const FIRST_LINE_Y_PT: f32 = 750.0;
const LINE_SPACING_PT: f32 = 20.0;
const FONT_SIZE: f32 = 12.0;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to build PDF: {0}")]
    Pdf(String),
}

fn pt(value: f32) -> Mm {
    Mm(value * 25.4 / 72.0)
}

/// Text lines in drawing order
pub fn report_lines(identity: &Identity, diagnosis: Diagnosis) -> [String; 4] {
    [
        REPORT_TITLE.to_string(),
        format!("Patient Name: {}", identity.patient_name),
        format!("Contact Number: {}", identity.contact_number),
        format!("Prediction: {}", diagnosis.as_answer()),
    ]
}

/// Render the report into an in-memory PDF
pub fn render_pdf(identity: &Identity, diagnosis: Diagnosis) -> Result<Vec<u8>, ReportError> {
    let (doc, page, layer) = PdfDocument::new(
        REPORT_TITLE,
        pt(PAGE_WIDTH_PT),
        pt(PAGE_HEIGHT_PT),
        "Report",
    );

    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| ReportError::Pdf(e.to_string()))?;

    let canvas = doc.get_page(page).get_layer(layer);
    for (i, line) in report_lines(identity, diagnosis).iter().enumerate() {
        let y = FIRST_LINE_Y_PT - LINE_SPACING_PT * i as f32;
        canvas.use_text(line.as_str(), FONT_SIZE, pt(MARGIN_X_PT), pt(y), &font);
    }

    doc.save_to_bytes().map_err(|e| ReportError::Pdf(e.to_string()))
}
