//! Patient identity

use serde::{Deserialize, Serialize};

/// Identity fields carried through every stage untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub patient_name: String,
    pub contact_number: String,
}

impl Identity {
    pub fn new(patient_name: impl Into<String>, contact_number: impl Into<String>) -> Self {
        Self {
            patient_name: patient_name.into(),
            contact_number: contact_number.into(),
        }
    }
}
