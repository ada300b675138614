//! The report record handed over by the portal.
//!
//! Everything is display-ready: timestamps arrive pre-formatted and
//! patient fields are plain strings. Absent patient fields render as
//! `"N/A"`; no field is ever dropped from the printed record.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::writer::{ImageData, ImageError};

/// Placeholder shown for any absent or blank display field.
pub const NOT_AVAILABLE: &str = "N/A";

/// One report to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportInput {
    /// Diagnosed condition name
    pub predicted_label: String,
    /// Classifier confidence in `[0, 1]`
    pub confidence_score: f64,
    /// Pre-formatted display timestamp
    pub timestamp: String,
    /// Report identifier
    pub report_id: String,
    /// Patient demographics
    pub patient: PatientInfo,
    /// Treatment recommendations, in display order
    #[serde(default)]
    pub treatment_items: Vec<String>,
    /// Prevention guidelines, in display order
    #[serde(default)]
    pub prevention_items: Vec<String>,
    /// Helpful resources, in display order
    #[serde(default)]
    pub resource_items: Vec<String>,
    /// Reviewing dermatologist's note
    #[serde(default)]
    pub reviewer_comment: Option<String>,
    /// Lesion image, already fetched by the caller
    #[serde(default)]
    pub image: Option<ImageRef>,
    /// Per-condition probabilities from the classifier
    #[serde(default)]
    pub all_probabilities: Option<BTreeMap<String, f64>>,
}

impl ReportInput {
    /// Decode a record from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Check the record can be rendered.
    ///
    /// A blank diagnosis label is [`Error::MissingInput`]; a confidence
    /// outside `[0, 1]` is [`Error::InvalidInput`].
    pub fn validate(&self) -> Result<()> {
        if self.predicted_label.trim().is_empty() {
            return Err(Error::MissingInput("predicted label is empty".to_string()));
        }
        if !(0.0..=1.0).contains(&self.confidence_score) {
            return Err(Error::InvalidInput(format!(
                "confidence {} outside [0, 1]",
                self.confidence_score
            )));
        }
        if let Some(probabilities) = &self.all_probabilities {
            if let Some((label, p)) = probabilities.iter().find(|(_, p)| !(0.0..=1.0).contains(*p)) {
                return Err(Error::InvalidInput(format!(
                    "probability {} for '{}' outside [0, 1]",
                    p, label
                )));
            }
        }
        Ok(())
    }

    /// Fill empty recommendation lists from the catalog entry matching
    /// the diagnosis. Lists the caller already supplied are kept.
    pub fn with_catalog(mut self, catalog: &TreatmentCatalog) -> Self {
        match catalog.find(&self.predicted_label) {
            Some(condition) => {
                if self.treatment_items.is_empty() {
                    self.treatment_items = condition.treatments.clone();
                }
                if self.prevention_items.is_empty() {
                    self.prevention_items = condition.prevention.clone();
                }
                if self.resource_items.is_empty() {
                    self.resource_items = condition.resources.clone();
                }
            },
            None => log::info!("No catalog entry for '{}'", self.predicted_label),
        }
        self
    }

    /// Reviewer note, if it has any content.
    pub fn reviewer_note(&self) -> Option<&str> {
        self.reviewer_comment
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Classifier probabilities sorted by descending likelihood.
    ///
    /// Ties keep label order.
    pub fn ranked_probabilities(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .all_probabilities
            .iter()
            .flatten()
            .map(|(label, p)| (label.as_str(), *p))
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1));
        ranked
    }
}

/// Patient demographics. Every field is optional display text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PatientInfo {
    /// Full name
    pub name: Option<String>,
    /// Age
    pub age: Option<String>,
    /// Gender
    pub gender: Option<String>,
    /// Phone or other contact
    #[serde(alias = "phone")]
    pub contact: Option<String>,
    /// Blood group
    pub blood_group: Option<String>,
    /// Known allergies
    pub allergies: Option<String>,
    /// Assigned dermatologist
    #[serde(alias = "dermatologist")]
    pub dermatologist_label: Option<String>,
}

fn display(value: &Option<String>) -> &str {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_AVAILABLE)
}

impl PatientInfo {
    /// Name, or `"N/A"`.
    pub fn name(&self) -> &str {
        display(&self.name)
    }

    /// `"{age} / {gender}"`, each half falling back independently.
    pub fn age_gender(&self) -> String {
        format!("{} / {}", display(&self.age), display(&self.gender))
    }

    /// Contact, or `"N/A"`.
    pub fn contact(&self) -> &str {
        display(&self.contact)
    }

    /// Blood group, or `"N/A"`.
    pub fn blood_group(&self) -> &str {
        display(&self.blood_group)
    }

    /// Allergies, or `"N/A"`.
    pub fn allergies(&self) -> &str {
        display(&self.allergies)
    }

    /// Assigned dermatologist, or `"N/A"`.
    pub fn dermatologist(&self) -> &str {
        display(&self.dermatologist_label)
    }
}

/// Lesion image supplied with the record.
///
/// Only resolved content is accepted; remote URLs must be fetched by
/// the caller first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageRef {
    /// Raw JPEG or PNG bytes
    Bytes(Vec<u8>),
    /// A `data:` URL carrying base64 image bytes
    Url(String),
}

impl ImageRef {
    /// Decode into embeddable image data.
    pub fn decode(&self) -> std::result::Result<ImageData, ImageError> {
        match self {
            ImageRef::Bytes(bytes) => ImageData::from_bytes(bytes),
            ImageRef::Url(url) => ImageData::from_data_url(url),
        }
    }
}

/// Treatment guidance keyed by condition name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreatmentCatalog {
    /// Known conditions
    #[serde(default)]
    pub skin_conditions: Vec<SkinCondition>,
}

/// Guidance for one condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkinCondition {
    /// Condition name as the classifier reports it
    pub name: String,
    /// Treatment recommendations
    #[serde(default)]
    pub treatments: Vec<String>,
    /// Prevention guidelines
    #[serde(default)]
    pub prevention: Vec<String>,
    /// Helpful resources
    #[serde(default)]
    pub resources: Vec<String>,
}

impl TreatmentCatalog {
    /// Decode a catalog from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Find a condition by case-insensitive name.
    pub fn find(&self, label: &str) -> Option<&SkinCondition> {
        let wanted = label.trim().to_lowercase();
        self.skin_conditions
            .iter()
            .find(|c| c.name.trim().to_lowercase() == wanted)
    }
}
