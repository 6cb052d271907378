//! Vendor registry
//!
//! Holds the vendors under assessment. Constructed once by the
//! composition root with its initial catalog and shared from there.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{GuardError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vendor {
    pub id: String,
    pub name: String,
    pub category: String,
    pub country: String,
    #[serde(default)]
    pub last_score: Option<f64>,
    #[serde(default)]
    pub last_assessed_at: Option<DateTime<Utc>>,
}

impl Vendor {
    pub fn new(id: &str, name: &str, category: &str, country: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            country: country.to_string(),
            last_score: None,
            last_assessed_at: None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct VendorRegistry {
    vendors: BTreeMap<String, Vendor>,
}

impl VendorRegistry {
    pub fn new(initial: Vec<Vendor>) -> Self {
        let vendors = initial
            .into_iter()
            .map(|vendor| (vendor.id.clone(), vendor))
            .collect();
        Self { vendors }
    }

    /// Demo catalog of healthcare and biotech suppliers
    pub fn demo_catalog() -> Vec<Vendor> {
        vec![
            Vendor::new("V1", "Helix Diagnostics", "Clinical Laboratory", "US"),
            Vendor::new("V2", "NovaCell Biologics", "Cell Therapy CDMO", "DE"),
            Vendor::new("V3", "MedCloud Records", "EHR Hosting", "IE"),
            Vendor::new("V4", "Sterigen Supply", "Sterile Consumables", "IN"),
            Vendor::new("V5", "Apex Genomics", "Sequencing Services", "SG"),
        ]
    }

    pub fn list(&self) -> Vec<Vendor> {
        self.vendors.values().cloned().collect()
    }

    pub fn get(&self, id: &str) -> Result<&Vendor> {
        self.vendors
            .get(id)
            .ok_or_else(|| GuardError::VendorNotFound(id.to_string()))
    }

    /// Store the outcome of the latest assessment
    pub fn record_score(&mut self, id: &str, score: f64, at: DateTime<Utc>) -> Result<()> {
        let vendor = self
            .vendors
            .get_mut(id)
            .ok_or_else(|| GuardError::VendorNotFound(id.to_string()))?;
        vendor.last_score = Some(score);
        vendor.last_assessed_at = Some(at);
        debug!("Recorded score {:.1} for vendor {}", score, id);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.vendors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vendors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_lookup() {
        let registry = VendorRegistry::new(VendorRegistry::demo_catalog());
        assert_eq!(registry.len(), 5);
        assert_eq!(registry.get("V1").unwrap().name, "Helix Diagnostics");
        assert!(matches!(
            registry.get("missing"),
            Err(GuardError::VendorNotFound(_))
        ));
    }

    #[test]
    fn test_record_score() {
        let mut registry = VendorRegistry::new(vec![Vendor::new("V1", "Helix", "Lab", "US")]);
        let now = Utc::now();
        registry.record_score("V1", 6.5, now).unwrap();

        let vendor = registry.get("V1").unwrap();
        assert_eq!(vendor.last_score, Some(6.5));
        assert_eq!(vendor.last_assessed_at, Some(now));
        assert!(registry.record_score("V9", 1.0, now).is_err());
    }
}
