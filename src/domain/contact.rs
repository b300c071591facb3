// Contact request domain model
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EngagementDomain {
    #[default]
    #[serde(rename = "PLC Software Architecture")]
    PlcSoftwareArchitecture,
    #[serde(rename = "Manufacturing Vision", alias = "Manufacturing OpenCV Vision")]
    ManufacturingVision,
    #[serde(rename = "Industrial Data Science")]
    IndustrialDataScience,
    #[serde(rename = "High-Speed SCADA/HMI", alias = "High-Speed SCADA / HMI")]
    HighSpeedScadaHmi,
    #[serde(rename = "Predictive RUL Modeling")]
    PredictiveRulModeling,
}

impl EngagementDomain {
    pub const ALL: [EngagementDomain; 5] = [
        EngagementDomain::PlcSoftwareArchitecture,
        EngagementDomain::ManufacturingVision,
        EngagementDomain::IndustrialDataScience,
        EngagementDomain::HighSpeedScadaHmi,
        EngagementDomain::PredictiveRulModeling,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Industry {
    #[default]
    Automotive,
    Aerospace,
    #[serde(rename = "Pharma/Biotech", alias = "Pharma / Biotech")]
    PharmaBiotech,
    #[serde(rename = "Energy & Utilities")]
    EnergyUtilities,
    #[serde(rename = "Heavy Machinery")]
    HeavyMachinery,
}

impl Industry {
    pub const ALL: [Industry; 5] = [
        Industry::Automotive,
        Industry::Aerospace,
        Industry::PharmaBiotech,
        Industry::EnergyUtilities,
        Industry::HeavyMachinery,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Timeline {
    #[default]
    #[serde(rename = "1-3 Months")]
    OneToThreeMonths,
    #[serde(rename = "3-6 Months")]
    ThreeToSixMonths,
    #[serde(rename = "6-12 Months")]
    SixToTwelveMonths,
    #[serde(rename = "Ongoing Partnership")]
    OngoingPartnership,
}

impl Timeline {
    pub const ALL: [Timeline; 4] = [
        Timeline::OneToThreeMonths,
        Timeline::ThreeToSixMonths,
        Timeline::SixToTwelveMonths,
        Timeline::OngoingPartnership,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Infrastructure {
    #[serde(alias = "Greenfield (New Factory)")]
    Greenfield,
    #[default]
    #[serde(alias = "Brownfield (Modernization)")]
    Brownfield,
    #[serde(rename = "Edge-only", alias = "Edge-only Expansion")]
    EdgeOnly,
    #[serde(rename = "Cloud Integration Only")]
    CloudIntegrationOnly,
}

impl Infrastructure {
    pub const ALL: [Infrastructure; 4] = [
        Infrastructure::Greenfield,
        Infrastructure::Brownfield,
        Infrastructure::EdgeOnly,
        Infrastructure::CloudIntegrationOnly,
    ];
}

fn default_priority() -> String {
    "Standard Review".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub domain: EngagementDomain,
    #[serde(default = "default_priority")]
    pub priority: String,
    #[serde(default)]
    pub industry: Industry,
    #[serde(default)]
    pub timeline: Timeline,
    #[serde(default)]
    pub infrastructure: Infrastructure,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub callback: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContactError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
}

impl ContactRequest {
    /// Required-field check applied before anything is sent.
    pub fn validate(&self) -> Result<(), ContactError> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("message", &self.message),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ContactError::MissingField(field));
            }
        }
        Ok(())
    }
}

/// The closed option lists offered by the contact form.
#[derive(Debug, Clone, Serialize)]
pub struct ContactOptions {
    pub domains: Vec<EngagementDomain>,
    pub industries: Vec<Industry>,
    pub timelines: Vec<Timeline>,
    pub infrastructures: Vec<Infrastructure>,
}

impl ContactOptions {
    pub fn all() -> Self {
        Self {
            domains: EngagementDomain::ALL.to_vec(),
            industries: Industry::ALL.to_vec(),
            timelines: Timeline::ALL.to_vec(),
            infrastructures: Infrastructure::ALL.to_vec(),
        }
    }
}
