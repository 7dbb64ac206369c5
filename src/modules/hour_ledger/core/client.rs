// Client document and the service tree it owns.
//
// Purpose
// - Mirror the client document of the hosted store: purchased hours, the ordered
//   service tree (service -> stage -> package) and the cached ledger totals.
//
// Responsibilities
// - Keep the tree as plain values behind `Arc` so a posting can rebuild only the path to the
//   touched package and share every sibling with the previous version.
// - Keep the cached totals private. Only the ledger engine replaces them, via `with_ledger`.
// - Preserve unknown document fields through a rewrite.
//
// Boundaries
// - No input or output here.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;
use std::sync::Arc;

pub type Services = Vec<Arc<Service>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Legacy client-wide service type, used when a service carries no `type` of its own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub procedure_type: Option<String>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub services: Services,
    #[serde(default)]
    hours_used: f64,
    #[serde(default)]
    hours_remaining: f64,
    #[serde(default)]
    minutes_used: f64,
    #[serde(default)]
    minutes_remaining: f64,
    #[serde(default)]
    is_blocked: bool,
    #[serde(default)]
    is_critical: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<i64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Client-wide ledger totals, always a pure function of the service tree and `total_hours`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientTotals {
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub minutes_used: f64,
    pub minutes_remaining: f64,
    pub is_blocked: bool,
    pub is_critical: bool,
}

impl ClientRecord {
    pub fn totals(&self) -> ClientTotals {
        ClientTotals {
            hours_used: self.hours_used,
            hours_remaining: self.hours_remaining,
            minutes_used: self.minutes_used,
            minutes_remaining: self.minutes_remaining,
            is_blocked: self.is_blocked,
            is_critical: self.is_critical,
        }
    }

    pub fn service(&self, service_id: &str) -> Option<&Arc<Service>> {
        self.services.iter().find(|s| s.id == service_id)
    }

    /// Produces the next version of the client with a recomputed tree and totals.
    pub(crate) fn with_ledger(
        &self,
        services: Services,
        totals: ClientTotals,
        last_activity: i64,
    ) -> Self {
        Self {
            services,
            hours_used: totals.hours_used,
            hours_remaining: totals.hours_remaining,
            minutes_used: totals.minutes_used,
            minutes_remaining: totals.minutes_remaining,
            is_blocked: totals.is_blocked,
            is_critical: totals.is_critical,
            last_activity: Some(last_activity),
            ..self.clone()
        }
    }
}

/// The two service shapes the ledger knows how to post against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceType {
    /// Flat hourly service holding packages directly.
    Hourly,
    /// Legal procedure made of stages.
    Staged,
}

impl ServiceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceType::Hourly => "hours",
            ServiceType::Staged => "legal_procedure",
        }
    }
}

impl FromStr for ServiceType {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "hours" => Ok(ServiceType::Hourly),
            "legal_procedure" => Ok(ServiceType::Staged),
            other => Err(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub service_type: Option<String>,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub hours_used: f64,
    #[serde(default)]
    pub hours_remaining: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Arc<Package>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stages: Vec<Arc<Stage>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Service {
    /// Raw type string of this service, falling back to the client's legacy procedure type.
    pub fn type_or<'a>(&'a self, procedure_type: Option<&'a str>) -> Option<&'a str> {
        self.service_type
            .as_deref()
            .filter(|t| !t.is_empty())
            .or(procedure_type)
    }

    pub fn package(&self, package_id: &str) -> Option<usize> {
        self.packages.iter().position(|p| p.id == package_id)
    }

    pub fn stage(&self, stage_id: &str) -> Option<usize> {
        self.stages.iter().position(|s| s.id == stage_id)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingType {
    /// Fixed-price stage: hours are tracked, nothing is deducted.
    Fixed,
    #[default]
    Hourly,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stage {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pricing_type: PricingType,
    #[serde(default)]
    pub total_hours: f64,
    #[serde(default)]
    pub hours_used: f64,
    #[serde(default)]
    pub hours_remaining: f64,
    #[serde(default)]
    pub total_hours_worked: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub packages: Vec<Arc<Package>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PricingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PricingType::Fixed => "fixed",
            PricingType::Hourly => "hourly",
        }
    }
}

impl Stage {
    pub fn package(&self, package_id: &str) -> Option<usize> {
        self.packages.iter().position(|p| p.id == package_id)
    }

    /// Hours this stage contributes to its service.
    pub fn contributed_hours(&self) -> f64 {
        match self.pricing_type {
            PricingType::Fixed => self.total_hours_worked,
            PricingType::Hourly => self.hours_used,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageStatus {
    #[default]
    Active,
    Depleted,
}

impl PackageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageStatus::Active => "active",
            PackageStatus::Depleted => "depleted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Package {
    pub id: String,
    #[serde(default)]
    pub hours: f64,
    #[serde(default)]
    pub hours_used: f64,
    #[serde(default)]
    pub hours_remaining: f64,
    #[serde(default)]
    pub status: PackageStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
