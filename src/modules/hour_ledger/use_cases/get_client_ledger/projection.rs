// Read model of the materialized ledger, as served to reporting and UI consumers.

use crate::modules::hour_ledger::core::budget_task::BudgetTask;
use crate::modules::hour_ledger::core::client::{ClientRecord, Package, Service, Stage};
use crate::modules::hour_ledger::core::invariants::audit;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageLedgerView {
    pub package_id: String,
    pub hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageLedgerView {
    pub stage_id: String,
    pub name: String,
    pub pricing_type: String,
    pub total_hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub total_hours_worked: f64,
    pub packages: Vec<PackageLedgerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceLedgerView {
    pub service_id: String,
    pub name: String,
    pub service_type: Option<String>,
    pub total_hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub packages: Vec<PackageLedgerView>,
    pub stages: Vec<StageLedgerView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientLedgerView {
    pub client_id: String,
    pub name: String,
    pub total_hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub minutes_used: f64,
    pub minutes_remaining: f64,
    pub is_blocked: bool,
    pub is_critical: bool,
    pub last_activity: Option<i64>,
    pub services: Vec<ServiceLedgerView>,
    /// Cached values that disagree with the service tree, one message per finding.
    pub drift: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetTaskView {
    pub task_id: String,
    pub actual_minutes: i64,
    pub actual_hours: f64,
    pub last_activity: Option<i64>,
}

impl From<&Package> for PackageLedgerView {
    fn from(package: &Package) -> Self {
        Self {
            package_id: package.id.clone(),
            hours: package.hours,
            hours_used: package.hours_used,
            hours_remaining: package.hours_remaining,
            status: package.status.as_str().to_string(),
        }
    }
}

impl From<&Stage> for StageLedgerView {
    fn from(stage: &Stage) -> Self {
        Self {
            stage_id: stage.id.clone(),
            name: stage.name.clone(),
            pricing_type: stage.pricing_type.as_str().to_string(),
            total_hours: stage.total_hours,
            hours_used: stage.hours_used,
            hours_remaining: stage.hours_remaining,
            total_hours_worked: stage.total_hours_worked,
            packages: stage.packages.iter().map(|p| p.as_ref().into()).collect(),
        }
    }
}

impl From<&Service> for ServiceLedgerView {
    fn from(service: &Service) -> Self {
        Self {
            service_id: service.id.clone(),
            name: service.name.clone(),
            service_type: service.service_type.clone(),
            total_hours: service.total_hours,
            hours_used: service.hours_used,
            hours_remaining: service.hours_remaining,
            packages: service.packages.iter().map(|p| p.as_ref().into()).collect(),
            stages: service.stages.iter().map(|s| s.as_ref().into()).collect(),
        }
    }
}

impl From<&ClientRecord> for ClientLedgerView {
    fn from(client: &ClientRecord) -> Self {
        let totals = client.totals();
        Self {
            client_id: client.id.clone(),
            name: client.name.clone(),
            total_hours: client.total_hours,
            hours_used: totals.hours_used,
            hours_remaining: totals.hours_remaining,
            minutes_used: totals.minutes_used,
            minutes_remaining: totals.minutes_remaining,
            is_blocked: totals.is_blocked,
            is_critical: totals.is_critical,
            last_activity: client.last_activity,
            services: client.services.iter().map(|s| s.as_ref().into()).collect(),
            drift: audit(client).iter().map(ToString::to_string).collect(),
        }
    }
}

impl From<BudgetTask> for BudgetTaskView {
    fn from(task: BudgetTask) -> Self {
        Self {
            task_id: task.id,
            actual_minutes: task.actual_minutes,
            actual_hours: task.actual_hours,
            last_activity: task.last_activity,
        }
    }
}
