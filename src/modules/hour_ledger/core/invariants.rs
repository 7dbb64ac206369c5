// Ledger audit.
//
// Purpose
// - Check that a client's cached ledger is exactly what the engine would derive from its tree.
//
// Responsibilities
// - Package status matches its remaining hours, and remaining = hours - used.
// - Stage and service aggregates equal the sum of their children, and their remaining hours
//   equal total - used.
// - Client totals equal the aggregate of the services.
//
// Notes
// - Documents written by the engine always pass. Drift points at legacy data or a writer
//   other than the engine.

use crate::modules::hour_ledger::core::aggregate::aggregate;
use crate::modules::hour_ledger::core::apply_delta::sum_package_hours;
use crate::modules::hour_ledger::core::client::{
    ClientRecord, ClientTotals, Package, PackageStatus, PricingType, Service, ServiceType,
};
use crate::shared::core::primitives::round2;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum LedgerDrift {
    #[error("package {package_id}: status {status:?} does not match {hours_remaining} remaining hours")]
    PackageStatus {
        package_id: String,
        status: PackageStatus,
        hours_remaining: f64,
    },

    #[error("package {package_id}: remaining {actual}, expected {expected}")]
    PackageRemaining {
        package_id: String,
        actual: f64,
        expected: f64,
    },

    #[error("stage {stage_id}: hours used {actual}, expected {expected}")]
    StageHoursUsed {
        stage_id: String,
        actual: f64,
        expected: f64,
    },

    #[error("stage {stage_id}: remaining {actual}, expected {expected}")]
    StageRemaining {
        stage_id: String,
        actual: f64,
        expected: f64,
    },

    #[error("service {service_id}: hours used {actual}, expected {expected}")]
    ServiceHoursUsed {
        service_id: String,
        actual: f64,
        expected: f64,
    },

    #[error("service {service_id}: remaining {actual}, expected {expected}")]
    ServiceRemaining {
        service_id: String,
        actual: f64,
        expected: f64,
    },

    #[error("client totals {actual:?} differ from derived {expected:?}")]
    ClientTotals {
        actual: ClientTotals,
        expected: ClientTotals,
    },
}

pub fn audit(client: &ClientRecord) -> Vec<LedgerDrift> {
    let mut drift = Vec::new();
    for service in &client.services {
        audit_service(service, client.procedure_type.as_deref(), &mut drift);
    }
    let expected = aggregate(&client.services, client.total_hours);
    if client.totals() != expected {
        drift.push(LedgerDrift::ClientTotals {
            actual: client.totals(),
            expected,
        });
    }
    drift
}

fn audit_service(service: &Service, procedure_type: Option<&str>, drift: &mut Vec<LedgerDrift>) {
    let staged = matches!(
        service.type_or(procedure_type).and_then(|t| t.parse::<ServiceType>().ok()),
        Some(ServiceType::Staged)
    );
    let expected = if staged {
        for stage in &service.stages {
            stage.packages.iter().for_each(|p| audit_package(p, drift));
            if stage.pricing_type == PricingType::Hourly {
                let expected = sum_package_hours(&stage.packages);
                if stage.hours_used != expected {
                    drift.push(LedgerDrift::StageHoursUsed {
                        stage_id: stage.id.clone(),
                        actual: stage.hours_used,
                        expected,
                    });
                }
                let remaining = round2(stage.total_hours - stage.hours_used);
                if stage.hours_remaining != remaining {
                    drift.push(LedgerDrift::StageRemaining {
                        stage_id: stage.id.clone(),
                        actual: stage.hours_remaining,
                        expected: remaining,
                    });
                }
            }
        }
        round2(service.stages.iter().map(|s| s.contributed_hours()).sum())
    } else {
        service.packages.iter().for_each(|p| audit_package(p, drift));
        sum_package_hours(&service.packages)
    };
    if service.hours_used != expected {
        drift.push(LedgerDrift::ServiceHoursUsed {
            service_id: service.id.clone(),
            actual: service.hours_used,
            expected,
        });
    }
    let remaining = round2(service.total_hours - service.hours_used);
    if service.hours_remaining != remaining {
        drift.push(LedgerDrift::ServiceRemaining {
            service_id: service.id.clone(),
            actual: service.hours_remaining,
            expected: remaining,
        });
    }
}

fn audit_package(package: &Package, drift: &mut Vec<LedgerDrift>) {
    let depleted = package.status == PackageStatus::Depleted;
    if depleted != (package.hours_remaining <= 0.0) {
        drift.push(LedgerDrift::PackageStatus {
            package_id: package.id.clone(),
            status: package.status,
            hours_remaining: package.hours_remaining,
        });
    }
    let expected = round2(package.hours - package.hours_used);
    if package.hours_remaining != expected {
        drift.push(LedgerDrift::PackageRemaining {
            package_id: package.id.clone(),
            actual: package.hours_remaining,
            expected,
        });
    }
}
