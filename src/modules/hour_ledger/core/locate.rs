// Target locator.
//
// Purpose
// - Resolve the package (or fixed-price stage) an entry's minutes are posted against.
//
// Responsibilities
// - Require `serviceId` always, `packageId` for hourly services and hourly stages, `stageId`
//   for legal procedures.
// - Tell caller errors (a required routing field is missing on the entry) apart from data
//   inconsistencies (the field is present but nothing in the tree matches).
//
// Boundaries
// - Pure lookup. Returns indexes into the tree it was given, never a modified tree.

use crate::modules::hour_ledger::core::client::{ClientRecord, PricingType, ServiceType};
use crate::modules::hour_ledger::core::time_entry::EntryRouting;
use thiserror::Error;

/// Where a posting lands, as indexes into the client's service tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerTarget {
    HourlyPackage {
        service: usize,
        package: usize,
    },
    FixedStage {
        service: usize,
        stage: usize,
    },
    StagedPackage {
        service: usize,
        stage: usize,
        package: usize,
    },
}

impl LedgerTarget {
    pub fn service(&self) -> usize {
        match *self {
            LedgerTarget::HourlyPackage { service, .. }
            | LedgerTarget::FixedStage { service, .. }
            | LedgerTarget::StagedPackage { service, .. } => service,
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LocateError {
    #[error("entry has no serviceId")]
    MissingServiceId,

    #[error("entry has no stageId, required for legal procedure service {service_id}")]
    MissingStageId { service_id: String },

    #[error("entry has no packageId, required for hourly posting on service {service_id}")]
    MissingPackageId { service_id: String },

    #[error("service {service_id} not found")]
    ServiceNotFound { service_id: String },

    #[error("unknown service type {service_type:?} on service {service_id}")]
    UnknownServiceType {
        service_id: String,
        service_type: Option<String>,
    },

    #[error("stage {stage_id} not found in service {service_id}")]
    StageNotFound { service_id: String, stage_id: String },

    #[error("package {package_id} not found in service {service_id} (stage {stage_id:?})")]
    PackageNotFound {
        service_id: String,
        stage_id: Option<String>,
        package_id: String,
    },
}

impl LocateError {
    /// True when the entry itself lacks a routing field, false when the tree is inconsistent.
    pub fn is_caller_error(&self) -> bool {
        matches!(
            self,
            LocateError::MissingServiceId
                | LocateError::MissingStageId { .. }
                | LocateError::MissingPackageId { .. }
        )
    }
}

pub fn locate(client: &ClientRecord, routing: &EntryRouting<'_>) -> Result<LedgerTarget, LocateError> {
    let service_id = routing.service_id.ok_or(LocateError::MissingServiceId)?;
    let service_index = client
        .services
        .iter()
        .position(|s| s.id == service_id)
        .ok_or_else(|| LocateError::ServiceNotFound {
            service_id: service_id.to_string(),
        })?;
    let service = &client.services[service_index];

    let raw_type = service.type_or(client.procedure_type.as_deref());
    let service_type = raw_type
        .and_then(|t| t.parse::<ServiceType>().ok())
        .ok_or_else(|| LocateError::UnknownServiceType {
            service_id: service_id.to_string(),
            service_type: raw_type.map(str::to_string),
        })?;

    match service_type {
        ServiceType::Hourly => {
            let package_id = routing.package_id.ok_or_else(|| LocateError::MissingPackageId {
                service_id: service_id.to_string(),
            })?;
            let package = service
                .package(package_id)
                .ok_or_else(|| LocateError::PackageNotFound {
                    service_id: service_id.to_string(),
                    stage_id: None,
                    package_id: package_id.to_string(),
                })?;
            Ok(LedgerTarget::HourlyPackage {
                service: service_index,
                package,
            })
        }
        ServiceType::Staged => {
            let stage_id = routing.stage_id.ok_or_else(|| LocateError::MissingStageId {
                service_id: service_id.to_string(),
            })?;
            let stage_index = service
                .stage(stage_id)
                .ok_or_else(|| LocateError::StageNotFound {
                    service_id: service_id.to_string(),
                    stage_id: stage_id.to_string(),
                })?;
            let stage = &service.stages[stage_index];
            match stage.pricing_type {
                PricingType::Fixed => Ok(LedgerTarget::FixedStage {
                    service: service_index,
                    stage: stage_index,
                }),
                PricingType::Hourly => {
                    let package_id =
                        routing.package_id.ok_or_else(|| LocateError::MissingPackageId {
                            service_id: service_id.to_string(),
                        })?;
                    let package =
                        stage
                            .package(package_id)
                            .ok_or_else(|| LocateError::PackageNotFound {
                                service_id: service_id.to_string(),
                                stage_id: Some(stage_id.to_string()),
                                package_id: package_id.to_string(),
                            })?;
                    Ok(LedgerTarget::StagedPackage {
                        service: service_index,
                        stage: stage_index,
                        package,
                    })
                }
            }
        }
    }
}
