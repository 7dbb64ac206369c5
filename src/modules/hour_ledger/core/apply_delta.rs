// Delta applicator.
//
// Purpose
// - Post a signed minutes delta to the located target and return the next service tree.
//
// Responsibilities
// - Rebuild only the service, stage and package on the path to the target; every sibling is
//   shared with the input tree through its `Arc`.
// - Keep package status consistent with its remaining hours, restoring `active` when an edit or
//   deletion frees capacity.
// - Recompute stage and service aggregates bottom-up, rounding at every level.
//
// Boundaries
// - Never mutates its input. Retries depend on this being a pure function of the read state.

use crate::modules::hour_ledger::core::client::{Package, PackageStatus, Service, Services, Stage};
use crate::modules::hour_ledger::core::locate::LedgerTarget;
use crate::shared::core::primitives::{hours_to_minutes, minutes_to_hours, round2};
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct AppliedDelta {
    pub services: Services,
    /// Minutes by which the posted package is overdrawn, if it went negative.
    pub package_overage_minutes: Option<f64>,
}

pub fn apply_delta(services: &[Arc<Service>], target: LedgerTarget, delta_minutes: i64) -> AppliedDelta {
    let delta_hours = minutes_to_hours(delta_minutes);
    let mut package_overage_minutes = None;
    let services = replace_at(services, target.service(), |service| {
        rebuild_service(service, target, delta_hours, &mut package_overage_minutes)
    });
    AppliedDelta {
        services,
        package_overage_minutes,
    }
}

fn rebuild_service(
    service: &Service,
    target: LedgerTarget,
    delta_hours: f64,
    overage: &mut Option<f64>,
) -> Service {
    match target {
        LedgerTarget::HourlyPackage { package, .. } => {
            let packages = replace_at(&service.packages, package, |p| {
                let (next, over) = post_to_package(p, delta_hours);
                *overage = over;
                next
            });
            let hours_used = sum_package_hours(&packages);
            Service {
                packages,
                hours_used,
                hours_remaining: round2(service.total_hours - hours_used),
                ..service.clone()
            }
        }
        LedgerTarget::FixedStage { stage, .. } => {
            let stages = replace_at(&service.stages, stage, |s| Stage {
                total_hours_worked: round2(s.total_hours_worked + delta_hours),
                ..s.clone()
            });
            recompute_staged_service(service, stages)
        }
        LedgerTarget::StagedPackage { stage, package, .. } => {
            let stages = replace_at(&service.stages, stage, |s| {
                let packages = replace_at(&s.packages, package, |p| {
                    let (next, over) = post_to_package(p, delta_hours);
                    *overage = over;
                    next
                });
                let hours_used = sum_package_hours(&packages);
                Stage {
                    packages,
                    hours_used,
                    hours_remaining: round2(s.total_hours - hours_used),
                    ..s.clone()
                }
            });
            recompute_staged_service(service, stages)
        }
    }
}

/// Copies the vector of `Arc`s, swapping in a rebuilt node at `index` only.
fn replace_at<T>(nodes: &[Arc<T>], index: usize, rebuild: impl FnOnce(&T) -> T) -> Vec<Arc<T>> {
    let mut next = nodes.to_vec();
    if let Some(slot) = next.get_mut(index) {
        *slot = Arc::new(rebuild(&nodes[index]));
    }
    next
}

fn post_to_package(package: &Package, delta_hours: f64) -> (Package, Option<f64>) {
    let hours_used = round2(package.hours_used + delta_hours);
    let hours_remaining = round2(package.hours - hours_used);
    let status = if hours_remaining <= 0.0 {
        PackageStatus::Depleted
    } else {
        PackageStatus::Active
    };
    let overage = (hours_remaining < 0.0).then(|| hours_to_minutes(hours_remaining.abs()));
    (
        Package {
            hours_used,
            hours_remaining,
            status,
            ..package.clone()
        },
        overage,
    )
}

pub(crate) fn sum_package_hours(packages: &[Arc<Package>]) -> f64 {
    round2(packages.iter().map(|p| p.hours_used).sum())
}

fn recompute_staged_service(service: &Service, stages: Vec<Arc<Stage>>) -> Service {
    let hours_used = round2(stages.iter().map(|s| s.contributed_hours()).sum());
    Service {
        stages,
        hours_used,
        hours_remaining: round2(service.total_hours - hours_used),
        ..service.clone()
    }
}

#[cfg(test)]
mod delta_applicator_tests {
    use super::*;
    use crate::tests::fixtures::clients::{hourly_client, legal_procedure_client};
    use rstest::rstest;

    const HOURLY: LedgerTarget = LedgerTarget::HourlyPackage { service: 0, package: 0 };

    #[rstest]
    fn it_should_post_minutes_to_an_hourly_package() {
        let client = hourly_client();
        let applied = apply_delta(&client.services, HOURLY, 540);
        let service = &applied.services[0];
        let package = &service.packages[0];
        assert_eq!(package.hours_used, 9.0);
        assert_eq!(package.hours_remaining, 1.0);
        assert_eq!(package.status, PackageStatus::Active);
        assert_eq!(service.hours_used, 9.0);
        assert_eq!(service.hours_remaining, 1.0);
        assert_eq!(applied.package_overage_minutes, None);
    }

    #[rstest]
    fn it_should_deplete_and_report_package_overage() {
        let client = hourly_client();
        let applied = apply_delta(&client.services, HOURLY, 720);
        let package = &applied.services[0].packages[0];
        assert_eq!(package.hours_remaining, -2.0);
        assert_eq!(package.status, PackageStatus::Depleted);
        assert_eq!(applied.package_overage_minutes, Some(120.0));
    }

    #[rstest]
    fn it_should_mark_an_exactly_consumed_package_as_depleted_without_overage() {
        let client = hourly_client();
        let applied = apply_delta(&client.services, HOURLY, 600);
        let package = &applied.services[0].packages[0];
        assert_eq!(package.hours_remaining, 0.0);
        assert_eq!(package.status, PackageStatus::Depleted);
        assert_eq!(applied.package_overage_minutes, None);
    }

    #[rstest]
    fn it_should_restore_a_depleted_package_when_hours_are_freed() {
        let client = hourly_client();
        let depleted = apply_delta(&client.services, HOURLY, 720);
        let restored = apply_delta(&depleted.services, HOURLY, -180);
        let package = &restored.services[0].packages[0];
        assert_eq!(package.hours_used, 9.0);
        assert_eq!(package.status, PackageStatus::Active);
        assert_eq!(restored.package_overage_minutes, None);
    }

    #[rstest]
    fn it_should_not_mutate_the_input_tree() {
        let client = hourly_client();
        let before = client.services.clone();
        let _ = apply_delta(&client.services, HOURLY, 300);
        assert_eq!(client.services, before);
        assert_eq!(client.services[0].packages[0].hours_used, 0.0);
    }

    #[rstest]
    fn it_should_share_untouched_siblings_with_the_input_tree() {
        let client = legal_procedure_client();
        let target = LedgerTarget::StagedPackage { service: 0, stage: 1, package: 0 };
        let applied = apply_delta(&client.services, target, 60);
        let (old, new) = (&client.services[0], &applied.services[0]);
        assert!(!Arc::ptr_eq(old, new));
        assert!(Arc::ptr_eq(&old.stages[0], &new.stages[0]));
        assert!(!Arc::ptr_eq(&old.stages[1], &new.stages[1]));
        assert!(Arc::ptr_eq(&old.stages[2], &new.stages[2]));
    }

    #[rstest]
    fn it_should_recompute_stage_and_service_aggregates_for_hourly_stages() {
        let client = legal_procedure_client();
        let target = LedgerTarget::StagedPackage { service: 0, stage: 0, package: 0 };
        let applied = apply_delta(&client.services, target, 150);
        let service = &applied.services[0];
        let stage = &service.stages[0];
        assert_eq!(stage.packages[0].hours_used, 2.5);
        assert_eq!(stage.hours_used, 2.5);
        assert_eq!(stage.hours_remaining, 7.5);
        assert_eq!(service.hours_used, 2.5);
        assert_eq!(service.hours_remaining, round2(service.total_hours - 2.5));
    }

    #[rstest]
    fn it_should_only_track_worked_hours_on_fixed_stages() {
        let client = legal_procedure_client();
        let target = LedgerTarget::FixedStage { service: 0, stage: 2 };
        let applied = apply_delta(&client.services, target, 95);
        let service = &applied.services[0];
        let stage = &service.stages[2];
        assert_eq!(stage.total_hours_worked, 1.58);
        assert!(stage.packages.is_empty());
        assert_eq!(service.hours_used, 1.58);
        assert_eq!(applied.package_overage_minutes, None);
    }

    #[rstest]
    fn it_should_report_overage_on_an_hourly_stage_package() {
        let client = legal_procedure_client();
        let target = LedgerTarget::StagedPackage { service: 0, stage: 1, package: 0 };
        let applied = apply_delta(&client.services, target, 400);
        let package = &applied.services[0].stages[1].packages[0];
        assert_eq!(package.hours_remaining, -0.67);
        assert_eq!(package.status, PackageStatus::Depleted);
        assert_eq!(applied.package_overage_minutes, Some(40.2));
    }
}
