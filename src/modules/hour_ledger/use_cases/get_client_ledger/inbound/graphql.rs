use async_graphql::{Context, Object, Result as GqlResult, SimpleObject};

use crate::modules::hour_ledger::use_cases::get_client_ledger::projection::{
    BudgetTaskView, ClientLedgerView, PackageLedgerView, ServiceLedgerView, StageLedgerView,
};
use crate::shell::state::AppState;

#[derive(SimpleObject, Clone)]
pub struct GqlPackageLedger {
    pub package_id: String,
    pub hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub status: String,
}

impl From<PackageLedgerView> for GqlPackageLedger {
    fn from(v: PackageLedgerView) -> Self {
        Self {
            package_id: v.package_id,
            hours: v.hours,
            hours_used: v.hours_used,
            hours_remaining: v.hours_remaining,
            status: v.status,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlStageLedger {
    pub stage_id: String,
    pub name: String,
    pub pricing_type: String,
    pub total_hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub total_hours_worked: f64,
    pub packages: Vec<GqlPackageLedger>,
}

impl From<StageLedgerView> for GqlStageLedger {
    fn from(v: StageLedgerView) -> Self {
        Self {
            stage_id: v.stage_id,
            name: v.name,
            pricing_type: v.pricing_type,
            total_hours: v.total_hours,
            hours_used: v.hours_used,
            hours_remaining: v.hours_remaining,
            total_hours_worked: v.total_hours_worked,
            packages: v.packages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlServiceLedger {
    pub service_id: String,
    pub name: String,
    pub service_type: Option<String>,
    pub total_hours: f64,
    pub hours_used: f64,
    pub hours_remaining: f64,
    pub packages: Vec<GqlPackageLedger>,
    pub stages: Vec<GqlStageLedger>,
}

impl From<ServiceLedgerView> for GqlServiceLedger {
    fn from(v: ServiceLedgerView) -> Self {
        Self {
            service_id: v.service_id,
            name: v.name,
            service_type: v.service_type,
            total_hours: v.total_hours,
            hours_used: v.hours_used,
            hours_remaining: v.hours_remaining,
            packages: v.packages.into_iter().map(Into::into).collect(),
            stages: v.stages.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlClientLedger {
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
    pub services: Vec<GqlServiceLedger>,
    pub drift: Vec<String>,
}

impl From<ClientLedgerView> for GqlClientLedger {
    fn from(v: ClientLedgerView) -> Self {
        Self {
            client_id: v.client_id,
            name: v.name,
            total_hours: v.total_hours,
            hours_used: v.hours_used,
            hours_remaining: v.hours_remaining,
            minutes_used: v.minutes_used,
            minutes_remaining: v.minutes_remaining,
            is_blocked: v.is_blocked,
            is_critical: v.is_critical,
            last_activity: v.last_activity,
            services: v.services.into_iter().map(Into::into).collect(),
            drift: v.drift,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct GqlBudgetTask {
    pub task_id: String,
    pub actual_minutes: i64,
    pub actual_hours: f64,
    pub last_activity: Option<i64>,
}

impl From<BudgetTaskView> for GqlBudgetTask {
    fn from(v: BudgetTaskView) -> Self {
        Self {
            task_id: v.task_id,
            actual_minutes: v.actual_minutes,
            actual_hours: v.actual_hours,
            last_activity: v.last_activity,
        }
    }
}

pub struct QueryRoot;

#[Object]
impl QueryRoot {
    async fn client_ledger(
        &self,
        context: &Context<'_>,
        client_id: String,
    ) -> GqlResult<Option<GqlClientLedger>> {
        let state = context.data_unchecked::<AppState>();
        let ledger = state.queries.client_ledger(&client_id).await?;
        Ok(ledger.map(Into::into))
    }

    async fn budget_task(
        &self,
        context: &Context<'_>,
        task_id: String,
    ) -> GqlResult<Option<GqlBudgetTask>> {
        let state = context.data_unchecked::<AppState>();
        let task = state.queries.budget_task(&task_id).await?;
        Ok(task.map(Into::into))
    }
}
