// Builder for timesheet entries routed at the client fixtures.

use crate::modules::hour_ledger::core::time_entry::TimeEntry;

pub struct TimeEntryBuilder {
    inner: TimeEntry,
}

impl Default for TimeEntryBuilder {
    fn default() -> Self {
        Self::hourly()
    }
}

#[allow(dead_code)]
impl TimeEntryBuilder {
    /// Sixty minutes on the hourly client's only package.
    pub fn hourly() -> Self {
        Self {
            inner: TimeEntry {
                client_id: Some("client-hours-0001".into()),
                service_id: Some("svc-hours-0001".into()),
                package_id: Some("pkg-hours-0001".into()),
                minutes: 60,
                ..TimeEntry::default()
            },
        }
    }

    /// Sixty minutes on the first hourly stage of the legal procedure client.
    pub fn staged() -> Self {
        Self {
            inner: TimeEntry {
                client_id: Some("client-legal-0001".into()),
                service_id: Some("svc-legal-0001".into()),
                stage_id: Some("stage-a".into()),
                package_id: Some("pkg-stage-a-0001".into()),
                minutes: 60,
                ..TimeEntry::default()
            },
        }
    }

    pub fn minutes(mut self, v: i64) -> Self {
        self.inner.minutes = v;
        self
    }

    pub fn client_id(mut self, v: impl Into<String>) -> Self {
        self.inner.client_id = Some(v.into());
        self
    }

    pub fn service_id(mut self, v: impl Into<String>) -> Self {
        self.inner.service_id = Some(v.into());
        self
    }

    pub fn stage_id(mut self, v: impl Into<String>) -> Self {
        self.inner.stage_id = Some(v.into());
        self
    }

    pub fn package_id(mut self, v: impl Into<String>) -> Self {
        self.inner.package_id = Some(v.into());
        self
    }

    pub fn task_id(mut self, v: impl Into<String>) -> Self {
        self.inner.task_id = Some(v.into());
        self
    }

    pub fn clear_client(mut self) -> Self {
        self.inner.client_id = None;
        self
    }

    pub fn clear_stage(mut self) -> Self {
        self.inner.stage_id = None;
        self
    }

    pub fn clear_package(mut self) -> Self {
        self.inner.package_id = None;
        self
    }

    pub fn build(self) -> TimeEntry {
        self.inner
    }
}

#[cfg(test)]
mod time_entry_builder_tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn default_delegates_to_hourly() {
        let built = TimeEntryBuilder::default().build();
        assert_eq!(built, TimeEntryBuilder::hourly().build());
        assert_eq!(built.minutes, 60);
        assert_eq!(built.stage_id, None);
    }

    #[rstest]
    fn setters_override_the_routing_fields() {
        let built = TimeEntryBuilder::staged()
            .client_id("c-1")
            .service_id("s-1")
            .stage_id("st-1")
            .package_id("p-1")
            .task_id("t-1")
            .minutes(15)
            .build();
        assert_eq!(built.client_id.as_deref(), Some("c-1"));
        assert_eq!(built.service_id.as_deref(), Some("s-1"));
        assert_eq!(built.stage_id.as_deref(), Some("st-1"));
        assert_eq!(built.package_id.as_deref(), Some("p-1"));
        assert_eq!(built.task_id.as_deref(), Some("t-1"));
        assert_eq!(built.minutes, 15);
    }
}
