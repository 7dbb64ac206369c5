pub mod shared {
    pub mod core {
        pub mod primitives;
    }
    pub mod infrastructure {
        pub mod document_store;
    }
}

pub mod modules {
    pub mod hour_ledger {
        pub mod core {
            pub mod aggregate;
            pub mod apply_delta;
            pub mod budget_task;
            pub mod change;
            pub mod client;
            pub mod invariants;
            pub mod locate;
            pub mod overage;
            pub mod task_ledger;
            pub mod time_entry;
        }
        pub mod use_cases {
            pub mod reconcile_entry_change {
                pub mod command;
                pub mod decide;
                pub mod decision;
                pub mod handler;
                pub mod transaction;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod write_time_entry {
                pub mod command;
                pub mod handler;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
            pub mod get_client_ledger {
                pub mod projection;
                pub mod queries_port;
                pub mod inbound {
                    pub mod graphql;
                    pub mod http;
                }
            }
        }
        pub mod adapters {
            pub mod outbound {
                pub mod ledger_queries;
            }
        }
    }
}

pub mod shell;
