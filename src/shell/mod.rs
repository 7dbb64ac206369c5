// Composition root for the hour ledger service.
//
// Responsibilities
// - Read config from environment.
// - Instantiate the document store and seed it.
// - Wire the store into use case handlers, the HTTP router and the GraphQL schema.

pub mod config;
pub mod graphql;
pub mod http;
pub mod seed;
pub mod state;
