use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{Extension, Router, routing::get};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, fmt};

use hour_ledger::shared::infrastructure::document_store::in_memory::InMemoryDocumentStore;
use hour_ledger::shell::config::Config;
use hour_ledger::shell::graphql::{AppSchema, schema};
use hour_ledger::shell::http::router;
use hour_ledger::shell::seed::Seed;
use hour_ledger::shell::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let dotenv = dotenvy::dotenv();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    if let Ok(path) = dotenv {
        tracing::info!("loaded environment from {}", path.display());
    }

    let config = Config::from_env()?;

    // In-memory store for now
    let store = InMemoryDocumentStore::new();
    if let Some(path) = &config.seed_file {
        Seed::from_file(path)?.load_into(&store).await;
    }
    let state = AppState::new(Arc::new(store), config.policy());

    let gql = Router::new()
        .route("/gql", get(graphiql).post(graphql))
        .layer(Extension(schema(state.clone())));
    let app = router(state)
        .merge(gql)
        .layer(TraceLayer::new_for_http());

    tracing::info!(
        max_commit_attempts = config.max_commit_attempts,
        idempotency_ttl_hours = config.idempotency_ttl_hours,
        "listening on http://{}, GraphQL at /gql",
        config.addr
    );
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

async fn graphql(Extension(schema): Extension<AppSchema>, req: GraphQLRequest) -> GraphQLResponse {
    schema.execute(req.into_inner()).await.into()
}

async fn graphiql() -> axum::response::Html<String> {
    use async_graphql::http::GraphiQLSource;
    axum::response::Html(GraphiQLSource::build().endpoint("/gql").finish())
}
