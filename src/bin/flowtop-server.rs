use std::sync::Arc;

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::sync::RwLock;

use flowtop::error::FlowError;
use flowtop::model::NodePath;
use flowtop::remote::{
    AlterRequest, Alteration, ArtifactKind, CommandVerb, MemoryWorkflow, NO_SUCH_NODE,
    WorkflowSeed, demo_seed,
};

#[path = "flowtop_server/http_error.rs"]
mod http_error;
use self::http_error::*;
#[path = "flowtop_server/handlers.rs"]
mod handlers;
use self::handlers::*;
#[path = "flowtop_server/routes.rs"]
mod routes;
use self::routes::*;
#[path = "flowtop_server/runtime.rs"]
mod runtime;

#[derive(Clone)]
struct AppState {
    workflow: Arc<RwLock<MemoryWorkflow>>,
}

#[tokio::main]
async fn main() {
    if let Err(err) = runtime::run().await {
        eprintln!("{:#}", err);
        std::process::exit(1);
    }
}
