use super::*;

fn node_path(rest: &str) -> Result<NodePath, Response> {
    NodePath::parse(&format!("/{}", rest.trim_start_matches('/')))
        .map_err(|err| bad_request(&err.to_string()))
}

pub(super) async fn healthz() -> Json<serde_json::Value> {
    Json(serde_json::json!({"ok": true}))
}

pub(super) async fn get_defs(State(state): State<Arc<AppState>>) -> Response {
    let workflow = state.workflow.read().await;
    Json(workflow.definitions().clone()).into_response()
}

pub(super) async fn get_file(
    State(state): State<Arc<AppState>>,
    Path((kind, rest)): Path<(String, String)>,
) -> Response {
    let kind: ArtifactKind = match kind.parse() {
        Ok(k) => k,
        Err(err) => return flow_error(err),
    };
    let path = match node_path(&rest) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let workflow = state.workflow.read().await;
    match workflow.file(&path, kind) {
        Ok(body) => text(body),
        Err(err) => flow_error(err),
    }
}

pub(super) async fn post_command(
    State(state): State<Arc<AppState>>,
    Path((verb, rest)): Path<(String, String)>,
) -> Response {
    let verb: CommandVerb = match verb.parse() {
        Ok(v) => v,
        Err(err) => return flow_error(err),
    };
    let path = match node_path(&rest) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let mut workflow = state.workflow.write().await;
    match workflow.apply(&path, verb) {
        Ok(()) => {
            tracing::info!(%path, verb = verb.as_str(), "command applied");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            tracing::warn!(%path, verb = verb.as_str(), error = %err, "command rejected");
            flow_error(err)
        }
    }
}

pub(super) async fn post_alter(
    State(state): State<Arc<AppState>>,
    Path(rest): Path<String>,
    Json(req): Json<AlterRequest>,
) -> Response {
    let path = match node_path(&rest) {
        Ok(p) => p,
        Err(resp) => return resp,
    };
    let alteration = match Alteration::try_from(req) {
        Ok(a) => a,
        Err(err) => return flow_error(err),
    };
    let mut workflow = state.workflow.write().await;
    match workflow.alter(&path, &alteration) {
        Ok(()) => {
            tracing::info!(%path, action = %alteration.action(), "alter applied");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            tracing::warn!(%path, action = %alteration.action(), error = %err, "alter rejected");
            flow_error(err)
        }
    }
}
