use super::*;

pub(super) fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/defs", get(get_defs))
        .route("/files/:kind/*path", get(get_file))
        .route("/commands/:verb/*path", post(post_command))
        .route("/alter/*path", post(post_alter))
        .with_state(state)
}
