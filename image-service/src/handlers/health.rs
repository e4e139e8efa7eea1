/// Liveness probe.
pub async fn health_check() -> &'static str {
    "ok"
}

/// Readiness probe. Reports ready whenever the process serves requests;
/// storage availability is not checked.
pub async fn readiness_check() -> &'static str {
    "ready"
}
