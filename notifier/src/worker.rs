//! Render worker entry: decode the argument, resolve presets, run the lifecycle.

use std::sync::Arc;
use std::time::Duration;

use notify_presets::{NotificationRequest, ProtocolError, RenderPlan};

use crate::lifecycle::{Lifecycle, NotificationBackend, run_lifecycle};

/// Decode `payload` and show it. Decode failures are returned before any
/// native call is made.
///
/// `default_grace` applies when the request carries no grace of its own.
pub async fn run_worker(
    payload: Option<&str>,
    backend: Arc<dyn NotificationBackend>,
    default_grace: Duration,
) -> Result<Lifecycle, ProtocolError> {
    let request = NotificationRequest::decode(payload.unwrap_or_default())?;
    let grace = request
        .grace_ms
        .map(Duration::from_millis)
        .unwrap_or(default_grace);
    let plan = RenderPlan::from_request(&request);
    tracing::debug!(
        title = %plan.title,
        timeout_ms = plan.timeout_ms,
        grace_ms = u64::try_from(grace.as_millis()).unwrap_or(u64::MAX),
        wait = plan.wait,
        "Decoded notification request"
    );
    Ok(run_lifecycle(backend, plan, grace).await)
}
