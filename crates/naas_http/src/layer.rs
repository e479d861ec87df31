//! Chaos injection middleware
//!
//! Tower layer that consults the chaos engine per request and either
//! passes through to the inner service or writes the synthetic error the
//! engine produced. The injected delay is awaited here with a tokio sleep,
//! so a suspended request never blocks other evaluations.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use axum::{
    body::Body,
    extract::Request,
    http::{HeaderName, HeaderValue, StatusCode, header::CONTENT_TYPE},
    response::Response,
};
use tower::{Layer, Service};
use tracing::{error, warn};

use naas_core::{ChaosEngine, Decision, InjectedResponse, RequestContext};

/// Layer that applies chaos injection
#[derive(Clone, Debug)]
pub struct ChaosLayer {
    engine: Arc<ChaosEngine>,
}

impl ChaosLayer {
    /// Wrap an engine for use as middleware
    #[must_use]
    pub fn new(engine: Arc<ChaosEngine>) -> Self {
        Self { engine }
    }

    /// Get a handle to the engine for runtime controls
    #[must_use]
    pub fn engine(&self) -> Arc<ChaosEngine> {
        Arc::clone(&self.engine)
    }
}

impl<S> Layer<S> for ChaosLayer {
    type Service = ChaosMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        ChaosMiddleware {
            inner,
            engine: Arc::clone(&self.engine),
        }
    }
}

/// Middleware service that injects chaos decisions
#[derive(Clone, Debug)]
pub struct ChaosMiddleware<S> {
    inner: S,
    engine: Arc<ChaosEngine>,
}

impl<S> Service<Request> for ChaosMiddleware<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let engine = Arc::clone(&self.engine);
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let ctx = RequestContext::new(req.method().as_str(), req.uri().path());

            match engine.decide(&ctx).await {
                Ok(Decision::PassThrough) => inner.call(req).await,
                Ok(Decision::Handled(artifact)) => Ok(write_artifact(artifact).await),
                Ok(Decision::Inject(artifact)) => Ok(write_artifact(artifact).await),
                Err(fault) => {
                    // Fault path: the engine already logged the detail
                    error!("chaos middleware fault: {fault}");
                    Ok(fault_response())
                },
            }
        })
    }
}

/// Sleep the injected delay, then render the artifact as a response
async fn write_artifact(artifact: InjectedResponse) -> Response {
    if let Some(delay) = artifact.delay {
        tokio::time::sleep(delay).await;
    }

    let status =
        StatusCode::from_u16(artifact.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = Response::new(Body::from(artifact.body));
    *response.status_mut() = status;

    let headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&artifact.content_type) {
        headers.insert(CONTENT_TYPE, value);
    }
    // Insertion order implements shadowing: the artifact lists engine
    // headers before custom ones, and insert is last-write-wins
    for (name, value) in &artifact.headers {
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => {
                headers.insert(name, value);
            },
            _ => warn!("dropping invalid injected header {name:?}"),
        }
    }

    response
}

fn fault_response() -> Response {
    let mut response = Response::new(Body::from("chaos engine failure"));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
