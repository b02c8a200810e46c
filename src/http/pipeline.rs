//! Ordered request pipeline.
//!
//! # Data Flow
//! ```text
//! Request
//!     → stage 1 (e.g. access control)  ── Respond ──▶ Response
//!     → stage 2                        ── Respond ──▶ Response
//!     → ...
//!     → Continue: dispatch handler
//! ```
//!
//! # Design Decisions
//! - Stages run in registration order
//! - A stage either continues or short-circuits with a response
//! - Stages are synchronous; forwarding is the only awaited step

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Request, State},
    http::Request as HttpRequest,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::http::error::GatewayError;

/// Outcome of a single stage.
#[derive(Debug)]
pub enum Flow {
    /// Hand the request to the next stage.
    Continue,
    /// Stop here and answer with this response.
    Respond(Response),
}

impl Flow {
    pub fn reject(err: GatewayError) -> Self {
        Flow::Respond(err.into_response())
    }
}

/// A request-handling stage.
pub trait Stage: Send + Sync + std::fmt::Debug {
    /// Stage name for logs.
    fn name(&self) -> &'static str;

    /// Inspect or annotate the request.
    fn process(&self, request: &mut HttpRequest<Body>) -> Flow;
}

/// Stages evaluated before dispatch.
#[derive(Clone, Debug, Default)]
pub struct Pipeline {
    stages: Vec<Arc<dyn Stage>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage.
    pub fn with_stage(mut self, stage: Arc<dyn Stage>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Run every stage until one short-circuits.
    pub fn run(&self, request: &mut HttpRequest<Body>) -> Flow {
        for stage in &self.stages {
            if let Flow::Respond(response) = stage.process(request) {
                tracing::debug!(
                    stage = stage.name(),
                    status = %response.status(),
                    path = %request.uri().path(),
                    "Pipeline short-circuited"
                );
                return Flow::Respond(response);
            }
        }
        Flow::Continue
    }
}

/// Axum middleware running the pipeline in front of the handlers.
pub async fn pipeline_middleware(
    State(pipeline): State<Pipeline>,
    mut request: Request,
    next: Next,
) -> Response {
    match pipeline.run(&mut request) {
        Flow::Continue => next.run(request).await,
        Flow::Respond(response) => response,
    }
}
