//! HTTP front end for a [`Translator`].
//!
//! | Route              | Body                 | Response             |
//! |--------------------|----------------------|----------------------|
//! | `POST /to_trapi`   | JSON string question | query graph          |
//! | `POST /to_english` | query graph          | JSON string question |
//!
//! Failures caused by the request answer 400 with `{"detail": message}`.
//! Failures of an upstream service answer 502, anything else 500.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use hyper::body::Incoming;
use hyper::header::{CONTENT_TYPE, HeaderValue};
use hyper::server::conn::http1;
use hyper::{Method, Request, Response, StatusCode};
use hyper_util::rt::TokioIo;
use serde::Serialize;
use serde_json::json;
use tokio::net::{TcpListener, ToSocketAddrs};
use tokio::task::JoinHandle;
use trapi_grammar::{GrammarError, QueryGraph, Translator};

type HttpResponse = Response<Full<Bytes>>;

/// A running server.
pub struct Server {
    /// The base URL the server is listening on.
    pub endpoint: String,
    address: SocketAddr,
    shutdown_tx: tokio::sync::oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl Server {
    /// Bind to `address` and start serving in the background.
    pub async fn start(
        address: impl ToSocketAddrs,
        translator: Arc<Translator>,
    ) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(address).await?;
        let address = listener.local_addr()?;
        let endpoint = format!("http://{}", address);

        let (shutdown_tx, mut shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = &mut shutdown_rx => break,
                    result = listener.accept() => {
                        let (stream, peer) = match result {
                            Ok(accepted) => accepted,
                            Err(error) => {
                                tracing::warn!(%error, "failed to accept connection");
                                continue;
                            }
                        };
                        let translator = translator.clone();
                        tokio::spawn(async move {
                            let service = hyper::service::service_fn(move |req| {
                                let translator = translator.clone();
                                async move { handle_request(req, translator).await }
                            });
                            if let Err(error) = http1::Builder::new()
                                .serve_connection(TokioIo::new(stream), service)
                                .await
                            {
                                tracing::debug!(%peer, %error, "connection closed with error");
                            }
                        });
                    }
                }
            }
        });

        tracing::info!(%endpoint, "serving");
        Ok(Server {
            endpoint,
            address,
            shutdown_tx,
            task,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.address
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn stop(self) -> anyhow::Result<()> {
        let _ = self.shutdown_tx.send(());
        self.task.await?;
        Ok(())
    }
}

async fn handle_request(
    req: Request<Incoming>,
    translator: Arc<Translator>,
) -> Result<HttpResponse, Infallible> {
    let route = req.uri().path().to_string();
    if route != "/to_trapi" && route != "/to_english" {
        return Ok(detail(StatusCode::NOT_FOUND, "Not Found"));
    }
    if req.method() != Method::POST {
        return Ok(detail(StatusCode::METHOD_NOT_ALLOWED, "Method Not Allowed"));
    }

    let body = match req.into_body().collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(error) => {
            return Ok(detail(
                StatusCode::BAD_REQUEST,
                format!("Failed to read body: {error}"),
            ));
        }
    };

    let result = if route == "/to_trapi" {
        to_trapi(&body, &translator).await
    } else {
        to_english(&body, &translator).await
    };
    Ok(result.unwrap_or_else(|response| response))
}

async fn to_trapi(body: &[u8], translator: &Translator) -> Result<HttpResponse, HttpResponse> {
    let question: String = serde_json::from_slice(body).map_err(|error| {
        detail(
            StatusCode::BAD_REQUEST,
            format!("Expected a JSON string: {error}"),
        )
    })?;
    let graph = translator
        .parse_question(&question)
        .await
        .map_err(|error| grammar_error(&error))?;
    Ok(json_response(StatusCode::OK, &graph))
}

async fn to_english(body: &[u8], translator: &Translator) -> Result<HttpResponse, HttpResponse> {
    let graph: QueryGraph = serde_json::from_slice(body).map_err(|error| {
        detail(
            StatusCode::BAD_REQUEST,
            format!("Expected a query graph: {error}"),
        )
    })?;
    let sentence = translator
        .encode_graph(&graph)
        .await
        .map_err(|error| grammar_error(&error))?;
    Ok(json_response(StatusCode::OK, &sentence))
}

fn grammar_error(error: &GrammarError) -> HttpResponse {
    let status = if error.is_client_error() {
        StatusCode::BAD_REQUEST
    } else if matches!(error, GrammarError::ExternalService { .. }) {
        StatusCode::BAD_GATEWAY
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    if status.is_server_error() {
        tracing::warn!(%error, "request failed");
    } else {
        tracing::debug!(%error, "rejected request");
    }
    detail(status, error.to_string())
}

fn detail(status: StatusCode, message: impl Into<String>) -> HttpResponse {
    let message: String = message.into();
    json_response(status, &json!({ "detail": message }))
}

fn json_response(status: StatusCode, body: &impl Serialize) -> HttpResponse {
    let (status, body) = match serde_json::to_vec(body) {
        Ok(body) => (status, body),
        Err(error) => {
            let message = format!("Failed to encode response: {error}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "detail": message }).to_string().into_bytes(),
            )
        }
    };
    let mut response = Response::new(Full::new(Bytes::from(body)));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
