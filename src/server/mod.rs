pub mod handlers;
pub mod request;
pub mod response;
pub mod router;

use std::io::{Cursor, Read};
use std::sync::Arc;

use tiny_http::{Header, Response, Server};
use tokio::runtime::Handle;

use crate::context::AppContext;
use crate::error::{AppError, AppResult};

pub use request::ApiRequest;
pub use response::{ApiResponse, Body};

const MAX_BODY_BYTES: u64 = 1024 * 1024;

pub struct HttpServer {
    inner: Arc<Server>,
}

/// Stops a running [`HttpServer::serve`] loop from another thread.
#[derive(Clone)]
pub struct Unblocker {
    inner: Arc<Server>,
}

impl Unblocker {
    pub fn unblock(&self) {
        self.inner.unblock();
    }
}

impl HttpServer {
    pub fn bind(addr: &str) -> AppResult<Self> {
        let server = Server::http(addr)
            .map_err(|err| AppError::Http(format!("failed to bind {addr}: {err}")))?;
        Ok(Self {
            inner: Arc::new(server),
        })
    }

    pub fn unblocker(&self) -> Unblocker {
        Unblocker {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Accepts until unblocked; each request runs on the blocking pool.
    pub fn serve(self, ctx: Arc<AppContext>, runtime: Handle) {
        for request in self.inner.incoming_requests() {
            let ctx = Arc::clone(&ctx);
            runtime.spawn_blocking(move || handle_request(&ctx, request));
        }
        tracing::debug!("http server stopped accepting");
    }
}

fn handle_request(ctx: &AppContext, mut request: tiny_http::Request) {
    let read = read_body(request.as_reader(), MAX_BODY_BYTES);
    let body = match read {
        Ok(Some(body)) => body,
        Ok(None) => {
            let _ = request.respond(
                Response::from_string("request body too large").with_status_code(413),
            );
            return;
        }
        Err(err) => {
            tracing::warn!("failed to read request body: {err}");
            let _ = request.respond(Response::from_string("bad request").with_status_code(400));
            return;
        }
    };

    let response = match ApiRequest::parse(request.method().clone(), request.url(), body) {
        Ok(api_request) => {
            tracing::trace!(method = %api_request.method, path = %api_request.path, "request");
            router::route(ctx, &api_request)
        }
        Err(err) => ApiResponse::text(400, &err.to_string()),
    };

    if let Err(err) = respond(request, response) {
        tracing::warn!("failed to write response: {err}");
    }
}

/// Reads at most `limit` bytes; `None` when the body is longer.
fn read_body<R: Read>(reader: R, limit: u64) -> std::io::Result<Option<Vec<u8>>> {
    let mut body = Vec::new();
    reader.take(limit + 1).read_to_end(&mut body)?;
    if body.len() as u64 > limit {
        return Ok(None);
    }
    Ok(Some(body))
}

fn respond(request: tiny_http::Request, response: ApiResponse) -> std::io::Result<()> {
    let mut headers = vec![header("Content-Type", &response.content_type)];
    headers.extend(
        response
            .headers
            .iter()
            .map(|(name, value)| header(name, value)),
    );
    let headers = headers.into_iter().flatten().collect::<Vec<_>>();

    match response.body {
        Body::Bytes(bytes) => {
            let len = bytes.len();
            request.respond(Response::new(
                response.status.into(),
                headers,
                Cursor::new(bytes),
                Some(len),
                None,
            ))
        }
        Body::Empty(len) => request.respond(Response::new(
            response.status.into(),
            headers,
            std::io::empty(),
            len,
            None,
        )),
        Body::File(file) => {
            let len = file.metadata().ok().map(|meta| meta.len() as usize);
            request.respond(Response::new(
                response.status.into(),
                headers,
                file,
                len,
                None,
            ))
        }
    }
}

fn header(name: &str, value: &str) -> Option<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes()).ok()
}
