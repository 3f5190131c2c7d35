use std::fs::File;

use serde::Serialize;

use crate::error::{AppError, AppResult};

#[derive(Debug)]
pub enum Body {
    Bytes(Vec<u8>),
    File(File),
    /// Headers only; carries the length the full body would have.
    Empty(Option<usize>),
}

#[derive(Debug)]
pub struct ApiResponse {
    pub status: u16,
    pub content_type: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl ApiResponse {
    pub fn json<T: Serialize>(status: u16, value: &T) -> AppResult<Self> {
        let mut payload = serde_json::to_vec_pretty(value)?;
        payload.push(b'\n');
        Ok(Self::bytes(status, "application/json", payload))
    }

    pub fn ok<T: Serialize>(value: &T) -> AppResult<Self> {
        Self::json(200, value)
    }

    pub fn text(status: u16, message: &str) -> Self {
        Self::bytes(
            status,
            "text/plain; charset=utf-8",
            format!("{message}\n").into_bytes(),
        )
    }

    pub fn bytes(status: u16, content_type: &str, payload: Vec<u8>) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            headers: Vec::new(),
            body: Body::Bytes(payload),
        }
    }

    pub fn file(content_type: &str, file: File) -> Self {
        Self {
            status: 200,
            content_type: content_type.to_string(),
            headers: Vec::new(),
            body: Body::File(file),
        }
    }

    pub fn with_header(mut self, name: &str, value: String) -> Self {
        self.headers.push((name.to_string(), value));
        self
    }

    /// Drops the body for HEAD while keeping its length.
    pub fn without_body(mut self) -> Self {
        let len = match &self.body {
            Body::Bytes(bytes) => Some(bytes.len()),
            Body::File(file) => file.metadata().ok().map(|meta| meta.len() as usize),
            Body::Empty(len) => *len,
        };
        self.body = Body::Empty(len);
        self
    }

    pub fn not_found() -> Self {
        Self::text(404, "404 page not found")
    }

    pub fn method_not_allowed() -> Self {
        Self::text(405, "method not allowed")
    }

    pub fn from_error(err: &AppError) -> Self {
        Self::text(err.status_code(), &err.to_string())
    }

    /// Body bytes for in-memory responses; files are read to the end.
    pub fn into_bytes(self) -> std::io::Result<Vec<u8>> {
        match self.body {
            Body::Bytes(bytes) => Ok(bytes),
            Body::File(mut file) => {
                let mut buf = Vec::new();
                std::io::Read::read_to_end(&mut file, &mut buf)?;
                Ok(buf)
            }
            Body::Empty(_) => Ok(Vec::new()),
        }
    }
}
