//! # Errores de Protocolo
//! src/http/error.rs
//!
//! Un `ProtocolError` lleva el status, la razón y un body opcional, y se
//! convierte 1:1 en una `Response`. Se produce tanto en el parsing como en
//! los handlers.

use super::{Response, StatusCode};
use std::io;
use thiserror::Error;

/// Falla clasificada que se traduce directamente en la respuesta al cliente
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{status}{}", .body.as_deref().map(|b| format!(": {}", b)).unwrap_or_default())]
pub struct ProtocolError {
    status: StatusCode,
    body: Option<String>,
}

impl ProtocolError {
    pub fn new(status: StatusCode, body: Option<String>) -> Self {
        Self { status, body }
    }

    /// 400 Bad Request
    pub fn bad_request(body: impl Into<String>) -> Self {
        Self::new(StatusCode::BadRequest, Some(body.into()))
    }

    /// 403 Forbidden (sin body)
    pub fn forbidden() -> Self {
        Self::new(StatusCode::Forbidden, None)
    }

    /// 404 Not Found (sin body)
    pub fn not_found() -> Self {
        Self::new(StatusCode::NotFound, None)
    }

    /// 405 Method Not Allowed (sin body)
    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::MethodNotAllowed, None)
    }

    /// 405 para un token de método que el protocolo no conoce
    pub fn unknown_method(token: &str) -> Self {
        Self::new(
            StatusCode::MethodNotAllowed,
            Some(format!("Unknown method: {}", token)),
        )
    }

    /// 500 Internal Server Error con la descripción de la falla como body
    pub fn internal(body: impl Into<String>) -> Self {
        Self::new(StatusCode::InternalServerError, Some(body.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn reason(&self) -> &'static str {
        self.status.reason_phrase()
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }
}

impl From<ProtocolError> for Response {
    fn from(err: ProtocolError) -> Self {
        Response::error(err.status, err.body.as_deref())
    }
}

/// Errores al leer un request del socket
#[derive(Debug, Error)]
pub enum RequestError {
    /// El stream no cumple la gramática
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Falla del transporte mientras se leía
    #[error("I/O error while reading request: {0}")]
    Io(#[from] io::Error),
}

impl RequestError {
    /// `true` si el peer cortó la conexión (reset, abort o pipe roto).
    /// En ese caso no hay a quién responder.
    pub fn is_disconnect(&self) -> bool {
        match self {
            RequestError::Io(e) => matches!(
                e.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
            ),
            RequestError::Protocol(_) => false,
        }
    }

    /// Respuesta a enviar para este error
    pub fn into_response(self) -> Response {
        match self {
            RequestError::Protocol(err) => err.into(),
            RequestError::Io(err) => ProtocolError::internal(err.to_string()).into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constructors() {
        assert_eq!(ProtocolError::bad_request("x").status(), StatusCode::BadRequest);
        assert_eq!(ProtocolError::forbidden().status(), StatusCode::Forbidden);
        assert_eq!(ProtocolError::not_found().status(), StatusCode::NotFound);
        assert_eq!(ProtocolError::method_not_allowed().body(), None);
        assert_eq!(ProtocolError::internal("boom").reason(), "Internal Server Error");
    }

    #[test]
    fn test_unknown_method_body() {
        let err = ProtocolError::unknown_method("BREW");
        assert_eq!(err.status(), StatusCode::MethodNotAllowed);
        assert_eq!(err.body(), Some("Unknown method: BREW"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ProtocolError::not_found().to_string(), "404 Not Found");
        assert_eq!(
            ProtocolError::bad_request("Too many headers").to_string(),
            "400 Bad Request: Too many headers"
        );
    }

    #[test]
    fn test_into_response_keeps_status_and_body() {
        let response: Response = ProtocolError::bad_request("Malformed request starting line").into();
        assert_eq!(response.status(), 400);
        assert_eq!(response.reason(), "Bad Request");
        assert_eq!(response.body(), Some(&b"Malformed request starting line"[..]));
    }

    #[test]
    fn test_disconnect_detection() {
        let reset = RequestError::Io(io::Error::from(io::ErrorKind::ConnectionReset));
        let other = RequestError::Io(io::Error::from(io::ErrorKind::PermissionDenied));
        let protocol = RequestError::Protocol(ProtocolError::forbidden());

        assert!(reset.is_disconnect());
        assert!(!other.is_disconnect());
        assert!(!protocol.is_disconnect());
    }

    #[test]
    fn test_io_error_becomes_500() {
        let err = RequestError::Io(io::Error::new(io::ErrorKind::Other, "disk on fire"));
        let response = err.into_response();
        assert_eq!(response.status(), 500);
        assert_eq!(response.body(), Some(&b"disk on fire"[..]));
    }
}
