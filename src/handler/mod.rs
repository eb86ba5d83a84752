//! # Handlers
//! src/handler/mod.rs
//!
//! Un handler implementa un método por verbo HTTP. Todos tienen una
//! implementación por defecto que responde 405, así que un handler concreto
//! solo sobrescribe los verbos que soporta.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Handler::handle → (options | get | head | ... | unknown_method) → Response
//! ```
//!
//! `handle` es la frontera de errores: un `ProtocolError` se convierte en
//! su respuesta y cualquier otro error en un 500 con la descripción como body.

pub mod static_files;

pub use static_files::StaticHandler;

use crate::http::{Method, ProtocolError, Request, Response};

/// Resultado de un método del handler
pub type HandlerResult = anyhow::Result<Response>;

/// Conjunto de capacidades de un handler, un método por verbo
pub trait Handler: Send + Sync {
    fn options(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn get(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn head(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn post(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn put(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn patch(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn delete(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn trace(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    fn connect(&self, _request: &Request) -> HandlerResult {
        Err(ProtocolError::method_not_allowed().into())
    }

    /// Token de método que el protocolo no reconoce
    fn unknown_method(&self, request: &Request) -> HandlerResult {
        Err(ProtocolError::unknown_method(request.method().as_str()).into())
    }

    /// Despacha el request al método correspondiente y convierte los errores
    /// en respuestas. Nunca falla.
    fn handle(&self, request: &Request) -> Response {
        let result = match request.method() {
            Method::OPTIONS => self.options(request),
            Method::GET => self.get(request),
            Method::HEAD => self.head(request),
            Method::POST => self.post(request),
            Method::PUT => self.put(request),
            Method::PATCH => self.patch(request),
            Method::DELETE => self.delete(request),
            Method::TRACE => self.trace(request),
            Method::CONNECT => self.connect(request),
            Method::Unrecognized(_) => self.unknown_method(request),
        };

        result.unwrap_or_else(error_response)
    }
}

/// Convierte el error de un handler en la respuesta que verá el cliente
pub fn error_response(err: anyhow::Error) -> Response {
    match err.downcast::<ProtocolError>() {
        Ok(protocol) => protocol.into(),
        Err(other) => ProtocolError::internal(other.to_string()).into(),
    }
}
