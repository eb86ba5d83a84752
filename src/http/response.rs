//! # Construcción y Serialización de Respuestas HTTP
//! src/http/response.rs
//!
//! ## Formato de una respuesta
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! Server: static_httpd/0.1.0\r\n
//! \r\n
//! <h1>Hola</h1>
//! ```
//!
//! La status line siempre dice HTTP/1.1, sin importar cómo se construyó
//! la respuesta. El header `Server` se agrega al serializar si falta.
//!
//! ## Ejemplo de uso
//!
//! ```
//! use static_httpd::http::Response;
//!
//! let response = Response::ok()
//!     .with_header("Content-Type", "text/plain")
//!     .with_body(b"Hello".to_vec());
//!
//! let bytes = response.to_bytes();
//! assert!(bytes.starts_with(b"HTTP/1.1 200 OK\r\n"));
//! ```

use super::{latin1, Headers, StatusCode, Version};
use std::fmt;
use std::io::{self, Write};

/// Valor del header `Server` que se inyecta cuando la respuesta no trae uno
pub const SERVER_NAME: &str = concat!("static_httpd/", env!("CARGO_PKG_VERSION"));

/// Content-Type de los bodies de error (se codifican en Latin-1)
const ERROR_CONTENT_TYPE: &str = "text/plain; charset=iso-8859-1";

/// Respuesta HTTP. Mutable hasta que se envía.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Código numérico (200, 404, etc.)
    status: u16,

    /// Reason phrase de la status line
    reason: String,

    /// Headers en el orden en que se escriben
    headers: Headers,

    /// Cuerpo de la respuesta; `None` en HEAD y en errores sin body
    body: Option<Vec<u8>>,
}

impl Response {
    /// Crea una respuesta sin headers ni body
    pub fn new(status: u16, reason: impl Into<String>) -> Self {
        Self {
            status,
            reason: reason.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    /// Crea una respuesta a partir de un `StatusCode` conocido
    pub fn with_status(status: StatusCode) -> Self {
        Self::new(status.as_u16(), status.reason_phrase())
    }

    /// 200 OK vacío
    pub fn ok() -> Self {
        Self::with_status(StatusCode::Ok)
    }

    /// Respuesta de error. El body (si hay) se manda como texto Latin-1.
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::{Response, StatusCode};
    ///
    /// let response = Response::error(StatusCode::BadRequest, Some("Too many headers"));
    /// assert_eq!(response.status(), 400);
    /// assert_eq!(response.headers().get("Content-Length"), Some("16"));
    /// ```
    pub fn error(status: StatusCode, body: Option<&str>) -> Self {
        let mut response = Self::with_status(status);
        match body {
            Some(text) => {
                response.add_header("Content-Type", ERROR_CONTENT_TYPE);
                response.set_body(latin1::encode(text));
            }
            None => response.add_header("Content-Length", "0"),
        }
        response.add_header("Connection", "close");
        response
    }

    /// Agrega un header. Si ya existe, se sobrescribe.
    pub fn with_header(mut self, name: &str, value: &str) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Versión mutable de `with_header`
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.insert(name, value);
    }

    /// Establece el body y su `Content-Length`
    pub fn with_body(mut self, body: Vec<u8>) -> Self {
        self.set_body(body);
        self
    }

    /// Body de texto, codificado en Latin-1 como las líneas del protocolo
    pub fn with_text_body(self, body: &str) -> Self {
        self.with_body(latin1::encode(body))
    }

    fn set_body(&mut self, body: Vec<u8>) {
        self.headers.insert("Content-Length", body.len().to_string());
        self.body = Some(body);
    }

    /// Serializa la respuesta al writer y hace flush.
    ///
    /// Escribe la status line, los headers en orden (más `Server` si falta),
    /// la línea vacía y el body si existe. No reintenta escrituras parciales:
    /// cualquier error se propaga y la conexión se descarta.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        // 1. Status line
        let status_line = format!("{} {} {}\r\n", Version::Http11, self.status, self.reason);
        writer.write_all(&latin1::encode(&status_line))?;

        // 2. Headers
        for (name, value) in self.headers.iter() {
            writer.write_all(&latin1::encode(&format!("{}: {}\r\n", name, value)))?;
        }
        if !self.headers.contains("Server") {
            writer.write_all(&latin1::encode(&format!("Server: {}\r\n", SERVER_NAME)))?;
        }

        // 3. Línea vacía que separa headers del body
        writer.write_all(b"\r\n")?;

        // 4. Body (si existe)
        if let Some(body) = &self.body {
            writer.write_all(body)?;
        }

        writer.flush()
    }

    /// Convierte la respuesta a bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut result = Vec::new();
        // Escribir a un Vec no falla
        let _ = self.write_to(&mut result);
        result
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl fmt::Display for Response {
    /// Resumen para logs: status line, sin headers ni body
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", Version::Http11, self.status, self.reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(response: &Response) -> String {
        latin1::decode(&response.to_bytes())
    }

    #[test]
    fn test_ok_response() {
        let response = Response::ok();
        assert_eq!(response.status(), 200);
        assert_eq!(response.reason(), "OK");
        assert!(response.headers().is_empty());
        assert!(response.body().is_none());
    }

    #[test]
    fn test_with_body_sets_content_length() {
        let response = Response::ok().with_body(vec![0x00, 0x01, 0x02, 0xFF]);
        assert_eq!(response.body(), Some(&[0x00, 0x01, 0x02, 0xFF][..]));
        assert_eq!(response.headers().get("Content-Length"), Some("4"));
    }

    #[test]
    fn test_serialize_layout() {
        let response = Response::ok()
            .with_header("Content-Type", "text/plain")
            .with_text_body("Test");

        assert_eq!(
            text(&response),
            format!(
                "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 4\r\nServer: {}\r\n\r\nTest",
                SERVER_NAME
            )
        );
    }

    #[test]
    fn test_server_header_not_duplicated() {
        let response = Response::ok().with_header("Server", "custom");
        let out = text(&response);
        assert_eq!(out.matches("Server:").count(), 1);
        assert!(out.contains("Server: custom\r\n"));
    }

    #[test]
    fn test_custom_status_and_reason() {
        let response = Response::new(418, "I'm a teapot");
        assert!(text(&response).starts_with("HTTP/1.1 418 I'm a teapot\r\n"));
    }

    #[test]
    fn test_no_body_ends_with_blank_line() {
        let response = Response::ok().with_header("Content-Length", "10");
        assert!(text(&response).ends_with("\r\n\r\n"));
    }

    #[test]
    fn test_error_with_body() {
        let response = Response::error(StatusCode::InternalServerError, Some("fallo ñ"));
        assert_eq!(response.status(), 500);
        assert_eq!(response.body(), Some(&b"fallo \xf1"[..]));
        assert_eq!(response.headers().get("Content-Length"), Some("7"));
        assert_eq!(response.headers().get("Connection"), Some("close"));
    }

    #[test]
    fn test_error_without_body() {
        let response = Response::error(StatusCode::Forbidden, None);
        assert!(response.body().is_none());
        assert_eq!(response.headers().get("Content-Length"), Some("0"));
        assert_eq!(response.headers().get("Content-Type"), None);
    }

    #[test]
    fn test_display() {
        let response = Response::error(StatusCode::NotFound, None);
        assert_eq!(response.to_string(), "HTTP/1.1 404 Not Found");
    }
}
