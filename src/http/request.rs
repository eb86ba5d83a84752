//! # Parsing de Requests HTTP/1.1
//! src/http/request.rs
//!
//! Lee un request línea por línea desde un `BufRead` (normalmente el socket).
//!
//! ## Formato de un Request
//!
//! ```text
//! GET /docs/index.html?lang=es HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! User-Agent: curl/8.5.0\r\n
//! \r\n
//! ```
//!
//! ## Límites
//!
//! - Cada línea: máximo `MAX_LINE` bytes (incluyendo el fin de línea)
//! - Headers: máximo `MAX_HEADERS` líneas
//! - El body nunca se lee, aunque el cliente lo mande

use super::{latin1, Headers, Method, ProtocolError, RequestError, Version};
use std::fmt;
use std::io::{BufRead, Read};

/// Longitud máxima de una línea del request (64 KiB)
pub const MAX_LINE: usize = 64 * 1024;

/// Cantidad máxima de líneas de header
pub const MAX_HEADERS: usize = 100;

/// Request HTTP parseado. Inmutable una vez construido.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,

    /// Request-target crudo, sin decodificar (ej: "/a%20b.txt?x=1")
    uri: String,

    version: Version,

    headers: Headers,

    /// Siempre `None`: el servidor no lee bodies
    body: Option<Vec<u8>>,
}

impl Request {
    /// Construye un request directamente (sin pasar por el parser)
    pub fn new(method: Method, uri: impl Into<String>, version: Version, headers: Headers) -> Self {
        Self {
            method,
            uri: uri.into(),
            version,
            headers,
            body: None,
        }
    }

    /// Lee y parsea un request desde el stream
    ///
    /// # Errores
    ///
    /// * `RequestError::Protocol` con 400 si la request line o los headers
    ///   son inválidos, la versión no es HTTP/1.1 o falta `Host`
    /// * `RequestError::Protocol` con 405 si el método es desconocido
    /// * `RequestError::Io` si falla la lectura del socket
    ///
    /// # Ejemplo
    ///
    /// ```
    /// use static_httpd::http::{Method, Request};
    ///
    /// let raw = b"GET /index.html HTTP/1.1\r\nHost: localhost\r\n\r\n";
    /// let request = Request::read_from(&mut &raw[..]).unwrap();
    ///
    /// assert_eq!(request.method(), &Method::GET);
    /// assert_eq!(request.uri(), "/index.html");
    /// assert_eq!(request.header("Host"), Some("localhost"));
    /// ```
    pub fn read_from<R: BufRead>(reader: &mut R) -> Result<Self, RequestError> {
        // 1. Request line
        let (method, uri, version) = Self::parse_request_line(reader)?;

        // 2. Headers hasta la línea vacía
        let headers = Self::parse_headers(reader)?;

        // 3. Host es obligatorio en HTTP/1.1
        if headers.get("Host").map_or(true, str::is_empty) {
            return Err(ProtocolError::bad_request("Invalid headers: no `Host` header").into());
        }

        Ok(Self::new(method, uri, version, headers))
    }

    /// Parsea la request line: `METHOD target VERSION`
    fn parse_request_line<R: BufRead>(reader: &mut R) -> Result<(Method, String, Version), RequestError> {
        let raw = read_line(reader)?;
        if raw.len() > MAX_LINE {
            return Err(ProtocolError::bad_request("Request starting line is too long").into());
        }

        let line = latin1::decode(&raw);
        let words: Vec<&str> = line.split_whitespace().collect();
        let [method, uri, version] = words[..] else {
            return Err(ProtocolError::bad_request("Malformed request starting line").into());
        };

        let method = Method::from_token(method);
        if !method.is_recognized() {
            return Err(ProtocolError::unknown_method(method.as_str()).into());
        }

        let version = Version::from_token(version)
            .ok_or_else(|| ProtocolError::bad_request(format!("Unknown HTTP version: {}", version)))?;
        if version != Version::Http11 {
            return Err(ProtocolError::bad_request(format!(
                "Unsupported HTTP version: {}. Only {} is supported",
                version,
                Version::Http11
            ))
            .into());
        }

        Ok((method, uri.to_string(), version))
    }

    /// Parsea los headers. Cada línea tiene formato `Name: Value`.
    ///
    /// Termina en `\r\n`, `\n` o fin del stream. Un nombre repetido
    /// sobrescribe al anterior.
    fn parse_headers<R: BufRead>(reader: &mut R) -> Result<Headers, RequestError> {
        let mut lines = Vec::new();
        loop {
            let raw = read_line(reader)?;
            if raw.len() > MAX_LINE {
                return Err(ProtocolError::bad_request("Request line is too long").into());
            }
            if matches!(&raw[..], b"\r\n" | b"\n" | b"") {
                break;
            }
            lines.push(raw);
            if lines.len() > MAX_HEADERS {
                return Err(ProtocolError::bad_request("Too many headers").into());
            }
        }

        let mut headers = Headers::new();
        for raw in &lines {
            let line = latin1::decode(raw);
            let line = line.trim_end_matches(['\r', '\n']);
            let (name, value) = line
                .split_once(": ")
                .ok_or_else(|| ProtocolError::bad_request(format!("Invalid header line: {}", line)))?;
            headers.insert(name, value);
        }
        Ok(headers)
    }

    // === Métodos públicos para acceder a los campos ===

    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Request-target tal como llegó
    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn version(&self) -> Version {
        self.version
    }

    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Obtiene un header específico
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }
}

impl fmt::Display for Request {
    /// Resumen para logs: `GET /path HTTP/1.1`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.method, self.uri, self.version)
    }
}

/// Lee una línea incluyendo su `\n`, sin pasar de `MAX_LINE + 1` bytes.
/// Si el resultado mide más de `MAX_LINE`, la línea es demasiado larga.
fn read_line<R: BufRead>(reader: &mut R) -> std::io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    reader.by_ref().take(MAX_LINE as u64 + 1).read_until(b'\n', &mut buf)?;
    Ok(buf)
}
