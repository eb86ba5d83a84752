//! # Métodos y Versiones HTTP
//! src/http/method.rs
//!
//! `Method` es un tipo cerrado: los nueve métodos conocidos más
//! `Unrecognized` con el token crudo, para que el despacho por método
//! siempre tenga un brazo por defecto.

use std::fmt;

/// Métodos HTTP
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    OPTIONS,
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    TRACE,
    CONNECT,

    /// Token que no corresponde a ningún método conocido
    Unrecognized(String),
}

impl Method {
    /// Parsea un método desde su token. Nunca falla: lo desconocido
    /// queda como `Unrecognized`.
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::Method;
    ///
    /// assert_eq!(Method::from_token("GET"), Method::GET);
    /// assert_eq!(Method::from_token("BREW"), Method::Unrecognized("BREW".into()));
    /// ```
    pub fn from_token(token: &str) -> Self {
        match token {
            "OPTIONS" => Method::OPTIONS,
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            "TRACE" => Method::TRACE,
            "CONNECT" => Method::CONNECT,
            other => Method::Unrecognized(other.to_string()),
        }
    }

    /// Convierte el método a string
    pub fn as_str(&self) -> &str {
        match self {
            Method::OPTIONS => "OPTIONS",
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::TRACE => "TRACE",
            Method::CONNECT => "CONNECT",
            Method::Unrecognized(token) => token,
        }
    }

    pub fn is_recognized(&self) -> bool {
        !matches!(self, Method::Unrecognized(_))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Versiones del protocolo reconocidas por el parser.
///
/// Todas son válidas sintácticamente, pero solo HTTP/1.1 se procesa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    Http09,
    Http10,
    Http11,
    Http2,
    Http3,
}

impl Version {
    /// Parsea el token de versión; `None` si no es una versión conocida
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "HTTP/0.9" => Some(Version::Http09),
            "HTTP/1.0" => Some(Version::Http10),
            "HTTP/1.1" => Some(Version::Http11),
            "HTTP/2" => Some(Version::Http2),
            "HTTP/3" => Some(Version::Http3),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Version::Http09 => "HTTP/0.9",
            Version::Http10 => "HTTP/1.0",
            Version::Http11 => "HTTP/1.1",
            Version::Http2 => "HTTP/2",
            Version::Http3 => "HTTP/3",
        }
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_known_methods() {
        for token in ["OPTIONS", "GET", "HEAD", "POST", "PUT", "PATCH", "DELETE", "TRACE", "CONNECT"] {
            let method = Method::from_token(token);
            assert!(method.is_recognized(), "{} should be recognized", token);
            assert_eq!(method.as_str(), token);
        }
    }

    #[test]
    fn test_methods_are_case_sensitive() {
        assert_eq!(Method::from_token("get"), Method::Unrecognized("get".to_string()));
    }

    #[test]
    fn test_unrecognized_keeps_token() {
        let method = Method::from_token("BREW");
        assert!(!method.is_recognized());
        assert_eq!(method.to_string(), "BREW");
    }

    #[test]
    fn test_versions() {
        assert_eq!(Version::from_token("HTTP/1.1"), Some(Version::Http11));
        assert_eq!(Version::from_token("HTTP/2"), Some(Version::Http2));
        assert_eq!(Version::from_token("HTTP/2.0"), None);
        assert_eq!(Version::from_token("http/1.1"), None);
        assert_eq!(Version::Http10.to_string(), "HTTP/1.0");
    }
}
