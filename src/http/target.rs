//! # Request-Target
//! src/http/target.rs
//!
//! Separa el request-target en path y query string, y decodifica los
//! escapes `%XX`. Ejemplo:
//!
//! `"/docs/a%20b.html?lang=es&lang=en"` → path `"/docs/a b.html"`,
//! query `{"lang": ["es", "en"]}`

use std::collections::HashMap;

/// Request-target ya decodificado
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// Path decodificado
    path: String,

    /// Parámetros de la query string (nombre → valores en orden)
    query: HashMap<String, Vec<String>>,
}

impl RequestTarget {
    /// Parsea un request-target crudo. Nunca falla: las secuencias que no
    /// forman UTF-8 válido se reemplazan por U+FFFD.
    ///
    /// # Ejemplo
    /// ```
    /// use static_httpd::http::RequestTarget;
    ///
    /// let target = RequestTarget::parse("/a%20b.txt?x=1&x=2");
    /// assert_eq!(target.path(), "/a b.txt");
    /// assert_eq!(target.query_values("x"), Some(&["1".to_string(), "2".to_string()][..]));
    /// ```
    pub fn parse(raw: &str) -> Self {
        let (raw_path, raw_query) = match raw.split_once('?') {
            Some((path, query)) => (path, query),
            None => (raw, ""),
        };

        Self {
            path: percent_decode(raw_path),
            query: parse_query_string(raw_query),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// `true` si el path termina en `/`
    pub fn has_trailing_slash(&self) -> bool {
        self.path.ends_with('/')
    }

    pub fn query(&self) -> &HashMap<String, Vec<String>> {
        &self.query
    }

    /// Valores de un parámetro de la query
    pub fn query_values(&self, name: &str) -> Option<&[String]> {
        self.query.get(name).map(Vec::as_slice)
    }
}

fn percent_decode(s: &str) -> String {
    String::from_utf8_lossy(&urlencoding::decode_binary(s.as_bytes())).into_owned()
}

/// Parsea `a=1&b=2&a=3`. `+` significa espacio; los valores vacíos se descartan.
fn parse_query_string(query: &str) -> HashMap<String, Vec<String>> {
    let mut params: HashMap<String, Vec<String>> = HashMap::new();

    for pair in query.split('&') {
        if pair.is_empty() {
            continue;
        }
        let (name, value) = pair.split_once('=').unwrap_or((pair, ""));
        if value.is_empty() {
            continue;
        }
        params
            .entry(percent_decode(&name.replace('+', " ")))
            .or_default()
            .push(percent_decode(&value.replace('+', " ")));
    }

    params
}
