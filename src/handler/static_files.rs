//! # Handler de Archivos Estáticos
//! src/handler/static_files.rs
//!
//! Sirve archivos bajo un document root fijo. Solo implementa GET y HEAD;
//! el resto de los métodos cae en el 405 por defecto del trait.
//!
//! ## Resolución de un request-target
//!
//! 1. Decodificar `%XX` y separar la query string
//! 2. Unir el path (sin `/` inicial) al root y canonicalizar
//! 3. Si el resultado no está dentro del root → 403
//! 4. Si no existe → 404
//! 5. Si es un directorio → servir `<dir>/index.html` (que debe existir)
//! 6. Si es un archivo pedido con `/` final → 404
//! 7. 200 con el contenido (GET) o solo headers (HEAD)

use super::{Handler, HandlerResult};
use crate::http::{ProtocolError, Request, RequestTarget, Response};
use chrono::Utc;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

/// Archivo que se sirve cuando el target es un directorio
const INDEX_FILE: &str = "index.html";

/// Content-Type cuando la extensión no dice nada
const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Handler que sirve archivos de un document root
#[derive(Debug, Clone)]
pub struct StaticHandler {
    /// Root canonicalizado; se resuelve una sola vez al crear el handler
    root: PathBuf,
}

impl StaticHandler {
    /// Crea el handler. Falla si el root no existe o no es un directorio.
    pub fn new(document_root: impl AsRef<Path>) -> io::Result<Self> {
        let root = document_root.as_ref().canonicalize()?;
        if !root.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("{} is not a directory", root.display()),
            ));
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Traduce el target a un archivo existente dentro del root
    pub fn locate(&self, target: &RequestTarget) -> Result<PathBuf, ProtocolError> {
        let relative = target.path().trim_start_matches('/');
        let candidate = resolve(&self.root.join(relative));
        self.ensure_contained(&candidate)?;

        if !candidate.exists() {
            return Err(ProtocolError::not_found());
        }

        if candidate.is_dir() {
            let index = resolve(&candidate.join(INDEX_FILE));
            self.ensure_contained(&index)?;
            if !index.is_file() {
                return Err(ProtocolError::not_found());
            }
            return Ok(index);
        }

        // Un archivo nunca se pide con `/` al final
        if target.has_trailing_slash() || !candidate.is_file() {
            return Err(ProtocolError::not_found());
        }

        Ok(candidate)
    }

    /// Verifica que el path esté dentro del root (o sea el root)
    fn ensure_contained(&self, path: &Path) -> Result<(), ProtocolError> {
        if path.starts_with(&self.root) {
            Ok(())
        } else {
            debug!(path = %path.display(), root = %self.root.display(), "path escapes document root");
            Err(ProtocolError::forbidden())
        }
    }

    fn serve(&self, request: &Request, with_body: bool) -> HandlerResult {
        let target = RequestTarget::parse(request.uri());
        let path = self.locate(&target)?;

        let mut response = Response::ok().with_header("Content-Type", guess_content_type(&path));
        if with_body {
            response = response.with_body(fs::read(&path)?);
        } else {
            let size = fs::metadata(&path)?.len();
            response.add_header("Content-Length", &size.to_string());
        }
        response.add_header("Date", &http_date());
        response.add_header("Connection", "close");

        Ok(response)
    }
}

impl Handler for StaticHandler {
    fn get(&self, request: &Request) -> HandlerResult {
        self.serve(request, true)
    }

    fn head(&self, request: &Request) -> HandlerResult {
        self.serve(request, false)
    }
}

/// MIME type a partir de la extensión; `text/html` si no se conoce
pub fn guess_content_type(path: &Path) -> &'static str {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

/// Fecha actual en formato IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`)
pub fn http_date() -> String {
    Utc::now().format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

/// Canonicaliza un path aunque no exista.
///
/// Si el path completo no se puede canonicalizar, se normalizan `.` y `..`
/// léxicamente, se canonicaliza el ancestro existente más profundo (para
/// resolver symlinks) y se le agrega el resto.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let normalized = normalize_lexically(path);
    let mut missing = Vec::new();
    let mut cursor = normalized.as_path();
    loop {
        if let Ok(mut base) = cursor.canonicalize() {
            base.extend(missing.iter().rev());
            return base;
        }
        match (cursor.parent(), cursor.file_name()) {
            (Some(parent), Some(name)) => {
                missing.push(name.to_os_string());
                cursor = parent;
            }
            _ => return normalized,
        }
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
