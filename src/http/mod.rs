//! # Módulo HTTP
//! src/http/mod.rs
//!
//! Codec del protocolo: convierte un stream de bytes en un `Request` y una
//! `Response` en bytes. No sabe nada de sockets, handlers ni archivos.
//!
//! ## Subconjunto soportado de HTTP/1.1
//!
//! - Solo se procesa HTTP/1.1; el header `Host` es obligatorio
//! - Una respuesta por conexión (sin keep-alive ni pipelining)
//! - Sin chunked transfer encoding ni bodies en el request
//! - Las líneas del protocolo se codifican en ISO-8859-1
//!
//! ### Formato de Request
//!
//! ```text
//! GET /path?query=value HTTP/1.1\r\n
//! Host: localhost:8080\r\n
//! \r\n
//! ```
//!
//! ### Formato de Response
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Content-Type: text/html\r\n
//! Content-Length: 13\r\n
//! \r\n
//! <h1>Hola</h1>
//! ```

pub mod error;    // ProtocolError y RequestError
pub mod headers;  // Mapa ordenado de headers
pub mod latin1;   // Codificación de un byte por carácter
pub mod method;   // Métodos y versiones
pub mod request;  // Parsing de requests
pub mod response; // Construcción y serialización de responses
pub mod status;   // Códigos de estado
pub mod target;   // Path + query del request-target

pub use error::{ProtocolError, RequestError};
pub use headers::Headers;
pub use method::{Method, Version};
pub use request::Request;
pub use response::Response;
pub use status::StatusCode;
pub use target::RequestTarget;
