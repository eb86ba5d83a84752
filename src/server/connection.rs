//! # Manejo de una Conexión
//! src/server/connection.rs
//!
//! Cada conexión aceptada pasa por exactamente un ciclo:
//!
//! ```text
//! Reading → Handling → Writing → Closed
//!    └─────────┴──────→ (respuesta de error) → Writing → Closed
//! ```
//!
//! Todos los errores de lectura y de manejo terminan en una respuesta. Si el
//! peer corta la conexión mientras leemos, no se responde nada. Un error al
//! escribir no se recupera: la conexión simplemente se cierra.
//!
//! El socket se recibe por valor, así que se cierra al salir de
//! `handle_connection` por cualquier camino.

use crate::handler::Handler;
use crate::http::{ProtocolError, Request, Response, StatusCode};
use std::any::Any;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::net::{Shutdown, TcpStream};
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, warn};

/// Atiende una conexión completa: lee un request, lo despacha, escribe la
/// respuesta y cierra.
pub fn handle_connection(stream: TcpStream, handler: &dyn Handler) -> io::Result<()> {
    let peer = stream
        .peer_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| "unknown".to_string());

    let response = {
        let mut reader = BufReader::new(&stream);
        respond(&mut reader, handler, &peer)
    };

    let Some(response) = response else {
        debug!(%peer, "peer disconnected before sending a request");
        return Ok(());
    };

    {
        let mut writer = BufWriter::new(&stream);
        if let Err(e) = response.write_to(&mut writer) {
            error!(%peer, error = %e, "failed to write response");
            return Err(e);
        }
    }

    // Cerrar el lado de escritura: el cliente ve EOF después del body
    match stream.shutdown(Shutdown::Write) {
        Err(e) if e.kind() != io::ErrorKind::NotConnected => Err(e),
        _ => Ok(()),
    }
}

/// Lee un request y produce la respuesta que le corresponde.
///
/// Retorna `None` solo si el peer se desconectó durante la lectura.
pub fn respond<R: BufRead>(reader: &mut R, handler: &dyn Handler, peer: &str) -> Option<Response> {
    // Reading
    let request = match Request::read_from(reader) {
        Ok(request) => request,
        Err(err) if err.is_disconnect() => return None,
        Err(err) => {
            let response = err.into_response();
            info!(%peer, status = response.status(), reason = response.reason(), "rejected request");
            return Some(response);
        }
    };

    // Handling
    let response = dispatch(&request, handler);
    let outcome = outcome(response.status());
    if outcome == "failed" {
        warn!(
            %peer,
            method = %request.method(),
            uri = request.uri(),
            status = response.status(),
            reason = response.reason(),
            "request failed"
        );
    } else {
        info!(
            %peer,
            method = %request.method(),
            uri = request.uri(),
            status = response.status(),
            reason = response.reason(),
            outcome,
            "request served"
        );
    }
    Some(response)
}

/// Llama al handler. Un panic dentro del handler se convierte en 500.
fn dispatch(request: &Request, handler: &dyn Handler) -> Response {
    match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(request))) {
        Ok(response) => response,
        Err(payload) => {
            let message = panic_message(payload.as_ref());
            error!(request = %request, %message, "handler panicked");
            ProtocolError::internal(message).into()
        }
    }
}

/// Clase del resultado para los logs: `served`, `rejected` (4xx) o `failed` (5xx)
fn outcome(status: u16) -> &'static str {
    match StatusCode::from_u16(status) {
        Some(code) if code.is_server_error() => "failed",
        Some(code) if code.is_client_error() => "rejected",
        _ => "served",
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
