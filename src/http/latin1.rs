//! # Codificación ISO-8859-1
//! src/http/latin1.rs
//!
//! Las líneas del protocolo (request line, headers, status line) se leen y
//! escriben con un byte por carácter. Así cualquier byte 0-255 se decodifica
//! sin error, sin importar si el cliente manda UTF-8 válido o no.

/// Decodifica bytes a String: cada byte es el code point con el mismo valor
pub fn decode(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

/// Codifica un string a bytes. Los caracteres fuera de 0-255 se reemplazan por `?`
pub fn encode(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_all_bytes() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = decode(&bytes);
        assert_eq!(text.chars().count(), 256);
        assert_eq!(encode(&text), bytes);
    }

    #[test]
    fn test_decode_high_bytes() {
        assert_eq!(decode(b"caf\xe9"), "café");
    }

    #[test]
    fn test_encode_replaces_wide_chars() {
        assert_eq!(encode("a€b"), b"a?b");
    }
}
