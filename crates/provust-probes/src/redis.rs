//! RESP readiness probe for the key-value cache server.
//!
//! Issues a single `SET` of the sentinel key as a RESP array and expects
//! the `+OK` simple-string reply.

use std::io::{Read, Write};
use std::net::TcpStream;

use provust_common::constants::{PROBE_IO_TIMEOUT, PROBE_KEY, PROBE_VALUE};
use provust_common::error::ProbeError;

/// Builds the RESP array frame for `SET <key> <value>`.
fn set_command(key: &str, value: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(b"*3\r\n$3\r\nSET\r\n");
    buf.extend_from_slice(format!("${}\r\n{key}\r\n", key.len()).as_bytes());
    buf.extend_from_slice(format!("${}\r\n{value}\r\n", value.len()).as_bytes());
    buf
}

/// Performs one write-one-key handshake against a RESP endpoint.
///
/// # Errors
///
/// Returns [`ProbeError::Refused`] while nothing is accepting connections,
/// [`ProbeError::Fatal`] for any other I/O failure or an unexpected reply.
pub fn probe(host: &str, port: u16) -> Result<(), ProbeError> {
    let mut stream = TcpStream::connect((host, port)).map_err(ProbeError::from_io)?;
    stream
        .set_read_timeout(Some(PROBE_IO_TIMEOUT))
        .map_err(ProbeError::from_io)?;
    stream
        .set_write_timeout(Some(PROBE_IO_TIMEOUT))
        .map_err(ProbeError::from_io)?;

    stream
        .write_all(&set_command(PROBE_KEY, PROBE_VALUE))
        .map_err(ProbeError::from_io)?;

    let mut reply = [0_u8; 64];
    let n = stream.read(&mut reply).map_err(ProbeError::from_io)?;
    if n == 0 {
        // Accepted then closed without answering: still starting up.
        return Err(ProbeError::from_io(std::io::Error::from(
            std::io::ErrorKind::ConnectionReset,
        )));
    }
    if reply[..n].starts_with(b"+OK") {
        tracing::debug!(host, port, "redis probe answered");
        Ok(())
    } else {
        Err(ProbeError::protocol(format!(
            "unexpected RESP reply: {:?}",
            String::from_utf8_lossy(&reply[..n])
        )))
    }
}
