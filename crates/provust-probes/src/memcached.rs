//! Text-protocol readiness probe for the memory object cache server.
//!
//! Issues a single ASCII `set` of the sentinel key and expects the
//! `STORED` confirmation.

use std::io::{Read, Write};
use std::net::TcpStream;

use provust_common::constants::{PROBE_IO_TIMEOUT, PROBE_KEY, PROBE_VALUE};
use provust_common::error::ProbeError;

/// Builds the `set <key> 0 0 <len>\r\n<value>\r\n` frame.
fn set_command(key: &str, value: &str) -> Vec<u8> {
    let mut buf = Vec::with_capacity(64);
    buf.extend_from_slice(format!("set {key} 0 0 {}\r\n", value.len()).as_bytes());
    buf.extend_from_slice(value.as_bytes());
    buf.extend_from_slice(b"\r\n");
    buf
}

/// Performs one write-one-key handshake against a memcached endpoint.
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
        return Err(ProbeError::from_io(std::io::Error::from(
            std::io::ErrorKind::ConnectionReset,
        )));
    }
    if reply[..n].starts_with(b"STORED") {
        tracing::debug!(host, port, "memcached probe answered");
        Ok(())
    } else {
        Err(ProbeError::protocol(format!(
            "unexpected memcached reply: {:?}",
            String::from_utf8_lossy(&reply[..n])
        )))
    }
}
