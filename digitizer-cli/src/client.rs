use crate::protocol::{DaemonRequest, DaemonResponse, DEFAULT_SOCKET_PATH};
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;
use std::time::Duration;

const RESPONSE_TIMEOUT: Duration = Duration::from_secs(30);

pub fn send_request(request: &DaemonRequest) -> Result<DaemonResponse, String> {
    send_request_to(DEFAULT_SOCKET_PATH, request)
}

/// Sends one request line and waits for the single response line.
pub fn send_request_to(
    socket_path: impl AsRef<Path>,
    request: &DaemonRequest,
) -> Result<DaemonResponse, String> {
    let socket_path = socket_path.as_ref();
    let mut stream = UnixStream::connect(socket_path).map_err(|e| {
        format!(
            "Failed to connect to daemon at {} ({e}). Is it running?",
            socket_path.display()
        )
    })?;
    stream
        .set_read_timeout(Some(RESPONSE_TIMEOUT))
        .map_err(|e| e.to_string())?;

    let mut payload = serde_json::to_vec(request).map_err(|e| e.to_string())?;
    payload.push(b'\n');
    stream.write_all(&payload).map_err(|e| e.to_string())?;

    let mut line = String::new();
    BufReader::new(stream)
        .read_line(&mut line)
        .map_err(|e| format!("Failed to read daemon response: {e}"))?;
    let line = line.trim();
    if line.is_empty() {
        return Err("Daemon returned empty response".to_string());
    }
    serde_json::from_str(line).map_err(|e| format!("Malformed daemon response: {e}"))
}
