use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tracing::debug;

/// Grabs the SSH identification banner: connect, read the first line
/// the server sends, strip trailing CR/LF. Both the connect and the
/// read get the full timeout.
pub async fn read_protocol_banner(host: &str, port: u16, limit: Duration) -> Result<String> {
    let stream = timeout(limit, TcpStream::connect((host, port)))
        .await
        .with_context(|| format!("connecting to {host}:{port} timed out"))?
        .with_context(|| format!("failed to connect to {host}:{port}"))?;

    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    let n = timeout(limit, reader.read_until(b'\n', &mut line))
        .await
        .with_context(|| format!("reading banner from {host}:{port} timed out"))?
        .with_context(|| format!("failed to read banner from {host}:{port}"))?;
    if n == 0 {
        bail!("{host}:{port} closed the connection before sending a banner");
    }

    while matches!(line.last(), Some(b'\n') | Some(b'\r')) {
        line.pop();
    }
    let banner = String::from_utf8_lossy(&line).into_owned();
    debug!(%banner, "captured protocol banner");
    Ok(banner)
}
