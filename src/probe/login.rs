use std::net::{TcpStream, ToSocketAddrs};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use ssh2::Session;
use tracing::debug;

/// Fictitious, non-privileged identity presented during the truncated
/// handshake. It only has to be plausible enough for the server to
/// enter userauth and emit its pre-auth banner.
const PROBE_USER: &str = "bannerprobe";

/// Attempts a minimal SSH handshake to harvest the server's
/// pre-authentication banner. No viable auth method is offered, so the
/// attempt is expected to be rejected; the banner slot is consulted
/// regardless of how the handshake itself ended. libssh2 is a blocking
/// library, so the work runs on the blocking pool.
pub async fn read_login_banner(host: &str, port: u16, limit: Duration) -> Result<String> {
    let host = host.to_string();
    tokio::task::spawn_blocking(move || capture_blocking(&host, port, limit))
        .await
        .context("login banner task panicked")?
}

// libssh2 takes its timeout in whole milliseconds as a u32; clamp
// oversized durations instead of truncating them.
fn timeout_ms(limit: Duration) -> u32 {
    u32::try_from(limit.as_millis()).unwrap_or(u32::MAX)
}

fn capture_blocking(host: &str, port: u16, limit: Duration) -> Result<String> {
    let addr = (host, port)
        .to_socket_addrs()
        .with_context(|| format!("failed to resolve {host}:{port}"))?
        .next()
        .ok_or_else(|| anyhow!("no address found for {host}:{port}"))?;

    let stream = TcpStream::connect_timeout(&addr, limit)
        .with_context(|| format!("failed to connect to {host}:{port}"))?;
    stream.set_read_timeout(Some(limit))?;
    stream.set_write_timeout(Some(limit))?;

    let mut sess = Session::new()?;
    sess.set_tcp_stream(stream);
    sess.set_timeout(timeout_ms(limit));

    // Handshake, then request userauth with the "none" method via
    // auth_methods. Servers send SSH_MSG_USERAUTH_BANNER before
    // answering that request, so the banner may be present even when
    // this chain errors out partway.
    let attempt = sess
        .handshake()
        .and_then(|()| sess.auth_methods(PROBE_USER).map(|_| ()));

    // An Err from the banner slot (e.g. the server never sent one)
    // just means nothing was captured.
    let banner = sess.userauth_banner().ok().flatten().map(str::to_string);

    // The session and its stream drop on every path below.
    match (banner, attempt) {
        (Some(text), _) if !text.is_empty() => {
            debug!("captured login banner during handshake");
            Ok(text)
        }
        (_, Err(err)) => Err(err).context("ssh handshake yielded no banner"),
        _ => Ok(String::new()),
    }
}
