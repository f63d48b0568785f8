use std::io::{self, BufReader, Write};

use log::{debug, error, warn};
use trigrep_indexer::ProjectIndex;
use trigrep_protocol::Request;
use trigrep_protocol::codec::{read_raw_message, write_json_message};

use crate::handlers;

/// Reads `Content-Length:`-framed JSON requests from stdin and writes
/// framed JSON responses to stdout until EOF or a `shutdown` request.
///
/// Malformed framing, invalid JSON, and missing required fields never
/// bring the loop down: spec §7's "Transport error" policy is "surfaced as
/// `error`; server continues" — each malformed message gets an `{error}`
/// response and the next message is read normally.
pub fn run(project: &ProjectIndex) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut reader = BufReader::new(stdin.lock());
    let mut writer = stdout.lock();

    loop {
        let raw = match read_raw_message(&mut reader) {
            Ok(Some(bytes)) => bytes,
            Ok(None) => {
                debug!("stdin closed, shutting down");
                return Ok(());
            }
            Err(err) => {
                warn!("malformed request framing: {err}");
                respond_error(&mut writer, &format!("malformed request: {err}"))?;
                continue;
            }
        };

        let request: Request = match serde_json::from_slice(&raw) {
            Ok(req) => req,
            Err(err) => {
                warn!("malformed request body: {err}");
                respond_error(&mut writer, &format!("malformed request: {err}"))?;
                continue;
            }
        };

        let is_shutdown = matches!(request, Request::Shutdown);
        let response = handlers::handle(request, project);

        if let Err(err) = write_json_message(&mut writer, &response) {
            error!("failed to write response: {err}");
            return Err(err.into());
        }

        if is_shutdown {
            debug!("shutdown requested, stopping server loop");
            return Ok(());
        }
    }
}

fn respond_error<W: Write>(writer: &mut W, message: &str) -> anyhow::Result<()> {
    let response = trigrep_protocol::ErrorResponse::new(message);
    write_json_message(writer, &response)?;
    Ok(())
}
