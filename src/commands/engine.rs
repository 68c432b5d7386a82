//! JSON-lines bridge
//!
//! Reads one JSON request per line on stdin and writes one JSON response per
//! line on stdout. The engine, and with it the last scan, lives as long as
//! the process, so a host can scan once and clean up later.
//!
//! Requests:
//! - `{"action":"scan"}` → scan report
//! - `{"action":"cleanup","ids":["user_temp"]}` → cleanup result (`ids` optional)
//! - `{"action":"scan-virus"}` → malware scan report

use anyhow::{Context as _, Result};
use serde::Deserialize;
use serde_json::{Value, json};
use std::io::{self, BufRead, Write};
use sweepkit::{Engine, MalwareScanner};

use crate::Context;

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "kebab-case")]
enum Request {
    Scan,
    Cleanup {
        #[serde(default)]
        ids: Vec<String>,
    },
    ScanVirus,
}

pub fn run(ctx: &Context) -> Result<()> {
    let engine = super::platform_engine(ctx);
    let scanner = ctx.config.malware_scanner();
    log::info!("Engine bridge ready");
    serve(&engine, &scanner, io::stdin().lock(), io::stdout().lock())
}

/// Answer requests until the input closes.
fn serve<R: BufRead, W: Write>(
    engine: &Engine,
    scanner: &MalwareScanner,
    input: R,
    mut output: W,
) -> Result<()> {
    for bytes in input.split(b'\n') {
        let bytes = bytes.context("Failed to read request")?;
        let response = match String::from_utf8(bytes) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => handle_request(engine, scanner, &line),
            Err(e) => json!({ "error": "invalid-request", "detail": e.to_string() }),
        };
        writeln!(output, "{response}").context("Failed to write response")?;
        output.flush()?;
    }
    log::info!("Input closed, engine bridge exiting");
    Ok(())
}

/// Turn one request line into one response value.
fn handle_request(engine: &Engine, scanner: &MalwareScanner, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => return json!({ "error": "invalid-request", "detail": e.to_string() }),
    };
    log::debug!("Request: {request:?}");

    let result = match request {
        Request::Scan => engine.scan().map(|r| serde_json::to_value(r.as_ref())),
        Request::Cleanup { ids } => engine.cleanup(&ids).map(|r| serde_json::to_value(&r)),
        Request::ScanVirus => Ok(serde_json::to_value(scanner.run())),
    };

    match result {
        Ok(Ok(value)) => value,
        Ok(Err(e)) => json!({ "error": "serialize", "detail": e.to_string() }),
        Err(e) if e.is_no_scan() => json!({ "error": e.code() }),
        Err(e) => json!({ "error": e.code(), "detail": e.to_string() }),
    }
}
