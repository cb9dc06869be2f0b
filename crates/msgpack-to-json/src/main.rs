//! `msgpack-to-json`: decode MessagePack (stdin) to JSON (stdout).
//!
//! Every top-level value in the input is written as one line of JSON.
//! Set `RUST_LOG` to see decoder diagnostics on stderr.

use std::io::{self, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use msgpack_wire::Decoder;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "msgpack-to-json")]
#[command(about = "Decode concatenated MessagePack values from stdin into JSON lines")]
#[command(version)]
struct Cli {
    /// Widen numbers and read UTF-8 binary as strings
    #[arg(long)]
    loose: bool,

    /// Pretty-print each value
    #[arg(long)]
    pretty: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let mut buf = Vec::new();
    if let Err(e) = io::stdin().read_to_end(&mut buf) {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }

    let mut dec = Decoder::new(&buf);
    dec.set_loose(cli.loose);
    dec.set_zero_copy(true);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut count = 0usize;
    while !dec.is_empty() {
        let value = match dec.decode_dynamic() {
            Ok(value) => value,
            Err(e) => {
                tracing::error!(position = dec.position(), value = count, "decode failed");
                let _ = out.flush();
                eprintln!("{e}");
                return ExitCode::FAILURE;
            }
        };
        let json = value.to_json();
        let text = if cli.pretty {
            serde_json::to_string_pretty(&json)
        } else {
            serde_json::to_string(&json)
        };
        let written = text
            .map_err(io::Error::from)
            .and_then(|text| writeln!(out, "{text}"));
        if let Err(e) = written {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
        count += 1;
    }
    if let Err(e) = out.flush() {
        eprintln!("{e}");
        return ExitCode::FAILURE;
    }
    tracing::debug!(values = count, bytes = buf.len(), "done");
    ExitCode::SUCCESS
}
