use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::error::{HarnessError, Result};
use crate::replay::Replay;
use crate::script::Script;

#[derive(Debug, Parser)]
#[command(
    name = "jellyfx-replay",
    about = "Replay a scripted pointer gesture through the jelly engine and emit a JSONL trace",
    version
)]
pub struct Cli {
    /// Path to the JSON gesture script.
    pub script: PathBuf,

    /// Write the trace here instead of stdout.
    #[arg(long)]
    pub out: Option<PathBuf>,

    /// Print a JSON summary. Without --out the trace itself is not printed.
    #[arg(long)]
    pub summary: bool,
}

pub fn run_from_env() -> Result<()> {
    init_logging();
    run(Cli::parse())
}

/// Log to stderr, filtered by `RUST_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

pub fn run(cli: Cli) -> Result<()> {
    let json = std::fs::read_to_string(&cli.script).map_err(|source| HarnessError::ReadScript {
        path: cli.script.clone(),
        source,
    })?;
    let script = Script::from_json(&json)?;
    let trace = Replay::run(&script)?;

    match &cli.out {
        Some(path) => trace.write_jsonl(BufWriter::new(File::create(path)?))?,
        None if !cli.summary => trace.write_jsonl(io::stdout().lock())?,
        None => {}
    }

    if cli.summary {
        let mut stdout = io::stdout().lock();
        serde_json::to_writer_pretty(&mut stdout, &trace.summary())?;
        writeln!(stdout)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const TAP: &str = r#"{
        "element": { "width": 80.0, "height": 40.0 },
        "steps": [
            { "op": "down", "x": 40.0, "y": 20.0 },
            { "op": "wait", "ms": 16 },
            { "op": "up", "x": 40.0, "y": 20.0 }
        ]
    }"#;

    #[test]
    fn writes_trace_file() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("tap.json");
        let out = dir.path().join("trace.jsonl");
        std::fs::write(&script, TAP).unwrap();

        run(Cli {
            script,
            out: Some(out.clone()),
            summary: false,
        })
        .unwrap();

        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.lines().count() > 2);
        assert!(text.lines().any(|l| l.contains(r#""event":"tap""#)));
    }

    #[test]
    fn missing_script_is_a_read_error() {
        let dir = tempdir().unwrap();
        let err = run(Cli {
            script: dir.path().join("missing.json"),
            out: None,
            summary: true,
        })
        .unwrap_err();
        assert!(matches!(err, HarnessError::ReadScript { .. }));
        assert_eq!(err.exit_code(), 74);
    }

    #[test]
    fn malformed_script_is_a_json_error() {
        let dir = tempdir().unwrap();
        let script = dir.path().join("bad.json");
        std::fs::write(&script, "{ not json").unwrap();
        let err = run(Cli {
            script,
            out: None,
            summary: true,
        })
        .unwrap_err();
        assert!(matches!(err, HarnessError::Json(_)));
    }

    #[test]
    fn parses_arguments() {
        let cli = Cli::try_parse_from(["jellyfx-replay", "s.json", "--out", "t.jsonl", "--summary"])
            .unwrap();
        assert_eq!(cli.script, PathBuf::from("s.json"));
        assert_eq!(cli.out, Some(PathBuf::from("t.jsonl")));
        assert!(cli.summary);
    }
}
