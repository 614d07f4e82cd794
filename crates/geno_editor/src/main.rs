//! genogram-replay
//!
//! Replays a JSON editing script through the editor controller and prints
//! (or writes) the resulting document.
//!
//! ```text
//! genogram-replay <script.json> [--input doc.json] [--output doc.json] [--config editor.toml]
//! ```

use std::error::Error;
use std::path::PathBuf;

use geno_editor::core::EditorConfig;
use geno_editor::script::load_script;
use geno_editor::{run_script, Document, EditorController};

const USAGE: &str =
    "usage: genogram-replay <script.json> [--input doc.json] [--output doc.json] [--config editor.toml]";

#[derive(Debug, Default)]
struct Args {
    script: PathBuf,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    config: Option<PathBuf>,
}

impl Args {
    fn parse(mut args: impl Iterator<Item = String>) -> Result<Self, String> {
        let mut parsed = Args::default();
        let mut script = None;
        while let Some(arg) = args.next() {
            let mut value = |flag: &str| args.next().map(PathBuf::from).ok_or(format!("{flag} needs a path"));
            match arg.as_str() {
                "--input" => parsed.input = Some(value("--input")?),
                "--output" => parsed.output = Some(value("--output")?),
                "--config" => parsed.config = Some(value("--config")?),
                "-h" | "--help" => return Err(USAGE.to_string()),
                flag if flag.starts_with("--") => return Err(format!("unknown option {flag}\n{USAGE}")),
                path if script.is_none() => script = Some(PathBuf::from(path)),
                extra => return Err(format!("unexpected argument {extra}\n{USAGE}")),
            }
        }
        parsed.script = script.ok_or_else(|| USAGE.to_string())?;
        Ok(parsed)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn Error>> {
    let args = Args::parse(std::env::args().skip(1))?;

    let config = match &args.config {
        Some(path) => EditorConfig::load_from_file(path)?,
        None => EditorConfig::load()?,
    };
    let mut editor = EditorController::new(config);

    if let Some(input) = &args.input {
        editor.load_document(Document::load(input)?);
    }

    let steps = load_script(&args.script)?;
    let report = run_script(&mut editor, &steps)?;
    log::info!(
        "Replayed {} steps: {} applied, {} merged, {} rejected, {} undone, {} redone",
        report.steps,
        report.applied,
        report.merged,
        report.rejected,
        report.undone,
        report.redone
    );

    match &args.output {
        Some(path) => editor.save_document(path)?,
        None => println!("{}", editor.snapshot().to_json()?),
    }
    Ok(())
}
