use std::path::PathBuf;
use std::process::ExitCode;

use vocab_audio_map::mapper::{discover_root, AudioMapper, MapperConfigBuilder, MapperError};

/// Usage: `vocab-audio-map [ROOT]`
///
/// Without `ROOT`, the project root is the nearest ancestor of the current
/// directory that contains `lessons/index.json`.
fn main() -> ExitCode {
    env_logger::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), MapperError> {
    let root = match std::env::args_os().nth(1) {
        Some(arg) => PathBuf::from(arg),
        None => discover_root(&std::env::current_dir()?),
    };
    log::info!("Project root: {}", root.display());

    let config = MapperConfigBuilder::default().root(root).build()?;
    let mapper = AudioMapper::new(config);
    let report = mapper.run()?;
    let report_path = mapper.config().report_path();

    println!("Audio mapping complete");
    println!("{}", report.summary());
    println!("Report written to: {}", report_path.display());
    Ok(())
}
