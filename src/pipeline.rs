//! The generation run: request every background in order, save what comes
//! back, then rewrite the config module and manifest.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{error, info};

use crate::config::GeneratorConfig;
use crate::constants::REQUEST_PAUSE;
use crate::error::GeneratorError;
use crate::filename::{FilenameMap, ResolvedFilename, image_filename, placeholder_filename};
use crate::openai::{ImagesClient, Sleeper, Transport};
use crate::prompt::build_prompt;
use crate::render::{render_config_ts, render_manifest};
use crate::specs::BackgroundSpec;

/// What a finished run produced.
#[derive(Debug, Clone)]
pub struct RunReport {
    /// Where every spec ended up
    pub filenames: FilenameMap,
    /// The rewritten TypeScript config module
    pub config_path: PathBuf,
    /// The rewritten manifest
    pub manifest_path: PathBuf,
}

fn generate_one<T: Transport, S: Sleeper>(
    spec: &BackgroundSpec,
    client: &ImagesClient<T, S>,
    out_dir: &Path,
) -> Result<String, GeneratorError> {
    let image_bytes = client.generate(&build_prompt(spec))?;

    let filename = image_filename(spec.title);
    let path = out_dir.join(&filename);
    fs::write(&path, &image_bytes).map_err(|err| GeneratorError::io(&path, err))?;
    Ok(filename)
}

/// Requests every spec in order. A failed spec gets a placeholder filename
/// and the run moves on; this never fails as a whole.
///
/// After each saved image we wait `pause` before the next request.
pub fn generate_all<T: Transport, S: Sleeper>(
    specs: &[BackgroundSpec],
    client: &ImagesClient<T, S>,
    out_dir: &Path,
    pause: Duration,
) -> FilenameMap {
    let mut filenames = FilenameMap::new();
    let total = specs.len();

    for (index, spec) in specs.iter().enumerate() {
        info!("[{:02}/{total}] Generating: {}", index + 1, spec.title);

        match generate_one(spec, client, out_dir) {
            Ok(filename) => {
                info!("    Saved: {filename}");
                filenames.record(spec.id, ResolvedFilename::Saved(filename));
                if index + 1 < total {
                    client.sleeper().sleep(pause);
                }
            }
            Err(err) => {
                error!("    Failed: {err}");
                let placeholder = placeholder_filename(spec.id);
                filenames.record(spec.id, ResolvedFilename::Placeholder(placeholder));
            }
        }
    }

    filenames
}

/// Overwrites the config module and manifest. Failures here end the run.
pub fn write_outputs(
    specs: &[BackgroundSpec],
    filenames: &FilenameMap,
    config_path: &Path,
    manifest_path: &Path,
) -> Result<(), GeneratorError> {
    for path in [config_path, manifest_path] {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|err| GeneratorError::io(parent, err))?;
        }
    }

    let config = render_config_ts(specs, filenames)?;
    fs::write(config_path, config).map_err(|err| GeneratorError::io(config_path, err))?;
    info!("Updated: {}", config_path.display());

    let manifest = render_manifest(specs, filenames)?;
    fs::write(manifest_path, manifest).map_err(|err| GeneratorError::io(manifest_path, err))?;
    info!("Saved manifest: {}", manifest_path.display());
    Ok(())
}

/// Runs the whole batch. Only output-directory and config/manifest I/O
/// errors come back as `Err`; failed images are counted in the report.
pub fn run<T: Transport, S: Sleeper>(
    config: &GeneratorConfig,
    specs: &[BackgroundSpec],
    client: &ImagesClient<T, S>,
) -> Result<RunReport, GeneratorError> {
    fs::create_dir_all(&config.out_dir).map_err(|err| GeneratorError::io(&config.out_dir, err))?;

    info!("Generating {} backgrounds...", specs.len());
    info!("Output directory: {}", config.out_dir.display());
    info!("Using model: {}", client.model());

    let filenames = generate_all(specs, client, &config.out_dir, REQUEST_PAUSE);

    let manifest_path = config.manifest_path();
    write_outputs(specs, &filenames, &config.config_path, &manifest_path)?;

    info!(
        "Done! Generated {} backgrounds, {} placeholders",
        filenames.saved_count(),
        filenames.placeholder_count()
    );
    info!("Images: {}", config.out_dir.display());
    info!("Config: {}", config.config_path.display());

    Ok(RunReport {
        filenames,
        config_path: config.config_path.clone(),
        manifest_path,
    })
}
