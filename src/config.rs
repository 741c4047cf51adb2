//! Config handling

use std::path::PathBuf;

use tracing::log::LevelFilter;

use crate::constants::MANIFEST_FILENAME;

/// Sets up logging based on the debug flag
pub fn setup_logging(debug: bool) -> Result<(), Box<std::io::Error>> {
    let level = if debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut logger = simple_logger::SimpleLogger::new().with_level(level);
    if !debug {
        logger = logger
            .with_module_level("ureq", LevelFilter::Warn)
            .with_module_level("ureq_proto", LevelFilter::Warn)
            .with_module_level("rustls", LevelFilter::Info);
    }
    logger.init().map_err(|err| {
        eprintln!("Failed to initialize logger: {}", err);
        Box::new(std::io::Error::other(err))
    })
}

/// Resolved settings for one generation run.
#[derive(Clone, Debug)]
pub struct GeneratorConfig {
    /// Bearer token for the images API
    pub api_key: String,
    /// Image model name
    pub image_model: String,
    /// Requested image size, eg `1024x1024`
    pub image_size: String,
    /// Generations endpoint URL
    pub endpoint: String,
    /// Directory images and the manifest land in
    pub out_dir: PathBuf,
    /// The generated TypeScript config module
    pub config_path: PathBuf,
}

impl GeneratorConfig {
    /// `manifest.json` inside the output directory.
    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join(MANIFEST_FILENAME)
    }
}
