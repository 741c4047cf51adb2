//! CLI parser
use clap::Parser;
use std::path::PathBuf;

use crate::config::GeneratorConfig;
use crate::constants::{
    DEFAULT_CONFIG_PATH, DEFAULT_IMAGE_MODEL, DEFAULT_IMAGE_SIZE, DEFAULT_IMAGES_ENDPOINT,
    DEFAULT_OUT_DIR,
};
use crate::error::GeneratorError;

#[derive(Parser, Debug)]
#[command(name = "bggen")]
#[command(about = "Generate top-down pixel-art backgrounds and rewrite backgroundConfig.ts")]
/// CLI Options, every one of them can be set from the environment instead
pub struct CliOptions {
    #[clap(long, help = "Enable debug logging", env = "BGGEN_DEBUG")]
    /// Enable debug logging. Env: BGGEN_DEBUG
    pub debug: bool,

    #[clap(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    /// OpenAI API key, required.
    /// Env: OPENAI_API_KEY
    pub openai_api_key: Option<String>,

    #[clap(long, default_value = DEFAULT_IMAGE_MODEL, env = "OPENAI_IMAGE_MODEL")]
    /// Image model, eg `dall-e-3` or `gpt-image-1`.
    /// Env: OPENAI_IMAGE_MODEL
    pub image_model: String,

    #[clap(long, default_value = DEFAULT_IMAGE_SIZE, env = "OPENAI_IMAGE_SIZE")]
    /// Image size, defaults to `1024x1024`.
    /// Env: OPENAI_IMAGE_SIZE
    pub image_size: String,

    #[clap(long, default_value = DEFAULT_OUT_DIR, env = "BGGEN_OUT_DIR")]
    /// Where images and `manifest.json` are written.
    /// Env: BGGEN_OUT_DIR
    pub out_dir: PathBuf,

    #[clap(long, default_value = DEFAULT_CONFIG_PATH, env = "BGGEN_CONFIG_PATH")]
    /// The TypeScript config module to regenerate.
    /// Env: BGGEN_CONFIG_PATH
    pub config_path: PathBuf,

    #[clap(long, default_value = DEFAULT_IMAGES_ENDPOINT, env = "BGGEN_IMAGES_ENDPOINT")]
    /// Images generation endpoint, for OpenAI-compatible providers.
    /// Env: BGGEN_IMAGES_ENDPOINT
    pub endpoint: String,
}

impl CliOptions {
    /// Checks the options and resolves them into a [GeneratorConfig].
    /// A missing or blank API key is fatal.
    pub fn into_config(self) -> Result<GeneratorConfig, GeneratorError> {
        let api_key = self
            .openai_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(GeneratorError::MissingApiKey)?;

        Ok(GeneratorConfig {
            api_key,
            image_model: self.image_model,
            image_size: self.image_size,
            endpoint: self.endpoint,
            out_dir: self.out_dir,
            config_path: self.config_path,
        })
    }
}
