//! Shared constants/defaults for the generator
//!

use std::time::Duration;

/// Images API endpoint used unless overridden.
pub const DEFAULT_IMAGES_ENDPOINT: &str = "https://api.openai.com/v1/images/generations";

/// Image model used when `OPENAI_IMAGE_MODEL` is unset.
pub const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";

/// Image size used when `OPENAI_IMAGE_SIZE` is unset.
pub const DEFAULT_IMAGE_SIZE: &str = "1024x1024";

/// Where the generated images (and the manifest) go.
pub const DEFAULT_OUT_DIR: &str = "src/assets/backgrounds";

/// Where the generated TypeScript config module goes.
pub const DEFAULT_CONFIG_PATH: &str = "src/mainGame/backgroundConfig.ts";

/// Manifest filename, written inside the output directory.
pub const MANIFEST_FILENAME: &str = "manifest.json";

/// Longest filename stem [crate::filename::safe_filename] will produce.
pub const MAX_FILENAME_STEM: usize = 50;

/// Stem used when a title sanitizes down to nothing.
pub const FALLBACK_FILENAME_STEM: &str = "background";

/// Timeout for a single generation request.
pub const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Timeout when following an image URL.
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Attempt ceiling for one generation call.
pub const MAX_ATTEMPTS: u32 = 6;

/// First backoff delay, in seconds.
pub const BACKOFF_BASE_SECONDS: f64 = 2.0;

/// Backoff growth per retry.
pub const BACKOFF_FACTOR: f64 = 1.8;

/// Longest backoff delay before jitter, in seconds.
pub const MAX_BACKOFF_SECONDS: f64 = 120.0;

/// Pause between successful requests, to stay under rate limits.
pub const REQUEST_PAUSE: Duration = Duration::from_secs(1);

/// Largest response body we'll read, base64 PNGs get big.
pub const MAX_RESPONSE_BYTES: u64 = 64 * 1024 * 1024;

/// HTTP statuses that get retried.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];
