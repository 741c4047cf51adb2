//! Renders `backgroundConfig.ts` and `manifest.json` from a finished run.

use serde::{Deserialize, Serialize};

use crate::error::GeneratorError;
use crate::filename::{FilenameMap, ResolvedFilename};
use crate::specs::BackgroundSpec;

/// One manifest row.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Spec id
    pub id: String,
    /// Human title
    pub title: String,
    /// Saved (or placeholder) filename
    pub filename: String,
    /// Mood tags, in order
    pub tags: Vec<String>,
}

/// Filename to reference for a spec. Specs missing from the map fall back
/// to `<id>.png`.
fn filename_for(spec: &BackgroundSpec, filenames: &FilenameMap) -> String {
    filenames
        .get(spec.id)
        .map(ResolvedFilename::filename)
        .map_or_else(|| format!("{}.png", spec.id), str::to_string)
}

/// A JSON string literal, which is also a valid TypeScript one.
fn quote(value: &str) -> Result<String, GeneratorError> {
    Ok(serde_json::to_string(value)?)
}

/// Renders the TypeScript config module, one entry per spec in order.
pub fn render_config_ts(
    specs: &[BackgroundSpec],
    filenames: &FilenameMap,
) -> Result<String, GeneratorError> {
    let mut lines = vec![
        "/**".to_string(),
        " * Background Configuration".to_string(),
        " * ".to_string(),
        format!(" * AUTO-GENERATED by {}", env!("CARGO_PKG_NAME")),
        " * Do not edit manually - regenerate using the generator.".to_string(),
        " */".to_string(),
        String::new(),
        "export interface BackgroundImage {".to_string(),
        "  id: string;".to_string(),
        "  filename: string;".to_string(),
        "  tags: string[];".to_string(),
        "}".to_string(),
        String::new(),
        "export const backgrounds: BackgroundImage[] = [".to_string(),
    ];

    for spec in specs {
        let tags = spec
            .tags
            .iter()
            .map(|tag| quote(tag))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        lines.push(format!(
            "  {{ id: {}, filename: {}, tags: [{}] }},",
            quote(spec.id)?,
            quote(&filename_for(spec, filenames))?,
            tags
        ));
    }

    lines.extend(
        [
            "];",
            "",
            "// Default fallback background if matching fails",
            "export const defaultBackground = backgrounds[0];",
            "",
        ]
        .map(str::to_string),
    );

    Ok(lines.join("\n"))
}

/// Manifest rows, one per spec in order.
pub fn manifest_entries(specs: &[BackgroundSpec], filenames: &FilenameMap) -> Vec<ManifestEntry> {
    specs
        .iter()
        .map(|spec| ManifestEntry {
            id: spec.id.to_string(),
            title: spec.title.to_string(),
            filename: filename_for(spec, filenames),
            tags: spec.tags.iter().map(|tag| tag.to_string()).collect(),
        })
        .collect()
}

/// Pretty-printed manifest JSON.
pub fn render_manifest(
    specs: &[BackgroundSpec],
    filenames: &FilenameMap,
) -> Result<String, GeneratorError> {
    let entries = manifest_entries(specs, filenames);
    Ok(serde_json::to_string_pretty(&entries)?)
}
