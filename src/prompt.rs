//! Image prompt template

use crate::specs::BackgroundSpec;

/// Builds the image prompt for a background. Fields go in verbatim.
pub fn build_prompt(spec: &BackgroundSpec) -> String {
    format!(
        r#"
Create a single, standalone 2D pixel-art background for a child-friendly game.

STYLE:
- Top-down orthographic (bird's-eye view), completely flat camera, like a classic RPG map tile.
- Clean pixel art, crisp edges, readable shapes, high color harmony.
- No characters, no animals, no UI, no text, no labels, no watermarks.

SCENE:
- Theme: {title}
- Description: {description}

COLOR/LIGHT:
- Match these mood tags: {tags}
- Child-friendly, bright, pleasant palette.

OUTPUT:
- One cohesive background image, suitable for a game scene.
"#,
        title = spec.title,
        description = spec.description,
        tags = spec.tags.join(", "),
    )
    .trim()
    .to_string()
}
