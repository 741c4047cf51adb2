//! The built-in table of backgrounds to generate.

/// One background to generate. The `tags` drive matching in the game.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct BackgroundSpec {
    /// Stable key the game looks backgrounds up by.
    pub id: &'static str,
    /// Short human title, also the source of the filename.
    pub title: &'static str,
    /// Scene description fed into the prompt.
    pub description: &'static str,
    /// Mood tags, in order.
    pub tags: &'static [&'static str],
}

impl BackgroundSpec {
    const fn new(
        id: &'static str,
        title: &'static str,
        description: &'static str,
        tags: &'static [&'static str],
    ) -> Self {
        Self {
            id,
            title,
            description,
            tags,
        }
    }
}

/// Every background, in generation (and config) order.
pub static SPECS: &[BackgroundSpec] = &[
    BackgroundSpec::new(
        "bg1",
        "Sunny Meadow Clearing",
        "Bright grass, soft wildflowers, warm midday sunlight. Child-friendly, simple composition.",
        &["sunshine", "happy", "bright", "meadow", "flowers"],
    ),
    BackgroundSpec::new(
        "bg2",
        "Rainbow Field",
        "Pastel meadow with a soft rainbow arc and sparkly accents. Cheerful, playful magic vibe.",
        &["rainbow", "colorful", "sky", "joyful", "clouds"],
    ),
    BackgroundSpec::new(
        "bg3",
        "Dark Enchanted Forest",
        "Mysterious forest with deep shadows and glowing elements. Magical but not scary.",
        &["dark", "mysterious", "forest", "spooky", "night"],
    ),
    BackgroundSpec::new(
        "bg4",
        "Ocean Sunset Beach",
        "Warm sunset over calm ocean waters with sandy beach. Peaceful and relaxing.",
        &["ocean", "sunset", "beach", "peaceful", "waves"],
    ),
    BackgroundSpec::new(
        "bg5",
        "Snowy Mountain Peak",
        "Snow-covered mountain clearing with cool blue shadows. Majestic winter feel.",
        &["snow", "mountain", "cold", "winter", "majestic"],
    ),
    BackgroundSpec::new(
        "bg6",
        "Magical Castle Grounds",
        "Fantasy castle courtyard with magical sparkles. Royal and enchanting.",
        &["castle", "magical", "fantasy", "fairy tale", "royal"],
    ),
    BackgroundSpec::new(
        "bg7",
        "Space Nebula",
        "Cosmic space scene with colorful nebula and stars. Dreamy and vast.",
        &["space", "stars", "nebula", "cosmic", "galaxy"],
    ),
    BackgroundSpec::new(
        "bg8",
        "Autumn Park Path",
        "Orange and red leaves scattered over dirt paths. Cozy fall mood.",
        &["autumn", "leaves", "park", "orange", "peaceful"],
    ),
    BackgroundSpec::new(
        "bg9",
        "Underwater Coral Reef",
        "Vibrant coral reef with fish silhouettes. Blue and colorful underwater world.",
        &["underwater", "ocean", "coral", "fish", "blue"],
    ),
    BackgroundSpec::new(
        "bg10",
        "Cherry Blossom Garden",
        "Pink cherry blossom trees with petals floating. Spring Japanese garden feel.",
        &["cherry", "blossom", "pink", "spring", "japan"],
    ),
    BackgroundSpec::new(
        "bg11",
        "Desert Sand Dunes",
        "Warm desert landscape with rolling sand dunes. Adventure and exploration vibe.",
        &["desert", "sand", "hot", "dry", "adventure"],
    ),
    BackgroundSpec::new(
        "bg12",
        "City Night Skyline",
        "Nighttime city with glowing lights and modern buildings. Urban energy.",
        &["city", "night", "lights", "urban", "modern"],
    ),
    BackgroundSpec::new(
        "bg13",
        "Enchanted Garden",
        "Magical garden with glowing flowers and fantasy plants. Whimsical nature.",
        &["garden", "enchanted", "flowers", "magical", "nature"],
    ),
    BackgroundSpec::new(
        "bg14",
        "Stormy Sky",
        "Dramatic clouds with thunder and lightning. Intense but exciting.",
        &["storm", "clouds", "dramatic", "thunder", "intense"],
    ),
    BackgroundSpec::new(
        "bg15",
        "Cozy Cabin Interior",
        "Warm wooden cabin with fireplace glow. Safe and comfortable.",
        &["cabin", "cozy", "warm", "home", "comfort"],
    ),
    BackgroundSpec::new(
        "bg16",
        "Tropical Jungle",
        "Dense green jungle with tropical plants. Wild adventure awaits.",
        &["jungle", "tropical", "adventure", "green", "wild"],
    ),
    BackgroundSpec::new(
        "bg17",
        "Floating Islands",
        "Fantasy floating islands in the sky with waterfalls. Surreal and dreamy.",
        &["floating", "islands", "fantasy", "dreamy", "surreal"],
    ),
    BackgroundSpec::new(
        "bg18",
        "Northern Lights",
        "Aurora borealis dancing over arctic landscape. Magical night sky.",
        &["aurora", "northern lights", "night", "magical", "arctic"],
    ),
    BackgroundSpec::new(
        "bg19",
        "Candy Land",
        "Whimsical candy-themed landscape with sweets everywhere. Fun and colorful.",
        &["candy", "sweet", "colorful", "fun", "whimsical"],
    ),
    BackgroundSpec::new(
        "bg20",
        "Ancient Temple Ruins",
        "Mysterious ancient ruins with vines and stone. History and adventure.",
        &["ancient", "ruins", "history", "mystery", "adventure"],
    ),
];

/// Returns the built-in spec with the given id.
pub fn find(id: &str) -> Option<&'static BackgroundSpec> {
    SPECS.iter().find(|spec| spec.id == id)
}
