//! Color references accepted by color-typed settings
//!
//! Only the name ↔ index mapping lives here; RGB values belong to the
//! rendering core.

/// Use the representation's default color
pub const COLOR_DEFAULT: i32 = -1;
/// Color by element
pub const COLOR_ATOMIC: i32 = -4;
/// Use the object's color
pub const COLOR_OBJECT: i32 = -5;
/// Use the foreground color
pub const COLOR_FRONT: i32 = -6;
/// Use the background color
pub const COLOR_BACK: i32 = -7;

static SPECIAL_COLORS: &[(&str, i32)] = &[
    ("default", COLOR_DEFAULT),
    ("atomic", COLOR_ATOMIC),
    ("object", COLOR_OBJECT),
    ("front", COLOR_FRONT),
    ("back", COLOR_BACK),
];

/// Named colors, in index order
static NAMED_COLORS: &[&str] = &[
    "white",
    "black",
    "red",
    "green",
    "blue",
    "yellow",
    "cyan",
    "magenta",
    "gray",
    "grey",
    "carbon",
    "nitrogen",
    "oxygen",
    "hydrogen",
    "sulfur",
    "orange",
    "pink",
    "purple",
    "brown",
    "salmon",
    "lime",
    "slate",
    "hotpink",
    "teal",
    "olive",
    "marine",
    "forest",
    "firebrick",
    "chocolate",
    "wheat",
    "violet",
    "lightblue",
    "palecyan",
    "paleyellow",
];

/// Resolve a color reference: an index, a special color, or a color name
pub fn color_index(text: &str) -> Option<i32> {
    let text = text.trim();
    if let Ok(index) = text.parse::<i32>() {
        return Some(index);
    }
    let lower = text.to_ascii_lowercase();
    if let Some((_, index)) = SPECIAL_COLORS.iter().find(|(name, _)| *name == lower) {
        return Some(*index);
    }
    NAMED_COLORS
        .iter()
        .position(|name| *name == lower)
        .map(|i| i as i32)
}

/// Name of a color index, if it has one
pub fn color_name(index: i32) -> Option<&'static str> {
    if index < 0 {
        return SPECIAL_COLORS
            .iter()
            .find(|(_, i)| *i == index)
            .map(|(name, _)| *name);
    }
    NAMED_COLORS.get(index as usize).copied()
}
