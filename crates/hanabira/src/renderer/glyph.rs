/// Every glyph a sprite can show. The host reads this table once
/// (`glyph_table_json`) and indexes it with `SpriteInstance::glyph`.
pub const GLYPHS: [&str; 19] = [
    "🌸", "💮", "🌺", "🌼", "🏵️", "🥀", "🌷", "🌹", "💐", "🌻", // 0..=9 blossoms
    "💖", "✨", "🌟", "💫", // 10..=13 sparkles
    "♪", "♫", "♬", "🎵", "🎶", // 14..=18 music notes
];

/// Index into [`GLYPHS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Glyph(pub u8);

impl Glyph {
    pub const BLOSSOM: Glyph = Glyph(0);
    pub const SPARKLES: Glyph = Glyph(11);

    pub fn as_str(self) -> &'static str {
        GLYPHS.get(self.0 as usize).copied().unwrap_or("")
    }
}

/// Ambient set. 🌸 and 🌺 appear twice, which doubles their odds.
pub const AMBIENT: [Glyph; 12] = [
    Glyph(0), Glyph(1), Glyph(2), Glyph(3), Glyph(4), Glyph(5),
    Glyph(6), Glyph(7), Glyph(8), Glyph(9), Glyph(2), Glyph(0),
];

/// Click/tap burst set.
pub const BURST: [Glyph; 5] = [Glyph(0), Glyph(10), Glyph(11), Glyph(12), Glyph(13)];

/// Floating music notes.
pub const NOTES: [Glyph; 5] = [Glyph(14), Glyph(15), Glyph(16), Glyph(17), Glyph(18)];
