/// Fixed section color palette, assigned round-robin in creation order.
pub const SECTION_COLORS: [&str; 6] = [
    "#FF7D00", "#29757A", "#2E5A88", "#D99100", "#4A7A45", "#BE3F23",
];

/// Color for the section at the given creation index, wrapping around the
/// palette.
pub fn color_at(index: usize) -> &'static str {
    SECTION_COLORS[index % SECTION_COLORS.len()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_around() {
        assert_eq!(color_at(0), SECTION_COLORS[0]);
        assert_eq!(color_at(5), SECTION_COLORS[5]);
        assert_eq!(color_at(6), SECTION_COLORS[0]);
        assert_eq!(color_at(13), SECTION_COLORS[1]);
    }
}
