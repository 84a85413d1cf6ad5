//! Greedy line breaking against real glyph metrics

use super::font::{FontMetrics, GlyphPath};
use super::path::{BoundingBox, DrawCommand};

/// Vertical distance between consecutive baselines
pub const LINE_HEIGHT: f64 = 18.0;
/// Upper bound on measurements per layout call
pub const MAX_ITERATIONS: usize = 1000;
pub const ELLIPSIS: &str = "...";

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextLayout {
    /// Union of every committed line's box, always containing the origin
    pub bounding_box: BoundingBox,
    pub commands: Vec<DrawCommand>,
    pub lines: usize,
    /// Rendered text of each committed line, ellipsis included
    pub text_lines: Vec<String>,
}

impl TextLayout {
    pub fn is_truncated(&self) -> bool {
        self.text_lines
            .last()
            .is_some_and(|line| line.ends_with(ELLIPSIS))
    }
}

/// Breaks `text` into at most `max_lines` lines no wider than `max_width`.
///
/// Each line is the longest run of whole words that fits. A first word that
/// is wider than `max_width` on its own is committed anyway and overflows.
/// When the last allowed line leaves text behind, that line is measured again
/// with an ellipsis appended.
pub fn layout_text(
    font: &dyn FontMetrics,
    text: &str,
    font_size: f64,
    max_width: f64,
    max_lines: usize,
) -> TextLayout {
    let mut layout = TextLayout::default();
    if max_lines == 0 {
        return layout;
    }

    let mut measure = Measure {
        font,
        font_size,
        max_width,
        baseline: 0.0,
        count: 0,
    };
    let mut cursor = skip_whitespace(text, 0);

    while cursor < text.len() {
        let rest = &text[cursor..];
        let Some((end, mut glyphs)) = measure.fit_line(rest, &break_points(rest)) else {
            return layout;
        };

        layout.lines += 1;
        let mut rendered = rest[..end].trim().to_string();
        let next = skip_whitespace(text, cursor + end);

        if layout.lines >= max_lines && next < text.len() {
            rendered.push_str(ELLIPSIS);
            glyphs = font.get_path(&rendered, 0.0, measure.baseline, font_size);
        }

        layout.bounding_box = layout.bounding_box.union(&glyphs.bounding_box);
        layout.commands.extend(glyphs.commands);
        layout.text_lines.push(rendered);

        if layout.lines >= max_lines {
            break;
        }

        cursor = next;
        measure.baseline += LINE_HEIGHT;
    }

    layout
}

/// Glyph measurements for one layout call, capped at [`MAX_ITERATIONS`]
struct Measure<'a> {
    font: &'a dyn FontMetrics,
    font_size: f64,
    max_width: f64,
    baseline: f64,
    count: usize,
}

impl Measure<'_> {
    fn prefix(&mut self, rest: &str, end: usize) -> Option<GlyphPath> {
        if self.count >= MAX_ITERATIONS {
            return None;
        }
        self.count += 1;
        Some(
            self.font
                .get_path(rest[..end].trim(), 0.0, self.baseline, self.font_size),
        )
    }

    fn fits(&self, glyphs: &GlyphPath) -> bool {
        glyphs.bounding_box.width() <= self.max_width
    }

    /// Longest prefix of `rest` ending at one of `breaks` that fits, found by
    /// doubling the word count until a prefix overflows and then bisecting.
    /// Measured text stays proportional to the line, not to `rest`.
    fn fit_line(&mut self, rest: &str, breaks: &[usize]) -> Option<(usize, GlyphPath)> {
        let first = self.prefix(rest, breaks[0])?;
        if !self.fits(&first) {
            return Some((breaks[0], first));
        }

        let mut best = (0, first);
        let mut upper = breaks.len();

        while best.0 + 1 < upper {
            let next = (best.0 * 2 + 1).min(upper - 1);
            let glyphs = self.prefix(rest, breaks[next])?;
            if self.fits(&glyphs) {
                best = (next, glyphs);
            } else {
                upper = next;
                break;
            }
        }

        while best.0 + 1 < upper {
            let mid = (best.0 + upper) / 2;
            let glyphs = self.prefix(rest, breaks[mid])?;
            if self.fits(&glyphs) {
                best = (mid, glyphs);
            } else {
                upper = mid;
            }
        }

        Some((breaks[best.0], best.1))
    }
}

/// End offsets of every word in `rest`, which starts with a non-blank
/// character; words are separated by spaces and the last offset is the end of
/// the trimmed text
fn break_points(rest: &str) -> Vec<usize> {
    let end = rest.trim_end().len();
    let bytes = rest.as_bytes();
    let mut breaks: Vec<usize> = (1..end)
        .filter(|&i| bytes[i] == b' ' && bytes[i - 1] != b' ')
        .collect();
    breaks.push(end);
    breaks
}

fn skip_whitespace(text: &str, from: usize) -> usize {
    let rest = &text[from..];
    from + (rest.len() - rest.trim_start().len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Every character advances half the font size; visible ones draw a box
    /// reaching 70% of the size above the baseline.
    #[derive(Default)]
    struct BlockFont {
        calls: AtomicUsize,
    }

    impl FontMetrics for BlockFont {
        fn get_path(&self, text: &str, x: f64, y: f64, size: f64) -> GlyphPath {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let advance = size * 0.5;
            let mut commands = Vec::new();
            for (i, ch) in text.chars().enumerate() {
                if ch.is_whitespace() {
                    continue;
                }
                let left = x + i as f64 * advance;
                commands.push(DrawCommand::MoveTo { x: left, y });
                commands.push(DrawCommand::LineTo {
                    x: left + advance,
                    y,
                });
                commands.push(DrawCommand::LineTo {
                    x: left + advance,
                    y: y - size * 0.7,
                });
                commands.push(DrawCommand::LineTo {
                    x: left,
                    y: y - size * 0.7,
                });
                commands.push(DrawCommand::Close);
            }
            GlyphPath::from_commands(commands)
        }
    }

    // 10 units per character at size 20
    const SIZE: f64 = 20.0;

    #[test]
    fn test_empty_text() {
        let layout = layout_text(&BlockFont::default(), "", SIZE, 100.0, 3);

        assert_eq!(layout.lines, 0);
        assert!(layout.commands.is_empty());
        assert_eq!(layout.bounding_box, BoundingBox::default());
    }

    #[test]
    fn test_zero_max_lines() {
        let layout = layout_text(&BlockFont::default(), "hello", SIZE, 100.0, 0);
        assert_eq!(layout.lines, 0);
        assert!(layout.text_lines.is_empty());
    }

    #[test]
    fn test_fitting_text_is_one_untruncated_line() {
        let layout = layout_text(&BlockFont::default(), "hello world", SIZE, 200.0, 3);

        assert_eq!(layout.lines, 1);
        assert_eq!(layout.text_lines, vec!["hello world"]);
        assert_eq!(layout.bounding_box.width(), 110.0);
        assert!(!layout.is_truncated());
    }

    #[test]
    fn test_wraps_at_spaces_and_moves_baseline() {
        // "aaaa bbbb cccc" is 140 wide, 100 fits two words
        let layout = layout_text(&BlockFont::default(), "aaaa bbbb cccc", SIZE, 100.0, 3);

        assert_eq!(layout.text_lines, vec!["aaaa bbbb", "cccc"]);
        assert_eq!(layout.lines, 2);
        assert_eq!(layout.bounding_box.y1, -14.0);
        assert_eq!(layout.bounding_box.y2, LINE_HEIGHT);
    }

    #[test]
    fn test_truncates_last_line_with_ellipsis() {
        let layout = layout_text(&BlockFont::default(), "one two three four five", SIZE, 80.0, 2);

        assert_eq!(layout.lines, 2);
        assert_eq!(layout.text_lines, vec!["one two", "three..."]);
        assert!(layout.is_truncated());
    }

    #[test]
    fn test_no_ellipsis_when_last_line_consumes_everything() {
        let layout = layout_text(&BlockFont::default(), "one two three", SIZE, 80.0, 2);

        assert_eq!(layout.text_lines, vec!["one two", "three"]);
        assert!(!layout.is_truncated());
    }

    #[test]
    fn test_trailing_whitespace_does_not_add_lines_or_ellipsis() {
        let layout = layout_text(&BlockFont::default(), "one   ", SIZE, 80.0, 1);

        assert_eq!(layout.text_lines, vec!["one"]);
    }

    #[test]
    fn test_unbreakable_token_is_committed_as_is() {
        let layout = layout_text(&BlockFont::default(), "abcdefghijklmnop", SIZE, 50.0, 3);

        assert_eq!(layout.lines, 1);
        assert_eq!(layout.text_lines, vec!["abcdefghijklmnop"]);
        assert!(layout.bounding_box.width() > 50.0);
    }

    #[test]
    fn test_long_token_after_short_one() {
        let layout = layout_text(&BlockFont::default(), "hi abcdefghijkl", SIZE, 50.0, 3);

        assert_eq!(layout.text_lines, vec!["hi", "abcdefghijkl"]);
    }

    #[test]
    fn test_measurement_count_is_bounded() {
        let font = BlockFont::default();
        let text = "a ".repeat(1500);
        let layout = layout_text(&font, &text, SIZE, 5.0, usize::MAX);

        assert!(font.calls.load(Ordering::SeqCst) <= MAX_ITERATIONS + 1);
        assert!(layout.lines <= MAX_ITERATIONS);
    }

    #[test]
    fn test_long_text_costs_logarithmic_measurements_per_line() {
        let font = BlockFont::default();
        let text = "word ".repeat(2000);

        let layout = layout_text(&font, &text, SIZE, 100.0, 3);

        assert_eq!(layout.lines, 3);
        assert_eq!(layout.text_lines[0], "word word");
        assert_eq!(layout.text_lines[2], "word word...");
        assert!(font.calls.load(Ordering::SeqCst) < 30);
    }

    #[test]
    fn test_break_points_skip_repeated_and_trailing_spaces() {
        assert_eq!(break_points("ab  cd e  "), vec![2, 6, 8]);
        assert_eq!(break_points("single"), vec![6]);
    }

    proptest! {
        #[test]
        fn prop_never_exceeds_max_lines(
            words in prop::collection::vec("[a-z]{1,12}", 0..40),
            max_lines in 0usize..5,
            max_width in 20.0f64..400.0,
        ) {
            let text = words.join(" ");
            let layout = layout_text(&BlockFont::default(), &text, SIZE, max_width, max_lines);

            prop_assert!(layout.lines <= max_lines);
            prop_assert_eq!(layout.lines, layout.text_lines.len());
        }

        #[test]
        fn prop_overflowing_text_ends_with_ellipsis(
            words in prop::collection::vec("[a-z]{1,6}", 30..60),
        ) {
            // 30 words of at least one letter cannot fit in 3 lines of 100 units
            let text = words.join(" ");
            let layout = layout_text(&BlockFont::default(), &text, SIZE, 100.0, 3);

            prop_assert_eq!(layout.lines, 3);
            prop_assert!(layout.is_truncated());
        }

        #[test]
        fn prop_box_contains_origin(text in "[a-z ]{0,80}") {
            let layout = layout_text(&BlockFont::default(), &text, SIZE, 120.0, 3);
            prop_assert!(layout.bounding_box.x1 <= 0.0 && layout.bounding_box.y1 <= 0.0);
            prop_assert!(layout.bounding_box.x2 >= 0.0 && layout.bounding_box.y2 >= 0.0);
        }
    }
}
