//! The fixed catalog of selectable aspect-ratio constraints.

/// Aspect-ratio constraint applied to the crop selection.
///
/// `Free` never constrains. `Original` locks to the loaded image's own
/// width/height quotient, resolved when the constraint is applied — not when
/// it is selected, since no image may be loaded yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RatioChoice {
    Free,
    #[default]
    Original,
    /// 9:16
    Story,
    /// 1:1
    Square,
    /// 16:9
    Landscape,
    /// 2:1
    Wide,
    /// 2:3
    Portrait,
}

impl RatioChoice {
    pub const ALL: [RatioChoice; 7] = [
        RatioChoice::Free,
        RatioChoice::Original,
        RatioChoice::Story,
        RatioChoice::Square,
        RatioChoice::Landscape,
        RatioChoice::Wide,
        RatioChoice::Portrait,
    ];

    /// Width/height quotient this choice locks the selection to, or `None`
    /// for a free-form selection.
    pub fn resolve(self, natural: Option<(u32, u32)>) -> Option<f32> {
        match self {
            RatioChoice::Free => None,
            RatioChoice::Original => {
                natural.filter(|&(_, h)| h > 0).map(|(w, h)| w as f32 / h as f32)
            }
            RatioChoice::Story => Some(9.0 / 16.0),
            RatioChoice::Square => Some(1.0),
            RatioChoice::Landscape => Some(16.0 / 9.0),
            RatioChoice::Wide => Some(2.0),
            RatioChoice::Portrait => Some(2.0 / 3.0),
        }
    }
}

impl std::fmt::Display for RatioChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RatioChoice::Free => "Free",
            RatioChoice::Original => "Original",
            RatioChoice::Story => "Story (9:16)",
            RatioChoice::Square => "Square (1:1)",
            RatioChoice::Landscape => "Landscape (16:9)",
            RatioChoice::Wide => "Wide (2:1)",
            RatioChoice::Portrait => "Portrait (2:3)",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_entry_resolves_to_none_or_positive_finite() {
        for choice in RatioChoice::ALL {
            if let Some(ratio) = choice.resolve(Some((1600, 900))) {
                assert!(ratio.is_finite() && ratio > 0.0, "{choice} resolved to {ratio}");
            }
        }
    }

    #[test]
    fn original_resolves_against_the_image_at_hand() {
        assert_eq!(RatioChoice::Original.resolve(Some((2000, 1000))), Some(2.0));
        // No image loaded yet: no constraint.
        assert_eq!(RatioChoice::Original.resolve(None), None);
    }

    #[test]
    fn free_never_constrains() {
        assert_eq!(RatioChoice::Free.resolve(Some((800, 600))), None);
        assert_eq!(RatioChoice::Free.resolve(None), None);
    }

    #[test]
    fn fixed_entries_ignore_the_image() {
        assert_eq!(RatioChoice::Wide.resolve(None), Some(2.0));
        assert_eq!(
            RatioChoice::Story.resolve(Some((123, 456))),
            Some(9.0 / 16.0)
        );
    }
}
