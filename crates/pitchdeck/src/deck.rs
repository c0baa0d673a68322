use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeckError {
    #[error("invalid deck configuration: {0}")]
    InvalidConfiguration(String),

    #[error("slide index {index} is out of range (deck has {count} slides)")]
    IndexOutOfRange { index: usize, count: usize },
}

/// One presentation panel. `background` and `content` are opaque to the deck.
#[derive(Debug, Clone)]
pub struct SlideDescriptor<C> {
    pub title: String,
    pub background: String,
    pub content: C,
}

impl<C> SlideDescriptor<C> {
    pub fn new(title: impl Into<String>, background: impl Into<String>, content: C) -> Self {
        Self {
            title: title.into(),
            background: background.into(),
            content,
        }
    }
}

/// Wrap-around navigation over a fixed, non-empty sequence of slides.
///
/// The slide list is fixed at construction. `current_index` is always a valid
/// position, so `current()` never fails.
#[derive(Debug)]
pub struct SlideDeck<C> {
    slides: Vec<SlideDescriptor<C>>,
    current: usize,
}

impl<C> SlideDeck<C> {
    pub fn new(slides: Vec<SlideDescriptor<C>>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::InvalidConfiguration(
                "a deck needs at least one slide".to_string(),
            ));
        }
        if let Some(pos) = slides.iter().position(|s| s.title.trim().is_empty()) {
            return Err(DeckError::InvalidConfiguration(format!(
                "slide {} has an empty title",
                pos + 1
            )));
        }
        log::debug!("deck created with {} slides", slides.len());
        Ok(Self { slides, current: 0 })
    }

    pub fn next(&mut self) {
        self.current = (self.current + 1) % self.slides.len();
        log::debug!("next -> slide {}", self.current);
    }

    pub fn previous(&mut self) {
        let count = self.slides.len();
        self.current = (self.current + count - 1) % count;
        log::debug!("previous -> slide {}", self.current);
    }

    /// Jump to `index`. Out-of-range indices leave the deck untouched.
    pub fn go_to(&mut self, index: usize) -> Result<(), DeckError> {
        if index >= self.slides.len() {
            return Err(DeckError::IndexOutOfRange {
                index,
                count: self.slides.len(),
            });
        }
        self.current = index;
        log::debug!("go_to -> slide {}", self.current);
        Ok(())
    }

    pub fn current(&self) -> &SlideDescriptor<C> {
        &self.slides[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[SlideDescriptor<C>] {
        &self.slides
    }

    /// Progress label shown in the navigation bar, e.g. `3 / 18`.
    pub fn position_label(&self) -> String {
        format!("{} / {}", self.current + 1, self.slides.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn deck_of(n: usize) -> SlideDeck<usize> {
        let slides = (0..n)
            .map(|i| SlideDescriptor::new(format!("Slide {}", i + 1), "bg-plain", i))
            .collect();
        SlideDeck::new(slides).unwrap()
    }

    #[test]
    fn test_empty_deck_is_rejected() {
        let result = SlideDeck::<()>::new(Vec::new());
        assert!(matches!(result, Err(DeckError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let slides = vec![
            SlideDescriptor::new("Intro", "bg", ()),
            SlideDescriptor::new("   ", "bg", ()),
        ];
        let err = SlideDeck::new(slides).unwrap_err();
        assert_eq!(
            err,
            DeckError::InvalidConfiguration("slide 2 has an empty title".to_string())
        );
    }

    #[test]
    fn test_starts_on_first_slide() {
        let deck = deck_of(4);
        assert_eq!(deck.current_index(), 0);
        assert_eq!(deck.current().title, "Slide 1");
        assert_eq!(deck.count(), 4);
    }

    #[test]
    fn test_three_slide_scenario() {
        let mut deck = deck_of(3);
        deck.next();
        deck.next();
        deck.next();
        assert_eq!(deck.current_index(), 0);

        deck.previous();
        assert_eq!(deck.current_index(), 2);
    }

    #[test]
    fn test_single_slide_deck_stays_put() {
        let mut deck = deck_of(1);
        deck.next();
        assert_eq!(deck.current_index(), 0);
        deck.previous();
        assert_eq!(deck.current_index(), 0);
    }

    #[test]
    fn test_go_to_in_range() {
        let mut deck = deck_of(5);
        deck.go_to(3).unwrap();
        assert_eq!(deck.current_index(), 3);
        assert_eq!(deck.current().content, 3);
    }

    #[test]
    fn test_go_to_out_of_range_keeps_state() {
        let mut deck = deck_of(5);
        deck.go_to(2).unwrap();
        let err = deck.go_to(5).unwrap_err();
        assert_eq!(err, DeckError::IndexOutOfRange { index: 5, count: 5 });
        assert_eq!(deck.current_index(), 2);
    }

    #[test]
    fn test_position_label() {
        let mut deck = deck_of(18);
        deck.go_to(2).unwrap();
        assert_eq!(deck.position_label(), "3 / 18");
    }

    proptest! {
        #[test]
        fn index_stays_in_range(n in 1usize..40, moves in proptest::collection::vec(any::<bool>(), 0..200)) {
            let mut deck = deck_of(n);
            for forward in moves {
                if forward { deck.next() } else { deck.previous() }
                prop_assert!(deck.current_index() < n);
            }
        }

        #[test]
        fn full_cycle_returns_to_start(n in 1usize..40, start in 0usize..40) {
            let mut deck = deck_of(n);
            let start = start % n;
            deck.go_to(start).unwrap();
            for _ in 0..n {
                deck.next();
            }
            prop_assert_eq!(deck.current_index(), start);
        }

        #[test]
        fn previous_inverts_next(n in 1usize..40, start in 0usize..40) {
            let mut deck = deck_of(n);
            let start = start % n;
            deck.go_to(start).unwrap();

            deck.next();
            deck.previous();
            prop_assert_eq!(deck.current_index(), start);

            deck.previous();
            deck.next();
            prop_assert_eq!(deck.current_index(), start);
        }

        #[test]
        fn go_to_matches_bounds(n in 1usize..40, target in 0usize..80) {
            let mut deck = deck_of(n);
            let before = deck.current_index();
            match deck.go_to(target) {
                Ok(()) => {
                    prop_assert!(target < n);
                    prop_assert_eq!(deck.current().content, target);
                }
                Err(err) => {
                    prop_assert!(target >= n);
                    prop_assert_eq!(err, DeckError::IndexOutOfRange { index: target, count: n });
                    prop_assert_eq!(deck.current_index(), before);
                }
            }
        }
    }
}
