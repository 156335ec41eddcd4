/// Multi-level heading counters for one conversion run
#[derive(Debug, Clone, Default)]
pub struct HeadingCounters {
    counters: [u32; HeadingCounters::LEVELS],
}

impl HeadingCounters {
    pub const LEVELS: usize = 9;

    pub fn new() -> Self {
        Self::default()
    }

    /// Count a heading at `level` and return its number ("1.2.3")
    ///
    /// Deeper counters reset on every call. Skipped levels keep their zero,
    /// so a level-3 heading right under a level-1 heading reads "1.0.1".
    pub fn next(&mut self, level: u8) -> String {
        let level_index = (level.max(1) as usize - 1).min(Self::LEVELS - 1);

        self.counters[level_index] += 1;
        for counter in &mut self.counters[level_index + 1..] {
            *counter = 0;
        }

        self.counters[..=level_index]
            .iter()
            .map(|counter| counter.to_string())
            .collect::<Vec<_>>()
            .join(".")
    }

    pub fn current(&self, level: u8) -> u32 {
        let level_index = (level.max(1) as usize - 1).min(Self::LEVELS - 1);
        self.counters[level_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence() {
        let mut counters = HeadingCounters::new();
        let numbers: Vec<String> = [1, 2, 2, 1, 2, 3, 3, 2]
            .into_iter()
            .map(|level| counters.next(level))
            .collect();

        assert_eq!(
            numbers,
            vec!["1", "1.1", "1.2", "2", "2.1", "2.1.1", "2.1.2", "2.2"]
        );
    }

    #[test]
    fn test_deeper_levels_reset() {
        let mut counters = HeadingCounters::new();
        counters.next(1);
        counters.next(2);
        counters.next(3);
        counters.next(1);
        assert_eq!(counters.current(2), 0);
        assert_eq!(counters.current(3), 0);
        assert_eq!(counters.next(3), "2.0.1");
    }

    #[test]
    fn test_levels_are_clamped() {
        let mut counters = HeadingCounters::new();
        assert_eq!(counters.next(0), "1");
        assert_eq!(counters.next(12), "1.0.0.0.0.0.0.0.1");
    }

    #[test]
    fn test_numbers_follow_document_order() {
        let mut counters = HeadingCounters::new();
        let levels = [1, 3, 2, 2, 4, 1, 1, 2, 5];
        let mut previous: Option<Vec<u32>> = None;

        for level in levels {
            let parts: Vec<u32> = counters
                .next(level)
                .split('.')
                .map(|part| part.parse().unwrap())
                .collect();
            if let Some(prev) = &previous {
                assert!(parts > *prev, "{parts:?} should sort after {prev:?}");
            }
            previous = Some(parts);
        }
    }
}
