/// Generator of numbers series.
use crate::pattern::PatternValueType;

/// Generator (iterator) state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub(crate) struct SeriesWithStep {
    end: PatternValueType,
    step: PatternValueType,
    next: Option<PatternValueType>,
}

impl SeriesWithStep {
    /// Produces `start, start + step, ...` up to `end` inclusively.
    ///
    /// Panics if `step` is zero.
    #[inline]
    pub(crate) fn new(start: PatternValueType, end: PatternValueType, step: PatternValueType) -> Self {
        if step == 0 {
            panic!("step value is 0");
        }

        Self {
            end,
            step,
            next: Some(start),
        }
    }
}

impl Iterator for SeriesWithStep {
    type Item = PatternValueType;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|v| *v <= self.end)?;
        // overflow ends the series
        self.next = current.checked_add(self.step);
        Some(current)
    }
}
