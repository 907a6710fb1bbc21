use std::fmt;

use super::Multirange;
use crate::interval::Interval;

impl<R: Interval> fmt::Debug for Multirange<R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.deserialize() {
            Ok(ranges) if ranges.len() < 16 => {
                write!(f, "Multirange<{} {:?}>", self.type_tag(), ranges)
            }
            _ => write!(
                f,
                "Multirange<{} {:?} intervals in {:?} bytes>",
                self.type_tag(),
                self.len(),
                self.as_bytes().len()
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use crate::{IntRange, Multirange};

    #[test]
    fn short_multiranges_list_their_intervals() {
        let mr = Multirange::from_interval(IntRange::MULTIRANGE_TYPE, IntRange::new(1, 2)).unwrap();
        assert_eq!(
            format!("{mr:?}"),
            "Multirange<4451 [Span { lower: Some(1), upper: Some(2) }]>"
        );
    }

    #[test]
    fn long_multiranges_are_summarized() {
        let mr = Multirange::from_intervals(
            IntRange::MULTIRANGE_TYPE,
            (0..20).map(|i| IntRange::new(i * 2, i * 2 + 1)),
        )
        .unwrap();
        let debug = format!("{mr:?}");
        assert!(debug.starts_with("Multirange<4451 20 intervals in "), "{debug}");
    }
}
