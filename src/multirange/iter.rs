use std::iter::FusedIterator;

use super::Multirange;
use crate::error::Result;
use crate::interval::Interval;

/// An iterator over the intervals of a [`Multirange`], decoding each one
/// from the packed value.
pub struct Iter<'a, R> {
    multirange: &'a Multirange<R>,
    front: usize,
    back: usize,
}

impl<'a, R: Interval> Iter<'a, R> {
    pub(super) fn new(multirange: &'a Multirange<R>) -> Iter<'a, R> {
        Iter { multirange, front: 0, back: multirange.len() }
    }
}

impl<R: Interval> Iterator for Iter<'_, R> {
    type Item = Result<R>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        let item = R::read_packed(self.multirange.payload(self.front));
        self.front += 1;
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.back - self.front;
        (len, Some(len))
    }
}

impl<R: Interval> DoubleEndedIterator for Iter<'_, R> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front == self.back {
            return None;
        }
        self.back -= 1;
        Some(R::read_packed(self.multirange.payload(self.back)))
    }
}

impl<R: Interval> ExactSizeIterator for Iter<'_, R> {}

impl<R: Interval> FusedIterator for Iter<'_, R> {}

impl<'a, R: Interval> IntoIterator for &'a Multirange<R> {
    type Item = Result<R>;
    type IntoIter = Iter<'a, R>;

    fn into_iter(self) -> Iter<'a, R> {
        self.iter()
    }
}

#[cfg(test)]
mod test {
    use crate::{IntRange, Multirange};

    #[test]
    fn iterates_both_ways() {
        let mr = Multirange::from_intervals(
            IntRange::MULTIRANGE_TYPE,
            vec![IntRange::new(7, 9), IntRange::new(1, 2), IntRange::new(4, 5)],
        )
        .unwrap();

        let mut iter = mr.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.next().unwrap().unwrap(), IntRange::new(1, 2));
        assert_eq!(iter.next_back().unwrap().unwrap(), IntRange::new(7, 9));
        assert_eq!(iter.len(), 1);
        assert_eq!(iter.next().unwrap().unwrap(), IntRange::new(4, 5));
        assert!(iter.next().is_none());
        assert!(iter.next_back().is_none());

        let collected: Vec<IntRange> = (&mr).into_iter().rev().map(Result::unwrap).collect();
        assert_eq!(collected, vec![IntRange::new(7, 9), IntRange::new(4, 5), IntRange::new(1, 2)]);
    }
}
