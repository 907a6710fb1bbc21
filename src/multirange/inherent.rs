use std::marker::PhantomData;

use super::canonical::{canonicalize, is_canonical};
use super::iter::Iter;
use super::packed;
use super::Multirange;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::TypeTag;

impl<R: Interval> Multirange<R> {
    /// Creates the empty multirange of type `tag`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{IntRange, Multirange};
    ///
    /// let mr = Multirange::<IntRange>::empty(IntRange::MULTIRANGE_TYPE);
    /// assert!(mr.is_empty());
    /// assert_eq!(mr.type_tag(), IntRange::MULTIRANGE_TYPE);
    /// ```
    pub fn empty(tag: TypeTag) -> Multirange<R> {
        packed::build_empty(tag)
    }

    /// Builds a multirange of type `tag` from an arbitrary list of intervals.
    ///
    /// This is the single construction path: the list is sorted, empty
    /// intervals are dropped and overlapping or adjacent intervals are merged
    /// before the value is packed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{IntRange, Multirange};
    ///
    /// let mr = Multirange::from_intervals(
    ///     IntRange::MULTIRANGE_TYPE,
    ///     vec![IntRange::new(1, 3), IntRange::new(2, 4), IntRange::new(8, 9)],
    /// )
    /// .unwrap();
    /// assert_eq!(mr.deserialize().unwrap(), vec![IntRange::new(1, 4), IntRange::new(8, 9)]);
    /// ```
    pub fn from_intervals<I>(tag: TypeTag, ranges: I) -> Result<Multirange<R>>
    where
        I: IntoIterator<Item = R>,
    {
        let mut ranges: Vec<R> = ranges.into_iter().collect();
        canonicalize(&mut ranges);
        packed::build(tag, &ranges)
    }

    /// Builds a multirange holding a single interval, or the empty
    /// multirange if `range` is empty.
    pub fn from_interval(tag: TypeTag, range: R) -> Result<Multirange<R>> {
        Multirange::from_intervals(tag, [range])
    }

    /// Builds a multirange from an array value, as the variadic constructor does.
    ///
    /// The array must be flat and must not contain nulls; a zero-length array
    /// gives the empty multirange.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{Error, IntRange, IntervalArray, Multirange};
    ///
    /// let array = IntervalArray::from(vec![Some(IntRange::new(1, 2)), None]);
    /// let err = Multirange::from_array(IntRange::MULTIRANGE_TYPE, array).unwrap_err();
    /// assert!(matches!(err, Error::NullElement));
    /// ```
    pub fn from_array(tag: TypeTag, array: IntervalArray<R>) -> Result<Multirange<R>> {
        if array.ndim() > 1 {
            return Err(Error::MultiDimensional { ndim: array.ndim() });
        }
        let ranges =
            array.elements.into_iter().map(|r| r.ok_or(Error::NullElement)).collect::<Result<Vec<_>>>()?;
        Multirange::from_intervals(tag, ranges)
    }

    /// Adopts a packed value produced by [`Multirange::as_bytes`].
    ///
    /// The buffer is fully validated: its layout is walked with bounds checks,
    /// every interval is decoded and the sequence must be canonical.
    pub fn from_packed(bytes: impl Into<Box<[u8]>>) -> Result<Multirange<R>> {
        let data = bytes.into();
        let (_, offsets) = packed::walk(&data)?;
        let mr = Multirange { data, offsets: offsets.into_boxed_slice(), _interval: PhantomData };
        if !is_canonical(&mr.deserialize()?) {
            return Err(Error::CorruptValue("intervals are not in canonical form".into()));
        }
        Ok(mr)
    }
}

impl<R> Multirange<R> {
    /// The packed value, suitable for [`Multirange::from_packed`].
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Box<[u8]> {
        self.data
    }

    /// The tag of the multirange type this value belongs to.
    pub fn type_tag(&self) -> TypeTag {
        packed::type_tag(&self.data)
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.offsets.len()
    }

    /// Returns `true` for the empty multirange.
    pub fn is_empty(&self) -> bool {
        self.offsets.is_empty()
    }

    pub(crate) fn payload(&self, index: usize) -> &[u8] {
        packed::payload(&self.data, self.offsets[index])
    }
}

impl<R: Interval> Multirange<R> {
    /// Decodes the interval at `index`, or `None` if out of bounds.
    pub fn get(&self, index: usize) -> Option<Result<R>> {
        (index < self.len()).then(|| R::read_packed(self.payload(index)))
    }

    pub fn first(&self) -> Option<Result<R>> {
        self.get(0)
    }

    pub fn last(&self) -> Option<Result<R>> {
        self.len().checked_sub(1).and_then(|i| self.get(i))
    }

    /// Iterator over the stored intervals, in canonical order.
    pub fn iter(&self) -> Iter<'_, R> {
        Iter::new(self)
    }

    /// Decodes every interval, in canonical order.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{IntRange, Multirange};
    ///
    /// let mr = Multirange::from_interval(IntRange::MULTIRANGE_TYPE, IntRange::new(1, 2)).unwrap();
    /// assert_eq!(mr.deserialize().unwrap(), vec![IntRange::new(1, 2)]);
    /// ```
    pub fn deserialize(&self) -> Result<Vec<R>> {
        self.iter().collect()
    }
}

/// An array argument for [`Multirange::from_array`]: its dimensions and its
/// possibly-null elements in row-major order.
#[derive(Debug, Clone)]
pub struct IntervalArray<R> {
    dims: Vec<usize>,
    elements: Vec<Option<R>>,
}

impl<R> IntervalArray<R> {
    /// # Panics
    ///
    /// If the product of `dims` does not match the number of elements.
    pub fn new(dims: Vec<usize>, elements: Vec<Option<R>>) -> IntervalArray<R> {
        let expected: usize = if dims.is_empty() { 0 } else { dims.iter().product() };
        assert_eq!(expected, elements.len(), "array dimensions do not match element count");
        IntervalArray { dims, elements }
    }

    /// Number of dimensions. A zero-length array has none.
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    pub fn dims(&self) -> &[usize] {
        &self.dims
    }
}

impl<R> From<Vec<Option<R>>> for IntervalArray<R> {
    fn from(elements: Vec<Option<R>>) -> IntervalArray<R> {
        let dims = if elements.is_empty() { Vec::new() } else { vec![elements.len()] };
        IntervalArray { dims, elements }
    }
}

impl<R> FromIterator<R> for IntervalArray<R> {
    fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> IntervalArray<R> {
        IntervalArray::from(iter.into_iter().map(Some).collect::<Vec<_>>())
    }
}
