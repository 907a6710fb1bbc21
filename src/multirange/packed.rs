//! The packed multirange layout.
//!
//! ```text
//! +-----------+----------+-------------+---------+--------+---------+--------+-----
//! | total_len | type_tag | range_count | padding | slot 0 | padding | slot 1 | ...
//! |    u32    |   u32    |     u32     |         |        |         |        |
//! +-----------+----------+-------------+---------+--------+---------+--------+-----
//! ```
//!
//! Every slot starts at an offset that is a multiple of [`MAXIMUM_ALIGNOF`].
//! A slot is a `u32` holding the slot length (header included) followed by
//! the interval's packed form. Integers are stored in native byte order; the
//! packed value is an in-memory image, not a wire format.

use std::marker::PhantomData;
use std::mem;

use bytemuck::{Pod, Zeroable};

use super::Multirange;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::TypeTag;

/// Alignment every interval slot starts on.
pub const MAXIMUM_ALIGNOF: usize = 8;

const HEADER_BYTES: usize = mem::size_of::<Header>();
const SLOT_HEADER_BYTES: usize = mem::size_of::<u32>();

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct Header {
    total_len: u32,
    type_tag: u32,
    range_count: u32,
}

/// Rounds `len` up to the next multiple of [`MAXIMUM_ALIGNOF`].
#[inline]
pub(crate) const fn max_align(len: usize) -> usize {
    (len + MAXIMUM_ALIGNOF - 1) & !(MAXIMUM_ALIGNOF - 1)
}

/// Serializes an already canonical interval list.
///
/// `packed_size` only sizes the allocation; the header and slot lengths
/// record the bytes `write_packed` actually produced.
pub(crate) fn build<R: Interval>(tag: TypeTag, ranges: &[R]) -> Result<Multirange<R>> {
    let estimate: usize = max_align(HEADER_BYTES)
        + ranges.iter().map(|r| max_align(SLOT_HEADER_BYTES + r.packed_size())).sum::<usize>();
    let range_count = u32::try_from(ranges.len())
        .map_err(|_| Error::CorruptValue("too many intervals".into()))?;

    let mut data = Vec::with_capacity(estimate);
    data.resize(max_align(HEADER_BYTES), 0);

    let mut offsets = Vec::with_capacity(ranges.len());
    for range in ranges {
        let start = data.len();
        offsets.push(start);
        data.extend_from_slice(&[0; SLOT_HEADER_BYTES]);
        range.write_packed(&mut data);
        let slot_len = u32::try_from(data.len() - start)
            .map_err(|_| Error::CorruptValue("interval too large".into()))?;
        data[start..start + SLOT_HEADER_BYTES].copy_from_slice(bytemuck::bytes_of(&slot_len));
        data.resize(max_align(data.len()), 0);
    }

    let total_len = u32::try_from(data.len())
        .map_err(|_| Error::CorruptValue(format!("multirange too large: {} bytes", data.len())))?;
    let header = Header { total_len, type_tag: tag.0, range_count };
    data[..HEADER_BYTES].copy_from_slice(bytemuck::bytes_of(&header));

    Ok(Multirange {
        data: data.into_boxed_slice(),
        offsets: offsets.into_boxed_slice(),
        _interval: PhantomData,
    })
}

/// The header-only value with no intervals.
pub(crate) fn build_empty<R>(tag: TypeTag) -> Multirange<R> {
    let header =
        Header { total_len: max_align(HEADER_BYTES) as u32, type_tag: tag.0, range_count: 0 };
    let mut data = bytemuck::bytes_of(&header).to_vec();
    data.resize(max_align(HEADER_BYTES), 0);
    Multirange { data: data.into_boxed_slice(), offsets: Box::new([]), _interval: PhantomData }
}

/// Walks a packed buffer and returns the start offset of every slot.
///
/// Every step is bounds-checked against the buffer: the embedded count is
/// not trusted to match the data.
pub(crate) fn walk(data: &[u8]) -> Result<(TypeTag, Vec<usize>)> {
    if data.len() < HEADER_BYTES {
        return Err(corrupt(format!("{} bytes is shorter than the header", data.len())));
    }
    let header: Header = bytemuck::pod_read_unaligned(&data[..HEADER_BYTES]);
    if header.total_len as usize != data.len() {
        return Err(corrupt(format!(
            "declared length {} does not match buffer length {}",
            header.total_len,
            data.len()
        )));
    }

    let count = header.range_count as usize;
    let mut offsets = Vec::with_capacity(count.min(data.len() / MAXIMUM_ALIGNOF));
    let mut offset = max_align(HEADER_BYTES);
    for i in 0..count {
        let slot_len = match data.get(offset..offset + SLOT_HEADER_BYTES) {
            Some(bytes) => bytemuck::pod_read_unaligned::<u32>(bytes) as usize,
            None => return Err(corrupt(format!("interval {i} starts past the end"))),
        };
        if slot_len < SLOT_HEADER_BYTES || slot_len > data.len() - offset {
            return Err(corrupt(format!("interval {i} has invalid length {slot_len}")));
        }
        offsets.push(offset);
        offset += max_align(slot_len);
    }
    if offset != data.len() {
        return Err(corrupt(format!("{} unused bytes after the last interval", data.len() - offset)));
    }

    tracing::trace!(count, len = data.len(), "walked packed multirange");
    Ok((TypeTag(header.type_tag), offsets))
}

/// The packed form of the interval in the slot starting at `offset`.
pub(crate) fn payload(data: &[u8], offset: usize) -> &[u8] {
    let slot_len = bytemuck::pod_read_unaligned::<u32>(&data[offset..offset + SLOT_HEADER_BYTES]);
    &data[offset + SLOT_HEADER_BYTES..offset + slot_len as usize]
}

pub(crate) fn type_tag(data: &[u8]) -> TypeTag {
    let header: Header = bytemuck::pod_read_unaligned(&data[..HEADER_BYTES]);
    TypeTag(header.type_tag)
}

fn corrupt(detail: String) -> Error {
    tracing::debug!(%detail, "rejected packed multirange");
    Error::CorruptValue(detail)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::IntRange;

    fn packed(ranges: &[IntRange]) -> Vec<u8> {
        build(IntRange::MULTIRANGE_TYPE, ranges).unwrap().as_bytes().to_vec()
    }

    #[test]
    fn empty_multirange_is_just_the_header() {
        let data = packed(&[]);
        assert_eq!(&data[..], build_empty::<IntRange>(IntRange::MULTIRANGE_TYPE).as_bytes());
        assert_eq!(data.len(), max_align(HEADER_BYTES));
        let (tag, offsets) = walk(&data).unwrap();
        assert_eq!(tag, IntRange::MULTIRANGE_TYPE);
        assert!(offsets.is_empty());
    }

    #[test]
    fn slots_are_aligned_and_variable_length() {
        let ranges =
            [IntRange::bounded(None, Some(-5)), IntRange::new(1, 2), IntRange::bounded(Some(9), None)];
        let data = packed(&ranges);
        let (_, offsets) = walk(&data).unwrap();
        assert_eq!(offsets.len(), 3);
        for (&offset, range) in offsets.iter().zip(&ranges) {
            assert_eq!(offset % MAXIMUM_ALIGNOF, 0);
            assert_eq!(payload(&data, offset).len(), range.packed_size());
            assert_eq!(&IntRange::read_packed(payload(&data, offset)).unwrap(), range);
        }
        // header 16, [1 + 4 + slot header] -> 16, [1 + 8 + 4] -> 16, [1 + 4 + 4] -> 16
        assert_eq!(data.len(), 64);
    }

    /// Packs like `IntRange` but reports a size that is too small.
    #[derive(Debug, Clone)]
    struct Undersized(IntRange);

    impl Interval for Undersized {
        fn is_empty(&self) -> bool {
            self.0.is_empty()
        }

        fn cmp_bounds(&self, other: &Self) -> std::cmp::Ordering {
            self.0.cmp_bounds(&other.0)
        }

        fn overlaps(&self, other: &Self) -> bool {
            self.0.overlaps(&other.0)
        }

        fn adjacent(&self, other: &Self) -> bool {
            self.0.adjacent(&other.0)
        }

        fn union(&self, other: &Self) -> Self {
            Undersized(self.0.union(&other.0))
        }

        fn hash32(&self) -> u32 {
            self.0.hash32()
        }

        fn hash64(&self, seed: u64) -> u64 {
            self.0.hash64(seed)
        }

        fn packed_size(&self) -> usize {
            0
        }

        fn write_packed(&self, out: &mut Vec<u8>) {
            self.0.write_packed(out)
        }

        fn read_packed(bytes: &[u8]) -> Result<Self> {
            IntRange::read_packed(bytes).map(Undersized)
        }
    }

    #[test]
    fn header_length_follows_written_bytes() {
        let ranges = [
            Undersized(IntRange::new(1, 2)),
            Undersized(IntRange::new(5, 6)),
            Undersized(IntRange::new(9, 10)),
        ];
        let mr = build(IntRange::MULTIRANGE_TYPE, &ranges).unwrap();
        let data = mr.as_bytes();
        let header: Header = bytemuck::pod_read_unaligned(&data[..HEADER_BYTES]);
        assert_eq!(header.total_len as usize, data.len());
        assert_eq!(data.len(), 64);

        let back = Multirange::<Undersized>::from_packed(data.to_vec()).unwrap();
        assert_eq!(back.len(), 3);
        assert_eq!(back.last().unwrap().unwrap().0, IntRange::new(9, 10));
    }

    #[test]
    fn walk_rejects_inflated_count() {
        let mut data = packed(&[IntRange::new(1, 2)]);
        data[8..12].copy_from_slice(bytemuck::bytes_of(&2u32));
        assert!(matches!(walk(&data), Err(Error::CorruptValue(_))));
    }

    #[test]
    fn walk_rejects_bad_lengths() {
        let data = packed(&[IntRange::new(1, 2)]);
        assert!(walk(&data[..data.len() - 8]).is_err());
        assert!(walk(&data[..4]).is_err());

        let mut oversized = data.clone();
        let slot = max_align(HEADER_BYTES);
        oversized[slot..slot + 4].copy_from_slice(bytemuck::bytes_of(&4096u32));
        assert!(walk(&oversized).is_err());

        let mut undersized = data;
        undersized[slot..slot + 4].copy_from_slice(bytemuck::bytes_of(&2u32));
        assert!(walk(&undersized).is_err());
    }
}
