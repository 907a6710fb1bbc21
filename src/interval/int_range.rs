use std::cmp::Ordering;
use std::fmt;

use byteorder::{BigEndian, NativeEndian, ReadBytesExt};

use super::Interval;
use crate::catalog::{RangeIoFunctions, RangeTypeEntry, TypeRegistry};
use crate::depth::Depth;
use crate::error::{Error, Result};
use crate::TypeTag;

const RANGE_EMPTY: u8 = 0x01;
const RANGE_LB_INC: u8 = 0x02;
const RANGE_UB_INC: u8 = 0x04;
const RANGE_LB_INF: u8 = 0x08;
const RANGE_UB_INF: u8 = 0x10;

/// Keyword for the empty interval in text form.
const EMPTY_LITERAL: &str = "empty";

/// A discrete interval of `i32` values, always kept in the canonical
/// half-open `[lower, upper)` form. A missing bound is infinite.
///
/// # Examples
///
/// ```rust
/// use multirange::{IntRange, Interval};
///
/// let r = IntRange::parse("(1,5]").unwrap();
/// assert_eq!(r, IntRange::new(2, 6));
/// assert_eq!(r.to_string(), "[2,6)");
/// assert!(IntRange::new(3, 3).is_empty());
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum IntRange {
    Empty,
    Span { lower: Option<i32>, upper: Option<i32> },
}

impl IntRange {
    /// The interval type's tag in [`IntRange::catalog`].
    pub const RANGE_TYPE: TypeTag = TypeTag(3904);
    /// The tag of the multirange type built over [`IntRange`].
    pub const MULTIRANGE_TYPE: TypeTag = TypeTag(4451);

    /// `[lower, upper)`, or the empty interval when `lower >= upper`.
    pub fn new(lower: i32, upper: i32) -> IntRange {
        IntRange::bounded(Some(lower), Some(upper))
    }

    /// `[lower, upper)` where `None` is an infinite bound.
    pub fn bounded(lower: Option<i32>, upper: Option<i32>) -> IntRange {
        match (lower, upper) {
            (Some(l), Some(u)) if l >= u => IntRange::Empty,
            _ => IntRange::Span { lower, upper },
        }
    }

    pub fn empty() -> IntRange {
        IntRange::Empty
    }

    pub fn lower(&self) -> Option<i32> {
        match self {
            IntRange::Span { lower, .. } => *lower,
            IntRange::Empty => None,
        }
    }

    pub fn upper(&self) -> Option<i32> {
        match self {
            IntRange::Span { upper, .. } => *upper,
            IntRange::Empty => None,
        }
    }

    pub fn contains(&self, value: i32) -> bool {
        match *self {
            IntRange::Empty => false,
            IntRange::Span { lower, upper } => {
                lower.map_or(true, |l| l <= value) && upper.map_or(true, |u| value < u)
            }
        }
    }

    /// Builds an interval from possibly inclusive/exclusive bounds and
    /// canonicalizes it to `[lower, upper)`.
    fn from_bounds(
        lower: Option<i32>,
        lower_inc: bool,
        upper: Option<i32>,
        upper_inc: bool,
    ) -> Result<IntRange> {
        if let (Some(l), Some(u)) = (lower, upper) {
            if l > u {
                return Err(Error::InvalidInterval(
                    "range lower bound must be less than or equal to range upper bound".into(),
                ));
            }
        }
        let lower = match lower {
            Some(l) if !lower_inc => Some(l.checked_add(1).ok_or_else(out_of_range)?),
            other => other,
        };
        let upper = match upper {
            Some(u) if upper_inc => Some(u.checked_add(1).ok_or_else(out_of_range)?),
            other => other,
        };
        Ok(IntRange::bounded(lower, upper))
    }

    /// Parses `empty` or a bracketed literal such as `[1,3)`, `(,5]` or `["1", 4)`.
    pub fn parse(input: &str) -> Result<IntRange> {
        let text = input.trim();
        if text.eq_ignore_ascii_case(EMPTY_LITERAL) {
            return Ok(IntRange::Empty);
        }
        let lower_inc = match text.as_bytes().first() {
            Some(b'[') => true,
            Some(b'(') => false,
            _ => return Err(malformed(input, "Missing left parenthesis or bracket.")),
        };
        let upper_inc = match text.as_bytes().last() {
            Some(b']') if text.len() > 1 => true,
            Some(b')') if text.len() > 1 => false,
            _ => return Err(malformed(input, "Missing right parenthesis or bracket.")),
        };
        let inner = &text[1..text.len() - 1];
        let (lower, upper) = inner
            .split_once(',')
            .ok_or_else(|| malformed(input, "Missing comma after lower bound."))?;
        if upper.contains(',') {
            return Err(malformed(input, "Too many commas."));
        }
        let lower = parse_bound(input, lower)?;
        let upper = parse_bound(input, upper)?;
        IntRange::from_bounds(lower, lower_inc, upper, upper_inc)
    }

    /// Encodes the interval in its binary wire form: a flags byte followed by
    /// each finite bound as a length-prefixed big-endian integer.
    pub fn send(&self) -> Vec<u8> {
        let flags = self.flags();
        let mut out = vec![flags];
        for bound in [self.lower(), self.upper()].into_iter().flatten() {
            out.extend_from_slice(&4u32.to_be_bytes());
            out.extend_from_slice(&bound.to_be_bytes());
        }
        out
    }

    /// Decodes the binary wire form written by [`IntRange::send`].
    pub fn receive(mut bytes: &[u8]) -> Result<IntRange> {
        let flags = bytes.read_u8().map_err(|_| Error::InsufficientData)?;
        if flags & RANGE_EMPTY != 0 {
            if !bytes.is_empty() {
                return Err(Error::TrailingData(bytes.len()));
            }
            return Ok(IntRange::Empty);
        }
        let mut read_bound = |infinite: bool| -> Result<Option<i32>> {
            if infinite {
                return Ok(None);
            }
            let len = bytes.read_u32::<BigEndian>().map_err(|_| Error::InsufficientData)?;
            if len != 4 {
                return Err(Error::InvalidInterval(format!("invalid bound length {len}")));
            }
            bytes.read_i32::<BigEndian>().map(Some).map_err(|_| Error::InsufficientData)
        };
        let lower = read_bound(flags & RANGE_LB_INF != 0)?;
        let upper = read_bound(flags & RANGE_UB_INF != 0)?;
        if !bytes.is_empty() {
            return Err(Error::TrailingData(bytes.len()));
        }
        IntRange::from_bounds(lower, flags & RANGE_LB_INC != 0, upper, flags & RANGE_UB_INC != 0)
    }

    fn flags(&self) -> u8 {
        match self {
            IntRange::Empty => RANGE_EMPTY,
            IntRange::Span { lower, upper } => {
                let mut flags = 0;
                match lower {
                    Some(_) => flags |= RANGE_LB_INC,
                    None => flags |= RANGE_LB_INF,
                }
                if upper.is_none() {
                    flags |= RANGE_UB_INF;
                }
                flags
            }
        }
    }

    /// I/O function handles for registering this type in a catalog.
    pub fn io_functions() -> RangeIoFunctions<IntRange> {
        RangeIoFunctions {
            input: int_range_in,
            output: int_range_out,
            send: Some(int_range_send),
            receive: Some(int_range_recv),
        }
    }

    /// A catalog holding the `int4range` / `int4multirange` pair.
    pub fn catalog() -> TypeRegistry<IntRange> {
        let mut registry = TypeRegistry::new();
        registry.register(
            IntRange::MULTIRANGE_TYPE,
            RangeTypeEntry::new(IntRange::RANGE_TYPE, "int4range", IntRange::io_functions()),
        );
        registry
    }
}

fn malformed(input: &str, detail: &str) -> Error {
    Error::InvalidInterval(format!("malformed range literal: \"{input}\": {detail}"))
}

fn out_of_range() -> Error {
    Error::InvalidInterval("integer out of range".into())
}

fn parse_bound(input: &str, text: &str) -> Result<Option<i32>> {
    let text = text.trim();
    let text = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .unwrap_or(text)
        .replace(&['\\', '"'][..], "");
    let text = text.trim();
    if text.is_empty() {
        return Ok(None);
    }
    text.parse::<i32>().map(Some).map_err(|_| {
        Error::InvalidInterval(format!(
            "invalid input syntax for type integer: \"{text}\" in \"{input}\""
        ))
    })
}

fn int_range_in(text: &str, _typmod: i32, _depth: Depth) -> Result<IntRange> {
    IntRange::parse(text)
}

fn int_range_out(range: &IntRange, _depth: Depth) -> Result<String> {
    Ok(range.to_string())
}

fn int_range_send(range: &IntRange, _depth: Depth) -> Result<Vec<u8>> {
    Ok(range.send())
}

fn int_range_recv(bytes: &[u8], _typmod: i32, _depth: Depth) -> Result<IntRange> {
    IntRange::receive(bytes)
}

impl fmt::Display for IntRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntRange::Empty => f.write_str(EMPTY_LITERAL),
            IntRange::Span { lower, upper } => {
                match lower {
                    Some(l) => write!(f, "[{l},")?,
                    None => f.write_str("(,")?,
                }
                match upper {
                    Some(u) => write!(f, "{u})"),
                    None => f.write_str(")"),
                }
            }
        }
    }
}

/// `lower < upper` with `None` standing for the matching infinity.
fn below(lower: Option<i32>, upper: Option<i32>) -> bool {
    match (lower, upper) {
        (Some(l), Some(u)) => l < u,
        _ => true,
    }
}

fn cmp_lower(a: Option<i32>, b: Option<i32>) -> Ordering {
    // None sorts first
    a.cmp(&b)
}

fn cmp_upper(a: Option<i32>, b: Option<i32>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(&b),
    }
}

fn mix32(mut h: u32) -> u32 {
    h ^= h >> 16;
    h = h.wrapping_mul(0x85eb_ca6b);
    h ^= h >> 13;
    h = h.wrapping_mul(0xc2b2_ae35);
    h ^ (h >> 16)
}

fn mix64(mut h: u64) -> u64 {
    h ^= h >> 33;
    h = h.wrapping_mul(0xff51_afd7_ed55_8ccd);
    h ^= h >> 33;
    h = h.wrapping_mul(0xc4ce_b9fe_1a85_ec53);
    h ^ (h >> 33)
}

impl Interval for IntRange {
    fn is_empty(&self) -> bool {
        matches!(self, IntRange::Empty)
    }

    fn cmp_bounds(&self, other: &Self) -> Ordering {
        match (self, other) {
            (IntRange::Empty, IntRange::Empty) => Ordering::Equal,
            (IntRange::Empty, _) => Ordering::Less,
            (_, IntRange::Empty) => Ordering::Greater,
            (
                IntRange::Span { lower: l1, upper: u1 },
                IntRange::Span { lower: l2, upper: u2 },
            ) => cmp_lower(*l1, *l2).then_with(|| cmp_upper(*u1, *u2)),
        }
    }

    fn overlaps(&self, other: &Self) -> bool {
        match (self, other) {
            (
                IntRange::Span { lower: l1, upper: u1 },
                IntRange::Span { lower: l2, upper: u2 },
            ) => below(*l1, *u2) && below(*l2, *u1),
            _ => false,
        }
    }

    fn adjacent(&self, other: &Self) -> bool {
        match (self, other) {
            (
                IntRange::Span { lower: l1, upper: u1 },
                IntRange::Span { lower: l2, upper: u2 },
            ) => (u1.is_some() && u1 == l2) || (u2.is_some() && u2 == l1),
            _ => false,
        }
    }

    fn union(&self, other: &Self) -> Self {
        match (self, other) {
            (IntRange::Empty, r) | (r, IntRange::Empty) => *r,
            (
                IntRange::Span { lower: l1, upper: u1 },
                IntRange::Span { lower: l2, upper: u2 },
            ) => {
                let lower = if cmp_lower(*l1, *l2).is_le() { *l1 } else { *l2 };
                let upper = if cmp_upper(*u1, *u2).is_ge() { *u1 } else { *u2 };
                IntRange::Span { lower, upper }
            }
        }
    }

    fn hash32(&self) -> u32 {
        let mut h = mix32(u32::from(self.flags()));
        for bound in [self.lower(), self.upper()].into_iter().flatten() {
            h = h.rotate_left(1) ^ mix32(bound as u32);
        }
        h
    }

    fn hash64(&self, seed: u64) -> u64 {
        let mut h = mix64(u64::from(self.flags()) ^ seed);
        for bound in [self.lower(), self.upper()].into_iter().flatten() {
            h = h.rotate_left(1) ^ mix64(bound as u32 as u64 ^ seed);
        }
        h
    }

    fn packed_size(&self) -> usize {
        1 + 4 * [self.lower(), self.upper()].iter().flatten().count()
    }

    fn write_packed(&self, out: &mut Vec<u8>) {
        out.push(self.flags());
        for bound in [self.lower(), self.upper()].into_iter().flatten() {
            out.extend_from_slice(&bound.to_ne_bytes());
        }
    }

    fn read_packed(mut bytes: &[u8]) -> Result<Self> {
        let corrupt = |_: std::io::Error| Error::CorruptValue("truncated int4range payload".into());
        let flags = bytes.read_u8().map_err(corrupt)?;
        let range = if flags & RANGE_EMPTY != 0 {
            IntRange::Empty
        } else {
            let lower = match flags & RANGE_LB_INF {
                0 => Some(bytes.read_i32::<NativeEndian>().map_err(corrupt)?),
                _ => None,
            };
            let upper = match flags & RANGE_UB_INF {
                0 => Some(bytes.read_i32::<NativeEndian>().map_err(corrupt)?),
                _ => None,
            };
            if !below(lower, upper) {
                return Err(Error::CorruptValue("int4range payload bounds out of order".into()));
            }
            IntRange::Span { lower, upper }
        };
        if !bytes.is_empty() {
            return Err(Error::CorruptValue("trailing bytes in int4range payload".into()));
        }
        Ok(range)
    }
}
