//! Multiranges: finite unions of disjoint intervals, stored as one immutable
//! packed value.
//!
//! A [`Multirange`] is generic over the [`Interval`] type it holds and is
//! always canonical: its intervals are sorted, non-empty, and neither overlap
//! nor touch. Values can be built from interval lists or arrays, printed and
//! parsed as `{iv,iv,...}` literals, sent and received in a big-endian binary
//! form, compared, and hashed.
//!
//! [`IntRange`] is the bundled interval type over `i32`.
//!
//! # Examples
//!
//! ```rust
//! use multirange::{IntRange, IoContext, Multirange};
//!
//! let catalog = IntRange::catalog();
//! let mut ctx = IoContext::new(&catalog);
//! let tag = IntRange::MULTIRANGE_TYPE;
//!
//! let mr = Multirange::<IntRange>::parse("{[3,7), [1,4), empty, [10,12)}", tag, -1, &mut ctx).unwrap();
//! assert_eq!(mr.len(), 2);
//! assert_eq!(mr.to_text(&mut ctx).unwrap(), "{[1,7),[10,12)}");
//!
//! let bytes = mr.send(&mut ctx).unwrap();
//! assert_eq!(Multirange::receive(&bytes, tag, -1, &mut ctx).unwrap(), mr);
//! ```

use std::fmt;

mod catalog;
mod depth;
mod error;
mod interval;
mod multirange;

pub use crate::catalog::{
    InputFn, IoCache, IoContext, OutputFn, RangeIoFunctions, RangeTypeEntry, ReceiveFn, SendFn,
    TypeCatalog, TypeRegistry,
};
pub use crate::depth::Depth;
pub use crate::error::{Direction, Error, MalformedReason, Result};
pub use crate::interval::{IntRange, Interval};
pub use crate::multirange::{
    IntervalArray, Iter, Multirange, INITIAL_RANGE_CAPACITY, MAXIMUM_ALIGNOF,
};

/// Identifier of a registered range or multirange type.
///
/// Every multirange carries the tag of its own type; two multiranges are
/// only comparable when their tags match.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeTag(pub u32);

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
