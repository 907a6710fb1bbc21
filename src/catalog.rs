//! Lookup of the interval type behind a multirange type, and its I/O
//! function handles.
//!
//! The text and binary codecs never call an interval parser directly: they
//! ask an [`IoContext`] for the [`RangeTypeEntry`] registered under the
//! multirange's [`TypeTag`]. The context memoizes the last lookup and
//! recomputes it whenever a different tag is requested.

use std::collections::HashMap;
use std::fmt;

use crate::depth::Depth;
use crate::error::{Direction, Error, Result};
use crate::TypeTag;

/// Parses one interval literal. The `i32` is the type modifier.
pub type InputFn<R> = fn(&str, i32, Depth) -> Result<R>;
/// Prints one interval as its literal text.
pub type OutputFn<R> = fn(&R, Depth) -> Result<String>;
/// Encodes one interval in its binary wire form.
pub type SendFn<R> = fn(&R, Depth) -> Result<Vec<u8>>;
/// Decodes one interval from its binary wire form. The `i32` is the type modifier.
pub type ReceiveFn<R> = fn(&[u8], i32, Depth) -> Result<R>;

/// The I/O function handles of an interval type.
///
/// Text I/O is mandatory; a type may lack binary send or receive.
pub struct RangeIoFunctions<R> {
    pub input: InputFn<R>,
    pub output: OutputFn<R>,
    pub send: Option<SendFn<R>>,
    pub receive: Option<ReceiveFn<R>>,
}

impl<R> Clone for RangeIoFunctions<R> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<R> Copy for RangeIoFunctions<R> {}

impl<R> fmt::Debug for RangeIoFunctions<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RangeIoFunctions")
            .field("send", &self.send.is_some())
            .field("receive", &self.receive.is_some())
            .finish_non_exhaustive()
    }
}

/// Metadata of the interval type a multirange type is built from.
#[derive(Debug)]
pub struct RangeTypeEntry<R> {
    pub type_id: TypeTag,
    pub name: String,
    pub io: RangeIoFunctions<R>,
}

impl<R> Clone for RangeTypeEntry<R> {
    fn clone(&self) -> Self {
        RangeTypeEntry { type_id: self.type_id, name: self.name.clone(), io: self.io }
    }
}

impl<R> RangeTypeEntry<R> {
    pub fn new(type_id: TypeTag, name: impl Into<String>, io: RangeIoFunctions<R>) -> Self {
        RangeTypeEntry { type_id, name: name.into(), io }
    }

    /// The binary encoder, or [`Error::NoBinaryFunction`] if the type has none.
    pub fn send_fn(&self) -> Result<SendFn<R>> {
        self.io.send.ok_or_else(|| Error::NoBinaryFunction {
            type_name: self.name.clone(),
            direction: Direction::Output,
        })
    }

    /// The binary decoder, or [`Error::NoBinaryFunction`] if the type has none.
    pub fn receive_fn(&self) -> Result<ReceiveFn<R>> {
        self.io.receive.ok_or_else(|| Error::NoBinaryFunction {
            type_name: self.name.clone(),
            direction: Direction::Input,
        })
    }
}

/// Type metadata lookup consumed by the codecs.
pub trait TypeCatalog<R> {
    /// The interval type wrapped by the multirange type `tag`, or `None` if
    /// `tag` does not name a multirange-of-ranges type.
    fn range_type_of(&self, tag: TypeTag) -> Option<RangeTypeEntry<R>>;
}

/// An in-memory [`TypeCatalog`] keyed by multirange type tag.
///
/// # Examples
///
/// ```rust
/// use multirange::{IntRange, TypeCatalog};
///
/// let catalog = IntRange::catalog();
/// let entry = catalog.range_type_of(IntRange::MULTIRANGE_TYPE).unwrap();
/// assert_eq!(entry.type_id, IntRange::RANGE_TYPE);
/// assert!(catalog.range_type_of(IntRange::RANGE_TYPE).is_none());
/// ```
pub struct TypeRegistry<R> {
    types: HashMap<TypeTag, RangeTypeEntry<R>>,
}

impl<R> TypeRegistry<R> {
    pub fn new() -> Self {
        TypeRegistry { types: HashMap::new() }
    }

    /// Registers `range` as the interval type of the multirange type `multirange`.
    /// Returns the entry previously registered under that tag, if any.
    pub fn register(
        &mut self,
        multirange: TypeTag,
        range: RangeTypeEntry<R>,
    ) -> Option<RangeTypeEntry<R>> {
        self.types.insert(multirange, range)
    }
}

impl<R> Default for TypeRegistry<R> {
    fn default() -> Self {
        TypeRegistry::new()
    }
}

impl<R> TypeCatalog<R> for TypeRegistry<R> {
    fn range_type_of(&self, tag: TypeTag) -> Option<RangeTypeEntry<R>> {
        self.types.get(&tag).cloned()
    }
}

/// Memoized result of the last catalog lookup.
///
/// A version check rather than a lock: the entry is reused while the same
/// multirange tag is requested and replaced as soon as another one is.
pub struct IoCache<R> {
    entry: Option<(TypeTag, RangeTypeEntry<R>)>,
}

impl<R> IoCache<R> {
    pub fn new() -> Self {
        IoCache { entry: None }
    }

    pub fn lookup(
        &mut self,
        catalog: &dyn TypeCatalog<R>,
        tag: TypeTag,
    ) -> Result<&RangeTypeEntry<R>> {
        let fresh = matches!(&self.entry, Some((cached, _)) if *cached == tag);
        if !fresh {
            tracing::debug!(%tag, "looking up multirange type");
            // a failed lookup must not leave the previous entry behind
            self.entry = None;
            let range_type = catalog.range_type_of(tag).ok_or(Error::NotAMultirange(tag))?;
            self.entry = Some((tag, range_type));
        }
        self.entry.as_ref().map(|(_, range_type)| range_type).ok_or(Error::NotAMultirange(tag))
    }

    pub fn invalidate(&mut self) {
        self.entry = None;
    }
}

impl<R> Default for IoCache<R> {
    fn default() -> Self {
        IoCache::new()
    }
}

/// Per-call-site state for multirange I/O: the catalog, the lookup cache and
/// the recursion budget.
///
/// # Examples
///
/// ```rust
/// use multirange::{IntRange, IoContext, Multirange};
///
/// let catalog = IntRange::catalog();
/// let mut ctx = IoContext::new(&catalog);
/// let mr: Multirange<IntRange> =
///     Multirange::parse("{[1,3), [3,5)}", IntRange::MULTIRANGE_TYPE, -1, &mut ctx).unwrap();
/// assert_eq!(mr.to_text(&mut ctx).unwrap(), "{[1,5)}");
/// ```
pub struct IoContext<'a, R> {
    catalog: &'a dyn TypeCatalog<R>,
    cache: IoCache<R>,
    depth: Depth,
}

impl<'a, R> IoContext<'a, R> {
    pub fn new(catalog: &'a dyn TypeCatalog<R>) -> Self {
        IoContext::with_depth(catalog, Depth::new())
    }

    /// A context whose entry points start from `depth`, used when a nested
    /// interval codec calls back into multirange I/O.
    pub fn with_depth(catalog: &'a dyn TypeCatalog<R>, depth: Depth) -> Self {
        IoContext { catalog, cache: IoCache::new(), depth }
    }

    pub fn depth(&self) -> Depth {
        self.depth
    }

    /// The interval type behind the multirange type `tag`.
    pub fn range_type(&mut self, tag: TypeTag) -> Result<&RangeTypeEntry<R>> {
        self.cache.lookup(self.catalog, tag)
    }
}
