use std::io;

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};

use super::Multirange;
use crate::catalog::IoContext;
use crate::error::{Error, Result};
use crate::interval::Interval;
use crate::TypeTag;

// Sizes of the wire structures
const COUNT_BYTES: usize = 4;
const LENGTH_BYTES: usize = 4;

impl<R: Interval> Multirange<R> {
    /// Encodes this multirange in its binary wire form into `writer`.
    ///
    /// The format is the interval count as a big-endian `u32`, then for each
    /// interval, in stored order, its encoded length as a big-endian `u32`
    /// followed by the interval type's own binary encoding.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{IntRange, IoContext, Multirange};
    ///
    /// let catalog = IntRange::catalog();
    /// let mut ctx = IoContext::new(&catalog);
    /// let mr = Multirange::from_interval(IntRange::MULTIRANGE_TYPE, IntRange::new(1, 4)).unwrap();
    ///
    /// let mut bytes = vec![];
    /// mr.send_into(&mut bytes, &mut ctx).unwrap();
    /// let back = Multirange::receive(&bytes, IntRange::MULTIRANGE_TYPE, -1, &mut ctx).unwrap();
    /// assert_eq!(mr, back);
    /// ```
    pub fn send_into<W: io::Write>(&self, mut writer: W, ctx: &mut IoContext<'_, R>) -> Result<()> {
        let depth = ctx.depth().descend()?;
        let send = ctx.range_type(self.type_tag())?.send_fn()?;

        writer.write_u32::<BigEndian>(self.len() as u32)?;
        for range in self.iter() {
            let bytes = send(&range?, depth)?;
            let len = u32::try_from(bytes.len())
                .map_err(|_| Error::InvalidInterval("encoded interval too large".into()))?;
            writer.write_u32::<BigEndian>(len)?;
            writer.write_all(&bytes)?;
        }
        Ok(())
    }

    /// Encodes this multirange in its binary wire form.
    pub fn send(&self, ctx: &mut IoContext<'_, R>) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(COUNT_BYTES + self.len() * LENGTH_BYTES);
        self.send_into(&mut bytes, ctx)?;
        Ok(bytes)
    }

    /// Decodes a multirange of type `tag` from its binary wire form.
    ///
    /// The whole of `bytes` must be consumed. The decoded intervals are not
    /// trusted to be canonical and go through the same canonicalization as
    /// every other construction path.
    pub fn receive(
        mut bytes: &[u8],
        tag: TypeTag,
        typmod: i32,
        ctx: &mut IoContext<'_, R>,
    ) -> Result<Multirange<R>> {
        let depth = ctx.depth().descend()?;
        let receive = ctx.range_type(tag)?.receive_fn()?;

        let count = bytes.read_u32::<BigEndian>().map_err(|_| Error::InsufficientData)? as usize;
        // never trust the count for the allocation size
        let mut ranges = Vec::with_capacity(count.min(bytes.len() / LENGTH_BYTES));
        for _ in 0..count {
            let len = bytes.read_u32::<BigEndian>().map_err(|_| Error::InsufficientData)? as usize;
            if len > bytes.len() {
                return Err(Error::InsufficientData);
            }
            let (payload, rest) = bytes.split_at(len);
            ranges.push(receive(payload, typmod, depth)?);
            bytes = rest;
        }
        if !bytes.is_empty() {
            return Err(Error::TrailingData(bytes.len()));
        }

        Multirange::from_intervals(tag, ranges)
    }
}
