use super::Multirange;
use crate::catalog::IoContext;
use crate::error::{Error, MalformedReason, Result};
use crate::interval::Interval;
use crate::TypeTag;

/// Initial capacity of the pending interval list while parsing; it doubles
/// whenever it fills up.
pub const INITIAL_RANGE_CAPACITY: usize = 8;

/// Keyword handed to the interval parser for an empty element.
const EMPTY_LITERAL: &str = "empty";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
enum ParseState {
    BeforeRange,
    InRange,
    InRangeEscaped,
    InRangeQuoted,
    InRangeQuotedEscaped,
    AfterRange,
    Finished,
}

/// Splits a `{iv,iv,...}` literal into its raw interval literals and hands
/// each one, in order, to `on_range`.
///
/// Interval literals are passed through verbatim, whitespace and quoting
/// included; only the list syntax around them is interpreted here.
fn scan_literal<F>(input: &str, mut on_range: F) -> Result<()>
where
    F: FnMut(&str) -> Result<()>,
{
    let bytes = input.as_bytes();
    let malformed = |reason| Error::malformed(input, reason);

    let mut pos = skip_whitespace(bytes, 0);
    if bytes.get(pos) != Some(&b'{') {
        return Err(malformed(MalformedReason::MissingLeftBrace));
    }
    pos += 1;

    let mut state = ParseState::BeforeRange;
    let mut range_start = pos;
    let mut seen = 0usize;
    while state != ParseState::Finished {
        let ch = *bytes.get(pos).ok_or_else(|| malformed(MalformedReason::UnexpectedEnd))?;
        match state {
            ParseState::BeforeRange => {
                if ch.is_ascii_whitespace() {
                    // skip
                } else if ch == b'[' || ch == b'(' {
                    range_start = pos;
                    state = ParseState::InRange;
                } else if ch == b'}' && seen == 0 {
                    state = ParseState::Finished;
                } else if starts_with_empty(&bytes[pos..]) {
                    on_range(EMPTY_LITERAL)?;
                    seen += 1;
                    pos += EMPTY_LITERAL.len() - 1;
                    state = ParseState::AfterRange;
                } else {
                    return Err(malformed(MalformedReason::ExpectedRangeStart));
                }
            }
            ParseState::InRange => match ch {
                b'"' => state = ParseState::InRangeQuoted,
                b'\\' => state = ParseState::InRangeEscaped,
                b']' | b')' => {
                    on_range(&input[range_start..=pos])?;
                    seen += 1;
                    state = ParseState::AfterRange;
                }
                _ => {}
            },
            ParseState::InRangeEscaped => state = ParseState::InRange,
            ParseState::InRangeQuoted => match ch {
                // a doubled quote mark is an escaped quote mark
                b'"' if bytes.get(pos + 1) == Some(&b'"') => pos += 1,
                b'"' => state = ParseState::InRange,
                b'\\' => state = ParseState::InRangeQuotedEscaped,
                _ => {}
            },
            ParseState::InRangeQuotedEscaped => state = ParseState::InRangeQuoted,
            ParseState::AfterRange => {
                if ch.is_ascii_whitespace() {
                    // skip
                } else if ch == b',' {
                    state = ParseState::BeforeRange;
                } else if ch == b'}' {
                    state = ParseState::Finished;
                } else {
                    return Err(malformed(MalformedReason::ExpectedCommaOrEnd));
                }
            }
            ParseState::Finished => unreachable!(),
        }
        pos += 1;
    }

    if skip_whitespace(bytes, pos) != bytes.len() {
        return Err(malformed(MalformedReason::JunkAfterRightBrace));
    }
    Ok(())
}

fn skip_whitespace(bytes: &[u8], mut pos: usize) -> usize {
    while bytes.get(pos).map_or(false, u8::is_ascii_whitespace) {
        pos += 1;
    }
    pos
}

fn starts_with_empty(rest: &[u8]) -> bool {
    rest.len() >= EMPTY_LITERAL.len()
        && rest[..EMPTY_LITERAL.len()].eq_ignore_ascii_case(EMPTY_LITERAL.as_bytes())
}

impl<R: Interval> Multirange<R> {
    /// Parses a multirange literal such as `{[1,3), [5,7)}` as a value of the
    /// multirange type `tag`.
    ///
    /// Whitespace is allowed around the braces and commas. Each element is
    /// either `empty` (in any case) or a bracketed interval literal, which is
    /// handed verbatim to the interval type's own parser. The result is
    /// canonical.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use multirange::{IntRange, IoContext, Multirange};
    ///
    /// let catalog = IntRange::catalog();
    /// let mut ctx = IoContext::new(&catalog);
    /// let tag = IntRange::MULTIRANGE_TYPE;
    ///
    /// let mr = Multirange::<IntRange>::parse("{[5,6), empty, [1,3)}", tag, -1, &mut ctx).unwrap();
    /// assert_eq!(mr.to_text(&mut ctx).unwrap(), "{[1,3),[5,6)}");
    ///
    /// assert!(Multirange::<IntRange>::parse("{[1,2)", tag, -1, &mut ctx).is_err());
    /// ```
    pub fn parse(
        input: &str,
        tag: TypeTag,
        typmod: i32,
        ctx: &mut IoContext<'_, R>,
    ) -> Result<Multirange<R>> {
        let depth = ctx.depth().descend()?;
        let input_fn = ctx.range_type(tag)?.io.input;

        let mut ranges = Vec::with_capacity(INITIAL_RANGE_CAPACITY);
        scan_literal(input, |literal| {
            let range = input_fn(literal, typmod, depth)?;
            if !range.is_empty() {
                if ranges.len() == ranges.capacity() {
                    ranges.reserve_exact(ranges.capacity());
                }
                ranges.push(range);
            }
            Ok(())
        })
        .map_err(|e| {
            tracing::debug!(input, error = %e, "rejected multirange literal");
            e
        })?;

        Multirange::from_intervals(tag, ranges)
    }

    /// Prints the multirange as `{iv,iv,...}`, each interval in its own
    /// type's text form. The empty multirange prints as `{}`.
    pub fn to_text(&self, ctx: &mut IoContext<'_, R>) -> Result<String> {
        let depth = ctx.depth().descend()?;
        let output_fn = ctx.range_type(self.type_tag())?.io.output;

        let mut out = String::from("{");
        for (i, range) in self.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            out.push_str(&output_fn(&range?, depth)?);
        }
        out.push('}');
        Ok(out)
    }
}
