use super::Multirange;
use crate::error::Result;
use crate::interval::Interval;

impl<R: Interval> Multirange<R> {
    /// 32-bit hash, consistent with [`Multirange::try_eq`].
    ///
    /// Starts from 1 and folds every interval hash in with `h * 31 + x`.
    pub fn hash32(&self) -> Result<u32> {
        let mut hash: u32 = 1;
        for range in self.iter() {
            hash = hash.wrapping_mul(31).wrapping_add(range?.hash32());
        }
        Ok(hash)
    }

    /// Seeded 64-bit hash, consistent with [`Multirange::try_eq`]. The seed
    /// is passed to every interval hash.
    pub fn hash64(&self, seed: u64) -> Result<u64> {
        let mut hash: u64 = 1;
        for range in self.iter() {
            hash = hash.wrapping_mul(31).wrapping_add(range?.hash64(seed));
        }
        Ok(hash)
    }
}
