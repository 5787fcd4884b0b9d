//! Partitioning of identifier lists into bulk-request chunks.

/// Splits `ids` into consecutive chunks of at most `size` elements.
///
/// Produces `ceil(len / size)` non-empty chunks whose concatenation is the
/// input, in order. A `size` of zero is treated as one.
pub fn chunk_ids<T: Clone>(ids: &[T], size: usize) -> Vec<Vec<T>> {
    ids.chunks(size.max(1)).map(<[T]>::to_vec).collect()
}
