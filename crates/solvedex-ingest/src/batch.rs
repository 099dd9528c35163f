//! Splitting an identifier set into lookup batches

use crate::ProblemId;

/// A contiguous slice of the identifier set sent in one lookup request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Batch<'a> {
    /// Zero-based position of the batch in submission order
    pub index: usize,
    pub ids: &'a [ProblemId],
}

impl Batch<'_> {
    /// Value of the `problemIds` query parameter
    pub fn query_value(&self) -> String {
        join_ids(self.ids)
    }

    pub fn first_id(&self) -> Option<ProblemId> {
        self.ids.first().copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Split `ids` into consecutive batches of at most `batch_size` ids.
///
/// Order is preserved within and across batches and only the last batch may
/// be shorter. An empty input or a zero `batch_size` yields no batches.
pub fn partition(ids: &[ProblemId], batch_size: usize) -> Vec<Batch<'_>> {
    if batch_size == 0 {
        return Vec::new();
    }

    ids.chunks(batch_size)
        .enumerate()
        .map(|(index, ids)| Batch { index, ids })
        .collect()
}

/// Comma-join ids the way the lookup endpoint expects them
pub fn join_ids(ids: &[ProblemId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
