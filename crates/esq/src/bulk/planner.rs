//! ✂️ The BatchPlanner — slices the document pile into request-sized portions.
//!
//! N documents, batch size B, ⌈N/B⌉ batches. Every batch is full except maybe the
//! last one, which is allowed to be a little short. Like the last slice of pizza.

use std::num::NonZeroUsize;

use crate::common::{Document, IndexName};

/// 📦 A contiguous run of documents headed for one `_bulk` request.
///
/// Borrows straight from the caller's slice. No copies, no reordering, no drama.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    /// 🔢 Zero-based position of this batch in the plan.
    pub ordinal: usize,
    pub index: &'a IndexName,
    pub documents: &'a [Document],
}

impl Batch<'_> {
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

/// ✂️ Partition `documents` into batches of at most `max_batch_size` docs, in order.
///
/// Zero documents → zero batches. No errors possible; `NonZeroUsize` already
/// confiscated the only bad input at the door.
pub fn plan_batches<'a>(
    index: &'a IndexName,
    documents: &'a [Document],
    max_batch_size: NonZeroUsize,
) -> impl ExactSizeIterator<Item = Batch<'a>> + 'a {
    documents
        .chunks(max_batch_size.get())
        .enumerate()
        .map(move |(ordinal, documents)| Batch {
            ordinal,
            index,
            documents,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(n: usize) -> Vec<Document> {
        (0..n).map(|i| Document::new(format!(r#"{{"n":{i}}}"#))).collect()
    }

    fn size(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).expect("💀 test asked for a zero batch size")
    }

    #[test]
    fn the_one_where_1200_docs_become_500_500_200() {
        let index = IndexName::new("pile").unwrap();
        let documents = docs(1200);
        let batches: Vec<_> = plan_batches(&index, &documents, size(500)).collect();

        let sizes: Vec<usize> = batches.iter().map(Batch::len).collect();
        assert_eq!(sizes, vec![500, 500, 200]);
        let ordinals: Vec<usize> = batches.iter().map(|b| b.ordinal).collect();
        assert_eq!(ordinals, vec![0, 1, 2]);
        assert!(batches.iter().all(|b| b.index == &index));
    }

    #[test]
    fn the_one_where_nothing_in_means_nothing_out() {
        let index = IndexName::new("pile").unwrap();
        assert_eq!(plan_batches(&index, &[], size(500)).len(), 0);
    }

    #[test]
    fn the_one_where_every_n_and_b_glue_back_together() {
        let index = IndexName::new("pile").unwrap();
        for n in [0, 1, 2, 7, 10, 11, 99, 100, 101] {
            let documents = docs(n);
            for b in [1, 2, 3, 10, 100, 500] {
                let batches: Vec<_> = plan_batches(&index, &documents, size(b)).collect();
                assert_eq!(batches.len(), n.div_ceil(b), "n={n} b={b}");
                for (i, batch) in batches.iter().enumerate() {
                    assert!(!batch.is_empty());
                    if i + 1 < batches.len() {
                        assert_eq!(batch.len(), b, "only the last batch may be short");
                    } else {
                        assert!(batch.len() <= b);
                    }
                }
                let glued: Vec<Document> = batches
                    .iter()
                    .flat_map(|b| b.documents.iter().cloned())
                    .collect();
                assert_eq!(glued, documents, "n={n} b={b}");
            }
        }
    }
}
