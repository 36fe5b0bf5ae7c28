//! Generic pagination over list operations
//!
//! Every list endpoint returns one page of items plus an optional
//! continuation cursor. Feeding the cursor back into the matching options
//! struct resumes the listing; [`page_stream`] wraps that loop as a lazy,
//! finite stream of pages.

use crate::error::Result;
use futures::stream::{self, Stream};
use std::future::Future;

/// One page of a listing, with the cursor for the next page if any
#[derive(Clone, Debug, PartialEq)]
pub struct Page<T, C> {
    /// Items in this page
    pub items: Vec<T>,
    /// Cursor resuming after the last item, `None` on the final page
    pub next: Option<C>,
}

impl<T, C> Page<T, C> {
    pub fn new(items: Vec<T>, next: Option<C>) -> Self {
        Self { items, next }
    }

    /// Whether this is the final page
    pub fn is_last(&self) -> bool {
        self.next.is_none()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}

impl<T, C> IntoIterator for Page<T, C> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Cursor into a file-name listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileNameCursor {
    pub start_file_name: String,
}

/// Cursor into a file-version listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileVersionCursor {
    pub start_file_name: String,
    pub start_file_id: Option<String>,
}

/// Cursor into a part listing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PartCursor {
    pub start_part_number: u32,
}

/// Cursor into a listing keyed by file id
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileIdCursor {
    pub start_file_id: String,
}

/// Cursor into an application-key listing
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyCursor {
    pub start_application_key_id: String,
}

/// Drive a paged fetch to exhaustion as a lazy stream of pages.
///
/// `fetch` is called with `None` for the first page, then with each page's
/// continuation cursor until a page comes back without one.
pub fn page_stream<T, C, F, Fut>(fetch: F) -> impl Stream<Item = Result<Page<T, C>>>
where
    C: Clone,
    F: FnMut(Option<C>) -> Fut,
    Fut: Future<Output = Result<Page<T, C>>>,
{
    stream::try_unfold((Some(None::<C>), fetch), |(cursor, mut fetch)| async move {
        let Some(cursor) = cursor else {
            return Ok(None);
        };
        let page = fetch(cursor).await?;
        let next = page.next.clone().map(Some);
        Ok(Some((page, (next, fetch))))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::B2Error;
    use futures::TryStreamExt;

    #[test]
    fn test_page_stream_follows_cursors() {
        let fetch = |cursor: Option<PartCursor>| async move {
            match cursor {
                None => Ok(Page::new(
                    vec![1u32, 2],
                    Some(PartCursor {
                        start_part_number: 3,
                    }),
                )),
                Some(PartCursor {
                    start_part_number: 3,
                }) => Ok(Page::new(vec![3u32], None)),
                Some(other) => Err(B2Error::InvalidResponse(format!(
                    "unexpected cursor {:?}",
                    other
                ))),
            }
        };

        let pages: Vec<Page<u32, PartCursor>> =
            tokio_test::block_on(page_stream(fetch).try_collect()).unwrap();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].items, vec![1, 2]);
        assert!(!pages[0].is_last());
        assert_eq!(pages[1].items, vec![3]);
        assert!(pages[1].is_last());
    }

    #[test]
    fn test_page_stream_single_page() {
        let fetch = |_cursor: Option<PartCursor>| async move {
            Ok(Page::<u32, PartCursor>::new(vec![], None))
        };

        let pages: Vec<Page<u32, PartCursor>> =
            tokio_test::block_on(page_stream(fetch).try_collect()).unwrap();

        assert_eq!(pages.len(), 1);
        assert!(pages[0].is_empty());
        assert!(pages[0].is_last());
    }
}
