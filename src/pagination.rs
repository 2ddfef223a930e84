//! Offset pagination bounded by the page-size sentinel.
//!
//! The subgraph exposes no "has next page" flag; the only end-of-data signal
//! is a page shorter than the requested size. `skip` always equals the number
//! of items accumulated so far.

use std::future::Future;

use crate::error::SubgraphError;

/// Maximum projects returned by a single subgraph query.
pub const PROJECTS_PAGE_SIZE: usize = 1000;

/// Page sizing and the safety bound on loop iterations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageConfig {
    /// Items requested per page.
    pub page_size: usize,
    /// Maximum number of full pages before the loop is abandoned.
    pub max_pages: usize,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            page_size: PROJECTS_PAGE_SIZE,
            max_pages: 10_000,
        }
    }
}

/// Collecting mode: fetch every page and concatenate in arrival order.
///
/// `fetch_page` receives the current skip offset and returns one page of
/// items. A page shorter than `config.page_size` (including an empty first
/// page) terminates the loop; that short page's items are still kept.
pub async fn collect_paged<T, F, Fut>(
    config: PageConfig,
    mut fetch_page: F,
) -> Result<Vec<T>, SubgraphError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<Vec<T>, SubgraphError>>,
{
    let mut out = Vec::new();
    let mut full_pages = 0_usize;
    loop {
        let page = fetch_page(out.len() as u64).await?;
        let page_len = page.len();
        out.extend(page);
        if page_len != config.page_size {
            break;
        }
        full_pages += 1;
        if full_pages >= config.max_pages {
            return Err(SubgraphError::PageLimitExceeded { pages: full_pages });
        }
    }
    Ok(out)
}

/// Counting mode: fetch every page but retain only the running total.
///
/// `fetch_page` receives the current skip offset and returns the length of
/// that page. Termination mirrors [`collect_paged`].
pub async fn count_paged<F, Fut>(config: PageConfig, mut fetch_page: F) -> Result<u64, SubgraphError>
where
    F: FnMut(u64) -> Fut,
    Fut: Future<Output = Result<usize, SubgraphError>>,
{
    let mut total = 0_u64;
    let mut full_pages = 0_usize;
    loop {
        let page_len = fetch_page(total).await?;
        total += page_len as u64;
        if page_len != config.page_size {
            break;
        }
        full_pages += 1;
        if full_pages >= config.max_pages {
            return Err(SubgraphError::PageLimitExceeded { pages: full_pages });
        }
    }
    Ok(total)
}
