use hrms_core::{AppError, AppResult};

/// Default and maximum page sizes of one listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Size used when the client gives none.
    pub default_size: u32,
    /// Largest size a client may request.
    pub max_size: u32,
}

impl PageLimits {
    /// Employee listings, search and other bulk record views.
    pub const LARGE: Self = Self {
        default_size: 500,
        max_size: 1000,
    };

    /// Activity feed and user listings.
    pub const STANDARD: Self = Self {
        default_size: 100,
        max_size: 200,
    };
}

/// Validated 1-based page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    page_size: u32,
}

impl PageRequest {
    /// Builds a page request from optional client parameters.
    ///
    /// Oversized pages are clamped to the limit; a zero page size means the
    /// default. Page numbers start at 1.
    pub fn new(page: Option<u32>, page_size: Option<u32>, limits: PageLimits) -> AppResult<Self> {
        let page = page.unwrap_or(1);
        if page == 0 {
            return Err(AppError::Validation("page must be at least 1".to_owned()));
        }

        let page_size = match page_size {
            None | Some(0) => limits.default_size,
            Some(size) => size.min(limits.max_size),
        };

        Ok(Self { page, page_size })
    }

    /// First page with the given size.
    #[must_use]
    pub fn first(page_size: u32) -> Self {
        Self {
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Returns the 1-based page number.
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Returns the page size.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Number of rows skipped before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }

    /// The page after this one.
    #[must_use]
    pub fn next(&self) -> Self {
        Self {
            page: self.page.saturating_add(1),
            page_size: self.page_size,
        }
    }
}

/// One page of results plus the total match count.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Items of this page.
    pub items: Vec<T>,
    /// Total number of matching items across all pages.
    pub total: u64,
    /// The request that produced this page.
    pub request: PageRequest,
}

impl<T> Page<T> {
    /// Slices an in-memory, already ordered collection.
    #[must_use]
    pub fn from_ordered(items: Vec<T>, request: PageRequest) -> Self {
        let total = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let items = items
            .into_iter()
            .skip(offset)
            .take(request.page_size() as usize)
            .collect();

        Self {
            items,
            total,
            request,
        }
    }

    /// Whether pages after this one contain items.
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.request.offset() + (self.items.len() as u64) < self.total
    }

    /// Maps page items while keeping the metadata.
    #[must_use]
    pub fn map<U>(self, mapper: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(mapper).collect(),
            total: self.total,
            request: self.request,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Page, PageLimits, PageRequest};

    #[test]
    fn defaults_and_clamping() {
        let request = PageRequest::new(None, None, PageLimits::LARGE);
        assert_eq!(request.ok().map(|request| request.page_size()), Some(500));

        let request = PageRequest::new(Some(2), Some(5_000), PageLimits::STANDARD);
        assert_eq!(
            request.ok().map(|request| (request.page(), request.page_size())),
            Some((2, 200))
        );

        assert!(PageRequest::new(Some(0), None, PageLimits::LARGE).is_err());
    }

    #[test]
    fn slicing_reports_total_and_next() {
        let request = PageRequest::new(Some(2), Some(2), PageLimits::STANDARD)
            .unwrap_or(PageRequest::first(2));
        let page = Page::from_ordered(vec![1, 2, 3, 4, 5], request);

        assert_eq!(page.items, vec![3, 4]);
        assert_eq!(page.total, 5);
        assert!(page.has_next());
        assert!(!Page::from_ordered(vec![1, 2, 3, 4, 5], request.next().next()).has_next());
    }
}
