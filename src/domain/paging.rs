//! Paging for the pull operations
//!
//! Paged requests take `page`, `size` and `sortOrder` from the query string;
//! paged responses flatten Spring style page metadata next to `content`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 2000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

/// Paging options of a single request. All fields are optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageParams {
    pub page: Option<u32>,
    pub size: Option<u32>,
    pub sort_order: Vec<SortOrder>,
}

impl PageParams {
    /// Parse `page`, `size` and `sortOrder` from query parameters.
    ///
    /// Malformed values are logged and ignored; they never fail a request.
    /// `sortOrder` accepts `field[,asc|desc]` entries separated by `;`.
    pub fn from_query(query: &HashMap<String, String>) -> Self {
        let page = query.get("page").and_then(|v| match v.trim().parse::<u32>() {
            Ok(page) => Some(page),
            Err(_) => {
                warn!(value = %v, "Ignoring malformed 'page' query parameter");
                None
            }
        });

        let size = query.get("size").and_then(|v| match v.trim().parse::<u32>() {
            Ok(size) if size > 0 => Some(size.min(MAX_PAGE_SIZE)),
            _ => {
                warn!(value = %v, "Ignoring malformed 'size' query parameter");
                None
            }
        });

        let sort_order = query
            .get("sortOrder")
            .map(|v| parse_sort_order(v))
            .unwrap_or_default();

        Self {
            page,
            size,
            sort_order,
        }
    }

    pub fn page(&self) -> u32 {
        self.page.unwrap_or(0)
    }

    pub fn size(&self) -> u32 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn is_empty(&self) -> bool {
        self.page.is_none() && self.size.is_none() && self.sort_order.is_empty()
    }
}

fn parse_sort_order(raw: &str) -> Vec<SortOrder> {
    raw.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let mut parts = entry.splitn(2, ',');
            let field = parts.next()?.trim();
            if field.is_empty() {
                return None;
            }
            let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
                None => SortDirection::Asc,
                Some(d) if d == "asc" => SortDirection::Asc,
                Some(d) if d == "desc" => SortDirection::Desc,
                Some(d) => {
                    warn!(direction = %d, field, "Ignoring sort entry with unknown direction");
                    return None;
                }
            };
            Some(SortOrder {
                field: field.to_string(),
                direction,
            })
        })
        .collect()
}

/// One page of results
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub number: u32,
    pub size: u32,
    pub total_elements: u64,
    pub total_pages: u32,
    pub first: bool,
    pub last: bool,
    pub number_of_elements: u32,
}

impl<T> Page<T> {
    pub fn new(content: Vec<T>, number: u32, size: u32, total_elements: u64) -> Self {
        let total_pages = if size == 0 {
            0
        } else {
            u32::try_from(total_elements.div_ceil(u64::from(size))).unwrap_or(u32::MAX)
        };
        let number_of_elements = u32::try_from(content.len()).unwrap_or(u32::MAX);
        Self {
            content,
            number,
            size,
            total_elements,
            total_pages,
            first: number == 0,
            last: number.saturating_add(1) >= total_pages,
            number_of_elements,
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), 0, DEFAULT_PAGE_SIZE, 0)
    }

    /// Cut the requested page out of a complete result list.
    pub fn paginate(items: Vec<T>, params: &PageParams) -> Self {
        let total = items.len() as u64;
        let size = params.size();
        let number = params.page();
        let skip = (number as usize).saturating_mul(size as usize);
        let content = items.into_iter().skip(skip).take(size as usize).collect();
        Self::new(content, number, size, total)
    }
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn parses_paging_parameters() {
        let params = PageParams::from_query(&query(&[
            ("page", "2"),
            ("size", "50"),
            ("sortOrder", "EvseID,desc;lastUpdate"),
        ]));
        assert_eq!(params.page, Some(2));
        assert_eq!(params.size, Some(50));
        assert_eq!(params.sort_order.len(), 2);
        assert_eq!(params.sort_order[0].direction, SortDirection::Desc);
        assert_eq!(params.sort_order[1].direction, SortDirection::Asc);
    }

    #[test]
    fn malformed_values_are_ignored() {
        let params = PageParams::from_query(&query(&[
            ("page", "two"),
            ("size", "0"),
            ("sortOrder", ",desc;x,sideways"),
        ]));
        assert!(params.is_empty());
    }

    #[test]
    fn size_is_capped() {
        let params = PageParams::from_query(&query(&[("size", "100000")]));
        assert_eq!(params.size(), MAX_PAGE_SIZE);
    }

    #[test]
    fn paginate_slices_and_counts() {
        let params = PageParams {
            page: Some(1),
            size: Some(3),
            sort_order: Vec::new(),
        };
        let page = Page::paginate((0..7).collect::<Vec<_>>(), &params);
        assert_eq!(page.content, vec![3, 4, 5]);
        assert_eq!(page.total_elements, 7);
        assert_eq!(page.total_pages, 3);
        assert!(!page.first);
        assert!(!page.last);
        assert_eq!(page.number_of_elements, 3);
    }

    #[test]
    fn page_beyond_the_end_is_empty_and_last() {
        let params = PageParams {
            page: Some(u32::MAX),
            size: None,
            sort_order: Vec::new(),
        };
        let page = Page::<u8>::paginate(vec![1, 2, 3], &params);
        assert!(page.content.is_empty());
        assert_eq!(page.number, u32::MAX);
        assert_eq!(page.total_pages, 1);
        assert!(!page.first);
        assert!(page.last);
    }

    #[test]
    fn total_pages_saturates() {
        let page: Page<u8> = Page::new(Vec::new(), 0, 1, u64::MAX);
        assert_eq!(page.total_pages, u32::MAX);
        assert!(!page.last);
    }

    #[test]
    fn empty_page_is_first_and_last() {
        let page: Page<u8> = Page::empty();
        assert!(page.first);
        assert!(page.last);
        assert_eq!(page.total_pages, 0);
    }
}
