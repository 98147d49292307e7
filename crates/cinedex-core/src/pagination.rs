//! Pagination window generator.

/// Default number of page buttons shown at once.
pub const DEFAULT_MAX_VISIBLE: u32 = 5;

/// Returns the contiguous run of page numbers to display around `page`.
///
/// The window is centered on `page` where possible and shifted to stay
/// within `1..=total_pages` near either edge. Its length is
/// `min(max_visible, total_pages)`, and it is empty when either is zero.
/// A `page` outside `1..=total_pages` is clamped first.
#[must_use]
pub fn page_window(page: u32, total_pages: u32, max_visible: u32) -> Vec<u32> {
    if max_visible == 0 || total_pages == 0 {
        return Vec::new();
    }
    let page = page.clamp(1, total_pages);
    let span = max_visible.saturating_sub(1);
    let mut start = page.saturating_sub(max_visible / 2).max(1);
    let end = total_pages.min(start.saturating_add(span));
    if end.saturating_sub(start) < span {
        start = end.saturating_sub(span).max(1);
    }
    (start..=end).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_at_first_page() {
        // Arrange & Act & Assert
        assert_eq!(page_window(1, 10, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_at_last_page() {
        // Arrange & Act & Assert
        assert_eq!(page_window(10, 10, 5), vec![6, 7, 8, 9, 10]);
    }

    #[test]
    fn test_window_centered() {
        // Arrange & Act & Assert
        assert_eq!(page_window(5, 10, 5), vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_window_fewer_pages_than_slots() {
        // Arrange & Act & Assert
        assert_eq!(page_window(3, 4, 5), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_window_single_page() {
        // Arrange & Act & Assert
        assert_eq!(page_window(1, 1, 5), vec![1]);
    }

    #[test]
    fn test_window_even_max_visible() {
        // Arrange & Act & Assert
        assert_eq!(page_window(5, 10, 4), vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_window_out_of_range_page_is_clamped() {
        // Arrange & Act & Assert
        assert_eq!(page_window(20, 10, 5), vec![6, 7, 8, 9, 10]);
        assert_eq!(page_window(0, 10, 5), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_window_degenerate_inputs_are_empty() {
        // Arrange & Act & Assert
        assert!(page_window(1, 10, 0).is_empty());
        assert!(page_window(1, 0, 5).is_empty());
    }

    #[test]
    fn test_window_properties_hold_for_all_pages() {
        for total in 1..=40_u32 {
            for page in 1..=total {
                // Act
                let window = page_window(page, total, DEFAULT_MAX_VISIBLE);

                // Assert
                let expected_len = usize::try_from(total.min(DEFAULT_MAX_VISIBLE)).unwrap_or(0);
                assert_eq!(window.len(), expected_len, "page={page} total={total}");
                assert!(window.contains(&page), "page={page} total={total}");
                let contiguous = window
                    .windows(2)
                    .all(|pair| pair.first().and_then(|a| a.checked_add(1)) == pair.get(1).copied());
                assert!(contiguous, "not contiguous: {window:?}");
                assert!(window.iter().all(|&p| (1..=total).contains(&p)));
            }
        }
    }
}
