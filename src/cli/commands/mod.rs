pub mod access;
pub mod auth;
pub mod home;
pub mod levels;
pub mod nav;
pub mod recipients;

/// Convert a 1-based `--page` flag to a page index
pub(crate) fn page_index(page: Option<u32>) -> u32 {
    page.unwrap_or(1).max(1) - 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_flag_is_one_based() {
        assert_eq!(page_index(None), 0);
        assert_eq!(page_index(Some(0)), 0);
        assert_eq!(page_index(Some(1)), 0);
        assert_eq!(page_index(Some(3)), 2);
    }
}
