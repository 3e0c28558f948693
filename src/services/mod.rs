//! Domain services. Each service owns its SQL and defines its own error
//! enum; handlers convert those errors into the wire envelope.

pub mod auth_service;
pub mod detection_log_service;
pub mod detection_service;
pub mod favorite_service;
pub mod medicine_service;
pub mod member_service;
pub mod search_service;

/// Rows per page on every paged listing (favorites, detection logs, search).
pub const PAGE_SIZE: i64 = 6;

/// Total page count for a 1-based paged listing.
pub(crate) fn total_pages(total: i64) -> i64 {
    (total + PAGE_SIZE - 1) / PAGE_SIZE
}

/// True when `page` falls outside 1..=total_pages.
pub(crate) fn page_out_of_range(page: i64, total_pages: i64) -> bool {
    page < 1 || page > total_pages
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(0), 0);
        assert_eq!(total_pages(1), 1);
        assert_eq!(total_pages(6), 1);
        assert_eq!(total_pages(7), 2);
        assert_eq!(total_pages(12), 2);
        assert_eq!(total_pages(13), 3);
    }

    #[test]
    fn page_range_check() {
        assert!(page_out_of_range(0, 2));
        assert!(page_out_of_range(3, 2));
        assert!(!page_out_of_range(1, 2));
        assert!(!page_out_of_range(2, 2));
    }
}
