//! Tests for `paginate` module

use super::paginate::*;

#[test]
fn test_paginate_first_and_middle_pages() {
    // Arrange
    let items: Vec<u32> = (1..=30).collect();

    // Act & Assert
    assert_eq!(paginate(&items, 1, 10), &items[0..10]);
    assert_eq!(paginate(&items, 2, 10), &items[10..20]);
}

#[test]
fn test_paginate_last_partial_page() {
    // Arrange
    let items: Vec<u32> = (1..=27).collect();

    // Act
    let page = paginate(&items, 2, 25);

    // Assert
    assert_eq!(page, &[26, 27]);
}

#[test]
fn test_paginate_out_of_range_is_empty_not_clamped() {
    // Arrange
    let items: Vec<u32> = (1..=5).collect();

    // Act & Assert
    assert!(paginate(&items, 2, 10).is_empty());
    assert!(paginate(&items, 99, 1).is_empty());
}

#[test]
fn test_paginate_page_zero_is_first_page() {
    let items = [1, 2, 3];
    assert_eq!(paginate(&items, 0, 2), &[1, 2]);
}

#[test]
fn test_paginate_zero_per_page_is_empty() {
    let items = [1, 2, 3];
    assert!(paginate(&items, 1, 0).is_empty());
}

#[test]
fn test_total_pages() {
    assert_eq!(total_pages(0, 25), 0);
    assert_eq!(total_pages(1, 25), 1);
    assert_eq!(total_pages(25, 25), 1);
    assert_eq!(total_pages(26, 25), 2);
    assert_eq!(total_pages(100, 10), 10);
    assert_eq!(total_pages(5, 0), 0);
}

#[test]
fn test_page_window_showing_range() {
    // Arrange & Act
    let window = PageWindow::new(2, 25, 60);

    // Assert
    assert_eq!(window.start, 26);
    assert_eq!(window.end, 50);
    assert_eq!(window.total, 60);
    assert_eq!(window.total_pages, 3);
    assert!(window.has_prev());
    assert!(window.has_next());
}

#[test]
fn test_page_window_last_page() {
    // Arrange & Act
    let window = PageWindow::new(3, 25, 60);

    // Assert
    assert_eq!(window.start, 51);
    assert_eq!(window.end, 60);
    assert!(!window.has_next());
}

#[test]
fn test_page_window_empty_result() {
    // Arrange & Act
    let window = PageWindow::new(1, 25, 0);

    // Assert
    assert_eq!(window.start, 0);
    assert_eq!(window.end, 0);
    assert_eq!(window.total_pages, 0);
    assert!(!window.has_prev());
    assert!(!window.has_next());
}

#[test]
fn test_page_window_past_the_end_shows_nothing() {
    // Arrange & Act
    let window = PageWindow::new(5, 25, 10);

    // Assert
    assert_eq!(window.start, 0);
    assert_eq!(window.end, 0);
    assert_eq!(window.total, 10);
    assert_eq!(window.total_pages, 1);
    assert!(!window.has_next());
}

#[test]
fn test_page_size_defaults() {
    assert_eq!(PAGE_SIZES, [10, 25, 50, 100]);
    assert!(PAGE_SIZES.contains(&DEFAULT_PER_PAGE));
}
