use std::ops::Range;

/// Page-at-a-time view over an ordered item list.
///
/// `current_index` moves in whole pages, so it is always a multiple of the page
/// size and never past the start of the last page. A page size of zero is valid
/// and shows nothing; navigation is then a no-op.
#[derive(Debug, Clone)]
pub struct Paginator<T> {
  items: Vec<T>,
  current_index: usize,
  page_size: usize,
}

impl<T> Default for Paginator<T> {
  fn default() -> Self {
    Self::new(0)
  }
}

impl<T> Paginator<T> {
  pub fn new(page_size: usize) -> Self {
    Self { items: Vec::new(), current_index: 0, page_size }
  }

  pub fn items(&self) -> &[T] {
    &self.items
  }

  pub fn len(&self) -> usize {
    self.items.len()
  }

  pub fn is_empty(&self) -> bool {
    self.items.is_empty()
  }

  pub fn get(&self, index: usize) -> Option<&T> {
    self.items.get(index)
  }

  pub fn current_index(&self) -> usize {
    self.current_index
  }

  pub fn page_size(&self) -> usize {
    self.page_size
  }

  /// Change the page capacity. The current index snaps down to a page boundary
  /// of the new size so the first visible item stays on screen.
  pub fn set_page_size(&mut self, page_size: usize) {
    if page_size == self.page_size {
      return;
    }
    self.page_size = page_size;
    if page_size == 0 {
      self.current_index = 0;
      return;
    }
    self.current_index = (self.current_index / page_size) * page_size;
  }

  /// Append to the end of the list. Never moves the current page.
  pub fn add_item(&mut self, item: T) {
    self.items.push(item);
  }

  /// Replace every item and return to the first page.
  pub fn set_items(&mut self, items: Vec<T>) {
    self.items = items;
    self.current_index = 0;
  }

  pub fn clear(&mut self) {
    self.items.clear();
    self.current_index = 0;
  }

  /// Advance one page. Returns whether the page moved.
  pub fn next_page(&mut self) -> bool {
    if self.page_size == 0 || self.is_last_page() {
      return false;
    }
    self.current_index += self.page_size;
    true
  }

  /// Go back one page. Returns whether the page moved.
  pub fn prev_page(&mut self) -> bool {
    if self.is_first_page() {
      return false;
    }
    self.current_index = self.current_index.saturating_sub(self.page_size);
    true
  }

  /// Jump to the page containing `index`.
  pub fn show_index(&mut self, index: usize) {
    if self.page_size == 0 || index >= self.items.len() {
      return;
    }
    self.current_index = (index / self.page_size) * self.page_size;
  }

  /// Indices currently on screen, clipped to the list length.
  pub fn visible_range(&self) -> Range<usize> {
    let start = self.current_index.min(self.items.len());
    let end = (self.current_index + self.page_size).min(self.items.len());
    start..end
  }

  pub fn visible(&self) -> &[T] {
    &self.items[self.visible_range()]
  }

  pub fn is_first_page(&self) -> bool {
    self.current_index == 0
  }

  pub fn is_last_page(&self) -> bool {
    self.current_index + self.page_size >= self.items.len()
  }

  pub fn has_prev(&self) -> bool {
    !self.is_first_page()
  }

  pub fn has_next(&self) -> bool {
    !self.is_last_page()
  }

  /// `ceil(len / page_size)`, zero when nothing fits on a page.
  pub fn total_pages(&self) -> usize {
    if self.page_size == 0 { 0 } else { self.items.len().div_ceil(self.page_size) }
  }

  /// 1-based page number, zero when there is nothing to show.
  pub fn current_page(&self) -> usize {
    if self.page_size == 0 || self.items.is_empty() { 0 } else { self.current_index / self.page_size + 1 }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn paged(n: usize, page_size: usize) -> Paginator<usize> {
    let mut p = Paginator::new(page_size);
    for i in 0..n {
      p.add_item(i);
    }
    p
  }

  // --- navigation ---

  #[test]
  fn next_page_advances_by_page_size() {
    let mut p = paged(10, 4);
    assert!(p.next_page());
    assert_eq!(p.current_index(), 4);
    assert_eq!(p.visible_range(), 4..8);
  }

  #[test]
  fn next_page_stops_on_last_page() {
    let mut p = paged(10, 4);
    assert!(p.next_page());
    assert!(p.next_page());
    assert_eq!(p.visible_range(), 8..10);
    assert!(!p.next_page());
    assert_eq!(p.current_index(), 8);
  }

  #[test]
  fn prev_page_at_start_is_noop() {
    let mut p = paged(10, 4);
    assert!(!p.prev_page());
    assert_eq!(p.current_index(), 0);
  }

  #[test]
  fn next_then_prev_round_trips() {
    let mut p = paged(20, 3);
    p.next_page();
    let before = p.current_index();
    assert!(p.next_page());
    assert!(p.prev_page());
    assert_eq!(p.current_index(), before);
  }

  #[test]
  fn exact_multiple_has_no_trailing_page() {
    let mut p = paged(8, 4);
    assert!(p.next_page());
    assert!(p.is_last_page());
    assert!(!p.next_page());
    assert_eq!(p.total_pages(), 2);
  }

  // --- boundaries ---

  #[test]
  fn boundary_queries() {
    let mut p = paged(5, 2);
    assert!(p.is_first_page());
    assert!(!p.has_prev());
    assert!(p.has_next());
    p.next_page();
    p.next_page();
    assert!(p.is_last_page());
    assert!(p.has_prev());
    assert!(!p.has_next());
  }

  #[test]
  fn add_item_can_enable_next_without_moving() {
    let mut p = paged(4, 4);
    assert!(p.is_last_page());
    p.add_item(4);
    assert!(p.has_next());
    assert_eq!(p.current_index(), 0);
  }

  #[test]
  fn clear_resets_to_first_page() {
    let mut p = paged(10, 4);
    p.next_page();
    p.clear();
    assert_eq!(p.current_index(), 0);
    assert_eq!(p.visible_range(), 0..0);
    assert!(p.is_empty());
  }

  #[test]
  fn visible_range_is_clipped() {
    let p = paged(3, 10);
    assert_eq!(p.visible_range(), 0..3);
    assert_eq!(p.visible(), &[0, 1, 2]);
  }

  // --- page size ---

  #[test]
  fn zero_page_size_shows_nothing() {
    let mut p = paged(5, 0);
    assert_eq!(p.visible_range(), 0..0);
    assert!(!p.next_page());
    assert!(!p.prev_page());
    assert_eq!(p.total_pages(), 0);
    assert_eq!(p.current_page(), 0);
  }

  #[test]
  fn shrinking_page_size_keeps_alignment() {
    let mut p = paged(20, 6);
    p.next_page();
    p.next_page();
    assert_eq!(p.current_index(), 12);
    p.set_page_size(5);
    assert_eq!(p.current_index(), 10);
    assert_eq!(p.current_index() % p.page_size(), 0);
  }

  #[test]
  fn growing_page_size_clamps_to_last_page() {
    let mut p = paged(10, 3);
    p.next_page();
    p.next_page();
    p.next_page();
    assert_eq!(p.current_index(), 9);
    p.set_page_size(8);
    assert_eq!(p.current_index(), 8);
    assert_eq!(p.visible_range(), 8..10);
  }

  #[test]
  fn show_index_jumps_to_containing_page() {
    let mut p = paged(10, 4);
    p.show_index(9);
    assert_eq!(p.current_index(), 8);
    p.show_index(1);
    assert_eq!(p.current_index(), 0);
  }

  #[test]
  fn current_page_is_one_based() {
    let mut p = paged(10, 4);
    assert_eq!(p.current_page(), 1);
    p.next_page();
    assert_eq!(p.current_page(), 2);
    assert_eq!(p.total_pages(), 3);
  }

  #[test]
  fn set_items_returns_to_first_page() {
    let mut p = paged(10, 4);
    p.next_page();
    p.set_items(vec![1, 2, 3, 4, 5]);
    assert_eq!(p.current_index(), 0);
    assert_eq!(p.len(), 5);
  }
}
