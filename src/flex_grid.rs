//! A paginated grid that flexes with its container.
//!
//! Combines [`GridLayout`] (how many cells fit and where) with a [`Paginator`]
//! (which items are on screen) and a selection cursor for keyboard browsing.

use crate::grid::{CellBounds, Coord, GridLayout};
use crate::paginator::Paginator;

/// One visible item and the slot it is drawn in.
#[derive(Debug)]
pub struct Placement<'a, T> {
  /// Index into the full item list.
  pub index: usize,
  pub item: &'a T,
  pub coord: Coord,
}

#[derive(Debug, Clone)]
pub struct FlexibleGrid<T> {
  layout: GridLayout,
  pages: Paginator<T>,
  selected: Option<usize>,
}

impl<T> FlexibleGrid<T> {
  pub fn new(cell: CellBounds) -> Self {
    let mut layout = GridLayout::new();
    layout.set_cell_bounds(cell.width, cell.height, cell.spacing_x, cell.spacing_y);
    Self { layout, pages: Paginator::new(0), selected: None }
  }

  /// Swap the cell size, keeping items and selection.
  pub fn set_cell_bounds(&mut self, cell: CellBounds) {
    if self.layout.cell_bounds() == cell {
      return;
    }
    self.layout.set_cell_bounds(cell.width, cell.height, cell.spacing_x, cell.spacing_y);
    self.sync_page_size();
  }

  /// Fit the grid to a new container size. Cheap when nothing changed, so it
  /// can be called on every frame.
  pub fn resize(&mut self, width: f64, height: f64) {
    let bounds = self.layout.grid_bounds();
    if bounds.x == 0.0 && bounds.y == 0.0 && bounds.width == width && bounds.height == height {
      return;
    }
    self.layout.set_grid_bounds(0.0, 0.0, width, height);
    self.sync_page_size();
  }

  fn sync_page_size(&mut self) {
    self.pages.set_page_size(self.layout.cells());
    if let Some(sel) = self.selected {
      self.pages.show_index(sel);
    }
  }

  pub fn layout(&self) -> &GridLayout {
    &self.layout
  }

  pub fn add_item(&mut self, item: T) {
    self.pages.add_item(item);
    if self.selected.is_none() {
      self.selected = Some(0);
    }
  }

  /// Replace all items, go back to the first page and select the first item.
  pub fn set_items(&mut self, items: Vec<T>) {
    self.selected = if items.is_empty() { None } else { Some(0) };
    self.pages.set_items(items);
  }

  pub fn clear(&mut self) {
    self.pages.clear();
    self.selected = None;
  }

  pub fn items(&self) -> &[T] {
    self.pages.items()
  }

  pub fn len(&self) -> usize {
    self.pages.len()
  }

  pub fn is_empty(&self) -> bool {
    self.pages.is_empty()
  }

  pub fn next_page(&mut self) -> bool {
    let moved = self.pages.next_page();
    if moved {
      self.selected = Some(self.pages.current_index());
    }
    moved
  }

  pub fn prev_page(&mut self) -> bool {
    let moved = self.pages.prev_page();
    if moved {
      self.selected = Some(self.pages.current_index());
    }
    moved
  }

  pub fn has_prev(&self) -> bool {
    self.pages.has_prev()
  }

  pub fn has_next(&self) -> bool {
    self.pages.has_next()
  }

  pub fn total_pages(&self) -> usize {
    self.pages.total_pages()
  }

  pub fn current_page(&self) -> usize {
    self.pages.current_page()
  }

  /// Visible items paired with their slot coordinates, in slot order.
  pub fn placements(&self) -> Vec<Placement<'_, T>> {
    let items = self.pages.items();
    self
      .pages
      .visible_range()
      .zip(self.layout.coords())
      .map(|(index, &coord)| Placement { index, item: &items[index], coord })
      .collect()
  }

  pub fn selected(&self) -> Option<usize> {
    self.selected
  }

  pub fn selected_item(&self) -> Option<&T> {
    self.selected.and_then(|i| self.pages.get(i))
  }

  /// Move the selection by `delta` items (±1 across a row, ±cols down a column),
  /// clamped to the list. Pages along when the selection leaves the screen.
  pub fn select_offset(&mut self, delta: isize) {
    if self.pages.is_empty() {
      return;
    }
    let current = self.selected.unwrap_or(0) as isize;
    let last = self.pages.len() as isize - 1;
    let next = (current + delta).clamp(0, last) as usize;
    self.selected = Some(next);
    if !self.pages.visible_range().contains(&next) {
      self.pages.show_index(next);
    }
  }

  /// Select the item at `index` (clamped), paging to it if needed.
  pub fn select(&mut self, index: usize) {
    let current = self.selected.unwrap_or(0) as isize;
    self.select_offset(index as isize - current);
  }

  /// Move the selection one row up (`-1`) or down (`1`).
  pub fn select_row(&mut self, rows: isize) {
    let cols = self.layout.cols().max(1) as isize;
    self.select_offset(rows * cols);
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  /// 3 columns x 2 rows of 10x10 cells with 1-unit gutters.
  fn grid_with(n: usize) -> FlexibleGrid<usize> {
    let mut grid = FlexibleGrid::new(CellBounds::new(10.0, 10.0, 1.0, 1.0));
    grid.resize(34.0, 23.0);
    for i in 0..n {
      grid.add_item(i);
    }
    grid
  }

  #[test]
  fn resize_sets_page_size_from_capacity() {
    let grid = grid_with(10);
    assert_eq!(grid.layout().cols(), 3);
    assert_eq!(grid.layout().rows(), 2);
    assert_eq!(grid.total_pages(), 2);
    assert_eq!(grid.placements().len(), 6);
  }

  #[test]
  fn placements_use_slot_coords_in_order() {
    let mut grid = grid_with(10);
    grid.next_page();
    let placements = grid.placements();
    assert_eq!(placements.len(), 4);
    assert_eq!(placements[0].index, 6);
    assert_eq!(*placements[0].item, 6);
    assert_eq!(placements[0].coord, grid.layout().coords()[0]);
    assert_eq!(placements[3].coord, grid.layout().coords()[3]);
  }

  #[test]
  fn paging_moves_selection_to_page_start() {
    let mut grid = grid_with(10);
    assert_eq!(grid.selected(), Some(0));
    assert!(grid.next_page());
    assert_eq!(grid.selected(), Some(6));
    assert!(!grid.next_page());
    assert!(grid.prev_page());
    assert_eq!(grid.selected(), Some(0));
  }

  #[test]
  fn selection_follows_across_pages() {
    let mut grid = grid_with(10);
    grid.select_offset(5);
    assert_eq!(grid.current_page(), 1);
    grid.select_offset(1);
    assert_eq!(grid.selected(), Some(6));
    assert_eq!(grid.current_page(), 2);
    grid.select_offset(-1);
    assert_eq!(grid.current_page(), 1);
  }

  #[test]
  fn selection_is_clamped() {
    let mut grid = grid_with(4);
    grid.select_offset(-3);
    assert_eq!(grid.selected(), Some(0));
    grid.select_offset(100);
    assert_eq!(grid.selected(), Some(3));
  }

  #[test]
  fn select_jumps_to_index() {
    let mut grid = grid_with(10);
    grid.select(8);
    assert_eq!(grid.selected(), Some(8));
    assert_eq!(grid.current_page(), 2);
    grid.select(2);
    assert_eq!(grid.current_page(), 1);
    grid.select(50);
    assert_eq!(grid.selected(), Some(9));
  }

  #[test]
  fn select_row_moves_by_column_count() {
    let mut grid = grid_with(10);
    grid.select_row(1);
    assert_eq!(grid.selected(), Some(3));
    grid.select_row(1);
    assert_eq!(grid.selected(), Some(6));
    assert_eq!(grid.current_page(), 2);
  }

  #[test]
  fn shrinking_keeps_selection_visible() {
    let mut grid = grid_with(10);
    grid.select_offset(5);
    grid.resize(34.0, 12.0);
    assert_eq!(grid.layout().cells(), 3);
    assert!(grid.placements().iter().any(|p| p.index == 5));
  }

  #[test]
  fn too_small_container_shows_nothing() {
    let mut grid = grid_with(5);
    grid.resize(5.0, 5.0);
    assert!(grid.placements().is_empty());
    assert_eq!(grid.total_pages(), 0);
    assert!(!grid.next_page());
  }

  #[test]
  fn clear_drops_items_and_selection() {
    let mut grid = grid_with(10);
    grid.next_page();
    grid.clear();
    assert!(grid.is_empty());
    assert_eq!(grid.selected(), None);
    assert_eq!(grid.current_page(), 0);
  }

  #[test]
  fn set_items_selects_first() {
    let mut grid = grid_with(10);
    grid.next_page();
    grid.set_items(vec![7, 8]);
    assert_eq!(grid.selected_item(), Some(&7));
    assert!(!grid.has_prev());
  }
}
