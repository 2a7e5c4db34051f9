//! Fixed-cell grid layout.
//!
//! Fits as many fixed-size cells as possible inside a container rectangle and
//! produces the top-left coordinate of every slot in row-major order. The whole
//! layout is recomputed whenever either set of bounds changes.

/// Replace NaN/infinite inputs with `1.0`, matching what a layout must do with
/// unmeasured containers: produce *some* grid rather than fail.
fn finite_or_one(value: f64) -> f64 {
  if value.is_finite() { value } else { 1.0 }
}

/// Outer rectangle available for layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBounds {
  pub x: f64,
  pub y: f64,
  pub width: f64,
  pub height: f64,
}

impl Default for GridBounds {
  fn default() -> Self {
    Self { x: 1.0, y: 1.0, width: 1.0, height: 1.0 }
  }
}

/// Fixed per-cell box plus the gutters between cells.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellBounds {
  pub width: f64,
  pub height: f64,
  pub spacing_x: f64,
  pub spacing_y: f64,
}

impl CellBounds {
  pub fn new(width: f64, height: f64, spacing_x: f64, spacing_y: f64) -> Self {
    Self {
      width: finite_or_one(width),
      height: finite_or_one(height),
      spacing_x: finite_or_one(spacing_x),
      spacing_y: finite_or_one(spacing_y),
    }
  }
}

impl Default for CellBounds {
  fn default() -> Self {
    Self { width: 1.0, height: 1.0, spacing_x: 1.0, spacing_y: 1.0 }
  }
}

/// Top-left position of one grid slot, relative to the grid origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coord {
  pub x: f64,
  pub y: f64,
}

#[derive(Debug, Clone)]
pub struct GridLayout {
  grid: GridBounds,
  cell: CellBounds,
  /// Center the columns inside the leftover horizontal space.
  pub center_align_x: bool,
  /// Center the rows inside the leftover vertical space.
  pub center_align_y: bool,
  rows: usize,
  cols: usize,
  coords: Vec<Coord>,
}

impl Default for GridLayout {
  fn default() -> Self {
    Self::new()
  }
}

impl GridLayout {
  pub fn new() -> Self {
    let mut layout = Self {
      grid: GridBounds::default(),
      cell: CellBounds::default(),
      center_align_x: true,
      center_align_y: true,
      rows: 0,
      cols: 0,
      coords: Vec::new(),
    };
    layout.recompute();
    layout
  }

  /// Set the outer rectangle and recompute every slot.
  pub fn set_grid_bounds(&mut self, x: f64, y: f64, width: f64, height: f64) {
    self.grid = GridBounds {
      x: finite_or_one(x),
      y: finite_or_one(y),
      width: finite_or_one(width),
      height: finite_or_one(height),
    };
    self.recompute();
  }

  /// Set the fixed cell box and gutters and recompute every slot.
  pub fn set_cell_bounds(&mut self, width: f64, height: f64, spacing_x: f64, spacing_y: f64) {
    self.cell = CellBounds::new(width, height, spacing_x, spacing_y);
    self.recompute();
  }

  pub fn set_center_align(&mut self, x: bool, y: bool) {
    self.center_align_x = x;
    self.center_align_y = y;
    self.recompute();
  }

  pub fn grid_bounds(&self) -> GridBounds {
    self.grid
  }

  pub fn cell_bounds(&self) -> CellBounds {
    self.cell
  }

  pub fn rows(&self) -> usize {
    self.rows
  }

  pub fn cols(&self) -> usize {
    self.cols
  }

  /// Total visible capacity (`rows * cols`).
  pub fn cells(&self) -> usize {
    self.rows * self.cols
  }

  /// Slot coordinates in row-major order; always `cells()` long.
  pub fn coords(&self) -> &[Coord] {
    &self.coords
  }

  /// Slot `index` offset by the grid origin, for callers placing cells on an
  /// absolute surface.
  pub fn absolute(&self, index: usize) -> Option<Coord> {
    self.coords.get(index).map(|c| Coord { x: self.grid.x + c.x, y: self.grid.y + c.y })
  }

  fn recompute(&mut self) {
    let (cols, start_x, step_x) =
      axis(self.grid.width, self.cell.width, self.cell.spacing_x, self.center_align_x);
    let (rows, start_y, step_y) =
      axis(self.grid.height, self.cell.height, self.cell.spacing_y, self.center_align_y);

    self.cols = cols;
    self.rows = rows;
    self.coords.clear();
    self.coords.reserve(rows * cols);
    for row in 0..rows {
      for col in 0..cols {
        self.coords.push(Coord { x: start_x + col as f64 * step_x, y: start_y + row as f64 * step_y });
      }
    }
  }
}

/// Solve one axis: how many cells fit, where the first one starts, and the
/// distance between consecutive cells.
fn axis(extent: f64, cell: f64, spacing: f64, center: bool) -> (usize, f64, f64) {
  let step = cell + spacing;
  if step <= 0.0 {
    return (0, 0.0, step);
  }
  let usable = extent - spacing;
  let count = (usable / step).floor().max(0.0);
  let leftover = usable - count * step;
  let start = if center { spacing + leftover * 0.5 } else { 0.0 };
  (count as usize, start, step)
}

#[cfg(test)]
mod tests {
  use super::*;
  use proptest::prelude::*;

  fn layout(w: f64, h: f64, cw: f64, ch: f64, sx: f64, sy: f64) -> GridLayout {
    let mut grid = GridLayout::new();
    grid.set_grid_bounds(0.0, 0.0, w, h);
    grid.set_cell_bounds(cw, ch, sx, sy);
    grid
  }

  #[test]
  fn episode_grid_dimensions() {
    let grid = layout(650.0, 400.0, 210.0, 180.0, 12.0, 55.0);
    assert_eq!(grid.cols(), 2);
    assert_eq!(grid.rows(), 1);
    assert_eq!(grid.cells(), 2);
    assert_eq!(grid.coords().len(), 2);
  }

  #[test]
  fn coords_are_centered_in_leftover_space() {
    let grid = layout(650.0, 400.0, 210.0, 180.0, 12.0, 55.0);
    // leftover x = (650 - 12) - 2 * 222 = 194, y = (400 - 55) - 235 = 110
    assert_eq!(grid.coords()[0], Coord { x: 12.0 + 97.0, y: 55.0 + 55.0 });
    assert_eq!(grid.coords()[1], Coord { x: 109.0 + 222.0, y: 110.0 });
  }

  #[test]
  fn coords_are_row_major() {
    let grid = layout(100.0, 100.0, 20.0, 20.0, 10.0, 10.0);
    assert_eq!(grid.cols(), 3);
    assert_eq!(grid.rows(), 3);
    let coords = grid.coords();
    assert_eq!(coords[1].y, coords[0].y);
    assert!(coords[1].x > coords[0].x);
    assert_eq!(coords[3].x, coords[0].x);
    assert!(coords[3].y > coords[0].y);
  }

  #[test]
  fn without_centering_grid_starts_at_origin() {
    let mut grid = layout(100.0, 100.0, 20.0, 20.0, 10.0, 10.0);
    grid.set_center_align(false, false);
    assert_eq!(grid.coords()[0], Coord { x: 0.0, y: 0.0 });
    assert_eq!(grid.coords()[1], Coord { x: 30.0, y: 0.0 });
  }

  #[test]
  fn zero_width_yields_no_cells() {
    let grid = layout(0.0, 400.0, 210.0, 180.0, 12.0, 55.0);
    assert_eq!(grid.cols(), 0);
    assert_eq!(grid.cells(), 0);
    assert!(grid.coords().is_empty());
  }

  #[test]
  fn container_smaller_than_one_cell_is_empty() {
    let grid = layout(200.0, 400.0, 210.0, 180.0, 12.0, 55.0);
    assert_eq!(grid.cols(), 0);
    assert!(grid.coords().is_empty());
  }

  #[test]
  fn non_finite_inputs_default_to_one() {
    let mut grid = GridLayout::new();
    grid.set_grid_bounds(f64::NAN, 2.0, f64::INFINITY, 10.0);
    assert_eq!(grid.grid_bounds(), GridBounds { x: 1.0, y: 2.0, width: 1.0, height: 10.0 });
    grid.set_cell_bounds(f64::NAN, 3.0, 1.0, f64::NEG_INFINITY);
    assert_eq!(grid.cell_bounds(), CellBounds { width: 1.0, height: 3.0, spacing_x: 1.0, spacing_y: 1.0 });
  }

  #[test]
  fn absolute_offsets_by_origin() {
    let mut grid = layout(100.0, 100.0, 20.0, 20.0, 10.0, 10.0);
    grid.set_grid_bounds(5.0, 7.0, 100.0, 100.0);
    let rel = grid.coords()[0];
    assert_eq!(grid.absolute(0), Some(Coord { x: rel.x + 5.0, y: rel.y + 7.0 }));
    assert_eq!(grid.absolute(grid.cells()), None);
  }

  #[test]
  fn recompute_replaces_previous_coords() {
    let mut grid = layout(650.0, 400.0, 210.0, 180.0, 12.0, 55.0);
    grid.set_grid_bounds(0.0, 0.0, 1000.0, 700.0);
    assert_eq!(grid.cols(), 4);
    assert_eq!(grid.rows(), 2);
    assert_eq!(grid.coords().len(), 8);
  }

  proptest! {
    #[test]
    fn coords_fill_capacity_inside_bounds(
      w in 1.0f64..2000.0,
      h in 1.0f64..2000.0,
      cw in 1.0f64..300.0,
      ch in 1.0f64..300.0,
      sx in 0.5f64..60.0,
      sy in 0.5f64..60.0,
    ) {
      let grid = layout(w, h, cw, ch, sx, sy);
      prop_assert_eq!(grid.coords().len(), grid.rows() * grid.cols());
      for c in grid.coords() {
        prop_assert!(c.x >= 0.0 && c.x < w);
        prop_assert!(c.y >= 0.0 && c.y < h);
      }
    }
  }
}
