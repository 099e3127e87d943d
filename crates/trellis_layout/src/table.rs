//! Grid-based space allocation
//!
//! A table distributes its box over rows and columns. Every track gets the
//! space its cells guarantee (their minimum under the current offer) plus a
//! share of what is left, split by weight. Because a cell's minimum can depend
//! on the offer (wrapped text gets shorter as it gets wider), the split is
//! re-negotiated until the free space stops changing or the iteration budget
//! runs out.

use crate::component::SpaceRequest;
use crate::error::{LayoutError, Result};
use crate::tree::ComponentId;

/// Extra weight given to tracks that still want space during negotiation
const WANTS_SPACE_BONUS: f32 = 0.1;

/// Weight fixed tracks get on the first offer so they start with some space
const FIXED_TRACK_HEURISTIC_WEIGHT: f32 = 0.5;

/// Table tuning
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TableConfig {
    /// Bound on negotiation passes; hitting it is accepted as final
    pub max_iterations: usize,
    pub row_padding: f32,
    pub col_padding: f32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_iterations: 5,
            row_padding: 0.0,
            col_padding: 0.0,
        }
    }
}

/// Outcome of one negotiation
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TableLayout {
    pub guaranteed_widths: Vec<f32>,
    pub guaranteed_heights: Vec<f32>,
    pub col_proportional: Vec<f32>,
    pub row_proportional: Vec<f32>,
    pub wants_width: bool,
    pub wants_height: bool,
    pub iterations: usize,
}

impl TableLayout {
    pub fn col_widths(&self) -> Vec<f32> {
        add(&self.guaranteed_widths, &self.col_proportional)
    }

    pub fn row_heights(&self) -> Vec<f32> {
        add(&self.guaranteed_heights, &self.row_proportional)
    }
}

/// A rectangular grid of optional cells
#[derive(Clone, Debug, Default)]
pub struct TableGrid {
    rows: Vec<Vec<Option<ComponentId>>>,
    row_weights: Vec<Option<f32>>,
    col_weights: Vec<Option<f32>>,
    config: TableConfig,
}

impl TableGrid {
    /// Build a grid, padding short rows with empty cells
    pub fn new(mut rows: Vec<Vec<Option<ComponentId>>>, config: TableConfig) -> Self {
        let n_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
        for row in &mut rows {
            row.resize(n_cols, None);
        }
        Self {
            row_weights: vec![None; rows.len()],
            col_weights: vec![None; n_cols],
            rows,
            config,
        }
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    pub fn rows(&self) -> &[Vec<Option<ComponentId>>] {
        &self.rows
    }

    pub fn config(&self) -> &TableConfig {
        &self.config
    }

    pub fn cell(&self, row: usize, col: usize) -> Option<ComponentId> {
        self.rows.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    pub fn position(&self, id: ComponentId) -> Option<(usize, usize)> {
        self.rows.iter().enumerate().find_map(|(r, row)| {
            row.iter()
                .position(|cell| *cell == Some(id))
                .map(|c| (r, c))
        })
    }

    /// Place `id` at `(row, col)`, growing the grid as needed
    pub(crate) fn place(&mut self, row: usize, col: usize, id: ComponentId) -> Result<()> {
        self.grow(row + 1, col + 1);
        match self.rows[row][col] {
            Some(existing) if existing != id => Err(LayoutError::CellOccupied { row, col }),
            _ => {
                self.rows[row][col] = Some(id);
                Ok(())
            }
        }
    }

    /// Give `id` a row of its own at the top or bottom
    pub(crate) fn push_row(&mut self, id: ComponentId, prepend: bool) {
        let n_cols = self.n_cols().max(1);
        let mut row = vec![None; n_cols];
        row[0] = Some(id);
        if self.col_weights.len() < n_cols {
            self.col_weights.resize(n_cols, None);
        }
        for existing in &mut self.rows {
            existing.resize(n_cols, None);
        }
        if prepend {
            self.rows.insert(0, row);
            self.row_weights.insert(0, None);
        } else {
            self.rows.push(row);
            self.row_weights.push(None);
        }
    }

    /// Empty the cell holding `id`; the grid keeps its shape
    pub(crate) fn clear(&mut self, id: ComponentId) -> bool {
        match self.position(id) {
            Some((r, c)) => {
                self.rows[r][c] = None;
                true
            }
            None => false,
        }
    }

    pub(crate) fn set_row_weight(&mut self, row: usize, weight: Option<f32>) {
        self.grow(row + 1, 0);
        self.row_weights[row] = weight;
    }

    pub(crate) fn set_col_weight(&mut self, col: usize, weight: Option<f32>) {
        self.grow(0, col + 1);
        self.col_weights[col] = weight;
    }

    pub(crate) fn set_padding(&mut self, row_padding: f32, col_padding: f32) {
        self.config.row_padding = row_padding.max(0.0);
        self.config.col_padding = col_padding.max(0.0);
    }

    fn grow(&mut self, n_rows: usize, n_cols: usize) {
        let n_cols = n_cols.max(self.n_cols());
        while self.rows.len() < n_rows {
            self.rows.push(Vec::new());
            self.row_weights.push(None);
        }
        for row in &mut self.rows {
            row.resize(n_cols, None);
        }
        self.col_weights.resize(n_cols, None);
    }

    /// Space left for tracks once padding between them is taken out
    fn after_padding(&self, width: f32, height: f32) -> (f32, f32) {
        let col_gaps = self.n_cols().saturating_sub(1) as f32;
        let row_gaps = self.n_rows().saturating_sub(1) as f32;
        (
            width - self.config.col_padding * col_gaps,
            height - self.config.row_padding * row_gaps,
        )
    }

    /// Total padding between tracks
    pub fn padding_size(&self) -> (f32, f32) {
        let (w, h) = self.after_padding(0.0, 0.0);
        (-w, -h)
    }

    /// Negotiate track sizes for an offer of `width` x `height`.
    ///
    /// With `final_offer` set each cell's guarantee is capped by what it was
    /// offered, so components larger than the table get clipped.
    pub fn iterate_layout<M, F>(
        &self,
        width: f32,
        height: f32,
        final_offer: bool,
        mut measure: M,
        fixed: F,
    ) -> TableLayout
    where
        M: FnMut(ComponentId, f32, f32) -> SpaceRequest,
        F: Fn(ComponentId) -> (bool, bool),
    {
        let (n_rows, n_cols) = (self.n_rows(), self.n_cols());
        let (avail_w, avail_h) = self.after_padding(width, height);

        let mut fixed_cols = vec![true; n_cols];
        let mut fixed_rows = vec![true; n_rows];
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                if let Some(id) = cell {
                    let (fixed_w, fixed_h) = fixed(*id);
                    fixed_cols[c] &= fixed_w;
                    fixed_rows[r] &= fixed_h;
                }
            }
        }
        let col_weights = track_weights(&self.col_weights, &fixed_cols);
        let row_weights = track_weights(&self.row_weights, &fixed_rows);

        let heuristic = |w: &f32| {
            if *w == 0.0 {
                FIXED_TRACK_HEURISTIC_WEIGHT
            } else {
                *w
            }
        };
        let mut col_prop = proportional(&col_weights.iter().map(heuristic).collect::<Vec<_>>(), avail_w);
        let mut row_prop = proportional(&row_weights.iter().map(heuristic).collect::<Vec<_>>(), avail_h);

        let mut guarantees = Guarantees::zero(n_rows, n_cols);
        let mut last_free: Option<(f32, f32)> = None;
        let mut iterations = 0;

        loop {
            let offered_w = add(&guarantees.widths, &col_prop);
            let offered_h = add(&guarantees.heights, &row_prop);
            guarantees = self.determine_guarantees(&offered_w, &offered_h, final_offer, &mut measure);

            let free_w = avail_w - guarantees.widths.iter().sum::<f32>();
            let free_h = avail_h - guarantees.heights.iter().sum::<f32>();

            col_prop = proportional(&bonus_weights(&col_weights, &guarantees.wants_width), free_w);
            row_prop = proportional(&bonus_weights(&row_weights, &guarantees.wants_height), free_h);
            iterations += 1;

            let improves_w = free_w > 0.0 && last_free.map_or(true, |(w, _)| w != free_w);
            let improves_h = free_h > 0.0 && last_free.map_or(true, |(_, h)| h != free_h);
            last_free = Some((free_w, free_h));

            if !(improves_w || improves_h) {
                break;
            }
            if iterations >= self.config.max_iterations {
                tracing::debug!(iterations, "table layout did not converge; keeping last allocation");
                break;
            }
        }

        // Settle the leftover with the real weights, not the negotiation bonus.
        let free_w = avail_w - guarantees.widths.iter().sum::<f32>();
        let free_h = avail_h - guarantees.heights.iter().sum::<f32>();

        TableLayout {
            col_proportional: proportional(&col_weights, free_w),
            row_proportional: proportional(&row_weights, free_h),
            wants_width: guarantees.wants_width.iter().any(|w| *w),
            wants_height: guarantees.wants_height.iter().any(|h| *h),
            guaranteed_widths: guarantees.widths,
            guaranteed_heights: guarantees.heights,
            iterations,
        }
    }

    fn determine_guarantees<M>(
        &self,
        offered_w: &[f32],
        offered_h: &[f32],
        final_offer: bool,
        measure: &mut M,
    ) -> Guarantees
    where
        M: FnMut(ComponentId, f32, f32) -> SpaceRequest,
    {
        let mut g = Guarantees::zero(self.n_rows(), self.n_cols());
        for (r, row) in self.rows.iter().enumerate() {
            for (c, cell) in row.iter().enumerate() {
                let request = match cell {
                    Some(id) => measure(*id, offered_w[c], offered_h[r]),
                    None => SpaceRequest::ZERO,
                };
                let (w, h) = if final_offer {
                    (
                        request.min_width.min(offered_w[c]),
                        request.min_height.min(offered_h[r]),
                    )
                } else {
                    (request.min_width, request.min_height)
                };
                g.widths[c] = g.widths[c].max(w);
                g.heights[r] = g.heights[r].max(h);
                g.wants_width[c] |= request.min_width > offered_w[c];
                g.wants_height[r] |= request.min_height > offered_h[r];
            }
        }
        g
    }
}

struct Guarantees {
    widths: Vec<f32>,
    heights: Vec<f32>,
    wants_width: Vec<bool>,
    wants_height: Vec<bool>,
}

impl Guarantees {
    fn zero(n_rows: usize, n_cols: usize) -> Self {
        Self {
            widths: vec![0.0; n_cols],
            heights: vec![0.0; n_rows],
            wants_width: vec![false; n_cols],
            wants_height: vec![false; n_rows],
        }
    }
}

/// Explicit weight, else 1 for elastic tracks and 0 for fixed ones
fn track_weights(explicit: &[Option<f32>], fixed: &[bool]) -> Vec<f32> {
    fixed
        .iter()
        .enumerate()
        .map(|(i, is_fixed)| {
            explicit
                .get(i)
                .copied()
                .flatten()
                .unwrap_or(if *is_fixed { 0.0 } else { 1.0 })
        })
        .collect()
}

fn bonus_weights(weights: &[f32], wants: &[bool]) -> Vec<f32> {
    if !wants.iter().any(|w| *w) {
        return weights.to_vec();
    }
    weights
        .iter()
        .zip(wants)
        .map(|(w, want)| if *want { w + WANTS_SPACE_BONUS } else { *w })
        .collect()
}

fn proportional(weights: &[f32], space: f32) -> Vec<f32> {
    let total: f32 = weights.iter().sum();
    if total == 0.0 {
        return vec![0.0; weights.len()];
    }
    weights.iter().map(|w| space * w / total).collect()
}

fn add(a: &[f32], b: &[f32]) -> Vec<f32> {
    a.iter().zip(b).map(|(x, y)| x + y).collect()
}
