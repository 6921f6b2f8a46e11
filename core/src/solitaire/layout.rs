use serde::{Deserialize, Serialize};

use super::table::PileId;
use crate::{Point, Rect};

/// Pixel geometry of the table for a given surface size.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TableLayout {
    pub width: f64,
    pub height: f64,
    pub pad: f64,
    pub gap: f64,
    pub card_w: f64,
    pub card_h: f64,
    pub top_y: f64,
    pub table_y: f64,
    /// Vertical offset between face-up cards in a tableau.
    pub stack_gap: f64,
}

impl Default for TableLayout {
    fn default() -> Self {
        Self::fit(0., 0.)
    }
}

impl TableLayout {
    pub fn fit(width: f64, height: f64) -> Self {
        let pad = (width.min(height) * 0.03).floor().clamp(10., 18.);
        let gap = (width * 0.015).floor().clamp(8., 14.);
        let card_w = ((width - pad * 2. - gap * 6.) / 7.).floor().clamp(44., 92.);
        let card_h = (card_w * 1.38).floor();
        let top_y = pad;

        Self {
            width,
            height,
            pad,
            gap,
            card_w,
            card_h,
            top_y,
            table_y: top_y + card_h + (card_h * 0.20).floor().max(12.),
            stack_gap: (card_h * 0.22).floor().max(14.),
        }
    }

    /// Spacing below a face-down tableau card.
    pub fn face_down_gap(&self) -> f64 {
        (self.stack_gap * 0.55).floor()
    }

    /// Horizontal offset of the `index`-th waste card; only the first three fan out.
    pub fn waste_offset(&self, index: usize) -> f64 {
        index.min(2) as f64 * (self.card_w * 0.12).floor()
    }

    pub fn pile_origin(&self, pile: PileId) -> Point {
        let column = |i: u8| f64::from(i) * (self.card_w + self.gap);
        match pile {
            PileId::Stock => Point::new(self.pad, self.top_y),
            PileId::Waste => Point::new(self.pad + self.card_w + self.gap, self.top_y),
            PileId::Foundation(i) => {
                let right_start = self.width - self.pad - (self.card_w * 4. + self.gap * 3.);
                Point::new(right_start + column(i), self.top_y)
            }
            PileId::Tableau(i) => Point::new(self.pad + column(i), self.table_y),
        }
    }

    pub fn card_rect(&self, at: Point) -> Rect {
        Rect::at(at, self.card_w, self.card_h)
    }

    pub fn slot_rect(&self, pile: PileId) -> Rect {
        self.card_rect(self.pile_origin(pile))
    }
}
