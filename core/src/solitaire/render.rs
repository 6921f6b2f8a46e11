use super::*;

const CARD_RADIUS: f64 = 14.;
const SLOT_FILL: Color = Color::white(0.06);
const SLOT_EDGE: Color = Color::white(0.14);
const BACK_FILL: Color = Color::rgba(106, 169, 255, 0.18);
const BACK_HATCH: Color = Color::white(0.14);
const FACE_FILL: Color = Color::white(0.92);
const FACE_EDGE: Color = Color::black(0.22);
const RED_INK: Color = Color::rgba(255, 95, 109, 0.92);
const BLACK_INK: Color = Color::rgba(20, 26, 38, 0.90);
const HATCH_STEP: f64 = 10.;

pub(super) fn draw(game: &Solitaire, surface: &mut dyn Surface) {
    let layout = game.layout();
    let table = game.table();
    let (w, h) = (layout.width, layout.height);

    surface.fill_rect(Rect::new(0., 0., w, h), Color::black(0.18));
    bevel_panel(surface, Rect::new(12., 12., w - 24., h - 24.), 20.);

    for pile in PileId::all() {
        draw_slot(surface, layout.slot_rect(pile));
    }

    if let Some(top) = table.top_card(PileId::Stock) {
        draw_card(surface, &layout, top);
    }
    for pile in PileId::all().filter(|&pile| pile != PileId::Stock) {
        for &id in table.pile(pile) {
            draw_card(surface, &layout, table.card(id));
        }
    }
    if let DragState::Holding(drag) = game.drag() {
        for &id in &drag.cards {
            draw_card(surface, &layout, table.card(id));
        }
    }

    if game.is_won() {
        surface.fill_rect(Rect::new(0., 0., w, h), Color::black(0.30));
        let style = TextStyle {
            size_px: (w.min(h) * 0.06).floor(),
            weight: 900,
            align: TextAlign::Center,
            baseline: TextBaseline::Middle,
            color: Color::white(0.92),
        };
        surface.fill_text("Solved!", Point::new(w / 2., h / 2. - 8.), &style);
    }
}

fn draw_slot(surface: &mut dyn Surface, rect: Rect) {
    let radius = corner_radius(rect, CARD_RADIUS);
    surface.fill_round_rect(rect, radius, SLOT_FILL);
    surface.stroke_round_rect(rect, radius, SLOT_EDGE, 2.);
}

fn draw_card(surface: &mut dyn Surface, layout: &TableLayout, card: &Card) {
    let rect = layout.card_rect(card.pos);
    if card.face_up {
        draw_face(surface, rect, card);
    } else {
        draw_back(surface, rect);
    }
}

fn draw_back(surface: &mut dyn Surface, rect: Rect) {
    let radius = corner_radius(rect, CARD_RADIUS);
    surface.fill_round_rect(rect, radius, BACK_FILL);

    // diagonal hatching, each line clipped to the card
    surface.set_alpha(0.85);
    let mut i = HATCH_STEP;
    while i < rect.w + rect.h {
        let from = Point::new(rect.x + i.min(rect.w), rect.y + (i - rect.w).max(0.));
        let to = Point::new(rect.x + (i - rect.h).max(0.), rect.y + i.min(rect.h));
        surface.line(from, to, BACK_HATCH, 1.);
        i += HATCH_STEP;
    }
    surface.set_alpha(1.);

    surface.stroke_round_rect(rect, radius, Color::black(0.35), 2.);
}

fn draw_face(surface: &mut dyn Surface, rect: Rect, card: &Card) {
    let radius = corner_radius(rect, CARD_RADIUS);
    surface.fill_round_rect(rect, radius, FACE_FILL);
    surface.stroke_round_rect(rect, radius, FACE_EDGE, 2.);

    let ink = match card.color() {
        CardColor::Red => RED_INK,
        CardColor::Black => BLACK_INK,
    };
    let corner = TextStyle {
        size_px: (rect.w * 0.22).floor(),
        weight: 800,
        align: TextAlign::Left,
        baseline: TextBaseline::Top,
        color: ink,
    };
    surface.fill_text(&card.label(), Point::new(rect.x + 10., rect.y + 8.), &corner);

    surface.set_alpha(0.9);
    let pip = TextStyle {
        size_px: (rect.w * 0.52).floor(),
        weight: 900,
        align: TextAlign::Center,
        baseline: TextBaseline::Middle,
        color: ink,
    };
    let center = rect.center();
    let mut symbol = [0u8; 4];
    surface.fill_text(
        card.suit.symbol().encode_utf8(&mut symbol),
        Point::new(center.x, center.y + 4.),
        &pip,
    );
    surface.set_alpha(1.);
}
