use super::*;

const HIDDEN_FILL: Color = Color::white(0.10);
const HIDDEN_EDGE: Color = Color::white(0.14);
const OPEN_FILL: Color = Color::black(0.22);
const GRID: Color = Color::black(0.35);
const MINE: Color = Color::rgba(255, 95, 109, 0.95);
const TRIGGERED: Color = Color::rgba(255, 95, 109, 0.35);
const FLAG: Color = Color::rgba(255, 209, 102, 0.95);

fn number_color(n: u8) -> Color {
    Color::rgba(106, 169, 255, 0.35 + f32::from(n) * 0.08)
}

pub(super) fn draw(game: &Minesweeper, surface: &mut dyn Surface) {
    let board = game.board();
    let layout = game.layout();
    let (cols, rows) = board.size();

    bevel_panel(surface, layout.board_rect(board.size()).inset(-8.), 14.);

    for x in 0..cols {
        for y in 0..rows {
            let rect = layout.cell_rect((x, y));
            match board.mark_at((x, y)) {
                Mark::Revealed => {
                    let triggered = board.triggered_mine() == Some((x, y));
                    draw_open(surface, rect, board.cell_at((x, y)), triggered);
                }
                Mark::Hidden => draw_hidden(surface, rect),
                Mark::Flagged => {
                    draw_hidden(surface, rect);
                    draw_flag(surface, rect);
                }
            }
            surface.stroke_rect(rect, GRID, 1.);
        }
    }
}

fn draw_hidden(surface: &mut dyn Surface, rect: Rect) {
    surface.fill_rect(rect, HIDDEN_FILL);
    surface.stroke_rect(rect.inset(1.5), HIDDEN_EDGE, 1.);
}

fn draw_open(surface: &mut dyn Surface, rect: Rect, cell: Cell, triggered: bool) {
    surface.fill_rect(rect, if triggered { TRIGGERED } else { OPEN_FILL });
    match cell {
        Cell::Mine => draw_mine(surface, rect),
        Cell::Empty(0) => {}
        Cell::Empty(n) => {
            let style = TextStyle {
                size_px: rect.w * 0.6,
                weight: 800,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
                color: number_color(n),
            };
            surface.fill_text(&n.to_string(), rect.center(), &style);
        }
    }
}

fn draw_mine(surface: &mut dyn Surface, rect: Rect) {
    let c = rect.center();
    let r = rect.w * 0.22;
    surface.fill_circle(c, r, MINE);
    let spike = r * 1.5;
    surface.line(Point::new(c.x - spike, c.y), Point::new(c.x + spike, c.y), MINE, 2.);
    surface.line(Point::new(c.x, c.y - spike), Point::new(c.x, c.y + spike), MINE, 2.);
}

fn draw_flag(surface: &mut dyn Surface, rect: Rect) {
    let s = rect.w;
    let pole_x = rect.x + s * 0.38;
    surface.line(
        Point::new(pole_x, rect.y + s * 0.22),
        Point::new(pole_x, rect.y + s * 0.80),
        Color::white(0.8),
        2.,
    );
    surface.fill_polygon(
        &[
            Point::new(pole_x, rect.y + s * 0.22),
            Point::new(rect.x + s * 0.72, rect.y + s * 0.36),
            Point::new(pole_x, rect.y + s * 0.50),
        ],
        FLAG,
    );
}
