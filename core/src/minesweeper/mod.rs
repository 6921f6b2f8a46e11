use rand::SeedableRng;
use rand::rngs::SmallRng;

pub use board::*;
pub use placement::StartPolicy;

use crate::*;

mod board;
mod placement;
mod render;

/// How long a touch must be held before it plants a flag.
pub const LONG_PRESS_MS: u32 = 420;

const BOARD_PADDING: f64 = 16.;
const MIN_CELL_PX: f64 = 14.;
const MAX_CELL_PX: f64 = 44.;

/// Pixel placement of the grid inside the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoardLayout {
    pub cell: f64,
    pub origin: Point,
}

impl BoardLayout {
    pub fn fit((cols, rows): Coord2, width: f64, height: f64) -> Self {
        let (cols, rows) = (f64::from(cols), f64::from(rows));
        let by_width = ((width - BOARD_PADDING * 2.) / cols).floor();
        let by_height = ((height - BOARD_PADDING * 2.) / rows).floor();
        let cell = by_width.min(by_height).clamp(MIN_CELL_PX, MAX_CELL_PX);

        Self {
            cell,
            origin: Point::new(
                ((width - cols * cell) / 2.).floor(),
                ((height - rows * cell) / 2.).floor(),
            ),
        }
    }

    pub fn cell_rect(&self, (x, y): Coord2) -> Rect {
        Rect::new(
            self.origin.x + f64::from(x) * self.cell,
            self.origin.y + f64::from(y) * self.cell,
            self.cell,
            self.cell,
        )
    }

    pub fn board_rect(&self, (cols, rows): Coord2) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            f64::from(cols) * self.cell,
            f64::from(rows) * self.cell,
        )
    }

    fn grid_position(&self, p: Point) -> (i32, i32) {
        (
            ((p.x - self.origin.x) / self.cell).floor() as i32,
            ((p.y - self.origin.y) / self.cell).floor() as i32,
        )
    }
}

pub struct Minesweeper {
    level: Level,
    board: Board,
    rng: SmallRng,
    elapsed: f64,
    flag_mode: bool,
    touch_ui: bool,
    viewport: (f64, f64),
    layout: BoardLayout,
    long_press: TimerSlot<Point>,
    long_press_fired: bool,
    context_claimed: bool,
}

impl Default for Minesweeper {
    fn default() -> Self {
        Self::new()
    }
}

impl Minesweeper {
    pub const ID: &'static str = "minesweeper";

    pub fn new() -> Self {
        let level = Level::default();
        let difficulty = level.difficulty();
        Self {
            level,
            board: Board::new(difficulty),
            rng: SmallRng::seed_from_u64(0),
            elapsed: 0.,
            flag_mode: false,
            touch_ui: false,
            viewport: (0., 0.),
            layout: BoardLayout::fit(difficulty.size(), 0., 0.),
            long_press: TimerSlot::default(),
            long_press_fired: false,
            context_claimed: false,
        }
    }

    pub fn meta() -> GameMeta {
        GameMeta {
            id: Self::ID,
            name: "Minesweeper",
            description: "Classic minesweeper: left click reveals, right click or long-press flags.",
            create: || -> Box<dyn Game> { Box::new(Self::new()) },
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn layout(&self) -> BoardLayout {
        self.layout
    }

    /// Whole seconds are what the HUD shows; this is the raw accumulator.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn flag_mode(&self) -> bool {
        self.flag_mode
    }

    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealOutcome> {
        self.board.reveal(coords, &mut self.rng)
    }

    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<MarkOutcome> {
        self.board.toggle_flag(coords)
    }

    fn reset(&mut self, level: Level, seed: u64) {
        log::debug!("minesweeper reset: {:?}, seed {}", level, seed);
        self.level = level;
        self.board = Board::new(level.difficulty());
        self.rng = SmallRng::seed_from_u64(seed);
        self.elapsed = 0.;
        self.flag_mode = false;
        self.long_press.cancel();
        self.long_press_fired = false;
        self.context_claimed = false;
        self.relayout();
    }

    fn relayout(&mut self) {
        let (width, height) = self.viewport;
        self.layout = BoardLayout::fit(self.board.size(), width, height);
    }

    pub fn cell_under(&self, p: Point) -> Option<Coord2> {
        let (x, y) = self.layout.grid_position(p);
        self.board.contains(x, y)
    }

    fn reveal_at(&mut self, p: Point) -> Response {
        let Some(coords) = self.cell_under(p) else {
            return Response::NONE;
        };
        match self.reveal(coords) {
            Ok(outcome) => {
                log::trace!("reveal {:?}: {:?}", coords, outcome);
                Response::changed(outcome.has_update())
            }
            Err(err) => {
                log::trace!("reveal {:?} ignored: {}", coords, err);
                Response::NONE
            }
        }
    }

    fn flag_at(&mut self, p: Point) -> Response {
        let Some(coords) = self.cell_under(p) else {
            return Response::NONE;
        };
        match self.toggle_flag(coords) {
            Ok(outcome) => Response::changed(outcome.has_update()),
            Err(err) => {
                log::trace!("flag {:?} ignored: {}", coords, err);
                Response::NONE
            }
        }
    }
}

impl Game for Minesweeper {
    fn start(&mut self, options: &StartOptions) {
        let level = match options.level.as_deref() {
            Some(key) => Level::from_key(key).unwrap_or_default(),
            None => self.level,
        };
        self.touch_ui = options.touch;
        self.reset(level, options.seed);
    }

    fn stop(&mut self) {
        self.long_press.cancel();
    }

    fn resize(&mut self, width: f64, height: f64) {
        self.viewport = (width, height);
        self.relayout();
    }

    fn update(&mut self, dt: f64) {
        if self.board.state() == BoardState::Active {
            self.elapsed += dt;
        }
    }

    fn render(&self, surface: &mut dyn Surface) {
        render::draw(self, surface);
    }

    fn pointer_down(&mut self, event: &PointerEvent) -> Response {
        if self.board.is_finished() {
            return Response::NONE;
        }

        self.long_press_fired = false;
        self.context_claimed =
            !event.pointer_type.is_mouse() || event.button == PointerEvent::SECONDARY;

        if event.pointer_type.is_mouse() {
            Response::NONE
        } else {
            Response::schedule(self.long_press.arm(event.point(), LONG_PRESS_MS))
        }
    }

    fn pointer_move(&mut self, _event: &PointerEvent) -> Response {
        Response::NONE
    }

    fn pointer_up(&mut self, event: &PointerEvent) -> Response {
        self.long_press.cancel();
        if self.board.is_finished() {
            return Response::NONE;
        }

        if event.pointer_type.is_mouse() {
            return if event.button == PointerEvent::SECONDARY {
                self.flag_at(event.point())
            } else {
                self.reveal_at(event.point())
            };
        }

        if self.long_press_fired {
            return Response::NONE;
        }
        // no contextmenu follows a short tap, so release the claim here
        self.context_claimed = false;
        if self.flag_mode {
            self.flag_at(event.point())
        } else {
            self.reveal_at(event.point())
        }
    }

    fn pointer_cancel(&mut self, _event: &PointerEvent) -> Response {
        self.long_press.cancel();
        self.long_press_fired = false;
        Response::NONE
    }

    fn context_menu(&mut self, event: &PointerEvent) -> Response {
        // a pointer press already owns this gesture (right button or long-press)
        if std::mem::take(&mut self.context_claimed) || self.board.is_finished() {
            return Response::NONE;
        }
        self.flag_at(event.point())
    }

    fn fire_timer(&mut self, token: TimerToken) -> Response {
        match self.long_press.fire(token) {
            Some(at) => {
                log::trace!("long press at {:?}", at);
                self.long_press_fired = true;
                self.flag_at(at)
            }
            None => Response::NONE,
        }
    }

    fn hud(&self) -> Hud {
        let mines_left = self.board.mines_left().max(0);
        let mut left = format!("Mines: {}   Flags: {}", mines_left, self.board.flag_count());
        if self.touch_ui {
            let mode = if self.flag_mode { "Flag" } else { "Reveal" };
            left.push_str(&format!("   Mode: {}", mode));
        }

        let mut right = format!("Time: {}s", self.elapsed.floor() as u64);
        right.push_str(match self.board.state() {
            BoardState::Idle => "   Click to start",
            BoardState::Active => "",
            BoardState::Won => "   Won",
            BoardState::Lost => "   Lost",
        });

        Hud { left, right }
    }

    fn rules_html(&self) -> &'static str {
        RULES_HTML
    }

    fn levels(&self) -> &'static [&'static str] {
        Level::KEYS
    }

    fn supports_flag_mode(&self) -> bool {
        true
    }

    fn toggle_flag_mode(&mut self) -> Option<bool> {
        self.flag_mode = !self.flag_mode;
        log::debug!("flag mode: {}", self.flag_mode);
        Some(self.flag_mode)
    }
}

const RULES_HTML: &str = r#"
<p><b>Goal:</b> open every cell that is not a mine without stepping on one.</p>
<p><b>Controls:</b></p>
<ul>
  <li>Desktop: <code>left click</code> reveals, <code>right click</code> flags or unflags.</li>
  <li>Touch: <code>tap</code> reveals; <code>long-press</code> (420ms) flags.</li>
  <li>Touch: the <code>flag mode</code> button makes a tap plant a flag instead.</li>
</ul>
<p><b>Rules:</b></p>
<ul>
  <li>A number tells how many of the 8 surrounding cells hold mines.</li>
  <li>Opening a blank (0) cell opens its neighbors automatically.</li>
  <li>The first click is always safe and tries to keep its 8 neighbors clear too.</li>
  <li>Open every safe cell to win.</li>
</ul>
"#;
