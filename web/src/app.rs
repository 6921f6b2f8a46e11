use std::collections::HashMap;

use gloo::events::EventListener;
use gloo::render::{AnimationFrame, request_animation_frame};
use gloo::timers::callback::Timeout;
use gloo::utils::window;
use minigames_core::{GameManager, Hud, Response, StartOptions, TimerRequest, TimerToken};
use wasm_bindgen::JsCast;
use web_sys::{HtmlCanvasElement, HtmlSelectElement, KeyboardEvent};
use web_time::Instant;
use yew::prelude::*;

use crate::Args;
use crate::canvas::CanvasSurface;
use crate::utils::*;

const DEFAULT_LEVEL: &str = "easy";

#[derive(Properties, Clone, PartialEq)]
pub(crate) struct ShellProps {
    pub route: Option<String>,
    pub seed: Option<u64>,
    pub level: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Input {
    Down(minigames_core::PointerEvent),
    Move(minigames_core::PointerEvent),
    Up(minigames_core::PointerEvent),
    Cancel(minigames_core::PointerEvent),
    ContextMenu(minigames_core::PointerEvent),
    Key(String),
}

pub(crate) enum Msg {
    Route(Option<String>),
    Select(&'static str),
    Back,
    Frame,
    Input(Input),
    Timer(TimerToken),
    Resize,
    Restart,
    SetLevel(String),
    ToggleFlagMode,
    ToggleRules,
}

pub(crate) struct Shell {
    manager: GameManager,
    canvas_ref: NodeRef,
    surface: Option<CanvasSurface>,
    playing: Option<&'static str>,
    level: String,
    seed: Option<u64>,
    touch: bool,
    hud: Hud,
    flag_mode: bool,
    rules_open: bool,
    last_frame: Option<Instant>,
    frame: Option<AnimationFrame>,
    timers: HashMap<TimerToken, Timeout>,
    _listeners: Vec<EventListener>,
}

impl Shell {
    fn listen(ctx: &Context<Self>) -> Vec<EventListener> {
        let window = window();

        let on_resize = {
            let link = ctx.link().clone();
            move |_: &Event| link.send_message(Msg::Resize)
        };
        let on_key = {
            let link = ctx.link().clone();
            move |e: &Event| {
                if let Some(e) = e.dyn_ref::<KeyboardEvent>() {
                    link.send_message(Msg::Input(Input::Key(e.key())));
                }
            }
        };
        let on_hash = {
            let link = ctx.link().clone();
            move |_: &Event| {
                let hash = gloo::utils::window().location().hash().unwrap_or_default();
                match Args::from_hash(&hash) {
                    Ok(args) => link.send_message(Msg::Route(args.route().map(String::from))),
                    Err(err) => log::warn!("ignoring hash {:?}: {:#}", hash, err),
                }
            }
        };

        vec![
            EventListener::new(&window, "resize", on_resize.clone()),
            EventListener::new(&window, "orientationchange", on_resize),
            EventListener::new(&window, "keydown", on_key),
            EventListener::new(&window, "hashchange", on_hash),
        ]
    }

    fn start_options(&self) -> StartOptions {
        StartOptions {
            level: Some(self.level.clone()),
            seed: self.seed.unwrap_or_else(js_random_seed),
            touch: self.touch,
        }
    }

    fn route(&mut self, route: Option<&str>) -> bool {
        let Some(id) = route else {
            return self.show_lobby();
        };
        if self.playing == Some(id) {
            return false;
        }

        let options = self.start_options();
        if let Err(err) = self.manager.start(id, &options) {
            log::error!("{}", err);
            set_hash("#lobby");
            return self.show_lobby();
        }

        self.playing = self.manager.current().map(|meta| meta.id);
        self.reset_session();
        true
    }

    fn show_lobby(&mut self) -> bool {
        self.manager.stop();
        self.playing = None;
        self.surface = None;
        self.frame = None;
        self.reset_session();
        true
    }

    fn reset_session(&mut self) {
        self.timers.clear();
        self.flag_mode = false;
        self.rules_open = false;
        self.last_frame = None;
        self.hud = self.manager.hud();
    }

    fn schedule_frame(&mut self, ctx: &Context<Self>) {
        let link = ctx.link().clone();
        self.frame = Some(request_animation_frame(move |_| link.send_message(Msg::Frame)));
    }

    fn schedule_timer(&mut self, ctx: &Context<Self>, request: TimerRequest) {
        let link = ctx.link().clone();
        let token = request.token;
        let timeout = Timeout::new(request.delay_ms, move || link.send_message(Msg::Timer(token)));
        self.timers.insert(token, timeout);
    }

    fn apply(&mut self, ctx: &Context<Self>, response: Response) {
        if let Some(request) = response.timer {
            self.schedule_timer(ctx, request);
        }
    }

    fn dispatch(&mut self, input: Input) -> Response {
        match input {
            Input::Down(e) => self.manager.pointer_down(&e),
            Input::Move(e) => self.manager.pointer_move(&e),
            Input::Up(e) => self.manager.pointer_up(&e),
            Input::Cancel(e) => self.manager.pointer_cancel(&e),
            Input::ContextMenu(e) => self.manager.context_menu(&e),
            Input::Key(key) => self.manager.key_down(&key),
        }
    }

    /// Attaches the canvas after it is mounted and keeps its size in sync.
    fn attach_canvas(&mut self, ctx: &Context<Self>) {
        let Some(canvas) = self.canvas_ref.cast::<HtmlCanvasElement>() else {
            return;
        };
        if self.surface.as_ref().is_some_and(|surface| surface.is_for(&canvas)) {
            return;
        }

        match CanvasSurface::new(canvas) {
            Ok(mut surface) => {
                let (width, height) = surface.fit_to_parent();
                self.manager.resize(width, height);
                self.surface = Some(surface);
                self.schedule_frame(ctx);
            }
            Err(err) => log::error!("{:#}", err),
        }
    }

    fn refresh_hud(&mut self) -> bool {
        let hud = self.manager.hud();
        if hud == self.hud {
            return false;
        }
        self.hud = hud;
        true
    }

    fn view_lobby(&self, ctx: &Context<Self>) -> Html {
        html! {
            <section class="lobby">
                <h1>{"Minigames"}</h1>
                <ul>
                    {
                        for self.manager.list_games().map(|meta| {
                            let id = meta.id;
                            let onclick = ctx.link().callback(move |_| Msg::Select(id));
                            html! {
                                <li>
                                    <button {onclick}>
                                        <b>{meta.name}</b>
                                        <span>{meta.description}</span>
                                    </button>
                                </li>
                            }
                        })
                    }
                </ul>
            </section>
        }
    }

    fn view_game(&self, ctx: &Context<Self>) -> Html {
        let link = ctx.link();
        let levels = self.manager.levels();

        let onpointerdown = link.callback(|e: PointerEvent| {
            if let Some(canvas) = e.target_dyn_into::<HtmlCanvasElement>() {
                canvas.set_pointer_capture(e.pointer_id()).ok();
            }
            Msg::Input(Input::Down(local_pointer_event(&e)))
        });
        let onpointermove =
            link.callback(|e: PointerEvent| Msg::Input(Input::Move(local_pointer_event(&e))));
        let onpointerup =
            link.callback(|e: PointerEvent| Msg::Input(Input::Up(local_pointer_event(&e))));
        let onpointercancel =
            link.callback(|e: PointerEvent| Msg::Input(Input::Cancel(local_pointer_event(&e))));
        let oncontextmenu = link.callback(|e: MouseEvent| {
            e.prevent_default();
            Msg::Input(Input::ContextMenu(local_mouse_event(&e)))
        });
        let onchange = link.callback(|e: Event| {
            Msg::SetLevel(e.target_unchecked_into::<HtmlSelectElement>().value())
        });

        html! {
            <section class="game">
                <nav>
                    <button onclick={link.callback(|_| Msg::Back)}>{"Back"}</button>
                    <span class="hud-left">{self.hud.left.clone()}</span>
                    <span class="hud-right">{self.hud.right.clone()}</span>
                    if !levels.is_empty() {
                        <select {onchange}>
                            {
                                for levels.iter().map(|&level| html! {
                                    <option value={level} selected={level == self.level}>{level}</option>
                                })
                            }
                        </select>
                    }
                    if self.manager.supports_flag_mode() {
                        <button
                            class={classes!(self.flag_mode.then_some("active"))}
                            onclick={link.callback(|_| Msg::ToggleFlagMode)}
                        >
                            {"Flag mode"}
                        </button>
                    }
                    <button onclick={link.callback(|_| Msg::Restart)}>{"Restart"}</button>
                    <button onclick={link.callback(|_| Msg::ToggleRules)}>{"Rules"}</button>
                </nav>
                <div class="stage">
                    <canvas
                        ref={self.canvas_ref.clone()}
                        {onpointerdown}
                        {onpointermove}
                        {onpointerup}
                        {onpointercancel}
                        {oncontextmenu}
                    />
                </div>
                if self.rules_open {
                    <aside class="rules">
                        {Html::from_html_unchecked(AttrValue::from(self.manager.rules_html()))}
                    </aside>
                }
            </section>
        }
    }
}

impl Component for Shell {
    type Message = Msg;
    type Properties = ShellProps;

    fn create(ctx: &Context<Self>) -> Self {
        let props = ctx.props();
        let mut shell = Self {
            manager: GameManager::with_builtin_games(),
            canvas_ref: NodeRef::default(),
            surface: None,
            playing: None,
            level: props.level.clone().unwrap_or_else(|| DEFAULT_LEVEL.into()),
            seed: props.seed,
            touch: is_touch_like(),
            hud: Hud::default(),
            flag_mode: false,
            rules_open: false,
            last_frame: None,
            frame: None,
            timers: HashMap::new(),
            _listeners: Self::listen(ctx),
        };
        log::debug!("touch ui: {}", shell.touch);
        shell.route(props.route.as_deref());
        shell
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        match msg {
            Msg::Route(route) => self.route(route.as_deref()),
            Msg::Select(id) => {
                set_hash(&format!("#{}", id));
                self.route(Some(id))
            }
            Msg::Back => {
                set_hash("#lobby");
                self.show_lobby()
            }
            Msg::Frame => {
                let now = Instant::now();
                let dt = self
                    .last_frame
                    .map_or(0., |last| now.duration_since(last).as_secs_f64());
                self.last_frame = Some(now);

                let Some(surface) = self.surface.as_mut() else {
                    self.frame = None;
                    return false;
                };
                surface.clear();
                self.manager.tick(dt, surface);
                self.schedule_frame(ctx);
                self.refresh_hud()
            }
            Msg::Input(input) => {
                let response = self.dispatch(input);
                self.apply(ctx, response);
                response.changed && self.refresh_hud()
            }
            Msg::Timer(token) => {
                self.timers.remove(&token);
                let response = self.manager.fire_timer(token);
                self.apply(ctx, response);
                self.refresh_hud()
            }
            Msg::Resize => {
                let Some(surface) = self.surface.as_mut() else {
                    return false;
                };
                let (width, height) = surface.fit_to_parent();
                self.manager.resize(width, height);
                false
            }
            Msg::Restart => {
                let options = self.start_options();
                self.manager.restart(&options);
                self.reset_session();
                true
            }
            Msg::SetLevel(level) => {
                log::debug!("level: {}", level);
                self.level = level;
                let options = self.start_options();
                self.manager.restart(&options);
                self.reset_session();
                true
            }
            Msg::ToggleFlagMode => match self.manager.toggle_flag_mode() {
                Some(on) => {
                    self.flag_mode = on;
                    self.refresh_hud();
                    true
                }
                None => false,
            },
            Msg::ToggleRules => {
                self.rules_open = !self.rules_open;
                true
            }
        }
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        html! {
            <div class="minigames" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                if self.playing.is_some() {
                    {self.view_game(ctx)}
                } else {
                    {self.view_lobby(ctx)}
                }
            </div>
        }
    }

    fn rendered(&mut self, ctx: &Context<Self>, _first_render: bool) {
        if self.playing.is_some() {
            self.attach_canvas(ctx);
        }
    }
}
