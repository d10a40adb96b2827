use crate::settings;
use crate::utils::*;
use gloo::timers::callback::Interval;
use yakitako_core as game;
use yew::prelude::*;

/// Pulse lengths for the two kinds of successful input.
const VIBRATE_SELECT_MILLIS: u32 = 10;
const VIBRATE_ACTION_MILLIS: u32 = 15;

/// Seconds left at which the countdown starts flashing.
const LOW_TIME_SECS: u32 = 10;

pub(crate) trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E> HasUpdate for Result<game::ToolOutcome, E> {
    fn has_update(self) -> bool {
        self.map_or(false, |outcome: game::ToolOutcome| outcome.has_update())
    }
}

impl<E> HasUpdate for Result<game::SelectOutcome, E> {
    fn has_update(self) -> bool {
        self.map_or(false, |outcome: game::SelectOutcome| outcome.has_update())
    }
}

/// Render-side color band for a piece on the griddle.
#[derive(Copy, Clone, Debug, PartialEq)]
enum DonenessBand {
    Raw,
    Setting,
    Nearly,
    Golden,
}

impl DonenessBand {
    fn of(progress: game::Progress) -> Self {
        use DonenessBand::*;
        if progress >= game::BOXABLE_MIN {
            Golden
        } else if progress >= 60.0 {
            Nearly
        } else if progress >= 40.0 {
            Setting
        } else {
            Raw
        }
    }

    const fn css_class(self) -> &'static str {
        use DonenessBand::*;
        match self {
            Raw => "raw",
            Setting => "setting",
            Nearly => "nearly",
            Golden => "golden",
        }
    }
}

fn hole_classes(hole: game::Hole) -> Classes {
    use game::HoleState::*;

    let mut class = classes!(
        "hole",
        match hole.state() {
            Empty => classes!("empty"),
            Batter => classes!("batter"),
            Filled => classes!("filled", DonenessBand::of(hole.progress()).css_class()),
            Cooking => classes!("cooking", DonenessBand::of(hole.progress()).css_class()),
            Burnt => classes!("burnt"),
        }
    );
    if hole.is_boxable() {
        class.push("ready");
    }
    if hole.state().is_on_griddle() && hole.progress() >= game::PERFECT_MIN {
        class.push("perfect");
    }
    if hole.flip_count() > 0 {
        class.push("flipped");
    }
    class
}

const fn tool_label(tool: game::Tool) -> &'static str {
    use game::Tool::*;
    match tool {
        Batter => "Batter",
        Tako => "Tako",
        Pick => "Pick",
        Pack => "Pack",
    }
}

const fn tool_class(tool: game::Tool) -> &'static str {
    use game::Tool::*;
    match tool {
        Batter => "batter",
        Tako => "tako",
        Pick => "pick",
        Pack => "pack",
    }
}

#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Msg {
    Start,
    SelectTool(game::Tool),
    HolePressed(game::HoleIndex),
    CookTick,
    CountdownTick,
    ToggleSettings,
    UpdateSettings(settings::Settings),
}

#[derive(Properties, Clone, PartialEq)]
struct HoleProps {
    index: game::HoleIndex,
    hole: game::Hole,
    callback: Callback<game::HoleIndex>,
}

#[function_component(HoleView)]
fn hole_component(props: &HoleProps) -> Html {
    let HoleProps {
        index,
        hole,
        callback,
    } = props.clone();

    let class = hole_classes(hole);
    let onpointerdown = Callback::from(move |e: PointerEvent| {
        e.prevent_default();
        callback.emit(index);
        log::trace!("hole {} pressed", index);
    });

    html! {
        <td {class} {onpointerdown}/>
    }
}

#[derive(Properties, Clone, PartialEq)]
struct ToolButtonProps {
    tool: game::Tool,
    #[prop_or_default]
    selected: bool,
    callback: Callback<game::Tool>,
}

#[function_component(ToolButtonView)]
fn tool_button_component(props: &ToolButtonProps) -> Html {
    let ToolButtonProps {
        tool,
        selected,
        callback,
    } = props.clone();

    let class = classes!("tool", tool_class(tool), selected.then_some("selected"));
    let onpointerdown = Callback::from(move |e: PointerEvent| {
        e.prevent_default();
        callback.emit(tool);
    });

    html! {
        <button type="button" {class} {onpointerdown}>{tool_label(tool)}</button>
    }
}

/// The two session clocks; dropping this cancels both intervals, so a
/// stale tick can never outlive the phase that scheduled it.
struct Clocks {
    _cook: Interval,
    _countdown: Interval,
}

impl Clocks {
    fn start(ctx: &Context<GameView>) -> Self {
        let cook_link = ctx.link().clone();
        let countdown_link = ctx.link().clone();
        Self {
            _cook: Interval::new(game::COOK_TICK_MILLIS, move || {
                cook_link.send_message(Msg::CookTick)
            }),
            _countdown: Interval::new(game::COUNTDOWN_TICK_MILLIS, move || {
                countdown_link.send_message(Msg::CountdownTick)
            }),
        }
    }
}

#[derive(Properties, Clone, Debug, PartialEq, Default)]
pub(crate) struct GameProps {
    /// Force a session length instead of the standard one
    #[prop_or_default]
    pub duration: Option<u32>,
}

pub(crate) struct GameView {
    settings: settings::Settings,
    engine: game::GriddleEngine,
    clocks: Option<Clocks>,
    settings_open: bool,
}

impl GameView {
    fn pulse(&self, millis: u32) {
        if self.settings.enable_haptics {
            vibrate(millis);
        }
    }

    /// Keep interval scheduling in lockstep with the session phase:
    /// created fresh when a round begins, cancelled as soon as it ends.
    fn sync_clocks(&mut self, ctx: &Context<Self>) {
        let playing = self.engine.session().is_playing();
        match (&self.clocks, playing) {
            (None, true) => {
                log::debug!("starting cook and countdown clocks");
                self.clocks = Some(Clocks::start(ctx));
            }
            (Some(_), false) => {
                log::debug!("stopping cook and countdown clocks");
                self.clocks = None;
            }
            _ => {}
        }
    }
}

impl Component for GameView {
    type Message = Msg;
    type Properties = GameProps;

    fn create(ctx: &Context<Self>) -> Self {
        let config = match ctx.props().duration {
            Some(secs) => game::GameConfig::new(secs),
            None => game::GameConfig::standard(),
        };
        Self {
            settings: LocalOrDefault::local_or_default(),
            engine: game::GriddleEngine::new(config),
            clocks: None,
            settings_open: false,
        }
    }

    fn update(&mut self, ctx: &Context<Self>, msg: Self::Message) -> bool {
        use Msg::*;

        let updated = match msg {
            Start => match self.engine.start() {
                Ok(()) => true,
                Err(err) => {
                    log::warn!("start ignored: {}", err);
                    false
                }
            },
            SelectTool(tool) => {
                let updated = self.engine.select_tool(tool).has_update();
                if updated {
                    self.pulse(VIBRATE_SELECT_MILLIS);
                }
                updated
            }
            HolePressed(index) => {
                let updated = self.engine.interact(index).has_update();
                if updated {
                    self.pulse(VIBRATE_ACTION_MILLIS);
                }
                updated
            }
            CookTick => self.engine.cook_tick().has_update(),
            CountdownTick => self.engine.countdown_tick().has_update(),
            ToggleSettings => {
                self.settings_open = !self.settings_open;
                true
            }
            UpdateSettings(settings) => {
                if self.settings != settings {
                    self.settings = settings;
                    self.settings.local_save();
                    true
                } else {
                    false
                }
            }
        };

        self.sync_clocks(ctx);
        updated
    }

    fn view(&self, ctx: &Context<Self>) -> Html {
        use Msg::*;

        let engine = &self.engine;
        let time_left = engine.time_left();
        let time_class = classes!(
            "time",
            (engine.session().is_playing() && time_left < LOW_TIME_SECS).then_some("low")
        );

        let cb_start = ctx.link().callback(|_: MouseEvent| Start);
        let cb_show_settings = ctx.link().callback(|_: MouseEvent| ToggleSettings);
        let hole_callback = ctx.link().callback(HolePressed);
        let tool_callback = ctx.link().callback(SelectTool);
        let cb_update_settings = ctx.link().callback(UpdateSettings);
        let cb_close_settings = ctx.link().callback(|_| ToggleSettings);

        html! {
            <div class="yakitako" oncontextmenu={Callback::from(move |e: MouseEvent| e.prevent_default())}>
                <small onclick={cb_show_settings}>{"···"}</small>
                <nav>
                    <aside class="score">{engine.score()}</aside>
                    <span class="title">{"YAKITAKO"}</span>
                    <aside class={time_class}>{time_left}</aside>
                </nav>
                {
                    match engine.session() {
                        game::SessionState::Menu => html! {
                            <section class="overlay menu">
                                <h2>{"The stand is ready"}</h2>
                                <p>{"Pour, fill, flip, and pack before the festival crowd moves on."}</p>
                                <button type="button" onclick={cb_start.clone()}>{"Open the stand"}</button>
                            </section>
                        },
                        game::SessionState::Finished => html! {
                            <section class="overlay finished">
                                <h2>{"Sold out!"}</h2>
                                <p class="final-score">{engine.score()}</p>
                                <button type="button" onclick={cb_start.clone()}>{"One more round"}</button>
                            </section>
                        },
                        game::SessionState::Playing => html! {},
                    }
                }
                <table class="griddle">
                    {
                        for (0..game::GRID_SIDE).map(|row| html! {
                            <tr>
                                {
                                    for (0..game::GRID_SIDE).map(|col| {
                                        let index = row * game::GRID_SIDE + col;
                                        let hole = engine.hole_at(index);
                                        let callback = hole_callback.clone();
                                        html! {
                                            <HoleView {index} {hole} {callback}/>
                                        }
                                    })
                                }
                            </tr>
                        })
                    }
                </table>
                <div class="tray">
                    {
                        for engine.boxed_items().map(|item| html! {
                            <span
                                key={item.id.to_string()}
                                class={classes!("piece", item.perfect.then_some("perfect"))}
                            />
                        })
                    }
                    {
                        if engine.boxed_items().next().is_none() {
                            html! { <span class="tray-empty">{"Waiting for the first batch…"}</span> }
                        } else {
                            html! {}
                        }
                    }
                </div>
                <footer class="tools">
                    {
                        for [game::Tool::Batter, game::Tool::Tako, game::Tool::Pick, game::Tool::Pack]
                            .map(|tool| {
                                let selected = engine.selected_tool() == tool;
                                let callback = tool_callback.clone();
                                html! {
                                    <ToolButtonView {tool} {selected} {callback}/>
                                }
                            })
                    }
                </footer>
                <Modal>
                    <settings::SettingsView
                        open={self.settings_open}
                        settings={self.settings}
                        on_change={cb_update_settings}
                        on_close={cb_close_settings}
                    />
                </Modal>
            </div>
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme;

    fn boxable_engine() -> game::GriddleEngine {
        let mut engine = game::GriddleEngine::new(game::GameConfig::standard());
        engine.start().unwrap();
        engine.interact(0).unwrap();
        engine.select_tool(game::Tool::Tako).unwrap();
        engine.interact(0).unwrap();
        while !engine.hole_at(0).is_boxable() {
            engine.cook_tick();
        }
        engine
    }

    #[test]
    fn doneness_bands_follow_the_color_cuts() {
        use DonenessBand::*;
        assert_eq!(DonenessBand::of(0.0), Raw);
        assert_eq!(DonenessBand::of(39.9), Raw);
        assert_eq!(DonenessBand::of(40.0), Setting);
        assert_eq!(DonenessBand::of(59.9), Setting);
        assert_eq!(DonenessBand::of(60.0), Nearly);
        assert_eq!(DonenessBand::of(74.9), Nearly);
        assert_eq!(DonenessBand::of(game::BOXABLE_MIN), Golden);
        assert_eq!(DonenessBand::of(99.0), Golden);
    }

    #[test]
    fn hole_classes_track_state_and_markers() {
        let mut engine = game::GriddleEngine::new(game::GameConfig::standard());
        engine.start().unwrap();

        assert!(hole_classes(engine.hole_at(0)).contains("empty"));

        engine.interact(0).unwrap();
        assert!(hole_classes(engine.hole_at(0)).contains("batter"));

        engine.select_tool(game::Tool::Tako).unwrap();
        engine.interact(0).unwrap();
        let class = hole_classes(engine.hole_at(0));
        assert!(class.contains("filled"));
        assert!(class.contains("raw"));
        assert!(!class.contains("ready"));
    }

    #[test]
    fn boxable_and_perfect_holes_gain_their_markers() {
        let mut engine = boxable_engine();
        let class = hole_classes(engine.hole_at(0));
        assert!(class.contains("golden"));
        assert!(class.contains("ready"));

        while engine.hole_at(0).progress() < game::PERFECT_MIN {
            engine.cook_tick();
        }
        let class = hole_classes(engine.hole_at(0));
        assert!(class.contains("ready"));
        assert!(class.contains("perfect"));

        engine.select_tool(game::Tool::Pick).unwrap();
        engine.interact(0).unwrap();
        assert!(hole_classes(engine.hole_at(0)).contains("flipped"));
    }

    #[test]
    fn burnt_holes_lose_the_doneness_band() {
        let mut engine = boxable_engine();
        while engine.hole_at(0).state() != game::HoleState::Burnt {
            engine.cook_tick();
        }
        let class = hole_classes(engine.hole_at(0));
        assert!(class.contains("burnt"));
        assert!(!class.contains("golden"));
        assert!(!class.contains("ready"));
    }

    #[test]
    fn storage_keys_are_namespaced() {
        assert_eq!(<settings::Settings as StorageKey>::KEY, "yakitako:settings");
        assert_eq!(<theme::Theme as StorageKey>::KEY, "yakitako:theme");
    }
}
