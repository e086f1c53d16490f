use clap::ValueEnum;
use minesweeper_core::{CellCount, Coord, GameConfig};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::utils::Modal;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum Preset {
    #[default]
    Small,
    Medium,
    Large,
    Custom,
}

impl Preset {
    pub(crate) const ALL: [Preset; 4] = [Self::Small, Self::Medium, Self::Large, Self::Custom];

    pub(crate) const fn label(self) -> &'static str {
        use Preset::*;
        match self {
            Small => "Small",
            Medium => "Medium",
            Large => "Large",
            Custom => "Custom",
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub preset: Preset,
    /// Kept while another preset is selected so switching back restores it.
    pub custom: GameConfig,
}

impl Settings {
    pub(crate) fn new(preset: Preset) -> Self {
        Self {
            preset,
            ..Default::default()
        }
    }

    pub(crate) fn game_config(&self) -> GameConfig {
        use Preset::*;
        match self.preset {
            Small => GameConfig::SMALL,
            Medium => GameConfig::MEDIUM,
            Large => GameConfig::LARGE,
            Custom => self.custom,
        }
    }

    pub(crate) fn with_preset(self, preset: Preset) -> Self {
        Self { preset, ..self }
    }

    /// Any change to a custom value also selects the custom preset.
    pub(crate) fn with_custom(self, size: (Coord, Coord), bombs: CellCount) -> Self {
        Self {
            preset: Preset::Custom,
            custom: GameConfig::custom(size, bombs),
        }
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            preset: Preset::default(),
            custom: GameConfig::custom(GameConfig::SMALL.size, GameConfig::SMALL.bombs),
        }
    }
}

#[derive(Properties, PartialEq)]
struct ChoiceProps {
    label: AttrValue,
    selected: bool,
    onclick: Callback<MouseEvent>,
}

/// A radio button in the shape of a regular button.
#[function_component]
fn Choice(props: &ChoiceProps) -> Html {
    let class = classes!("choice", props.selected.then_some("selected"));
    html! {
        <button {class} onclick={props.onclick.clone()}>{props.label.clone()}</button>
    }
}

#[derive(Properties, PartialEq)]
struct SliderProps {
    label: AttrValue,
    min: u16,
    max: u16,
    value: u16,
    #[prop_or_default]
    disabled: bool,
    onchange: Callback<u16>,
}

#[function_component]
fn Slider(props: &SliderProps) -> Html {
    let oninput = {
        let onchange = props.onchange.clone();
        Callback::from(move |e: InputEvent| {
            let input: HtmlInputElement = e.target_unchecked_into();
            match input.value().parse() {
                Ok(value) => onchange.emit(value),
                Err(err) => log::warn!("bad slider value {:?}: {}", input.value(), err),
            }
        })
    };

    html! {
        <label class="slider">
            <span>{props.label.clone()}</span>
            <input
                type="range"
                min={props.min.to_string()}
                max={props.max.to_string()}
                value={props.value.to_string()}
                disabled={props.disabled}
                {oninput}
            />
            <output>{props.value.to_string()}</output>
        </label>
    }
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub current: Settings,
    pub on_apply: Callback<Settings>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let draft = use_state_eq(|| props.current);

    {
        // every time the dialog opens it starts from the applied settings
        let draft = draft.clone();
        let current = props.current;
        use_effect_with((props.open, current), move |&(open, current)| {
            if open {
                draft.set(current);
            }
        });
    }

    if !props.open {
        return html! {};
    }

    let settings = *draft;
    let custom = settings.custom;
    let (width, height) = custom.size;
    let is_custom = settings.preset == Preset::Custom;

    let choices = Preset::ALL.into_iter().map(|preset| {
        let draft = draft.clone();
        let onclick = Callback::from(move |_: MouseEvent| draft.set(draft.with_preset(preset)));
        html! {
            <Choice label={preset.label()} selected={settings.preset == preset} {onclick}/>
        }
    });

    let on_width = {
        let draft = draft.clone();
        Callback::from(move |width: u16| {
            let width = Coord::try_from(width).unwrap_or(GameConfig::MAX_CUSTOM_SIDE);
            draft.set(draft.with_custom((width, height), custom.bombs))
        })
    };
    let on_height = {
        let draft = draft.clone();
        Callback::from(move |height: u16| {
            let height = Coord::try_from(height).unwrap_or(GameConfig::MAX_CUSTOM_SIDE);
            draft.set(draft.with_custom((width, height), custom.bombs))
        })
    };
    let on_bombs = {
        let draft = draft.clone();
        Callback::from(move |bombs: CellCount| draft.set(draft.with_custom(custom.size, bombs)))
    };

    let on_apply = {
        let on_apply = props.on_apply.clone();
        Callback::from(move |_: MouseEvent| on_apply.emit(settings))
    };
    let on_close = props.on_close.reform(|_: MouseEvent| ());

    html! {
        <Modal>
            <div class="overlay">
                <dialog id="settings" open={true}>
                    <header>
                        <h2>{"Settings"}</h2>
                        <button class="close" onclick={on_close.clone()}>{"\u{2715}"}</button>
                    </header>
                    <nav>{ for choices }</nav>
                    <Slider
                        label="Width"
                        min={u16::from(GameConfig::MIN_CUSTOM_SIDE)}
                        max={u16::from(GameConfig::MAX_CUSTOM_SIDE)}
                        value={u16::from(width)}
                        disabled={!is_custom}
                        onchange={on_width}
                    />
                    <Slider
                        label="Height"
                        min={u16::from(GameConfig::MIN_CUSTOM_SIDE)}
                        max={u16::from(GameConfig::MAX_CUSTOM_SIDE)}
                        value={u16::from(height)}
                        disabled={!is_custom}
                        onchange={on_height}
                    />
                    <Slider
                        label="Bombs"
                        min={GameConfig::MIN_CUSTOM_BOMBS}
                        max={GameConfig::max_custom_bombs(custom.size)}
                        value={custom.bombs}
                        disabled={!is_custom}
                        onchange={on_bombs}
                    />
                    <footer>
                        <button type="reset" onclick={on_close}>{"Cancel"}</button>
                        <button onclick={on_apply}>{"Apply"}</button>
                    </footer>
                </dialog>
            </div>
        </Modal>
    }
}
