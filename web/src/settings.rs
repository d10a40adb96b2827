use crate::theme::Theme;
use crate::utils::*;
use serde::{Deserialize, Serialize};
use yew::prelude::*;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Settings {
    pub enable_haptics: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_haptics: true,
        }
    }
}

impl StorageKey for Settings {
    const KEY: &'static str = "yakitako:settings";
}

#[derive(Properties, PartialEq)]
pub(crate) struct SettingsProps {
    #[prop_or_default]
    pub open: bool,
    pub settings: Settings,
    pub on_change: Callback<Settings>,
    pub on_close: Callback<()>,
}

#[function_component]
pub(crate) fn SettingsView(props: &SettingsProps) -> Html {
    let settings = props.settings;

    let on_toggle_haptics = {
        let on_change = props.on_change.clone();
        Callback::from(move |_: Event| {
            on_change.emit(Settings {
                enable_haptics: !settings.enable_haptics,
            });
        })
    };

    let theme_switcher = |theme: Option<Theme>| {
        Callback::from(move |e: MouseEvent| {
            e.prevent_default();
            Theme::apply(theme);
        })
    };

    let on_close = props.on_close.clone();

    html! {
        <dialog id="settings" open={props.open}>
            <article>
                <h2>{"Settings"}</h2>
                <label>
                    <input
                        type="checkbox"
                        checked={settings.enable_haptics}
                        onchange={on_toggle_haptics}
                    />
                    {"Haptic feedback"}
                </label>
                <ul>
                    <li><a href="#" onclick={theme_switcher(None)}>{"Auto"}</a></li>
                    <li><a href="#" onclick={theme_switcher(Some(Theme::Light))}>{"Light"}</a></li>
                    <li><a href="#" onclick={theme_switcher(Some(Theme::Dark))}>{"Dark"}</a></li>
                </ul>
                <footer>
                    <button onclick={Callback::from(move |_: MouseEvent| on_close.emit(()))}>{"Close"}</button>
                </footer>
            </article>
        </dialog>
    }
}
