// src/main.rs
use gloo::console;
use yew::prelude::*;

mod config;
mod picker;
mod tools;
mod widgets;

use config::{PickerSettings, Settings};
use picker::view::ColorPickerPanel;
use tools::api::ApiPanel;
use tools::commit::CommitPanel;
use tools::diff::DiffPanel;
use tools::json::JsonPanel;
use tools::regex_builder::RegexPanel;
use tools::shortener::ShortenerPanel;
use tools::time::TimePanel;
use tools::Tool;

fn persist(settings: &Settings) {
    if let Err(e) = config::save(settings) {
        console::warn!(e);
    }
}

#[function_component(App)]
fn app() -> Html {
    let settings = use_state(config::load);

    let set_tool = {
        let settings = settings.clone();
        Callback::from(move |t: Tool| {
            let next = Settings {
                last_tool: t,
                ..(*settings).clone()
            };
            persist(&next);
            settings.set(next);
        })
    };

    let on_picker_settings = {
        let settings = settings.clone();
        Callback::from(move |p: PickerSettings| {
            let next = Settings {
                picker: p.normalized(),
                ..(*settings).clone()
            };
            persist(&next);
            settings.set(next);
        })
    };

    let tool = settings.last_tool;
    let content = match tool {
        Tool::ColorPicker => html! {
            <ColorPickerPanel settings={settings.picker.clone()} on_settings={on_picker_settings} />
        },
        Tool::Json => html! { <JsonPanel /> },
        Tool::Regex => html! { <RegexPanel /> },
        Tool::Diff => html! { <DiffPanel /> },
        Tool::Commit => html! { <CommitPanel /> },
        Tool::Api => html! { <ApiPanel /> },
        Tool::Time => html! { <TimePanel /> },
        Tool::Shortener => html! { <ShortenerPanel /> },
    };

    html! {
      <div class="app">
        <div class="tabs" role="tablist" aria-label="Tools">
          { for Tool::ALL.into_iter().map(|t| {
              let is_active = tool == t;
              let cls = if is_active { "tab active" } else { "tab" };
              let set_tool = set_tool.clone();
              html! {
                <button
                  class={cls}
                  role="tab"
                  aria-selected={is_active.to_string()}
                  onclick={Callback::from(move |_| set_tool.emit(t))}
                >
                  { t.label() }
                </button>
              }
          }) }
        </div>

        { content }
      </div>
    }
}

fn main() {
    console_error_panic_hook::set_once();
    yew::Renderer::<App>::new().render();
}
