// src/widgets.rs
//! Small pieces every panel uses: clipboard writes, status lines, input binding.
use gloo::console;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{window, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};
use yew::prelude::*;

pub async fn copy_to_clipboard(text: String) -> Result<(), String> {
    let w = window().ok_or("No window".to_string())?;
    let cb = w.navigator().clipboard();
    wasm_bindgen_futures::JsFuture::from(cb.write_text(&text))
        .await
        .map_err(|_| {
            "Clipboard write failed (HTTPS + user gesture required in some browsers)".to_string()
        })?;
    Ok(())
}

/// Best-effort text for a thrown JS value.
pub fn js_message(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

/// Fire-and-forget copy; the outcome lands in `msg` as a status line.
pub fn copy_with_message(text: String, msg: UseStateHandle<String>, ok: &'static str) {
    wasm_bindgen_futures::spawn_local(async move {
        match copy_to_clipboard(text).await {
            Ok(_) => msg.set(ok.to_string()),
            Err(e) => {
                console::warn!(e.clone());
                msg.set(e);
            }
        }
    });
}

/// Status line under each panel; errors get the alert style.
pub fn msg_view(s: &str) -> Html {
    let lower = s.to_lowercase();
    if s.trim().is_empty() {
        html! { <div class="smallnote">{ " " }</div> }
    } else if lower.contains("error")
        || lower.contains("failed")
        || lower.contains("invalid")
        || lower.contains("not an image")
        || lower.contains("limit")
        || lower.contains("could not")
        || lower.contains("is empty")
    {
        html! { <div class="alert">{ s }</div> }
    } else {
        html! { <div class="ok">{ s }</div> }
    }
}

pub fn bind_textarea(state: UseStateHandle<String>) -> Callback<InputEvent> {
    Callback::from(move |e: InputEvent| {
        let v = e.target_unchecked_into::<HtmlTextAreaElement>().value();
        state.set(v);
    })
}

pub fn bind_input(state: UseStateHandle<String>) -> Callback<InputEvent> {
    Callback::from(move |e: InputEvent| {
        let input = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
        if let Some(i) = input {
            state.set(i.value());
        }
    })
}

pub fn bind_select(state: UseStateHandle<String>) -> Callback<Event> {
    Callback::from(move |e: Event| {
        let select = e.target().and_then(|t| t.dyn_into::<HtmlSelectElement>().ok());
        if let Some(s) = select {
            state.set(s.value());
        }
    })
}

pub fn bind_checkbox(state: UseStateHandle<bool>) -> Callback<Event> {
    Callback::from(move |e: Event| {
        let input = e.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok());
        if let Some(i) = input {
            state.set(i.checked());
        }
    })
}
