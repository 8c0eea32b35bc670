// src/tools/shortener.rs
//! TinyURL front end with a short in-memory history.
use gloo::console;
use gloo_net::http::Request;
use regex::Regex;
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::widgets::{bind_input, copy_with_message, msg_view};

pub const API_BASE: &str = "https://tinyurl.com/api-create.php";
pub const HISTORY_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Shortened {
    pub original: String,
    pub short: String,
}

/// Trimmed URL if it is an absolute http(s) URL with no spaces or quotes.
pub fn validate_url(input: &str) -> Result<String, String> {
    let url = input.trim();
    if url.is_empty() {
        return Err("URL is empty.".into());
    }
    let re = Regex::new(r#"^https?://[^ "]+$"#).map_err(|e| e.to_string())?;
    if !re.is_match(url) {
        return Err("Invalid URL: must start with http:// or https:// and contain no spaces".into());
    }
    Ok(url.to_string())
}

pub fn api_url(long: &str) -> String {
    format!("{API_BASE}?url={}", urlencoding::encode(long))
}

/// The service answers with the short link as plain text.
pub fn read_reply(status: u16, ok: bool, body: &str) -> Result<String, String> {
    if !ok {
        return Err(format!("Failed to shorten URL (HTTP {status})"));
    }
    let short = body.trim();
    if short.starts_with("http://") || short.starts_with("https://") {
        Ok(short.to_string())
    } else {
        Err(format!("Failed to shorten URL: unexpected reply {short:?}"))
    }
}

/// Newest first; an earlier entry for the same URL is replaced.
pub fn remember(history: &[Shortened], entry: Shortened) -> Vec<Shortened> {
    let mut next = Vec::with_capacity(HISTORY_LIMIT);
    next.extend(
        history
            .iter()
            .filter(|h| h.original != entry.original)
            .cloned(),
    );
    next.insert(0, entry);
    next.truncate(HISTORY_LIMIT);
    next
}

pub async fn shorten(long: String) -> Result<Shortened, String> {
    let resp = Request::get(&api_url(&long))
        .send()
        .await
        .map_err(|e| format!("Request failed: {e}"))?;
    let body = resp
        .text()
        .await
        .map_err(|e| format!("Failed reading reply: {e}"))?;
    let short = read_reply(resp.status(), resp.ok(), &body)?;
    Ok(Shortened {
        original: long,
        short,
    })
}

#[function_component(ShortenerPanel)]
pub fn shortener_panel() -> Html {
    let input = use_state(String::new);
    let loading = use_state(|| false);
    let result = use_state(|| None::<Shortened>);
    let history = use_state(Vec::<Shortened>::new);
    let msg = use_state(String::new);

    let on_shorten = {
        let (input, loading, result, history, msg) = (
            input.clone(),
            loading.clone(),
            result.clone(),
            history.clone(),
            msg.clone(),
        );
        Callback::from(move |_: MouseEvent| {
            let long = match validate_url(&input) {
                Ok(u) => u,
                Err(e) => {
                    msg.set(e);
                    return;
                }
            };
            loading.set(true);
            msg.set(String::new());
            let (loading, result, history, msg) =
                (loading.clone(), result.clone(), history.clone(), msg.clone());
            spawn_local(async move {
                match shorten(long).await {
                    Ok(s) => {
                        console::log!(format!("shortened {} -> {}", s.original, s.short));
                        history.set(remember(&history, s.clone()));
                        result.set(Some(s));
                    }
                    Err(e) => {
                        console::warn!(e.clone());
                        result.set(None);
                        msg.set(e);
                    }
                }
                loading.set(false);
            });
        })
    };

    let copy = |text: &str| {
        let (text, msg) = (text.to_string(), msg.clone());
        Callback::from(move |_: MouseEvent| {
            copy_with_message(text.clone(), msg.clone(), "Copied short URL.")
        })
    };

    let on_clear = {
        let history = history.clone();
        Callback::from(move |_: MouseEvent| history.set(Vec::new()))
    };

    html! {
        <div class="panel">
          <div class="block">
            <div class="block-head"><div class="block-title">{ "URL Shortener" }</div></div>
            <div class="textline">
              <input type="text" value={(*input).clone()} oninput={bind_input(input.clone())}
                     placeholder="https://example.com/a/very/long/link" />
              <button class="btn" onclick={on_shorten} disabled={*loading}>
                { if *loading { "Shortening..." } else { "Shorten" } }
              </button>
            </div>
            { for (*result).as_ref().map(|r| html! {
                <div class="kv">
                  <span class="tag">{ "Short" }</span>
                  <a class="mono" href={r.short.clone()} target="_blank" rel="noopener">{ r.short.clone() }</a>
                  <button class="btn small" onclick={copy(&r.short)}>{ "Copy" }</button>
                </div>
            }) }
            { msg_view(&msg) }
          </div>

          if !history.is_empty() {
            <div class="block">
              <div class="block-head">
                <div class="block-title">{ "History" }<span class="tag">{ history.len().to_string() }</span></div>
                <button class="btn" onclick={on_clear}>{ "Clear" }</button>
              </div>
              <table class="matches">
                <tr><th>{ "Short" }</th><th>{ "Original" }</th><th></th></tr>
                { for history.iter().map(|h| html! {
                    <tr>
                      <td class="mono">{ h.short.clone() }</td>
                      <td class="mono">{ h.original.clone() }</td>
                      <td><button class="btn small" onclick={copy(&h.short)}>{ "Copy" }</button></td>
                    </tr>
                }) }
              </table>
            </div>
          }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(n: usize) -> Shortened {
        Shortened {
            original: format!("https://example.com/{n}"),
            short: format!("https://tinyurl.com/x{n}"),
        }
    }

    #[test]
    fn only_absolute_http_urls_pass() {
        assert_eq!(
            validate_url("  https://example.com/a?b=1  ").unwrap(),
            "https://example.com/a?b=1"
        );
        assert!(validate_url("http://localhost:8080").is_ok());
        assert_eq!(validate_url("   ").unwrap_err(), "URL is empty.");
        for bad in ["example.com", "ftp://example.com", "https://exa mple.com", "https://a\"b", "https://"] {
            assert!(validate_url(bad).unwrap_err().starts_with("Invalid URL"), "{bad}");
        }
    }

    #[test]
    fn api_url_encodes_the_target() {
        assert_eq!(
            api_url("https://example.com/a?b=1&c=d e"),
            "https://tinyurl.com/api-create.php?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1%26c%3Dd%20e"
        );
    }

    #[test]
    fn replies_are_checked() {
        assert_eq!(
            read_reply(200, true, "https://tinyurl.com/abc\n"),
            Ok("https://tinyurl.com/abc".to_string())
        );
        assert_eq!(
            read_reply(400, false, "Error").unwrap_err(),
            "Failed to shorten URL (HTTP 400)"
        );
        assert!(read_reply(200, true, "Error").unwrap_err().starts_with("Failed to shorten URL"));
    }

    #[test]
    fn history_is_newest_first_and_capped() {
        let mut history = Vec::new();
        for n in 0..12 {
            history = remember(&history, entry(n));
        }
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0], entry(11));
        assert_eq!(history[9], entry(2));

        let again = Shortened {
            short: "https://tinyurl.com/new".into(),
            ..entry(5)
        };
        let history = remember(&history, again.clone());
        assert_eq!(history.len(), HISTORY_LIMIT);
        assert_eq!(history[0], again);
        assert_eq!(history.iter().filter(|h| h.original == again.original).count(), 1);
    }
}
