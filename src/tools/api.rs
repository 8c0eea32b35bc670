// src/tools/api.rs
//! Small HTTP client panel on top of `fetch`.
use base64::{engine::general_purpose::STANDARD, Engine as _};
use gloo::console;
use gloo_net::http::{Method, RequestBuilder};
use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use crate::widgets::{bind_input, bind_select, bind_textarea, copy_with_message, msg_view};

pub const METHODS: [&str; 7] = ["GET", "POST", "PUT", "PATCH", "DELETE", "HEAD", "OPTIONS"];

/* ---------- helpers ---------- */

fn to_method(name: &str) -> Result<Method, String> {
    Ok(match name {
        "GET" => Method::GET,
        "POST" => Method::POST,
        "PUT" => Method::PUT,
        "PATCH" => Method::PATCH,
        "DELETE" => Method::DELETE,
        "HEAD" => Method::HEAD,
        "OPTIONS" => Method::OPTIONS,
        other => return Err(format!("Unsupported method: {other}")),
    })
}

pub fn sends_body(method: &str) -> bool {
    !matches!(method, "GET" | "HEAD")
}

fn is_token(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c))
}

fn meaningful_lines(text: &str) -> impl Iterator<Item = (usize, &str)> {
    text.lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
}

/// `Name: value` per line; blank lines and `#` comments are skipped.
pub fn parse_headers(text: &str) -> Result<Vec<(String, String)>, String> {
    meaningful_lines(text)
        .map(|(n, line)| {
            let (name, value) = line
                .split_once(':')
                .ok_or_else(|| format!("Header line {n}: expected `Name: value`"))?;
            let name = name.trim();
            if !is_token(name) {
                return Err(format!("Header line {n}: invalid header name {name:?}"));
            }
            Ok((name.to_string(), value.trim().to_string()))
        })
        .collect()
}

/// `key=value` (or bare `key`) per line.
pub fn parse_params(text: &str) -> Vec<(String, String)> {
    meaningful_lines(text)
        .map(|(_, line)| match line.split_once('=') {
            Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
            None => (line.to_string(), String::new()),
        })
        .filter(|(k, _)| !k.is_empty())
        .collect()
}

/// Appends encoded params to `base`, keeping any existing query and fragment.
pub fn build_url(base: &str, params: &[(String, String)]) -> Result<String, String> {
    let base = base.trim();
    if base.is_empty() {
        return Err("Enter a URL.".into());
    }
    if !(base.starts_with("http://") || base.starts_with("https://")) {
        return Err(format!("Invalid URL {base:?}: must start with http:// or https://"));
    }
    if params.is_empty() {
        return Ok(base.to_string());
    }
    let (path, fragment) = match base.split_once('#') {
        Some((p, f)) => (p, Some(f)),
        None => (base, None),
    };
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    let sep = if !path.contains('?') {
        "?"
    } else if path.ends_with('?') || path.ends_with('&') {
        ""
    } else {
        "&"
    };
    let mut url = format!("{path}{sep}{query}");
    if let Some(f) = fragment {
        url.push('#');
        url.push_str(f);
    }
    Ok(url)
}

pub fn basic_auth(user: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{user}:{password}")))
}

/// Pretty-prints JSON bodies; anything else comes back untouched.
pub fn format_body(content_type: Option<&str>, body: &str) -> String {
    let looks_json = content_type.is_some_and(|ct| ct.to_ascii_lowercase().contains("json"))
        || matches!(body.trim_start().chars().next(), Some('{') | Some('['));
    if !looks_json {
        return body.to_string();
    }
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| serde_json::to_string_pretty(&v).ok())
        .unwrap_or_else(|| body.to_string())
}

pub fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "ok",
        300..=399 => "warn",
        _ => "alert",
    }
}

pub fn format_elapsed(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{} ms", ms.round() as u64)
    } else {
        format!("{:.2} s", ms / 1000.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
    pub elapsed_ms: f64,
}

/// Assembles the request from the form fields. Authorization from the auth
/// fields overrides one typed into the headers.
pub fn prepare(
    method: &str,
    url: &str,
    params: &str,
    headers: &str,
    body: &str,
    auth: Option<(&str, &str)>,
) -> Result<ApiRequest, String> {
    let url = build_url(url, &parse_params(params))?;
    let mut headers = parse_headers(headers)?;
    if let Some((user, pass)) = auth.filter(|(u, _)| !u.is_empty()) {
        headers.retain(|(k, _)| !k.eq_ignore_ascii_case("authorization"));
        headers.push(("Authorization".into(), basic_auth(user, pass)));
    }
    let body = (sends_body(method) && !body.trim().is_empty()).then(|| body.to_string());
    Ok(ApiRequest {
        method: method.to_string(),
        url,
        headers,
        body,
    })
}

pub async fn send(req: ApiRequest) -> Result<ApiResponse, String> {
    let mut builder = RequestBuilder::new(&req.url).method(to_method(&req.method)?);
    for (k, v) in &req.headers {
        builder = builder.header(k, v);
    }
    let request = match req.body {
        Some(b) => builder.body(b),
        None => builder.build(),
    }
    .map_err(|e| format!("Request error: {e}"))?;

    let started = js_sys::Date::now();
    let resp = request
        .send()
        .await
        .map_err(|e| format!("Request failed: {e} (network error or blocked by CORS)"))?;
    let headers: Vec<(String, String)> = resp.headers().entries().collect();
    let content_type = headers
        .iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("content-type"))
        .map(|(_, v)| v.clone());
    let raw = resp
        .text()
        .await
        .map_err(|e| format!("Failed reading response body: {e}"))?;
    Ok(ApiResponse {
        status: resp.status(),
        status_text: resp.status_text(),
        headers,
        body: format_body(content_type.as_deref(), &raw),
        elapsed_ms: js_sys::Date::now() - started,
    })
}

/* ---------- panel ---------- */

#[derive(Clone, Copy, PartialEq)]
enum Section {
    Params,
    Headers,
    Body,
    Auth,
}

#[function_component(ApiPanel)]
pub fn api_panel() -> Html {
    let method = use_state(|| "GET".to_string());
    let url = use_state(String::new);
    let params = use_state(String::new);
    let headers = use_state(|| "Accept: application/json".to_string());
    let body = use_state(String::new);
    let user = use_state(String::new);
    let password = use_state(String::new);
    let section = use_state(|| Section::Params);
    let loading = use_state(|| false);
    let response = use_state(|| None::<ApiResponse>);
    let show_headers = use_state(|| false);
    let msg = use_state(String::new);

    let on_send = {
        let (method, url, params, headers, body) =
            (method.clone(), url.clone(), params.clone(), headers.clone(), body.clone());
        let (user, password) = (user.clone(), password.clone());
        let (loading, response, msg) = (loading.clone(), response.clone(), msg.clone());
        Callback::from(move |_| {
            let req = match prepare(
                &method,
                &url,
                &params,
                &headers,
                &body,
                Some((user.as_str(), password.as_str())),
            ) {
                Ok(r) => r,
                Err(e) => {
                    msg.set(e);
                    return;
                }
            };
            loading.set(true);
            msg.set(String::new());
            let (loading, response, msg) = (loading.clone(), response.clone(), msg.clone());
            spawn_local(async move {
                let label = format!("{} {}", req.method, req.url);
                match send(req).await {
                    Ok(r) => {
                        console::log!(format!("{label} -> {}", r.status));
                        response.set(Some(r));
                    }
                    Err(e) => {
                        console::warn!(format!("{label}: {e}"));
                        response.set(None);
                        msg.set(e);
                    }
                }
                loading.set(false);
            });
        })
    };

    let section_button = |s: Section, label: &'static str| {
        let section = section.clone();
        let cls = if *section == s { "btn active" } else { "btn" };
        html! { <button class={cls} onclick={Callback::from(move |_| section.set(s))}>{ label }</button> }
    };

    let editor = match *section {
        Section::Params => html! {
            <textarea value={(*params).clone()} oninput={bind_textarea(params.clone())}
                      placeholder="key=value, one per line" />
        },
        Section::Headers => html! {
            <textarea value={(*headers).clone()} oninput={bind_textarea(headers.clone())}
                      placeholder="Name: value, one per line" />
        },
        Section::Body if !sends_body(&method) => html! {
            <div class="smallnote">{ format!("{} requests are sent without a body.", *method) }</div>
        },
        Section::Body => html! {
            <textarea value={(*body).clone()} oninput={bind_textarea(body.clone())}
                      placeholder="Request body (JSON, text, ...)" />
        },
        Section::Auth => html! {
            <>
              <div class="textline">
                <input type="text" value={(*user).clone()} oninput={bind_input(user.clone())}
                       placeholder="Basic auth user (leave empty for none)" />
              </div>
              <div class="textline">
                <input type="password" value={(*password).clone()} oninput={bind_input(password.clone())}
                       placeholder="Password" />
              </div>
            </>
        },
    };

    let viewer = match &*response {
        None => html! {},
        Some(r) => {
            let on_copy = {
                let msg = msg.clone();
                let text = r.body.clone();
                Callback::from(move |_| copy_with_message(text.clone(), msg.clone(), "Copied response body."))
            };
            let toggle = {
                let show_headers = show_headers.clone();
                Callback::from(move |_| show_headers.set(!*show_headers))
            };
            html! {
                <div class="block">
                  <div class="block-head">
                    <div class="block-title">
                      <span class={status_class(r.status)}>{ format!("{} {}", r.status, r.status_text) }</span>
                      <span class="tag">{ format_elapsed(r.elapsed_ms) }</span>
                    </div>
                    <div class="btnrow">
                      <button class="btn" onclick={toggle}>
                        { if *show_headers { "Show body" } else { "Show headers" } }
                      </button>
                      <button class="btn" onclick={on_copy}>{ "Copy" }</button>
                    </div>
                  </div>
                  if *show_headers {
                    <table class="matches">
                      <tr><th>{ "Name" }</th><th>{ "Value" }</th></tr>
                      { for r.headers.iter().map(|(k, v)| html! {
                          <tr><td class="mono">{ k.clone() }</td><td class="mono">{ v.clone() }</td></tr>
                      }) }
                    </table>
                  } else {
                    <pre class="diff">{ r.body.clone() }</pre>
                  }
                </div>
            }
        }
    };

    html! {
        <div class="panel">
          <div class="block">
            <div class="block-head"><div class="block-title">{ "API Tester" }</div></div>
            <div class="textline">
              <select onchange={bind_select(method.clone())}>
                { for METHODS.iter().map(|m| html! {
                    <option value={*m} selected={*m == method.as_str()}>{ *m }</option>
                }) }
              </select>
              <input type="text" value={(*url).clone()} oninput={bind_input(url.clone())}
                     placeholder="https://api.example.com/items" />
              <button class="btn" onclick={on_send} disabled={*loading || url.trim().is_empty()}>
                { if *loading { "Sending..." } else { "Send" } }
              </button>
            </div>
            <div class="btnrow">
              { section_button(Section::Params, "Params") }
              { section_button(Section::Headers, "Headers") }
              { section_button(Section::Body, "Body") }
              { section_button(Section::Auth, "Auth") }
            </div>
            { editor }
          </div>
          { msg_view(&msg) }
          { viewer }
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(v: &[(&str, &str)]) -> Vec<(String, String)> {
        v.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn headers_parse_and_reject_bad_lines() {
        let h = parse_headers("Accept: application/json\n\n# note\nX-Token:  abc:def ").unwrap();
        assert_eq!(h, pairs(&[("Accept", "application/json"), ("X-Token", "abc:def")]));
        assert_eq!(
            parse_headers("Accept application/json").unwrap_err(),
            "Header line 1: expected `Name: value`"
        );
        assert!(parse_headers("Bad Name: x").unwrap_err().contains("invalid header name"));
    }

    #[test]
    fn params_encode_into_url() {
        let p = parse_params("q=rust lang\nflag\n=skipped\npage = 2");
        assert_eq!(p, pairs(&[("q", "rust lang"), ("flag", ""), ("page", "2")]));
        assert_eq!(
            build_url("https://x.dev/search", &p).unwrap(),
            "https://x.dev/search?q=rust%20lang&flag=&page=2"
        );
        assert_eq!(
            build_url("https://x.dev/s?a=1#top", &pairs(&[("b", "&")])).unwrap(),
            "https://x.dev/s?a=1&b=%26#top"
        );
        assert_eq!(build_url(" https://x.dev ", &[]).unwrap(), "https://x.dev");
        assert!(build_url("ftp://x", &[]).unwrap_err().starts_with("Invalid URL"));
        assert_eq!(build_url("", &[]).unwrap_err(), "Enter a URL.");
    }

    #[test]
    fn basic_auth_header() {
        assert_eq!(basic_auth("Aladdin", "open sesame"), "Basic QWxhZGRpbjpvcGVuIHNlc2FtZQ==");
    }

    #[test]
    fn prepare_applies_auth_and_drops_get_body() {
        let req = prepare(
            "GET",
            "https://x.dev",
            "",
            "authorization: old\nAccept: */*",
            "{\"ignored\":true}",
            Some(("u", "p")),
        )
        .unwrap();
        assert_eq!(req.body, None);
        assert_eq!(
            req.headers,
            pairs(&[("Accept", "*/*"), ("Authorization", &basic_auth("u", "p"))])
        );

        let post = prepare("POST", "https://x.dev", "", "", "hi", Some(("", ""))).unwrap();
        assert_eq!(post.body.as_deref(), Some("hi"));
        assert!(post.headers.is_empty());
    }

    #[test]
    fn body_formatting() {
        assert_eq!(format_body(Some("application/json"), r#"{"a":1}"#), "{\n  \"a\": 1\n}");
        assert_eq!(format_body(None, "[1]"), "[\n  1\n]");
        assert_eq!(format_body(Some("text/plain"), "hello"), "hello");
        assert_eq!(format_body(Some("application/json"), "{broken"), "{broken");
    }

    #[test]
    fn status_and_timing_labels() {
        assert_eq!(status_class(204), "ok");
        assert_eq!(status_class(301), "warn");
        assert_eq!(status_class(404), "alert");
        assert_eq!(format_elapsed(42.4), "42 ms");
        assert_eq!(format_elapsed(1534.0), "1.53 s");
    }
}
