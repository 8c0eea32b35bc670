// src/tools/json.rs
//! JSON visualizer: format, minify, sort keys, browse as a tree.
use std::collections::HashSet;

use gloo::console;
use gloo::file::callbacks::{read_as_text, FileReader};
use serde_json::{Map, Value};
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::widgets::{bind_textarea, copy_with_message, msg_view};

/* ---------- helpers ---------- */

pub fn parse(input: &str) -> Result<Value, String> {
    serde_json::from_str(input).map_err(|e| format!("JSON parse error: {e}"))
}

pub fn pretty(input: &str) -> Result<String, String> {
    let v = parse(input)?;
    serde_json::to_string_pretty(&v).map_err(|e| format!("JSON stringify error: {e}"))
}

pub fn minify(input: &str) -> Result<String, String> {
    let v = parse(input)?;
    serde_json::to_string(&v).map_err(|e| format!("JSON stringify error: {e}"))
}

/// Orders object keys alphabetically at every level. Array order is kept.
pub fn sort_keys(v: &mut Value) {
    match v {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = std::mem::take(map).into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            *map = entries
                .into_iter()
                .map(|(k, mut child)| {
                    sort_keys(&mut child);
                    (k, child)
                })
                .collect::<Map<String, Value>>();
        }
        Value::Array(items) => items.iter_mut().for_each(sort_keys),
        _ => {}
    }
}

/// Parse, sort keys, pretty-print. Also what the diff tool compares in JSON mode.
pub fn normalize(input: &str) -> Result<String, String> {
    let mut v = parse(input)?;
    sort_keys(&mut v);
    serde_json::to_string_pretty(&v).map_err(|e| format!("JSON stringify error: {e}"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    String,
    Number,
    Bool,
    Null,
}

impl NodeKind {
    pub fn of(v: &Value) -> Self {
        match v {
            Value::Object(_) => NodeKind::Object,
            Value::Array(_) => NodeKind::Array,
            Value::String(_) => NodeKind::String,
            Value::Number(_) => NodeKind::Number,
            Value::Bool(_) => NodeKind::Bool,
            Value::Null => NodeKind::Null,
        }
    }

    pub fn css(self) -> &'static str {
        match self {
            NodeKind::Object | NodeKind::Array => "j-container",
            NodeKind::String => "j-string",
            NodeKind::Number => "j-number",
            NodeKind::Bool => "j-bool",
            NodeKind::Null => "j-null",
        }
    }
}

/// One visible line of the tree view.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeRow {
    /// JSON Pointer to the node (`""`, `/key`, `/0`); also the collapse key.
    pub path: String,
    pub depth: usize,
    pub label: Option<String>,
    pub kind: NodeKind,
    pub summary: String,
    pub collapsed: bool,
}

const PREVIEW_CHARS: usize = 80;

fn summary(v: &Value) -> String {
    fn plural(n: usize, one: &str, many: &str) -> String {
        format!("{n} {}", if n == 1 { one } else { many })
    }
    match v {
        Value::Object(m) => format!("{{ {} }}", plural(m.len(), "property", "properties")),
        Value::Array(a) => format!("[ {} ]", plural(a.len(), "item", "items")),
        Value::String(s) if s.chars().count() > PREVIEW_CHARS => {
            let cut: String = s.chars().take(PREVIEW_CHARS).collect();
            format!("\"{cut}...\"")
        }
        Value::String(s) => format!("\"{s}\""),
        other => other.to_string(),
    }
}

/// One JSON Pointer segment (RFC 6901): `~` and `/` inside keys are escaped so
/// every node gets a distinct path.
fn pointer_segment(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

/// Flattens `value` into display rows, skipping the children of any path in
/// `collapsed`. Paths are JSON Pointers; the root is `""`.
pub fn tree_rows(value: &Value, collapsed: &HashSet<String>) -> Vec<TreeRow> {
    let mut rows = Vec::new();
    walk(value, String::new(), None, 0, collapsed, &mut rows);
    rows
}

fn walk(
    v: &Value,
    path: String,
    label: Option<String>,
    depth: usize,
    collapsed: &HashSet<String>,
    rows: &mut Vec<TreeRow>,
) {
    let is_collapsed = collapsed.contains(&path);
    rows.push(TreeRow {
        path: path.clone(),
        depth,
        label,
        kind: NodeKind::of(v),
        summary: summary(v),
        collapsed: is_collapsed,
    });
    if is_collapsed {
        return;
    }
    match v {
        Value::Object(map) => {
            for (k, child) in map {
                walk(child, format!("{path}/{}", pointer_segment(k)), Some(k.clone()), depth + 1, collapsed, rows);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                walk(child, format!("{path}/{i}"), Some(i.to_string()), depth + 1, collapsed, rows);
            }
        }
        _ => {}
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct JsonStats {
    pub objects: usize,
    pub arrays: usize,
    pub strings: usize,
    pub numbers: usize,
    pub bools: usize,
    pub nulls: usize,
    pub keys: usize,
    /// Root alone is depth 0.
    pub max_depth: usize,
}

pub fn stats(value: &Value) -> JsonStats {
    fn go(v: &Value, depth: usize, s: &mut JsonStats) {
        s.max_depth = s.max_depth.max(depth);
        match v {
            Value::Object(m) => {
                s.objects += 1;
                s.keys += m.len();
                m.values().for_each(|c| go(c, depth + 1, s));
            }
            Value::Array(a) => {
                s.arrays += 1;
                a.iter().for_each(|c| go(c, depth + 1, s));
            }
            Value::String(_) => s.strings += 1,
            Value::Number(_) => s.numbers += 1,
            Value::Bool(_) => s.bools += 1,
            Value::Null => s.nulls += 1,
        }
    }
    let mut s = JsonStats::default();
    go(value, 0, &mut s);
    s
}

/* ---------- panel ---------- */

#[function_component(JsonPanel)]
pub fn json_panel() -> Html {
    let input = use_state(String::new);
    let msg = use_state(String::new);
    let collapsed = use_state(HashSet::<String>::new);
    let reader = use_mut_ref(|| None::<FileReader>);

    let rewrite = |f: fn(&str) -> Result<String, String>, done: &'static str| {
        let input = input.clone();
        let msg = msg.clone();
        Callback::from(move |_: MouseEvent| {
            if input.trim().is_empty() {
                msg.set("Paste some JSON first.".into());
                return;
            }
            match f(&input) {
                Ok(out) => {
                    input.set(out);
                    msg.set(done.into());
                }
                Err(e) => msg.set(e),
            }
        })
    };
    let on_pretty = rewrite(pretty, "Formatted.");
    let on_minify = rewrite(minify, "Minified.");
    let on_sort = rewrite(normalize, "Keys sorted.");

    let on_clear = {
        let input = input.clone();
        let msg = msg.clone();
        let collapsed = collapsed.clone();
        Callback::from(move |_| {
            input.set(String::new());
            msg.set(String::new());
            collapsed.set(HashSet::new());
        })
    };

    let on_copy = {
        let input = input.clone();
        let msg = msg.clone();
        Callback::from(move |_| copy_with_message((*input).clone(), msg.clone(), "Copied JSON."))
    };

    let on_file = {
        let input = input.clone();
        let msg = msg.clone();
        let reader = reader.clone();
        Callback::from(move |e: Event| {
            let el: HtmlInputElement = e.target_unchecked_into();
            let Some(file) = el.files().and_then(|l| l.get(0)) else {
                return;
            };
            let name = file.name();
            let input = input.clone();
            let msg = msg.clone();
            let task = read_as_text(&gloo::file::File::from(file), move |res| match res {
                Ok(text) => {
                    input.set(text);
                    msg.set(format!("Loaded {name}."));
                }
                Err(err) => {
                    console::warn!(format!("read {name}: {err}"));
                    msg.set(format!("Failed to read {name}: {err}"));
                }
            });
            *reader.borrow_mut() = Some(task);
            el.set_value("");
        })
    };

    let toggle = {
        let collapsed = collapsed.clone();
        Callback::from(move |path: String| {
            let mut next = (*collapsed).clone();
            if !next.remove(&path) {
                next.insert(path);
            }
            collapsed.set(next);
        })
    };

    let parsed = if input.trim().is_empty() {
        None
    } else {
        Some(parse(&input))
    };

    let tree = match &parsed {
        Some(Ok(value)) => {
            let s = stats(value);
            let rows = tree_rows(value, &collapsed);
            html! {
                <>
                  <div class="kv">
                    <span class="tag">{ format!("{} objects", s.objects) }</span>
                    <span class="tag">{ format!("{} arrays", s.arrays) }</span>
                    <span class="tag">{ format!("{} keys", s.keys) }</span>
                    <span class="tag">{ format!("{} strings", s.strings) }</span>
                    <span class="tag">{ format!("{} numbers", s.numbers) }</span>
                    <span class="tag">{ format!("{} booleans", s.bools) }</span>
                    <span class="tag">{ format!("{} nulls", s.nulls) }</span>
                    <span class="tag">{ format!("depth {}", s.max_depth) }</span>
                  </div>
                  <div class="tree mono">
                    { for rows.into_iter().map(|row| {
                        let container = matches!(row.kind, NodeKind::Object | NodeKind::Array);
                        let onclick = {
                            let toggle = toggle.clone();
                            let path = row.path.clone();
                            Callback::from(move |_| toggle.emit(path.clone()))
                        };
                        let marker = match (container, row.collapsed) {
                            (false, _) => "  ",
                            (true, true) => "▸ ",
                            (true, false) => "▾ ",
                        };
                        html! {
                            <div class="tree-row" style={format!("padding-left:{}px", row.depth * 16)}
                                 title={if row.path.is_empty() { "/".to_string() } else { row.path.clone() }}
                                 onclick={if container { Some(onclick) } else { None }}>
                              { marker }
                              { for row.label.map(|l| html!{ <span class="j-key">{ format!("{l}: ") }</span> }) }
                              <span class={row.kind.css()}>{ row.summary }</span>
                            </div>
                        }
                    }) }
                  </div>
                </>
            }
        }
        Some(Err(e)) => msg_view(e),
        None => html! { <div class="smallnote">{ "The tree shows up once the input parses." }</div> },
    };

    html! {
        <div class="panel two-col">
          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "Input JSON" }</div>
              <div class="btnrow">
                <button class="btn" onclick={on_pretty}>{ "Format" }</button>
                <button class="btn" onclick={on_minify}>{ "Minify" }</button>
                <button class="btn" onclick={on_sort}>{ "Sort keys" }</button>
                <button class="btn" onclick={on_copy}>{ "Copy" }</button>
                <button class="btn" onclick={on_clear}>{ "Clear" }</button>
              </div>
            </div>
            <textarea value={(*input).clone()} oninput={bind_textarea(input.clone())}
                      placeholder="{ \"hello\": \"world\" }" />
            <input type="file" accept=".json,application/json" onchange={on_file} />
            { msg_view(&msg) }
          </div>
          <div class="block">
            <div class="block-head"><div class="block-title">{ "Tree" }</div></div>
            { tree }
          </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn pretty_and_minify() {
        assert_eq!(minify("{ \"a\" : [1, 2] }").unwrap(), r#"{"a":[1,2]}"#);
        assert_eq!(pretty(r#"{"a":1}"#).unwrap(), "{\n  \"a\": 1\n}");
        assert!(pretty("{oops").unwrap_err().starts_with("JSON parse error"));
    }

    #[test]
    fn input_key_order_is_kept_until_sorted() {
        assert_eq!(minify(r#"{"b":1,"a":2}"#).unwrap(), r#"{"b":1,"a":2}"#);
        let mut v = json!({ "z": { "y": 1, "x": [ { "d": 0, "c": 0 } ] }, "a": null });
        sort_keys(&mut v);
        assert_eq!(
            serde_json::to_string(&v).unwrap(),
            r#"{"a":null,"z":{"x":[{"c":0,"d":0}],"y":1}}"#
        );
    }

    #[test]
    fn tree_rows_follow_paths() {
        let v = json!({ "name": "x", "tags": ["a", "b"], "n": null });
        let rows = tree_rows(&v, &HashSet::new());
        let paths: Vec<_> = rows.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(
            paths,
            vec!["", "/name", "/tags", "/tags/0", "/tags/1", "/n"]
        );
        assert_eq!(rows[0].summary, "{ 3 properties }");
        assert_eq!(rows[2].summary, "[ 2 items ]");
        assert_eq!(rows[3].depth, 2);
        assert_eq!(rows[5].kind, NodeKind::Null);
    }

    #[test]
    fn collapsed_paths_hide_children() {
        let v = json!({ "tags": ["a", "b"], "k": 1 });
        let collapsed: HashSet<String> = ["/tags".to_string()].into_iter().collect();
        let rows = tree_rows(&v, &collapsed);
        assert_eq!(rows.len(), 3);
        assert!(rows[1].collapsed);
    }

    #[test]
    fn dotted_and_slashed_keys_get_their_own_paths() {
        let v = json!({ "a.b": { "x": 1 }, "a": { "b": { "y": 2 } }, "c/d": { "~": 0 } });
        let paths: Vec<_> = tree_rows(&v, &HashSet::new()).into_iter().map(|r| r.path).collect();
        assert!(paths.contains(&"/a.b".to_string()));
        assert!(paths.contains(&"/a/b".to_string()));
        assert!(paths.contains(&"/c~1d/~0".to_string()));

        let collapsed: HashSet<String> = ["/a/b".to_string()].into_iter().collect();
        let rows = tree_rows(&v, &collapsed);
        let folded: Vec<_> = rows.iter().filter(|r| r.collapsed).map(|r| r.path.as_str()).collect();
        assert_eq!(folded, vec!["/a/b"]);
        assert!(rows.iter().any(|r| r.path == "/a.b/x"));
        assert!(!rows.iter().any(|r| r.path == "/a/b/y"));
    }

    #[test]
    fn long_strings_are_cut_in_previews() {
        let long = "x".repeat(200);
        let rows = tree_rows(&Value::String(long), &HashSet::new());
        assert!(rows[0].summary.ends_with("...\""));
        assert_eq!(rows[0].summary.chars().count(), PREVIEW_CHARS + 5);
    }

    #[test]
    fn stats_count_every_node() {
        let v = json!({ "a": [1, 2.5, "s", true, null, { "b": {} }] });
        let s = stats(&v);
        assert_eq!(s.objects, 3);
        assert_eq!(s.arrays, 1);
        assert_eq!(s.numbers, 2);
        assert_eq!((s.strings, s.bools, s.nulls), (1, 1, 1));
        assert_eq!(s.keys, 2);
        assert_eq!(s.max_depth, 3);
    }
}
