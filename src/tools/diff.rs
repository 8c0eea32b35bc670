// src/tools/diff.rs
use similar::{ChangeTag, TextDiff};
use yew::prelude::*;

use super::json::normalize;
use crate::widgets::{bind_checkbox, bind_textarea, copy_with_message, msg_view};

/* ---------- helpers ---------- */

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Granularity {
    Lines,
    Words,
    Chars,
}

impl Granularity {
    pub const ALL: [Granularity; 3] = [Granularity::Lines, Granularity::Words, Granularity::Chars];

    pub fn label(self) -> &'static str {
        match self {
            Granularity::Lines => "Lines",
            Granularity::Words => "Words",
            Granularity::Chars => "Characters",
        }
    }
}

fn text_diff<'a>(a: &'a str, b: &'a str, by: Granularity) -> TextDiff<'a, 'a, 'a, str> {
    match by {
        Granularity::Lines => TextDiff::from_lines(a, b),
        Granularity::Words => TextDiff::from_words(a, b),
        Granularity::Chars => TextDiff::from_chars(a, b),
    }
}

/// A run of text that is kept, inserted or deleted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub tag: ChangeTag,
    pub text: String,
}

/// Inline diff; adjacent changes with the same tag are merged.
pub fn segments(a: &str, b: &str, by: Granularity) -> Vec<Segment> {
    let diff = text_diff(a, b, by);
    let mut out: Vec<Segment> = Vec::new();
    for change in diff.iter_all_changes() {
        match out.last_mut() {
            Some(last) if last.tag == change.tag() => last.text.push_str(change.value()),
            _ => out.push(Segment {
                tag: change.tag(),
                text: change.value().to_string(),
            }),
        }
    }
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffCounts {
    pub added: usize,
    pub removed: usize,
    pub unchanged: usize,
}

/// Counted in units of `by` (lines, word tokens, characters).
pub fn counts(a: &str, b: &str, by: Granularity) -> DiffCounts {
    let diff = text_diff(a, b, by);
    let mut c = DiffCounts::default();
    for change in diff.iter_all_changes() {
        match change.tag() {
            ChangeTag::Insert => c.added += 1,
            ChangeTag::Delete => c.removed += 1,
            ChangeTag::Equal => c.unchanged += 1,
        }
    }
    c
}

pub fn unified(a: &str, b: &str, context: usize) -> String {
    TextDiff::from_lines(a, b)
        .unified_diff()
        .context_radius(context)
        .header("original", "modified")
        .to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiffKind {
    Meta,
    Add,
    Del,
    Ctx,
}

impl DiffKind {
    pub fn css(self) -> &'static str {
        match self {
            DiffKind::Meta => "meta",
            DiffKind::Add => "add",
            DiffKind::Del => "del",
            DiffKind::Ctx => "ctx",
        }
    }
}

pub fn classify_unified(diff: &str) -> Vec<(DiffKind, &str)> {
    diff.lines()
        .map(|line| {
            let kind = if line.starts_with("+++") || line.starts_with("---") || line.starts_with("@@") {
                DiffKind::Meta
            } else if line.starts_with('+') {
                DiffKind::Add
            } else if line.starts_with('-') {
                DiffKind::Del
            } else {
                DiffKind::Ctx
            };
            (kind, line)
        })
        .collect()
}

/// One row of the side-by-side view. Line numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SideRow {
    Same(usize, usize, String),
    Changed((usize, String), (usize, String)),
    Removed(usize, String),
    Added(usize, String),
}

/// Pairs deleted and inserted lines of each changed hunk so edits line up.
pub fn side_by_side(a: &str, b: &str) -> Vec<SideRow> {
    fn flush(rows: &mut Vec<SideRow>, dels: &mut Vec<(usize, String)>, ins: &mut Vec<(usize, String)>) {
        let mut d = dels.drain(..);
        let mut i = ins.drain(..);
        loop {
            match (d.next(), i.next()) {
                (Some(l), Some(r)) => rows.push(SideRow::Changed(l, r)),
                (Some((n, t)), None) => rows.push(SideRow::Removed(n, t)),
                (None, Some((n, t))) => rows.push(SideRow::Added(n, t)),
                (None, None) => break,
            }
        }
    }

    let diff = TextDiff::from_lines(a, b);
    let mut rows = Vec::new();
    let (mut dels, mut ins) = (Vec::new(), Vec::new());
    for change in diff.iter_all_changes() {
        let text = change.value().trim_end_matches(['\n', '\r']).to_string();
        match change.tag() {
            ChangeTag::Delete => dels.push((change.old_index().unwrap_or(0) + 1, text)),
            ChangeTag::Insert => ins.push((change.new_index().unwrap_or(0) + 1, text)),
            ChangeTag::Equal => {
                flush(&mut rows, &mut dels, &mut ins);
                rows.push(SideRow::Same(
                    change.old_index().unwrap_or(0) + 1,
                    change.new_index().unwrap_or(0) + 1,
                    text,
                ));
            }
        }
    }
    flush(&mut rows, &mut dels, &mut ins);
    rows
}

/// Both sides, JSON-normalized when `as_json` is set.
pub fn prepare(left: &str, right: &str, as_json: bool) -> Result<(String, String), String> {
    if !as_json || (left.trim().is_empty() && right.trim().is_empty()) {
        return Ok((left.to_string(), right.to_string()));
    }
    let a = normalize(left).map_err(|e| format!("Left: {e}"))?;
    let b = normalize(right).map_err(|e| format!("Right: {e}"))?;
    Ok((a, b))
}

/* ---------- panel ---------- */

#[derive(Clone, Copy, PartialEq)]
enum View {
    Inline,
    SideBySide,
    Unified,
}

#[function_component(DiffPanel)]
pub fn diff_panel() -> Html {
    let left = use_state(String::new);
    let right = use_state(String::new);
    let as_json = use_state(|| false);
    let by = use_state(|| Granularity::Lines);
    let view = use_state(|| View::SideBySide);
    let msg = use_state(String::new);

    let prepared = prepare(&left, &right, *as_json);
    let unified_text = prepared
        .as_ref()
        .map(|(a, b)| unified(a, b, 3))
        .unwrap_or_default();

    let on_copy = {
        let msg = msg.clone();
        let text = unified_text.clone();
        Callback::from(move |_| copy_with_message(text.clone(), msg.clone(), "Copied unified diff."))
    };

    let on_clear = {
        let left = left.clone();
        let right = right.clone();
        let msg = msg.clone();
        Callback::from(move |_| {
            left.set(String::new());
            right.set(String::new());
            msg.set(String::new());
        })
    };

    let on_swap = {
        let left = left.clone();
        let right = right.clone();
        Callback::from(move |_| {
            let a = (*left).clone();
            left.set((*right).clone());
            right.set(a);
        })
    };

    let view_button = |v: View, label: &'static str| {
        let view = view.clone();
        let cls = if *view == v { "btn active" } else { "btn" };
        html! { <button class={cls} onclick={Callback::from(move |_| view.set(v))}>{ label }</button> }
    };

    let body = match &prepared {
        Err(e) => msg_view(e),
        Ok((a, b)) if a.trim().is_empty() && b.trim().is_empty() => html! {
            <div class="smallnote">{ "Enter text on both sides to see the differences." }</div>
        },
        Ok((a, b)) => {
            let c = counts(a, b, *by);
            let summary = html! {
                <div class="kv">
                  <span class="tag add">{ format!("+{} added", c.added) }</span>
                  <span class="tag del">{ format!("-{} removed", c.removed) }</span>
                  <span class="tag">{ format!("{} unchanged", c.unchanged) }</span>
                </div>
            };
            let rendered = match *view {
                View::Inline => html! {
                    <pre class="diff inline">
                      { for segments(a, b, *by).into_iter().map(|s| {
                          let cls = match s.tag {
                              ChangeTag::Insert => "add",
                              ChangeTag::Delete => "del",
                              ChangeTag::Equal => "ctx",
                          };
                          html! { <span class={cls}>{ s.text }</span> }
                      }) }
                    </pre>
                },
                View::SideBySide => html! {
                    <table class="diff side">
                      { for side_by_side(a, b).into_iter().map(|row| match row {
                          SideRow::Same(l, r, t) => html! {
                              <tr class="ctx"><td>{ l.to_string() }</td><td>{ t.clone() }</td><td>{ r.to_string() }</td><td>{ t }</td></tr>
                          },
                          SideRow::Changed((l, lt), (r, rt)) => html! {
                              <tr><td>{ l.to_string() }</td><td class="del">{ lt }</td><td>{ r.to_string() }</td><td class="add">{ rt }</td></tr>
                          },
                          SideRow::Removed(l, t) => html! {
                              <tr><td>{ l.to_string() }</td><td class="del">{ t }</td><td /><td /></tr>
                          },
                          SideRow::Added(r, t) => html! {
                              <tr><td /><td /><td>{ r.to_string() }</td><td class="add">{ t }</td></tr>
                          },
                      }) }
                    </table>
                },
                View::Unified => html! {
                    <pre class="diff">
                      { for classify_unified(&unified_text).into_iter().map(|(kind, line)| {
                          html! { <span class={kind.css()}>{ format!("{line}\n") }</span> }
                      }) }
                    </pre>
                },
            };
            html! { <>{ summary }{ rendered }</> }
        }
    };

    html! {
        <div class="panel">
          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "Text Comparison" }</div>
              <div class="btnrow">
                { view_button(View::SideBySide, "Side by side") }
                { view_button(View::Inline, "Inline") }
                { view_button(View::Unified, "Unified") }
                <button class="btn" onclick={on_swap}>{ "Swap" }</button>
                <button class="btn" onclick={on_copy}>{ "Copy Diff" }</button>
                <button class="btn" onclick={on_clear}>{ "Clear" }</button>
              </div>
            </div>
            <div class="panel two-col">
              <textarea value={(*left).clone()} oninput={bind_textarea(left.clone())}
                        placeholder="Original text" />
              <textarea value={(*right).clone()} oninput={bind_textarea(right.clone())}
                        placeholder="Modified text" />
            </div>
            <div class="btnrow">
              <label class="smallnote">
                <input type="checkbox" checked={*as_json} onchange={bind_checkbox(as_json.clone())} />
                { " Normalize as JSON (sorted keys)" }
              </label>
              { for Granularity::ALL.into_iter().map(|g| {
                  let by = by.clone();
                  let cls = if *by == g { "btn active" } else { "btn" };
                  html! { <button class={cls} onclick={Callback::from(move |_| by.set(g))}>{ g.label() }</button> }
              }) }
            </div>
          </div>
          { msg_view(&msg) }
          <div class="block">{ body }</div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: &str = "a\nb\nc\n";
    const B: &str = "a\nB\nc\nd\n";

    #[test]
    fn line_counts() {
        assert_eq!(
            counts(A, B, Granularity::Lines),
            DiffCounts {
                added: 2,
                removed: 1,
                unchanged: 2
            }
        );
        assert_eq!(counts(A, A, Granularity::Lines).added, 0);
    }

    #[test]
    fn word_segments_merge_runs() {
        let segs = segments("the quick fox", "the slow fox", Granularity::Words);
        let flat: Vec<(ChangeTag, &str)> = segs.iter().map(|s| (s.tag, s.text.as_str())).collect();
        assert_eq!(
            flat,
            vec![
                (ChangeTag::Equal, "the "),
                (ChangeTag::Delete, "quick"),
                (ChangeTag::Insert, "slow"),
                (ChangeTag::Equal, " fox"),
            ]
        );
    }

    #[test]
    fn char_segments_rebuild_both_sides() {
        let segs = segments("kitten", "sitting", Granularity::Chars);
        let old: String = segs
            .iter()
            .filter(|s| s.tag != ChangeTag::Insert)
            .map(|s| s.text.as_str())
            .collect();
        let new: String = segs
            .iter()
            .filter(|s| s.tag != ChangeTag::Delete)
            .map(|s| s.text.as_str())
            .collect();
        assert_eq!((old.as_str(), new.as_str()), ("kitten", "sitting"));
    }

    #[test]
    fn unified_has_headers_and_classified_lines() {
        let u = unified(A, B, 3);
        assert!(u.contains("--- original"));
        assert!(u.contains("+++ modified"));
        let lines = classify_unified(&u);
        assert!(lines.contains(&(DiffKind::Del, "-b")));
        assert!(lines.contains(&(DiffKind::Add, "+B")));
        assert!(lines.contains(&(DiffKind::Add, "+d")));
        assert!(lines.iter().any(|(k, l)| *k == DiffKind::Meta && l.starts_with("@@")));
    }

    #[test]
    fn side_by_side_pairs_replacements() {
        assert_eq!(
            side_by_side(A, B),
            vec![
                SideRow::Same(1, 1, "a".into()),
                SideRow::Changed((2, "b".into()), (2, "B".into())),
                SideRow::Same(3, 3, "c".into()),
                SideRow::Added(4, "d".into()),
            ]
        );
    }

    #[test]
    fn json_mode_ignores_key_order() {
        let (a, b) = prepare(r#"{"b":2,"a":1}"#, r#"{ "a": 1, "b": 2 }"#, true).unwrap();
        assert_eq!(a, b);
        assert_eq!(counts(&a, &b, Granularity::Lines).added, 0);
        assert!(prepare("{", "{}", true).unwrap_err().starts_with("Left:"));
    }
}
