// src/tools/regex_builder.rs
use regex::{Regex, RegexBuilder};
use yew::prelude::*;

use crate::widgets::{bind_input, bind_textarea, copy_with_message, msg_view};

/// Rendering stops after this many matches.
pub const MAX_MATCHES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Flags {
    /// All matches instead of the first.
    pub global: bool,
    pub case_insensitive: bool,
    pub multi_line: bool,
    pub dot_all: bool,
    pub extended: bool,
    pub swap_greed: bool,
}

impl Default for Flags {
    fn default() -> Self {
        Self {
            global: true,
            case_insensitive: false,
            multi_line: false,
            dot_all: false,
            extended: false,
            swap_greed: false,
        }
    }
}

/// (letter, description) in display order.
pub const FLAG_LETTERS: [(char, &str); 6] = [
    ('g', "global"),
    ('i', "case insensitive"),
    ('m', "multiline"),
    ('s', "dot matches newline"),
    ('x', "ignore whitespace"),
    ('U', "swap greed"),
];

impl Flags {
    pub fn parse(s: &str) -> Result<Self, String> {
        let mut f = Flags {
            global: false,
            ..Flags::default()
        };
        for c in s.chars() {
            if !f.set(c, true) {
                return Err(format!("Invalid flag '{c}' (allowed: gimsxU)"));
            }
        }
        Ok(f)
    }

    fn slot(&mut self, c: char) -> Option<&mut bool> {
        match c {
            'g' => Some(&mut self.global),
            'i' => Some(&mut self.case_insensitive),
            'm' => Some(&mut self.multi_line),
            's' => Some(&mut self.dot_all),
            'x' => Some(&mut self.extended),
            'U' => Some(&mut self.swap_greed),
            _ => None,
        }
    }

    pub fn set(&mut self, c: char, on: bool) -> bool {
        self.slot(c).map(|v| *v = on).is_some()
    }

    pub fn has(&self, c: char) -> bool {
        let mut copy = *self;
        copy.slot(c).is_some_and(|v| *v)
    }

    pub fn toggled(mut self, c: char) -> Self {
        if let Some(v) = self.slot(c) {
            *v = !*v;
        }
        self
    }

    pub fn letters(&self) -> String {
        FLAG_LETTERS
            .iter()
            .filter(|(c, _)| self.has(*c))
            .map(|(c, _)| *c)
            .collect()
    }
}

pub fn compile(pattern: &str, flags: Flags) -> Result<Regex, String> {
    RegexBuilder::new(pattern)
        .case_insensitive(flags.case_insensitive)
        .multi_line(flags.multi_line)
        .dot_matches_new_line(flags.dot_all)
        .ignore_whitespace(flags.extended)
        .swap_greed(flags.swap_greed)
        .build()
        .map_err(|e| format!("Regex error: {e}"))
}

/// `/pattern/flags`, with bare slashes escaped.
pub fn literal(pattern: &str, flags: Flags) -> String {
    let mut escaped = String::with_capacity(pattern.len());
    let mut prev_backslash = false;
    for c in pattern.chars() {
        if c == '/' && !prev_backslash {
            escaped.push('\\');
        }
        prev_backslash = c == '\\' && !prev_backslash;
        escaped.push(c);
    }
    format!("/{escaped}/{}", flags.letters())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupInfo {
    pub index: usize,
    pub name: Option<String>,
    pub span: Option<(usize, usize)>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchInfo {
    pub start: usize,
    pub end: usize,
    pub text: String,
    pub groups: Vec<GroupInfo>,
}

pub fn find_matches(re: &Regex, text: &str, global: bool) -> Vec<MatchInfo> {
    let names: Vec<Option<&str>> = re.capture_names().collect();
    let limit = if global { MAX_MATCHES } else { 1 };
    re.captures_iter(text)
        .take(limit)
        .filter_map(|caps| {
            let m0 = caps.get(0)?;
            let groups = (1..caps.len())
                .map(|gi| {
                    let g = caps.get(gi);
                    GroupInfo {
                        index: gi,
                        name: names.get(gi).copied().flatten().map(str::to_string),
                        span: g.map(|g| (g.start(), g.end())),
                        text: g.map(|g| g.as_str().to_string()),
                    }
                })
                .collect();
            Some(MatchInfo {
                start: m0.start(),
                end: m0.end(),
                text: m0.as_str().to_string(),
                groups,
            })
        })
        .collect()
}

/// Splits `text` into (is_match, piece) runs for the highlight view.
pub fn highlight(text: &str, matches: &[MatchInfo]) -> Vec<(bool, String)> {
    let mut out = Vec::new();
    let mut at = 0;
    for m in matches.iter().filter(|m| m.end > m.start) {
        if m.start > at {
            out.push((false, text[at..m.start].to_string()));
        }
        out.push((true, text[m.start..m.end].to_string()));
        at = m.end;
    }
    if at < text.len() {
        out.push((false, text[at..].to_string()));
    }
    out
}

/// `$1` / `${name}` expand to groups.
pub fn replace(re: &Regex, text: &str, replacement: &str, global: bool) -> String {
    if global {
        re.replace_all(text, replacement).into_owned()
    } else {
        re.replace(text, replacement).into_owned()
    }
}

/// Snippets the token buttons append to the pattern.
pub const TOKENS: &[(&str, &str)] = &[
    (r"\d", "digit"),
    (r"\w", "word char"),
    (r"\s", "whitespace"),
    (r"\b", "word boundary"),
    (".", "any char"),
    ("^", "start"),
    ("$", "end"),
    ("[a-z]", "range"),
    ("(...)", "group"),
    ("(?P<name>...)", "named group"),
    ("(?:...)", "non-capturing"),
    ("+", "1 or more"),
    ("*", "0 or more"),
    ("?", "optional"),
    ("{2,4}", "2 to 4"),
];

/* ---------- panel ---------- */

#[derive(Clone, Copy, PartialEq)]
enum View {
    Matches,
    Replace,
    Highlight,
}

#[function_component(RegexPanel)]
pub fn regex_panel() -> Html {
    let pattern = use_state(String::new);
    let flags = use_state(Flags::default);
    let text = use_state(String::new);
    let replacement = use_state(String::new);
    let view = use_state(|| View::Matches);
    let msg = use_state(String::new);

    let on_flags_text = {
        let flags = flags.clone();
        let msg = msg.clone();
        Callback::from(move |e: InputEvent| {
            let input: web_sys::HtmlInputElement = e.target_unchecked_into();
            match Flags::parse(&input.value()) {
                Ok(f) => {
                    flags.set(f);
                    msg.set(String::new());
                }
                Err(err) => msg.set(err),
            }
        })
    };

    let compiled = if pattern.is_empty() {
        None
    } else {
        Some(compile(&pattern, *flags))
    };
    let matches = match &compiled {
        Some(Ok(re)) => find_matches(re, &text, flags.global),
        _ => Vec::new(),
    };

    let on_copy_literal = {
        let msg = msg.clone();
        let lit = literal(&pattern, *flags);
        Callback::from(move |_| copy_with_message(lit.clone(), msg.clone(), "Copied regex."))
    };

    let view_button = |v: View, label: &'static str| {
        let view = view.clone();
        let cls = if *view == v { "btn active" } else { "btn" };
        html! { <button class={cls} onclick={Callback::from(move |_| view.set(v))}>{ label }</button> }
    };

    let results = match (&compiled, *view) {
        (None, _) => html! { <div class="smallnote">{ "Enter a pattern." }</div> },
        (Some(Err(e)), _) => msg_view(e),
        (Some(Ok(_)), View::Matches) if matches.is_empty() => {
            html! { <div class="smallnote">{ "No matches." }</div> }
        }
        (Some(Ok(_)), View::Matches) => html! {
            <table class="matches">
              <tr><th>{ "#" }</th><th>{ "Match" }</th><th>{ "Position" }</th><th>{ "Groups" }</th></tr>
              { for matches.iter().enumerate().map(|(i, m)| html! {
                  <tr>
                    <td>{ i.to_string() }</td>
                    <td class="mono">{ format!("{:?}", m.text) }</td>
                    <td>{ format!("{}..{}", m.start, m.end) }</td>
                    <td class="mono">
                      { for m.groups.iter().map(|g| {
                          let label = g.name.clone().unwrap_or_else(|| format!("g{}", g.index));
                          let value = g.text.as_ref().map(|t| format!("{t:?}")).unwrap_or_else(|| "<none>".into());
                          html! { <div>{ format!("{label} = {value}") }</div> }
                      }) }
                    </td>
                  </tr>
              }) }
            </table>
        },
        (Some(Ok(re)), View::Replace) => html! {
            <>
              <div class="textline">
                <input type="text" value={(*replacement).clone()} oninput={bind_input(replacement.clone())}
                       placeholder="Replacement: $1, ${name}" />
              </div>
              <pre class="diff">{ replace(re, &text, &replacement, flags.global) }</pre>
            </>
        },
        (Some(Ok(_)), View::Highlight) => html! {
            <pre class="diff">
              { for highlight(&text, &matches).into_iter().map(|(hit, piece)| {
                  if hit {
                      html! { <mark>{ piece }</mark> }
                  } else {
                      html! { <>{ piece }</> }
                  }
              }) }
            </pre>
        },
    };

    html! {
        <div class="panel">
          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "Regex Builder" }</div>
              <div class="btnrow">
                <button class="btn" onclick={on_copy_literal} disabled={pattern.is_empty()}>{ "Copy /regex/" }</button>
              </div>
            </div>
            <div class="textline mono">
              { "/" }
              <input type="text" value={(*pattern).clone()} oninput={bind_input(pattern.clone())}
                     placeholder=r"(\w+)=(\d+)" />
              { "/" }
              <input type="text" class="flags" size="6" value={flags.letters()} oninput={on_flags_text} />
            </div>
            <div class="btnrow">
              { for FLAG_LETTERS.iter().map(|(c, desc)| {
                  let c = *c;
                  let flags = flags.clone();
                  let cls = if flags.has(c) { "btn active" } else { "btn" };
                  html! {
                    <button class={cls} title={*desc}
                            onclick={Callback::from(move |_| flags.set(flags.toggled(c)))}>
                      { c.to_string() }
                    </button>
                  }
              }) }
            </div>
            <div class="btnrow">
              { for TOKENS.iter().map(|(tok, desc)| {
                  let pattern = pattern.clone();
                  let tok = *tok;
                  html! {
                    <button class="btn small" title={*desc}
                            onclick={Callback::from(move |_| pattern.set(format!("{}{tok}", *pattern)))}>
                      { tok }
                    </button>
                  }
              }) }
            </div>
            <textarea value={(*text).clone()} oninput={bind_textarea(text.clone())}
                      placeholder="Text to test against..." />
          </div>
          { msg_view(&msg) }
          <div class="block">
            <div class="btnrow">
              { view_button(View::Matches, "Matches") }
              { view_button(View::Replace, "Replace") }
              { view_button(View::Highlight, "Highlight") }
              <span class="tag">{ format!("{} match(es)", matches.len()) }</span>
            </div>
            { results }
          </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_parse_and_print() {
        let f = Flags::parse("mig").unwrap();
        assert!(f.global && f.case_insensitive && f.multi_line && !f.dot_all);
        assert_eq!(f.letters(), "gim");
        assert!(Flags::parse("gq").unwrap_err().contains("'q'"));
        assert_eq!(Flags::default().toggled('g').letters(), "");
    }

    #[test]
    fn builder_applies_flags() {
        let f = Flags::parse("i").unwrap();
        assert!(compile("hello", f).unwrap().is_match("HeLLo"));
        assert!(!compile("hello", Flags::default()).unwrap().is_match("HeLLo"));
        let m = Flags::parse("m").unwrap();
        assert!(compile("^b$", m).unwrap().is_match("a\nb\nc"));
        assert!(compile("(", Flags::default()).unwrap_err().starts_with("Regex error"));
    }

    #[test]
    fn literal_escapes_slashes_once() {
        let f = Flags::parse("gi").unwrap();
        assert_eq!(literal("a/b", f), r"/a\/b/gi");
        assert_eq!(literal(r"a\/b", f), r"/a\/b/gi");
    }

    #[test]
    fn matches_and_groups() {
        let re = compile(r"(\w+)=(?P<val>\d+)?", Flags::default()).unwrap();
        let ms = find_matches(&re, "a=1 bb=22 c=", true);
        assert_eq!(ms.len(), 3);
        assert_eq!((ms[1].start, ms[1].end), (4, 9));
        assert_eq!(ms[1].groups[0].text.as_deref(), Some("bb"));
        assert_eq!(ms[1].groups[1].name.as_deref(), Some("val"));
        assert_eq!(ms[2].groups[1].span, None);

        let first_only = find_matches(&re, "a=1 bb=22", false);
        assert_eq!(first_only.len(), 1);
    }

    #[test]
    fn highlight_covers_whole_text() {
        let re = compile(r"\d+", Flags::default()).unwrap();
        let text = "a1b22c";
        let parts = highlight(text, &find_matches(&re, text, true));
        assert_eq!(
            parts,
            vec![
                (false, "a".to_string()),
                (true, "1".to_string()),
                (false, "b".to_string()),
                (true, "22".to_string()),
                (false, "c".to_string()),
            ]
        );
        let joined: String = parts.into_iter().map(|(_, p)| p).collect();
        assert_eq!(joined, text);
    }

    #[test]
    fn replace_expands_groups() {
        let re = compile(r"(\w+)@(\w+)", Flags::default()).unwrap();
        assert_eq!(replace(&re, "a@b c@d", "$2@$1", true), "b@a d@c");
        assert_eq!(replace(&re, "a@b c@d", "${2}", false), "b c@d");
    }
}
