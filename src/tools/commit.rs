// src/tools/commit.rs
//! Conventional Commits message builder.
use yew::prelude::*;

use crate::widgets::{bind_checkbox, bind_input, bind_select, bind_textarea, copy_with_message, msg_view};

pub struct CommitType {
    pub value: &'static str,
    pub label: &'static str,
    pub description: &'static str,
}

pub const COMMIT_TYPES: &[CommitType] = &[
    CommitType { value: "feat", label: "Feature", description: "A new feature" },
    CommitType { value: "fix", label: "Fix", description: "A bug fix" },
    CommitType { value: "docs", label: "Documentation", description: "Documentation only changes" },
    CommitType { value: "style", label: "Style", description: "Formatting, no change in meaning" },
    CommitType { value: "refactor", label: "Refactor", description: "Neither fixes a bug nor adds a feature" },
    CommitType { value: "perf", label: "Performance", description: "Improves performance" },
    CommitType { value: "test", label: "Test", description: "Adds or corrects tests" },
    CommitType { value: "build", label: "Build", description: "Build system or external dependencies" },
    CommitType { value: "ci", label: "CI", description: "CI configuration and scripts" },
    CommitType { value: "chore", label: "Chore", description: "Anything that doesn't touch src or tests" },
    CommitType { value: "revert", label: "Revert", description: "Reverts a previous commit" },
];

pub const WRAP_AT: usize = 72;
const DEFAULT_BREAKING_NOTE: &str = "This commit introduces breaking changes.";

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommitInput {
    pub kind: String,
    pub scope: String,
    pub subject: String,
    pub body: String,
    pub breaking: bool,
    pub breaking_note: String,
    /// Free text like `12, #34 acme/api#5`.
    pub issues: String,
}

impl CommitInput {
    pub fn header(&self) -> String {
        let mut h = self.kind.trim().to_string();
        let scope = self.scope.trim();
        if !scope.is_empty() {
            h.push_str(&format!("({scope})"));
        }
        if self.breaking {
            h.push('!');
        }
        h.push_str(": ");
        h.push_str(self.subject.trim());
        h
    }
}

/// Greedy word wrap. Blank lines separate paragraphs; lines starting with
/// `-` or `*` start a new list item, and its continuation lines are indented.
pub fn wrap(text: &str, width: usize) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut para: Vec<&str> = Vec::new();

    fn flush(para: &mut Vec<&str>, out: &mut Vec<String>, width: usize) {
        if para.is_empty() {
            return;
        }
        let words: Vec<&str> = para.iter().flat_map(|l| l.split_whitespace()).collect();
        let bullet = matches!(words.first(), Some(&"-") | Some(&"*"));
        let indent = if bullet { "  " } else { "" };
        let mut line = String::new();
        for w in words {
            let extra = if line.is_empty() { 0 } else { 1 };
            if !line.is_empty() && line.chars().count() + extra + w.chars().count() > width {
                out.push(std::mem::take(&mut line));
                line.push_str(indent);
            } else if !line.is_empty() && line != indent {
                line.push(' ');
            }
            line.push_str(w);
        }
        if !line.trim().is_empty() {
            out.push(line);
        }
        para.clear();
    }

    for raw in text.lines() {
        let l = raw.trim_end();
        let t = l.trim_start();
        if t.is_empty() {
            flush(&mut para, &mut out, width);
            if out.last().is_some_and(|x| !x.is_empty()) {
                out.push(String::new());
            }
            continue;
        }
        if t.starts_with("- ") || t.starts_with("* ") {
            flush(&mut para, &mut out, width);
        }
        para.push(t);
    }
    flush(&mut para, &mut out, width);
    while out.last().is_some_and(|x| x.is_empty()) {
        out.pop();
    }
    out.join("\n")
}

/// `12` becomes `#12`; `#12` and `owner/repo#12` pass through; anything else
/// is dropped.
pub fn parse_issues(raw: &str) -> Vec<String> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| {
            let (prefix, num) = match s.rfind('#') {
                Some(i) => (&s[..i], &s[i + 1..]),
                None => ("", s),
            };
            let valid_num = !num.is_empty() && num.chars().all(|c| c.is_ascii_digit());
            let valid_prefix = prefix.is_empty() || prefix.split('/').count() == 2;
            (valid_num && valid_prefix).then(|| format!("{prefix}#{num}"))
        })
        .collect()
}

pub fn build(input: &CommitInput) -> Result<String, String> {
    if input.kind.trim().is_empty() {
        return Err("Pick a commit type.".into());
    }
    if input.subject.trim().is_empty() {
        return Err("Subject is required.".into());
    }

    let mut msg = input.header();
    let body = wrap(&input.body, WRAP_AT);
    if !body.is_empty() {
        msg.push_str("\n\n");
        msg.push_str(&body);
    }

    let mut footers = Vec::new();
    if input.breaking {
        let note = input.breaking_note.trim();
        let note = if note.is_empty() { DEFAULT_BREAKING_NOTE } else { note };
        footers.push(wrap(&format!("BREAKING CHANGE: {note}"), WRAP_AT));
    }
    let issues = parse_issues(&input.issues);
    if !issues.is_empty() {
        footers.push(format!("Refs: {}", issues.join(", ")));
    }
    if !footers.is_empty() {
        msg.push_str("\n\n");
        msg.push_str(&footers.join("\n"));
    }
    Ok(msg)
}

/// Style warnings; none of these block generation.
pub fn lint(input: &CommitInput) -> Vec<String> {
    let mut warnings = Vec::new();
    let subject = input.subject.trim();
    let header = input.header();

    if header.chars().count() > WRAP_AT {
        warnings.push(format!(
            "Header is {} characters; keep it within {WRAP_AT}.",
            header.chars().count()
        ));
    }
    if subject.ends_with('.') {
        warnings.push("Subject should not end with a period.".into());
    }
    if subject.chars().next().is_some_and(char::is_uppercase) {
        warnings.push("Subject usually starts lowercase.".into());
    }
    if let Some(first) = subject.split_whitespace().next() {
        let w = first.to_ascii_lowercase();
        if w.len() > 4 && (w.ends_with("ed") || w.ends_with("ing")) {
            warnings.push(format!("Use the imperative mood: \"{first}\" reads like past or progressive tense."));
        }
    }
    if input.scope.trim().contains(char::is_whitespace) {
        warnings.push("Scope should be a single word.".into());
    }
    if !input.issues.trim().is_empty() && parse_issues(&input.issues).is_empty() {
        warnings.push("No issue references recognized (use 12, #12 or owner/repo#12).".into());
    }
    warnings
}

/* ---------- panel ---------- */

#[function_component(CommitPanel)]
pub fn commit_panel() -> Html {
    let kind = use_state(|| "feat".to_string());
    let scope = use_state(String::new);
    let subject = use_state(String::new);
    let body = use_state(String::new);
    let breaking = use_state(|| false);
    let breaking_note = use_state(String::new);
    let issues = use_state(String::new);
    let msg = use_state(String::new);

    let input = CommitInput {
        kind: (*kind).clone(),
        scope: (*scope).clone(),
        subject: (*subject).clone(),
        body: (*body).clone(),
        breaking: *breaking,
        breaking_note: (*breaking_note).clone(),
        issues: (*issues).clone(),
    };
    let built = build(&input);
    let warnings = lint(&input);

    let on_copy = {
        let msg = msg.clone();
        let text = built.clone().unwrap_or_default();
        Callback::from(move |_| copy_with_message(text.clone(), msg.clone(), "Copied commit message."))
    };

    let on_clear = {
        let (kind, scope, subject, body) = (kind.clone(), scope.clone(), subject.clone(), body.clone());
        let (breaking, breaking_note, issues, msg) =
            (breaking.clone(), breaking_note.clone(), issues.clone(), msg.clone());
        Callback::from(move |_| {
            kind.set("feat".into());
            scope.set(String::new());
            subject.set(String::new());
            body.set(String::new());
            breaking.set(false);
            breaking_note.set(String::new());
            issues.set(String::new());
            msg.set(String::new());
        })
    };

    let description = COMMIT_TYPES
        .iter()
        .find(|t| t.value == kind.as_str())
        .map(|t| t.description)
        .unwrap_or_default();

    html! {
        <div class="panel two-col">
          <div class="block">
            <div class="block-head"><div class="block-title">{ "Conventional Commit" }</div></div>
            <label class="smallnote">{ "Type" }</label>
            <select onchange={bind_select(kind.clone())}>
              { for COMMIT_TYPES.iter().map(|t| html! {
                  <option value={t.value} selected={t.value == kind.as_str()}>
                    { format!("{} ({})", t.label, t.value) }
                  </option>
              }) }
            </select>
            <div class="smallnote">{ description }</div>
            <div class="textline">
              <input type="text" value={(*scope).clone()} oninput={bind_input(scope.clone())}
                     placeholder="Scope (optional), e.g. auth, ui, api" />
            </div>
            <div class="textline">
              <input type="text" value={(*subject).clone()} oninput={bind_input(subject.clone())}
                     placeholder="Subject: add X, not added X" />
            </div>
            <textarea value={(*body).clone()} oninput={bind_textarea(body.clone())}
                      placeholder="Body (optional); wrapped at 72 columns" />
            <label class="smallnote">
              <input type="checkbox" checked={*breaking} onchange={bind_checkbox(breaking.clone())} />
              { " Breaking change" }
            </label>
            if *breaking {
              <div class="textline">
                <input type="text" value={(*breaking_note).clone()} oninput={bind_input(breaking_note.clone())}
                       placeholder="What breaks and how to migrate" />
              </div>
            }
            <div class="textline">
              <input type="text" value={(*issues).clone()} oninput={bind_input(issues.clone())}
                     placeholder="Issues: 12, #34, owner/repo#5" />
            </div>
          </div>

          <div class="block">
            <div class="block-head">
              <div class="block-title">{ "Message" }</div>
              <div class="btnrow">
                <button class="btn" onclick={on_copy} disabled={built.is_err()}>{ "Copy" }</button>
                <button class="btn" onclick={on_clear}>{ "Clear" }</button>
              </div>
            </div>
            { match &built {
                Ok(text) => html! { <pre class="diff">{ text.clone() }</pre> },
                Err(e) => html! { <div class="smallnote">{ e.clone() }</div> },
            } }
            <div class="kv">
              { for warnings.iter().map(|w| html! { <span class="tag warn">{ w.clone() }</span> }) }
            </div>
            { msg_view(&msg) }
          </div>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(subject: &str) -> CommitInput {
        CommitInput {
            kind: "feat".into(),
            subject: subject.into(),
            ..CommitInput::default()
        }
    }

    #[test]
    fn header_only() {
        assert_eq!(build(&input("add picker")).unwrap(), "feat: add picker");
        let mut i = input("drop v1 api");
        i.scope = " api ".into();
        i.breaking = true;
        assert!(build(&i).unwrap().starts_with("feat(api)!: drop v1 api\n\nBREAKING CHANGE: "));
    }

    #[test]
    fn subject_is_required() {
        assert_eq!(build(&input("  ")).unwrap_err(), "Subject is required.");
    }

    #[test]
    fn body_and_footers() {
        let mut i = input("add export");
        i.body = "Short body.".into();
        i.breaking = true;
        i.breaking_note = "export format changed".into();
        i.issues = "12, #34 acme/api#5 nope".into();
        assert_eq!(
            build(&i).unwrap(),
            "feat!: add export\n\nShort body.\n\nBREAKING CHANGE: export format changed\nRefs: #12, #34, acme/api#5"
        );
    }

    #[test]
    fn wrap_respects_width_and_paragraphs() {
        let long = "word ".repeat(40);
        let wrapped = wrap(&format!("{long}\n\n\n{long}"), 20);
        assert!(wrapped.lines().all(|l| l.chars().count() <= 20));
        assert_eq!(wrapped.split("\n\n").count(), 2);
        assert!(!wrapped.contains("\n\n\n"));
    }

    #[test]
    fn wrap_keeps_list_items_apart() {
        let wrapped = wrap("- first item that is rather long\n- second", 16);
        assert_eq!(wrapped, "- first item\n  that is rather\n  long\n- second");
    }

    #[test]
    fn issue_refs() {
        assert_eq!(parse_issues("1 #2,x/y#3  a#4 #"), vec!["#1", "#2", "x/y#3"]);
    }

    #[test]
    fn lint_flags_common_slips() {
        let w = lint(&input("Added things."));
        assert_eq!(w.len(), 3);
        assert!(lint(&input("add things")).is_empty());
        let mut long = input(&"x".repeat(80));
        long.scope = "two words".into();
        assert_eq!(lint(&long).len(), 2);
    }
}
