//! Auxiliary control placed before the main input
//!
//! Callers describe it with a small piece of markup. When the last
//! top-level element is a form control (`<input>`, `<textarea>`,
//! `<select>`) it becomes interactive and contributes its value as a prefix
//! of the submitted result. Text before that element is shown as a static
//! lead-in, and text after it is dropped. Markup without a trailing control
//! is shown as static text and contributes nothing.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use super::field::{FieldOptions, InputField};
use super::request::InputKind;

static INPUT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*<input\b([^>]*?)/?>\s*$").expect("valid input regex"));
static TEXTAREA_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*<textarea\b([^>]*)>(.*?)</textarea\s*>\s*$").expect("valid textarea regex")
});
static SELECT_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^\s*<select\b([^>]*)>(.*?)</select\s*>\s*$").expect("valid select regex"));
static OPTION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<option\b([^>]*)>(.*?)</option\s*>").expect("valid option regex"));
static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)([a-z_:][-a-z0-9_:.]*)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("valid attribute regex")
});
static ELEMENT_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<(/?)([a-zA-Z][-a-zA-Z0-9]*)\b(?:[^>]*?)(/?)>").expect("valid element regex")
});
static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("valid tag regex"));

/// Elements that never have a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// One entry of a select control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub value: String,
}

/// Drop-down style control cycled with the arrow keys
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    options: Vec<SelectOption>,
    selected: usize,
    disabled: bool,
}

impl SelectControl {
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    pub fn selected(&self) -> Option<&SelectOption> {
        self.options.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.disabled && !self.options.is_empty() {
            self.selected = (self.selected + 1) % self.options.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.disabled && !self.options.is_empty() {
            self.selected = (self.selected + self.options.len() - 1) % self.options.len();
        }
    }
}

/// Interactive part of an auxiliary control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuxiliaryWidget {
    /// `<input>` or `<textarea>`
    Field(InputField),
    /// `<select>` with its options
    Select(SelectControl),
}

impl AuxiliaryWidget {
    fn value(&self) -> String {
        match self {
            Self::Field(field) => field.value().to_string(),
            Self::Select(select) => select.selected().map(|o| o.value.clone()).unwrap_or_default(),
        }
    }

    fn is_focusable(&self) -> bool {
        match self {
            Self::Field(field) => !field.is_read_only(),
            Self::Select(select) => !select.disabled && select.options.len() > 1,
        }
    }
}

/// Parsed auxiliary control: optional static lead-in plus optional widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuxiliaryControl {
    lead: Option<String>,
    widget: Option<AuxiliaryWidget>,
}

/// Top-level element found in the markup, as a byte range
#[derive(Debug)]
struct Element {
    name: String,
    start: usize,
    end: usize,
}

impl AuxiliaryControl {
    /// Parse markup into a control
    pub fn parse(markup: &str) -> Self {
        debug!(%markup, "AuxiliaryControl::parse: called");

        if let Some(last) = top_level_elements(markup).pop()
            && let Some(widget) = parse_widget(&last.name, &markup[last.start..last.end])
        {
            let lead = static_text(&markup[..last.start]);
            debug!(?lead, element = %last.name, "AuxiliaryControl::parse: trailing control");
            return Self {
                lead,
                widget: Some(widget),
            };
        }

        debug!("AuxiliaryControl::parse: static markup");
        Self {
            lead: static_text(markup),
            widget: None,
        }
    }

    /// Static text shown before the widget
    pub fn lead(&self) -> Option<&str> {
        self.lead.as_deref()
    }

    pub fn widget(&self) -> Option<&AuxiliaryWidget> {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> Option<&mut AuxiliaryWidget> {
        self.widget.as_mut()
    }

    /// Value contributed as the result prefix, if this control exposes one
    pub fn value(&self) -> Option<String> {
        self.widget.as_ref().map(AuxiliaryWidget::value)
    }

    /// Whether keyboard focus can move onto this control
    pub fn is_focusable(&self) -> bool {
        self.widget.as_ref().is_some_and(AuxiliaryWidget::is_focusable)
    }
}

/// Split markup into its top-level elements, skipping text between them
fn top_level_elements(markup: &str) -> Vec<Element> {
    let mut elements = Vec::new();
    let mut open: Option<(String, usize)> = None;
    let mut depth = 0usize;

    for caps in ELEMENT_TAG.captures_iter(markup) {
        let Some(tag) = caps.get(0) else { continue };
        let name = caps[2].to_ascii_lowercase();
        if !caps[1].is_empty() {
            // Stray closing tags at the top level are ignored
            if depth == 0 {
                continue;
            }
            depth -= 1;
            if depth == 0
                && let Some((name, start)) = open.take()
            {
                elements.push(Element {
                    name,
                    start,
                    end: tag.end(),
                });
            }
        } else if !caps[3].is_empty() || VOID_ELEMENTS.contains(&name.as_str()) {
            if depth == 0 {
                elements.push(Element {
                    name,
                    start: tag.start(),
                    end: tag.end(),
                });
            }
        } else {
            if depth == 0 {
                open = Some((name, tag.start()));
            }
            depth += 1;
        }
    }

    // An unclosed element runs to the end of the markup
    if let Some((name, start)) = open {
        elements.push(Element {
            name,
            start,
            end: markup.len(),
        });
    }
    elements
}

fn parse_widget(name: &str, source: &str) -> Option<AuxiliaryWidget> {
    match name {
        "input" => {
            let caps = INPUT_TAG.captures(source)?;
            let attrs = parse_attributes(&caps[1]);
            debug!(?attrs, "parse_widget: matched input");
            let kind = InputKind::parse(attr(&attrs, "type").unwrap_or("text"));
            let options = FieldOptions {
                placeholder: attr(&attrs, "placeholder").map(str::to_string),
                max_length: attr(&attrs, "maxlength").and_then(|v| v.trim().parse().ok()),
                value: Some(attr(&attrs, "value").unwrap_or_default().to_string()),
                read_only: has_attr(&attrs, "readonly") || has_attr(&attrs, "disabled"),
            };
            Some(AuxiliaryWidget::Field(InputField::new(kind, &options)))
        }
        "textarea" => {
            let caps = TEXTAREA_TAG.captures(source)?;
            let attrs = parse_attributes(&caps[1]);
            debug!(?attrs, "parse_widget: matched textarea");
            let options = FieldOptions {
                placeholder: attr(&attrs, "placeholder").map(str::to_string),
                max_length: attr(&attrs, "maxlength").and_then(|v| v.trim().parse().ok()),
                value: Some(decode_entities(&caps[2])),
                read_only: has_attr(&attrs, "readonly") || has_attr(&attrs, "disabled"),
            };
            Some(AuxiliaryWidget::Field(InputField::new(InputKind::Text, &options)))
        }
        "select" => {
            let caps = SELECT_TAG.captures(source)?;
            let attrs = parse_attributes(&caps[1]);
            let mut options = Vec::new();
            let mut selected = 0;
            for (index, option) in OPTION_TAG.captures_iter(&caps[2]).enumerate() {
                let option_attrs = parse_attributes(&option[1]);
                let label = decode_entities(strip_tags(&option[2]).trim());
                let value = attr(&option_attrs, "value")
                    .map(decode_entities)
                    .unwrap_or_else(|| label.clone());
                if has_attr(&option_attrs, "selected") {
                    selected = index;
                }
                options.push(SelectOption { label, value });
            }
            debug!(count = options.len(), selected, "parse_widget: matched select");
            Some(AuxiliaryWidget::Select(SelectControl {
                options,
                selected,
                disabled: has_attr(&attrs, "disabled"),
            }))
        }
        _ => None,
    }
}

/// Visible text of a markup fragment, or None when it is blank
fn static_text(markup: &str) -> Option<String> {
    let text = decode_entities(&strip_tags(markup));
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn parse_attributes(source: &str) -> Vec<(String, Option<String>)> {
    ATTRIBUTE
        .captures_iter(source)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map(|m| decode_entities(m.as_str()));
            (name, value)
        })
        .collect()
}

fn attr<'a>(attrs: &'a [(String, Option<String>)], name: &str) -> Option<&'a str> {
    attrs
        .iter()
        .find(|(n, _)| n == name)
        .map(|(_, v)| v.as_deref().unwrap_or_default())
}

fn has_attr(attrs: &[(String, Option<String>)], name: &str) -> bool {
    attrs.iter().any(|(n, _)| n == name)
}

fn strip_tags(markup: &str) -> String {
    ANY_TAG.replace_all(markup, "").into_owned()
}

fn decode_entities(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
}
