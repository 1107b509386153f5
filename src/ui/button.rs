//! Buttons: a closed set of variants, each mapped to a fixed class set.

use serde::{Deserialize, Serialize};

use super::escape_html;

/// Classes every button shares.
const BASE_CLASSES: &str = "px-6 py-3 rounded-md font-semibold transition-all duration-300 \
    disabled:opacity-50 disabled:cursor-not-allowed flex items-center justify-center gap-2";

const SPINNER: &str =
    r#"<span class="w-5 h-5 border-2 border-current border-t-transparent rounded-full animate-spin"></span>"#;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonVariant {
    #[default]
    Primary,
    Secondary,
    Outline,
    Gold,
}

/// Visual attributes for one variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStyle {
    pub background: &'static str,
    pub text: &'static str,
    pub hover: &'static str,
    pub extra: &'static str,
}

impl ButtonStyle {
    pub fn classes(&self) -> String {
        [self.background, self.text, self.hover, self.extra]
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ButtonVariant {
    pub const ALL: [ButtonVariant; 4] = [Self::Primary, Self::Secondary, Self::Outline, Self::Gold];

    pub fn style(&self) -> ButtonStyle {
        match self {
            Self::Primary => ButtonStyle {
                background: "bg-luxury-900",
                text: "text-white",
                hover: "hover:bg-luxury-800",
                extra: "shadow-lg",
            },
            Self::Secondary => ButtonStyle {
                background: "bg-white",
                text: "text-luxury-900",
                hover: "hover:bg-gray-50",
                extra: "shadow-md border border-gray-200",
            },
            Self::Outline => ButtonStyle {
                background: "bg-transparent",
                text: "text-white",
                hover: "hover:bg-white/10",
                extra: "border-2 border-white",
            },
            Self::Gold => ButtonStyle {
                background: "bg-luxury-gold",
                text: "text-luxury-900",
                hover: "hover:bg-yellow-500",
                extra: "shadow-lg",
            },
        }
    }
}

/// A button ready to render.
#[derive(Debug, Clone)]
pub struct Button {
    label: String,
    variant: ButtonVariant,
    loading: bool,
    disabled: bool,
    kind: &'static str,
    attrs: Vec<(&'static str, String)>,
}

impl Button {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            variant: ButtonVariant::default(),
            loading: false,
            disabled: false,
            kind: "button",
            attrs: Vec::new(),
        }
    }

    pub fn variant(mut self, variant: ButtonVariant) -> Self {
        self.variant = variant;
        self
    }

    /// A loading button shows a spinner in place of its label and is
    /// disabled.
    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn submit(mut self) -> Self {
        self.kind = "submit";
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    pub fn is_disabled(&self) -> bool {
        self.loading || self.disabled
    }

    pub fn render(&self) -> String {
        let mut html = format!(
            r#"<button type="{}" class="{} {}""#,
            self.kind,
            BASE_CLASSES,
            self.variant.style().classes()
        );
        for (name, value) in &self.attrs {
            html.push_str(&format!(r#" {name}="{}""#, escape_html(value)));
        }
        if self.is_disabled() {
            html.push_str(" disabled");
        }
        html.push('>');
        if self.loading {
            html.push_str(SPINNER);
        } else {
            html.push_str(&escape_html(&self.label));
        }
        html.push_str("</button>");
        html
    }
}
