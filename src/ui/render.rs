//! Server-rendered pages for the deck, export view and landing page.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::button::{Button, ButtonVariant};
use super::escape_html;
use crate::chat::TranscriptMessage;
use crate::deck::{Modal, PresentationController, Slide};
use crate::intake::{IntakeStep, LeadIntakeFlow, PropertyType, Timeline};
use crate::llm::Role;

/// Which face of the landing page is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewMode {
    /// What a home seller sees.
    #[default]
    Client,
    /// The pitch overlay explaining the system behind the page.
    Pitch,
}

/// Reconnects to the deck socket and reloads on any state change. Arrow
/// keys are forwarded so the server decides whether they apply.
const DECK_SCRIPT: &str = r#"<script>
(function () {
  var proto = location.protocol === "https:" ? "wss://" : "ws://";
  var ws = new WebSocket(proto + location.host + "/ws/deck");
  var first = true;
  ws.onmessage = function (ev) {
    var msg = JSON.parse(ev.data);
    if (msg.type === "print_requested") { window.print(); return; }
    if (msg.type === "sync" && first) { first = false; return; }
    location.reload();
  };
  document.addEventListener("keydown", function (ev) {
    ws.send(JSON.stringify({ action: "key", key: ev.key }));
  });
  document.querySelectorAll("[data-action]").forEach(function (el) {
    el.addEventListener("click", function () {
      if (el.dataset.action === "share") {
        fetch("/api/deck/share", { method: "POST" });
        return;
      }
      var body = { action: el.dataset.action };
      if (el.dataset.enabled) { body.enabled = el.dataset.enabled === "true"; }
      ws.send(JSON.stringify(body));
    });
  });
})();
</script>"#;

fn page(title: &str, body_class: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{}</title>
</head>
<body class="{body_class}">
{body}
</body>
</html>
"#,
        escape_html(title)
    )
}

fn render_slide(slide: &Slide, class: &str) -> String {
    let mut html = format!(r#"<section class="{class}" data-slide="{}">"#, slide.id);
    if let Some(kicker) = slide.kicker {
        html.push_str(&format!(r#"<p class="kicker">{}</p>"#, escape_html(kicker)));
    }
    html.push_str(&format!(
        "<h1>{}</h1><p class=\"subtitle\">{}</p>",
        escape_html(slide.title),
        escape_html(slide.subtitle)
    ));
    if !slide.points.is_empty() {
        html.push_str("<ul>");
        for point in &slide.points {
            html.push_str(&format!(
                "<li><strong>{}</strong> {}</li>",
                escape_html(point.title),
                escape_html(point.detail)
            ));
        }
        html.push_str("</ul>");
    }
    html.push_str("</section>");
    html
}

fn render_modal(modal: &Modal) -> String {
    let close = Button::new("Close")
        .variant(ButtonVariant::Secondary)
        .attr("data-action", "close_modal")
        .render();
    match modal {
        Modal::Share { url } => format!(
            r#"<div class="modal" role="dialog"><h2>Share this deck</h2><p>Copy the link below:</p><input readonly value="{}">{close}</div>"#,
            escape_html(url)
        ),
        Modal::PrintInstructions => format!(
            r#"<div class="modal" role="dialog"><h2>Save as PDF</h2><p>In the print dialog choose "Save as PDF" as the destination and enable background graphics.</p>{close}</div>"#
        ),
    }
}

/// One slide with navigation controls and the "i / N" counter.
pub fn render_deck_page(controller: &PresentationController) -> String {
    let slide = render_slide(controller.current(), "slide h-screen w-screen");
    let previous = Button::new("Previous")
        .variant(ButtonVariant::Outline)
        .disabled(!controller.can_go_back())
        .attr("data-action", "previous")
        .render();
    let next = Button::new("Next")
        .variant(ButtonVariant::Gold)
        .disabled(!controller.can_go_forward())
        .attr("data-action", "next")
        .render();
    let export = Button::new("Save as PDF")
        .variant(ButtonVariant::Secondary)
        .attr("data-action", "export")
        .attr("data-enabled", "true")
        .render();
    let share = Button::new("Share")
        .variant(ButtonVariant::Outline)
        .attr("data-action", "share")
        .render();

    let mut body = format!(
        r#"{slide}<nav class="controls no-print">{export}{share}<span class="position">{}</span>{previous}{next}</nav>"#,
        escape_html(&controller.position())
    );
    if let Some(modal) = controller.modal() {
        body.push_str(&render_modal(modal));
    }
    body.push_str(DECK_SCRIPT);
    page("EstateFlow Pitch", "bg-black overflow-hidden", &body)
}

/// Slides stacked in order, for print capture.
pub fn render_export_page(slides: &[Slide]) -> String {
    let exit = Button::new("Exit PDF View")
        .variant(ButtonVariant::Secondary)
        .attr("data-action", "export")
        .attr("data-enabled", "false")
        .render();
    let mut body = format!(r#"<div class="exit no-print">{exit}</div><div class="print-container">"#);
    for slide in slides {
        body.push_str(&render_slide(slide, "print-slide min-h-screen w-full"));
    }
    body.push_str("</div>");
    body.push_str(DECK_SCRIPT);
    page("EstateFlow Pitch (PDF)", "bg-black", &body)
}

/// Posts landing forms as JSON and reloads with the returned ids in the
/// query string.
const LANDING_SCRIPT: &str = r#"<script>
(function () {
  var params = new URLSearchParams(location.search);
  function go(key, id) { params.set(key, id); location.search = params.toString(); }
  function post(url, body) {
    return fetch(url, {
      method: "POST",
      headers: { "content-type": "application/json" },
      body: JSON.stringify(body || {})
    }).then(function (r) { return r.json(); });
  }
  document.querySelectorAll("form[data-lead-form]").forEach(function (form) {
    form.addEventListener("submit", function (ev) {
      ev.preventDefault();
      var body = Object.fromEntries(new FormData(form, ev.submitter));
      post(form.getAttribute("action"), body).then(function (res) {
        if (res.id) { go("lead", res.id); }
      });
    });
  });
  var opener = document.querySelector("[data-chat-open]");
  if (opener) {
    opener.addEventListener("click", function () {
      post("/api/chat").then(function (res) { go("chat", res.id); });
    });
  }
  var chat = document.querySelector("form[data-chat-form]");
  if (chat) {
    chat.addEventListener("submit", function (ev) {
      ev.preventDefault();
      var text = new FormData(chat).get("text");
      var id = chat.dataset.chat;
      post("/api/chat/" + id + "/messages", { text: text })
        .then(function () { go("chat", id); });
    });
  }
  if (document.querySelector('[data-step="submitting"]')) {
    setTimeout(function () { location.reload(); }, 1000);
  }
})();
</script>"#;

fn lead_form(action: &str, inner: &str) -> String {
    format!(r#"<form method="post" action="{action}" data-lead-form>{inner}</form>"#)
}

fn render_lead_form(flow: &LeadIntakeFlow) -> String {
    let step = flow.step();
    let base = format!("/api/leads/{}", flow.id);
    let mut html = format!(r#"<div class="lead-form" data-lead="{}" data-step="{step}">"#, flow.id);

    if step == IntakeStep::Success {
        html.push_str(&format!(
            "<h3>{}</h3><p>Your valuation report is on its way. One of our agents will be in touch shortly.</p>",
            escape_html(step.headline())
        ));
        let again = Button::new("Start Over").variant(ButtonVariant::Outline).submit().render();
        html.push_str(&lead_form(&format!("{base}/reset"), &again));
        html.push_str("</div>");
        return html;
    }

    html.push_str(&format!(
        r#"<div class="progress"><div class="bar" style="width: {:.0}%"></div></div><h3>{}</h3><p class="step">Step {} of 3</p>"#,
        step.progress() * 100.0,
        escape_html(step.headline()),
        step.number()
    ));

    let record = flow.record();
    match step {
        IntakeStep::Address => {
            let fields = format!(
                r#"<label>Property Address<input name="address" placeholder="123 Main St, City, State" value="{}"></label>{}"#,
                escape_html(record.address.as_deref().unwrap_or_default()),
                Button::new("Get My Valuation").submit().render()
            );
            html.push_str(&lead_form(&format!("{base}/address"), &fields));
        }
        IntakeStep::Details => {
            let blank = if record.property_type.is_none() { " selected" } else { "" };
            let mut options = format!(r#"<option value=""{blank}>Select type...</option>"#);
            for property_type in PropertyType::ALL {
                let selected = if record.property_type == Some(property_type) {
                    " selected"
                } else {
                    ""
                };
                options.push_str(&format!(
                    r#"<option value="{}"{selected}>{}</option>"#,
                    property_type.as_str(),
                    escape_html(property_type.label())
                ));
            }
            let select = format!(
                r#"<label>Property Type<select name="property_type" onchange="if (this.value) this.form.requestSubmit()">{options}</select></label>"#
            );
            html.push_str(&lead_form(&format!("{base}/property-type"), &select));

            let mut choices = String::from("<p>Selling Timeline</p>");
            for timeline in Timeline::ALL {
                choices.push_str(
                    &Button::new(timeline.as_str())
                        .variant(ButtonVariant::Secondary)
                        .submit()
                        .attr("name", "timeline")
                        .attr("value", timeline.as_str())
                        .render(),
                );
            }
            html.push_str(&lead_form(&format!("{base}/timeline"), &choices));
        }
        IntakeStep::Contact | IntakeStep::Submitting => {
            let fields = format!(
                r#"<label>Full Name<input name="name" required placeholder="John Doe"></label><label>Email Address<input name="email" type="email" required placeholder="john@example.com"></label><label>Phone Number<input name="phone" type="tel" required placeholder="(555) 123-4567"></label>{}"#,
                Button::new("Get My Report")
                    .variant(ButtonVariant::Gold)
                    .submit()
                    .loading(step == IntakeStep::Submitting)
                    .render()
            );
            html.push_str(&lead_form(&format!("{base}/submit"), &fields));
        }
        IntakeStep::Success => {}
    }
    html.push_str("</div>");
    html
}

/// Without a widget id only the launcher is shown; opening it creates the
/// widget so the greeting is there before the visitor types.
fn render_chat(chat: Option<(Uuid, &[TranscriptMessage])>) -> String {
    let Some((id, transcript)) = chat else {
        let open = Button::new("Chat with EstateAI")
            .variant(ButtonVariant::Gold)
            .attr("data-chat-open", "true")
            .render();
        return format!(r#"<aside class="chat-widget closed">{open}</aside>"#);
    };

    let mut html = String::from(r#"<aside class="chat-widget"><h4>EstateAI</h4><ol class="messages">"#);
    for message in transcript {
        let class = match message.role {
            Role::User => "user",
            Role::Assistant => "assistant",
        };
        html.push_str(&format!(r#"<li class="{class}">{}</li>"#, escape_html(&message.text)));
    }
    html.push_str(&format!(
        r#"</ol><form data-chat-form data-chat="{id}"><input name="text" placeholder="Ask me anything..."></form></aside>"#
    ));
    html
}

fn render_pitch_overlay(view: ViewMode, carry: &str) -> String {
    let toggle = |mode: ViewMode, label: &str| {
        let active = if mode == view { " active" } else { "" };
        let value = match mode {
            ViewMode::Client => "client",
            ViewMode::Pitch => "pitch",
        };
        format!(r#"<a class="toggle{active}" href="/landing?view={value}{carry}">{label}</a>"#)
    };
    let mut html = format!(
        r#"<div class="control-bar"><span>DEV.PRESENTATION</span>{}{}</div>"#,
        toggle(ViewMode::Client, "Client View"),
        toggle(ViewMode::Pitch, "System Backend")
    );
    if view == ViewMode::Pitch {
        html.push_str(concat!(
            r#"<div class="pitch-overlay"><h2>The "EstateFlow" System</h2>"#,
            "<div class=\"card\"><h3>Lead Capture &amp; CRM</h3><p>Form submissions create a contact, tagged and assigned immediately.</p></div>",
            "<div class=\"card\"><h3>Instant Automation</h3><p>SMS and email follow-up go out within seconds.</p></div>",
            "<div class=\"card\"><h3>AI Qualification</h3><p>The chat assistant asks one qualifying question at a time.</p></div>",
            "</div>"
        ));
    }
    html
}

/// The agency landing page: hero, lead form, chat widget and the
/// client/pitch toggle.
pub fn render_landing_page(
    view: ViewMode,
    flow: Option<&LeadIntakeFlow>,
    chat: Option<(Uuid, &[TranscriptMessage])>,
) -> String {
    let mut carry = String::new();
    if let Some(flow) = flow {
        carry.push_str(&format!("&amp;lead={}", flow.id));
    }
    if let Some((id, _)) = chat {
        carry.push_str(&format!("&amp;chat={id}"));
    }

    let mut body = render_pitch_overlay(view, &carry);
    body.push_str(concat!(
        r#"<header class="hero"><nav><span class="logo">ESTATE FLOW</span></nav>"#,
        "<h1>Unlock the True Value of <span class=\"gold\">Your Home</span></h1>",
        "<p>We combine market expertise with technology to get you the best price in the shortest time.</p>",
    ));
    match flow {
        Some(flow) => body.push_str(&render_lead_form(flow)),
        None => body.push_str(&format!(
            r#"<div class="lead-form"><h3>What's your home worth?</h3>{}</div>"#,
            lead_form("/api/leads", &Button::new("Start").variant(ButtonVariant::Gold).submit().render())
        )),
    }
    body.push_str("</header>");
    body.push_str(&render_chat(chat));
    body.push_str(LANDING_SCRIPT);
    page("EstateFlow | Luxury Real Estate", "bg-luxury-light", &body)
}
