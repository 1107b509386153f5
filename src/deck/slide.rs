//! Slide catalog. Slides are fixed at startup and their order is the
//! navigation order.

use serde::Serialize;

use crate::error::DeckError;

/// Stable identifier of a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SlideId {
    Intro,
    Problem,
    Conversion,
    Automation,
    Ai,
    Offer,
}

impl std::fmt::Display for SlideId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Intro => "intro",
            Self::Problem => "problem",
            Self::Conversion => "conversion",
            Self::Automation => "automation",
            Self::Ai => "ai",
            Self::Offer => "offer",
        };
        write!(f, "{s}")
    }
}

/// A titled bullet on a slide.
#[derive(Debug, Clone, Serialize)]
pub struct SlidePoint {
    pub title: &'static str,
    pub detail: &'static str,
}

/// One unit of presentational content.
#[derive(Debug, Clone, Serialize)]
pub struct Slide {
    pub id: SlideId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kicker: Option<&'static str>,
    pub title: &'static str,
    pub subtitle: &'static str,
    pub points: Vec<SlidePoint>,
}

const fn point(title: &'static str, detail: &'static str) -> SlidePoint {
    SlidePoint { title, detail }
}

/// An ordered, non-empty list of slides with unique ids.
#[derive(Debug, Clone)]
pub struct Deck {
    slides: Vec<Slide>,
}

impl Deck {
    pub fn new(slides: Vec<Slide>) -> Result<Self, DeckError> {
        if slides.is_empty() {
            return Err(DeckError::Empty);
        }
        for (i, slide) in slides.iter().enumerate() {
            if slides[..i].iter().any(|s| s.id == slide.id) {
                return Err(DeckError::DuplicateSlide(slide.id.to_string()));
            }
        }
        Ok(Self { slides })
    }

    /// The EstateFlow pitch.
    pub fn pitch() -> Self {
        Self {
            slides: pitch_slides(),
        }
    }

    pub fn len(&self) -> usize {
        self.slides.len()
    }

    /// Always false; a deck is validated non-empty on construction.
    pub fn is_empty(&self) -> bool {
        self.slides.is_empty()
    }

    pub fn last_index(&self) -> usize {
        self.slides.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Slide> {
        self.slides.get(index)
    }

    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    pub fn position_of(&self, id: SlideId) -> Option<usize> {
        self.slides.iter().position(|s| s.id == id)
    }
}

fn pitch_slides() -> Vec<Slide> {
    vec![
        Slide {
            id: SlideId::Intro,
            kicker: Some("Real Estate Growth System"),
            title: "EstateFlow",
            subtitle: "A website that captures, qualifies and follows up with every lead while you sleep.",
            points: vec![],
        },
        Slide {
            id: SlideId::Problem,
            kicker: None,
            title: "The Old Way is Costing You Deals.",
            subtitle: "Most agency sites are digital brochures. Leads arrive, wait, and go cold.",
            points: vec![
                point("Slow Response Time", "Leads contacted after five minutes convert far less often."),
                point("Zero Qualification", "Hours spent on tire-kickers instead of ready sellers."),
                point("Manual Follow-up", "Every reminder and text depends on someone remembering."),
            ],
        },
        Slide {
            id: SlideId::Conversion,
            kicker: None,
            title: "High-Converting Lead Funnel",
            subtitle: "A three-step valuation wizard replaces the long contact form.",
            points: vec![
                point("Low-Friction Entry", "Start with just an address. No commitment, no friction."),
                point("Smart Qualification", "Property type and selling timeline sort intent."),
                point("Value Exchange", "Contact details are asked for last, in exchange for the report."),
            ],
        },
        Slide {
            id: SlideId::Automation,
            kicker: None,
            title: "Intelligent Automation",
            subtitle: "The system sorts, tags and communicates so you only talk to ready-to-act leads.",
            points: vec![
                point("Lead Capture", "Every submission lands in the CRM instantly."),
                point("Instant SMS", "A personal text goes out within seconds."),
                point("Tags & Automation", "New leads are tagged; unqualified ones are filtered out."),
            ],
        },
        Slide {
            id: SlideId::Ai,
            kicker: Some("Powered by Gemini"),
            title: "Your 24/7 AI Assistant",
            subtitle: "A chat assistant that answers questions and qualifies visitors around the clock.",
            points: vec![
                point("24/7 Availability", "Nights and weekends are covered."),
                point("Natural Conversation", "One friendly question at a time, never a form."),
                point("Lead Qualification", "Buy or sell, budget and timeline before you pick up the phone."),
                point("Instant Handoff", "Hot leads are passed to an agent immediately."),
            ],
        },
        Slide {
            id: SlideId::Offer,
            kicker: Some("Founding Partner Offer"),
            title: "Ready to Scale?",
            subtitle: "One-time setup $2,997, then $297/mo for software.",
            points: vec![
                point("Custom Landing Page", "Built around the valuation funnel."),
                point("CRM & Automations", "Tagging, SMS and follow-up workflows configured."),
                point("AI Chat Assistant", "Trained on your listings and tone."),
                point("Onboarding", "Hands-on setup and team training."),
            ],
        },
    ]
}
