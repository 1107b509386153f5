//! Lead record and the enumerated answers the wizard accepts.

use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::IntakeError;

/// The `type=email` grammar browsers apply to form fields.
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .unwrap()
});

/// Kind of property the visitor owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PropertyType {
    SingleFamily,
    Condo,
    Townhouse,
}

impl PropertyType {
    pub const ALL: [PropertyType; 3] = [Self::SingleFamily, Self::Condo, Self::Townhouse];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SingleFamily => "single-family",
            Self::Condo => "condo",
            Self::Townhouse => "townhouse",
        }
    }

    /// Option label in the property-type dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            Self::SingleFamily => "Single Family Home",
            Self::Condo => "Condo / Apartment",
            Self::Townhouse => "Townhouse",
        }
    }
}

impl FromStr for PropertyType {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| IntakeError::UnknownPropertyType(s.to_string()))
    }
}

/// When the visitor wants to sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeline {
    #[serde(rename = "ASAP")]
    Asap,
    #[serde(rename = "1-3 Months")]
    OneToThreeMonths,
    #[serde(rename = "3-6 Months")]
    ThreeToSixMonths,
    #[serde(rename = "Just Curious")]
    JustCurious,
}

impl Timeline {
    pub const ALL: [Timeline; 4] = [
        Self::Asap,
        Self::OneToThreeMonths,
        Self::ThreeToSixMonths,
        Self::JustCurious,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asap => "ASAP",
            Self::OneToThreeMonths => "1-3 Months",
            Self::ThreeToSixMonths => "3-6 Months",
            Self::JustCurious => "Just Curious",
        }
    }
}

impl FromStr for Timeline {
    type Err = IntakeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| IntakeError::UnknownTimeline(s.to_string()))
    }
}

/// Final-step fields. All three are required.
#[derive(Debug, Clone, Deserialize)]
pub struct ContactDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl ContactDetails {
    /// Required-field and email-syntax checks only; nothing else is verified.
    pub fn validate(&self) -> Result<(), IntakeError> {
        if self.name.trim().is_empty() {
            return Err(IntakeError::MissingField("name"));
        }
        let email = self.email.trim();
        if email.is_empty() {
            return Err(IntakeError::MissingField("email"));
        }
        if !EMAIL_RE.is_match(email) {
            return Err(IntakeError::InvalidEmail(email.to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(IntakeError::MissingField("phone"));
        }
        Ok(())
    }
}

/// Answers accumulated across the wizard. Every field stays optional until
/// the contact step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LeadRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_type: Option<PropertyType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeline: Option<Timeline>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl LeadRecord {
    pub(crate) fn apply_contact(&mut self, contact: &ContactDetails) {
        self.name = Some(contact.name.trim().to_string());
        self.email = Some(contact.email.trim().to_string());
        self.phone = Some(contact.phone.trim().to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, email: &str, phone: &str) -> ContactDetails {
        ContactDetails {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    #[test]
    fn timeline_options_round_trip_through_labels() {
        for t in Timeline::ALL {
            assert_eq!(t.as_str().parse::<Timeline>().unwrap(), t);
            assert_eq!(serde_json::to_string(&t).unwrap(), format!("\"{}\"", t.as_str()));
        }
        assert!("Next Year".parse::<Timeline>().is_err());
    }

    #[test]
    fn property_type_parses_kebab_case() {
        assert_eq!("single-family".parse::<PropertyType>().unwrap(), PropertyType::SingleFamily);
        assert_eq!(
            serde_json::to_string(&PropertyType::Townhouse).unwrap(),
            "\"townhouse\""
        );
        assert!(matches!(
            "castle".parse::<PropertyType>(),
            Err(IntakeError::UnknownPropertyType(_))
        ));
    }

    #[test]
    fn valid_contact_passes() {
        assert!(contact("Jane Doe", "jane@example.com", "555-0100").validate().is_ok());
    }

    #[test]
    fn missing_fields_are_reported_in_order() {
        assert!(matches!(
            contact(" ", "jane@example.com", "555").validate(),
            Err(IntakeError::MissingField("name"))
        ));
        assert!(matches!(
            contact("Jane", "", "555").validate(),
            Err(IntakeError::MissingField("email"))
        ));
        assert!(matches!(
            contact("Jane", "jane@example.com", "").validate(),
            Err(IntakeError::MissingField("phone"))
        ));
    }

    #[test]
    fn email_syntax_follows_form_rules() {
        // Browsers accept dotless domains.
        assert!(contact("J", "jane@localhost", "1").validate().is_ok());
        for bad in ["jane", "jane@", "@example.com", "jane@@example.com", "jane doe@example.com"] {
            assert!(
                matches!(contact("J", bad, "1").validate(), Err(IntakeError::InvalidEmail(_))),
                "{bad} should be rejected"
            );
        }
    }
}
