//! PII detection and redaction with fixed regex patterns.
//!
//! Every match of a selected category is replaced by the configured template
//! with `{type}` set to the upper-case category name, in message texts and in
//! the title. A message left blank by redaction is dropped.
//!
//! # Example
//!
//! ```
//! use chatmill::core::privacy::{PiiCategory, PrivacyRedactor};
//! use chatmill::config::PrivacyConfig;
//!
//! # fn main() -> chatmill::Result<()> {
//! let redactor = PrivacyRedactor::new(PrivacyConfig::new().with_categories(["email"]))?;
//!
//! let text = "contact me at a@b.com";
//! assert_eq!(redactor.redact_text(text), "contact me at [REDACTED_EMAIL]");
//!
//! let found = redactor.detect(text);
//! assert_eq!(found[&PiiCategory::Email], ["a@b.com"]);
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::{Captures, NoExpand, Regex};
use serde::{Deserialize, Serialize};

use super::processor::Processor;
use crate::Chat;
use crate::config::PrivacyConfig;
use crate::error::{ChatmillError, Result};

/// Kinds of personal data the redactor knows.
///
/// Ordering follows declaration order, which is also the order of
/// [`PiiCategory::all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PiiCategory {
    Email,
    Phone,
    IpAddress,
    CreditCard,
    Ssn,
    ApiKey,
    Jwt,
}

impl PiiCategory {
    /// Returns every category.
    pub fn all() -> &'static [PiiCategory] {
        &[
            PiiCategory::Email,
            PiiCategory::Phone,
            PiiCategory::IpAddress,
            PiiCategory::CreditCard,
            PiiCategory::Ssn,
            PiiCategory::ApiKey,
            PiiCategory::Jwt,
        ]
    }

    /// Order in which categories are applied, most specific first.
    const APPLY_ORDER: [PiiCategory; 7] = [
        PiiCategory::Jwt,
        PiiCategory::ApiKey,
        PiiCategory::Email,
        PiiCategory::CreditCard,
        PiiCategory::Ssn,
        PiiCategory::IpAddress,
        PiiCategory::Phone,
    ];

    /// Returns the snake_case category name.
    pub fn as_str(&self) -> &'static str {
        match self {
            PiiCategory::Email => "email",
            PiiCategory::Phone => "phone",
            PiiCategory::IpAddress => "ip_address",
            PiiCategory::CreditCard => "credit_card",
            PiiCategory::Ssn => "ssn",
            PiiCategory::ApiKey => "api_key",
            PiiCategory::Jwt => "jwt",
        }
    }

    /// Returns the label substituted for `{type}`.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }

    fn regex(self) -> &'static Regex {
        &PATTERNS[self as usize]
    }

    fn pattern(self) -> &'static str {
        match self {
            PiiCategory::Email => r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Z|a-z]{2,}\b",
            PiiCategory::Phone => concat!(
                r"\b(?:\+?1[-.\s]?)?\(?[0-9]{3}\)?[-.\s]?[0-9]{3}[-.\s]?[0-9]{4}\b",
                r"|\b\+?[0-9]{1,3}[-.\s]?\(?[0-9]{2,4}\)?[-.\s]?[0-9]{3,4}[-.\s]?[0-9]{3,4}\b",
            ),
            PiiCategory::IpAddress => concat!(
                r"\b(?:(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\.){3}",
                r"(?:25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)\b",
            ),
            PiiCategory::CreditCard => concat!(
                r"\b(?:4[0-9]{12}(?:[0-9]{3})?",
                r"|5[1-5][0-9]{14}",
                r"|3[47][0-9]{13}",
                r"|6(?:011|5[0-9]{2})[0-9]{12})\b",
            ),
            // Invalid area, group and serial numbers are rejected after matching.
            PiiCategory::Ssn => r"\b(\d{3})[-\s]?(\d{2})[-\s]?(\d{4})\b",
            PiiCategory::ApiKey => r"(?i)\b(?:sk-|pk_|api[_-]?key[=:\s]*)[A-Za-z0-9_-]{20,}\b",
            PiiCategory::Jwt => r"\beyJ[A-Za-z0-9_-]*\.eyJ[A-Za-z0-9_-]*\.[A-Za-z0-9_-]*\b",
        }
    }
}

impl fmt::Display for PiiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PiiCategory {
    type Err = ChatmillError;

    fn from_str(s: &str) -> Result<Self> {
        PiiCategory::all()
            .iter()
            .copied()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| {
                ChatmillError::invalid_config(
                    "privacy",
                    format!(
                        "unknown PII category '{s}', expected one of: {}",
                        PiiCategory::all()
                            .iter()
                            .map(PiiCategory::as_str)
                            .collect::<Vec<_>>()
                            .join(", ")
                    ),
                )
            })
    }
}

/// Compiled patterns, indexed like [`PiiCategory::all`].
static PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    PiiCategory::all()
        .iter()
        .map(|c| Regex::new(c.pattern()).expect("PII pattern is valid"))
        .collect()
});

/// SSN area, group and serial checks the pattern itself cannot express.
fn is_valid_ssn(caps: &Captures<'_>) -> bool {
    let area = &caps[1];
    let group = &caps[2];
    let serial = &caps[3];
    area != "000" && area != "666" && !area.starts_with('9') && group != "00" && serial != "0000"
}

#[derive(Debug)]
struct Detector {
    category: PiiCategory,
    regex: &'static Regex,
    replacement: String,
}

impl Detector {
    fn redact(&self, text: &str) -> String {
        if self.category == PiiCategory::Ssn {
            self.regex
                .replace_all(text, |caps: &Captures<'_>| {
                    if is_valid_ssn(caps) {
                        self.replacement.clone()
                    } else {
                        caps[0].to_string()
                    }
                })
                .into_owned()
        } else {
            self.regex
                .replace_all(text, NoExpand(&self.replacement))
                .into_owned()
        }
    }

    fn find(&self, text: &str) -> Vec<String> {
        if self.category == PiiCategory::Ssn {
            self.regex
                .captures_iter(text)
                .filter(is_valid_ssn)
                .map(|caps| caps[0].to_string())
                .collect()
        } else {
            self.regex
                .find_iter(text)
                .map(|m| m.as_str().to_string())
                .collect()
        }
    }
}

/// Regex-based PII redactor.
#[derive(Debug)]
pub struct PrivacyRedactor {
    /// Selected detectors, in application order
    detectors: Vec<Detector>,
}

impl PrivacyRedactor {
    /// Builds a redactor for the configured categories.
    ///
    /// An empty category list selects every category.
    ///
    /// # Errors
    ///
    /// Returns [`ChatmillError::InvalidConfig`] if a category name is unknown.
    pub fn new(config: PrivacyConfig) -> Result<Self> {
        let mut selected = config
            .categories
            .iter()
            .map(|name| name.parse::<PiiCategory>())
            .collect::<Result<Vec<_>>>()?;
        if selected.is_empty() {
            selected = PiiCategory::all().to_vec();
        }

        let detectors = PiiCategory::APPLY_ORDER
            .into_iter()
            .filter(|c| selected.contains(c))
            .map(|category| Detector {
                category,
                regex: category.regex(),
                replacement: config.replacement.replace("{type}", &category.label()),
            })
            .collect();

        Ok(Self { detectors })
    }

    /// Selected categories, in application order.
    pub fn categories(&self) -> Vec<PiiCategory> {
        self.detectors.iter().map(|d| d.category).collect()
    }

    /// Redacts every selected category from `text`.
    pub fn redact_text(&self, text: &str) -> String {
        self.detectors
            .iter()
            .fold(text.to_string(), |acc, detector| detector.redact(&acc))
    }

    /// Lists raw matches per selected category without changing anything.
    ///
    /// Categories with no match are left out.
    pub fn detect(&self, text: &str) -> BTreeMap<PiiCategory, Vec<String>> {
        self.detectors
            .iter()
            .filter_map(|detector| {
                let found = detector.find(text);
                (!found.is_empty()).then_some((detector.category, found))
            })
            .collect()
    }
}

impl Processor for PrivacyRedactor {
    fn name(&self) -> &'static str {
        "privacy"
    }

    fn process(&self, chat: &Chat) -> Chat {
        let messages = chat
            .messages
            .iter()
            .filter_map(|m| {
                let redacted = self.redact_text(&m.text);
                (!redacted.trim().is_empty()).then(|| m.with_text(redacted))
            })
            .collect();

        let mut redacted = chat.clone().with_messages(messages);
        redacted.title = self.redact_text(&chat.title);
        redacted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ProcessorChain;
    use crate::{Message, Platform, Role};

    fn redactor(categories: &[&str]) -> PrivacyRedactor {
        PrivacyRedactor::new(PrivacyConfig::new().with_categories(categories.iter().copied()))
            .unwrap()
    }

    fn all() -> PrivacyRedactor {
        PrivacyRedactor::new(PrivacyConfig::default()).unwrap()
    }

    #[test]
    fn test_email_redaction_and_detect() {
        let redactor = redactor(&["email"]);
        let text = "contact me at a@b.com";
        assert_eq!(redactor.redact_text(text), "contact me at [REDACTED_EMAIL]");

        let found = redactor.detect(text);
        assert_eq!(found.len(), 1);
        assert_eq!(found[&PiiCategory::Email], vec!["a@b.com".to_string()]);
    }

    #[test]
    fn test_unknown_category_rejected() {
        let err = PrivacyRedactor::new(PrivacyConfig::new().with_categories(["email", "passport"]))
            .unwrap_err();
        assert!(err.is_invalid_config());
        assert!(err.to_string().contains("passport"));
    }

    #[test]
    fn test_empty_selection_means_all() {
        let redactor = PrivacyRedactor::new(PrivacyConfig::new().with_categories(Vec::<String>::new()))
            .unwrap();
        assert_eq!(redactor.categories().len(), 7);
    }

    #[test]
    fn test_application_order() {
        assert_eq!(
            all().categories(),
            [
                PiiCategory::Jwt,
                PiiCategory::ApiKey,
                PiiCategory::Email,
                PiiCategory::CreditCard,
                PiiCategory::Ssn,
                PiiCategory::IpAddress,
                PiiCategory::Phone,
            ]
        );
    }

    #[test]
    fn test_each_category() {
        let redactor = all();
        assert_eq!(redactor.redact_text("call 555-123-4567"), "call [REDACTED_PHONE]");
        assert_eq!(redactor.redact_text("host 192.168.1.20 down"), "host [REDACTED_IP_ADDRESS] down");
        assert_eq!(redactor.redact_text("card 4111111111111111"), "card [REDACTED_CREDIT_CARD]");
        assert_eq!(redactor.redact_text("ssn 123-45-6789"), "ssn [REDACTED_SSN]");
        assert_eq!(
            redactor.redact_text("key sk-abcdefghijklmnopqrstuvwx"),
            "key [REDACTED_API_KEY]"
        );
        assert_eq!(
            redactor.redact_text("token eyJhbGciOi.eyJzdWIiOi.c2lnbmF0dXJl"),
            "token [REDACTED_JWT]"
        );
    }

    #[test]
    fn test_invalid_ssn_not_redacted() {
        let redactor = redactor(&["ssn"]);
        assert_eq!(redactor.redact_text("000-12-3456"), "000-12-3456");
        assert_eq!(redactor.redact_text("666-12-3456"), "666-12-3456");
        assert_eq!(redactor.redact_text("912-12-3456"), "912-12-3456");
        assert_eq!(redactor.redact_text("123-00-3456"), "123-00-3456");
        assert_eq!(redactor.redact_text("123-45-0000"), "123-45-0000");
        assert!(redactor.detect("666-12-3456").is_empty());
    }

    #[test]
    fn test_custom_replacement_is_literal() {
        let redactor =
            PrivacyRedactor::new(PrivacyConfig::new().with_categories(["email"]).with_replacement("$<{type}>"))
                .unwrap();
        assert_eq!(redactor.redact_text("x@y.org"), "$<EMAIL>");
    }

    #[test]
    fn test_detect_does_not_modify() {
        let redactor = all();
        let text = "mail a@b.com or c@d.net from 10.0.0.1";
        let found = redactor.detect(text);
        assert_eq!(found[&PiiCategory::Email], ["a@b.com", "c@d.net"]);
        assert_eq!(found[&PiiCategory::IpAddress], ["10.0.0.1"]);
        assert!(!found.contains_key(&PiiCategory::Jwt));
        assert_eq!(text, "mail a@b.com or c@d.net from 10.0.0.1");
    }

    #[test]
    fn test_process_redacts_messages_and_title() {
        let chat = Chat::new(Platform::Claude, "Mail bob@example.com")
            .with_message(Message::new(Role::User, "I'm bob@example.com").with_id("m1"))
            .with_message(Message::new(Role::Assistant, "Noted").with_id("m2"));

        let redacted = redactor(&["email"]).process(&chat);
        assert_eq!(redacted.title, "Mail [REDACTED_EMAIL]");
        assert_eq!(redacted.messages[0].text, "I'm [REDACTED_EMAIL]");
        assert_eq!(redacted.messages[0].id, "m1");
        assert_eq!(redacted.messages[1].text, "Noted");
        assert_eq!(chat.title, "Mail bob@example.com");
    }

    #[test]
    fn test_process_drops_messages_emptied_by_redaction() {
        let redactor = PrivacyRedactor::new(
            PrivacyConfig::new()
                .with_categories(["email"])
                .with_replacement(""),
        )
        .unwrap();
        let chat = Chat::new(Platform::ChatGpt, "Contacts")
            .with_message(Message::new(Role::User, "a@b.com").with_id("m1"))
            .with_message(Message::new(Role::User, " c@d.net  e@f.org ").with_id("m2"))
            .with_message(Message::new(Role::Assistant, "ok").with_id("m3"));

        let redacted = redactor.process(&chat);
        assert_eq!(redacted.message_count(), 1);
        assert_eq!(redacted.messages[0].id, "m3");
        assert!(redacted.messages.iter().all(|m| !m.text.trim().is_empty()));

        let only_pii = Chat::new(Platform::ChatGpt, "t")
            .with_message(Message::new(Role::User, "a@b.com"));
        let chain = ProcessorChain::new().with(redactor);
        assert!(chain.apply(only_pii).is_none());
    }
}
