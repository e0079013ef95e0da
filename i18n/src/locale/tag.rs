//! Immutable BCP 47 locale value

use super::error::{ParseError, ParseResult};
use super::parser::{self, title_case};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Locale information parsed from a BCP 47 formatted string.
///
/// Every `with_*` method returns a new value; a tag is never changed in place.
/// Passing `None` or an empty string removes the field from composition.
///
/// ```
/// use langtag_i18n::LocaleTag;
///
/// let tag: LocaleTag = "sr-Latn-RS-REVISED".parse().unwrap();
/// let chain: Vec<String> = tag.fallback_chain().map(|t| t.to_string()).collect();
/// assert_eq!(chain, ["sr-Latn-RS-REVISED", "sr-Latn-RS", "sr-Latn", "sr"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LocaleTag {
    /// ISO 639 language code, lower-cased
    pub(super) language: Option<String>,
    /// Up to three extended language subtags
    pub(super) extended_language: Option<String>,
    /// ISO 15924 script code, title-cased
    pub(super) script: Option<String>,
    /// ISO 3166-1 country code or UN M.49 area code, upper-cased
    pub(super) region: Option<String>,
    pub(super) variant: Option<String>,
    pub(super) extension: Option<String>,
    pub(super) private: Option<String>,
    pub(super) grandfathered: Option<String>,
    pub(super) currency: Option<String>,
    pub(super) collation: Option<String>,
    pub(super) calendar: Option<String>,
    pub(super) numbers: Option<String>,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value.filter(|v| !v.is_empty()).map(str::to_string)
}

impl LocaleTag {
    /// Parse a BCP 47 string.
    pub fn parse(input: &str) -> ParseResult<Self> {
        parser::parse(input)
    }

    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    pub fn extended_language(&self) -> Option<&str> {
        self.extended_language.as_deref()
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    pub fn variant(&self) -> Option<&str> {
        self.variant.as_deref()
    }

    pub fn extension(&self) -> Option<&str> {
        self.extension.as_deref()
    }

    pub fn private(&self) -> Option<&str> {
        self.private.as_deref()
    }

    pub fn grandfathered(&self) -> Option<&str> {
        self.grandfathered.as_deref()
    }

    /// ICU currency keyword
    pub fn currency(&self) -> Option<&str> {
        self.currency.as_deref()
    }

    /// ICU collation keyword
    pub fn collation(&self) -> Option<&str> {
        self.collation.as_deref()
    }

    /// ICU calendar keyword
    pub fn calendar(&self) -> Option<&str> {
        self.calendar.as_deref()
    }

    /// ICU numbering system keyword
    pub fn numbers(&self) -> Option<&str> {
        self.numbers.as_deref()
    }

    // A grandfathered tag stands alone, so giving it a structured subtag
    // turns it into a regular tag.
    fn structured(mut self, value: &Option<String>) -> Self {
        if value.is_some() {
            self.grandfathered = None;
        }
        self
    }

    pub fn with_language(self, language: Option<&str>) -> Self {
        let language = non_empty(language).map(|l| l.to_ascii_lowercase());
        let mut clone = self.structured(&language);
        clone.language = language;
        clone
    }

    pub fn with_extended_language(self, extended_language: Option<&str>) -> Self {
        let extended_language = non_empty(extended_language);
        let mut clone = self.structured(&extended_language);
        clone.extended_language = extended_language;
        clone
    }

    pub fn with_script(self, script: Option<&str>) -> Self {
        let script = non_empty(script).map(|s| title_case(&s));
        let mut clone = self.structured(&script);
        clone.script = script;
        clone
    }

    pub fn with_region(self, region: Option<&str>) -> Self {
        let region = non_empty(region).map(|r| r.to_ascii_uppercase());
        let mut clone = self.structured(&region);
        clone.region = region;
        clone
    }

    pub fn with_variant(self, variant: Option<&str>) -> Self {
        let variant = non_empty(variant);
        let mut clone = self.structured(&variant);
        clone.variant = variant;
        clone
    }

    pub fn with_extension(self, extension: Option<&str>) -> Self {
        let extension = non_empty(extension);
        let mut clone = self.structured(&extension);
        clone.extension = extension;
        clone
    }

    pub fn with_private(self, private: Option<&str>) -> Self {
        let private = non_empty(private);
        let mut clone = self.structured(&private);
        clone.private = private;
        clone
    }

    /// Replace the whole tag with a grandfathered one; clears every subtag.
    pub fn with_grandfathered(self, grandfathered: Option<&str>) -> Self {
        match non_empty(grandfathered) {
            Some(value) => Self {
                grandfathered: Some(value),
                currency: self.currency,
                collation: self.collation,
                calendar: self.calendar,
                numbers: self.numbers,
                ..Self::default()
            },
            None => Self { grandfathered: None, ..self },
        }
    }

    pub fn with_currency(self, currency: Option<&str>) -> Self {
        Self { currency: non_empty(currency), ..self }
    }

    pub fn with_collation(self, collation: Option<&str>) -> Self {
        Self { collation: non_empty(collation), ..self }
    }

    pub fn with_calendar(self, calendar: Option<&str>) -> Self {
        Self { calendar: non_empty(calendar), ..self }
    }

    pub fn with_numbers(self, numbers: Option<&str>) -> Self {
        Self { numbers: non_empty(numbers), ..self }
    }

    /// Same tag without the ICU keyword block.
    pub fn without_keywords(&self) -> Self {
        Self {
            currency: None,
            collation: None,
            calendar: None,
            numbers: None,
            ..self.clone()
        }
    }

    /// Whether the tag carries a variant, region or script.
    pub fn is_specific(&self) -> bool {
        self.variant.is_some() || self.region.is_some() || self.script.is_some()
    }

    /// The primary language subtag on its own, e.g. `de` for `de-DE`.
    pub fn bare_language(&self) -> Option<Self> {
        self.language.as_ref().map(|language| Self {
            language: Some(language.clone()),
            ..Self::default()
        })
    }

    /// Returns the next less specific locale.
    ///
    /// Drops the variant, else the region, else the script. A tag with
    /// none of those is returned unchanged.
    pub fn fallback(&self) -> Self {
        if self.variant.is_some() {
            return self.clone().with_variant(None);
        }
        if self.region.is_some() {
            return self.clone().with_region(None);
        }
        if self.script.is_some() {
            return self.clone().with_script(None);
        }
        self.clone()
    }

    /// This tag followed by each fallback until the fixed point.
    pub fn fallback_chain(&self) -> impl Iterator<Item = LocaleTag> {
        std::iter::successors(Some(self.clone()), |tag| {
            let next = tag.fallback();
            (next != *tag).then_some(next)
        })
    }

    /// Compose the tag back into its string form.
    pub fn as_string(&self) -> String {
        self.to_string()
    }

    fn keywords(&self) -> Vec<String> {
        [
            ("currency", &self.currency),
            ("collation", &self.collation),
            ("calendar", &self.calendar),
            ("numbers", &self.numbers),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .collect()
    }
}

impl fmt::Display for LocaleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if let Some(grandfathered) = &self.grandfathered {
            parts.push(grandfathered);
        } else {
            if let Some(language) = &self.language {
                parts.push(language);
                parts.extend(
                    [
                        &self.extended_language,
                        &self.script,
                        &self.region,
                        &self.variant,
                        &self.extension,
                    ]
                    .into_iter()
                    .flatten()
                    .map(String::as_str),
                );
            }
            if let Some(private) = &self.private {
                parts.push(private);
            }
        }

        write!(f, "{}", parts.join("-"))?;

        let keywords = self.keywords();
        if !keywords.is_empty() {
            write!(f, "@{}", keywords.join(";"))?;
        }
        Ok(())
    }
}

impl FromStr for LocaleTag {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parser::parse(s)
    }
}

impl TryFrom<&str> for LocaleTag {
    type Error = ParseError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        parser::parse(value)
    }
}

impl TryFrom<String> for LocaleTag {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parser::parse(&value)
    }
}

impl From<LocaleTag> for String {
    fn from(tag: LocaleTag) -> Self {
        tag.to_string()
    }
}
