//! Contact Field Extractor — heuristic derivation of email, phone, and name
//! from unstructured resume text.
//!
//! All three operations are pure functions over text returning `Option`: no
//! match means `None`, never an error. Phone and name extraction are ordered
//! rule lists (tagged variants tried in priority order, first match wins) so
//! precedence stays auditable rule-by-rule.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Standard local@domain.tld address, TLD of at least 2 letters.
    static ref EMAIL_PATTERN: Regex =
        Regex::new(r"\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").unwrap();

    /// Angle-bracket payload of a structured sender header.
    static ref SENDER_ADDRESS_PATTERN: Regex = Regex::new(r"<([^>]+)>").unwrap();
}

/// First email address found in the text body.
pub fn extract_email(text: &str) -> Option<String> {
    EMAIL_PATTERN.find(text).map(|m| m.as_str().to_string())
}

/// Email address from a `"Display Name <address>"` sender header. The
/// angle-bracket payload wins; otherwise the plain address pattern is re-run
/// over the raw sender string.
pub fn email_from_sender(sender: &str) -> Option<String> {
    if let Some(captures) = SENDER_ADDRESS_PATTERN.captures(sender) {
        return Some(captures[1].to_string());
    }
    extract_email(sender)
}

/// Email for a resume: a body-embedded address is preferred over the sender
/// header.
pub fn extract_email_with_sender(text: &str, sender: Option<&str>) -> Option<String> {
    extract_email(text).or_else(|| sender.and_then(email_from_sender))
}

/// Phone number formats, in priority order. Order matters: an ambiguous
/// digit run must be claimed by the most specific earlier rule (e.g. a bare
/// 10-digit Indian mobile number belongs to `IndianMobile`, not
/// `BareTenDigits`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneRule {
    IndianMobile,
    IndianLandline,
    UsParenthesized,
    UsSeparatedTriplets,
    BareTenDigits,
    InternationalPrefixed,
}

const PHONE_RULES: [PhoneRule; 6] = [
    PhoneRule::IndianMobile,
    PhoneRule::IndianLandline,
    PhoneRule::UsParenthesized,
    PhoneRule::UsSeparatedTriplets,
    PhoneRule::BareTenDigits,
    PhoneRule::InternationalPrefixed,
];

lazy_static! {
    // Boundary anchors keep the rules from firing inside longer digit runs
    // that belong to a later (or no) rule.
    static ref INDIAN_MOBILE: Regex =
        Regex::new(r"(?:\+91[\-\s]?)?\b[6-9]\d{4}[\-\s]?\d{5}\b").unwrap();
    static ref INDIAN_LANDLINE: Regex = Regex::new(r"\b0\d{2,4}[\-\s]?\d{6,8}\b").unwrap();
    static ref US_PARENTHESIZED: Regex = Regex::new(r"\(\d{3}\)\s?\d{3}[\-\s]?\d{4}\b").unwrap();
    static ref US_SEPARATED: Regex = Regex::new(r"\b\d{3}[\-.\s]\d{3}[\-.\s]\d{4}\b").unwrap();
    static ref BARE_TEN_DIGITS: Regex = Regex::new(r"\b\d{10}\b").unwrap();
    static ref INTERNATIONAL: Regex = Regex::new(r"\+\d{1,3}[\-\s]?\d{6,12}\b").unwrap();
}

impl PhoneRule {
    fn pattern(self) -> &'static Regex {
        match self {
            PhoneRule::IndianMobile => &INDIAN_MOBILE,
            PhoneRule::IndianLandline => &INDIAN_LANDLINE,
            PhoneRule::UsParenthesized => &US_PARENTHESIZED,
            PhoneRule::UsSeparatedTriplets => &US_SEPARATED,
            PhoneRule::BareTenDigits => &BARE_TEN_DIGITS,
            PhoneRule::InternationalPrefixed => &INTERNATIONAL,
        }
    }
}

/// First match of the first phone rule that fires, trimmed.
///
/// One carve-out: a bare 10-digit run that is the national part of a
/// `+`-prefixed number ("+44 2079460958") belongs to the international rule.
/// The regex crate has no lookbehind, so the containing international match
/// is preferred over the bare run it swallows.
pub fn extract_phone(text: &str) -> Option<String> {
    for rule in PHONE_RULES {
        if let Some(m) = rule.pattern().find(text) {
            if rule == PhoneRule::BareTenDigits {
                if let Some(intl) = INTERNATIONAL.find(text) {
                    if intl.start() < m.start() && intl.end() >= m.end() {
                        return Some(intl.as_str().trim().to_string());
                    }
                }
            }
            return Some(m.as_str().trim().to_string());
        }
    }
    None
}

/// Resumes front-load identity; only this many leading non-empty lines are
/// scanned for a name.
const NAME_SCAN_LINES: usize = 10;

/// Name-line rules, in priority order. First matching rule on the first
/// matching line wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameRule {
    /// Title-Case line of 2-4 words.
    TitleCaseLine,
    /// Honorific (Mr./Ms./Mrs./Dr./Prof.) followed by a Title-Case name.
    Honorific,
    /// ALL-CAPS line of 2-4 words, normalized to Title Case.
    AllCapsLine,
    /// Looser 1-4 word Title-Case line.
    LooseTitleCase,
    /// Title-Case name immediately followed by a section-header word; only
    /// the name portion is kept.
    NameBeforeSectionHeader,
}

const NAME_RULES: [NameRule; 5] = [
    NameRule::TitleCaseLine,
    NameRule::Honorific,
    NameRule::AllCapsLine,
    NameRule::LooseTitleCase,
    NameRule::NameBeforeSectionHeader,
];

lazy_static! {
    static ref TITLE_CASE_LINE: Regex =
        Regex::new(r"^[A-Z][a-z]+(?:\s[A-Z][a-z]+){1,3}$").unwrap();
    static ref HONORIFIC_LINE: Regex =
        Regex::new(r"^(?:Mr|Ms|Mrs|Dr|Prof)\.?\s+([A-Z][a-z]+(?:\s[A-Z][a-z]+){0,3})$").unwrap();
    static ref ALL_CAPS_LINE: Regex = Regex::new(r"^[A-Z]{2,}(?:\s[A-Z]{2,}){1,3}$").unwrap();
    static ref LOOSE_TITLE_CASE_LINE: Regex =
        Regex::new(r"^[A-Z][a-z]+(?:\s[A-Z][a-z]+){0,3}$").unwrap();
    static ref NAME_BEFORE_HEADER: Regex = Regex::new(
        r"^([A-Z][a-z]+(?:\s[A-Z][a-z]+){1,3})\s+(?i:resume|cv|profile|contact|summary|curriculum|vitae|objective)\b"
    )
    .unwrap();
}

/// Job-title words that disqualify a candidate line. Also applied to
/// Title-Case lines: a resume opening with "Senior Software Engineer" is a
/// headline, not a name.
const JOB_TITLE_DENYLIST: [&str; 16] = [
    "engineer",
    "developer",
    "manager",
    "analyst",
    "consultant",
    "designer",
    "architect",
    "administrator",
    "specialist",
    "scientist",
    "director",
    "officer",
    "technician",
    "intern",
    "lead",
    "programmer",
];

/// Resume section headers. A whole-line rule must not absorb one of these as
/// part of a name; the `NameBeforeSectionHeader` rule strips it instead.
const SECTION_HEADER_WORDS: [&str; 8] = [
    "resume",
    "cv",
    "profile",
    "contact",
    "summary",
    "curriculum",
    "vitae",
    "objective",
];

fn contains_job_title_word(candidate: &str) -> bool {
    candidate
        .split_whitespace()
        .any(|word| JOB_TITLE_DENYLIST.contains(&word.to_lowercase().as_str()))
}

fn contains_section_header_word(line: &str) -> bool {
    line.split_whitespace()
        .any(|word| SECTION_HEADER_WORDS.contains(&word.to_lowercase().as_str()))
}

fn to_title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl NameRule {
    fn apply(self, line: &str) -> Option<String> {
        match self {
            NameRule::TitleCaseLine => (TITLE_CASE_LINE.is_match(line)
                && !contains_section_header_word(line))
            .then(|| line.to_string()),
            NameRule::Honorific => HONORIFIC_LINE.captures(line).map(|c| c[1].to_string()),
            NameRule::AllCapsLine => (ALL_CAPS_LINE.is_match(line)
                && !contains_section_header_word(line))
            .then(|| to_title_case(line)),
            NameRule::LooseTitleCase => (LOOSE_TITLE_CASE_LINE.is_match(line)
                && !contains_section_header_word(line))
            .then(|| line.to_string()),
            NameRule::NameBeforeSectionHeader => {
                NAME_BEFORE_HEADER.captures(line).map(|c| c[1].to_string())
            }
        }
    }
}

/// Candidate name from the first `NAME_SCAN_LINES` non-empty lines. Each line
/// is tried against the rules in order; any candidate containing a job-title
/// word is rejected. Returns `None` rather than guessing.
pub fn extract_name(text: &str) -> Option<String> {
    for line in text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(NAME_SCAN_LINES)
    {
        for rule in NAME_RULES {
            if let Some(candidate) = rule.apply(line) {
                if contains_job_title_word(&candidate) {
                    continue;
                }
                return Some(candidate);
            }
        }
    }
    None
}
