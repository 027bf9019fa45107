//! Field validation: rule tables evaluated against raw form input.
//!
//! A rule set is plain data: a slice of [`FieldRule`]s, each pairing a field
//! name with a [`Check`] and the message shown when it fails. Evaluation walks
//! fields in the order they first appear in the table and, within a field,
//! runs checks by [`Stage`]:
//!
//! required → length → format → cross-field → domain
//!
//! The first failing check wins. Optional fields that are empty or
//! whitespace-only are treated as absent and skip every non-required check.

pub mod rules;

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use thiserror::Error;

use crate::models::dates::{is_current_marker, MonthYear};
use crate::models::SkillLevel;
use crate::store::CvDocument;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9\s\-()]{7,15}$").expect("valid phone regex"));

/// Evaluation stage. Declaration order is evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Required,
    Length,
    Format,
    CrossField,
    Domain,
}

/// The reason a submission was refused, tied to the first failing field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{field}: {message}")]
pub struct Rejection {
    pub field: &'static str,
    pub message: String,
}

/// Read-only context a rule may consult.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub today: NaiveDate,
    pub document: &'a CvDocument,
}

/// Raw string input addressable by field name.
pub trait FieldSource {
    /// Unknown names read as empty.
    fn value(&self, field: &str) -> &str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Email,
    Phone,
}

impl Pattern {
    fn regex(self) -> &'static Regex {
        match self {
            Pattern::Email => &*EMAIL_RE,
            Pattern::Phone => &*PHONE_RE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Check {
    Required,
    /// Character count of the trimmed value; surrounding whitespace is not counted.
    MinChars(usize),
    /// Character count of the trimmed value.
    MaxChars(usize),
    Matches(Pattern),
    /// Needs at least two words (first and last name).
    InnerSpace,
    /// Four-digit integer.
    Year,
    SkillLevel,
    /// Month-year not before the month-year in the named field. Only applied
    /// when both sides parse; anything else passes.
    NotBeforeField(&'static str),
    /// Month-year not after the current month. Unparseable values pass.
    MonthNotInFuture,
    YearNotBefore(i32),
    YearNotInFuture,
    /// No existing skill with the same name (case-insensitive).
    DistinctSkillName,
}

impl Check {
    pub fn stage(self) -> Stage {
        match self {
            Check::Required => Stage::Required,
            Check::MinChars(_) | Check::MaxChars(_) => Stage::Length,
            Check::Matches(_) | Check::InnerSpace | Check::Year | Check::SkillLevel => {
                Stage::Format
            }
            Check::NotBeforeField(_) => Stage::CrossField,
            Check::MonthNotInFuture
            | Check::YearNotBefore(_)
            | Check::YearNotInFuture
            | Check::DistinctSkillName => Stage::Domain,
        }
    }

    /// `value` is already trimmed and non-empty unless this is `Required`.
    fn passes(self, value: &str, input: &dyn FieldSource, ctx: &RuleContext<'_>) -> bool {
        match self {
            Check::Required => !value.is_empty(),
            Check::MinChars(min) => value.chars().count() >= min,
            Check::MaxChars(max) => value.chars().count() <= max,
            Check::Matches(pattern) => pattern.regex().is_match(value),
            Check::InnerSpace => value.contains(char::is_whitespace),
            Check::Year => value.len() == 4 && value.chars().all(|c| c.is_ascii_digit()),
            Check::SkillLevel => value.parse::<SkillLevel>().is_ok(),
            Check::NotBeforeField(other) => {
                if is_current_marker(value) {
                    return true;
                }
                match (
                    MonthYear::parse(value),
                    MonthYear::parse(input.value(other)),
                ) {
                    (Some(end), Some(start)) => end >= start,
                    _ => true,
                }
            }
            Check::MonthNotInFuture => match MonthYear::parse(value) {
                Some(month) => month <= MonthYear::from_date(ctx.today),
                None => true,
            },
            Check::YearNotBefore(min) => value.parse::<i32>().map_or(true, |y| y >= min),
            Check::YearNotInFuture => value
                .parse::<i32>()
                .map_or(true, |y| y <= MonthYear::from_date(ctx.today).year),
            Check::DistinctSkillName => !ctx
                .document
                .skills()
                .iter()
                .any(|s| s.name.trim().to_lowercase() == value.to_lowercase()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    pub field: &'static str,
    pub check: Check,
    pub message: &'static str,
}

impl FieldRule {
    pub const fn new(field: &'static str, check: Check, message: &'static str) -> Self {
        Self {
            field,
            check,
            message,
        }
    }
}

/// Runs the checks for a single field, in stage order.
pub fn validate_field(
    rules: &[FieldRule],
    field: &'static str,
    input: &dyn FieldSource,
    ctx: &RuleContext<'_>,
) -> Result<(), Rejection> {
    let mut field_rules: Vec<&FieldRule> = rules.iter().filter(|r| r.field == field).collect();
    field_rules.sort_by_key(|r| r.check.stage());

    let value = input.value(field).trim();
    for rule in field_rules {
        if rule.check != Check::Required && value.is_empty() {
            continue;
        }
        if !rule.check.passes(value, input, ctx) {
            return Err(Rejection {
                field,
                message: rule.message.to_string(),
            });
        }
    }
    Ok(())
}

/// Validates a whole form, returning the first rejection encountered.
pub fn validate(
    rules: &[FieldRule],
    input: &dyn FieldSource,
    ctx: &RuleContext<'_>,
) -> Result<(), Rejection> {
    let mut seen: Vec<&'static str> = Vec::new();
    for rule in rules {
        if seen.contains(&rule.field) {
            continue;
        }
        seen.push(rule.field);
        validate_field(rules, rule.field, input, ctx)?;
    }
    Ok(())
}

/// Collects one rejection per failing field, for inline display.
pub fn validate_all(
    rules: &[FieldRule],
    input: &dyn FieldSource,
    ctx: &RuleContext<'_>,
) -> Vec<Rejection> {
    let mut seen: Vec<&'static str> = Vec::new();
    let mut rejections = Vec::new();
    for rule in rules {
        if seen.contains(&rule.field) {
            continue;
        }
        seen.push(rule.field);
        if let Err(rejection) = validate_field(rules, rule.field, input, ctx) {
            rejections.push(rejection);
        }
    }
    rejections
}
