//! Rule tables for each form. Field order here is the order in which
//! rejections are reported.

use super::{Check, FieldRule, Pattern};
use crate::models::dates::MIN_GRADUATION_YEAR;

pub const PERSONAL_INFO_RULES: &[FieldRule] = &[
    FieldRule::new("full_name", Check::Required, "Full name is required"),
    FieldRule::new(
        "full_name",
        Check::MinChars(8),
        "Full name is too short (minimum 8 characters)",
    ),
    FieldRule::new(
        "full_name",
        Check::InnerSpace,
        "Please enter your first and last name",
    ),
    FieldRule::new("email", Check::Required, "Email is required"),
    FieldRule::new(
        "email",
        Check::Matches(Pattern::Email),
        "Email format is invalid",
    ),
    FieldRule::new(
        "phone",
        Check::Matches(Pattern::Phone),
        "Phone number format is invalid",
    ),
    FieldRule::new(
        "location",
        Check::MinChars(6),
        "Location is too short (minimum 6 characters)",
    ),
    FieldRule::new(
        "summary",
        Check::MinChars(20),
        "Summary is too short (minimum 20 characters)",
    ),
    FieldRule::new(
        "summary",
        Check::MaxChars(500),
        "Summary is too long (maximum 500 characters)",
    ),
];

pub const EXPERIENCE_RULES: &[FieldRule] = &[
    FieldRule::new("company", Check::Required, "Company is required"),
    FieldRule::new("company", Check::MinChars(2), "Company name is too short"),
    FieldRule::new("position", Check::Required, "Position is required"),
    FieldRule::new(
        "position",
        Check::MinChars(2),
        "Position must have at least 2 characters",
    ),
    FieldRule::new("start_date", Check::Required, "Start date is required"),
    FieldRule::new(
        "start_date",
        Check::MonthNotInFuture,
        "Start date cannot be in the future",
    ),
    FieldRule::new(
        "end_date",
        Check::NotBeforeField("start_date"),
        "End date cannot be before the start date",
    ),
    FieldRule::new(
        "end_date",
        Check::MonthNotInFuture,
        "End date cannot be in the future",
    ),
    FieldRule::new(
        "description",
        Check::MinChars(10),
        "Description is too short (minimum 10 characters)",
    ),
    FieldRule::new(
        "description",
        Check::MaxChars(500),
        "Description is too long (maximum 500 characters)",
    ),
];

pub const EDUCATION_RULES: &[FieldRule] = &[
    FieldRule::new("institution", Check::Required, "Institution is required"),
    FieldRule::new(
        "institution",
        Check::MinChars(5),
        "Institution name is too short (minimum 5 characters)",
    ),
    FieldRule::new("degree", Check::Required, "Degree is required"),
    FieldRule::new(
        "degree",
        Check::MinChars(2),
        "Degree is too short (minimum 2 characters)",
    ),
    FieldRule::new(
        "field",
        Check::MinChars(3),
        "Field of study is too short (minimum 3 characters)",
    ),
    FieldRule::new(
        "graduation_year",
        Check::Required,
        "Graduation year is required",
    ),
    FieldRule::new(
        "graduation_year",
        Check::Year,
        "Graduation year must be a four-digit year",
    ),
    FieldRule::new(
        "graduation_year",
        Check::YearNotBefore(MIN_GRADUATION_YEAR),
        "Graduation year cannot be before 1950",
    ),
    FieldRule::new(
        "graduation_year",
        Check::YearNotInFuture,
        "Graduation year cannot be a future year",
    ),
];

pub const SKILL_RULES: &[FieldRule] = &[
    FieldRule::new("name", Check::Required, "Skill name is required"),
    FieldRule::new(
        "name",
        Check::MinChars(2),
        "Skill name must have at least 2 characters",
    ),
    FieldRule::new(
        "name",
        Check::MaxChars(50),
        "Skill name is too long (maximum 50 characters)",
    ),
    FieldRule::new(
        "name",
        Check::DistinctSkillName,
        "This skill has already been added",
    ),
    FieldRule::new("level", Check::Required, "Select a skill level"),
    FieldRule::new(
        "level",
        Check::SkillLevel,
        "Select a valid skill level (Basic, Intermediate, Advanced, Expert)",
    ),
];
