pub mod cv;
pub mod dates;
pub mod locale;

pub use cv::{Education, EntryId, Experience, PersonalInfo, ProfileImage, Skill, SkillLevel};
pub use locale::Locale;
