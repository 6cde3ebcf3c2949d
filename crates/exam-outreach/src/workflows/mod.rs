pub mod exams;
pub mod outreach;
