pub mod resume;

pub use resume::{Education, Experience, Personal, Project, ResumeDocument, TemplateId};
