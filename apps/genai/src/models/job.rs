use serde::Deserialize;

use crate::llm_client::prompts::render_template;

/// The job a candidate is evaluated or interviewed against.
#[derive(Debug, Clone, Deserialize)]
pub struct JobPosting {
    pub job_title: String,
    pub job_description: String,
    pub job_requirements: String,
}

impl JobPosting {
    /// Fills `{job_title}`, `{job_description}`, `{job_requirements}` and any
    /// `extra` placeholders in `template`, in one pass.
    pub fn render(&self, template: &str, extra: &[(&str, &str)]) -> String {
        let mut vars = vec![
            ("job_title", self.job_title.as_str()),
            ("job_description", self.job_description.as_str()),
            ("job_requirements", self.job_requirements.as_str()),
        ];
        vars.extend_from_slice(extra);
        render_template(template, &vars)
    }
}
