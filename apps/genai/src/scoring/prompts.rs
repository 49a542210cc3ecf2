// All LLM prompt constants for the Scoring module.
// The function-only instruction itself is appended by the gateway client.

/// System prompt for resume scoring.
pub const RESUME_SCORE_SYSTEM: &str = "You are a strict and experienced AI HR expert. \
    Your task is to evaluate resumes for a given job. \
    Always use the 'score_resume' function to return your evaluation. \
    Do not answer directly; only call the function.";

/// System prompt for interview scoring.
pub const INTERVIEW_SCORE_SYSTEM: &str = "You are a strict and experienced AI HR expert. \
    Your task is to evaluate the candidate answers in the interviews for a given job. \
    Always use the 'score_interview' function to return your evaluation. \
    Do not answer directly; only call the function.";

/// Resume evaluation prompt.
/// Replace: {job_title}, {job_description}, {job_requirements}, {resume_text}
pub const RESUME_SCORE_PROMPT_TEMPLATE: &str = "Please evaluate the following resume.
Job title: {job_title}
Job description: {job_description}
Job requirements: {job_requirements}
Resume: {resume_text}";

/// Interview evaluation prompt.
/// Replace: {job_title}, {job_description}, {job_requirements}, {chat_history}
pub const INTERVIEW_SCORE_PROMPT_TEMPLATE: &str = "Please evaluate the following interview.
Job title: {job_title}
Job description: {job_description}
Job requirements: {job_requirements}
Chat history: {chat_history}";
