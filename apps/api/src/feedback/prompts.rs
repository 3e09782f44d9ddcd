// Prompt templates for resume feedback.
// The response schema here is the shape `feedback::normalize` reads back.

/// JSON shape the model must return. Mirrors `FeedbackRecord`.
pub const FEEDBACK_RESPONSE_FORMAT: &str = r#"{
  "overallScore": number,          // 0-100
  "ATS": {
    "score": number,               // 0-100, how well the resume passes applicant tracking systems
    "tips": [{"type": "good" | "improve", "tip": "string"}]
  },
  "toneAndStyle": {
    "score": number,
    "tips": [{"type": "good" | "improve", "tip": "short title", "explanation": "detailed explanation"}]
  },
  "content": { "score": number, "tips": [ /* same as toneAndStyle */ ] },
  "structure": { "score": number, "tips": [ /* same as toneAndStyle */ ] },
  "skills": { "score": number, "tips": [ /* same as toneAndStyle */ ] }
}"#;

/// Feedback prompt for one resume. User-supplied text is inserted as-is, never
/// scanned for placeholders.
pub fn prepare_instructions(job_title: &str, job_description: &str) -> String {
    format!(
        r#"You are an expert in ATS (Applicant Tracking System) and resume analysis.
Analyze and rate the attached resume image and suggest how to improve it.

Be thorough and detailed. Do not hesitate to point out mistakes or areas for improvement.
If there is a lot to improve, do not hesitate to give low scores. Low scores are fine when deserved.
Use the job description below, if provided, to tailor the feedback to the role.

JOB TITLE: {job_title}
JOB DESCRIPTION: {job_description}

Give 3-4 tips per category and 3-4 ATS tips.

Return the analysis as a JSON object in exactly this format:
{format}

Return ONLY the JSON object, without any other text and without backticks."#,
        job_title = job_title.trim(),
        job_description = job_description.trim(),
        format = FEEDBACK_RESPONSE_FORMAT,
    )
}
