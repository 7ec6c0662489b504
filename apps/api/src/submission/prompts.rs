//! Instruction prompt for resume analysis.
//!
//! The response-format section has to stay in lockstep with the serde shape
//! of `models::feedback::FeedbackReport`; the parser is strict about keys.

/// Response shape the model is asked to produce, spelled out field by field.
const RESPONSE_FORMAT: &str = r#"{
  "overall_score": number (0-100, overall rating of the resume),
  "ats": {
    "score": number (0-100, rating based on ATS suitability),
    "tips": [{"type": "good" | "improve", "tip": string}] (3-4 tips)
  },
  "tone_and_style": {
    "score": number (0-100),
    "tips": [{"type": "good" | "improve", "tip": string (short title), "explanation": string (detailed advice)}] (3-4 tips)
  },
  "content": {
    "score": number (0-100),
    "tips": [{"type": "good" | "improve", "tip": string (short title), "explanation": string (detailed advice)}] (3-4 tips)
  },
  "structure": {
    "score": number (0-100),
    "tips": [{"type": "good" | "improve", "tip": string (short title), "explanation": string (detailed advice)}] (3-4 tips)
  },
  "skills": {
    "score": number (0-100),
    "tips": [{"type": "good" | "improve", "tip": string (short title), "explanation": string (detailed advice)}] (3-4 tips)
  }
}"#;

const INSTRUCTIONS_TEMPLATE: &str = r#"You are an expert in ATS (Applicant Tracking System) and resume analysis.
Please analyze and rate this resume and suggest how to improve it.
The rating can be low if the resume is bad.
Be thorough and detailed. Don't be afraid to point out any mistakes or areas for improvement.
If there is a lot to improve, don't hesitate to give low scores. This is to help the user to improve their resume.
If available, use the job description for the job user is applying to to give more detailed feedback.
If provided, take the job description into consideration.
The job title is: {job_title}
The job description is: {job_description}
Provide the feedback using the following format:
{response_format}
Return the analysis as a JSON object, without any other text and without the backticks.
Do not include any other text or comments."#;

/// Builds the instruction text sent alongside the stored resume path.
pub fn prepare_instructions(job_title: &str, job_description: &str) -> String {
    INSTRUCTIONS_TEMPLATE
        .replace("{response_format}", RESPONSE_FORMAT)
        .replace("{job_title}", job_title)
        .replace("{job_description}", job_description)
}
