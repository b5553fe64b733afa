//! Prompt construction and reply parsing for exam question explanations.
//!
//! Model invocation lives elsewhere; these helpers only turn a question into
//! a prompt and a model reply into an [`AIExplanation`].

use common::types::AIExplanation;
use serde::Deserialize;

use crate::errors::ExplanationError;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExplanationRequest {
    pub question: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    #[serde(default)]
    pub student_answer: Option<usize>,
}

fn letter(i: usize) -> char {
    (b'A' + (i % 26) as u8) as char
}

impl ExplanationRequest {
    pub fn validate(&self) -> Result<(), ExplanationError> {
        if self.question.trim().is_empty() {
            return Err(ExplanationError::Validation("question is empty".into()));
        }
        if self.options.len() < 2 {
            return Err(ExplanationError::Validation("at least two options are required".into()));
        }
        if self.options.len() > 26 {
            return Err(ExplanationError::Validation("at most 26 options are supported".into()));
        }
        if self.correct_index >= self.options.len() {
            return Err(ExplanationError::Validation(format!(
                "correct_index {} out of range for {} options",
                self.correct_index,
                self.options.len()
            )));
        }
        if let Some(s) = self.student_answer {
            if s >= self.options.len() {
                return Err(ExplanationError::Validation(format!("student_answer {s} out of range")));
            }
        }
        Ok(())
    }
}

const INSTRUCTIONS: &str = "You are an English teacher explaining an exam question to a student.
Reply with a single JSON object and nothing else, using these keys:
  \"whyCorrect\": list of short sentences explaining the correct option,
  \"whyOthersWrong\": list of short sentences, one per wrong option,
  \"keyPoints\": list of grammar or vocabulary points to remember,
  \"tips\": list of study tips,
  \"uncertaintyNote\": string if the question is ambiguous, otherwise null.";

pub fn build_prompt(req: &ExplanationRequest) -> Result<String, ExplanationError> {
    req.validate()?;

    let mut prompt = String::with_capacity(INSTRUCTIONS.len() + 256);
    prompt.push_str(INSTRUCTIONS);
    prompt.push_str("\n\nQuestion:\n");
    prompt.push_str(req.question.trim());
    prompt.push_str("\n\nOptions:\n");
    for (i, opt) in req.options.iter().enumerate() {
        prompt.push_str(&format!("{}. {}\n", letter(i), opt.trim()));
    }
    prompt.push_str(&format!("\nCorrect option: {}\n", letter(req.correct_index)));
    if let Some(s) = req.student_answer {
        if s == req.correct_index {
            prompt.push_str(&format!("The student chose {} (correct).\n", letter(s)));
        } else {
            prompt.push_str(&format!("The student chose {} (incorrect). Address that mistake directly.\n", letter(s)));
        }
    }
    Ok(prompt)
}

/// Accepts bare JSON, fenced JSON, or JSON surrounded by prose.
///
/// Tries each `{` in turn and keeps the first object that deserializes, so
/// braces in the prose before the object do not matter.
pub fn parse_explanation(raw: &str) -> Result<AIExplanation, ExplanationError> {
    let mut last_err = None;
    for (start, _) in raw.match_indices('{') {
        let mut stream = serde_json::Deserializer::from_str(&raw[start..]).into_iter::<AIExplanation>();
        match stream.next() {
            Some(Ok(parsed)) => return finish(parsed),
            Some(Err(e)) => last_err = Some(e),
            None => {}
        }
    }
    match last_err {
        Some(e) => Err(ExplanationError::Parse(e)),
        None => Err(ExplanationError::NoJson),
    }
}

fn finish(mut parsed: AIExplanation) -> Result<AIExplanation, ExplanationError> {
    parsed.why_correct.retain(|s| !s.trim().is_empty());
    if parsed.why_correct.is_empty() {
        return Err(ExplanationError::Validation("whyCorrect is empty".into()));
    }
    if parsed.uncertainty_note.as_deref().is_some_and(|n| n.trim().is_empty()) {
        parsed.uncertainty_note = None;
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> ExplanationRequest {
        ExplanationRequest {
            question: "She ___ to London last year.".into(),
            options: vec!["go".into(), "went".into(), "has gone".into()],
            correct_index: 1,
            student_answer: Some(2),
        }
    }

    #[test]
    fn prompt_lists_options_and_answers() {
        let p = build_prompt(&request()).unwrap();
        assert!(p.contains("She ___ to London last year."));
        assert!(p.contains("A. go\nB. went\nC. has gone\n"));
        assert!(p.contains("Correct option: B"));
        assert!(p.contains("The student chose C (incorrect)"));
        assert!(p.contains("\"whyCorrect\""));
    }

    #[test]
    fn prompt_without_student_answer() {
        let mut req = request();
        req.student_answer = None;
        let p = build_prompt(&req).unwrap();
        assert!(!p.contains("The student chose"));
    }

    #[test]
    fn rejects_out_of_range_correct_index() {
        let mut req = request();
        req.correct_index = 3;
        assert!(matches!(build_prompt(&req), Err(ExplanationError::Validation(_))));
    }

    #[test]
    fn rejects_single_option() {
        let mut req = request();
        req.options.truncate(1);
        req.correct_index = 0;
        req.student_answer = None;
        assert!(matches!(build_prompt(&req), Err(ExplanationError::Validation(_))));
    }

    #[test]
    fn parses_fenced_reply() {
        let raw = "Here you go:\n```json\n{\"whyCorrect\":[\"Past simple for a finished time\"],\"tips\":[\"Look for time markers\"],\"uncertaintyNote\":\"\"}\n```";
        let e = parse_explanation(raw).unwrap();
        assert_eq!(e.why_correct, vec!["Past simple for a finished time".to_string()]);
        assert_eq!(e.tips.len(), 1);
        assert!(e.key_points.is_empty());
        assert_eq!(e.uncertainty_note, None);
    }

    #[test]
    fn braces_in_leading_prose_are_skipped() {
        let raw = "Use the {past simple} here. {\"whyCorrect\":[\"Finished action\"],\"keyPoints\":[\"last year\"]} Hope that helps {:)}";
        let e = parse_explanation(raw).unwrap();
        assert_eq!(e.why_correct, vec!["Finished action".to_string()]);
        assert_eq!(e.key_points, vec!["last year".to_string()]);
    }

    #[test]
    fn reply_without_json_is_rejected() {
        assert!(matches!(parse_explanation("I am not sure."), Err(ExplanationError::NoJson)));
    }

    #[test]
    fn empty_rationale_is_rejected() {
        let raw = r#"{"whyCorrect":["  "],"tips":[]}"#;
        assert!(matches!(parse_explanation(raw), Err(ExplanationError::Validation(_))));
    }

    #[test]
    fn missing_rationale_is_a_parse_error() {
        assert!(matches!(parse_explanation(r#"{"tips":["x"]}"#), Err(ExplanationError::Parse(_))));
    }
}
