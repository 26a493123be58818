//! crates/content_pipeline_core/src/prompts.rs
//!
//! Natural-language prompt construction for every pipeline operation.
//! Pure string building: identical parameters always yield identical text.

use crate::domain::{Difficulty, QuestionType};

pub const QUESTION_SYSTEM_PROMPT: &str = "You are an experienced examiner who writes clear, fair and \
well-structured exam questions. You always answer with valid JSON only, with no markdown and no \
commentary.";

pub const THOUGHT_SYSTEM_PROMPT: &str = "You are an instructional designer explaining, step by step, \
how you would design an exam question set. Write plain sentences only.";

pub const ANALYSIS_SYSTEM_PROMPT: &str = "You are a strict but encouraging examiner grading a \
student's answer script. You always answer with a single valid JSON object and nothing else.";

pub const FAQ_SYSTEM_PROMPT: &str = "You are a patient tutor who anticipates the questions students \
ask about a topic. You always answer with valid JSON only.";

const QUESTION_TEMPLATE: &str = r#"Generate exactly {count} {difficulty} difficulty {type_label} questions for the subject "{subject}" on the topic "{topic}".

Return ONLY a JSON array containing exactly {count} objects. Each object must have this shape:
{schema}

Rules:
{rules}
- "marks" must be an integer between {min_marks} and {max_marks}.
- "reasoning" briefly explains why the question was designed this way.
- Do not put literal newlines, tabs or other control characters inside any string value.
- Do not wrap the array in markdown code fences and do not add any text before or after it."#;

const MCQ_SCHEMA: &str = r#"{"question": "string", "options": ["string", "string", "string", "string"], "correctAnswer": "string", "explanation": "string", "marks": number, "reasoning": "string"}"#;

const MCQ_RULES: &str = r#"- "options" must contain exactly 4 distinct choices.
- "correctAnswer" must be copied character for character from one of the 4 options."#;

const WRITTEN_SCHEMA: &str = r#"{"question": "string", "correctAnswer": "string (a complete model answer)", "explanation": "string (the marking scheme)", "marks": number, "reasoning": "string"}"#;

const DESCRIPTIVE_RULES: &str = r#"- Each question should require a structured written answer of a few paragraphs.
- "correctAnswer" is a complete model answer a top student would write."#;

const CASE_STUDY_RULES: &str = r#"- Each question must open with a short realistic scenario followed by what the student must analyse.
- "correctAnswer" is a complete model answer that applies the theory to the scenario."#;

const THOUGHT_TEMPLATE: &str = r#"You are about to design a set of {difficulty} {type_label} questions for the subject "{subject}" on the topic "{topic}".

Explain your design thinking in 5 to 7 short sentences.
Put each sentence on its own line, separated by a single newline.
Every sentence must end with a period.
Cover the key concepts to assess, the cognitive level that suits the difficulty, common misconceptions to probe, and how marks should be distributed.
Do not number the sentences and do not use markdown."#;

const ANALYSIS_TEMPLATE: &str = r#"Grade the following exam answer script for the subject "{subject}". The paper is worth {total_marks} marks in total.

ANSWER SCRIPT:
---
{text}
---

Return ONLY one JSON object with this exact shape:
{"score": number (0-100, percentage of the total marks earned), "feedback": "string (overall feedback)", "strengths": ["string"], "weaknesses": ["string"], "suggestions": ["string"], "keywordAnalysis": [{"keyword": "string", "present": boolean}], "questionAnalysis": [{"questionNumber": number, "score": number, "feedback": "string", "improvement": "string"}]}

Rules:
- Include one "questionAnalysis" entry per question you can identify, with a unique "questionNumber".
- Keep each list item short.
- Do not put literal newlines inside string values and do not add any text outside the JSON object."#;

const FAQ_TEMPLATE: &str = r#"Write {count} frequently asked questions that students studying "{subject}" ask about "{topic}", each with a clear, accurate answer.

Return ONLY a JSON array of objects with this shape:
{"question": "string", "answer": "string"}

Do not put literal newlines inside string values and do not add any text outside the JSON array."#;

fn type_label(question_type: QuestionType) -> &'static str {
    match question_type {
        QuestionType::Mcq => "multiple-choice",
        QuestionType::Descriptive => "descriptive",
        QuestionType::CaseStudy => "case-study",
    }
}

/// Builds the prompt asking for a JSON array of exactly `count` questions.
pub fn question_generation_prompt(
    subject: &str,
    topic: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
    count: usize,
) -> String {
    let (schema, rules) = match question_type {
        QuestionType::Mcq => (MCQ_SCHEMA, MCQ_RULES),
        QuestionType::Descriptive => (WRITTEN_SCHEMA, DESCRIPTIVE_RULES),
        QuestionType::CaseStudy => (WRITTEN_SCHEMA, CASE_STUDY_RULES),
    };
    let (min_marks, max_marks) = question_type.mark_range();

    QUESTION_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{difficulty}", difficulty.as_str())
        .replace("{type_label}", type_label(question_type))
        .replace("{subject}", subject)
        .replace("{topic}", topic)
        .replace("{schema}", schema)
        .replace("{rules}", rules)
        .replace("{min_marks}", &min_marks.to_string())
        .replace("{max_marks}", &max_marks.to_string())
}

/// Builds the prompt for the newline-separated reasoning stream.
pub fn thought_chain_prompt(
    subject: &str,
    topic: &str,
    question_type: QuestionType,
    difficulty: Difficulty,
) -> String {
    THOUGHT_TEMPLATE
        .replace("{difficulty}", difficulty.as_str())
        .replace("{type_label}", type_label(question_type))
        .replace("{subject}", subject)
        .replace("{topic}", topic)
}

pub fn exam_analysis_prompt(text: &str, subject: &str, total_marks: u32) -> String {
    // The answer script goes in last so a `{...}` inside it is never substituted.
    ANALYSIS_TEMPLATE
        .replace("{subject}", subject)
        .replace("{total_marks}", &total_marks.to_string())
        .replace("{text}", text)
}

pub fn faq_prompt(subject: &str, topic: &str, count: usize) -> String {
    FAQ_TEMPLATE
        .replace("{count}", &count.to_string())
        .replace("{subject}", subject)
        .replace("{topic}", topic)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn question_prompt_is_deterministic() {
        let a = question_generation_prompt("Economics", "Monetary Policy", QuestionType::Mcq, Difficulty::Medium, 3);
        let b = question_generation_prompt("Economics", "Monetary Policy", QuestionType::Mcq, Difficulty::Medium, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn mcq_prompt_demands_four_options_and_exact_count() {
        let prompt = question_generation_prompt("Physics", "Optics", QuestionType::Mcq, Difficulty::Easy, 2);
        assert!(prompt.contains("exactly 2 objects"));
        assert!(prompt.contains("exactly 4 distinct choices"));
        assert!(prompt.contains("between 5 and 10"));
        assert!(prompt.contains("control characters"));
    }

    #[test]
    fn written_prompts_use_wider_mark_ranges_and_model_answers() {
        let descriptive = question_generation_prompt("History", "WW1", QuestionType::Descriptive, Difficulty::Hard, 1);
        assert!(descriptive.contains("between 10 and 20"));
        assert!(descriptive.contains("model answer"));
        assert!(!descriptive.contains("\"options\""));

        let case = question_generation_prompt("Law", "Contracts", QuestionType::CaseStudy, Difficulty::Medium, 3);
        assert!(case.contains("between 20 and 30"));
        assert!(case.contains("scenario"));
    }

    #[test]
    fn no_placeholders_survive_substitution() {
        let prompts = [
            question_generation_prompt("S", "T", QuestionType::CaseStudy, Difficulty::Hard, 3),
            thought_chain_prompt("S", "T", QuestionType::Mcq, Difficulty::Easy),
            exam_analysis_prompt("answer", "S", 50),
            faq_prompt("S", "T", 5),
        ];
        for prompt in prompts {
            for placeholder in ["{count}", "{subject}", "{topic}", "{difficulty}", "{type_label}", "{schema}", "{rules}", "{text}", "{total_marks}"] {
                assert!(!prompt.contains(placeholder), "{} left in prompt", placeholder);
            }
        }
    }

    #[test]
    fn analysis_prompt_keeps_braces_in_student_text() {
        let prompt = exam_analysis_prompt("f(x) = {subject}", "Maths", 100);
        assert!(prompt.contains("f(x) = {subject}"));
        assert!(prompt.contains("worth 100 marks"));
    }

    #[test]
    fn thought_prompt_asks_for_newline_separated_sentences() {
        let prompt = thought_chain_prompt("Biology", "Cells", QuestionType::Descriptive, Difficulty::Medium);
        assert!(prompt.contains("5 to 7"));
        assert!(prompt.contains("newline"));
        assert!(prompt.contains("\"Cells\""));
    }
}
