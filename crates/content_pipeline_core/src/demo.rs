//! crates/content_pipeline_core/src/demo.rs
//!
//! Synthetic content for demo mode and for the fixed fallbacks of the pipeline.
//! Shapes are stable; only the analysis score and the simulated delay are random.

use crate::domain::{
    Difficulty, ExamAnalysisResult, Faq, GeneratedQuestion, GenerationRequest, KeywordAnalysis,
    QuestionAnalysis, QuestionType, StreamingThought,
};
use crate::validator::IdSeed;
use rand::Rng;
use std::time::Duration;

/// The bounds of the artificial latency applied in demo mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DemoDelay {
    pub min: Duration,
    pub max: Duration,
}

impl Default for DemoDelay {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(800),
            max: Duration::from_millis(2500),
        }
    }
}

impl DemoDelay {
    pub fn none() -> Self {
        Self {
            min: Duration::ZERO,
            max: Duration::ZERO,
        }
    }

    /// Draws a delay uniformly from `[min, max]`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Duration {
        let min = self.min.as_millis() as u64;
        let max = (self.max.as_millis() as u64).max(min);
        Duration::from_millis(rng.gen_range(min..=max))
    }
}

/// The five design sentences used when the reasoning stream is unavailable.
pub fn fallback_thought_lines(subject: &str, topic: &str, difficulty: Difficulty) -> Vec<String> {
    vec![
        format!("Analyzing the core concepts of {} within {}.", topic, subject),
        format!(
            "Calibrating the questions to a {} difficulty level for the target learners.",
            difficulty
        ),
        format!(
            "Identifying common misconceptions students have about {}.",
            topic
        ),
        "Balancing recall, application and analysis across the question set.".to_string(),
        "Aligning the marking scheme with the expected depth of each answer.".to_string(),
    ]
}

/// The fallback lines as completed thoughts, `thought-1` through `thought-5`.
pub fn fallback_thoughts(subject: &str, topic: &str, difficulty: Difficulty) -> Vec<StreamingThought> {
    fallback_thought_lines(subject, topic, difficulty)
        .into_iter()
        .enumerate()
        .map(|(i, content)| StreamingThought {
            id: StreamingThought::id_for(i + 1),
            content,
            is_complete: true,
        })
        .collect()
}

/// Placeholder questions returned when no backend is configured.
pub fn demo_questions(request: &GenerationRequest, ids: IdSeed) -> Vec<GeneratedQuestion> {
    (0..request.count)
        .map(|index| demo_question(request, index, ids.id(index)))
        .collect()
}

fn demo_question(request: &GenerationRequest, index: usize, id: String) -> GeneratedQuestion {
    let number = index + 1;
    let topic = &request.topic;
    let subject = &request.subject;
    let (question, options, correct_answer) = match request.question_type {
        QuestionType::Mcq => {
            let options = vec![
                format!("The defining principle of {}", topic),
                format!("An unrelated concept from {}", subject),
                format!("A common misconception about {}", topic),
                "None of the above".to_string(),
            ];
            let answer = options[0].clone();
            (
                format!(
                    "Sample question {}: which statement best describes {} in {}?",
                    number, topic, subject
                ),
                Some(options),
                answer,
            )
        }
        QuestionType::Descriptive => (
            format!(
                "Sample question {}: explain the significance of {} in {} with examples.",
                number, topic, subject
            ),
            None,
            format!(
                "A strong answer defines {}, explains its role in {} and illustrates it with relevant examples.",
                topic, subject
            ),
        ),
        QuestionType::CaseStudy => (
            format!(
                "Sample case study {}: an organisation is facing a challenge involving {}. Analyse the situation using principles of {} and recommend a solution.",
                number, topic, subject
            ),
            None,
            format!(
                "A strong answer identifies the issues, applies {} concepts to the scenario and justifies a clear recommendation.",
                subject
            ),
        ),
    };

    GeneratedQuestion {
        id,
        question,
        options,
        correct_answer,
        explanation: format!(
            "This is a demo question about {}. Configure a model backend to generate real content.",
            topic
        ),
        marks: request.question_type.default_marks(),
        question_type: request.question_type,
        difficulty: request.difficulty,
        reasoning: Some(format!(
            "Demo mode: designed to check {} understanding of {}.",
            request.difficulty, topic
        )),
    }
}

/// A plausible grading report with a random score in `[60, 90]`.
pub fn demo_exam_analysis<R: Rng + ?Sized>(rng: &mut R, subject: &str) -> ExamAnalysisResult {
    let score = rng.gen_range(60..=90);
    ExamAnalysisResult {
        score,
        feedback: format!(
            "The answers show a good understanding of the core {} concepts, with room to improve in depth and use of examples.",
            subject
        ),
        strengths: vec![
            "Clear understanding of fundamental concepts".to_string(),
            "Well-structured answers".to_string(),
            "Good use of relevant terminology".to_string(),
        ],
        weaknesses: vec![
            "Some answers lack supporting examples".to_string(),
            "Limited critical analysis in longer answers".to_string(),
            "Occasional gaps in explanation".to_string(),
        ],
        suggestions: vec![
            "Support key points with real-world examples".to_string(),
            "Practise structuring arguments before writing".to_string(),
            "Review the topics where marks were lost".to_string(),
        ],
        keyword_analysis: Some(vec![
            KeywordAnalysis {
                keyword: "definition".to_string(),
                present: true,
            },
            KeywordAnalysis {
                keyword: "example".to_string(),
                present: false,
            },
        ]),
        question_analysis: Some(vec![QuestionAnalysis {
            question_number: 1,
            score: 8,
            feedback: "Good attempt with a clear explanation.".to_string(),
            improvement: "Add a relevant example to strengthen the answer.".to_string(),
        }]),
    }
}

/// The fixed FAQ list used in demo mode and when generation fails.
pub fn fallback_faqs(subject: &str, topic: &str) -> Vec<Faq> {
    vec![
        Faq {
            question: format!("What is {}?", topic),
            answer: format!(
                "{} is a core topic in {}. Start with its definition and key terms, then look at how it is applied.",
                topic, subject
            ),
        },
        Faq {
            question: format!("Why is {} important in {}?", topic, subject),
            answer: format!(
                "It underpins many other ideas in {} and appears frequently in exams.",
                subject
            ),
        },
        Faq {
            question: format!("How should I revise {}?", topic),
            answer: "Summarise the key concepts, practise past questions and explain the ideas in your own words.".to_string(),
        },
    ]
}
