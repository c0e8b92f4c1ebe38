//! Scores shown to learners after an attempt.

use std::ops::Add;

use crate::course::{CodeSection, McqSection, Section};
use crate::ruleset::{validate_percentage, Ruleset};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Score {
    pub earned: f64,
    pub total: f64,
}

impl Score {
    pub fn new(earned: f64, total: f64) -> Self {
        Self { earned, total }
    }

    /// Share of the available points, in `[0, 100]`. Zero when nothing was
    /// available.
    pub fn percentage(&self) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        validate_percentage(self.earned / self.total * 100.0)
    }

    /// Applies the ruleset's time-exceeded penalty to the earned points.
    pub fn with_time_penalty(self, ruleset: &Ruleset, elapsed_secs: u32) -> Self {
        Self {
            earned: ruleset.apply_time_penalty(self.earned, elapsed_secs),
            total: self.total,
        }
    }
}

impl Add for Score {
    type Output = Score;

    fn add(self, other: Score) -> Score {
        Score::new(self.earned + other.earned, self.total + other.total)
    }
}

/// A learner's answer to one section.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionAnswer {
    /// chosen choice index per question, `None` when skipped
    Mcq(Vec<Option<usize>>),
    /// pass/fail per test case, in test case order
    Code(Vec<bool>),
}

pub fn grade_mcq(section: &McqSection, answers: &[Option<usize>]) -> Score {
    section
        .questions
        .iter()
        .enumerate()
        .fold(Score::default(), |score, (index, question)| {
            let correct = answers.get(index).copied().flatten() == Some(question.correct);
            let earned = if correct { question.points } else { 0.0 };
            score + Score::new(earned, question.points)
        })
}

pub fn grade_code(section: &CodeSection, passed: &[bool]) -> Score {
    section
        .test_cases
        .iter()
        .enumerate()
        .fold(Score::default(), |score, (index, case)| {
            let earned = if passed.get(index).copied().unwrap_or(false) {
                case.points
            } else {
                0.0
            };
            score + Score::new(earned, case.points)
        })
}

/// Points available in a section.
pub fn section_total(section: &Section) -> f64 {
    let mcq: f64 = section
        .mcq
        .iter()
        .flat_map(|m| m.questions.iter())
        .map(|q| q.points)
        .sum();
    let code: f64 = section
        .code
        .iter()
        .flat_map(|c| c.test_cases.iter())
        .map(|t| t.points)
        .sum();
    mcq + code
}

/// Grades one section. An answer of the wrong kind earns nothing.
pub fn grade_section(section: &Section, answer: &SectionAnswer) -> Score {
    match (answer, &section.mcq, &section.code) {
        (SectionAnswer::Mcq(answers), Some(mcq), _) => grade_mcq(mcq, answers),
        (SectionAnswer::Code(passed), _, Some(code)) => grade_code(code, passed),
        _ => Score::new(0.0, section_total(section)),
    }
}

/// Grades a whole activity. Sections without an answer count as zero.
pub fn grade_activity(sections: &[Section], answers: &[Option<SectionAnswer>]) -> Score {
    sections
        .iter()
        .enumerate()
        .map(|(index, section)| match answers.get(index) {
            Some(Some(answer)) => grade_section(section, answer),
            _ => Score::new(0.0, section_total(section)),
        })
        .fold(Score::default(), |total, score| total + score)
}

/// A test case as a learner may see it: hidden cases only show their points.
#[derive(Debug, Clone, PartialEq)]
pub struct TestCaseView<'a> {
    pub number: usize,
    pub points: f64,
    pub hidden: bool,
    pub expected: Option<&'a str>,
    pub driver: Option<&'a str>,
}

pub fn learner_test_cases(section: &CodeSection) -> Vec<TestCaseView<'_>> {
    section
        .test_cases
        .iter()
        .enumerate()
        .map(|(index, case)| TestCaseView {
            number: index + 1,
            points: case.points,
            hidden: case.hidden,
            expected: (!case.hidden).then_some(case.expected.as_str()),
            driver: (!case.hidden).then_some(case.driver.as_str()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::course::{Question, SectionType, TestCase};
    use crate::ruleset::TimeExceededPenalty;

    fn mcq() -> McqSection {
        McqSection {
            instructions: "Pick one".into(),
            questions: vec![
                Question {
                    question: "2 + 2".into(),
                    points: 2.0,
                    correct: 1,
                    choices: vec!["3".into(), "4".into()],
                },
                Question {
                    question: "Capital of France".into(),
                    points: 3.0,
                    correct: 0,
                    choices: vec!["Paris".into(), "Lyon".into()],
                },
            ],
        }
    }

    fn code() -> CodeSection {
        CodeSection {
            renderer: "python".into(),
            instructions: "Write add".into(),
            default_code: None,
            sources: None,
            test_cases: vec![
                TestCase {
                    expected: "3".into(),
                    driver: "print(add(1, 2))".into(),
                    points: 1.0,
                    hidden: false,
                },
                TestCase {
                    expected: "0".into(),
                    driver: "print(add(-1, 1))".into(),
                    points: 4.0,
                    hidden: true,
                },
            ],
        }
    }

    #[test]
    fn mcq_counts_correct_choices() {
        let score = grade_mcq(&mcq(), &[Some(1), Some(1)]);
        assert_eq!(score, Score::new(2.0, 5.0));
        assert_eq!(score.percentage(), 40.0);
    }

    #[test]
    fn skipped_questions_earn_nothing() {
        assert_eq!(grade_mcq(&mcq(), &[None]), Score::new(0.0, 5.0));
    }

    #[test]
    fn code_sums_passed_cases() {
        assert_eq!(grade_code(&code(), &[false, true]), Score::new(4.0, 5.0));
        assert_eq!(grade_code(&code(), &[]), Score::new(0.0, 5.0));
    }

    #[test]
    fn empty_score_has_zero_percentage() {
        assert_eq!(Score::default().percentage(), 0.0);
    }

    #[test]
    fn activity_grade_sums_sections() {
        let sections = vec![
            Section {
                id: 1,
                section_type: SectionType::Mcq,
                mcq: Some(mcq()),
                code: None,
            },
            Section {
                id: 2,
                section_type: SectionType::Code,
                mcq: None,
                code: Some(code()),
            },
        ];

        let score = grade_activity(
            &sections,
            &[
                Some(SectionAnswer::Mcq(vec![Some(1), Some(0)])),
                Some(SectionAnswer::Mcq(vec![Some(0)])),
            ],
        );
        assert_eq!(score, Score::new(5.0, 10.0));

        let unanswered = grade_activity(&sections, &[]);
        assert_eq!(unanswered, Score::new(0.0, 10.0));
    }

    #[test]
    fn penalty_reduces_earned_points() {
        let ruleset = Ruleset {
            time_limit: Some(60),
            time_exceeded_penalty: Some(TimeExceededPenalty::CloseActivity),
            ..Default::default()
        };
        let score = Score::new(4.0, 5.0).with_time_penalty(&ruleset, 61);
        assert_eq!(score, Score::new(0.0, 5.0));
    }

    #[test]
    fn hidden_cases_do_not_leak_details() {
        let section = code();
        let views = learner_test_cases(&section);
        assert_eq!(views[0].expected, Some("3"));
        assert_eq!(views[1].number, 2);
        assert!(views[1].hidden);
        assert_eq!(views[1].expected, None);
        assert_eq!(views[1].driver, None);
    }
}
