//! Best-effort extraction of structure from free-form model text.
//!
//! Every function here is total: malformed input yields `None` or a
//! placeholder-filled value, never a panic or an error.

use std::collections::HashSet;

use tracing::debug;

use crate::models::{QuizQuestion, SummaryResult};

pub const SUMMARY_PLACEHOLDER: &str = "Concise summary pending.";
pub const KEY_POINT_PLACEHOLDER: &str = "Review the video to learn key ideas.";
pub const QUESTION_MARKER: &str = "Question";

const RANKING_SEPARATOR: &str = "::";
const MAX_KEY_POINTS: usize = 3;
const OPTIONS_PER_QUESTION: usize = 4;

/// Ids in the order the model listed them, from lines shaped `id :: title`.
///
/// Returns `None` when no line carries an id.
pub fn extract_ranking(text: &str) -> Option<Vec<String>> {
    let mut seen = HashSet::new();
    let ids: Vec<String> = text
        .lines()
        .filter_map(|line| line.split_once(RANKING_SEPARATOR))
        .map(|(head, _)| strip_list_marker(head).to_string())
        .filter(|id| !id.is_empty())
        .filter(|id| seen.insert(id.clone()))
        .collect();

    debug!("Extracted {} ranked ids from model reply", ids.len());
    if ids.is_empty() { None } else { Some(ids) }
}

/// First line is the summary, the next three are key points.
pub fn extract_summary(text: &str) -> SummaryResult {
    let lines: Vec<String> = text
        .lines()
        .map(strip_bullet)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    let summary = lines
        .first()
        .cloned()
        .unwrap_or_else(|| SUMMARY_PLACEHOLDER.to_string());

    let mut key_points: Vec<String> = lines.into_iter().skip(1).take(MAX_KEY_POINTS).collect();
    if key_points.is_empty() {
        key_points.push(KEY_POINT_PLACEHOLDER.to_string());
    }

    SummaryResult {
        summary,
        key_points,
    }
}

/// Multiple-choice questions separated by the `Question` marker.
///
/// A block needs question text and four options to be kept. Returns `None`
/// when no block survives.
pub fn extract_quiz(text: &str) -> Option<Vec<QuizQuestion>> {
    let questions: Vec<QuizQuestion> = text
        .split(QUESTION_MARKER)
        .filter(|block| !block.trim().is_empty())
        .filter_map(parse_question_block)
        .collect();

    debug!("Extracted {} quiz questions from model reply", questions.len());
    if questions.is_empty() {
        None
    } else {
        Some(questions)
    }
}

fn parse_question_block(block: &str) -> Option<QuizQuestion> {
    let mut lines = block.lines().map(str::trim).filter(|l| !l.is_empty());

    // `Question 1:` may sit on its own line with the text below it
    let mut question = strip_question_label(lines.next()?);
    if question.is_empty() {
        question = strip_bullet(lines.next()?);
    }
    if question.is_empty() {
        return None;
    }

    let mut options = Vec::with_capacity(OPTIONS_PER_QUESTION);
    let mut labeled_answer = None;
    for line in lines {
        if let Some(answer) = answer_label(line) {
            if labeled_answer.is_none() {
                labeled_answer = Some(answer);
            }
            continue;
        }
        if options.len() < OPTIONS_PER_QUESTION {
            let option = strip_enumerator(line);
            if !option.is_empty() {
                options.push(option.to_string());
            }
        }
    }

    if options.len() < OPTIONS_PER_QUESTION {
        debug!(
            "Dropping quiz block with {} options: {}",
            options.len(),
            question
        );
        return None;
    }

    let answer = resolve_answer(labeled_answer, &options);
    Some(QuizQuestion {
        question: question.to_string(),
        options,
        answer,
    })
}

/// Maps a labeled answer onto one of the options.
///
/// Without a usable label the first option is the answer.
fn resolve_answer(label: Option<&str>, options: &[String]) -> String {
    let Some(raw) = label.map(|l| l.trim().trim_end_matches('.')) else {
        debug!("No answer line, defaulting to first option");
        return options[0].clone();
    };

    if let Some(exact) = options.iter().find(|o| o.as_str() == raw) {
        return exact.clone();
    }
    if let Some(index) = enumerator_index(raw) {
        if let Some(option) = options.get(index) {
            return option.clone();
        }
    }
    let stripped = strip_enumerator(raw);
    if let Some(exact) = options.iter().find(|o| o.as_str() == stripped) {
        return exact.clone();
    }
    if let Some(loose) = options.iter().find(|o| o.eq_ignore_ascii_case(stripped)) {
        return loose.clone();
    }

    debug!("Answer {:?} matches no option, defaulting to first option", raw);
    options[0].clone()
}

/// Text after an `Answer:` label, if the line is one
fn answer_label(line: &str) -> Option<&str> {
    let (label, rest) = line.split_once(':')?;
    let label = strip_bullet(label).trim_matches('*').trim();
    let label = label.to_ascii_lowercase();
    if label == "answer" || label == "correct answer" {
        Some(rest.trim().trim_matches('*').trim())
    } else {
        None
    }
}

/// Index for a bare enumerator such as `B`, `b)`, `(c)` or `2`
fn enumerator_index(raw: &str) -> Option<usize> {
    let token = raw
        .trim()
        .trim_start_matches('(')
        .trim_end_matches(['.', ')', ':']);
    let mut chars = token.chars();
    let c = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    match c.to_ascii_lowercase() {
        'a'..='d' => Some(c.to_ascii_lowercase() as usize - 'a' as usize),
        '1'..='4' => Some(c as usize - '1' as usize),
        _ => None,
    }
}

/// Removes `A.`, `b)`, `(C)`, `1:` and bullet prefixes from an option line
fn strip_enumerator(line: &str) -> &str {
    let line = strip_bullet(line);
    let body = line.strip_prefix('(').unwrap_or(line);
    let mut chars = body.char_indices();
    if let (Some((_, first)), Some((sep_at, sep))) = (chars.next(), chars.next()) {
        let is_label = first.is_ascii_alphanumeric();
        let is_sep = matches!(sep, '.' | ')' | ':');
        let followed_by_space = body[sep_at + sep.len_utf8()..]
            .chars()
            .next()
            .is_none_or(char::is_whitespace);
        if is_label && is_sep && followed_by_space {
            return body[sep_at + sep.len_utf8()..].trim();
        }
    }
    line
}

/// Removes the `1:` / `2.` left over after splitting on the question marker
fn strip_question_label(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit() || c.is_whitespace());
    let rest = rest.trim_start_matches([':', '.', ')', '-']);
    strip_bullet(rest)
}

fn strip_bullet(line: &str) -> &str {
    line.trim()
        .trim_start_matches(['-', '*', '•'])
        .trim()
}

/// Bullet markers, numbered-list prefixes like `1.` or `2)`, and markdown
/// emphasis or code ticks around the id
fn strip_list_marker(head: &str) -> &str {
    let mut head = strip_bullet(head);
    let digits = head.len() - head.trim_start_matches(|c: char| c.is_ascii_digit()).len();
    if digits > 0 {
        let rest = &head[digits..];
        if let Some(after) = rest.strip_prefix(['.', ')']) {
            if after.starts_with(char::is_whitespace) {
                head = after.trim();
            }
        }
    }
    head.trim_matches(['*', '`']).trim()
}
