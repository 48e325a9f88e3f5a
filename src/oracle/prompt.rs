//! Oracle prompts. Candidates are always numbered from 1; the parsers rely on it.

use std::fmt::Write;

fn enumerate<'a>(texts: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for (i, text) in texts.into_iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, text);
    }
    out
}

/// Prompt asking which shortlisted candidates match `query`.
///
/// `candidates` must be in shortlist order.
pub fn match_prompt<'a>(query: &str, candidates: impl IntoIterator<Item = &'a str>) -> String {
    format!(
        r#"You are an expert semantic analysis AI. Your task is to compare a "New Question" against a list of "Candidate Questions" and identify which ones are semantically identical.

Definition of Semantically Identical: two questions are semantically identical if they ask the exact same thing or test the same concept, even if the wording, names, or numbers are different.

New Question:
"""{query}"""

Candidate Questions:
{candidates}
Which of the numbered "Candidate Questions" are semantically identical to the "New Question"?

Return ONLY the numbers of the matching candidates, separated by commas (e.g., "1, 3").
If none match, return nothing.
Do not add any explanation or other text."#,
        query = query,
        candidates = enumerate(candidates),
    )
}

/// Prompt asking the oracle to partition a whole pool into groups.
pub fn grouping_prompt<'a>(questions: impl IntoIterator<Item = &'a str>) -> String {
    format!(
        r#"You are an expert question grouping AI. Your task is to review the provided list of questions and identify all groups of questions that are semantically identical.

Definition of Semantically Identical: questions are semantically identical if they ask the exact same core question, test the exact same underlying concept or skill, or would require the exact same answer, regardless of variations in wording, numerical values, or names. Focus on the underlying meaning, not superficial phrasing.

Here is the list of questions:
{questions}
Return the result as groups of comma-separated numbers, one group per line, each line labelled like this:
Group 1: 1, 4, 7
Group 2: 2, 5

Only return groups with more than one question. Each question may appear in at most one group. Do not explain."#,
        questions = enumerate(questions),
    )
}
