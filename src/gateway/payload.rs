use serde::{Deserialize, Serialize};

use crate::pool::Question;

/// Body of `POST /check-question`. Fields are optional so missing ones map to 400.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct CheckQuestionRequest {
    pub questions_url: Option<String>,
    pub question: Option<String>,
}

/// Body of `POST /group_similar_questions`.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct GroupQuestionsRequest {
    pub questions_url: Option<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
}

#[derive(Serialize, Debug, Clone)]
pub struct CheckQuestionResponse {
    pub response: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_questions: Option<Vec<Question>>,
}

impl CheckQuestionResponse {
    pub fn from_matches(matched: Vec<Question>) -> Self {
        if matched.is_empty() {
            Self {
                response: Verdict::No,
                matched_questions: None,
            }
        } else {
            Self {
                response: Verdict::Yes,
                matched_questions: Some(matched),
            }
        }
    }
}

#[derive(Serialize, Debug, Clone)]
pub struct GroupQuestionsResponse {
    pub response: Verdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_groups: Option<Vec<Vec<Question>>>,
}

impl GroupQuestionsResponse {
    pub fn from_groups(groups: Vec<Vec<Question>>) -> Self {
        if groups.is_empty() {
            Self {
                response: Verdict::No,
                matched_groups: None,
            }
        } else {
            Self {
                response: Verdict::Yes,
                matched_groups: Some(groups),
            }
        }
    }
}
