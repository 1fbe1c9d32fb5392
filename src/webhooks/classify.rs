//! Event classification: deciding whether a webhook delivery produces a job.
//!
//! Classification is a pure mapping from (event type, payload) to a
//! [`Decision`]; it performs no I/O. Payload validation happens later, in the
//! job builder, so that non-qualifying deliveries can be ignored without
//! requiring the full payload shape.

use serde_json::Value;

/// Pull request actions that qualify for a fresh review.
const REVIEW_ACTIONS: [&str; 3] = ["opened", "synchronize", "reopened"];

/// The outcome of classifying a webhook delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    /// A qualifying `pull_request` event; build a `PR_REVIEW` job.
    CreateReview,

    /// A review comment mentioning the bot; build a `RE_REVIEW` job with the
    /// user's question (the comment body with the mention stripped).
    CreateReReview {
        /// The comment body with the bot handle removed and whitespace trimmed.
        question: String,
    },

    /// Nothing to do for this delivery.
    Ignore,
}

/// Classifies a webhook delivery.
///
/// - `pull_request` events qualify when the action is one of `opened`,
///   `synchronize`, or `reopened`.
/// - `pull_request_review_comment` events qualify when the action is
///   `created` and the comment body mentions `bot_handle`.
/// - Everything else is ignored.
pub fn classify(event_type: &str, payload: &Value, bot_handle: &str) -> Decision {
    match event_type {
        "pull_request" => match payload.get("action").and_then(Value::as_str) {
            Some(action) if REVIEW_ACTIONS.contains(&action) => Decision::CreateReview,
            _ => Decision::Ignore,
        },
        "pull_request_review_comment" => {
            let action = payload.get("action").and_then(Value::as_str);
            let body = payload
                .pointer("/comment/body")
                .and_then(Value::as_str);

            match (action, body) {
                (Some("created"), Some(body)) if body.contains(bot_handle) => {
                    Decision::CreateReReview {
                        question: body.replacen(bot_handle, "", 1).trim().to_string(),
                    }
                }
                _ => Decision::Ignore,
            }
        }
        _ => Decision::Ignore,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::webhooks::events::tests::{pull_request_json, review_comment_json};

    const BOT: &str = "@codereview-ai";

    #[test]
    fn opened_pr_creates_review() {
        let decision = classify("pull_request", &pull_request_json("opened"), BOT);
        assert_eq!(decision, Decision::CreateReview);
    }

    #[test]
    fn synchronize_and_reopened_create_reviews() {
        for action in ["synchronize", "reopened"] {
            let decision = classify("pull_request", &pull_request_json(action), BOT);
            assert_eq!(decision, Decision::CreateReview, "action {action}");
        }
    }

    #[test]
    fn closed_pr_is_ignored() {
        let decision = classify("pull_request", &pull_request_json("closed"), BOT);
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn pr_without_action_is_ignored() {
        let decision = classify("pull_request", &serde_json::json!({}), BOT);
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn mention_comment_creates_re_review_with_stripped_question() {
        let payload = review_comment_json("created", "@codereview-ai explain this");
        let decision = classify("pull_request_review_comment", &payload, BOT);

        assert_eq!(
            decision,
            Decision::CreateReReview {
                question: "explain this".to_string()
            }
        );
    }

    #[test]
    fn mention_mid_comment_is_recognized() {
        let payload = review_comment_json("created", "hey @codereview-ai, why is this unsafe?");
        let decision = classify("pull_request_review_comment", &payload, BOT);

        assert_eq!(
            decision,
            Decision::CreateReReview {
                question: "hey , why is this unsafe?".to_string()
            }
        );
    }

    #[test]
    fn comment_without_mention_is_ignored() {
        let payload = review_comment_json("created", "looks good to me");
        let decision = classify("pull_request_review_comment", &payload, BOT);
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn edited_mention_comment_is_ignored() {
        // Only freshly created comments trigger a re-review.
        let payload = review_comment_json("edited", "@codereview-ai explain this");
        let decision = classify("pull_request_review_comment", &payload, BOT);
        assert_eq!(decision, Decision::Ignore);
    }

    #[test]
    fn unknown_event_type_is_ignored() {
        let decision = classify("push", &pull_request_json("opened"), BOT);
        assert_eq!(decision, Decision::Ignore);
    }
}
