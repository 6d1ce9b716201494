//! Context assembly from ranked search results.
//!
//! Results arrive already ranked by the store; the builder keeps at most
//! top-k of them, drops anything below the score floor, and formats the rest
//! into numbered blocks without reordering.

use super::store::RecordSearchResult;

/// Per-request context assembled from retrieved records. Not persisted.
#[derive(Debug, Clone, Default)]
pub struct QueryContext {
    /// Formatted context block for the prompt. Empty when nothing matched.
    pub text: String,
    /// Dataset questions of the records that made it into the context.
    pub sources: Vec<String>,
}

impl QueryContext {
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct ContextBuilder {
    top_k: usize,
    max_context_chars: usize,
    min_score: f32,
}

impl ContextBuilder {
    pub fn new(top_k: usize, max_context_chars: usize, min_score: f32) -> Self {
        Self {
            top_k,
            max_context_chars,
            min_score,
        }
    }

    /// Format ranked results into a context block, preserving ranking order.
    pub fn build(&self, results: &[RecordSearchResult]) -> QueryContext {
        let mut context = String::new();
        let mut sources = Vec::new();
        let mut current_length = 0;

        for (i, result) in results
            .iter()
            .filter(|r| r.score >= self.min_score)
            .take(self.top_k)
            .enumerate()
        {
            let block = format!(
                "[{}] {}\n{}\n\n",
                i + 1,
                result.record.question,
                result.record.answer
            );

            if current_length + block.len() > self.max_context_chars {
                break;
            }

            current_length += block.len();
            context.push_str(&block);
            sources.push(result.record.question.clone());
        }

        QueryContext {
            text: context.trim().to_string(),
            sources,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::store::StoredRecord;

    fn result(question: &str, answer: &str, score: f32) -> RecordSearchResult {
        RecordSearchResult {
            record: StoredRecord {
                record_id: question.to_string(),
                question: question.to_string(),
                answer: answer.to_string(),
            },
            score,
        }
    }

    #[test]
    fn keeps_at_most_top_k_in_ranking_order() {
        let builder = ContextBuilder::new(2, 4000, 0.0);
        let results = vec![
            result("first", "a1", 0.9),
            result("second", "a2", 0.8),
            result("third", "a3", 0.7),
        ];

        let context = builder.build(&results);
        assert_eq!(context.sources, vec!["first", "second"]);
        assert!(context.text.find("first").unwrap() < context.text.find("second").unwrap());
        assert!(!context.text.contains("third"));
    }

    #[test]
    fn drops_results_below_score_floor() {
        let builder = ContextBuilder::new(5, 4000, 0.5);
        let results = vec![result("kept", "a", 0.6), result("dropped", "a", 0.1)];

        let context = builder.build(&results);
        assert_eq!(context.sources, vec!["kept"]);
    }

    #[test]
    fn respects_char_budget() {
        let builder = ContextBuilder::new(10, 60, 0.0);
        let results = vec![
            result("q1", &"x".repeat(40), 0.9),
            result("q2", &"y".repeat(40), 0.8),
        ];

        let context = builder.build(&results);
        assert_eq!(context.sources, vec!["q1"]);
        assert!(context.text.len() <= 60);
    }

    #[test]
    fn empty_results_yield_empty_context() {
        let builder = ContextBuilder::new(4, 4000, 0.0);
        let context = builder.build(&[]);
        assert!(context.is_empty());
        assert!(context.sources.is_empty());
    }
}
