//! Token estimation and budgeted collection.

pub mod budgeting;
pub mod ranking;

pub use budgeting::{
    apply_budget, truncate_at_line, truncation_marker, BudgetCandidate, BudgetResult,
    TruncationNote,
};
pub use ranking::{estimate_tokens, ApproxTokenCounter, TokenCounter, CHARS_PER_TOKEN};

pub struct BudgetCollector<T> {
    tokenizer: T,
}

impl Default for BudgetCollector<ApproxTokenCounter> {
    fn default() -> Self {
        Self {
            tokenizer: ApproxTokenCounter,
        }
    }
}

impl<T> BudgetCollector<T>
where
    T: TokenCounter,
{
    pub fn new(tokenizer: T) -> Self {
        Self { tokenizer }
    }

    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// `candidates` must already be in priority order; no reordering happens
    /// here.
    pub fn collect(&self, candidates: Vec<BudgetCandidate>, budget: usize) -> BudgetResult {
        apply_budget(&self.tokenizer, candidates, budget)
    }
}
