/// Characters per estimated token.
pub const CHARS_PER_TOKEN: usize = 4;

pub trait TokenCounter {
    fn count_tokens(&self, content: &str) -> usize;

    /// Character allowance corresponding to `tokens`.
    fn chars_for_tokens(&self, tokens: usize) -> usize;
}

/// Approximate GPT-style tokenization
/// tokens(content) := ceil(len(content) / 4)
///
/// An estimate only; no tokenizer is matched exactly.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxTokenCounter;

impl TokenCounter for ApproxTokenCounter {
    fn count_tokens(&self, content: &str) -> usize {
        if content.is_empty() {
            0
        } else {
            (content.len() + CHARS_PER_TOKEN - 1) / CHARS_PER_TOKEN
        }
    }

    fn chars_for_tokens(&self, tokens: usize) -> usize {
        tokens.saturating_mul(CHARS_PER_TOKEN)
    }
}

pub fn estimate_tokens(text: &str) -> usize {
    ApproxTokenCounter.count_tokens(text)
}
