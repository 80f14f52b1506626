use serde::{Deserialize, Serialize};

use crate::selection::ranking::TokenCounter;
use crate::types::PayloadEntry;

/// A candidate for budgeted inclusion, in caller priority order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BudgetCandidate {
    pub key: String,
    pub content: String,
}

impl BudgetCandidate {
    pub fn new(key: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TruncationNote {
    pub key: String,
    /// Last line kept.
    pub line: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetResult {
    pub included: Vec<PayloadEntry>,
    pub budget: usize,
    /// Estimated tokens of included content, truncation markers excluded.
    pub tokens_used: usize,
    pub truncated: Option<TruncationNote>,
    pub excluded: Vec<String>,
}

pub fn truncation_marker(line: usize) -> String {
    format!("[... TRUNCATED at line {line} ...]")
}

/// Include candidates whole while they fit; truncate the first one that
/// overflows at a line boundary; drop everything after it.
pub fn apply_budget<T: TokenCounter>(
    counter: &T,
    candidates: Vec<BudgetCandidate>,
    budget: usize,
) -> BudgetResult {
    let mut included = Vec::new();
    let mut excluded = Vec::new();
    let mut tokens_used = 0;
    let mut truncated = None;
    let mut exhausted = false;

    for candidate in candidates {
        if exhausted {
            excluded.push(candidate.key);
            continue;
        }

        let tokens = counter.count_tokens(&candidate.content);
        if tokens_used + tokens <= budget {
            tokens_used += tokens;
            included.push(PayloadEntry::new(candidate.key, candidate.content));
            continue;
        }

        exhausted = true;
        let allowance = counter.chars_for_tokens(budget - tokens_used);
        match truncate_at_line(&candidate.content, allowance) {
            Some((kept, line)) => {
                tokens_used += counter.count_tokens(kept);
                let content = format!("{kept}\n{}", truncation_marker(line));
                truncated = Some(TruncationNote {
                    key: candidate.key.clone(),
                    line,
                });
                included.push(PayloadEntry::new(candidate.key, content));
            }
            None => excluded.push(candidate.key),
        }
    }

    debug_assert!(tokens_used <= budget, "tokens_used {tokens_used} exceeds budget {budget}");

    if !excluded.is_empty() {
        tracing::debug!(budget, excluded = excluded.len(), "Candidates dropped by token budget");
    }

    BudgetResult {
        included,
        budget,
        tokens_used,
        truncated,
        excluded,
    }
}

/// Longest prefix of at most `allowance` bytes that ends at a line break,
/// without the break, plus its line count. `None` if not even one full line
/// fits.
pub fn truncate_at_line(content: &str, allowance: usize) -> Option<(&str, usize)> {
    let mut end = allowance.min(content.len());
    while !content.is_char_boundary(end) {
        end -= 1;
    }

    let cut = content[..end].rfind('\n')?;
    let kept = &content[..cut];
    if kept.is_empty() {
        return None;
    }

    let lines = kept.matches('\n').count() + 1;
    Some((kept, lines))
}
