//! String similarity metrics on a 0-100 scale.
//!
//! All metrics are built on the Indel distance (insertions and deletions
//! only), which is derived from the longest common subsequence. The LCS is
//! computed bit-parallel: each machine word tracks 64 pattern positions, so a
//! comparison costs `O(n * ceil(m / 64))` instead of the `O(n * m)` of the
//! textbook dynamic program (Hyyrö's LCS recurrence). The metrics compare
//! bytes exactly; [`Processor`] normalizes text before ranking.

use std::borrow::Cow;
use std::cmp::Ordering;

/// Match-position bitmasks for a fixed pattern, reusable across many texts.
#[derive(Debug, Clone)]
pub struct PatternMask {
    len: usize,
    words: usize,
    masks: Vec<u64>,
}

impl PatternMask {
    pub fn new(pattern: &[u8]) -> Self {
        let words = pattern.len().div_ceil(64).max(1);
        let mut masks = vec![0u64; 256 * words];
        for (i, &byte) in pattern.iter().enumerate() {
            masks[byte as usize * words + i / 64] |= 1u64 << (i % 64);
        }
        Self {
            len: pattern.len(),
            words,
            masks,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Length of the longest common subsequence of the pattern and `text`.
    pub fn lcs(&self, text: &[u8]) -> usize {
        if self.len == 0 || text.is_empty() {
            return 0;
        }

        let mut state = vec![u64::MAX; self.words];
        for &byte in text {
            let offset = byte as usize * self.words;
            let matches = &self.masks[offset..offset + self.words];
            let mut carry = 0u64;
            for (word, &m) in state.iter_mut().zip(matches) {
                let u = *word & m;
                let (sum, c1) = word.overflowing_add(u);
                let (sum, c2) = sum.overflowing_add(carry);
                carry = (c1 | c2) as u64;
                *word = sum | (*word - u);
            }
        }

        // Each zero bit inside the pattern length is one LCS position.
        let tail_bits = self.len % 64;
        state
            .iter()
            .enumerate()
            .map(|(i, word)| {
                let mask = if i == self.words - 1 && tail_bits != 0 {
                    (1u64 << tail_bits) - 1
                } else {
                    u64::MAX
                };
                (!word & mask).count_ones() as usize
            })
            .sum()
    }
}

/// A string prepared once and then compared against many others.
#[derive(Debug, Clone)]
pub struct Prepared {
    bytes: Vec<u8>,
    mask: PatternMask,
}

impl Prepared {
    pub fn new(text: &str) -> Self {
        Self {
            bytes: text.as_bytes().to_vec(),
            mask: PatternMask::new(text.as_bytes()),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    fn ratio(&self, text: &[u8]) -> f64 {
        ratio_from_lcs(self.mask.lcs(text), self.len(), text.len())
    }

    fn partial_ratio(&self, text: &[u8]) -> f64 {
        if self.is_empty() || text.is_empty() {
            return 0.0;
        }
        if self.len() <= text.len() {
            partial_windows(&self.mask, &self.bytes, text)
        } else {
            partial_windows(&PatternMask::new(text), text, &self.bytes)
        }
    }
}

/// Text normalization applied to the query and every candidate before
/// fuzzy scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Processor {
    /// Lowercase, turn every non-alphanumeric character into a space, trim.
    #[default]
    Normalize,
    /// Compare the text as given.
    Raw,
}

impl Processor {
    pub fn apply<'a>(&self, text: &'a str) -> Cow<'a, str> {
        match self {
            Processor::Normalize => Cow::Owned(default_process(text)),
            Processor::Raw => Cow::Borrowed(text),
        }
    }
}

/// `PayPal-Login.com` becomes `paypal login com`.
pub fn default_process(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        if c.is_alphanumeric() {
            out.extend(c.to_lowercase());
        } else {
            out.push(' ');
        }
    }
    let trimmed = out.trim();
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_string()
    }
}

/// A search query with the variants the scorers need, built once per query.
#[derive(Debug, Clone)]
pub struct Query {
    raw: Prepared,
    // Token-sorted form, only kept when it differs from the raw text
    sorted: Option<Prepared>,
    tokens: Vec<String>,
}

impl Query {
    pub fn new(text: &str) -> Self {
        let sorted = match sort_tokens(text) {
            Cow::Borrowed(_) => None,
            Cow::Owned(s) => Some(Prepared::new(&s)),
        };
        Self {
            raw: Prepared::new(text),
            sorted,
            tokens: token_set(text).into_iter().map(String::from).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn sorted(&self) -> &Prepared {
        self.sorted.as_ref().unwrap_or(&self.raw)
    }
}

fn ratio_from_lcs(lcs: usize, len1: usize, len2: usize) -> f64 {
    let total = len1 + len2;
    if len1 == 0 || len2 == 0 {
        return 0.0;
    }
    200.0 * lcs as f64 / total as f64
}

/// Best ratio of `needle` against windows of `haystack`: every full-length
/// window plus the shorter windows hanging off either end.
fn partial_windows(needle_mask: &PatternMask, needle: &[u8], haystack: &[u8]) -> f64 {
    let len1 = needle.len();
    let len2 = haystack.len();
    let mut in_needle = [false; 256];
    for &b in needle {
        in_needle[b as usize] = true;
    }

    let mut best = 0.0f64;
    let mut consider = |window: &[u8]| -> bool {
        let score = ratio_from_lcs(needle_mask.lcs(window), len1, window.len());
        if score > best {
            best = score;
        }
        best >= 100.0
    };

    for end in 1..len1 {
        if in_needle[haystack[end - 1] as usize] && consider(&haystack[..end]) {
            return 100.0;
        }
    }
    for start in 0..=(len2 - len1) {
        if in_needle[haystack[start + len1 - 1] as usize]
            && consider(&haystack[start..start + len1])
        {
            return 100.0;
        }
    }
    for start in (len2 - len1 + 1)..len2 {
        if in_needle[haystack[start] as usize] && consider(&haystack[start..]) {
            return 100.0;
        }
    }

    best
}

/// Whitespace tokens sorted and joined by single spaces. Borrowed when the
/// result would be identical to the input.
fn sort_tokens(text: &str) -> Cow<'_, str> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    if tokens.len() == 1 && tokens[0].len() == text.len() {
        return Cow::Borrowed(text);
    }
    tokens.sort_unstable();
    let joined = tokens.join(" ");
    if joined == text {
        Cow::Borrowed(text)
    } else {
        Cow::Owned(joined)
    }
}

/// Sorted, deduplicated whitespace tokens.
fn token_set(text: &str) -> Vec<&str> {
    let mut tokens: Vec<&str> = text.split_whitespace().collect();
    tokens.sort_unstable();
    tokens.dedup();
    tokens
}

/// Two token sets split into their intersection and both differences, each
/// still sorted.
struct TokenSplit<'a> {
    sect: Vec<&'a str>,
    diff_ab: Vec<&'a str>,
    diff_ba: Vec<&'a str>,
}

impl<'a> TokenSplit<'a> {
    fn new(a: &'a [String], b: &[&'a str]) -> Self {
        let mut split = TokenSplit {
            sect: Vec::new(),
            diff_ab: Vec::new(),
            diff_ba: Vec::new(),
        };
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].as_str().cmp(b[j]) {
                Ordering::Less => {
                    split.diff_ab.push(a[i].as_str());
                    i += 1;
                }
                Ordering::Greater => {
                    split.diff_ba.push(b[j]);
                    j += 1;
                }
                Ordering::Equal => {
                    split.sect.push(b[j]);
                    i += 1;
                    j += 1;
                }
            }
        }
        split.diff_ab.extend(a[i..].iter().map(String::as_str));
        split.diff_ba.extend_from_slice(&b[j..]);
        split
    }

    /// Best ratio among `sect`, `sect + diff_ab` and `sect + diff_ba`.
    fn ratio(&self) -> f64 {
        let no_tokens_a = self.sect.is_empty() && self.diff_ab.is_empty();
        let no_tokens_b = self.sect.is_empty() && self.diff_ba.is_empty();
        if no_tokens_a || no_tokens_b {
            return 0.0;
        }
        // one set contains the other
        if !self.sect.is_empty() && (self.diff_ab.is_empty() || self.diff_ba.is_empty()) {
            return 100.0;
        }

        let sect = self.sect.join(" ");
        let sect_ab = join_tokens(&sect, &self.diff_ab.join(" "));
        let sect_ba = join_tokens(&sect, &self.diff_ba.join(" "));
        ratio(&sect_ab, &sect_ba)
            .max(ratio(&sect, &sect_ab))
            .max(ratio(&sect, &sect_ba))
    }
}

fn join_tokens(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}

/// Normalized Indel similarity: `100 * (1 - indel / (len1 + len2))`.
pub fn ratio(a: &str, b: &str) -> f64 {
    Prepared::new(a).ratio(b.as_bytes())
}

/// Best [`ratio`] of the shorter string against any window of the longer.
pub fn partial_ratio(a: &str, b: &str) -> f64 {
    Prepared::new(a).partial_ratio(b.as_bytes())
}

/// [`ratio`] after sorting whitespace-separated tokens.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    Scorer::TokenSort.score(&Query::new(a), b)
}

/// Ratio over token sets: shared tokens count as a match regardless of
/// order or repetition.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    Scorer::TokenSet.score(&Query::new(a), b)
}

/// Blend of the other metrics weighted by how different the lengths are.
pub fn weighted_ratio(a: &str, b: &str) -> f64 {
    Scorer::Weighted.score(&Query::new(a), b)
}

const UNBASE_SCALE: f64 = 0.95;

// Any shared token is a full partial match
fn partial_token_ratio(query: &Query, sorted_candidate: &str, split: &TokenSplit<'_>) -> f64 {
    if !split.sect.is_empty() {
        return 100.0;
    }
    let sorted = query.sorted().partial_ratio(sorted_candidate.as_bytes());

    let diff_ab = split.diff_ab.join(" ");
    let diff_ba = split.diff_ba.join(" ");
    // without shared tokens the set forms only differ by duplicates
    if diff_ab.as_bytes() == query.sorted().bytes.as_slice() && diff_ba == sorted_candidate {
        return sorted;
    }
    sorted.max(partial_ratio(&diff_ab, &diff_ba))
}

/// Which metric ranks candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scorer {
    Ratio,
    Partial,
    TokenSort,
    TokenSet,
    #[default]
    Weighted,
}

impl Scorer {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "ratio" => Some(Scorer::Ratio),
            "partial" | "partial-ratio" => Some(Scorer::Partial),
            "token-sort" | "token_sort" => Some(Scorer::TokenSort),
            "token-set" | "token_set" => Some(Scorer::TokenSet),
            "weighted" | "wratio" => Some(Scorer::Weighted),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Scorer::Ratio => "ratio",
            Scorer::Partial => "partial",
            Scorer::TokenSort => "token-sort",
            Scorer::TokenSet => "token-set",
            Scorer::Weighted => "weighted",
        }
    }

    pub fn score(&self, query: &Query, candidate: &str) -> f64 {
        let text = candidate.as_bytes();
        if query.is_empty() || text.is_empty() {
            return 0.0;
        }

        match self {
            Scorer::Ratio => query.raw.ratio(text),
            Scorer::Partial => query.raw.partial_ratio(text),
            Scorer::TokenSort => query.sorted().ratio(sort_tokens(candidate).as_bytes()),
            Scorer::TokenSet => {
                let tokens = token_set(candidate);
                TokenSplit::new(&query.tokens, &tokens).ratio()
            }
            Scorer::Weighted => {
                let (short, long) = if query.len() <= text.len() {
                    (query.len(), text.len())
                } else {
                    (text.len(), query.len())
                };
                let len_ratio = long as f64 / short as f64;
                let sorted_candidate = sort_tokens(candidate);
                let tokens = token_set(candidate);
                let split = TokenSplit::new(&query.tokens, &tokens);

                let mut best = query.raw.ratio(text);
                if len_ratio < 1.5 {
                    let token = query
                        .sorted()
                        .ratio(sorted_candidate.as_bytes())
                        .max(split.ratio());
                    return best.max(token * UNBASE_SCALE);
                }

                let partial_scale = if len_ratio < 8.0 { 0.9 } else { 0.6 };
                best = best.max(query.raw.partial_ratio(text) * partial_scale);
                let token_partial = partial_token_ratio(query, &sorted_candidate, &split);
                best.max(token_partial * UNBASE_SCALE * partial_scale)
            }
        }
    }

    /// Scores a candidate unless it provably cannot reach `cutoff`.
    ///
    /// The length bound is checked before any distance work, so candidates
    /// with very different lengths are rejected in constant time.
    pub fn score_with_cutoff(&self, query: &Query, candidate: &str, cutoff: f64) -> Option<f64> {
        if cutoff > 0.0 && self.upper_bound(query.len(), candidate.len()) < cutoff {
            return None;
        }
        let score = self.score(query, candidate);
        (score >= cutoff).then_some(score)
    }

    fn upper_bound(&self, len1: usize, len2: usize) -> f64 {
        if len1 == 0 || len2 == 0 {
            return 0.0;
        }
        let short = len1.min(len2) as f64;
        let long = len1.max(len2) as f64;
        match self {
            Scorer::Ratio => 200.0 * short / (short + long),
            Scorer::Partial | Scorer::TokenSort | Scorer::TokenSet => 100.0,
            Scorer::Weighted => {
                let len_ratio = long / short;
                if len_ratio < 1.5 {
                    100.0
                } else if len_ratio < 8.0 {
                    90.0
                } else {
                    60.0
                }
            }
        }
    }
}
