// src/matching/similarity.rs - Set and string similarity metrics

use std::collections::{HashMap, HashSet};

use crate::matching::name::{abbrev_input, acronym_of_words};

/// Default character-ratio threshold for two tokens to count as one.
pub const SOFT_TOKEN_THRESHOLD: f64 = 0.88;

/// Right-hand strings at least this long have their most frequent
/// characters pruned from match seeding.
const AUTOJUNK_MIN_LEN: usize = 200;

/// Positions of each character of `b`. For long `b`, characters occurring
/// more than 1% of the time (plus one) are left out.
fn char_positions(b: &[char]) -> HashMap<char, Vec<usize>> {
    let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
    for (j, c) in b.iter().enumerate() {
        b2j.entry(*c).or_default().push(j);
    }
    if b.len() >= AUTOJUNK_MIN_LEN {
        let popular_above = b.len() / 100 + 1;
        b2j.retain(|_, positions| positions.len() <= popular_above);
    }
    b2j
}

/// Longest common block of `a[alo..ahi]` and `b[blo..bhi]` as (i, j, size).
/// Earliest block in `a` wins ties, then earliest in `b`. The block is seeded
/// from `b2j` and then grown over equal neighbours, pruned ones included.
fn longest_match(
    a: &[char],
    b: &[char],
    b2j: &HashMap<char, Vec<usize>>,
    alo: usize,
    ahi: usize,
    blo: usize,
    bhi: usize,
) -> (usize, usize, usize) {
    let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);
    let mut j2len: HashMap<usize, usize> = HashMap::new();
    for i in alo..ahi {
        let mut next_j2len = HashMap::new();
        if let Some(positions) = b2j.get(&a[i]) {
            for &j in positions {
                if j < blo {
                    continue;
                }
                if j >= bhi {
                    break;
                }
                let run = match j.checked_sub(1) {
                    Some(prev) => j2len.get(&prev).copied().unwrap_or(0),
                    None => 0,
                };
                let k = run + 1;
                next_j2len.insert(j, k);
                if k > best_size {
                    best_i = i + 1 - k;
                    best_j = j + 1 - k;
                    best_size = k;
                }
            }
        }
        j2len = next_j2len;
    }
    while best_i > alo && best_j > blo && a[best_i - 1] == b[best_j - 1] {
        best_i -= 1;
        best_j -= 1;
        best_size += 1;
    }
    while best_i + best_size < ahi && best_j + best_size < bhi && a[best_i + best_size] == b[best_j + best_size] {
        best_size += 1;
    }
    (best_i, best_j, best_size)
}

/// Ratcliff/Obershelp ratio: twice the characters in recursively found
/// matching blocks over the total length. Two empty strings are identical.
/// Not symmetric once `b` is long enough for popular-character pruning.
pub fn sequence_ratio(a: &str, b: &str) -> f64 {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let total = a.len() + b.len();
    if total == 0 {
        return 1.0;
    }

    let b2j = char_positions(&b);

    let mut matched = 0;
    let mut pending = vec![(0, a.len(), 0, b.len())];
    while let Some((alo, ahi, blo, bhi)) = pending.pop() {
        let (i, j, k) = longest_match(&a, &b, &b2j, alo, ahi, blo, bhi);
        if k == 0 {
            continue;
        }
        matched += k;
        if alo < i && blo < j {
            pending.push((alo, i, blo, j));
        }
        if i + k < ahi && j + k < bhi {
            pending.push((i + k, ahi, j + k, bhi));
        }
    }
    2.0 * matched as f64 / total as f64
}

/// Character-sequence similarity of two strings, case-insensitive, trimmed.
/// Zero when either side is empty.
pub fn fuzzy_ratio(a: &str, b: &str) -> f64 {
    let a = a.trim().to_lowercase();
    let b = b.trim().to_lowercase();
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    sequence_ratio(&a, &b)
}

pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    intersection as f64 / union.max(1) as f64
}

/// Number of tokens of `a` that appear in `b`, either verbatim or as a token
/// whose character ratio reaches `threshold`.
pub fn soft_token_overlap(a: &HashSet<String>, b: &HashSet<String>, threshold: f64) -> usize {
    if a.is_empty() || b.is_empty() {
        return 0;
    }
    a.iter()
        .filter(|token| {
            if b.contains(*token) {
                return true;
            }
            let mut best: f64 = 0.0;
            for other in b {
                best = best.max(sequence_ratio(token, other));
                if best >= threshold {
                    break;
                }
            }
            best >= threshold
        })
        .count()
}

/// Jaccard over soft-matched tokens.
pub fn soft_jaccard(a: &HashSet<String>, b: &HashSet<String>, threshold: f64) -> f64 {
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let intersection = soft_token_overlap(a, b, threshold);
    let union = (a.len() + b.len()).saturating_sub(intersection);
    intersection as f64 / union.max(1) as f64
}

/// 1.0 when the input name is written as the acronym of the listing name
/// ("BPD" vs "Bank Pembangunan Daerah").
pub fn abbreviation_match(input_name: &str, candidate_name: &str) -> f64 {
    let abbreviation = abbrev_input(input_name);
    let acronym = acronym_of_words(candidate_name);
    if !abbreviation.is_empty() && !acronym.is_empty() && abbreviation == acronym {
        1.0
    } else {
        0.0
    }
}
