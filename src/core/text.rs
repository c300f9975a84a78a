//! Text segmentation for bounded synthesis requests.
//!
//! The Azure TTS REST endpoint enforces a hard per-request character ceiling,
//! so longer texts are partitioned into segments before synthesis. Splits
//! happen at sentence and clause punctuation (full-width and half-width) so
//! each upstream request still reads naturally; only a run with no usable
//! punctuation at all is hard-chunked at the limit.
//!
//! Lengths are measured in characters, not bytes, since the upstream ceiling
//! is a character count.

/// Punctuation that ends a run: sentence/clause terminators plus newline,
/// covering both full-width and half-width variants.
const PUNCTUATION: &[char] = &[
    '。', '？', '?', '！', '!', '；', ';', '，', ',', '、', '：', ':', '\n',
];

/// Splits `text` into ordered segments of at most `max_length` characters.
///
/// Text at or under the limit is returned as a single segment. Otherwise the
/// text is tokenized into punctuation-terminated runs which are greedily
/// merged up to the limit; a single run longer than the limit is chunked into
/// fixed-size pieces.
///
/// Runs are trimmed of surrounding whitespace before merging. The output is
/// destined for speech synthesis, so boundary whitespace is not significant
/// and is not reintroduced.
pub fn split_text(text: &str, max_length: usize) -> Vec<String> {
    if text.chars().count() <= max_length {
        if text.is_empty() {
            return Vec::new();
        }
        return vec![text.to_string()];
    }
    let runs = split_by_punctuation(text);
    merge_runs(runs, max_length)
}

/// Tokenizes text into runs, each keeping its trailing punctuation.
///
/// Consecutive punctuation marks attach to the preceding run; a mark with no
/// preceding run starts a run of its own.
fn split_by_punctuation(text: &str) -> Vec<String> {
    let mut runs: Vec<String> = Vec::new();
    let mut current = String::new();

    for ch in text.chars() {
        if PUNCTUATION.contains(&ch) {
            if !current.is_empty() {
                current.push(ch);
                runs.push(std::mem::take(&mut current));
            } else if let Some(last) = runs.last_mut() {
                last.push(ch);
            } else {
                runs.push(ch.to_string());
            }
        } else {
            current.push(ch);
        }
    }

    if !current.is_empty() {
        runs.push(current);
    }

    runs
}

/// Greedily merges runs into segments of at most `max_length` characters.
fn merge_runs(runs: Vec<String>, max_length: usize) -> Vec<String> {
    let mut merged: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for run in runs {
        let run = run.trim();
        if run.is_empty() {
            continue;
        }
        let run_len = run.chars().count();

        if current_len + run_len <= max_length {
            current.push_str(run);
            current_len += run_len;
        } else {
            if !current.is_empty() {
                merged.push(std::mem::take(&mut current));
            }
            if run_len > max_length {
                merged.extend(chunk_text(run, max_length));
                current_len = 0;
            } else {
                current = run.to_string();
                current_len = run_len;
            }
        }
    }

    if !current.is_empty() {
        merged.push(current);
    }

    merged
}

/// Cuts a run with no usable punctuation into consecutive fixed-size pieces.
/// The final piece carries the remainder.
fn chunk_text(text: &str, max_length: usize) -> Vec<String> {
    let max_length = max_length.max(1);
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(max_length)
        .map(|piece| piece.iter().collect())
        .collect()
}
