//! Token estimation without a tokenizer model.
//!
//! [`estimate_tokens`] approximates what a BPE tokenizer would charge for
//! a piece of English/code-like text, using only character-class runs —
//! no vocabulary download, no lookup tables, deterministic output. The
//! model: text splits into runs of letters, digits, whitespace and
//! punctuation; each run costs a number of tokens proportional to its
//! length, with per-class divisors reflecting how aggressively BPE merges
//! that class (letters merge into long subwords, digits rarely merge past
//! a few characters, single spaces merge into the following word). Every
//! non-ASCII scalar is charged one token.

/// Character classes that drive the run model.
#[derive(Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Letter,
    Digit,
    Whitespace,
    Punct,
}

fn classify(c: char) -> CharClass {
    if c.is_ascii_alphabetic() {
        CharClass::Letter
    } else if c.is_ascii_digit() {
        CharClass::Digit
    } else if c.is_ascii_whitespace() {
        CharClass::Whitespace
    } else {
        CharClass::Punct
    }
}

/// Tokens charged for one run of same-class characters.
fn run_tokens(class: CharClass, len: usize) -> usize {
    match class {
        // Common words merge to one token up to roughly five letters.
        CharClass::Letter => len.div_ceil(5),
        // Digits merge about three per token in current vocabularies.
        CharClass::Digit => len.div_ceil(3),
        // Short whitespace merges into neighboring tokens; only long
        // runs (indentation blocks) cost anything.
        CharClass::Whitespace => len / 4,
        // Punctuation clusters like `":` or `},` usually merge.
        CharClass::Punct => len.div_ceil(3),
    }
}

/// Estimate the token count of a text.
///
/// # Examples
///
/// ```rust
/// use llm_fmt::tokens::estimate_tokens;
///
/// let compact = estimate_tokens(r#"{"id":1}"#);
/// let pretty = estimate_tokens("{\n  \"id\": 1\n}");
/// assert!(compact <= pretty);
/// ```
#[must_use]
pub fn estimate_tokens(text: &str) -> usize {
    let mut total = 0usize;
    let mut run_class: Option<CharClass> = None;
    let mut run_len = 0usize;

    for c in text.chars() {
        if !c.is_ascii() {
            if let Some(class) = run_class.take() {
                total += run_tokens(class, run_len);
                run_len = 0;
            }
            total += 1;
            continue;
        }
        let class = classify(c);
        match run_class {
            Some(current) if current == class => run_len += 1,
            Some(current) => {
                total += run_tokens(current, run_len);
                run_class = Some(class);
                run_len = 1;
            }
            None => {
                run_class = Some(class);
                run_len = 1;
            }
        }
    }
    if let Some(class) = run_class {
        total += run_tokens(class, run_len);
    }

    if total == 0 && !text.is_empty() {
        1
    } else {
        total
    }
}

/// Relative token savings of `converted` over `original`, as a
/// percentage. Negative when the conversion costs more.
#[must_use]
pub fn savings_percent(original: usize, converted: usize) -> f64 {
    if original == 0 {
        return 0.0;
    }
    (original as f64 - converted as f64) / original as f64 * 100.0
}
