//! Free-text salary parsing.
//!
//! Posting sites publish compensation in every shape imaginable:
//! `"$120k-$150k"`, `"€6,100–€7,900/month"`, `"45.000 - 55.000 EUR"`,
//! `"£18.50 per hour"`, or simply `"competitive"`. This module turns one such
//! string into a [`SalaryObservation`], or `None` when there is no usable
//! figure. Parsing never fails: malformed text is just unparseable.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::config::SalaryPolicy;
use crate::models::{Currency, SalaryObservation, SalaryPeriod};

/// Multiplier applied to `k`-notation figures.
pub const K_NOTATION_MULTIPLIER: i64 = 1000;

/// Digit runs longer than this are identifiers, not amounts.
const MAX_AMOUNT_DIGITS: usize = 15;

const MONTHLY_KEYWORDS: [&str; 2] = ["/mo", "month"];
const HOURLY_KEYWORDS: [&str; 2] = ["/hr", "hour"];
const YEARLY_KEYWORDS: [&str; 5] = ["/yr", "year", "annual", "annum", "p.a."];

const US_LOCATION_MARKERS: [&str; 10] = [
    "united states",
    "new york",
    "san francisco",
    "seattle",
    "austin",
    "boston",
    "chicago",
    "los angeles",
    "denver",
    "washington, dc",
];
const UK_LOCATION_MARKERS: [&str; 7] = [
    "united kingdom",
    "england",
    "scotland",
    "wales",
    "london",
    "manchester",
    "edinburgh",
];

#[derive(Debug, Clone, Copy, PartialEq)]
struct Amount {
    value: Decimal,
    k_suffix: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Amount(Amount),
    Currency(Currency),
    Connector,
    Other,
}

/// Parses a salary string with the default policy and no location hint.
///
/// # Examples
///
/// ```
/// use market_intel::calculation::parse_salary;
/// use market_intel::models::{Currency, SalaryPeriod};
/// use rust_decimal::Decimal;
///
/// let obs = parse_salary("$120k-$150k").unwrap();
/// assert_eq!(obs.currency, Currency::Usd);
/// assert_eq!(obs.period, SalaryPeriod::Yearly);
/// assert_eq!(obs.min_amount, Decimal::from(120_000));
/// assert_eq!(obs.max_amount, Decimal::from(150_000));
///
/// assert!(parse_salary("competitive salary").is_none());
/// ```
pub fn parse_salary(text: &str) -> Option<SalaryObservation> {
    parse_salary_in(text, None, &SalaryPolicy::default())
}

/// Parses a salary string.
///
/// # Arguments
///
/// * `text` - The free-text compensation string
/// * `location_hint` - The posting location, used for the currency when the
///   text carries no symbol or code
/// * `policy` - Supplies the k-notation threshold
///
/// # Returns
///
/// `None` for empty text or text without a positive numeric token. A range
/// (`a - b`, `a to b`) is preferred over a single figure; the first candidate
/// in the text with two positive bounds wins.
pub fn parse_salary_in(
    text: &str,
    location_hint: Option<&str>,
    policy: &SalaryPolicy,
) -> Option<SalaryObservation> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }

    let tokens = tokenize(trimmed);

    let has_k_suffix = tokens
        .iter()
        .any(|t| matches!(t, Token::Amount(a) if a.k_suffix));
    let scale = |amount: Amount| {
        if has_k_suffix && amount.value < policy.k_notation_threshold {
            amount.value * Decimal::from(K_NOTATION_MULTIPLIER)
        } else {
            amount.value
        }
    };

    let currency = tokens
        .iter()
        .find_map(|t| match t {
            Token::Currency(c) => Some(*c),
            _ => None,
        })
        .or_else(|| location_hint.and_then(currency_for_location))
        .unwrap_or_default();
    let period = detect_period(trimmed);

    find_ranges(&tokens)
        .into_iter()
        .chain(find_singles(&tokens))
        .find_map(|(low, high)| {
            SalaryObservation::new(scale(low), scale(high), currency, period, text)
        })
}

/// Infers a currency from a location string.
///
/// Returns `None` when the location names neither the US nor the UK; the
/// caller falls back to EUR.
pub fn currency_for_location(location: &str) -> Option<Currency> {
    let lower = location.to_lowercase();
    let words: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();

    if words.iter().any(|w| *w == "us" || *w == "usa")
        || US_LOCATION_MARKERS.iter().any(|m| lower.contains(m))
    {
        return Some(Currency::Usd);
    }
    if words.iter().any(|w| *w == "uk" || *w == "gb")
        || UK_LOCATION_MARKERS.iter().any(|m| lower.contains(m))
    {
        return Some(Currency::Gbp);
    }
    None
}

/// Detects the salary period; the keyword appearing first in the text wins.
fn detect_period(text: &str) -> SalaryPeriod {
    let lower = text.to_lowercase();
    let earliest = |keywords: &[&str]| keywords.iter().filter_map(|k| lower.find(k)).min();

    [
        (earliest(&MONTHLY_KEYWORDS), SalaryPeriod::Monthly),
        (earliest(&HOURLY_KEYWORDS), SalaryPeriod::Hourly),
        (earliest(&YEARLY_KEYWORDS), SalaryPeriod::Yearly),
    ]
    .into_iter()
    .filter_map(|(pos, period)| pos.map(|p| (p, period)))
    .min_by_key(|(pos, _)| *pos)
    .map(|(_, period)| period)
    .unwrap_or(SalaryPeriod::Yearly)
}

fn find_ranges(tokens: &[Token]) -> Vec<(Amount, Amount)> {
    // Currency markers sit between figures ("$120k - $150k") without breaking a range.
    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Currency(_)))
        .collect();

    significant
        .windows(3)
        .filter_map(|w| match (w[0], w[1], w[2]) {
            (Token::Amount(a), Token::Connector, Token::Amount(b)) => Some((*a, *b)),
            _ => None,
        })
        .collect()
}

fn find_singles(tokens: &[Token]) -> impl Iterator<Item = (Amount, Amount)> + '_ {
    tokens.iter().filter_map(|t| match t {
        Token::Amount(a) => Some((*a, *a)),
        _ => None,
    })
}

fn tokenize(text: &str) -> Vec<Token> {
    let chars: Vec<char> = text.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c.is_whitespace() {
            i += 1;
        } else if c.is_ascii_digit() {
            let mut raw = String::new();
            let mut group_len = 0;
            while i < chars.len() {
                let ch = chars[i];
                if ch.is_ascii_digit() {
                    raw.push(ch);
                    group_len += 1;
                } else if ch == ',' || ch == '.' {
                    raw.push(ch);
                    group_len = 0;
                } else if is_thousands_space(&chars, i, group_len) {
                    raw.push(',');
                    group_len = 0;
                } else {
                    break;
                }
                i += 1;
            }
            // Trailing separators belong to the sentence, not the number.
            let digits_end = raw.trim_end_matches([',', '.']).len();
            let ends_in_digit = digits_end == raw.len();
            raw.truncate(digits_end);

            let mut k_suffix = false;
            if ends_in_digit
                && i < chars.len()
                && (chars[i] == 'k' || chars[i] == 'K')
                && !chars.get(i + 1).is_some_and(|n| n.is_alphabetic())
            {
                k_suffix = true;
                i += 1;
            }

            let is_percentage = ends_in_digit && chars.get(i) == Some(&'%');
            match parse_number(&raw) {
                Some(value) if !is_percentage => {
                    tokens.push(Token::Amount(Amount { value, k_suffix }))
                }
                _ => tokens.push(Token::Other),
            }
        } else if c.is_alphabetic() {
            let start = i;
            while i < chars.len() && chars[i].is_alphabetic() {
                i += 1;
            }
            let word: String = chars[start..i].iter().collect::<String>().to_lowercase();
            tokens.push(match word.as_str() {
                "to" => Token::Connector,
                "usd" => Token::Currency(Currency::Usd),
                "eur" => Token::Currency(Currency::Eur),
                "gbp" => Token::Currency(Currency::Gbp),
                _ => Token::Other,
            });
        } else {
            tokens.push(match c {
                '-' | '–' | '—' => Token::Connector,
                '$' => Token::Currency(Currency::Usd),
                '€' => Token::Currency(Currency::Eur),
                '£' => Token::Currency(Currency::Gbp),
                _ => Token::Other,
            });
            i += 1;
        }
    }

    tokens
}

/// True when the space at `i` groups thousands, as in `"120 000"`: it follows
/// a group of one to three digits and precedes exactly three digits.
fn is_thousands_space(chars: &[char], i: usize, group_len: usize) -> bool {
    matches!(chars[i], ' ' | '\u{a0}' | '\u{202f}')
        && (1..=3).contains(&group_len)
        && chars
            .get(i + 1..i + 4)
            .is_some_and(|group| group.iter().all(char::is_ascii_digit))
        && !chars.get(i + 4).is_some_and(char::is_ascii_digit)
}

/// Parses a digit run with `,` / `.` separators.
///
/// A separator followed by exactly three digits groups thousands; a trailing
/// one- or two-digit group is a decimal fraction. Anything else is malformed.
fn parse_number(raw: &str) -> Option<Decimal> {
    let groups: Vec<&str> = raw.split([',', '.']).collect();
    if groups.iter().any(|g| g.is_empty()) {
        return None;
    }

    let normalized = match groups.as_slice() {
        [whole] => whole.to_string(),
        [first, rest @ ..] => {
            let (last, middle) = rest.split_last()?;
            if middle.iter().any(|g| g.len() != 3) {
                return None;
            }
            match last.len() {
                3 if first.len() <= 3 => format!("{}{}{}", first, middle.concat(), last),
                1 | 2 => format!("{}{}.{}", first, middle.concat(), last),
                _ => return None,
            }
        }
        [] => return None,
    };

    let digit_count = normalized.chars().filter(|c| c.is_ascii_digit()).count();
    if digit_count > MAX_AMOUNT_DIGITS {
        return None;
    }

    Decimal::from_str(&normalized).ok()
}
