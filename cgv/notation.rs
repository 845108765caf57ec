//! Combinatorial game notation (CGN).
//!
//! Games travel as text in two forms. The *expanded* form is the canonical
//! parse target and uses only the four structural characters `{`, `|`, `,`,
//! and `}`: a game is `{L1,L2,...|R1,R2,...}` where every option is itself an
//! expanded game. The *compressed* form additionally allows shorthand tokens
//! for common values: signed integers, `*` (star), `*n` (star with
//! multiplicity), `^` (up), `v` (down), the compounds `^*`/`v*`, and the word
//! aliases `zero`, `star`, `up`, `down`.
//!
//! [`expand`] rewrites every shorthand to its bracket definition and
//! validates the result; [`compress`] is the inverse substitution table,
//! applied to expanded text whose options are sorted the way
//! [`Game::expanded`](crate::game::Game::expanded) sorts them.

use std::fmt::{self, Display, Write};

/// Error raised when a string cannot be decoded as game notation.
///
/// Covers empty input, unbalanced brackets, and characters that survive
/// shorthand expansion; the offending fragment is carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidNotation {
    residue: String,
}

impl InvalidNotation {
    pub(crate) fn new(residue: impl Into<String>) -> InvalidNotation {
        InvalidNotation {
            residue: residue.into(),
        }
    }

    /// The fragment that failed to decode
    pub fn residue(&self) -> &str {
        &self.residue
    }
}

impl Display for InvalidNotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "invalid game notation, parts are not expanded: '{}'",
            self.residue
        )
    }
}

impl std::error::Error for InvalidNotation {}

/// Expand every `*` and `*n` token to its bracket definition.
///
/// `*n` becomes `{0,*1,...,*(n-1)|0,*1,...,*(n-1)}`; the freshly introduced
/// smaller stars are expanded by later rounds of the same loop. A `*` with no
/// multiplicity means `*1`, and the degenerate `*0` collapses to `{0|0}`.
fn expand_stars(mut cgn: String) -> String {
    while let Some(star) = cgn.find('*') {
        let digits_start = star + 1;
        let digits_end = cgn[digits_start..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(cgn.len(), |offset| digits_start + offset);

        let digits = &cgn[digits_start..digits_end];
        let multiplicity: u32 = if digits.is_empty() {
            1
        } else {
            match digits.parse() {
                Ok(multiplicity) => multiplicity,
                // Unrepresentable multiplicity, leave the token for validation
                Err(_) => break,
            }
        };

        let mut options = String::from("0");
        for i in 1..multiplicity {
            let _ = write!(options, ",*{}", i);
        }
        cgn.replace_range(star..digits_end, &format!("{{{options}|{options}}}"));
    }
    cgn
}

/// Expand every signed integer token to nested one-sided brackets.
///
/// `0` is `{|}`; positive `k` wraps `k` times on the Left (`{{|}|}` is `1`),
/// negative `k` mirrors on the Right.
fn expand_integers(mut cgn: String) -> String {
    loop {
        let Some(first_digit) = cgn.find(|c: char| c.is_ascii_digit()) else {
            break;
        };
        let start = if first_digit > 0 && cgn.as_bytes()[first_digit - 1] == b'-' {
            first_digit - 1
        } else {
            first_digit
        };
        let end = cgn[first_digit..]
            .find(|c: char| !c.is_ascii_digit())
            .map_or(cgn.len(), |offset| first_digit + offset);

        let Ok(value) = cgn[start..end].parse::<i64>() else {
            break;
        };

        let mut expanded = String::from("{|}");
        for _ in 0..value.unsigned_abs() {
            expanded = if value >= 0 {
                format!("{{{expanded}|}}")
            } else {
                format!("{{|{expanded}}}")
            };
        }
        cgn.replace_range(start..end, &expanded);
    }
    cgn
}

/// Expand a compressed notation string, replacing every known shorthand by
/// its bracket definition.
///
/// The rewrite order matters: word aliases first, then the star compounds
/// `v*`/`^*` (before the bare arrows would eat their first character), then
/// `v`/`^`, then star multiplicities, then integers. Expansion is idempotent
/// on already-expanded text.
///
/// # Errors
/// [`InvalidNotation`] when anything outside `{`, `|`, `,`, `}` survives the
/// rewrites, the bracket counts disagree, or the input is empty.
pub fn expand(cgn: &str) -> Result<String, InvalidNotation> {
    let mut expanded = cgn.replace("up", "^");
    expanded = expanded.replace("down", "v");
    expanded = expanded.replace("star", "*");
    expanded = expanded.replace("zero", "0");

    expanded = expanded.replace("v*", "{0|0,*}");
    expanded = expanded.replace("^*", "{0,*|0}");

    expanded = expanded.replace('v', "{*|0}");
    expanded = expanded.replace('^', "{0|*}");

    expanded = expand_stars(expanded);
    expanded = expand_integers(expanded);

    if is_valid_expanded(&expanded) {
        Ok(expanded)
    } else {
        Err(InvalidNotation::new(expanded))
    }
}

/// Compress an expanded notation string, replacing known games by their
/// shorthand tokens.
///
/// A single chained substitution pass; each pattern is phrased in terms of
/// the outputs of the earlier substitutions (`{0|0}` only exists once `{|}`
/// has become `0`), so no fixed point is needed. Options are assumed sorted
/// as [`Game::expanded`](crate::game::Game::expanded) sorts them; unsorted
/// sides compress less, never incorrectly.
pub fn compress(cgn: &str) -> String {
    let mut compressed = cgn.replace("{|}", "0");

    compressed = compressed.replace("{0|0}", "*");
    compressed = compressed.replace("{*,0|*,0}", "*2");
    compressed = compressed.replace("{*2,*,0|*2,*,0}", "*3");

    compressed = compressed.replace("{0|*}", "^");
    compressed = compressed.replace("{*|0}", "v");

    compressed = compressed.replace("{*,0|0}", "^*");
    compressed = compressed.replace("{0|*,0}", "v*");

    compressed = compressed.replace("{0|}", "1");
    compressed = compressed.replace("{|0}", "-1");
    compressed
}

/// Check whether a string is valid expanded notation: non-empty, only the
/// four structural characters, and as many `{` as `|` as `}`.
pub fn is_valid_expanded(cgn: &str) -> bool {
    if cgn.is_empty() {
        return false;
    }

    let mut opens: usize = 0;
    let mut bars: usize = 0;
    let mut closes: usize = 0;
    for c in cgn.chars() {
        match c {
            '{' => opens += 1,
            '|' => bars += 1,
            '}' => closes += 1,
            ',' => {}
            _ => return false,
        }
    }
    opens == bars && bars == closes
}
