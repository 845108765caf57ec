//! Game trees and the operations on them.
//!
//! A [`Game`] is either the terminal game (no alternatives for either side)
//! or a node with two ordered lists of child games: the options of the Left
//! player and the options of the Right player. Equality and ordering between
//! games are *value* relations decided by the recursive zero-comparison
//! predicates, never by tree shape; two differently shaped trees can be the
//! same game value. [`Game::canonical_form`] reduces any game to the unique
//! simplest tree of its equivalence class.

use crate::{
    display,
    notation::{self, InvalidNotation},
    parsing::{Parser, try_option},
};
use auto_ops::impl_op_ex;
use itertools::Itertools;
use std::{
    cmp::Ordering,
    fmt::{self, Display, Write},
    str::FromStr,
};

/// Error raised when the integer value of a game that is not equal to any
/// integer is requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotAnInteger {
    game: String,
}

impl NotAnInteger {
    fn new(game: &Game) -> NotAnInteger {
        NotAnInteger {
            game: game.to_string(),
        }
    }

    /// Compressed notation of the offending game
    pub fn game(&self) -> &str {
        &self.game
    }
}

impl Display for NotAnInteger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "game '{}' is not an integer", self.game)
    }
}

impl std::error::Error for NotAnInteger {}

/// Outcome class of a game: who wins under optimal play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutcomeClass {
    /// Win for the second (previous) player
    P,

    /// Win for the first (next) player
    N,

    /// Win for Left no matter who moves first
    L,

    /// Win for Right no matter who moves first
    R,
}

impl Display for OutcomeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            OutcomeClass::P => 'P',
            OutcomeClass::N => 'N',
            OutcomeClass::L => 'L',
            OutcomeClass::R => 'R',
        };
        write!(f, "{}", letter)
    }
}

/// A short partizan game: a finite tree of Left and Right alternatives.
///
/// Every game exclusively owns its option subtrees; operations that combine
/// games always build fresh child nodes, so mutating one game can never
/// corrupt another.
#[derive(Debug, Clone)]
pub struct Game {
    left_options: Vec<Game>,
    right_options: Vec<Game>,
}

impl Game {
    /// The terminal game `{|}`, i.e. zero
    #[inline]
    pub const fn empty() -> Game {
        Game {
            left_options: vec![],
            right_options: vec![],
        }
    }

    /// Construct a game from its Left and Right options
    #[inline]
    pub const fn new(left_options: Vec<Game>, right_options: Vec<Game>) -> Game {
        Game {
            left_options,
            right_options,
        }
    }

    /// The game `* = {0|0}`
    pub fn star() -> Game {
        Game::new(vec![Game::empty()], vec![Game::empty()])
    }

    /// The integer game in canonical shape: `integer` nested one-sided
    /// brackets, Left-sided for positive values, Right-sided for negative
    pub fn new_integer(integer: i64) -> Game {
        let mut game = Game::empty();
        for _ in 0..integer.unsigned_abs() {
            game = if integer >= 0 {
                Game::new(vec![game], vec![])
            } else {
                Game::new(vec![], vec![game])
            };
        }
        game
    }

    /// Left player's options
    #[inline]
    pub fn left_options(&self) -> &[Game] {
        &self.left_options
    }

    /// Right player's options
    #[inline]
    pub fn right_options(&self) -> &[Game] {
        &self.right_options
    }

    /// Left player's options, mutably. Intended for position producers that
    /// assemble game trees move by move
    #[inline]
    pub fn left_options_mut(&mut self) -> &mut Vec<Game> {
        &mut self.left_options
    }

    /// Right player's options, mutably
    #[inline]
    pub fn right_options_mut(&mut self) -> &mut Vec<Game> {
        &mut self.right_options
    }

    /// Remove all options of both players in place, leaving the terminal game
    pub fn clear(&mut self) {
        self.left_options.clear();
        self.right_options.clear();
    }

    /// Parse a game from expanded notation, ie. the underlined part:
    ///
    /// `{a,b,...|c,d,...}`
    ///
    /// `^^^^^^^^^^^^^^^^^`
    ///
    /// Returns the final scan position together with the game, so callers
    /// can keep parsing after it. Use [`FromStr`] to decode a whole string,
    /// shorthands included.
    pub fn parse(p: Parser<'_>) -> Option<(Parser<'_>, Game)> {
        let p = try_option!(p.parse_ascii_char('{'));
        let (p, left_options) = try_option!(Game::parse_options(p));
        let p = try_option!(p.parse_ascii_char('|'));
        let (p, right_options) = try_option!(Game::parse_options(p));
        let p = try_option!(p.parse_ascii_char('}'));
        Some((p, Game::new(left_options, right_options)))
    }

    /// Parse a possibly empty comma-separated list of games
    fn parse_options(mut p: Parser<'_>) -> Option<(Parser<'_>, Vec<Game>)> {
        let mut acc = Vec::new();
        loop {
            match Game::parse(p) {
                Some((option_p, option)) => {
                    acc.push(option);
                    p = option_p;
                    match p.parse_ascii_char(',') {
                        Some(pp) => p = pp,
                        None => return Some((p, acc)),
                    }
                }
                None => return Some((p, acc)),
            }
        }
    }

    /// Render in fully expanded notation.
    ///
    /// Each side's options are sorted lexicographically by their own expanded
    /// rendering, so the rendering of a canonical form is a unique fingerprint
    /// of its game value.
    pub fn expanded(&self) -> String {
        let left = self
            .left_options
            .iter()
            .map(Game::expanded)
            .sorted()
            .collect::<Vec<_>>();
        let right = self
            .right_options
            .iter()
            .map(Game::expanded)
            .sorted()
            .collect::<Vec<_>>();

        let mut buf = String::new();
        display::braces(&mut buf, |w| {
            display::commas(w, &left)?;
            w.write_char('|')?;
            display::commas(w, &right)
        })
        .unwrap();
        buf
    }

    // Zero comparisons. For the terminal game all four are vacuously true,
    // making the terminal game exactly zero.

    /// Check if the game is `>= 0`, i.e. Right loses moving first.
    /// Holds iff no Right option is `<= 0`
    pub fn geq_zero(&self) -> bool {
        !self.right_options.iter().any(Game::leq_zero)
    }

    /// Check if the game is `<= 0`, i.e. Left loses moving first.
    /// Holds iff no Left option is `>= 0`
    pub fn leq_zero(&self) -> bool {
        !self.left_options.iter().any(Game::geq_zero)
    }

    /// Check if the game is `> 0` or confused with `0`, i.e. Left wins moving
    /// first. Holds iff some Left option is `>= 0`
    pub fn gin_zero(&self) -> bool {
        self.left_options.iter().any(Game::geq_zero)
    }

    /// Check if the game is `< 0` or confused with `0`, i.e. Right wins
    /// moving first. Holds iff some Right option is `<= 0`
    pub fn lin_zero(&self) -> bool {
        self.right_options.iter().any(Game::leq_zero)
    }

    /// Check if the game is `> 0`, i.e. a win for Left
    pub fn gtr_zero(&self) -> bool {
        self.geq_zero() && self.gin_zero()
    }

    /// Check if the game is `< 0`, i.e. a win for Right
    pub fn lss_zero(&self) -> bool {
        self.leq_zero() && self.lin_zero()
    }

    /// Check if the game is `= 0`, i.e. a win for the second player
    pub fn equal_zero(&self) -> bool {
        self.geq_zero() && self.leq_zero()
    }

    /// Check if the game is confused with `0`, i.e. a win for the first player
    pub fn incomparable_zero(&self) -> bool {
        self.gin_zero() && self.lin_zero()
    }

    // Pairwise comparisons, uniformly through the difference game.

    /// Check if `G >= H`, true when `G - H >= 0`
    pub fn geq(&self, other: &Game) -> bool {
        (self - other).geq_zero()
    }

    /// Check if `G <= H`, true when `G - H <= 0`
    pub fn leq(&self, other: &Game) -> bool {
        (self - other).leq_zero()
    }

    /// Check if `G > H` or `G` is confused with `H`
    pub fn gin(&self, other: &Game) -> bool {
        (self - other).gin_zero()
    }

    /// Check if `G < H` or `G` is confused with `H`
    pub fn lin(&self, other: &Game) -> bool {
        (self - other).lin_zero()
    }

    /// Check if `G > H`
    pub fn gtr(&self, other: &Game) -> bool {
        (self - other).gtr_zero()
    }

    /// Check if `G < H`
    pub fn lss(&self, other: &Game) -> bool {
        (self - other).lss_zero()
    }

    /// Check if `G` is confused with `H`
    pub fn incomparable(&self, other: &Game) -> bool {
        (self - other).incomparable_zero()
    }

    /// Get the outcome class of the game
    pub fn outcome_class(&self) -> OutcomeClass {
        if self.geq_zero() {
            if self.leq_zero() {
                OutcomeClass::P
            } else {
                OutcomeClass::L
            }
        } else if self.leq_zero() {
            OutcomeClass::R
        } else {
            OutcomeClass::N
        }
    }

    /// Construct the inverse: swap Left and Right roles in every subtree
    pub fn inverse(&self) -> Game {
        Game {
            left_options: self.right_options.iter().map(Game::inverse).collect(),
            right_options: self.left_options.iter().map(Game::inverse).collect(),
        }
    }

    /// Construct the sum of two games: a move in the sum is a move in exactly
    /// one summand. Alias of the `+` operator
    pub fn construct_sum(g: &Game, h: &Game) -> Game {
        let mut sum = Game::empty();
        for g_l in &g.left_options {
            sum.left_options.push(Game::construct_sum(g_l, h));
        }
        for h_l in &h.left_options {
            sum.left_options.push(Game::construct_sum(g, h_l));
        }
        for g_r in &g.right_options {
            sum.right_options.push(Game::construct_sum(g_r, h));
        }
        for h_r in &h.right_options {
            sum.right_options.push(Game::construct_sum(g, h_r));
        }
        sum
    }

    /// Compute the companion of the game.
    ///
    /// The companion is `*` when the game is a second-player win; otherwise
    /// it is the game of its options' companions, with an extra zero Left
    /// option when `G` is a win for Left, or an extra zero Right option when
    /// `G` is a win for Right.
    pub fn companion(&self) -> Game {
        let outcome = self.outcome_class();
        if outcome == OutcomeClass::P {
            return Game::star();
        }

        let mut companion = Game {
            left_options: self.left_options.iter().map(Game::companion).collect(),
            right_options: self.right_options.iter().map(Game::companion).collect(),
        };
        match outcome {
            OutcomeClass::L => companion.left_options.push(Game::empty()),
            OutcomeClass::R => companion.right_options.push(Game::empty()),
            OutcomeClass::P | OutcomeClass::N => {}
        }
        companion
    }

    /// All Left incentives `G^L - G`, in option order.
    ///
    /// See Siegel, p. 62, Definition 1.29.
    pub fn left_incentives(&self) -> Vec<Game> {
        self.left_options.iter().map(|g_l| g_l - self).collect()
    }

    /// All Right incentives `G - G^R`, in option order
    pub fn right_incentives(&self) -> Vec<Game> {
        self.right_options.iter().map(|g_r| self - g_r).collect()
    }

    /// Check if the game is equal to an integer.
    ///
    /// A game is *not* an integer exactly when it has both a Left and a Right
    /// incentive exceeding `-1`, hence the "or" below.
    ///
    /// See Siegel, p. 80, Theorem 3.27.
    pub fn is_integer(&self) -> bool {
        let minus_one = Game::new_integer(-1);
        !self
            .left_incentives()
            .iter()
            .any(|incentive| incentive.gtr(&minus_one))
            || !self
                .right_incentives()
                .iter()
                .any(|incentive| incentive.gtr(&minus_one))
    }

    /// Compute the game's integer value by stepping towards zero one unit at
    /// a time, re-canonicalizing after each step.
    ///
    /// # Errors
    /// [`NotAnInteger`] when the game is not equal to any integer.
    pub fn integer_value(&self) -> Result<i64, NotAnInteger> {
        if !self.is_integer() {
            return Err(NotAnInteger::new(self));
        }

        let mut value: i64 = 0;
        let mut rest = self.clone();
        if self.geq_zero() {
            while rest.gtr_zero() {
                rest = (rest + Game::new_integer(-1)).canonical_form();
                value += 1;
            }
        } else {
            while rest.lss_zero() {
                rest = (rest + Game::new_integer(1)).canonical_form();
                value -= 1;
            }
        }
        Ok(value)
    }

    /// Compute the Norton product of the game by `unit`.
    ///
    /// When `G` equals an integer `n` the product is `n` canonicalized copies
    /// of `unit` summed (negated for negative `n`). Otherwise it is
    /// `{G^L·U + U + D | G^R·U - U - D}` with `D` ranging over all Left and
    /// Right incentives of `U`.
    ///
    /// See Siegel, p. 150, Exercise 7.15.
    pub fn norton(&self, unit: &Game) -> Game {
        if let Ok(n) = self.integer_value() {
            let mut product = Game::empty();
            for _ in 0..n.unsigned_abs() {
                product = (product + unit).canonical_form();
            }
            return if n < 0 { -product } else { product };
        }

        let mut incentives = unit.left_incentives();
        incentives.extend(unit.right_incentives());

        let mut product = Game::empty();
        for incentive in &incentives {
            for left_option in &self.left_options {
                product
                    .left_options
                    .push(left_option.norton(unit) + unit + incentive);
            }
            for right_option in &self.right_options {
                product
                    .right_options
                    .push(right_option.norton(unit) - unit - incentive);
            }
        }
        product
    }

    /// Remove dominated options from both sides, one level deep.
    ///
    /// A Left option is dominated when another Left option is `>=` it, a
    /// Right option when another Right option is `<=` it. Each option is
    /// checked against both its not-yet-processed siblings and the already
    /// accepted output, so a single forward pass converges; among value-equal
    /// options the last one survives. Returns the reduced game and whether
    /// anything was dropped.
    pub fn remove_dominated(&self) -> (Game, bool) {
        let mut reduced = Game::empty();
        let mut changed = false;

        'left: for (i, option) in self.left_options.iter().enumerate() {
            for other in self.left_options[i + 1..]
                .iter()
                .chain(reduced.left_options.iter())
            {
                if other.geq(option) {
                    changed = true;
                    continue 'left;
                }
            }
            reduced.left_options.push(option.clone());
        }

        'right: for (i, option) in self.right_options.iter().enumerate() {
            for other in self.right_options[i + 1..]
                .iter()
                .chain(reduced.right_options.iter())
            {
                if other.leq(option) {
                    changed = true;
                    continue 'right;
                }
            }
            reduced.right_options.push(option.clone());
        }

        (reduced, changed)
    }

    /// Replace reversible options on both sides, one level deep.
    ///
    /// A Left option `L` is reversible when some Right option `LR` of `L`
    /// satisfies `LR <= G`; every such `LR` is bypassed by splicing its Left
    /// options directly into `G`'s Left options, and `L` itself is dropped.
    /// Mirrored for Right options through `RL >= G`. Returns the transformed
    /// game and whether anything was replaced.
    pub fn replace_reversible(&self) -> (Game, bool) {
        let mut replaced = Game::empty();
        let mut changed = false;

        for option in &self.left_options {
            let mut reversible = false;
            for counter in &option.right_options {
                if counter.leq(self) {
                    changed = true;
                    reversible = true;
                    replaced
                        .left_options
                        .extend(counter.left_options.iter().cloned());
                }
            }
            if !reversible {
                replaced.left_options.push(option.clone());
            }
        }

        for option in &self.right_options {
            let mut reversible = false;
            for counter in &option.left_options {
                if counter.geq(self) {
                    changed = true;
                    reversible = true;
                    replaced
                        .right_options
                        .extend(counter.right_options.iter().cloned());
                }
            }
            if !reversible {
                replaced.right_options.push(option.clone());
            }
        }

        (replaced, changed)
    }

    /// Compute the canonical form: the unique simplest tree equal to the
    /// game, free of reversible and dominated options at every node.
    ///
    /// Options are canonicalized recursively first; then reversible
    /// replacement and dominated removal are each run to their own fixed
    /// point, and the pair is repeated until neither pass reports a change.
    /// Reversibility goes first because bypassing an option can expose new
    /// domination, and vice versa.
    pub fn canonical_form(&self) -> Game {
        let mut canon = Game {
            left_options: self
                .left_options
                .iter()
                .map(Game::canonical_form)
                .collect(),
            right_options: self
                .right_options
                .iter()
                .map(Game::canonical_form)
                .collect(),
        };

        loop {
            let mut changed = false;
            loop {
                let (next, replaced) = canon.replace_reversible();
                canon = next;
                if replaced {
                    changed = true;
                } else {
                    break;
                }
            }
            loop {
                let (next, removed) = canon.remove_dominated();
                canon = next;
                if removed {
                    changed = true;
                } else {
                    break;
                }
            }
            if !changed {
                break;
            }
        }
        canon
    }

    /// Render the game tree as a Graphviz digraph, with compressed notation
    /// as node labels and `L`/`R` edge labels
    pub fn to_dot(&self) -> String {
        let mut buf = String::from("digraph Game {\n");
        self.write_dot(&mut buf, 0);
        buf.push('}');
        buf
    }

    fn write_dot(&self, buf: &mut String, start: usize) -> usize {
        let me = start;
        let mut index = start;
        writeln!(buf, "\t{}[label=\"{}\"];", me, self).unwrap();
        for option in &self.left_options {
            let last = option.write_dot(buf, index + 1);
            writeln!(buf, "\t{} -> {}[label=\"L\"];", me, index + 1).unwrap();
            index = last;
        }
        for option in &self.right_options {
            let last = option.write_dot(buf, index + 1);
            writeln!(buf, "\t{} -> {}[label=\"R\"];", me, index + 1).unwrap();
            index = last;
        }
        index
    }
}

impl Display for Game {
    /// Print the game in compressed notation
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", notation::compress(&self.expanded()))
    }
}

impl FromStr for Game {
    type Err = InvalidNotation;

    /// Decode compressed or expanded notation; `expand` is idempotent so both
    /// are accepted
    fn from_str(s: &str) -> Result<Game, InvalidNotation> {
        let expanded = notation::expand(s)?;
        match Game::parse(Parser::new(&expanded)) {
            Some((p, game)) if p.input.is_empty() => Ok(game),
            Some((p, _)) => Err(InvalidNotation::new(p.input)),
            None => Err(InvalidNotation::new(expanded)),
        }
    }
}

impl PartialEq for Game {
    /// Game-value equality: `G == H` iff `G - H` is a second-player win
    fn eq(&self, other: &Game) -> bool {
        (self - other).equal_zero()
    }
}

impl PartialOrd for Game {
    fn partial_cmp(&self, other: &Game) -> Option<Ordering> {
        let difference = self - other;
        match (difference.geq_zero(), difference.leq_zero()) {
            (true, true) => Some(Ordering::Equal),
            (true, false) => Some(Ordering::Greater),
            (false, true) => Some(Ordering::Less),
            (false, false) => None,
        }
    }

    fn ge(&self, other: &Game) -> bool {
        self.geq(other)
    }

    fn le(&self, other: &Game) -> bool {
        self.leq(other)
    }
}

impl_op_ex!(+|g: &Game, h: &Game| -> Game { Game::construct_sum(g, h) });
impl_op_ex!(+=|g: &mut Game, h: &Game| { *g = Game::construct_sum(g, h) });
impl_op_ex!(-|g: &Game| -> Game { g.inverse() });
impl_op_ex!(-|g: &Game, h: &Game| -> Game { Game::construct_sum(g, &h.inverse()) });
impl_op_ex!(-=|g: &mut Game, h: &Game| { *g = Game::construct_sum(g, &h.inverse()) });

#[cfg(feature = "serde")]
impl serde::Serialize for Game {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

#[cfg(feature = "serde")]
impl<'de> serde::Deserialize<'de> for Game {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Game::from_str(&String::deserialize(deserializer)?).map_err(serde::de::Error::custom)
    }
}

#[cfg(any(test, feature = "quickcheck"))]
impl Game {
    fn arbitrary_sized(generator: &mut quickcheck::Gen, size: &mut usize) -> Game {
        use quickcheck::Arbitrary;

        let make_terminal = (u32::arbitrary(generator) % 10) < 4;
        if *size == 0 || make_terminal {
            *size = size.saturating_sub(1);
            return Game::empty();
        }

        let num_left = usize::arbitrary(generator) % 3;
        let num_right = usize::arbitrary(generator) % 3;
        *size /= num_left + num_right + 1;

        let mut left_options = Vec::with_capacity(num_left);
        for _ in 0..num_left {
            left_options.push(Game::arbitrary_sized(generator, size));
        }
        let mut right_options = Vec::with_capacity(num_right);
        for _ in 0..num_right {
            right_options.push(Game::arbitrary_sized(generator, size));
        }
        Game::new(left_options, right_options)
    }
}

#[cfg(any(test, feature = "quickcheck"))]
impl quickcheck::Arbitrary for Game {
    fn arbitrary(generator: &mut quickcheck::Gen) -> Game {
        // Comparisons are exponential in tree size, keep generated games small
        let mut size = generator.size().min(8);
        Game::arbitrary_sized(generator, &mut size)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        Box::new(
            (self.left_options.clone(), self.right_options.clone())
                .shrink()
                .map(|(left_options, right_options)| Game::new(left_options, right_options)),
        )
    }
}
