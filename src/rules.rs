//! Transition rules.
//!
//! Every rule receives the alive state of a cell and the number of alive cells in
//! its 3x3 block, **the cell itself included** (see [`crate::Grid::num_neighbors`]).
//! Rules expressed in classic terms subtract the cell's own contribution first.

use std::{fmt, str::FromStr, sync::Arc};

use crate::Error;

/// Maps a cell's current state and self-inclusive block count to its next state.
pub trait Rule: Send + Sync {
    fn next(&self, alive: bool, n: u8) -> bool;
}

impl<F> Rule for F
where
    F: Fn(bool, u8) -> bool + Send + Sync,
{
    fn next(&self, alive: bool, n: u8) -> bool {
        self(alive, n)
    }
}

/// Number of alive cells around a cell, itself excluded.
fn others(alive: bool, n: u8) -> u8 {
    n.saturating_sub(u8::from(alive))
}

/// Conway's rule: survive on 2 or 3 other neighbors, birth on exactly 3.
pub fn standard_rule(alive: bool, n: u8) -> bool {
    matches!((alive, others(alive, n)), (true, 2 | 3) | (false, 3))
}

pub fn identity_rule(alive: bool, _n: u8) -> bool {
    alive
}

/// A totalistic "life-like" rule given by its birth and survival neighbor counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LifeLikeRule {
    birth: u16,
    survival: u16,
}

impl LifeLikeRule {
    pub fn new(birth: &[u8], survival: &[u8]) -> Result<Self, Error> {
        Ok(Self {
            birth: mask(birth)?,
            survival: mask(survival)?,
        })
    }

    pub fn conway() -> Self {
        Self {
            birth: 1 << 3,
            survival: 1 << 2 | 1 << 3,
        }
    }

    pub fn highlife() -> Self {
        Self {
            birth: 1 << 3 | 1 << 6,
            survival: 1 << 2 | 1 << 3,
        }
    }

    pub fn seeds() -> Self {
        Self {
            birth: 1 << 2,
            survival: 0,
        }
    }

    pub fn day_and_night() -> Self {
        Self {
            birth: 1 << 3 | 1 << 6 | 1 << 7 | 1 << 8,
            survival: 1 << 3 | 1 << 4 | 1 << 6 | 1 << 7 | 1 << 8,
        }
    }

    pub fn births_on(&self, others: u8) -> bool {
        others <= 8 && self.birth & (1 << others) != 0
    }

    pub fn survives_on(&self, others: u8) -> bool {
        others <= 8 && self.survival & (1 << others) != 0
    }
}

fn mask(counts: &[u8]) -> Result<u16, Error> {
    counts.iter().try_fold(0u16, |acc, &count| {
        if count > 8 {
            Err(Error::InvalidRule(format!(
                "neighbor count {count} is outside 0..=8"
            )))
        } else {
            Ok(acc | 1 << count)
        }
    })
}

impl Rule for LifeLikeRule {
    fn next(&self, alive: bool, n: u8) -> bool {
        let others = others(alive, n);
        if alive {
            self.survives_on(others)
        } else {
            self.births_on(others)
        }
    }
}

/// Parses `B3/S23` notation (either order, any case) or the older `23/3` S/B form.
impl FromStr for LifeLikeRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidRule(format!("`{s}` is not in B/S notation"));
        let (left, right) = s.trim().split_once('/').ok_or_else(invalid)?;

        let digits = |part: &str| -> Result<Vec<u8>, Error> {
            part.chars()
                .map(|c| {
                    c.to_digit(10)
                        .map(|d| d as u8)
                        .ok_or_else(invalid)
                })
                .collect()
        };
        let tagged = |part: &str| -> Option<(char, String)> {
            let mut chars = part.chars();
            let tag = chars.next()?.to_ascii_uppercase();
            matches!(tag, 'B' | 'S').then(|| (tag, chars.collect()))
        };

        let (birth, survival) = match (tagged(left), tagged(right)) {
            (Some(('B', born)), Some(('S', kept))) | (Some(('S', kept)), Some(('B', born))) => {
                (born, kept)
            }
            (None, None) => (right.to_string(), left.to_string()),
            _ => return Err(invalid()),
        };
        Self::new(&digits(birth.as_str())?, &digits(survival.as_str())?)
    }
}

impl fmt::Display for LifeLikeRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("B")?;
        for n in (0..=8).filter(|&n| self.births_on(n)) {
            write!(f, "{n}")?;
        }
        f.write_str("/S")?;
        for n in (0..=8).filter(|&n| self.survives_on(n)) {
            write!(f, "{n}")?;
        }
        Ok(())
    }
}

/// The rule a simulation runs with.
///
/// Custom functions are accepted as-is; anything parsed from text is checked when
/// the `RuleSet` is built, never while ticking.
#[derive(Clone, Default)]
pub enum RuleSet {
    #[default]
    Standard,
    Identity,
    LifeLike(LifeLikeRule),
    Custom(Arc<dyn Fn(bool, u8) -> bool + Send + Sync>),
}

impl RuleSet {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(bool, u8) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }
}

impl Rule for RuleSet {
    fn next(&self, alive: bool, n: u8) -> bool {
        match self {
            Self::Standard => standard_rule(alive, n),
            Self::Identity => identity_rule(alive, n),
            Self::LifeLike(rule) => rule.next(alive, n),
            Self::Custom(f) => f(alive, n),
        }
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => f.write_str("Standard"),
            Self::Identity => f.write_str("Identity"),
            Self::LifeLike(rule) => write!(f, "LifeLike({rule})"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl FromStr for RuleSet {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" | "conway" | "life" => Ok(Self::Standard),
            "identity" => Ok(Self::Identity),
            "highlife" => Ok(Self::LifeLike(LifeLikeRule::highlife())),
            "seeds" => Ok(Self::LifeLike(LifeLikeRule::seeds())),
            "day-and-night" | "daynight" => Ok(Self::LifeLike(LifeLikeRule::day_and_night())),
            other if other.contains('/') => {
                let rule: LifeLikeRule = other.parse()?;
                if rule == LifeLikeRule::conway() {
                    Ok(Self::Standard)
                } else {
                    Ok(Self::LifeLike(rule))
                }
            }
            _ => Err(Error::InvalidRule(format!("unknown rule `{s}`"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_rule_table() {
        // dead cells: n counts only neighbors
        for n in 0..=8 {
            assert_eq!(standard_rule(false, n), n == 3, "dead with {n}");
        }
        // alive cells: n counts the cell too
        for n in 1..=9 {
            assert_eq!(standard_rule(true, n), n == 3 || n == 4, "alive with {n}");
        }
    }

    #[test]
    fn test_identity_rule() {
        for n in 0..=9 {
            assert!(identity_rule(true, n));
            assert!(!identity_rule(false, n));
        }
    }

    #[test]
    fn test_conway_life_like_matches_standard() {
        let rule = LifeLikeRule::conway();
        for n in 0..=9 {
            for alive in [false, true] {
                assert_eq!(rule.next(alive, n), standard_rule(alive, n));
            }
        }
    }

    #[test]
    fn test_parse_notation() {
        let rule: LifeLikeRule = "B36/S23".parse().unwrap();
        assert_eq!(rule, LifeLikeRule::highlife());
        let rule: LifeLikeRule = "s23/b3".parse().unwrap();
        assert_eq!(rule, LifeLikeRule::conway());
        let rule: LifeLikeRule = "23/3".parse().unwrap();
        assert_eq!(rule, LifeLikeRule::conway());
        let rule: LifeLikeRule = "B2/S".parse().unwrap();
        assert_eq!(rule, LifeLikeRule::seeds());
        assert_eq!(LifeLikeRule::day_and_night().to_string(), "B3678/S34678");
    }

    #[test]
    fn test_parse_invalid() {
        for bad in ["", "B3S23", "B9/S23", "B3/X23", "Bx/S2", "B3/23"] {
            assert!(
                matches!(bad.parse::<LifeLikeRule>(), Err(Error::InvalidRule(_))),
                "{bad}"
            );
        }
        assert!(matches!(
            "fizzbuzz".parse::<RuleSet>(),
            Err(Error::InvalidRule(_))
        ));
    }

    #[test]
    fn test_rule_set_names() {
        assert!(matches!("Conway".parse::<RuleSet>(), Ok(RuleSet::Standard)));
        assert!(matches!("B3/S23".parse::<RuleSet>(), Ok(RuleSet::Standard)));
        assert!(matches!("identity".parse::<RuleSet>(), Ok(RuleSet::Identity)));
        assert!(matches!(
            "highlife".parse::<RuleSet>(),
            Ok(RuleSet::LifeLike(rule)) if rule == LifeLikeRule::highlife()
        ));
    }

    #[test]
    fn test_custom_rule() {
        let always = RuleSet::custom(|_, _| true);
        assert!(always.next(false, 0));
        let closure = |alive: bool, n: u8| alive && n > 1;
        assert!(closure.next(true, 2));
        assert!(!closure.next(true, 1));
    }
}
