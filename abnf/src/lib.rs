//! Model of the ABNF notation fragments that parse functions carry around:
//! terminal values (`%x30-39`, `%d13.10`, `"abc"`, `%s"abc"`), repetition
//! bounds (`1*9`) and rule names.
//!
//! Everything here round-trips through `Display` and `FromStr`.

use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use nom::combinator::all_consuming;

mod error;
pub use error::{Error, Result};
mod parser;

/// Radix of a numeric terminal.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum Base {
    Binary,
    Decimal,
    Hex,
}

impl Base {
    pub fn radix(self) -> u32 {
        match self {
            Base::Binary => 2,
            Base::Decimal => 10,
            Base::Hex => 16,
        }
    }

    fn fmt_value(self, f: &mut fmt::Formatter, value: u32) -> fmt::Result {
        match self {
            Base::Binary => write!(f, "{:b}", value),
            Base::Decimal => write!(f, "{}", value),
            Base::Hex => write!(f, "{:02X}", value),
        }
    }
}

impl Display for Base {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Base::Binary => write!(f, "b"),
            Base::Decimal => write!(f, "d"),
            Base::Hex => write!(f, "x"),
        }
    }
}

/// A numeric terminal, either a range of character values or a fixed
/// sequence of them.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum NumVal {
    /// `%x30-39`
    Range { base: Base, lo: u32, hi: u32 },
    /// `%x0D.0A`, or a single value such as `%x20`.
    Sequence { base: Base, values: Vec<u32> },
}

impl NumVal {
    /// Check that ranges are ordered and that every value in a sequence is a
    /// unicode scalar value.
    pub fn validate(&self) -> Result<()> {
        match self {
            NumVal::Range { lo, hi, .. } => {
                if lo > hi {
                    return Err(Error::InvalidRange { lo: *lo, hi: *hi });
                }
            }
            NumVal::Sequence { values, .. } => {
                if let Some(v) = values.iter().find(|v| std::char::from_u32(**v).is_none()) {
                    return Err(Error::InvalidChar(*v));
                }
            }
        }
        Ok(())
    }
}

impl Display for NumVal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            NumVal::Range { base, lo, hi } => {
                write!(f, "%{}", base)?;
                base.fmt_value(f, *lo)?;
                write!(f, "-")?;
                base.fmt_value(f, *hi)
            }
            NumVal::Sequence { base, values } => {
                write!(f, "%{}", base)?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    base.fmt_value(f, *v)?;
                }
                Ok(())
            }
        }
    }
}

/// A quoted string terminal. Quoted strings are case-insensitive unless
/// prefixed with `%s`.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct CharVal {
    pub value: String,
    pub case_sensitive: bool,
}

impl CharVal {
    pub fn new(value: &str, case_sensitive: bool) -> Self {
        CharVal {
            value: value.to_owned(),
            case_sensitive,
        }
    }
}

impl Display for CharVal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.case_sensitive {
            write!(f, "%s")?;
        }
        write!(f, "\"{}\"", self.value)
    }
}

/// Any terminal value.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum Terminal {
    Num(NumVal),
    Char(CharVal),
}

impl Display for Terminal {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Terminal::Num(v) => write!(f, "{}", v),
            Terminal::Char(v) => write!(f, "{}", v),
        }
    }
}

impl FromStr for Terminal {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, term) = all_consuming(parser::terminal)(s.trim())?;
        if let Terminal::Num(num) = &term {
            num.validate()?;
        }
        Ok(term)
    }
}

/// Repetition bounds, `min*max`. A missing `max` is unbounded.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct Repeat {
    pub min: usize,
    pub max: Option<usize>,
}

impl Repeat {
    pub const fn new(min: usize, max: usize) -> Self {
        Repeat {
            min,
            max: Some(max),
        }
    }

    pub const fn exactly(n: usize) -> Self {
        Repeat::new(n, n)
    }

    pub const fn at_least(min: usize) -> Self {
        Repeat { min, max: None }
    }

    /// `*`
    pub const fn any() -> Self {
        Repeat::at_least(0)
    }

    /// `[ ]`
    pub const fn optional() -> Self {
        Repeat::new(0, 1)
    }

    pub fn validate(&self) -> Result<()> {
        match self.max {
            Some(max) if max < self.min => Err(Error::InvalidRepeat { min: self.min, max }),
            _ => Ok(()),
        }
    }
}

impl Display for Repeat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (self.min, self.max) {
            (min, Some(max)) if min == max => write!(f, "{}", min),
            (0, None) => write!(f, "*"),
            (min, None) => write!(f, "{}*", min),
            (0, Some(max)) => write!(f, "*{}", max),
            (min, Some(max)) => write!(f, "{}*{}", min, max),
        }
    }
}

impl FromStr for Repeat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, repeat) = all_consuming(parser::repeat)(s.trim())?;
        repeat.validate()?;
        Ok(repeat)
    }
}

/// A rule name. ABNF rule names are case-insensitive, so equality and hashing
/// ignore ASCII case while `Display` keeps the original spelling.
#[derive(Debug, Clone)]
pub struct RuleName(String);

impl RuleName {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for RuleName {
    fn eq(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for RuleName {}

impl Hash for RuleName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for b in self.0.bytes() {
            state.write_u8(b.to_ascii_lowercase());
        }
    }
}

impl Display for RuleName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RuleName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (_, name) = all_consuming(parser::rule_name)(s.trim())?;
        Ok(name)
    }
}
