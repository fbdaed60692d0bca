//! Catalog of n-ary similarity indices.
//!
//! Every index is a pure function of the [`Counters`] record, resolved
//! statically through [`IndexKind`]: unknown names are rejected at
//! configuration time, and adding an index means adding a table entry,
//! never a new type.
//!
//! Each index has two variants selected by [`WeightMode`]:
//! - `Weighted`: weighted counters in both numerator and denominator.
//! - `Unweighted`: weighted numerator over unweighted denominator (the
//!   published convention for these measures; note the numerators stay
//!   weighted even in this mode).
//!
//! Zero denominators produce non-finite values (`NaN` or infinity) rather
//! than errors; consumers skip such entries.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::counters::Counters;
use crate::error::ConfigError;

/// Whether an index divides by weighted or unweighted denominators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum WeightMode {
    Weighted,
    #[default]
    Unweighted,
}

impl fmt::Display for WeightMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Weighted => write!(f, "weighted"),
            Self::Unweighted => write!(f, "unweighted"),
        }
    }
}

impl FromStr for WeightMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "w" | "weighted" => Ok(Self::Weighted),
            "nw" | "unweighted" => Ok(Self::Unweighted),
            _ => Err(ConfigError::UnknownWeightMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for WeightMode {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WeightMode> for String {
    fn from(value: WeightMode) -> Self {
        value.to_string()
    }
}

/// The named similarity indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IndexKind {
    AustinColwell,
    BaroniUrbaniBuser,
    ConsoniTodeschini1,
    ConsoniTodeschini2,
    ConsoniTodeschini3,
    ConsoniTodeschini4,
    Faith,
    Gleason,
    GoodmanKruskal,
    HawkinsDotson,
    Jaccard,
    Jaccard0,
    JaccardTanimoto,
    RogersTanimoto,
    RussellRao,
    SokalMichener,
    SokalSneath1,
    SokalSneath2,
}

impl IndexKind {
    /// Every catalog entry, in abbreviation order.
    pub const ALL: [IndexKind; 18] = [
        IndexKind::AustinColwell,
        IndexKind::BaroniUrbaniBuser,
        IndexKind::ConsoniTodeschini1,
        IndexKind::ConsoniTodeschini2,
        IndexKind::ConsoniTodeschini3,
        IndexKind::ConsoniTodeschini4,
        IndexKind::Faith,
        IndexKind::Gleason,
        IndexKind::GoodmanKruskal,
        IndexKind::HawkinsDotson,
        IndexKind::Jaccard,
        IndexKind::Jaccard0,
        IndexKind::JaccardTanimoto,
        IndexKind::RogersTanimoto,
        IndexKind::RussellRao,
        IndexKind::SokalMichener,
        IndexKind::SokalSneath1,
        IndexKind::SokalSneath2,
    ];

    /// Short tag used in configuration and report tables.
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Self::AustinColwell => "AC",
            Self::BaroniUrbaniBuser => "BUB",
            Self::ConsoniTodeschini1 => "CT1",
            Self::ConsoniTodeschini2 => "CT2",
            Self::ConsoniTodeschini3 => "CT3",
            Self::ConsoniTodeschini4 => "CT4",
            Self::Faith => "Fai",
            Self::Gleason => "Gle",
            Self::GoodmanKruskal => "GK",
            Self::HawkinsDotson => "HD",
            Self::Jaccard => "Ja",
            Self::Jaccard0 => "Ja0",
            Self::JaccardTanimoto => "JT",
            Self::RogersTanimoto => "RT",
            Self::RussellRao => "RR",
            Self::SokalMichener => "SM",
            Self::SokalSneath1 => "SS1",
            Self::SokalSneath2 => "SS2",
        }
    }

    /// Full display name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::AustinColwell => "Austin-Colwell",
            Self::BaroniUrbaniBuser => "Baroni-Urbani-Buser",
            Self::ConsoniTodeschini1 => "Consoni-Todeschini1",
            Self::ConsoniTodeschini2 => "Consoni-Todeschini2",
            Self::ConsoniTodeschini3 => "Consoni-Todeschini3",
            Self::ConsoniTodeschini4 => "Consoni-Todeschini4",
            Self::Faith => "Faith",
            Self::Gleason => "Gleason",
            Self::GoodmanKruskal => "Goodman-Kruskal",
            Self::HawkinsDotson => "Hawkins-Dotson",
            Self::Jaccard => "Jaccard",
            Self::Jaccard0 => "Jaccard0",
            Self::JaccardTanimoto => "Jaccard-Tanimoto",
            Self::RogersTanimoto => "Rogers-Tanimoto",
            Self::RussellRao => "Russell-Rao",
            Self::SokalMichener => "Sokal-Michener",
            Self::SokalSneath1 => "Sokal-Sneath1",
            Self::SokalSneath2 => "Sokal-Sneath2",
        }
    }

    /// Evaluates the index against a counter record.
    ///
    /// Returns `NaN` or an infinity when the formula's denominator is
    /// zero; never panics.
    pub fn evaluate(&self, c: &Counters, mode: WeightMode) -> f64 {
        // Weighted counters feed every numerator; the mode picks the
        // denominator family.
        let w_a = c.w_a;
        let w_d = c.w_d;
        let w_sim = c.total_w_sim;
        let w_dis = c.total_w_dis;
        let w_p = c.w_p;
        let a = c.a as f64;
        let d = c.d as f64;
        let sim = c.total_sim as f64;
        let dis = c.total_dis as f64;
        let p = c.p as f64;

        use WeightMode::{Unweighted, Weighted};
        match (self, mode) {
            (Self::AustinColwell, Weighted) => {
                (2.0 / std::f64::consts::PI) * (w_sim / w_p).sqrt().asin()
            }
            (Self::AustinColwell, Unweighted) => {
                (2.0 / std::f64::consts::PI) * (w_sim / p).sqrt().asin()
            }
            (Self::BaroniUrbaniBuser, Weighted) => {
                ((w_a * w_d).sqrt() + w_a) / ((w_a * w_d).sqrt() + w_a + w_dis)
            }
            (Self::BaroniUrbaniBuser, Unweighted) => {
                ((w_a * w_d).sqrt() + w_a) / ((a * d).sqrt() + a + dis)
            }
            (Self::ConsoniTodeschini1, Weighted) => (1.0 + w_sim).ln() / (1.0 + w_p).ln(),
            (Self::ConsoniTodeschini1, Unweighted) => (1.0 + w_sim).ln() / (1.0 + p).ln(),
            (Self::ConsoniTodeschini2, Weighted) => {
                ((1.0 + w_p).ln() - (1.0 + w_dis).ln()) / (1.0 + w_p).ln()
            }
            (Self::ConsoniTodeschini2, Unweighted) => {
                ((1.0 + w_p).ln() - (1.0 + w_dis).ln()) / (1.0 + p).ln()
            }
            (Self::ConsoniTodeschini3, Weighted) => (1.0 + w_a).ln() / (1.0 + w_p).ln(),
            (Self::ConsoniTodeschini3, Unweighted) => (1.0 + w_a).ln() / (1.0 + p).ln(),
            (Self::ConsoniTodeschini4, Weighted) => {
                (1.0 + w_a).ln() / (1.0 + w_a + w_dis).ln()
            }
            (Self::ConsoniTodeschini4, Unweighted) => (1.0 + w_a).ln() / (1.0 + a + dis).ln(),
            (Self::Faith, Weighted) => (w_a + 0.5 * w_d) / w_p,
            (Self::Faith, Unweighted) => (w_a + 0.5 * w_d) / p,
            (Self::Gleason, Weighted) => 2.0 * w_a / (2.0 * w_a + w_dis),
            (Self::Gleason, Unweighted) => 2.0 * w_a / (2.0 * a + dis),
            (Self::GoodmanKruskal, Weighted) => {
                (2.0 * w_a.min(w_d) - w_dis) / (2.0 * w_a.min(w_d) + w_dis)
            }
            (Self::GoodmanKruskal, Unweighted) => {
                (2.0 * w_a.min(w_d) - w_dis) / (2.0 * a.min(d) + dis)
            }
            (Self::HawkinsDotson, Weighted) => {
                0.5 * (w_a / (w_a + w_dis) + w_d / (w_d + w_dis))
            }
            (Self::HawkinsDotson, Unweighted) => 0.5 * (w_a / (a + dis) + w_d / (d + dis)),
            (Self::Jaccard, Weighted) => 3.0 * w_a / (3.0 * w_a + w_dis),
            (Self::Jaccard, Unweighted) => 3.0 * w_a / (3.0 * a + dis),
            (Self::Jaccard0, Weighted) => 3.0 * w_sim / (3.0 * w_sim + w_dis),
            (Self::Jaccard0, Unweighted) => 3.0 * w_sim / (3.0 * sim + dis),
            (Self::JaccardTanimoto, Weighted) => w_a / (w_a + w_dis),
            (Self::JaccardTanimoto, Unweighted) => w_a / (a + dis),
            (Self::RogersTanimoto, Weighted) => w_sim / (w_p + w_dis),
            (Self::RogersTanimoto, Unweighted) => w_sim / (p + dis),
            (Self::RussellRao, Weighted) => w_a / w_p,
            (Self::RussellRao, Unweighted) => w_a / p,
            (Self::SokalMichener, Weighted) => w_sim / w_p,
            (Self::SokalMichener, Unweighted) => w_sim / p,
            (Self::SokalSneath1, Weighted) => w_a / (w_a + 2.0 * w_dis),
            (Self::SokalSneath1, Unweighted) => w_a / (a + 2.0 * dis),
            (Self::SokalSneath2, Weighted) => 2.0 * w_sim / (w_p + w_sim),
            (Self::SokalSneath2, Unweighted) => 2.0 * w_sim / (p + sim),
        }
    }
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.abbreviation())
    }
}

impl FromStr for IndexKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        for kind in Self::ALL {
            if text.eq_ignore_ascii_case(kind.abbreviation())
                || text.eq_ignore_ascii_case(kind.name())
            {
                return Ok(kind);
            }
        }
        Err(ConfigError::UnknownIndex(s.to_string()))
    }
}

impl TryFrom<String> for IndexKind {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<IndexKind> for String {
    fn from(value: IndexKind) -> Self {
        value.abbreviation().to_string()
    }
}

/// Every catalog index evaluated against one counter record, keyed by
/// abbreviation, in both weight modes.
#[derive(Debug, Clone, Serialize)]
pub struct IndexTable {
    pub weighted: BTreeMap<&'static str, f64>,
    pub unweighted: BTreeMap<&'static str, f64>,
}

/// Evaluates the full catalog for one counter record.
pub fn full_table(counters: &Counters) -> IndexTable {
    let mut weighted = BTreeMap::new();
    let mut unweighted = BTreeMap::new();
    for kind in IndexKind::ALL {
        weighted.insert(
            kind.abbreviation(),
            kind.evaluate(counters, WeightMode::Weighted),
        );
        unweighted.insert(
            kind.abbreviation(),
            kind.evaluate(counters, WeightMode::Unweighted),
        );
    }
    IndexTable {
        weighted,
        unweighted,
    }
}
