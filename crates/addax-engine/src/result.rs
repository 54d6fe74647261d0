//! Per-automaton reports and batch aggregation.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;
use sha2::{Digest, Sha256};

use addax_automata::GrowthClass;

/// Growth verdict as it appears in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GrowthLabel {
    Polynomial,
    Exponential,
}

impl GrowthLabel {
    pub fn is_polynomial(self) -> bool {
        matches!(self, GrowthLabel::Polynomial)
    }
}

impl From<GrowthClass> for GrowthLabel {
    fn from(class: GrowthClass) -> Self {
        if class.is_polynomial() {
            GrowthLabel::Polynomial
        } else {
            GrowthLabel::Exponential
        }
    }
}

impl fmt::Display for GrowthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrowthLabel::Polynomial => write!(f, "polynomial"),
            GrowthLabel::Exponential => write!(f, "exponential"),
        }
    }
}

/// Prover-confirmed greatest common divisor of the accepted set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum GcdVerdict {
    /// The largest candidate divisor the prover confirmed.
    Confirmed(u64),
    /// No nonzero accepted value exists, so no divisor is meaningful.
    Undetermined,
}

impl GcdVerdict {
    /// Numeric view with 0 standing for the undetermined case.
    pub fn value(self) -> u64 {
        match self {
            GcdVerdict::Confirmed(d) => d,
            GcdVerdict::Undetermined => 0,
        }
    }

    pub fn is_unit(self) -> bool {
        matches!(self, GcdVerdict::Confirmed(1))
    }
}

/// Additive-basis order verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum BasisOrder {
    /// Smallest summand count the prover confirmed.
    Order(usize),
    /// Every count up to the cap was refuted.
    ExceedsMax(usize),
}

impl fmt::Display for BasisOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BasisOrder::Order(k) => write!(f, "{k}"),
            BasisOrder::ExceedsMax(max) => write!(f, ">{max}"),
        }
    }
}

/// Full analysis outcome for one automaton.
#[derive(Debug, Clone, Serialize)]
pub struct AutomatonReport {
    /// Canonical `{states}_{transitions}_{accepting}` description.
    pub canonical: String,
    /// Sha256 over the canonical description, tying the report to its input.
    pub source_fingerprint: String,
    pub growth: GrowthLabel,
    pub gcd: GcdVerdict,
    /// Exponential growth with unit GCD, the precondition for the basis
    /// questions below.
    pub basis_candidate: bool,
    /// Whether 1 itself is an accepted value. Only set for basis candidates.
    pub contains_one: Option<bool>,
    pub asymptotic_order: Option<BasisOrder>,
    pub exact_order: Option<BasisOrder>,
}

/// Sha256 fingerprint of an automaton's canonical description, hex-encoded.
pub fn source_fingerprint(canonical: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Batch counters over a stream of reports.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub analyzed: usize,
    pub exponential_unit_gcd: usize,
    pub exponential_nonunit_gcd: usize,
    pub polynomial_unit_gcd: usize,
    pub polynomial_nonunit_gcd: usize,
    /// Asymptotic order rendered as a string key, mapped to its count.
    pub asymptotic_orders: IndexMap<String, usize>,
    pub exact_orders: IndexMap<String, usize>,
}

impl Summary {
    pub fn record(&mut self, report: &AutomatonReport) {
        self.analyzed += 1;
        match (report.growth.is_polynomial(), report.gcd.is_unit()) {
            (false, true) => self.exponential_unit_gcd += 1,
            (false, false) => self.exponential_nonunit_gcd += 1,
            (true, true) => self.polynomial_unit_gcd += 1,
            (true, false) => self.polynomial_nonunit_gcd += 1,
        }
        if let Some(order) = report.asymptotic_order {
            *self
                .asymptotic_orders
                .entry(order.to_string())
                .or_insert(0) += 1;
        }
        if let Some(order) = report.exact_order {
            *self.exact_orders.entry(order.to_string()).or_insert(0) += 1;
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "analyzed: {}", self.analyzed)?;
        writeln!(f, "exponential, gcd 1: {}", self.exponential_unit_gcd)?;
        writeln!(f, "exponential, gcd != 1: {}", self.exponential_nonunit_gcd)?;
        writeln!(f, "polynomial, gcd 1: {}", self.polynomial_unit_gcd)?;
        writeln!(f, "polynomial, gcd != 1: {}", self.polynomial_nonunit_gcd)?;
        if !self.asymptotic_orders.is_empty() {
            writeln!(f, "asymptotic orders:")?;
            for (order, count) in &self.asymptotic_orders {
                writeln!(f, "  order {order}: {count}")?;
            }
        }
        if !self.exact_orders.is_empty() {
            writeln!(f, "exact orders:")?;
            for (order, count) in &self.exact_orders {
                writeln!(f, "  order {order}: {count}")?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(growth: GrowthLabel, gcd: GcdVerdict) -> AutomatonReport {
        AutomatonReport {
            canonical: "2_0111_1".to_string(),
            source_fingerprint: source_fingerprint("2_0111_1"),
            growth,
            gcd,
            basis_candidate: false,
            contains_one: None,
            asymptotic_order: None,
            exact_order: None,
        }
    }

    #[test]
    fn summary_counts_the_four_growth_gcd_cells() {
        let mut summary = Summary::default();
        summary.record(&report(GrowthLabel::Exponential, GcdVerdict::Confirmed(1)));
        summary.record(&report(GrowthLabel::Exponential, GcdVerdict::Confirmed(3)));
        summary.record(&report(GrowthLabel::Polynomial, GcdVerdict::Confirmed(1)));
        summary.record(&report(GrowthLabel::Polynomial, GcdVerdict::Undetermined));

        assert_eq!(summary.analyzed, 4);
        assert_eq!(summary.exponential_unit_gcd, 1);
        assert_eq!(summary.exponential_nonunit_gcd, 1);
        assert_eq!(summary.polynomial_unit_gcd, 1);
        assert_eq!(summary.polynomial_nonunit_gcd, 1);
    }

    #[test]
    fn summary_tallies_orders() {
        let mut summary = Summary::default();
        let mut with_order = report(GrowthLabel::Exponential, GcdVerdict::Confirmed(1));
        with_order.asymptotic_order = Some(BasisOrder::Order(2));
        summary.record(&with_order);
        summary.record(&with_order);
        with_order.asymptotic_order = Some(BasisOrder::ExceedsMax(4));
        summary.record(&with_order);

        assert_eq!(summary.asymptotic_orders.get("2"), Some(&2));
        assert_eq!(summary.asymptotic_orders.get(">4"), Some(&1));
        assert!(summary.exact_orders.is_empty());
    }

    #[test]
    fn fingerprint_is_stable_hex_sha256() {
        let fp = source_fingerprint("2_0111_1");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(fp, source_fingerprint("2_0111_1"));
        assert_ne!(fp, source_fingerprint("2_0111_0"));
    }

    #[test]
    fn report_serializes_with_tagged_verdicts() {
        let mut r = report(GrowthLabel::Exponential, GcdVerdict::Confirmed(1));
        r.basis_candidate = true;
        r.contains_one = Some(true);
        r.asymptotic_order = Some(BasisOrder::Order(3));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["growth"], "exponential");
        assert_eq!(json["gcd"]["kind"], "confirmed");
        assert_eq!(json["gcd"]["value"], 1);
        assert_eq!(json["asymptotic_order"]["kind"], "order");
        assert_eq!(json["asymptotic_order"]["value"], 3);
    }
}
