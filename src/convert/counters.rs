//! JaCoCo counter aggregation

use crate::xml::Element;

/// Counter types read from JaCoCo `<counter type="...">` elements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    Line,
    Branch,
    Complexity,
}

impl CounterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CounterKind::Line => "LINE",
            CounterKind::Branch => "BRANCH",
            CounterKind::Complexity => "COMPLEXITY",
        }
    }
}

/// How a `(covered, missed)` pair is folded into a single value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `covered / (covered + missed)`, or `0.0` when nothing was counted
    Rate,
    /// `covered + missed`
    Sum,
}

impl Combinator {
    pub fn apply(&self, covered: u64, missed: u64) -> f64 {
        // Summed as floats so report-supplied counts cannot overflow
        let total = covered as f64 + missed as f64;
        match self {
            Combinator::Rate if total == 0.0 => 0.0,
            Combinator::Rate => covered as f64 / total,
            Combinator::Sum => total,
        }
    }
}

/// Value of the first direct `counter` child of `node` with the given type.
///
/// Returns `0.0` when no such counter exists.
pub fn counter_value(node: &Element, kind: CounterKind, combinator: Combinator) -> f64 {
    node.children("counter")
        .find(|counter| counter.attribute("type") == Some(kind.as_str()))
        .map(|counter| {
            combinator.apply(
                counter.number_attribute("covered"),
                counter.number_attribute("missed"),
            )
        })
        .unwrap_or(0.0)
}

/// Copy line rate, branch rate and complexity from a JaCoCo node onto a Cobertura node
pub fn add_counters(source: &Element, target: &mut Element) {
    let line_rate = counter_value(source, CounterKind::Line, Combinator::Rate);
    let branch_rate = counter_value(source, CounterKind::Branch, Combinator::Rate);
    let complexity = counter_value(source, CounterKind::Complexity, Combinator::Sum);

    target.set_attribute("line-rate", format_decimal(line_rate));
    target.set_attribute("branch-rate", format_decimal(branch_rate));
    target.set_attribute("complexity", format_decimal(complexity));
}

/// Format a number the way Cobertura readers expect (`0.8`, `1.0`, `12.0`)
pub fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
