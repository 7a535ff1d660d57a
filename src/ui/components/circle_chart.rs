//! Two-segment income/expense chart.

use crate::app::View;
use crate::dom::Element;
use crate::domain::error::Result;

/// Share of the smaller segment when the other side is zero.
const SLIVER: f64 = 0.1;

/// Income and expense percentages of the chart.
///
/// A side with no money still gets a visible sliver. With no money on either
/// side both segments are empty.
///
/// ```
/// use redbank::ui::components::chart_split;
///
/// assert_eq!(chart_split(300.0, 100.0), (75.0, 25.0));
/// assert_eq!(chart_split(50.0, 0.0), (100.0, 0.1));
/// assert_eq!(chart_split(0.0, 50.0), (0.1, 100.0));
/// ```
#[must_use]
pub fn chart_split(income: f64, expense: f64) -> (f64, f64) {
    let has_income = income > 0.0;
    let has_expense = expense > 0.0;
    match (has_income, has_expense) {
        (true, false) => (100.0, SLIVER),
        (false, true) => (SLIVER, 100.0),
        (false, false) => (0.0, 0.0),
        (true, true) => {
            let income_percent = income * 100.0 / (income + expense);
            (income_percent, 100.0 - income_percent)
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CircleChart {
    income_percent: f64,
    expense_percent: f64,
}

impl CircleChart {
    #[must_use]
    pub const fn new(income_percent: f64, expense_percent: f64) -> Self {
        Self {
            income_percent,
            expense_percent,
        }
    }

    /// Chart for the given totals, split with [`chart_split`].
    #[must_use]
    pub fn from_totals(income: f64, expense: f64) -> Self {
        let (income_percent, expense_percent) = chart_split(income, expense);
        Self::new(income_percent, expense_percent)
    }
}

impl View for CircleChart {
    fn render(&mut self) -> Result<Element> {
        let root = Element::new("div");
        root.add_class("circle-chart");
        for (class, percent) in [
            ("income", self.income_percent),
            ("expense", self.expense_percent),
        ] {
            let segment = Element::new("div");
            segment.add_class("segment");
            segment.add_class(class);
            segment.set_attribute("data-percent", &format!("{percent:.1}"));
            segment.set_style_property("--percent", &format!("{percent:.1}%"));
            root.append_child(&segment)?;
        }
        Ok(root)
    }

    fn teardown(&mut self) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn segments_carry_their_share() {
        let chart = CircleChart::from_totals(3000.0, 500.0).render().unwrap();
        let income = chart.query_selector(".segment.income").unwrap().unwrap();
        let expense = chart.query_selector(".segment.expense").unwrap().unwrap();
        assert_eq!(income.attribute("data-percent").as_deref(), Some("85.7"));
        assert_eq!(expense.attribute("data-percent").as_deref(), Some("14.3"));
    }

    #[test]
    fn empty_totals_render_empty_segments() {
        assert_eq!(chart_split(0.0, 0.0), (0.0, 0.0));
    }
}
