//! Income and expense totals with a split chart.

use std::rc::{Rc, Weak};

use super::{show_loader, Panel};
use crate::app::{AppContext, ComponentBase, View};
use crate::dom::Element;
use crate::domain::error::Result;
use crate::domain::models::Statistic;
use crate::services::{render_template, Signal};
use crate::ui::components::{
    remove_loader, ButtonVariant, CircleChart, Heading, StatisticItem,
};
use crate::utils::format_to_currency;

const TEMPLATE: &str = r#"<div class="statistics">
  <component-heading></component-heading>
  <div id="statistics-items"></div>
  <div id="circle-chart"></div>
</div>"#;

pub struct Statistics {
    base: ComponentBase,
    panel: Rc<Panel>,
}

impl Statistics {
    #[must_use]
    pub fn new(ctx: &AppContext) -> Self {
        let mut base = ComponentBase::new("statistics");
        let panel = Panel::new(ctx, &base);
        Panel::refetch_on(&panel, &mut base, Signal::TransactionCompleted, fetch);
        Self { base, panel }
    }
}

fn fetch(panel: &Rc<Panel>) {
    let weak: Weak<Panel> = Rc::downgrade(panel);
    panel.ctx().services.statistics.main(
        panel.token(),
        Box::new(move |result: Result<Vec<Statistic>>| {
            let Some(panel) = weak.upgrade() else {
                return;
            };
            if let Err(err) = result.and_then(|stats| show(&panel, &stats)) {
                panel.report(&err);
            }
        }),
    );
}

fn value_of(stats: &[Statistic], label: &str) -> f64 {
    stats
        .iter()
        .find(|stat| stat.label == label)
        .map_or(0.0, |stat| stat.value)
}

fn show(panel: &Panel, stats: &[Statistic]) -> Result<()> {
    let items = panel.find("#statistics-items")?;
    remove_loader(items.element());
    items.set_text("");
    for stat in stats {
        let variant = if stat.label == "Income" {
            ButtonVariant::Green
        } else {
            ButtonVariant::Purple
        };
        let item = StatisticItem::new(
            &format!("{}:", stat.label),
            &format_to_currency(stat.value),
            variant,
        )
        .render()?;
        items.append(&item)?;
    }

    let chart = panel.find("#circle-chart")?;
    chart.set_text("");
    let income = value_of(stats, "Income");
    let expense = value_of(stats, "Expense");
    chart.append(&CircleChart::from_totals(income, expense).render()?)?;
    Ok(())
}

impl View for Statistics {
    fn render(&mut self) -> Result<Element> {
        let heading = self.base.mount_child(Box::new(Heading::new("Statistics")))?;
        let root = render_template(TEMPLATE, &[("heading", heading)])?;
        self.panel.set_element(&root);
        show_loader(&self.panel.find("#statistics-items")?)?;
        Panel::fetch_after_delay(&self.panel, fetch);
        self.base.rendered(&root);
        Ok(root)
    }

    fn teardown(&mut self) {
        self.base.teardown();
    }
}
