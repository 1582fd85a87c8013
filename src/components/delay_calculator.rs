use std::rc::Rc;

use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::config::DelayConfig;
use crate::dom::{self, SetupError};
use crate::format::{currency, parse_or};

const CALCULATOR_ID: &str = "delay-calculator";
const SLIDER: &str = ".slider";
const RESULT: &str = ".delay-value";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelayField {
    MonthlyCost,
    TotalCost,
}

impl DelayField {
    /// Outputs are matched by id; anything else is left alone.
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "monthly-cost" => Some(DelayField::MonthlyCost),
            "total-cost" => Some(DelayField::TotalCost),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayCost {
    pub monthly_cost: i64,
    pub total_cost: i64,
}

impl DelayCost {
    pub fn compute(monthly_cost: i64, months: i64) -> Self {
        Self {
            monthly_cost,
            total_cost: monthly_cost.saturating_mul(months),
        }
    }

    pub fn text(&self, field: DelayField) -> String {
        match field {
            DelayField::MonthlyCost => currency(self.monthly_cost),
            DelayField::TotalCost => currency(self.total_cost),
        }
    }
}

struct DelayCalculator {
    config: DelayConfig,
    slider: HtmlInputElement,
    outputs: Vec<(DelayField, Element)>,
}

impl DelayCalculator {
    fn new(root: &Element, config: &DelayConfig) -> Result<Self, SetupError> {
        let slider = dom::find(root, SLIDER)
            .ok_or(SetupError::Missing(SLIDER))?
            .dyn_into::<HtmlInputElement>()
            .map_err(|_| SetupError::NotInput(SLIDER))?;

        let outputs = dom::elements(root.query_selector_all(RESULT))
            .into_iter()
            .filter_map(|el| DelayField::from_id(&el.id()).map(|field| (field, el)))
            .collect();

        Ok(Self {
            config: config.clone(),
            slider,
            outputs,
        })
    }

    fn update(&self) {
        let months = parse_or(Some(self.slider.value()), self.config.default_months);
        let cost = DelayCost::compute(self.config.monthly_cost, months);
        for (field, el) in &self.outputs {
            el.set_text_content(Some(&cost.text(*field)));
        }
    }
}

pub fn attach(document: &Document, config: &DelayConfig) -> Result<(), SetupError> {
    let root = document
        .get_element_by_id(CALCULATOR_ID)
        .ok_or(SetupError::Missing("#delay-calculator"))?;

    let calculator = Rc::new(DelayCalculator::new(&root, config)?);
    let slider = calculator.slider.clone();
    let handler = calculator.clone();
    dom::listen(&slider, "input", move |_| handler.update())?;
    calculator.update();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn six_months_of_delay() {
        let config = DelayConfig::default();
        let cost = DelayCost::compute(config.monthly_cost, 6);
        assert_eq!(cost.text(DelayField::MonthlyCost), "$52,000");
        assert_eq!(cost.total_cost, 312_000);
        assert_eq!(cost.text(DelayField::TotalCost), "$312,000");
    }

    #[test]
    fn zero_months_costs_nothing() {
        let cost = DelayCost::compute(52_000, 0);
        assert_eq!(cost.text(DelayField::TotalCost), "$0");
        assert_eq!(cost.text(DelayField::MonthlyCost), "$52,000");
    }

    #[test]
    fn outputs_match_by_id_only() {
        assert_eq!(DelayField::from_id("monthly-cost"), Some(DelayField::MonthlyCost));
        assert_eq!(DelayField::from_id("total-cost"), Some(DelayField::TotalCost));
        assert_eq!(DelayField::from_id("yearly-cost"), None);
        assert_eq!(DelayField::from_id(""), None);
    }

    #[test]
    fn recompute_is_idempotent() {
        assert_eq!(DelayCost::compute(52_000, 9), DelayCost::compute(52_000, 9));
    }
}
