use std::rc::Rc;

use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlInputElement};

use crate::config::RoiDefaults;
use crate::dom::{self, SetupError};
use crate::format::{currency, parse_or};

const CALCULATOR_ID: &str = "roi-calculator";
const SLIDER: &str = ".slider";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiInputs {
    pub sales_reps: i64,
    pub cs_reps: i64,
    pub avg_deal_size: i64,
    pub close_rate: i64,
    pub cs_efficiency: i64,
}

impl From<&RoiDefaults> for RoiInputs {
    fn from(d: &RoiDefaults) -> Self {
        Self {
            sales_reps: d.sales_reps,
            cs_reps: d.cs_reps,
            avg_deal_size: d.avg_deal_size,
            close_rate: d.close_rate,
            cs_efficiency: d.cs_efficiency,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoiOutputs {
    pub additional_deals: i64,
    pub additional_revenue: i64,
    pub annual_value: i64,
}

impl RoiInputs {
    /// Deals are rounded once; revenue figures build on the rounded count.
    pub fn compute(&self) -> RoiOutputs {
        let deals = self.sales_reps as f64 * self.close_rate as f64 / 100.0
            * (self.cs_efficiency as f64 / 100.0);
        let additional_deals = deals.round() as i64;
        let additional_revenue = additional_deals.saturating_mul(self.avg_deal_size);
        RoiOutputs {
            additional_deals,
            additional_revenue,
            annual_value: additional_revenue.saturating_mul(12),
        }
    }
}

impl RoiOutputs {
    pub fn deals_text(&self) -> String {
        self.additional_deals.to_string()
    }

    pub fn revenue_text(&self) -> String {
        currency(self.additional_revenue)
    }

    pub fn annual_text(&self) -> String {
        currency(self.annual_value)
    }
}

struct RoiCalculator {
    defaults: RoiInputs,
    sales_reps: Option<HtmlInputElement>,
    cs_reps: Option<HtmlInputElement>,
    avg_deal_size: Option<HtmlInputElement>,
    close_rate: Option<HtmlInputElement>,
    cs_efficiency: Option<HtmlInputElement>,
    deals_out: Option<Element>,
    revenue_out: Option<Element>,
    annual_out: Option<Element>,
}

fn input(document: &Document, id: &str) -> Option<HtmlInputElement> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
}

fn read(input: &Option<HtmlInputElement>, default: i64) -> i64 {
    parse_or(input.as_ref().map(|i| i.value()), default)
}

fn write(output: &Option<Element>, text: &str) {
    if let Some(el) = output {
        el.set_text_content(Some(text));
    }
}

impl RoiCalculator {
    fn new(document: &Document, defaults: &RoiDefaults) -> Self {
        Self {
            defaults: defaults.into(),
            sales_reps: input(document, "sales-reps"),
            cs_reps: input(document, "cs-reps"),
            avg_deal_size: input(document, "avg-deal-size"),
            close_rate: input(document, "close-rate"),
            cs_efficiency: input(document, "cs-efficiency"),
            deals_out: document.get_element_by_id("additional-deals"),
            revenue_out: document.get_element_by_id("additional-revenue"),
            annual_out: document.get_element_by_id("annual-value"),
        }
    }

    fn inputs(&self) -> RoiInputs {
        let d = &self.defaults;
        RoiInputs {
            sales_reps: read(&self.sales_reps, d.sales_reps),
            cs_reps: read(&self.cs_reps, d.cs_reps),
            avg_deal_size: read(&self.avg_deal_size, d.avg_deal_size),
            close_rate: read(&self.close_rate, d.close_rate),
            cs_efficiency: read(&self.cs_efficiency, d.cs_efficiency),
        }
    }

    fn update(&self) {
        let outputs = self.inputs().compute();
        write(&self.deals_out, &outputs.deals_text());
        write(&self.revenue_out, &outputs.revenue_text());
        write(&self.annual_out, &outputs.annual_text());
    }
}

pub fn attach(document: &Document, defaults: &RoiDefaults) -> Result<(), SetupError> {
    let root = document
        .get_element_by_id(CALCULATOR_ID)
        .ok_or(SetupError::Missing("#roi-calculator"))?;

    let calculator = Rc::new(RoiCalculator::new(document, defaults));
    for slider in dom::elements(root.query_selector_all(SLIDER)) {
        let calculator = calculator.clone();
        if let Err(e) = dom::listen(&slider, "input", move |_| calculator.update()) {
            debug!("ROI slider not wired: {}", e);
        }
    }
    calculator.update();
    Ok(())
}
