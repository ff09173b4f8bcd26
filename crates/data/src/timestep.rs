//! A single time slice of the simulation.

use std::fmt;
use std::sync::Arc;

use chrono::NaiveDate;
use indexmap::IndexMap;

use canteen_calendar::format_date;

use crate::category::Category;
use crate::error::DataError;
use crate::input::Input;
use crate::output::{Output, Values};
use crate::value::{Value, round};

/// Named inputs of a time step.
pub type Inputs = IndexMap<String, Input>;

/// Named deferred outputs of a time step, in scheduling order.
pub type Outputs = IndexMap<String, Output>;

/// Position of a step in time: a calendar date or a bare index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StepDate {
    /// A calendar date.
    Date(NaiveDate),
    /// An integer position with no calendar meaning.
    Index(usize),
}

impl StepDate {
    /// Returns the calendar date, if this step has one.
    pub fn date(self) -> Option<NaiveDate> {
        match self {
            StepDate::Date(d) => Some(d),
            StepDate::Index(_) => None,
        }
    }
}

impl fmt::Display for StepDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepDate::Date(d) => f.write_str(&format_date(*d)),
            StepDate::Index(i) => write!(f, "step {i}"),
        }
    }
}

impl From<NaiveDate> for StepDate {
    fn from(d: NaiveDate) -> Self {
        StepDate::Date(d)
    }
}

impl From<usize> for StepDate {
    fn from(i: usize) -> Self {
        StepDate::Index(i)
    }
}

/// One time slice: named categorised inputs plus scheduled outputs.
///
/// A `TimeStep` is a value: [`add_inputs`](Self::add_inputs) and
/// [`add_outputs`](Self::add_outputs) return a new step and leave `self`
/// untouched. Input and output maps are shared between copies until one of
/// them is changed.
///
/// Invariants:
/// - at most one input has [`Category::Storage`];
/// - outputs are ordered by run order, then category, then name.
#[derive(Debug, Clone)]
pub struct TimeStep {
    date: StepDate,
    inputs: Arc<Inputs>,
    outputs: Arc<Outputs>,
}

impl TimeStep {
    /// Creates a step with no deferred outputs.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MultipleStorage`] if more than one input is
    /// tagged [`Category::Storage`].
    pub fn new(date: impl Into<StepDate>, inputs: Inputs) -> Result<Self, DataError> {
        Self::with_outputs(date, inputs, Outputs::new())
    }

    /// Creates a step with deferred outputs, sorting them into run order.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MultipleStorage`] if more than one input is
    /// tagged [`Category::Storage`].
    pub fn with_outputs(
        date: impl Into<StepDate>,
        inputs: Inputs,
        outputs: impl IntoIterator<Item = (String, Output)>,
    ) -> Result<Self, DataError> {
        let date = date.into();
        check_storage(date, &inputs)?;
        Ok(Self {
            date,
            inputs: Arc::new(inputs),
            outputs: Arc::new(sort_outputs(outputs)),
        })
    }

    /// Returns the step date.
    pub fn date(&self) -> StepDate {
        self.date
    }

    /// Returns all inputs.
    pub fn inputs(&self) -> &Inputs {
        &self.inputs
    }

    /// Returns the deferred outputs in scheduling order.
    pub fn outputs(&self) -> &Outputs {
        &self.outputs
    }

    /// Returns a shared handle to the outputs, for iterating while the step
    /// itself is being replaced.
    pub fn shared_outputs(&self) -> Arc<Outputs> {
        Arc::clone(&self.outputs)
    }

    /// Returns the named input.
    pub fn input(&self, name: &str) -> Option<&Input> {
        self.inputs.get(name)
    }

    /// Returns the named value.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.inputs.get(name).map(Input::value)
    }

    /// Returns the named input as a number, for use by `context`.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MissingInput`] if the input is absent and
    /// [`DataError::NotNumber`] if it is not numeric.
    pub fn number(&self, name: &str, context: &str) -> Result<f64, DataError> {
        let input = self.inputs.get(name).ok_or_else(|| DataError::MissingInput {
            name: name.to_string(),
            date: self.date.to_string(),
            context: context.to_string(),
        })?;
        input.as_f64().ok_or_else(|| DataError::NotNumber {
            name: name.to_string(),
            date: self.date.to_string(),
        })
    }

    /// Returns a new step with `additions` merged over the current inputs.
    ///
    /// Additions replace existing inputs with the same name.
    ///
    /// # Errors
    ///
    /// Returns [`DataError::MultipleStorage`] if the merge leaves more than
    /// one storage input.
    pub fn add_inputs(
        &self,
        additions: impl IntoIterator<Item = (String, Input)>,
    ) -> Result<Self, DataError> {
        let mut inputs = Inputs::clone(&self.inputs);
        for (name, input) in additions {
            inputs.insert(name, input);
        }
        check_storage(self.date, &inputs)?;
        Ok(Self {
            date: self.date,
            inputs: Arc::new(inputs),
            outputs: Arc::clone(&self.outputs),
        })
    }

    /// Returns a new step with `additions` merged into the outputs and the
    /// schedule re-sorted.
    pub fn add_outputs(&self, additions: impl IntoIterator<Item = (String, Output)>) -> Self {
        let merged = self
            .outputs
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .chain(additions);
        Self {
            date: self.date,
            inputs: Arc::clone(&self.inputs),
            outputs: Arc::new(sort_outputs(merged)),
        }
    }

    /// Sum of all numeric inputs tagged `category`.
    ///
    /// Values are summed in name order so the result does not depend on
    /// insertion order.
    pub fn total(&self, category: Category) -> f64 {
        let mut values: Vec<(&str, f64)> = self
            .inputs
            .iter()
            .filter(|(_, i)| i.category() == category)
            .filter_map(|(k, i)| i.as_f64().map(|x| (k.as_str(), x)))
            .collect();
        values.sort_by(|a, b| a.0.cmp(b.0));
        values.iter().map(|(_, x)| x).sum()
    }

    /// Total inflow.
    pub fn inflows(&self) -> f64 {
        self.total(Category::Inflow)
    }

    /// Total outflow.
    pub fn outflows(&self) -> f64 {
        self.total(Category::Outflow)
    }

    /// Storage at the start of the step (0 if none is given).
    pub fn storage(&self) -> f64 {
        self.total(Category::Storage)
    }

    /// Names of the storage inputs.
    pub fn storage_keys(&self) -> Vec<&str> {
        storage_keys(&self.inputs)
    }

    /// Looks up a numeric metric: a named numeric input, or one of the
    /// aggregates `inflows`, `outflows`, `storage`.
    pub fn metric(&self, name: &str) -> Option<f64> {
        if let Some(x) = self.inputs.get(name).and_then(Input::as_f64) {
            return Some(x);
        }
        match name {
            "inflows" => Some(self.inflows()),
            "outflows" => Some(self.outflows()),
            "storage" => Some(self.storage()),
            _ => None,
        }
    }

    /// Human-readable form: `DD Mon YYYY (name: value, ...)`.
    ///
    /// Numbers are rounded to `digits` places and computed values are
    /// tagged `[output]`.
    pub fn display(&self, digits: u32) -> String {
        let body = if self.inputs.is_empty() {
            "none".to_string()
        } else {
            self.inputs
                .iter()
                .map(|(k, i)| {
                    let tag = if i.is_output() { " [output]" } else { "" };
                    format!("{k}: {}{tag}", i.value().display(digits))
                })
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!("{} ({body})", self.date)
    }

    /// Flat record for tabular export, starting with a `date` entry.
    ///
    /// Computed values are dropped unless `include_outputs` is set. Numbers
    /// are not rounded.
    pub fn to_record(&self, include_outputs: bool) -> Values {
        let mut record = Values::new();
        record.insert("date".to_string(), Value::Text(self.date.to_string()));
        for (k, i) in self.inputs.iter() {
            if include_outputs || !i.is_output() {
                record.insert(k.clone(), i.value().clone());
            }
        }
        record
    }

    /// Rounded copy of the numeric inputs, for assertions and reports.
    pub fn rounded(&self, digits: u32) -> IndexMap<String, f64> {
        self.inputs
            .iter()
            .filter_map(|(k, i)| i.as_f64().map(|x| (k.clone(), round(x, digits))))
            .collect()
    }
}

fn storage_keys(inputs: &Inputs) -> Vec<&str> {
    inputs
        .iter()
        .filter(|(_, i)| i.category() == Category::Storage)
        .map(|(k, _)| k.as_str())
        .collect()
}

fn check_storage(date: StepDate, inputs: &Inputs) -> Result<(), DataError> {
    let keys = storage_keys(inputs);
    if keys.len() > 1 {
        return Err(DataError::MultipleStorage {
            date: date.to_string(),
            keys: keys.into_iter().map(str::to_string).collect(),
        });
    }
    Ok(())
}

fn sort_outputs(outputs: impl IntoIterator<Item = (String, Output)>) -> Outputs {
    let mut v: Vec<(String, Output)> = outputs.into_iter().collect();
    v.sort_by(|a, b| a.1.sort_key().cmp(&b.1.sort_key()).then_with(|| a.0.cmp(&b.0)));
    v.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::RunOrder;

    fn inputs(pairs: &[(&str, Input)]) -> Inputs {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn noop(category: Category, run_order: RunOrder) -> Output {
        Output::new(category, run_order, |_, _| Ok(Values::new()))
    }

    #[test]
    fn aggregates_by_category() {
        let ts = TimeStep::new(
            StepDate::Index(0),
            inputs(&[
                ("inflow", Input::inflow(3.0)),
                ("tributary", Input::inflow(2.0)),
                ("storage", Input::storage(10.0)),
                ("diversion", Input::outflow(1.5)),
                ("temp", Input::other(12.0)),
            ]),
        )
        .unwrap();
        assert_eq!(ts.inflows(), 5.0);
        assert_eq!(ts.outflows(), 1.5);
        assert_eq!(ts.storage(), 10.0);
    }

    #[test]
    fn two_storage_inputs_rejected() {
        let err = TimeStep::new(
            StepDate::Index(4),
            inputs(&[("a", Input::storage(1.0)), ("b", Input::storage(2.0))]),
        )
        .unwrap_err();
        assert_eq!(
            err,
            DataError::MultipleStorage {
                date: "step 4".to_string(),
                keys: vec!["a".to_string(), "b".to_string()],
            }
        );
    }

    #[test]
    fn add_inputs_leaves_original_unchanged() {
        let ts = TimeStep::new(StepDate::Index(0), inputs(&[("inflow", Input::inflow(1.0))])).unwrap();
        let next = ts
            .add_inputs([("storage".to_string(), Input::storage(4.0))])
            .unwrap();
        assert_eq!(ts.storage(), 0.0);
        assert!(ts.input("storage").is_none());
        assert_eq!(next.storage(), 4.0);
        assert_eq!(next.inflows(), 1.0);
    }

    #[test]
    fn add_inputs_overrides_existing_key() {
        let ts = TimeStep::new(StepDate::Index(0), inputs(&[("storage", Input::storage(1.0))])).unwrap();
        let next = ts
            .add_inputs([("storage".to_string(), Input::storage(9.0).into_output())])
            .unwrap();
        assert_eq!(next.storage(), 9.0);
        assert!(next.input("storage").unwrap().is_output());
        assert_eq!(next.storage_keys(), vec!["storage"]);
    }

    #[test]
    fn add_inputs_rejects_second_storage_key() {
        let ts = TimeStep::new(StepDate::Index(0), inputs(&[("storage", Input::storage(1.0))])).unwrap();
        let err = ts
            .add_inputs([("volume".to_string(), Input::storage(9.0))])
            .unwrap_err();
        assert!(matches!(err, DataError::MultipleStorage { .. }));
    }

    #[test]
    fn outputs_sorted_by_run_order_then_category() {
        let ts = TimeStep::with_outputs(
            StepDate::Index(0),
            Inputs::new(),
            [
                ("z_post_other".to_string(), noop(Category::Other, RunOrder::PostOperations)),
                ("a_post_outflow".to_string(), noop(Category::Outflow, RunOrder::PostOperations)),
                ("m_pre_storage".to_string(), noop(Category::Storage, RunOrder::PreOperations)),
                ("b_pre_inflow".to_string(), noop(Category::Inflow, RunOrder::PreOperations)),
            ],
        )
        .unwrap();
        let names: Vec<&str> = ts.outputs().keys().map(String::as_str).collect();
        assert_eq!(
            names,
            vec!["b_pre_inflow", "m_pre_storage", "a_post_outflow", "z_post_other"]
        );
    }

    #[test]
    fn add_outputs_resorts() {
        let ts = TimeStep::with_outputs(
            StepDate::Index(0),
            Inputs::new(),
            [("post".to_string(), noop(Category::Other, RunOrder::PostOperations))],
        )
        .unwrap();
        let next = ts.add_outputs([("pre".to_string(), noop(Category::Other, RunOrder::PreOperations))]);
        let names: Vec<&str> = next.outputs().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["pre", "post"]);
        assert_eq!(ts.outputs().len(), 1);
    }

    #[test]
    fn number_reports_missing_and_non_numeric() {
        let ts = TimeStep::new(StepDate::Index(2), inputs(&[("label", Input::other("wet"))])).unwrap();
        assert!(matches!(
            ts.number("demand", "test"),
            Err(DataError::MissingInput { .. })
        ));
        assert_eq!(
            ts.number("label", "test").unwrap_err(),
            DataError::NotNumber {
                name: "label".to_string(),
                date: "step 2".to_string(),
            }
        );
    }

    #[test]
    fn metric_falls_back_to_aggregates() {
        let ts = TimeStep::new(
            StepDate::Index(0),
            inputs(&[("q", Input::inflow(2.0)), ("spill", Input::outflow(1.0))]),
        )
        .unwrap();
        assert_eq!(ts.metric("spill"), Some(1.0));
        assert_eq!(ts.metric("inflows"), Some(2.0));
        assert_eq!(ts.metric("outflows"), Some(1.0));
        assert_eq!(ts.metric("salinity"), None);
    }

    #[test]
    fn display_with_date() {
        let d = NaiveDate::from_ymd_opt(2021, 8, 28).unwrap();
        let ts = TimeStep::new(
            d,
            inputs(&[
                ("inflow", Input::inflow(10.2)),
                ("spill", Input::outflow(1.0).into_output()),
            ]),
        )
        .unwrap();
        assert_eq!(ts.display(0), "28 Aug 2021 (inflow: 10, spill: 1 [output])");
    }

    #[test]
    fn display_without_inputs() {
        let ts = TimeStep::new(StepDate::Index(3), Inputs::new()).unwrap();
        assert_eq!(ts.display(0), "step 3 (none)");
    }

    #[test]
    fn record_filters_outputs() {
        let ts = TimeStep::new(
            StepDate::Index(1),
            inputs(&[
                ("inflow", Input::inflow(1.0)),
                ("spill", Input::outflow(0.5).into_output()),
            ]),
        )
        .unwrap();
        let without = ts.to_record(false);
        assert_eq!(without.len(), 2);
        assert_eq!(without["date"], Value::from("step 1"));
        assert!(!without.contains_key("spill"));
        let with = ts.to_record(true);
        assert_eq!(with["spill"], Value::Number(0.5));
    }
}
