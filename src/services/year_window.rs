use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::models::{AnnualReturnPoint, YearWindowOption};

/// Options are offered in steps of this many years.
pub const WINDOW_STEP: usize = 5;
/// No option offers more than this many years.
pub const MAX_WINDOW_YEARS: usize = 20;

/// Trailing-years window over an annual return series.
///
/// Built once per fetched series and replaced, never patched, when the
/// series changes. Selecting a window only moves which suffix of the series
/// is visible; the series itself is never modified.
#[derive(Debug, Clone, PartialEq)]
pub struct YearWindow {
    series: Vec<AnnualReturnPoint>,
    options: Vec<YearWindowOption>,
    selected: usize,
}

impl YearWindow {
    pub fn new(series: Vec<AnnualReturnPoint>) -> Self {
        let len = series.len();

        let (options, selected) = if len <= WINDOW_STEP {
            // Short histories offer a single "everything" option.
            (vec![YearWindowOption { value: len, label: len }], len)
        } else {
            let options = (WINDOW_STEP..=len.min(MAX_WINDOW_YEARS))
                .step_by(WINDOW_STEP)
                .map(|years| YearWindowOption { value: years, label: years })
                .collect();
            (options, WINDOW_STEP)
        };

        Self { series, options, selected }
    }

    pub fn options(&self) -> &[YearWindowOption] {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn series(&self) -> &[AnnualReturnPoint] {
        &self.series
    }

    /// Points currently on screen.
    ///
    /// Any selection below [`WINDOW_STEP`] shows the whole series rather
    /// than the last `selected` points. Callers rely on this for short
    /// histories, whose single option equals their length.
    pub fn visible(&self) -> &[AnnualReturnPoint] {
        if self.selected < WINDOW_STEP {
            return &self.series;
        }
        let keep = self.selected.min(self.series.len());
        &self.series[self.series.len() - keep..]
    }

    pub fn select(&mut self, years: usize) -> &[AnnualReturnPoint] {
        tracing::debug!("Year window changed from {} to {}", self.selected, years);
        self.selected = years;
        self.visible()
    }
}

impl Serialize for YearWindow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("YearWindow", 3)?;
        state.serialize_field("options", &self.options)?;
        state.serialize_field("selected", &self.selected)?;
        state.serialize_field("visible", self.visible())?;
        state.end()
    }
}
