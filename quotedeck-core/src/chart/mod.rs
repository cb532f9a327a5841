//! Chart requests, the data they aggregate to, and PNG rendering.

pub mod render;

use std::collections::HashMap;

use chrono::NaiveDate;
use thiserror::Error;

use crate::domain::PriceSeries;
use crate::table::{TableError, UploadedTable};

pub use render::{render_bar_chart_png, render_line_chart_png};

#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Table(#[from] TableError),

    #[error("column '{0}' has no numeric values to plot")]
    NotNumeric(String),

    #[error("nothing to plot: every row has a missing value")]
    NoRows,

    #[error("failed to render chart: {0}")]
    Render(String),
}

/// Which columns to plot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChartRequest {
    pub x: String,
    pub y: String,
    pub group: Option<String>,
}

impl ChartRequest {
    pub fn new(x: impl Into<String>, y: impl Into<String>, group: Option<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            group,
        }
    }

    /// `"<Y> vs <X>"`, plus `" grouped by <G>"` when grouped.
    pub fn title(&self) -> String {
        match &self.group {
            Some(group) => format!("{} vs {} grouped by {group}", self.y, self.x),
            None => format!("{} vs {}", self.y, self.x),
        }
    }

    /// Every named column must exist; the group column must be categorical.
    pub fn validate(&self, table: &UploadedTable) -> Result<(), ChartError> {
        table.is_categorical(&self.x)?;
        table.is_categorical(&self.y)?;
        if let Some(group) = &self.group {
            if !table.is_categorical(group)? {
                return Err(TableError::NotCategorical {
                    column: group.clone(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Mean of `y` per X category and (optional) group, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct BarChartData {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// X categories: ascending for a numeric X column, else first-appearance order.
    pub categories: Vec<String>,
    /// Group names in first-appearance order; one unnamed group when ungrouped.
    pub groups: Vec<String>,
    /// `values[group][category]`; `None` where a combination has no rows.
    pub values: Vec<Vec<Option<f64>>>,
}

impl BarChartData {
    /// Aggregate the table for a request.
    pub fn from_table(table: &UploadedTable, request: &ChartRequest) -> Result<Self, ChartError> {
        request.validate(table)?;

        let xs = table.text_column(&request.x)?;
        let ys = table.numeric_column(&request.y)?;
        if ys.iter().all(Option::is_none) {
            return Err(ChartError::NotNumeric(request.y.clone()));
        }
        let gs = match &request.group {
            Some(group) => Some(table.text_column(group)?),
            None => None,
        };

        let mut categories = Indexer::default();
        let mut groups = Indexer::default();
        if gs.is_none() {
            groups.index(String::new());
        }
        // (sum, count) per (group, category)
        let mut sums: HashMap<(usize, usize), (f64, usize)> = HashMap::new();

        for (row, (x, y)) in xs.into_iter().zip(ys).enumerate() {
            let (Some(x), Some(y)) = (x, y) else { continue };
            let g = match &gs {
                Some(gs) => match gs.get(row).cloned().flatten() {
                    Some(g) => groups.index(g),
                    None => continue,
                },
                None => 0,
            };
            let c = categories.index(x);
            let slot = sums.entry((g, c)).or_insert((0.0, 0));
            slot.0 += y;
            slot.1 += 1;
        }

        if sums.is_empty() {
            return Err(ChartError::NoRows);
        }

        let mut order: Vec<usize> = (0..categories.names.len()).collect();
        if !table.is_categorical(&request.x)? {
            let key = |c: usize| categories.names[c].parse::<f64>().unwrap_or(f64::NAN);
            order.sort_by(|a, b| key(*a).total_cmp(&key(*b)));
        }

        let values = (0..groups.names.len())
            .map(|g| {
                order
                    .iter()
                    .map(|&c| sums.get(&(g, c)).map(|(sum, n)| sum / *n as f64))
                    .collect()
            })
            .collect();

        Ok(Self {
            title: request.title(),
            x_label: request.x.clone(),
            y_label: request.y.clone(),
            categories: order.iter().map(|&c| categories.names[c].clone()).collect(),
            groups: groups.names,
            values,
        })
    }

    pub fn is_grouped(&self) -> bool {
        !(self.groups.len() == 1 && self.groups[0].is_empty())
    }

    /// Largest bar height, or zero when every bar is absent.
    pub fn max_value(&self) -> f64 {
        self.values
            .iter()
            .flatten()
            .flatten()
            .copied()
            .fold(0.0, f64::max)
    }

    pub fn value(&self, group: usize, category: usize) -> Option<f64> {
        self.values.get(group).and_then(|g| g.get(category)).copied().flatten()
    }
}

/// Closing prices over time.
#[derive(Debug, Clone, PartialEq)]
pub struct LineChartData {
    pub title: String,
    pub points: Vec<(NaiveDate, f64)>,
}

impl LineChartData {
    pub fn close_of(series: &PriceSeries) -> Self {
        Self {
            title: format!("{} close price", series.symbol),
            points: series.close_points(),
        }
    }

    /// `(min, max)` of the plotted values.
    pub fn value_bounds(&self) -> Option<(f64, f64)> {
        if self.points.is_empty() {
            return None;
        }
        let min = self.points.iter().map(|p| p.1).fold(f64::INFINITY, f64::min);
        let max = self.points.iter().map(|p| p.1).fold(f64::NEG_INFINITY, f64::max);
        Some((min, max))
    }
}

/// Assigns dense indices to names in first-seen order.
#[derive(Default)]
struct Indexer {
    names: Vec<String>,
    lookup: HashMap<String, usize>,
}

impl Indexer {
    fn index(&mut self, name: String) -> usize {
        if let Some(&i) = self.lookup.get(&name) {
            return i;
        }
        let i = self.names.len();
        self.lookup.insert(name.clone(), i);
        self.names.push(name);
        i
    }
}
