//! Dataset flows: the toggle-gated tips chart and upload-and-plot.

use std::path::{Path, PathBuf};

use crate::chart::{render_bar_chart_png, BarChartData, ChartRequest};
use crate::data::TipsSource;
use crate::table::{TextTable, UploadedTable};

use super::market::failure_message;

/// Rows shown in dataset previews.
pub const DATASET_PREVIEW_ROWS: usize = 10;

/// File name of the tips chart export.
pub const TIPS_EXPORT_NAME: &str = "tips_barplot.png";

pub const TIPS_TITLE: &str = "Total bill by day of week and customer sex";

/// What the tips panel shows when enabled.
#[derive(Debug, Clone)]
pub struct TipsReport {
    pub preview: TextTable,
    pub chart: BarChartData,
    /// Most recently written PNG.
    pub export: PathBuf,
}

#[derive(Debug, Clone)]
pub enum TipsOutcome {
    Ready(Box<TipsReport>),
    Failed(String),
}

/// Loads the tips dataset once per session and renders its chart.
pub struct TipsFlow {
    source: TipsSource,
    export_dir: PathBuf,
    table: Option<UploadedTable>,
}

impl TipsFlow {
    pub fn new(source: TipsSource, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            export_dir: export_dir.into(),
            table: None,
        }
    }

    pub fn request() -> ChartRequest {
        ChartRequest::new("day", "total_bill", Some("sex".to_string()))
    }

    pub fn export_path(&self) -> PathBuf {
        self.export_dir.join(TIPS_EXPORT_NAME)
    }

    fn table(&mut self) -> Result<&UploadedTable, String> {
        if self.table.is_none() {
            let table = self.source.load().map_err(|e| failure_message(&e))?;
            self.table = Some(table);
        }
        self.table
            .as_ref()
            .ok_or_else(|| failure_message(&"tips dataset unavailable"))
    }

    /// Preview, aggregate, and write the PNG artifact.
    pub fn run(&mut self) -> TipsOutcome {
        let export = self.export_path();
        let table = match self.table() {
            Ok(table) => table,
            Err(message) => return TipsOutcome::Failed(message),
        };

        let result = (|| -> Result<TipsReport, String> {
            let preview = table
                .head(DATASET_PREVIEW_ROWS)
                .map_err(|e| failure_message(&e))?;
            let mut chart = BarChartData::from_table(table, &Self::request())
                .map_err(|e| failure_message(&e))?;
            chart.title = TIPS_TITLE.to_string();
            render_bar_chart_png(&chart, &export).map_err(|e| failure_message(&e))?;
            Ok(TipsReport {
                preview,
                chart,
                export: export.clone(),
            })
        })();

        match result {
            Ok(report) => TipsOutcome::Ready(Box::new(report)),
            Err(message) => TipsOutcome::Failed(message),
        }
    }
}

/// Result of pressing the build trigger.
#[derive(Debug, Clone)]
pub enum PlotOutcome {
    Ready(BarChartData),
    Failed(String),
}

/// An uploaded table plus the current axis selections.
///
/// Selections are indices into `x_options()` / `group_options()`; changing
/// them never redraws the chart, only `build()` does.
#[derive(Debug, Clone)]
pub struct UploadSession {
    table: UploadedTable,
    preview: TextTable,
    pub x: usize,
    pub y: usize,
    /// Index into `group_options()`; 0 is "none".
    pub group: usize,
    plot: Option<PlotOutcome>,
}

impl UploadSession {
    pub fn new(table: UploadedTable) -> Result<Self, String> {
        let preview = table
            .head(DATASET_PREVIEW_ROWS)
            .map_err(|e| failure_message(&e))?;
        Ok(Self {
            table,
            preview,
            x: 0,
            y: 0,
            group: 0,
            plot: None,
        })
    }

    pub fn open(path: &Path) -> Result<Self, String> {
        let table = UploadedTable::from_path(path).map_err(|e| failure_message(&e))?;
        Self::new(table)
    }

    pub fn table(&self) -> &UploadedTable {
        &self.table
    }

    pub fn preview(&self) -> &TextTable {
        &self.preview
    }

    pub fn plot(&self) -> Option<&PlotOutcome> {
        self.plot.as_ref()
    }

    /// X and Y choices: every column.
    pub fn x_options(&self) -> Vec<String> {
        self.table.column_names()
    }

    /// `None` first, then each categorical column.
    pub fn group_options(&self) -> Vec<Option<String>> {
        std::iter::once(None)
            .chain(self.table.categorical_columns().into_iter().map(Some))
            .collect()
    }

    /// Select columns by name. Unknown names leave the selection unchanged.
    pub fn select_x(&mut self, column: &str) {
        if let Some(i) = self.x_options().iter().position(|c| c == column) {
            self.x = i;
        }
    }

    pub fn select_y(&mut self, column: &str) {
        if let Some(i) = self.x_options().iter().position(|c| c == column) {
            self.y = i;
        }
    }

    pub fn select_group(&mut self, column: Option<&str>) {
        let options = self.group_options();
        if let Some(i) = options.iter().position(|o| o.as_deref() == column) {
            self.group = i;
        }
    }

    /// The request the current selections describe.
    pub fn request(&self) -> Option<ChartRequest> {
        let columns = self.x_options();
        let x = columns.get(self.x)?.clone();
        let y = columns.get(self.y)?.clone();
        let group = self.group_options().get(self.group).cloned().flatten();
        Some(ChartRequest::new(x, y, group))
    }

    /// Build trigger: aggregate the current request into a chart.
    pub fn build(&mut self) -> &PlotOutcome {
        let outcome = match self.request() {
            Some(request) => match BarChartData::from_table(&self.table, &request) {
                Ok(data) => PlotOutcome::Ready(data),
                Err(e) => {
                    tracing::warn!(error = %e, title = %request.title(), "plot build failed");
                    PlotOutcome::Failed(failure_message(&e))
                }
            },
            None => PlotOutcome::Failed(failure_message(&"the uploaded table has no columns")),
        };
        self.plot.insert(outcome)
    }

    /// Write the last built chart as `<y>_vs_<x>.png` under `dir`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, String> {
        let Some(PlotOutcome::Ready(data)) = &self.plot else {
            return Err(failure_message(&"build a chart before exporting"));
        };
        let name = format!("{}_vs_{}.png", sanitize(&data.y_label), sanitize(&data.x_label));
        let path = dir.join(name);
        render_bar_chart_png(data, &path).map_err(|e| failure_message(&e))?;
        Ok(path)
    }
}

fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload(csv: &str) -> UploadSession {
        UploadSession::new(UploadedTable::from_bytes("u.csv", csv.as_bytes().to_vec()).unwrap()).unwrap()
    }

    #[test]
    fn selections_default_to_first_column() {
        let u = upload("a,b\n1,x\n");
        let req = u.request().unwrap();
        assert_eq!(req.x, "a");
        assert_eq!(req.y, "a");
        assert_eq!(req.group, None);
    }

    #[test]
    fn selection_change_does_not_build() {
        let mut u = upload("day,total_bill\nSun,1.0\n");
        u.select_y("total_bill");
        assert!(u.plot().is_none());
        assert!(matches!(u.build(), PlotOutcome::Ready(_)));
        u.select_x("total_bill");
        // last built chart stays until the next trigger
        match u.plot() {
            Some(PlotOutcome::Ready(data)) => assert_eq!(data.x_label, "day"),
            other => panic!("expected built chart, got {other:?}"),
        }
    }

    #[test]
    fn unknown_selection_is_ignored() {
        let mut u = upload("a,b\n1,x\n");
        u.select_x("b");
        u.select_x("zzz");
        assert_eq!(u.x, 1);
        u.select_group(Some("a"));
        assert_eq!(u.group, 0);
    }

    #[test]
    fn export_requires_a_built_chart() {
        let u = upload("a,b\n1,x\n");
        assert!(u.export(Path::new(".")).is_err());
    }

    #[test]
    fn sanitizes_export_names() {
        assert_eq!(sanitize("total bill/$"), "total_bill__");
    }
}
