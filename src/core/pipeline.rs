use crate::core::description::build_draft;
use crate::core::filter::PriorityFilter;
use crate::core::submitter::IssueSubmitter;
use crate::domain::model::{CsvRow, ImportSummary, RowOutcome, RowReport};
use crate::domain::ports::{Confirm, IssueTracker};
use crate::utils::error::Result;

/// Drives rows through filter → draft → (confirm) → submit, one at a time.
pub struct ImportPipeline<T: IssueTracker> {
    filter: PriorityFilter,
    submitter: IssueSubmitter<T>,
    confirm: Option<Box<dyn Confirm>>,
}

impl<T: IssueTracker> ImportPipeline<T> {
    pub fn new(filter: PriorityFilter, submitter: IssueSubmitter<T>) -> Self {
        Self {
            filter,
            submitter,
            confirm: None,
        }
    }

    pub fn with_confirmation(mut self, confirm: Box<dyn Confirm>) -> Self {
        self.confirm = Some(confirm);
        self
    }

    /// Handles a single row. Only a failing confirmation prompt is an error;
    /// submission problems are part of the report.
    pub async fn process_row(&self, row: &CsvRow) -> Result<RowReport> {
        if !self.filter.matches(row) {
            tracing::debug!(
                "line {}: priority '{}' does not match '{}'",
                row.line,
                row.priority(),
                self.filter.target()
            );
            return Ok(RowReport {
                line: row.line,
                summary: String::new(),
                outcome: RowOutcome::Filtered,
            });
        }

        let draft = build_draft(row);
        if let Some(confirm) = &self.confirm {
            if !confirm.confirm(row.line, &draft)? {
                return Ok(RowReport {
                    line: row.line,
                    summary: draft.summary,
                    outcome: RowOutcome::Declined,
                });
            }
        }

        tracing::debug!("line {}: submitting \"{}\"", row.line, draft.summary);
        let outcome = self.submitter.submit(&draft).await;
        Ok(RowReport {
            line: row.line,
            summary: draft.summary,
            outcome: RowOutcome::Submitted(outcome),
        })
    }

    /// Consumes the rows in order. A row that cannot be read aborts the run;
    /// every other row produces exactly one report.
    pub async fn run<I, F>(&self, rows: I, mut on_report: F) -> Result<ImportSummary>
    where
        I: IntoIterator<Item = Result<CsvRow>>,
        F: FnMut(&RowReport),
    {
        tracing::info!(
            "Creating issues for rows with priority '{}'",
            self.filter.target()
        );
        let mut summary = ImportSummary::default();

        for row in rows {
            let row = row?;
            let report = self.process_row(&row).await?;
            summary.record(&report);
            on_report(&report);
        }

        tracing::info!("Import finished: {}", summary);
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::JiraSettings;
    use crate::core::loader::BugReportReader;
    use crate::core::submitter::SubmitOptions;
    use crate::core::test_support::{Call, RecordingTracker, ScriptedConfirm, Step};
    use crate::utils::error::ImportError;

    const BUGS: &str = "\
Priority,Description of issue,Additional notes,Platform/URL,Title
Stop ship,Crash on launch,,iOS 17,
Low,Typo in footer,,web,
Stop ship,Cannot log out,Happens after token refresh,,Logout broken
";

    fn pipeline(tracker: RecordingTracker, options: SubmitOptions) -> ImportPipeline<RecordingTracker> {
        let submitter = IssueSubmitter::new(tracker, &JiraSettings::default(), options);
        ImportPipeline::new(PriorityFilter::default(), submitter)
    }

    /// Runs the pipeline over `csv`, keeping each row's line and outcome label.
    async fn run(
        pipeline: &ImportPipeline<RecordingTracker>,
        csv: &str,
    ) -> (ImportSummary, Vec<(usize, &'static str, Option<String>)>) {
        let rows = BugReportReader::from_reader(csv.as_bytes()).unwrap();
        let mut reports = Vec::new();
        let summary = pipeline
            .run(rows, |report| {
                reports.push((report.line, report.outcome.label(), report.status_line()))
            })
            .await
            .unwrap();
        (summary, reports)
    }

    #[tokio::test]
    async fn test_only_matching_rows_are_submitted() {
        let tracker = RecordingTracker::new();
        let (summary, reports) = run(&pipeline(tracker.clone(), SubmitOptions::default()), BUGS).await;

        assert_eq!(summary.read, 3);
        assert_eq!(summary.eligible, 2);
        assert_eq!(summary.created, 2);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(reports[1].1, "filtered");

        let summaries: Vec<String> = tracker
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::Create(issue) => issue.summary,
                other => panic!("unexpected call: {other:?}"),
            })
            .collect();
        assert_eq!(summaries, ["Crash on launch", "Logout broken"]);
    }

    #[tokio::test]
    async fn test_zero_eligible_rows_make_no_calls() {
        let tracker = RecordingTracker::new();
        let csv = "Priority,Description of issue\nLow,Typo\nNice to have,Color\n";
        let (summary, _) = run(&pipeline(tracker.clone(), SubmitOptions::default()), csv).await;

        assert!(tracker.calls().is_empty());
        assert_eq!(summary.eligible, 0);
        assert_eq!(summary.exit_code(), 0);
    }

    #[tokio::test]
    async fn test_failed_row_does_not_abort_run() {
        let tracker = RecordingTracker::new().failing(Step::Create);
        let (summary, reports) = run(&pipeline(tracker.clone(), SubmitOptions::default()), BUGS).await;

        assert_eq!(summary.failed, 2);
        assert_eq!(summary.exit_code(), 1);
        assert_eq!(reports.len(), 3);
        assert!(reports[2].2.as_deref().unwrap().contains("failed"));
    }

    #[tokio::test]
    async fn test_partial_failure_counts_against_exit_code() {
        let tracker = RecordingTracker::new().failing(Step::FindBoard);
        let options = SubmitOptions {
            add_to_sprint: true,
            ..SubmitOptions::default()
        };
        let (summary, _) = run(&pipeline(tracker, options), BUGS).await;

        assert_eq!(summary.created, 0);
        assert_eq!(summary.created_no_sprint, 2);
        assert_eq!(summary.exit_code(), 1);
    }

    #[tokio::test]
    async fn test_declined_rows_are_not_submitted() {
        let tracker = RecordingTracker::new();
        let pipeline = pipeline(tracker.clone(), SubmitOptions::default())
            .with_confirmation(Box::new(ScriptedConfirm::new(&[false, true])));
        let (summary, reports) = run(&pipeline, BUGS).await;

        assert_eq!(summary.declined, 1);
        assert_eq!(summary.created, 1);
        assert_eq!(summary.exit_code(), 0);
        assert_eq!(reports[0], (1, "declined", Some("⏭️  line 1: skipped \"Crash on launch\"".to_string())));
        assert_eq!(tracker.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_unreadable_row_aborts() {
        let tracker = RecordingTracker::new();
        let pipeline = pipeline(tracker.clone(), SubmitOptions::default());
        let rows = vec![
            Ok(CsvRow::default()),
            Err(ImportError::Parse {
                message: "bad record".to_string(),
            }),
        ];

        let result = pipeline.run(rows, |_| {}).await;
        assert!(matches!(result, Err(ImportError::Parse { .. })));
    }
}
