//! # Calculator Session
//!
//! State of one calculator page: the form input being edited, the issues
//! from the last submit, and the result once evaluation succeeds. The same
//! session type drives every calculator; only the borrowed definition differs.
//!
//! ```text
//! Editing --submit ok--> Results --set/clear/edit--> Editing
//!    ^                                                  |
//!    +---------------- submit err (issues kept) --------+
//! ```
//!
//! ## Example
//!
//! ```rust
//! use calc_core::registry;
//! use calc_core::session::CalculatorSession;
//!
//! let mut session = CalculatorSession::open(registry::global(), "owen").unwrap();
//! session.set("weightKg", 70.0);
//! assert!(session.submit().is_err());
//! assert!(session.field_issue("sex").is_some());
//!
//! session.set("sex", "male");
//! let rmr = session.submit().unwrap().number("rmr");
//! assert_eq!(rmr, Some(1593.0));
//! ```

use chrono::{DateTime, Utc};
use tracing::debug;
use uuid::Uuid;

use crate::definition::CalculatorDefinition;
use crate::errors::{CalcError, CalcResult, FieldIssue};
use crate::input::{RawInput, RawValue};
use crate::pdf::{self, ReportMeta};
use crate::registry::CalculatorRegistry;
use crate::result::CalculatorResult;

/// Where the page is in its editing / results cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    Editing,
    Results(CalculatorResult),
}

/// One calculator page.
#[derive(Debug, Clone)]
pub struct CalculatorSession<'a> {
    pub id: Uuid,
    pub started_at: DateTime<Utc>,
    definition: &'a CalculatorDefinition,
    input: RawInput,
    state: SessionState,
    issues: Vec<FieldIssue>,
}

impl<'a> CalculatorSession<'a> {
    pub fn new(definition: &'a CalculatorDefinition) -> Self {
        Self {
            id: Uuid::new_v4(),
            started_at: Utc::now(),
            definition,
            input: RawInput::new(),
            state: SessionState::Editing,
            issues: Vec::new(),
        }
    }

    /// Start a session for calculator `id`, or `NotFound`.
    pub fn open(registry: &'a CalculatorRegistry, id: &str) -> CalcResult<Self> {
        let definition = registry.get(id)?;
        let session = Self::new(definition);
        debug!(session = %session.id, calculator = id, "session opened");
        Ok(session)
    }

    pub fn definition(&self) -> &'a CalculatorDefinition {
        self.definition
    }

    pub fn input(&self) -> &RawInput {
        &self.input
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Result of the last successful submit, unless edited since
    pub fn result(&self) -> Option<&CalculatorResult> {
        match &self.state {
            SessionState::Results(result) => Some(result),
            SessionState::Editing => None,
        }
    }

    /// Issues from the last failed submit
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Inline message for one field, if it failed the last submit
    pub fn field_issue(&self, field: &str) -> Option<&FieldIssue> {
        self.issues.iter().find(|i| i.field == field)
    }

    /// Edit a field. Any result on screen is discarded.
    pub fn set(&mut self, field: &str, value: impl Into<RawValue>) {
        self.input.set(field, value);
        self.touch(field);
    }

    /// Empty a field. Any result on screen is discarded.
    pub fn clear(&mut self, field: &str) {
        self.input.remove(field);
        self.touch(field);
    }

    /// Replace the whole form (e.g., loaded from a file)
    pub fn load(&mut self, input: RawInput) {
        self.input = input;
        self.issues.clear();
        self.state = SessionState::Editing;
    }

    /// Back to editing with the current input kept
    pub fn edit(&mut self) {
        self.state = SessionState::Editing;
    }

    /// Evaluate the current input.
    ///
    /// On a validation or domain failure the field issues are kept for
    /// [`field_issue`](Self::field_issue) and the error is returned.
    pub fn submit(&mut self) -> CalcResult<&CalculatorResult> {
        match self.definition.calculate(&self.input) {
            Ok(result) => {
                debug!(session = %self.id, calculator = self.definition.id, "results ready");
                self.issues.clear();
                self.state = SessionState::Results(result);
                self.result().ok_or(CalcError::NoResult)
            }
            Err(err) => {
                self.issues = err.field_issues().to_vec();
                self.state = SessionState::Editing;
                Err(err)
            }
        }
    }

    /// Typst source of the report for the current result
    pub fn report_typst(&self, meta: &ReportMeta) -> CalcResult<String> {
        let result = self.result().ok_or(CalcError::NoResult)?;
        Ok(pdf::report_typst(self.definition, result, meta))
    }

    /// PDF of the current result, or `NoResult` before a successful submit
    pub fn export_pdf(&self, meta: &ReportMeta) -> CalcResult<Vec<u8>> {
        let result = self.result().ok_or(CalcError::NoResult)?;
        pdf::render_result_pdf(self.definition, result, meta)
    }

    fn touch(&mut self, field: &str) {
        self.state = SessionState::Editing;
        self.issues.retain(|i| i.field != field);
    }
}
