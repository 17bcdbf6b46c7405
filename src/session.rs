//! Calculator session and controller.
//!
//! [`Session`] owns the display state and the evaluation guard. While a job
//! is out at the compute service the session is `Evaluating` and refuses all
//! input; the display only changes once the job has resolved.
//!
//! [`Calculator`] wires a session to a [`ComputeClient`] and keeps the
//! history panel up to date.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::calculator::{
    CalcError, Chain, Edit, EditState, Plan, current_operand, plan_evaluation, square_root,
};
use crate::compute::{ComputeClient, HistoryError, Operation};
use crate::items::HistoryPanel;
use crate::keys::Key;

/// Whether the session is waiting on the compute service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Evaluating,
}

/// Work the session hands to the compute service.
#[derive(Clone, Debug, PartialEq)]
pub enum Job {
    /// A left-to-right operator chain.
    Chain(Chain),
    /// Square root of the number being typed.
    SquareRoot(f64),
    /// A single operation requested directly, bypassing the keypad.
    Direct {
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    },
}

impl Job {
    pub async fn run(&self, client: &dyn ComputeClient) -> Result<f64, CalcError> {
        match self {
            Self::Chain(chain) => chain.run(client).await,
            Self::SquareRoot(value) => square_root(client, *value).await,
            Self::Direct {
                operation,
                num1,
                num2,
            } => Ok(client.compute(*operation, *num1, *num2).await?),
        }
    }
}

/// Display state plus the `Idle`/`Evaluating` guard.
#[derive(Clone, Debug, Default)]
pub struct Session {
    state: EditState,
    phase: Phase,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    /// The expression currently shown.
    pub fn display(&self) -> &str {
        self.state.expression()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn ensure_idle(&self) -> Result<(), CalcError> {
        match self.phase {
            Phase::Idle => Ok(()),
            Phase::Evaluating => {
                warn!("input rejected while evaluating");
                Err(CalcError::Busy)
            }
        }
    }

    /// Apply a keypad edit.
    pub fn edit(&mut self, edit: Edit) -> Result<(), CalcError> {
        self.ensure_idle()?;
        self.state = std::mem::take(&mut self.state).apply(edit);
        Ok(())
    }

    /// Start evaluating the display.
    ///
    /// A lone number is resolved on the spot and `Ok(None)` is returned, as
    /// it is for an expression without tokens. Otherwise the session enters
    /// `Evaluating` and the returned job must be passed back through
    /// [`Session::finish`].
    pub fn begin_evaluation(&mut self) -> Result<Option<Job>, CalcError> {
        self.ensure_idle()?;
        match plan_evaluation(self.display())? {
            None => Ok(None),
            Some(Plan::Bare(value)) => {
                self.state = EditState::with_result(value);
                Ok(None)
            }
            Some(Plan::Chain(chain)) => Ok(Some(self.begin(Job::Chain(chain)))),
        }
    }

    /// Start taking the square root of the number being typed.
    ///
    /// Returns `Ok(None)` when there is no such number.
    pub fn begin_square_root(&mut self) -> Result<Option<Job>, CalcError> {
        self.ensure_idle()?;
        Ok(current_operand(self.display())?.map(|value| self.begin(Job::SquareRoot(value))))
    }

    /// Start a direct call to the compute service.
    pub fn begin_direct(
        &mut self,
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    ) -> Result<Job, CalcError> {
        self.ensure_idle()?;
        Ok(self.begin(Job::Direct {
            operation,
            num1,
            num2,
        }))
    }

    fn begin(&mut self, job: Job) -> Job {
        debug!(?job, "evaluation started");
        self.phase = Phase::Evaluating;
        job
    }

    /// Resolve the running job and return to `Idle`.
    ///
    /// On success the result replaces the display. On failure the display is
    /// left exactly as it was before the job started.
    pub fn finish(&mut self, outcome: Result<f64, CalcError>) -> Result<f64, CalcError> {
        self.phase = Phase::Idle;
        let value = outcome?;
        self.state = EditState::with_result(value);
        Ok(value)
    }

    /// Show a previously computed value as the current result.
    pub fn recall(&mut self, value: f64) -> Result<(), CalcError> {
        self.ensure_idle()?;
        self.state = EditState::with_result(value);
        Ok(())
    }
}

/// A session connected to a compute service.
pub struct Calculator {
    session: Session,
    client: Arc<dyn ComputeClient>,
    history: HistoryPanel,
}

impl Calculator {
    pub fn new(client: Arc<dyn ComputeClient>) -> Self {
        Self {
            session: Session::new(),
            client,
            history: HistoryPanel::default(),
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn display(&self) -> &str {
        self.session.display()
    }

    pub fn history(&self) -> &HistoryPanel {
        &self.history
    }

    /// Name of the compute backend in use.
    pub fn backend(&self) -> &'static str {
        self.client.name()
    }

    /// Handle a keypad key.
    pub async fn press(&mut self, key: Key) -> Result<(), CalcError> {
        match key {
            Key::Digit(c) => self.session.edit(Edit::Digit(c)),
            Key::Operator(op) => self.session.edit(Edit::Operator(op)),
            Key::Backspace => self.session.edit(Edit::Backspace),
            Key::Clear => self.session.edit(Edit::Clear),
            Key::Equals => self.evaluate().await,
            Key::SquareRoot => self.square_root().await,
        }
    }

    /// Press keys in order.
    ///
    /// A failing key does not stop the sequence. Errors worth showing are
    /// collected and returned.
    pub async fn press_keys(&mut self, keys: &[Key]) -> Vec<CalcError> {
        let mut errors = Vec::new();
        for key in keys {
            if let Err(err) = self.press(*key).await
                && err.is_user_visible()
            {
                errors.push(err);
            }
        }
        errors
    }

    /// Evaluate the display left to right.
    pub async fn evaluate(&mut self) -> Result<(), CalcError> {
        if let Some(job) = self.session.begin_evaluation()? {
            self.run(job).await?;
        }
        Ok(())
    }

    /// Replace the display with the square root of the number being typed.
    pub async fn square_root(&mut self) -> Result<(), CalcError> {
        if let Some(job) = self.session.begin_square_root()? {
            self.run(job).await?;
        }
        Ok(())
    }

    /// Run a single operation directly and show its result.
    ///
    /// This is the only way to reach operations without a keypad symbol,
    /// such as `modulo`.
    pub async fn compute_direct(
        &mut self,
        operation: Operation,
        num1: f64,
        num2: Option<f64>,
    ) -> Result<f64, CalcError> {
        let job = self.session.begin_direct(operation, num1, num2)?;
        self.run(job).await
    }

    async fn run(&mut self, job: Job) -> Result<f64, CalcError> {
        let outcome = job.run(self.client.as_ref()).await;
        let value = self.session.finish(outcome)?;
        self.refresh_history().await;
        Ok(value)
    }

    /// Reload the history panel. Failures only show up in the panel.
    pub async fn refresh_history(&mut self) -> &HistoryPanel {
        let result = self.client.list_history().await;
        if let Err(err) = &result {
            warn!(error = %err, "history unavailable");
        }
        self.history = HistoryPanel::from_result(result);
        &self.history
    }

    /// Clear the service's history.
    pub async fn clear_history(&mut self) -> Result<(), HistoryError> {
        self.client.clear_history().await?;
        info!(backend = self.client.name(), "history cleared");
        self.history = HistoryPanel::Entries(Vec::new());
        Ok(())
    }

    /// Load the result of a history item into the display.
    ///
    /// Returns `Ok(false)` when there is no item at `index`.
    pub fn recall(&mut self, index: usize) -> Result<bool, CalcError> {
        let Some(value) = self.history.get(index).map(|item| item.value) else {
            return Ok(false);
        };
        self.session.recall(value)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculator::Operator;
    use crate::compute::{HistoryEntry, LocalCompute, ServiceError};
    use crate::items::FAILED_HISTORY;
    use async_trait::async_trait;

    fn local() -> (Arc<LocalCompute>, Calculator) {
        let service = Arc::new(LocalCompute::new());
        let calculator = Calculator::new(service.clone());
        (service, calculator)
    }

    async fn type_keys(calculator: &mut Calculator, keys: &str) {
        let keys = crate::keys::parse_keys(keys).unwrap();
        calculator.press_keys(&keys).await;
    }

    /// Computes locally but cannot serve history.
    struct HistoryDown(LocalCompute);

    #[async_trait]
    impl ComputeClient for HistoryDown {
        async fn compute(
            &self,
            operation: Operation,
            num1: f64,
            num2: Option<f64>,
        ) -> Result<f64, ServiceError> {
            self.0.compute(operation, num1, num2).await
        }

        async fn list_history(&self) -> Result<Vec<HistoryEntry>, HistoryError> {
            Err(HistoryError::Load("connection refused".to_string()))
        }

        async fn clear_history(&self) -> Result<(), HistoryError> {
            Err(HistoryError::Clear("connection refused".to_string()))
        }

        fn name(&self) -> &'static str {
            "history-down"
        }
    }

    #[tokio::test]
    async fn test_evaluate_is_left_to_right() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "2+3*4").await;
        assert_eq!(calculator.display(), "2+3×4");

        calculator.evaluate().await.unwrap();
        assert_eq!(calculator.display(), "20");
        assert_eq!(calculator.session().state().last_result(), Some(20.0));

        let history = service.list_history().await.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[1].operation, "add");
        assert_eq!((history[1].num1, history[1].num2, history[1].result), (2.0, Some(3.0), 5.0));
        assert_eq!(history[0].operation, "multiply");
        assert_eq!((history[0].num1, history[0].num2, history[0].result), (5.0, Some(4.0), 20.0));
    }

    #[tokio::test]
    async fn test_evaluate_refreshes_history() {
        let (_, mut calculator) = local();
        assert_eq!(calculator.history(), &HistoryPanel::NotLoaded);
        type_keys(&mut calculator, "6/4=").await;
        assert_eq!(calculator.display(), "1.5");
        assert_eq!(calculator.history().items().len(), 1);
        assert_eq!(calculator.history().items()[0].expression, "6 ÷ 4");
    }

    #[tokio::test]
    async fn test_evaluate_empty_and_zero_are_silent_noops() {
        let (service, mut calculator) = local();
        let err = calculator.evaluate().await.unwrap_err();
        assert_eq!(err, CalcError::EmptyExpression);
        assert!(!err.is_user_visible());
        assert_eq!(calculator.display(), "");

        type_keys(&mut calculator, "0").await;
        assert_eq!(calculator.evaluate().await, Err(CalcError::EmptyExpression));
        assert_eq!(calculator.display(), "0");
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_evaluate_trailing_operator_keeps_display() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "5+").await;
        let err = calculator.evaluate().await.unwrap_err();
        assert_eq!(err, CalcError::TrailingOperator);
        assert!(err.is_user_visible());
        assert_eq!(calculator.display(), "5+");
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bare_number_needs_no_service_call() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "0012.50").await;
        calculator.evaluate().await.unwrap();
        assert_eq!(calculator.display(), "12.5");
        assert_eq!(calculator.session().state().last_result(), Some(12.5));
        assert!(service.list_history().await.unwrap().is_empty());
        assert_eq!(calculator.history(), &HistoryPanel::NotLoaded);
    }

    #[tokio::test]
    async fn test_operator_replaces_trailing_operator() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "5+").await;
        calculator
            .press(Key::Operator(Operator::Add))
            .await
            .unwrap();
        assert_eq!(calculator.display(), "5+");
        calculator
            .press(Key::Operator(Operator::Multiply))
            .await
            .unwrap();
        assert_eq!(calculator.display(), "5×");
    }

    #[tokio::test]
    async fn test_digit_after_result_starts_new_expression() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "2+3*4=").await;
        assert_eq!(calculator.display(), "20");
        calculator.press(Key::Digit('3')).await.unwrap();
        assert_eq!(calculator.display(), "3");
    }

    #[tokio::test]
    async fn test_result_reused_by_operator() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "2+3=*2=").await;
        assert_eq!(calculator.display(), "10");
    }

    #[tokio::test]
    async fn test_negative_result_continues_chain() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "2-7=+3=").await;
        assert_eq!(calculator.display(), "-2");
    }

    #[tokio::test]
    async fn test_grouped_result_continues_chain() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "999+1=+1=").await;
        assert_eq!(calculator.display(), "1,001");
    }

    #[tokio::test]
    async fn test_mid_chain_failure_keeps_display_without_rollback() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "8/0*2").await;
        let err = calculator.evaluate().await.unwrap_err();
        assert_eq!(err.to_string(), "Division by zero is not allowed");
        assert_eq!(calculator.display(), "8÷0×2");
        assert_eq!(calculator.session().phase(), Phase::Idle);
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_partial_chain_progress_is_not_rolled_back() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "2+3/0").await;
        let err = calculator.evaluate().await.unwrap_err();
        assert!(matches!(err, CalcError::Service(ServiceError::Rejected(_))));

        // The display never shows the folded partial result
        assert_eq!(calculator.display(), "2+3÷0");

        // The step that ran before the failure stays recorded by the service
        let history = service.list_history().await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].result, 5.0);

        // The expression is still editable
        calculator.press(Key::Backspace).await.unwrap();
        calculator.press(Key::Digit('5')).await.unwrap();
        calculator.evaluate().await.unwrap();
        assert_eq!(calculator.display(), "1");
    }

    #[tokio::test]
    async fn test_square_root_replaces_whole_display() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "12+16").await;
        calculator.square_root().await.unwrap();
        assert_eq!(calculator.display(), "4");
        assert!(calculator.session().state().is_post_result());
    }

    #[tokio::test]
    async fn test_square_root_without_operand_is_noop() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "12+").await;
        calculator.square_root().await.unwrap();
        assert_eq!(calculator.display(), "12+");
        calculator.press(Key::Clear).await.unwrap();
        calculator.square_root().await.unwrap();
        assert_eq!(calculator.display(), "");
        assert!(service.list_history().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_square_root_of_negative_surfaces_error() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "2-9=").await;
        assert_eq!(calculator.display(), "-7");
        let err = calculator.square_root().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot calculate square root of negative number"
        );
        assert_eq!(calculator.display(), "-7");
    }

    #[test]
    fn test_input_rejected_while_evaluating() {
        let mut session = Session::new();
        for c in "1+2".chars() {
            let edit = match Operator::from_symbol(c) {
                Some(op) => Edit::Operator(op),
                None => Edit::Digit(c),
            };
            session.edit(edit).unwrap();
        }

        let job = session.begin_evaluation().unwrap();
        assert!(matches!(job, Some(Job::Chain(_))));
        assert_eq!(session.phase(), Phase::Evaluating);

        assert_eq!(session.edit(Edit::Digit('9')), Err(CalcError::Busy));
        assert_eq!(session.edit(Edit::Clear), Err(CalcError::Busy));
        assert_eq!(session.begin_evaluation(), Err(CalcError::Busy));
        assert_eq!(session.begin_square_root(), Err(CalcError::Busy));
        assert_eq!(session.recall(1.0), Err(CalcError::Busy));
        assert_eq!(session.display(), "1+2");

        assert_eq!(session.finish(Ok(3.0)), Ok(3.0));
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.display(), "3");
        session.edit(Edit::Digit('9')).unwrap();
        assert_eq!(session.display(), "9");
    }

    #[test]
    fn test_failed_job_returns_to_idle() {
        let mut session = Session::new();
        session.edit(Edit::Digit('4')).unwrap();
        session.edit(Edit::Operator(Operator::Divide)).unwrap();
        session.edit(Edit::Digit('0')).unwrap();
        session.begin_evaluation().unwrap();

        let outcome = Err(CalcError::Service(ServiceError::Transport(
            "timed out".to_string(),
        )));
        assert!(session.finish(outcome).is_err());
        assert_eq!(session.phase(), Phase::Idle);
        assert_eq!(session.display(), "4÷0");
    }

    #[tokio::test]
    async fn test_modulo_reachable_directly() {
        let (service, mut calculator) = local();
        let value = calculator
            .compute_direct(Operation::Modulo, 17.0, Some(5.0))
            .await
            .unwrap();
        assert_eq!(value, 2.0);
        assert_eq!(calculator.display(), "2");
        assert_eq!(service.list_history().await.unwrap()[0].operation, "modulo");
        assert_eq!(calculator.history().items()[0].expression, "17 mod 5");
    }

    #[tokio::test]
    async fn test_recall_history_item() {
        let (_, mut calculator) = local();
        type_keys(&mut calculator, "40+2=c").await;
        assert_eq!(calculator.display(), "");

        assert_eq!(calculator.recall(0), Ok(true));
        assert_eq!(calculator.display(), "42");
        assert!(calculator.session().state().is_post_result());
        assert_eq!(calculator.recall(5), Ok(false));
    }

    #[tokio::test]
    async fn test_history_failure_degrades_to_placeholder() {
        let mut calculator = Calculator::new(Arc::new(HistoryDown(LocalCompute::new())));
        type_keys(&mut calculator, "1+1").await;
        calculator.evaluate().await.unwrap();
        assert_eq!(calculator.display(), "2");
        assert_eq!(calculator.history().placeholder(), Some(FAILED_HISTORY));
        assert!(calculator.clear_history().await.is_err());
    }

    #[tokio::test]
    async fn test_press_keys_reports_visible_errors_and_continues() {
        let (_, mut calculator) = local();
        let keys = crate::keys::parse_keys("=5+=2=").unwrap();
        let errors = calculator.press_keys(&keys).await;
        assert_eq!(errors, vec![CalcError::TrailingOperator]);
        assert_eq!(calculator.display(), "7");
    }

    #[tokio::test]
    async fn test_clear_history() {
        let (service, mut calculator) = local();
        type_keys(&mut calculator, "1+1=").await;
        calculator.clear_history().await.unwrap();
        assert!(service.list_history().await.unwrap().is_empty());
        assert!(calculator.history().items().is_empty());
        assert_eq!(calculator.backend(), "local");
    }
}
