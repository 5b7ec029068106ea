//! Application state and event handling for the terminal calculator.

use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::info;

use crate::clipboard::{ClipboardCopier, ConfirmTimer, CopyOutcome};
use crate::sizing::RiskCalculator;

use super::form::{Field, Form};
use super::results::{RegionId, ResultPanel};

/// Copy button bound to one output region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyControl {
    pub target: RegionId,
    pub timer: ConfirmTimer,
}

impl CopyControl {
    fn new(target: RegionId) -> Self {
        Self {
            target,
            timer: ConfirmTimer::default(),
        }
    }
}

/// What keyboard focus is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Input(Field),
    Calculate,
    Copy(usize),
}

pub struct App {
    calculator: RiskCalculator,
    copier: ClipboardCopier,
    outcomes: mpsc::UnboundedSender<CopyOutcome<usize>>,

    pub form: Form,
    pub results: ResultPanel,
    pub controls: Vec<CopyControl>,
    pub focus: Focus,
    /// Blocking notice; input is ignored until dismissed
    pub notice: Option<String>,
    pub should_quit: bool,
}

impl App {
    /// Wire the calculator and copier to a fresh form.
    ///
    /// Copy outcomes are delivered on `outcomes` and must be fed back through
    /// [`App::on_copy_outcome`].
    pub fn new(
        calculator: RiskCalculator,
        copier: ClipboardCopier,
        outcomes: mpsc::UnboundedSender<CopyOutcome<usize>>,
    ) -> Self {
        let controls = [RegionId::Lot1, RegionId::Risk1, RegionId::Lot2, RegionId::Risk2]
            .into_iter()
            .map(CopyControl::new)
            .collect();

        Self {
            calculator,
            copier,
            outcomes,
            form: Form::default(),
            results: ResultPanel::default(),
            controls,
            focus: Focus::Input(Field::Capital1),
            notice: None,
            should_quit: false,
        }
    }

    /// Run the calculator on the current form.
    ///
    /// On failure the notice is raised and the results keep their old values.
    pub fn calculate(&mut self) {
        let calculated = self.form.inputs().and_then(|inputs| {
            let calc = self.calculator.calculate(&inputs)?;
            info!(
                capital_1 = %inputs.capital_account_1,
                capital_2 = %inputs.capital_account_2,
                risk_pct = %inputs.risk_percent,
                stop_loss = %inputs.stop_loss_pips,
                "Calculated position sizes"
            );
            Ok(calc)
        });

        match calculated {
            Ok(calc) => self.results.apply(&calc),
            Err(e) => self.notice = Some(e.to_string()),
        }
    }

    /// Copy the current text of the control's target region.
    pub fn invoke_copy(&self, index: usize) {
        let Some(control) = self.controls.get(index) else {
            return;
        };
        let text = self.results.region(control.target).text.clone();
        self.copier.spawn_copy(index, text, self.outcomes.clone());
    }

    /// Apply a finished copy: success confirms the control, failure changes nothing.
    pub fn on_copy_outcome(&mut self, outcome: CopyOutcome<usize>, now: Instant) {
        if outcome.result.is_err() {
            return;
        }
        if let Some(control) = self.controls.get_mut(outcome.control) {
            control.timer.arm(now);
        }
    }

    /// Revert controls whose confirmation has elapsed.
    pub fn tick(&mut self, now: Instant) {
        for control in &mut self.controls {
            control.timer.expire(now);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
            self.should_quit = true;
            return;
        }

        if self.notice.is_some() {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                self.notice = None;
            }
            return;
        }

        match key.code {
            KeyCode::Tab | KeyCode::Down => self.focus = self.next_focus(),
            KeyCode::BackTab | KeyCode::Up => self.focus = self.prev_focus(),
            KeyCode::F(5) => self.calculate(),
            KeyCode::Char('r') if ctrl => self.calculate(),
            KeyCode::Enter => match self.focus {
                Focus::Input(Field::StopLoss) | Focus::Calculate => self.calculate(),
                Focus::Input(_) => self.focus = self.next_focus(),
                Focus::Copy(i) => self.invoke_copy(i),
            },
            KeyCode::Backspace => {
                if let Focus::Input(field) = self.focus {
                    self.form.backspace(field);
                }
            }
            KeyCode::Char(c) if !ctrl => {
                if let Focus::Input(field) = self.focus {
                    self.form.push(field, c);
                }
            }
            _ => {}
        }
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order: Vec<Focus> = Field::ALL.iter().map(|f| Focus::Input(*f)).collect();
        order.push(Focus::Calculate);
        order.extend((0..self.controls.len()).map(Focus::Copy));
        order
    }

    fn next_focus(&self) -> Focus {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        order[(pos + 1) % order.len()]
    }

    fn prev_focus(&self) -> Focus {
        let order = self.focus_order();
        let pos = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        order[(pos + order.len() - 1) % order.len()]
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::clipboard::testing::FakeClipboard;
    use crate::clipboard::COPY_CONFIRM_DURATION;
    use crate::sizing::SizingConfig;

    fn app_with(
        fake: Arc<FakeClipboard>,
    ) -> (App, mpsc::UnboundedReceiver<CopyOutcome<usize>>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let app = App::new(
            RiskCalculator::new(SizingConfig::default()),
            ClipboardCopier::new(fake),
            tx,
        );
        (app, rx)
    }

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(press(KeyCode::Char(c)));
        }
    }

    fn fill(app: &mut App, cap1: &str, cap2: &str, risk: &str, sl: &str) {
        app.form.set(Field::Capital1, cap1);
        app.form.set(Field::Capital2, cap2);
        app.form.set(Field::RiskPercent, risk);
        app.form.set(Field::StopLoss, sl);
    }

    #[tokio::test]
    async fn test_typing_then_enter_in_stop_loss_calculates() {
        let (mut app, _rx) = app_with(Arc::new(FakeClipboard::default()));

        type_text(&mut app, "10000");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "5000");
        app.handle_key(press(KeyCode::Enter)); // moves to risk
        type_text(&mut app, "2");
        app.handle_key(press(KeyCode::Tab));
        type_text(&mut app, "20");
        assert_eq!(app.focus, Focus::Input(Field::StopLoss));

        app.handle_key(press(KeyCode::Enter));

        assert_eq!(app.results.region(RegionId::Lot1).text, "1.00");
        assert_eq!(app.results.region(RegionId::Risk1).text, "$200.00 Risk");
        assert_eq!(app.results.region(RegionId::Lot2).text, "0.50");
        assert_eq!(app.results.region(RegionId::Risk2).text, "$100.00 Risk");
        assert_eq!(app.results.region(RegionId::Label1).text, "Account 1 lot size for 20 pips");
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_zero_stop_loss_blocks_and_keeps_results() {
        let (mut app, _rx) = app_with(Arc::new(FakeClipboard::default()));
        fill(&mut app, "10000", "5000", "2", "20");
        app.calculate();
        let before = app.results.clone();

        app.form.set(Field::StopLoss, "0");
        app.form.set(Field::Capital1, "99999");
        app.handle_key(press(KeyCode::F(5)));

        assert_eq!(app.notice.as_deref(), Some("Stop loss cannot be 0"));
        assert_eq!(app.results, before);

        // Notice swallows input until dismissed
        app.handle_key(press(KeyCode::Char('7')));
        assert_eq!(app.form.text(Field::Capital1), "99999");
        app.handle_key(press(KeyCode::Esc));
        assert!(app.notice.is_none());
    }

    #[tokio::test]
    async fn test_out_of_range_input_raises_notice() {
        let (mut app, _rx) = app_with(Arc::new(FakeClipboard::default()));
        fill(&mut app, "10000", "5000", "2", "20");
        app.calculate();
        let before = app.results.clone();

        app.form.set(Field::Capital2, "8e28");
        app.calculate();

        assert_eq!(app.notice.as_deref(), Some("Capital account 2 is out of range"));
        assert_eq!(app.results, before);
    }

    #[tokio::test]
    async fn test_below_minimum_marks_warning() {
        let (mut app, _rx) = app_with(Arc::new(FakeClipboard::default()));
        fill(&mut app, "100", "", "1", "50");

        app.calculate();

        let lot = app.results.region(RegionId::Lot1);
        assert_eq!(lot.text, "0.01");
        assert!(lot.warning);
        assert_eq!(app.results.region(RegionId::Risk1).text, "$1.00 Risk");
    }

    #[tokio::test]
    async fn test_copy_confirms_only_invoking_control() {
        let fake = Arc::new(FakeClipboard::default());
        let (mut app, mut rx) = app_with(fake.clone());
        fill(&mut app, "12500", "5000", "2", "20");
        app.calculate();
        assert_eq!(app.results.region(RegionId::Lot1).text, "1.25");

        app.invoke_copy(0);
        let outcome = rx.recv().await.unwrap();
        let now = Instant::now();
        app.on_copy_outcome(outcome, now);

        assert_eq!(fake.contents().as_deref(), Some("1.25"));
        assert!(app.controls[0].timer.is_confirmed(now));
        assert!(app.controls[1..].iter().all(|c| !c.timer.is_confirmed(now)));

        app.tick(now + Duration::from_millis(1999));
        assert!(app.controls[0].timer.is_confirmed(now + Duration::from_millis(1999)));

        app.tick(now + COPY_CONFIRM_DURATION);
        assert_eq!(app.controls[0].timer.deadline(), None);
    }

    #[tokio::test]
    async fn test_copy_via_focus_and_enter() {
        let fake = Arc::new(FakeClipboard::default());
        let (mut app, mut rx) = app_with(fake.clone());
        fill(&mut app, "10000", "5000", "2", "20");
        app.calculate();

        app.focus = Focus::Copy(3);
        app.handle_key(press(KeyCode::Enter));
        let outcome = rx.recv().await.unwrap();

        assert_eq!(outcome.control, 3);
        assert_eq!(fake.contents().as_deref(), Some("$100.00 Risk"));
    }

    #[tokio::test]
    async fn test_failed_copy_leaves_control_unchanged() {
        let (mut app, mut rx) = app_with(Arc::new(FakeClipboard::failing()));

        app.invoke_copy(1);
        let outcome = rx.recv().await.unwrap();
        assert!(outcome.result.is_err());

        let now = Instant::now();
        app.on_copy_outcome(outcome, now);
        assert!(app.controls.iter().all(|c| c.timer.deadline().is_none()));
    }

    #[tokio::test]
    async fn test_focus_wraps_and_quit() {
        let (mut app, _rx) = app_with(Arc::new(FakeClipboard::default()));

        app.handle_key(press(KeyCode::BackTab));
        assert_eq!(app.focus, Focus::Copy(3));
        app.handle_key(press(KeyCode::Tab));
        assert_eq!(app.focus, Focus::Input(Field::Capital1));

        app.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(app.should_quit);
    }
}
