use dashboard_common::redact_sensitive;
use serde::Serialize;
use tracing::{info, warn};

use crate::model::{Coordinate, ForecastResult, ValidationError};
use crate::providers::{ForecastApi, InterpretationApi};

/// Progress of one stage of a cycle. A value and an error never coexist.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Stage<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Stage<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Everything the presentation layer reads.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestState {
    latitude_input: String,
    longitude_input: String,
    forecast: Stage<ForecastResult>,
    interpretation: Stage<String>,
}

impl RequestState {
    fn new(default: Coordinate) -> Self {
        Self {
            latitude_input: default.latitude().to_string(),
            longitude_input: default.longitude().to_string(),
            forecast: Stage::Idle,
            interpretation: Stage::Idle,
        }
    }

    pub fn latitude_input(&self) -> &str {
        &self.latitude_input
    }

    pub fn longitude_input(&self) -> &str {
        &self.longitude_input
    }

    pub fn forecast(&self) -> &Stage<ForecastResult> {
        &self.forecast
    }

    pub fn interpretation(&self) -> &Stage<String> {
        &self.interpretation
    }

    pub fn is_busy(&self) -> bool {
        self.forecast.is_loading() || self.interpretation.is_loading()
    }

    pub fn accepts_submission(&self) -> bool {
        !self.is_busy()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A cycle was still in flight; nothing changed.
    Busy,
    Rejected(ValidationError),
    ForecastFailed,
    Completed { interpretation_ok: bool },
}

/// Owns the request state and drives the two-stage fetch cycle.
pub struct Dashboard<F, I> {
    forecast_api: F,
    interpretation_api: I,
    default_coordinate: Coordinate,
    state: RequestState,
}

impl<F, I> Dashboard<F, I>
where
    F: ForecastApi,
    I: InterpretationApi,
{
    pub fn new(forecast_api: F, interpretation_api: I, default_coordinate: Coordinate) -> Self {
        Self {
            forecast_api,
            interpretation_api,
            default_coordinate,
            state: RequestState::new(default_coordinate),
        }
    }

    pub fn state(&self) -> &RequestState {
        &self.state
    }

    pub fn set_latitude(&mut self, raw: impl Into<String>) {
        self.state.latitude_input = raw.into();
    }

    pub fn set_longitude(&mut self, raw: impl Into<String>) {
        self.state.longitude_input = raw.into();
    }

    /// Initial cycle on the default coordinate, bypassing input validation.
    pub fn mount(&mut self) -> CycleOutcome {
        self.mount_observed(|_| {})
    }

    pub fn mount_observed(&mut self, observer: impl FnMut(&RequestState)) -> CycleOutcome {
        if !self.state.accepts_submission() {
            return CycleOutcome::Busy;
        }
        self.run_cycle(self.default_coordinate, observer)
    }

    pub fn submit(&mut self) -> CycleOutcome {
        self.submit_observed(|_| {})
    }

    /// Runs a cycle on the current inputs, calling `observer` after every state change.
    pub fn submit_observed(&mut self, mut observer: impl FnMut(&RequestState)) -> CycleOutcome {
        if !self.state.accepts_submission() {
            return CycleOutcome::Busy;
        }

        match Coordinate::parse(&self.state.latitude_input, &self.state.longitude_input) {
            Ok(coordinate) => self.run_cycle(coordinate, observer),
            Err(error) => {
                warn!(
                    latitude = %self.state.latitude_input,
                    longitude = %self.state.longitude_input,
                    %error,
                    "rejected coordinate input"
                );
                self.state.forecast = Stage::Failed(error.to_string());
                self.state.interpretation = Stage::Idle;
                observer(&self.state);
                CycleOutcome::Rejected(error)
            }
        }
    }

    fn run_cycle(
        &mut self,
        coordinate: Coordinate,
        mut observer: impl FnMut(&RequestState),
    ) -> CycleOutcome {
        let (latitude, longitude) = (coordinate.latitude(), coordinate.longitude());
        info!(latitude, longitude, "starting weather cycle");

        self.state.forecast = Stage::Loading;
        self.state.interpretation = Stage::Idle;
        observer(&self.state);

        let forecast = match self.forecast_api.fetch(coordinate) {
            Ok(forecast) => forecast,
            Err(error) => {
                warn!(latitude, longitude, %error, "forecast stage failed");
                self.state.forecast =
                    Stage::Failed(redact_sensitive(&error.forecast_message()));
                observer(&self.state);
                return CycleOutcome::ForecastFailed;
            }
        };

        // Stage 2 only ever sees a forecast that stage 1 returned.
        self.state.interpretation = Stage::Loading;
        self.state.forecast = Stage::Ready(forecast.clone());
        observer(&self.state);

        let result = self.interpretation_api.interpret(&forecast);
        let interpretation_ok = result.is_ok();
        self.state.interpretation = match result {
            Ok(text) => Stage::Ready(text),
            Err(error) => {
                warn!(latitude, longitude, %error, "interpretation stage failed");
                Stage::Failed(redact_sensitive(&error.interpretation_message()))
            }
        };
        observer(&self.state);

        info!(latitude, longitude, interpretation_ok, "weather cycle finished");
        CycleOutcome::Completed { interpretation_ok }
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut RequestState {
        &mut self.state
    }
}

#[cfg(test)]
impl RequestState {
    pub(crate) fn force_forecast(&mut self, stage: Stage<ForecastResult>) {
        self.forecast = stage;
    }

    pub(crate) fn force_interpretation(&mut self, stage: Stage<String>) {
        self.interpretation = stage;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::error::DashboardError;
    use crate::fixtures::sample_forecast;

    struct FakeForecast {
        result: RefCell<Result<ForecastResult, DashboardError>>,
        calls: RefCell<Vec<Coordinate>>,
    }

    impl FakeForecast {
        fn ok() -> Self {
            Self::with(Ok(sample_forecast()))
        }

        fn with(result: Result<ForecastResult, DashboardError>) -> Self {
            Self {
                result: RefCell::new(result),
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl ForecastApi for FakeForecast {
        fn fetch(&self, coordinate: Coordinate) -> Result<ForecastResult, DashboardError> {
            self.calls.borrow_mut().push(coordinate);
            self.result.borrow().clone()
        }
    }

    struct FakeInterpretation {
        result: Result<String, DashboardError>,
        calls: RefCell<Vec<ForecastResult>>,
    }

    impl FakeInterpretation {
        fn with(result: Result<String, DashboardError>) -> Self {
            Self {
                result,
                calls: RefCell::new(Vec::new()),
            }
        }
    }

    impl InterpretationApi for FakeInterpretation {
        fn interpret(&self, forecast: &ForecastResult) -> Result<String, DashboardError> {
            self.calls.borrow_mut().push(forecast.clone());
            self.result.clone()
        }
    }

    fn tehran() -> Coordinate {
        Coordinate::new(35.6892, 51.389).expect("coordinate")
    }

    #[test]
    fn dashboard_starts_idle_with_default_inputs() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("x".into()));
        let dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        assert_eq!(dashboard.state().latitude_input(), "35.6892");
        assert_eq!(dashboard.state().longitude_input(), "51.389");
        assert_eq!(dashboard.state().forecast(), &Stage::Idle);
        assert!(dashboard.state().accepts_submission());
    }

    #[test]
    fn dashboard_mount_fetches_default_coordinate_then_interprets() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("Mild and dry.".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        let outcome = dashboard.mount();

        assert_eq!(outcome, CycleOutcome::Completed { interpretation_ok: true });
        assert_eq!(*forecast.calls.borrow(), vec![tehran()]);
        assert_eq!(interpretation.calls.borrow().len(), 1);
        assert_eq!(dashboard.state().forecast().value(), Some(&sample_forecast()));
        assert_eq!(
            dashboard.state().interpretation().value().map(String::as_str),
            Some("Mild and dry.")
        );
    }

    #[test]
    fn dashboard_submit_fetches_edited_coordinate_and_interprets_stored_forecast() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("Rain midweek.".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        dashboard.set_latitude(" 40.4168 ");
        dashboard.set_longitude("-3.7038");
        let outcome = dashboard.submit();

        assert_eq!(outcome, CycleOutcome::Completed { interpretation_ok: true });
        assert_eq!(
            *forecast.calls.borrow(),
            vec![Coordinate::new(40.4168, -3.7038).expect("coordinate")]
        );
        let stored = dashboard.state().forecast().value().expect("stored forecast");
        assert_eq!(*interpretation.calls.borrow(), vec![stored.clone()]);
    }

    #[test]
    fn dashboard_stage_errors_are_stored_redacted() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Err(DashboardError::network(
            "error sending request for url (https://host/generate?key=AIzaSy123)",
        )));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        dashboard.submit();

        let message = dashboard.state().interpretation().error().expect("error");
        assert!(!message.contains("AIzaSy123"));
        assert!(message.contains("key=[REDACTED]"));
    }

    #[test]
    fn dashboard_invalid_input_makes_no_calls_and_clears_results() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("text".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());
        dashboard.mount();

        dashboard.set_latitude("abc");
        let outcome = dashboard.submit();

        assert_eq!(outcome, CycleOutcome::Rejected(ValidationError::NotANumber));
        assert_eq!(forecast.calls.borrow().len(), 1);
        assert_eq!(interpretation.calls.borrow().len(), 1);
        assert_eq!(
            dashboard.state().forecast().error(),
            Some("Please enter valid numbers for latitude and longitude.")
        );
        assert_eq!(dashboard.state().interpretation(), &Stage::Idle);
    }

    #[test]
    fn dashboard_out_of_range_latitude_is_rejected() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("text".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        dashboard.set_latitude("95");
        dashboard.set_longitude("0");

        assert_eq!(
            dashboard.submit(),
            CycleOutcome::Rejected(ValidationError::LatitudeOutOfRange(95.0))
        );
        assert!(forecast.calls.borrow().is_empty());
    }

    #[test]
    fn dashboard_forecast_failure_skips_interpretation() {
        let forecast = FakeForecast::with(Err(DashboardError::provider(Some(500), "boom")));
        let interpretation = FakeInterpretation::with(Ok("never".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        let outcome = dashboard.submit();

        assert_eq!(outcome, CycleOutcome::ForecastFailed);
        assert_eq!(interpretation.calls.borrow().len(), 0);
        assert_eq!(
            dashboard.state().forecast().error(),
            Some("Failed to retrieve weather information: HTTP error! Status: 500. Message: boom")
        );
        assert_eq!(dashboard.state().interpretation(), &Stage::Idle);
    }

    #[test]
    fn dashboard_interpretation_failure_keeps_forecast() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Err(DashboardError::Configuration(
            "Gemini API key is not configured.".into(),
        )));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());

        let outcome = dashboard.submit();

        assert_eq!(outcome, CycleOutcome::Completed { interpretation_ok: false });
        assert!(dashboard.state().forecast().value().is_some());
        assert_eq!(
            dashboard.state().interpretation().error(),
            Some("Gemini API key is not configured.")
        );
    }

    #[test]
    fn dashboard_failed_cycle_clears_previous_result() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("text".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());
        dashboard.mount();
        assert!(dashboard.state().forecast().value().is_some());

        *forecast.result.borrow_mut() = Err(DashboardError::network("connection refused"));
        dashboard.submit();

        assert_eq!(dashboard.state().forecast().value(), None);
        assert_eq!(dashboard.state().interpretation(), &Stage::Idle);
    }

    #[test]
    fn dashboard_observer_sees_each_transition_in_order() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("text".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());
        let mut seen = Vec::new();

        dashboard.submit_observed(|state| {
            seen.push((
                state.forecast().is_loading(),
                state.forecast().value().is_some(),
                state.interpretation().is_loading(),
                state.interpretation().value().is_some(),
                state.accepts_submission(),
            ));
        });

        assert_eq!(
            seen,
            vec![
                (true, false, false, false, false),
                (false, true, true, false, false),
                (false, true, false, true, true),
            ]
        );
    }

    #[test]
    fn dashboard_submission_while_loading_is_busy() {
        let forecast = FakeForecast::ok();
        let interpretation = FakeInterpretation::with(Ok("text".into()));
        let mut dashboard = Dashboard::new(&forecast, &interpretation, tehran());
        dashboard.state_mut().force_interpretation(Stage::Loading);

        assert_eq!(dashboard.submit(), CycleOutcome::Busy);
        assert_eq!(dashboard.mount(), CycleOutcome::Busy);
        assert!(forecast.calls.borrow().is_empty());

        dashboard.state_mut().force_interpretation(Stage::Idle);
        dashboard.state_mut().force_forecast(Stage::Loading);
        assert_eq!(dashboard.submit(), CycleOutcome::Busy);
    }

    #[test]
    fn stage_accessors_expose_value_or_error() {
        let ready: Stage<u8> = Stage::Ready(3);
        let failed: Stage<u8> = Stage::Failed("nope".into());

        assert_eq!(ready.value(), Some(&3));
        assert_eq!(ready.error(), None);
        assert_eq!(failed.value(), None);
        assert_eq!(failed.error(), Some("nope"));
        assert!(Stage::<u8>::Loading.is_loading());
    }
}
