#![deny(clippy::unwrap_used, clippy::expect_used)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used))]

use std::io::{self, BufRead, Write};

use clap::{Parser, Subcommand, ValueEnum};

use dashboard_common::{
    OutputMode, error_envelope, init_tracing, mask_secret, redact_sensitive, select_output_mode,
    success_envelope,
};
use weather_insight::{
    config::{LOG_ENV, RuntimeConfig},
    dashboard::{CycleOutcome, Dashboard, RequestState},
    error::{AppError, ErrorKind},
    prompt::PromptLanguage,
    providers::{
        ForecastApi, InterpretationApi, gemini::GeminiClient, open_meteo::OpenMeteoClient,
    },
    render::{self, DashboardSnapshot},
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Weather dashboard: Open-Meteo forecast plus a Gemini-written summary"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one fetch cycle and print the dashboard.
    Show {
        /// Latitude in decimal degrees (defaults to the configured location).
        #[arg(long, allow_hyphen_values = true)]
        lat: Option<String>,
        /// Longitude in decimal degrees (defaults to the configured location).
        #[arg(long, allow_hyphen_values = true)]
        lon: Option<String>,
        #[arg(long, value_enum)]
        output: Option<OutputModeArg>,
        #[arg(long)]
        json: bool,
        #[arg(long, value_enum)]
        lang: Option<LanguageArg>,
    },
    /// Interactive dashboard; reads `<lat> <lon>` lines from stdin.
    Dashboard {
        #[arg(long, value_enum)]
        lang: Option<LanguageArg>,
    },
}

const COMMAND_SHOW: &str = "weather.show";
const COMMAND_DASHBOARD: &str = "weather.dashboard";
const ERROR_CODE_USER_INVALID_INPUT: &str = "user.invalid_input";
const ERROR_CODE_USER_OUTPUT_MODE_CONFLICT: &str = "user.output_mode_conflict";
const ERROR_CODE_USER_INVALID_CONFIG: &str = "user.invalid_config";
const ERROR_CODE_RUNTIME_FORECAST: &str = "runtime.forecast_failed";
const ERROR_CODE_RUNTIME_PROVIDER_INIT: &str = "runtime.provider_init_failed";
const ERROR_CODE_RUNTIME_SERIALIZE: &str = "runtime.serialize_failed";
const ERROR_CODE_RUNTIME_IO: &str = "runtime.io_failed";
const INTERACTIVE_PROMPT: &str = "lat lon (empty = refresh, q = quit)> ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputModeArg {
    Human,
    Json,
}

impl From<OutputModeArg> for OutputMode {
    fn from(value: OutputModeArg) -> Self {
        match value {
            OutputModeArg::Human => OutputMode::Human,
            OutputModeArg::Json => OutputMode::Json,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LanguageArg {
    Fa,
    En,
}

impl From<LanguageArg> for PromptLanguage {
    fn from(value: LanguageArg) -> Self {
        match value {
            LanguageArg::Fa => PromptLanguage::Persian,
            LanguageArg::En => PromptLanguage::English,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct CliError {
    code: &'static str,
    error: AppError,
}

impl CliError {
    fn user(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            error: AppError::user(message),
        }
    }

    fn runtime(code: &'static str, message: impl Into<String>) -> Self {
        Self {
            code,
            error: AppError::runtime(message),
        }
    }

    fn exit_code(&self) -> i32 {
        self.error.exit_code()
    }
}

impl Cli {
    fn command_name(&self) -> &'static str {
        match &self.command {
            Commands::Show { .. } => COMMAND_SHOW,
            Commands::Dashboard { .. } => COMMAND_DASHBOARD,
        }
    }

    fn output_mode_hint(&self) -> OutputMode {
        match &self.command {
            Commands::Show { output, json, .. } => {
                if *json {
                    OutputMode::Json
                } else {
                    output.map(Into::into).unwrap_or(OutputMode::Human)
                }
            }
            Commands::Dashboard { .. } => OutputMode::Human,
        }
    }

    fn language(&self) -> Option<PromptLanguage> {
        match &self.command {
            Commands::Show { lang, .. } | Commands::Dashboard { lang } => lang.map(Into::into),
        }
    }
}

fn main() {
    init_tracing(LOG_ENV);

    let cli = Cli::parse();
    let command = cli.command_name();
    let output_mode = cli.output_mode_hint();
    match run(cli) {
        Ok(Some(output)) => println!("{output}"),
        Ok(None) => {}
        Err(error) => {
            emit_error(command, output_mode, &error);
            std::process::exit(error.exit_code());
        }
    }
}

fn run(cli: Cli) -> Result<Option<String>, CliError> {
    let config = RuntimeConfig::from_env()
        .map_err(|error| CliError::user(ERROR_CODE_USER_INVALID_CONFIG, error.to_string()))?;
    let language = cli.language().unwrap_or(config.language);
    let secret = config.gemini_api_key.as_deref();

    let forecast_api = OpenMeteoClient::new(config.open_meteo_endpoint.as_str())
        .map_err(|error| CliError::runtime(ERROR_CODE_RUNTIME_PROVIDER_INIT, error.to_string()))?;
    let interpretation_api = GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.as_str(),
        config.gemini_endpoint.as_str(),
        language,
    )
    .map_err(|error| CliError::runtime(ERROR_CODE_RUNTIME_PROVIDER_INIT, error.to_string()))?;

    match cli.command {
        Commands::Show {
            lat,
            lon,
            output,
            json,
            ..
        } => run_show(
            ShowArgs {
                lat: lat.as_deref(),
                lon: lon.as_deref(),
                output,
                json,
            },
            Dashboard::new(forecast_api, interpretation_api, config.default_coordinate),
        )
        .map(|output| Some(mask_secret(&output, secret))),
        Commands::Dashboard { .. } => {
            let mut dashboard =
                Dashboard::new(forecast_api, interpretation_api, config.default_coordinate);
            let stdin = io::stdin();
            let stdout = io::stdout();
            run_interactive(&mut dashboard, stdin.lock(), &mut stdout.lock(), secret)
                .map_err(|error| CliError::runtime(ERROR_CODE_RUNTIME_IO, error.to_string()))?;
            Ok(None)
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct ShowArgs<'a> {
    lat: Option<&'a str>,
    lon: Option<&'a str>,
    output: Option<OutputModeArg>,
    json: bool,
}

fn run_show<F, I>(args: ShowArgs<'_>, mut dashboard: Dashboard<F, I>) -> Result<String, CliError>
where
    F: ForecastApi,
    I: InterpretationApi,
{
    let output_mode = select_output_mode(args.output.map(Into::into), args.json, OutputMode::Human)
        .map_err(|error| CliError::user(ERROR_CODE_USER_OUTPUT_MODE_CONFLICT, error.to_string()))?;

    let outcome = if args.lat.is_none() && args.lon.is_none() {
        dashboard.mount()
    } else {
        if let Some(lat) = args.lat {
            dashboard.set_latitude(lat);
        }
        if let Some(lon) = args.lon {
            dashboard.set_longitude(lon);
        }
        dashboard.submit()
    };

    let state = dashboard.state();
    match outcome {
        CycleOutcome::Rejected(error) => {
            let error: AppError = error.into();
            return Err(CliError {
                code: ERROR_CODE_USER_INVALID_INPUT,
                error,
            });
        }
        CycleOutcome::ForecastFailed => {
            return Err(CliError::runtime(
                ERROR_CODE_RUNTIME_FORECAST,
                state.forecast().error().unwrap_or_default(),
            ));
        }
        CycleOutcome::Busy | CycleOutcome::Completed { .. } => {}
    }

    match output_mode {
        OutputMode::Json => render_json_envelope(COMMAND_SHOW, state),
        OutputMode::Human => Ok(render::to_text(&render::page(state))),
    }
}

fn render_json_envelope(command: &str, state: &RequestState) -> Result<String, CliError> {
    let result = serde_json::to_value(DashboardSnapshot::from_state(state)).map_err(|error| {
        CliError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize output: {error}"),
        )
    })?;
    success_envelope(command, result).map_err(|error| {
        CliError::runtime(
            ERROR_CODE_RUNTIME_SERIALIZE,
            format!("failed to serialize output envelope: {error}"),
        )
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Submission {
    Quit,
    Resubmit,
    Inputs { latitude: String, longitude: String },
}

fn parse_submission(line: &str) -> Submission {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Submission::Resubmit;
    }
    if trimmed.eq_ignore_ascii_case("q") || trimmed.eq_ignore_ascii_case("quit") {
        return Submission::Quit;
    }

    let parts: Vec<&str> = trimmed
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|part| !part.is_empty())
        .collect();
    match parts.as_slice() {
        [latitude, longitude] => Submission::Inputs {
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        },
        // Anything else goes through validation as-is and is rejected there.
        _ => Submission::Inputs {
            latitude: trimmed.to_string(),
            longitude: String::new(),
        },
    }
}

/// Mounts, then runs one cycle per input line until `q` or end of input.
fn run_interactive<F, I, R, W>(
    dashboard: &mut Dashboard<F, I>,
    input: R,
    out: &mut W,
    secret: Option<&str>,
) -> io::Result<()>
where
    F: ForecastApi,
    I: InterpretationApi,
    R: BufRead,
    W: Write,
{
    let mut failure = None;
    dashboard.mount_observed(|state| render_frame(out, state, secret, &mut failure));
    settle(out, &mut failure)?;

    for line in input.lines() {
        match parse_submission(&line?) {
            Submission::Quit => break,
            Submission::Resubmit => {}
            Submission::Inputs {
                latitude,
                longitude,
            } => {
                dashboard.set_latitude(latitude);
                dashboard.set_longitude(longitude);
            }
        }
        dashboard.submit_observed(|state| render_frame(out, state, secret, &mut failure));
        settle(out, &mut failure)?;
    }

    Ok(())
}

fn render_frame<W: Write>(
    out: &mut W,
    state: &RequestState,
    secret: Option<&str>,
    failure: &mut Option<io::Error>,
) {
    if failure.is_some() {
        return;
    }
    let frame = mask_secret(&render::to_text(&render::page(state)), secret);
    if let Err(error) = writeln!(out, "{frame}\n").and_then(|()| out.flush()) {
        *failure = Some(error);
    }
}

fn settle<W: Write>(out: &mut W, failure: &mut Option<io::Error>) -> io::Result<()> {
    if let Some(error) = failure.take() {
        return Err(error);
    }
    write!(out, "{INTERACTIVE_PROMPT}")?;
    out.flush()
}

fn emit_error(command: &str, output_mode: OutputMode, error: &CliError) {
    let message = redact_sensitive(&error.error.message);
    match output_mode {
        OutputMode::Json => println!(
            "{}",
            error_envelope(
                command,
                error.code,
                &message,
                error_kind_label(error.error.kind),
                error.exit_code(),
            )
        ),
        OutputMode::Human => eprintln!("error[{}]: {message}", error.code),
    }
}

fn error_kind_label(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::User => "user",
        ErrorKind::Runtime => "runtime",
    }
}
