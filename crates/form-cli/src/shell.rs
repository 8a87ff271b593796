use std::io::{self, Write};

use form_screens::screens::toggle_label;
use form_screens::{
    Alert, AlertSurface, AuthScreen, EmployeeScreen, FormScreen, Route, Router, SignInScreen,
    SignUpScreen, StackRouter, Tab,
};
use tracing::info;

use form_spec::{
    FieldRule, FormSpec, SubmitOutcome, ValidationResult, build_render_payload, render_json_ui,
    render_text,
};

use crate::{CliResult, RenderMode};

/// Controls which bits of state the shell prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Clean output: prompts, inline errors and dialogs only.
    Clean,
    /// Verbose output: rendered form after every submit attempt.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

/// Whether the shell keeps running after a screen finishes.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Prints screens, prompts and validation feedback.
pub struct ShellPresenter {
    verbosity: Verbosity,
    format: RenderMode,
}

impl ShellPresenter {
    pub fn new(verbosity: Verbosity, format: RenderMode) -> Self {
        Self { verbosity, format }
    }

    pub fn show_header(&self, screen: &dyn FormScreen) {
        let spec = screen.controller().spec();
        println!("== {} ==", spec.title);
        if let Some(subtitle) = &spec.subtitle {
            println!("{}", subtitle);
        }
    }

    pub fn show_form(&self, screen: &dyn FormScreen) -> CliResult<()> {
        let payload = build_render_payload(screen.controller(), |field| screen.reveals(field));
        match self.format {
            RenderMode::Text => {
                if self.verbosity.is_verbose() {
                    println!("{}", render_text(&payload));
                }
            }
            RenderMode::Json => {
                println!("{}", serde_json::to_string_pretty(&render_json_ui(&payload))?);
            }
        }
        Ok(())
    }

    pub fn field_prompt(&self, field: &FieldRule) -> String {
        let mut line = field.display_label().to_string();
        if field.required {
            line.push_str(" *");
        }
        if let Some(placeholder) = &field.placeholder
            && placeholder != field.display_label()
        {
            line.push_str(&format!(" ({})", placeholder));
        }
        line
    }

    pub fn show_field_error(&self, message: &str) {
        eprintln!("  ! {}", message);
    }

    pub fn show_errors(&self, spec: &FormSpec, result: &ValidationResult) {
        eprintln!("Please fix the following fields:");
        for field in result.fields_in(spec) {
            if let Some(message) = result.get(field) {
                eprintln!("  {}: {}", field, message);
            }
        }
    }

    pub fn show_auth_hub(&self) {
        println!("== {} ==", AuthScreen::TITLE);
        println!("{}", AuthScreen::SUBTITLE);
    }
}

/// Alert surface backed by the terminal. Single-button dialogs are
/// acknowledged automatically.
pub struct TerminalAlerts;

impl AlertSurface for TerminalAlerts {
    fn show(&mut self, alert: &Alert) -> Option<usize> {
        println!("[{}] {}", alert.title, alert.message);
        let buttons = alert.effective_buttons();
        if buttons.len() == 1 {
            println!("  > {}", buttons[0].label);
            return Some(0);
        }
        let labels = buttons
            .iter()
            .map(|button| button.label.as_str())
            .collect::<Vec<_>>();
        loop {
            let line = match prompt_command(&format!("Choose ({})", labels.join("/"))) {
                Ok(Some(line)) => line,
                _ => return None,
            };
            if let Some(index) = labels
                .iter()
                .position(|label| label.eq_ignore_ascii_case(&line))
            {
                return Some(index);
            }
            println!("Unknown choice '{}'.", line);
        }
    }
}

/// Runs the interactive shell starting at `start`.
pub fn run(start: Route, presenter: &ShellPresenter) -> CliResult<()> {
    let mut router = match start {
        Route::SignIn | Route::SignUp => {
            let mut router = StackRouter::new(Route::Auth);
            router.navigate_to(start);
            router
        }
        other => StackRouter::new(other),
    };
    let mut alerts = TerminalAlerts;
    info!(route = %start, "starting shell");

    loop {
        let flow = match router.current() {
            Route::Employee => {
                let mut screen = EmployeeScreen::new()?;
                run_form(&mut screen, &mut router, &mut alerts, presenter)?
            }
            Route::Auth => run_auth(&mut router, presenter)?,
            Route::SignIn => {
                let mut screen = SignInScreen::new()?;
                run_form(&mut screen, &mut router, &mut alerts, presenter)?
            }
            Route::SignUp => {
                let mut screen = SignUpScreen::new()?;
                run_form(&mut screen, &mut router, &mut alerts, presenter)?
            }
        };
        if flow == Flow::Exit {
            println!("Bye.");
            return Ok(());
        }
    }
}

fn run_auth(router: &mut StackRouter, presenter: &ShellPresenter) -> CliResult<Flow> {
    presenter.show_auth_hub();
    let prompt = format!(
        "Go to ({}/{}/{}/exit)",
        Route::SignIn.name(),
        Route::SignUp.name(),
        Route::Employee.name()
    );
    loop {
        let Some(choice) = prompt_command(&prompt)? else {
            return Ok(Flow::Exit);
        };
        match Route::from_name(&choice) {
            Some(Route::SignIn) => AuthScreen.sign_in(router),
            Some(Route::SignUp) => AuthScreen.sign_up(router),
            Some(route) if Tab::for_route(route).is_some() => router.switch_to(route),
            _ => {
                println!("Unknown choice '{}'.", choice);
                continue;
            }
        }
        return Ok(Flow::Continue);
    }
}

fn run_form(
    screen: &mut dyn FormScreen,
    router: &mut StackRouter,
    alerts: &mut dyn AlertSurface,
    presenter: &ShellPresenter,
) -> CliResult<Flow> {
    presenter.show_header(screen);
    let route = screen.route();
    let depth = router.depth();

    let mut pending = screen
        .controller()
        .spec()
        .field_names()
        .map(String::from)
        .collect::<Vec<_>>();

    loop {
        for name in &pending {
            let Some(field) = screen.controller().spec().field(name).cloned() else {
                continue;
            };
            let Some(value) = prompt_line(&presenter.field_prompt(&field))? else {
                return Ok(Flow::Exit);
            };
            let controller = screen.controller_mut();
            controller.change(name, value);
            controller.blur(name);
            if let Some(message) = controller.error(name) {
                presenter.show_field_error(message);
            }
        }

        for toggle in screen.toggles() {
            let current = screen.controller().flag(toggle);
            let Some(value) = prompt_bool(toggle_label(toggle), current)? else {
                return Ok(Flow::Exit);
            };
            screen.controller_mut().set_flag(toggle, value);
        }

        let outcome = screen.submit(router, alerts);
        presenter.show_form(screen)?;
        match outcome {
            SubmitOutcome::Submitted => break,
            SubmitOutcome::Blocked(_) => pending.clear(),
            SubmitOutcome::Invalid(result) => {
                presenter.show_errors(screen.controller().spec(), &result);
                pending = result
                    .fields_in(screen.controller().spec())
                    .map(String::from)
                    .collect();
            }
        }
    }

    if router.current() != route || router.depth() != depth {
        return Ok(Flow::Continue);
    }
    prompt_tab(router)
}

fn prompt_tab(router: &mut StackRouter) -> CliResult<Flow> {
    let titles = Tab::ALL.map(|tab| tab.title());
    let names = Tab::ALL.map(|tab| tab.route().name());
    println!("Tabs: {}", titles.join(" | "));
    let prompt = format!("Next ({}/exit)", names.join("/"));
    loop {
        let Some(choice) = prompt_command(&prompt)? else {
            return Ok(Flow::Exit);
        };
        match Route::from_name(&choice).and_then(Tab::for_route) {
            Some(tab) => {
                router.switch_to(tab.route());
                return Ok(Flow::Continue);
            }
            None => println!("Unknown choice '{}'.", choice),
        }
    }
}

/// Reads one line of field input, dropping only the line terminator so the
/// value reaches the form exactly as typed. `None` once stdin is closed.
fn prompt_line(prompt: &str) -> CliResult<Option<String>> {
    print!("{}: ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    if io::stdin().read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(strip_line_ending(&line).to_string()))
}

/// Reads a navigation or yes/no answer. `None` when stdin is closed or the
/// user typed `exit`.
fn prompt_command(prompt: &str) -> CliResult<Option<String>> {
    let Some(line) = prompt_line(prompt)? else {
        return Ok(None);
    };
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("exit") {
        return Ok(None);
    }
    Ok(Some(trimmed.to_string()))
}

pub(crate) fn strip_line_ending(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

fn prompt_bool(prompt: &str, default: bool) -> CliResult<Option<bool>> {
    let prompt_text = format!("{} (y/n) [{}]", prompt.trim(), if default { "Y" } else { "N" });
    loop {
        let Some(line) = prompt_command(&prompt_text)? else {
            return Ok(None);
        };
        match parse_bool(&line, default) {
            Some(value) => return Ok(Some(value)),
            None => println!("Invalid answer '{}'. Expected yes or no.", line),
        }
    }
}

pub(crate) fn parse_bool(raw: &str, default: bool) -> Option<bool> {
    match raw.trim().to_lowercase().as_str() {
        "" => Some(default),
        "y" | "yes" | "true" | "1" => Some(true),
        "n" | "no" | "false" | "0" => Some(false),
        _ => None,
    }
}
