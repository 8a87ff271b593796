mod shell;

use clap::{Parser, Subcommand, ValueEnum};
use form_screens::{Route, rules};
use form_spec::{FormSpec, Record, ValidationResult, evaluate};
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use shell::{ShellPresenter, Verbosity};

type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

const LOG_ENV: &str = "STAFF_FORMS_LOG";

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Employee, sign-in and sign-up forms in a terminal shell",
    long_about = "Runs the staff forms interactively and exposes their validation rules for scripting"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub(crate) enum RenderMode {
    Text,
    Json,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum ScreenArg {
    Employee,
    Auth,
    Signin,
    Signup,
}

impl ScreenArg {
    fn route(self) -> Route {
        match self {
            ScreenArg::Employee => Route::Employee,
            ScreenArg::Auth => Route::Auth,
            ScreenArg::Signin => Route::SignIn,
            ScreenArg::Signup => Route::SignUp,
        }
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum FormArg {
    Employee,
    Signin,
    Signup,
}

impl FormArg {
    fn id(self) -> &'static str {
        match self {
            FormArg::Employee => "employee",
            FormArg::Signin => "signin",
            FormArg::Signup => "signup",
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Fill in the forms interactively.
    Run {
        /// Screen to open first.
        #[arg(long, value_enum, default_value_t = ScreenArg::Employee)]
        screen: ScreenArg,
        /// Print the rendered form after every submit attempt and raise the log level.
        #[arg(long, alias = "debug")]
        verbose: bool,
        /// Render output mode for the form display.
        #[arg(long, value_enum, default_value_t = RenderMode::Text)]
        format: RenderMode,
    },
    /// Validate a record JSON file against one of the forms.
    Validate {
        /// Built-in form to validate against.
        #[arg(long, value_enum, required_unless_present = "spec")]
        form: Option<FormArg>,
        /// Rule set JSON to use instead of a built-in form.
        #[arg(long, value_name = "SPEC")]
        spec: Option<PathBuf>,
        /// Path to the record JSON file.
        #[arg(long, value_name = "RECORD")]
        record: PathBuf,
    },
    /// Print the rule set of a built-in form.
    Describe {
        #[arg(long, value_enum)]
        form: FormArg,
    },
    /// Print the JSON schema of rule set documents.
    Schema,
}

fn main() -> CliResult<()> {
    let cli = Cli::parse();
    let verbose = matches!(cli.command, Command::Run { verbose: true, .. });
    init_logging(verbose);

    match cli.command {
        Command::Run {
            screen,
            verbose,
            format,
        } => {
            let presenter = ShellPresenter::new(Verbosity::from_verbose(verbose), format);
            shell::run(screen.route(), &presenter)
        }
        Command::Validate { form, spec, record } => run_validate(form, spec, record),
        Command::Describe { form } => run_describe(form),
        Command::Schema => run_schema(),
    }
}

/// Filter used when `STAFF_FORMS_LOG` is unset or invalid.
fn default_filter(verbose: bool) -> &'static str {
    if verbose { "info" } else { "warn" }
}

fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn load_spec(form: Option<FormArg>, spec_path: Option<PathBuf>) -> CliResult<FormSpec> {
    if let Some(path) = spec_path {
        let contents = fs::read_to_string(path)?;
        return Ok(rules::from_json(&contents)?);
    }
    let form = form.ok_or("either --form or --spec is required")?;
    Ok(rules::by_name(form.id())?)
}

fn run_validate(
    form: Option<FormArg>,
    spec_path: Option<PathBuf>,
    record_path: PathBuf,
) -> CliResult<()> {
    let spec = load_spec(form, spec_path)?;
    let record_json = fs::read_to_string(record_path)?;
    let record_value: Value = serde_json::from_str(&record_json)?;
    if !record_value.is_object() {
        return Err("record must be a JSON object".into());
    }
    let record = Record::from_json(&record_value);

    let result = evaluate(&spec, &record);
    println!(
        "Validation result: {}",
        if result.is_valid() { "valid" } else { "invalid" }
    );
    describe_validation(&spec, &result);

    if result.is_valid() {
        Ok(())
    } else {
        Err("validation failed".into())
    }
}

fn describe_validation(spec: &FormSpec, result: &ValidationResult) {
    if result.is_valid() {
        return;
    }
    println!("Errors:");
    for name in result.fields_in(spec) {
        if let Some(message) = result.get(name) {
            println!("  {}: {}", name, message);
        }
    }
}

fn run_describe(form: FormArg) -> CliResult<()> {
    let spec = rules::by_name(form.id())?;
    println!("{}", serde_json::to_string_pretty(&spec)?);
    Ok(())
}

fn run_schema() -> CliResult<()> {
    let schema = schemars::schema_for!(FormSpec);
    println!("{}", serde_json::to_string_pretty(&schema)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_cmd::Command;
    use assert_fs::prelude::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn parse_bool_accepts_common_spellings() {
        assert_eq!(shell::parse_bool("yes", false), Some(true));
        assert_eq!(shell::parse_bool("N", true), Some(false));
        assert_eq!(shell::parse_bool("", true), Some(true));
        assert_eq!(shell::parse_bool("maybe", false), None);
    }

    #[test]
    fn field_input_keeps_surrounding_whitespace() {
        assert_eq!(shell::strip_line_ending("  secret1  \r\n"), "  secret1  ");
        assert_eq!(shell::strip_line_ending("   \n"), "   ");
        assert_eq!(shell::strip_line_ending("exit"), "exit");
    }

    #[test]
    fn default_log_filter_is_warn_unless_verbose() {
        assert_eq!(default_filter(false), "warn");
        assert_eq!(default_filter(true), "info");
    }

    #[test]
    fn screen_args_map_to_routes() {
        assert_eq!(ScreenArg::Signup.route(), Route::SignUp);
        assert_eq!(ScreenArg::Auth.route(), Route::Auth);
    }

    #[test]
    fn load_spec_prefers_custom_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let path = temp_dir.path().join("custom.form.json");
        fs::write(
            &path,
            json!({
                "id": "custom",
                "title": "Custom",
                "fields": [ { "name": "code", "required": true } ]
            })
            .to_string(),
        )
        .expect("write spec");
        let spec = load_spec(Some(FormArg::Employee), Some(path)).expect("load");
        assert_eq!(spec.id, "custom");
    }

    #[test]
    fn load_spec_requires_a_source() {
        assert!(load_spec(None, None).is_err());
    }

    #[test]
    fn validate_command_accepts_valid_record() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let record = workspace.child("record.json");
        record.write_str(
            &json!({
                "fullName": "Ada Lovelace",
                "email": "ada@example.com",
                "employeeId": "EMP042",
                "department": "Engineering",
                "phoneNumber": "0123456789",
                "position": "Analyst",
                "salary": 20000
            })
            .to_string(),
        )?;

        let output = Command::cargo_bin("staff-forms")?
            .arg("validate")
            .arg("--form")
            .arg("employee")
            .arg("--record")
            .arg(record.path())
            .output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("Validation result: valid"));
        Ok(())
    }

    #[test]
    fn validate_command_reports_field_errors() -> Result<(), Box<dyn std::error::Error>> {
        let workspace = assert_fs::TempDir::new()?;
        let record = workspace.child("record.json");
        record.write_str(
            &json!({
                "firstName": "Ada",
                "lastName": "Lovelace",
                "email": "ada@example.com",
                "password": "Abc12345",
                "confirmPassword": "Abc1234"
            })
            .to_string(),
        )?;

        let output = Command::cargo_bin("staff-forms")?
            .args(["validate", "--form", "signup", "--record"])
            .arg(record.path())
            .output()?;
        assert!(!output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("Validation result: invalid"));
        assert!(stdout.contains("confirmPassword: Passwords must match"));
        Ok(())
    }

    #[test]
    fn describe_command_prints_rule_set() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("staff-forms")?
            .args(["describe", "--form", "signin"])
            .output()?;
        assert!(output.status.success());
        let spec: Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(spec["id"], "signin");
        assert_eq!(spec["fields"][1]["secret"], true);
        Ok(())
    }

    #[test]
    fn schema_command_emits_json_schema() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("staff-forms")?.arg("schema").output()?;
        assert!(output.status.success());
        let schema: Value = serde_json::from_slice(&output.stdout)?;
        assert_eq!(schema["title"], "FormSpec");
        Ok(())
    }

    #[test]
    fn run_sign_in_flow_returns_to_auth_hub() -> Result<(), Box<dyn std::error::Error>> {
        let answers = [
            "ada@example.com",
            "secret1",
            "",
            "y",
            "exit",
        ];
        let stdin = format!("{}\n", answers.join("\n"));

        let output = Command::cargo_bin("staff-forms")?
            .args(["run", "--screen", "signin"])
            .write_stdin(stdin)
            .output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("== Welcome Back =="));
        assert!(stdout.contains("[Success] Sign in successful!"));
        assert!(stdout.contains("== Authentication =="));
        assert!(stdout.contains("Bye."));
        Ok(())
    }

    #[test]
    fn run_passes_field_input_through_untrimmed() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("staff-forms")?
            .args(["run", "--screen", "signin"])
            .write_stdin("   \n  secret1  \nexit\n")
            .output()?;
        assert!(output.status.success());
        let stderr = String::from_utf8(output.stderr)?;
        assert!(stderr.contains("  ! Please enter a valid email address"));
        assert!(!stderr.contains("Email is required"));
        assert!(!stderr.contains("Password"));
        Ok(())
    }

    #[test]
    fn run_treats_exit_as_a_field_value() -> Result<(), Box<dyn std::error::Error>> {
        let output = Command::cargo_bin("staff-forms")?
            .args(["run", "--screen", "signin"])
            .write_stdin("exit\nsecret1\nexit\n")
            .output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        let stderr = String::from_utf8(output.stderr)?;
        assert!(stderr.contains("  ! Please enter a valid email address"));
        assert!(stdout.contains("Show password (y/n)"));
        Ok(())
    }

    #[test]
    fn run_sign_up_requires_terms() -> Result<(), Box<dyn std::error::Error>> {
        let answers = [
            "Ada",
            "Lovelace",
            "ada@example.com",
            "Abc12345",
            "Abc12345",
            "",
            "",
            "n",
            "exit",
        ];
        let stdin = format!("{}\n", answers.join("\n"));

        let output = Command::cargo_bin("staff-forms")?
            .args(["run", "--screen", "signup"])
            .write_stdin(stdin)
            .output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        assert!(stdout.contains("[Error] Please agree to the terms and conditions"));
        assert!(!stdout.contains("Account created successfully!"));
        Ok(())
    }

    #[test]
    fn run_employee_reprompts_invalid_fields() -> Result<(), Box<dyn std::error::Error>> {
        let answers = [
            "Ada Lovelace",
            "ada@example.com",
            "EMP42",
            "Engineering",
            "0123456789",
            "Analyst",
            "19999",
            "y",
            "EMP042",
            "20000",
            "",
            "exit",
        ];
        let stdin = format!("{}\n", answers.join("\n"));

        let output = Command::cargo_bin("staff-forms")?
            .args(["run", "--screen", "employee"])
            .write_stdin(stdin)
            .output()?;
        assert!(output.status.success());
        let stdout = String::from_utf8(output.stdout)?;
        let stderr = String::from_utf8(output.stderr)?;
        assert!(stderr.contains("employeeId: Employee ID must be in format EMP followed by 3-6 digits"));
        assert!(stderr.contains("salary: Salary must be at least $20,000"));
        assert!(stdout.contains("[Success] Employee information saved successfully!"));
        Ok(())
    }
}
