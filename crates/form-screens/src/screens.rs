//! The three form screens and the static authentication hub.
//!
//! Each screen owns exactly one [`FormController`]. Presentation toggles live
//! in the controller's flag map and never feed into validation.

use form_spec::{FormController, FormSpec, SubmitBlocked, SubmitOutcome};
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::nav::{Alert, AlertAction, AlertButton, AlertSurface, Router};
use crate::routes::Route;
use crate::rules::{self, ScreenError};

pub const FULL_TIME: &str = "fullTime";
pub const SHOW_PASSWORD: &str = "showPassword";
pub const SHOW_CONFIRM_PASSWORD: &str = "showConfirmPassword";
pub const REMEMBER_ME: &str = "rememberMe";
pub const AGREE_TERMS: &str = "agreeTerms";

pub const TERMS_MESSAGE: &str = "Please agree to the terms and conditions";

/// Behaviour shared by the screens that host a form.
pub trait FormScreen {
    fn route(&self) -> Route;

    fn controller(&self) -> &FormController;

    fn controller_mut(&mut self) -> &mut FormController;

    /// Toggles offered to the user, in display order.
    fn toggles(&self) -> &'static [&'static str];

    /// Whether a secret field is currently shown in clear text.
    fn reveals(&self, _field: &str) -> bool {
        false
    }

    fn submit(&mut self, router: &mut dyn Router, alerts: &mut dyn AlertSurface) -> SubmitOutcome;
}

/// Human label for a toggle name.
pub fn toggle_label(name: &str) -> &'static str {
    match name {
        FULL_TIME => "Full-time employee",
        SHOW_PASSWORD => "Show password",
        SHOW_CONFIRM_PASSWORD => "Show confirm password",
        REMEMBER_ME => "Remember me",
        AGREE_TERMS => "I agree to the Terms and Conditions",
        _ => "Option",
    }
}

fn controller_for(spec: FormSpec) -> Result<FormController, ScreenError> {
    let id = spec.id.clone();
    FormController::new(spec).map_err(|err| ScreenError::Malformed(id, err))
}

/// Record values safe to log: secret fields are left out.
fn public_fields(controller: &FormController) -> Map<String, Value> {
    let spec = controller.spec();
    controller
        .record()
        .iter()
        .filter(|(name, _)| !spec.field(name).is_some_and(|field| field.secret))
        .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
        .collect()
}

/// Shows `alert` and runs the action bound to the pressed button.
fn confirm(
    controller: &mut FormController,
    router: &mut dyn Router,
    alerts: &mut dyn AlertSurface,
    alert: &Alert,
) {
    let Some(action) = alerts.show(alert).and_then(|index| alert.action_for(index)) else {
        return;
    };
    match action {
        AlertAction::ResetForm => controller.reset(),
        AlertAction::NavigateBack => router.navigate_back(),
        AlertAction::Replace(route) => router.replace(route),
    }
}

/// Employee information capture.
#[derive(Debug, Clone)]
pub struct EmployeeScreen {
    controller: FormController,
}

impl EmployeeScreen {
    pub fn new() -> Result<Self, ScreenError> {
        Self::with_spec(rules::employee()?)
    }

    pub fn with_spec(spec: FormSpec) -> Result<Self, ScreenError> {
        Ok(Self {
            controller: controller_for(spec)?.with_flag(FULL_TIME, false),
        })
    }

    pub fn employment_type(&self) -> &'static str {
        if self.controller.flag(FULL_TIME) {
            "Full-Time"
        } else {
            "Part-Time"
        }
    }

    /// Submitted payload: the record plus the employment type.
    pub fn employee_data(&self) -> Value {
        let mut data = public_fields(&self.controller);
        data.insert(
            "employmentType".into(),
            Value::String(self.employment_type().into()),
        );
        Value::Object(data)
    }
}

impl FormScreen for EmployeeScreen {
    fn route(&self) -> Route {
        Route::Employee
    }

    fn controller(&self) -> &FormController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FormController {
        &mut self.controller
    }

    fn toggles(&self) -> &'static [&'static str] {
        &[FULL_TIME]
    }

    fn submit(&mut self, router: &mut dyn Router, alerts: &mut dyn AlertSurface) -> SubmitOutcome {
        let data = self.employee_data();
        let outcome = self.controller.submit(|_| {
            info!(form = "employee", data = %data, "submitted employee data");
            Ok(())
        });
        if outcome.is_submitted() {
            let alert = Alert::new("Success", "Employee information saved successfully!")
                .with_button(AlertButton::ok_then(AlertAction::ResetForm));
            confirm(&mut self.controller, router, alerts, &alert);
        }
        outcome
    }
}

/// Sign-in form.
#[derive(Debug, Clone)]
pub struct SignInScreen {
    controller: FormController,
}

impl SignInScreen {
    pub fn new() -> Result<Self, ScreenError> {
        Self::with_spec(rules::sign_in()?)
    }

    pub fn with_spec(spec: FormSpec) -> Result<Self, ScreenError> {
        Ok(Self {
            controller: controller_for(spec)?
                .with_flag(SHOW_PASSWORD, false)
                .with_flag(REMEMBER_ME, false),
        })
    }
}

impl FormScreen for SignInScreen {
    fn route(&self) -> Route {
        Route::SignIn
    }

    fn controller(&self) -> &FormController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FormController {
        &mut self.controller
    }

    fn toggles(&self) -> &'static [&'static str] {
        &[SHOW_PASSWORD, REMEMBER_ME]
    }

    fn reveals(&self, field: &str) -> bool {
        field == "password" && self.controller.flag(SHOW_PASSWORD)
    }

    fn submit(&mut self, router: &mut dyn Router, alerts: &mut dyn AlertSurface) -> SubmitOutcome {
        let data = Value::Object(public_fields(&self.controller));
        let remember_me = self.controller.flag(REMEMBER_ME);
        let outcome = self.controller.submit(|_| {
            info!(form = "signin", data = %data, remember_me, "sign in values");
            Ok(())
        });
        if outcome.is_submitted() {
            let alert = Alert::new("Success", "Sign in successful!")
                .with_button(AlertButton::ok_then(AlertAction::NavigateBack));
            confirm(&mut self.controller, router, alerts, &alert);
        }
        outcome
    }
}

/// Sign-up form; the terms agreement gates the submit after validation.
#[derive(Debug, Clone)]
pub struct SignUpScreen {
    controller: FormController,
}

impl SignUpScreen {
    pub fn new() -> Result<Self, ScreenError> {
        Self::with_spec(rules::sign_up()?)
    }

    pub fn with_spec(spec: FormSpec) -> Result<Self, ScreenError> {
        Ok(Self {
            controller: controller_for(spec)?
                .with_flag(SHOW_PASSWORD, false)
                .with_flag(SHOW_CONFIRM_PASSWORD, false)
                .with_flag(AGREE_TERMS, false),
        })
    }
}

impl FormScreen for SignUpScreen {
    fn route(&self) -> Route {
        Route::SignUp
    }

    fn controller(&self) -> &FormController {
        &self.controller
    }

    fn controller_mut(&mut self) -> &mut FormController {
        &mut self.controller
    }

    fn toggles(&self) -> &'static [&'static str] {
        &[SHOW_PASSWORD, SHOW_CONFIRM_PASSWORD, AGREE_TERMS]
    }

    fn reveals(&self, field: &str) -> bool {
        match field {
            "password" => self.controller.flag(SHOW_PASSWORD),
            "confirmPassword" => self.controller.flag(SHOW_CONFIRM_PASSWORD),
            _ => false,
        }
    }

    fn submit(&mut self, router: &mut dyn Router, alerts: &mut dyn AlertSurface) -> SubmitOutcome {
        let data = Value::Object(public_fields(&self.controller));
        let agreed = self.controller.flag(AGREE_TERMS);
        let outcome = self.controller.submit(|_| {
            if !agreed {
                return Err(SubmitBlocked::new(TERMS_MESSAGE));
            }
            info!(form = "signup", data = %data, "sign up values");
            Ok(())
        });

        match &outcome {
            SubmitOutcome::Submitted => {
                let alert = Alert::new("Success", "Account created successfully!")
                    .with_button(AlertButton::ok_then(AlertAction::Replace(Route::SignIn)));
                confirm(&mut self.controller, router, alerts, &alert);
            }
            SubmitOutcome::Blocked(reason) => {
                warn!(form = "signup", reason = %reason, "submit blocked");
                alerts.show(&Alert::new("Error", reason.clone()));
            }
            SubmitOutcome::Invalid(_) => {}
        }
        outcome
    }
}

/// Static hub linking to the sign-in and sign-up screens.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuthScreen;

impl AuthScreen {
    pub const TITLE: &'static str = "Authentication";
    pub const SUBTITLE: &'static str = "Choose your authentication method";

    pub fn sign_in(&self, router: &mut dyn Router) {
        router.navigate_to(Route::SignIn);
    }

    pub fn sign_up(&self, router: &mut dyn Router) {
        router.navigate_to(Route::SignUp);
    }
}
