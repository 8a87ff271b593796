#![allow(missing_docs)]

pub mod nav;
pub mod routes;
pub mod rules;
pub mod screens;

pub use nav::{Alert, AlertAction, AlertButton, AlertSurface, Router, StackRouter};
pub use routes::{Route, Tab};
pub use rules::ScreenError;
pub use screens::{AuthScreen, EmployeeScreen, FormScreen, SignInScreen, SignUpScreen};
