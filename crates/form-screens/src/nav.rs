use tracing::debug;

use crate::routes::Route;

/// Navigation collaborator used after a successful submit.
pub trait Router {
    fn navigate_back(&mut self);
    fn navigate_to(&mut self, route: Route);
    fn replace(&mut self, route: Route);
}

/// History stack router. The root entry is never popped.
#[derive(Debug, Clone)]
pub struct StackRouter {
    history: Vec<Route>,
}

impl StackRouter {
    pub fn new(root: Route) -> Self {
        Self {
            history: vec![root],
        }
    }

    pub fn current(&self) -> Route {
        self.history.last().copied().unwrap_or(Route::Employee)
    }

    pub fn depth(&self) -> usize {
        self.history.len()
    }

    /// Drops the history and starts over at `root` (tab switch).
    pub fn switch_to(&mut self, root: Route) {
        self.history.clear();
        self.history.push(root);
    }
}

impl Router for StackRouter {
    fn navigate_back(&mut self) {
        if self.history.len() > 1 {
            self.history.pop();
        }
        debug!(route = %self.current(), "navigated back");
    }

    fn navigate_to(&mut self, route: Route) {
        self.history.push(route);
        debug!(route = %route, "navigated");
    }

    fn replace(&mut self, route: Route) {
        self.history.pop();
        self.history.push(route);
        debug!(route = %route, "replaced route");
    }
}

/// Follow-up run when an alert button is pressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertAction {
    ResetForm,
    NavigateBack,
    Replace(Route),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertButton {
    pub label: String,
    pub action: Option<AlertAction>,
}

impl AlertButton {
    pub fn ok() -> Self {
        Self {
            label: "OK".into(),
            action: None,
        }
    }

    pub fn ok_then(action: AlertAction) -> Self {
        Self {
            label: "OK".into(),
            action: Some(action),
        }
    }
}

/// Modal dialog shown to confirm a submit or report a blocked one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alert {
    pub title: String,
    pub message: String,
    pub buttons: Vec<AlertButton>,
}

impl Alert {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_button(mut self, button: AlertButton) -> Self {
        self.buttons.push(button);
        self
    }

    /// Buttons as displayed; a dialog without buttons shows a plain OK.
    pub fn effective_buttons(&self) -> Vec<AlertButton> {
        if self.buttons.is_empty() {
            vec![AlertButton::ok()]
        } else {
            self.buttons.clone()
        }
    }

    /// Action bound to the button at `index`, if any.
    pub fn action_for(&self, index: usize) -> Option<AlertAction> {
        self.buttons
            .get(index)
            .and_then(|button| button.action.clone())
    }
}

/// Dialog collaborator. Returns the index of the pressed button, or `None`
/// when the dialog was dismissed without a choice.
pub trait AlertSurface {
    fn show(&mut self, alert: &Alert) -> Option<usize>;
}
