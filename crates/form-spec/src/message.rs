use handlebars::{Handlebars, no_escape};
use serde_json::{Map, Value};

/// Renders failure messages that may reference `{{label}}`, `{{min}}`,
/// `{{max}}` or `{{other}}`.
pub struct MessageRenderer {
    registry: Handlebars<'static>,
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageRenderer {
    pub fn new() -> Self {
        let mut registry = Handlebars::new();
        registry.register_escape_fn(no_escape);
        Self { registry }
    }

    /// Renders `template`; a template that fails to render is returned verbatim.
    pub fn render(&self, template: &str, ctx: &MessageContext) -> String {
        if !template.contains("{{") {
            return template.to_string();
        }
        self.registry
            .render_template(template, &ctx.to_value())
            .unwrap_or_else(|_| template.to_string())
    }
}

/// Values available to message templates.
#[derive(Debug, Clone, Default)]
pub struct MessageContext {
    pub label: String,
    pub min: Option<String>,
    pub max: Option<String>,
    pub other: Option<String>,
}

impl MessageContext {
    pub fn for_label(label: &str) -> Self {
        Self {
            label: label.to_string(),
            ..Self::default()
        }
    }

    pub fn with_min(mut self, min: impl ToString) -> Self {
        self.min = Some(min.to_string());
        self
    }

    pub fn with_max(mut self, max: impl ToString) -> Self {
        self.max = Some(max.to_string());
        self
    }

    pub fn with_other(mut self, other: &str) -> Self {
        self.other = Some(other.to_string());
        self
    }

    fn to_value(&self) -> Value {
        let mut map = Map::new();
        map.insert("label".into(), Value::String(self.label.clone()));
        for (key, value) in [("min", &self.min), ("max", &self.max), ("other", &self.other)] {
            if let Some(value) = value {
                map.insert(key.into(), Value::String(value.clone()));
            }
        }
        Value::Object(map)
    }
}

/// Formats a bound without a trailing `.0` for whole numbers.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_placeholders() {
        let renderer = MessageRenderer::new();
        let ctx = MessageContext::for_label("Full name").with_min(2);
        assert_eq!(
            renderer.render("{{label}} must be at least {{min}} characters", &ctx),
            "Full name must be at least 2 characters"
        );
    }

    #[test]
    fn does_not_escape_markup() {
        let renderer = MessageRenderer::new();
        let ctx = MessageContext::for_label("Terms & <conditions>");
        assert_eq!(
            renderer.render("{{label}} is required", &ctx),
            "Terms & <conditions> is required"
        );
    }

    #[test]
    fn broken_template_is_returned_verbatim() {
        let renderer = MessageRenderer::new();
        let ctx = MessageContext::for_label("x");
        assert_eq!(renderer.render("{{#if}}oops", &ctx), "{{#if}}oops");
    }

    #[test]
    fn whole_numbers_drop_fraction() {
        assert_eq!(format_number(20000.0), "20000");
        assert_eq!(format_number(2.5), "2.5");
    }
}
