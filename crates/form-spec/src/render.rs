use serde_json::{Map, Value, json};

use crate::controller::{FormController, FormState};

const MASK: char = '•';

/// Progress counters exposed to renderers.
#[derive(Debug, Clone)]
pub struct RenderProgress {
    pub touched: usize,
    pub total: usize,
}

/// Describes a single field for render outputs.
#[derive(Debug, Clone)]
pub struct RenderField {
    pub name: String,
    pub label: String,
    pub placeholder: Option<String>,
    pub required: bool,
    pub secret: bool,
    pub revealed: bool,
    /// Value as it should be displayed (masked when secret and hidden).
    pub display_value: String,
    pub error: Option<String>,
}

/// Collected payload used by both text and JSON renderers.
#[derive(Debug, Clone)]
pub struct RenderPayload {
    pub form_id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub state: FormState,
    pub progress: RenderProgress,
    pub fields: Vec<RenderField>,
    pub flags: Vec<(String, bool)>,
}

/// Build the renderer payload from a controller. `reveal` decides whether a
/// secret field is currently shown in clear text.
pub fn build_render_payload<F>(controller: &FormController, reveal: F) -> RenderPayload
where
    F: Fn(&str) -> bool,
{
    let spec = controller.spec();
    let record = controller.record();

    let fields = spec
        .fields
        .iter()
        .map(|field| {
            let value = record.get(&field.name);
            let revealed = !field.secret || reveal(&field.name);
            let display_value = if revealed {
                value.to_string()
            } else {
                MASK.to_string().repeat(value.chars().count())
            };
            RenderField {
                name: field.name.clone(),
                label: field.display_label().to_string(),
                placeholder: field.placeholder.clone(),
                required: field.required,
                secret: field.secret,
                revealed,
                display_value,
                error: controller.error(&field.name).map(String::from),
            }
        })
        .collect::<Vec<_>>();

    RenderPayload {
        form_id: spec.id.clone(),
        title: spec.title.clone(),
        subtitle: spec.subtitle.clone(),
        state: controller.state(),
        progress: RenderProgress {
            touched: controller.touched_count(),
            total: spec.fields.len(),
        },
        fields,
        flags: controller
            .flags()
            .map(|(name, value)| (name.to_string(), value))
            .collect(),
    }
}

/// Render the payload as a structured JSON-friendly value.
pub fn render_json_ui(payload: &RenderPayload) -> Value {
    let fields = payload
        .fields
        .iter()
        .map(|field| {
            let mut map = Map::new();
            map.insert("name".into(), Value::String(field.name.clone()));
            map.insert("label".into(), Value::String(field.label.clone()));
            map.insert(
                "placeholder".into(),
                field
                    .placeholder
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            map.insert("required".into(), Value::Bool(field.required));
            map.insert("secret".into(), Value::Bool(field.secret));
            map.insert("value".into(), Value::String(field.display_value.clone()));
            if let Some(error) = &field.error {
                map.insert("error".into(), Value::String(error.clone()));
            }
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    let flags = payload
        .flags
        .iter()
        .map(|(name, value)| (name.clone(), Value::Bool(*value)))
        .collect::<Map<_, _>>();

    json!({
        "form_id": payload.form_id,
        "title": payload.title,
        "subtitle": payload.subtitle,
        "state": payload.state.as_str(),
        "progress": {
            "touched": payload.progress.touched,
            "total": payload.progress.total,
        },
        "fields": fields,
        "flags": flags,
    })
}

/// Render the payload as human-friendly text.
pub fn render_text(payload: &RenderPayload) -> String {
    let mut lines = Vec::new();
    lines.push(format!("Form: {} ({})", payload.title, payload.form_id));
    if let Some(subtitle) = &payload.subtitle {
        lines.push(subtitle.clone());
    }
    lines.push(format!(
        "State: {} ({}/{} touched)",
        payload.state.as_str(),
        payload.progress.touched,
        payload.progress.total
    ));

    for field in &payload.fields {
        let mut entry = format!(" - {}", field.label);
        if field.required {
            entry.push_str(" *");
        }
        if field.display_value.is_empty() {
            if let Some(placeholder) = &field.placeholder {
                entry.push_str(&format!(" [{}]", placeholder));
            }
        } else {
            entry.push_str(&format!(" = {}", field.display_value));
        }
        lines.push(entry);
        if let Some(error) = &field.error {
            lines.push(format!("   ! {}", error));
        }
    }

    for (name, value) in &payload.flags {
        lines.push(format!(" [{}] {}", if *value { "x" } else { " " }, name));
    }

    lines.join("\n")
}
