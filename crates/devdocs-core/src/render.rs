//! HTML rendering of the navigation tree and of validation results.
//!
//! This is the only layer that produces markup. Links carry
//! `data-section` attributes equal to the menu entry ids so the scroll-spy
//! can map page sections back to navigation entries.

use minijinja::{AutoEscape, Environment, Value, context};

use crate::error::RenderError;
use crate::nav::MenuEntry;
use crate::spy::NavState;
use crate::validate::ValidationOutcome;

fn html_environment(name: &'static str, source: &'static str) -> Result<Environment<'static>, RenderError> {
    let mut env = Environment::new();
    env.set_trim_blocks(true);
    env.set_auto_escape_callback(|_| AutoEscape::Html);
    env.add_template(name, source)?;
    Ok(env)
}

/// Render the navigation list with the given active/expanded markings.
pub fn render_menu(entries: &[MenuEntry], state: &NavState) -> Result<String, RenderError> {
    let env = html_environment("nav.html.j2", include_str!("../templates/nav.html.j2"))?;
    let tmpl = env.get_template("nav.html.j2")?;

    let items: Vec<Value> = entries.iter().map(|e| entry_ctx(e, state)).collect();
    Ok(tmpl.render(context! { items => items })?)
}

fn entry_ctx(entry: &MenuEntry, state: &NavState) -> Value {
    let children: Vec<Value> = entry
        .children()
        .iter()
        .map(|child| entry_ctx(child, state))
        .collect();
    let method = match entry {
        MenuEntry::Endpoint(endpoint) => Some(endpoint.method.clone()),
        _ => None,
    };

    context! {
        id => entry.id(),
        title => entry.title(),
        icon => entry.icon(),
        method => method,
        expandable => matches!(entry, MenuEntry::Expandable(_)),
        expanded => state.is_expanded(entry.id()),
        active => state.is_active(entry.id()),
        children => children,
    }
}

/// Render the result panel shown next to the contract editor.
pub fn render_validation(outcome: &ValidationOutcome) -> Result<String, RenderError> {
    let env = html_environment(
        "validation.html.j2",
        include_str!("../templates/validation.html.j2"),
    )?;
    let tmpl = env.get_template("validation.html.j2")?;

    let ctx = match outcome {
        ValidationOutcome::Valid(summary) => context! {
            outcome => "valid",
            summary => Value::from_serialize(summary),
        },
        ValidationOutcome::Empty => context! { outcome => "empty" },
        ValidationOutcome::Invalid(err) => context! {
            outcome => "invalid",
            message => err.message.clone(),
            details => err.details.clone(),
        },
    };

    Ok(tmpl.render(ctx)?)
}
