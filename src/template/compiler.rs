//! Compile template sources into reusable renderers backed by minijinja.

use std::fmt::{self, Write as _};

use chrono::Utc;
use minijinja::{Environment, ErrorKind, UndefinedBehavior};
use serde::Serialize;

use crate::error::TemplateError;

/// Name under which the single template of a [`CompiledTemplate`] is stored.
const TEMPLATE_NAME: &str = "template";

/// Date format used by `date()` when called without arguments.
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";

/// A template compiled once and rendered against any serializable context.
///
/// Rendering is side-effect free apart from the `date()` helper reading the
/// current clock.
pub struct CompiledTemplate {
    env: Environment<'static>,
    source: String,
}

impl CompiledTemplate {
    /// Compile `source`, failing with [`TemplateError::Syntax`] if the markup is invalid.
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.set_auto_escape_callback(|_| minijinja::AutoEscape::None);
        env.add_filter("capitalize", capitalize);
        env.add_function("date", date);

        env.add_template_owned(TEMPLATE_NAME, source.to_string())
            .map_err(TemplateError::Syntax)?;

        Ok(Self {
            env,
            source: source.to_string(),
        })
    }

    /// Render the template with the given context.
    pub fn render<S: Serialize>(&self, context: S) -> Result<String, TemplateError> {
        let template = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(TemplateError::Render)?;
        template.render(context).map_err(TemplateError::Render)
    }

    /// The source the template was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Debug for CompiledTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledTemplate")
            .field("source", &self.source)
            .finish()
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(value: String) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Current UTC date in strftime `format`. An invalid format is a render error.
fn date(format: Option<String>) -> Result<String, minijinja::Error> {
    let format = format.as_deref().unwrap_or(DEFAULT_DATE_FORMAT);
    let mut out = String::new();
    write!(out, "{}", Utc::now().format(format)).map_err(|_| {
        minijinja::Error::new(
            ErrorKind::InvalidOperation,
            format!("invalid date format '{format}'"),
        )
    })?;
    Ok(out)
}
