//! Render grouped entries into a release section.

use serde::Serialize;

use crate::error::TemplateError;
use crate::template::CompiledTemplate;

use super::groups::EntryGroup;

/// Default release section template.
pub const DEFAULT_RELEASE_TEMPLATE: &str = "# Release {{ releaseNumber }} - {{ date(\"%Y-%m-%d\") }}\n\n{% for group in entryGroups %}## {{ group.label | capitalize }}\n\n{% for item in group.items %}- {{ item }}\n{% endfor %}\n{% endfor %}---\n";

/// The context a release template is rendered with.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseRenderContext<'a> {
    pub entry_groups: &'a [EntryGroup],
    pub release_number: &'a str,
}

/// Applies the compiled release template to a [`ReleaseRenderContext`].
#[derive(Debug)]
pub struct ReleaseRenderer {
    template: CompiledTemplate,
}

impl ReleaseRenderer {
    pub fn new(template: CompiledTemplate) -> Self {
        Self { template }
    }

    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        CompiledTemplate::compile(source).map(Self::new)
    }

    pub fn render(&self, context: &ReleaseRenderContext<'_>) -> Result<String, TemplateError> {
        self.template.render(context)
    }
}

impl Default for ReleaseRenderer {
    fn default() -> Self {
        // The built-in template is covered by tests; a failure here is a bug.
        Self::compile(DEFAULT_RELEASE_TEMPLATE)
            .unwrap_or_else(|e| unreachable!("default release template is valid: {e}"))
    }
}
