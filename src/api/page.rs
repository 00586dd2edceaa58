//! Form page rendering (minijinja)

use minijinja::{context, Environment};

use crate::error::{HuellaError, Result};

const TEMPLATE_NAME: &str = "index.html";
const TEMPLATE_SRC: &str = include_str!("../../templates/index.html");

/// Renders the survey form, optionally with a result or error embedded
///
/// The `.html` template name turns on minijinja's HTML auto-escaping, so
/// error messages are safe to embed.
pub struct PageRenderer {
    env: Environment<'static>,
    unit_label: Option<String>,
}

impl std::fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRenderer")
            .field("unit_label", &self.unit_label)
            .finish_non_exhaustive()
    }
}

impl PageRenderer {
    /// Compile the built-in form template
    ///
    /// # Errors
    ///
    /// Returns `Template` if the template fails to compile.
    pub fn new(unit_label: Option<String>) -> Result<Self> {
        let mut env = Environment::new();
        env.add_template(TEMPLATE_NAME, TEMPLATE_SRC)
            .map_err(|e| HuellaError::Template {
                reason: format!("Invalid template syntax: {e}"),
            })?;
        Ok(Self { env, unit_label })
    }

    /// Render the page
    ///
    /// # Errors
    ///
    /// Returns `Template` if rendering fails.
    pub fn render(&self, result: Option<f64>, error: Option<&str>) -> Result<String> {
        let tmpl = self
            .env
            .get_template(TEMPLATE_NAME)
            .map_err(|e| HuellaError::Template {
                reason: format!("Template error: {e}"),
            })?;

        tmpl.render(context!(
            result => result,
            error => error,
            unit => self.unit_label.as_deref(),
        ))
        .map_err(|e| HuellaError::Template {
            reason: format!("Render error: {e}"),
        })
    }
}
