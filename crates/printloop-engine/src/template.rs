//! Loop-code template rendering
//!
//! Printer definitions carry a text template that expands, once per
//! iteration, into the G-code placed between body copies (cooldown,
//! ejection sweep, restart priming). Templates use `{{ expression }}`
//! substitution against a fixed data context plus four arithmetic
//! helpers. The template is parsed once per transformation and rendered
//! per iteration.

use std::collections::BTreeMap;

use minijinja::Environment;
use printloop_core::{MarkerPositions, ProcessingRequest, TemplateError};
use serde::Serialize;
use toml::Value;

const TEMPLATE_NAME: &str = "loop-code";

/// The per-iteration data context, exposed to templates in PascalCase.
#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TemplateData<'a> {
    printer_name: &'a str,
    iteration: i64,
    request: &'a ProcessingRequest,
    config: &'a BTreeMap<String, Value>,
    positions: &'a MarkerPositions,
}

/// A parsed loop-code template
///
/// Helpers are a closed table registered at parse time; templates cannot
/// add their own.
#[derive(Debug)]
pub struct LoopTemplate {
    env: Environment<'static>,
}

impl LoopTemplate {
    /// Parse template source, registering the `add`, `sub`, `mul`, and
    /// `max` helpers.
    pub fn parse(source: &str) -> std::result::Result<Self, TemplateError> {
        let mut env = Environment::new();
        // Missing context fields must fail the render, not vanish.
        env.set_undefined_behavior(minijinja::UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);
        env.add_function("add", |a: f64, b: f64| a + b);
        env.add_function("sub", |a: f64, b: f64| a - b);
        env.add_function("mul", |a: i64, b: i64| a * b);
        env.add_function("max", |a: f64, b: f64| if a > b { a } else { b });

        env.add_template_owned(TEMPLATE_NAME.to_string(), source.to_string())
            .map_err(|e| TemplateError::Parse {
                message: e.to_string(),
            })?;

        Ok(Self { env })
    }

    /// Render the loop code for one iteration.
    ///
    /// The rendered text is split on line feeds and empty lines are
    /// dropped, unless the entire output is a single (possibly empty)
    /// line, which is returned verbatim.
    pub fn render(
        &self,
        iteration: i64,
        printer_name: &str,
        request: &ProcessingRequest,
        config: &BTreeMap<String, Value>,
        positions: &MarkerPositions,
    ) -> std::result::Result<Vec<String>, TemplateError> {
        let data = TemplateData {
            printer_name,
            iteration,
            request,
            config,
            positions,
        };

        let template =
            self.env
                .get_template(TEMPLATE_NAME)
                .map_err(|e| TemplateError::Render {
                    iteration,
                    message: e.to_string(),
                })?;

        let output = template
            .render(&data)
            .map_err(|e| TemplateError::Render {
                iteration,
                message: e.to_string(),
            })?;

        let lines: Vec<&str> = output.split('\n').collect();
        if lines.len() == 1 {
            return Ok(vec![lines[0].to_string()]);
        }

        Ok(lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect())
    }
}
