//! Label and annotation template normalization.
//!
//! Vendors allow label and annotation values to reference other labels, e.g.
//! `runbook: "https://wiki.example.net/alerts/{app}/{alertname}"`. Before
//! projection every value is rendered once against a source map:
//!
//! - labels are rendered against the *original* labels;
//! - annotations are rendered against the *normalized* labels.
//!
//! Rendering is a single non-recursive pass. A value whose template cannot be
//! rendered (missing key, unbalanced brace, unsupported field syntax) keeps
//! its literal text; the failure never reaches the caller.
//!
//! # Template syntax
//!
//! | Input     | Output                              |
//! |-----------|-------------------------------------|
//! | `{name}`  | value of `name` in the source map   |
//! | `{{`      | `{`                                 |
//! | `}}`      | `}`                                 |
//!
//! Positional fields (`{0}`, `{}`), attribute or index access (`{a.b}`,
//! `{a[0]}`), conversions (`{a!r}`) and format specs (`{a:>5}`) are rejected.

use indexmap::IndexMap;
use tracing::debug;

/// String-to-string mapping that keeps payload order.
pub type LabelMap = IndexMap<String, String>;

/// Reasons a template value could not be rendered.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TemplateError {
    #[error("unknown template key '{key}'")]
    MissingKey { key: String },

    #[error("unbalanced brace at byte {position}")]
    UnbalancedBrace { position: usize },

    #[error("unsupported template field '{field}'")]
    UnsupportedField { field: String },
}

/// Normalize labels and annotations in one pass each.
///
/// Returns `(labels, annotations)` with the same keys, in the same order, as
/// the inputs.
///
/// # Examples
///
/// ```rust
/// use alert_intake_core::webhook::labels::{normalize, LabelMap};
///
/// let labels: LabelMap = [("app", "billing"), ("runbook", "wiki/{app}")]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v.to_string()))
///     .collect();
/// let annotations: LabelMap = [("summary", "{runbook} is down")]
///     .into_iter()
///     .map(|(k, v)| (k.to_string(), v.to_string()))
///     .collect();
///
/// let (labels, annotations) = normalize(&labels, &annotations);
/// assert_eq!(labels["runbook"], "wiki/billing");
/// assert_eq!(annotations["summary"], "wiki/billing is down");
/// ```
pub fn normalize(labels: &LabelMap, annotations: &LabelMap) -> (LabelMap, LabelMap) {
    let normalized_labels = render_all(labels, labels);
    let normalized_annotations = render_all(annotations, &normalized_labels);
    (normalized_labels, normalized_annotations)
}

/// Render every value of `values` against `source`, keeping literals on failure.
fn render_all(values: &LabelMap, source: &LabelMap) -> LabelMap {
    values
        .iter()
        .map(|(key, value)| {
            let rendered = match render_template(value, source) {
                Ok(rendered) => rendered,
                Err(e) => {
                    debug!(key = %key, error = %e, "Keeping literal value after template failure");
                    value.clone()
                }
            };
            (key.clone(), rendered)
        })
        .collect()
}

/// Render a single template against `source`.
///
/// # Errors
///
/// Returns [`TemplateError`] when the template references a key absent from
/// `source`, contains an unmatched `{` or `}`, or uses field syntax other than
/// a plain name.
pub fn render_template(template: &str, source: &LabelMap) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.char_indices().peekable();

    while let Some((position, c)) = chars.next() {
        match c {
            '{' => {
                if matches!(chars.peek(), Some((_, '{'))) {
                    chars.next();
                    out.push('{');
                    continue;
                }

                let mut field = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    match c {
                        '}' => {
                            closed = true;
                            break;
                        }
                        '{' => return Err(TemplateError::UnbalancedBrace { position }),
                        _ => field.push(c),
                    }
                }
                if !closed {
                    return Err(TemplateError::UnbalancedBrace { position });
                }
                if !is_plain_field(&field) {
                    return Err(TemplateError::UnsupportedField { field });
                }

                let value = source
                    .get(&field)
                    .ok_or(TemplateError::MissingKey { key: field })?;
                out.push_str(value);
            }
            '}' => {
                if matches!(chars.peek(), Some((_, '}'))) {
                    chars.next();
                    out.push('}');
                } else {
                    return Err(TemplateError::UnbalancedBrace { position });
                }
            }
            _ => out.push(c),
        }
    }

    Ok(out)
}

fn is_plain_field(field: &str) -> bool {
    !field.is_empty()
        && !field.chars().all(|c| c.is_ascii_digit())
        && !field.contains(['.', '[', '!', ':'])
}

#[cfg(test)]
#[path = "labels_tests.rs"]
mod tests;
