//! Named registry of concluded variants and the INI-style variants file.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::conclude::FinalVariant;
use crate::error::VariantError;
use crate::parser::{Config, VariantParser};
use crate::variant::Variant;

/// Registry of concluded variants by name.
///
/// Populated during setup through `&mut self`, shared read-only afterwards.
#[derive(Debug, Default)]
pub struct VariantMap {
    variants: BTreeMap<String, Arc<FinalVariant>>,
}

impl VariantMap {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding the built-in variants.
    pub fn with_builtins() -> Self {
        let mut map = Self::new();
        for (name, variant) in [("chess", Variant::chess()), ("spell-chess", Variant::spell_chess())] {
            if let Err(e) = map.add(name, variant) {
                warn!(variant = name, error = %e, "built-in variant rejected");
            }
        }
        map
    }

    /// Conclude `variant` and register it under `name`.
    pub fn add(&mut self, name: &str, variant: Variant) -> Result<Arc<FinalVariant>, VariantError> {
        if self.variants.contains_key(name) {
            return Err(VariantError::DuplicateVariant {
                name: name.to_string(),
            });
        }
        let concluded = Arc::new(variant.conclude()?);
        self.variants.insert(name.to_string(), Arc::clone(&concluded));
        debug!(variant = name, dimensions = concluded.layout().dimensions(), "variant registered");
        Ok(concluded)
    }

    pub fn get(&self, name: &str) -> Option<&Arc<FinalVariant>> {
        self.variants.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variants.contains_key(name)
    }

    pub fn remove(&mut self, name: &str) -> Option<Arc<FinalVariant>> {
        self.variants.remove(name)
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.variants.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Arc<FinalVariant>)> {
        self.variants.iter().map(|(name, v)| (name.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Read variant definitions from INI-style text.
    ///
    /// Each `[name]` or `[name:parent]` section starts from the default
    /// rules or a copy of the registered parent. With `check` set the new
    /// variants are only registered while the text is being read, so that
    /// later sections can inherit from them, and are removed afterwards.
    ///
    /// Every diagnostic is logged and returned; none aborts the parse.
    pub fn parse_str(&mut self, text: &str, check: bool) -> Vec<VariantError> {
        let mut errors = Vec::new();
        let mut temporary = Vec::new();

        for section in split_sections(text, check, &mut errors) {
            if self.contains(section.name) {
                errors.push(VariantError::DuplicateVariant {
                    name: section.name.to_string(),
                });
                continue;
            }
            let base = match section.template {
                None => Variant::default(),
                Some(template) => match self.get(template) {
                    Some(parent) => parent.variant().clone(),
                    None => {
                        errors.push(VariantError::UnknownTemplate {
                            name: section.name.to_string(),
                            template: template.to_string(),
                        });
                        continue;
                    }
                },
            };

            if check {
                debug!(variant = section.name, "parsing variant");
            }
            let (variant, diagnostics) = VariantParser::new(section.name, &section.attribs).parse(base);
            errors.extend(diagnostics);

            match self.add(section.name, variant) {
                Ok(_) if check => temporary.push(section.name),
                Ok(_) => info!(variant = section.name, "variant loaded"),
                Err(e) => errors.push(e),
            }
        }

        for name in temporary {
            self.remove(name);
        }
        for e in &errors {
            warn!(error = %e, "variant configuration");
        }
        errors
    }

    /// Read variant definitions from a file. See [`VariantMap::parse_str`].
    pub fn parse_file(&mut self, path: impl AsRef<Path>, check: bool) -> Result<Vec<VariantError>, VariantError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| VariantError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.parse_str(&text, check))
    }
}

struct Section<'a> {
    name: &'a str,
    template: Option<&'a str>,
    attribs: Config,
}

/// Split text into sections. Lines before the first header are ignored;
/// lines without `=` are skipped and reported only when `check` is set.
fn split_sections<'a>(text: &'a str, check: bool, errors: &mut Vec<VariantError>) -> Vec<Section<'a>> {
    let mut sections: Vec<Section<'a>> = Vec::new();

    for line in text.lines() {
        let line = line.strip_suffix('\r').unwrap_or(line);

        if let Some(header) = line.strip_prefix('[') {
            let header = header.split_once(']').map_or(header, |(inside, _)| inside);
            let (name, template) = match header.split_once(':') {
                Some((name, template)) => (name, Some(template).filter(|t| !t.is_empty())),
                None => (header, None),
            };
            sections.push(Section {
                name,
                template,
                attribs: Config::new(),
            });
            continue;
        }

        let Some(section) = sections.last_mut() else {
            continue;
        };
        if line.starts_with(';') || line.starts_with('#') || line.trim().is_empty() {
            continue;
        }
        match line.split_once('=') {
            Some((key, value)) if !key.trim().is_empty() => {
                section
                    .attribs
                    .insert(key.trim().to_string(), value.trim().to_string());
            }
            Some(_) => {}
            None if check => errors.push(VariantError::InvalidSyntax {
                line: line.to_string(),
            }),
            None => {}
        }
    }
    sections
}
