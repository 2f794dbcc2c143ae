//! Compare the attributes of a selected variant with the requested ones.

use depsight_core::attributes::{AttributeSet, AttributeValue};
use depsight_resolver::graph::ResolvedVariant;
use depsight_util::term::{StyledOutput, TextStyle};

/// How one variant attribute relates to the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeMatch {
    /// Requested with this value (possibly after textual coercion).
    Matched(AttributeValue),
    /// Requested with another value; the variant was still compatible.
    DifferentValue(AttributeValue),
    NotRequested,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantAttribute {
    pub name: String,
    pub value: AttributeValue,
    pub matched: AttributeMatch,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeMatchResult {
    /// One entry per variant attribute, in name order.
    pub found: Vec<VariantAttribute>,
    /// Requested attributes the variant does not carry at all.
    pub missing: Vec<(String, AttributeValue)>,
    /// Widest attribute name across both sets.
    pub width: usize,
}

impl AttributeMatchResult {
    /// Whether any requested attribute name was present on the variant.
    pub fn any_requested_found(&self) -> bool {
        self.found
            .iter()
            .any(|a| !matches!(a.matched, AttributeMatch::NotRequested))
    }
}

/// The attributes a dependency effectively requests: the configuration's,
/// overridden by the dependency's own on a name clash.
pub fn effective_requested(configuration: &AttributeSet, dependency: &AttributeSet) -> AttributeSet {
    configuration.concat(dependency)
}

/// Classify every variant attribute by name against `requested`.
pub fn match_attributes(variant: &AttributeSet, requested: &AttributeSet) -> AttributeMatchResult {
    let found = variant
        .iter()
        .map(|(name, value)| VariantAttribute {
            name: name.to_string(),
            value: value.clone(),
            matched: match requested.get(name) {
                Some(wanted) if values_match(value, wanted) => AttributeMatch::Matched(wanted.clone()),
                Some(wanted) => AttributeMatch::DifferentValue(wanted.clone()),
                None => AttributeMatch::NotRequested,
            },
        })
        .collect();
    let missing = requested
        .iter()
        .filter(|(name, _)| !variant.contains(name))
        .map(|(name, value)| (name.to_string(), value.clone()))
        .collect();
    let width = variant.names().chain(requested.names()).map(str::len).max().unwrap_or(0);
    AttributeMatchResult {
        found,
        missing,
        width,
    }
}

/// Same declared type: structural equality. Different types: compare the
/// textual forms.
fn values_match(actual: &AttributeValue, requested: &AttributeValue) -> bool {
    if actual.type_name() == requested.type_name() {
        actual == requested
    } else {
        actual.to_string() == requested.to_string()
    }
}

/// Write the `variant "<name>"` line and its attribute block. Every line is
/// prefixed with `margin`, so the block can sit inside a tree.
pub fn render_variant(
    out: &mut StyledOutput,
    margin: &str,
    variant: &ResolvedVariant,
    requested: &AttributeSet,
) {
    out.text(margin).styled(
        TextStyle::Description,
        format!("   variant \"{}\"", variant.display_name),
    );
    if !variant.attributes.is_empty() || !requested.is_empty() {
        let result = match_attributes(&variant.attributes, requested);
        write_attribute_block(out, margin, &result);
    }
    out.println();
}

fn write_attribute_block(out: &mut StyledOutput, margin: &str, result: &AttributeMatchResult) {
    let width = result.width;
    out.styled(TextStyle::Description, " [").println();
    for attribute in &result.found {
        out.text(margin).styled(
            TextStyle::Description,
            format!("      {:<width$} = {}", attribute.name, attribute.value),
        );
        match &attribute.matched {
            AttributeMatch::Matched(_) => {}
            AttributeMatch::DifferentValue(wanted) => {
                out.styled(TextStyle::Info, format!(" (compatible with: {wanted})"));
            }
            AttributeMatch::NotRequested => {
                out.styled(TextStyle::Info, " (not requested)");
            }
        }
        out.println();
    }
    if !result.missing.is_empty() {
        if result.any_requested_found() {
            out.text(margin.trim_end()).println();
        }
        out.text(margin).styled(
            TextStyle::Description,
            "      Requested attributes not found in the selected variant:",
        );
        out.println();
        for (name, value) in &result.missing {
            out.text(margin)
                .styled(TextStyle::Description, format!("         {name:<width$} = {value}"));
            out.println();
        }
    }
    out.text(margin).styled(TextStyle::Description, "   ]");
}
