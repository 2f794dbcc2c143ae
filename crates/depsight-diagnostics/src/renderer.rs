//! Text rendering of the insight report tree.

use std::collections::HashSet;

use depsight_core::attributes::AttributeSet;
use depsight_core::config::DEFAULT_TRAILER;
use depsight_util::term::{StyledOutput, TextStyle};

use crate::attributes::{effective_requested, render_variant};
use crate::renderable::{RenderableDependency, ResolutionState, Section, Signature};

const REPEATED_LEGEND: &str = " - dependencies omitted (listed previously)";
const UNRESOLVED_LEGEND: &str = " - Not resolved (no version could be selected)";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Attributes requested by the configuration; merged under each
    /// dependency's own attributes when explaining variants.
    pub configuration_attributes: AttributeSet,
    /// Last line of the report. Empty to omit.
    pub trailer: String,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            configuration_attributes: AttributeSet::new(),
            trailer: DEFAULT_TRAILER.to_string(),
        }
    }
}

/// Symbols used so far, and subtrees already printed.
#[derive(Default)]
struct Walk {
    seen: HashSet<Signature>,
    repeated: bool,
    unresolved: bool,
}

pub struct GraphRenderer {
    options: RenderOptions,
}

impl GraphRenderer {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render into a fresh plain-text buffer.
    pub fn render(&self, roots: &[RenderableDependency]) -> StyledOutput {
        let mut out = StyledOutput::plain();
        self.render_into(roots, &mut out);
        out
    }

    pub fn render_into(&self, roots: &[RenderableDependency], out: &mut StyledOutput) {
        let mut walk = Walk::default();
        for (i, root) in roots.iter().enumerate() {
            if i > 0 {
                out.println();
            }
            // Every root is a distinct outcome and is always shown in full.
            self.header(out, root, &mut walk);
            walk.seen.insert(root.signature());
            out.println();
            self.body(out, root, "");
            self.children(out, root, "", &mut walk);
        }
        self.legend(out, &walk);
        if !self.options.trailer.is_empty() {
            out.println();
            self.trailer(out);
            out.println();
        }
    }

    /// Name, description and state markers.
    fn header(&self, out: &mut StyledOutput, node: &RenderableDependency, walk: &mut Walk) {
        out.styled(TextStyle::Identifier, node.name());
        if let Some(description) = node.description.as_deref().filter(|d| !d.is_empty()) {
            out.styled(TextStyle::Description, format!(" ({description})"));
        }
        match node.state() {
            ResolutionState::Resolved => {}
            ResolutionState::Failed => {
                out.styled(TextStyle::Failure, " FAILED");
            }
            ResolutionState::Unresolved => {
                walk.unresolved = true;
                out.styled(TextStyle::Failure, " (n)");
            }
        }
    }

    /// Whether the subtree was already printed and must not be expanded again.
    fn repeated(
        &self,
        out: &mut StyledOutput,
        node: &RenderableDependency,
        walk: &mut Walk,
    ) -> bool {
        let repeated =
            node.is_omitted() || (!node.is_leaf() && !walk.seen.insert(node.signature()));
        if repeated {
            walk.repeated = true;
            out.styled(TextStyle::Info, " (*)");
        }
        repeated
    }

    fn body(&self, out: &mut StyledOutput, node: &RenderableDependency, margin: &str) {
        if let Some(variant) = &node.variant {
            let requested = effective_requested(
                &self.options.configuration_attributes,
                &node.requested_attributes,
            );
            render_variant(out, margin, variant, &requested);
        }
        self.sections(out, &node.extra_details, margin, 1);
    }

    fn sections(&self, out: &mut StyledOutput, sections: &[Section], margin: &str, depth: usize) {
        for section in sections {
            let indent = format!("{}{}", " ".repeat(3 * depth), if depth > 1 { "- " } else { "" });
            let appendix = if section.children.is_empty() { "" } else { ":" };
            let continuation = format!("\n{margin}{}", " ".repeat(indent.len()));
            let description = section
                .description
                .replace("\r\n", "\n")
                .replace('\n', &continuation);
            out.text(margin)
                .styled(TextStyle::Description, format!("{indent}{description}{appendix}"))
                .println();
            self.sections(out, &section.children, margin, depth + 1);
        }
    }

    fn children(
        &self,
        out: &mut StyledOutput,
        node: &RenderableDependency,
        prefix: &str,
        walk: &mut Walk,
    ) {
        let count = node.children().len();
        for (i, child) in node.children().iter().enumerate() {
            let is_last = i == count - 1;
            let connector = if is_last { "└── " } else { "├── " };
            out.text(prefix).text(connector);
            self.header(out, child, walk);
            let repeated = self.repeated(out, child, walk);
            out.println();
            if repeated {
                continue;
            }
            let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            self.body(out, child, &child_prefix);
            self.children(out, child, &child_prefix, walk);
        }
    }

    fn legend(&self, out: &mut StyledOutput, walk: &Walk) {
        if !walk.repeated && !walk.unresolved {
            return;
        }
        out.println();
        if walk.repeated {
            out.styled(TextStyle::Info, "(*)").text(REPEATED_LEGEND).println();
        }
        if walk.unresolved {
            out.styled(TextStyle::Failure, "(n)").text(UNRESOLVED_LEGEND).println();
        }
    }

    /// Command-line options in the trailer (`--scan`) are highlighted.
    fn trailer(&self, out: &mut StyledOutput) {
        for word in self.options.trailer.split_inclusive(' ') {
            if word.starts_with("--") {
                let option = word.trim_end();
                out.styled(TextStyle::UserInput, option)
                    .text(&word[option.len()..]);
            } else {
                out.text(word);
            }
        }
    }
}
