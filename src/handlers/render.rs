//! Markdown rendering for handler responses.

use std::fmt::Write as _;

use crate::catalog::{FeatureInfo, FEATURES_SUBPATH};

/// Code fence language for a source file name.
#[must_use]
pub fn fence_language(file_name: &str) -> &'static str {
    if file_name.ends_with(".tsx") {
        "tsx"
    } else {
        "typescript"
    }
}

/// Appends a `## file` heading and a fenced block.
pub fn push_code_section(out: &mut String, file_name: &str, body: &str) {
    let _ = write!(
        out,
        "## {file_name}\n\n```{}\n{}\n```\n\n",
        fence_language(file_name),
        body.trim_end_matches('\n')
    );
}

const fn yes_no(flag: bool) -> &'static str {
    if flag {
        "Yes"
    } else {
        "No"
    }
}

/// Appends the per-feature summary used by `list_features` and search results.
pub fn push_feature_summary(out: &mut String, info: &FeatureInfo) {
    let _ = writeln!(out, "## {}\n", info.name);
    let _ = writeln!(out, "- **Slug**: `{}`", info.slug);
    let _ = writeln!(out, "- **Components**: {}", info.component_files.len());
    let _ = writeln!(out, "- **Hooks**: {}", info.hook_files.len());
    let _ = writeln!(out, "- **Adapters**: {}", info.adapter_files.len());
    let _ = writeln!(out, "- **Documentation**: {}", yes_no(info.has_config));
    let _ = writeln!(out, "- **Integration Prompt**: {}", yes_no(info.has_prompt));
    let _ = writeln!(out, "- **Types**: {}", yes_no(info.has_types));
    out.push('\n');
}

/// Kebab-case slug for a component name: `Auto Save Form` and
/// `AutoSaveForm` both become `auto-save-form`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len() + 4);
    let mut prev: Option<char> = None;

    for c in name.chars() {
        if c.is_alphanumeric() {
            let boundary = c.is_uppercase()
                && prev.is_some_and(|p| p.is_lowercase() || p.is_ascii_digit());
            if boundary && !slug.ends_with('-') {
                slug.push('-');
            }
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
        prev = Some(c);
    }

    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

/// `PascalCase` identifier for a component name.
#[must_use]
pub fn pascal_case(name: &str) -> String {
    slugify(name)
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().chain(chars).collect()
            })
        })
        .collect()
}

/// Advisory scaffold for a new component. Nothing is written to disk.
#[must_use]
pub fn component_scaffold(
    component_name: &str,
    description: &str,
    requirements: Option<&str>,
    constitution: &str,
) -> String {
    let slug = slugify(component_name);
    let ident = pascal_case(component_name);
    let requirements = requirements
        .map(str::trim)
        .filter(|r| !r.is_empty())
        .unwrap_or("None specified.");

    let mut out = String::new();
    let _ = writeln!(out, "# Create Component: {component_name}\n");
    let _ = writeln!(out, "## Description\n\n{description}\n");
    let _ = writeln!(out, "## Requirements\n\n{requirements}\n");
    let _ = writeln!(out, "## Suggested Structure\n");
    let _ = writeln!(out, "```text");
    let _ = writeln!(out, "{FEATURES_SUBPATH}/{slug}/");
    let _ = writeln!(out, "├── config.md          # Feature documentation");
    let _ = writeln!(out, "├── prompt.txt         # Integration instructions for AI assistants");
    let _ = writeln!(out, "├── types.ts           # Shared type definitions");
    let _ = writeln!(out, "├── components/");
    let _ = writeln!(out, "│   └── {ident}.tsx");
    let _ = writeln!(out, "├── hooks/             # Optional: use{ident}.ts");
    let _ = writeln!(out, "└── adapters/          # Optional: data source adapters");
    let _ = writeln!(out, "```\n");
    let _ = writeln!(out, "## Next Steps\n");
    let _ = writeln!(out, "1. Define the public props and data shapes in `types.ts`.");
    let _ = writeln!(
        out,
        "2. Implement `{ident}` in `components/{ident}.tsx` as a prop-driven component."
    );
    let _ = writeln!(
        out,
        "3. Move stateful logic into hooks and keep data access behind adapters."
    );
    let _ = writeln!(
        out,
        "4. Document usage in `config.md` and integration steps in `prompt.txt`."
    );
    let _ = writeln!(out, "5. Review the result against the constitution below.\n");
    let _ = writeln!(out, "## Feature Constitution\n");
    out.push_str(constitution.trim_end_matches('\n'));
    out.push('\n');
    out
}
