//! Release body rendering.

use crate::model::Issue;
use crate::resolver::Changeset;
use std::fmt::Write;

/// Body used when no issue made it into the release.
pub const EMPTY_RELEASE_BODY: &str = "New Release";

/// Renders the Markdown release body.
///
/// Issues are listed in the order given; each line shows the allow-listed
/// labels the issue carries, in allow-list order. Changed watched files get
/// their own section linking the comparison.
#[must_use]
pub fn render(issues: &[Issue], changed_files: &[String], compare_url: &str, labels: &[String]) -> String {
    if issues.is_empty() {
        return EMPTY_RELEASE_BODY.to_string();
    }

    let mut output = String::from("## Changes\n");

    for issue in issues {
        let _ = write!(output, "* [#{}]({}) - {}", issue.number, issue.url, issue.title);

        let annotations: Vec<String> = labels
            .iter()
            .filter(|label| issue.has_label(label))
            .map(|label| format!("**{label}**"))
            .collect();

        if !annotations.is_empty() {
            let _ = write!(output, " {}", annotations.join(", "));
        }

        let _ = writeln!(output, " (@{})", issue.author);
    }

    if !changed_files.is_empty() {
        output.push_str("\n### Watched File Changes\n");
        let _ = writeln!(output, "Changes: {compare_url}");
        for file in changed_files {
            let _ = writeln!(output, "* {file}");
        }
    }

    output
}

/// Renders the body for a resolved changeset.
#[must_use]
pub fn render_changeset(changeset: &Changeset, labels: &[String]) -> String {
    render(
        &changeset.issues,
        &changeset.changed_files,
        &changeset.comparison_url,
        labels,
    )
}
