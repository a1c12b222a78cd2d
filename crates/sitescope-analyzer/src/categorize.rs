//! Issue categorization by keyword rule table.
//!
//! Classification of free-text issue descriptions is inherently fuzzy. The
//! rule table below is small, fixed and scanned in order (first match
//! wins), so the behavior is enumerable and reviewable. Misclassification at the
//! margins (a message matching two areas) is expected and acceptable; the
//! table's order encodes which area wins.

use sitescope_core::IssueCategory;

/// Keyword -> category, scanned in order. More specific phrases come first
/// so they win over their substrings further down.
const RULES: &[(&str, IssueCategory)] = &[
    ("alt text", IssueCategory::Accessibility),
    ("aria", IssueCategory::Accessibility),
    ("contrast", IssueCategory::Accessibility),
    ("accessib", IssueCategory::Accessibility),
    ("label", IssueCategory::Accessibility),
    ("broken link", IssueCategory::Links),
    ("404", IssueCategory::Links),
    ("meta description", IssueCategory::Seo),
    ("duplicate title", IssueCategory::Seo),
    ("title", IssueCategory::Seo),
    ("canonical", IssueCategory::Seo),
    ("noindex", IssueCategory::Seo),
    ("seo", IssueCategory::Seo),
    ("load time", IssueCategory::Performance),
    ("slow", IssueCategory::Performance),
    ("performance", IssueCategory::Performance),
    ("heavy", IssueCategory::Performance),
    ("navigation", IssueCategory::Structure),
    ("depth", IssueCategory::Structure),
    ("orphan", IssueCategory::Structure),
    ("structure", IssueCategory::Structure),
    ("link", IssueCategory::Links),
];

/// Classify an issue description.
///
/// Falls back to [`IssueCategory::Content`] when no rule matches.
#[must_use]
pub fn categorize(message: &str) -> IssueCategory {
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map_or(IssueCategory::Content, |(_, category)| *category)
}
