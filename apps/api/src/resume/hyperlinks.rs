//! Hyperlink reconciliation: replaces model-transcribed link text with the
//! targets actually embedded in the source document.
//!
//! Models tend to copy a link's display text ("janedoe", "My Portfolio")
//! rather than its href. Harvested hints are ground truth and win whenever
//! one classifies for a field; otherwise the coerced value is kept and only
//! gains an `https://` prefix if it lacks a scheme.

use serde_json::{Map, Value};
use tracing::debug;

use crate::resume::coercion::has_http_scheme;
use crate::resume::schema::HyperlinkHint;

/// Display texts too generic to identify a project by name.
const GENERIC_LINK_TEXT: &[&str] = &[
    "link", "demo", "live", "livedemo", "github", "code", "source", "sourcecode", "website",
    "here", "repo", "repository", "url", "view", "visit",
];

/// Minimum squashed length for fuzzy name/description containment.
const MIN_MATCH_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkTarget {
    LinkedIn,
    GitHub,
    Email,
    Other,
}

/// Classifies a hint URL by substring. `None` means the hint carries no
/// usable link (empty, `tel:`, in-document anchors, non-web schemes).
pub fn classify(url: &str) -> Option<LinkTarget> {
    let lower = url.trim().to_ascii_lowercase();
    if lower.is_empty() || lower.starts_with('#') || lower.starts_with("tel:") {
        return None;
    }
    if lower.starts_with("mailto:") {
        return Some(LinkTarget::Email);
    }
    if lower.contains("://") && !has_http_scheme(&lower) {
        return None;
    }
    if let Some(scheme) = foreign_scheme(&lower) {
        debug!(scheme, "ignoring hint with a non-web scheme");
        return None;
    }

    if lower.contains("linkedin.com") {
        Some(LinkTarget::LinkedIn)
    } else if lower.contains("github.com") {
        Some(LinkTarget::GitHub)
    } else {
        Some(LinkTarget::Other)
    }
}

/// Scheme of `skype:jane`, `javascript:void(0)` and the like. Web schemes
/// and `host:port` forms (dotted hosts) are not reported.
fn foreign_scheme(lower: &str) -> Option<&str> {
    let (scheme, _) = lower.split_once(':')?;
    let is_scheme = !scheme.is_empty()
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '+' || c == '-');
    (is_scheme && !matches!(scheme, "http" | "https" | "mailto")).then_some(scheme)
}

/// Prefixes `https://` to a value lacking a scheme. Blank input yields `None`.
pub fn normalize_url(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if has_http_scheme(value) {
        Some(value.to_string())
    } else {
        Some(format!("https://{value}"))
    }
}

/// Corrects link-bearing fields of a coerced record using document hints.
pub fn reconcile(record: &mut Map<String, Value>, hints: &[HyperlinkHint]) {
    let classified: Vec<(LinkTarget, &HyperlinkHint)> = hints
        .iter()
        .filter_map(|hint| classify(&hint.url).map(|target| (target, hint)))
        .collect();

    debug!(
        hints = hints.len(),
        usable = classified.len(),
        "reconciling hyperlinks"
    );

    if let Some(Value::Object(info)) = record.get_mut("personal_information") {
        reconcile_personal(info, &classified);
    }

    if let Some(Value::Array(projects)) = record.get_mut("projects") {
        reconcile_projects(projects, &classified);
    }
}

fn reconcile_personal(info: &mut Map<String, Value>, classified: &[(LinkTarget, &HyperlinkHint)]) {
    let github = classified
        .iter()
        .filter(|(t, _)| *t == LinkTarget::GitHub)
        .map(|(_, hint)| hint.url.as_str())
        .find(|url| is_profile_url(url))
        .or_else(|| first_of(classified, LinkTarget::GitHub));

    apply_link(info, "linkedin", first_of(classified, LinkTarget::LinkedIn));
    apply_link(info, "github", github);
    apply_link(info, "website", first_of(classified, LinkTarget::Other));

    if matches!(info.get("email"), None | Some(Value::Null)) {
        if let Some(address) = first_of(classified, LinkTarget::Email).and_then(mailto_address) {
            debug!("filling email from mailto link");
            info.insert("email".to_string(), Value::String(address));
        }
    }
}

/// First hint for a target; ties are not broken any further.
fn first_of<'a>(
    classified: &[(LinkTarget, &'a HyperlinkHint)],
    target: LinkTarget,
) -> Option<&'a str> {
    classified
        .iter()
        .find(|(t, _)| *t == target)
        .map(|(_, hint)| hint.url.as_str())
}

fn reconcile_projects(projects: &mut [Value], classified: &[(LinkTarget, &HyperlinkHint)]) {
    let candidates: Vec<&HyperlinkHint> = classified
        .iter()
        .filter(|(t, _)| matches!(t, LinkTarget::GitHub | LinkTarget::Other))
        .map(|(_, hint)| *hint)
        .collect();
    let mut claimed = vec![false; candidates.len()];

    for project in projects.iter_mut() {
        let Value::Object(project) = project else {
            continue;
        };

        let matched = candidates
            .iter()
            .enumerate()
            .find(|(i, hint)| !claimed[*i] && matches_project(project, hint));

        let hint_url = match matched {
            Some((i, hint)) => {
                claimed[i] = true;
                Some(hint.url.as_str())
            }
            None => None,
        };
        apply_link(project, "link", hint_url);
    }
}

/// Writes the hint URL when there is one; otherwise only adds a missing
/// scheme to a string value already present.
fn apply_link(map: &mut Map<String, Value>, key: &str, hint_url: Option<&str>) {
    if let Some(url) = hint_url.and_then(normalize_url) {
        map.insert(key.to_string(), Value::String(url));
        return;
    }
    if let Some(Value::String(current)) = map.get_mut(key) {
        if let Some(url) = normalize_url(current) {
            *current = url;
        }
    }
}

fn matches_project(project: &Map<String, Value>, hint: &HyperlinkHint) -> bool {
    let name = project
        .get("name")
        .and_then(Value::as_str)
        .map(squash)
        .unwrap_or_default();
    let text = squash(&hint.text);
    let text_is_specific = text.len() >= MIN_MATCH_LEN && !GENERIC_LINK_TEXT.contains(&text.as_str());

    if name.len() >= MIN_MATCH_LEN {
        if text_is_specific && (text.contains(&name) || name.contains(&text)) {
            return true;
        }
        let slug = squash(last_path_segment(&hint.url));
        if slug.len() >= MIN_MATCH_LEN && (slug == name || slug.contains(&name)) {
            return true;
        }
    }

    let Some(description) = project.get("description").and_then(Value::as_str) else {
        return false;
    };
    let description = description.to_lowercase();
    let bare_url = strip_scheme(hint.url.trim()).trim_end_matches('/').to_lowercase();
    let display = hint.text.trim().to_lowercase();

    (bare_url.len() > MIN_MATCH_LEN && description.contains(&bare_url))
        || (text_is_specific && description.contains(&display))
}

/// Lowercase alphanumerics only: "Rust-Crawler v2" → "rustcrawlerv2".
fn squash(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn strip_scheme(url: &str) -> &str {
    url.split_once("://").map(|(_, rest)| rest).unwrap_or(url)
}

fn path_segments(url: &str) -> Vec<&str> {
    let without_query = strip_scheme(url.trim())
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    without_query
        .split('/')
        .skip(1)
        .filter(|segment| !segment.is_empty())
        .collect()
}

fn last_path_segment(url: &str) -> &str {
    path_segments(url).last().copied().unwrap_or_default()
}

/// `github.com/jane` is a profile; `github.com/jane/crawler` is a repository.
fn is_profile_url(url: &str) -> bool {
    path_segments(url).len() == 1
}

fn mailto_address(url: &str) -> Option<String> {
    let rest = url.trim().get("mailto:".len()..)?;
    let address = rest.split('?').next().unwrap_or_default().trim();
    (address.contains('@')).then(|| address.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("fixture must be an object"),
        }
    }

    fn personal(linkedin: Value, github: Value, website: Value) -> Map<String, Value> {
        record(json!({
            "personal_information": {
                "email": null,
                "linkedin": linkedin,
                "github": github,
                "website": website
            },
            "projects": []
        }))
    }

    #[test]
    fn test_hint_overrides_username_guess() {
        let mut rec = personal(json!("janedoe"), Value::Null, Value::Null);
        let hints = [HyperlinkHint::new("janedoe", "https://linkedin.com/in/janedoe")];
        reconcile(&mut rec, &hints);
        assert_eq!(
            rec["personal_information"]["linkedin"],
            "https://linkedin.com/in/janedoe"
        );
    }

    #[test]
    fn test_classification_by_substring() {
        assert_eq!(classify("https://www.LinkedIn.com/in/x"), Some(LinkTarget::LinkedIn));
        assert_eq!(classify("github.com/x"), Some(LinkTarget::GitHub));
        assert_eq!(classify("https://jane.dev"), Some(LinkTarget::Other));
        assert_eq!(classify("mailto:jane@x.io"), Some(LinkTarget::Email));
        assert_eq!(classify("tel:+15551234"), None);
        assert_eq!(classify("#section-2"), None);
        assert_eq!(classify("ftp://files.jane.dev"), None);
        assert_eq!(classify("skype:jane.doe?call"), None);
        assert_eq!(classify("javascript:void(0)"), None);
        assert_eq!(classify("sms:+15551234"), None);
        assert_eq!(classify("jane.dev:8080/portfolio"), Some(LinkTarget::Other));
        assert_eq!(classify("  "), None);
    }

    #[test]
    fn test_all_three_personal_links_from_hints() {
        let mut rec = personal(
            json!("https://linkedin.com/in/wrong"),
            json!("github.com/wrong"),
            Value::Null,
        );
        let hints = [
            HyperlinkHint::new("Portfolio", "https://jane.dev"),
            HyperlinkHint::new("LinkedIn", "https://www.linkedin.com/in/jane"),
            HyperlinkHint::new("GitHub", "https://github.com/jane"),
            HyperlinkHint::new("Blog", "https://blog.jane.dev"),
        ];
        reconcile(&mut rec, &hints);
        let info = &rec["personal_information"];
        assert_eq!(info["linkedin"], "https://www.linkedin.com/in/jane");
        assert_eq!(info["github"], "https://github.com/jane");
        assert_eq!(info["website"], "https://jane.dev");
    }

    #[test]
    fn test_github_prefers_profile_over_repository() {
        let mut rec = personal(Value::Null, Value::Null, Value::Null);
        let hints = [
            HyperlinkHint::new("crawler", "https://github.com/jane/crawler"),
            HyperlinkHint::new("jane", "https://github.com/jane/"),
        ];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["personal_information"]["github"], "https://github.com/jane/");
    }

    #[test]
    fn test_github_falls_back_to_first_repository() {
        let mut rec = personal(Value::Null, Value::Null, Value::Null);
        let hints = [HyperlinkHint::new("crawler", "https://github.com/jane/crawler")];
        reconcile(&mut rec, &hints);
        assert_eq!(
            rec["personal_information"]["github"],
            "https://github.com/jane/crawler"
        );
    }

    #[test]
    fn test_without_hints_values_gain_scheme() {
        let mut rec = personal(
            json!("linkedin.com/in/jane"),
            json!("http://github.com/jane"),
            Value::Null,
        );
        reconcile(&mut rec, &[]);
        let info = &rec["personal_information"];
        assert_eq!(info["linkedin"], "https://linkedin.com/in/jane");
        assert_eq!(info["github"], "http://github.com/jane");
        assert_eq!(info["website"], Value::Null);
    }

    #[test]
    fn test_hint_without_scheme_is_normalized() {
        let mut rec = personal(Value::Null, Value::Null, Value::Null);
        reconcile(&mut rec, &[HyperlinkHint::new("site", "jane.dev")]);
        assert_eq!(rec["personal_information"]["website"], "https://jane.dev");
    }

    #[test]
    fn test_non_web_scheme_hints_are_ignored() {
        let mut rec = personal(Value::Null, Value::Null, json!("https://jane.dev"));
        let hints = [
            HyperlinkHint::new("Skype", "skype:jane.doe?call"),
            HyperlinkHint::new("Top", "javascript:scrollTo(0)"),
        ];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["personal_information"]["website"], "https://jane.dev");
    }

    #[test]
    fn test_mailto_fills_missing_email_only() {
        let mut rec = personal(Value::Null, Value::Null, Value::Null);
        let hints = [HyperlinkHint::new("Email me", "mailto:jane@x.io?subject=Hi")];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["personal_information"]["email"], "jane@x.io");
        assert_eq!(rec["personal_information"]["website"], Value::Null);

        let mut rec = personal(Value::Null, Value::Null, Value::Null);
        rec["personal_information"]["email"] = json!("jane@work.io");
        reconcile(&mut rec, &hints);
        assert_eq!(rec["personal_information"]["email"], "jane@work.io");
    }

    #[test]
    fn test_project_link_matched_by_display_text() {
        let mut rec = record(json!({
            "personal_information": {"linkedin": null, "github": null, "website": null, "email": null},
            "projects": [
                {"name": "Rust Crawler", "description": "A web crawler", "link": "Rust Crawler"},
                {"name": "Budget App", "description": "Tracks spending", "link": null}
            ]
        }));
        let hints = [
            HyperlinkHint::new("Budget App", "https://budget.jane.dev"),
            HyperlinkHint::new("Rust Crawler", "https://github.com/jane/rust-crawler"),
        ];
        reconcile(&mut rec, &hints);
        assert_eq!(
            rec["projects"][0]["link"],
            "https://github.com/jane/rust-crawler"
        );
        assert_eq!(rec["projects"][1]["link"], "https://budget.jane.dev");
    }

    #[test]
    fn test_project_link_matched_by_url_slug() {
        let mut rec = record(json!({
            "projects": [{"name": "rust-crawler", "description": null, "link": null}]
        }));
        let hints = [HyperlinkHint::new("Source", "https://github.com/jane/rust-crawler")];
        reconcile(&mut rec, &hints);
        assert_eq!(
            rec["projects"][0]["link"],
            "https://github.com/jane/rust-crawler"
        );
    }

    #[test]
    fn test_project_link_matched_by_description_context() {
        let mut rec = record(json!({
            "projects": [{
                "name": "Side project",
                "description": "Deployed at tracker.jane.dev for 200 users",
                "link": null
            }]
        }));
        let hints = [HyperlinkHint::new("here", "https://tracker.jane.dev/")];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["projects"][0]["link"], "https://tracker.jane.dev/");
    }

    #[test]
    fn test_generic_display_text_does_not_match() {
        let mut rec = record(json!({
            "projects": [{"name": "GitHub Stats Card", "description": null, "link": null}]
        }));
        let hints = [HyperlinkHint::new("GitHub", "https://github.com/jane")];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["projects"][0]["link"], Value::Null);
    }

    #[test]
    fn test_hint_claimed_by_one_project_only() {
        let mut rec = record(json!({
            "projects": [
                {"name": "Crawler", "description": null, "link": null},
                {"name": "Crawler", "description": null, "link": null}
            ]
        }));
        let hints = [HyperlinkHint::new("Crawler", "https://crawler.dev")];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["projects"][0]["link"], "https://crawler.dev");
        assert_eq!(rec["projects"][1]["link"], Value::Null);
    }

    #[test]
    fn test_linkedin_hint_never_used_for_projects() {
        let mut rec = record(json!({
            "projects": [{"name": "janedoe", "description": null, "link": null}]
        }));
        let hints = [HyperlinkHint::new("janedoe", "https://linkedin.com/in/janedoe")];
        reconcile(&mut rec, &hints);
        assert_eq!(rec["projects"][0]["link"], Value::Null);
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("  "), None);
        assert_eq!(normalize_url("jane.dev").as_deref(), Some("https://jane.dev"));
        assert_eq!(
            normalize_url("HTTP://jane.dev").as_deref(),
            Some("HTTP://jane.dev")
        );
    }
}
