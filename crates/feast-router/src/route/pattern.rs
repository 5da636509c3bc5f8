/// Route template compilation
///
/// Pure functional parsing of route templates into an anchored match rule
/// plus the ordered argument chain. All functions are **pure**: same input →
/// same output, no side effects.
///
/// Template syntax: `literal/:param/?:optionalTail`. The first segment is the
/// fixed prefix; `:` marks a parameter; a leading `?` marks the final
/// parameter optional.
use super::ArgumentChainEntry;
use crate::error::{Result, RouterError};
use regex::Regex;
use std::collections::HashMap;

/// Pattern of a single template segment
///
/// # Examples
///
/// ```
/// use feast_router::route::pattern::{classify_segment, PatternSegmentType};
///
/// assert_eq!(classify_segment("about"), PatternSegmentType::Static("about".into()));
/// assert_eq!(classify_segment(":id"), PatternSegmentType::Required("id".into()));
/// assert_eq!(classify_segment("?:rest"), PatternSegmentType::Optional("rest".into()));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum PatternSegmentType {
    /// Optional parameter: `?:name`
    Optional(String),
    /// Required parameter: `:name`
    Required(String),
    /// Literal text, matched verbatim
    Static(String),
}

/// Classifies a segment into a pattern type (pure function)
///
/// The `?` marker only carries meaning in front of a parameter; on a literal
/// segment it is stripped and the rest is kept verbatim.
pub fn classify_segment(segment: &str) -> PatternSegmentType {
    let (optional, rest) = match segment.strip_prefix('?') {
        Some(rest) => (true, rest),
        None => (false, segment),
    };

    match rest.strip_prefix(':') {
        Some(name) if optional => PatternSegmentType::Optional(name.to_string()),
        Some(name) => PatternSegmentType::Required(name.to_string()),
        None => PatternSegmentType::Static(rest.to_string()),
    }
}

/// Output of the pattern compiler
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    /// Computed route path: literals verbatim, parameters as their capture
    /// groups. Unique per HTTP method.
    pub path: String,
    /// Anchored rule matched against the post-module request path
    pub match_rule: Regex,
    /// One entry per parameter, in template order
    pub argument_chain: Vec<ArgumentChainEntry>,
}

/// Compiles a route template (pure function)
///
/// - Parameters before the last segment capture exactly one path segment.
/// - A parameter in the last segment captures the rest of the path greedily
///   and is variadic; with `?` the whole capture group is optional.
/// - Literal segments are escaped and appended verbatim.
///
/// # Examples
///
/// ```
/// use feast_router::route::pattern::compile_template;
/// use std::collections::HashMap;
///
/// let compiled = compile_template("im-a-teapot/:name/?:otherArgs", &HashMap::new()).unwrap();
/// assert_eq!(compiled.path, "im-a-teapot/([^/]*)(?:/(.*))?");
/// assert!(compiled.match_rule.is_match("im-a-teapot/test2"));
/// assert!(!compiled.match_rule.is_match("im-a-teapot"));
/// ```
pub fn compile_template(
    template: &str,
    defaults: &HashMap<String, String>,
) -> Result<CompiledPattern> {
    let invalid = |reason: &str| RouterError::InvalidTemplate {
        template: template.to_string(),
        reason: reason.to_string(),
    };

    let trimmed = template.trim_matches('/');
    if trimmed.is_empty() {
        return Err(invalid("template is empty"));
    }

    let mut segments = trimmed.split('/');
    let prefix = segments.next().unwrap_or_default();
    if prefix.starts_with(':') || prefix.starts_with('?') {
        return Err(invalid("the first segment must be a literal prefix"));
    }

    let rest: Vec<&str> = segments.collect();
    let mut path = prefix.to_string();
    let mut rule = regex::escape(prefix);
    let mut argument_chain: Vec<ArgumentChainEntry> = Vec::new();

    for (index, segment) in rest.iter().enumerate() {
        let is_last = index + 1 == rest.len();

        let (name, optional) = match classify_segment(segment) {
            PatternSegmentType::Static(literal) => {
                path.push('/');
                path.push_str(&literal);
                rule.push('/');
                rule.push_str(&regex::escape(&literal));
                continue;
            }
            PatternSegmentType::Required(name) => (name, false),
            PatternSegmentType::Optional(name) => (name, true),
        };

        if name.is_empty() {
            return Err(invalid("parameter name is empty"));
        }
        if argument_chain.iter().any(|entry| entry.name == name) {
            return Err(invalid(&format!("parameter '{}' is declared twice", name)));
        }
        if optional && !is_last {
            return Err(invalid("only the last parameter may be optional"));
        }

        let capture = match (is_last, optional) {
            (false, _) => "/([^/]*)",
            (true, false) => "/(.*)",
            (true, true) => "(?:/(.*))?",
        };
        path.push_str(capture);
        rule.push_str(capture);

        argument_chain.push(
            ArgumentChainEntry::new(name.clone(), defaults.get(&name).cloned())
                .optional(optional)
                .variadic(is_last),
        );
    }

    let match_rule = Regex::new(&format!("(?s)^{}$", rule))
        .map_err(|err| invalid(&format!("rule does not compile: {}", err)))?;

    Ok(CompiledPattern {
        path,
        match_rule,
        argument_chain,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn compile(template: &str) -> CompiledPattern {
        compile_template(template, &HashMap::new()).unwrap()
    }

    #[test]
    fn test_classify_static() {
        assert_eq!(classify_segment("about"), PatternSegmentType::Static("about".to_string()));
    }

    #[test]
    fn test_classify_optional_literal_drops_marker() {
        assert_eq!(classify_segment("?draft"), PatternSegmentType::Static("draft".to_string()));
    }

    #[test]
    fn test_static_template() {
        let compiled = compile("about/team");
        assert_eq!(compiled.path, "about/team");
        assert!(compiled.argument_chain.is_empty());
        assert!(compiled.match_rule.is_match("about/team"));
        assert!(!compiled.match_rule.is_match("about/team/x"));
    }

    #[test]
    fn test_leading_slash_ignored() {
        assert_eq!(compile("/blog/:slug").path, "blog/(.*)");
    }

    #[test]
    fn test_middle_parameter_captures_one_segment() {
        let compiled = compile("users/:id/edit");
        assert_eq!(compiled.path, "users/([^/]*)/edit");
        assert!(compiled.match_rule.is_match("users/5/edit"));
        assert!(!compiled.match_rule.is_match("users/5/6/edit"));
        assert!(!compiled.argument_chain[0].variadic);
    }

    #[test]
    fn test_required_tail_is_variadic_not_optional() {
        let compiled = compile("files/:path");
        let entry = &compiled.argument_chain[0];
        assert!(entry.variadic);
        assert!(!entry.optional);
        assert!(compiled.match_rule.is_match("files/a/b/c"));
        assert!(!compiled.match_rule.is_match("files"));
    }

    #[test]
    fn test_defaults_attached_to_chain() {
        let mut defaults = HashMap::new();
        defaults.insert("page".to_string(), "1".to_string());
        defaults.insert("unused".to_string(), "x".to_string());
        let compiled = compile_template("list/?:page", &defaults).unwrap();
        assert_eq!(compiled.argument_chain.len(), 1);
        assert_eq!(compiled.argument_chain[0].default.as_deref(), Some("1"));
    }

    #[test]
    fn test_literal_segments_are_escaped() {
        let compiled = compile("feed.xml");
        assert!(compiled.match_rule.is_match("feed.xml"));
        assert!(!compiled.match_rule.is_match("feedaxml"));
    }

    #[test]
    fn test_rejects_parameter_prefix() {
        assert!(matches!(
            compile_template(":id/x", &HashMap::new()),
            Err(RouterError::InvalidTemplate { .. })
        ));
    }

    #[test]
    fn test_rejects_optional_before_last() {
        assert!(compile_template("a/?:b/:c", &HashMap::new()).is_err());
    }

    #[test]
    fn test_rejects_duplicate_parameter() {
        assert!(compile_template("a/:b/:b", &HashMap::new()).is_err());
    }
}
