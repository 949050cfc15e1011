use std::path::Path;

/// Nesting limit for variable expansion. Self-referencing settings
/// (`A = $(A)`) stop here instead of recursing forever.
const MAX_DEPTH: usize = 16;

/// Expand `$(VAR)`, `${VAR}` and `$(VAR:modifier:...)` references in a build
/// setting value.
///
/// Unknown variables expand to the empty string, as Xcode does. A `$` that
/// does not open a well-formed reference is kept verbatim.
pub fn resolve_xcode_build_setting<F>(value: &str, lookup: &F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    expand(value, lookup, 0)
}

fn expand<F>(value: &str, lookup: &F, depth: usize) -> String
where
    F: Fn(&str) -> Option<String>,
{
    if depth >= MAX_DEPTH || !value.contains('$') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(dollar) = rest.find('$') {
        out.push_str(&rest[..dollar]);
        let after = &rest[dollar + 1..];

        let close = match after.chars().next() {
            Some('(') => ')',
            Some('{') => '}',
            _ => {
                out.push('$');
                rest = after;
                continue;
            }
        };

        match find_closing(&after[1..], close) {
            Some(end) => {
                let reference = &after[1..1 + end];
                out.push_str(&expand_reference(reference, lookup, depth));
                rest = &after[end + 2..];
            }
            None => {
                out.push('$');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    out
}

/// Byte offset of the delimiter closing a reference, honoring nested references.
fn find_closing(s: &str, close: char) -> Option<usize> {
    let open = if close == ')' { '(' } else { '{' };
    let mut depth = 0usize;
    for (i, c) in s.char_indices() {
        if c == open {
            depth += 1;
        } else if c == close {
            if depth == 0 {
                return Some(i);
            }
            depth -= 1;
        }
    }
    None
}

fn expand_reference<F>(reference: &str, lookup: &F, depth: usize) -> String
where
    F: Fn(&str) -> Option<String>,
{
    // The variable name itself may be built from other references.
    let reference = expand(reference, lookup, depth + 1);
    let mut parts = reference.split(':');
    let name = parts.next().unwrap_or_default();

    let mut current = lookup(name)
        .map(|v| expand(&v, lookup, depth + 1))
        .unwrap_or_default();
    for modifier in parts {
        current = apply_modifier(&current, modifier);
    }
    current
}

fn apply_modifier(value: &str, modifier: &str) -> String {
    let path = Path::new(value);
    match modifier {
        "lower" => value.to_lowercase(),
        "upper" => value.to_uppercase(),
        "rfc1034identifier" => value
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '.' { c } else { '-' })
            .collect(),
        "c99extidentifier" => value
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect(),
        "file" => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        "dir" => path
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_default(),
        "base" => path
            .file_stem()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        "suffix" => path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default(),
        other => match other.strip_prefix("default=") {
            Some(fallback) if value.is_empty() => fallback.to_string(),
            _ => value.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn test_bundle_identifier_expansion() {
        let vars = settings(&[("APP_ID", "com.example.app"), ("TARGET_NAME", "Widgets")]);
        let result = resolve_xcode_build_setting("$(APP_ID).$(TARGET_NAME:lower)", &|key| vars.get(key).cloned());
        assert_eq!(result, "com.example.app.widgets");
    }

    #[test]
    fn test_curly_braces() {
        let vars = settings(&[("SRCROOT", "/tmp/app")]);
        let result = resolve_xcode_build_setting("${SRCROOT}/Info.plist", &|key| vars.get(key).cloned());
        assert_eq!(result, "/tmp/app/Info.plist");
    }

    #[test]
    fn test_rfc1034_keeps_dots() {
        let vars = settings(&[("PRODUCT_NAME", "My App!")]);
        let result = resolve_xcode_build_setting(
            "com.example.$(PRODUCT_NAME:rfc1034identifier)",
            &|key| vars.get(key).cloned(),
        );
        assert_eq!(result, "com.example.My-App-");
    }

    #[test]
    fn test_nested_variables() {
        let vars = settings(&[("PRODUCT_NAME", "$(TARGET_NAME)"), ("TARGET_NAME", "MyTarget")]);
        let result = resolve_xcode_build_setting("$(PRODUCT_NAME)", &|key| vars.get(key).cloned());
        assert_eq!(result, "MyTarget");
    }

    #[test]
    fn test_variable_name_from_reference() {
        let vars = settings(&[("CONFIG", "DEBUG"), ("ID_DEBUG", "com.example.debug")]);
        let result = resolve_xcode_build_setting("$(ID_$(CONFIG))", &|key| vars.get(key).cloned());
        assert_eq!(result, "com.example.debug");
    }

    #[test]
    fn test_self_reference_terminates() {
        let vars = settings(&[("LOOP", "x$(LOOP)")]);
        let result = resolve_xcode_build_setting("$(LOOP)", &|key| vars.get(key).cloned());
        assert!(result.starts_with("xxxx"));
    }

    #[test]
    fn test_unknown_variable_and_default() {
        let result = resolve_xcode_build_setting("[$(MISSING)]", &|_| None);
        assert_eq!(result, "[]");

        let result = resolve_xcode_build_setting("$(MISSING:default=fallback)", &|_| None);
        assert_eq!(result, "fallback");
    }

    #[test]
    fn test_unmatched_and_plain_dollar() {
        assert_eq!(resolve_xcode_build_setting("cost: $5", &|_| None), "cost: $5");
        assert_eq!(resolve_xcode_build_setting("$(OPEN", &|_| None), "$(OPEN");
    }

    #[test]
    fn test_path_modifiers() {
        let vars = settings(&[("FILE", "Widgets/Info.plist")]);
        let lookup = |key: &str| vars.get(key).cloned();
        assert_eq!(resolve_xcode_build_setting("$(FILE:file)", &lookup), "Info.plist");
        assert_eq!(resolve_xcode_build_setting("$(FILE:dir)", &lookup), "Widgets");
        assert_eq!(resolve_xcode_build_setting("$(FILE:base)", &lookup), "Info");
        assert_eq!(resolve_xcode_build_setting("$(FILE:suffix)", &lookup), ".plist");
    }
}
