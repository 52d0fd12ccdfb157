//! Message templates for reported differences.
//!
//! Templates use positional `{N}` placeholders filled by [`format`].

pub const ACCESS_ADDED: &str = "access added: {0}";
pub const ACCESS_REMOVED: &str = "access removed: {0}";
pub const ACCESS_CHANGED: &str = "access changed from {0} to {1}";

pub const MODIFIER_ADDED: &str = "modifier added: {0}";
pub const MODIFIER_REMOVED: &str = "modifier removed: {0}";

pub const ANNOTATION_ADDED: &str = "annotation added: {0}";
pub const ANNOTATION_REMOVED: &str = "annotation removed: {0}";

pub const TYPE_PARAMETERS_ADDED: &str = "type parameters added: {0}";
pub const TYPE_PARAMETERS_REMOVED: &str = "type parameters removed: {0}";
pub const TYPE_PARAMETERS_CHANGED: &str = "type parameters changed from {0} to {1}";

pub const TYPE_CHANGED: &str = "type changed from {0} to {1}";

pub const EXTENDED_TYPE_ADDED: &str = "extended type added: {0}";
pub const EXTENDED_TYPE_REMOVED: &str = "extended type removed: {0}";
pub const EXTENDED_TYPE_CHANGED: &str = "extended type changed from {0} to {1}";
pub const IMPLEMENTED_TYPE_ADDED: &str = "implemented type added: {0}";
pub const IMPLEMENTED_TYPE_REMOVED: &str = "implemented type removed: {0}";

pub const RETURN_TYPE_CHANGED: &str = "return type of {0} changed from {1} to {2}";

pub const VARIABLE_TYPE_CHANGED: &str = "variable type for {0} changed from {1} to {2}";
pub const INITIALIZER_ADDED: &str = "initializer added: {0}";
pub const INITIALIZER_REMOVED: &str = "initializer removed: {0}";

pub const PARAMETER_ADDED: &str = "parameter added: {0}";
pub const PARAMETER_REMOVED: &str = "parameter removed: {0}";
pub const PARAMETER_TYPE_CHANGED: &str = "parameter type changed from {0} to {1}";
pub const PARAMETER_NAME_CHANGED: &str = "parameter name changed from {0} to {1}";
pub const PARAMETER_REORDERED: &str = "parameter {0} reordered from argument {1} to {2}";
pub const PARAMETER_REORDERED_AND_RENAMED: &str =
    "parameter {0} reordered from argument {1} to {2} and renamed {3}";

pub const THROWS_ADDED: &str = "throws added: {0}";
pub const THROWS_REMOVED: &str = "throws removed: {0}";
pub const THROWS_REORDERED: &str = "throws {0} reordered from argument {1} to {2}";

pub const PACKAGE_NAME_CHANGED: &str = "package name changed from {0} to {1}";

pub const CODE_ADDED: &str = "code added in {0}";
pub const CODE_REMOVED: &str = "code removed in {0}";
pub const CODE_CHANGED: &str = "code changed in {0}";

pub const FILE_ADDED: &str = "file added: {0}";
pub const FILE_REMOVED: &str = "file removed: {0}";

/// Fill `{0}`, `{1}`, ... in `template` with `args`.
///
/// Placeholders without a matching argument are left as they are.
pub fn format(template: &str, args: &[&str]) -> String {
    let mut out = String::with_capacity(template.len() + args.iter().map(|a| a.len()).sum::<usize>());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let filled = after.find('}').and_then(|close| {
            let index: usize = after[..close].parse().ok()?;
            let arg = args.get(index)?;
            Some((arg, close))
        });
        match filled {
            Some((arg, close)) => {
                out.push_str(arg);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
