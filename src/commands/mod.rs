//! Built-in commands attached to the root of the tree.
pub mod create;
pub mod home;
pub mod init;
pub mod plugin;

use crate::error::CommandError;
use crate::tree::CommandNode;

/// The fixed set of built-in commands, in the order they are attached.
#[must_use]
pub fn builtins() -> Vec<Box<dyn CommandNode>> {
    vec![
        Box::new(create::CreateCommand),
        Box::new(home::HomeCommand),
        Box::new(init::InitCommand),
        Box::new(plugin::PluginCommand),
    ]
}

/// Check that exactly `expected.len()` positional arguments were supplied.
///
/// # Errors
///
/// Returns [`CommandError::ArgumentCount`] naming the expected arguments and
/// the actual count. Too few and too many are reported the same way.
pub fn validate_args(args: &[String], expected: &[&str]) -> Result<(), CommandError> {
    if args.len() == expected.len() {
        return Ok(());
    }
    Err(CommandError::ArgumentCount {
        expected: expected.iter().map(ToString::to_string).collect(),
        actual: args.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn exact_count_passes() {
        assert_eq!(validate_args(&strings(&["app"]), &["path"]), Ok(()));
        assert_eq!(validate_args(&[], &[]), Ok(()));
    }

    #[test]
    fn too_few_and_too_many_share_one_error() {
        let too_few = validate_args(&[], &["path"]);
        let too_many = validate_args(&strings(&["a", "b"]), &["path"]);
        assert_eq!(
            too_few,
            Err(CommandError::ArgumentCount {
                expected: vec!["path".to_string()],
                actual: 0,
            })
        );
        assert_eq!(
            too_many,
            Err(CommandError::ArgumentCount {
                expected: vec!["path".to_string()],
                actual: 2,
            })
        );
    }
}
