//! Check command implementation

use colored::Colorize;
use kh_config::{ContextResolver, ResolverSettings};

use crate::error::Result;

/// Resolve `section` and verify every name in `required` is set.
pub fn run_check(settings: &ResolverSettings, section: &str, required: &[String]) -> Result<()> {
    let context = ContextResolver::new(settings).resolve_section(section)?;
    context.check_required(required)?;

    tracing::debug!(section, required = required.len(), "Required variables present");
    println!("{}", "ok".green());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use kh_test_utils::ConfigDir;

    fn settings(dir: &ConfigDir) -> ResolverSettings {
        dir.write_config("common:\n  kubectl: []\n  k8s_namespace: shop\n  image: ''\nstaging: {}\n");
        ResolverSettings::new(dir.config_path())
    }

    #[test]
    fn test_check_passes() {
        let dir = ConfigDir::new();
        let required = vec!["k8s_namespace".to_string()];
        assert!(run_check(&settings(&dir), "staging", &required).is_ok());
    }

    #[test]
    fn test_check_reports_missing() {
        let dir = ConfigDir::new();
        let required = vec!["image".to_string(), "tag".to_string()];

        let err = run_check(&settings(&dir), "staging", &required).unwrap_err();

        assert!(matches!(
            err,
            CliError::Config(kh_config::Error::MissingRequiredVars { ref missing, .. })
                if *missing == vec!["image", "tag"]
        ));
    }
}
