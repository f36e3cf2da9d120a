//! Runtime command handler

use super::resolve_instrument_config;
use crate::commands::RuntimeArgs;
use crate::config::CliConfig;
use crate::error::CliResult;
use crate::output::Reporter;
use linecov::runtime_source;

/// Execute the runtime command
pub fn execute_runtime(config: &CliConfig, args: &RuntimeArgs) -> CliResult<()> {
    let reporter = Reporter::new(config);
    let settings = resolve_instrument_config(&args.settings)?;

    if let Some(parent) = args.out_file.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.out_file, runtime_source(&settings))?;

    reporter.success(&format!(
        "Wrote runtime to {} (capacity {}, test name \"{}\")",
        args.out_file.display(),
        settings.registry_capacity,
        settings.test_name
    ));
    Ok(())
}
