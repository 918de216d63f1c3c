//! Validate command implementation

use crate::cli::error::CliError;
use crate::xml::check_well_formed;
use std::path::Path;

/// Check that each file is well-formed XML without converting it.
///
/// Every file is checked and reported; the command fails if any of them is
/// missing, unreadable or not well-formed.
pub fn handle_validate(inputs: &[impl AsRef<Path>]) -> Result<(), CliError> {
    if inputs.is_empty() {
        return Err(CliError::InvalidArgument(
            "at least one file to validate is required".to_string(),
        ));
    }

    let mut failures = 0;
    for input in inputs {
        let path = input.as_ref();
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                failures += 1;
                println!("{}", CliError::FileReadError(path.to_path_buf(), e.to_string()));
                continue;
            }
        };

        match check_well_formed(&content) {
            Ok(()) => println!("{}: ok", path.display()),
            Err(e) => {
                failures += 1;
                println!("{}: {:#}", path.display(), e);
            }
        }
    }

    if failures > 0 {
        return Err(CliError::ValidationError(format!(
            "{} of {} files could not be validated",
            failures,
            inputs.len()
        )));
    }
    println!("Validation successful");
    Ok(())
}
