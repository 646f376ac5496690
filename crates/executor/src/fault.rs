//! Fatal-fault reporting.
//!
//! A differential fault has no recovery path; surfacing it is the purpose
//! of the system. The contract with the fuzzer harness is a canonical
//! assertion line on stdout followed by abnormal termination (SIGABRT), so
//! the harness registers a crash and keeps the reproducing input.

use std::io::Write as _;

/// Print the canonical assertion line and terminate the process.
///
/// The line has the form
/// `Assertion failure: module1-module2-…-<operation>-<algorithm>-<reason>`
/// with module names sorted lexicographically so the same fault always
/// deduplicates to the same crash signature.
pub fn fatal(module_names: Vec<String>, operation: &str, algorithm: &str, reason: &str) -> ! {
  println!("{}", assertion_line(module_names, operation, algorithm, reason));
  let _ = std::io::stdout().flush();

  std::process::abort();
}

/// Render the assertion line without aborting. Split out so tests can pin
/// the exact format [`fatal`] prints.
#[must_use]
pub fn assertion_line(mut module_names: Vec<String>, operation: &str, algorithm: &str, reason: &str) -> String {
  module_names.sort_unstable();

  let mut line = String::from("Assertion failure: ");
  for name in &module_names {
    line.push_str(name);
    line.push('-');
  }
  line.push_str(operation);
  line.push('-');
  line.push_str(algorithm);
  line.push('-');
  line.push_str(reason);
  line
}
