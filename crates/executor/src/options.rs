//! Process-wide engine configuration.
//!
//! An [`Options`] value is built once at startup and shared read-only by
//! every executor. Allow-sets follow "unset means everything": a run that
//! never restricts `digests` dispatches every digest the stream names.

use std::{
  collections::BTreeSet,
  fmt,
  io::Write,
  sync::{Mutex, PoisonError},
};

use components::ids::{CALCOP_NAMES, CIPHER_NAMES, CURVE_NAMES, DIGEST_NAMES};
use serde_json::Value;

/// Immutable engine configuration.
pub struct Options {
  /// Digest allow-set; `None` allows all.
  pub digests: Option<BTreeSet<u64>>,
  /// Cipher allow-set; `None` allows all.
  pub ciphers: Option<BTreeSet<u64>>,
  /// Curve allow-set; `None` allows all.
  pub curves: Option<BTreeSet<u64>>,
  /// Calculator-operation allow-set; `None` allows all.
  pub calc_ops: Option<BTreeSet<u64>>,
  /// Explicitly disabled module IDs.
  pub disable_modules: BTreeSet<u64>,
  /// Override for the module ID decoded from the stream.
  pub force_module: Option<u64>,
  /// Skip the invocation when the assembled batch is smaller than this.
  pub min_modules: usize,
  /// Suppress the differential comparator.
  pub no_compare: bool,
  /// Suppress the encrypt→decrypt round-trip check.
  pub no_decrypt: bool,
  /// Suppress the per-result semantic sanity checks.
  pub disable_tests: bool,
  /// Trace every operation and result to stdout.
  pub debug: bool,
  /// Sink for the newline-delimited JSON result log.
  json_dump: Option<Mutex<Box<dyn Write + Send>>>,
}

impl Options {
  /// Defaults: everything allowed, every check enabled, no log sink.
  #[must_use]
  pub fn new() -> Self {
    Self {
      digests: None,
      ciphers: None,
      curves: None,
      calc_ops: None,
      disable_modules: BTreeSet::new(),
      force_module: None,
      min_modules: 0,
      no_compare: false,
      no_decrypt: false,
      disable_tests: false,
      debug: false,
      json_dump: None,
    }
  }

  // ───────────────────────────────────────────────────────────────────────
  // Builders
  // ───────────────────────────────────────────────────────────────────────

  /// Restrict digests to the given IDs.
  #[must_use]
  pub fn with_digests(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
    self.digests = Some(ids.into_iter().collect());
    self
  }

  /// Restrict ciphers to the given IDs.
  #[must_use]
  pub fn with_ciphers(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
    self.ciphers = Some(ids.into_iter().collect());
    self
  }

  /// Restrict curves to the given IDs.
  #[must_use]
  pub fn with_curves(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
    self.curves = Some(ids.into_iter().collect());
    self
  }

  /// Restrict calculator operations to the given IDs.
  #[must_use]
  pub fn with_calc_ops(mut self, ids: impl IntoIterator<Item = u64>) -> Self {
    self.calc_ops = Some(ids.into_iter().collect());
    self
  }

  /// Deny a module ID outright.
  #[must_use]
  pub fn disable_module(mut self, id: u64) -> Self {
    self.disable_modules.insert(id);
    self
  }

  /// Route every operation to one module regardless of the stream.
  #[must_use]
  pub fn with_force_module(mut self, id: u64) -> Self {
    self.force_module = Some(id);
    self
  }

  /// Require at least `n` batch entries before running.
  #[must_use]
  pub fn with_min_modules(mut self, n: usize) -> Self {
    self.min_modules = n;
    self
  }

  /// Disable the comparator.
  #[must_use]
  pub fn without_compare(mut self) -> Self {
    self.no_compare = true;
    self
  }

  /// Disable the round-trip decrypt check.
  #[must_use]
  pub fn without_decrypt(mut self) -> Self {
    self.no_decrypt = true;
    self
  }

  /// Disable the semantic sanity checks.
  #[must_use]
  pub fn without_tests(mut self) -> Self {
    self.disable_tests = true;
    self
  }

  /// Enable stdout tracing of every call.
  #[must_use]
  pub fn with_debug(mut self) -> Self {
    self.debug = true;
    self
  }

  /// Attach the append-only JSON log sink.
  #[must_use]
  pub fn with_json_dump(mut self, sink: Box<dyn Write + Send>) -> Self {
    self.json_dump = Some(Mutex::new(sink));
    self
  }

  // ───────────────────────────────────────────────────────────────────────
  // Queries
  // ───────────────────────────────────────────────────────────────────────

  /// Allow-set membership with "unset allows all" semantics.
  #[inline]
  #[must_use]
  pub fn have(set: &Option<BTreeSet<u64>>, id: u64) -> bool {
    match set {
      Some(ids) => ids.contains(&id),
      None => true,
    }
  }

  /// Whether a module ID is explicitly denied.
  #[inline]
  #[must_use]
  pub fn module_disabled(&self, id: u64) -> bool {
    self.disable_modules.contains(&id)
  }

  /// Whether the JSON log sink is attached.
  #[inline]
  #[must_use]
  pub fn json_dump_enabled(&self) -> bool {
    self.json_dump.is_some()
  }

  /// Append one JSON object as a line to the log sink, if attached.
  pub fn json_dump_line(&self, value: &Value) {
    if let Some(sink) = &self.json_dump {
      let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
      let _ = writeln!(sink, "{value}");
    }
  }

  // ───────────────────────────────────────────────────────────────────────
  // Name-list parsing
  // ───────────────────────────────────────────────────────────────────────

  /// Parse a comma-separated digest-name list into an ID set.
  ///
  /// Returns `None` if any name is unknown. Accepts case-insensitive names:
  /// `"SHA-256,sha-1"` is fine.
  #[must_use]
  pub fn parse_digests(list: &str) -> Option<BTreeSet<u64>> {
    parse_name_list(list, DIGEST_NAMES)
  }

  /// Parse a comma-separated cipher-name list into an ID set.
  #[must_use]
  pub fn parse_ciphers(list: &str) -> Option<BTreeSet<u64>> {
    parse_name_list(list, CIPHER_NAMES)
  }

  /// Parse a comma-separated curve-name list into an ID set.
  #[must_use]
  pub fn parse_curves(list: &str) -> Option<BTreeSet<u64>> {
    parse_name_list(list, CURVE_NAMES)
  }

  /// Parse a comma-separated calculator-operation list into an ID set.
  #[must_use]
  pub fn parse_calc_ops(list: &str) -> Option<BTreeSet<u64>> {
    parse_name_list(list, CALCOP_NAMES)
  }
}

impl Default for Options {
  fn default() -> Self {
    Self::new()
  }
}

impl fmt::Debug for Options {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Options")
      .field("digests", &self.digests)
      .field("ciphers", &self.ciphers)
      .field("curves", &self.curves)
      .field("calc_ops", &self.calc_ops)
      .field("disable_modules", &self.disable_modules)
      .field("force_module", &self.force_module)
      .field("min_modules", &self.min_modules)
      .field("no_compare", &self.no_compare)
      .field("no_decrypt", &self.no_decrypt)
      .field("disable_tests", &self.disable_tests)
      .field("debug", &self.debug)
      .field("json_dump", &self.json_dump.as_ref().map(|_| "<sink>"))
      .finish()
  }
}

fn parse_name_list(list: &str, table: &[(u64, &str)]) -> Option<BTreeSet<u64>> {
  let mut out = BTreeSet::new();
  for name in list.split(',') {
    let name = name.trim();
    if name.is_empty() {
      continue;
    }
    let (id, _) = table.iter().find(|(_, known)| known.eq_ignore_ascii_case(name))?;
    out.insert(*id);
  }
  Some(out)
}
