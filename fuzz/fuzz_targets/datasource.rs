//! The stream decoder must never panic and must never hand out more bytes
//! than the buffer holds.

#![no_main]

use cryptodiff::Datasource;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
  let mut ds = Datasource::new(data);
  let mut consumed = 0usize;

  while ds.get_u8().is_ok() {
    consumed += 1;

    match consumed % 4 {
      0 => {
        if let Ok(bytes) = ds.get_data(0) {
          assert!(bytes.len() <= data.len());
        }
      }
      1 => {
        let _ = ds.get_u64();
      }
      2 => {
        let _ = ds.get_bool();
      }
      _ => {
        let _ = ds.get_u32();
      }
    }

    assert!(ds.remaining() <= data.len());
  }
});
