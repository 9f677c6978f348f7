//! Line source driver feeding every line of a reader into an [`Estimator`].

use std::io::{self, BufRead};

use tracing::{debug, trace};

use crate::error::Result;
use crate::estimator::Estimator;

/// Number of lines between progress events
const PROGRESS_INTERVAL: u64 = 1 << 20;

/// Insert every line of `reader` into a new estimator of the given `precision`.
///
/// A line ends at `\n`, `\r` or `\r\n`, and the terminator is not part of the key. Fails on
/// invalid precision, on read errors and on input which is not valid UTF-8.
pub fn count_lines<R: BufRead>(reader: R, precision: u8) -> Result<Estimator> {
    let mut estimator = Estimator::new(precision)?;
    let lines = update_from_lines(&mut estimator, reader)?;
    debug!(lines, estimate = estimator.estimate(), "line source exhausted");
    Ok(estimator)
}

/// Insert every line of `reader` into `estimator`, returning the number of lines read
pub fn update_from_lines<R: BufRead>(estimator: &mut Estimator, mut reader: R) -> Result<u64> {
    let mut line = Vec::new();
    let mut lines = 0u64;
    // Previous line ended with `\r`, so a leading `\n` completes a `\r\n` pair
    let mut skip_lf = false;

    loop {
        let (used, terminated) = {
            let buf = match reader.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            if buf.is_empty() {
                if !line.is_empty() {
                    update_from_line(estimator, &line)?;
                    lines += 1;
                }
                return Ok(lines);
            }

            let start = usize::from(std::mem::take(&mut skip_lf) && buf[0] == b'\n');
            match buf[start..].iter().position(|&b| b == b'\n' || b == b'\r') {
                Some(pos) => {
                    line.extend_from_slice(&buf[start..start + pos]);
                    skip_lf = buf[start + pos] == b'\r';
                    (start + pos + 1, true)
                }
                None => {
                    line.extend_from_slice(&buf[start..]);
                    (buf.len(), false)
                }
            }
        };
        reader.consume(used);

        if terminated {
            update_from_line(estimator, &line)?;
            line.clear();

            lines += 1;
            if lines % PROGRESS_INTERVAL == 0 {
                trace!(lines, zeros = estimator.zeros(), "reading lines");
            }
        }
    }
}

/// Insert a single line without its terminator into `estimator`
#[inline]
fn update_from_line(estimator: &mut Estimator, line: &[u8]) -> Result<()> {
    let key =
        std::str::from_utf8(line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    estimator.update(key);
    Ok(())
}
