//! Brief writer: one summary line per difference.

use super::summary_line;
use crate::differ::Difference;

pub fn write_difference(out: &mut String, diff: &Difference) {
    out.push_str(&summary_line(diff));
    out.push('\n');
}
